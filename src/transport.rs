//! Peer channel: typed messages in, typed messages out.
//!
//! A connection is split into a [`PeerSender`] and a [`PeerReceiver`] backed
//! by tokio channels. Over TCP, two background tasks translate between the
//! channels and newline-delimited JSON frames. No reconnection is attempted:
//! when the socket closes the receiver simply ends.

use crate::protocol::{PeerMessage, ProtocolError, decode, encode};
use derive_more::{Display, Error};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// What arrives from the peer: a message or a frame that failed to parse.
pub type Incoming = Result<PeerMessage, ProtocolError>;

/// Longest accepted frame in bytes, newline excluded.
///
/// A full snapshot is a few tens of kilobytes. A peer sending a longer line
/// is disconnected.
pub const MAX_FRAME_LEN: usize = 256 * 1024;

/// Sending half of a peer connection.
#[derive(Debug, Clone)]
pub struct PeerSender {
    tx: mpsc::UnboundedSender<PeerMessage>,
}

impl PeerSender {
    /// Queues a message for the peer.
    #[instrument(skip(self, message), fields(kind = message.kind()))]
    pub fn send(&self, message: PeerMessage) -> Result<(), TransportError> {
        self.tx
            .send(message)
            .map_err(|_| TransportError::new("Peer disconnected"))
    }
}

/// Receiving half of a peer connection.
#[derive(Debug)]
pub struct PeerReceiver {
    rx: mpsc::UnboundedReceiver<Incoming>,
}

impl PeerReceiver {
    /// Waits for the next message; `None` once the peer is gone.
    pub async fn recv(&mut self) -> Option<Incoming> {
        self.rx.recv().await
    }
}

/// Creates two connected in-process endpoints.
///
/// Messages pass through unchanged, without serialization.
pub fn local_pair() -> ((PeerSender, PeerReceiver), (PeerSender, PeerReceiver)) {
    let (a_tx, a_rx) = endpoint();
    let (b_tx, b_rx) = endpoint();
    (forward(a_tx, b_rx), forward(b_tx, a_rx))
}

fn endpoint() -> (
    mpsc::UnboundedSender<PeerMessage>,
    mpsc::UnboundedReceiver<PeerMessage>,
) {
    mpsc::unbounded_channel()
}

/// Wires `outgoing` to a receiver that yields what `incoming` delivers.
fn forward(
    outgoing: mpsc::UnboundedSender<PeerMessage>,
    mut incoming: mpsc::UnboundedReceiver<PeerMessage>,
) -> (PeerSender, PeerReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        while let Some(message) = incoming.recv().await {
            if tx.send(Ok(message)).is_err() {
                break;
            }
        }
    });
    (PeerSender { tx: outgoing }, PeerReceiver { rx })
}

/// Waits for one peer to connect and returns the connection.
#[instrument(skip(addr))]
pub async fn host(addr: impl ToSocketAddrs) -> Result<(PeerSender, PeerReceiver), TransportError> {
    let listener = TcpListener::bind(addr).await?;
    let local = listener.local_addr()?;
    info!(addr = %local, "Waiting for peer");
    accept(&listener).await
}

/// Accepts one peer on an already bound listener.
pub async fn accept(listener: &TcpListener) -> Result<(PeerSender, PeerReceiver), TransportError> {
    let (stream, peer) = listener.accept().await?;
    info!(%peer, "Peer connected");
    Ok(connect_stream(stream))
}

/// Connects to a hosting peer.
#[instrument(skip(addr))]
pub async fn join(addr: impl ToSocketAddrs) -> Result<(PeerSender, PeerReceiver), TransportError> {
    let stream = TcpStream::connect(addr).await?;
    let peer = stream.peer_addr()?;
    info!(%peer, "Connected to host");
    Ok(connect_stream(stream))
}

/// Spawns the frame reader and writer for an established stream.
pub fn connect_stream(stream: TcpStream) -> (PeerSender, PeerReceiver) {
    let (read_half, mut write_half) = stream.into_split();
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<PeerMessage>();
    let (in_tx, in_rx) = mpsc::unbounded_channel::<Incoming>();

    tokio::spawn(async move {
        let mut reader = BufReader::new(read_half);
        let mut buf = Vec::new();
        loop {
            match read_frame(&mut reader, &mut buf).await {
                Ok(Frame::Line(line)) if line.trim().is_empty() => continue,
                Ok(Frame::Line(line)) => {
                    let incoming = decode(&line);
                    if let Err(e) = &incoming {
                        warn!(error = %e, "Dropping malformed frame");
                    }
                    if in_tx.send(incoming).is_err() {
                        break;
                    }
                }
                Ok(Frame::TooLong) => {
                    warn!(max = MAX_FRAME_LEN, "Peer frame too long, disconnecting");
                    break;
                }
                Ok(Frame::Closed) => {
                    debug!("Peer closed the connection");
                    break;
                }
                Err(e) => {
                    warn!(error = %e, "Read from peer failed");
                    break;
                }
            }
        }
    });

    tokio::spawn(async move {
        while let Some(message) = out_rx.recv().await {
            let frame = match encode(&message) {
                Ok(frame) => frame,
                Err(e) => {
                    warn!(error = %e, "Could not encode message");
                    continue;
                }
            };
            let written = async {
                write_half.write_all(frame.as_bytes()).await?;
                write_half.write_all(b"\n").await?;
                write_half.flush().await
            };
            if let Err(e) = written.await {
                warn!(error = %e, "Write to peer failed");
                break;
            }
        }
    });

    (PeerSender { tx: out_tx }, PeerReceiver { rx: in_rx })
}

enum Frame {
    Line(String),
    TooLong,
    Closed,
}

/// Reads one newline-terminated frame, reading at most one byte past
/// [`MAX_FRAME_LEN`].
async fn read_frame<R>(reader: &mut R, buf: &mut Vec<u8>) -> std::io::Result<Frame>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    let limit = MAX_FRAME_LEN as u64 + 1;
    let read = (&mut *reader).take(limit).read_until(b'\n', buf).await?;
    if read == 0 {
        return Ok(Frame::Closed);
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
    } else if buf.len() > MAX_FRAME_LEN {
        return Ok(Frame::TooLong);
    }
    Ok(Frame::Line(String::from_utf8_lossy(buf).into_owned()))
}

/// Connection-level failure.
#[derive(Debug, Clone, Display, Error)]
#[display("Transport error: {} at {}:{}", message, file, line)]
pub struct TransportError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl TransportError {
    /// Creates a new transport error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<std::io::Error> for TransportError {
    #[track_caller]
    fn from(err: std::io::Error) -> Self {
        Self::new(format!("I/O error: {}", err))
    }
}
