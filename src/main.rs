//! ultimate_ttt - interactive terminal front end.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;
use ultimate_ttt::{
    AppConfig, FeedbackSink, HELP, Incoming, Input, MatchSession, PeerMessage, PeerReceiver,
    PeerSender, Role, SessionEvent, SilentFeedback, TracingFeedback, load_game, parse_input,
    render, render_owners, save_game,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,ultimate_ttt=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Loading {}", cli.config.display()))?;

    match cli.command {
        Command::Local => run_match(config, Role::Local, None).await,
        Command::Host { port, bind } => run_host(config, bind, port).await,
        Command::Join { addr } => run_join(config, addr).await,
        Command::Show { file } => run_show(&config, file),
    }
}

/// Wait for one guest, then play X.
#[instrument(skip(config))]
async fn run_host(config: AppConfig, bind: String, port: Option<u16>) -> Result<()> {
    let addr = format!("{}:{}", bind, port.unwrap_or(*config.default_port()));
    println!("Waiting for a guest on {}...", addr);
    let peer = ultimate_ttt::host(addr.as_str()).await?;
    println!("Guest connected. You are X.");
    run_match(config, Role::Host, Some(peer)).await
}

/// Connect to a host, then play O.
#[instrument(skip(config))]
async fn run_join(config: AppConfig, addr: String) -> Result<()> {
    let peer = ultimate_ttt::join(addr.as_str()).await?;
    println!("Connected to {}. You are O.", addr);
    run_match(config, Role::Guest, Some(peer)).await
}

/// Print a saved game.
fn run_show(config: &AppConfig, file: PathBuf) -> Result<()> {
    let state = load_game(&file)?;
    println!("{}", render(&state, config.render()));
    println!();
    println!("{}", render_owners(&state));
    Ok(())
}

/// Interactive loop: stdin lines and peer messages, whichever comes first.
async fn run_match(
    config: AppConfig,
    role: Role,
    peer: Option<(PeerSender, PeerReceiver)>,
) -> Result<()> {
    let feedback: Arc<dyn FeedbackSink> = if *config.feedback() {
        Arc::new(TracingFeedback)
    } else {
        Arc::new(SilentFeedback)
    };
    let mut session = MatchSession::new(role, feedback);

    let (sender, mut receiver) = match peer {
        Some((sender, receiver)) => (Some(sender), Some(receiver)),
        None => (None, None),
    };

    if let Some(message) = session.on_connected() {
        forward(&sender, message);
    }

    println!("{}", render(session.state(), config.render()));
    println!("Type 'help' for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("Input closed");
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match parse_input(&line) {
                    Ok(Input::Quit) => break,
                    Ok(input) => on_input(&mut session, &config, &sender, input),
                    Err(e) => println!("{}", e),
                }
            }
            incoming = next_incoming(&mut receiver) => {
                match incoming {
                    Some(incoming) => on_incoming(&mut session, &config, incoming),
                    None => {
                        println!("Peer disconnected.");
                        receiver = None;
                    }
                }
            }
        }
    }

    info!("Leaving match");
    Ok(())
}

/// Next peer message, or never when there is no peer.
async fn next_incoming(receiver: &mut Option<PeerReceiver>) -> Option<Incoming> {
    match receiver {
        Some(receiver) => receiver.recv().await,
        None => std::future::pending().await,
    }
}

fn forward(sender: &Option<PeerSender>, message: PeerMessage) {
    if let Some(sender) = sender
        && let Err(e) = sender.send(message)
    {
        warn!(error = %e, "Could not reach peer");
        println!("Could not reach peer: {}", e);
    }
}

fn on_input(
    session: &mut MatchSession,
    config: &AppConfig,
    sender: &Option<PeerSender>,
    input: Input,
) {
    match input {
        Input::Play(path) => match session.select_cell(path) {
            Ok(message) => {
                forward(sender, message);
                println!("{}", render(session.state(), config.render()));
            }
            Err(e) => println!("{}", e),
        },
        Input::Say(text) => {
            println!("{}: {}", config.player_name(), text);
            let message = session.say(text);
            forward(sender, message);
        }
        Input::Reset => {
            let message = session.reset();
            forward(sender, message);
            println!("{}", render(session.state(), config.render()));
        }
        Input::Save(path) => match save_game(&path, session.state()) {
            Ok(()) => println!("Saved to {}", path.display()),
            Err(e) => println!("{}", e),
        },
        Input::Load(path) => {
            let loaded = load_game(&path).map_err(|e| e.to_string()).and_then(|state| {
                session.load(state).map_err(|e| e.to_string())
            });
            match loaded {
                Ok(message) => {
                    forward(sender, message);
                    println!("{}", render(session.state(), config.render()));
                }
                Err(e) => println!("{}", e),
            }
        }
        Input::Board => println!("{}", render(session.state(), config.render())),
        Input::Owners => println!("{}", render_owners(session.state())),
        Input::Help => println!("{}", HELP),
        Input::Quit => {}
    }
}

fn on_incoming(session: &mut MatchSession, config: &AppConfig, incoming: Incoming) {
    let message = match incoming {
        Ok(message) => message,
        Err(e) => {
            warn!(error = %e, "Dropping malformed peer frame");
            return;
        }
    };

    match session.handle(message) {
        Ok(SessionEvent::Moved(mov)) => {
            println!("Peer played {}", mov);
            println!("{}", render(session.state(), config.render()));
        }
        Ok(SessionEvent::Replaced) => {
            println!("Board updated by peer.");
            println!("{}", render(session.state(), config.render()));
        }
        Ok(SessionEvent::Chat(text)) => println!("peer: {}", text),
        Ok(SessionEvent::Reset) => {
            println!("Peer started a new game.");
            println!("{}", render(session.state(), config.render()));
        }
        Err(e) => {
            warn!(error = %e, "Ignored peer message");
            println!("Ignored peer message: {}", e);
        }
    }
}
