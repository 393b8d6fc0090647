use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use playground_core::{IceServerConfig, PeerId, PlayerState, Quat, RoomId, ShareLink, Vec3};
use playground_session::{SessionConfig, SessionController, TransportConfig};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Notify, mpsc};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

const PEER_TIMEOUT: Duration = Duration::from_secs(30);
const ORBIT_RADIUS: f32 = 4.0;

#[derive(Parser)]
#[command(name = "playground")]
#[command(about = "Peer-to-peer sessions for the physics playground, signaled by copy and paste")]
struct Cli {
    #[command(flatten)]
    net: NetArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct NetArgs {
    /// JSON file with a session configuration.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// STUN server URL; may be repeated. Replaces the configured servers.
    #[arg(long = "stun", global = true)]
    stun: Vec<String>,

    /// Use host candidates only.
    #[arg(long, global = true)]
    no_stun: bool,

    /// Origin and path used to build share links.
    #[arg(long, global = true)]
    base_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Host a room and stream a synthetic player to whoever joins.
    Host {
        #[arg(long, default_value = "host")]
        username: String,

        /// State updates per second.
        #[arg(long, default_value_t = 20)]
        rate: u32,
    },
    /// Join a room with the host's offer.
    Join {
        /// Share link printed by the host.
        #[arg(long, conflicts_with = "room")]
        link: Option<String>,

        #[arg(long)]
        room: Option<String>,

        /// Host's offer; prompted for when missing.
        #[arg(long)]
        offer: Option<String>,
    },
    /// Host and join inside one process.
    Demo {
        #[arg(long, default_value_t = 5)]
        updates: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = load_config(&cli.net)?;

    match cli.command {
        Commands::Host { username, rate } => run_host(config, username, rate).await,
        Commands::Join { link, room, offer } => run_join(config, link, room, offer).await,
        Commands::Demo { updates } => run_demo(config, updates).await,
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &NetArgs) -> Result<SessionConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            SessionConfig::from_json(&text)
                .with_context(|| format!("Invalid session config in {}", path.display()))?
        }
        None => SessionConfig::default(),
    };

    if let Some(url) = &args.base_url {
        config.share_base_url = url.clone();
    }
    if args.no_stun {
        config.transport.ice_servers.clear();
    } else if !args.stun.is_empty() {
        config.transport.ice_servers = args.stun.iter().map(IceServerConfig::stun).collect();
    }

    Ok(config)
}

async fn prompt(label: &'static str) -> Result<String> {
    let line = tokio::task::spawn_blocking(move || {
        dialoguer::Input::<String>::new()
            .with_prompt(label)
            .interact_text()
    })
    .await
    .context("Prompt task failed")??;
    Ok(line.trim().to_owned())
}

/// Walks a circle around the origin so remote avatars have something to show.
fn orbit(id: &PeerId, username: &str, elapsed: Duration) -> PlayerState {
    let t = elapsed.as_secs_f32();
    let position = Vec3::new(t.cos() * ORBIT_RADIUS, 1.0, t.sin() * ORBIT_RADIUS);
    PlayerState::new(id.clone(), username).at(position, Quat::from_yaw(-t))
}

async fn run_host(config: SessionConfig, username: String, rate: u32) -> Result<()> {
    let session = SessionController::new(config);

    let link = session.host_game();
    println!("{} {}", "🔗 Share link:".green().bold(), link);

    let offer = session.create_offer_description().await?.encode()?;
    println!("{}", "📤 Send this offer to the other player:".cyan());
    println!("{}", offer);

    let answer = prompt("Paste the answer").await?;
    let peer = session.apply_answer_description(&answer).await?;
    session.wait_for_peer(&peer, PEER_TIMEOUT).await?;
    println!("{} {}", "✨ Connected:".green().bold(), peer);

    let me = PlayerState::new(session.player_id().clone(), username.clone());
    session.send_player_joined(&me).await;

    let started = Instant::now();
    let mut ticker = tokio::time::interval(Duration::from_secs_f64(1.0 / f64::from(rate.max(1))));
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let state = orbit(session.player_id(), &username, started.elapsed());
                let delivered = session.send_player_state(&state).await;
                debug!("State delivered to {} peer(s)", delivered);
                if !session.is_multiplayer() {
                    warn!("Every peer has left");
                    break;
                }
            }
            _ = &mut ctrl_c => break,
        }
    }

    session.stop_hosting().await;
    println!("{}", "👋 Stopped hosting".yellow());
    Ok(())
}

async fn run_join(
    config: SessionConfig,
    link: Option<String>,
    room: Option<String>,
    offer: Option<String>,
) -> Result<()> {
    let room = match (link, room) {
        (Some(link), _) => link.parse::<ShareLink>().context("Invalid share link")?.room,
        (None, Some(room)) => RoomId::from(room),
        (None, None) => RoomId::from(prompt("Room id").await?),
    };
    let offer = match offer {
        Some(offer) => offer,
        None => prompt("Paste the host's offer").await?,
    };

    let session = SessionController::new(config);
    let finished = Arc::new(Notify::new());

    session.set_on_state_update(|state| {
        debug!(
            "{} at ({:.2}, {:.2}, {:.2})",
            state.id, state.position.x, state.position.y, state.position.z
        );
    });
    session.set_on_player_joined(|state| {
        println!("{} {} ({})", "➕ Joined:".green(), state.username, state.id);
    });
    session.set_on_player_left(|id| {
        println!("{} {}", "➖ Left:".yellow(), id);
    });
    let notify = Arc::clone(&finished);
    session.set_on_host_stopped(move |message| {
        println!("{} {}", "🛑 Host stopped:".red(), message.unwrap_or("no reason given"));
        notify.notify_one();
    });
    let notify = Arc::clone(&finished);
    session.set_on_peer_disconnected(move |id| {
        println!("{} {}", "🔌 Lost connection to".red(), id);
        notify.notify_one();
    });

    let joined = session.join_game(&room, &offer).await?;
    println!("{}", "📤 Send this answer back to the host:".cyan());
    println!("{}", joined.answer.encode()?);

    session.wait_for_peer(&joined.host, PEER_TIMEOUT).await?;
    println!("{} {}", "✨ Connected to host".green().bold(), joined.host);

    tokio::select! {
        _ = finished.notified() => {}
        _ = tokio::signal::ctrl_c() => {}
    }

    session.disconnect().await;
    Ok(())
}

async fn run_demo(mut config: SessionConfig, updates: u32) -> Result<()> {
    // Loopback needs no STUN unless servers were asked for explicitly.
    if config.transport.ice_servers == TransportConfig::default().ice_servers {
        config.transport.ice_servers.clear();
    }

    let host = SessionController::new(config.clone());
    let joiner = SessionController::new(config);

    let (state_tx, mut state_rx) = mpsc::unbounded_channel();
    joiner.set_on_state_update(move |state| {
        let _ = state_tx.send(state.clone());
    });

    let link = host.host_game();
    println!("{} {}", "🔗 Share link:".green().bold(), link);

    let offer = host.create_offer_description().await?.encode()?;
    let joined = joiner.join_game(&link.room, &offer).await?;
    let joiner_id = host
        .apply_answer_description(&joined.answer.encode()?)
        .await?;

    host.wait_for_peer(&joiner_id, PEER_TIMEOUT).await?;
    joiner.wait_for_peer(&joined.host, PEER_TIMEOUT).await?;
    println!("{} {} ⇄ {}", "✨ Linked".green().bold(), host.player_id(), joiner_id);

    let started = Instant::now();
    for _ in 0..updates {
        let state = orbit(host.player_id(), "demo-host", started.elapsed());
        host.send_player_state(&state).await;

        let received = tokio::time::timeout(Duration::from_secs(5), state_rx.recv())
            .await
            .context("Timed out waiting for a state update")?
            .context("State channel closed")?;
        println!(
            "{} {} at ({:.2}, {:.2}, {:.2})",
            "📥 Joiner saw".cyan(),
            received.id,
            received.position.x,
            received.position.y,
            received.position.z
        );

        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    host.stop_hosting().await;
    joiner.disconnect().await;
    println!("{}", "✅ Demo finished".green().bold());
    Ok(())
}
