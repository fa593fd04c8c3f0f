use anyhow::{Context, Result, anyhow};
use clap::Parser;
use classic_snake::config::AppConfig;
use classic_snake::feedback::{Feedback, Silent, TerminalBell};
use classic_snake::game::SnakeEngine;
use classic_snake::leaderboard::{LeaderboardHandle, LocalLeaderboard};
use classic_snake::logging;
use classic_snake::modes::HumanMode;
use classic_snake::session::Session;
use classic_snake::storage::JsonScoreStore;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "classic_snake")]
#[command(version, about = "Classic wraparound Snake in the terminal")]
struct Cli {
    /// Settings file (TOML); defaults to the platform config directory
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width
    #[arg(long)]
    width: Option<usize>,

    /// Grid height
    #[arg(long)]
    height: Option<usize>,

    /// Milliseconds between snake moves
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Name recorded on the leaderboard
    #[arg(long)]
    player: Option<String>,

    /// Do not ring the bell when food is eaten
    #[arg(long)]
    no_sound: bool,

    /// Do not submit scores to the leaderboard
    #[arg(long)]
    no_leaderboard: bool,

    /// Directory for scores, leaderboard and log
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log file; defaults to classic_snake.log in the data directory
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> Result<(AppConfig, Option<PathBuf>)> {
        let mut config = match self.config.or_else(AppConfig::default_config_path) {
            Some(path) => AppConfig::load(&path)?,
            None => AppConfig::default(),
        };

        if let Some(width) = self.width {
            config.game.grid_width = width;
        }
        if let Some(height) = self.height {
            config.game.grid_height = height;
        }
        if let Some(tick_ms) = self.tick_ms {
            config.game.tick_interval_ms = tick_ms;
        }
        if self.seed.is_some() {
            config.game.seed = self.seed;
        }
        if let Some(player) = self.player {
            config.player = player;
        }
        if self.data_dir.is_some() {
            config.data_dir = self.data_dir;
        }
        config.sound &= !self.no_sound;
        config.leaderboard &= !self.no_leaderboard;

        config.validate().map_err(|msg| anyhow!(msg)).context("Invalid configuration")?;
        Ok((config, self.log_file))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let (config, log_file) = Cli::parse().into_config()?;
    let data_dir = config.data_dir()?;

    logging::init(&log_file.unwrap_or_else(|| data_dir.join("classic_snake.log")))?;
    info!(data_dir = %data_dir.display(), player = %config.player, "starting");

    let leaderboard = config.leaderboard.then(|| {
        LeaderboardHandle::spawn(LocalLeaderboard::new(
            data_dir.join("leaderboard.json"),
            config.player.clone(),
        ))
    });
    let (handle, worker) = match leaderboard {
        Some((handle, worker)) => (Some(handle), Some(worker)),
        None => (None, None),
    };

    let feedback: Box<dyn Feedback> = if config.sound {
        Box::new(TerminalBell::new())
    } else {
        Box::new(Silent)
    };

    let session = Session::new(
        SnakeEngine::new(&config.game),
        Box::new(JsonScoreStore::new(data_dir.join("scores.json"))),
        feedback,
        handle,
    )
    .with_player(config.player.clone());

    let mut human_mode = HumanMode::new(session, config.game.tick_interval());
    let result = human_mode.run().await;

    // Closing the session closes the submission queue; let pending scores land
    drop(human_mode);
    if let Some(worker) = worker {
        if let Err(err) = worker.await {
            warn!(error = %err, "leaderboard worker panicked");
        }
    }

    result
}
