use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser};
use game::ImageSelection;

#[derive(Debug, Clone, Parser)]
#[command(name = "promptcraft", about = "Prompt writing game server")]
pub struct Cli {
    /// Address the HTTP server listens on
    #[arg(long, env = "PROMPTCRAFT_BIND", default_value = "0.0.0.0:3000")]
    pub bind: SocketAddr,

    #[command(flatten)]
    pub database: DatabaseConfig,

    #[command(flatten)]
    pub game: GameConfig,

    /// Directory served under `/images`
    #[arg(long, env = "PROMPTCRAFT_ASSETS_DIR", default_value = "public/images")]
    pub assets_dir: PathBuf,

    /// Load the demo catalog and demo user on start
    #[arg(long, env = "PROMPTCRAFT_SEED")]
    pub seed: bool,
}

#[derive(Debug, Clone, Args)]
pub struct DatabaseConfig {
    /// Postgres URL; without one everything is kept in memory
    #[arg(long = "database-url", env = "DATABASE_URL")]
    pub url: Option<String>,

    #[arg(
        long = "db-max-connections",
        env = "PROMPTCRAFT_DB_MAX_CONNECTIONS",
        default_value_t = 10
    )]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Args)]
pub struct GameConfig {
    /// Rounds in a playthrough
    #[arg(
        long,
        env = "PROMPTCRAFT_ROUNDS",
        default_value_t = 5,
        value_parser = clap::value_parser!(u8).range(1..=20)
    )]
    pub rounds: u8,

    /// `random` or `ordered`
    #[arg(long = "image-selection", env = "PROMPTCRAFT_IMAGE_SELECTION", default_value = "random")]
    pub selection: ImageSelection,

    /// Upper bound on `limit` for leaderboard requests
    #[arg(long, env = "PROMPTCRAFT_LEADERBOARD_MAX", default_value_t = 100)]
    pub leaderboard_max_limit: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rounds: game::ROUNDS_PER_GAME as u8,
            selection: ImageSelection::default(),
            leaderboard_max_limit: 100,
        }
    }
}
