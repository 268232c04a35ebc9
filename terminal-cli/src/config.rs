use anyhow::Result;
use clap::Parser;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::route::Route;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// CLI flags (user-provided override persisted config)
#[derive(Parser, Debug)]
#[command(name = "pcoin-terminal", about = "P COIN casino in the terminal")]
pub struct Args {
    /// API server base URL (http://localhost:5000)
    #[arg(long)]
    pub api_url: Option<String>,

    /// Page to open first, e.g. /leaderboard or /games/cups
    #[arg(long, default_value = "/")]
    pub route: String,

    /// Disable interaction sounds (remembered for later runs)
    #[arg(long, conflicts_with = "sound")]
    pub no_sound: bool,

    /// Re-enable interaction sounds after --no-sound
    #[arg(long)]
    pub sound: bool,

    /// Show the activity log pane
    #[arg(long)]
    pub verbose: bool,
}

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedConfig {
    pub api_url: Option<String>,
    pub sound: Option<bool>,
    pub verbose: Option<bool>,
}

/// Settings after merging flags over the persisted config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub sound: bool,
    pub verbose: bool,
    pub start_route: Route,
}

impl Settings {
    pub fn resolve(args: &Args, cfg: &PersistedConfig) -> Self {
        let api_url = args
            .api_url
            .clone()
            .or_else(|| cfg.api_url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let sound = match (args.sound, args.no_sound) {
            (true, _) => true,
            (_, true) => false,
            _ => cfg.sound.unwrap_or(true),
        };
        let verbose = args.verbose || cfg.verbose.unwrap_or(false);
        Self {
            api_url,
            sound,
            verbose,
            start_route: Route::parse(&args.route),
        }
    }

    /// Config to write back so the next launch starts from these values.
    pub fn persisted(&self) -> PersistedConfig {
        PersistedConfig {
            api_url: Some(self.api_url.clone()),
            sound: Some(self.sound),
            verbose: Some(self.verbose),
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "pcoin", "terminal")
}

pub fn config_path() -> Option<PathBuf> {
    project_dirs().map(|d| d.config_dir().join("config.json"))
}

pub fn log_path() -> Option<PathBuf> {
    project_dirs().map(|d| d.data_dir().join("terminal.log"))
}

pub fn load_config() -> Option<PersistedConfig> {
    let path = config_path()?;
    let data = std::fs::read(path).ok()?;
    serde_json::from_slice(&data).ok()
}

pub fn save_config(cfg: &PersistedConfig) -> Result<()> {
    if let Some(path) = config_path() {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        std::fs::write(path, data)?;
    }
    Ok(())
}
