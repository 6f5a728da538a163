/// Process configuration for the cardbox server.
/// Resolved once at startup from command-line flags and environment variables.

use clap::Parser;
use std::path::PathBuf;

/// Name of the card collection file inside the data directory.
pub const DATA_FILE_NAME: &str = "cards.json";

#[derive(Debug, Clone, Parser)]
#[command(name = "cardbox", version, about = "Card collection service with static pages")]
pub struct Cli {
    /// Project root holding the static pages (defaults to the working directory)
    #[arg(long, env = "CARDBOX_ROOT")]
    pub root: Option<PathBuf>,

    /// Directory holding cards.json (defaults to <root>/data)
    #[arg(long, env = "CARDBOX_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// TCP port to listen on
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Address to bind the HTTP listener to
    #[arg(long = "bind", env = "CARDBOX_BIND", default_value = "0.0.0.0")]
    pub bind_address: String,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub root_dir: PathBuf,
    pub dist_dir: PathBuf,
    pub data_dir: PathBuf,
    pub port: u16,
    pub bind_address: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot determine project root: {0}")]
    NoRootDir(#[source] std::io::Error),
}

impl ServerConfig {
    /// Resolve directories from the CLI, falling back to the working
    /// directory and then to the executable's directory for the root.
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        let root_dir = match cli.root {
            Some(root) => root,
            None => default_root()?,
        };
        let data_dir = cli.data_dir.unwrap_or_else(|| root_dir.join("data"));
        Ok(Self::new(root_dir, data_dir, cli.port, cli.bind_address))
    }

    pub fn new(root_dir: PathBuf, data_dir: PathBuf, port: u16, bind_address: String) -> Self {
        Self {
            dist_dir: root_dir.join("dist"),
            root_dir,
            data_dir,
            port,
            bind_address,
        }
    }

    pub fn data_file(&self) -> PathBuf {
        self.data_dir.join(DATA_FILE_NAME)
    }
}

fn default_root() -> Result<PathBuf, ConfigError> {
    match std::env::current_dir() {
        Ok(cwd) => Ok(cwd),
        Err(cwd_err) => {
            log::warn!("Working directory unavailable ({}), using executable directory", cwd_err);
            let exe = std::env::current_exe().map_err(ConfigError::NoRootDir)?;
            Ok(exe
                .parent()
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")))
        }
    }
}
