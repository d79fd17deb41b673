//! Command-line flags

use super::{Settings, StorageBackend};
use clap::Parser;
use std::path::PathBuf;

/// Location-aware product lookup service
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "geoproduct", version)]
pub struct Cli {
    /// Path to a settings.yml file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Bind address, e.g. 0.0.0.0
    #[arg(long)]
    pub host: Option<String>,

    /// Server port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Path to the SQLite database file
    #[arg(long, conflicts_with = "db_in_memory")]
    pub db_path: Option<PathBuf>,

    /// Use an in-memory SQLite database
    #[arg(long)]
    pub db_in_memory: bool,

    /// Create the products table before serving
    #[arg(long)]
    pub migrate: bool,

    /// Set the log level to debug
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Override loaded settings with any flags that were given
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(ref host) = self.host {
            settings.server.bind_address = host.clone();
        }
        if let Some(port) = self.port {
            settings.server.port = port;
        }
        if let Some(ref path) = self.db_path {
            settings.storage.backend = StorageBackend::Sqlite;
            settings.storage.path = Some(path.clone());
        }
        if self.db_in_memory {
            settings.storage.backend = StorageBackend::Sqlite;
            settings.storage.path = None;
        }
        if self.migrate {
            settings.storage.migrate = true;
        }
        if self.debug {
            settings.general.debug = true;
        }
    }
}
