//! Server configuration from command-line flags and environment variables.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Storage backend selectable at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    /// Records live in process memory and vanish on restart.
    Memory,
    /// Records persist in MongoDB (requires the `mongodb` feature).
    Mongodb,
}

/// Catalog API server configuration.
#[derive(Parser, Debug, Clone)]
#[command(name = "catalog-api", version, about = "REST API over schema-validated record collections")]
pub struct Config {
    /// Host to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to bind to
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Storage backend
    #[arg(long, env = "CATALOG_BACKEND", value_enum, default_value_t = BackendKind::Memory)]
    pub backend: BackendKind,

    /// MongoDB connection string, required with `--backend mongodb`
    #[arg(long, env = "MONGODB_URI")]
    pub mongodb_uri: Option<String>,

    /// MongoDB database holding the collections
    #[arg(long, env = "MONGODB_DATABASE", default_value = "catalog")]
    pub mongodb_database: String,

    /// JSON fixture file seeded into the collections at startup
    #[arg(long, env = "CATALOG_FIXTURES")]
    pub fixtures: Option<PathBuf>,

    /// Allowed CORS origins; permissive when empty
    #[arg(long = "cors-origin", env = "CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Vec<String>,
}

impl Config {
    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            backend: BackendKind::Memory,
            mongodb_uri: None,
            mongodb_database: "catalog".to_string(),
            fixtures: None,
            cors_origins: Vec::new(),
        }
    }
}
