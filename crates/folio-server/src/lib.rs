//! Wiring for the Folio HTTP server.
//!
//! Loads [`ServerConfig`], opens the filesystem store and assembles the
//! router. The binary in `main.rs` only adds tracing and the listener.

use std::{path::{Path, PathBuf}, sync::Arc};

use anyhow::Context as _;
use axum::Router;
use folio_api::{DEFAULT_BODY_LIMIT, Persister, api_router};
use folio_core::layout::Layout;
use folio_pdf::GenerateMode;
use folio_store_fs::FsStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration.
///
/// Layered: built-in defaults, then the TOML file, then `FOLIO_*`
/// environment variables, then command-line overrides. A plain `PORT`
/// variable replaces the built-in port default only.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:             String,
  pub port:             u16,
  /// Root under which `output/` is created.
  pub base_dir:         PathBuf,
  pub mode:             GenerateMode,
  pub layout:           Layout,
  pub body_limit_bytes: usize,
}

/// Values supplied on the command line; `None` leaves lower layers alone.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
  pub port:     Option<u16>,
  pub base_dir: Option<PathBuf>,
}

const DEFAULT_PORT: u16 = 3000;

/// Port default: `PORT` when it parses, otherwise [`DEFAULT_PORT`].
fn default_port(port_env: Option<&str>) -> u16 {
  port_env
    .and_then(|raw| raw.trim().parse().ok())
    .unwrap_or(DEFAULT_PORT)
}

impl ServerConfig {
  pub fn load(path: &Path, overrides: Overrides) -> Result<Self, config::ConfigError> {
    Self::layered(path, overrides, std::env::var("PORT").ok().as_deref())
  }

  fn layered(
    path: &Path,
    overrides: Overrides,
    port_env: Option<&str>,
  ) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .set_default("host", "0.0.0.0")?
      .set_default("port", i64::from(default_port(port_env)))?
      .set_default("base_dir", ".")?
      .set_default("mode", GenerateMode::default().to_string())?
      .set_default("layout", Layout::default().to_string())?
      .set_default("body_limit_bytes", DEFAULT_BODY_LIMIT as i64)?
      .add_source(config::File::from(path.to_path_buf()).required(false))
      .add_source(config::Environment::with_prefix("FOLIO"))
      .set_override_option("port", overrides.port.map(i64::from))?
      .set_override_option(
        "base_dir",
        overrides.base_dir.map(|p| p.to_string_lossy().into_owned()),
      )?
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Application ─────────────────────────────────────────────────────────────

/// Open the store described by `cfg` and build the full router.
pub async fn build_app(cfg: &ServerConfig) -> anyhow::Result<Router> {
  let store = FsStore::open(&cfg.base_dir, cfg.layout)
    .await
    .with_context(|| format!("failed to open base directory {:?}", cfg.base_dir))?;

  tracing::info!(
    base_dir = %store.base_dir().display(),
    layout = %cfg.layout,
    mode = %cfg.mode,
    body_limit_bytes = cfg.body_limit_bytes,
    "document store ready"
  );

  let persister = Arc::new(Persister::new(Arc::new(store), cfg.mode));
  Ok(api_router(persister, cfg.body_limit_bytes).layer(TraceLayer::new_for_http()))
}
