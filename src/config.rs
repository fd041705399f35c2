//! Layered application configuration.
//!
//! Priority: CLI flag > CLI env var > `DOCCHAT_*` env > config file > defaults.
//! The config file is `--config`/`CONFIG_FILE`, or `./config.yaml` when present.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::backend::BackendSettings;
use crate::chat::{ChatSettings, DEFAULT_ERROR_PREFIX, DEFAULT_GREETING};

/// Config file picked up from the working directory when none is given.
const CWD_CONFIG_FILE: &str = "config.yaml";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Address to bind
    #[arg(long, env = "HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Base URL of the query backend
    #[arg(long, env = "BACKEND_URL")]
    pub backend_url: Option<String>,

    /// Emit JSON logs
    #[arg(long, env = "LOG_JSON")]
    pub log_json: Option<bool>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub chat: ChatSettings,
    pub sessions: SessionConfig,
    pub sidebar: SidebarConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Request body limit for uploads, in MiB.
    pub max_upload_mb: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    /// Unset means backend calls may take arbitrarily long.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    pub idle_timeout_secs: u64,
    pub sweep_interval_secs: u64,
    pub keep_alive_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SidebarConfig {
    /// When false the upload controls render without any handler.
    pub ingestion_enabled: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UiConfig {
    pub title: String,
    pub assets_dir: String,
    pub htmx_src: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub json: bool,
}

impl ServerConfig {
    /// `host:port` for the listener.
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Upload limit in bytes.
    #[must_use]
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

impl BackendConfig {
    #[must_use]
    pub fn settings(&self) -> BackendSettings {
        BackendSettings {
            base_url: self.base_url.clone(),
            timeout: self.timeout_secs.map(Duration::from_secs),
        }
    }
}

impl SessionConfig {
    #[must_use]
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    #[must_use]
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }

    #[must_use]
    pub fn keep_alive(&self) -> Duration {
        Duration::from_secs(self.keep_alive_secs.max(1))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
                max_upload_mb: 50,
            },
            backend: BackendConfig {
                base_url: "http://localhost:8000".to_string(),
                timeout_secs: None,
            },
            chat: ChatSettings::default(),
            sessions: SessionConfig {
                idle_timeout_secs: 30 * 60,
                sweep_interval_secs: 60,
                keep_alive_secs: 15,
            },
            sidebar: SidebarConfig {
                ingestion_enabled: true,
            },
            ui: UiConfig {
                title: "Dokumenten-Chat".to_string(),
                assets_dir: "static".to_string(),
                htmx_src: "/static/vendor/htmx-2.0.8.min.js".to_string(),
            },
            logging: LoggingConfig { json: false },
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        let defaults = Self::default();
        let mut builder = Config::builder()
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", defaults.server.port)?
            .set_default("server.max_upload_mb", defaults.server.max_upload_mb as u64)?
            .set_default("backend.base_url", defaults.backend.base_url)?
            .set_default("chat.greeting", DEFAULT_GREETING)?
            .set_default("chat.failure_policy", "surface")?
            .set_default("chat.reply_ordering", "submission")?
            .set_default("chat.error_prefix", DEFAULT_ERROR_PREFIX)?
            .set_default("sessions.idle_timeout_secs", defaults.sessions.idle_timeout_secs)?
            .set_default(
                "sessions.sweep_interval_secs",
                defaults.sessions.sweep_interval_secs,
            )?
            .set_default("sessions.keep_alive_secs", defaults.sessions.keep_alive_secs)?
            .set_default("sidebar.ingestion_enabled", defaults.sidebar.ingestion_enabled)?
            .set_default("ui.title", defaults.ui.title)?
            .set_default("ui.assets_dir", defaults.ui.assets_dir)?
            .set_default("ui.htmx_src", defaults.ui.htmx_src)?
            .set_default("logging.json", defaults.logging.json)?;

        match &cli.config {
            Some(path) => {
                builder = builder.add_source(File::from(PathBuf::from(path)).required(true));
            }
            None if Path::new(CWD_CONFIG_FILE).exists() => {
                builder = builder.add_source(File::from(Path::new(CWD_CONFIG_FILE)));
            }
            None => {}
        }

        // E.g. DOCCHAT_SERVER__PORT=8080, DOCCHAT_CHAT__FAILURE_POLICY=silent
        builder = builder.add_source(
            Environment::with_prefix("DOCCHAT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        if let Some(host) = cli.host {
            builder = builder.set_override("server.host", host)?;
        }
        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", port)?;
        }
        if let Some(url) = cli.backend_url {
            builder = builder.set_override("backend.base_url", url)?;
        }
        if let Some(json) = cli.log_json {
            builder = builder.set_override("logging.json", json)?;
        }

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{FailurePolicy, ReplyOrdering};

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.backend.base_url, "http://localhost:8000");
        assert!(cfg.backend.timeout_secs.is_none());
        assert_eq!(cfg.chat.failure_policy, FailurePolicy::Surface);
        assert_eq!(cfg.chat.reply_ordering, ReplyOrdering::Submission);
        assert_eq!(cfg.server.addr(), "127.0.0.1:3000");
        assert_eq!(cfg.server.max_upload_bytes(), 50 * 1024 * 1024);
    }

    #[test]
    fn test_backend_settings_timeout() {
        let mut cfg = AppConfig::default().backend;
        assert_eq!(cfg.settings().timeout, None);
        cfg.timeout_secs = Some(20);
        assert_eq!(cfg.settings().timeout, Some(Duration::from_secs(20)));
    }
}
