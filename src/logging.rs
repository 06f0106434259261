//! Diagnostics go to stderr; stdout carries the emitted schema.
use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    Compact,
    Full,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    pub source_location: bool,
}

impl LoggingConfig {
    pub fn from_verbosity(verbosity: u8, format: LogFormat) -> Self {
        let (level, source_location) = match verbosity {
            0 => ("warn", false),
            1 => ("info", false),
            2 => ("debug", true),
            _ => ("trace", true),
        };
        LoggingConfig { level: level.to_string(), format, source_location }
    }

    /// `RUST_LOG` wins over the verbosity flags.
    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level))
    }

    pub fn init(&self) -> Result<()> {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(self.env_filter())
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_file(self.source_location)
            .with_line_number(self.source_location);
        let installed = match self.format {
            LogFormat::Compact => tracing::subscriber::set_global_default(builder.compact().finish()),
            LogFormat::Full => tracing::subscriber::set_global_default(builder.finish()),
        };
        installed.map_err(|e| anyhow!("failed to initialize logging: {e}"))?;
        tracing::debug!(config = ?self, "logging initialized");
        Ok(())
    }
}
