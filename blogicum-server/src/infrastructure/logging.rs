use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    pub(crate) fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "compact" | "text" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(anyhow!("unknown LOG_FORMAT `{other}`, expecting compact or json")),
        }
    }
}

pub(crate) fn init_logging(default_level: &str, format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    let installed = match format {
        LogFormat::Compact => registry.with(fmt::layer().with_target(true).compact()).try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(true))
            .try_init(),
    };
    installed.map_err(|e| anyhow!("failed to init logging: {e}"))
}

#[cfg(test)]
mod tests {
    use super::LogFormat;

    #[test]
    fn log_format_accepts_known_names() {
        assert_eq!(LogFormat::parse("JSON").expect("must parse"), LogFormat::Json);
        assert_eq!(LogFormat::parse(" compact ").expect("must parse"), LogFormat::Compact);
        assert_eq!(LogFormat::parse("").expect("must parse"), LogFormat::Compact);
        assert!(LogFormat::parse("xml").is_err());
    }
}
