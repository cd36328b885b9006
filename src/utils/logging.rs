use crate::cli::args::Cli;
use anyhow::{Context, Result};
use tracing::Level;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// The HTTP stack logs every connection at debug; keep it at warn unless
/// `RUST_LOG` names it.
const QUIET_TARGETS: &[&str] = &["hyper", "hyper_util", "h2", "reqwest", "rustls"];

pub fn level_from_cli(cli: &Cli) -> Level {
    match (cli.debug, cli.verbose) {
        (true, _) => Level::DEBUG,
        (false, true) => Level::INFO,
        (false, false) => Level::WARN,
    }
}

/// `RUST_LOG` directives first; the CLI level fills in whatever they leave out.
fn build_filter(level: Level, env: Option<&str>) -> Result<EnvFilter> {
    let env = env.unwrap_or_default();
    let mentions = |target: &str| env.split(',').any(|d| d.trim().starts_with(target));

    let mut filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .parse(env)
        .with_context(|| format!("Invalid RUST_LOG value: {env:?}"))?;

    let own = env!("CARGO_CRATE_NAME");
    if !mentions(own) {
        filter = filter.add_directive(format!("{own}={level}").parse()?);
    }
    for target in QUIET_TARGETS.iter().filter(|t| !mentions(t)) {
        filter = filter.add_directive(format!("{target}=warn").parse()?);
    }
    Ok(filter)
}

/// Diagnostics go to stderr so stdout carries only match lines.
pub fn init(level: Level) -> Result<()> {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(level, env.as_deref())?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_level_precedence() {
        let cli = |args: &[&str]| {
            let mut full = vec!["badprint", "-f", "fp.json"];
            full.extend_from_slice(args);
            Cli::try_parse_from(full).unwrap()
        };
        assert_eq!(level_from_cli(&cli(&[])), Level::WARN);
        assert_eq!(level_from_cli(&cli(&["-v"])), Level::INFO);
        assert_eq!(level_from_cli(&cli(&["-v", "--debug"])), Level::DEBUG);
    }

    #[test]
    fn test_cli_level_caps_filter() {
        let filter = build_filter(Level::WARN, None).unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn test_rust_log_directive_kept() {
        let filter = build_filter(Level::WARN, Some("badprint=trace")).unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::TRACE));
    }

    #[test]
    fn test_invalid_rust_log_rejected() {
        assert!(build_filter(Level::INFO, Some("badprint=loud")).is_err());
    }
}
