use crate::config::LoggingConfig;
use anyhow::Result;

/// Install the global logger: stderr always, plus the configured file if any.
/// `SCHEDCTL_LOG` overrides the file path; `verbose` forces debug level.
pub fn setup_logging(config: &LoggingConfig, verbose: bool) -> Result<()> {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        parse_level(&config.level)
    };

    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}][{}] {}",
                chrono::Local::now().format("%Y-%m-%d][%H:%M:%S"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(level)
        // Connection pool chatter drowns out request lines at debug
        .level_for("hyper", log::LevelFilter::Warn)
        .level_for("reqwest", log::LevelFilter::Warn)
        .chain(std::io::stderr());

    let log_file = std::env::var(common::LOG_FILE_ENV)
        .ok()
        .map(std::path::PathBuf::from)
        .or_else(|| config.output.clone());
    if let Some(path) = log_file {
        dispatch = dispatch.chain(fern::log_file(path)?);
    }

    dispatch.apply()?;
    Ok(())
}

fn parse_level(level: &str) -> log::LevelFilter {
    level.parse().unwrap_or(log::LevelFilter::Info)
}
