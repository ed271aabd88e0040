use ns_app::AppResult;
use std::fs::File;
use std::path::Path;
use tracing_subscriber::{
    filter::LevelFilter,
    fmt::{self},
    prelude::*,
};

/// Logging flags shared by every subcommand.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogOptions<'a> {
    /// `-v` count
    pub verbosity: u8,
    /// `-q`, silences the terminal only
    pub quiet: bool,
    /// `--log-file`
    pub log_file: Option<&'a Path>,
}

impl LogOptions<'_> {
    /// Terminal level: warnings by default, one step more per `-v`.
    pub fn stderr_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::OFF;
        }
        match self.verbosity {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }

    /// The log file keeps per-star and per-iteration records (`debug!`)
    /// whatever the terminal shows, and follows `-vvv` down to trace.
    pub fn file_level(&self) -> LevelFilter {
        let requested = LogOptions {
            quiet: false,
            ..*self
        }
        .stderr_level();
        requested.max(LevelFilter::DEBUG)
    }
}

/// Install the global subscriber: compact stderr output, plus a plain-text
/// file layer with its own level when a log file is given.
pub fn setup_logging(options: &LogOptions<'_>) -> AppResult<()> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false)
        .compact()
        .with_filter(options.stderr_level());

    let subscriber = tracing_subscriber::registry().with(stderr_layer);

    if let Some(path) = options.log_file {
        let file = File::create(path)?;
        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_thread_ids(true)
            .with_target(true)
            .with_filter(options.file_level());
        subscriber.with(file_layer).init();
    } else {
        subscriber.init();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::{debug, info, trace};

    fn options(verbosity: u8, quiet: bool) -> LogOptions<'static> {
        LogOptions {
            verbosity,
            quiet,
            log_file: None,
        }
    }

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(options(0, false).stderr_level(), LevelFilter::WARN);
        assert_eq!(options(1, false).stderr_level(), LevelFilter::INFO);
        assert_eq!(options(2, false).stderr_level(), LevelFilter::DEBUG);
        assert_eq!(options(7, false).stderr_level(), LevelFilter::TRACE);
        assert_eq!(options(3, true).stderr_level(), LevelFilter::OFF);
    }

    #[test]
    fn log_file_is_at_least_debug() {
        assert_eq!(options(0, false).file_level(), LevelFilter::DEBUG);
        assert_eq!(options(0, true).file_level(), LevelFilter::DEBUG);
        assert_eq!(options(3, true).file_level(), LevelFilter::TRACE);
    }

    #[test]
    fn quiet_run_still_fills_the_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("ns.log");
        let opts = options(0, true);

        let file = File::create(&log_path).unwrap();
        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_thread_ids(true)
            .with_filter(opts.file_level());
        let subscriber = tracing_subscriber::registry().with(file_layer);

        tracing::subscriber::with_default(subscriber, || {
            info!(candidates = 3, "Batch started");
            debug!(pc = 57.2, "Star integrated");
            trace!("Step accepted");
        });

        let content = std::fs::read_to_string(log_path).unwrap();
        assert!(content.contains("Batch started"));
        assert!(content.contains("Star integrated"));
        assert!(content.contains("ThreadId"));
        assert!(!content.contains("Step accepted"));
    }

    #[test]
    fn unwritable_log_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        // a directory cannot be opened as the log file
        let opts = LogOptions {
            log_file: Some(dir.path()),
            ..LogOptions::default()
        };
        assert!(setup_logging(&opts).is_err());
    }
}
