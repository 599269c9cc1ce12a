//! Logger initialization for the bundler host.
//!
//! The destination is picked by the `BUNDLER_LOG` environment variable:
//! `terminal` (default), `file` (`./service.log`), or `both`.

use std::fs::File;
use std::path::PathBuf;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

const LOG_FILE: &str = "./service.log";

/// Initialize the global logger once at startup.
pub fn initialize() {
    let level = LevelFilter::Info;
    let config = build_config();
    let destination = std::env::var("BUNDLER_LOG").unwrap_or_default();

    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    if destination != "file" {
        loggers.push(TermLogger::new(
            level,
            config.clone(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ));
    }
    if destination == "file" || destination == "both" {
        if let Some(file_logger) = create_file_logger(level, config) {
            loggers.push(file_logger);
        }
    }

    let _ = CombinedLogger::init(loggers);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn create_file_logger(level: LevelFilter, config: Config) -> Option<Box<WriteLogger<File>>> {
    let log_path = PathBuf::from(LOG_FILE);
    match File::create(&log_path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: Could not create log file at {log_path:?}: {err}");
            None
        }
    }
}
