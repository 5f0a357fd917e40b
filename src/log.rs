// RustPixel
// copyright zipxing@hotmail.com 2022～2025

//! Log module, console output plus an optional log file, reference
//! https://docs.rs/log4rs

use log::LevelFilter;
use log4rs::{
    append::{console::ConsoleAppender, file::FileAppender},
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
};

const CONSOLE_PATTERN: &str = "{h({l:<5})} {m}{n}";
const FILE_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {l} {t} {m}{n}";

/// Init logs system. Fails when the log file cannot be created or a
/// logger is already installed.
pub fn init_log(level: LevelFilter, file_path: Option<&str>) -> Result<(), String> {
    let console = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(CONSOLE_PATTERN)))
        .build();

    let mut config = Config::builder().appender(
        Appender::builder()
            .filter(Box::new(ThresholdFilter::new(level)))
            .build("console", Box::new(console)),
    );
    let mut root = Root::builder().appender("console");

    if let Some(path) = file_path {
        let logfile = FileAppender::builder()
            .encoder(Box::new(PatternEncoder::new(FILE_PATTERN)))
            .build(path)
            .map_err(|e| format!("cannot open log file {}: {}", path, e))?;
        config = config.appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(level)))
                .build("logfile", Box::new(logfile)),
        );
        root = root.appender("logfile");
    }

    let config = config
        .build(root.build(level))
        .map_err(|e| format!("invalid log config: {}", e))?;
    log4rs::init_config(config).map_err(|e| e.to_string())?;
    Ok(())
}

/// Parse a level name such as "info" or "DEBUG"
pub fn parse_level(name: &str) -> Option<LevelFilter> {
    name.parse().ok()
}
