// `log` records forwarded over a channel to whoever draws them

use crossbeam_channel::Sender;
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

pub const LOG_LEVEL_VAR: &str = "BACKENDCFG_LOG";

pub struct ChannelLogger {
    tx: Sender<String>,
    level: LevelFilter,
}

impl ChannelLogger {
    pub fn new(tx: Sender<String>, level: LevelFilter) -> Self {
        Self { tx, level }
    }

    pub fn format(record: &Record) -> String {
        format!("[{}] {}", record.level(), record.args())
    }
}

impl Log for ChannelLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            // receiver gone means the UI is shutting down
            let _ = self.tx.send(Self::format(record));
        }
    }

    fn flush(&self) {}
}

/// `debug` and `trace` raise the level, anything else means `Info`.
pub fn level_from_env(value: Option<&str>) -> LevelFilter {
    match value.map(|v| v.trim().to_lowercase()).as_deref() {
        Some("trace") => LevelFilter::Trace,
        Some("debug") => LevelFilter::Debug,
        _ => LevelFilter::Info,
    }
}

/// Installs the global logger. Fails if one is already set.
pub fn init(tx: Sender<String>) -> Result<(), SetLoggerError> {
    let level = level_from_env(std::env::var(LOG_LEVEL_VAR).ok().as_deref());
    log::set_boxed_logger(Box::new(ChannelLogger::new(tx, level)))?;
    log::set_max_level(level);
    Ok(())
}
