use chrono::Local;
use colored::*;
use env_logger::{Builder, Env};
use log::Level;
use std::io::Write;

/// Installs the global logger. `RUST_LOG` still wins over the default filter;
/// `verbose` lowers the default from `info` to `debug`.
pub fn init_logger(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };

    // A second init (tests, repeated calls) is not an error
    let _ = Builder::from_env(Env::default().default_filter_or(default_filter))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] [{}] {}",
                timestamp(),
                colored_level(record.level()),
                record.args()
            )
        })
        .try_init();
}

pub fn timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

fn colored_level(level: Level) -> ColoredString {
    let text = level.to_string();
    match level {
        Level::Error => text.red(),
        Level::Warn => text.yellow(),
        Level::Info => text.green(),
        Level::Debug => text.blue(),
        Level::Trace => text.white(),
    }
}
