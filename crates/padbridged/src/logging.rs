// Colorized wrappers for logging

use fern::Dispatch;

#[inline(always)]
pub fn format_log(message: &std::fmt::Arguments<'_>) -> String {
    let now = chrono::Local::now().format("%Y.%m.%d %H:%M:%S").to_string();
    format!("[{now}] {message}")
}

#[macro_export]
macro_rules! print_error {
    ($($arg:tt)*) => {{
        use ::colored::Colorize as _;
        log::error!("{}", format!($($arg)*).bright_red());
    }}
}

#[macro_export]
macro_rules! print_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }}
}

#[macro_export]
macro_rules! print_debug {
    ($($arg:tt)*) => {{
        use ::colored::Colorize as _;
        log::debug!("{}", format!($($arg)*).dimmed());
    }}
}

#[macro_export]
macro_rules! print_warning {
    ($($arg:tt)*) => {{
        use ::colored::Colorize as _;
        log::warn!("{}", format!($($arg)*).bright_yellow());
    }}
}

/// Setup the logger. Records from the padbridge crates pass at `Info`, or
/// `Debug` when verbose; everything else only at `Error`.
pub fn setup(verbose: bool, no_color: bool) -> Result<(), log::SetLoggerError> {
    let log_level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    if no_color {
        colored::control::set_override(false);
    }
    Dispatch::new()
        .format(|out, message, _record| out.finish(format_args!("{}", format_log(message))))
        .level(log::LevelFilter::Error) // Hide enigo and notify logs
        .level_for("padbridged", log_level)
        .level_for("padbridge_gamepad", log_level)
        .level_for("padbridge_config", log_level)
        .level_for("padbridge_control", log_level)
        .chain(std::io::stdout())
        .apply()
}
