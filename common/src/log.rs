//! Status-line logging.
//!
//! Library code reports through plain `tracing` events. The CLI formatter
//! recognises two extra targets: raw output lines, which are printed without
//! a status symbol, and success lines, which get a symbol of their own.

/// Target for raw, already formatted output lines.
pub const PRINT_TARGET: &str = "mcastmap::print";
/// Target for positive status lines.
pub const SUCCESS_TARGET: &str = "mcastmap::success";

/// Logs an `INFO` event that the CLI renders as a success line.
#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::__tracing::info!(target: "mcastmap::success", $($arg)*)
    };
}
