/// Logs an event that the terminal renders as a success line.
///
/// Equivalent to `tracing::info!` under the [`SUCCESS_TARGET`] target.
#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::tracing::info!(target: $crate::log::SUCCESS_TARGET, $($arg)*)
    };
}

pub const SUCCESS_TARGET: &str = "eddyweb::success";
