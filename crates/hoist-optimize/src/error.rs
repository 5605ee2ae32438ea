use hoist_core::error::Error;

/// Create an internal error for invariants the pass itself broke
pub fn internal_error(message: impl Into<String>) -> Error {
    Error::Internal(message.into())
}

/// Macro to return early with an internal error
#[macro_export]
macro_rules! hoist_bail {
    ($($arg:tt)*) => {
        return Err($crate::error::internal_error(format!($($arg)*)))
    };
}

/// Macro to ensure a condition is true, or return an internal error
#[macro_export]
macro_rules! hoist_ensure {
    ($cond:expr, $($arg:tt)*) => {
        if !($cond) {
            $crate::hoist_bail!($($arg)*);
        }
    };
}
