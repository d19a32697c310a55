//! Operation logging macros
//!
//! An operation logs `start`, then exactly one of `end` or `end_error`. Extra
//! `tracing` fields (`hash = %h`, `function = name`, ...) may follow the
//! required arguments.

/// Log the start of an operation
///
/// ```
/// # use ontolock_core::log_op_start;
/// log_op_start!("extract_snapshot");
/// log_op_start!("extract_snapshot", function_count = 3);
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = ontolock_core_types::schema::EVENT_START,
            $($($field)*)?
        )
    };
}

/// Log the successful end of an operation
///
/// ```
/// # use ontolock_core::log_op_end;
/// log_op_end!("lock_write", duration_ms = 4);
/// log_op_end!("lock_write", duration_ms = 4, hash = "0123456789abcdef");
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = ontolock_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($($field)*)?
        )
    };
}

/// Log the failed end of an operation
///
/// `$err` is anything convertible into `ExError`. The stable code and the
/// kind are always recorded; the error's own function/path context is
/// recorded when present.
///
/// ```
/// # use ontolock_core::log_op_error;
/// # use ontolock_core::errors::{ExError, ExErrorKind};
/// let err = ExError::new(ExErrorKind::LockParse).with_message("bad version");
/// log_op_error!("lock_read", err, duration_ms = 1);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = ontolock_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            err_function = ex_err.function(),
            err_path = ex_err.path(),
            $($($field)*)?
        )
    }};
}
