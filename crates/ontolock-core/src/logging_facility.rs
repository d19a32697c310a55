//! Structured logging for ontolock.
//!
//! Binaries call [`init`] once with a [`Profile`]; library code only emits
//! events through the `log_op_*` macros. Tests swap the subscriber for the
//! in-memory [`test_capture`] layer.
//!
//! ```rust
//! use ontolock_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
