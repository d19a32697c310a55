//! Field keys and event names every ontolock log line carries.
//!
//! The logging macros emit these, and the capture layer used in tests reads
//! them back, so both sides agree on spelling.

pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

/// Operation began
pub const EVENT_START: &str = "start";
/// Operation finished successfully
pub const EVENT_END: &str = "end";
/// Operation finished with an `ExError`
pub const EVENT_END_ERROR: &str = "end_error";
