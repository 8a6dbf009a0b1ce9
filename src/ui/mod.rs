//! UI helpers for consistent CLI output
//!
//! Interactive terminals get symbols and progress bars; CI and pipes get
//! plain bracketed status lines.

mod context;
mod output;
mod progress;

pub use context::UiContext;
pub use output::{
    confirm, key_value, key_value_status, section, step_error_detail, step_ok, step_ok_detail,
    step_warn_hint,
};
pub use progress::FetchProgress;
