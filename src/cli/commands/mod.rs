//! CLI command implementations

pub mod clear;
pub mod config;
pub mod invalidate;
pub mod prefetch;
pub mod resolve;
pub mod status;

pub use clear::execute as clear;
pub use config::execute as config;
pub use invalidate::execute as invalidate;
pub use prefetch::execute as prefetch;
pub use resolve::execute as resolve;
pub use status::execute as status;
