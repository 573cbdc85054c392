//! Command implementations.

mod demo;
mod info;
mod validate;

pub use demo::run_demo;
pub use info::run_info;
pub use validate::run_validate;
