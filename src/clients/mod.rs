//! Typed HTTP clients for the two outbound services.

mod completion;
mod sheet;

pub use completion::*;
pub use sheet::*;
