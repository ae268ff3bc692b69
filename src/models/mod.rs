//! Data models for the SheetGenie backend.
//!
//! Column and row types shared by the generators, the synchronizer, and the
//! HTTP surface.

mod column;
mod requests;
mod row;

pub use column::*;
pub use requests::*;
pub use row::*;
