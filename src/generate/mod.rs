//! Model-backed generation of column schemas and row data.

mod parser;
mod rows;
mod schema;

pub use parser::*;
pub use rows::*;
pub use schema::*;
