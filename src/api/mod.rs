//! REST API module.
//!
//! Contains all API routes and handlers following the web front-end contract:
//! every endpoint accepts a JSON body and returns `{"success": true, ...}` on
//! 200, or `{"success": false, "error": ...}` with a non-200 status.

mod sheets;

pub use sheets::*;
