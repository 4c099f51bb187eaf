//! Request/response middleware shared by the server routes.

pub mod cors;
pub mod gzip;
