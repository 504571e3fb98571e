//! clipsync - Client module
//!
//! The relay client session and the HTTP client for the read/write surface

pub mod http;
pub mod session;

pub use http::{HttpClient, HttpError, WriteResponse};
pub use session::{run, SessionEnd};
