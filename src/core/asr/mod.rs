pub mod base;
pub mod http;

pub use base::{AsrEngine, AsrError, AsrResult};
pub use http::HttpAsrEngine;
