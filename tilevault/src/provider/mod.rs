//! Remote tile source abstraction
//!
//! This module provides the HTTP client trait and the URL template that
//! together describe the remote tile server. The engine never parses or
//! validates response content; a tile body is an opaque byte payload.

mod http;
mod template;
mod types;

pub use http::{AsyncHttpClient, ReqwestTileClient};
pub use template::UrlTemplate;
pub use types::ProviderError;

#[cfg(test)]
pub use http::tests::MockHttpClient;
