//! HTTP transport shared by the catalog and favorites clients.
//!
//! Every outgoing request goes through the `HttpClient` trait so tests can
//! swap in `MockClient` and count calls.

mod client;

pub use client::{HttpClient, Method, MockClient, MockResponse, ReqwestClient, ReqwestClientBuilder};

use crate::error::FetchError;

/// Build `<base>/<segments...>?<query...>`, percent-encoding each piece.
///
/// e.g. `("https://api.test/v1", ["favorites", "user 1"], [])`
/// -> `https://api.test/v1/favorites/user%201`
pub fn build_url(base: &str, segments: &[&str], query: &[(&str, &str)]) -> Result<String, FetchError> {
    let mut url = url::Url::parse(base).map_err(|e| FetchError::InvalidUrl(format!("{base}: {e}")))?;

    {
        let mut path = url
            .path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl(format!("{base}: cannot be a base")))?;
        path.pop_if_empty();
        path.extend(segments);
    }

    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }

    Ok(url.to_string())
}
