use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Invalid response body: {0}")]
    InvalidBody(String),
}

/// Raised while turning a catalog record into its display shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("No video id found in {0:?}")]
    MissingVideoId(String),
}

#[derive(Error, Debug)]
pub enum FavoriteError {
    #[error("Favorites request failed: {0}")]
    Request(#[from] FetchError),

    #[error("Could not encode favorite: {0}")]
    Encode(String),

    #[error("Unexpected favorites response: {0}")]
    UnexpectedResponse(String),
}

/// What a query or mutation reports to its caller.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error(transparent)]
    Favorite(#[from] FavoriteError),

    #[error("Nothing found for {0}")]
    NotFound(String),

    #[error("Failed to decode cached data for {key}: {message}")]
    Decode { key: String, message: String },
}

/// User input rejected before any network call. The message is the alert text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter email and password.")]
    MissingCredentials,

    #[error("Password must be at least {min} characters.")]
    PasswordTooShort { min: usize },
}
