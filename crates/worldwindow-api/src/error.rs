use thiserror::Error;

/// Ways a call to the card backend can fail
///
/// None of these are retried here. Whoever made the call decides what the
/// user gets to see.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never produced a response (DNS, refused, reset, timeout)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-2xx status
    #[error("HTTP {status}")]
    Http { status: u16 },

    #[error("Malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Status code for HTTP failures, `None` for everything else
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status } => Some(*status),
            ApiError::Network(e) => e.status().map(|s| s.as_u16()),
            ApiError::Decode(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_carries_status() {
        let err = ApiError::Http { status: 503 };
        assert_eq!(err.status(), Some(503));
        assert_eq!(err.to_string(), "HTTP 503");
    }

    #[test]
    fn test_decode_error_has_no_status() {
        let err: ApiError = serde_json::from_str::<Vec<u8>>("{").unwrap_err().into();
        assert_eq!(err.status(), None);
    }
}
