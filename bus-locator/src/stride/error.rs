//! Stride client error types.

/// Errors from the Stride HTTP client.
///
/// Network failures and decode failures are distinct variants so callers
/// can react to them separately.
#[derive(Debug, thiserror::Error)]
pub enum StrideError {
    /// HTTP request failed (upstream unreachable, DNS failure, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body could not be decoded into the expected schema.
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        /// Leading snippet of the offending body, for diagnostics.
        body: Option<String>,
    },

    /// The API returned a non-success status code.
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Rate limited by the Stride API (HTTP 429).
    #[error("rate limited by the Stride API")]
    RateLimited,
}

impl StrideError {
    /// Build a `Json` error from a serde failure, keeping a bounded snippet
    /// of the body for diagnostics.
    pub(crate) fn json(err: serde_json::Error, body: &str) -> Self {
        StrideError::Json {
            message: err.to_string(),
            body: Some(body.chars().take(500).collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = StrideError::RateLimited;
        assert_eq!(err.to_string(), "rate limited by the Stride API");

        let err = StrideError::Api {
            status: 500,
            message: "Internal Server Error".into(),
        };
        assert_eq!(err.to_string(), "API error 500: Internal Server Error");

        let err = StrideError::json(
            serde_json::from_str::<i64>("not json").unwrap_err(),
            "not json",
        );
        assert!(err.to_string().contains("JSON parse error"));
    }

    #[test]
    fn json_snippet_is_bounded() {
        let body = "x".repeat(10_000);
        let err = StrideError::json(serde_json::from_str::<i64>(&body).unwrap_err(), &body);
        match err {
            StrideError::Json { body: Some(b), .. } => assert_eq!(b.len(), 500),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
