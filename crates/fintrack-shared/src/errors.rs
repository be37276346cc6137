use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConversionError {
    #[error("Empty not allowed")]
    Empty,
    #[error("Maximum length exceeded. {max} allowed but found {actual}")]
    MaxExceeded { max: usize, actual: usize },
    #[error("Invalid format: {0}")]
    InvalidFormat(&'static str),
}

/// Client-facing classification of a failed backend call.
///
/// `Auth` is special cased by the response processing: the stored credential
/// is cleared before the error is surfaced so the app falls back to the login
/// page. Every other kind is shown to the user with a manual retry; nothing
/// is retried automatically.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not authenticated")]
    Auth,
    #[error("Invalid request: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Already exists: {0}")]
    Conflict(String),
    #[error("Network failure: {0}")]
    Network(String),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Maps a non-success response to the taxonomy. The body is whatever text
    /// the server attached (may be empty).
    pub fn from_status(status: StatusCode, body: String) -> Self {
        let detail = if body.is_empty() {
            format!("no body, status code: {status}")
        } else {
            body
        };
        match status {
            StatusCode::UNAUTHORIZED => Self::Auth,
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => Self::Validation(detail),
            StatusCode::NOT_FOUND => Self::NotFound(detail),
            StatusCode::CONFLICT => Self::Conflict(detail),
            _ => Self::Unexpected(anyhow::anyhow!(
                "request failed with status code: {status}. {detail}"
            )),
        }
    }

    /// Returns `true` if the api error is [`Auth`].
    ///
    /// [`Auth`]: ApiError::Auth
    #[must_use]
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth)
    }

    /// Returns `true` if the api error is [`NotFound`].
    ///
    /// [`NotFound`]: ApiError::NotFound
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(..))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::unauthorized(StatusCode::UNAUTHORIZED)]
    fn unauthorized_maps_to_auth(#[case] status: StatusCode) {
        // Act
        let actual = ApiError::from_status(status, "token expired".to_string());

        // Assert
        assert!(actual.is_auth());
    }

    #[rstest]
    #[case::bad_request(StatusCode::BAD_REQUEST)]
    #[case::unprocessable(StatusCode::UNPROCESSABLE_ENTITY)]
    fn malformed_input_maps_to_validation(#[case] status: StatusCode) {
        let actual = ApiError::from_status(status, "cik must be positive".to_string());
        assert!(matches!(actual, ApiError::Validation(msg) if msg.contains("cik")));
    }

    #[test]
    fn not_found_and_conflict_keep_their_kinds() {
        assert!(ApiError::from_status(StatusCode::NOT_FOUND, String::new()).is_not_found());
        assert!(matches!(
            ApiError::from_status(StatusCode::CONFLICT, "email taken".to_string()),
            ApiError::Conflict(_)
        ));
    }

    #[test]
    fn unknown_status_keeps_the_code_in_the_message() {
        let actual = ApiError::from_status(StatusCode::BAD_GATEWAY, String::new());
        assert!(actual.to_string().contains("502"));
    }
}
