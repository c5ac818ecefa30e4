use reqwest::StatusCode;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    /// The chosen slot was booked by someone else first.
    #[error("Slot {0} has just been taken")]
    SlotTaken(Uuid),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Server returned {status}: {message}")]
    Api { status: StatusCode, message: String },

    #[error("Could not reach the booking service: {0}")]
    Network(String),

    #[error("Unexpected response from the booking service: {0}")]
    Decode(String),
}

impl ClientError {
    /// Classify a non-success response using the server's `{"error": {...}}` body.
    pub fn from_response(status: StatusCode, message: String) -> Self {
        match status {
            StatusCode::BAD_REQUEST => ClientError::Validation(message),
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized(message),
            StatusCode::CONFLICT => ClientError::Conflict(message),
            StatusCode::NOT_FOUND => ClientError::NotFound(message),
            _ => ClientError::Api { status, message },
        }
    }

    /// Text for the inline alert shown next to the form or slot list.
    pub fn alert_message(&self) -> String {
        match self {
            ClientError::Validation(msg)
            | ClientError::Conflict(msg)
            | ClientError::NotFound(msg) => msg.clone(),
            ClientError::Unauthorized(_) => "Please log in again to continue.".to_string(),
            ClientError::SlotTaken(_) => {
                "Sorry, that slot was just booked. Please choose another time.".to_string()
            }
            ClientError::Api { .. } | ClientError::Decode(_) => {
                "Something went wrong. Please try again.".to_string()
            }
            ClientError::Network(_) => {
                "Unable to reach the server. Check your connection and try again.".to_string()
            }
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_status_classification() {
        assert_matches!(
            ClientError::from_response(StatusCode::CONFLICT, "taken".to_string()),
            ClientError::Conflict(msg) if msg == "taken"
        );
        assert_matches!(
            ClientError::from_response(StatusCode::BAD_GATEWAY, "down".to_string()),
            ClientError::Api { status, .. } if status == StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_validation_alert_passes_message_through() {
        let err = ClientError::Validation("Please select a date".to_string());
        assert_eq!(err.alert_message(), "Please select a date");
        assert!(ClientError::SlotTaken(Uuid::nil()).alert_message().contains("another time"));
    }
}
