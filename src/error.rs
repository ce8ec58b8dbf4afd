//! Error types and handling for the weather repository

use thiserror::Error;

/// Main error type for the `JustWeather` data layer
#[derive(Error, Debug)]
pub enum WeatherError {
    /// Remote weather service could not be reached or answered with a failure status
    #[error("Network error: {message}")]
    Network { message: String },

    /// Remote weather service answered, but the payload was unusable
    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    /// Caller supplied arguments that can never succeed
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Location store read or write failed
    #[error("Persistence error: {message}")]
    Persistence { message: String },

    /// The saved-location subscription ended
    #[error("Saved location subscription closed")]
    SubscriptionClosed,

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl WeatherError {
    /// Create a new network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a new invalid response error
    pub fn invalid_response<S: Into<String>>(message: S) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new persistence error
    pub fn persistence<S: Into<String>>(message: S) -> Self {
        Self::Persistence {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether the failure came from the remote weather service rather than
    /// from the request itself
    #[must_use]
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::InvalidResponse { .. })
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            WeatherError::Network { .. } => {
                "Unable to reach the weather service. Please check your internet connection."
                    .to_string()
            }
            WeatherError::InvalidResponse { .. } => {
                "The weather service returned unexpected data. Please try again later.".to_string()
            }
            WeatherError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            WeatherError::Persistence { message } => {
                format!("Saved locations are unavailable: {message}")
            }
            WeatherError::SubscriptionClosed => {
                "Saved locations are no longer being observed.".to_string()
            }
            WeatherError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            WeatherError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

impl From<reqwest_middleware::Error> for WeatherError {
    fn from(err: reqwest_middleware::Error) -> Self {
        WeatherError::network(err.to_string())
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            WeatherError::invalid_response(err.to_string())
        } else {
            WeatherError::network(err.to_string())
        }
    }
}

impl From<postcard::Error> for WeatherError {
    fn from(err: postcard::Error) -> Self {
        WeatherError::persistence(format!("corrupt saved location data: {err}"))
    }
}

impl From<tokio::task::JoinError> for WeatherError {
    fn from(err: tokio::task::JoinError) -> Self {
        WeatherError::persistence(format!("store task failed: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let network_err = WeatherError::network("connection reset");
        assert!(matches!(network_err, WeatherError::Network { .. }));

        let validation_err = WeatherError::validation("start after end");
        assert!(matches!(validation_err, WeatherError::Validation { .. }));

        let persistence_err = WeatherError::persistence("disk full");
        assert!(matches!(persistence_err, WeatherError::Persistence { .. }));
    }

    #[test]
    fn test_remote_classification() {
        assert!(WeatherError::network("timeout").is_remote());
        assert!(WeatherError::invalid_response("no current section").is_remote());
        assert!(!WeatherError::validation("bad range").is_remote());
        assert!(!WeatherError::persistence("locked").is_remote());
        assert!(!WeatherError::SubscriptionClosed.is_remote());
    }

    #[test]
    fn test_user_messages() {
        let network_err = WeatherError::network("test");
        assert!(network_err.user_message().contains("Unable to reach"));

        let validation_err = WeatherError::validation("start date after end date");
        assert!(
            validation_err
                .user_message()
                .contains("start date after end date")
        );

        let persistence_err = WeatherError::persistence("not found");
        assert!(persistence_err.user_message().contains("not found"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let weather_err: WeatherError = io_err.into();
        assert!(matches!(weather_err, WeatherError::Io { .. }));
    }
}
