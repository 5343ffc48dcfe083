use miette::{Diagnostic, Result};
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Environment error: {0}")]
    #[diagnostic(code(alfred::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(alfred::config))]
    Config(String),

    #[error("Audio device error: {0}")]
    #[diagnostic(code(alfred::audio))]
    Audio(String),

    #[error("Speech recognition error: {0}")]
    #[diagnostic(code(alfred::recognition))]
    Recognition(String),

    #[error("Speech synthesis error: {0}")]
    #[diagnostic(code(alfred::synthesis))]
    Synthesis(String),

    #[error("Google Calendar API error: {0}")]
    #[diagnostic(code(alfred::google_calendar))]
    GoogleCalendar(String),

    #[error("Component error: {0}")]
    #[diagnostic(code(alfred::component))]
    Component(String),

    #[error(transparent)]
    #[diagnostic(code(alfred::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(alfred::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(alfred::other))]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type AppResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Invalid or missing environment variable: {}", var))
}

/// Helper to create configuration errors
#[allow(dead_code)]
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create audio device errors
pub fn audio_error(message: &str) -> Error {
    Error::Audio(message.to_string())
}

/// Helper to create speech recognition errors
pub fn recognition_error(message: &str) -> Error {
    Error::Recognition(message.to_string())
}

/// Helper to create speech synthesis errors
pub fn synthesis_error(message: &str) -> Error {
    Error::Synthesis(message.to_string())
}

/// Helper to create component errors
pub fn component_error(message: &str) -> Error {
    Error::Component(message.to_string())
}

/// Helper to create Google Calendar errors
pub fn google_calendar_error(message: &str) -> Error {
    Error::GoogleCalendar(message.to_string())
}

/// Helper to create other errors
#[allow(dead_code)]
pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_errors_convert_to_serialization() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = Error::from(json_err);
        assert!(matches!(err, Error::Serialization(_)));
    }
}
