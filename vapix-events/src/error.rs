//! Error types for event discovery

use soap_client::SoapError;
use thiserror::Error;

/// Errors raised while discovering and assembling the event topic tree
#[derive(Debug, Error)]
pub enum EventError {
    /// Network or HTTP communication error
    #[error("Network error: {0}")]
    Network(String),

    /// Malformed or unparseable XML
    #[error("Parse error: {0}")]
    Parse(String),

    /// SOAP fault returned by the device
    #[error("SOAP fault: {0}")]
    Fault(String),

    /// An expected container element was absent from the response
    #[error("Missing {0} element")]
    MissingElement(&'static str),
}

/// Type alias for results that can return an EventError
pub type Result<T> = std::result::Result<T, EventError>;

impl From<SoapError> for EventError {
    fn from(error: SoapError) -> Self {
        match error {
            SoapError::Network(msg) => EventError::Network(msg),
            SoapError::Parse(msg) => EventError::Parse(msg),
            SoapError::Fault(msg) => EventError::Fault(msg),
        }
    }
}
