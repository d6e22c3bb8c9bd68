//! Typed result envelope for client-side decoding.
//!
//! Every value pulled off an event stream arrives wrapped in an [`Envelope`].
//! A malformed frame never ends the stream; it shows up as
//! [`Envelope::DecodeError`] and the next frame is decoded as usual.

use std::fmt;

/// One item of a decoded event stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope<T> {
    /// A frame decoded successfully.
    Ok(T),
    /// A `data:` frame whose payload was not a valid `T`.
    DecodeError(String),
    /// The byte stream failed; this is always the last item.
    Interrupted(String),
}

impl<T> Envelope<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, Envelope::Ok(_))
    }

    /// The decoded value, if any.
    pub fn ok(self) -> Option<T> {
        match self {
            Envelope::Ok(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_ref(&self) -> Envelope<&T> {
        match self {
            Envelope::Ok(value) => Envelope::Ok(value),
            Envelope::DecodeError(msg) => Envelope::DecodeError(msg.clone()),
            Envelope::Interrupted(msg) => Envelope::Interrupted(msg.clone()),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Envelope<U> {
        match self {
            Envelope::Ok(value) => Envelope::Ok(f(value)),
            Envelope::DecodeError(msg) => Envelope::DecodeError(msg),
            Envelope::Interrupted(msg) => Envelope::Interrupted(msg),
        }
    }

    /// Convert into a `Result`, keeping the failure message.
    pub fn into_result(self) -> Result<T, EnvelopeError> {
        match self {
            Envelope::Ok(value) => Ok(value),
            Envelope::DecodeError(msg) => Err(EnvelopeError::Decode(msg)),
            Envelope::Interrupted(msg) => Err(EnvelopeError::Interrupted(msg)),
        }
    }
}

/// Failure half of [`Envelope::into_result`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvelopeError {
    Decode(String),
    Interrupted(String),
}

impl fmt::Display for EnvelopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvelopeError::Decode(msg) => write!(f, "frame decode error: {}", msg),
            EnvelopeError::Interrupted(msg) => write!(f, "stream interrupted: {}", msg),
        }
    }
}

impl std::error::Error for EnvelopeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_accessors() {
        let env = Envelope::Ok(5);
        assert!(env.is_ok());
        assert_eq!(env.clone().map(|v| v * 2), Envelope::Ok(10));
        assert_eq!(env.ok(), Some(5));
    }

    #[test]
    fn test_errors_carry_message() {
        let env: Envelope<i32> = Envelope::DecodeError("expected value".to_string());
        assert!(!env.is_ok());
        assert_eq!(
            env.clone().into_result(),
            Err(EnvelopeError::Decode("expected value".to_string()))
        );
        assert_eq!(env.map(|v| v + 1), Envelope::DecodeError("expected value".to_string()));

        let env: Envelope<i32> = Envelope::Interrupted("reset".to_string());
        assert_eq!(env.as_ref(), Envelope::Interrupted("reset".to_string()));
        assert_eq!(
            env.into_result().unwrap_err().to_string(),
            "stream interrupted: reset"
        );
    }
}
