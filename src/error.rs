//! Defines error types used by this library.

use crate::fault::Fault;

use xml::reader::Error as XmlError;

use std::error;
use std::fmt::{self, Display, Formatter};

/// Errors that can terminate a method invocation.
///
/// Exactly one of these (or one result value) is produced per invocation.
/// The kinds are disjoint: an HTTP failure is reported without looking at the
/// body, a `<fault>` is only reported for a well-formed fault document, and
/// decoding problems never masquerade as one of the other two.
#[derive(Debug)]
pub enum Error {
    /// The transport reported an HTTP status other than 200.
    ///
    /// The response body is not parsed in this case.
    Http {
        /// The status code reported by the server.
        status: u16,
    },

    /// The server answered the call with a `<fault>`.
    Fault(Fault),

    /// The response could not be decoded as an XML-RPC document.
    Unmarshal(UnmarshalError),

    /// The transport failed before an HTTP status was available (for example,
    /// the connection could not be established).
    Transport(Box<dyn error::Error + Send + Sync>),
}

impl Error {
    /// Returns the contained `Fault`, if this error is a server fault.
    pub fn fault(&self) -> Option<&Fault> {
        match *self {
            Error::Fault(ref fault) => Some(fault),
            _ => None,
        }
    }
}

impl From<Fault> for Error {
    fn from(f: Fault) -> Self {
        Error::Fault(f)
    }
}

impl From<UnmarshalError> for Error {
    fn from(e: UnmarshalError) -> Self {
        Error::Unmarshal(e)
    }
}

impl Display for Error {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            Error::Http { status } => write!(fmt, "HTTP error occurred: {}", status),
            Error::Fault(ref fault) => write!(fmt, "XML-RPC fault occurred: {}", fault),
            Error::Unmarshal(ref err) => write!(fmt, "{}", err),
            Error::Transport(ref err) => write!(fmt, "transport error: {}", err),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::Http { .. } => None,
            Error::Fault(ref fault) => Some(fault),
            Error::Unmarshal(ref err) => Some(err),
            Error::Transport(ref err) => Some(&**err),
        }
    }
}

/// Describes the possible errors that can occur while decoding a `<value>`.
#[derive(Debug, PartialEq)]
pub enum UnmarshalError {
    /// Malformed XML reported by the underlying reader.
    ///
    /// These are passed through unchanged, never reclassified.
    Xml(XmlError),

    /// The tag found inside a `<value>` is not one of the recognized value
    /// tags, or no node was supplied at all.
    ///
    /// Carries the offending tag name, or the literal `"undefined"` when the
    /// input ended before any `<value>` element.
    UnknownTag(String),

    /// A recognized type tag held text that does not parse as that type.
    ///
    /// For example, `<value><i4>AAA</i4></value>` describes an invalid value.
    InvalidValue {
        /// The type for which an invalid value was supplied (eg. `i4` or `dateTime.iso8601`).
        for_type: &'static str,
        /// The text we encountered.
        found: String,
    },
}

impl From<XmlError> for UnmarshalError {
    fn from(e: XmlError) -> Self {
        UnmarshalError::Xml(e)
    }
}

impl Display for UnmarshalError {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            UnmarshalError::Xml(ref err) => write!(fmt, "malformed XML: {}", err),
            UnmarshalError::UnknownTag(ref tag) => {
                write!(fmt, "unmarshal error on tag: {}", tag)
            }
            UnmarshalError::InvalidValue { for_type, ref found } => {
                write!(fmt, "invalid value for type '{}': {}", for_type, found)
            }
        }
    }
}

impl error::Error for UnmarshalError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            UnmarshalError::Xml(ref err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_message() {
        let e = Error::Http { status: 404 };
        assert_eq!(e.to_string(), "HTTP error occurred: 404");
    }

    #[test]
    fn unknown_tag_message() {
        let e = UnmarshalError::UnknownTag("error".to_string());
        assert_eq!(e.to_string(), "unmarshal error on tag: error");
    }

    #[test]
    fn fault_accessor() {
        let e = Error::Fault(Fault::new(4, "Too many parameters.".to_string()));
        assert_eq!(e.fault().map(|f| f.fault_code), Some(4));
        assert!(Error::Http { status: 500 }.fault().is_none());
    }
}
