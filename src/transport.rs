use std::error::Error;
use std::io::Read;

/// Boxed error returned by a transport that failed before an HTTP status was
/// available.
pub type TransportError = Box<dyn Error + Send + Sync>;

/// Request and response transport abstraction.
///
/// A `Transport` knows how to deliver a serialized request body to an
/// endpoint and hand back the HTTP status code together with the raw response
/// body. A `Transport` implementor is passed to [`Request::call`] in order to
/// perform the exchange.
///
/// The most commonly used transport is plain HTTP POST: if the `http` feature
/// is enabled (it is by default), the `reqwest::blocking::RequestBuilder`
/// implements this trait.
///
/// You can implement this trait for your own types if you want to customize
/// how requests are sent, add HTTP headers, or substitute a fake server in
/// tests. Timeout policy belongs to the transport as well; the client itself
/// blocks until the transport reports completion.
///
/// [`Request::call`]: crate::Request::call
pub trait Transport {
    /// The response body returned by `send`.
    type Body: Read;

    /// Transmits a serialized `<methodCall>` document and returns the HTTP
    /// status code and the response body.
    ///
    /// # Errors
    ///
    /// A failure of the transport itself (the request never produced a
    /// status) is returned as a boxed error; the library surfaces it to the
    /// caller unchanged.
    fn send(self, body: &[u8]) -> Result<(u16, Self::Body), TransportError>;
}

/// HTTP transport on top of `reqwest::blocking`.
///
/// This module is disabled if the `http` feature is turned off.
#[cfg(feature = "reqwest")]
pub mod http {
    use super::{Transport, TransportError};

    use reqwest::blocking::{RequestBuilder, Response};
    use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, USER_AGENT};

    /// Appends all HTTP headers required by the XML-RPC specification to the
    /// `RequestBuilder`.
    ///
    /// More specifically, the following headers are set:
    ///
    /// ```notrust
    /// User-Agent: Rust xmlrpc-client
    /// Content-Type: text/xml;charset=UTF-8
    /// Content-Length: $body_len
    /// ```
    pub fn build_headers(builder: RequestBuilder, body_len: u64) -> RequestBuilder {
        // The `Host` header is also required, but reqwest adds it
        // automatically, since HTTP/1.1 requires it.
        builder
            .header(USER_AGENT, "Rust xmlrpc-client")
            .header(CONTENT_TYPE, "text/xml;charset=UTF-8")
            .header(CONTENT_LENGTH, body_len)
    }

    /// Use a `RequestBuilder` as the transport.
    ///
    /// The request is sent as an HTTP POST with the headers from
    /// [`build_headers`]. The status code is reported back verbatim; deciding
    /// whether it indicates success is the client's job, not the transport's.
    impl Transport for RequestBuilder {
        type Body = Response;

        fn send(self, body: &[u8]) -> Result<(u16, Self::Body), TransportError> {
            let response = build_headers(self, body.len() as u64)
                .body(body.to_vec())
                .send()?;

            Ok((response.status().as_u16(), response))
        }
    }
}
