//! Request framing and the call state machine.

use crate::error::Error;
use crate::parser::parse_response;
use crate::transport::Transport;
use crate::utils::escape_xml;
use crate::Value;

use log::debug;

use std::io::{self, Read, Write};

/// A request to call a procedure.
///
/// Calling is a strict three-stage sequence: the request is serialized into a
/// `<methodCall>` document, exchanged over a [`Transport`], and the response
/// is classified as a result value or an error. Each invocation is
/// independent; no state is shared between calls.
#[derive(Clone, Debug)]
pub struct Request<'a> {
    name: &'a str,
    args: Vec<Value>,
}

impl<'a> Request<'a> {
    /// Creates a new request to call a method named `name`.
    ///
    /// By default, no arguments are passed. Use the `arg` method to append
    /// arguments.
    pub fn new(name: &'a str) -> Self {
        Request {
            name,
            args: Vec::new(),
        }
    }

    /// Appends an argument to the current list of arguments.
    pub fn arg<T: Into<Value>>(mut self, value: T) -> Self {
        self.args.push(value.into());
        self
    }

    /// Performs the request using a [`Transport`], blocking until the
    /// exchange completes.
    ///
    /// Produces exactly one result value or exactly one error; there is no
    /// retry and no partial result.
    ///
    /// # Errors
    ///
    /// - [`Error::Transport`] if the transport fails before an HTTP status is
    ///   available.
    /// - [`Error::Http`] if the reported status is anything other than 200.
    ///   The response body is not parsed in this case.
    /// - [`Error::Fault`] if the server answered with a well-formed
    ///   `<fault>`.
    /// - [`Error::Unmarshal`] if the response document cannot be decoded.
    pub fn call<T: Transport>(&self, transport: T) -> Result<Value, Error> {
        // Build the body XML. This unwrap never panics as we are using
        // `Vec<u8>` as a `Write` implementor, which cannot return an `Err`
        // in `write_as_xml()`.
        let mut body = Vec::new();
        self.write_as_xml(&mut body).unwrap();
        debug!("sending request: {}", String::from_utf8_lossy(&body));

        let (status, mut stream) = transport.send(&body).map_err(Error::Transport)?;
        if status != 200 {
            return Err(Error::Http { status });
        }

        let mut response = Vec::new();
        stream
            .read_to_end(&mut response)
            .map_err(|e| Error::Transport(Box::new(e)))?;
        debug!("received response: {}", String::from_utf8_lossy(&response));

        let value = parse_response(&mut &response[..])?.map_err(Error::Fault)?;
        Ok(value)
    }

    /// Performs the request on a URL.
    ///
    /// This is a convenience method that will internally create a new
    /// `reqwest::blocking::Client` and send an HTTP POST request to the given
    /// URL. If you only use this method to perform requests, you don't need
    /// to depend on `reqwest` yourself.
    ///
    /// This method is only available when the `http` feature is enabled (this
    /// is the default).
    ///
    /// # Errors
    ///
    /// Since this is just a convenience wrapper around [`Request::call`], the
    /// same error conditions apply.
    #[cfg(feature = "reqwest")]
    pub fn call_url<U: reqwest::IntoUrl>(&self, url: U) -> Result<Value, Error> {
        self.call(reqwest::blocking::Client::new().post(url))
    }

    /// Formats this `Request` as a UTF-8 encoded XML document.
    ///
    /// # Errors
    ///
    /// Any errors reported by the writer will be propagated to the caller. If
    /// the writer never returns an error, neither will this method.
    pub fn write_as_xml<W: Write>(&self, fmt: &mut W) -> io::Result<()> {
        write!(fmt, r#"<?xml version="1.0" encoding="utf-8"?>"#)?;
        write!(fmt, "<methodCall>")?;
        write!(fmt, "<methodName>{}</methodName>", escape_xml(self.name))?;
        write!(fmt, "<params>")?;
        for value in &self.args {
            write!(fmt, "<param>")?;
            value.write_as_xml(fmt)?;
            write!(fmt, "</param>")?;
        }
        write!(fmt, "</params>")?;
        write!(fmt, "</methodCall>")?;
        Ok(())
    }
}
