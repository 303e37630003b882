//! A synchronous XML-RPC client and value codec.
//!
//! This crate implements the client side of the [XML-RPC spec][spec]: it
//! converts values to and from the XML wire representation and drives a
//! blocking, one-shot request/response exchange over a pluggable
//! [`Transport`].
//!
//! A call is made by building a [`Request`] and handing it a transport:
//!
//! ```no_run
//! use xmlrpc_client::Request;
//!
//! let result = Request::new("sayhi").call_url("http://localhost:8000/rpc");
//! ```
//!
//! The outcome is either the method's result [`Value`] or one of the error
//! kinds in [`Error`]: an HTTP status other than 200, a `<fault>` returned by
//! the server, or a response that could not be decoded.
//!
//! [spec]: http://xmlrpc.scripting.com/spec.html

mod error;
mod fault;
mod parser;
mod request;
mod transport;
mod utils;
mod value;

pub use crate::error::{Error, UnmarshalError};
pub use crate::fault::Fault;
pub use crate::parser::{parse_response, parse_value, Response};
pub use crate::request::Request;
pub use crate::transport::{Transport, TransportError};
pub use crate::value::Value;

#[cfg(feature = "reqwest")]
pub use crate::transport::http;
