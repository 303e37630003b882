//! XML-RPC value and response decoding.

use crate::error::UnmarshalError;
use crate::{Fault, Value};

use iso8601::datetime;
use xml::name::OwnedName;
use xml::reader::{EventReader, XmlEvent};
use xml::ParserConfig;

use std::collections::BTreeMap;
use std::io::Read;

/// The outcome of a method call: either the returned value or the fault sent
/// by the server.
pub type Response = Result<Value, Fault>;

pub type ParseResult<T> = Result<T, UnmarshalError>;

/// Whether an XML reader error only says that the input ended.
fn is_eof(e: &xml::reader::Error) -> bool {
    match *e.kind() {
        xml::reader::ErrorKind::UnexpectedEof => true,
        xml::reader::ErrorKind::Syntax(ref msg) => msg.contains("end of stream"),
        _ => false,
    }
}

/// Decodes XML-RPC documents from a pull-based XML event stream.
///
/// Insignificant whitespace between tags, comments and processing
/// instructions are skipped, so pretty-printed and compact documents decode
/// to identical values.
pub struct Parser<'a, R: Read + 'a> {
    reader: EventReader<&'a mut R>,
}

impl<'a, R: Read> Parser<'a, R> {
    pub fn new(reader: &'a mut R) -> Self {
        Parser {
            reader: EventReader::new_with_config(
                reader,
                ParserConfig {
                    cdata_to_characters: true,
                    ..Default::default()
                },
            ),
        }
    }

    /// Reads an `XmlEvent` from the reader, disposing of events we want to
    /// ignore (whitespace-only text, comments, the document prologue).
    fn pull_event(&mut self) -> ParseResult<XmlEvent> {
        loop {
            let event = self.reader.next()?;
            match event {
                XmlEvent::StartDocument { .. }
                | XmlEvent::Comment(_)
                | XmlEvent::Whitespace(_)
                | XmlEvent::ProcessingInstruction { .. } => continue,
                _ => return Ok(event),
            }
        }
    }

    /// Maps an event we cannot use at this point to the error describing it.
    ///
    /// The error carries the offending tag name, or `"undefined"` when the
    /// document ended instead.
    fn unexpected(&self, event: XmlEvent) -> UnmarshalError {
        match event {
            XmlEvent::StartElement { name, .. } | XmlEvent::EndElement { name } => {
                UnmarshalError::UnknownTag(name.local_name)
            }
            _ => UnmarshalError::UnknownTag("undefined".to_string()),
        }
    }

    /// Expects an opening tag like `<tag>` (attributes are ignored).
    fn expect_open(&mut self, tag: &str) -> ParseResult<()> {
        match self.pull_event()? {
            XmlEvent::StartElement { ref name, .. } if name == &OwnedName::local(tag) => Ok(()),
            event => Err(self.unexpected(event)),
        }
    }

    /// Expects a closing tag like `</tag>`.
    fn expect_close(&mut self, tag: &str) -> ParseResult<()> {
        match self.pull_event()? {
            XmlEvent::EndElement { ref name } if name == &OwnedName::local(tag) => Ok(()),
            event => Err(self.unexpected(event)),
        }
    }

    /// Consumes an element whose opening tag has already been read, including
    /// all of its descendants.
    fn skip_element(&mut self) -> ParseResult<()> {
        let mut depth = 1usize;
        while depth > 0 {
            match self.reader.next()? {
                XmlEvent::StartElement { .. } => depth += 1,
                XmlEvent::EndElement { .. } => depth -= 1,
                XmlEvent::EndDocument => {
                    return Err(UnmarshalError::UnknownTag("undefined".to_string()))
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Reads the text content of a scalar tag up to its closing tag.
    ///
    /// An immediately closed tag (`<string/>` or `<i4></i4>`) yields the
    /// empty string.
    fn read_text(&mut self, tag: &str) -> ParseResult<String> {
        match self.pull_event()? {
            XmlEvent::Characters(string) => {
                self.expect_close(tag)?;
                Ok(string)
            }
            XmlEvent::EndElement { ref name } if name == &OwnedName::local(tag) => {
                Ok(String::new())
            }
            event => Err(self.unexpected(event)),
        }
    }

    pub fn parse_response(&mut self) -> ParseResult<Response> {
        let response: Response;

        // <methodResponse>
        self.expect_open("methodResponse")?;

        // <fault> / <params>
        match self.pull_event()? {
            XmlEvent::StartElement { ref name, .. } => {
                if name == &OwnedName::local("fault") {
                    let value = self.parse_value()?;
                    let fault =
                        Fault::from_value(&value).ok_or_else(|| UnmarshalError::InvalidValue {
                            for_type: "fault",
                            found: format!("{:?}", value),
                        })?;
                    response = Err(fault);
                } else if name == &OwnedName::local("params") {
                    // <param>
                    self.expect_open("param")?;

                    let value = self.parse_value()?;
                    response = Ok(value);

                    // </param>
                    self.expect_close("param")?;
                } else {
                    return Err(UnmarshalError::UnknownTag(name.local_name.clone()));
                }
            }
            event => return Err(self.unexpected(event)),
        }

        Ok(response)
    }

    pub fn parse_value(&mut self) -> ParseResult<Value> {
        // <value>, where input that ends before any element counts as an
        // absent node and is reported under the "undefined" tag.
        match self.pull_event() {
            Ok(XmlEvent::StartElement { ref name, .. })
                if name == &OwnedName::local("value") => {}
            Ok(XmlEvent::EndDocument) => {
                return Err(UnmarshalError::UnknownTag("undefined".to_string()))
            }
            Ok(event) => return Err(self.unexpected(event)),
            Err(UnmarshalError::Xml(ref e)) if is_eof(e) => {
                return Err(UnmarshalError::UnknownTag("undefined".to_string()))
            }
            Err(e) => return Err(e),
        }

        let value = self.parse_value_inner()?;

        // </value>
        self.expect_close("value")?;

        Ok(value)
    }

    fn parse_value_inner(&mut self) -> ParseResult<Value> {
        fn invalid_value(for_type: &'static str, found: String) -> UnmarshalError {
            UnmarshalError::InvalidValue { for_type, found }
        }

        let value = match self.pull_event()? {
            XmlEvent::StartElement { ref name, .. } => {
                if name == &OwnedName::local("struct") {
                    let mut members = BTreeMap::new();
                    loop {
                        match self.pull_event()? {
                            XmlEvent::EndElement { ref name }
                                if name == &OwnedName::local("struct") =>
                            {
                                break
                            }
                            XmlEvent::StartElement { ref name, .. }
                                if name == &OwnedName::local("member") =>
                            {
                                // <name>NAME</name>
                                self.expect_open("name")?;
                                let name = self.read_text("name")?;

                                // Value
                                let value = self.parse_value()?;

                                // </member>
                                self.expect_close("member")?;

                                // Member names may come wrapped in formatting
                                // whitespace; the key is the trimmed text.
                                members.insert(name.trim().to_string(), value);
                            }
                            // Anything else inside <struct> is not a member
                            // and is skipped.
                            XmlEvent::StartElement { .. } => self.skip_element()?,
                            XmlEvent::Characters(_) => {}
                            event => return Err(self.unexpected(event)),
                        }
                    }

                    Value::Struct(members)
                } else if name == &OwnedName::local("array") {
                    let mut elements: Vec<Value> = Vec::new();
                    self.expect_open("data")?;
                    loop {
                        match self.pull_event()? {
                            XmlEvent::EndElement { ref name }
                                if name == &OwnedName::local("data") =>
                            {
                                break
                            }
                            XmlEvent::StartElement { ref name, .. }
                                if name == &OwnedName::local("value") =>
                            {
                                elements.push(self.parse_value_inner()?);
                                self.expect_close("value")?;
                            }
                            // Non-<value> children of <data> are skipped.
                            XmlEvent::StartElement { .. } => self.skip_element()?,
                            XmlEvent::Characters(_) => {}
                            event => return Err(self.unexpected(event)),
                        }
                    }
                    self.expect_close("array")?;
                    Value::Array(elements)
                } else if name == &OwnedName::local("nil") {
                    match self.pull_event()? {
                        XmlEvent::EndElement { ref name } if name == &OwnedName::local("nil") => {}
                        XmlEvent::Characters(string) => {
                            return Err(invalid_value("nil", string));
                        }
                        event => return Err(self.unexpected(event)),
                    }
                    Value::Nil
                } else if name == &OwnedName::local("string") {
                    // String content is taken verbatim, with no trimming.
                    // This is deliberately asymmetric with struct member
                    // names.
                    Value::String(self.read_text("string")?)
                } else if name == &OwnedName::local("i4") || name == &OwnedName::local("int") {
                    let data = self.read_text(&name.local_name)?;
                    Value::Int(
                        data.trim()
                            .parse::<i32>()
                            .map_err(|_| invalid_value("integer", data))?,
                    )
                } else if name == &OwnedName::local("double") {
                    let data = self.read_text("double")?;
                    Value::Double(
                        data.trim()
                            .parse::<f64>()
                            .map_err(|_| invalid_value("double", data))?,
                    )
                } else if name == &OwnedName::local("boolean") {
                    // `1` is true; any other content is false.
                    let data = self.read_text("boolean")?;
                    Value::Bool(data.trim() == "1")
                } else if name == &OwnedName::local("dateTime.iso8601") {
                    let data = self.read_text("dateTime.iso8601")?;
                    Value::DateTime(
                        datetime(data.trim())
                            .map_err(|_| invalid_value("dateTime.iso8601", data))?,
                    )
                } else {
                    return Err(UnmarshalError::UnknownTag(name.local_name.clone()));
                }
            }
            // A <value> without a type tag holds a string.
            XmlEvent::Characters(string) => Value::String(string),
            event => return Err(self.unexpected(event)),
        };

        Ok(value)
    }
}

/// Parses a method response from an XML reader.
pub fn parse_response<R: Read>(reader: &mut R) -> ParseResult<Response> {
    Parser::new(reader).parse_response()
}

/// Decodes a single `<value>` element from an XML reader.
///
/// Fails with `UnmarshalError::UnknownTag("undefined")` if the input holds no
/// `<value>` element at all, and with `UnmarshalError::UnknownTag(tag)` if
/// the tag inside the `<value>` is not a recognized value tag.
pub fn parse_value<R: Read>(reader: &mut R) -> ParseResult<Value> {
    Parser::new(reader).parse_value()
}
