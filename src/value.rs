//! Contains the different types of values understood by XML-RPC.

use crate::utils::{escape_xml, format_datetime};

use iso8601::DateTime;

use std::collections::BTreeMap;
use std::io::{self, Write};

/// The possible XML-RPC values.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// `<i4>` or `<int>`, 32-bit signed integer.
    Int(i32),
    /// `<boolean>`, 0 == `false`, 1 == `true`.
    Bool(bool),
    /// `<string>`, an XML-escaped piece of text.
    String(String),
    /// `<double>`
    Double(f64),
    /// `<dateTime.iso8601>`, an ISO 8601 formatted date/time value.
    ///
    /// The wire format carries second-level precision; fractional seconds are
    /// not guaranteed to survive a round-trip.
    DateTime(DateTime),

    /// `<struct>`, a mapping of named values.
    ///
    /// Member names are unique within a struct. Iteration order is sorted by
    /// name, so serialization is deterministic.
    Struct(BTreeMap<String, Value>),
    /// `<array>`, a list of arbitrary (heterogeneous) values.
    Array(Vec<Value>),

    /// `<nil/>`, the empty value.
    ///
    /// This is an XMLRPC [extension][ext] and may not be supported by all clients / servers.
    ///
    /// [ext]: https://web.archive.org/web/20050911054235/http://ontosys.com/xml-rpc/extensions.php
    Nil,
}

impl Value {
    /// Classifies a number the way a dynamically typed caller would: a value
    /// equal to its own floor has no fractional part and becomes an `Int`,
    /// anything else a `Double`.
    ///
    /// Integral values outside the `i4` range stay `Double` since the wire
    /// format cannot carry them as integers.
    pub fn number(n: f64) -> Value {
        if n.floor() == n && n >= i32::MIN as f64 && n <= i32::MAX as f64 {
            Value::Int(n as i32)
        } else {
            Value::Double(n)
        }
    }

    /// If `self` is a `Value::String`, returns its content as a `&str`,
    /// otherwise `None`.
    pub fn as_str(&self) -> Option<&str> {
        match *self {
            Value::String(ref s) => Some(s),
            _ => None,
        }
    }

    /// Returns the inner `i32` of a `Value::Int`.
    pub fn as_i32(&self) -> Option<i32> {
        match *self {
            Value::Int(i) => Some(i),
            _ => None,
        }
    }

    /// Returns the inner `f64` of a `Value::Double`.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Double(d) => Some(d),
            _ => None,
        }
    }

    /// Returns the inner `bool` of a `Value::Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Value::Bool(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the elements of a `Value::Array`.
    pub fn as_array(&self) -> Option<&[Value]> {
        match *self {
            Value::Array(ref elems) => Some(elems),
            _ => None,
        }
    }

    /// Returns the members of a `Value::Struct`.
    pub fn as_struct(&self) -> Option<&BTreeMap<String, Value>> {
        match *self {
            Value::Struct(ref members) => Some(members),
            _ => None,
        }
    }

    /// Looks up a member of a `Value::Struct` by name.
    ///
    /// Returns `None` if `self` is not a struct or has no such member.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.as_struct().and_then(|members| members.get(name))
    }

    /// Formats this `Value` as an XML `<value>` element.
    ///
    /// The input is never mutated; the writer only ever sees appended output.
    pub fn write_as_xml<W: Write>(&self, fmt: &mut W) -> io::Result<()> {
        writeln!(fmt, "<value>")?;

        match *self {
            Value::Int(i) => {
                writeln!(fmt, "<i4>{}</i4>", i)?;
            }
            Value::Bool(b) => {
                writeln!(fmt, "<boolean>{}</boolean>", if b { "1" } else { "0" })?;
            }
            Value::String(ref s) => {
                writeln!(fmt, "<string>{}</string>", escape_xml(s))?;
            }
            Value::Double(d) => {
                writeln!(fmt, "<double>{}</double>", d)?;
            }
            Value::DateTime(date_time) => {
                writeln!(
                    fmt,
                    "<dateTime.iso8601>{}</dateTime.iso8601>",
                    format_datetime(&date_time)
                )?;
            }
            Value::Struct(ref members) => {
                writeln!(fmt, "<struct>")?;
                for (name, value) in members {
                    writeln!(fmt, "<member>")?;
                    write!(fmt, "<name>{}</name>", escape_xml(name))?;
                    value.write_as_xml(fmt)?;
                    writeln!(fmt, "</member>")?;
                }
                writeln!(fmt, "</struct>")?;
            }
            Value::Array(ref elements) => {
                writeln!(fmt, "<array>")?;
                writeln!(fmt, "<data>")?;
                for value in elements {
                    value.write_as_xml(fmt)?;
                }
                writeln!(fmt, "</data>")?;
                writeln!(fmt, "</array>")?;
            }
            Value::Nil => {
                writeln!(fmt, "<nil/>")?;
            }
        }

        writeln!(fmt, "</value>")?;
        Ok(())
    }
}

impl From<i32> for Value {
    fn from(other: i32) -> Self {
        Value::Int(other)
    }
}

impl From<bool> for Value {
    fn from(other: bool) -> Self {
        Value::Bool(other)
    }
}

impl From<String> for Value {
    fn from(other: String) -> Self {
        Value::String(other)
    }
}

impl<'a> From<&'a str> for Value {
    fn from(other: &'a str) -> Self {
        Value::String(other.to_string())
    }
}

impl From<f64> for Value {
    fn from(other: f64) -> Self {
        Value::Double(other)
    }
}

impl From<DateTime> for Value {
    fn from(other: DateTime) -> Self {
        Value::DateTime(other)
    }
}

impl From<Vec<Value>> for Value {
    fn from(other: Vec<Value>) -> Self {
        Value::Array(other)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(other: BTreeMap<String, Value>) -> Self {
        Value::Struct(other)
    }
}

/// `None` marshals as `<nil/>`.
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(other: Option<T>) -> Self {
        match other {
            Some(inner) => inner.into(),
            None => Value::Nil,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn to_xml(value: &Value) -> String {
        let mut output: Vec<u8> = Vec::new();
        value.write_as_xml(&mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn escapes_strings() {
        assert_eq!(
            to_xml(&Value::from("<xml>&nbsp;string")),
            "<value>\n<string>&lt;xml>&amp;nbsp;string</string>\n</value>\n"
        );
    }

    #[test]
    fn escapes_struct_member_names() {
        let mut map: BTreeMap<String, Value> = BTreeMap::new();
        map.insert("x&<x".to_string(), Value::from(true));

        assert_eq!(
            to_xml(&Value::Struct(map)),
            "<value>\n<struct>\n<member>\n<name>x&amp;&lt;x</name><value>\n<boolean>1</boolean>\n</value>\n</member>\n</struct>\n</value>\n"
        );
    }

    #[test]
    fn writes_booleans_as_digits() {
        assert_eq!(to_xml(&Value::Bool(true)), "<value>\n<boolean>1</boolean>\n</value>\n");
        assert_eq!(to_xml(&Value::Bool(false)), "<value>\n<boolean>0</boolean>\n</value>\n");
    }

    #[test]
    fn classifies_whole_numbers_as_int() {
        assert_eq!(Value::number(47.0), Value::Int(47));
        assert_eq!(Value::number(0.0), Value::Int(0));
        assert_eq!(Value::number(-1000.0), Value::Int(-1000));
    }

    #[test]
    fn classifies_fractional_numbers_as_double() {
        assert_eq!(Value::number(3.14), Value::Double(3.14));
        assert_eq!(Value::number(-0.5), Value::Double(-0.5));
    }

    #[test]
    fn number_keeps_out_of_range_integrals_as_double() {
        assert_eq!(Value::number(1e10), Value::Double(1e10));
        assert_eq!(Value::number(-1e10), Value::Double(-1e10));
    }

    #[test]
    fn number_keeps_non_finite_as_double() {
        assert!(matches!(Value::number(f64::NAN), Value::Double(d) if d.is_nan()));
        assert_eq!(Value::number(f64::INFINITY), Value::Double(f64::INFINITY));
    }

    #[test]
    fn option_converts_to_nil() {
        assert_eq!(Value::from(None::<i32>), Value::Nil);
        assert_eq!(Value::from(Some(4)), Value::Int(4));
    }

    #[test]
    fn struct_member_lookup() {
        let mut map = BTreeMap::new();
        map.insert("age".to_string(), Value::from(31));
        let value = Value::Struct(map);

        assert_eq!(value.get("age"), Some(&Value::Int(31)));
        assert_eq!(value.get("name"), None);
        assert_eq!(Value::Nil.get("age"), None);
    }
}
