use crate::Value;

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{self, Display, Formatter};

/// A `<fault>` response, indicating that a request failed.
///
/// The XML-RPC specification requires that a `<faultCode>` and `<faultString>`
/// is returned in the `<fault>` case, further describing the error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fault {
    /// An application-specific error code.
    ///
    /// The meaning of this code is not specified by XML-RPC and depends on the
    /// service you are using.
    pub fault_code: i32,
    /// A human-readable description of the fault.
    pub fault_string: String,
}

impl Fault {
    /// Creates a new `Fault` from an error code and a message.
    pub fn new(fault_code: i32, fault_string: String) -> Fault {
        Fault {
            fault_code,
            fault_string,
        }
    }

    /// Creates a `Fault` from a `Value`.
    ///
    /// The `Value` must be a `Value::Struct` with an integer `faultCode`
    /// member and a string `faultString` member. Additional members are
    /// ignored.
    ///
    /// Returns `None` if the value doesn't have that shape.
    pub fn from_value(value: &Value) -> Option<Self> {
        match *value {
            Value::Struct(ref map) => match (map.get("faultCode"), map.get("faultString")) {
                (Some(&Value::Int(fault_code)), Some(&Value::String(ref fault_string))) => {
                    Some(Fault {
                        fault_code,
                        fault_string: fault_string.clone(),
                    })
                }
                _ => None,
            },
            _ => None,
        }
    }

    /// Turns this `Fault` into an equivalent `Value`.
    ///
    /// The returned value can be parsed back into a `Fault` using
    /// `Fault::from_value` or returned as a `<fault>` error response by
    /// serializing it into a `<fault></fault>` tag.
    pub fn to_value(&self) -> Value {
        let mut map = BTreeMap::new();
        map.insert("faultCode".to_string(), Value::from(self.fault_code));
        map.insert(
            "faultString".to_string(),
            Value::from(self.fault_string.as_str()),
        );

        Value::Struct(map)
    }
}

impl Display for Fault {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.fault_string, self.fault_code)
    }
}

impl Error for Fault {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fault_roundtrip() {
        let input = Fault::new(
            -123456,
            "The Bald Lazy House Jumps Over The Hyperactive Kitten".to_string(),
        );

        assert_eq!(Fault::from_value(&input.to_value()), Some(input));
    }

    #[test]
    fn rejects_non_struct_values() {
        assert_eq!(Fault::from_value(&Value::Int(4)), None);
        assert_eq!(Fault::from_value(&Value::Nil), None);
    }

    #[test]
    fn rejects_wrongly_typed_members() {
        let mut map = BTreeMap::new();
        map.insert("faultCode".to_string(), Value::from("not an int"));
        map.insert("faultString".to_string(), Value::from("message"));
        assert_eq!(Fault::from_value(&Value::Struct(map)), None);
    }

    #[test]
    fn ignores_additional_members() {
        let mut map = BTreeMap::new();
        map.insert("faultCode".to_string(), Value::from(4));
        map.insert("faultString".to_string(), Value::from("Too many parameters."));
        map.insert("extra".to_string(), Value::Nil);

        assert_eq!(
            Fault::from_value(&Value::Struct(map)),
            Some(Fault::new(4, "Too many parameters.".to_string()))
        );
    }
}
