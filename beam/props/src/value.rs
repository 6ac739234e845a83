/*!
    Property bag values and typed accessors.

    A property bag is an ordered map from field name to a dynamic value.
    The accessors here read one key with "not supplied" semantics: an absent
    key or `null` is `Ok(None)`, a value of the wrong kind is a marshalling
    error naming the key.
*/

use beam_types::{Error, Rational, Result};

pub use serde_json::Value;

/**
    Host-side key/value representation of a configuration record.
    Keys keep their insertion order.
*/
pub type PropertyBag = serde_json::Map<String, Value>;

/**
    The kind name of a dynamic value, as reported in marshalling errors.
*/
pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn supplied<'a>(bag: &'a PropertyBag, name: &str) -> Option<&'a Value> {
    bag.get(name).filter(|v| !v.is_null())
}

/**
    Convert a number to an integer, truncating any fractional part.
*/
fn number_to_i64(name: &str, value: &Value) -> Result<i64> {
    let Value::Number(n) = value else {
        return Err(Error::marshal(name, "number", kind_name(value)));
    };
    if let Some(i) = n.as_i64() {
        return Ok(i);
    }
    match n.as_f64() {
        Some(f) if f.is_finite() && f >= i64::MIN as f64 && f <= i64::MAX as f64 => Ok(f as i64),
        _ => Err(Error::marshal(name, "64-bit integer", "out of range number")),
    }
}

pub fn value_to_i32(name: &str, value: &Value) -> Result<i32> {
    let wide = number_to_i64(name, value)?;
    i32::try_from(wide).map_err(|_| Error::marshal(name, "32-bit integer", "out of range number"))
}

pub fn value_to_i64(name: &str, value: &Value) -> Result<i64> {
    number_to_i64(name, value)
}

pub fn value_to_f64(name: &str, value: &Value) -> Result<f64> {
    value
        .as_f64()
        .ok_or_else(|| Error::marshal(name, "number", kind_name(value)))
}

pub fn get_i32(bag: &PropertyBag, name: &str) -> Result<Option<i32>> {
    supplied(bag, name)
        .map(|v| value_to_i32(name, v))
        .transpose()
}

pub fn get_i64(bag: &PropertyBag, name: &str) -> Result<Option<i64>> {
    supplied(bag, name)
        .map(|v| value_to_i64(name, v))
        .transpose()
}

pub fn get_f64(bag: &PropertyBag, name: &str) -> Result<Option<f64>> {
    supplied(bag, name)
        .map(|v| value_to_f64(name, v))
        .transpose()
}

/**
    Read a boolean key. `None` means the key was not supplied, which is
    distinct from `Some(false)`.
*/
pub fn get_bool(bag: &PropertyBag, name: &str) -> Result<Option<bool>> {
    supplied(bag, name)
        .map(|v| {
            v.as_bool()
                .ok_or_else(|| Error::marshal(name, "boolean", kind_name(v)))
        })
        .transpose()
}

pub fn get_str<'a>(bag: &'a PropertyBag, name: &str) -> Result<Option<&'a str>> {
    supplied(bag, name)
        .map(|v| {
            v.as_str()
                .ok_or_else(|| Error::marshal(name, "string", kind_name(v)))
        })
        .transpose()
}

/**
    Read a `[num, den]` pair. Missing or non-numeric elements fall back to
    `0/1`.
*/
pub fn get_rational(bag: &PropertyBag, name: &str) -> Result<Option<Rational>> {
    let Some(value) = supplied(bag, name) else {
        return Ok(None);
    };
    let Value::Array(pair) = value else {
        return Err(Error::marshal(name, "array", kind_name(value)));
    };
    let element = |index: usize, fallback: i32| match pair.get(index) {
        Some(v @ Value::Number(_)) => value_to_i32(name, v),
        _ => Ok(fallback),
    };
    Ok(Some(Rational::new(
        element(0, Rational::ZERO.num)?,
        element(1, Rational::ZERO.den)?,
    )))
}

/**
    How an array-shaped key was supplied.
*/
#[derive(Debug, PartialEq)]
pub enum ArrayInput<'a> {
    /// Key absent: leave the native storage alone.
    Absent,
    /// Key present but not an array: release the native storage.
    Cleared,
    /// Key holds an array.
    Items(&'a [Value]),
}

pub fn get_array<'a>(bag: &'a PropertyBag, name: &str) -> ArrayInput<'a> {
    match bag.get(name) {
        None => ArrayInput::Absent,
        Some(Value::Array(items)) => ArrayInput::Items(items),
        Some(_) => ArrayInput::Cleared,
    }
}

/**
    Build a single-key bag, mostly useful in tests and callers that set one
    property at a time.
*/
pub fn bag_of(name: &str, value: impl Into<Value>) -> PropertyBag {
    let mut bag = PropertyBag::new();
    bag.insert(name.to_string(), value.into());
    bag
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn bag(value: Value) -> PropertyBag {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn absent_and_null_are_not_supplied() {
        let b = bag(json!({ "width": null }));
        assert_eq!(get_i32(&b, "width").unwrap(), None);
        assert_eq!(get_i32(&b, "height").unwrap(), None);
        assert_eq!(get_bool(&b, "GRAY").unwrap(), None);
    }

    #[test]
    fn integers_truncate_fractions() {
        let b = bag(json!({ "width": 1920.7, "bit_rate": 5_000_000_000i64 }));
        assert_eq!(get_i32(&b, "width").unwrap(), Some(1920));
        assert_eq!(get_i64(&b, "bit_rate").unwrap(), Some(5_000_000_000));
    }

    #[test]
    fn out_of_range_int32_is_an_error() {
        let b = bag(json!({ "width": 5_000_000_000i64 }));
        let err = get_i32(&b, "width").unwrap_err();
        assert!(err.message().contains("width"));
    }

    #[test]
    fn wrong_kind_names_field_and_kinds() {
        let b = bag(json!({ "width": "wide" }));
        let err = get_i32(&b, "width").unwrap_err();
        assert_eq!(err.message(), "property 'width' expected number but got string");
    }

    #[test]
    fn booleans_track_presence() {
        let b = bag(json!({ "GRAY": false }));
        assert_eq!(get_bool(&b, "GRAY").unwrap(), Some(false));
        let b = bag(json!({ "GRAY": 1 }));
        assert!(get_bool(&b, "GRAY").is_err());
    }

    #[test]
    fn rationals_default_missing_parts() {
        let b = bag(json!({ "a": [30000, 1001], "b": [25], "c": [] }));
        assert_eq!(get_rational(&b, "a").unwrap(), Some(Rational::new(30000, 1001)));
        assert_eq!(get_rational(&b, "b").unwrap(), Some(Rational::new(25, 1)));
        assert_eq!(get_rational(&b, "c").unwrap(), Some(Rational::new(0, 1)));
        assert_eq!(get_rational(&b, "d").unwrap(), None);
    }

    #[test]
    fn arrays_distinguish_absent_from_cleared() {
        let b = bag(json!({ "m": [1, 2], "n": null, "o": 3 }));
        assert_eq!(get_array(&b, "m"), ArrayInput::Items(&[json!(1), json!(2)]));
        assert_eq!(get_array(&b, "n"), ArrayInput::Cleared);
        assert_eq!(get_array(&b, "o"), ArrayInput::Cleared);
        assert_eq!(get_array(&b, "p"), ArrayInput::Absent);
    }

    #[test]
    fn kind_names() {
        assert_eq!(kind_name(&json!(null)), "null");
        assert_eq!(kind_name(&json!([1])), "array");
        assert_eq!(kind_name(&json!({})), "object");
    }
}
