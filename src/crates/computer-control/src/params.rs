//! Typed extraction from the loosely-typed tool parameter bag.
//!
//! The transport enforces no schema, so every entry point runs its parameters
//! through [`FromParams`] before anything touches the backend. A JSON `null`
//! value is treated exactly like an absent key.

use crate::error::{DispatchError, Result};
use serde_json::{Map, Value};

/// Build a typed request from a raw parameter bag.
pub trait FromParams: Sized {
    fn from_params(params: &Value) -> Result<Self>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct MouseMoveParams {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MouseDragParams {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MouseClickParams {
    pub button: String,
    pub click_type: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyboardTypeParams {
    pub text_to_type: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyboardPressKeyParams {
    pub key_to_press: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WaitParams {
    /// Seconds; zero when not supplied.
    pub duration: f64,
    /// The duration as the caller wrote it, so `2` and `2.0` echo back unchanged.
    pub display: String,
}

impl FromParams for MouseMoveParams {
    fn from_params(params: &Value) -> Result<Self> {
        let (x, y) = coordinate(params, "Missing x or y coordinate.")?;
        Ok(Self { x, y })
    }
}

impl FromParams for MouseDragParams {
    fn from_params(params: &Value) -> Result<Self> {
        let (x, y) = coordinate(params, "Missing x or y coordinate for drag.")?;
        Ok(Self { x, y })
    }
}

impl FromParams for MouseClickParams {
    fn from_params(params: &Value) -> Result<Self> {
        let bag = as_bag(params)?;
        Ok(Self {
            button: optional_string(bag, "button")?.unwrap_or_else(|| "left".to_string()),
            click_type: optional_string(bag, "click_type")?.unwrap_or_else(|| "click".to_string()),
        })
    }
}

impl FromParams for KeyboardTypeParams {
    fn from_params(params: &Value) -> Result<Self> {
        let bag = as_bag(params)?;
        let text_to_type = optional_string(bag, "text_to_type")?
            .ok_or_else(|| DispatchError::missing("Missing text_to_type."))?;
        Ok(Self { text_to_type })
    }
}

impl FromParams for KeyboardPressKeyParams {
    fn from_params(params: &Value) -> Result<Self> {
        let bag = as_bag(params)?;
        let key_to_press = optional_string(bag, "key_to_press")?
            .ok_or_else(|| DispatchError::missing("Missing key_to_press."))?;
        Ok(Self { key_to_press })
    }
}

impl FromParams for WaitParams {
    fn from_params(params: &Value) -> Result<Self> {
        let bag = as_bag(params)?;
        match field(bag, "duration") {
            Some(Value::Number(number)) => Ok(Self {
                duration: number
                    .as_f64()
                    .ok_or_else(|| DispatchError::invalid("duration", "number"))?,
                display: number.to_string(),
            }),
            Some(_) => Err(DispatchError::invalid("duration", "number")),
            None => Ok(Self {
                duration: 0.0,
                display: "0".to_string(),
            }),
        }
    }
}

fn as_bag(params: &Value) -> Result<Option<&Map<String, Value>>> {
    match params {
        Value::Null => Ok(None),
        Value::Object(map) => Ok(Some(map)),
        _ => Err(DispatchError::invalid("params", "object")),
    }
}

fn field<'a>(bag: Option<&'a Map<String, Value>>, key: &str) -> Option<&'a Value> {
    bag.and_then(|map| map.get(key)).filter(|value| !value.is_null())
}

fn optional_string(bag: Option<&Map<String, Value>>, key: &str) -> Result<Option<String>> {
    match field(bag, key) {
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(DispatchError::invalid(key, "string")),
        None => Ok(None),
    }
}

fn coordinate(params: &Value, missing_message: &str) -> Result<(i32, i32)> {
    let bag = as_bag(params)?;
    let (x, y) = match (field(bag, "x"), field(bag, "y")) {
        (Some(x), Some(y)) => (x, y),
        _ => return Err(DispatchError::missing(missing_message)),
    };
    Ok((integer(x, "x")?, integer(y, "y")?))
}

fn integer(value: &Value, name: &str) -> Result<i32> {
    let invalid = || DispatchError::invalid(name, "integer");

    if let Some(i) = value.as_i64() {
        return i32::try_from(i).map_err(|_| invalid());
    }

    // Integral floats such as 120.0 are accepted
    match value.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= i32::MIN as f64 && f <= i32::MAX as f64 => Ok(f as i32),
        _ => Err(invalid()),
    }
}
