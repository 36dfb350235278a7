// fwconf - Build Script helper
//
// Rust literals for the defaults declared in config_schema.json. A
// missing default (`null`) is the type's zero value; anything that does not
// fit the declared type is an error.

use serde_json::Value;

pub fn int_literal(v: &Value) -> Result<String, String> {
    if v.is_null() {
        return Ok("0".to_string());
    }
    v.as_i64()
        .and_then(|n| i32::try_from(n).ok())
        .map(|n| n.to_string())
        .ok_or_else(|| format!("default {} is not an i32", v))
}

pub fn unsigned_literal(v: &Value) -> Result<String, String> {
    if v.is_null() {
        return Ok("0".to_string());
    }
    v.as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .map(|n| n.to_string())
        .ok_or_else(|| format!("default {} is not a u32", v))
}

pub fn double_literal(v: &Value) -> Result<String, String> {
    if v.is_null() {
        return Ok("0.0".to_string());
    }
    v.as_f64()
        .filter(|d| d.is_finite())
        .map(|d| format!("{:?}", d))
        .ok_or_else(|| format!("default {} is not a number", v))
}

pub fn bool_literal(v: &Value) -> Result<String, String> {
    if v.is_null() {
        return Ok("false".to_string());
    }
    v.as_bool()
        .map(|b| b.to_string())
        .ok_or_else(|| format!("default {} is not a bool", v))
}

pub fn str_literal(v: &Value) -> Result<String, String> {
    match v {
        Value::Null => Ok("ConfStr::Absent".to_string()),
        Value::String(s) if s.is_empty() => Ok("ConfStr::Absent".to_string()),
        Value::String(s) => Ok(format!("ConfStr::Default({:?})", s)),
        other => Err(format!("default {} is not a string", other)),
    }
}
