use crate::error::Error;
use crate::heap::Heap;
use crate::object::ObjectKind;
use crate::value::{ObjId, Value};

/// ECMAScript `ToBoolean`.
pub(crate) fn to_boolean(value: &Value) -> bool {
  match value {
    Value::Undefined | Value::Null => false,
    Value::Bool(b) => *b,
    Value::Number(n) => *n != 0.0 && !n.is_nan(),
    Value::String(s) => !s.is_empty(),
    Value::Object(_) => true,
  }
}

/// ECMAScript `ToNumber`.
pub(crate) fn to_number(heap: &Heap, value: &Value) -> Result<f64, Error> {
  Ok(match value {
    Value::Undefined => f64::NAN,
    Value::Null => 0.0,
    Value::Bool(b) => {
      if *b {
        1.0
      } else {
        0.0
      }
    }
    Value::Number(n) => *n,
    Value::String(s) => string_to_number(s),
    Value::Object(_) => {
      let prim = to_primitive(heap, value)?;
      match prim {
        Value::Object(_) => f64::NAN,
        other => to_number(heap, &other)?,
      }
    }
  })
}

/// ECMAScript string numeric literal semantics for `ToNumber(String)`.
pub(crate) fn string_to_number(raw: &str) -> f64 {
  let trimmed = raw.trim_matches(is_ecma_whitespace);
  if trimmed.is_empty() {
    return 0.0;
  }

  // `Infinity` is case-sensitive in ECMAScript string numeric literals.
  match trimmed {
    "Infinity" | "+Infinity" => return f64::INFINITY,
    "-Infinity" => return f64::NEG_INFINITY,
    _ => {}
  }

  // Hex integer literals.
  if let Some(hex) = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
    return match u64::from_str_radix(hex, 16) {
      Ok(n) => n as f64,
      Err(_) => f64::NAN,
    };
  }

  // Guard against Rust's parser accepting "inf"/"infinity"/"nan" forms that
  // are not ECMAScript numeric literals.
  if trimmed
    .chars()
    .any(|c| c.is_alphabetic() && c != 'e' && c != 'E')
  {
    return f64::NAN;
  }

  trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

fn is_ecma_whitespace(c: char) -> bool {
  c.is_whitespace() || c == '\u{FEFF}'
}

/// ECMAScript `ToString(Number)`.
pub(crate) fn number_to_string(n: f64) -> String {
  if n.is_nan() {
    return "NaN".to_string();
  }
  if n.is_infinite() {
    return if n.is_sign_negative() {
      "-Infinity".to_string()
    } else {
      "Infinity".to_string()
    };
  }
  // `ToString(-0)` is `"0"`.
  if n == 0.0 {
    return "0".to_string();
  }
  let mut buf = ryu::Buffer::new();
  let formatted = buf.format(n);
  // `ryu` formats `1.0` as `"1.0"`, but ECMAScript `ToString(1)` is `"1"`.
  formatted.strip_suffix(".0").unwrap_or(formatted).to_string()
}

/// ECMAScript `ToString`.
pub(crate) fn to_string_value(heap: &Heap, value: &Value) -> Result<String, Error> {
  Ok(match value {
    Value::Undefined => "undefined".to_string(),
    Value::Null => "null".to_string(),
    Value::Bool(true) => "true".to_string(),
    Value::Bool(false) => "false".to_string(),
    Value::Number(n) => number_to_string(*n),
    Value::String(s) => s.to_string(),
    Value::Object(id) => object_to_string(heap, *id, &mut Vec::new())?,
  })
}

fn object_to_string(heap: &Heap, id: ObjId, seen: &mut Vec<ObjId>) -> Result<String, Error> {
  if seen.contains(&id) {
    // A cyclic array renders its back-reference as the empty string.
    return Ok(String::new());
  }
  let obj = heap.get(id)?;
  Ok(match &obj.kind {
    ObjectKind::Array(elements) => {
      seen.push(id);
      let mut parts = Vec::with_capacity(elements.len());
      for element in elements {
        parts.push(element_to_string(heap, element, seen)?);
      }
      seen.pop();
      parts.join(",")
    }
    ObjectKind::Function(f) => format!("function {}() {{ [native code] }}", f.name),
    ObjectKind::Native(n) => format!("function {}() {{ [native code] }}", n.name),
    ObjectKind::Regex { pattern, flags } => format!("/{pattern}/{flags}"),
    ObjectKind::Ordinary | ObjectKind::Host(_) => "[object Object]".to_string(),
  })
}

/// `Array.prototype.join` element conversion: undefined and null render as
/// the empty string.
pub(crate) fn element_to_string(
  heap: &Heap,
  value: &Value,
  seen: &mut Vec<ObjId>,
) -> Result<String, Error> {
  match value {
    Value::Undefined | Value::Null => Ok(String::new()),
    Value::Object(id) => object_to_string(heap, *id, seen),
    other => to_string_value(heap, other),
  }
}

/// ECMAScript `ToPrimitive` with the default hint.
///
/// User `valueOf`/`toString` methods are not consulted; objects convert via
/// their built-in string forms. This matches how the source system leaned on
/// its host for object coercion.
pub(crate) fn to_primitive(heap: &Heap, value: &Value) -> Result<Value, Error> {
  match value {
    Value::Object(id) => Ok(Value::string(object_to_string(heap, *id, &mut Vec::new())?)),
    other => Ok(other.clone()),
  }
}

/// The `+` operator: string concatenation when either primitive operand is a
/// string, numeric addition otherwise.
pub(crate) fn add_values(heap: &Heap, left: &Value, right: &Value) -> Result<Value, Error> {
  let left = to_primitive(heap, left)?;
  let right = to_primitive(heap, right)?;
  if matches!(left, Value::String(_)) || matches!(right, Value::String(_)) {
    let mut s = to_string_value(heap, &left)?;
    s.push_str(&to_string_value(heap, &right)?);
    return Ok(Value::string(s));
  }
  Ok(Value::Number(to_number(heap, &left)? + to_number(heap, &right)?))
}

/// ECMAScript `ToInt32`: modular reduction into the signed 32-bit range.
pub(crate) fn to_int32(n: f64) -> i32 {
  if !n.is_finite() || n == 0.0 {
    return 0;
  }
  let m = n.trunc() % 4294967296.0;
  let m = if m < 0.0 { m + 4294967296.0 } else { m };
  if m >= 2147483648.0 {
    (m - 4294967296.0) as i32
  } else {
    m as i32
  }
}

/// ECMAScript `ToUint32`.
pub(crate) fn to_uint32(n: f64) -> u32 {
  if !n.is_finite() || n == 0.0 {
    return 0;
  }
  let m = n.trunc() % 4294967296.0;
  let m = if m < 0.0 { m + 4294967296.0 } else { m };
  m as u32
}

/// The `typeof` tag.
pub(crate) fn typeof_value(heap: &Heap, value: &Value) -> Result<&'static str, Error> {
  Ok(match value {
    Value::Undefined => "undefined",
    Value::Null => "object",
    Value::Bool(_) => "boolean",
    Value::Number(_) => "number",
    Value::String(_) => "string",
    Value::Object(id) => {
      if heap.get(*id)?.is_callable() {
        "function"
      } else {
        "object"
      }
    }
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn number_to_string_matches_ecma_forms() {
    assert_eq!(number_to_string(1.0), "1");
    assert_eq!(number_to_string(-0.0), "0");
    assert_eq!(number_to_string(0.5), "0.5");
    assert_eq!(number_to_string(f64::NAN), "NaN");
    assert_eq!(number_to_string(f64::NEG_INFINITY), "-Infinity");
  }

  #[test]
  fn string_to_number_rejects_rust_isms() {
    assert!(string_to_number("inf").is_nan());
    assert!(string_to_number("nan").is_nan());
    assert!(string_to_number("1_0").is_nan());
    assert_eq!(string_to_number("  12.5  "), 12.5);
    assert_eq!(string_to_number(""), 0.0);
    assert_eq!(string_to_number("0x2A"), 42.0);
    assert_eq!(string_to_number("-Infinity"), f64::NEG_INFINITY);
    assert!(string_to_number("infinity").is_nan());
  }

  #[test]
  fn int32_reduction_is_modular() {
    assert_eq!(to_int32(4294967296.0), 0);
    assert_eq!(to_int32(4294967297.0), 1);
    assert_eq!(to_int32(2147483648.0), -2147483648);
    assert_eq!(to_int32(-1.5), -1);
    assert_eq!(to_uint32(-1.0), 4294967295);
    assert_eq!(to_int32(f64::NAN), 0);
  }
}
