use crate::error::Error;
use crate::interpreter::Interpreter;
use crate::object::ObjectKind;
use crate::ops;
use crate::value::{ObjId, Value};

/// Parses `key` as an array index: digits only, no leading zero (except
/// `"0"`), within the u32 index range.
pub(crate) fn array_index(key: &str) -> Option<usize> {
  if key.is_empty() || (key.len() > 1 && key.starts_with('0')) {
    return None;
  }
  if !key.bytes().all(|b| b.is_ascii_digit()) {
    return None;
  }
  let value: u64 = key.parse().ok()?;
  if value >= u32::MAX as u64 {
    return None;
  }
  Some(value as usize)
}

impl Interpreter {
  /// A script-visible member read: the reflective-access filter, then the
  /// ordinary lookup.
  ///
  /// Filter rules (reads only; writes pass through untouched):
  /// - `__proto__` never resolves.
  /// - `prototype` only resolves on functions.
  /// - `constructor` resolves, but a result that is one of the registered
  ///   built-in constructors reads as undefined.
  pub(crate) fn get_member(&mut self, target: &Value, key: &str) -> Result<Value, Error> {
    if key == "__proto__" {
      // Still reject nullish receivers before filtering.
      if target.is_nullish() {
        return Err(self.throw_member_read_on_nullish(target));
      }
      return Ok(Value::Undefined);
    }

    if key == "prototype" {
      let receiver_is_function = match target {
        Value::Object(id) => self.heap.get(*id)?.is_function(),
        _ => {
          if target.is_nullish() {
            return Err(self.throw_member_read_on_nullish(target));
          }
          false
        }
      };
      if !receiver_is_function {
        return Ok(Value::Undefined);
      }
    }

    let result = self.get_member_raw(target, key)?;

    if key == "constructor" {
      if let Value::Object(id) = &result {
        if self.intrinsics.is_builtin_constructor(*id) {
          return Ok(Value::Undefined);
        }
      }
    }

    Ok(result)
  }

  fn throw_member_read_on_nullish(&mut self, target: &Value) -> Error {
    match target {
      Value::Null => self.throw_type_error("Cannot read properties of null"),
      _ => self.throw_type_error("Cannot read properties of undefined"),
    }
  }

  /// The unfiltered member read: receiver specials, own properties, then the
  /// prototype chain. Primitive receivers resolve through their intrinsic
  /// prototypes.
  pub(crate) fn get_member_raw(&mut self, target: &Value, key: &str) -> Result<Value, Error> {
    match target {
      Value::Undefined | Value::Null => Err(self.throw_member_read_on_nullish(target)),
      Value::String(s) => {
        if key == "length" {
          return Ok(Value::Number(s.encode_utf16().count() as f64));
        }
        if let Some(idx) = array_index(key) {
          return Ok(match s.chars().nth(idx) {
            Some(c) => Value::string(c.to_string()),
            None => Value::Undefined,
          });
        }
        let proto = self.intrinsics.string_prototype;
        Ok(self.object_chain_get(proto, key)?.unwrap_or(Value::Undefined))
      }
      Value::Number(_) => {
        let proto = self.intrinsics.number_prototype;
        Ok(self.object_chain_get(proto, key)?.unwrap_or(Value::Undefined))
      }
      Value::Bool(_) => {
        let proto = self.intrinsics.boolean_prototype;
        Ok(self.object_chain_get(proto, key)?.unwrap_or(Value::Undefined))
      }
      Value::Object(id) => Ok(self.object_chain_get(*id, key)?.unwrap_or(Value::Undefined)),
    }
  }

  /// Walks `id` and its prototype chain, applying per-kind specials at each
  /// level.
  fn object_chain_get(&self, id: ObjId, key: &str) -> Result<Option<Value>, Error> {
    let mut current = Some(id);
    while let Some(id) = current {
      let obj = self.heap.get(id)?;

      match &obj.kind {
        ObjectKind::Array(elements) => {
          if key == "length" {
            return Ok(Some(Value::Number(elements.len() as f64)));
          }
          if let Some(idx) = array_index(key) {
            return Ok(elements.get(idx).cloned());
          }
        }
        ObjectKind::Host(host) => {
          if let Some(value) = host.get(key) {
            return Ok(Some(value));
          }
        }
        ObjectKind::Regex { pattern, flags } => match key {
          "source" => return Ok(Some(Value::String(pattern.clone()))),
          "flags" => return Ok(Some(Value::String(flags.clone()))),
          _ => {}
        },
        _ => {}
      }

      if let Some(value) = obj.props.get(key) {
        return Ok(Some(value.clone()));
      }

      // Function metadata reads like own data properties but lives in the
      // function payload.
      match &obj.kind {
        ObjectKind::Function(f) => match key {
          "name" => return Ok(Some(Value::String(f.name.clone()))),
          "length" => return Ok(Some(Value::Number(f.params.len() as f64))),
          "prototype" => return Ok(Some(f.prototype.clone().unwrap_or(Value::Undefined))),
          _ => {}
        },
        ObjectKind::Native(n) => match key {
          "name" => return Ok(Some(Value::String(n.name.clone()))),
          "length" => return Ok(Some(Value::Number(n.length as f64))),
          "prototype" => return Ok(Some(n.prototype.clone().unwrap_or(Value::Undefined))),
          _ => {}
        },
        _ => {}
      }

      current = obj.proto;
    }
    Ok(None)
  }

  /// A script-visible member write. Writes are never filtered.
  pub(crate) fn set_member(&mut self, target: &Value, key: &str, value: Value) -> Result<(), Error> {
    let id = match target {
      Value::Undefined | Value::Null => {
        return Err(match target {
          Value::Null => self.throw_type_error("Cannot set properties of null"),
          _ => self.throw_type_error("Cannot set properties of undefined"),
        });
      }
      // Property writes on primitives are silently dropped.
      Value::Bool(_) | Value::Number(_) | Value::String(_) => return Ok(()),
      Value::Object(id) => *id,
    };

    // Array `length` assignment truncates or extends; computing the new
    // length may consult the heap, so resolve it before borrowing mutably.
    let new_length = {
      let obj = self.heap.get(id)?;
      if matches!(obj.kind, ObjectKind::Array(_)) && key == "length" {
        Some(ops::to_uint32(ops::to_number(&self.heap, &value)?) as usize)
      } else {
        None
      }
    };

    let host = match &self.heap.get(id)?.kind {
      ObjectKind::Host(host) => Some(host.clone()),
      _ => None,
    };
    if let Some(host) = host {
      host.set(key, value);
      return Ok(());
    }

    let obj = self.heap.get_mut(id)?;
    match &mut obj.kind {
      ObjectKind::Array(elements) => {
        if let Some(len) = new_length {
          elements.resize(len, Value::Undefined);
          return Ok(());
        }
        if let Some(idx) = array_index(key) {
          if idx >= elements.len() {
            elements.resize(idx + 1, Value::Undefined);
          }
          elements[idx] = value;
          return Ok(());
        }
      }
      ObjectKind::Function(f) => {
        if key == "prototype" {
          f.prototype = Some(value);
          return Ok(());
        }
      }
      ObjectKind::Native(n) => {
        if key == "prototype" {
          n.prototype = Some(value);
          return Ok(());
        }
      }
      _ => {}
    }
    obj.props.set(key, value);
    Ok(())
  }

  /// `delete target[key]`. Deleting an array index leaves an undefined hole
  /// and keeps `length`.
  pub(crate) fn delete_member(&mut self, target: &Value, key: &str) -> Result<bool, Error> {
    let Value::Object(id) = target else {
      return Ok(true);
    };
    let obj = self.heap.get_mut(*id)?;
    if let ObjectKind::Array(elements) = &mut obj.kind {
      if let Some(idx) = array_index(key) {
        if idx < elements.len() {
          elements[idx] = Value::Undefined;
          return Ok(true);
        }
      }
    }
    obj.props.remove(key);
    Ok(true)
  }

  /// The `in` operator's presence test: own keys and the prototype chain.
  pub(crate) fn has_property(&self, id: ObjId, key: &str) -> Result<bool, Error> {
    let mut current = Some(id);
    while let Some(id) = current {
      let obj = self.heap.get(id)?;
      match &obj.kind {
        ObjectKind::Array(elements) => {
          if key == "length" {
            return Ok(true);
          }
          if let Some(idx) = array_index(key) {
            if idx < elements.len() {
              return Ok(true);
            }
          }
        }
        ObjectKind::Host(host) => {
          if host.get(key).is_some() {
            return Ok(true);
          }
        }
        _ => {}
      }
      if obj.props.contains(key) {
        return Ok(true);
      }
      current = obj.proto;
    }
    Ok(false)
  }

  /// Own enumerable string keys, in `for … in` order: array indices first,
  /// then named properties in insertion order.
  pub(crate) fn own_enumerable_keys(&self, target: &Value) -> Result<Vec<String>, Error> {
    let Value::Object(id) = target else {
      return Ok(Vec::new());
    };
    let obj = self.heap.get(*id)?;
    let mut keys = Vec::new();
    match &obj.kind {
      ObjectKind::Array(elements) => {
        for idx in 0..elements.len() {
          keys.push(idx.to_string());
        }
      }
      ObjectKind::Host(host) => {
        return Ok(host.keys());
      }
      _ => {}
    }
    keys.extend(obj.props.keys().map(|k| k.to_string()));
    Ok(keys)
  }

  /// Raw own-property read (no filter, no prototype walk). Backs object
  /// spread and JSON serialization.
  pub(crate) fn own_property_value(&self, target: &Value, key: &str) -> Result<Option<Value>, Error> {
    let Value::Object(id) = target else {
      return Ok(None);
    };
    let obj = self.heap.get(*id)?;
    match &obj.kind {
      ObjectKind::Array(elements) => {
        if let Some(idx) = array_index(key) {
          return Ok(elements.get(idx).cloned());
        }
      }
      ObjectKind::Host(host) => {
        if let Some(value) = host.get(key) {
          return Ok(Some(value));
        }
      }
      _ => {}
    }
    Ok(obj.props.get(key).cloned())
  }
}
