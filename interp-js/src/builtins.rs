//! The default globals table and its native implementations.
//!
//! The curated set installed here is what the embedder passes through by
//! default: Object, Array, String, Number, Boolean, Math, JSON, the Error
//! family, Date, RegExp, console, and the free functions. Two deliberate
//! replacements gate the reflective escape hatches: `Function` is bound to
//! undefined, and `eval` dispatches to the host's parse callback or fails.

use crate::error::Error;
use crate::function::NativeFunction;
use crate::heap::Heap;
use crate::interpreter::Interpreter;
use crate::intrinsics::Intrinsics;
use crate::native::NativeFn;
use crate::object::{JsObject, ObjectKind};
use crate::ops;
use crate::value::{EnvId, ObjId, Value};
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

type BuiltinFn = fn(&mut Interpreter, Value, &[Value]) -> Result<Value, Error>;

fn alloc_native(
  heap: &mut Heap,
  function_prototype: ObjId,
  name: &str,
  length: u32,
  call: BuiltinFn,
  construct: Option<BuiltinFn>,
) -> ObjId {
  let native = NativeFunction {
    name: Rc::from(name),
    length,
    call: Rc::new(call),
    construct: construct.map(|construct| Rc::new(construct) as NativeFn),
    prototype: None,
  };
  heap.alloc(JsObject::new(
    ObjectKind::Native(native),
    Some(function_prototype),
  ))
}

fn define_method(
  heap: &mut Heap,
  target: ObjId,
  function_prototype: ObjId,
  name: &str,
  length: u32,
  call: BuiltinFn,
) -> Result<(), Error> {
  let function = alloc_native(heap, function_prototype, name, length, call, None);
  heap
    .get_mut(target)?
    .props
    .set(name, Value::Object(function));
  Ok(())
}

/// Allocates the intrinsic prototype graph and populates its methods.
pub(crate) fn bootstrap(heap: &mut Heap) -> Result<Intrinsics, Error> {
  let object_prototype = heap.alloc(JsObject::ordinary(None));
  let function_prototype = heap.alloc(JsObject::ordinary(Some(object_prototype)));
  let array_prototype = heap.alloc(JsObject::ordinary(Some(object_prototype)));
  let string_prototype = heap.alloc(JsObject::ordinary(Some(object_prototype)));
  let number_prototype = heap.alloc(JsObject::ordinary(Some(object_prototype)));
  let boolean_prototype = heap.alloc(JsObject::ordinary(Some(object_prototype)));
  let error_prototype = heap.alloc(JsObject::ordinary(Some(object_prototype)));
  let regexp_prototype = heap.alloc(JsObject::ordinary(Some(object_prototype)));
  let date_prototype = heap.alloc(JsObject::ordinary(Some(object_prototype)));

  let fp = function_prototype;
  define_method(heap, fp, fp, "call", 1, function_call)?;
  define_method(heap, fp, fp, "apply", 2, function_apply)?;
  define_method(heap, fp, fp, "bind", 1, function_bind)?;

  let ap = array_prototype;
  define_method(heap, ap, fp, "push", 1, array_push)?;
  define_method(heap, ap, fp, "pop", 0, array_pop)?;
  define_method(heap, ap, fp, "shift", 0, array_shift)?;
  define_method(heap, ap, fp, "unshift", 1, array_unshift)?;
  define_method(heap, ap, fp, "indexOf", 1, array_index_of)?;
  define_method(heap, ap, fp, "join", 1, array_join)?;
  define_method(heap, ap, fp, "slice", 2, array_slice)?;
  define_method(heap, ap, fp, "concat", 1, array_concat)?;
  define_method(heap, ap, fp, "map", 1, array_map)?;
  define_method(heap, ap, fp, "filter", 1, array_filter)?;
  define_method(heap, ap, fp, "forEach", 1, array_for_each)?;

  let sp = string_prototype;
  define_method(heap, sp, fp, "charAt", 1, string_char_at)?;
  define_method(heap, sp, fp, "charCodeAt", 1, string_char_code_at)?;
  define_method(heap, sp, fp, "indexOf", 1, string_index_of)?;
  define_method(heap, sp, fp, "lastIndexOf", 1, string_last_index_of)?;
  define_method(heap, sp, fp, "slice", 2, string_slice)?;
  define_method(heap, sp, fp, "substring", 2, string_substring)?;
  define_method(heap, sp, fp, "split", 1, string_split)?;
  define_method(heap, sp, fp, "toUpperCase", 0, string_to_upper_case)?;
  define_method(heap, sp, fp, "toLowerCase", 0, string_to_lower_case)?;
  define_method(heap, sp, fp, "trim", 0, string_trim)?;
  define_method(heap, sp, fp, "concat", 1, string_concat)?;
  define_method(heap, sp, fp, "toString", 0, string_to_string)?;

  let np = number_prototype;
  define_method(heap, np, fp, "toFixed", 1, number_to_fixed)?;
  define_method(heap, np, fp, "toString", 1, number_to_string_method)?;

  let ep = error_prototype;
  heap.get_mut(ep)?.props.set("name", Value::string("Error"));
  heap.get_mut(ep)?.props.set("message", Value::string(""));
  define_method(heap, ep, fp, "toString", 0, error_to_string)?;

  define_method(heap, date_prototype, fp, "getTime", 0, date_get_time)?;

  Ok(Intrinsics::new(
    object_prototype,
    function_prototype,
    array_prototype,
    string_prototype,
    number_prototype,
    boolean_prototype,
    error_prototype,
    regexp_prototype,
    date_prototype,
  ))
}

/// Installs the default globals table into the global frame.
pub(crate) fn install_globals(
  heap: &mut Heap,
  intrinsics: &mut Intrinsics,
  global_env: EnvId,
) -> Result<(), Error> {
  let fp = intrinsics.function_prototype;
  let object_prototype = intrinsics.object_prototype;
  let array_prototype = intrinsics.array_prototype;
  let string_prototype = intrinsics.string_prototype;
  let number_prototype = intrinsics.number_prototype;
  let boolean_prototype = intrinsics.boolean_prototype;
  let error_prototype = intrinsics.error_prototype;
  let regexp_prototype = intrinsics.regexp_prototype;
  let date_prototype = intrinsics.date_prototype;

  let install_ctor = |heap: &mut Heap,
                      intrinsics: &mut Intrinsics,
                      name: &str,
                      length: u32,
                      call: BuiltinFn,
                      construct: Option<BuiltinFn>,
                      prototype: Option<ObjId>|
   -> Result<ObjId, Error> {
    let ctor = alloc_native(heap, fp, name, length, call, construct);
    if let Some(proto) = prototype {
      if let ObjectKind::Native(native) = &mut heap.get_mut(ctor)?.kind {
        native.prototype = Some(Value::Object(proto));
      }
      heap
        .get_mut(proto)?
        .props
        .set("constructor", Value::Object(ctor));
    }
    intrinsics.register_builtin_constructor(ctor);
    heap.env_declare_let(global_env, name, Value::Object(ctor))?;
    Ok(ctor)
  };

  let object_ctor = install_ctor(
    heap,
    intrinsics,
    "Object",
    1,
    object_constructor,
    Some(object_constructor),
    Some(object_prototype),
  )?;
  define_method(heap, object_ctor, fp, "keys", 1, object_keys)?;

  let array_ctor = install_ctor(
    heap,
    intrinsics,
    "Array",
    1,
    array_constructor,
    Some(array_constructor),
    Some(array_prototype),
  )?;
  define_method(heap, array_ctor, fp, "isArray", 1, array_is_array)?;

  install_ctor(
    heap,
    intrinsics,
    "String",
    1,
    string_constructor,
    None,
    Some(string_prototype),
  )?;
  install_ctor(
    heap,
    intrinsics,
    "Number",
    1,
    number_constructor,
    None,
    Some(number_prototype),
  )?;
  install_ctor(
    heap,
    intrinsics,
    "Boolean",
    1,
    boolean_constructor,
    None,
    Some(boolean_prototype),
  )?;
  install_ctor(
    heap,
    intrinsics,
    "RegExp",
    2,
    regexp_constructor,
    Some(regexp_constructor),
    Some(regexp_prototype),
  )?;

  let date_ctor = install_ctor(
    heap,
    intrinsics,
    "Date",
    0,
    date_constructor,
    Some(date_constructor),
    Some(date_prototype),
  )?;
  define_method(heap, date_ctor, fp, "now", 0, date_now)?;

  install_ctor(
    heap,
    intrinsics,
    "Error",
    1,
    error_constructor,
    Some(error_constructor),
    Some(error_prototype),
  )?;
  for (name, ctor_fn) in [
    ("TypeError", type_error_constructor as BuiltinFn),
    ("RangeError", range_error_constructor),
    ("ReferenceError", reference_error_constructor),
    ("SyntaxError", syntax_error_constructor),
  ] {
    let ctor = alloc_native(heap, fp, name, 1, ctor_fn, Some(ctor_fn));
    intrinsics.register_builtin_constructor(ctor);
    heap.env_declare_let(global_env, name, Value::Object(ctor))?;
  }

  let math = heap.alloc(JsObject::ordinary(Some(intrinsics.object_prototype)));
  define_method(heap, math, fp, "abs", 1, math_abs)?;
  define_method(heap, math, fp, "floor", 1, math_floor)?;
  define_method(heap, math, fp, "ceil", 1, math_ceil)?;
  define_method(heap, math, fp, "round", 1, math_round)?;
  define_method(heap, math, fp, "sqrt", 1, math_sqrt)?;
  define_method(heap, math, fp, "pow", 2, math_pow)?;
  define_method(heap, math, fp, "min", 2, math_min)?;
  define_method(heap, math, fp, "max", 2, math_max)?;
  heap
    .get_mut(math)?
    .props
    .set("PI", Value::Number(std::f64::consts::PI));
  heap
    .get_mut(math)?
    .props
    .set("E", Value::Number(std::f64::consts::E));
  heap.env_declare_let(global_env, "Math", Value::Object(math))?;

  let json = heap.alloc(JsObject::ordinary(Some(intrinsics.object_prototype)));
  define_method(heap, json, fp, "stringify", 1, json_stringify)?;
  define_method(heap, json, fp, "parse", 1, json_parse)?;
  heap.env_declare_let(global_env, "JSON", Value::Object(json))?;

  let console = heap.alloc(JsObject::ordinary(Some(intrinsics.object_prototype)));
  define_method(heap, console, fp, "log", 1, console_log)?;
  define_method(heap, console, fp, "warn", 1, console_warn)?;
  define_method(heap, console, fp, "error", 1, console_error)?;
  heap.env_declare_let(global_env, "console", Value::Object(console))?;

  for (name, length, f) in [
    ("parseInt", 2u32, global_parse_int as BuiltinFn),
    ("parseFloat", 1, global_parse_float),
    ("isNaN", 1, global_is_nan),
    ("isFinite", 1, global_is_finite),
  ] {
    let function = alloc_native(heap, fp, name, length, f, None);
    heap.env_declare_let(global_env, name, Value::Object(function))?;
  }

  heap.env_declare_let(global_env, "NaN", Value::Number(f64::NAN))?;
  heap.env_declare_let(global_env, "Infinity", Value::Number(f64::INFINITY))?;
  heap.env_declare_let(global_env, "undefined", Value::Undefined)?;

  // The function constructor is a dynamic-evaluation escape hatch; it is
  // replaced outright.
  heap.env_declare_let(global_env, "Function", Value::Undefined)?;

  // `eval` goes through the host's parse callback, when one is configured.
  let eval_fn = alloc_native(heap, fp, "eval", 1, global_eval, None);
  heap.env_declare_let(global_env, "eval", Value::Object(eval_fn))?;

  Ok(())
}

// Function.prototype ------------------------------------------------------

fn function_call(interp: &mut Interpreter, this: Value, args: &[Value]) -> Result<Value, Error> {
  let this_arg = args.first().cloned().unwrap_or(Value::Undefined);
  let rest = args.get(1..).unwrap_or(&[]);
  interp.call_value(this, this_arg, rest)
}

fn function_apply(interp: &mut Interpreter, this: Value, args: &[Value]) -> Result<Value, Error> {
  let this_arg = args.first().cloned().unwrap_or(Value::Undefined);
  let list = match args.get(1) {
    None | Some(Value::Undefined) | Some(Value::Null) => Vec::new(),
    Some(Value::Object(id)) => match &interp.heap.get(*id)?.kind {
      ObjectKind::Array(elements) => elements.clone(),
      _ => {
        return Err(interp.throw_type_error("CreateListFromArrayLike called on non-object"));
      }
    },
    Some(_) => {
      return Err(interp.throw_type_error("CreateListFromArrayLike called on non-object"));
    }
  };
  interp.call_value(this, this_arg, &list)
}

fn function_bind(interp: &mut Interpreter, this: Value, args: &[Value]) -> Result<Value, Error> {
  let Value::Object(id) = &this else {
    return Err(interp.throw_type_error("Value is not a function"));
  };
  let bound_this = args.first().cloned().unwrap_or(Value::Undefined);
  let extra_args: Vec<Value> = args.get(1..).unwrap_or(&[]).to_vec();

  if let Some(f) = interp.script_function(*id)? {
    // Binding a bound function extends the argument prefix but keeps the
    // original receiver.
    let (target, this_slot) = match f.bound_target {
      Some(target) => (target, f.bound_this.clone()),
      None => (*id, Some(bound_this)),
    };
    let mut combined = f.bound_args.to_vec();
    combined.extend(extra_args);

    let bound = crate::function::ScriptFunction {
      name: Rc::from(format!("bound {}", f.name)),
      params: f.params.clone(),
      body: f.body.clone(),
      env: f.env,
      self_name: None,
      is_arrow: f.is_arrow,
      prototype: None,
      bound_target: Some(target),
      bound_this: this_slot,
      bound_args: Rc::from(combined),
    };
    let bound = interp.heap.alloc(JsObject::new(
      ObjectKind::Function(bound),
      Some(interp.intrinsics.function_prototype),
    ));
    return Ok(Value::Object(bound));
  }

  if !interp.heap.get(*id)?.is_callable() {
    return Err(interp.throw_type_error("Value is not a function"));
  }

  // Native and host callables bind through a forwarding wrapper. The
  // wrapper ignores its caller-supplied receiver, so re-binding cannot
  // rebind `this`.
  let name = match interp.native_function(*id)? {
    Some(native) => format!("bound {}", native.name),
    None => "bound".to_string(),
  };
  let target = this.clone();
  let wrapper = NativeFunction {
    name: Rc::from(name.as_str()),
    length: 0,
    call: Rc::new(move |interp: &mut Interpreter, _this: Value, call_args: &[Value]| {
      let mut combined = extra_args.clone();
      combined.extend_from_slice(call_args);
      interp.call_value(target.clone(), bound_this.clone(), &combined)
    }),
    construct: None,
    prototype: None,
  };
  let wrapper = interp.heap.alloc(JsObject::new(
    ObjectKind::Native(wrapper),
    Some(interp.intrinsics.function_prototype),
  ));
  Ok(Value::Object(wrapper))
}

// Object ------------------------------------------------------------------

fn object_constructor(interp: &mut Interpreter, _this: Value, args: &[Value]) -> Result<Value, Error> {
  match args.first() {
    Some(value @ Value::Object(_)) => Ok(value.clone()),
    _ => Ok(interp.alloc_object()),
  }
}

fn object_keys(interp: &mut Interpreter, _this: Value, args: &[Value]) -> Result<Value, Error> {
  let target = args.first().cloned().unwrap_or(Value::Undefined);
  if !matches!(target, Value::Object(_)) {
    return Err(interp.throw_type_error("Object.keys called on non-object"));
  }
  let keys = interp
    .own_enumerable_keys(&target)?
    .into_iter()
    .map(Value::string)
    .collect();
  Ok(interp.alloc_array(keys))
}

// Array -------------------------------------------------------------------

fn array_constructor(interp: &mut Interpreter, _this: Value, args: &[Value]) -> Result<Value, Error> {
  if args.len() == 1 {
    if let Value::Number(n) = &args[0] {
      let length = ops::to_uint32(*n);
      if length as f64 != *n {
        return Err(interp.throw_range_error("Invalid array length"));
      }
      return Ok(interp.alloc_array(vec![Value::Undefined; length as usize]));
    }
  }
  Ok(interp.alloc_array(args.to_vec()))
}

fn array_is_array(interp: &mut Interpreter, _this: Value, args: &[Value]) -> Result<Value, Error> {
  let is_array = match args.first() {
    Some(Value::Object(id)) => matches!(interp.heap.get(*id)?.kind, ObjectKind::Array(_)),
    _ => false,
  };
  Ok(Value::Bool(is_array))
}

fn this_array(interp: &mut Interpreter, this: &Value) -> Result<ObjId, Error> {
  if let Value::Object(id) = this {
    if matches!(interp.heap.get(*id)?.kind, ObjectKind::Array(_)) {
      return Ok(*id);
    }
  }
  Err(interp.throw_type_error("Array.prototype method called on a non-array"))
}

fn array_elements(interp: &Interpreter, id: ObjId) -> Result<Vec<Value>, Error> {
  match &interp.heap.get(id)?.kind {
    ObjectKind::Array(elements) => Ok(elements.clone()),
    _ => Ok(Vec::new()),
  }
}

fn with_elements_mut<R>(
  interp: &mut Interpreter,
  id: ObjId,
  f: impl FnOnce(&mut Vec<Value>) -> R,
) -> Result<R, Error> {
  match &mut interp.heap.get_mut(id)?.kind {
    ObjectKind::Array(elements) => Ok(f(elements)),
    _ => Err(Error::InvalidHandle),
  }
}

fn array_push(interp: &mut Interpreter, this: Value, args: &[Value]) -> Result<Value, Error> {
  let id = this_array(interp, &this)?;
  let args = args.to_vec();
  let length = with_elements_mut(interp, id, |elements| {
    elements.extend(args);
    elements.len()
  })?;
  Ok(Value::Number(length as f64))
}

fn array_pop(interp: &mut Interpreter, this: Value, _args: &[Value]) -> Result<Value, Error> {
  let id = this_array(interp, &this)?;
  with_elements_mut(interp, id, |elements| {
    elements.pop().unwrap_or(Value::Undefined)
  })
}

fn array_shift(interp: &mut Interpreter, this: Value, _args: &[Value]) -> Result<Value, Error> {
  let id = this_array(interp, &this)?;
  with_elements_mut(interp, id, |elements| {
    if elements.is_empty() {
      Value::Undefined
    } else {
      elements.remove(0)
    }
  })
}

fn array_unshift(interp: &mut Interpreter, this: Value, args: &[Value]) -> Result<Value, Error> {
  let id = this_array(interp, &this)?;
  let args = args.to_vec();
  let length = with_elements_mut(interp, id, |elements| {
    elements.splice(0..0, args);
    elements.len()
  })?;
  Ok(Value::Number(length as f64))
}

fn array_index_of(interp: &mut Interpreter, this: Value, args: &[Value]) -> Result<Value, Error> {
  let id = this_array(interp, &this)?;
  let elements = array_elements(interp, id)?;
  let needle = args.first().cloned().unwrap_or(Value::Undefined);
  let from = match args.get(1) {
    Some(v) => ops::to_number(&interp.heap, v)?.max(0.0) as usize,
    None => 0,
  };
  for (idx, element) in elements.iter().enumerate().skip(from) {
    if crate::value::strict_equal(element, &needle) {
      return Ok(Value::Number(idx as f64));
    }
  }
  Ok(Value::Number(-1.0))
}

fn array_join(interp: &mut Interpreter, this: Value, args: &[Value]) -> Result<Value, Error> {
  let id = this_array(interp, &this)?;
  let elements = array_elements(interp, id)?;
  let separator = match args.first() {
    None | Some(Value::Undefined) => ",".to_string(),
    Some(v) => ops::to_string_value(&interp.heap, v)?,
  };
  let mut parts = Vec::with_capacity(elements.len());
  for element in &elements {
    parts.push(ops::element_to_string(
      &interp.heap,
      element,
      &mut vec![id],
    )?);
  }
  Ok(Value::string(parts.join(&separator)))
}

fn array_slice(interp: &mut Interpreter, this: Value, args: &[Value]) -> Result<Value, Error> {
  let id = this_array(interp, &this)?;
  let elements = array_elements(interp, id)?;
  let len = elements.len() as i64;
  let start = slice_bound(interp, args.first(), 0, len)?;
  let end = slice_bound(interp, args.get(1), len, len)?;
  let slice = if start < end {
    elements[start as usize..end as usize].to_vec()
  } else {
    Vec::new()
  };
  Ok(interp.alloc_array(slice))
}

fn slice_bound(
  interp: &Interpreter,
  arg: Option<&Value>,
  default: i64,
  len: i64,
) -> Result<i64, Error> {
  let raw = match arg {
    None | Some(Value::Undefined) => return Ok(default),
    Some(v) => ops::to_number(&interp.heap, v)?,
  };
  let raw = if raw.is_nan() { 0.0 } else { raw.trunc() };
  let idx = raw as i64;
  Ok(if idx < 0 {
    (len + idx).max(0)
  } else {
    idx.min(len)
  })
}

fn array_concat(interp: &mut Interpreter, this: Value, args: &[Value]) -> Result<Value, Error> {
  let id = this_array(interp, &this)?;
  let mut combined = array_elements(interp, id)?;
  for arg in args {
    match arg {
      Value::Object(other) if matches!(interp.heap.get(*other)?.kind, ObjectKind::Array(_)) => {
        combined.extend(array_elements(interp, *other)?);
      }
      other => combined.push(other.clone()),
    }
  }
  Ok(interp.alloc_array(combined))
}

fn array_map(interp: &mut Interpreter, this: Value, args: &[Value]) -> Result<Value, Error> {
  let id = this_array(interp, &this)?;
  let callback = args.first().cloned().unwrap_or(Value::Undefined);
  let this_arg = args.get(1).cloned().unwrap_or(Value::Undefined);
  let elements = array_elements(interp, id)?;
  let mut mapped = Vec::with_capacity(elements.len());
  for (idx, element) in elements.into_iter().enumerate() {
    mapped.push(interp.call_value(
      callback.clone(),
      this_arg.clone(),
      &[element, Value::Number(idx as f64), this.clone()],
    )?);
  }
  Ok(interp.alloc_array(mapped))
}

fn array_filter(interp: &mut Interpreter, this: Value, args: &[Value]) -> Result<Value, Error> {
  let id = this_array(interp, &this)?;
  let callback = args.first().cloned().unwrap_or(Value::Undefined);
  let this_arg = args.get(1).cloned().unwrap_or(Value::Undefined);
  let elements = array_elements(interp, id)?;
  let mut kept = Vec::new();
  for (idx, element) in elements.into_iter().enumerate() {
    let keep = interp.call_value(
      callback.clone(),
      this_arg.clone(),
      &[element.clone(), Value::Number(idx as f64), this.clone()],
    )?;
    if ops::to_boolean(&keep) {
      kept.push(element);
    }
  }
  Ok(interp.alloc_array(kept))
}

fn array_for_each(interp: &mut Interpreter, this: Value, args: &[Value]) -> Result<Value, Error> {
  let id = this_array(interp, &this)?;
  let callback = args.first().cloned().unwrap_or(Value::Undefined);
  let this_arg = args.get(1).cloned().unwrap_or(Value::Undefined);
  let elements = array_elements(interp, id)?;
  for (idx, element) in elements.into_iter().enumerate() {
    interp.call_value(
      callback.clone(),
      this_arg.clone(),
      &[element, Value::Number(idx as f64), this.clone()],
    )?;
  }
  Ok(Value::Undefined)
}

// String ------------------------------------------------------------------

fn string_constructor(interp: &mut Interpreter, _this: Value, args: &[Value]) -> Result<Value, Error> {
  match args.first() {
    None => Ok(Value::string("")),
    Some(v) => Ok(Value::string(ops::to_string_value(&interp.heap, v)?)),
  }
}

fn this_string(interp: &Interpreter, this: &Value) -> Result<String, Error> {
  ops::to_string_value(&interp.heap, this)
}

fn arg_index(interp: &Interpreter, args: &[Value], at: usize) -> Result<usize, Error> {
  let n = match args.get(at) {
    None | Some(Value::Undefined) => 0.0,
    Some(v) => ops::to_number(&interp.heap, v)?,
  };
  Ok(if n.is_nan() || n < 0.0 { 0 } else { n as usize })
}

fn string_char_at(interp: &mut Interpreter, this: Value, args: &[Value]) -> Result<Value, Error> {
  let s = this_string(interp, &this)?;
  let idx = arg_index(interp, args, 0)?;
  Ok(match s.chars().nth(idx) {
    Some(c) => Value::string(c.to_string()),
    None => Value::string(""),
  })
}

fn string_char_code_at(interp: &mut Interpreter, this: Value, args: &[Value]) -> Result<Value, Error> {
  let s = this_string(interp, &this)?;
  let idx = arg_index(interp, args, 0)?;
  Ok(match s.encode_utf16().nth(idx) {
    Some(unit) => Value::Number(unit as f64),
    None => Value::Number(f64::NAN),
  })
}

fn string_index_of(interp: &mut Interpreter, this: Value, args: &[Value]) -> Result<Value, Error> {
  let s = this_string(interp, &this)?;
  let needle = match args.first() {
    Some(v) => ops::to_string_value(&interp.heap, v)?,
    None => return Ok(Value::Number(-1.0)),
  };
  let chars: Vec<char> = s.chars().collect();
  let needle_chars: Vec<char> = needle.chars().collect();
  let from = arg_index(interp, args, 1)?;
  if needle_chars.is_empty() {
    return Ok(Value::Number(from.min(chars.len()) as f64));
  }
  let mut idx = from;
  while idx + needle_chars.len() <= chars.len() {
    if chars[idx..idx + needle_chars.len()] == needle_chars[..] {
      return Ok(Value::Number(idx as f64));
    }
    idx += 1;
  }
  Ok(Value::Number(-1.0))
}

fn string_last_index_of(interp: &mut Interpreter, this: Value, args: &[Value]) -> Result<Value, Error> {
  let s = this_string(interp, &this)?;
  let needle = match args.first() {
    Some(v) => ops::to_string_value(&interp.heap, v)?,
    None => return Ok(Value::Number(-1.0)),
  };
  let chars: Vec<char> = s.chars().collect();
  let needle_chars: Vec<char> = needle.chars().collect();
  if needle_chars.is_empty() {
    return Ok(Value::Number(chars.len() as f64));
  }
  if needle_chars.len() > chars.len() {
    return Ok(Value::Number(-1.0));
  }
  for idx in (0..=chars.len() - needle_chars.len()).rev() {
    if chars[idx..idx + needle_chars.len()] == needle_chars[..] {
      return Ok(Value::Number(idx as f64));
    }
  }
  Ok(Value::Number(-1.0))
}

fn string_slice(interp: &mut Interpreter, this: Value, args: &[Value]) -> Result<Value, Error> {
  let s = this_string(interp, &this)?;
  let chars: Vec<char> = s.chars().collect();
  let len = chars.len() as i64;
  let start = slice_bound(interp, args.first(), 0, len)?;
  let end = slice_bound(interp, args.get(1), len, len)?;
  let out: String = if start < end {
    chars[start as usize..end as usize].iter().collect()
  } else {
    String::new()
  };
  Ok(Value::string(out))
}

fn string_substring(interp: &mut Interpreter, this: Value, args: &[Value]) -> Result<Value, Error> {
  let s = this_string(interp, &this)?;
  let chars: Vec<char> = s.chars().collect();
  let len = chars.len() as i64;
  let mut start = slice_bound(interp, args.first(), 0, len)?;
  let mut end = slice_bound(interp, args.get(1), len, len)?;
  // Unlike slice, substring swaps out-of-order bounds.
  if start > end {
    std::mem::swap(&mut start, &mut end);
  }
  let out: String = chars[start as usize..end as usize].iter().collect();
  Ok(Value::string(out))
}

fn string_split(interp: &mut Interpreter, this: Value, args: &[Value]) -> Result<Value, Error> {
  let s = this_string(interp, &this)?;
  let parts: Vec<Value> = match args.first() {
    None | Some(Value::Undefined) => vec![Value::string(s)],
    Some(v) => {
      let separator = ops::to_string_value(&interp.heap, v)?;
      if separator.is_empty() {
        s.chars().map(|c| Value::string(c.to_string())).collect()
      } else {
        s.split(&separator).map(Value::string).collect()
      }
    }
  };
  Ok(interp.alloc_array(parts))
}

fn string_to_upper_case(interp: &mut Interpreter, this: Value, _args: &[Value]) -> Result<Value, Error> {
  let s = this_string(interp, &this)?;
  Ok(Value::string(s.to_uppercase()))
}

fn string_to_lower_case(interp: &mut Interpreter, this: Value, _args: &[Value]) -> Result<Value, Error> {
  let s = this_string(interp, &this)?;
  Ok(Value::string(s.to_lowercase()))
}

fn string_trim(interp: &mut Interpreter, this: Value, _args: &[Value]) -> Result<Value, Error> {
  let s = this_string(interp, &this)?;
  Ok(Value::string(s.trim()))
}

fn string_concat(interp: &mut Interpreter, this: Value, args: &[Value]) -> Result<Value, Error> {
  let mut s = this_string(interp, &this)?;
  for arg in args {
    s.push_str(&ops::to_string_value(&interp.heap, arg)?);
  }
  Ok(Value::string(s))
}

fn string_to_string(interp: &mut Interpreter, this: Value, _args: &[Value]) -> Result<Value, Error> {
  Ok(Value::string(this_string(interp, &this)?))
}

// Number / Boolean --------------------------------------------------------

fn number_constructor(interp: &mut Interpreter, _this: Value, args: &[Value]) -> Result<Value, Error> {
  match args.first() {
    None => Ok(Value::Number(0.0)),
    Some(v) => Ok(Value::Number(ops::to_number(&interp.heap, v)?)),
  }
}

fn boolean_constructor(_interp: &mut Interpreter, _this: Value, args: &[Value]) -> Result<Value, Error> {
  Ok(Value::Bool(
    args.first().map(ops::to_boolean).unwrap_or(false),
  ))
}

fn number_to_fixed(interp: &mut Interpreter, this: Value, args: &[Value]) -> Result<Value, Error> {
  let n = ops::to_number(&interp.heap, &this)?;
  let digits = match args.first() {
    None | Some(Value::Undefined) => 0,
    Some(v) => {
      let d = ops::to_number(&interp.heap, v)?;
      if !(0.0..=100.0).contains(&d) {
        return Err(interp.throw_range_error("toFixed() digits argument must be between 0 and 100"));
      }
      d as usize
    }
  };
  Ok(Value::string(format!("{n:.digits$}")))
}

fn number_to_string_method(interp: &mut Interpreter, this: Value, args: &[Value]) -> Result<Value, Error> {
  let n = ops::to_number(&interp.heap, &this)?;
  let radix = match args.first() {
    None | Some(Value::Undefined) => 10,
    Some(v) => ops::to_number(&interp.heap, v)? as u32,
  };
  if radix == 10 {
    return Ok(Value::string(ops::number_to_string(n)));
  }
  if !(2..=36).contains(&radix) {
    return Err(interp.throw_range_error("toString() radix must be between 2 and 36"));
  }
  Ok(Value::string(to_radix_string(n, radix)))
}

fn to_radix_string(n: f64, radix: u32) -> String {
  if n.is_nan() {
    return "NaN".to_string();
  }
  if n.is_infinite() {
    return if n < 0.0 { "-Infinity" } else { "Infinity" }.to_string();
  }
  const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
  let negative = n < 0.0;
  let mut int_part = n.abs().trunc();
  let mut fraction = n.abs() - int_part;

  let mut digits = Vec::new();
  if int_part == 0.0 {
    digits.push(b'0');
  }
  while int_part >= 1.0 {
    let digit = (int_part % radix as f64) as usize;
    digits.push(DIGITS[digit]);
    int_part = (int_part / radix as f64).trunc();
  }
  digits.reverse();

  let mut out = String::new();
  if negative {
    out.push('-');
  }
  out.push_str(&String::from_utf8_lossy(&digits));

  if fraction > 0.0 {
    out.push('.');
    for _ in 0..20 {
      fraction *= radix as f64;
      let digit = fraction.trunc() as usize;
      out.push(DIGITS[digit.min(35)] as char);
      fraction -= fraction.trunc();
      if fraction <= 0.0 {
        break;
      }
    }
  }
  out
}

// Math --------------------------------------------------------------------

fn math_arg(interp: &Interpreter, args: &[Value], at: usize) -> Result<f64, Error> {
  match args.get(at) {
    Some(v) => ops::to_number(&interp.heap, v),
    None => Ok(f64::NAN),
  }
}

fn math_abs(interp: &mut Interpreter, _this: Value, args: &[Value]) -> Result<Value, Error> {
  Ok(Value::Number(math_arg(interp, args, 0)?.abs()))
}

fn math_floor(interp: &mut Interpreter, _this: Value, args: &[Value]) -> Result<Value, Error> {
  Ok(Value::Number(math_arg(interp, args, 0)?.floor()))
}

fn math_ceil(interp: &mut Interpreter, _this: Value, args: &[Value]) -> Result<Value, Error> {
  Ok(Value::Number(math_arg(interp, args, 0)?.ceil()))
}

fn math_round(interp: &mut Interpreter, _this: Value, args: &[Value]) -> Result<Value, Error> {
  let n = math_arg(interp, args, 0)?;
  Ok(Value::Number((n + 0.5).floor()))
}

fn math_sqrt(interp: &mut Interpreter, _this: Value, args: &[Value]) -> Result<Value, Error> {
  Ok(Value::Number(math_arg(interp, args, 0)?.sqrt()))
}

fn math_pow(interp: &mut Interpreter, _this: Value, args: &[Value]) -> Result<Value, Error> {
  let base = math_arg(interp, args, 0)?;
  let exponent = math_arg(interp, args, 1)?;
  Ok(Value::Number(base.powf(exponent)))
}

fn math_min(interp: &mut Interpreter, _this: Value, args: &[Value]) -> Result<Value, Error> {
  let mut result = f64::INFINITY;
  for arg in args {
    let n = ops::to_number(&interp.heap, arg)?;
    if n.is_nan() {
      return Ok(Value::Number(f64::NAN));
    }
    result = result.min(n);
  }
  Ok(Value::Number(result))
}

fn math_max(interp: &mut Interpreter, _this: Value, args: &[Value]) -> Result<Value, Error> {
  let mut result = f64::NEG_INFINITY;
  for arg in args {
    let n = ops::to_number(&interp.heap, arg)?;
    if n.is_nan() {
      return Ok(Value::Number(f64::NAN));
    }
    result = result.max(n);
  }
  Ok(Value::Number(result))
}

// JSON --------------------------------------------------------------------

fn json_stringify(interp: &mut Interpreter, _this: Value, args: &[Value]) -> Result<Value, Error> {
  let value = args.first().cloned().unwrap_or(Value::Undefined);
  let mut seen = Vec::new();
  match json_encode(interp, &value, &mut seen)? {
    None => Ok(Value::Undefined),
    Some(json) => Ok(Value::string(json.to_string())),
  }
}

fn json_encode(
  interp: &mut Interpreter,
  value: &Value,
  seen: &mut Vec<ObjId>,
) -> Result<Option<serde_json::Value>, Error> {
  Ok(match value {
    Value::Undefined => None,
    Value::Null => Some(serde_json::Value::Null),
    Value::Bool(b) => Some(serde_json::Value::Bool(*b)),
    Value::Number(n) => {
      // Integral values serialize without a fractional part, the way a
      // JavaScript-side stringify would print them.
      Some(if n.fract() == 0.0 && *n >= i64::MIN as f64 && *n <= i64::MAX as f64 {
        serde_json::Value::Number(serde_json::Number::from(*n as i64))
      } else {
        match serde_json::Number::from_f64(*n) {
          Some(n) => serde_json::Value::Number(n),
          // Non-finite numbers serialize as null.
          None => serde_json::Value::Null,
        }
      })
    }
    Value::String(s) => Some(serde_json::Value::String(s.to_string())),
    Value::Object(id) => {
      if seen.contains(id) {
        return Err(interp.throw_type_error("Converting circular structure to JSON"));
      }
      enum Shape {
        Array(Vec<Value>),
        Plain(Vec<String>),
        Skip,
      }
      let shape = match &interp.heap.get(*id)?.kind {
        ObjectKind::Array(elements) => Shape::Array(elements.clone()),
        ObjectKind::Function(_) | ObjectKind::Native(_) => Shape::Skip,
        _ => Shape::Plain(interp.own_enumerable_keys(value)?),
      };
      match shape {
        Shape::Skip => None,
        Shape::Array(elements) => {
          seen.push(*id);
          let mut out = Vec::with_capacity(elements.len());
          for element in &elements {
            out.push(
              json_encode(interp, element, seen)?.unwrap_or(serde_json::Value::Null),
            );
          }
          seen.pop();
          Some(serde_json::Value::Array(out))
        }
        Shape::Plain(keys) => {
          seen.push(*id);
          let mut out = serde_json::Map::new();
          for key in keys {
            let member = interp
              .own_property_value(value, &key)?
              .unwrap_or(Value::Undefined);
            if let Some(encoded) = json_encode(interp, &member, seen)? {
              out.insert(key, encoded);
            }
          }
          seen.pop();
          Some(serde_json::Value::Object(out))
        }
      }
    }
  })
}

fn json_parse(interp: &mut Interpreter, _this: Value, args: &[Value]) -> Result<Value, Error> {
  let text = match args.first() {
    Some(v) => ops::to_string_value(&interp.heap, v)?,
    None => return Err(interp.throw_syntax_error("Unexpected end of JSON input")),
  };
  let parsed: serde_json::Value = match serde_json::from_str(&text) {
    Ok(parsed) => parsed,
    Err(err) => {
      let message = format!("Unexpected token in JSON at position {}", err.column());
      return Err(interp.throw_syntax_error(&message));
    }
  };
  Ok(json_decode(interp, &parsed))
}

fn json_decode(interp: &mut Interpreter, json: &serde_json::Value) -> Value {
  match json {
    serde_json::Value::Null => Value::Null,
    serde_json::Value::Bool(b) => Value::Bool(*b),
    serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
    serde_json::Value::String(s) => Value::string(s),
    serde_json::Value::Array(items) => {
      let elements = items.iter().map(|item| json_decode(interp, item)).collect();
      interp.alloc_array(elements)
    }
    serde_json::Value::Object(entries) => {
      let object = interp.alloc_object();
      for (key, item) in entries {
        let member = json_decode(interp, item);
        if let Value::Object(id) = &object {
          if let Ok(obj) = interp.heap.get_mut(*id) {
            obj.props.set(key, member);
          }
        }
      }
      object
    }
  }
}

// Error family ------------------------------------------------------------

fn make_error(interp: &mut Interpreter, name: &str, args: &[Value]) -> Result<Value, Error> {
  let message = match args.first() {
    None | Some(Value::Undefined) => String::new(),
    Some(v) => ops::to_string_value(&interp.heap, v)?,
  };
  // All error objects share one prototype; the constructor stamps the name.
  Ok(interp.make_error_object(name, &message))
}

fn error_constructor(interp: &mut Interpreter, _this: Value, args: &[Value]) -> Result<Value, Error> {
  make_error(interp, "Error", args)
}

fn type_error_constructor(interp: &mut Interpreter, _this: Value, args: &[Value]) -> Result<Value, Error> {
  make_error(interp, "TypeError", args)
}

fn range_error_constructor(interp: &mut Interpreter, _this: Value, args: &[Value]) -> Result<Value, Error> {
  make_error(interp, "RangeError", args)
}

fn reference_error_constructor(interp: &mut Interpreter, _this: Value, args: &[Value]) -> Result<Value, Error> {
  make_error(interp, "ReferenceError", args)
}

fn syntax_error_constructor(interp: &mut Interpreter, _this: Value, args: &[Value]) -> Result<Value, Error> {
  make_error(interp, "SyntaxError", args)
}

fn error_to_string(interp: &mut Interpreter, this: Value, _args: &[Value]) -> Result<Value, Error> {
  let name = interp.get_member_raw(&this, "name")?;
  let name = ops::to_string_value(&interp.heap, &name)?;
  let message = interp.get_member_raw(&this, "message")?;
  let message = ops::to_string_value(&interp.heap, &message)?;
  Ok(Value::string(if message.is_empty() {
    name
  } else {
    format!("{name}: {message}")
  }))
}

// RegExp / Date -----------------------------------------------------------

fn regexp_constructor(interp: &mut Interpreter, _this: Value, args: &[Value]) -> Result<Value, Error> {
  let pattern = match args.first() {
    None | Some(Value::Undefined) => String::new(),
    Some(Value::Object(id)) => match &interp.heap.get(*id)?.kind {
      ObjectKind::Regex { pattern, .. } => pattern.to_string(),
      _ => ops::to_string_value(&interp.heap, &args[0])?,
    },
    Some(v) => ops::to_string_value(&interp.heap, v)?,
  };
  let flags = match args.get(1) {
    None | Some(Value::Undefined) => String::new(),
    Some(v) => ops::to_string_value(&interp.heap, v)?,
  };
  let id = interp.heap.alloc(JsObject::new(
    ObjectKind::Regex {
      pattern: Rc::from(pattern.as_str()),
      flags: Rc::from(flags.as_str()),
    },
    Some(interp.intrinsics.regexp_prototype),
  ));
  Ok(Value::Object(id))
}

fn epoch_millis() -> f64 {
  match SystemTime::now().duration_since(UNIX_EPOCH) {
    Ok(elapsed) => elapsed.as_millis() as f64,
    Err(_) => 0.0,
  }
}

fn date_now(_interp: &mut Interpreter, _this: Value, _args: &[Value]) -> Result<Value, Error> {
  Ok(Value::Number(epoch_millis()))
}

fn date_constructor(interp: &mut Interpreter, _this: Value, args: &[Value]) -> Result<Value, Error> {
  let millis = match args.first() {
    Some(v) => ops::to_number(&interp.heap, v)?,
    None => epoch_millis(),
  };
  let id = interp
    .heap
    .alloc(JsObject::ordinary(Some(interp.intrinsics.date_prototype)));
  interp
    .heap
    .get_mut(id)?
    .props
    .set("__ms", Value::Number(millis));
  Ok(Value::Object(id))
}

fn date_get_time(interp: &mut Interpreter, this: Value, _args: &[Value]) -> Result<Value, Error> {
  let millis = interp.get_member_raw(&this, "__ms")?;
  Ok(Value::Number(ops::to_number(&interp.heap, &millis)?))
}

// console -----------------------------------------------------------------

fn console_message(interp: &Interpreter, args: &[Value]) -> Result<String, Error> {
  let mut parts = Vec::with_capacity(args.len());
  for arg in args {
    parts.push(ops::to_string_value(&interp.heap, arg)?);
  }
  Ok(parts.join(" "))
}

fn console_log(interp: &mut Interpreter, _this: Value, args: &[Value]) -> Result<Value, Error> {
  let message = console_message(interp, args)?;
  tracing::info!(target: "interp_js::console", "{message}");
  Ok(Value::Undefined)
}

fn console_warn(interp: &mut Interpreter, _this: Value, args: &[Value]) -> Result<Value, Error> {
  let message = console_message(interp, args)?;
  tracing::warn!(target: "interp_js::console", "{message}");
  Ok(Value::Undefined)
}

fn console_error(interp: &mut Interpreter, _this: Value, args: &[Value]) -> Result<Value, Error> {
  let message = console_message(interp, args)?;
  tracing::error!(target: "interp_js::console", "{message}");
  Ok(Value::Undefined)
}

// Free functions ----------------------------------------------------------

fn global_parse_int(interp: &mut Interpreter, _this: Value, args: &[Value]) -> Result<Value, Error> {
  let text = match args.first() {
    Some(v) => ops::to_string_value(&interp.heap, v)?,
    None => return Ok(Value::Number(f64::NAN)),
  };
  let mut radix = match args.get(1) {
    None | Some(Value::Undefined) => 0u32,
    Some(v) => ops::to_int32(ops::to_number(&interp.heap, v)?).max(0) as u32,
  };

  let mut rest = text.trim_start();
  let mut sign = 1.0;
  if let Some(stripped) = rest.strip_prefix('-') {
    sign = -1.0;
    rest = stripped;
  } else if let Some(stripped) = rest.strip_prefix('+') {
    rest = stripped;
  }
  if radix == 0 || radix == 16 {
    if let Some(stripped) = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
      rest = stripped;
      radix = 16;
    } else if radix == 0 {
      radix = 10;
    }
  }
  if !(2..=36).contains(&radix) {
    return Ok(Value::Number(f64::NAN));
  }

  let mut value = 0.0f64;
  let mut any = false;
  for c in rest.chars() {
    match c.to_digit(radix) {
      Some(digit) => {
        value = value * radix as f64 + digit as f64;
        any = true;
      }
      None => break,
    }
  }
  Ok(Value::Number(if any { sign * value } else { f64::NAN }))
}

fn global_parse_float(interp: &mut Interpreter, _this: Value, args: &[Value]) -> Result<Value, Error> {
  let text = match args.first() {
    Some(v) => ops::to_string_value(&interp.heap, v)?,
    None => return Ok(Value::Number(f64::NAN)),
  };
  Ok(Value::Number(parse_float_prefix(text.trim_start())))
}

/// Parses the longest numeric-literal prefix, the way `parseFloat` does.
fn parse_float_prefix(s: &str) -> f64 {
  for prefix in ["Infinity", "+Infinity"] {
    if s.starts_with(prefix) {
      return f64::INFINITY;
    }
  }
  if s.starts_with("-Infinity") {
    return f64::NEG_INFINITY;
  }

  let bytes = s.as_bytes();
  let mut end = 0;
  if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
    end += 1;
  }
  let mut saw_digit = false;
  while end < bytes.len() && bytes[end].is_ascii_digit() {
    end += 1;
    saw_digit = true;
  }
  if end < bytes.len() && bytes[end] == b'.' {
    end += 1;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
      end += 1;
      saw_digit = true;
    }
  }
  if !saw_digit {
    return f64::NAN;
  }
  // Exponent part, only when complete.
  if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
    let mut exp_end = end + 1;
    if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
      exp_end += 1;
    }
    let digits_start = exp_end;
    while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
      exp_end += 1;
    }
    if exp_end > digits_start {
      end = exp_end;
    }
  }
  s[..end].parse::<f64>().unwrap_or(f64::NAN)
}

fn global_is_nan(interp: &mut Interpreter, _this: Value, args: &[Value]) -> Result<Value, Error> {
  let n = match args.first() {
    Some(v) => ops::to_number(&interp.heap, v)?,
    None => f64::NAN,
  };
  Ok(Value::Bool(n.is_nan()))
}

fn global_is_finite(interp: &mut Interpreter, _this: Value, args: &[Value]) -> Result<Value, Error> {
  let n = match args.first() {
    Some(v) => ops::to_number(&interp.heap, v)?,
    None => f64::NAN,
  };
  Ok(Value::Bool(n.is_finite()))
}

/// The gated dynamic-evaluation primitive. Parses through the host callback
/// and evaluates the result against the global frame, sharing the running
/// operation budget.
fn global_eval(interp: &mut Interpreter, _this: Value, args: &[Value]) -> Result<Value, Error> {
  let source = match args.first() {
    Some(Value::String(source)) => source.to_string(),
    // A non-string argument is returned unchanged.
    Some(other) => return Ok(other.clone()),
    None => return Ok(Value::Undefined),
  };
  let Some(parse) = interp.parse.clone() else {
    return Err(interp.throw_error("EvalError", "eval() is not supported without a parser"));
  };
  tracing::debug!(bytes = source.len(), "dynamic eval");
  let program = match parse(&source) {
    Ok(program) => program,
    Err(message) => return Err(interp.throw_syntax_error(&message)),
  };
  interp.eval_program(&program)
}
