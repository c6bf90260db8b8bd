use crate::error::Error;
use crate::interpreter::Interpreter;
use crate::value::Value;
use std::rc::Rc;

/// A host-implemented `[[Call]]` entrypoint.
///
/// Natives receive the interpreter itself, so a host function holding a
/// script-function argument can re-enter evaluation through
/// [`Interpreter::call_function`]. This is the host-invocable adapter around
/// script callables. Each re-entry opens a fresh function frame and
/// participates in the operation budget.
pub type NativeFn = Rc<dyn Fn(&mut Interpreter, Value, &[Value]) -> Result<Value, Error>>;

/// An opaque host value exposed to scripts.
///
/// The interpreter never introspects a host object beyond these hooks:
/// member reads and writes are forwarded here, calls go through `call` /
/// `construct`, and `for … in` / spread use `keys`. All hooks default to the
/// inert behavior, so a capability token can be exposed with an empty impl.
pub trait HostObject {
  /// A member read forwarded by the script. `None` reads as undefined.
  fn get(&self, _name: &str) -> Option<Value> {
    None
  }

  /// A member write forwarded by the script. Returning `false` silently
  /// drops the write (the script cannot observe the difference).
  fn set(&self, _name: &str, _value: Value) -> bool {
    false
  }

  /// Own enumerable keys, for `for … in` and object spread.
  fn keys(&self) -> Vec<String> {
    Vec::new()
  }

  /// Whether calls dispatch to [`HostObject::call`]. Also decides the
  /// `typeof` tag: callable host objects report `"function"`.
  fn is_callable(&self) -> bool {
    false
  }

  fn call(
    &self,
    interp: &mut Interpreter,
    _this: Value,
    _args: &[Value],
  ) -> Result<Value, Error> {
    Err(interp.throw_type_error("Value is not a function"))
  }

  fn construct(&self, interp: &mut Interpreter, _args: &[Value]) -> Result<Value, Error> {
    Err(interp.throw_type_error("Value is not a constructor"))
  }
}

impl std::fmt::Debug for dyn HostObject {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str("HostObject")
  }
}
