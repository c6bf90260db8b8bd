use crate::native::NativeFn;
use crate::value::{EnvId, JsStr, ObjId, Value};
use ast_js::{BlockStmt, Expr};
use std::rc::Rc;

/// The executable body of a script function.
///
/// Bodies are shared out of the program tree at materialisation time so that
/// function values can outlive the `evaluate` call that created them (stored
/// in a global, handed to the host as a callback, invoked by a later
/// evaluation).
#[derive(Debug, Clone)]
pub(crate) enum FunctionBody {
  Block(Rc<BlockStmt>),
  /// Arrow function expression body.
  Expr(Rc<Expr>),
}

/// A user-defined function: parameter list, body, and captured scope.
#[derive(Debug, Clone)]
pub(crate) struct ScriptFunction {
  /// `name` metadata (declaration/expression identifier, or "").
  pub(crate) name: JsStr,
  pub(crate) params: Rc<[JsStr]>,
  pub(crate) body: FunctionBody,
  /// The lexical environment in effect at creation.
  pub(crate) env: EnvId,
  /// Present for named function expressions; bound to the function itself in
  /// each invocation frame.
  pub(crate) self_name: Option<JsStr>,
  /// Arrow functions take `this` and `arguments` from the captured scope and
  /// are not constructible.
  pub(crate) is_arrow: bool,
  /// The function's `prototype` property. `None` for arrows and bound
  /// functions.
  pub(crate) prototype: Option<Value>,

  // Bound-function slots. `bind` produces a variant that forwards to its
  // unbound original, prepending `bound_args`; its own `bind` extends the
  // argument prefix but never rebinds `this`.
  pub(crate) bound_target: Option<ObjId>,
  pub(crate) bound_this: Option<Value>,
  pub(crate) bound_args: Rc<[Value]>,
}

impl ScriptFunction {
  pub(crate) fn is_bound(&self) -> bool {
    self.bound_target.is_some()
  }
}

/// A host-implemented function exposed to scripts.
///
/// `call` always exists; `construct` exists only for host constructors.
#[derive(Clone)]
pub(crate) struct NativeFunction {
  pub(crate) name: JsStr,
  pub(crate) length: u32,
  pub(crate) call: NativeFn,
  pub(crate) construct: Option<NativeFn>,
  /// The `prototype` property, used by `new` and `instanceof`.
  pub(crate) prototype: Option<Value>,
}

impl std::fmt::Debug for NativeFunction {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("NativeFunction")
      .field("name", &self.name)
      .field("length", &self.length)
      .field("constructible", &self.construct.is_some())
      .finish()
  }
}
