use crate::builtins;
use crate::error::Error;
use crate::function::NativeFunction;
use crate::heap::{EnvKind, Heap};
use crate::intrinsics::Intrinsics;
use crate::native::HostObject;
use crate::object::{JsObject, ObjectKind};
use crate::ops;
use crate::value::{EnvId, Value};
use ast_js::Program;
use std::rc::Rc;

/// Turns a source string into a program tree, enabling dynamic `eval`.
///
/// The interpreter itself never parses; the host decides whether (and how)
/// scripts may evaluate strings. An `Err` is surfaced to the script as a
/// SyntaxError.
pub type ParseFn = Rc<dyn Fn(&str) -> Result<Program, String>>;

/// Construction-time interpreter options.
#[derive(Default, Clone)]
pub struct InterpreterOptions {
  /// Ceiling on node evaluations per top-level `evaluate` call.
  /// `None` is unbounded.
  pub max_ops: Option<u64>,
  /// Ceiling on nested script-function invocations. `None` picks the
  /// default (256).
  pub max_call_depth: Option<usize>,
  /// Parser callback backing the `eval` global.
  pub parse: Option<ParseFn>,
}

const DEFAULT_MAX_CALL_DEPTH: usize = 256;

/// Synchronous-only execution budget: one tick per node evaluation.
#[derive(Debug, Clone)]
pub(crate) struct OpBudget {
  used: u64,
  limit: Option<u64>,
}

impl OpBudget {
  fn new(limit: Option<u64>) -> Self {
    Self { used: 0, limit }
  }

  pub(crate) fn reset(&mut self) {
    self.used = 0;
  }

  #[inline]
  pub(crate) fn tick(&mut self) -> Result<(), Error> {
    self.used += 1;
    match self.limit {
      Some(limit) if self.used > limit => Err(Error::Timeout),
      _ => Ok(()),
    }
  }
}

/// An ES5 AST interpreter instance.
///
/// Owns the global frame, the heap every allocation lives in, and the
/// operation budget. Multiple `evaluate` calls share the global frame;
/// embedders that need isolation between scripts create distinct
/// interpreters. A single instance must not be entered from multiple
/// threads.
pub struct Interpreter {
  pub(crate) heap: Heap,
  pub(crate) intrinsics: Intrinsics,
  pub(crate) global_env: EnvId,
  pub(crate) budget: OpBudget,
  pub(crate) parse: Option<ParseFn>,
  pub(crate) call_depth: usize,
  pub(crate) max_call_depth: usize,
}

impl Interpreter {
  /// Creates an interpreter with the default globals table installed.
  ///
  /// Host capabilities are merged over the defaults afterwards with
  /// [`Interpreter::global_set`] and the `alloc_*` helpers; a binding set by
  /// the host shadows the default of the same name.
  pub fn new(options: InterpreterOptions) -> Result<Self, Error> {
    let mut heap = Heap::new();
    let global_env = heap.env_alloc(None, EnvKind::Function);
    let mut intrinsics = builtins::bootstrap(&mut heap)?;
    builtins::install_globals(&mut heap, &mut intrinsics, global_env)?;
    Ok(Self {
      heap,
      intrinsics,
      global_env,
      budget: OpBudget::new(options.max_ops),
      parse: options.parse,
      call_depth: 0,
      max_call_depth: options.max_call_depth.unwrap_or(DEFAULT_MAX_CALL_DEPTH),
    })
  }

  /// Evaluates a program against the global frame and returns the value of
  /// its last expression statement (or its directive prologue, or
  /// undefined).
  ///
  /// Resets the operation counter; nested dynamic `eval` during the run
  /// shares the running counter instead.
  pub fn evaluate(&mut self, program: &Program) -> Result<Value, Error> {
    self.budget.reset();
    tracing::debug!(statements = program.body.len(), "evaluate");
    self.eval_program(program)
  }

  #[inline]
  pub(crate) fn tick(&mut self) -> Result<(), Error> {
    self.budget.tick()
  }

  /// Binds `name` in the global frame, shadowing any default of that name.
  pub fn global_set(&mut self, name: &str, value: Value) -> Result<(), Error> {
    self.heap.env_declare_let(self.global_env, name, value)
  }

  /// Reads a global binding. `None` means unbound (distinct from a binding
  /// holding undefined).
  pub fn global_get(&self, name: &str) -> Result<Option<Value>, Error> {
    self.heap.env_lookup(self.global_env, name)
  }

  /// Invokes a callable value from the host side. Script functions re-enter
  /// the evaluator with a fresh function frame; the call participates in
  /// the current operation budget.
  pub fn call_function(&mut self, callee: &Value, this: Value, args: &[Value]) -> Result<Value, Error> {
    self.call_value(callee.clone(), this, args)
  }

  /// `new`-constructs a callable value from the host side.
  pub fn construct(&mut self, callee: &Value, args: &[Value]) -> Result<Value, Error> {
    self.construct_value(callee.clone(), args)
  }

  /// Allocates an empty ordinary object.
  pub fn alloc_object(&mut self) -> Value {
    let id = self
      .heap
      .alloc(JsObject::ordinary(Some(self.intrinsics.object_prototype)));
    Value::Object(id)
  }

  /// Allocates an array object holding `elements`.
  pub fn alloc_array(&mut self, elements: Vec<Value>) -> Value {
    let id = self.heap.alloc(JsObject::new(
      ObjectKind::Array(elements),
      Some(self.intrinsics.array_prototype),
    ));
    Value::Object(id)
  }

  /// Allocates a host-implemented function.
  pub fn alloc_native_function(
    &mut self,
    name: &str,
    length: u32,
    call: impl Fn(&mut Interpreter, Value, &[Value]) -> Result<Value, Error> + 'static,
  ) -> Value {
    let function = NativeFunction {
      name: Rc::from(name),
      length,
      call: Rc::new(call),
      construct: None,
      prototype: None,
    };
    let id = self.heap.alloc(JsObject::new(
      ObjectKind::Native(function),
      Some(self.intrinsics.function_prototype),
    ));
    Value::Object(id)
  }

  /// Allocates an opaque host value. Member reads/writes on it are forwarded
  /// to the [`HostObject`] hooks.
  pub fn alloc_host_object(&mut self, host: Rc<dyn HostObject>) -> Value {
    let id = self.heap.alloc(JsObject::new(ObjectKind::Host(host), None));
    Value::Object(id)
  }

  /// Reads a property with script-visible member semantics (including the
  /// reflective-access filter).
  pub fn get_property(&mut self, target: &Value, name: &str) -> Result<Value, Error> {
    self.get_member(target, name)
  }

  /// Writes a property with script-visible member semantics.
  pub fn set_property(&mut self, target: &Value, name: &str, value: Value) -> Result<(), Error> {
    self.set_member(target, name, value)
  }

  /// `ToString` for host-side display of results.
  pub fn to_display_string(&self, value: &Value) -> Result<String, Error> {
    ops::to_string_value(&self.heap, value)
  }

  /// The message of a catchable thrown value: the `message` property of a
  /// thrown Error object, or the thrown string itself. `None` for
  /// non-throw errors and message-less values.
  pub fn exception_message(&self, error: &Error) -> Option<String> {
    let thrown = error.thrown()?;
    match thrown {
      Value::String(s) => Some(s.to_string()),
      Value::Object(id) => {
        let obj = self.heap.get(*id).ok()?;
        let message = obj.props.get("message")?;
        ops::to_string_value(&self.heap, message).ok()
      }
      other => ops::to_string_value(&self.heap, other).ok(),
    }
  }

  /// Allocates an Error-shaped object (`name` + `message`) on the error
  /// prototype.
  pub(crate) fn make_error_object(&mut self, name: &str, message: &str) -> Value {
    let id = self
      .heap
      .alloc(JsObject::ordinary(Some(self.intrinsics.error_prototype)));
    if let Ok(obj) = self.heap.get_mut(id) {
      obj.props.set("name", Value::string(name));
      obj.props.set("message", Value::string(message));
    }
    Value::Object(id)
  }

  pub(crate) fn throw_error(&mut self, name: &str, message: &str) -> Error {
    Error::Throw(self.make_error_object(name, message))
  }

  /// A catchable TypeError. Public so host natives can raise script-visible
  /// failures.
  pub fn throw_type_error(&mut self, message: &str) -> Error {
    self.throw_error("TypeError", message)
  }

  pub fn throw_range_error(&mut self, message: &str) -> Error {
    self.throw_error("RangeError", message)
  }

  pub fn throw_reference_error(&mut self, message: &str) -> Error {
    self.throw_error("ReferenceError", message)
  }

  pub fn throw_syntax_error(&mut self, message: &str) -> Error {
    self.throw_error("SyntaxError", message)
  }
}
