//! An embeddable tree-walking interpreter for pre-parsed ES5 syntax trees.
//!
//! The host supplies a program tree (see the `ast-js` crate, typically
//! produced by a JavaScript-side parser and shipped as Babel-style JSON) and
//! a capability table of values; the interpreter evaluates the tree against
//! that table and returns the final value. It provides:
//!
//! - Lexical scoping with `var` hoisting, `let`/`const` block targets, and
//!   closures capturing their creation frame
//! - The full ES5 expression and statement set: labeled control flow,
//!   `switch` fall-through, `try`/`catch`/`finally`, `for … in`
//! - Non-local control flow carried as completion records, never observable
//!   to script `catch` clauses
//! - User function objects with `call`/`apply`/`bind`, construction, and
//!   named-function-expression self-binding
//! - A bidirectional host bridge: native functions receive the interpreter
//!   and may re-enter it with script-function arguments
//! - Capability gating at the host boundary: a read-side reflective-access
//!   blocklist (`__proto__`, non-function `prototype`, built-in
//!   `constructor`), a disabled function constructor, parse-callback-gated
//!   `eval`, and a per-evaluation operation ceiling
//!
//! The interpreter is single-threaded and synchronous; one instance must not
//! be entered concurrently. Heap allocations live for the interpreter's
//! lifetime (closures keep frames reachable and the frame graph may contain
//! cycles, so no reference counting is attempted).

mod builtins;
mod error;
mod exec;
mod function;
mod heap;
mod interpreter;
mod intrinsics;
mod native;
mod object;
mod object_ops;
mod ops;
mod value;

pub use crate::error::Error;
pub use crate::interpreter::Interpreter;
pub use crate::interpreter::InterpreterOptions;
pub use crate::interpreter::ParseFn;
pub use crate::native::HostObject;
pub use crate::native::NativeFn;
pub use crate::value::JsStr;
pub use crate::value::ObjId;
pub use crate::value::Value;
