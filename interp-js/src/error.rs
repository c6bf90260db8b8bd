use crate::value::Value;

/// Errors produced by the interpreter.
///
/// Script-level exceptions and host-level terminations ride the same `Err`
/// channel but are strictly separated by variant: only [`Error::Throw`] is
/// observable from a script `catch` clause. Non-local control flow (return /
/// break / continue) is *not* an error at all; it travels as a
/// `Completion` in the `Ok` channel (see `exec`), so it can never leak into
/// script exception handlers.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
  /// A JavaScript `throw` value. Catchable from script.
  #[error("uncaught exception")]
  Throw(Value),
  /// The operation ceiling was exceeded. Never catchable; propagates out of
  /// `evaluate` unconditionally.
  #[error("Execution timeout: maximum operations exceeded")]
  Timeout,
  /// Syntax reached the evaluator that the node set does not support.
  #[error("{0}")]
  Unsupported(String),
  /// A heap handle failed to resolve. Indicates interpreter-internal misuse
  /// (e.g. a `Value` carried across interpreter instances).
  #[error("invalid heap handle")]
  InvalidHandle,
}

impl Error {
  pub(crate) fn unhandled_node(kind: &str) -> Self {
    Error::Unsupported(format!("Unhandled node type: {kind}"))
  }

  /// The thrown script value, when this error is catchable.
  pub fn thrown(&self) -> Option<&Value> {
    match self {
      Error::Throw(value) => Some(value),
      _ => None,
    }
  }
}
