use crate::value::ObjId;
use ahash::AHashSet;

/// The intrinsic object graph of one interpreter instance.
///
/// Prototype objects back member lookups on literals and primitives; the
/// constructor set backs the `constructor` arm of the reflective-access
/// filter: reading `constructor` resolves normally, and when the result is
/// one of these objects the read yields undefined instead.
#[derive(Debug)]
pub(crate) struct Intrinsics {
  pub(crate) object_prototype: ObjId,
  pub(crate) function_prototype: ObjId,
  pub(crate) array_prototype: ObjId,
  pub(crate) string_prototype: ObjId,
  pub(crate) number_prototype: ObjId,
  pub(crate) boolean_prototype: ObjId,
  pub(crate) error_prototype: ObjId,
  pub(crate) regexp_prototype: ObjId,
  pub(crate) date_prototype: ObjId,
  builtin_constructors: AHashSet<ObjId>,
}

impl Intrinsics {
  pub(crate) fn new(
    object_prototype: ObjId,
    function_prototype: ObjId,
    array_prototype: ObjId,
    string_prototype: ObjId,
    number_prototype: ObjId,
    boolean_prototype: ObjId,
    error_prototype: ObjId,
    regexp_prototype: ObjId,
    date_prototype: ObjId,
  ) -> Self {
    Self {
      object_prototype,
      function_prototype,
      array_prototype,
      string_prototype,
      number_prototype,
      boolean_prototype,
      error_prototype,
      regexp_prototype,
      date_prototype,
      builtin_constructors: AHashSet::new(),
    }
  }

  pub(crate) fn register_builtin_constructor(&mut self, ctor: ObjId) {
    self.builtin_constructors.insert(ctor);
  }

  pub(crate) fn is_builtin_constructor(&self, id: ObjId) -> bool {
    self.builtin_constructors.contains(&id)
  }
}
