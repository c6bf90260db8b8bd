use crate::error::Error;
use crate::object::JsObject;
use crate::value::{EnvId, JsStr, ObjId, Value};
use ahash::AHashMap;
use std::rc::Rc;

/// Distinguishes `var` targets from `let`/`const` targets in the scope chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EnvKind {
  /// The global program frame and every function invocation frame.
  Function,
  /// Blocks, `for` headers, `switch` bodies, `catch` clauses.
  Block,
}

/// One level of the lexical environment chain.
///
/// Binding presence is the "exists" bit: a name bound to `Undefined` is
/// distinct from an absent name.
#[derive(Debug)]
pub(crate) struct EnvFrame {
  pub(crate) parent: Option<EnvId>,
  pub(crate) kind: EnvKind,
  bindings: AHashMap<JsStr, Value>,
}

/// Interpreter-lifetime arena for objects and environment frames.
///
/// Closures keep their creation frame reachable and frames reference each
/// other through parent links, so frames and objects form a graph that may
/// contain cycles. Rather than count references across it, every allocation
/// lives until the interpreter is dropped and handles are plain indices.
#[derive(Debug, Default)]
pub(crate) struct Heap {
  objects: Vec<JsObject>,
  envs: Vec<EnvFrame>,
}

impl Heap {
  pub(crate) fn new() -> Self {
    Self::default()
  }

  pub(crate) fn alloc(&mut self, obj: JsObject) -> ObjId {
    let id = ObjId(self.objects.len() as u32);
    self.objects.push(obj);
    id
  }

  pub(crate) fn get(&self, id: ObjId) -> Result<&JsObject, Error> {
    self.objects.get(id.0 as usize).ok_or(Error::InvalidHandle)
  }

  pub(crate) fn get_mut(&mut self, id: ObjId) -> Result<&mut JsObject, Error> {
    self
      .objects
      .get_mut(id.0 as usize)
      .ok_or(Error::InvalidHandle)
  }

  pub(crate) fn env_alloc(&mut self, parent: Option<EnvId>, kind: EnvKind) -> EnvId {
    let id = EnvId(self.envs.len() as u32);
    self.envs.push(EnvFrame {
      parent,
      kind,
      bindings: AHashMap::new(),
    });
    id
  }

  fn env(&self, id: EnvId) -> Result<&EnvFrame, Error> {
    self.envs.get(id.0 as usize).ok_or(Error::InvalidHandle)
  }

  fn env_mut(&mut self, id: EnvId) -> Result<&mut EnvFrame, Error> {
    self.envs.get_mut(id.0 as usize).ok_or(Error::InvalidHandle)
  }

  /// Walks parent links and returns the first binding for `name`, or `None`
  /// when no frame in the chain has one.
  pub(crate) fn env_lookup(&self, env: EnvId, name: &str) -> Result<Option<Value>, Error> {
    let mut current = Some(env);
    while let Some(id) = current {
      let frame = self.env(id)?;
      if let Some(value) = frame.bindings.get(name) {
        return Ok(Some(value.clone()));
      }
      current = frame.parent;
    }
    Ok(None)
  }

  pub(crate) fn env_has_own(&self, env: EnvId, name: &str) -> Result<bool, Error> {
    Ok(self.env(env)?.bindings.contains_key(name))
  }

  pub(crate) fn env_kind(&self, env: EnvId) -> Result<EnvKind, Error> {
    Ok(self.env(env)?.kind)
  }

  /// Walks parent links and mutates the first frame that has the binding.
  ///
  /// When none is found, the binding is created in the *originating* frame,
  /// the documented lenient fallback. Since every `var` is hoisted, that
  /// path is only reached for assignments to names that were never declared.
  pub(crate) fn env_assign(&mut self, env: EnvId, name: &str, value: Value) -> Result<(), Error> {
    let mut current = Some(env);
    while let Some(id) = current {
      let frame = self.env(id)?;
      if frame.bindings.contains_key(name) {
        self.env_mut(id)?.bindings.insert(Rc::from(name), value);
        return Ok(());
      }
      current = frame.parent;
    }
    self.env_mut(env)?.bindings.insert(Rc::from(name), value);
    Ok(())
  }

  /// Walks past block frames to the nearest function frame and assigns
  /// there. Targets `var` declarations and hoisted names.
  pub(crate) fn env_declare_var(&mut self, env: EnvId, name: &str, value: Value) -> Result<(), Error> {
    let target = self.nearest_function_frame(env)?;
    self
      .env_mut(target)?
      .bindings
      .insert(Rc::from(name), value);
    Ok(())
  }

  /// Ensures a `var` binding exists in the nearest function frame without
  /// overwriting an existing value (`var x;` after `x` was assigned).
  pub(crate) fn env_ensure_var(&mut self, env: EnvId, name: &str) -> Result<(), Error> {
    let target = self.nearest_function_frame(env)?;
    let frame = self.env_mut(target)?;
    if !frame.bindings.contains_key(name) {
      frame.bindings.insert(Rc::from(name), Value::Undefined);
    }
    Ok(())
  }

  /// Assigns in the current frame. Targets `let`/`const` declarations and
  /// all interpreter-introduced bindings (params, `this`, `arguments`, catch
  /// parameters, self-names).
  pub(crate) fn env_declare_let(&mut self, env: EnvId, name: &str, value: Value) -> Result<(), Error> {
    self.env_mut(env)?.bindings.insert(Rc::from(name), value);
    Ok(())
  }

  fn nearest_function_frame(&self, env: EnvId) -> Result<EnvId, Error> {
    let mut current = env;
    loop {
      let frame = self.env(current)?;
      if frame.kind == EnvKind::Function {
        return Ok(current);
      }
      match frame.parent {
        Some(parent) => current = parent,
        // The outermost frame acts as the var target regardless of kind.
        None => return Ok(current),
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::object::JsObject;

  #[test]
  fn lookup_walks_parent_links() {
    let mut heap = Heap::new();
    let global = heap.env_alloc(None, EnvKind::Function);
    let block = heap.env_alloc(Some(global), EnvKind::Block);
    heap.env_declare_let(global, "x", Value::Number(1.0)).unwrap();

    assert_eq!(
      heap.env_lookup(block, "x").unwrap(),
      Some(Value::Number(1.0))
    );
    assert_eq!(heap.env_lookup(block, "y").unwrap(), None);
  }

  #[test]
  fn assign_mutates_first_frame_with_binding() {
    let mut heap = Heap::new();
    let global = heap.env_alloc(None, EnvKind::Function);
    let block = heap.env_alloc(Some(global), EnvKind::Block);
    heap.env_declare_let(global, "x", Value::Number(1.0)).unwrap();

    heap.env_assign(block, "x", Value::Number(2.0)).unwrap();
    assert_eq!(
      heap.env_lookup(global, "x").unwrap(),
      Some(Value::Number(2.0))
    );
    assert!(!heap.env_has_own(block, "x").unwrap());
  }

  #[test]
  fn assign_fallback_creates_binding_in_originating_frame() {
    let mut heap = Heap::new();
    let global = heap.env_alloc(None, EnvKind::Function);
    let block = heap.env_alloc(Some(global), EnvKind::Block);

    heap.env_assign(block, "ghost", Value::Bool(true)).unwrap();
    assert!(heap.env_has_own(block, "ghost").unwrap());
    assert!(!heap.env_has_own(global, "ghost").unwrap());
  }

  #[test]
  fn declare_var_skips_block_frames() {
    let mut heap = Heap::new();
    let global = heap.env_alloc(None, EnvKind::Function);
    let func = heap.env_alloc(Some(global), EnvKind::Function);
    let block = heap.env_alloc(Some(func), EnvKind::Block);

    heap.env_declare_var(block, "v", Value::Number(9.0)).unwrap();
    assert!(heap.env_has_own(func, "v").unwrap());
    assert!(!heap.env_has_own(block, "v").unwrap());
    assert!(!heap.env_has_own(global, "v").unwrap());
  }

  #[test]
  fn object_handles_resolve_after_later_allocations() {
    let mut heap = Heap::new();
    let first = heap.alloc(JsObject::ordinary(None));
    for _ in 0..64 {
      heap.alloc(JsObject::ordinary(None));
    }
    assert!(heap.get(first).is_ok());
  }
}
