use crate::function::{NativeFunction, ScriptFunction};
use crate::native::HostObject;
use crate::value::{JsStr, ObjId, Value};
use std::rc::Rc;

/// A heap object: prototype link, named properties, and kind-specific
/// payload. Functions are objects too, as are arrays and regexps; the kind
/// carries what makes each exotic.
#[derive(Debug)]
pub(crate) struct JsObject {
  /// `None` is a null prototype; host-domain prototypes are ordinary
  /// heap objects installed by the default globals table.
  pub(crate) proto: Option<ObjId>,
  pub(crate) props: PropTable,
  pub(crate) kind: ObjectKind,
}

#[derive(Debug)]
pub(crate) enum ObjectKind {
  Ordinary,
  /// Dense element storage; `length` is derived and writable (truncate /
  /// extend). Extra named properties live in `props` as on any object.
  Array(Vec<Value>),
  Function(ScriptFunction),
  Native(NativeFunction),
  /// Inert regular expression data: pattern and flags, no matching engine.
  Regex { pattern: JsStr, flags: JsStr },
  Host(Rc<dyn HostObject>),
}

impl JsObject {
  pub(crate) fn new(kind: ObjectKind, proto: Option<ObjId>) -> Self {
    Self {
      proto,
      props: PropTable::default(),
      kind,
    }
  }

  pub(crate) fn ordinary(proto: Option<ObjId>) -> Self {
    Self::new(ObjectKind::Ordinary, proto)
  }

  pub(crate) fn is_function(&self) -> bool {
    matches!(self.kind, ObjectKind::Function(_) | ObjectKind::Native(_))
  }

  pub(crate) fn is_callable(&self) -> bool {
    match &self.kind {
      ObjectKind::Function(_) | ObjectKind::Native(_) => true,
      ObjectKind::Host(host) => host.is_callable(),
      _ => false,
    }
  }
}

/// Insertion-ordered string-keyed property table.
///
/// Enumeration order is observable through `for … in` and object spread, so
/// entries are kept in a `Vec` in insertion order. Property counts in scripts
/// this interpreter targets are small; the linear scan is deliberate.
#[derive(Debug, Default)]
pub(crate) struct PropTable {
  entries: Vec<(JsStr, Value)>,
}

impl PropTable {
  pub(crate) fn get(&self, name: &str) -> Option<&Value> {
    self
      .entries
      .iter()
      .find(|(key, _)| &**key == name)
      .map(|(_, value)| value)
  }

  /// Inserts or updates; an update keeps the key's original position.
  pub(crate) fn set(&mut self, name: &str, value: Value) {
    for (key, slot) in &mut self.entries {
      if &**key == name {
        *slot = value;
        return;
      }
    }
    self.entries.push((Rc::from(name), value));
  }

  pub(crate) fn remove(&mut self, name: &str) -> bool {
    match self.entries.iter().position(|(key, _)| &**key == name) {
      Some(idx) => {
        self.entries.remove(idx);
        true
      }
      None => false,
    }
  }

  pub(crate) fn contains(&self, name: &str) -> bool {
    self.get(name).is_some()
  }

  pub(crate) fn keys(&self) -> impl Iterator<Item = JsStr> + '_ {
    self.entries.iter().map(|(key, _)| key.clone())
  }
}
