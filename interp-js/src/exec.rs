use crate::error::Error;
use crate::function::{FunctionBody, NativeFunction, ScriptFunction};
use crate::heap::EnvKind;
use crate::interpreter::Interpreter;
use crate::native::HostObject;
use crate::object::{JsObject, ObjectKind};
use crate::ops;
use crate::value::{strict_equal, EnvId, JsStr, ObjId, Value};
use ast_js::{
  ArrowFuncBody, BinaryOp, BlockStmt, CallExpr, DoWhileStmt, Expr, ForInStmt, ForInTarget, ForInit,
  ForStmt, IdExpr, LabeledStmt, LogicalOp, MemberExpr, MethodKind, NewExpr, ObjectMember, Program,
  Stmt, SwitchStmt, TryStmt, UnaryExpr, UnaryOp, UpdateExpr, UpdateOp, VarDecl, VarDeclKind,
  WhileStmt,
};
use std::cmp::Ordering;
use std::rc::Rc;

/// A statement completion record.
///
/// Return/break/continue are carried here, in the `Ok` channel, strictly
/// apart from user exceptions (which ride `Err(Error::Throw)`), so a script
/// `catch` can never observe a control-flow transfer.
///
/// The "empty" value is modelled explicitly as `None` so statement-list
/// evaluation can implement `UpdateEmpty` (e.g. `1; if (true) {}` evaluates
/// to `1`).
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Completion {
  Normal(Option<Value>),
  Return(Value),
  Break(Option<String>, Option<Value>),
  Continue(Option<String>, Option<Value>),
}

impl Completion {
  pub(crate) fn empty() -> Self {
    Completion::Normal(None)
  }

  pub(crate) fn normal(value: Value) -> Self {
    Completion::Normal(Some(value))
  }

  pub(crate) fn is_abrupt(&self) -> bool {
    !matches!(self, Completion::Normal(_))
  }

  /// `UpdateEmpty(completion, value)`.
  pub(crate) fn update_empty(self, value: Option<Value>) -> Self {
    match self {
      Completion::Normal(None) => Completion::Normal(value),
      Completion::Break(target, None) => Completion::Break(target, value),
      Completion::Continue(target, None) => Completion::Continue(target, value),
      other => other,
    }
  }
}

impl Interpreter {
  pub(crate) fn eval_program(&mut self, program: &Program) -> Result<Value, Error> {
    self.hoist_stmt_list(&program.body, self.global_env)?;
    let completion = self.eval_stmt_list(&program.body, self.global_env)?;
    match completion {
      Completion::Normal(value) => Ok(match value {
        Some(value) => value,
        // A program with no expression-statement value yields its directive
        // prologue, if any.
        None => match program.directives.last() {
          Some(directive) => Value::string(&directive.value.value),
          None => Value::Undefined,
        },
      }),
      Completion::Return(_) => Err(Error::Unsupported("return outside of function".to_string())),
      Completion::Break(..) => Err(Error::Unsupported("break outside of loop".to_string())),
      Completion::Continue(..) => Err(Error::Unsupported("continue outside of loop".to_string())),
    }
  }

  /// The hoisting pre-pass: walks the immediate statement list (never into
  /// nested functions or blocks) and pre-binds declarations into `env`,
  /// which is the enclosing function frame.
  ///
  /// - Function declarations materialise their closure now.
  /// - `var` names bind to undefined unless already bound (a function
  ///   declaration of the same name wins). Initializers run in place later.
  pub(crate) fn hoist_stmt_list(&mut self, stmts: &[Stmt], env: EnvId) -> Result<(), Error> {
    for stmt in stmts {
      match stmt {
        Stmt::FunctionDeclaration(decl) => {
          if decl.generator {
            return Err(Error::Unsupported(
              "generator functions are not supported".to_string(),
            ));
          }
          let function = self.materialize_function(
            Some(&decl.id.name),
            &decl.params,
            FunctionBody::Block(Rc::new(decl.body.clone())),
            None,
            false,
            env,
          )?;
          self.heap.env_declare_let(env, &decl.id.name, function)?;
        }
        Stmt::VariableDeclaration(decl) if decl.kind == VarDeclKind::Var => {
          for declarator in &decl.declarations {
            if !self.heap.env_has_own(env, &declarator.id.name)? {
              self
                .heap
                .env_declare_let(env, &declarator.id.name, Value::Undefined)?;
            }
          }
        }
        _ => {}
      }
    }
    Ok(())
  }

  pub(crate) fn eval_stmt_list(&mut self, stmts: &[Stmt], env: EnvId) -> Result<Completion, Error> {
    let mut last_value: Option<Value> = None;
    for stmt in stmts {
      let completion = self.eval_stmt(stmt, env)?;
      let completion = completion.update_empty(last_value.clone());
      match completion {
        Completion::Normal(value) => {
          if let Some(value) = value {
            last_value = Some(value);
          }
        }
        abrupt => return Ok(abrupt),
      }
    }
    Ok(Completion::Normal(last_value))
  }

  fn eval_block_stmts(&mut self, block: &BlockStmt, env: EnvId) -> Result<Completion, Error> {
    let block_env = self.heap.env_alloc(Some(env), EnvKind::Block);
    self.eval_stmt_list(&block.body, block_env)
  }

  pub(crate) fn eval_stmt(&mut self, stmt: &Stmt, env: EnvId) -> Result<Completion, Error> {
    // One tick per statement.
    self.tick()?;

    match stmt {
      Stmt::EmptyStatement(_) => Ok(Completion::empty()),
      Stmt::ExpressionStatement(node) => {
        let value = self.eval_expr(&node.expression, env)?;
        Ok(Completion::normal(value))
      }
      Stmt::BlockStatement(block) => self.eval_block_stmts(block, env),
      Stmt::VariableDeclaration(decl) => {
        self.eval_var_decl(decl, env)?;
        Ok(Completion::empty())
      }
      Stmt::FunctionDeclaration(decl) => {
        // Function-frame declarations were materialised by the hoisting
        // pre-pass; a declaration reached inside a block binds lazily in
        // that block.
        if self.heap.env_kind(env)? == EnvKind::Block {
          if decl.generator {
            return Err(Error::Unsupported(
              "generator functions are not supported".to_string(),
            ));
          }
          let function = self.materialize_function(
            Some(&decl.id.name),
            &decl.params,
            FunctionBody::Block(Rc::new(decl.body.clone())),
            None,
            false,
            env,
          )?;
          self.heap.env_declare_let(env, &decl.id.name, function)?;
        }
        Ok(Completion::empty())
      }
      Stmt::IfStatement(node) => {
        let test = self.eval_expr(&node.test, env)?;
        if ops::to_boolean(&test) {
          self.eval_stmt(&node.consequent, env)
        } else if let Some(alternate) = &node.alternate {
          self.eval_stmt(alternate, env)
        } else {
          Ok(Completion::empty())
        }
      }
      Stmt::WhileStatement(node) => self.eval_while(node, env, None),
      Stmt::DoWhileStatement(node) => self.eval_do_while(node, env, None),
      Stmt::ForStatement(node) => self.eval_for(node, env, None),
      Stmt::ForInStatement(node) => self.eval_for_in(node, env, None),
      Stmt::SwitchStatement(node) => self.eval_switch(node, env),
      Stmt::LabeledStatement(node) => self.eval_labeled(node, env),
      Stmt::BreakStatement(node) => Ok(Completion::Break(
        node.label.as_ref().map(|label| label.name.clone()),
        None,
      )),
      Stmt::ContinueStatement(node) => Ok(Completion::Continue(
        node.label.as_ref().map(|label| label.name.clone()),
        None,
      )),
      Stmt::ReturnStatement(node) => {
        let value = match &node.argument {
          Some(argument) => self.eval_expr(argument, env)?,
          None => Value::Undefined,
        };
        Ok(Completion::Return(value))
      }
      Stmt::ThrowStatement(node) => {
        let value = self.eval_expr(&node.argument, env)?;
        Err(Error::Throw(value))
      }
      Stmt::TryStatement(node) => self.eval_try(node, env),
      Stmt::WithStatement(_) => Err(Error::Unsupported(
        "with statement is not supported".to_string(),
      )),
    }
  }

  fn eval_var_decl(&mut self, decl: &VarDecl, env: EnvId) -> Result<(), Error> {
    for declarator in &decl.declarations {
      let name = declarator.id.name.as_str();
      match decl.kind {
        VarDeclKind::Var => match &declarator.init {
          Some(init) => {
            let value = self.eval_expr(init, env)?;
            self.heap.env_declare_var(env, name, value)?;
          }
          // `var x;` keeps an already-assigned hoisted slot intact.
          None => self.heap.env_ensure_var(env, name)?,
        },
        VarDeclKind::Let | VarDeclKind::Const => {
          let value = match &declarator.init {
            Some(init) => self.eval_expr(init, env)?,
            None => Value::Undefined,
          };
          self.heap.env_declare_let(env, name, value)?;
        }
      }
    }
    Ok(())
  }

  fn eval_while(
    &mut self,
    stmt: &WhileStmt,
    env: EnvId,
    active_label: Option<&str>,
  ) -> Result<Completion, Error> {
    loop {
      let test = self.eval_expr(&stmt.test, env)?;
      if !ops::to_boolean(&test) {
        break;
      }
      match self.eval_stmt(&stmt.body, env)? {
        Completion::Normal(_) => {}
        Completion::Continue(None, _) => continue,
        Completion::Continue(Some(ref label), _) if active_label == Some(label.as_str()) => continue,
        Completion::Break(None, _) => break,
        Completion::Break(Some(ref label), _) if active_label == Some(label.as_str()) => break,
        other => return Ok(other),
      }
    }
    Ok(Completion::empty())
  }

  fn eval_do_while(
    &mut self,
    stmt: &DoWhileStmt,
    env: EnvId,
    active_label: Option<&str>,
  ) -> Result<Completion, Error> {
    loop {
      match self.eval_stmt(&stmt.body, env)? {
        Completion::Normal(_) => {}
        Completion::Continue(None, _) => {}
        Completion::Continue(Some(ref label), _) if active_label == Some(label.as_str()) => {}
        Completion::Break(None, _) => break,
        Completion::Break(Some(ref label), _) if active_label == Some(label.as_str()) => break,
        other => return Ok(other),
      }
      let test = self.eval_expr(&stmt.test, env)?;
      if !ops::to_boolean(&test) {
        break;
      }
    }
    Ok(Completion::empty())
  }

  fn eval_for(
    &mut self,
    stmt: &ForStmt,
    env: EnvId,
    active_label: Option<&str>,
  ) -> Result<Completion, Error> {
    // The `for` header opens its own block frame so `let` declarations do
    // not leak; `var` declarations still target the function frame.
    let for_env = self.heap.env_alloc(Some(env), EnvKind::Block);
    match &stmt.init {
      None => {}
      Some(ForInit::Decl(decl)) => self.eval_var_decl(decl, for_env)?,
      Some(ForInit::Expr(expr)) => {
        self.eval_expr(expr, for_env)?;
      }
    }

    loop {
      if let Some(test) = &stmt.test {
        let test = self.eval_expr(test, for_env)?;
        if !ops::to_boolean(&test) {
          break;
        }
      }

      // Every path through the body ticks (statement evaluation ticks
      // unconditionally), so `for(;;){}` still observes the budget.
      match self.eval_stmt(&stmt.body, for_env)? {
        Completion::Normal(_) => {}
        Completion::Continue(None, _) => {}
        Completion::Continue(Some(ref label), _) if active_label == Some(label.as_str()) => {}
        Completion::Break(None, _) => break,
        Completion::Break(Some(ref label), _) if active_label == Some(label.as_str()) => break,
        other => return Ok(other),
      }

      if let Some(update) = &stmt.update {
        self.eval_expr(update, for_env)?;
      }
    }
    Ok(Completion::empty())
  }

  fn eval_for_in(
    &mut self,
    stmt: &ForInStmt,
    env: EnvId,
    active_label: Option<&str>,
  ) -> Result<Completion, Error> {
    let for_env = self.heap.env_alloc(Some(env), EnvKind::Block);

    enum Binding {
      Var(String),
      Let(String),
      Assign(String),
    }
    let binding = match &stmt.left {
      ForInTarget::Decl(decl) => {
        let declarator = match decl.declarations.first() {
          Some(declarator) => declarator,
          None => return Err(Error::unhandled_node("ForInStatement left")),
        };
        match decl.kind {
          VarDeclKind::Var => Binding::Var(declarator.id.name.clone()),
          VarDeclKind::Let | VarDeclKind::Const => Binding::Let(declarator.id.name.clone()),
        }
      }
      ForInTarget::Expr(Expr::Identifier(id)) => Binding::Assign(id.name.clone()),
      ForInTarget::Expr(_) => return Err(Error::unhandled_node("ForInStatement left")),
    };

    let object = self.eval_expr(&stmt.right, for_env)?;
    if object.is_nullish() {
      return Ok(Completion::empty());
    }
    let keys = self.own_enumerable_keys(&object)?;

    for key in keys {
      let key_value = Value::string(&key);
      match &binding {
        Binding::Var(name) => self.heap.env_declare_var(for_env, name, key_value)?,
        Binding::Let(name) => self.heap.env_declare_let(for_env, name, key_value)?,
        Binding::Assign(name) => self.heap.env_assign(for_env, name, key_value)?,
      }
      match self.eval_stmt(&stmt.body, for_env)? {
        Completion::Normal(_) => {}
        Completion::Continue(None, _) => {}
        Completion::Continue(Some(ref label), _) if active_label == Some(label.as_str()) => {}
        Completion::Break(None, _) => break,
        Completion::Break(Some(ref label), _) if active_label == Some(label.as_str()) => break,
        other => return Ok(other),
      }
    }
    Ok(Completion::empty())
  }

  fn eval_labeled(&mut self, stmt: &LabeledStmt, env: EnvId) -> Result<Completion, Error> {
    let label = stmt.label.name.as_str();

    // A label directly wrapping a loop is handed to the loop evaluator so
    // `continue <label>` re-enters the right iteration. The explicit tick
    // stands in for the `eval_stmt` dispatch these bypass.
    let completion = match &*stmt.body {
      Stmt::WhileStatement(inner) => {
        self.tick()?;
        self.eval_while(inner, env, Some(label))?
      }
      Stmt::DoWhileStatement(inner) => {
        self.tick()?;
        self.eval_do_while(inner, env, Some(label))?
      }
      Stmt::ForStatement(inner) => {
        self.tick()?;
        self.eval_for(inner, env, Some(label))?
      }
      Stmt::ForInStatement(inner) => {
        self.tick()?;
        self.eval_for_in(inner, env, Some(label))?
      }
      other => self.eval_stmt(other, env)?,
    };

    match completion {
      Completion::Break(Some(target), value) if target == label => Ok(Completion::Normal(value)),
      // A matching continue on a non-loop labelled statement degrades to an
      // unlabelled signal for the enclosing loop.
      Completion::Continue(Some(target), value) if target == label => {
        Ok(Completion::Continue(None, value))
      }
      other => Ok(other),
    }
  }

  fn eval_switch(&mut self, stmt: &SwitchStmt, env: EnvId) -> Result<Completion, Error> {
    let discriminant = self.eval_expr(&stmt.discriminant, env)?;

    // One block frame shared by every case clause.
    let switch_env = self.heap.env_alloc(Some(env), EnvKind::Block);

    // Select the first strictly-equal case, or `default` when none match.
    let mut default_idx: Option<usize> = None;
    let mut start_idx: Option<usize> = None;
    for (idx, case) in stmt.cases.iter().enumerate() {
      match &case.test {
        None => {
          if default_idx.is_none() {
            default_idx = Some(idx);
          }
        }
        Some(test) => {
          let test = self.eval_expr(test, switch_env)?;
          if strict_equal(&discriminant, &test) {
            start_idx = Some(idx);
            break;
          }
        }
      }
    }
    let Some(start_idx) = start_idx.or(default_idx) else {
      return Ok(Completion::empty());
    };

    // Run from the selected clause onward (fall-through) until a break.
    let mut last_value: Option<Value> = None;
    for case in stmt.cases.iter().skip(start_idx) {
      for stmt in &case.consequent {
        let completion = self.eval_stmt(stmt, switch_env)?;
        let completion = completion.update_empty(last_value.clone());
        match completion {
          Completion::Normal(value) => {
            if let Some(value) = value {
              last_value = Some(value);
            }
          }
          Completion::Break(None, value) => return Ok(Completion::Normal(value)),
          abrupt => return Ok(abrupt),
        }
      }
    }
    Ok(Completion::Normal(last_value))
  }

  fn eval_try(&mut self, stmt: &TryStmt, env: EnvId) -> Result<Completion, Error> {
    // Only user exceptions reach the handler. Control-flow completions pass
    // through in the Ok channel, and host terminations skip both the
    // handler and the finalizer.
    let result = match self.eval_block_stmts(&stmt.block, env) {
      Err(Error::Throw(thrown)) => match &stmt.handler {
        Some(handler) => {
          let catch_env = self.heap.env_alloc(Some(env), EnvKind::Block);
          if let Some(param) = &handler.param {
            self.heap.env_declare_let(catch_env, &param.name, thrown)?;
          }
          self.eval_stmt_list(&handler.body.body, catch_env)
        }
        None => Err(Error::Throw(thrown)),
      },
      other => other,
    };
    if matches!(&result, Err(error) if error.thrown().is_none()) {
      return result;
    }

    if let Some(finalizer) = &stmt.finalizer {
      // An abrupt finalizer supersedes whatever the try/catch produced,
      // including a pending rethrow.
      let finally_completion = self.eval_block_stmts(finalizer, env)?;
      if finally_completion.is_abrupt() {
        return Ok(finally_completion);
      }
    }

    result
  }

  pub(crate) fn eval_expr(&mut self, expr: &Expr, env: EnvId) -> Result<Value, Error> {
    // One tick per expression.
    self.tick()?;

    match expr {
      Expr::Identifier(node) => match self.heap.env_lookup(env, &node.name)? {
        Some(value) => Ok(value),
        None => Err(self.throw_reference_error(&format!("{} is not defined", node.name))),
      },
      Expr::ThisExpression(_) => Ok(
        self
          .heap
          .env_lookup(env, "this")?
          .unwrap_or(Value::Undefined),
      ),
      Expr::StringLiteral(node) => Ok(Value::string(&node.value)),
      Expr::NumericLiteral(node) => Ok(Value::Number(node.value)),
      Expr::BooleanLiteral(node) => Ok(Value::Bool(node.value)),
      Expr::NullLiteral(_) => Ok(Value::Null),
      Expr::RegExpLiteral(node) => {
        let id = self.heap.alloc(JsObject::new(
          ObjectKind::Regex {
            pattern: Rc::from(node.pattern.as_str()),
            flags: Rc::from(node.flags.as_str()),
          },
          Some(self.intrinsics.regexp_prototype),
        ));
        Ok(Value::Object(id))
      }
      Expr::ArrayExpression(node) => {
        let mut elements = Vec::with_capacity(node.elements.len());
        for element in &node.elements {
          elements.push(match element {
            Some(expr) => self.eval_expr(expr, env)?,
            // Elided holes read as undefined.
            None => Value::Undefined,
          });
        }
        Ok(self.alloc_array(elements))
      }
      Expr::ObjectExpression(node) => self.eval_object_literal(&node.properties, env),
      Expr::FunctionExpression(node) => {
        if node.generator {
          return Err(Error::Unsupported(
            "generator functions are not supported".to_string(),
          ));
        }
        let self_name: Option<JsStr> = node.id.as_ref().map(|id| Rc::from(id.name.as_str()));
        self.materialize_function(
          node.id.as_ref().map(|id| id.name.as_str()),
          &node.params,
          FunctionBody::Block(Rc::new(node.body.clone())),
          self_name,
          false,
          env,
        )
      }
      Expr::ArrowFunctionExpression(node) => {
        let body = match &node.body {
          ArrowFuncBody::Block(block) => FunctionBody::Block(Rc::new(block.clone())),
          ArrowFuncBody::Expr(expr) => FunctionBody::Expr(Rc::new((**expr).clone())),
        };
        self.materialize_function(None, &node.params, body, None, true, env)
      }
      Expr::MemberExpression(node) => {
        let object = self.eval_expr(&node.object, env)?;
        let key = self.member_key(node, env)?;
        self.get_member(&object, &key)
      }
      Expr::CallExpression(node) => self.eval_call(node, env),
      Expr::NewExpression(node) => self.eval_new(node, env),
      Expr::UnaryExpression(node) => self.eval_unary(node, env),
      Expr::UpdateExpression(node) => self.eval_update(node, env),
      Expr::BinaryExpression(node) => {
        let left = self.eval_expr(&node.left, env)?;
        let right = self.eval_expr(&node.right, env)?;
        self.apply_binary(node.operator, left, right)
      }
      Expr::LogicalExpression(node) => {
        let left = self.eval_expr(&node.left, env)?;
        // Short-circuit; the result is the operand value itself, never a
        // coerced boolean.
        match node.operator {
          LogicalOp::And => {
            if !ops::to_boolean(&left) {
              return Ok(left);
            }
          }
          LogicalOp::Or => {
            if ops::to_boolean(&left) {
              return Ok(left);
            }
          }
        }
        self.eval_expr(&node.right, env)
      }
      Expr::AssignmentExpression(node) => self.eval_assignment(node, env),
      Expr::ConditionalExpression(node) => {
        let test = self.eval_expr(&node.test, env)?;
        if ops::to_boolean(&test) {
          self.eval_expr(&node.consequent, env)
        } else {
          self.eval_expr(&node.alternate, env)
        }
      }
      Expr::SequenceExpression(node) => {
        let mut last = Value::Undefined;
        for expr in &node.expressions {
          last = self.eval_expr(expr, env)?;
        }
        Ok(last)
      }
    }
  }

  fn eval_object_literal(&mut self, members: &[ObjectMember], env: EnvId) -> Result<Value, Error> {
    let id = self
      .heap
      .alloc(JsObject::ordinary(Some(self.intrinsics.object_prototype)));
    for member in members {
      match member {
        ObjectMember::ObjectProperty(prop) => {
          let key = self.object_key(&prop.key, prop.computed, env)?;
          let value = self.eval_expr(&prop.value, env)?;
          self.heap.get_mut(id)?.props.set(&key, value);
        }
        ObjectMember::ObjectMethod(method) => {
          if method.kind != MethodKind::Method {
            return Err(Error::Unsupported(
              "object accessor properties are not supported".to_string(),
            ));
          }
          if method.generator {
            return Err(Error::Unsupported(
              "generator functions are not supported".to_string(),
            ));
          }
          let key = self.object_key(&method.key, method.computed, env)?;
          let function = self.materialize_function(
            Some(&key),
            &method.params,
            FunctionBody::Block(Rc::new(method.body.clone())),
            None,
            false,
            env,
          )?;
          self.heap.get_mut(id)?.props.set(&key, function);
        }
        ObjectMember::SpreadElement(spread) => {
          let source = self.eval_expr(&spread.argument, env)?;
          if !source.is_nullish() {
            for key in self.own_enumerable_keys(&source)? {
              if let Some(value) = self.own_property_value(&source, &key)? {
                self.heap.get_mut(id)?.props.set(&key, value);
              }
            }
          }
        }
      }
    }
    Ok(Value::Object(id))
  }

  fn object_key(&mut self, key: &Expr, computed: bool, env: EnvId) -> Result<String, Error> {
    if computed {
      let key = self.eval_expr(key, env)?;
      return ops::to_string_value(&self.heap, &key);
    }
    match key {
      Expr::Identifier(id) => Ok(id.name.clone()),
      Expr::StringLiteral(s) => Ok(s.value.clone()),
      Expr::NumericLiteral(n) => Ok(ops::number_to_string(n.value)),
      _ => Err(Error::unhandled_node("object property key")),
    }
  }

  fn member_key(&mut self, member: &MemberExpr, env: EnvId) -> Result<String, Error> {
    if member.computed {
      let key = self.eval_expr(&member.property, env)?;
      return ops::to_string_value(&self.heap, &key);
    }
    match &*member.property {
      Expr::Identifier(id) => Ok(id.name.clone()),
      _ => Err(Error::unhandled_node("member property")),
    }
  }

  fn eval_call(&mut self, call: &CallExpr, env: EnvId) -> Result<Value, Error> {
    // A member callee supplies its receiver as `this`; any other callee
    // form is invoked with undefined.
    let (callee, this) = match &*call.callee {
      Expr::MemberExpression(member) => {
        let receiver = self.eval_expr(&member.object, env)?;
        let key = self.member_key(member, env)?;
        let callee = self.get_member(&receiver, &key)?;
        (callee, receiver)
      }
      other => (self.eval_expr(other, env)?, Value::Undefined),
    };

    let mut args = Vec::with_capacity(call.arguments.len());
    for argument in &call.arguments {
      args.push(self.eval_expr(argument, env)?);
    }

    self.call_value(callee, this, &args)
  }

  fn eval_new(&mut self, node: &NewExpr, env: EnvId) -> Result<Value, Error> {
    let callee = self.eval_expr(&node.callee, env)?;
    let mut args = Vec::with_capacity(node.arguments.len());
    for argument in &node.arguments {
      args.push(self.eval_expr(argument, env)?);
    }
    self.construct_value(callee, &args)
  }

  fn eval_unary(&mut self, unary: &UnaryExpr, env: EnvId) -> Result<Value, Error> {
    match unary.operator {
      UnaryOp::Typeof => {
        // `typeof unresolvable` is "undefined", not a ReferenceError.
        let value = match &*unary.argument {
          Expr::Identifier(id) => self
            .heap
            .env_lookup(env, &id.name)?
            .unwrap_or(Value::Undefined),
          other => self.eval_expr(other, env)?,
        };
        Ok(Value::string(ops::typeof_value(&self.heap, &value)?))
      }
      UnaryOp::Delete => match &*unary.argument {
        Expr::MemberExpression(member) => {
          let object = self.eval_expr(&member.object, env)?;
          let key = self.member_key(member, env)?;
          Ok(Value::Bool(self.delete_member(&object, &key)?))
        }
        // Declared bindings are not deletable.
        Expr::Identifier(_) => Ok(Value::Bool(false)),
        other => {
          self.eval_expr(other, env)?;
          Ok(Value::Bool(true))
        }
      },
      UnaryOp::Void => {
        self.eval_expr(&unary.argument, env)?;
        Ok(Value::Undefined)
      }
      UnaryOp::Not => {
        let value = self.eval_expr(&unary.argument, env)?;
        Ok(Value::Bool(!ops::to_boolean(&value)))
      }
      UnaryOp::Neg => {
        let value = self.eval_expr(&unary.argument, env)?;
        Ok(Value::Number(-ops::to_number(&self.heap, &value)?))
      }
      UnaryOp::Pos => {
        let value = self.eval_expr(&unary.argument, env)?;
        Ok(Value::Number(ops::to_number(&self.heap, &value)?))
      }
      UnaryOp::BitNot => {
        let value = self.eval_expr(&unary.argument, env)?;
        let n = ops::to_number(&self.heap, &value)?;
        Ok(Value::Number(!ops::to_int32(n) as f64))
      }
    }
  }

  fn eval_update(&mut self, update: &UpdateExpr, env: EnvId) -> Result<Value, Error> {
    let delta = match update.operator {
      UpdateOp::Inc => 1.0,
      UpdateOp::Dec => -1.0,
    };

    match &*update.argument {
      Expr::Identifier(id) => {
        let old = match self.heap.env_lookup(env, &id.name)? {
          Some(value) => value,
          None => {
            return Err(self.throw_reference_error(&format!("{} is not defined", id.name)));
          }
        };
        let old = ops::to_number(&self.heap, &old)?;
        let updated = old + delta;
        self.heap.env_assign(env, &id.name, Value::Number(updated))?;
        Ok(Value::Number(if update.prefix { updated } else { old }))
      }
      Expr::MemberExpression(member) => {
        let object = self.eval_expr(&member.object, env)?;
        let key = self.member_key(member, env)?;
        let old = self.get_member(&object, &key)?;
        let old = ops::to_number(&self.heap, &old)?;
        let updated = old + delta;
        self.set_member(&object, &key, Value::Number(updated))?;
        Ok(Value::Number(if update.prefix { updated } else { old }))
      }
      _ => Err(Error::unhandled_node("update target")),
    }
  }

  fn eval_assignment(&mut self, assign: &ast_js::AssignExpr, env: EnvId) -> Result<Value, Error> {
    match &*assign.left {
      Expr::Identifier(id) => {
        let value = match assign.operator.binary_op() {
          None => self.eval_expr(&assign.right, env)?,
          Some(op) => {
            let old = match self.heap.env_lookup(env, &id.name)? {
              Some(value) => value,
              None => {
                return Err(self.throw_reference_error(&format!("{} is not defined", id.name)));
              }
            };
            let rhs = self.eval_expr(&assign.right, env)?;
            self.apply_binary(op, old, rhs)?
          }
        };
        self.heap.env_assign(env, &id.name, value.clone())?;
        Ok(value)
      }
      Expr::MemberExpression(member) => {
        let object = self.eval_expr(&member.object, env)?;
        let key = self.member_key(member, env)?;
        let value = match assign.operator.binary_op() {
          None => self.eval_expr(&assign.right, env)?,
          Some(op) => {
            let old = self.get_member(&object, &key)?;
            let rhs = self.eval_expr(&assign.right, env)?;
            self.apply_binary(op, old, rhs)?
          }
        };
        self.set_member(&object, &key, value.clone())?;
        Ok(value)
      }
      _ => Err(Error::unhandled_node("assignment target")),
    }
  }

  pub(crate) fn apply_binary(
    &mut self,
    op: BinaryOp,
    left: Value,
    right: Value,
  ) -> Result<Value, Error> {
    Ok(match op {
      BinaryOp::Add => ops::add_values(&self.heap, &left, &right)?,
      BinaryOp::Sub => self.numeric_binary(&left, &right, |a, b| a - b)?,
      BinaryOp::Mul => self.numeric_binary(&left, &right, |a, b| a * b)?,
      BinaryOp::Div => self.numeric_binary(&left, &right, |a, b| a / b)?,
      BinaryOp::Rem => self.numeric_binary(&left, &right, |a, b| a % b)?,

      // `==`/`!=` are implemented as their strict forms: a documented
      // divergence from ES5 kept for script compatibility.
      BinaryOp::LooseEq | BinaryOp::StrictEq => Value::Bool(strict_equal(&left, &right)),
      BinaryOp::LooseNe | BinaryOp::StrictNe => Value::Bool(!strict_equal(&left, &right)),

      BinaryOp::Lt => Value::Bool(matches!(
        self.compare_values(&left, &right)?,
        Some(Ordering::Less)
      )),
      BinaryOp::Le => Value::Bool(matches!(
        self.compare_values(&left, &right)?,
        Some(Ordering::Less | Ordering::Equal)
      )),
      BinaryOp::Gt => Value::Bool(matches!(
        self.compare_values(&left, &right)?,
        Some(Ordering::Greater)
      )),
      BinaryOp::Ge => Value::Bool(matches!(
        self.compare_values(&left, &right)?,
        Some(Ordering::Greater | Ordering::Equal)
      )),

      BinaryOp::Shl => {
        let a = ops::to_int32(ops::to_number(&self.heap, &left)?);
        let b = ops::to_uint32(ops::to_number(&self.heap, &right)?);
        Value::Number((a << (b & 31)) as f64)
      }
      BinaryOp::Shr => {
        let a = ops::to_int32(ops::to_number(&self.heap, &left)?);
        let b = ops::to_uint32(ops::to_number(&self.heap, &right)?);
        Value::Number((a >> (b & 31)) as f64)
      }
      BinaryOp::UShr => {
        let a = ops::to_uint32(ops::to_number(&self.heap, &left)?);
        let b = ops::to_uint32(ops::to_number(&self.heap, &right)?);
        Value::Number((a >> (b & 31)) as f64)
      }
      BinaryOp::BitOr => self.int32_binary(&left, &right, |a, b| a | b)?,
      BinaryOp::BitXor => self.int32_binary(&left, &right, |a, b| a ^ b)?,
      BinaryOp::BitAnd => self.int32_binary(&left, &right, |a, b| a & b)?,

      BinaryOp::In => {
        let key = ops::to_string_value(&self.heap, &left)?;
        let Value::Object(id) = right else {
          return Err(
            self.throw_type_error(&format!("Cannot use 'in' operator to search for '{key}'")),
          );
        };
        Value::Bool(self.has_property(id, &key)?)
      }
      BinaryOp::Instanceof => Value::Bool(self.instanceof_check(&left, &right)?),
    })
  }

  fn numeric_binary(
    &self,
    left: &Value,
    right: &Value,
    op: impl Fn(f64, f64) -> f64,
  ) -> Result<Value, Error> {
    let a = ops::to_number(&self.heap, left)?;
    let b = ops::to_number(&self.heap, right)?;
    Ok(Value::Number(op(a, b)))
  }

  fn int32_binary(
    &self,
    left: &Value,
    right: &Value,
    op: impl Fn(i32, i32) -> i32,
  ) -> Result<Value, Error> {
    let a = ops::to_int32(ops::to_number(&self.heap, left)?);
    let b = ops::to_int32(ops::to_number(&self.heap, right)?);
    Ok(Value::Number(op(a, b) as f64))
  }

  /// Relational comparison: lexicographic when both operands are strings,
  /// numeric otherwise. `None` means incomparable (a NaN operand).
  fn compare_values(&self, left: &Value, right: &Value) -> Result<Option<Ordering>, Error> {
    if let (Value::String(a), Value::String(b)) = (left, right) {
      return Ok(Some(a.cmp(b)));
    }
    let a = ops::to_number(&self.heap, left)?;
    let b = ops::to_number(&self.heap, right)?;
    Ok(a.partial_cmp(&b))
  }

  fn instanceof_check(&mut self, left: &Value, right: &Value) -> Result<bool, Error> {
    let Value::Object(ctor) = right else {
      return Err(self.throw_type_error("Right-hand side of 'instanceof' is not callable"));
    };
    let prototype = match &self.heap.get(*ctor)?.kind {
      ObjectKind::Function(f) => f.prototype.clone(),
      ObjectKind::Native(n) => n.prototype.clone(),
      // Host semantics: the host's own `prototype` exposure decides.
      ObjectKind::Host(host) if host.is_callable() => host.get("prototype"),
      _ => {
        return Err(self.throw_type_error("Right-hand side of 'instanceof' is not callable"));
      }
    };
    let Some(Value::Object(prototype)) = prototype else {
      return Ok(false);
    };

    let Value::Object(mut current) = left.clone() else {
      return Ok(false);
    };
    loop {
      match self.heap.get(current)?.proto {
        Some(proto) if proto == prototype => return Ok(true),
        Some(proto) => current = proto,
        None => return Ok(false),
      }
    }
  }

  /// Materialises a script function value capturing `env`.
  ///
  /// Non-arrow functions get a fresh `prototype` object wired with a
  /// `constructor` back-reference.
  pub(crate) fn materialize_function(
    &mut self,
    name: Option<&str>,
    params: &[IdExpr],
    body: FunctionBody,
    self_name: Option<JsStr>,
    is_arrow: bool,
    env: EnvId,
  ) -> Result<Value, Error> {
    let params: Rc<[JsStr]> = params
      .iter()
      .map(|param| Rc::from(param.name.as_str()))
      .collect();

    let prototype = if is_arrow {
      None
    } else {
      let proto = self
        .heap
        .alloc(JsObject::ordinary(Some(self.intrinsics.object_prototype)));
      Some(Value::Object(proto))
    };

    let function = ScriptFunction {
      name: Rc::from(name.unwrap_or("")),
      params,
      body,
      env,
      self_name,
      is_arrow,
      prototype: prototype.clone(),
      bound_target: None,
      bound_this: None,
      bound_args: Rc::from(Vec::new()),
    };
    let id = self.heap.alloc(JsObject::new(
      ObjectKind::Function(function),
      Some(self.intrinsics.function_prototype),
    ));

    if let Some(Value::Object(proto)) = prototype {
      self
        .heap
        .get_mut(proto)?
        .props
        .set("constructor", Value::Object(id));
    }

    Ok(Value::Object(id))
  }

  /// Invokes any callable value.
  pub(crate) fn call_value(
    &mut self,
    callee: Value,
    this: Value,
    args: &[Value],
  ) -> Result<Value, Error> {
    enum Dispatch {
      Script,
      Native(crate::native::NativeFn),
      Host(Rc<dyn HostObject>),
      NotCallable,
    }

    let Value::Object(id) = callee else {
      return Err(self.throw_type_error("Value is not a function"));
    };
    let dispatch = match &self.heap.get(id)?.kind {
      ObjectKind::Function(_) => Dispatch::Script,
      ObjectKind::Native(native) => Dispatch::Native(native.call.clone()),
      ObjectKind::Host(host) if host.is_callable() => Dispatch::Host(host.clone()),
      _ => Dispatch::NotCallable,
    };

    match dispatch {
      Dispatch::Script => self.invoke_script_function(id, this, args),
      Dispatch::Native(call) => call(self, this, args),
      Dispatch::Host(host) => host.call(self, this, args),
      Dispatch::NotCallable => Err(self.throw_type_error("Value is not a function")),
    }
  }

  /// `new` on any callable value.
  pub(crate) fn construct_value(&mut self, callee: Value, args: &[Value]) -> Result<Value, Error> {
    enum Dispatch {
      Script(Option<Value>),
      Bound,
      Native(crate::native::NativeFn),
      Host(Rc<dyn HostObject>),
      NotConstructible,
    }

    let Value::Object(id) = callee else {
      return Err(self.throw_type_error("Value is not a constructor"));
    };
    let dispatch = match &self.heap.get(id)?.kind {
      ObjectKind::Function(f) if f.is_bound() => Dispatch::Bound,
      ObjectKind::Function(f) if f.is_arrow => Dispatch::NotConstructible,
      ObjectKind::Function(f) => Dispatch::Script(f.prototype.clone()),
      ObjectKind::Native(native) => match &native.construct {
        Some(construct) => Dispatch::Native(construct.clone()),
        None => Dispatch::NotConstructible,
      },
      ObjectKind::Host(host) if host.is_callable() => Dispatch::Host(host.clone()),
      _ => Dispatch::NotConstructible,
    };

    match dispatch {
      Dispatch::Script(prototype) => {
        let proto = match prototype {
          Some(Value::Object(proto)) => Some(proto),
          _ => Some(self.intrinsics.object_prototype),
        };
        let instance = self.heap.alloc(JsObject::ordinary(proto));
        let result = self.invoke_script_function(id, Value::Object(instance), args)?;
        // A constructor returning an object reference overrides the fresh
        // instance; null and every primitive do not.
        Ok(match result {
          Value::Object(_) => result,
          _ => Value::Object(instance),
        })
      }
      Dispatch::Bound => Err(self.throw_type_error("bound functions are not constructible")),
      Dispatch::Native(construct) => construct(self, Value::Undefined, args),
      Dispatch::Host(host) => host.construct(self, args),
      Dispatch::NotConstructible => Err(self.throw_type_error("Value is not a constructor")),
    }
  }

  /// Invokes a script function: bound substitution, a fresh function frame
  /// over the captured scope, self-name, hoisting, parameters, `arguments`,
  /// `this`, then the body.
  pub(crate) fn invoke_script_function(
    &mut self,
    function: ObjId,
    this: Value,
    args: &[Value],
  ) -> Result<Value, Error> {
    let mut function = function;
    let mut this = this;
    let mut args: Vec<Value> = args.to_vec();

    let resolved = loop {
      let f = match &self.heap.get(function)?.kind {
        ObjectKind::Function(f) => f.clone(),
        _ => return Err(self.throw_type_error("Value is not a function")),
      };
      match f.bound_target {
        Some(target) => {
          this = f.bound_this.clone().unwrap_or(Value::Undefined);
          let mut combined = f.bound_args.to_vec();
          combined.append(&mut args);
          args = combined;
          function = target;
        }
        None => break f,
      }
    };

    if self.call_depth >= self.max_call_depth {
      return Err(self.throw_range_error("Maximum call stack size exceeded"));
    }
    self.call_depth += 1;
    let result = self.invoke_frame(function, &resolved, this, &args);
    self.call_depth -= 1;
    result
  }

  fn invoke_frame(
    &mut self,
    function: ObjId,
    f: &ScriptFunction,
    this: Value,
    args: &[Value],
  ) -> Result<Value, Error> {
    let frame = self.heap.env_alloc(Some(f.env), EnvKind::Function);

    // A named function expression sees itself under its own name.
    if let Some(self_name) = &f.self_name {
      self
        .heap
        .env_declare_let(frame, self_name, Value::Object(function))?;
    }

    if let FunctionBody::Block(block) = &f.body {
      self.hoist_stmt_list(&block.body, frame)?;
    }

    for (idx, param) in f.params.iter().enumerate() {
      let argument = args.get(idx).cloned().unwrap_or(Value::Undefined);
      self.heap.env_declare_let(frame, param, argument)?;
    }

    // Arrows take `this` and `arguments` from the captured scope.
    if !f.is_arrow {
      let arguments = self.alloc_array(args.to_vec());
      self.heap.env_declare_let(frame, "arguments", arguments)?;
      self.heap.env_declare_let(frame, "this", this)?;
    }

    match &f.body {
      FunctionBody::Block(block) => match self.eval_stmt_list(&block.body, frame)? {
        Completion::Return(value) => Ok(value),
        Completion::Normal(_) => Ok(Value::Undefined),
        Completion::Break(..) => Err(Error::Unsupported("break outside of loop".to_string())),
        Completion::Continue(..) => {
          Err(Error::Unsupported("continue outside of loop".to_string()))
        }
      },
      FunctionBody::Expr(expr) => self.eval_expr(expr, frame),
    }
  }

  /// Clones the resolved script-function payload for `bind`.
  pub(crate) fn script_function(&self, id: ObjId) -> Result<Option<ScriptFunction>, Error> {
    Ok(match &self.heap.get(id)?.kind {
      ObjectKind::Function(f) => Some(f.clone()),
      _ => None,
    })
  }

  /// Clones the native-function payload.
  pub(crate) fn native_function(&self, id: ObjId) -> Result<Option<NativeFunction>, Error> {
    Ok(match &self.heap.get(id)?.kind {
      ObjectKind::Native(native) => Some(native.clone()),
      _ => None,
    })
  }
}
