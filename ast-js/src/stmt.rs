use crate::expr::{Expr, IdExpr};
use derive_more::derive::From;
use serde::{Deserialize, Serialize};

/// A complete program: the unit handed to the interpreter.
///
/// A directive prologue ("use strict" and friends) is carried separately from
/// the body, as Babel emits it. Directives are read and otherwise ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Program {
  #[serde(default)]
  pub body: Vec<Stmt>,
  #[serde(default)]
  pub directives: Vec<Directive>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Directive {
  pub value: DirectiveLit,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectiveLit {
  pub value: String,
}

/// A statement node, discriminated by a `type` field.
#[derive(Debug, Clone, From, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Stmt {
  BlockStatement(BlockStmt),
  EmptyStatement(EmptyStmt),
  ExpressionStatement(ExprStmt),
  VariableDeclaration(VarDecl),
  FunctionDeclaration(FuncDecl),
  IfStatement(IfStmt),
  SwitchStatement(SwitchStmt),
  WhileStatement(WhileStmt),
  DoWhileStatement(DoWhileStmt),
  ForStatement(ForStmt),
  ForInStatement(ForInStmt),
  BreakStatement(BreakStmt),
  ContinueStatement(ContinueStmt),
  ReturnStatement(ReturnStmt),
  LabeledStatement(LabeledStmt),
  TryStatement(TryStmt),
  ThrowStatement(ThrowStmt),
  WithStatement(WithStmt),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlockStmt {
  #[serde(default)]
  pub body: Vec<Stmt>,
  #[serde(default)]
  pub directives: Vec<Directive>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmptyStmt {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExprStmt {
  pub expression: Expr,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VarDecl {
  pub kind: VarDeclKind,
  pub declarations: Vec<VarDeclarator>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VarDeclKind {
  Var,
  Let,
  Const,
}

/// A single declarator. Destructuring patterns in `id` are rejected at the
/// deserialization boundary; only plain identifiers are representable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VarDeclarator {
  pub id: IdExpr,
  #[serde(default)]
  pub init: Option<Expr>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuncDecl {
  pub id: IdExpr,
  #[serde(default)]
  pub params: Vec<IdExpr>,
  pub body: BlockStmt,
  #[serde(default)]
  pub generator: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IfStmt {
  pub test: Expr,
  pub consequent: Box<Stmt>,
  #[serde(default)]
  pub alternate: Option<Box<Stmt>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwitchStmt {
  pub discriminant: Expr,
  #[serde(default)]
  pub cases: Vec<SwitchCase>,
}

/// One `case` clause; `test` is `None` for `default`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwitchCase {
  #[serde(default)]
  pub test: Option<Expr>,
  #[serde(default)]
  pub consequent: Vec<Stmt>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhileStmt {
  pub test: Expr,
  pub body: Box<Stmt>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoWhileStmt {
  pub body: Box<Stmt>,
  pub test: Expr,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForStmt {
  #[serde(default)]
  pub init: Option<ForInit>,
  #[serde(default)]
  pub test: Option<Expr>,
  #[serde(default)]
  pub update: Option<Expr>,
  pub body: Box<Stmt>,
}

/// A `for` header initializer: a declaration or a bare expression.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ForInit {
  Decl(VarDecl),
  Expr(Expr),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForInStmt {
  pub left: ForInTarget,
  pub right: Expr,
  pub body: Box<Stmt>,
}

/// The loop variable of `for (x in o)`: a declaration or an identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ForInTarget {
  Decl(VarDecl),
  Expr(Expr),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BreakStmt {
  #[serde(default)]
  pub label: Option<IdExpr>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContinueStmt {
  #[serde(default)]
  pub label: Option<IdExpr>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReturnStmt {
  #[serde(default)]
  pub argument: Option<Expr>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabeledStmt {
  pub label: IdExpr,
  pub body: Box<Stmt>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TryStmt {
  pub block: BlockStmt,
  #[serde(default)]
  pub handler: Option<CatchClause>,
  #[serde(default)]
  pub finalizer: Option<BlockStmt>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatchClause {
  #[serde(default)]
  pub param: Option<IdExpr>,
  pub body: BlockStmt,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThrowStmt {
  pub argument: Expr,
}

/// Present in the node set so the evaluator can reject it with a stable
/// message; never evaluated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithStmt {
  pub object: Expr,
  pub body: Box<Stmt>,
}
