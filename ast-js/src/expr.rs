use crate::op::{AssignOp, BinaryOp, LogicalOp, UnaryOp, UpdateOp};
use crate::stmt::BlockStmt;
use derive_more::derive::From;
use serde::{Deserialize, Serialize};

/// An expression node.
///
/// The discriminant is carried in a `type` field so that JSON produced by a
/// Babel-style parser deserializes directly.
#[derive(Debug, Clone, From, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Expr {
  Identifier(IdExpr),
  ThisExpression(ThisExpr),
  StringLiteral(StrLitExpr),
  NumericLiteral(NumLitExpr),
  BooleanLiteral(BoolLitExpr),
  NullLiteral(NullLitExpr),
  RegExpLiteral(RegexLitExpr),
  ArrayExpression(ArrayExpr),
  ObjectExpression(ObjectExpr),
  FunctionExpression(FuncExpr),
  ArrowFunctionExpression(ArrowFuncExpr),
  MemberExpression(MemberExpr),
  CallExpression(CallExpr),
  NewExpression(NewExpr),
  UnaryExpression(UnaryExpr),
  UpdateExpression(UpdateExpr),
  BinaryExpression(BinaryExpr),
  LogicalExpression(LogicalExpr),
  AssignmentExpression(AssignExpr),
  ConditionalExpression(CondExpr),
  SequenceExpression(SeqExpr),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdExpr {
  pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThisExpr {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrLitExpr {
  pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumLitExpr {
  pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoolLitExpr {
  pub value: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NullLitExpr {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegexLitExpr {
  pub pattern: String,
  #[serde(default)]
  pub flags: String,
}

/// Array literal. Elided holes are `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArrayExpr {
  pub elements: Vec<Option<Expr>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectExpr {
  pub properties: Vec<ObjectMember>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ObjectMember {
  ObjectProperty(ObjectProp),
  ObjectMethod(ObjectMethod),
  SpreadElement(SpreadElement),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectProp {
  pub key: Box<Expr>,
  pub value: Box<Expr>,
  #[serde(default)]
  pub computed: bool,
  #[serde(default)]
  pub shorthand: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectMethod {
  #[serde(default)]
  pub kind: MethodKind,
  pub key: Box<Expr>,
  #[serde(default)]
  pub computed: bool,
  #[serde(default)]
  pub params: Vec<IdExpr>,
  pub body: BlockStmt,
  #[serde(default)]
  pub generator: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodKind {
  #[default]
  Method,
  Get,
  Set,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpreadElement {
  pub argument: Box<Expr>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuncExpr {
  #[serde(default)]
  pub id: Option<IdExpr>,
  #[serde(default)]
  pub params: Vec<IdExpr>,
  pub body: BlockStmt,
  #[serde(default)]
  pub generator: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArrowFuncExpr {
  #[serde(default)]
  pub params: Vec<IdExpr>,
  pub body: ArrowFuncBody,
}

/// An arrow function body: either a block or a bare expression.
///
/// Deserialization tries the (tagged) expression forms first; a
/// `BlockStatement` payload falls through to the block arm.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArrowFuncBody {
  Expr(Box<Expr>),
  Block(BlockStmt),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberExpr {
  pub object: Box<Expr>,
  pub property: Box<Expr>,
  #[serde(default)]
  pub computed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallExpr {
  pub callee: Box<Expr>,
  #[serde(default)]
  pub arguments: Vec<Expr>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewExpr {
  pub callee: Box<Expr>,
  #[serde(default)]
  pub arguments: Vec<Expr>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnaryExpr {
  pub operator: UnaryOp,
  pub argument: Box<Expr>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateExpr {
  pub operator: UpdateOp,
  pub argument: Box<Expr>,
  #[serde(default)]
  pub prefix: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinaryExpr {
  pub operator: BinaryOp,
  pub left: Box<Expr>,
  pub right: Box<Expr>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogicalExpr {
  pub operator: LogicalOp,
  pub left: Box<Expr>,
  pub right: Box<Expr>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignExpr {
  pub operator: AssignOp,
  pub left: Box<Expr>,
  pub right: Box<Expr>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CondExpr {
  pub test: Box<Expr>,
  pub consequent: Box<Expr>,
  pub alternate: Box<Expr>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeqExpr {
  pub expressions: Vec<Expr>,
}
