//! ES5 syntax tree definitions for `interp-js`.
//!
//! This crate defines the node set the interpreter consumes. It contains no
//! parser and no evaluator: the host produces trees (typically with a
//! JavaScript-side parser) and hands them over, either as Rust values or as
//! Babel-style JSON.
//!
//! - Every node enum is serde-tagged on a `type` field with Babel's node
//!   names (`"BinaryExpression"`, `"VariableDeclaration"`, …), and field
//!   names follow Babel's (`consequent`, `discriminant`, `finalizer`, …), so
//!   `serde_json::from_str::<Program>(babel_output)` works directly. Unknown
//!   fields (`loc`, `start`, `end`, comments) are ignored.
//! - Node kinds outside the supported set fail at the deserialization
//!   boundary; kinds that are representable but not executable (`with`,
//!   generators, accessor object methods) are rejected by the evaluator.

mod expr;
mod op;
mod stmt;

pub use crate::expr::ArrayExpr;
pub use crate::expr::ArrowFuncBody;
pub use crate::expr::ArrowFuncExpr;
pub use crate::expr::AssignExpr;
pub use crate::expr::BinaryExpr;
pub use crate::expr::BoolLitExpr;
pub use crate::expr::CallExpr;
pub use crate::expr::CondExpr;
pub use crate::expr::Expr;
pub use crate::expr::FuncExpr;
pub use crate::expr::IdExpr;
pub use crate::expr::LogicalExpr;
pub use crate::expr::MemberExpr;
pub use crate::expr::MethodKind;
pub use crate::expr::NewExpr;
pub use crate::expr::NullLitExpr;
pub use crate::expr::NumLitExpr;
pub use crate::expr::ObjectExpr;
pub use crate::expr::ObjectMember;
pub use crate::expr::ObjectMethod;
pub use crate::expr::ObjectProp;
pub use crate::expr::RegexLitExpr;
pub use crate::expr::SeqExpr;
pub use crate::expr::SpreadElement;
pub use crate::expr::StrLitExpr;
pub use crate::expr::ThisExpr;
pub use crate::expr::UnaryExpr;
pub use crate::expr::UpdateExpr;
pub use crate::op::AssignOp;
pub use crate::op::BinaryOp;
pub use crate::op::LogicalOp;
pub use crate::op::UnaryOp;
pub use crate::op::UpdateOp;
pub use crate::stmt::BlockStmt;
pub use crate::stmt::BreakStmt;
pub use crate::stmt::CatchClause;
pub use crate::stmt::ContinueStmt;
pub use crate::stmt::Directive;
pub use crate::stmt::DirectiveLit;
pub use crate::stmt::DoWhileStmt;
pub use crate::stmt::EmptyStmt;
pub use crate::stmt::ExprStmt;
pub use crate::stmt::ForInStmt;
pub use crate::stmt::ForInTarget;
pub use crate::stmt::ForInit;
pub use crate::stmt::ForStmt;
pub use crate::stmt::FuncDecl;
pub use crate::stmt::IfStmt;
pub use crate::stmt::LabeledStmt;
pub use crate::stmt::Program;
pub use crate::stmt::ReturnStmt;
pub use crate::stmt::Stmt;
pub use crate::stmt::SwitchCase;
pub use crate::stmt::SwitchStmt;
pub use crate::stmt::ThrowStmt;
pub use crate::stmt::TryStmt;
pub use crate::stmt::VarDecl;
pub use crate::stmt::VarDeclKind;
pub use crate::stmt::VarDeclarator;
pub use crate::stmt::WhileStmt;
pub use crate::stmt::WithStmt;
