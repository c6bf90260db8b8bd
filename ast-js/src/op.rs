use serde::{Deserialize, Serialize};

/// Binary operators, including the relational `in` / `instanceof` forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
  #[serde(rename = "==")]
  LooseEq,
  #[serde(rename = "!=")]
  LooseNe,
  #[serde(rename = "===")]
  StrictEq,
  #[serde(rename = "!==")]
  StrictNe,
  #[serde(rename = "<")]
  Lt,
  #[serde(rename = "<=")]
  Le,
  #[serde(rename = ">")]
  Gt,
  #[serde(rename = ">=")]
  Ge,
  #[serde(rename = "<<")]
  Shl,
  #[serde(rename = ">>")]
  Shr,
  #[serde(rename = ">>>")]
  UShr,
  #[serde(rename = "+")]
  Add,
  #[serde(rename = "-")]
  Sub,
  #[serde(rename = "*")]
  Mul,
  #[serde(rename = "/")]
  Div,
  #[serde(rename = "%")]
  Rem,
  #[serde(rename = "|")]
  BitOr,
  #[serde(rename = "^")]
  BitXor,
  #[serde(rename = "&")]
  BitAnd,
  #[serde(rename = "in")]
  In,
  #[serde(rename = "instanceof")]
  Instanceof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogicalOp {
  #[serde(rename = "&&")]
  And,
  #[serde(rename = "||")]
  Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
  #[serde(rename = "-")]
  Neg,
  #[serde(rename = "+")]
  Pos,
  #[serde(rename = "!")]
  Not,
  #[serde(rename = "~")]
  BitNot,
  #[serde(rename = "typeof")]
  Typeof,
  #[serde(rename = "void")]
  Void,
  #[serde(rename = "delete")]
  Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdateOp {
  #[serde(rename = "++")]
  Inc,
  #[serde(rename = "--")]
  Dec,
}

/// Assignment operators. Compound forms carry the arithmetic/bitwise/shift
/// operator applied between the old value and the right-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignOp {
  #[serde(rename = "=")]
  Assign,
  #[serde(rename = "+=")]
  AddAssign,
  #[serde(rename = "-=")]
  SubAssign,
  #[serde(rename = "*=")]
  MulAssign,
  #[serde(rename = "/=")]
  DivAssign,
  #[serde(rename = "%=")]
  RemAssign,
  #[serde(rename = "<<=")]
  ShlAssign,
  #[serde(rename = ">>=")]
  ShrAssign,
  #[serde(rename = ">>>=")]
  UShrAssign,
  #[serde(rename = "|=")]
  BitOrAssign,
  #[serde(rename = "^=")]
  BitXorAssign,
  #[serde(rename = "&=")]
  BitAndAssign,
}

impl AssignOp {
  /// The binary operator a compound assignment applies, or `None` for `=`.
  pub fn binary_op(self) -> Option<BinaryOp> {
    Some(match self {
      AssignOp::Assign => return None,
      AssignOp::AddAssign => BinaryOp::Add,
      AssignOp::SubAssign => BinaryOp::Sub,
      AssignOp::MulAssign => BinaryOp::Mul,
      AssignOp::DivAssign => BinaryOp::Div,
      AssignOp::RemAssign => BinaryOp::Rem,
      AssignOp::ShlAssign => BinaryOp::Shl,
      AssignOp::ShrAssign => BinaryOp::Shr,
      AssignOp::UShrAssign => BinaryOp::UShr,
      AssignOp::BitOrAssign => BinaryOp::BitOr,
      AssignOp::BitXorAssign => BinaryOp::BitXor,
      AssignOp::BitAndAssign => BinaryOp::BitAnd,
    })
  }
}
