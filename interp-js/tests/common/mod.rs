//! Shared test prelude: terse builders for the tree shapes a host parser
//! would produce, plus interpreter constructors.
#![allow(dead_code)]

use ast_js::{
  ArrayExpr, ArrowFuncBody, ArrowFuncExpr, AssignExpr, AssignOp, BinaryExpr, BinaryOp, BlockStmt,
  BoolLitExpr, BreakStmt, CallExpr, CatchClause, CondExpr, ContinueStmt, DoWhileStmt, EmptyStmt,
  Expr, ExprStmt, ForInStmt, ForInTarget, ForInit, ForStmt, FuncDecl, FuncExpr, IdExpr, IfStmt,
  LabeledStmt, LogicalExpr, LogicalOp, MemberExpr, MethodKind, NewExpr, NullLitExpr, NumLitExpr,
  ObjectExpr, ObjectMember, ObjectMethod, ObjectProp, Program, ReturnStmt, SeqExpr, SpreadElement,
  Stmt, StrLitExpr, SwitchCase, SwitchStmt, ThisExpr, ThrowStmt, TryStmt, UnaryExpr, UnaryOp,
  UpdateExpr, UpdateOp, VarDecl, VarDeclKind, VarDeclarator, WhileStmt,
};
use interp_js::{Error, Interpreter, InterpreterOptions, Value};

pub fn interp() -> Interpreter {
  Interpreter::new(InterpreterOptions::default()).unwrap()
}

pub fn interp_with(options: InterpreterOptions) -> Interpreter {
  Interpreter::new(options).unwrap()
}

pub fn program(body: Vec<Stmt>) -> Program {
  Program {
    body,
    directives: Vec::new(),
  }
}

pub fn eval(interp: &mut Interpreter, body: Vec<Stmt>) -> Result<Value, Error> {
  interp.evaluate(&program(body))
}

pub fn eval_ok(interp: &mut Interpreter, body: Vec<Stmt>) -> Value {
  eval(interp, body).unwrap()
}

pub fn thrown_message(interp: &Interpreter, error: &Error) -> String {
  interp.exception_message(error).unwrap_or_default()
}

// Expressions --------------------------------------------------------------

pub fn ident(name: &str) -> IdExpr {
  IdExpr {
    name: name.to_string(),
  }
}

pub fn id(name: &str) -> Expr {
  Expr::Identifier(ident(name))
}

pub fn this() -> Expr {
  Expr::ThisExpression(ThisExpr {})
}

pub fn num(value: f64) -> Expr {
  Expr::NumericLiteral(NumLitExpr { value })
}

pub fn str_(value: &str) -> Expr {
  Expr::StringLiteral(StrLitExpr {
    value: value.to_string(),
  })
}

pub fn boolean(value: bool) -> Expr {
  Expr::BooleanLiteral(BoolLitExpr { value })
}

pub fn null() -> Expr {
  Expr::NullLiteral(NullLitExpr {})
}

pub fn array(elements: Vec<Expr>) -> Expr {
  Expr::ArrayExpression(ArrayExpr {
    elements: elements.into_iter().map(Some).collect(),
  })
}

pub fn array_with_holes(elements: Vec<Option<Expr>>) -> Expr {
  Expr::ArrayExpression(ArrayExpr { elements })
}

pub fn object(props: Vec<(&str, Expr)>) -> Expr {
  Expr::ObjectExpression(ObjectExpr {
    properties: props
      .into_iter()
      .map(|(key, value)| {
        ObjectMember::ObjectProperty(ObjectProp {
          key: Box::new(id(key)),
          value: Box::new(value),
          computed: false,
          shorthand: false,
        })
      })
      .collect(),
  })
}

pub fn object_members(members: Vec<ObjectMember>) -> Expr {
  Expr::ObjectExpression(ObjectExpr {
    properties: members,
  })
}

pub fn prop(key: &str, value: Expr) -> ObjectMember {
  ObjectMember::ObjectProperty(ObjectProp {
    key: Box::new(id(key)),
    value: Box::new(value),
    computed: false,
    shorthand: false,
  })
}

pub fn computed_prop(key: Expr, value: Expr) -> ObjectMember {
  ObjectMember::ObjectProperty(ObjectProp {
    key: Box::new(key),
    value: Box::new(value),
    computed: true,
    shorthand: false,
  })
}

pub fn shorthand_method(name: &str, params: &[&str], body: Vec<Stmt>) -> ObjectMember {
  ObjectMember::ObjectMethod(ObjectMethod {
    kind: MethodKind::Method,
    key: Box::new(id(name)),
    computed: false,
    params: params.iter().map(|p| ident(p)).collect(),
    body: BlockStmt {
      body,
      directives: Vec::new(),
    },
    generator: false,
  })
}

pub fn spread(argument: Expr) -> ObjectMember {
  ObjectMember::SpreadElement(SpreadElement {
    argument: Box::new(argument),
  })
}

pub fn binary(operator: BinaryOp, left: Expr, right: Expr) -> Expr {
  Expr::BinaryExpression(BinaryExpr {
    operator,
    left: Box::new(left),
    right: Box::new(right),
  })
}

pub fn add(left: Expr, right: Expr) -> Expr {
  binary(BinaryOp::Add, left, right)
}

pub fn sub(left: Expr, right: Expr) -> Expr {
  binary(BinaryOp::Sub, left, right)
}

pub fn mul(left: Expr, right: Expr) -> Expr {
  binary(BinaryOp::Mul, left, right)
}

pub fn lt(left: Expr, right: Expr) -> Expr {
  binary(BinaryOp::Lt, left, right)
}

pub fn le(left: Expr, right: Expr) -> Expr {
  binary(BinaryOp::Le, left, right)
}

pub fn strict_eq(left: Expr, right: Expr) -> Expr {
  binary(BinaryOp::StrictEq, left, right)
}

pub fn logical(operator: LogicalOp, left: Expr, right: Expr) -> Expr {
  Expr::LogicalExpression(LogicalExpr {
    operator,
    left: Box::new(left),
    right: Box::new(right),
  })
}

pub fn and(left: Expr, right: Expr) -> Expr {
  logical(LogicalOp::And, left, right)
}

pub fn or(left: Expr, right: Expr) -> Expr {
  logical(LogicalOp::Or, left, right)
}

pub fn unary(operator: UnaryOp, argument: Expr) -> Expr {
  Expr::UnaryExpression(UnaryExpr {
    operator,
    argument: Box::new(argument),
  })
}

pub fn update(operator: UpdateOp, prefix: bool, argument: Expr) -> Expr {
  Expr::UpdateExpression(UpdateExpr {
    operator,
    argument: Box::new(argument),
    prefix,
  })
}

pub fn assign(left: Expr, right: Expr) -> Expr {
  assign_op(AssignOp::Assign, left, right)
}

pub fn assign_op(operator: AssignOp, left: Expr, right: Expr) -> Expr {
  Expr::AssignmentExpression(AssignExpr {
    operator,
    left: Box::new(left),
    right: Box::new(right),
  })
}

pub fn cond(test: Expr, consequent: Expr, alternate: Expr) -> Expr {
  Expr::ConditionalExpression(CondExpr {
    test: Box::new(test),
    consequent: Box::new(consequent),
    alternate: Box::new(alternate),
  })
}

pub fn seq(expressions: Vec<Expr>) -> Expr {
  Expr::SequenceExpression(SeqExpr { expressions })
}

pub fn member(object: Expr, property: &str) -> Expr {
  Expr::MemberExpression(MemberExpr {
    object: Box::new(object),
    property: Box::new(id(property)),
    computed: false,
  })
}

pub fn index(object: Expr, property: Expr) -> Expr {
  Expr::MemberExpression(MemberExpr {
    object: Box::new(object),
    property: Box::new(property),
    computed: true,
  })
}

pub fn call(callee: Expr, arguments: Vec<Expr>) -> Expr {
  Expr::CallExpression(CallExpr {
    callee: Box::new(callee),
    arguments,
  })
}

pub fn call_fn(name: &str, arguments: Vec<Expr>) -> Expr {
  call(id(name), arguments)
}

pub fn method(object: Expr, name: &str, arguments: Vec<Expr>) -> Expr {
  call(member(object, name), arguments)
}

pub fn new_(callee: Expr, arguments: Vec<Expr>) -> Expr {
  Expr::NewExpression(NewExpr {
    callee: Box::new(callee),
    arguments,
  })
}

pub fn func_expr(name: Option<&str>, params: &[&str], body: Vec<Stmt>) -> Expr {
  Expr::FunctionExpression(FuncExpr {
    id: name.map(ident),
    params: params.iter().map(|p| ident(p)).collect(),
    body: BlockStmt {
      body,
      directives: Vec::new(),
    },
    generator: false,
  })
}

pub fn arrow_expr(params: &[&str], body: Expr) -> Expr {
  Expr::ArrowFunctionExpression(ArrowFuncExpr {
    params: params.iter().map(|p| ident(p)).collect(),
    body: ArrowFuncBody::Expr(Box::new(body)),
  })
}

pub fn arrow_block(params: &[&str], body: Vec<Stmt>) -> Expr {
  Expr::ArrowFunctionExpression(ArrowFuncExpr {
    params: params.iter().map(|p| ident(p)).collect(),
    body: ArrowFuncBody::Block(BlockStmt {
      body,
      directives: Vec::new(),
    }),
  })
}

// Statements ---------------------------------------------------------------

pub fn expr_stmt(expression: Expr) -> Stmt {
  Stmt::ExpressionStatement(ExprStmt { expression })
}

pub fn empty() -> Stmt {
  Stmt::EmptyStatement(EmptyStmt {})
}

pub fn decl(kind: VarDeclKind, name: &str, init: Option<Expr>) -> Stmt {
  Stmt::VariableDeclaration(VarDecl {
    kind,
    declarations: vec![VarDeclarator {
      id: ident(name),
      init,
    }],
  })
}

pub fn var_decl(name: &str, init: Expr) -> Stmt {
  decl(VarDeclKind::Var, name, Some(init))
}

pub fn var_uninit(name: &str) -> Stmt {
  decl(VarDeclKind::Var, name, None)
}

pub fn let_decl(name: &str, init: Expr) -> Stmt {
  decl(VarDeclKind::Let, name, Some(init))
}

pub fn const_decl(name: &str, init: Expr) -> Stmt {
  decl(VarDeclKind::Const, name, Some(init))
}

pub fn func_decl(name: &str, params: &[&str], body: Vec<Stmt>) -> Stmt {
  Stmt::FunctionDeclaration(FuncDecl {
    id: ident(name),
    params: params.iter().map(|p| ident(p)).collect(),
    body: BlockStmt {
      body,
      directives: Vec::new(),
    },
    generator: false,
  })
}

pub fn ret(argument: Expr) -> Stmt {
  Stmt::ReturnStatement(ReturnStmt {
    argument: Some(argument),
  })
}

pub fn ret_void() -> Stmt {
  Stmt::ReturnStatement(ReturnStmt { argument: None })
}

pub fn block(body: Vec<Stmt>) -> Stmt {
  Stmt::BlockStatement(BlockStmt {
    body,
    directives: Vec::new(),
  })
}

pub fn if_stmt(test: Expr, consequent: Vec<Stmt>) -> Stmt {
  Stmt::IfStatement(IfStmt {
    test,
    consequent: Box::new(block(consequent)),
    alternate: None,
  })
}

pub fn if_else(test: Expr, consequent: Vec<Stmt>, alternate: Vec<Stmt>) -> Stmt {
  Stmt::IfStatement(IfStmt {
    test,
    consequent: Box::new(block(consequent)),
    alternate: Some(Box::new(block(alternate))),
  })
}

pub fn while_stmt(test: Expr, body: Vec<Stmt>) -> Stmt {
  Stmt::WhileStatement(WhileStmt {
    test,
    body: Box::new(block(body)),
  })
}

pub fn do_while(body: Vec<Stmt>, test: Expr) -> Stmt {
  Stmt::DoWhileStatement(DoWhileStmt {
    body: Box::new(block(body)),
    test,
  })
}

/// `for (var <name> = <init>; <test>; <update>) { body }`
pub fn for_var(name: &str, init: Expr, test: Expr, update: Expr, body: Vec<Stmt>) -> Stmt {
  Stmt::ForStatement(ForStmt {
    init: Some(ForInit::Decl(VarDecl {
      kind: VarDeclKind::Var,
      declarations: vec![VarDeclarator {
        id: ident(name),
        init: Some(init),
      }],
    })),
    test: Some(test),
    update: Some(update),
    body: Box::new(block(body)),
  })
}

pub fn for_in_var(name: &str, right: Expr, body: Vec<Stmt>) -> Stmt {
  Stmt::ForInStatement(ForInStmt {
    left: ForInTarget::Decl(VarDecl {
      kind: VarDeclKind::Var,
      declarations: vec![VarDeclarator {
        id: ident(name),
        init: None,
      }],
    }),
    right,
    body: Box::new(block(body)),
  })
}

pub fn break_stmt(label: Option<&str>) -> Stmt {
  Stmt::BreakStatement(BreakStmt {
    label: label.map(ident),
  })
}

pub fn continue_stmt(label: Option<&str>) -> Stmt {
  Stmt::ContinueStatement(ContinueStmt {
    label: label.map(ident),
  })
}

pub fn labeled(label: &str, body: Stmt) -> Stmt {
  Stmt::LabeledStatement(LabeledStmt {
    label: ident(label),
    body: Box::new(body),
  })
}

pub fn switch(discriminant: Expr, cases: Vec<SwitchCase>) -> Stmt {
  Stmt::SwitchStatement(SwitchStmt {
    discriminant,
    cases,
  })
}

pub fn case(test: Expr, consequent: Vec<Stmt>) -> SwitchCase {
  SwitchCase {
    test: Some(test),
    consequent,
  }
}

pub fn default_case(consequent: Vec<Stmt>) -> SwitchCase {
  SwitchCase {
    test: None,
    consequent,
  }
}

pub fn throw(argument: Expr) -> Stmt {
  Stmt::ThrowStatement(ThrowStmt { argument })
}

pub fn try_stmt(
  block_body: Vec<Stmt>,
  handler: Option<(&str, Vec<Stmt>)>,
  finalizer: Option<Vec<Stmt>>,
) -> Stmt {
  Stmt::TryStatement(TryStmt {
    block: BlockStmt {
      body: block_body,
      directives: Vec::new(),
    },
    handler: handler.map(|(param, body)| CatchClause {
      param: Some(ident(param)),
      body: BlockStmt {
        body,
        directives: Vec::new(),
      },
    }),
    finalizer: finalizer.map(|body| BlockStmt {
      body,
      directives: Vec::new(),
    }),
  })
}
