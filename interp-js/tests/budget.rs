mod common;

use common::*;
use interp_js::{Error, InterpreterOptions, Value};

#[test]
fn infinite_loop_hits_the_operation_ceiling() {
  let mut rt = interp_with(InterpreterOptions {
    max_ops: Some(1000),
    ..Default::default()
  });
  let err = eval(&mut rt, vec![while_stmt(boolean(true), vec![])]).unwrap_err();
  assert!(matches!(err, Error::Timeout));
  assert_eq!(
    err.to_string(),
    "Execution timeout: maximum operations exceeded"
  );
}

#[test]
fn empty_for_loop_is_still_budgeted() {
  let mut rt = interp_with(InterpreterOptions {
    max_ops: Some(1000),
    ..Default::default()
  });
  let forever = ast_js::Stmt::ForStatement(ast_js::ForStmt {
    init: None,
    test: None,
    update: None,
    body: Box::new(block(vec![])),
  });
  let err = eval(&mut rt, vec![forever]).unwrap_err();
  assert!(matches!(err, Error::Timeout));
}

#[test]
fn timeout_is_not_catchable_by_script_handlers() {
  let mut rt = interp_with(InterpreterOptions {
    max_ops: Some(500),
    ..Default::default()
  });
  let err = eval(
    &mut rt,
    vec![try_stmt(
      vec![while_stmt(boolean(true), vec![])],
      Some(("e", vec![expr_stmt(str_("swallowed"))])),
      None,
    )],
  )
  .unwrap_err();
  assert!(matches!(err, Error::Timeout));
}

#[test]
fn the_counter_resets_between_top_level_evaluations() {
  let mut rt = interp_with(InterpreterOptions {
    max_ops: Some(200),
    ..Default::default()
  });
  // Each run fits the budget on its own; only a shared counter would trip.
  for _ in 0..10 {
    let value = eval_ok(
      &mut rt,
      vec![
        var_decl("n", num(0.0)),
        for_var(
          "i",
          num(0.0),
          lt(id("i"), num(10.0)),
          update(ast_js::UpdateOp::Inc, false, id("i")),
          vec![expr_stmt(assign(id("n"), add(id("n"), num(1.0))))],
        ),
        expr_stmt(id("n")),
      ],
    );
    assert_eq!(value, Value::Number(10.0));
  }
}

#[test]
fn recursion_consumes_the_budget_too() {
  let mut rt = interp_with(InterpreterOptions {
    max_ops: Some(300),
    max_call_depth: Some(100_000),
    ..Default::default()
  });
  let err = eval(
    &mut rt,
    vec![
      func_decl("spin", &[], vec![ret(call_fn("spin", vec![]))]),
      expr_stmt(call_fn("spin", vec![])),
    ],
  )
  .unwrap_err();
  assert!(matches!(err, Error::Timeout));
}

#[test]
fn unbounded_by_default() {
  let mut rt = interp();
  let value = eval_ok(
    &mut rt,
    vec![
      var_decl("n", num(0.0)),
      for_var(
        "i",
        num(0.0),
        lt(id("i"), num(20000.0)),
        update(ast_js::UpdateOp::Inc, false, id("i")),
        vec![expr_stmt(assign(id("n"), add(id("n"), num(1.0))))],
      ),
      expr_stmt(id("n")),
    ],
  );
  assert_eq!(value, Value::Number(20000.0));
}
