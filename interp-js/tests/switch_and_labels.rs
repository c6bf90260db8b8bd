mod common;

use ast_js::UpdateOp;
use common::*;
use interp_js::Value;

#[test]
fn switch_fallthrough_and_break() {
  let mut rt = interp();
  // var y = 0; switch (2) { case 1: y = 1; break; case 2: y = 2; case 3: y = y + 1; } y
  let value = eval_ok(
    &mut rt,
    vec![
      var_decl("y", num(0.0)),
      switch(
        num(2.0),
        vec![
          case(
            num(1.0),
            vec![expr_stmt(assign(id("y"), num(1.0))), break_stmt(None)],
          ),
          case(num(2.0), vec![expr_stmt(assign(id("y"), num(2.0)))]),
          case(
            num(3.0),
            vec![expr_stmt(assign(id("y"), add(id("y"), num(1.0))))],
          ),
        ],
      ),
      expr_stmt(id("y")),
    ],
  );
  assert_eq!(value, Value::Number(3.0));
}

#[test]
fn switch_discriminant_matches_strictly() {
  let mut rt = interp();
  // switch ("2") must not match case 2.
  let value = eval_ok(
    &mut rt,
    vec![
      var_decl("r", str_("none")),
      switch(
        str_("2"),
        vec![
          case(num(2.0), vec![expr_stmt(assign(id("r"), str_("number")))]),
          default_case(vec![expr_stmt(assign(id("r"), str_("default")))]),
        ],
      ),
      expr_stmt(id("r")),
    ],
  );
  assert_eq!(value, Value::string("default"));
}

#[test]
fn default_falls_through_to_following_cases() {
  let mut rt = interp();
  let value = eval_ok(
    &mut rt,
    vec![
      var_decl("trace", str_("")),
      switch(
        num(99.0),
        vec![
          case(
            num(1.0),
            vec![expr_stmt(assign_op(
              ast_js::AssignOp::AddAssign,
              id("trace"),
              str_("a"),
            ))],
          ),
          default_case(vec![expr_stmt(assign_op(
            ast_js::AssignOp::AddAssign,
            id("trace"),
            str_("d"),
          ))]),
          case(
            num(2.0),
            vec![expr_stmt(assign_op(
              ast_js::AssignOp::AddAssign,
              id("trace"),
              str_("b"),
            ))],
          ),
        ],
      ),
      expr_stmt(id("trace")),
    ],
  );
  assert_eq!(value, Value::string("db"));
}

#[test]
fn no_matching_case_and_no_default_is_a_no_op() {
  let mut rt = interp();
  let value = eval_ok(
    &mut rt,
    vec![
      var_decl("y", num(7.0)),
      switch(
        num(5.0),
        vec![case(num(1.0), vec![expr_stmt(assign(id("y"), num(0.0)))])],
      ),
      expr_stmt(id("y")),
    ],
  );
  assert_eq!(value, Value::Number(7.0));
}

#[test]
fn labelled_break_exits_both_loops() {
  let mut rt = interp();
  // outer: for (var i=0;i<3;i++) for (var j=0;j<3;j++) {
  //   if (i===1 && j===1) break outer; n++;
  // }
  let value = eval_ok(
    &mut rt,
    vec![
      var_decl("n", num(0.0)),
      labeled(
        "outer",
        for_var(
          "i",
          num(0.0),
          lt(id("i"), num(3.0)),
          update(UpdateOp::Inc, false, id("i")),
          vec![for_var(
            "j",
            num(0.0),
            lt(id("j"), num(3.0)),
            update(UpdateOp::Inc, false, id("j")),
            vec![
              if_stmt(
                and(strict_eq(id("i"), num(1.0)), strict_eq(id("j"), num(1.0))),
                vec![break_stmt(Some("outer"))],
              ),
              expr_stmt(update(UpdateOp::Inc, false, id("n"))),
            ],
          )],
        ),
      ),
      expr_stmt(id("n")),
    ],
  );
  assert_eq!(value, Value::Number(4.0));
}

#[test]
fn labelled_continue_targets_the_outer_loop() {
  let mut rt = interp();
  // n counts inner entries; continue outer skips the rest of the inner loop.
  let value = eval_ok(
    &mut rt,
    vec![
      var_decl("n", num(0.0)),
      labeled(
        "outer",
        for_var(
          "i",
          num(0.0),
          lt(id("i"), num(3.0)),
          update(UpdateOp::Inc, false, id("i")),
          vec![for_var(
            "j",
            num(0.0),
            lt(id("j"), num(3.0)),
            update(UpdateOp::Inc, false, id("j")),
            vec![
              expr_stmt(update(UpdateOp::Inc, false, id("n"))),
              continue_stmt(Some("outer")),
            ],
          )],
        ),
      ),
      expr_stmt(id("n")),
    ],
  );
  assert_eq!(value, Value::Number(3.0));
}

#[test]
fn labelled_break_out_of_a_plain_block() {
  let mut rt = interp();
  let value = eval_ok(
    &mut rt,
    vec![
      var_decl("trace", str_("")),
      labeled(
        "skip",
        block(vec![
          expr_stmt(assign_op(ast_js::AssignOp::AddAssign, id("trace"), str_("a"))),
          break_stmt(Some("skip")),
          expr_stmt(assign_op(ast_js::AssignOp::AddAssign, id("trace"), str_("b"))),
        ]),
      ),
      expr_stmt(id("trace")),
    ],
  );
  assert_eq!(value, Value::string("a"));
}

#[test]
fn unlabelled_break_stays_in_the_inner_loop() {
  let mut rt = interp();
  let value = eval_ok(
    &mut rt,
    vec![
      var_decl("n", num(0.0)),
      for_var(
        "i",
        num(0.0),
        lt(id("i"), num(2.0)),
        update(UpdateOp::Inc, false, id("i")),
        vec![while_stmt(
          boolean(true),
          vec![
            expr_stmt(update(UpdateOp::Inc, false, id("n"))),
            break_stmt(None),
          ],
        )],
      ),
      expr_stmt(id("n")),
    ],
  );
  assert_eq!(value, Value::Number(2.0));
}

#[test]
fn do_while_runs_at_least_once() {
  let mut rt = interp();
  let value = eval_ok(
    &mut rt,
    vec![
      var_decl("n", num(0.0)),
      do_while(
        vec![expr_stmt(update(UpdateOp::Inc, false, id("n")))],
        boolean(false),
      ),
      expr_stmt(id("n")),
    ],
  );
  assert_eq!(value, Value::Number(1.0));
}

#[test]
fn switch_value_flows_out_of_a_break() {
  let mut rt = interp();
  let value = eval_ok(
    &mut rt,
    vec![switch(
      num(2.0),
      vec![case(num(2.0), vec![expr_stmt(num(42.0)), break_stmt(None)])],
    )],
  );
  assert_eq!(value, Value::Number(42.0));
}
