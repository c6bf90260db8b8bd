mod common;

use common::*;
use interp_js::Value;

#[test]
fn map_then_join() {
  let mut rt = interp();
  // [1,2,3].map(function(x){ return x * 2; }).join(",")
  let value = eval_ok(
    &mut rt,
    vec![expr_stmt(method(
      method(
        array(vec![num(1.0), num(2.0), num(3.0)]),
        "map",
        vec![func_expr(None, &["x"], vec![ret(mul(id("x"), num(2.0)))])],
      ),
      "join",
      vec![str_(",")],
    ))],
  );
  assert_eq!(value, Value::string("2,4,6"));
}

#[test]
fn push_pop_shift_unshift() {
  let mut rt = interp();
  let value = eval_ok(
    &mut rt,
    vec![
      var_decl("a", array(vec![num(2.0)])),
      expr_stmt(method(id("a"), "push", vec![num(3.0)])),
      expr_stmt(method(id("a"), "unshift", vec![num(1.0)])),
      var_decl("tail", method(id("a"), "pop", vec![])),
      var_decl("head", method(id("a"), "shift", vec![])),
      expr_stmt(array(vec![
        id("head"),
        id("tail"),
        member(id("a"), "length"),
        index(id("a"), num(0.0)),
      ])),
    ],
  );
  assert_eq!(rt.to_display_string(&value).unwrap(), "1,3,1,2");
}

#[test]
fn push_returns_the_new_length() {
  let mut rt = interp();
  let value = eval_ok(
    &mut rt,
    vec![expr_stmt(method(
      array(vec![num(0.0)]),
      "push",
      vec![num(1.0), num(2.0)],
    ))],
  );
  assert_eq!(value, Value::Number(3.0));
}

#[test]
fn index_of_uses_strict_equality() {
  let mut rt = interp();
  let value = eval_ok(
    &mut rt,
    vec![expr_stmt(method(
      array(vec![str_("1"), num(1.0)]),
      "indexOf",
      vec![num(1.0)],
    ))],
  );
  assert_eq!(value, Value::Number(1.0));

  let value = eval_ok(
    &mut rt,
    vec![expr_stmt(method(
      array(vec![num(5.0)]),
      "indexOf",
      vec![num(6.0)],
    ))],
  );
  assert_eq!(value, Value::Number(-1.0));
}

#[test]
fn slice_handles_negative_bounds() {
  let mut rt = interp();
  let value = eval_ok(
    &mut rt,
    vec![expr_stmt(method(
      method(
        array(vec![num(1.0), num(2.0), num(3.0), num(4.0)]),
        "slice",
        vec![num(1.0), num(-1.0)],
      ),
      "join",
      vec![str_(",")],
    ))],
  );
  assert_eq!(value, Value::string("2,3"));
}

#[test]
fn concat_flattens_array_arguments_one_level() {
  let mut rt = interp();
  let value = eval_ok(
    &mut rt,
    vec![expr_stmt(method(
      method(
        array(vec![num(1.0)]),
        "concat",
        vec![array(vec![num(2.0), num(3.0)]), num(4.0)],
      ),
      "join",
      vec![str_("-")],
    ))],
  );
  assert_eq!(value, Value::string("1-2-3-4"));
}

#[test]
fn filter_and_for_each() {
  let mut rt = interp();
  let value = eval_ok(
    &mut rt,
    vec![
      var_decl("sum", num(0.0)),
      expr_stmt(method(
        method(
          array(vec![num(1.0), num(2.0), num(3.0), num(4.0)]),
          "filter",
          vec![func_expr(
            None,
            &["x"],
            vec![ret(binary(ast_js::BinaryOp::Rem, id("x"), num(2.0)))],
          )],
        ),
        "forEach",
        vec![func_expr(
          None,
          &["x"],
          vec![expr_stmt(assign(id("sum"), add(id("sum"), id("x"))))],
        )],
      )),
      expr_stmt(id("sum")),
    ],
  );
  // 1 % 2 and 3 % 2 are truthy.
  assert_eq!(value, Value::Number(4.0));
}

#[test]
fn map_callback_receives_index_and_array() {
  let mut rt = interp();
  let value = eval_ok(
    &mut rt,
    vec![expr_stmt(method(
      method(
        array(vec![str_("a"), str_("b")]),
        "map",
        vec![func_expr(
          None,
          &["v", "i", "arr"],
          vec![ret(add(add(id("v"), id("i")), member(id("arr"), "length")))],
        )],
      ),
      "join",
      vec![str_(",")],
    ))],
  );
  assert_eq!(value, Value::string("a02,b12"));
}

#[test]
fn length_reads_and_truncating_writes() {
  let mut rt = interp();
  let value = eval_ok(
    &mut rt,
    vec![
      var_decl("a", array(vec![num(1.0), num(2.0), num(3.0)])),
      expr_stmt(assign(member(id("a"), "length"), num(1.0))),
      expr_stmt(array(vec![
        member(id("a"), "length"),
        index(id("a"), num(0.0)),
      ])),
    ],
  );
  assert_eq!(rt.to_display_string(&value).unwrap(), "1,1");
}

#[test]
fn out_of_range_writes_extend_with_holes() {
  let mut rt = interp();
  let value = eval_ok(
    &mut rt,
    vec![
      var_decl("a", array(vec![])),
      expr_stmt(assign(index(id("a"), num(2.0)), num(9.0))),
      expr_stmt(array(vec![
        member(id("a"), "length"),
        index(id("a"), num(0.0)),
        index(id("a"), num(2.0)),
      ])),
    ],
  );
  assert_eq!(rt.to_display_string(&value).unwrap(), "3,,9");
}

#[test]
fn array_constructor_and_is_array() {
  let mut rt = interp();
  let value = eval_ok(
    &mut rt,
    vec![expr_stmt(member(new_(id("Array"), vec![num(5.0)]), "length"))],
  );
  assert_eq!(value, Value::Number(5.0));

  let value = eval_ok(
    &mut rt,
    vec![expr_stmt(add(
      method(id("Array"), "isArray", vec![array(vec![])]),
      method(id("Array"), "isArray", vec![object(vec![])]),
    ))],
  );
  // true + false
  assert_eq!(value, Value::Number(1.0));

  let value = eval_ok(
    &mut rt,
    vec![expr_stmt(method(
      call_fn("Array", vec![str_("a"), str_("b")]),
      "join",
      vec![str_("+")],
    ))],
  );
  assert_eq!(value, Value::string("a+b"));
}

#[test]
fn elided_holes_read_as_undefined() {
  let mut rt = interp();
  let value = eval_ok(
    &mut rt,
    vec![
      var_decl(
        "a",
        array_with_holes(vec![Some(num(1.0)), None, Some(num(3.0))]),
      ),
      expr_stmt(strict_eq(index(id("a"), num(1.0)), id("undefined"))),
    ],
  );
  assert_eq!(value, Value::Bool(true));
}

#[test]
fn join_renders_nullish_elements_as_empty() {
  let mut rt = interp();
  let value = eval_ok(
    &mut rt,
    vec![expr_stmt(method(
      array(vec![num(1.0), null(), id("undefined"), num(2.0)]),
      "join",
      vec![str_("|")],
    ))],
  );
  assert_eq!(value, Value::string("1|||2"));
}
