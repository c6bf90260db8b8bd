mod common;

use common::*;
use interp_js::Value;

#[test]
fn length_and_index_access_on_primitives() {
  let mut rt = interp();
  assert_eq!(
    eval_ok(&mut rt, vec![expr_stmt(member(str_("hello"), "length"))]),
    Value::Number(5.0)
  );
  assert_eq!(
    eval_ok(&mut rt, vec![expr_stmt(index(str_("hello"), num(1.0)))]),
    Value::string("e")
  );
  assert_eq!(
    eval_ok(&mut rt, vec![expr_stmt(index(str_("hi"), num(9.0)))]),
    Value::Undefined
  );
}

#[test]
fn split_and_join_round_trip() {
  let mut rt = interp();
  let value = eval_ok(
    &mut rt,
    vec![expr_stmt(method(
      method(str_("a,b,c"), "split", vec![str_(",")]),
      "join",
      vec![str_("-")],
    ))],
  );
  assert_eq!(value, Value::string("a-b-c"));
}

#[test]
fn split_with_an_empty_separator_yields_characters() {
  let mut rt = interp();
  let value = eval_ok(
    &mut rt,
    vec![expr_stmt(member(
      method(str_("abc"), "split", vec![str_("")]),
      "length",
    ))],
  );
  assert_eq!(value, Value::Number(3.0));
}

#[test]
fn split_without_separator_wraps_the_whole_string() {
  let mut rt = interp();
  let value = eval_ok(
    &mut rt,
    vec![expr_stmt(index(
      method(str_("a,b"), "split", vec![]),
      num(0.0),
    ))],
  );
  assert_eq!(value, Value::string("a,b"));
}

#[test]
fn char_at_and_char_code_at() {
  let mut rt = interp();
  assert_eq!(
    eval_ok(
      &mut rt,
      vec![expr_stmt(method(str_("abc"), "charAt", vec![num(2.0)]))]
    ),
    Value::string("c")
  );
  assert_eq!(
    eval_ok(
      &mut rt,
      vec![expr_stmt(method(str_("A"), "charCodeAt", vec![num(0.0)]))]
    ),
    Value::Number(65.0)
  );
  assert_eq!(
    eval_ok(
      &mut rt,
      vec![expr_stmt(method(str_("A"), "charAt", vec![num(5.0)]))]
    ),
    Value::string("")
  );
}

#[test]
fn index_of_and_last_index_of() {
  let mut rt = interp();
  assert_eq!(
    eval_ok(
      &mut rt,
      vec![expr_stmt(method(str_("banana"), "indexOf", vec![str_("an")]))]
    ),
    Value::Number(1.0)
  );
  assert_eq!(
    eval_ok(
      &mut rt,
      vec![expr_stmt(method(
        str_("banana"),
        "lastIndexOf",
        vec![str_("an")]
      ))]
    ),
    Value::Number(3.0)
  );
  assert_eq!(
    eval_ok(
      &mut rt,
      vec![expr_stmt(method(str_("abc"), "indexOf", vec![str_("z")]))]
    ),
    Value::Number(-1.0)
  );
}

#[test]
fn slice_and_substring() {
  let mut rt = interp();
  assert_eq!(
    eval_ok(
      &mut rt,
      vec![expr_stmt(method(
        str_("abcdef"),
        "slice",
        vec![num(1.0), num(-1.0)]
      ))]
    ),
    Value::string("bcde")
  );
  // substring swaps out-of-order bounds.
  assert_eq!(
    eval_ok(
      &mut rt,
      vec![expr_stmt(method(
        str_("abcdef"),
        "substring",
        vec![num(4.0), num(1.0)]
      ))]
    ),
    Value::string("bcd")
  );
}

#[test]
fn case_conversion_and_trim() {
  let mut rt = interp();
  assert_eq!(
    eval_ok(
      &mut rt,
      vec![expr_stmt(method(str_("MiXeD"), "toLowerCase", vec![]))]
    ),
    Value::string("mixed")
  );
  assert_eq!(
    eval_ok(
      &mut rt,
      vec![expr_stmt(method(str_("MiXeD"), "toUpperCase", vec![]))]
    ),
    Value::string("MIXED")
  );
  assert_eq!(
    eval_ok(
      &mut rt,
      vec![expr_stmt(method(str_("  pad  "), "trim", vec![]))]
    ),
    Value::string("pad")
  );
}

#[test]
fn concat_stringifies_arguments() {
  let mut rt = interp();
  let value = eval_ok(
    &mut rt,
    vec![expr_stmt(method(
      str_("n="),
      "concat",
      vec![num(4.0), str_("!")],
    ))],
  );
  assert_eq!(value, Value::string("n=4!"));
}

#[test]
fn string_methods_chain() {
  let mut rt = interp();
  let value = eval_ok(
    &mut rt,
    vec![
      var_decl("csv", str_("one,two,three")),
      expr_stmt(method(
        method(
          method(id("csv"), "toUpperCase", vec![]),
          "split",
          vec![str_(",")],
        ),
        "indexOf",
        vec![str_("TWO")],
      )),
    ],
  );
  assert_eq!(value, Value::Number(1.0));
}

#[test]
fn string_conversion_function() {
  let mut rt = interp();
  assert_eq!(
    eval_ok(&mut rt, vec![expr_stmt(call_fn("String", vec![num(12.5)]))]),
    Value::string("12.5")
  );
  assert_eq!(
    eval_ok(&mut rt, vec![expr_stmt(call_fn("String", vec![null()]))]),
    Value::string("null")
  );
}
