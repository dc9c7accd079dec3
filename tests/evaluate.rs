use std::f64::consts::PI;

use rpncalc::calc_engine::{ErrorKind, EvalError, LexError, SyntaxError};
use rpncalc::display::format_number;
use rpncalc::{evaluate_expression, ParseError, Variables};

const EPSILON: f64 = 1e-9;

fn eval(src: &str) -> Result<f64, ParseError> {
    evaluate_expression(src, &Variables::new())
}

fn eval_with(src: &str, vars: &[(&str, f64)]) -> Result<f64, ParseError> {
    let variables: Variables = vars.iter().map(|(k, v)| (k.to_string(), *v)).collect();
    evaluate_expression(src, &variables)
}

fn assert_close(src: &str, actual: Result<f64, ParseError>, expected: f64) {
    let value = actual.unwrap_or_else(|e| panic!("{src:?} failed: {e}"));
    assert!(
        (value - expected).abs() < EPSILON,
        "{src:?}: expected {expected}, got {value}"
    );
}

fn assert_kind(src: &str, expected: ErrorKind) {
    match eval(src) {
        Ok(v) => panic!("{src:?} should fail, got {v}"),
        Err(e) => {
            assert_eq!(e.expression, src);
            assert_eq!(e.kind, expected, "{src:?}");
        }
    }
}

#[test]
fn basic_arithmetic() {
    for (src, expected) in [
        ("2 + 3", 5.0),
        ("3 - 2", 1.0),
        ("2 * 3", 6.0),
        ("6 / 3", 2.0),
        ("2 ^ 3", 8.0),
        ("42", 42.0),
        ("1.5 * 4", 6.0),
    ] {
        assert_close(src, eval(src), expected);
    }
}

#[test]
fn precedence_and_grouping() {
    assert_close("2 + 3 * 4", eval("2 + 3 * 4"), 14.0);
    assert_close("(2 + 3) * 4", eval("(2 + 3) * 4"), 20.0);
    assert_close("2 * 3 ^ 2", eval("2 * 3 ^ 2"), 18.0);
    assert_close("((1 + 2))", eval("((1 + 2))"), 3.0);
    assert_close("10 - 4 - 3", eval("10 - 4 - 3"), 3.0);
    assert_close("100 / 10 / 5", eval("100 / 10 / 5"), 2.0);
}

#[test]
fn chained_power_groups_right() {
    assert_close("2 ^ 3 ^ 2", eval("2 ^ 3 ^ 2"), 512.0);
    assert_close("(2 ^ 3) ^ 2", eval("(2 ^ 3) ^ 2"), 64.0);
    assert_close("4 ^ 0.5", eval("4 ^ 0.5"), 2.0);
    assert_close("2 ^ (0 - 1)", eval("2 ^ (0 - 1)"), 0.5);
}

#[test]
fn functions_bind_to_their_argument() {
    assert_close("sin(x)", eval_with("sin(x)", &[("x", PI / 2.0)]), 1.0);
    assert_close("cos(0)", eval("cos(0)"), 1.0);
    assert_close("sqrt(16) + 1", eval("sqrt(16) + 1"), 5.0);
    assert_close("2 * sqrt(a + b)", eval_with("2 * sqrt(a + b)", &[("a", 3.0), ("b", 6.0)]), 6.0);
    assert_close("sqrt(sqrt(16))", eval("sqrt(sqrt(16))"), 2.0);
}

#[test]
fn variables_with_whitespace() {
    assert_close(" a + b ", eval_with(" a + b ", &[("a", 2.0), ("b", 3.0)]), 5.0);
    assert_close("\tx*x\n", eval_with("\tx*x\n", &[("x", 7.0)]), 49.0);
}

#[test]
fn unbound_variable_reads_as_zero() {
    assert_close("y + 2", eval("y + 2"), 2.0);
    assert_close("a * 5", eval_with("a * 5", &[("b", 1.0)]), 0.0);
}

#[test]
fn scientific_notation() {
    assert_close("1e-3", eval("1e-3"), 0.001);
    assert_close("2e+3", eval("2e+3"), 2000.0);
    assert_close("1e-3 - 1", eval("1e-3 - 1"), -0.999);

    let shown = format_number(1e-6);
    assert_close(&shown, eval(&shown), 1e-6);
}

#[test]
fn ieee_division() {
    assert_eq!(eval("1 / 0").unwrap(), f64::INFINITY);
    assert!(eval("0 / 0").unwrap().is_nan());
    assert!(eval("sqrt(0 - 1)").unwrap().is_nan());
}

#[test]
fn malformed_input_is_reported() {
    assert_kind("2 + * 3", SyntaxError::MissingOperand { found: "*".into() }.into());
    assert_kind("(2 + 3", SyntaxError::UnmatchedLeftParen.into());
    assert_kind("2 + 3)", SyntaxError::UnmatchedRightParen.into());
    assert_kind("", SyntaxError::EmptyExpression.into());
    assert_kind("   ", SyntaxError::EmptyExpression.into());
    assert_kind("-3", SyntaxError::MissingOperand { found: "-".into() }.into());
    assert_kind("sin 1", SyntaxError::MissingFunctionArgument("sin".into()).into());
    assert_kind("2x", LexError::MalformedNumber("2x".into()).into());
    assert_kind("2 & 3", LexError::UnexpectedCharacter { ch: '&', offset: 2 }.into());
    assert_kind("a.b + 1", LexError::InvalidIdentifier("a.b".into()).into());
}

#[test]
fn error_message_carries_expression() {
    let err = eval("(1 +").unwrap_err();
    let message = err.to_string();
    assert!(message.contains("(1 +"), "{message}");
    assert!(!matches!(err.kind, ErrorKind::Eval(EvalError::StackUnderflow { .. })));
}

#[test]
fn evaluation_is_deterministic() {
    let vars: Variables = [("x".to_string(), 0.3), ("y".to_string(), 1.7)].into_iter().collect();
    let src = "sin(x) ^ 2 + cos(y) / sqrt(x + y) - 3 * x";
    let first = evaluate_expression(src, &vars).unwrap();
    for _ in 0..10 {
        assert_eq!(evaluate_expression(src, &vars).unwrap().to_bits(), first.to_bits());
    }
}

#[test]
fn parallel_calls_are_independent() {
    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                let vars: Variables = [("n".to_string(), i as f64)].into_iter().collect();
                evaluate_expression("n * n + 1", &vars).unwrap()
            })
        })
        .collect();

    let results: Vec<f64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results, vec![1.0, 2.0, 5.0, 10.0]);
}
