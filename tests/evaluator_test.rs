use proptest::prelude::*;

use sprout::{
    evaluate,
    interpreter::{BufferedContext, Environment},
    parse,
    parser::{
        expression::{
            ExpressionAtom, ExpressionAtomKind, ExpressionNode, IncompleteExpression,
            PrefixOperator,
        },
        statement::{ExpressionStatement, Statement},
        Program,
    },
    token::Location,
    value::{
        error::RuntimeErrorKind,
        formatter::{BasicFormatter, ValueFormatter},
        Object,
    },
};

fn run(input: &str) -> (String, String) {
    let (program, errors) = parse(input);
    assert!(errors.is_empty(), "Unexpected syntax errors {errors:?}");
    let environment = Environment::new();
    let mut context = BufferedContext::new();
    let result = evaluate(&program, &environment, &mut context);
    let formatter = BasicFormatter;
    let value = match *result {
        Object::Error(ref e) => formatter.format_error(e),
        ref v => formatter.format(v),
    };
    (value, context.into_data())
}

fn check(input: &str, expected: &str, test_name: &str) {
    let (actual, _) = run(input);
    assert_eq!(actual, expected, "Failed the test {test_name}");
}

#[test]
fn smoke_test() {
    check("true", "true", "smoke");
}

#[test]
fn precedence() {
    check("1 + 2 * 3", "7", "mul before add");
    check("(1 + 2) * 3", "9", "grouping");
    check("2 ** 3 ** 2", "512", "right associative power");
    check("-2 ** 2", "4", "prefix binds tightest");
}

#[test]
fn division_by_zero() {
    check("10 / 0", "[Line 1:4] ERROR: division by zero", "division");
    check("10 % 0", "[Line 1:4] ERROR: modulo by zero", "modulo");
    check("1.0 / 0", "[Line 1:5] ERROR: division by zero", "float division");
}

#[test]
fn type_errors() {
    check(
        "5 + true",
        "[Line 1:3] ERROR: type mismatch: INTEGER + BOOLEAN",
        "mismatch",
    );
    check(
        "true + false",
        "[Line 1:6] ERROR: unknown operator: BOOLEAN + BOOLEAN",
        "unknown infix",
    );
    check(
        "-\"abc\"",
        "[Line 1:1] ERROR: unknown operator: -STRING",
        "unknown prefix",
    );
}

#[test]
fn unbound_identifier() {
    check(
        "foobar",
        "[Line 1:1] ERROR: identifier not found: foobar",
        "unbound",
    );
}

#[test]
fn block_scoping() {
    let (value, output) = run("sprout x = 10\nif (true) { sprout y = 20\n x = x + y }\necho x");
    assert_eq!(value, "30");
    assert_eq!(output, "30\n");
}

#[test]
fn shadowing_leaves_outer_binding() {
    let (_, output) = run("sprout x = 1\nif (true) { sprout x = 2\n echo x }\necho x");
    assert_eq!(output, "2\n1\n");
}

#[test]
fn if_value_is_last_block_value() {
    check("if (1 < 2) { 10; 20 } else { 30 }", "20", "consequence");
    check("if (1 > 2) { 10 } else { 30 }", "30", "alternative");
    check("if (false) { 10 }", "null", "no alternative");
}

#[test]
fn echo_yields_its_value() {
    let (value, output) = run("echo \"hi\" + \"!\"");
    assert_eq!(value, "hi!");
    assert_eq!(output, "hi!\n");
}

#[test]
fn environment_is_shared_with_caller() {
    let environment = Environment::new();
    let mut context = BufferedContext::new();
    let (first, _) = parse("sprout answer = 41");
    let (second, _) = parse("answer + 1");
    let _ = evaluate(&first, &environment, &mut context);
    assert_eq!(evaluate(&second, &environment, &mut context).inspect(), "42");
    assert!(environment.get("answer").is_some());
}

#[test]
fn deep_source_nesting_is_a_syntax_error() {
    let source = format!("{}1{}", "(".repeat(1000), ")".repeat(1000));
    let (_, errors) = parse(&source);
    assert!(!errors.is_empty());
}

#[test]
fn long_sums_are_evaluated() {
    let source = vec!["1"; 300].join(" + ");
    check(&source, "300", "three hundred terms");
    let source = format!("sprout total = {}\necho total - 1", vec!["2"; 1000].join(" + "));
    let (value, output) = run(&source);
    assert_eq!(value, "1999");
    assert_eq!(output, "1999\n");
}

#[test]
fn deep_tree_is_a_runtime_error() {
    let mut tree = IncompleteExpression::new();
    let location = Location::default();
    let mut node = tree.push(ExpressionNode::Atom(ExpressionAtom {
        kind: ExpressionAtomKind::Bool(true),
        location,
    }));
    for _ in 0..1000 {
        node = tree.push(ExpressionNode::Prefix {
            operator: PrefixOperator::Bang,
            rhs: node,
            location,
        });
    }
    let expr = tree.finish(node).unwrap();
    let program = Program::new(vec![Statement::Expression(ExpressionStatement {
        expr,
        location,
    })]);

    let result = evaluate(&program, &Environment::new(), &mut BufferedContext::new());
    let Object::Error(ref error) = *result else {
        panic!("Expected an error, got {result}");
    };
    assert!(matches!(error.kind, RuntimeErrorKind::NestingTooDeep(_)));
}

// Property-based tests

fn operator_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("+"),
        Just("-"),
        Just("*"),
        Just("/"),
        Just("%"),
        Just("<"),
        Just("<="),
        Just(">"),
        Just(">="),
        Just("=="),
        Just("!="),
    ]
}

fn reference(lhs: i64, operator: &str, rhs: i64) -> String {
    let value = match operator {
        "+" => lhs.checked_add(rhs),
        "-" => lhs.checked_sub(rhs),
        "*" => lhs.checked_mul(rhs),
        "/" if rhs == 0 => return "division by zero".into(),
        "/" => lhs.checked_div(rhs),
        "%" if rhs == 0 => return "modulo by zero".into(),
        "%" => lhs.checked_rem(rhs),
        "<" => return (lhs < rhs).to_string(),
        "<=" => return (lhs <= rhs).to_string(),
        ">" => return (lhs > rhs).to_string(),
        ">=" => return (lhs >= rhs).to_string(),
        "==" => return (lhs == rhs).to_string(),
        "!=" => return (lhs != rhs).to_string(),
        _ => unreachable!("Strategy only yields known operators"),
    };
    match value {
        Some(v) => v.to_string(),
        None => format!("integer overflow: {lhs} {operator} {rhs}"),
    }
}

proptest! {
    #[test]
    fn integer_arithmetic_matches_checked_ops(
        lhs in 0..i64::MAX,
        operator in operator_strategy(),
        rhs in prop_oneof![0..i64::MAX, 0..10i64],
    ) {
        let (program, errors) = parse(&format!("{lhs} {operator} {rhs}"));
        prop_assert!(errors.is_empty());
        let result = evaluate(&program, &Environment::new(), &mut BufferedContext::new());
        let actual = match *result {
            Object::Error(ref e) => e.to_string(),
            ref v => v.inspect(),
        };
        prop_assert_eq!(actual, reference(lhs, operator, rhs));
    }

    #[test]
    fn negation_round_trips(value in 0..i64::MAX) {
        let (program, errors) = parse(&format!("- -{value}"));
        prop_assert!(errors.is_empty());
        let result = evaluate(&program, &Environment::new(), &mut BufferedContext::new());
        prop_assert_eq!(result.inspect(), value.to_string());
    }
}
