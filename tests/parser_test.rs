use color_eyre::eyre::{Context, Result};
use proptest::prelude::*;
use std::{
    fs::{read_dir, read_to_string},
    path::Path,
};

use sprout::interpreter::{BufferedContext, TreeWalkInterpreter};
use sprout::parser::{
    formatter::{ExpressionFormatter, ProgramFormatter, SExpressionFormatter},
    parse, Parser, ParserErrorKind,
};
use sprout::MAX_BLOCK_DEPTH;

fn check(input: &str, expected: &str, test_name: &str) {
    let mut parser = Parser::new(input);
    let actual = match parser.parse_expression() {
        Ok(ref tree) => SExpressionFormatter.format(tree),
        Err(ref e) => format!("{e}"),
    };

    assert_eq!(actual, expected, "Failed the test {test_name}");
}

fn check_program(input: &str, expected: &str, test_name: &str) {
    let (program, errors) = parse(input);
    let mut lines = Vec::new();
    if !program.is_empty() {
        lines.push(SExpressionFormatter.format_program(&program));
    }
    lines.extend(errors.iter().map(|e| format!("{e}")));

    assert_eq!(
        lines.join("\n"),
        expected.trim_end(),
        "Failed the test {test_name}"
    );
}

#[test]
fn smoke_test() {
    check("", "[Line 1:1] Expected an expression, got EOF instead", "smoke");
}

#[test]
fn grouping_overrides_precedence() {
    check("(1 + 2) * 3", "(* (+ 1 2) 3)", "grouping");
    check("((((7))))", "7", "redundant grouping");
}

#[test]
fn operators_are_left_associative() {
    check("1 - 2 - 3", "(- (- 1 2) 3)", "subtraction");
    check("8 / 4 % 3", "(% (/ 8 4) 3)", "division");
}

#[test]
fn prefix_operators_stack() {
    check("!!true", "(! (! true))", "double bang");
    check("- -1", "(- (- 1))", "double minus");
    check("not not x", "(! (! x))", "double not");
}

#[test]
fn literals() {
    check("\"a\\nb\"", "\"a\\nb\"", "string escapes");
    check("1.0", "1.0", "float");
    check("false", "false", "bool");
}

#[test]
fn unclosed_group() {
    check(
        "(1 + 2",
        "[Line 1:7] Expected next token to be RIGHT_PAREN, got EOF instead",
        "unclosed group",
    );
}

#[test]
fn integer_out_of_range() {
    check(
        "9223372036854775808",
        "[Line 1:1] Could not parse \"9223372036854775808\" as integer",
        "i64 overflow",
    );
}

#[test]
fn deep_grouping_is_rejected() {
    let source = format!("{}1{}", "(".repeat(1000), ")".repeat(1000));
    let mut parser = Parser::new(&source);
    let error = parser.parse_expression().unwrap_err();
    assert!(matches!(error.kind, ParserErrorKind::NestingTooDeep(_)));
    assert!(error
        .to_string()
        .ends_with("maximum nesting depth of 256 exceeded"));
}

/// Runs `check` on a thread with a 2 MiB stack, the default for spawned threads.
fn on_small_stack(check: impl FnOnce() + Send + 'static) {
    std::thread::Builder::new()
        .stack_size(2 * 1024 * 1024)
        .spawn(check)
        .expect("Failed to spawn test thread")
        .join()
        .expect("Test thread panicked");
}

fn nested_ifs(depth: usize) -> String {
    format!("{}echo 1{}", "if (true) {".repeat(depth), "}".repeat(depth))
}

#[test]
fn deep_blocks_are_rejected() {
    on_small_stack(|| {
        let (_, errors) = parse(&nested_ifs(300));
        assert!(errors
            .iter()
            .any(|e| matches!(e.kind, ParserErrorKind::NestingTooDeep(MAX_BLOCK_DEPTH))));
    });
}

#[test]
fn blocks_at_the_limit_parse_and_run() {
    on_small_stack(|| {
        let (program, errors) = parse(&nested_ifs(MAX_BLOCK_DEPTH));
        assert!(errors.is_empty(), "{errors:?}");
        let mut interpreter = TreeWalkInterpreter::new(BufferedContext::new());
        let value = interpreter.try_run(&program).expect("Program should run");
        assert_eq!(value.to_string(), "1");
        assert_eq!(interpreter.into_context().into_data(), "1\n");
    });
}

#[test]
fn one_block_past_the_limit_is_rejected() {
    let (_, errors) = parse(&nested_ifs(MAX_BLOCK_DEPTH + 1));
    assert_eq!(errors.len(), 1, "{errors:?}");
    assert!(matches!(
        errors[0].kind,
        ParserErrorKind::NestingTooDeep(MAX_BLOCK_DEPTH)
    ));
}

#[test]
fn long_left_chains_are_accepted() {
    on_small_stack(|| {
        let source = vec!["1"; 300].join(" + ");
        let (program, errors) = parse(&source);
        assert!(errors.is_empty(), "{errors:?}");
        let expected = format!("{}1{}", "(+ ".repeat(299), " 1)".repeat(299));
        assert_eq!(SExpressionFormatter.format_program(&program), expected);
    });
}

#[test]
fn long_right_chains_are_rejected() {
    let source = vec!["2"; 300].join(" ** ");
    let (_, errors) = parse(&source);
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0].kind, ParserErrorKind::NestingTooDeep(_)));
}

#[test]
fn moderate_nesting_is_fine() {
    let source = format!("{}1{}", "(".repeat(100), ")".repeat(100));
    check(&source, "1", "hundred parentheses");
}

#[test]
fn stray_tokens_are_dropped() {
    check_program("} ) echo 1", "(echo 1)", "stray tokens");
}

#[test]
fn test_all() -> Result<()> {
    let input_dir = Path::new("./test_data/parser/in");
    let output_dir = Path::new("./test_data/parser/out");

    let mut succeeded = true;
    for entry in read_dir(input_dir).context("Failed to open input test data folder")? {
        let entry = entry?;
        let path = entry.path();

        let Some(extension) = path.extension() else {
            continue;
        };

        if extension != "spr" {
            continue;
        }

        let test_name = AsRef::<Path>::as_ref(
            path.file_name()
                .expect("File name can't be none as the path is to a real file."),
        );

        let input = read_to_string(&path).context("Failed to open input test data file")?;

        let expected = {
            let output_file_name = test_name.with_extension("txt");
            let output_path = output_dir.join(output_file_name);
            read_to_string(output_path).context("Failed to open output test data file")?
        };

        let res = std::panic::catch_unwind(|| {
            check_program(&input, &expected, &test_name.to_string_lossy());
        });
        if res.is_err() {
            succeeded = false;
        }
    }

    assert!(succeeded);

    Ok(())
}

// Property-based tests

/// A fully parenthesised expression alongside the S-expression it must parse to.
fn grouped_expression_strategy() -> impl Strategy<Value = (String, String)> {
    let leaf = prop_oneof![
        (0..1000i64).prop_map(|v| (v.to_string(), v.to_string())),
        "[a-z][a-z0-9_]{0,5}"
            .prop_filter("Keywords are not identifiers", |s| {
                !sprout::lexer::KEYWORD_HASHMAP.contains_key(s.as_str())
            })
            .prop_map(|s| (s.clone(), s)),
    ];
    leaf.prop_recursive(6, 64, 2, |inner| {
        let operator = prop_oneof![
            Just("+"),
            Just("-"),
            Just("*"),
            Just("/"),
            Just("%"),
            Just("**"),
            Just("<"),
            Just("<="),
            Just(">"),
            Just(">="),
            Just("=="),
            Just("!="),
            Just("&&"),
            Just("||"),
        ];
        prop_oneof![
            (inner.clone(), operator, inner.clone()).prop_map(|((ls, le), op, (rs, re))| {
                (format!("({ls} {op} {rs})"), format!("({op} {le} {re})"))
            }),
            (prop_oneof![Just("!"), Just("-")], inner).prop_map(|(op, (s, e))| {
                (format!("({op}{s})"), format!("({op} {e})"))
            }),
        ]
    })
}

proptest! {
    #[test]
    fn grouped_expressions_round_trip((source, expected) in grouped_expression_strategy()) {
        let mut parser = Parser::new(&source);
        let tree = parser.parse_expression();
        prop_assert!(tree.is_ok(), "{:?}", tree);
        prop_assert_eq!(SExpressionFormatter.format(&tree.unwrap()), expected);
    }

    #[test]
    fn parser_never_panics(input in any::<String>()) {
        let _ = parse(&input);
    }
}
