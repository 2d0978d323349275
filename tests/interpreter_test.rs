use std::{
    fs::{read_dir, read_to_string},
    path::Path,
};

use color_eyre::{eyre::Context, Result};
use sprout::{
    evaluate,
    interpreter::{BufferedContext, Environment},
    parse,
    value::Object,
};

#[test]
fn test_arithmetic() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/arithmetic");
    test_engine(input_dir)
}

#[test]
fn test_logic() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/logic");
    test_engine(input_dir)
}

#[test]
fn test_scope() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/scope");
    test_engine(input_dir)
}

#[test]
fn test_strings() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/strings");
    test_engine(input_dir)
}

#[test]
fn test_conditionals() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/conditionals");
    test_engine(input_dir)
}

#[test]
fn test_errors() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/errors");
    test_engine(input_dir)
}

#[test]
fn test_syntax() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/syntax");
    test_engine(input_dir)
}

#[test]
fn test_comments() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/comments");
    test_engine(input_dir)
}

struct TestCase {
    name: String,
    source: String,
    output: String,
    syntax_errors: String,
    runtime_errors: String,
}

impl TestCase {
    pub fn check(&self) {
        let (program, errors) = parse(&self.source);
        if !errors.is_empty() || !self.syntax_errors.is_empty() {
            let actual = errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("\n");
            assert_eq!(
                self.syntax_errors, actual,
                "Failed test {} at parsing stage.",
                self.name,
            );
            return;
        }

        let environment = Environment::new();
        let mut context = BufferedContext::new();
        let result = evaluate(&program, &environment, &mut context);

        let runtime_errors = match *result {
            Object::Error(ref e) => format!("[line {}] {}", e.location.line, e.kind),
            _ => String::new(),
        };
        assert_eq!(
            self.runtime_errors, runtime_errors,
            "Failed test {} at runtime.",
            self.name,
        );

        let msg = context.into_data();
        assert_eq!(self.output, msg, "Failed test {} at print.", self.name);
    }
}

fn test_engine(input_dir: &Path) -> Result<()> {
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

        println!("Parsing {path:?}");
        let test_case = parse_test_case(&path)?;
        println!("Checking {}", test_case.name);

        let res = std::panic::catch_unwind(|| {
            test_case.check();
        });
        if res.is_err() {
            println!("\tFails test case {}", test_case.name);
            succeeded = false;
        }
    }

    assert!(succeeded);

    Ok(())
}

fn parse_test_case(input_path: &Path) -> Result<TestCase> {
    const EXPECT_OUTPUT: &str = "# expect:";
    const EXPECT_RUNTIME_ERROR: &str = "# expect runtime error:";
    const EXPECT_SYNTAX_ERROR: &str = "# expect syntax error:";

    let test_name = AsRef::<Path>::as_ref(
        input_path
            .file_name()
            .expect("File name can't be none as the path is to a real file."),
    )
    .to_string_lossy();

    let input = read_to_string(input_path).context("Failed to open input test data file")?;

    let mut expected_outputs = Vec::new();
    let mut expected_syntax_errors = Vec::new();
    let mut expected_runtime_errors = Vec::new();

    for (line_index, line) in input.lines().enumerate() {
        if let Some(comment_index) = line.find(EXPECT_OUTPUT) {
            let expected = line[comment_index + EXPECT_OUTPUT.len()..].trim();
            expected_outputs.push(format!("{expected}\n"));
        } else if let Some(comment_index) = line.find(EXPECT_SYNTAX_ERROR) {
            let expected = line[comment_index + EXPECT_SYNTAX_ERROR.len()..].trim();
            expected_syntax_errors.push(expected.to_string());
        } else if let Some(comment_index) = line.find(EXPECT_RUNTIME_ERROR) {
            let expected = line[comment_index + EXPECT_RUNTIME_ERROR.len()..].trim();
            expected_runtime_errors.push(format!("[line {}] {expected}", line_index + 1));
        }
    }

    Ok(TestCase {
        name: test_name.into_owned(),
        source: input,
        output: expected_outputs.concat(),
        syntax_errors: expected_syntax_errors.join("\n"),
        runtime_errors: expected_runtime_errors.join("\n"),
    })
}
