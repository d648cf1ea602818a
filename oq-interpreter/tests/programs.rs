use std::rc::Rc;

use oq_core::lexer::Tokenizer;
use oq_core::parser::Parser;
use oq_interpreter::{eval_program, Environment, EvaluationError, Object};
use pretty_assertions::assert_eq;

fn run(source: &str) -> Result<Option<Rc<Object>>, EvaluationError> {
    let program = Parser::new(Tokenizer::new(source))
        .parse_program()
        .unwrap();
    eval_program(&program, &Environment::new())
}

#[test]
fn numeric_promotion() {
    assert_eq!(run("1 + 2.5\n"), Ok(Some(Object::float(3.5))));
    assert_eq!(run("4 / 2\n"), Ok(Some(Object::integer(2))));
}

#[test]
fn truthiness_and_negation() {
    assert_eq!(run("!5"), Ok(Some(Object::boolean(false))));
    assert_eq!(run("!!5"), Ok(Some(Object::boolean(true))));
    assert_eq!(run("!0"), Ok(Some(Object::boolean(false))));
}

#[test]
fn closures_capture_the_calling_environment() {
    let source = "let adder = fn(x) { fn(y) { x + y } }\nlet add_five = adder(5)\nadd_five(10)\n";
    assert_eq!(run(source), Ok(Some(Object::integer(15))));
}

#[test]
fn errors_short_circuit() {
    let source = "let f = fn() {\n  5 + true\n  undefined_name\n}\nf()\n";
    assert_eq!(
        run(source).unwrap_err().to_string(),
        "type mismatch: INTEGER + BOOLEAN"
    );
}

#[test]
fn turkish_program() {
    let source = "~trk
olsun faktöriyel = fn(n) {
  eğer (n <= 1) { döndür 1 } yoksa { döndür n * faktöriyel(n - 1) }
}
faktöriyel(10)
";
    assert_eq!(run(source), Ok(Some(Object::integer(3628800))));
}

#[test]
fn kazakh_program_with_builtin() {
    let source = "~qzq
болсын сөз = \"сәлем\"
егер (ұзындығы(сөз) >= 5) { шын } әйтпесе { жалған }
";
    assert_eq!(run(source), Ok(Some(Object::boolean(true))));
}

#[test]
fn environment_persists_between_programs() {
    let env = Environment::new();
    for (line, expected) in [
        ("let a = 2\n", None),
        ("let b = a * 3\n", None),
        ("a + b\n", Some(Object::integer(8))),
    ] {
        let program = Parser::new(Tokenizer::new(line)).parse_program().unwrap();
        assert_eq!(eval_program(&program, &env), Ok(expected), "line {line:?}");
    }
}

#[test]
fn runtime_error_messages() {
    let tests = vec![
        ("-true", "unknown operator: -BOOLEAN"),
        ("true + false", "unknown operator: BOOLEAN + BOOLEAN"),
        ("foobar", "identifier not found: foobar"),
        ("let x = 1\nx()", "not a function: INTEGER"),
        ("fn(a) { a }()", "wrong number of arguments: expected 1, got 0"),
        ("10 / (5 - 5)", "division by zero"),
        ("len(true)", "argument to `len` not supported, got BOOLEAN"),
        ("len()", "wrong number of arguments. got=0, want=1"),
        ("uzunluk(5)", "`uzunluk` argümanı desteklenmiyor, INTEGER alındı"),
        (
            "ұзындығы(\"a\", \"b\")",
            "аргументтердің қате саны. алды=2, келеді=1",
        ),
    ];

    for (source, expected) in tests {
        assert_eq!(run(source).unwrap_err().to_string(), expected, "source {source:?}");
    }
}

#[test]
fn long_operator_chains_are_rejected_by_the_parser() {
    let shallow = format!("1{}\n", " + 1".repeat(100));
    assert_eq!(run(&shallow), Ok(Some(Object::integer(101))));

    for source in [
        format!("1{}\n", " + 1".repeat(30_000)),
        format!("len{}\n", "(1)".repeat(100_000)),
    ] {
        let (program, errors) = Parser::new(Tokenizer::new(&source)).parse();
        assert!(program.statements.is_empty());
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].to_string(),
            "expression nesting exceeds the maximum depth of 256"
        );
    }
}
