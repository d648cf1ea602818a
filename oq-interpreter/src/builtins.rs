use std::rc::Rc;

use crate::object::{BuiltinFunction, EvaluationError, Object, ObjectKind};

/// Builtins report their errors in the language of the spelling they were
/// called by.
pub(crate) fn argument_count_message(name: &str, got: &usize, want: &usize) -> String {
    match name {
        "uzunluk" => format!("yanlış sayıda argüman. got={}, want={}", got, want),
        "ұзындығы" => format!("аргументтердің қате саны. алды={}, келеді={}", got, want),
        _ => format!("wrong number of arguments. got={}, want={}", got, want),
    }
}

pub(crate) fn argument_type_message(name: &str, kind: &ObjectKind) -> String {
    match name {
        "uzunluk" => format!("`{}` argümanı desteklenmiyor, {} alındı", name, kind),
        "ұзындығы" => format!("`{}` аргументіне қолдау көрсетілмейді, {} алынды", name, kind),
        _ => format!("argument to `{}` not supported, got {}", name, kind),
    }
}

fn check_argument_count(
    name: &'static str,
    args: &[Rc<Object>],
    want: usize,
) -> Result<(), EvaluationError> {
    if args.len() != want {
        return Err(EvaluationError::BuiltinArgumentCount {
            name,
            got: args.len(),
            want,
        });
    }
    Ok(())
}

fn string_length(
    name: &'static str,
    args: Vec<Rc<Object>>,
) -> Result<Rc<Object>, EvaluationError> {
    check_argument_count(name, &args, 1)?;
    match args[0].as_ref() {
        Object::String(s) => Ok(Object::integer(s.chars().count() as i64)),
        other => Err(EvaluationError::BuiltinArgumentType {
            name,
            kind: other.kind(),
        }),
    }
}

fn builtin_len(args: Vec<Rc<Object>>) -> Result<Rc<Object>, EvaluationError> {
    string_length("len", args)
}

fn builtin_uzunluk(args: Vec<Rc<Object>>) -> Result<Rc<Object>, EvaluationError> {
    string_length("uzunluk", args)
}

fn builtin_uzyndygy(args: Vec<Rc<Object>>) -> Result<Rc<Object>, EvaluationError> {
    string_length("ұзындығы", args)
}

/// Builtins are ordinary identifiers rather than keywords, so every dialect
/// spelling is available regardless of the active dialect.
pub(crate) fn map_builtins(s: &str) -> Option<BuiltinFunction> {
    match s {
        "len" => Some(BuiltinFunction {
            name: "len",
            func: builtin_len,
        }),
        "uzunluk" => Some(BuiltinFunction {
            name: "uzunluk",
            func: builtin_uzunluk,
        }),
        "ұзындығы" => Some(BuiltinFunction {
            name: "ұзындығы",
            func: builtin_uzyndygy,
        }),
        _ => None,
    }
}
