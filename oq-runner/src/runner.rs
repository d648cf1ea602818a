use std::rc::Rc;

use oq_core::lexer;
use oq_core::parser;
use oq_interpreter::environment::Environment;
use oq_interpreter::evaluator::Evaluator;
use oq_interpreter::object::{EvaluationError, Object};

use crate::Settings;

#[derive(Debug, PartialEq)]
pub enum ExecuteError {
    Parse(Vec<parser::ParseError>),
    Evaluation(EvaluationError),
}

/// Runs a whole script. Nothing is evaluated when the script has parse errors.
pub fn execute(source: &str, settings: Settings) -> Result<Option<Rc<Object>>, ExecuteError> {
    let source = format!("{}\n", source);
    let tokenizer = lexer::Tokenizer::with_dialect(&source, settings.dialect);
    let mut parser = parser::Parser::with_config(tokenizer, settings.parser);
    let program = parser.parse_program().map_err(ExecuteError::Parse)?;

    let env = Environment::new();
    Evaluator::new(settings.evaluator)
        .eval_program(&program, &env)
        .map_err(ExecuteError::Evaluation)
}
