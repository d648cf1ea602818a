use std::rc::Rc;

use oq_core::dialect::Dialect;
use oq_core::lexer::Tokenizer;
use oq_core::parser::{ParseError, Parser};
use oq_interpreter::environment::Environment;
use oq_interpreter::evaluator::Evaluator as TreeWalker;
use oq_interpreter::object::{EvaluationError, Object};
use tracing::debug;

use crate::Settings;

pub trait Evaluator {
    type Object;

    fn evaluate(&mut self, line: &str) -> Self::Object;
}

#[derive(Debug, PartialEq)]
pub enum LineOutcome {
    ParseErrors(Vec<ParseError>),
    Evaluated(Result<Option<Rc<Object>>, EvaluationError>),
}

/// Interpreter state kept across REPL lines: the bindings made so far and
/// the dialect the last line ended in.
pub struct InterpreterEvaluator {
    settings: Settings,
    environment: Environment,
    evaluator: TreeWalker,
    dialect: Dialect,
}

impl InterpreterEvaluator {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            environment: Environment::new(),
            evaluator: TreeWalker::new(settings.evaluator),
            dialect: settings.dialect,
        }
    }
}

impl Evaluator for InterpreterEvaluator {
    type Object = LineOutcome;

    fn evaluate(&mut self, line: &str) -> Self::Object {
        let line = format!("{}\n", line);
        let tokenizer = Tokenizer::with_dialect(&line, self.dialect);
        let mut parser = Parser::with_config(tokenizer, self.settings.parser);
        let (program, errors) = parser.parse();

        // A pragma on a line with errors still takes effect
        if parser.dialect() != self.dialect {
            debug!(from = %self.dialect, to = %parser.dialect(), "repl dialect changed");
            self.dialect = parser.dialect();
        }

        if !errors.is_empty() {
            return LineOutcome::ParseErrors(errors);
        }
        LineOutcome::Evaluated(self.evaluator.eval_program(&program, &self.environment))
    }
}

#[cfg(test)]
mod tests {
    use oq_core::dialect::Dialect;
    use oq_core::parser::ParserConfig;
    use oq_interpreter::object::{EvaluationError, Object};
    use oq_interpreter::EvaluatorConfig;

    use super::{Evaluator, InterpreterEvaluator, LineOutcome};
    use crate::Settings;

    fn evaluator() -> InterpreterEvaluator {
        InterpreterEvaluator::new(Settings {
            dialect: Dialect::ENG,
            parser: ParserConfig::default(),
            evaluator: EvaluatorConfig::default(),
        })
    }

    #[test]
    fn test_bindings_persist_across_lines() {
        let mut evaluator = evaluator();
        let tests = vec![
            ("let a = 5", LineOutcome::Evaluated(Ok(None))),
            ("let double = fn(x) { x * 2 }", LineOutcome::Evaluated(Ok(None))),
            ("double(a)", LineOutcome::Evaluated(Ok(Some(Object::integer(10))))),
        ];

        for (line, expected) in tests {
            assert_eq!(evaluator.evaluate(line), expected, "line {line:?}");
        }
    }

    #[test]
    fn test_dialect_persists_across_lines() {
        let mut evaluator = evaluator();

        assert_eq!(evaluator.evaluate("~trk"), LineOutcome::Evaluated(Ok(None)));
        assert_eq!(evaluator.evaluate("olsun x = doğru"), LineOutcome::Evaluated(Ok(None)));
        assert_eq!(
            evaluator.evaluate("x"),
            LineOutcome::Evaluated(Ok(Some(Object::boolean(true))))
        );
        assert_eq!(evaluator.evaluate("~eng"), LineOutcome::Evaluated(Ok(None)));
        assert_eq!(
            evaluator.evaluate("let y = true"),
            LineOutcome::Evaluated(Ok(None))
        );
    }

    #[test]
    fn test_errors_do_not_end_the_session() {
        let mut evaluator = evaluator();

        assert!(matches!(
            evaluator.evaluate("let x 5"),
            LineOutcome::ParseErrors(errors) if errors.len() == 1
        ));
        assert_eq!(
            evaluator.evaluate("y"),
            LineOutcome::Evaluated(Err(EvaluationError::UnknownIdentifier("y".into())))
        );
        assert_eq!(
            evaluator.evaluate("let x = 5\nx"),
            LineOutcome::Evaluated(Ok(Some(Object::integer(5))))
        );
    }
}
