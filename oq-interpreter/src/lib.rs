pub mod builtins;
pub mod environment;
pub mod evaluator;
pub mod object;

pub use environment::Environment;
pub use evaluator::{eval_program, Evaluator, EvaluatorConfig};
pub use object::{EvaluationError, Object};
