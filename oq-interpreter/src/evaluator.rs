use std::rc::Rc;

use oq_core::ast::{self, Expression, InfixOperator, PrefixOperator};
use tracing::debug;

use crate::environment::Environment;
use crate::object::{EvaluationError, Function, Object, QuickReturn};

const RED_ZONE: usize = 100 * 1024;
const STACK_PER_RECURSION: usize = 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluatorConfig {
    /// Maximum number of nested user function calls.
    pub max_call_depth: usize,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            max_call_depth: 2048,
        }
    }
}

/// `Ok(None)` is the "no value" result of statements such as `let`.
type EvalResult = Result<Option<Rc<Object>>, QuickReturn>;

#[derive(Debug, Default)]
pub struct Evaluator {
    config: EvaluatorConfig,
    call_depth: usize,
}

/// Evaluates `program` with a default [`Evaluator`].
pub fn eval_program(
    program: &ast::Program,
    environment: &Environment,
) -> Result<Option<Rc<Object>>, EvaluationError> {
    Evaluator::default().eval_program(program, environment)
}

impl Evaluator {
    pub fn new(config: EvaluatorConfig) -> Self {
        Self {
            config,
            call_depth: 0,
        }
    }

    /// Runs the statements in order. The result is the value of the last
    /// statement; a top level `return` stops the program with its value.
    pub fn eval_program(
        &mut self,
        program: &ast::Program,
        environment: &Environment,
    ) -> Result<Option<Rc<Object>>, EvaluationError> {
        self.call_depth = 0;
        let mut output = None;
        for statement in &program.statements {
            match self.eval_statement(statement, environment) {
                Ok(object) => output = object,
                Err(QuickReturn::Return(value)) => return Ok(Some(value)),
                Err(QuickReturn::Error(error)) => return Err(error),
            }
        }
        Ok(output)
    }

    fn eval_statement(&mut self, statement: &ast::Statement, environment: &Environment) -> EvalResult {
        match statement {
            ast::Statement::Expression(statement) => self
                .eval_expression(&statement.expression, environment)
                .map(Some),
            ast::Statement::Return(statement) => {
                let value = self.eval_expression(&statement.value, environment)?;
                Err(QuickReturn::Return(value))
            }
            ast::Statement::Let(statement) => {
                let value = self.eval_expression(&statement.value, environment)?;
                environment.set(statement.identifier.name.clone(), value);
                Ok(None)
            }
        }
    }

    fn eval_block_statement(
        &mut self,
        block: &ast::BlockStatement,
        environment: &Environment,
    ) -> EvalResult {
        let mut result = None;
        for statement in &block.statements {
            result = self.eval_statement(statement, environment)?;
        }
        Ok(result)
    }

    fn eval_expression(
        &mut self,
        expression: &Expression,
        environment: &Environment,
    ) -> Result<Rc<Object>, QuickReturn> {
        stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, || {
            self.eval_expression_inner(expression, environment)
        })
    }

    fn eval_expression_inner(
        &mut self,
        expression: &Expression,
        environment: &Environment,
    ) -> Result<Rc<Object>, QuickReturn> {
        match expression {
            Expression::IntegerLiteral { value, .. } => Ok(Object::integer(*value)),
            Expression::FloatLiteral { value, .. } => Ok(Object::float(*value)),
            Expression::StringLiteral { value, .. } => Ok(Object::string(value.clone())),
            Expression::Boolean { value, .. } => Ok(Object::boolean(*value)),
            Expression::Identifier(identifier) => environment
                .get(&identifier.name)
                .ok_or_else(|| EvaluationError::UnknownIdentifier(identifier.name.clone()).into()),
            Expression::Prefix {
                operator, right, ..
            } => {
                let right = self.eval_expression(right, environment)?;
                Ok(eval_prefix_operation(*operator, right)?)
            }
            Expression::Infix {
                operator,
                left,
                right,
                ..
            } => {
                let left = self.eval_expression(left, environment)?;
                let right = self.eval_expression(right, environment)?;
                Ok(eval_infix_operation(*operator, &left, &right)?)
            }
            Expression::If {
                condition,
                consequence,
                alternative,
                ..
            } => {
                let condition = self.eval_expression(condition, environment)?;
                let result = if condition.is_truthy() {
                    self.eval_block_statement(consequence, environment)?
                } else if let Some(alternative) = alternative {
                    self.eval_block_statement(alternative, environment)?
                } else {
                    None
                };
                Ok(result.unwrap_or_else(Object::null))
            }
            Expression::FunctionLiteral {
                parameters, body, ..
            } => Ok(Object::function(
                parameters.clone(),
                body.clone(),
                environment.clone(),
            )),
            Expression::Call {
                function,
                arguments,
                ..
            } => {
                let function = self.eval_expression(function, environment)?;
                let arguments = self.eval_expressions(arguments, environment)?;
                match function.as_ref() {
                    Object::Function(function) => Ok(self.apply_function(function, arguments)?),
                    Object::Builtin(builtin) => Ok((builtin.func)(arguments)?),
                    other => Err(EvaluationError::NotAFunction(other.kind()).into()),
                }
            }
        }
    }

    fn eval_expressions(
        &mut self,
        arguments: &[Expression],
        environment: &Environment,
    ) -> Result<Vec<Rc<Object>>, QuickReturn> {
        arguments
            .iter()
            .map(|argument| self.eval_expression(argument, environment))
            .collect()
    }

    fn apply_function(
        &mut self,
        function: &Function,
        arguments: Vec<Rc<Object>>,
    ) -> Result<Rc<Object>, EvaluationError> {
        if function.parameters.len() != arguments.len() {
            return Err(EvaluationError::WrongArgumentCount {
                expected: function.parameters.len(),
                actual: arguments.len(),
            });
        }
        if self.call_depth >= self.config.max_call_depth {
            debug!(limit = self.config.max_call_depth, "call depth limit reached");
            return Err(EvaluationError::CallDepthExceeded(self.config.max_call_depth));
        }

        let new_environment = Environment::new_enclosed(&function.env);
        for (parameter, argument) in function.parameters.iter().zip(arguments) {
            new_environment.set(parameter.name.clone(), argument);
        }

        self.call_depth += 1;
        debug!(depth = self.call_depth, arity = function.parameters.len(), "applying function");
        let result = self.eval_block_statement(&function.body, &new_environment);
        self.call_depth -= 1;

        match result {
            Ok(object) => Ok(object.unwrap_or_else(Object::null)),
            Err(QuickReturn::Return(value)) => Ok(value),
            Err(QuickReturn::Error(err)) => Err(err),
        }
    }
}

fn eval_prefix_operation(
    operator: PrefixOperator,
    right: Rc<Object>,
) -> Result<Rc<Object>, EvaluationError> {
    match (operator, right.as_ref()) {
        (PrefixOperator::Bang, object) => Ok(Object::boolean(!object.is_truthy())),
        (PrefixOperator::Minus, Object::Integer(value)) => {
            Ok(Object::integer(value.wrapping_neg()))
        }
        (PrefixOperator::Minus, Object::Float(value)) => Ok(Object::float(-value)),
        (PrefixOperator::Minus, object) => Err(EvaluationError::UnknownPrefixOperator {
            operator,
            right: object.kind(),
        }),
    }
}

fn eval_infix_operation(
    operator: InfixOperator,
    left: &Rc<Object>,
    right: &Rc<Object>,
) -> Result<Rc<Object>, EvaluationError> {
    let unknown_operator = || EvaluationError::UnknownInfixOperator {
        left: left.kind(),
        operator,
        right: right.kind(),
    };

    match (left.as_ref(), right.as_ref()) {
        (Object::Integer(left), Object::Integer(right)) => {
            eval_integer_infix_operation(operator, *left, *right)
        }
        (Object::Float(left), Object::Float(right)) => {
            Ok(eval_float_infix_operation(operator, *left, *right))
        }
        // Mixed operands are promoted to float
        (Object::Integer(left), Object::Float(right)) => {
            Ok(eval_float_infix_operation(operator, *left as f64, *right))
        }
        (Object::Float(left), Object::Integer(right)) => {
            Ok(eval_float_infix_operation(operator, *left, *right as f64))
        }
        (Object::Boolean(left), Object::Boolean(right)) => match operator {
            InfixOperator::Equal => Ok(Object::boolean(left == right)),
            InfixOperator::NotEqual => Ok(Object::boolean(left != right)),
            _ => Err(unknown_operator()),
        },
        (Object::String(left), Object::String(right)) => match operator {
            InfixOperator::Plus => Ok(Object::string(format!("{}{}", left, right))),
            InfixOperator::Equal => Ok(Object::boolean(left == right)),
            InfixOperator::NotEqual => Ok(Object::boolean(left != right)),
            _ => Err(unknown_operator()),
        },
        (left_object, right_object) if left_object.kind() != right_object.kind() => {
            Err(EvaluationError::TypeMismatch {
                left: left_object.kind(),
                operator,
                right: right_object.kind(),
            })
        }
        _ => Err(unknown_operator()),
    }
}

fn eval_integer_infix_operation(
    operator: InfixOperator,
    left: i64,
    right: i64,
) -> Result<Rc<Object>, EvaluationError> {
    let result = match operator {
        InfixOperator::Plus => Object::integer(left.wrapping_add(right)),
        InfixOperator::Minus => Object::integer(left.wrapping_sub(right)),
        InfixOperator::Multiply => Object::integer(left.wrapping_mul(right)),
        InfixOperator::Divide => {
            if right == 0 {
                return Err(EvaluationError::DivisionByZero);
            }
            Object::integer(left.wrapping_div(right))
        }
        InfixOperator::LessThan => Object::boolean(left < right),
        InfixOperator::GreaterThan => Object::boolean(left > right),
        InfixOperator::LessEqual => Object::boolean(left <= right),
        InfixOperator::GreaterEqual => Object::boolean(left >= right),
        InfixOperator::Equal => Object::boolean(left == right),
        InfixOperator::NotEqual => Object::boolean(left != right),
    };
    Ok(result)
}

fn eval_float_infix_operation(operator: InfixOperator, left: f64, right: f64) -> Rc<Object> {
    match operator {
        InfixOperator::Plus => Object::float(left + right),
        InfixOperator::Minus => Object::float(left - right),
        InfixOperator::Multiply => Object::float(left * right),
        InfixOperator::Divide => Object::float(left / right),
        InfixOperator::LessThan => Object::boolean(left < right),
        InfixOperator::GreaterThan => Object::boolean(left > right),
        InfixOperator::LessEqual => Object::boolean(left <= right),
        InfixOperator::GreaterEqual => Object::boolean(left >= right),
        InfixOperator::Equal => Object::boolean(left == right),
        InfixOperator::NotEqual => Object::boolean(left != right),
    }
}
