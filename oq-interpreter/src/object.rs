use std::fmt::Display;
use std::rc::Rc;

use oq_core::ast;
use thiserror::Error;

use crate::builtins::{argument_count_message, argument_type_message};
use crate::environment::Environment;

#[derive(Debug, PartialEq, Clone)]
pub enum Object {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    String(Rc<str>),
    Function(Function),
    Builtin(BuiltinFunction),
    Null,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ObjectKind {
    Integer,
    Float,
    Boolean,
    String,
    Function,
    Builtin,
    Null,
}

thread_local! {
    static NULL: Rc<Object> = Rc::new(Object::Null);
    static TRUE: Rc<Object> = Rc::new(Object::Boolean(true));
    static FALSE: Rc<Object> = Rc::new(Object::Boolean(false));
}

impl Object {
    pub fn null() -> Rc<Object> {
        NULL.with(|x| x.clone())
    }
    pub fn boolean(value: bool) -> Rc<Object> {
        if value {
            TRUE.with(|x| x.clone())
        } else {
            FALSE.with(|x| x.clone())
        }
    }
    pub fn integer(value: i64) -> Rc<Object> {
        Rc::new(Object::Integer(value))
    }
    pub fn float(value: f64) -> Rc<Object> {
        Rc::new(Object::Float(value))
    }
    pub fn string(value: impl Into<Rc<str>>) -> Rc<Object> {
        Rc::new(Object::String(value.into()))
    }
    pub fn function(
        parameters: Rc<[ast::Identifier]>,
        body: Rc<ast::BlockStatement>,
        env: Environment,
    ) -> Rc<Object> {
        Rc::new(Object::Function(Function {
            parameters,
            body,
            env,
        }))
    }
    pub fn builtin_function(func: BuiltinFunction) -> Rc<Object> {
        Rc::new(Object::Builtin(func))
    }

    pub fn kind(&self) -> ObjectKind {
        match self {
            Object::Integer(_) => ObjectKind::Integer,
            Object::Float(_) => ObjectKind::Float,
            Object::Boolean(_) => ObjectKind::Boolean,
            Object::String(_) => ObjectKind::String,
            Object::Function(_) => ObjectKind::Function,
            Object::Builtin(_) => ObjectKind::Builtin,
            Object::Null => ObjectKind::Null,
        }
    }

    /// `null` and `false` are falsy, everything else (including `0`) is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Object::Null | Object::Boolean(false))
    }
}

impl Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ObjectKind::Integer => "INTEGER",
            ObjectKind::Float => "FLOAT",
            ObjectKind::Boolean => "BOOLEAN",
            ObjectKind::String => "STRING",
            ObjectKind::Function => "FUNCTION",
            ObjectKind::Builtin => "BUILTIN",
            ObjectKind::Null => "NULL",
        };
        write!(f, "{}", name)
    }
}

impl Display for Object {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Object::Integer(value) => write!(f, "{}", value),
            // Debug keeps the fractional part: 2.0 rather than 2
            Object::Float(value) => write!(f, "{:?}", value),
            Object::Boolean(value) => write!(f, "{}", value),
            Object::String(value) => write!(f, "{}", value),
            Object::Function(function) => write!(f, "{}", function),
            Object::Builtin(builtin) => write!(f, "builtin function {}", builtin.name),
            Object::Null => write!(f, "null"),
        }
    }
}

/// A closure: the function literal plus the environment it was defined in.
#[derive(Clone)]
pub struct Function {
    pub parameters: Rc<[ast::Identifier]>,
    pub body: Rc<ast::BlockStatement>,
    pub env: Environment,
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.body, &other.body) && self.env.ptr_eq(&other.env)
    }
}

impl std::fmt::Debug for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Function")
            .field("parameters", &self.parameters.len())
            .field("body", &Rc::as_ptr(&self.body))
            .finish()
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parameters = self
            .parameters
            .iter()
            .map(|parameter| parameter.name.as_ref())
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "fn({}) {}", parameters, self.body)
    }
}

#[derive(Clone)]
pub struct BuiltinFunction {
    pub name: &'static str,
    pub func: fn(Vec<Rc<Object>>) -> Result<Rc<Object>, EvaluationError>,
}

impl PartialEq for BuiltinFunction {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.func as usize == other.func as usize
    }
}

impl std::fmt::Debug for BuiltinFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuiltinFunction")
            .field("name", &self.name)
            .finish()
    }
}

/// Early exit from statement evaluation. Both variants unwind through `?`
/// until a function call (for `Return`) or the program (for both) stops them.
#[derive(Debug, PartialEq)]
pub enum QuickReturn {
    Return(Rc<Object>),
    Error(EvaluationError),
}

impl From<EvaluationError> for QuickReturn {
    fn from(error: EvaluationError) -> Self {
        QuickReturn::Error(error)
    }
}

#[derive(Debug, PartialEq, Clone, Error)]
pub enum EvaluationError {
    #[error("identifier not found: {0}")]
    UnknownIdentifier(Rc<str>),
    #[error("type mismatch: {left} {operator} {right}")]
    TypeMismatch {
        left: ObjectKind,
        operator: ast::InfixOperator,
        right: ObjectKind,
    },
    #[error("unknown operator: {left} {operator} {right}")]
    UnknownInfixOperator {
        left: ObjectKind,
        operator: ast::InfixOperator,
        right: ObjectKind,
    },
    #[error("unknown operator: {operator}{right}")]
    UnknownPrefixOperator {
        operator: ast::PrefixOperator,
        right: ObjectKind,
    },
    #[error("not a function: {0}")]
    NotAFunction(ObjectKind),
    #[error("wrong number of arguments: expected {expected}, got {actual}")]
    WrongArgumentCount { expected: usize, actual: usize },
    #[error("division by zero")]
    DivisionByZero,
    #[error("maximum call depth of {0} exceeded")]
    CallDepthExceeded(usize),
    #[error("{}", argument_count_message(.name, .got, .want))]
    BuiltinArgumentCount {
        name: &'static str,
        got: usize,
        want: usize,
    },
    #[error("{}", argument_type_message(.name, .kind))]
    BuiltinArgumentType { name: &'static str, kind: ObjectKind },
}
