use std::fmt::Display;
use std::rc::Rc;

use crate::lexer::Token;

// Display renders the canonical form: canonical keyword spellings, every
// operator application parenthesised, statements concatenated with no
// separator.

#[derive(Debug, PartialEq, Clone)]
pub enum Statement {
    Let(LetStatement),
    Return(ReturnStatement),
    Expression(ExpressionStatement),
}

#[derive(Debug, PartialEq, Clone)]
pub struct LetStatement {
    pub token: Token,
    pub identifier: Identifier,
    pub value: Expression,
}

#[derive(Debug, PartialEq, Clone)]
pub struct ReturnStatement {
    pub token: Token,
    pub value: Expression,
}

#[derive(Debug, PartialEq, Clone)]
pub struct ExpressionStatement {
    /// First token of the expression.
    pub token: Token,
    pub expression: Expression,
}

#[derive(Debug, PartialEq, Clone)]
pub struct BlockStatement {
    pub token: Token,
    pub statements: Vec<Statement>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Identifier {
    pub token: Token,
    pub name: Rc<str>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Expression {
    Identifier(Identifier),
    IntegerLiteral {
        token: Token,
        value: i64,
    },
    FloatLiteral {
        token: Token,
        value: f64,
    },
    StringLiteral {
        token: Token,
        value: Rc<str>,
    },
    Boolean {
        token: Token,
        value: bool,
    },
    Prefix {
        token: Token,
        operator: PrefixOperator,
        right: Box<Expression>,
    },
    Infix {
        token: Token,
        operator: InfixOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    If {
        token: Token,
        condition: Box<Expression>,
        consequence: BlockStatement,
        alternative: Option<BlockStatement>,
    },
    FunctionLiteral {
        token: Token,
        parameters: Rc<[Identifier]>,
        body: Rc<BlockStatement>,
    },
    Call {
        /// The `(` that opened the argument list.
        token: Token,
        function: Box<Expression>,
        arguments: Vec<Expression>,
    },
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum InfixOperator {
    Plus,
    Minus,
    Multiply,
    Divide,
    LessThan,
    GreaterThan,
    LessEqual,
    GreaterEqual,
    Equal,
    NotEqual,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PrefixOperator {
    Minus,
    Bang,
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Program {
    pub fn token_literal(&self) -> &str {
        self.statements
            .first()
            .map(Statement::token_literal)
            .unwrap_or("")
    }
}

impl Statement {
    pub fn token(&self) -> &Token {
        match self {
            Statement::Let(statement) => &statement.token,
            Statement::Return(statement) => &statement.token,
            Statement::Expression(statement) => &statement.token,
        }
    }

    pub fn token_literal(&self) -> &str {
        self.token().canonical()
    }
}

impl Expression {
    pub fn token(&self) -> &Token {
        use Expression::*;
        match self {
            Identifier(identifier) => &identifier.token,
            IntegerLiteral { token, .. }
            | FloatLiteral { token, .. }
            | StringLiteral { token, .. }
            | Boolean { token, .. }
            | Prefix { token, .. }
            | Infix { token, .. }
            | If { token, .. }
            | FunctionLiteral { token, .. }
            | Call { token, .. } => token,
        }
    }

    pub fn token_literal(&self) -> &str {
        self.token().canonical()
    }
}

impl Display for LetStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} = {}",
            self.token.canonical(),
            self.identifier,
            self.value
        )
    }
}

impl Display for ReturnStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.token.canonical(), self.value)
    }
}

impl Display for ExpressionStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.expression)
    }
}

impl Display for BlockStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for statement in &self.statements {
            write!(f, "{}", statement)?;
        }
        write!(f, "}}")
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Expression::*;
        match self {
            Identifier(ident) => write!(f, "{}", ident),
            IntegerLiteral { token, .. } | FloatLiteral { token, .. } => {
                write!(f, "{}", token.literal)
            }
            StringLiteral { value, .. } => write!(f, "{:?}", value),
            Boolean { token, .. } => write!(f, "{}", token.canonical()),
            Prefix {
                operator, right, ..
            } => write!(f, "({}{})", operator, right),
            Infix {
                operator,
                left,
                right,
                ..
            } => write!(f, "({} {} {})", left, operator, right),
            If {
                token,
                condition,
                consequence,
                alternative,
            } => {
                write!(f, "{} {} {}", token.canonical(), condition, consequence)?;
                if let Some(alternative) = alternative {
                    write!(f, " else {}", alternative)?;
                }
                Ok(())
            }
            FunctionLiteral {
                token,
                parameters,
                body,
            } => {
                write!(
                    f,
                    "{}({}) {}",
                    token.canonical(),
                    parameters
                        .iter()
                        .map(|id| id.name.as_ref())
                        .collect::<Box<[&str]>>()
                        .join(", "),
                    body
                )
            }
            Call {
                function,
                arguments,
                ..
            } => {
                write!(
                    f,
                    "{}({})",
                    function,
                    arguments
                        .iter()
                        .map(|arg| arg.to_string())
                        .collect::<Vec<String>>()
                        .join(", ")
                )
            }
        }
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Statement::*;
        match self {
            Let(statement) => write!(f, "{}", statement),
            Return(statement) => write!(f, "{}", statement),
            Expression(statement) => write!(f, "{}", statement),
        }
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for statement in &self.statements {
            write!(f, "{}", statement)?;
        }
        Ok(())
    }
}

impl Display for PrefixOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            PrefixOperator::Minus => "-",
            PrefixOperator::Bang => "!",
        };
        write!(f, "{}", symbol)
    }
}

impl Display for InfixOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use InfixOperator::*;
        let symbol = match self {
            Plus => "+",
            Minus => "-",
            Multiply => "*",
            Divide => "/",
            LessThan => "<",
            GreaterThan => ">",
            LessEqual => "<=",
            GreaterEqual => ">=",
            Equal => "==",
            NotEqual => "!=",
        };
        write!(f, "{}", symbol)
    }
}
