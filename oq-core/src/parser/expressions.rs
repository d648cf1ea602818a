use std::rc::Rc;

use tracing::trace;

use super::error::ParseError;
use super::statements::parse_statement;
use crate::ast::{BlockStatement, Expression, Identifier, InfixOperator, PrefixOperator};
use crate::lexer::{Token, TokenKind};
use crate::parser::Parser;

const RED_ZONE: usize = 100 * 1024;
const STACK_PER_RECURSION: usize = 1024 * 1024;

#[derive(PartialOrd, PartialEq, Debug, Clone, Copy)]
pub enum Precedence {
    Lowest = 0,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
}

pub fn precedence_of(token: TokenKind) -> Precedence {
    match token {
        TokenKind::Equal | TokenKind::NotEqual => Precedence::Equals,
        TokenKind::LessThan
        | TokenKind::GreaterThan
        | TokenKind::LessEqual
        | TokenKind::GreaterEqual => Precedence::LessGreater,
        TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
        TokenKind::Asterisk | TokenKind::Slash => Precedence::Product,
        TokenKind::LParen => Precedence::Call,
        _ => Precedence::Lowest,
    }
}

fn infix_operator(token: TokenKind) -> Option<InfixOperator> {
    match token {
        TokenKind::Plus => Some(InfixOperator::Plus),
        TokenKind::Minus => Some(InfixOperator::Minus),
        TokenKind::Asterisk => Some(InfixOperator::Multiply),
        TokenKind::Slash => Some(InfixOperator::Divide),
        TokenKind::LessThan => Some(InfixOperator::LessThan),
        TokenKind::GreaterThan => Some(InfixOperator::GreaterThan),
        TokenKind::LessEqual => Some(InfixOperator::LessEqual),
        TokenKind::GreaterEqual => Some(InfixOperator::GreaterEqual),
        TokenKind::Equal => Some(InfixOperator::Equal),
        TokenKind::NotEqual => Some(InfixOperator::NotEqual),
        _ => None,
    }
}

fn has_prefix_function(token: TokenKind) -> bool {
    matches!(
        token,
        TokenKind::Ident
            | TokenKind::Int
            | TokenKind::Float
            | TokenKind::String
            | TokenKind::True
            | TokenKind::False
            | TokenKind::Bang
            | TokenKind::Minus
            | TokenKind::LParen
            | TokenKind::If
            | TokenKind::Function
    )
}

fn has_infix_function(token: TokenKind) -> bool {
    token == TokenKind::LParen || infix_operator(token).is_some()
}

pub fn parse_expression(
    parser: &mut Parser,
    precedence: Precedence,
) -> Result<Expression, ParseError> {
    parser.enter_nesting()?;
    let result = stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, || {
        parse_expression_inner(parser, precedence)
    });
    parser.leave_nesting(1);
    result
}

fn parse_expression_inner(
    parser: &mut Parser,
    precedence: Precedence,
) -> Result<Expression, ParseError> {
    if !has_prefix_function(parser.peek_kind()) {
        return Err(ParseError::NoPrefixFunction(parser.peek().clone()));
    }
    let token = parser.next_token();
    trace!(kind = %token.kind, ?precedence, "prefix");
    let mut left_expression = prefix_parsing(token, parser)?;

    // Every infix step wraps the tree built so far one level deeper, so a
    // long chain counts against the nesting limit like explicit parentheses.
    let mut links = 0;
    let result = loop {
        let next_kind = parser.peek_kind();
        if precedence >= precedence_of(next_kind) || !has_infix_function(next_kind) {
            break Ok(left_expression);
        }

        if let Err(err) = parser.enter_nesting() {
            break Err(err);
        }
        links += 1;

        let token = parser.next_token();
        left_expression = match infix_parsing(left_expression, token, parser) {
            Ok(expression) => expression,
            Err(err) => break Err(err),
        };
    };
    parser.leave_nesting(links);

    result
}

fn prefix_parsing(token: Token, parser: &mut Parser) -> Result<Expression, ParseError> {
    match token.kind {
        TokenKind::Ident => Ok(Expression::Identifier(Identifier {
            name: token.literal.clone(),
            token,
        })),
        TokenKind::Int => match token.literal.parse() {
            Ok(value) => Ok(Expression::IntegerLiteral { token, value }),
            Err(_) => Err(ParseError::InvalidInteger(token)),
        },
        TokenKind::Float => match token.literal.parse() {
            Ok(value) => Ok(Expression::FloatLiteral { token, value }),
            Err(_) => Err(ParseError::InvalidFloat(token)),
        },
        TokenKind::String => Ok(Expression::StringLiteral {
            value: token.literal.clone(),
            token,
        }),
        TokenKind::True => Ok(Expression::Boolean { token, value: true }),
        TokenKind::False => Ok(Expression::Boolean {
            token,
            value: false,
        }),
        TokenKind::Bang => prefix_operation(token, PrefixOperator::Bang, parser),
        TokenKind::Minus => prefix_operation(token, PrefixOperator::Minus, parser),
        TokenKind::LParen => parse_grouped_expression(parser),
        TokenKind::If => parse_if_expression(token, parser),
        TokenKind::Function => parse_function_literal(token, parser),
        _ => Err(ParseError::NoPrefixFunction(token)),
    }
}

fn infix_parsing(
    left: Expression,
    token: Token,
    parser: &mut Parser,
) -> Result<Expression, ParseError> {
    if token.kind == TokenKind::LParen {
        return parse_call_expression(left, token, parser);
    }

    let Some(operator) = infix_operator(token.kind) else {
        return Err(ParseError::NoPrefixFunction(token));
    };
    let right = parse_expression(parser, precedence_of(token.kind))?;

    Ok(Expression::Infix {
        token,
        operator,
        left: Box::new(left),
        right: Box::new(right),
    })
}

fn prefix_operation(
    token: Token,
    operator: PrefixOperator,
    parser: &mut Parser,
) -> Result<Expression, ParseError> {
    Ok(Expression::Prefix {
        token,
        operator,
        right: Box::new(parse_expression(parser, Precedence::Prefix)?),
    })
}

fn parse_grouped_expression(parser: &mut Parser) -> Result<Expression, ParseError> {
    let expression = parse_expression(parser, Precedence::Lowest)?;
    parser.expect_token(TokenKind::RParen)?;

    Ok(expression)
}

/// Parses `element (separator element)* terminator`, the opening token having
/// been consumed already.
fn parse_sequence<T>(
    parser: &mut Parser,
    parse_element: impl Fn(&mut Parser) -> Result<T, ParseError>,
    separator: TokenKind,
    terminator: TokenKind,
) -> Result<Vec<T>, ParseError> {
    let mut elements = Vec::new();

    if parser.next_if(terminator).is_some() {
        return Ok(elements);
    }

    loop {
        elements.push(parse_element(parser)?);

        if parser.next_if(separator).is_some() {
            continue;
        }
        parser.expect_token(terminator)?;
        return Ok(elements);
    }
}

fn parse_if_expression(token: Token, parser: &mut Parser) -> Result<Expression, ParseError> {
    parser.expect_token(TokenKind::LParen)?;
    let condition = Box::new(parse_expression(parser, Precedence::Lowest)?);
    parser.expect_token(TokenKind::RParen)?;

    let consequence = parse_block_statement(parser)?;

    let alternative = if parser.next_if(TokenKind::Else).is_some() {
        Some(parse_block_statement(parser)?)
    } else {
        None
    };

    Ok(Expression::If {
        token,
        condition,
        consequence,
        alternative,
    })
}

/// Parses `{ statements }`. Statements inside the braces are separated by
/// newlines; blank lines are ignored.
pub(crate) fn parse_block_statement(parser: &mut Parser) -> Result<BlockStatement, ParseError> {
    let token = parser.expect_token(TokenKind::LBrace)?;
    let mut statements = Vec::new();

    loop {
        parser.skip_newlines();
        match parser.peek_kind() {
            TokenKind::RBrace => {
                parser.next_token();
                break;
            }
            TokenKind::Eof => {
                return Err(ParseError::unexpected_token(
                    TokenKind::RBrace,
                    parser.peek().clone(),
                ))
            }
            _ => {}
        }

        if let Some(statement) = parse_statement(parser)? {
            statements.push(statement);
        }

        match parser.peek_kind() {
            TokenKind::NewLine => {
                parser.next_token();
            }
            TokenKind::RBrace | TokenKind::Eof => {}
            _ => {
                return Err(ParseError::unexpected_token(
                    TokenKind::NewLine,
                    parser.peek().clone(),
                ))
            }
        }
    }

    Ok(BlockStatement { token, statements })
}

fn parse_function_literal(token: Token, parser: &mut Parser) -> Result<Expression, ParseError> {
    parser.expect_token(TokenKind::LParen)?;
    let parameters = parse_sequence(
        parser,
        |parser| parser.parse_ident(),
        TokenKind::Comma,
        TokenKind::RParen,
    )?;

    let body = parse_block_statement(parser)?;

    Ok(Expression::FunctionLiteral {
        token,
        parameters: Rc::from(parameters),
        body: Rc::new(body),
    })
}

fn parse_call_expression(
    function: Expression,
    token: Token,
    parser: &mut Parser,
) -> Result<Expression, ParseError> {
    let arguments = parse_sequence(
        parser,
        |parser| parse_expression(parser, Precedence::Lowest),
        TokenKind::Comma,
        TokenKind::RParen,
    )?;

    Ok(Expression::Call {
        token,
        function: Box::new(function),
        arguments,
    })
}
