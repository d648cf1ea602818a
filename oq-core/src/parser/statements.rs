use crate::ast::{ExpressionStatement, LetStatement, ReturnStatement, Statement};
use crate::lexer::TokenKind;
use crate::parser::expressions::{parse_expression, Precedence};
use crate::parser::{ParseError, Parser};

/// Parses a single statement without its terminator. A dialect pragma
/// (`~name`) takes effect immediately and yields no statement.
pub fn parse_statement(parser: &mut Parser) -> Result<Option<Statement>, ParseError> {
    match parser.peek_kind() {
        TokenKind::Let => Ok(Some(Statement::Let(parse_let_statement(parser)?))),
        TokenKind::Return => Ok(Some(Statement::Return(parse_return_statement(parser)?))),
        TokenKind::Tilde => {
            parse_dialect_pragma(parser)?;
            Ok(None)
        }
        _ => Ok(Some(Statement::Expression(parse_expression_statement(
            parser,
        )?))),
    }
}

fn parse_let_statement(parser: &mut Parser) -> Result<LetStatement, ParseError> {
    let token = parser.expect_token(TokenKind::Let)?;
    let identifier = parser.parse_ident()?;
    parser.expect_token(TokenKind::Assign)?;
    let value = parse_expression(parser, Precedence::Lowest)?;

    Ok(LetStatement {
        token,
        identifier,
        value,
    })
}

fn parse_return_statement(parser: &mut Parser) -> Result<ReturnStatement, ParseError> {
    let token = parser.expect_token(TokenKind::Return)?;
    let value = parse_expression(parser, Precedence::Lowest)?;

    Ok(ReturnStatement { token, value })
}

fn parse_expression_statement(parser: &mut Parser) -> Result<ExpressionStatement, ParseError> {
    let token = parser.peek().clone();
    let expression = parse_expression(parser, Precedence::Lowest)?;

    Ok(ExpressionStatement { token, expression })
}

fn parse_dialect_pragma(parser: &mut Parser) -> Result<(), ParseError> {
    parser.expect_token(TokenKind::Tilde)?;
    let name = parser.expect_token(TokenKind::Ident)?;
    parser.switch_dialect(&name.literal);
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::ast::Statement;
    use crate::dialect::Dialect;
    use crate::lexer::Tokenizer;
    use crate::parser::Parser;

    #[test]
    fn test_turkish_let_statement() {
        let mut parser = Parser::new(Tokenizer::new("~trk\nolsun x = 10\n"));
        let program = parser.parse_program().unwrap();

        assert_eq!(program.statements.len(), 1);
        let Statement::Let(statement) = &program.statements[0] else {
            panic!("expected a let statement, got {:?}", program.statements[0]);
        };
        assert_eq!(program.statements[0].token_literal(), "let");
        assert_eq!(&*statement.token.literal, "olsun");
        assert_eq!(&*statement.identifier.name, "x");
        assert_eq!(statement.value.to_string(), "10");
        assert_eq!(parser.dialect(), Dialect::TRK);
    }

    #[test]
    fn test_switching_back_to_english() {
        let input = "~trk\nolsun a = doğru\n~eng\nlet b = false\nolsun\n";
        let mut parser = Parser::new(Tokenizer::new(input));
        let program = parser.parse_program().unwrap();

        // `olsun` is a plain identifier once english is active again
        assert_eq!(program.to_string(), "let a = truelet b = falseolsun");
    }

    #[test]
    fn test_turkish_conditional() {
        let input = "~trk\neğer (x > 1) { döndür doğru } yoksa { döndür yanlış }\n";
        let program = Parser::new(Tokenizer::new(input)).parse_program().unwrap();

        assert_eq!(
            program.to_string(),
            "if (x > 1) {return true} else {return false}"
        );
    }

    #[test]
    fn test_pragma_inside_block() {
        let input = "let f = fn() {\n  ~qzq\n  қайтару шын\n}\n";
        let mut parser = Parser::new(Tokenizer::new(input));
        let program = parser.parse_program().unwrap();

        assert_eq!(program.to_string(), "let f = fn() {return true}");
        assert_eq!(parser.dialect(), Dialect::QZQ);
    }

    #[test]
    fn test_unknown_dialect_keeps_parsing() {
        let input = "~trk\n~klingon\nlet x = 1\n";
        let program = Parser::new(Tokenizer::new(input)).parse_program().unwrap();

        assert_eq!(program.to_string(), "let x = 1");
    }
}
