pub mod error;
pub mod expressions;
pub mod statements;

use tracing::debug;

use crate::ast::{Identifier, Program};
use crate::dialect::Dialect;
use crate::lexer::{Token, TokenKind, Tokenizer};
pub use error::ParseError;
use statements::parse_statement;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// How deeply expressions may nest before parsing gives up with
    /// [`ParseError::NestingTooDeep`].
    pub max_nesting: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self { max_nesting: 256 }
    }
}

pub struct Parser<'a> {
    tokenizer: Tokenizer<'a>,
    peeked: Option<Token>,
    config: ParserConfig,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokenizer: Tokenizer<'a>) -> Self {
        Self::with_config(tokenizer, ParserConfig::default())
    }

    pub fn with_config(tokenizer: Tokenizer<'a>, config: ParserConfig) -> Self {
        Self {
            tokenizer,
            peeked: None,
            config,
            depth: 0,
        }
    }

    /// The keyword table in effect for the tokens still to be read.
    pub fn dialect(&self) -> Dialect {
        self.tokenizer.dialect()
    }

    pub(crate) fn peek(&mut self) -> &Token {
        self.peeked
            .get_or_insert_with(|| self.tokenizer.next_token())
    }

    pub(crate) fn peek_kind(&mut self) -> TokenKind {
        self.peek().kind
    }

    pub(crate) fn next_token(&mut self) -> Token {
        match self.peeked.take() {
            Some(token) => token,
            None => self.tokenizer.next_token(),
        }
    }

    pub(crate) fn next_if(&mut self, kind: TokenKind) -> Option<Token> {
        (self.peek_kind() == kind).then(|| self.next_token())
    }

    /// Consumes the next token if it has the expected kind. On a mismatch the
    /// token is left in place so error recovery can see it.
    pub(crate) fn expect_token(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        match self.next_if(kind) {
            Some(token) => Ok(token),
            None => Err(ParseError::unexpected_token(kind, self.peek().clone())),
        }
    }

    pub(crate) fn parse_ident(&mut self) -> Result<Identifier, ParseError> {
        let token = self.expect_token(TokenKind::Ident)?;
        Ok(Identifier {
            name: token.literal.clone(),
            token,
        })
    }

    pub(crate) fn skip_newlines(&mut self) {
        while self.next_if(TokenKind::NewLine).is_some() {}
    }

    /// Drops tokens up to and including the next newline.
    fn skip_to_line_end(&mut self) {
        loop {
            match self.peek_kind() {
                TokenKind::Eof => break,
                TokenKind::NewLine => {
                    self.next_token();
                    break;
                }
                _ => {
                    self.next_token();
                }
            }
        }
    }

    /// Activates a new keyword table. The lookahead token, if any, was scanned
    /// with the old table, so it is discarded and scanned again.
    pub(crate) fn switch_dialect(&mut self, name: &str) {
        let dialect = self.tokenizer.set_active_dialect(name);
        if let Some(token) = self.peeked.take() {
            self.tokenizer.rewind(token.start);
        }
        debug!(requested = name, active = %dialect, "switched keyword dialect");
    }

    pub(crate) fn enter_nesting(&mut self) -> Result<(), ParseError> {
        if self.depth >= self.config.max_nesting {
            return Err(ParseError::NestingTooDeep {
                limit: self.config.max_nesting,
                token: self.peek().clone(),
            });
        }
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn leave_nesting(&mut self, levels: usize) {
        self.depth -= levels;
    }

    /// Parses the whole input, collecting every error instead of stopping at
    /// the first one. Statements that failed to parse are left out of the
    /// returned program.
    pub fn parse(&mut self) -> (Program, Vec<ParseError>) {
        let mut statements = Vec::new();
        let mut errors = Vec::new();

        loop {
            self.skip_newlines();
            if self.peek_kind() == TokenKind::Eof {
                break;
            }

            let statement = match parse_statement(self) {
                Ok(statement) => statement,
                Err(err) => {
                    errors.push(err);
                    self.skip_to_line_end();
                    continue;
                }
            };

            // Statements end at a newline, or at the end of the input
            match self.peek_kind() {
                TokenKind::NewLine | TokenKind::Eof => {
                    self.next_if(TokenKind::NewLine);
                    statements.extend(statement);
                }
                _ => {
                    errors.push(ParseError::unexpected_token(
                        TokenKind::NewLine,
                        self.peek().clone(),
                    ));
                    self.skip_to_line_end();
                }
            }
        }

        (Program { statements }, errors)
    }

    pub fn parse_program(&mut self) -> Result<Program, Vec<ParseError>> {
        let (program, errors) = self.parse();
        if errors.is_empty() {
            Ok(program)
        } else {
            Err(errors)
        }
    }
}
