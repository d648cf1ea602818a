use std::rc::Rc;

use tracing::trace;

use crate::dialect::Dialect;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    Eof,
    Illegal,
    Ident,
    Int,
    Float,
    String,

    // Operators
    Assign,
    Plus,
    Minus,
    Bang,
    Asterisk,
    Slash,

    Equal,
    NotEqual,

    GreaterThan,
    LessThan,
    GreaterEqual,
    LessEqual,

    Comma,
    LParen,
    RParen,
    LBrace,
    RBrace,
    NewLine,
    // Dialect switch marker; the parser decides what it means
    Tilde,

    // Keywords
    Function,
    Let,
    True,
    False,
    If,
    Else,
    Elsif,
    Return,
    And,
    Or,
    For,
    While,
}

impl TokenKind {
    /// Canonical spelling of a keyword kind, shared by every dialect.
    pub fn keyword_spelling(self) -> Option<&'static str> {
        use TokenKind::*;
        match self {
            Function => Some("fn"),
            Let => Some("let"),
            True => Some("true"),
            False => Some("false"),
            If => Some("if"),
            Else => Some("else"),
            Elsif => Some("elsif"),
            Return => Some("return"),
            And => Some("and"),
            Or => Some("or"),
            For => Some("for"),
            While => Some("while"),
            _ => None,
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use TokenKind::*;
        let name = match self {
            Eof => "EOF",
            Illegal => "ILLEGAL",
            Ident => "IDENTIFIER",
            Int => "INTEGER",
            Float => "FLOAT",
            String => "STRING",
            Assign => "=",
            Plus => "+",
            Minus => "-",
            Bang => "!",
            Asterisk => "*",
            Slash => "/",
            Equal => "==",
            NotEqual => "!=",
            GreaterThan => ">",
            LessThan => "<",
            GreaterEqual => ">=",
            LessEqual => "<=",
            Comma => ",",
            LParen => "(",
            RParen => ")",
            LBrace => "{",
            RBrace => "}",
            NewLine => "NEW_LINE",
            Tilde => "~",
            Function => "FUNCTION",
            Let => "LET",
            True => "TRUE",
            False => "FALSE",
            If => "IF",
            Else => "ELSE",
            Elsif => "ELSIF",
            Return => "RETURN",
            And => "AND",
            Or => "OR",
            For => "FOR",
            While => "WHILE",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Token {
    pub kind: TokenKind,
    /// Surface text as written in the source (decoded contents for strings).
    pub literal: Rc<str>,
    pub start: usize,
    pub end: usize,
}

impl Token {
    /// The dialect-independent text of the token: `olsun` reads as `let`.
    pub fn canonical(&self) -> &str {
        self.kind.keyword_spelling().unwrap_or(&self.literal)
    }
}

/// Lazy tokenizer over a source string.
///
/// The active keyword table belongs to the tokenizer instance and can be
/// swapped mid-stream with [`Tokenizer::set_active_dialect`].
#[derive(Clone, Debug)]
pub struct Tokenizer<'a> {
    input: &'a str,
    position: usize,
    dialect: Dialect,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self::with_dialect(input, Dialect::default())
    }

    pub fn with_dialect(input: &'a str, dialect: Dialect) -> Self {
        Self {
            input,
            position: 0,
            dialect,
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Activates the named keyword table. Unknown names fall back to the
    /// default table (with a warning); the dialect actually in effect is
    /// returned.
    pub fn set_active_dialect(&mut self, name: &str) -> Dialect {
        self.dialect = Dialect::resolve(name);
        self.dialect
    }

    /// Moves the cursor back to a byte offset previously reported as a token
    /// `start`, so the following tokens are scanned again.
    pub(crate) fn rewind(&mut self, position: usize) {
        debug_assert!(position <= self.position);
        self.position = position;
    }

    fn is_letter(ch: char) -> bool {
        ch.is_alphabetic() || ch == '_'
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn peek_second_char(&self) -> Option<char> {
        self.input[self.position..].chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.position += ch.len_utf8();
        Some(ch)
    }

    fn bump_if(&mut self, predicate: impl Fn(char) -> bool) -> bool {
        match self.peek_char() {
            Some(ch) if predicate(ch) => {
                self.position += ch.len_utf8();
                true
            }
            _ => false,
        }
    }

    fn skip_whitespace(&mut self) {
        while self.bump_if(|ch| matches!(ch, ' ' | '\t' | '\r')) {}
    }

    fn token(&self, kind: TokenKind, start: usize) -> Token {
        Token {
            kind,
            literal: self.input[start..self.position].into(),
            start,
            end: self.position,
        }
    }

    fn read_identifier(&mut self, start: usize) -> Token {
        while self.bump_if(Self::is_letter) {}

        let ident = &self.input[start..self.position];
        let entry = self.dialect.lookup(ident);
        self.token(entry.kind, start)
    }

    fn read_number(&mut self, start: usize) -> Token {
        let mut kind = TokenKind::Int;
        loop {
            match self.peek_char() {
                Some(ch) if ch.is_ascii_digit() => {
                    self.bump();
                }
                Some('.')
                    if kind == TokenKind::Int
                        && self.peek_second_char().is_some_and(|ch| ch.is_ascii_digit()) =>
                {
                    kind = TokenKind::Float;
                    self.bump();
                }
                _ => break,
            }
        }

        self.token(kind, start)
    }

    fn read_string(&mut self, start: usize) -> Token {
        let mut contents = String::new();
        loop {
            match self.bump() {
                Some('"') => break,
                Some('\\') => match self.bump() {
                    Some('n') => contents.push('\n'),
                    Some('t') => contents.push('\t'),
                    Some(ch @ ('"' | '\\')) => contents.push(ch),
                    Some(ch) => {
                        contents.push('\\');
                        contents.push(ch);
                    }
                    None => return self.token(TokenKind::Illegal, start),
                },
                Some(ch) => contents.push(ch),
                None => return self.token(TokenKind::Illegal, start),
            }
        }

        Token {
            kind: TokenKind::String,
            literal: contents.into(),
            start,
            end: self.position,
        }
    }

    /// Produces the next token. Once the input is exhausted every call
    /// returns an `Eof` token positioned at the end of the input.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let start = self.position;
        let Some(ch) = self.bump() else {
            return self.token(TokenKind::Eof, start);
        };

        let token = match ch {
            '\n' => self.token(TokenKind::NewLine, start),
            '~' => self.token(TokenKind::Tilde, start),
            '=' => {
                if self.bump_if(|ch| ch == '=') {
                    self.token(TokenKind::Equal, start)
                } else {
                    self.token(TokenKind::Assign, start)
                }
            }
            '!' => {
                if self.bump_if(|ch| ch == '=') {
                    self.token(TokenKind::NotEqual, start)
                } else {
                    self.token(TokenKind::Bang, start)
                }
            }
            '<' => {
                if self.bump_if(|ch| ch == '=') {
                    self.token(TokenKind::LessEqual, start)
                } else {
                    self.token(TokenKind::LessThan, start)
                }
            }
            '>' => {
                if self.bump_if(|ch| ch == '=') {
                    self.token(TokenKind::GreaterEqual, start)
                } else {
                    self.token(TokenKind::GreaterThan, start)
                }
            }
            '+' => self.token(TokenKind::Plus, start),
            '-' => self.token(TokenKind::Minus, start),
            '*' => self.token(TokenKind::Asterisk, start),
            '/' => self.token(TokenKind::Slash, start),
            ',' => self.token(TokenKind::Comma, start),
            '(' => self.token(TokenKind::LParen, start),
            ')' => self.token(TokenKind::RParen, start),
            '{' => self.token(TokenKind::LBrace, start),
            '}' => self.token(TokenKind::RBrace, start),
            '"' => self.read_string(start),
            c if Self::is_letter(c) => self.read_identifier(start),
            c if c.is_ascii_digit() => self.read_number(start),
            _ => self.token(TokenKind::Illegal, start),
        };

        trace!(kind = %token.kind, literal = %token.literal, start, "token");
        token
    }
}

/// Yields tokens up to, but not including, the end of input.
impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let token = self.next_token();
        (token.kind != TokenKind::Eof).then_some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds_and_literals(input: &str) -> Vec<(TokenKind, String)> {
        Tokenizer::new(input)
            .map(|token| (token.kind, token.literal.to_string()))
            .collect()
    }

    #[test]
    fn test_single_characters() {
        let input = "=+(){},~";
        let output = Tokenizer::new(input).collect::<Vec<_>>();

        let expected = [
            (TokenKind::Assign, 0, 1),
            (TokenKind::Plus, 1, 2),
            (TokenKind::LParen, 2, 3),
            (TokenKind::RParen, 3, 4),
            (TokenKind::LBrace, 4, 5),
            (TokenKind::RBrace, 5, 6),
            (TokenKind::Comma, 6, 7),
            (TokenKind::Tilde, 7, 8),
        ];

        assert_eq!(
            output
                .iter()
                .map(|token| (token.kind, token.start, token.end))
                .collect::<Vec<_>>(),
            expected
        );
    }

    #[test]
    fn test_program() {
        let input = "let five = 5.0
let ten = 10
let add = fn(x, y) {
  x + y
}
!-/5.2*5
5 < 10 >= 5 <= 4
10 == 10
10 != 9
";
        let expected = vec![
            (TokenKind::Let, "let"),
            (TokenKind::Ident, "five"),
            (TokenKind::Assign, "="),
            (TokenKind::Float, "5.0"),
            (TokenKind::NewLine, "\n"),
            (TokenKind::Let, "let"),
            (TokenKind::Ident, "ten"),
            (TokenKind::Assign, "="),
            (TokenKind::Int, "10"),
            (TokenKind::NewLine, "\n"),
            (TokenKind::Let, "let"),
            (TokenKind::Ident, "add"),
            (TokenKind::Assign, "="),
            (TokenKind::Function, "fn"),
            (TokenKind::LParen, "("),
            (TokenKind::Ident, "x"),
            (TokenKind::Comma, ","),
            (TokenKind::Ident, "y"),
            (TokenKind::RParen, ")"),
            (TokenKind::LBrace, "{"),
            (TokenKind::NewLine, "\n"),
            (TokenKind::Ident, "x"),
            (TokenKind::Plus, "+"),
            (TokenKind::Ident, "y"),
            (TokenKind::NewLine, "\n"),
            (TokenKind::RBrace, "}"),
            (TokenKind::NewLine, "\n"),
            (TokenKind::Bang, "!"),
            (TokenKind::Minus, "-"),
            (TokenKind::Slash, "/"),
            (TokenKind::Float, "5.2"),
            (TokenKind::Asterisk, "*"),
            (TokenKind::Int, "5"),
            (TokenKind::NewLine, "\n"),
            (TokenKind::Int, "5"),
            (TokenKind::LessThan, "<"),
            (TokenKind::Int, "10"),
            (TokenKind::GreaterEqual, ">="),
            (TokenKind::Int, "5"),
            (TokenKind::LessEqual, "<="),
            (TokenKind::Int, "4"),
            (TokenKind::NewLine, "\n"),
            (TokenKind::Int, "10"),
            (TokenKind::Equal, "=="),
            (TokenKind::Int, "10"),
            (TokenKind::NewLine, "\n"),
            (TokenKind::Int, "10"),
            (TokenKind::NotEqual, "!="),
            (TokenKind::Int, "9"),
            (TokenKind::NewLine, "\n"),
        ];

        assert_eq!(
            kinds_and_literals(input),
            expected
                .into_iter()
                .map(|(kind, literal)| (kind, literal.to_owned()))
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_eof_is_sticky() {
        let mut tokenizer = Tokenizer::new("x");
        assert_eq!(tokenizer.next_token().kind, TokenKind::Ident);
        for _ in 0..3 {
            let token = tokenizer.next_token();
            assert_eq!(token.kind, TokenKind::Eof);
            assert_eq!(&*token.literal, "");
            assert_eq!((token.start, token.end), (1, 1));
        }
    }

    #[test]
    fn test_numbers() {
        let tests = vec![
            ("123", vec![(TokenKind::Int, "123")]),
            ("1.5", vec![(TokenKind::Float, "1.5")]),
            (
                "1.2.3",
                vec![
                    (TokenKind::Float, "1.2"),
                    (TokenKind::Illegal, "."),
                    (TokenKind::Int, "3"),
                ],
            ),
            ("7.", vec![(TokenKind::Int, "7"), (TokenKind::Illegal, ".")]),
        ];

        for (input, expected) in tests {
            assert_eq!(
                kinds_and_literals(input),
                expected
                    .into_iter()
                    .map(|(kind, literal)| (kind, literal.to_owned()))
                    .collect::<Vec<_>>(),
                "input {input:?}"
            );
        }
    }

    #[test]
    fn test_illegal_characters() {
        let output = kinds_and_literals("a @ b $");
        assert_eq!(
            output,
            vec![
                (TokenKind::Ident, "a".to_owned()),
                (TokenKind::Illegal, "@".to_owned()),
                (TokenKind::Ident, "b".to_owned()),
                (TokenKind::Illegal, "$".to_owned()),
            ]
        );
    }

    #[test]
    fn test_strings() {
        let output = kinds_and_literals(r#""hello world" "say \"hi\"\n" "open"#);
        assert_eq!(
            output,
            vec![
                (TokenKind::String, "hello world".to_owned()),
                (TokenKind::String, "say \"hi\"\n".to_owned()),
                (TokenKind::Illegal, "\"open".to_owned()),
            ]
        );
    }

    #[test]
    fn test_unicode_identifiers() {
        let mut tokenizer = Tokenizer::with_dialect("болсын ұзындығы = шын", Dialect::QZQ);
        let kinds = tokenizer.by_ref().map(|token| token.kind).collect::<Vec<_>>();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Let,
                TokenKind::Ident,
                TokenKind::Assign,
                TokenKind::True
            ]
        );
    }

    #[test]
    fn test_switching_dialect_keeps_surface_literal() {
        let mut tokenizer = Tokenizer::new("olsun olsun");
        assert_eq!(tokenizer.next_token().kind, TokenKind::Ident);

        assert_eq!(tokenizer.set_active_dialect("trk"), Dialect::TRK);
        let token = tokenizer.next_token();
        assert_eq!(token.kind, TokenKind::Let);
        assert_eq!(&*token.literal, "olsun");
        assert_eq!(token.canonical(), "let");
    }

    #[test]
    fn test_unknown_dialect_falls_back_to_default() {
        let mut tokenizer = Tokenizer::with_dialect("let", Dialect::TRK);
        assert_eq!(tokenizer.set_active_dialect("xyz"), Dialect::ENG);
        assert_eq!(tokenizer.next_token().kind, TokenKind::Let);
    }

    #[test]
    fn test_tilde_pragma_tokens() {
        let output = kinds_and_literals("\n~qzq\n~trk\n");
        assert_eq!(
            output,
            vec![
                (TokenKind::NewLine, "\n".to_owned()),
                (TokenKind::Tilde, "~".to_owned()),
                (TokenKind::Ident, "qzq".to_owned()),
                (TokenKind::NewLine, "\n".to_owned()),
                (TokenKind::Tilde, "~".to_owned()),
                (TokenKind::Ident, "trk".to_owned()),
                (TokenKind::NewLine, "\n".to_owned()),
            ]
        );
    }
}
