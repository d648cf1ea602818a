//! Keyword tables for the supported surface dialects.
//!
//! Every dialect maps its own keyword spellings onto the same canonical
//! [`TokenKind`], so the parser never needs to know which dialect a program
//! was written in.

use phf::{phf_map, Map};
use tracing::warn;

use crate::lexer::TokenKind;

const ENG_KEYWORDS: Map<&'static str, TokenKind> = phf_map! {
    "fn" => TokenKind::Function,
    "let" => TokenKind::Let,
    "true" => TokenKind::True,
    "false" => TokenKind::False,
    "if" => TokenKind::If,
    "else" => TokenKind::Else,
    "elsif" => TokenKind::Elsif,
    "return" => TokenKind::Return,
    "and" => TokenKind::And,
    "or" => TokenKind::Or,
    "for" => TokenKind::For,
    "while" => TokenKind::While,
};

const TRK_KEYWORDS: Map<&'static str, TokenKind> = phf_map! {
    "fn" => TokenKind::Function,
    "olsun" => TokenKind::Let,
    "doğru" => TokenKind::True,
    "yanlış" => TokenKind::False,
    "eğer" => TokenKind::If,
    "yoksa" => TokenKind::Else,
    "yok_eğer" => TokenKind::Elsif,
    "döndür" => TokenKind::Return,
    "ve" => TokenKind::And,
    "veya" => TokenKind::Or,
    "için" => TokenKind::For,
    "iken" => TokenKind::While,
};

const QZQ_KEYWORDS: Map<&'static str, TokenKind> = phf_map! {
    "фн" => TokenKind::Function,
    "болсын" => TokenKind::Let,
    "шын" => TokenKind::True,
    "жалған" => TokenKind::False,
    "егер" => TokenKind::If,
    "әйтпесе" => TokenKind::Else,
    "егер_әйтпесе" => TokenKind::Elsif,
    "қайтару" => TokenKind::Return,
    "және" => TokenKind::And,
    "немесе" => TokenKind::Or,
    "үшін" => TokenKind::For,
    "уақытша" => TokenKind::While,
};

/// Result of classifying a scanned word against a dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordEntry<'a> {
    pub kind: TokenKind,
    /// The dialect-independent spelling, e.g. `"let"` for `olsun`. For plain
    /// identifiers this is the word itself.
    pub canonical: &'a str,
}

#[derive(Clone, Copy)]
pub struct Dialect {
    name: &'static str,
    keywords: &'static Map<&'static str, TokenKind>,
}

impl Dialect {
    pub const ENG: Dialect = Dialect {
        name: "eng",
        keywords: &ENG_KEYWORDS,
    };
    pub const TRK: Dialect = Dialect {
        name: "trk",
        keywords: &TRK_KEYWORDS,
    };
    pub const QZQ: Dialect = Dialect {
        name: "qzq",
        keywords: &QZQ_KEYWORDS,
    };

    pub const ALL: [Dialect; 3] = [Dialect::ENG, Dialect::TRK, Dialect::QZQ];

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Registry lookup by pragma name (`eng`, `trk`, `qzq`). Case-sensitive.
    pub fn by_name(name: &str) -> Option<Dialect> {
        Dialect::ALL.into_iter().find(|dialect| dialect.name == name)
    }

    /// Like [`Dialect::by_name`], but an unknown name degrades to the default
    /// dialect with a warning instead of failing.
    pub fn resolve(name: &str) -> Dialect {
        Dialect::by_name(name).unwrap_or_else(|| {
            warn!(
                dialect = name,
                fallback = Dialect::default().name(),
                "unknown dialect, keeping the default keyword table"
            );
            Dialect::default()
        })
    }

    pub fn lookup<'a>(&self, spelling: &'a str) -> KeywordEntry<'a> {
        match self.keywords.get(spelling) {
            Some(&kind) => KeywordEntry {
                kind,
                canonical: kind.keyword_spelling().unwrap_or(spelling),
            },
            None => KeywordEntry {
                kind: TokenKind::Ident,
                canonical: spelling,
            },
        }
    }
}

impl Default for Dialect {
    fn default() -> Self {
        Dialect::ENG
    }
}

impl PartialEq for Dialect {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Dialect {}

impl std::fmt::Debug for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Dialect").field(&self.name()).finish()
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

pub fn lookup<'a>(spelling: &'a str, dialect: &Dialect) -> KeywordEntry<'a> {
    dialect.lookup(spelling)
}
