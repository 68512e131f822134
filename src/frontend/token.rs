//! Token definitions for Cool

use crate::utils::Span;

/// A token produced by the lexer
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn eof(span: Span) -> Self {
        Self { kind: TokenKind::Eof, span }
    }
}

/// Token kinds
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ============ Keywords ============
    /// class
    Class,
    /// inherits
    Inherits,
    /// if
    If,
    /// then
    Then,
    /// else
    Else,
    /// fi
    Fi,
    /// while
    While,
    /// loop
    Loop,
    /// pool
    Pool,
    /// let
    Let,
    /// in
    In,
    /// case
    Case,
    /// of
    Of,
    /// esac
    Esac,
    /// new
    New,
    /// isvoid
    Isvoid,
    /// not
    Not,
    /// true
    True,
    /// false
    False,

    // ============ Identifiers and Literals ============
    /// Type identifier (first letter uppercase)
    TypeId(String),
    /// Object identifier (first letter lowercase)
    ObjectId(String),
    /// Integer constant, kept as source text
    IntConst(String),
    /// String constant with escapes already processed
    StrConst(String),

    // ============ Operators ============
    /// +
    Plus,
    /// -
    Minus,
    /// *
    Star,
    /// /
    Slash,
    /// ~
    Tilde,
    /// <
    Lt,
    /// <=
    Le,
    /// =
    Eq,
    /// <-
    Assign,
    /// =>
    DArrow,
    /// @
    At,
    /// .
    Dot,

    // ============ Delimiters ============
    /// (
    LParen,
    /// )
    RParen,
    /// {
    LBrace,
    /// }
    RBrace,
    /// ;
    Semicolon,
    /// :
    Colon,
    /// ,
    Comma,

    // ============ Special ============
    /// End of file
    Eof,
    /// Stray character the lexer could not place
    Unknown(char),
    /// Malformed token with the lexer's complaint
    Invalid(String),
}

impl TokenKind {
    /// Try to convert an identifier to a keyword. Cool keywords are case
    /// insensitive; `true`/`false` are handled by the lexer because their
    /// first letter must be lowercase.
    pub fn keyword_from_str(text: &str) -> Option<TokenKind> {
        match text.to_ascii_lowercase().as_str() {
            "class" => Some(TokenKind::Class),
            "inherits" => Some(TokenKind::Inherits),
            "if" => Some(TokenKind::If),
            "then" => Some(TokenKind::Then),
            "else" => Some(TokenKind::Else),
            "fi" => Some(TokenKind::Fi),
            "while" => Some(TokenKind::While),
            "loop" => Some(TokenKind::Loop),
            "pool" => Some(TokenKind::Pool),
            "let" => Some(TokenKind::Let),
            "in" => Some(TokenKind::In),
            "case" => Some(TokenKind::Case),
            "of" => Some(TokenKind::Of),
            "esac" => Some(TokenKind::Esac),
            "new" => Some(TokenKind::New),
            "isvoid" => Some(TokenKind::Isvoid),
            "not" => Some(TokenKind::Not),
            _ => None,
        }
    }
}
