//! Lexer for Cool
//!
//! Converts source code into a stream of tokens. Keywords are case
//! insensitive, except that `true` and `false` must start with a lowercase
//! letter; an uppercase first letter makes them type identifiers. Comments
//! are `--` to end of line and nested `(* ... *)` blocks.

use crate::frontend::token::{Token, TokenKind};
use crate::utils::Span;

/// The lexer state
pub struct Lexer {
    /// Source code as characters
    source: Vec<char>,
    /// Current position in source
    pos: usize,
    /// Start position of current token
    start: usize,
    /// Current 1-based line
    line: u32,
    /// Line on which the current token started
    start_line: u32,
    /// File ID for span tracking
    file_id: usize,
}

impl Lexer {
    /// Create a new lexer for the given source code
    pub fn new(source: &str, file_id: usize) -> Self {
        Self {
            source: source.chars().collect(),
            pos: 0,
            start: 0,
            line: 1,
            start_line: 1,
            file_id,
        }
    }

    /// Get the current character without advancing
    fn peek(&self) -> Option<char> {
        self.source.get(self.pos).copied()
    }

    /// Get the next character without advancing
    fn peek_next(&self) -> Option<char> {
        self.source.get(self.pos + 1).copied()
    }

    /// Advance to the next character, tracking line numbers
    fn advance(&mut self) -> Option<char> {
        let c = self.peek();
        self.pos += 1;
        if c == Some('\n') {
            self.line += 1;
        }
        c
    }

    /// Create a span from start to current position
    fn make_span(&self) -> Span {
        Span::new(self.start, self.pos, self.start_line, self.file_id)
    }

    /// Create a token with the current span
    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.make_span())
    }

    /// Skip whitespace and comments. Returns a token only when a block
    /// comment runs into end of input.
    fn skip_whitespace(&mut self) -> Option<Token> {
        while let Some(c) = self.peek() {
            match c {
                ' ' | '\t' | '\r' | '\n' | '\x0b' | '\x0c' => {
                    self.advance();
                }
                // Line comment
                '-' if self.peek_next() == Some('-') => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                // Nested block comment
                '(' if self.peek_next() == Some('*') => {
                    self.start = self.pos;
                    self.start_line = self.line;
                    self.advance(); // skip (
                    self.advance(); // skip *
                    let mut depth = 1;
                    while depth > 0 {
                        match (self.peek(), self.peek_next()) {
                            (Some('*'), Some(')')) => {
                                self.advance();
                                self.advance();
                                depth -= 1;
                            }
                            (Some('('), Some('*')) => {
                                self.advance();
                                self.advance();
                                depth += 1;
                            }
                            (Some(_), _) => {
                                self.advance();
                            }
                            (None, _) => {
                                return Some(self.make_token(TokenKind::Invalid(
                                    "EOF in comment".to_string(),
                                )));
                            }
                        }
                    }
                }
                _ => break,
            }
        }
        None
    }

    /// Read an identifier or keyword
    fn read_identifier(&mut self) -> Token {
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                self.advance();
            } else {
                break;
            }
        }

        let text: String = self.source[self.start..self.pos].iter().collect();

        // true/false keep keyword status only with a lowercase first letter
        if text.starts_with('t') && text[1..].eq_ignore_ascii_case("rue") {
            return self.make_token(TokenKind::True);
        }
        if text.starts_with('f') && text[1..].eq_ignore_ascii_case("alse") {
            return self.make_token(TokenKind::False);
        }

        let kind = TokenKind::keyword_from_str(&text).unwrap_or_else(|| {
            if text.chars().next().map(|c| c.is_ascii_uppercase()).unwrap_or(false) {
                TokenKind::TypeId(text)
            } else {
                TokenKind::ObjectId(text)
            }
        });

        self.make_token(kind)
    }

    /// Read an integer constant
    fn read_number(&mut self) -> Token {
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.advance();
            } else {
                break;
            }
        }

        let text: String = self.source[self.start..self.pos].iter().collect();
        self.make_token(TokenKind::IntConst(text))
    }

    /// Read a string constant
    fn read_string(&mut self) -> Token {
        self.advance(); // consume opening quote

        let mut value = String::new();

        loop {
            match self.peek() {
                Some('"') => {
                    self.advance();
                    return self.make_token(TokenKind::StrConst(value));
                }
                Some('\n') => {
                    // An unescaped newline ends the constant; resume after it
                    self.advance();
                    return self.make_token(TokenKind::Invalid(
                        "Unterminated string constant".to_string(),
                    ));
                }
                Some('\\') => {
                    self.advance();
                    match self.peek() {
                        Some('n') => { value.push('\n'); self.advance(); }
                        Some('t') => { value.push('\t'); self.advance(); }
                        Some('b') => { value.push('\x08'); self.advance(); }
                        Some('f') => { value.push('\x0c'); self.advance(); }
                        // An escaped newline continues the string
                        Some(c) => { value.push(c); self.advance(); }
                        None => {
                            return self.make_token(TokenKind::Invalid(
                                "EOF in string constant".to_string(),
                            ));
                        }
                    }
                }
                Some(c) => {
                    value.push(c);
                    self.advance();
                }
                None => {
                    return self.make_token(TokenKind::Invalid(
                        "EOF in string constant".to_string(),
                    ));
                }
            }
        }
    }

    /// Produce the next token
    pub fn next_token(&mut self) -> Token {
        if let Some(bad) = self.skip_whitespace() {
            return bad;
        }

        self.start = self.pos;
        self.start_line = self.line;

        let c = match self.peek() {
            Some(c) => c,
            None => return Token::eof(self.make_span()),
        };

        match c {
            '0'..='9' => self.read_number(),
            '"' => self.read_string(),
            c if c.is_ascii_alphabetic() => self.read_identifier(),
            '+' => { self.advance(); self.make_token(TokenKind::Plus) }
            '-' => { self.advance(); self.make_token(TokenKind::Minus) }
            '*' => {
                if self.peek_next() == Some(')') {
                    self.advance();
                    self.advance();
                    self.make_token(TokenKind::Invalid("Unmatched *)".to_string()))
                } else {
                    self.advance();
                    self.make_token(TokenKind::Star)
                }
            }
            '/' => { self.advance(); self.make_token(TokenKind::Slash) }
            '~' => { self.advance(); self.make_token(TokenKind::Tilde) }
            '<' => {
                self.advance();
                match self.peek() {
                    Some('-') => { self.advance(); self.make_token(TokenKind::Assign) }
                    Some('=') => { self.advance(); self.make_token(TokenKind::Le) }
                    _ => self.make_token(TokenKind::Lt),
                }
            }
            '=' => {
                self.advance();
                if self.peek() == Some('>') {
                    self.advance();
                    self.make_token(TokenKind::DArrow)
                } else {
                    self.make_token(TokenKind::Eq)
                }
            }
            '@' => { self.advance(); self.make_token(TokenKind::At) }
            '.' => { self.advance(); self.make_token(TokenKind::Dot) }
            '(' => { self.advance(); self.make_token(TokenKind::LParen) }
            ')' => { self.advance(); self.make_token(TokenKind::RParen) }
            '{' => { self.advance(); self.make_token(TokenKind::LBrace) }
            '}' => { self.advance(); self.make_token(TokenKind::RBrace) }
            ';' => { self.advance(); self.make_token(TokenKind::Semicolon) }
            ':' => { self.advance(); self.make_token(TokenKind::Colon) }
            ',' => { self.advance(); self.make_token(TokenKind::Comma) }
            c => { self.advance(); self.make_token(TokenKind::Unknown(c)) }
        }
    }

    /// Tokenize the whole input, ending with an Eof token
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }
        tokens
    }
}
