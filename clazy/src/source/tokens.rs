//! Token boundaries of the main file.
//!
//! This is not a C++ lexer in the compiler sense: there is no preprocessing and
//! no keyword table. It only recovers where tokens start and end, and what
//! broad kind they are, which is everything the range utilities ask of the frontend.

use logos::Logos;
use serde::Serialize;

/// Logos-based token enum used while scanning.
///
/// Converted to the public [`TokenKind`] after lexing so the skip rules stay private.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
enum LogosToken {
    #[regex(r"/\*", lex_block_comment)]
    BlockComment,

    // Preprocessor directives are not part of the parsed tree
    #[regex(r"#[^\n]*", logos::skip)]
    Directive,

    #[regex(r#"(u8|u|U|L)?"([^"\\\n]|\\.)*""#)]
    String,

    #[regex(r#"(u8|u|U|L)?R""#, lex_raw_string)]
    RawString,

    #[regex(r"(u8|u|U|L)?'([^'\\\n]|\\.)*'")]
    Char,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Identifier,

    #[regex(r"[0-9][0-9A-Za-z_'.]*")]
    Number,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LSquare,
    #[token("]")]
    RSquare,
    #[token("::")]
    ColonColon,
    #[token(":")]
    Colon,
    #[token(";")]
    Semi,
    #[token(",")]
    Comma,
    #[token(".")]
    Period,
    #[token("->")]
    Arrow,
    #[token("<")]
    Less,
    #[token(">")]
    Greater,
    #[token("=")]
    Equal,
    #[token("!")]
    Exclaim,
    #[token("&")]
    Amp,
    #[token("*")]
    Star,

    #[regex(r"[-+/%^|~?]|==|!=|<=|>=|&&|\|\||\+\+|--|\+=|-=|\*=|/=|%=|<<|>>|\.\.\.|&=|\|=|\^=")]
    Punct,
}

fn lex_block_comment(lex: &mut logos::Lexer<LogosToken>) -> logos::Skip {
    // "/*" is consumed, find the terminator
    let remainder = lex.remainder();
    match remainder.find("*/") {
        Some(end) => lex.bump(end + 2),
        None => lex.bump(remainder.len()),
    }
    logos::Skip
}

fn lex_raw_string(lex: &mut logos::Lexer<LogosToken>) -> bool {
    // Prefix and opening quote are consumed: R"delim( ... )delim"
    let remainder = lex.remainder();
    let Some(open) = remainder.find('(') else {
        return false;
    };
    let closing = format!("){}\"", &remainder[..open]);
    match remainder[open..].find(&closing) {
        Some(pos) => {
            lex.bump(open + pos + closing.len());
            true
        }
        None => false,
    }
}

/// Broad classification of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    /// Identifier or keyword.
    Identifier,
    /// String literal, raw or not, with any encoding prefix.
    StringLiteral,
    /// Character literal.
    CharLiteral,
    /// Numeric literal.
    NumericLiteral,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `[`
    LSquare,
    /// `]`
    RSquare,
    /// `::`
    ColonColon,
    /// `:`
    Colon,
    /// `;`
    Semi,
    /// `,`
    Comma,
    /// `.`
    Period,
    /// `->`
    Arrow,
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `=`
    Equal,
    /// `!`
    Exclaim,
    /// `&`
    Amp,
    /// `*`
    Star,
    /// Any other operator or punctuator.
    Punct,
    /// Bytes the scanner could not classify (stray `@`, unterminated literals, ...).
    Unknown,
}

impl From<LogosToken> for TokenKind {
    fn from(token: LogosToken) -> Self {
        match token {
            LogosToken::String | LogosToken::RawString => Self::StringLiteral,
            LogosToken::Char => Self::CharLiteral,
            LogosToken::Identifier => Self::Identifier,
            LogosToken::Number => Self::NumericLiteral,
            LogosToken::LParen => Self::LParen,
            LogosToken::RParen => Self::RParen,
            LogosToken::LBrace => Self::LBrace,
            LogosToken::RBrace => Self::RBrace,
            LogosToken::LSquare => Self::LSquare,
            LogosToken::RSquare => Self::RSquare,
            LogosToken::ColonColon => Self::ColonColon,
            LogosToken::Colon => Self::Colon,
            LogosToken::Semi => Self::Semi,
            LogosToken::Comma => Self::Comma,
            LogosToken::Period => Self::Period,
            LogosToken::Arrow => Self::Arrow,
            LogosToken::Less => Self::Less,
            LogosToken::Greater => Self::Greater,
            LogosToken::Equal => Self::Equal,
            LogosToken::Exclaim => Self::Exclaim,
            LogosToken::Amp => Self::Amp,
            LogosToken::Star => Self::Star,
            LogosToken::Punct => Self::Punct,
            LogosToken::BlockComment | LogosToken::Directive => Self::Unknown,
        }
    }
}

/// One token: its kind and byte extent `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token {
    /// Token classification.
    pub kind: TokenKind,
    /// Offset of the first byte.
    pub start: u32,
    /// Offset one past the last byte.
    pub end: u32,
}

/// The main file's tokens, in file order, without whitespace or comments.
#[derive(Debug, Clone, Default)]
pub struct TokenBuffer {
    tokens: Vec<Token>,
}

impl TokenBuffer {
    /// Scans `text` into tokens.
    ///
    /// Bytes the scanner rejects become [`TokenKind::Unknown`] tokens instead of
    /// aborting, so a stray character never hides the tokens after it.
    #[must_use]
    pub fn lex(text: &str) -> Self {
        let mut tokens = Vec::new();
        let mut lexer = LogosToken::lexer(text);
        while let Some(result) = lexer.next() {
            let span = lexer.span();
            let (Ok(start), Ok(end)) = (u32::try_from(span.start), u32::try_from(span.end)) else {
                // Beyond what a location can address
                break;
            };
            let kind = result.map_or(TokenKind::Unknown, TokenKind::from);
            tokens.push(Token { kind, start, end });
        }
        Self { tokens }
    }

    /// All tokens.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Number of tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns `true` if the file has no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Token at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    /// Index of the token whose extent contains `offset`.
    #[must_use]
    pub fn index_containing(&self, offset: u32) -> Option<usize> {
        let index = self.tokens.partition_point(|t| t.end <= offset);
        self.tokens
            .get(index)
            .filter(|t| t.start <= offset)
            .map(|_| index)
    }

    /// Index of the first token starting at or after `offset` (may equal `len()`).
    #[must_use]
    pub fn index_at_or_after(&self, offset: u32) -> usize {
        self.tokens.partition_point(|t| t.start < offset)
    }
}
