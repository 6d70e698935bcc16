use crate::grammer::token::{Pos, Token, TokenKind};
use color_print::cformat;
use std::fmt;
use thiserror::Error;

/// Owned source location, 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loc {
    pub file: String,
    pub row: usize,
    pub col: usize,
}

impl fmt::Display for Loc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.row, self.col)
    }
}

impl<'a> From<&Pos<'a>> for Loc {
    fn from(pos: &Pos<'a>) -> Self {
        Loc {
            file: pos.file.to_string(),
            row: pos.row,
            col: pos.col,
        }
    }
}

// Token information without lifetime
#[derive(Debug, Clone, PartialEq)]
pub struct TokenInfo {
    pub kind: TokenKind,
    pub loc: Loc,
}

impl fmt::Display for TokenInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` at {}", self.kind.lexeme(), self.loc)
    }
}

impl<'a> From<&Token<'a>> for TokenInfo {
    fn from(token: &Token<'a>) -> Self {
        TokenInfo {
            kind: token.kind.clone(),
            loc: Loc::from(&token.pos),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unexpected character `{0}`")]
    UnexpectedCharacter(char),

    #[error("unterminated block comment")]
    UnterminatedComment,

    #[error("unterminated string constant")]
    UnterminatedString,

    #[error("integer constant `{0}` is out of range 0..=32767")]
    IntegerOutOfRange(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("{0} at {1}")]
    Lexical(LexError, Loc),

    #[error("expected {expected}, found {found}")]
    Syntax { expected: String, found: TokenInfo },

    #[error("expected {expected}, found end of file in {file}{}", fmt_after(.last))]
    UnexpectedEof {
        expected: String,
        file: String,
        last: Option<Loc>,
    },

    #[error("undeclared identifier `{0}`{}", fmt_at(.1))]
    UndeclaredIdentifier(String, Option<Loc>),

    #[error("duplicate symbol `{0}`{}", fmt_at(.1))]
    DuplicateSymbol(String, Option<Loc>),

    #[error("type mismatch at {1}: {0}")]
    TypeMismatch(String, Loc),
}

fn fmt_at(loc: &Option<Loc>) -> String {
    match loc {
        Some(loc) => format!(" at {loc}"),
        None => String::new(),
    }
}

fn fmt_after(loc: &Option<Loc>) -> String {
    match loc {
        Some(loc) => format!(" after {loc}"),
        None => String::new(),
    }
}

impl Error {
    /// Attach a location to an error raised where none was known.
    pub fn at(self, loc: Loc) -> Self {
        match self {
            Error::UndeclaredIdentifier(name, None) => Error::UndeclaredIdentifier(name, Some(loc)),
            Error::DuplicateSymbol(name, None) => Error::DuplicateSymbol(name, Some(loc)),
            err => err,
        }
    }

    pub fn loc(&self) -> Option<&Loc> {
        match self {
            Error::Lexical(_, loc) | Error::TypeMismatch(_, loc) => Some(loc),
            Error::Syntax { found, .. } => Some(&found.loc),
            Error::UndeclaredIdentifier(_, loc) | Error::DuplicateSymbol(_, loc) => loc.as_ref(),
            Error::UnexpectedEof { last, .. } => last.as_ref(),
        }
    }

    /// Print error with diagnostic information showing file location and line content
    pub fn print_diag(&self, source: &str) {
        eprintln!("{}", cformat!("<red,bold>error</>: {}", self));
        let Some(loc) = self.loc() else {
            return;
        };
        let line = source.lines().nth(loc.row.saturating_sub(1)).unwrap_or("");
        eprintln!("{}", cformat!("     <blue>--></> <underline>{}</>", loc));
        eprintln!("{}", cformat!("      <blue>|</>"));
        eprintln!("{}", cformat!(" <blue>{:>4} |</> {}", loc.row, line));
        let pad = " ".repeat(loc.col.saturating_sub(1));
        eprintln!("{}", cformat!("      <blue>|</> {}<red,bold>^</>", pad));
    }
}
