use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Largest value an integer constant may hold.
pub const MAX_INT: u16 = 32767;

#[derive(Debug, Clone)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub pos: Pos<'a>,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, pos: Pos<'a>) -> Self {
        Token { kind, pos }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Keyword(Keyword),
    Symbol(Symbol),
    Identifier(String),
    IntegerConstant(u16),
    StringConstant(String),
}

impl TokenKind {
    /// Raw lexeme as written in the source (string constants without quotes).
    pub fn lexeme(&self) -> String {
        match self {
            TokenKind::Keyword(kw) => kw.to_string(),
            TokenKind::Symbol(sym) => sym.to_string(),
            TokenKind::Identifier(name) => name.clone(),
            TokenKind::IntegerConstant(n) => n.to_string(),
            TokenKind::StringConstant(s) => s.clone(),
        }
    }

    /// Rendering used in the XML token listing.
    pub fn escaped(&self) -> String {
        match self {
            TokenKind::Symbol(sym) => sym.escaped().to_string(),
            other => other.lexeme(),
        }
    }

    /// Element name used in the XML token listing.
    pub fn tag(&self) -> &'static str {
        match self {
            TokenKind::Keyword(_) => "keyword",
            TokenKind::Symbol(_) => "symbol",
            TokenKind::Identifier(_) => "identifier",
            TokenKind::IntegerConstant(_) => "integerConstant",
            TokenKind::StringConstant(_) => "stringConstant",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum Keyword {
    Class,
    Constructor,
    Function,
    Method,
    Field,
    Static,
    Var,
    Int,
    Char,
    Boolean,
    Void,
    True,
    False,
    Null,
    This,
    Let,
    Do,
    If,
    Else,
    While,
    Return,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, IntoStaticStr)]
pub enum Symbol {
    #[strum(serialize = "{")]
    LCurly,
    #[strum(serialize = "}")]
    RCurly,
    #[strum(serialize = "(")]
    LParen,
    #[strum(serialize = ")")]
    RParen,
    #[strum(serialize = "[")]
    LBracket,
    #[strum(serialize = "]")]
    RBracket,
    #[strum(serialize = ".")]
    Period,
    #[strum(serialize = ",")]
    Comma,
    #[strum(serialize = ";")]
    Semicolon,
    #[strum(serialize = "+")]
    Plus,
    #[strum(serialize = "-")]
    Minus,
    #[strum(serialize = "*")]
    Star,
    #[strum(serialize = "/")]
    Slash,
    #[strum(serialize = "&")]
    Ampasand,
    #[strum(serialize = "|")]
    Pipe,
    #[strum(serialize = "<")]
    LAngle,
    #[strum(serialize = ">")]
    RAngle,
    #[strum(serialize = "=")]
    Equal,
    #[strum(serialize = "~")]
    Tilde,
}

// strum's `Display` derive takes `{` and `}` as format braces
impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Symbol {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    /// XML-safe rendering. Differs from the lexeme only for `<`, `>` and `&`.
    pub fn escaped(&self) -> &'static str {
        match self {
            Symbol::LAngle => "&lt;",
            Symbol::RAngle => "&gt;",
            Symbol::Ampasand => "&amp;",
            sym => sym.as_str(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pos<'a> {
    pub file: &'a str,
    pub row: usize,
    pub col: usize,
}

static STR_TO_TOKEN: Lazy<HashMap<&'static str, TokenKind>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for kw in Keyword::iter() {
        map.insert(kw.into(), TokenKind::Keyword(kw));
    }
    for sym in Symbol::iter() {
        map.insert(sym.into(), TokenKind::Symbol(sym));
    }
    map
});

/// Keyword or symbol spelled exactly `s`.
pub fn lookup(s: &str) -> Option<TokenKind> {
    STR_TO_TOKEN.get(s).cloned()
}

pub fn is_ident_head(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

pub fn is_ident_tail(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().map_or(false, is_ident_head) && chars.all(is_ident_tail)
}

/// `[0-9]+`
pub fn is_integer(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|ch| ch.is_ascii_digit())
}

/// `"..."` on a single line.
pub fn is_string_constant(s: &str) -> bool {
    s.len() >= 2
        && s.starts_with('"')
        && s.ends_with('"')
        && !s[1..s.len() - 1].contains(|ch: char| ch == '"' || ch == '\n')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_total_over_keywords_and_symbols() {
        assert_eq!(Keyword::iter().count() + Symbol::iter().count(), STR_TO_TOKEN.len());
        assert_eq!(lookup("while"), Some(TokenKind::Keyword(Keyword::While)));
        assert_eq!(lookup("~"), Some(TokenKind::Symbol(Symbol::Tilde)));
        assert_eq!(lookup("While"), None);
        assert_eq!(lookup("//"), None);
    }

    #[test]
    fn symbols_display_as_written() {
        assert_eq!(Symbol::LCurly.to_string(), "{");
        assert_eq!(format!("`{}`", Symbol::RCurly), "`}`");
        for sym in Symbol::iter() {
            assert_eq!(sym.to_string().parse::<Symbol>(), Ok(sym));
        }
    }

    #[test]
    fn shapes() {
        assert!(is_identifier("_tmp1"));
        assert!(!is_identifier("1tmp"));
        assert!(!is_identifier(""));
        assert!(is_integer("0042"));
        assert!(!is_integer("4a"));
        assert!(is_string_constant("\"hello world\""));
        assert!(is_string_constant("\"\""));
        assert!(!is_string_constant("\"a\nb\""));
        assert!(!is_string_constant("\""));
    }
}
