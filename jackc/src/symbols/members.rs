use crate::grammer::lexer::tokenize;
use crate::grammer::token::{Keyword, Symbol, TokenKind};
use indexmap::IndexMap;
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum SubKind {
    Constructor,
    Function,
    Method,
}

impl SubKind {
    pub fn from_keyword(kw: Keyword) -> Option<Self> {
        match kw {
            Keyword::Constructor => Some(SubKind::Constructor),
            Keyword::Function => Some(SubKind::Function),
            Keyword::Method => Some(SubKind::Method),
            _ => None,
        }
    }
}

/// Subroutines declared by a class, in declaration order.
#[derive(Debug, Default, Clone)]
pub struct ClassMembers(pub IndexMap<String, SubKind>);

impl ClassMembers {
    /// Collect `subroutineKind returnType name` triples found directly inside
    /// the class body. Stops silently at the first lexical error; the
    /// compilation pass reports it.
    pub fn scan(file: &str, source: &str) -> Self {
        let mut members = IndexMap::new();
        let mut depth = 0usize;
        let mut pending: Option<SubKind> = None;
        let mut after_type = false;

        for token in tokenize(file, source) {
            let Ok(token) = token else {
                break;
            };
            match token.kind {
                TokenKind::Symbol(Symbol::LCurly) => depth += 1,
                TokenKind::Symbol(Symbol::RCurly) => depth = depth.saturating_sub(1),
                TokenKind::Keyword(kw) if depth == 1 && SubKind::from_keyword(kw).is_some() => {
                    pending = SubKind::from_keyword(kw);
                    after_type = false;
                    continue;
                }
                TokenKind::Identifier(ref name) if pending.is_some() && after_type => {
                    if let Some(kind) = pending.take() {
                        members.entry(name.clone()).or_insert(kind);
                    }
                    continue;
                }
                _ => {}
            }
            // the return type is a single token
            if pending.is_some() {
                if after_type {
                    pending = None;
                }
                after_type = true;
            }
        }
        ClassMembers(members)
    }

    pub fn kind_of(&self, name: &str) -> Option<SubKind> {
        self.0.get(name).copied()
    }
}
