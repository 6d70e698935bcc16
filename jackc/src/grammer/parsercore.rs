use super::token::{Keyword, Pos, Symbol, Token, TokenKind};
use crate::error::{Error, Loc};

/// One-token lookahead over a fallible token stream.
pub struct Parser<'a, I: Iterator<Item = Result<Token<'a>, Error>>> {
    tokens: I,
    file: &'a str,
    peeked: Option<Token<'a>>,
    last: Option<Loc>,
}

impl<'a, I: Iterator<Item = Result<Token<'a>, Error>>> Parser<'a, I> {
    pub fn new(file: &'a str, tokens: I) -> Self {
        Parser {
            tokens,
            file,
            peeked: None,
            last: None,
        }
    }
}

impl<'a, I: Iterator<Item = Result<Token<'a>, Error>>> Parser<'a, I> {
    /// Peek : Watch next token without consuming it
    pub fn peek(&mut self) -> Result<Option<&Token<'a>>, Error> {
        if self.peeked.is_none() {
            self.peeked = self.tokens.next().transpose()?;
        }
        Ok(self.peeked.as_ref())
    }

    /// Next : Consume next token and return it
    pub fn next(&mut self) -> Result<Option<Token<'a>>, Error> {
        let token = match self.peeked.take() {
            Some(token) => Some(token),
            None => self.tokens.next().transpose()?,
        };
        if let Some(token) = &token {
            self.last = Some(Loc::from(&token.pos));
        }
        Ok(token)
    }

    /// Peek and check next token is match with condition
    pub fn check_if<F: Fn(&TokenKind) -> bool>(&mut self, cond: F) -> Result<bool, Error> {
        Ok(self.peek()?.map_or(false, |token| cond(&token.kind)))
    }

    /// Consume if next token is match with condition
    pub fn consume_if<F: Fn(&TokenKind) -> bool>(
        &mut self,
        cond: F,
    ) -> Result<Option<Token<'a>>, Error> {
        if self.check_if(cond)? {
            self.next()
        } else {
            Ok(None)
        }
    }

    /// Next token must be match with condition
    pub fn expect_tobe<F: Fn(&TokenKind) -> bool>(
        &mut self,
        expected: &str,
        cond: F,
    ) -> Result<Token<'a>, Error> {
        match self.next()? {
            Some(token) if cond(&token.kind) => Ok(token),
            Some(token) => Err(Error::Syntax {
                expected: expected.to_string(),
                found: (&token).into(),
            }),
            None => Err(self.eof(expected)),
        }
    }

    /// Next token must map to a value through `f`
    pub fn expect_with<T, F: Fn(&TokenKind) -> Option<T>>(
        &mut self,
        expected: &str,
        f: F,
    ) -> Result<(T, Pos<'a>), Error> {
        match self.next()? {
            Some(token) => match f(&token.kind) {
                Some(value) => Ok((value, token.pos)),
                None => Err(Error::Syntax {
                    expected: expected.to_string(),
                    found: (&token).into(),
                }),
            },
            None => Err(self.eof(expected)),
        }
    }

    pub fn expect_symbol(&mut self, sym: Symbol) -> Result<Pos<'a>, Error> {
        let expected = format!("`{sym}`");
        let token = self.expect_tobe(&expected, |kind| kind == &TokenKind::Symbol(sym))?;
        Ok(token.pos)
    }

    pub fn expect_keyword(&mut self, kw: Keyword) -> Result<Pos<'a>, Error> {
        let expected = format!("`{kw}`");
        let token = self.expect_tobe(&expected, |kind| kind == &TokenKind::Keyword(kw))?;
        Ok(token.pos)
    }

    pub fn expect_ident(&mut self) -> Result<(String, Pos<'a>), Error> {
        self.expect_with("identifier", |kind| match kind {
            TokenKind::Identifier(name) => Some(name.clone()),
            _ => None,
        })
    }

    /// No token may follow
    pub fn expect_end(&mut self) -> Result<(), Error> {
        match self.next()? {
            Some(token) => Err(Error::Syntax {
                expected: "end of file".to_string(),
                found: (&token).into(),
            }),
            None => Ok(()),
        }
    }

    /// End of input, located at the last consumed token.
    pub fn eof(&self, expected: &str) -> Error {
        Error::UnexpectedEof {
            expected: expected.to_string(),
            file: self.file.to_string(),
            last: self.last.clone(),
        }
    }
}

#[macro_export]
macro_rules! check {
    ($parser:expr, $kind:pat) => {
        $parser.check_if(|kind| matches!(kind, $kind))?
    };
}

#[macro_export]
macro_rules! optional {
    ($parser:expr, $kind:pat) => {
        $parser.consume_if(|kind| matches!(kind, $kind))?
    };
}

#[macro_export]
macro_rules! expect {
    ($parser:expr, $kind:pat, $expected:expr) => {
        $parser.expect_tobe($expected, |kind| matches!(kind, $kind))?
    };
}
