use super::token::{
    is_ident_tail, is_identifier, is_integer, is_string_constant, lookup, Pos, Token, TokenKind,
    MAX_INT,
};
use crate::error::{Error, LexError, Loc};
use std::str::Chars;

/// Lazily tokenize `code`. Yields tokens until the end of input or the first
/// lexical error, after which the iterator is exhausted.
pub fn tokenize<'a>(file: &'a str, code: &'a str) -> Lexer<'a> {
    Lexer::new(file, code)
}

pub struct Lexer<'a> {
    iter: Chars<'a>,
    file: &'a str,
    row: usize,
    col: usize,
    done: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(file: &'a str, code: &'a str) -> Self {
        Self {
            iter: code.chars(),
            file,
            row: 1,
            col: 1,
            done: false,
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token<'a>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.scan() {
            Ok(Some(token)) => Some(Ok(token)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

// ----------------------------------------------------------------------------
// Helpers
// ----------------------------------------------------------------------------

impl<'a> Lexer<'a> {
    fn peek_nth(&self, n: usize) -> Option<char> {
        self.iter.clone().nth(n)
    }

    fn consume(&mut self) -> Option<char> {
        let ch = self.iter.next()?;
        if ch == '\n' {
            self.row += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn consume_while(&mut self, cond: impl Fn(char) -> bool) -> String {
        let mut lexeme = String::new();
        while let Some(ch) = self.peek_nth(0).filter(|&ch| cond(ch)) {
            lexeme.push(ch);
            self.consume();
        }
        lexeme
    }

    fn pos(&self) -> Pos<'a> {
        Pos {
            file: self.file,
            row: self.row,
            col: self.col,
        }
    }

    fn error(&self, err: LexError, pos: &Pos<'a>) -> Error {
        Error::Lexical(err, Loc::from(pos))
    }
}

// ----------------------------------------------------------------------------
// Scanner
// ----------------------------------------------------------------------------

impl<'a> Lexer<'a> {
    fn scan(&mut self) -> Result<Option<Token<'a>>, Error> {
        while let Some(ch0) = self.peek_nth(0) {
            // 0. Skip whitespaces
            if ch0.is_whitespace() {
                self.consume();
                continue;
            }

            let pos = self.pos();

            // 1. Comments, only when `/` is directly followed by `/` or `*`
            if ch0 == '/' {
                match self.peek_nth(1) {
                    Some('/') => {
                        self.consume_while(|ch| ch != '\n');
                        continue;
                    }
                    Some('*') => {
                        self.skip_block_comment(&pos)?;
                        continue;
                    }
                    _ => {}
                }
            }

            // 2. Symbol
            if let Some(kind) = symbol(ch0) {
                self.consume();
                return Ok(Some(Token::new(kind, pos)));
            }

            // 3. String constant
            if ch0 == '"' {
                let kind = self.string(&pos)?;
                return Ok(Some(Token::new(kind, pos)));
            }

            // 4. Integer constant, identifier or keyword
            if is_ident_tail(ch0) {
                let kind = self.word(ch0, &pos)?;
                return Ok(Some(Token::new(kind, pos)));
            }

            return Err(self.error(LexError::UnexpectedCharacter(ch0), &pos));
        }
        Ok(None)
    }

    fn skip_block_comment(&mut self, start: &Pos<'a>) -> Result<(), Error> {
        self.consume(); // consume '/'
        self.consume(); // consume '*'
        let mut prev = '\0';
        while let Some(ch) = self.consume() {
            if prev == '*' && ch == '/' {
                return Ok(());
            }
            prev = ch;
        }
        Err(self.error(LexError::UnterminatedComment, start))
    }

    fn integer(&self, lexeme: String, start: &Pos<'a>) -> Result<TokenKind, Error> {
        match lexeme.parse::<u32>() {
            Ok(n) if n <= MAX_INT as u32 => Ok(TokenKind::IntegerConstant(n as u16)),
            _ => Err(self.error(LexError::IntegerOutOfRange(lexeme), start)),
        }
    }

    /// Quoted span up to the closing quote, on one line.
    fn string(&mut self, start: &Pos<'a>) -> Result<TokenKind, Error> {
        let mut quoted = String::new();
        quoted.extend(self.consume()); // opening '"'
        while let Some(ch) = self.peek_nth(0).filter(|&ch| ch != '\n' && ch != '\r') {
            if !ch.is_ascii() {
                return Err(self.error(LexError::UnexpectedCharacter(ch), &self.pos()));
            }
            self.consume();
            quoted.push(ch);
            if ch == '"' {
                break;
            }
        }
        if !is_string_constant(&quoted) {
            return Err(self.error(LexError::UnterminatedString, start));
        }
        Ok(TokenKind::StringConstant(quoted[1..quoted.len() - 1].to_string()))
    }

    /// Maximal digit span or maximal identifier span, classified by shape.
    fn word(&mut self, head: char, start: &Pos<'a>) -> Result<TokenKind, Error> {
        let lexeme = if head.is_ascii_digit() {
            self.consume_while(|ch| ch.is_ascii_digit())
        } else {
            self.consume_while(is_ident_tail)
        };
        if is_integer(&lexeme) {
            self.integer(lexeme, start)
        } else if is_identifier(&lexeme) {
            Ok(match lookup(&lexeme) {
                Some(kind @ TokenKind::Keyword(_)) => kind,
                _ => TokenKind::Identifier(lexeme),
            })
        } else {
            Err(self.error(LexError::UnexpectedCharacter(head), start))
        }
    }
}

fn symbol(ch: char) -> Option<TokenKind> {
    let mut buf = [0u8; 4];
    match lookup(ch.encode_utf8(&mut buf)) {
        Some(kind @ TokenKind::Symbol(_)) => Some(kind),
        _ => None,
    }
}
