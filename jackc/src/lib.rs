mod compile;
mod error;
mod grammer;
mod symbols;
mod util;

pub use compile::{compile, Code, Compiler, Labels};
pub use error::{Error, LexError, Loc, TokenInfo};
pub use grammer::lexer::{tokenize, Lexer};
pub use grammer::parsercore::Parser;
pub use grammer::token::{
    is_identifier, is_integer, is_string_constant, lookup, Keyword, Pos, Symbol, Token, TokenKind,
    MAX_INT,
};
pub use symbols::{ClassMembers, Dispatch, Entry, Kind, SubKind, SymbolTable};
pub use util::display::tokens_xml;
