use super::Labels;
use crate::error::{Error, Loc};
use crate::grammer::lexer::Lexer;
use crate::grammer::parsercore::Parser;
use crate::grammer::token::{Keyword, Pos, Symbol, Token, TokenKind};
use crate::symbols::{ClassMembers, Kind, SubKind, SymbolTable};
use crate::{check, expect, optional};
use arch::command::Command;
use arch::inst::Inst;
use arch::segment::Segment;
use indexmap::IndexSet;

/// What the subroutine being compiled is.
#[derive(Debug, Clone, Copy)]
pub(super) struct Frame {
    pub kind: SubKind,
    pub void: bool,
    /// Local slot one past the declared locals.
    pub scratch: u16,
}

/// Recursive-descent parser that emits VM code while it recognizes a class.
pub struct CompilationEngine<'a, 'l> {
    pub(super) parser: Parser<'a, Lexer<'a>>,
    pub(super) labels: &'l mut Labels,
    pub(super) table: SymbolTable,
    pub(super) members: ClassMembers,
    pub(super) class_name: String,
    pub(super) frame: Frame,
    declared: IndexSet<String>,
    code: Vec<Inst>,
}

impl<'a, 'l> CompilationEngine<'a, 'l> {
    pub fn new(
        file: &'a str,
        tokens: Lexer<'a>,
        labels: &'l mut Labels,
        members: ClassMembers,
    ) -> Self {
        Self {
            parser: Parser::new(file, tokens),
            labels,
            table: SymbolTable::new(),
            members,
            class_name: String::new(),
            frame: Frame {
                kind: SubKind::Function,
                void: true,
                scratch: 0,
            },
            declared: IndexSet::new(),
            code: Vec::new(),
        }
    }

    pub(super) fn emit(&mut self, inst: Inst) {
        self.code.push(inst);
    }

    pub(super) fn push(&mut self, seg: Segment, idx: u16) {
        self.emit(Inst::Push(seg, idx));
    }

    pub(super) fn pop(&mut self, seg: Segment, idx: u16) {
        self.emit(Inst::Pop(seg, idx));
    }

    pub(super) fn arith(&mut self, cmd: Command) {
        self.emit(Inst::Arith(cmd));
    }

    pub(super) fn peek_keyword(&mut self) -> Result<Option<Keyword>, Error> {
        Ok(match self.parser.peek()? {
            Some(Token {
                kind: TokenKind::Keyword(kw),
                ..
            }) => Some(*kw),
            _ => None,
        })
    }

    /// `this` and fields need an object, which a function does not have.
    pub(super) fn check_instance(&self, what: &str, pos: &Pos<'a>) -> Result<(), Error> {
        match self.frame.kind {
            SubKind::Function => Err(Error::TypeMismatch(
                format!("{what} used inside function"),
                Loc::from(pos),
            )),
            _ => Ok(()),
        }
    }

    fn define(&mut self, name: &str, ty: &str, kind: Kind, pos: &Pos<'a>) -> Result<(), Error> {
        self.table
            .define(name, ty, kind)
            .map(|_| ())
            .map_err(|err| err.at(Loc::from(pos)))
    }
}

impl<'a, 'l> CompilationEngine<'a, 'l> {
    /// class = "class" className "{" { classVarDec } { subroutineDec } "}"
    pub fn compile_class(mut self) -> Result<super::Code, Error> {
        self.parser.expect_keyword(Keyword::Class)?;
        let (name, _) = self.parser.expect_ident()?;
        self.table.start_class_scope(&name);
        self.class_name = name;
        self.parser.expect_symbol(Symbol::LCurly)?;

        while check!(
            self.parser,
            TokenKind::Keyword(Keyword::Static | Keyword::Field)
        ) {
            self.compile_class_var_dec()?;
        }
        while check!(
            self.parser,
            TokenKind::Keyword(Keyword::Constructor | Keyword::Function | Keyword::Method)
        ) {
            self.compile_subroutine()?;
        }

        self.parser.expect_symbol(Symbol::RCurly)?;
        self.parser.expect_end()?;
        Ok(super::Code(self.code))
    }

    /// classVarDec = ( "static" | "field" ) type varName { "," varName } ";"
    fn compile_class_var_dec(&mut self) -> Result<(), Error> {
        let token = expect!(
            self.parser,
            TokenKind::Keyword(Keyword::Static | Keyword::Field),
            "`static` or `field`"
        );
        let kind = match token.kind {
            TokenKind::Keyword(Keyword::Static) => Kind::Static,
            _ => Kind::Field,
        };
        let ty = self.compile_type()?;
        loop {
            let (name, pos) = self.parser.expect_ident()?;
            self.define(&name, &ty, kind, &pos)?;
            if optional!(self.parser, TokenKind::Symbol(Symbol::Comma)).is_none() {
                break;
            }
        }
        self.parser.expect_symbol(Symbol::Semicolon)?;
        Ok(())
    }

    /// type = "int" | "char" | "boolean" | className
    fn compile_type(&mut self) -> Result<String, Error> {
        let token = expect!(
            self.parser,
            TokenKind::Keyword(Keyword::Int | Keyword::Char | Keyword::Boolean)
                | TokenKind::Identifier(_),
            "type"
        );
        Ok(token.kind.lexeme())
    }

    /// subroutineDec = ( "constructor" | "function" | "method" ) ( "void" | type )
    ///                 subroutineName "(" parameterList ")" subroutineBody
    fn compile_subroutine(&mut self) -> Result<(), Error> {
        let (kind, _) = self
            .parser
            .expect_with("subroutine declaration", |kind| match kind {
                TokenKind::Keyword(kw) => SubKind::from_keyword(*kw),
                _ => None,
            })?;

        let void = optional!(self.parser, TokenKind::Keyword(Keyword::Void)).is_some();
        if !void {
            self.compile_type()?;
        }

        let (name, pos) = self.parser.expect_ident()?;
        if !self.declared.insert(name.clone()) {
            return Err(Error::DuplicateSymbol(name, Some(Loc::from(&pos))));
        }

        self.table.start_subroutine_scope(kind == SubKind::Method)?;
        self.frame = Frame {
            kind,
            void,
            scratch: 0,
        };

        self.parser.expect_symbol(Symbol::LParen)?;
        self.compile_parameter_list()?;
        self.parser.expect_symbol(Symbol::RParen)?;
        self.compile_subroutine_body(&name)
    }

    /// parameterList = [ type varName { "," type varName } ]
    fn compile_parameter_list(&mut self) -> Result<(), Error> {
        if !check!(
            self.parser,
            TokenKind::Keyword(Keyword::Int | Keyword::Char | Keyword::Boolean)
                | TokenKind::Identifier(_)
        ) {
            return Ok(());
        }
        loop {
            let ty = self.compile_type()?;
            let (name, pos) = self.parser.expect_ident()?;
            self.define(&name, &ty, Kind::Argument, &pos)?;
            if optional!(self.parser, TokenKind::Symbol(Symbol::Comma)).is_none() {
                return Ok(());
            }
        }
    }

    /// subroutineBody = "{" { varDec } statements "}"
    fn compile_subroutine_body(&mut self, name: &str) -> Result<(), Error> {
        self.parser.expect_symbol(Symbol::LCurly)?;
        while check!(self.parser, TokenKind::Keyword(Keyword::Var)) {
            self.compile_var_dec()?;
        }

        // Header goes out once the locals are known.
        let locals = self.table.var_count(Kind::Local);
        self.frame.scratch = locals;
        self.emit(Inst::Function(
            format!("{}.{}", self.class_name, name),
            locals + 1,
        ));

        match self.frame.kind {
            SubKind::Constructor => {
                let fields = self.table.var_count(Kind::Field);
                self.push(Segment::Constant, fields);
                self.emit(Inst::Call("Memory.alloc".to_string(), 1));
                self.pop(Segment::Pointer, 0);
            }
            SubKind::Method => {
                self.push(Segment::Argument, 0);
                self.pop(Segment::Pointer, 0);
            }
            SubKind::Function => {}
        }

        self.compile_statements()?;
        self.parser.expect_symbol(Symbol::RCurly)?;
        Ok(())
    }

    /// varDec = "var" type varName { "," varName } ";"
    fn compile_var_dec(&mut self) -> Result<(), Error> {
        self.parser.expect_keyword(Keyword::Var)?;
        let ty = self.compile_type()?;
        loop {
            let (name, pos) = self.parser.expect_ident()?;
            self.define(&name, &ty, Kind::Local, &pos)?;
            if optional!(self.parser, TokenKind::Symbol(Symbol::Comma)).is_none() {
                break;
            }
        }
        self.parser.expect_symbol(Symbol::Semicolon)?;
        Ok(())
    }
}
