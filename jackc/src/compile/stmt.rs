use super::engine::CompilationEngine;
use crate::error::{Error, Loc};
use crate::grammer::token::{Keyword, Symbol, TokenKind};
use crate::optional;
use arch::command::Command;
use arch::inst::Inst;
use arch::segment::Segment;

impl<'a, 'l> CompilationEngine<'a, 'l> {
    /// statements = { letStatement | ifStatement | whileStatement | doStatement | returnStatement }
    pub(super) fn compile_statements(&mut self) -> Result<(), Error> {
        loop {
            match self.peek_keyword()? {
                Some(Keyword::Let) => self.compile_let()?,
                Some(Keyword::If) => self.compile_if()?,
                Some(Keyword::While) => self.compile_while()?,
                Some(Keyword::Do) => self.compile_do()?,
                Some(Keyword::Return) => self.compile_return()?,
                _ => return Ok(()),
            }
        }
    }

    /// letStatement = "let" varName [ "[" expression "]" ] "=" expression ";"
    fn compile_let(&mut self) -> Result<(), Error> {
        self.parser.expect_keyword(Keyword::Let)?;
        let (name, pos) = self.parser.expect_ident()?;
        let (seg, idx) = self.resolve_var(&name, &pos)?;

        if optional!(self.parser, TokenKind::Symbol(Symbol::LBracket)).is_some() {
            // address first, then the value parked in the scratch local
            self.push(seg, idx);
            self.compile_expression()?;
            self.parser.expect_symbol(Symbol::RBracket)?;
            self.arith(Command::Add);
            self.parser.expect_symbol(Symbol::Equal)?;
            self.compile_expression()?;
            let scratch = self.frame.scratch;
            self.pop(Segment::Local, scratch);
            self.pop(Segment::Pointer, 1);
            self.push(Segment::Local, scratch);
            self.pop(Segment::That, 0);
        } else {
            self.parser.expect_symbol(Symbol::Equal)?;
            self.compile_expression()?;
            self.pop(seg, idx);
        }

        self.parser.expect_symbol(Symbol::Semicolon)?;
        Ok(())
    }

    /// ifStatement = "if" "(" expression ")" "{" statements "}" [ "else" "{" statements "}" ]
    fn compile_if(&mut self) -> Result<(), Error> {
        let id = self.labels.fresh();
        let else_label = format!("IF_ELSE_{id}");
        let end_label = format!("IF_END_{id}");

        self.parser.expect_keyword(Keyword::If)?;
        self.parser.expect_symbol(Symbol::LParen)?;
        self.compile_expression()?;
        self.parser.expect_symbol(Symbol::RParen)?;
        self.arith(Command::Not);
        self.emit(Inst::IfGoto(else_label.clone()));

        self.compile_block()?;
        self.emit(Inst::Goto(end_label.clone()));
        self.emit(Inst::Label(else_label));

        if optional!(self.parser, TokenKind::Keyword(Keyword::Else)).is_some() {
            self.compile_block()?;
        }
        self.emit(Inst::Label(end_label));
        Ok(())
    }

    /// whileStatement = "while" "(" expression ")" "{" statements "}"
    fn compile_while(&mut self) -> Result<(), Error> {
        let id = self.labels.fresh();
        let top_label = format!("WHILE_TOP_{id}");
        let end_label = format!("WHILE_END_{id}");

        self.parser.expect_keyword(Keyword::While)?;
        self.emit(Inst::Label(top_label.clone()));
        self.parser.expect_symbol(Symbol::LParen)?;
        self.compile_expression()?;
        self.parser.expect_symbol(Symbol::RParen)?;
        self.arith(Command::Not);
        self.emit(Inst::IfGoto(end_label.clone()));

        self.compile_block()?;
        self.emit(Inst::Goto(top_label));
        self.emit(Inst::Label(end_label));
        Ok(())
    }

    /// "{" statements "}"
    fn compile_block(&mut self) -> Result<(), Error> {
        self.parser.expect_symbol(Symbol::LCurly)?;
        self.compile_statements()?;
        self.parser.expect_symbol(Symbol::RCurly)?;
        Ok(())
    }

    /// doStatement = "do" subroutineCall ";"
    fn compile_do(&mut self) -> Result<(), Error> {
        self.parser.expect_keyword(Keyword::Do)?;
        let (name, pos) = self.parser.expect_ident()?;
        self.compile_call(name, pos)?;
        self.pop(Segment::Temp, 0);
        self.parser.expect_symbol(Symbol::Semicolon)?;
        Ok(())
    }

    /// returnStatement = "return" [ expression ] ";"
    fn compile_return(&mut self) -> Result<(), Error> {
        let pos = self.parser.expect_keyword(Keyword::Return)?;
        let bare = optional!(self.parser, TokenKind::Symbol(Symbol::Semicolon)).is_some();

        match (bare, self.frame.void) {
            (true, true) => self.push(Segment::Constant, 0),
            (false, false) => {
                self.compile_expression()?;
                self.parser.expect_symbol(Symbol::Semicolon)?;
            }
            (true, false) => {
                return Err(Error::TypeMismatch(
                    "missing return value in non-void subroutine".to_string(),
                    Loc::from(&pos),
                ))
            }
            (false, true) => {
                return Err(Error::TypeMismatch(
                    "void subroutine returns a value".to_string(),
                    Loc::from(&pos),
                ))
            }
        }

        self.emit(Inst::Return);
        Ok(())
    }
}
