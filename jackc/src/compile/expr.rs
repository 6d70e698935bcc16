use super::engine::CompilationEngine;
use crate::error::{Error, Loc, TokenInfo};
use crate::grammer::token::{Keyword, Pos, Symbol, Token, TokenKind};
use crate::symbols::{Dispatch, Kind, SubKind};
use crate::{check, optional};
use arch::command::Command;
use arch::inst::Inst;
use arch::segment::Segment;

/// Instruction applying a binary operator, if `sym` is one.
fn binary_op(sym: Symbol) -> Option<Inst> {
    let inst = match sym {
        Symbol::Plus => Inst::Arith(Command::Add),
        Symbol::Minus => Inst::Arith(Command::Sub),
        Symbol::Ampasand => Inst::Arith(Command::And),
        Symbol::Pipe => Inst::Arith(Command::Or),
        Symbol::LAngle => Inst::Arith(Command::Lt),
        Symbol::RAngle => Inst::Arith(Command::Gt),
        Symbol::Equal => Inst::Arith(Command::Eq),
        Symbol::Star => Inst::Call("Math.multiply".to_string(), 2),
        Symbol::Slash => Inst::Call("Math.divide".to_string(), 2),
        _ => return None,
    };
    Some(inst)
}

fn is_primitive(ty: &str) -> bool {
    matches!(ty, "int" | "char" | "boolean")
}

impl<'a, 'l> CompilationEngine<'a, 'l> {
    /// expression = term { op term }
    ///
    /// Operators have no precedence and apply left to right.
    pub(super) fn compile_expression(&mut self) -> Result<(), Error> {
        self.compile_term()?;
        while let Some(op) = self.peek_binary_op()? {
            self.parser.next()?;
            self.compile_term()?;
            self.emit(op);
        }
        Ok(())
    }

    fn peek_binary_op(&mut self) -> Result<Option<Inst>, Error> {
        Ok(match self.parser.peek()? {
            Some(Token {
                kind: TokenKind::Symbol(sym),
                ..
            }) => binary_op(*sym),
            _ => None,
        })
    }

    /// term = integerConstant | stringConstant | keywordConstant
    ///      | varName | varName "[" expression "]" | subroutineCall
    ///      | "(" expression ")" | unaryOp term
    fn compile_term(&mut self) -> Result<(), Error> {
        let Some(Token { kind, pos }) = self.parser.next()? else {
            return Err(self.parser.eof("term"));
        };
        match kind {
            TokenKind::IntegerConstant(n) => self.push(Segment::Constant, n),
            TokenKind::StringConstant(s) => self.compile_string(&s, &pos)?,
            TokenKind::Keyword(Keyword::True) => {
                self.push(Segment::Constant, 0);
                self.arith(Command::Not);
            }
            TokenKind::Keyword(Keyword::False | Keyword::Null) => {
                self.push(Segment::Constant, 0);
            }
            TokenKind::Keyword(Keyword::This) => {
                self.check_instance("`this`", &pos)?;
                self.push(Segment::Pointer, 0);
            }
            TokenKind::Symbol(Symbol::LParen) => {
                self.compile_expression()?;
                self.parser.expect_symbol(Symbol::RParen)?;
            }
            TokenKind::Symbol(Symbol::Minus) => {
                self.compile_term()?;
                self.arith(Command::Neg);
            }
            TokenKind::Symbol(Symbol::Tilde) => {
                self.compile_term()?;
                self.arith(Command::Not);
            }
            TokenKind::Identifier(name) => self.compile_name(name, pos)?,
            kind => {
                return Err(Error::Syntax {
                    expected: "term".to_string(),
                    found: TokenInfo {
                        kind,
                        loc: Loc::from(&pos),
                    },
                })
            }
        }
        Ok(())
    }

    /// Identifier-led terms: variable, array element or call.
    fn compile_name(&mut self, name: String, pos: Pos<'a>) -> Result<(), Error> {
        if optional!(self.parser, TokenKind::Symbol(Symbol::LBracket)).is_some() {
            let (seg, idx) = self.resolve_var(&name, &pos)?;
            self.push(seg, idx);
            self.compile_expression()?;
            self.parser.expect_symbol(Symbol::RBracket)?;
            self.arith(Command::Add);
            self.pop(Segment::Pointer, 1);
            self.push(Segment::That, 0);
        } else if check!(
            self.parser,
            TokenKind::Symbol(Symbol::LParen | Symbol::Period)
        ) {
            self.compile_call(name, pos)?;
        } else {
            let (seg, idx) = self.resolve_var(&name, &pos)?;
            self.push(seg, idx);
        }
        Ok(())
    }

    /// Segment and index of a variable in scope.
    pub(super) fn resolve_var(&self, name: &str, pos: &Pos<'a>) -> Result<(Segment, u16), Error> {
        let kind = self
            .table
            .kind_of(name)
            .map_err(|err| err.at(Loc::from(pos)))?;
        if kind == Kind::Field {
            self.check_instance(&format!("field `{name}`"), pos)?;
        }
        let idx = self.table.index_of(name)?;
        Ok((kind.segment(), idx))
    }

    fn compile_string(&mut self, s: &str, pos: &Pos<'a>) -> Result<(), Error> {
        let len = u16::try_from(s.len()).map_err(|_| {
            Error::TypeMismatch("string constant is too long".to_string(), Loc::from(pos))
        })?;
        self.push(Segment::Constant, len);
        self.emit(Inst::Call("String.new".to_string(), 1));
        for byte in s.bytes() {
            self.push(Segment::Constant, byte as u16);
            self.emit(Inst::Call("String.appendChar".to_string(), 2));
        }
        Ok(())
    }

    /// subroutineCall = subroutineName "(" expressionList ")"
    ///                | ( className | varName ) "." subroutineName "(" expressionList ")"
    ///
    /// `name` is the leading identifier, already consumed.
    pub(super) fn compile_call(&mut self, name: String, pos: Pos<'a>) -> Result<(), Error> {
        let (target, receiver) =
            if optional!(self.parser, TokenKind::Symbol(Symbol::Period)).is_some() {
                let (sub, sub_pos) = self.parser.expect_ident()?;
                self.parser.expect_symbol(Symbol::LParen)?;
                self.qualified_call(&name, &pos, &sub, &sub_pos)?
            } else {
                self.parser.expect_symbol(Symbol::LParen)?;
                self.unqualified_call(&name, &pos)?
            };

        let n_args = self.compile_expression_list()?;
        self.parser.expect_symbol(Symbol::RParen)?;
        self.emit(Inst::Call(target, n_args + u16::from(receiver)));
        Ok(())
    }

    /// `name.sub(...)`. Pushes the receiver when `name` is a variable.
    fn qualified_call(
        &mut self,
        name: &str,
        pos: &Pos<'a>,
        sub: &str,
        sub_pos: &Pos<'a>,
    ) -> Result<(String, bool), Error> {
        match self.table.dispatch(name) {
            Dispatch::Receiver {
                segment,
                index,
                kind,
                class,
            } => {
                if is_primitive(&class) {
                    return Err(Error::TypeMismatch(
                        format!("cannot call `{sub}` on `{name}` of type `{class}`"),
                        Loc::from(pos),
                    ));
                }
                if kind == Kind::Field {
                    self.check_instance(&format!("field `{name}`"), pos)?;
                }
                self.push(segment, index);
                Ok((format!("{class}.{sub}"), true))
            }
            Dispatch::Static => {
                if name == self.class_name {
                    match self.members.kind_of(sub) {
                        Some(SubKind::Method) => {
                            return Err(Error::TypeMismatch(
                                format!("method `{name}.{sub}` called without an object"),
                                Loc::from(sub_pos),
                            ))
                        }
                        Some(_) => {}
                        None => {
                            let called = format!("{name}.{sub}");
                            return Err(self.not_a_subroutine(sub, &called, sub_pos));
                        }
                    }
                }
                Ok((format!("{name}.{sub}"), false))
            }
        }
    }

    /// `sub(...)` names a member of the current class.
    fn unqualified_call(&mut self, sub: &str, pos: &Pos<'a>) -> Result<(String, bool), Error> {
        let target = format!("{}.{}", self.class_name, sub);
        match self.members.kind_of(sub) {
            Some(SubKind::Method) => {
                self.check_instance(&format!("method `{sub}`"), pos)?;
                self.push(Segment::Pointer, 0);
                Ok((target, true))
            }
            Some(_) => Ok((target, false)),
            None => Err(self.not_a_subroutine(sub, sub, pos)),
        }
    }

    /// `sub` is no subroutine of the current class: either a variable or unknown.
    fn not_a_subroutine(&self, sub: &str, called: &str, pos: &Pos<'a>) -> Error {
        match self.table.lookup(sub) {
            Some(_) => Error::TypeMismatch(
                format!("`{sub}` is a variable, not a subroutine"),
                Loc::from(pos),
            ),
            None => Error::UndeclaredIdentifier(called.to_string(), Some(Loc::from(pos))),
        }
    }

    /// expressionList = [ expression { "," expression } ]
    fn compile_expression_list(&mut self) -> Result<u16, Error> {
        if check!(self.parser, TokenKind::Symbol(Symbol::RParen)) {
            return Ok(0);
        }
        let mut count = 0;
        loop {
            self.compile_expression()?;
            count += 1;
            if optional!(self.parser, TokenKind::Symbol(Symbol::Comma)).is_none() {
                return Ok(count);
            }
        }
    }
}
