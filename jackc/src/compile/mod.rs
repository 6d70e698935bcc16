mod engine;
mod expr;
mod stmt;

use crate::error::Error;
use crate::grammer::lexer::tokenize;
use crate::symbols::ClassMembers;
use arch::inst::Inst;
use engine::CompilationEngine;
use std::fmt;

/// VM code of one class, in emission order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Code(pub Vec<Inst>);

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for inst in &self.0 {
            writeln!(f, "{}", inst)?;
        }
        Ok(())
    }
}

impl Code {
    pub fn lines(&self) -> Vec<String> {
        self.0.iter().map(|inst| inst.to_string()).collect()
    }

    pub fn cformat(&self) -> String {
        self.0
            .iter()
            .map(|inst| match inst {
                Inst::Function(..) | Inst::Label(_) => format!("{}\n", inst.cformat()),
                _ => format!("    {}\n", inst.cformat()),
            })
            .collect()
    }
}

/// Source of control-flow label ids. Never hands out the same id twice.
#[derive(Debug, Default)]
pub struct Labels {
    next: usize,
}

impl Labels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fresh(&mut self) -> usize {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// Compiles classes one after another. Label ids keep counting across every
/// class compiled by the same `Compiler`.
#[derive(Debug, Default)]
pub struct Compiler {
    labels: Labels,
}

impl Compiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile one class. On error nothing of the class is returned.
    pub fn compile(&mut self, file: &str, source: &str) -> Result<Code, Error> {
        let members = ClassMembers::scan(file, source);
        CompilationEngine::new(file, tokenize(file, source), &mut self.labels, members)
            .compile_class()
    }
}

/// Compile one class with a fresh label counter.
pub fn compile(file: &str, source: &str) -> Result<Code, Error> {
    Compiler::new().compile(file, source)
}
