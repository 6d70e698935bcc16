use crate::{command::Command, segment::Segment};

use color_print::cformat;
use std::fmt;

/// One line of VM code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inst {
    Push(Segment, u16),
    Pop(Segment, u16),
    Arith(Command),
    Label(String),
    Goto(String),
    IfGoto(String),
    Call(String, u16),
    Function(String, u16),
    Return,
}

impl fmt::Display for Inst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Inst::Push(seg, idx) => write!(f, "push {} {}", seg, idx),
            Inst::Pop(seg, idx) => write!(f, "pop {} {}", seg, idx),
            Inst::Arith(cmd) => write!(f, "{}", cmd),
            Inst::Label(name) => write!(f, "label {}", name),
            Inst::Goto(name) => write!(f, "goto {}", name),
            Inst::IfGoto(name) => write!(f, "if-goto {}", name),
            Inst::Call(name, n_args) => write!(f, "call {} {}", name, n_args),
            Inst::Function(name, n_locals) => write!(f, "function {} {}", name, n_locals),
            Inst::Return => write!(f, "return"),
        }
    }
}

impl Inst {
    /// Parse one line of the textual form produced by `Display`.
    pub fn parse(line: &str) -> Result<Self, String> {
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            ["push", seg, idx] => {
                let seg = Segment::parse(seg)?;
                Ok(Inst::Push(seg, parse_index(seg, idx)?))
            }
            ["pop", seg, idx] => {
                let seg = Segment::parse(seg)?;
                if !seg.is_writable() {
                    return Err(format!("Cannot pop into segment: `{seg}`"));
                }
                Ok(Inst::Pop(seg, parse_index(seg, idx)?))
            }
            ["label", name] => Ok(Inst::Label(name.to_string())),
            ["goto", name] => Ok(Inst::Goto(name.to_string())),
            ["if-goto", name] => Ok(Inst::IfGoto(name.to_string())),
            ["call", name, n] => Ok(Inst::Call(name.to_string(), parse_count(n)?)),
            ["function", name, n] => Ok(Inst::Function(name.to_string(), parse_count(n)?)),
            ["return"] => Ok(Inst::Return),
            [cmd] => match cmd.parse::<Command>() {
                Ok(cmd) => Ok(Inst::Arith(cmd)),
                Err(_) => Err(format!("Unknown command: `{cmd}`")),
            },
            _ => Err(format!("Malformed instruction: `{line}`")),
        }
    }

    pub fn cformat(&self) -> String {
        macro_rules! op {
            ($name:expr, $arg0:expr, $arg1:expr) => {
                cformat!("<r>{:<9}</><b>{:<9}</> <y>{}</>", $name, $arg0, $arg1)
            };
        }

        match self {
            Inst::Push(seg, idx) => op!("push", seg, idx),
            Inst::Pop(seg, idx) => op!("pop", seg, idx),
            Inst::Arith(cmd) => op!(cmd, "", ""),
            Inst::Label(name) => cformat!("<m>{}</>:", name),
            Inst::Goto(name) => op!("goto", name, ""),
            Inst::IfGoto(name) => op!("if-goto", name, ""),
            Inst::Call(name, n_args) => op!("call", name, n_args),
            Inst::Function(name, n_locals) => cformat!("<g,s>function {} {}</>", name, n_locals),
            Inst::Return => op!("return", "", ""),
        }
    }
}

fn parse_count(s: &str) -> Result<u16, String> {
    s.parse::<u16>()
        .map_err(|_| format!("Cannot parse `{s}` as count"))
}

fn parse_index(seg: Segment, s: &str) -> Result<u16, String> {
    let idx = s
        .parse::<u16>()
        .map_err(|_| format!("Cannot parse `{s}` as index"))?;
    match seg.capacity() {
        Some(cap) if idx >= cap => Err(format!("Index {idx} out of range for segment `{seg}`")),
        _ => Ok(idx),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_inst {
        ($($name:ident: $inst:expr => $text:expr,)*) => {
            $(
                #[test]
                fn $name() {
                    let inst = $inst;
                    assert_eq!(inst.to_string(), $text);
                    assert_eq!(Inst::parse($text), Ok(inst));
                }
            )*
        }
    }

    test_inst! {
        test_push: Inst::Push(Segment::Constant, 17) => "push constant 17",
        test_pop: Inst::Pop(Segment::That, 0) => "pop that 0",
        test_neg: Inst::Arith(Command::Neg) => "neg",
        test_label: Inst::Label("WHILE_TOP_3".to_string()) => "label WHILE_TOP_3",
        test_if_goto: Inst::IfGoto("IF_ELSE_0".to_string()) => "if-goto IF_ELSE_0",
        test_call: Inst::Call("Math.multiply".to_string(), 2) => "call Math.multiply 2",
        test_function: Inst::Function("Main.main".to_string(), 1) => "function Main.main 1",
        test_return: Inst::Return => "return",
    }

    #[test]
    fn rejects_malformed() {
        assert!(Inst::parse("pop constant 0").is_err());
        assert!(Inst::parse("push pointer 2").is_err());
        assert!(Inst::parse("push temp 8").is_err());
        assert!(Inst::parse("push local -1").is_err());
        assert!(Inst::parse("xor").is_err());
        assert!(Inst::parse("goto").is_err());
        assert!(Inst::parse("").is_err());
    }
}
