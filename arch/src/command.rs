use strum::{Display, EnumIter, EnumString};

/// Arithmetic and logical commands. `neg` and `not` are unary, the rest binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Command {
    Add,
    Sub,
    Neg,
    Eq,
    Gt,
    Lt,
    And,
    Or,
    Not,
}

#[test]
fn test() {
    use strum::IntoEnumIterator;
    let names: Vec<String> = Command::iter().map(|cmd| cmd.to_string()).collect();
    assert_eq!(
        names,
        ["add", "sub", "neg", "eq", "gt", "lt", "and", "or", "not"]
    );
    assert_eq!("or".parse::<Command>(), Ok(Command::Or));
    assert!("xor".parse::<Command>().is_err());
}
