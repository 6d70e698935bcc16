use jackc::{tokenize, Keyword as Kw, Symbol as Sym, TokenKind};

fn case(code: &str, expects: Vec<TokenKind>) {
    let tokens: Vec<_> = tokenize("Test.jack", code)
        .collect::<Result<_, _>>()
        .unwrap();

    println!(" {code}");
    for token in &tokens {
        print!("\r\x1b[{}C^", token.pos.col);
    }
    println!();
    for (idx, token) in tokens.iter().enumerate() {
        println!("{:>2}: {:?}", idx, token.kind);
    }

    assert_eq!(tokens.len(), expects.len());
    for (idx, expect) in expects.iter().enumerate() {
        assert_eq!(tokens[idx].kind, *expect);
    }
}

#[test]
fn tests() {
    use TokenKind::*;
    case(
        "class Main { function void main() { do Output.printString(\"ABC\"); return; } } // sample comment",
        vec![
            Keyword(Kw::Class),
            Identifier(format!("Main")),
            Symbol(Sym::LCurly),
            Keyword(Kw::Function),
            Keyword(Kw::Void),
            Identifier(format!("main")),
            Symbol(Sym::LParen),
            Symbol(Sym::RParen),
            Symbol(Sym::LCurly),
            Keyword(Kw::Do),
            Identifier(format!("Output")),
            Symbol(Sym::Period),
            Identifier(format!("printString")),
            Symbol(Sym::LParen),
            StringConstant(format!("ABC")),
            Symbol(Sym::RParen),
            Symbol(Sym::Semicolon),
            Keyword(Kw::Return),
            Symbol(Sym::Semicolon),
            Symbol(Sym::RCurly),
            Symbol(Sym::RCurly),
        ],
    );
}

#[test]
fn block_comments_span_lines() {
    use TokenKind::*;
    case(
        "/** doc\n * more */ let x=x/2;/* trailing */",
        vec![
            Keyword(Kw::Let),
            Identifier(format!("x")),
            Symbol(Sym::Equal),
            Identifier(format!("x")),
            Symbol(Sym::Slash),
            IntegerConstant(2),
            Symbol(Sym::Semicolon),
        ],
    );
}

#[test]
fn keywords_need_the_whole_word() {
    use TokenKind::*;
    case(
        "classic do_it if0 while",
        vec![
            Identifier(format!("classic")),
            Identifier(format!("do_it")),
            Identifier(format!("if0")),
            Keyword(Kw::While),
        ],
    );
}

#[test]
fn digits_then_letters_split() {
    use TokenKind::*;
    case(
        "12abc",
        vec![IntegerConstant(12), Identifier(format!("abc"))],
    );
}

#[test]
fn restart_yields_the_same_tokens() {
    let code = "let a[i] = ~b;";
    let first: Vec<_> = tokenize("T.jack", code).map(|t| t.unwrap().kind).collect();
    let second: Vec<_> = tokenize("T.jack", code).map(|t| t.unwrap().kind).collect();
    assert_eq!(first, second);
}
