use jackc::{compile, Error, Keyword, LexError, Loc, TokenKind};

fn error(source: &str) -> Error {
    compile("Main.jack", source).unwrap_err()
}

/// Body of `Main.main`, a function, next to a field `f` and a method `m`.
fn in_main(body: &str) -> Error {
    error(&format!(
        "class Main {{ field int f; method void m() {{ return; }} function void main() {{ {body} }} }}"
    ))
}

fn loc(row: usize, col: usize) -> Loc {
    Loc {
        file: "Main.jack".to_string(),
        row,
        col,
    }
}

macro_rules! case {
    ($name:ident, $body:expr, $pat:pat) => {
        #[test]
        fn $name() {
            let err = in_main($body);
            println!("{err}");
            assert!(matches!(err, $pat), "unexpected {err:?}");
        }
    };
}

// ---- Lexical ----
case!(unexpected_character, "var int x; let x = #;", Error::Lexical(LexError::UnexpectedCharacter('#'), _));
case!(integer_out_of_range, "do Output.printInt(32768); return;", Error::Lexical(LexError::IntegerOutOfRange(_), _));
case!(unterminated_string, "do Output.printString(\"abc\n\"); return;", Error::Lexical(LexError::UnterminatedString, _));

#[test]
fn unterminated_comment() {
    assert_eq!(
        error("class Main {\n  /* never closed"),
        Error::Lexical(LexError::UnterminatedComment, loc(2, 3))
    );
}

// ---- Syntax ----
case!(missing_semicolon, "var int x; let x = 1 return;", Error::Syntax { .. });
case!(not_a_term, "var int x; let x = ;", Error::Syntax { .. });
case!(do_needs_call, "var int x; do x; return;", Error::Syntax { .. });
case!(statement_after_var, "var int x; let x = 1; var int y; return;", Error::Syntax { .. });

#[test]
fn syntax_names_expected_and_found() {
    match error("class Main {\n  function void main() {\n    var int x;\n    let x 1;\n  }\n}") {
        Error::Syntax { expected, found } => {
            assert_eq!(expected, "`=`");
            assert_eq!(found.kind, TokenKind::IntegerConstant(1));
            assert_eq!(found.loc, loc(4, 11));
        }
        err => panic!("unexpected {err:?}"),
    }
}

#[test]
fn unexpected_eof() {
    let err = error("class Main {\n  field int x;");
    assert!(matches!(err, Error::UnexpectedEof { .. }));
    assert_eq!(err.loc(), Some(&loc(2, 14)));
    assert_eq!(
        err.to_string(),
        "expected `}`, found end of file in Main.jack after Main.jack:2:14"
    );
}

#[test]
fn empty_file() {
    let err = error("");
    assert!(matches!(err, Error::UnexpectedEof { last: None, .. }));
    assert_eq!(err.to_string(), "expected `class`, found end of file in Main.jack");
}

#[test]
fn class_name_must_be_identifier() {
    match error("class 5 { }") {
        Error::Syntax { expected, found } => {
            assert_eq!(expected, "identifier");
            assert_eq!(found.kind, TokenKind::IntegerConstant(5));
            assert_eq!(found.loc, loc(1, 7));
        }
        err => panic!("unexpected {err:?}"),
    }
}

#[test]
fn trailing_tokens() {
    match error("class Main { } class Other { }") {
        Error::Syntax { expected, found } => {
            assert_eq!(expected, "end of file");
            assert_eq!(found.kind, TokenKind::Keyword(Keyword::Class));
        }
        err => panic!("unexpected {err:?}"),
    }
}

// ---- Undeclared ----
case!(undeclared_variable, "let y = 1; return;", Error::UndeclaredIdentifier(_, Some(_)));
case!(undeclared_subroutine, "do nothing(); return;", Error::UndeclaredIdentifier(_, Some(_)));
case!(undeclared_member, "do Main.nothing(); return;", Error::UndeclaredIdentifier(_, Some(_)));

#[test]
fn undeclared_message() {
    let err = error("class Main {\n  function void main() {\n    let y = 1;\n    return;\n  }\n}");
    assert_eq!(err.to_string(), "undeclared identifier `y` at Main.jack:3:9");
}

// ---- Duplicates ----
case!(duplicate_local, "var int x, x; return;", Error::DuplicateSymbol(_, Some(_)));

#[test]
fn duplicate_field() {
    assert_eq!(
        error("class Main {\n  field int a;\n  static int a;\n}"),
        Error::DuplicateSymbol("a".to_string(), Some(loc(3, 14)))
    );
}

#[test]
fn duplicate_subroutine() {
    assert!(matches!(
        error("class Main { function void f() { return; } method void f() { return; } }"),
        Error::DuplicateSymbol(name, _) if name == "f"
    ));
}

// ---- Type mismatch ----
case!(this_in_function, "do Memory.deAlloc(this); return;", Error::TypeMismatch(..));
case!(field_in_function, "let f = 1; return;", Error::TypeMismatch(..));
case!(method_in_function, "do m(); return;", Error::TypeMismatch(..));
case!(method_through_class, "do Main.m(); return;", Error::TypeMismatch(..));
case!(call_on_int, "var int x; do x.run(); return;", Error::TypeMismatch(..));
case!(value_from_void, "return 1;", Error::TypeMismatch(..));
case!(call_variable, "var int x; do x(); return;", Error::TypeMismatch(..));

#[test]
fn call_field_in_method() {
    assert!(matches!(
        error("class Main { field int g; method void m() { do g(); return; } }"),
        Error::TypeMismatch(..)
    ));
    assert!(matches!(
        error("class Main { static int g; function void f() { do Main.g(); return; } }"),
        Error::TypeMismatch(..)
    ));
}


#[test]
fn missing_return_value() {
    assert!(matches!(
        error("class Main { function int f() { return; } }"),
        Error::TypeMismatch(..)
    ));
}

#[test]
fn fields_are_fine_in_methods() {
    assert!(compile(
        "Main.jack",
        "class Main { field int f; method void m() { let f = f + 1; do m(); return; } }"
    )
    .is_ok());
}

#[test]
fn error_has_location() {
    let err = in_main("let f = 1; return;");
    let at = err.loc().unwrap();
    assert_eq!(at.row, 1);
    assert!(err.to_string().contains("Main.jack:1:"));
}
