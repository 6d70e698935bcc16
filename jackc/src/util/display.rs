use crate::error::Error;
use crate::grammer::lexer::tokenize;

/// Token stream of `source` as an XML listing, one token per line.
pub fn tokens_xml(file: &str, source: &str) -> Result<String, Error> {
    let mut out = String::from("<tokens>\n");
    for token in tokenize(file, source) {
        let kind = token?.kind;
        let tag = kind.tag();
        out += &format!("<{tag}> {} </{tag}>\n", kind.escaped());
    }
    out.push_str("</tokens>\n");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing() {
        let xml = tokens_xml("T.jack", "if (x < 10) { let s = \"a&b\"; }").unwrap();
        let expected = "\
<tokens>
<keyword> if </keyword>
<symbol> ( </symbol>
<identifier> x </identifier>
<symbol> &lt; </symbol>
<integerConstant> 10 </integerConstant>
<symbol> ) </symbol>
<symbol> { </symbol>
<keyword> let </keyword>
<identifier> s </identifier>
<symbol> = </symbol>
<stringConstant> a&b </stringConstant>
<symbol> ; </symbol>
<symbol> } </symbol>
</tokens>
";
        assert_eq!(xml, expected);
    }

    #[test]
    fn lexical_error_yields_nothing() {
        assert!(tokens_xml("T.jack", "let x = 40000;").is_err());
    }
}
