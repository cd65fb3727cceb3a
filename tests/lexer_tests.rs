use nook::lexer::{Kind, Token, lex, lex_verbose};
use pretty_assertions::assert_eq;

fn kinds(source: &str) -> Vec<Kind> {
    lex(source).into_iter().map(|token| token.kind).collect()
}

#[test]
fn lex_simple_sum() {
    assert_eq!(
        lex("(+ 1 2 3)"),
        vec![
            Token::new(0, "(", Kind::OpenParen),
            Token::new(1, "+", Kind::Plus),
            Token::new(3, "1", Kind::Int),
            Token::new(5, "2", Kind::Int),
            Token::new(7, "3", Kind::Int),
            Token::new(8, ")", Kind::CloseParen),
        ]
    );
}

#[test]
fn hex_int_is_one_token() {
    let tokens = lex("0x1F");
    assert_eq!(tokens, vec![Token::new(0, "0x1F", Kind::Int)]);
}

#[test]
fn literal_classes() {
    assert_eq!(
        kinds("1 -2 1.5 'ok \"hi\" true ./src --all -v $git name"),
        vec![
            Kind::Int,
            Kind::Int,
            Kind::Float,
            Kind::Atom,
            Kind::String,
            Kind::Bool,
            Kind::Path,
            Kind::Flag,
            Kind::Flag,
            Kind::Command,
            Kind::Identifier,
        ]
    );
}

#[test]
fn operators() {
    assert_eq!(
        kinds("+ - * / > < >= <= =="),
        vec![
            Kind::Plus,
            Kind::Minus,
            Kind::Multiply,
            Kind::Divide,
            Kind::GreaterThan,
            Kind::LessThan,
            Kind::GreaterEqual,
            Kind::LessEqual,
            Kind::Equal,
        ]
    );
}

#[test]
fn keywords() {
    assert_eq!(
        kinds("let fn impl int float bool str path flag atom command none"),
        vec![
            Kind::Let,
            Kind::Fn,
            Kind::Impl,
            Kind::IntType,
            Kind::FloatType,
            Kind::BoolType,
            Kind::StringType,
            Kind::PathType,
            Kind::FlagType,
            Kind::AtomType,
            Kind::CommandType,
            Kind::NoneType,
        ]
    );
}

#[test]
fn keyword_prefix_is_an_identifier() {
    assert_eq!(kinds("letter integer"), vec![Kind::Identifier, Kind::Identifier]);
}

#[test]
fn brackets() {
    assert_eq!(
        kinds("([{}])"),
        vec![
            Kind::OpenParen,
            Kind::OpenSquare,
            Kind::OpenCurly,
            Kind::CloseCurly,
            Kind::CloseSquare,
            Kind::CloseParen,
        ]
    );
}

#[test]
fn relative_directories_are_paths() {
    assert_eq!(kinds("(cd ..)"), vec![Kind::OpenParen, Kind::Identifier, Kind::Path, Kind::CloseParen]);
    assert_eq!(kinds(". ../up /abs/dir"), vec![Kind::Path, Kind::Path, Kind::Path]);
}

#[test]
fn lone_slash_is_divide() {
    assert_eq!(kinds("(/ 4 2)")[1], Kind::Divide);
    assert_eq!(kinds("/"), vec![Kind::Divide]);
}

#[test]
fn commas_are_whitespace() {
    assert_eq!(kinds("[a, b int]"), kinds("[a b int]"));
}

#[test]
fn unknown_input_becomes_invalid_token() {
    let tokens = lex("(+ 1 @@@ 2)");
    assert_eq!(tokens[3], Token::new(5, "@@@", Kind::Invalid));
    assert_eq!(tokens[4], Token::new(9, "2", Kind::Int));
}

#[test]
fn unterminated_string_is_invalid() {
    let tokens = lex("\"open\nnext");
    assert_eq!(tokens[0].kind, Kind::Invalid);
}

#[test]
fn verbose_mode_keeps_everything() {
    let source = "(ls) # list\n";
    let tokens = lex_verbose(source);
    let text = tokens.iter().map(|t| t.value.as_str()).collect::<String>();
    assert_eq!(text, source);
    assert!(tokens.iter().any(|t| t.kind == Kind::Comment));
    assert!(tokens.iter().any(|t| t.kind == Kind::Whitespace));
}

#[test]
fn tokens_never_overlap() {
    let tokens = lex_verbose("(let x (+ 0b1010 0o17 -3.25)) # done");
    for pair in tokens.windows(2) {
        assert_eq!(pair[0].end(), pair[1].position);
    }
}
