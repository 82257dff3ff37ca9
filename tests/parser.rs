//! Integration tests for grammar compilation and parsing.

use peglite::{
    Action, Actions, GrammarError, ParseOptions, Parser, PegError, State, Unparsable, Utmost,
    Value,
};
use rstest::rstest;

const S_EXPRESSION: &str = r"
one_expr = _ expr !.
_        = \s*
expr     = \( _ exprs \) _  hug
         | ([^()\s]+) _
exprs    = expr exprs
         | ";

const BALANCED: &str = r"
allbalanced =  _ bal !.
_           =  \s*
bal         =  \( _ bal \) _ hug bal
            |  (\w+) _
            |
";

const CURLY: &str = r"
one_expr =  _ expr $
_        =  \s*
expr     =  \{ _ exprs \} _ hug
         |  ([^{}\s]+) _
exprs    =  expr exprs
         |
";

const METAGRAMMAR: &str = r"
grammar       =  _ rules
rules         =  rule rules
              |  rule
rule          =  name [=] _ expr \. _       make_rule
expr          =  term \| _ expr             alt
              |  term
term          =  factors : _ name           reduce_
              |  factors
factors       =  factor factors             seq
              |                             empty
factor        =  '((?:\\.|[^'])*)' _        literal
              |  name                       rule_ref
name          =  (\w+) _
_             =  \s*
";

fn s(text: &str) -> Value {
    Value::from(text)
}

fn tuple(items: Vec<Value>) -> Value {
    Value::Tuple(items)
}

fn unparsable(rule: &str, consumed: &str, remainder: &str) -> PegError {
    PegError::Unparsable(Unparsable {
        rule: rule.to_string(),
        consumed: consumed.to_string(),
        remainder: remainder.to_string(),
    })
}

fn stock(grammar: &str) -> Parser {
    Parser::new(grammar, Actions::stock()).expect("grammar should compile")
}

fn render(vals: &[Value]) -> String {
    Value::Tuple(vals.to_vec()).to_string()
}

fn text_action(f: fn(&[String]) -> String) -> Action {
    Action::new(move |vals: &[Value]| {
        let strs: Vec<String> = vals
            .iter()
            .map(|v| v.as_str().unwrap_or_default().to_string())
            .collect();
        Value::Str(f(&strs))
    })
}

fn metagrammar() -> Parser {
    let actions = Actions::new()
        .with("make_rule", text_action(|v| format!("{}: {}", v[0], v[1])))
        .with("alt", text_action(|v| format!("{}/{}", v[0], v[1])))
        .with("reduce_", text_action(|v| format!("{} =>{}", v[0], v[1])))
        .with("seq", text_action(|v| v.join("+")))
        .with("empty", text_action(|_| "<>".to_string()))
        .with("literal", text_action(|v| format!("/{}/", v[0])))
        .with("rule_ref", text_action(|v| format!("<{}>", v[0])));
    Parser::new(METAGRAMMAR, actions).unwrap()
}

#[test]
fn test_greeting() {
    let p = stock("greeting = hi name\nhi = hello\\s*\nname = (\\w+)");
    assert_eq!(p.parse("hello world").unwrap(), vec![s("world")]);
}

#[test]
fn test_choice_is_per_rule() {
    let p = stock("a = x | y\nx = /foo\ny = (bar)");
    assert_eq!(p.parse("bar").unwrap(), vec![s("bar")]);
    assert_eq!(p.parse("foo").unwrap(), vec![]);
}

#[test]
fn test_ordered_choice_not_longest() {
    let p = stock("a = (b) | (b)(c)");
    assert_eq!(p.parse("bc").unwrap(), vec![s("b")]);
}

#[test]
fn test_unreachable_missing_rule() {
    let p = stock("a = /x | z");
    assert_eq!(p.parse("x").unwrap(), vec![]);
    assert_eq!(
        p.parse("q").unwrap_err(),
        PegError::Grammar(GrammarError::MissingRule("z".to_string()))
    );
}

#[test]
fn test_identifier_shaped_regex_needs_marker() {
    // `foo` is a name, so without a rule or action of that name it is an error
    let p = stock("a = foo");
    assert!(matches!(
        p.parse("foo"),
        Err(PegError::Grammar(GrammarError::MissingRule(_)))
    ));
    let p = stock("a = /foo");
    assert_eq!(p.parse("foo").unwrap(), vec![]);
}

#[test]
fn test_empty_rule_parses_empty_input() {
    assert_eq!(stock("x = ").parse("").unwrap(), vec![]);
}

#[test]
fn test_s_expression() {
    let p = stock(S_EXPRESSION);
    let vals = p.parse("  (hi (john mccarthy) (()))").unwrap();
    assert_eq!(
        vals,
        vec![tuple(vec![
            s("hi"),
            tuple(vec![s("john"), s("mccarthy")]),
            tuple(vec![tuple(vec![])]),
        ])]
    );
    assert_eq!(render(&vals), r#"(("hi", ("john", "mccarthy"), ((),)),)"#);
}

#[test]
fn test_s_expression_too_many() {
    let p = stock(S_EXPRESSION);
    assert_eq!(
        p.parse("(too) (many) (exprs)").unwrap_err(),
        unparsable("one_expr", "(too) ", "(many) (exprs)")
    );
}

#[rstest]
#[case("(x) y", Ok(r#"(("x",), "y")"#))]
#[case("x y", Err(("x ", "y")))]
#[case("((a)) ", Ok(r#"((("a",),),)"#))]
#[case("", Ok("()"))]
fn test_balanced(#[case] input: &str, #[case] expected: Result<&str, (&str, &str)>) {
    let p = stock(BALANCED);
    match expected {
        Ok(rendered) => assert_eq!(render(&p.parse(input).unwrap()), rendered),
        Err((consumed, remainder)) => assert_eq!(
            p.parse(input).unwrap_err(),
            unparsable("allbalanced", consumed, remainder)
        ),
    }
}

#[rstest]
#[case("{}", "((),)")]
#[case("hi", r#"("hi",)"#)]
#[case("{hi {there} {{}}}", r#"(("hi", ("there",), ((),)),)"#)]
fn test_curly(#[case] input: &str, #[case] rendered: &str) {
    assert_eq!(render(&stock(CURLY).parse(input).unwrap()), rendered);
}

#[test]
fn test_curly_empty_input() {
    assert_eq!(
        stock(CURLY).parse("").unwrap_err(),
        unparsable("one_expr", "", "")
    );
}

#[test]
fn test_multiline_rules() {
    let p = stock(
        r"
hi =  /this /is
      /a /rule
   |  /or /this
",
    );
    assert_eq!(p.parse("thisisarule").unwrap(), vec![]);
    assert_eq!(p.parse("orthis").unwrap(), vec![]);
    assert_eq!(
        p.parse("thisisnot").unwrap_err(),
        unparsable("hi", "thisis", "not")
    );
}

#[test]
fn test_metagrammar() {
    let p = metagrammar();
    assert_eq!(
        p.parse(" hello = bargle. goodbye = hey there.aloha=.").unwrap(),
        vec![
            s("hello: <bargle>+<>"),
            s("goodbye: <hey>+<there>+<>"),
            s("aloha: <>"),
        ]
    );
}

#[test]
fn test_metagrammar_failure_point() {
    assert_eq!(
        metagrammar().parse(" hello arg = bargle.").unwrap_err(),
        unparsable("grammar", " hello ", "arg = bargle.")
    );
}

#[test]
fn test_metagrammar_from_inner_rule() {
    let p = metagrammar();
    assert_eq!(
        p.parse_rule("'goodbye' world", "term").unwrap(),
        vec![s("/goodbye/+<world>+<>")]
    );
}

#[test]
fn test_action_arity_mismatch_is_action_error() {
    let actions = Actions::new().with(
        "pair",
        Action::with_arity(2, |v: &[Value]| tuple(v.to_vec())),
    );
    let p = Parser::new("a = (\\w) pair", actions).unwrap();
    match p.parse("x").unwrap_err() {
        PegError::Action(e) => {
            assert_eq!(e.action, "pair");
            assert_eq!(e.message, "expected 2 values, got 1");
        }
        other => panic!("Expected action error, got {:?}", other),
    }
}

fn seen() -> Action {
    Action::peek(|_: &str, utmost: &mut Utmost, st: &State| {
        Some(st.advance(st.pos, [Value::Int(utmost.get() as i64)]))
    })
}

#[rstest]
#[case::inline("top = /ab /z | /a seen", "abq", 2)]
#[case::behind_rule("top = /ab /z | /a r\nr = seen", "abq", 2)]
#[case::from_memo("top = /abc /z | /a r /q | /a r\nr = seen", "abcd", 3)]
fn test_peek_action_sees_parse_reach(
    #[case] grammar: &str,
    #[case] input: &str,
    #[case] expected: i64,
    #[values(true, false)] memoize: bool,
) {
    let p = Parser::new(grammar, Actions::new().with("seen", seen())).unwrap();
    let options = ParseOptions {
        memoize,
        ..ParseOptions::default()
    };
    assert_eq!(
        p.parse_with(input, &options).unwrap(),
        vec![Value::Int(expected)]
    );
}

#[test]
fn test_join_action() {
    let p = stock("word = (\\w) (\\w) (\\w) join");
    assert_eq!(p.parse("abc").unwrap(), vec![s("abc")]);
}

#[test]
fn test_grammar_errors() {
    assert_eq!(
        Parser::<Value>::new("", Actions::new()).unwrap_err(),
        GrammarError::NoRules
    );
    assert!(matches!(
        Parser::<Value>::new("oops\na = /b", Actions::new()).unwrap_err(),
        GrammarError::MissingLeftHandSide(_)
    ));
    assert_eq!(
        Parser::<Value>::new("a = /b\na = /c", Actions::new()).unwrap_err(),
        GrammarError::DuplicateRules(vec!["a".to_string()])
    );
}

#[test]
fn test_unparsable_display() {
    let err = stock(S_EXPRESSION).parse("(a").unwrap_err();
    insta::assert_snapshot!(
        err,
        @r#"Parse error: cannot parse 'one_expr': stopped after "(a" at """#
    );
}

#[test]
fn test_memoization_off_matches_on() {
    let p = stock(S_EXPRESSION);
    let off = ParseOptions {
        memoize: false,
        ..ParseOptions::default()
    };
    for input in ["(a (b c) d)", "(a (b", "(too) (many)", ""] {
        assert_eq!(p.parse(input), p.parse_with(input, &off), "input {:?}", input);
    }
}

#[test]
fn test_parser_shared_across_threads() {
    let p = stock(S_EXPRESSION);
    let inputs = ["(a)", "(b c)", "(d (e))", "(f"];
    std::thread::scope(|scope| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|input| {
                let p = &p;
                scope.spawn(move || p.parse(input))
            })
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(results[0], Ok(vec![tuple(vec![s("a")])]));
        assert_eq!(results[1], Ok(vec![tuple(vec![s("b"), s("c")])]));
        assert!(results[2].is_ok());
        assert!(results[3].as_ref().unwrap_err().is_unparsable());
    });
}

#[test]
fn test_rules_introspection() {
    let p = stock(BALANCED);
    let names: Vec<_> = p.rules().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["allbalanced", "_", "bal", "_start"]);
    assert_eq!(p.rules()[2].alternatives.len(), 3);
}
