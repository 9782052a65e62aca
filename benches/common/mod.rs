//! Shared bench workloads, generated so the benches need no fixture files.

use whileparse::token::Token;

pub const ADD: &str =
    "add read XY { X := hd XY; Y := tl XY; while X { Y := cons nil Y; X := tl X } } write Y";

pub fn workloads() -> Vec<(&'static str, String)> {
    vec![
        ("add", ADD.to_string()),
        ("deep_expression", deep_expression(100)),
        ("wide_program", wide_program(400)),
    ]
}

fn deep_expression(depth: usize) -> String {
    let mut body = String::from("Y := ");
    for _ in 0..depth {
        body.push_str("cons X ");
    }
    body.push('X');
    format!("deep read X {{ {body} }} write Y")
}

fn wide_program(statements: usize) -> String {
    let mut body = String::new();
    for index in 0..statements {
        if index > 0 {
            body.push_str("; ");
        }
        body.push_str(&format!("V{index} := cons X V{index}"));
    }
    format!("wide read X {{ {body} }} write V0")
}

pub fn tokens_for(source: &str) -> Vec<Token> {
    test_support::tokenize(source).expect("tokenize failed")
}
