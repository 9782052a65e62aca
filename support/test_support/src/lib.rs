//! Shared helpers for the integration tests and benches.
//!
//! The production parser only consumes tokens, so fixture programs written
//! as source text go through the small tokenizer here; expected values use a
//! compact tree notation (`nil`, a natural number, or `(left.right)`).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail, ensure};
use serde::Deserialize;

use whileparse::token::{Op, Position, Token, TokenKind};
use whileparse::tree::Tree;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CaseClass {
    RunSuccess,
    ParseError,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExpectedOutcome {
    pub output: Option<String>,
    #[serde(default)]
    pub error_count: Option<usize>,
    #[serde(default)]
    pub error_contains: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CaseSpec {
    pub class: CaseClass,
    #[serde(default)]
    pub pure_only: bool,
    pub input: Option<String>,
    pub expected: ExpectedOutcome,
}

#[derive(Debug, Clone)]
pub struct Case {
    pub name: String,
    pub dir: PathBuf,
    pub program_path: PathBuf,
    pub spec: CaseSpec,
}

pub fn load_cases(programs_dir: &Path) -> Result<Vec<Case>> {
    let mut cases = Vec::new();

    for entry in fs::read_dir(programs_dir)
        .with_context(|| format!("Reading {}", programs_dir.display()))?
    {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }

        let case_path = path.join("case.yaml");
        if !case_path.exists() {
            continue;
        }

        let program_path = path.join("program.while");
        ensure!(
            program_path.exists(),
            "Missing program.while for case {}",
            path.display()
        );

        let case_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .with_context(|| format!("Bad case directory name {}", path.display()))?
            .to_string();

        let case_raw = fs::read_to_string(&case_path)
            .with_context(|| format!("Reading {}", case_path.display()))?;
        let spec: CaseSpec = serde_yaml::from_str(&case_raw)
            .with_context(|| format!("Parsing {}", case_path.display()))?;

        cases.push(Case {
            name: case_name,
            dir: path,
            program_path,
            spec,
        });
    }

    cases.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(cases)
}

/// Tokenizes a fixture program. Positions are zero-based row/column, the
/// coordinates the production lexer reports.
pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();

    for (row, line) in source.lines().enumerate() {
        let mut chars = line.char_indices().peekable();
        while let Some((col, c)) = chars.next() {
            let kind = match c {
                ' ' | '\t' => continue,
                '{' => TokenKind::LBrace,
                '}' => TokenKind::RBrace,
                '(' => TokenKind::LParen,
                ')' => TokenKind::RParen,
                ';' => TokenKind::Semicolon,
                ':' => {
                    if matches!(chars.peek(), Some((_, '='))) {
                        chars.next();
                        TokenKind::Assign
                    } else {
                        TokenKind::Colon
                    }
                }
                c if c.is_ascii_digit() => {
                    let mut literal = String::from(c);
                    while let Some((_, digit)) = chars.peek().copied() {
                        if !digit.is_ascii_digit() {
                            break;
                        }
                        literal.push(digit);
                        chars.next();
                    }
                    let value = literal
                        .parse()
                        .with_context(|| format!("Bad numeric literal '{literal}'"))?;
                    TokenKind::Number(value)
                }
                c if c.is_ascii_alphabetic() || c == '_' => {
                    let mut word = String::from(c);
                    while let Some((_, next)) = chars.peek().copied() {
                        if !next.is_ascii_alphanumeric() && next != '_' {
                            break;
                        }
                        word.push(next);
                        chars.next();
                    }
                    keyword_or_identifier(word)
                }
                other => bail!("Unsupported character '{other}' at {row}:{col}"),
            };
            tokens.push(Token::new(kind, Position::new(row, col)));
        }
    }

    Ok(tokens)
}

fn keyword_or_identifier(word: String) -> TokenKind {
    match word.as_str() {
        "read" => TokenKind::Read,
        "write" => TokenKind::Write,
        "if" => TokenKind::If,
        "else" => TokenKind::Else,
        "while" => TokenKind::While,
        "switch" => TokenKind::Switch,
        "case" => TokenKind::Case,
        "default" => TokenKind::Default,
        "hd" => TokenKind::Op(Op::Hd),
        "tl" => TokenKind::Op(Op::Tl),
        "cons" => TokenKind::Op(Op::Cons),
        _ => TokenKind::Identifier(word),
    }
}

/// Reads the fixture tree notation: `nil`, a natural number, or `(l.r)`.
pub fn parse_tree(text: &str) -> Result<Tree> {
    let mut reader = TreeReader {
        text: text.as_bytes(),
        pos: 0,
    };
    let tree = reader.read_tree()?;
    reader.skip_spaces();
    ensure!(
        reader.pos == reader.text.len(),
        "Trailing input in tree notation '{text}'"
    );
    Ok(tree)
}

struct TreeReader<'a> {
    text: &'a [u8],
    pos: usize,
}

impl TreeReader<'_> {
    fn skip_spaces(&mut self) {
        while self.text.get(self.pos).is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn read_tree(&mut self) -> Result<Tree> {
        self.skip_spaces();
        match self.text.get(self.pos) {
            Some(b'n') => {
                ensure!(
                    self.text[self.pos..].starts_with(b"nil"),
                    "Expected 'nil' at offset {}",
                    self.pos
                );
                self.pos += 3;
                Ok(Tree::Nil)
            }
            Some(digit) if digit.is_ascii_digit() => {
                let start = self.pos;
                while self.text.get(self.pos).is_some_and(|b| b.is_ascii_digit()) {
                    self.pos += 1;
                }
                let literal = std::str::from_utf8(&self.text[start..self.pos])?;
                Ok(Tree::from_nat(literal.parse()?))
            }
            Some(b'(') => {
                self.pos += 1;
                let left = self.read_tree()?;
                self.expect(b'.')?;
                let right = self.read_tree()?;
                self.expect(b')')?;
                Ok(Tree::cons(left, right))
            }
            _ => bail!("Expected a tree at offset {}", self.pos),
        }
    }

    fn expect(&mut self, byte: u8) -> Result<()> {
        self.skip_spaces();
        ensure!(
            self.text.get(self.pos) == Some(&byte),
            "Expected '{}' at offset {}",
            byte as char,
            self.pos
        );
        self.pos += 1;
        Ok(())
    }
}
