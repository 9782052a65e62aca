//! Textual rendering of PAD values.

use super::{Pad, PadSymbol};

const INDENT: &str = "    ";

/// Rendering dialects. `HWhile` prefixes symbolic tokens with `@`; `Pure`
/// leaves them bare. Numbers and the literal `nil` are never prefixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadFormat {
    HWhile,
    Pure,
}

impl PadFormat {
    fn token_prefix(self) -> &'static str {
        match self {
            PadFormat::HWhile => "@",
            PadFormat::Pure => "",
        }
    }
}

/// Renders a PAD value. Command lists (a program's body, `while` bodies,
/// `if` branches) go one element per line with four spaces of indent per
/// nesting level; expression lists stay inline. The output ends with a
/// newline.
pub fn display_pad(pad: &Pad, format: PadFormat) -> String {
    let prefix = format.token_prefix();
    let mut out = String::new();
    match pad {
        Pad::List(items) => match program_parts(items) {
            Some((input, body, output)) => {
                out.push('[');
                render_inline(input, prefix, &mut out);
                out.push_str(", ");
                render_block(body, prefix, 0, &mut out);
                out.push_str(", ");
                render_inline(output, prefix, &mut out);
                out.push(']');
            }
            None => render_block(items, prefix, 0, &mut out),
        },
        atom => render_inline(atom, prefix, &mut out),
    }
    out.push('\n');
    out
}

fn program_parts(items: &[Pad]) -> Option<(&Pad, &[Pad], &Pad)> {
    match items {
        [input @ Pad::Number(_), Pad::List(body), output @ Pad::Number(_)] => {
            Some((input, body, output))
        }
        _ => None,
    }
}

/// One element per line inside the brackets.
fn render_block(items: &[Pad], prefix: &str, level: usize, out: &mut String) {
    if items.is_empty() {
        out.push_str("[]");
        return;
    }

    out.push_str("[\n");
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            out.push_str(",\n");
        }
        for _ in 0..=level {
            out.push_str(INDENT);
        }
        render_command(item, prefix, level + 1, out);
    }
    out.push('\n');
    for _ in 0..level {
        out.push_str(INDENT);
    }
    out.push(']');
}

/// A command keeps its head and condition inline but opens its nested
/// command lists.
fn render_command(pad: &Pad, prefix: &str, level: usize, out: &mut String) {
    let Pad::List(items) = pad else {
        render_inline(pad, prefix, out);
        return;
    };
    match items.as_slice() {
        [head @ Pad::Symbol(PadSymbol::If), condition, then_body, else_body] => {
            out.push('[');
            render_inline(head, prefix, out);
            out.push_str(", ");
            render_inline(condition, prefix, out);
            out.push_str(", ");
            render_branch(then_body, prefix, level, out);
            out.push_str(", ");
            render_branch(else_body, prefix, level, out);
            out.push(']');
        }
        [head @ Pad::Symbol(PadSymbol::While), condition, body] => {
            out.push('[');
            render_inline(head, prefix, out);
            out.push_str(", ");
            render_inline(condition, prefix, out);
            out.push_str(", ");
            render_branch(body, prefix, level, out);
            out.push(']');
        }
        _ => render_inline(pad, prefix, out),
    }
}

fn render_branch(pad: &Pad, prefix: &str, level: usize, out: &mut String) {
    match pad {
        Pad::List(items) => render_block(items, prefix, level, out),
        atom => render_inline(atom, prefix, out),
    }
}

fn render_inline(pad: &Pad, prefix: &str, out: &mut String) {
    match pad {
        Pad::Number(value) => out.push_str(&value.to_string()),
        Pad::Nil => out.push_str("nil"),
        Pad::Symbol(symbol) => {
            out.push_str(prefix);
            out.push_str(symbol.lexeme());
        }
        Pad::List(items) => {
            out.push('[');
            for (index, item) in items.iter().enumerate() {
                if index > 0 {
                    out.push_str(", ");
                }
                render_inline(item, prefix, out);
            }
            out.push(']');
        }
    }
}

/// Bare inline rendering, used by decode errors to describe what they found.
pub(super) fn inline_pure(pad: &Pad) -> String {
    let mut out = String::new();
    render_inline(pad, "", &mut out);
    out
}
