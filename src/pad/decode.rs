//! PAD to AST translation.
//!
//! Decoding is strict: malformed input fails immediately, there is no
//! partial-AST recovery here. Identifier names cannot be recovered from
//! indices, so the decoder synthesizes spreadsheet-style names; round trips
//! preserve structure up to that renaming.

use crate::parser::ast::{Command, Expression, Ident, Program};
use crate::token::{Op, Position};
use crate::tree::Tree;

use super::display::inline_pure;
use super::{Pad, PadError, PadSymbol};

/// Name given to decoded programs; the original is not part of the encoding.
const PROGRAM_NAME: &str = "prog";

pub fn from_pad(pad: &Pad) -> Result<Program, PadError> {
    let parts = expect_list(pad, "a [input, body, output] program list")?;
    let (input, body, output) = match parts {
        [input, body, output] => (input, body, output),
        _ => return Err(unexpected("a list of exactly three elements", pad)),
    };

    let input = expect_number(input, "an input variable index")?;
    let output = expect_number(output, "an output variable index")?;

    Ok(Program {
        name: Some(Ident::new(PROGRAM_NAME, Position::default())),
        input: Some(synthesized_ident(input)),
        output: Some(synthesized_ident(output)),
        body: decode_body(body)?,
        complete: true,
    })
}

fn decode_body(pad: &Pad) -> Result<Vec<Command>, PadError> {
    let items = expect_list(pad, "a command list")?;
    items.iter().map(decode_command).collect()
}

fn decode_command(pad: &Pad) -> Result<Command, PadError> {
    let parts = expect_list(pad, "a command list")?;
    match parts {
        [Pad::Symbol(PadSymbol::Assign), index, arg] => Ok(Command::Assign {
            ident: synthesized_ident(expect_number(index, "a variable index")?),
            arg: Some(decode_expression(arg)?),
            complete: true,
        }),
        [Pad::Symbol(PadSymbol::If), condition, then_body, else_body] => Ok(Command::Cond {
            condition: Some(decode_expression(condition)?),
            then_body: decode_body(then_body)?,
            else_body: decode_body(else_body)?,
            complete: true,
        }),
        [Pad::Symbol(PadSymbol::While), condition, body] => Ok(Command::Loop {
            condition: Some(decode_expression(condition)?),
            body: decode_body(body)?,
            complete: true,
        }),
        _ => Err(unexpected("a ':=', 'if' or 'while' command", pad)),
    }
}

fn decode_expression(pad: &Pad) -> Result<Expression, PadError> {
    let parts = expect_list(pad, "an expression list")?;
    match parts {
        [Pad::Symbol(PadSymbol::Var), index] => Ok(Expression::Identifier(synthesized_ident(
            expect_number(index, "a variable index")?,
        ))),
        [Pad::Symbol(PadSymbol::Quote), Pad::Nil] => Ok(Expression::TreeLiteral { tree: Tree::Nil }),
        [Pad::Symbol(PadSymbol::Hd), arg] => decode_operation(Op::Hd, &[arg]),
        [Pad::Symbol(PadSymbol::Tl), arg] => decode_operation(Op::Tl, &[arg]),
        [Pad::Symbol(PadSymbol::Cons), left, right] => decode_operation(Op::Cons, &[left, right]),
        _ => Err(unexpected(
            "a 'var', 'quote', 'hd', 'tl' or 'cons' expression",
            pad,
        )),
    }
}

fn decode_operation(op: Op, args: &[&Pad]) -> Result<Expression, PadError> {
    let mut decoded = Vec::with_capacity(args.len());
    for arg in args {
        decoded.push(Some(decode_expression(arg)?));
    }
    Ok(Expression::Operation {
        op,
        args: decoded,
        complete: true,
    })
}

/// Spreadsheet-style names: 0 is `A`, 25 is `Z`, 26 is `AA`.
fn var_name(mut index: u64) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push((b'A' + (index % 26) as u8) as char);
        index /= 26;
        if index == 0 {
            break;
        }
        index -= 1;
    }
    letters.into_iter().rev().collect()
}

fn synthesized_ident(index: u64) -> Ident {
    Ident::new(var_name(index), Position::default())
}

fn expect_list<'p>(pad: &'p Pad, expected: &'static str) -> Result<&'p [Pad], PadError> {
    match pad {
        Pad::List(items) => Ok(items),
        _ => Err(unexpected(expected, pad)),
    }
}

fn expect_number(pad: &Pad, expected: &'static str) -> Result<u64, PadError> {
    match pad {
        Pad::Number(value) => Ok(*value),
        _ => Err(unexpected(expected, pad)),
    }
}

fn unexpected(expected: &'static str, found: &Pad) -> PadError {
    PadError::Unexpected {
        expected,
        found: inline_pure(found),
    }
}
