//! AST to PAD translation.

use std::collections::HashMap;

use crate::parser::ast::{Command, Expression, NIL, Program};
use crate::token::Op;
use crate::tree::Tree;

use super::{Pad, PadError, PadSymbol};

/// Assigns identifier indices in first-occurrence order. The encoder seeds
/// the input variable before walking the body, so it always gets index 0;
/// the reserved name `nil` never reaches this table.
struct VarIndex<'p> {
    indices: HashMap<&'p str, u64>,
}

impl<'p> VarIndex<'p> {
    fn new() -> Self {
        Self {
            indices: HashMap::new(),
        }
    }

    fn index_of(&mut self, name: &'p str) -> u64 {
        let next = self.indices.len() as u64;
        *self.indices.entry(name).or_insert(next)
    }
}

fn field<'p, T>(slot: &'p Option<T>, missing: &'static str) -> Result<&'p T, PadError> {
    slot.as_ref().ok_or(PadError::Incomplete { missing })
}

/// Encodes a complete program as `[input_index, body, output_index]`.
pub fn to_pad(program: &Program) -> Result<Pad, PadError> {
    if !program.complete {
        return Err(PadError::Incomplete {
            missing: "a complete program",
        });
    }
    let input = field(&program.input, "the input variable")?;
    let output = field(&program.output, "the output variable")?;

    let mut vars = VarIndex::new();
    let input_index = vars.index_of(&input.name);
    let body = encode_body(&program.body, &mut vars)?;
    let output_index = vars.index_of(&output.name);

    Ok(Pad::List(vec![
        Pad::Number(input_index),
        body,
        Pad::Number(output_index),
    ]))
}

fn encode_body<'p>(commands: &'p [Command], vars: &mut VarIndex<'p>) -> Result<Pad, PadError> {
    let mut encoded = Vec::with_capacity(commands.len());
    for command in commands {
        encoded.push(encode_command(command, vars)?);
    }
    Ok(Pad::List(encoded))
}

fn encode_command<'p>(command: &'p Command, vars: &mut VarIndex<'p>) -> Result<Pad, PadError> {
    match command {
        Command::Assign { ident, arg, .. } => {
            let index = vars.index_of(&ident.name);
            let arg = encode_expression(field(arg, "an assignment right-hand side")?, vars)?;
            Ok(Pad::List(vec![
                Pad::Symbol(PadSymbol::Assign),
                Pad::Number(index),
                arg,
            ]))
        }
        Command::Cond {
            condition,
            then_body,
            else_body,
            ..
        } => {
            let condition = encode_expression(field(condition, "a condition")?, vars)?;
            let then_body = encode_body(then_body, vars)?;
            let else_body = encode_body(else_body, vars)?;
            Ok(Pad::List(vec![
                Pad::Symbol(PadSymbol::If),
                condition,
                then_body,
                else_body,
            ]))
        }
        Command::Loop { condition, body, .. } => {
            let condition = encode_expression(field(condition, "a condition")?, vars)?;
            let body = encode_body(body, vars)?;
            Ok(Pad::List(vec![
                Pad::Symbol(PadSymbol::While),
                condition,
                body,
            ]))
        }
        Command::Switch { .. } => Err(PadError::Unencodable {
            construct: "A switch statement",
        }),
    }
}

fn encode_expression<'p>(
    expr: &'p Expression,
    vars: &mut VarIndex<'p>,
) -> Result<Pad, PadError> {
    match expr {
        Expression::Identifier(ident) if ident.name == NIL => Ok(quote_nil()),
        Expression::Identifier(ident) => Ok(Pad::List(vec![
            Pad::Symbol(PadSymbol::Var),
            Pad::Number(vars.index_of(&ident.name)),
        ])),
        Expression::TreeLiteral { tree } => Ok(encode_tree(tree)),
        Expression::Operation { op, args, .. } => {
            let symbol = match op {
                Op::Hd => PadSymbol::Hd,
                Op::Tl => PadSymbol::Tl,
                Op::Cons => PadSymbol::Cons,
            };
            let mut encoded = vec![Pad::Symbol(symbol)];
            for arg in args {
                let arg = field(arg, "an operation argument")?;
                encoded.push(encode_expression(arg, vars)?);
            }
            Ok(Pad::List(encoded))
        }
        Expression::Equal { .. } => Err(PadError::Unencodable {
            construct: "An equality expression",
        }),
    }
}

/// Tree literals encode structurally, so the numeral `n` becomes `n` nested
/// conses with `nil` left children. The right spine is walked iteratively
/// because numerals make it as long as the number is large.
fn encode_tree(tree: &Tree) -> Pad {
    let mut spine = Vec::new();
    let mut current = tree;
    loop {
        match current {
            Tree::Nil => break,
            Tree::Cons(left, right) => {
                spine.push(left);
                current = right;
            }
        }
    }

    let mut encoded = quote_nil();
    for left in spine.into_iter().rev() {
        encoded = Pad::List(vec![
            Pad::Symbol(PadSymbol::Cons),
            encode_tree(left),
            encoded,
        ]);
    }
    encoded
}

fn quote_nil() -> Pad {
    Pad::List(vec![Pad::Symbol(PadSymbol::Quote), Pad::Nil])
}
