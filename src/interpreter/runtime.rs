//! The frame stacks and the variable store.

use std::collections::HashMap;

use crate::parser::ast::{Command, Expression, Ident, NIL, Program};
use crate::token::Op;
use crate::tree::Tree;

use super::InterpreterError;

fn malformed(reason: &'static str) -> InterpreterError {
    InterpreterError::MalformedAst { reason }
}

fn required<'p, T>(slot: &'p Option<T>, reason: &'static str) -> Result<&'p T, InterpreterError> {
    slot.as_ref().ok_or(InterpreterError::MalformedAst { reason })
}

/// One entry of the command stack.
enum Frame<'p> {
    Block(&'p [Command]),
    Command(&'p Command),
}

/// One argument slot of an expression frame.
enum Slot<'p> {
    Done(Tree),
    Todo(&'p Expression),
}

#[derive(Clone, Copy)]
enum EvalOp {
    /// Holds the initial expression; its single slot ends up carrying the
    /// final value.
    Root,
    Op(Op),
    Equal,
}

/// An operation being evaluated. Slots are filled in place, so evaluation
/// never touches the AST itself.
struct EvalFrame<'p> {
    op: EvalOp,
    slots: Vec<Slot<'p>>,
}

impl<'p> EvalFrame<'p> {
    fn first_todo(&self) -> Option<(usize, &'p Expression)> {
        self.slots.iter().enumerate().find_map(|(index, slot)| match slot {
            Slot::Todo(expr) => Some((index, *expr)),
            Slot::Done(_) => None,
        })
    }

    fn fill_first_todo(&mut self, value: Tree) -> Result<(), InterpreterError> {
        for slot in &mut self.slots {
            if matches!(slot, Slot::Todo(_)) {
                *slot = Slot::Done(value);
                return Ok(());
            }
        }
        Err(malformed("expression frame has no slot to fill"))
    }

    fn compute(self) -> Result<Tree, InterpreterError> {
        let mut values = Vec::with_capacity(self.slots.len());
        for slot in self.slots {
            match slot {
                Slot::Done(tree) => values.push(tree),
                Slot::Todo(_) => return Err(malformed("operand was left unevaluated")),
            }
        }
        let mut values = values.into_iter();
        let mut take = || values.next().ok_or_else(|| malformed("operand count mismatch"));

        match self.op {
            EvalOp::Root => take(),
            EvalOp::Op(Op::Hd) => Ok(take()?.hd()),
            EvalOp::Op(Op::Tl) => Ok(take()?.tl()),
            EvalOp::Op(Op::Cons) => {
                let left = take()?;
                let right = take()?;
                Ok(Tree::cons(left, right))
            }
            EvalOp::Equal => {
                let left = take()?;
                let right = take()?;
                if left == right {
                    Ok(Tree::cons(Tree::Nil, Tree::Nil))
                } else {
                    Ok(Tree::Nil)
                }
            }
        }
    }
}

pub(super) struct Machine<'p> {
    store: HashMap<&'p str, Tree>,
}

impl<'p> Machine<'p> {
    pub(super) fn new(program: &'p Program, input: Tree) -> Result<Self, InterpreterError> {
        let input_ident = required(&program.input, "program has no input variable")?;
        let mut store = HashMap::new();
        store.insert(input_ident.name.as_str(), input);
        Ok(Self { store })
    }

    pub(super) fn run(mut self, program: &'p Program) -> Result<Tree, InterpreterError> {
        let output = required(&program.output, "program has no output variable")?;

        let mut stack = vec![Frame::Block(&program.body)];
        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Block(commands) => {
                    if let Some((head, rest)) = commands.split_first() {
                        if !rest.is_empty() {
                            stack.push(Frame::Block(rest));
                        }
                        stack.push(Frame::Command(head));
                    }
                }
                Frame::Command(command) => self.step(command, &mut stack)?,
            }
        }

        Ok(self.store.remove(output.name.as_str()).unwrap_or(Tree::Nil))
    }

    fn step(
        &mut self,
        command: &'p Command,
        stack: &mut Vec<Frame<'p>>,
    ) -> Result<(), InterpreterError> {
        match command {
            Command::Assign { ident, arg, .. } => {
                let arg = required(arg, "assignment has no right-hand side")?;
                let value = self.eval(arg)?;
                self.store.insert(ident.name.as_str(), value);
            }
            Command::Cond {
                condition,
                then_body,
                else_body,
                ..
            } => {
                let chosen = if self.test(condition)? { then_body } else { else_body };
                stack.push(Frame::Block(chosen));
            }
            Command::Loop { condition, body, .. } => {
                if self.test(condition)? {
                    // the body runs, then the loop re-tests
                    stack.push(Frame::Command(command));
                    stack.push(Frame::Block(body));
                }
            }
            Command::Switch {
                condition,
                cases,
                default,
                ..
            } => {
                let scrutinee = self.eval(required(condition, "switch has no condition")?)?;
                let mut chosen: &'p [Command] = &default.body;
                for case in cases {
                    let guard =
                        self.eval(required(&case.condition, "switch case has no condition")?)?;
                    if guard == scrutinee {
                        chosen = &case.body;
                        break;
                    }
                }
                stack.push(Frame::Block(chosen));
            }
        }
        Ok(())
    }

    fn test(&mut self, condition: &'p Option<Expression>) -> Result<bool, InterpreterError> {
        let condition = required(condition, "command has no condition")?;
        Ok(!self.eval(condition)?.is_nil())
    }

    /// Evaluates one expression over an explicit frame stack. The top
    /// frame's first unfinished slot is either resolved in place or expanded
    /// into a child frame; a finished frame folds its value into the parent.
    fn eval(&mut self, expr: &'p Expression) -> Result<Tree, InterpreterError> {
        let mut stack = vec![EvalFrame {
            op: EvalOp::Root,
            slots: vec![Slot::Todo(expr)],
        }];

        loop {
            let top = stack.len() - 1;
            match stack[top].first_todo() {
                Some((index, pending)) => match pending {
                    Expression::Identifier(ident) => {
                        stack[top].slots[index] = Slot::Done(self.load(ident));
                    }
                    Expression::TreeLiteral { tree } => {
                        stack[top].slots[index] = Slot::Done(tree.clone());
                    }
                    Expression::Operation { op, args, .. } => {
                        if args.len() != op.arity() {
                            return Err(malformed("operation has the wrong number of arguments"));
                        }
                        let mut slots = Vec::with_capacity(args.len());
                        for arg in args {
                            slots.push(Slot::Todo(required(arg, "operation has a missing argument")?));
                        }
                        stack.push(EvalFrame { op: EvalOp::Op(*op), slots });
                    }
                    Expression::Equal { left, right, .. } => {
                        let missing = "equality has a missing operand";
                        let left = left.as_deref().ok_or_else(|| malformed(missing))?;
                        let right = right.as_deref().ok_or_else(|| malformed(missing))?;
                        stack.push(EvalFrame {
                            op: EvalOp::Equal,
                            slots: vec![Slot::Todo(left), Slot::Todo(right)],
                        });
                    }
                },
                None => {
                    let frame = match stack.pop() {
                        Some(frame) => frame,
                        None => return Err(malformed("expression stack underflow")),
                    };
                    let value = frame.compute()?;
                    match stack.last_mut() {
                        Some(parent) => parent.fill_first_todo(value)?,
                        None => return Ok(value),
                    }
                }
            }
        }
    }

    fn load(&self, ident: &Ident) -> Tree {
        if ident.name == NIL {
            return Tree::Nil;
        }
        self.store.get(ident.name.as_str()).cloned().unwrap_or(Tree::Nil)
    }
}
