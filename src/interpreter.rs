//! Explicit-stack execution backend.
//!
//! WHILE loops can iterate and build trees without bound, so both command
//! execution and expression evaluation run over heap-allocated frame stacks
//! instead of host recursion.

use crate::parser::ast::Program;
use crate::tree::Tree;

mod error;
mod runtime;

pub use error::InterpreterError;

use runtime::Machine;

/// Execution options. Currently empty; reserved for host-controlled limits
/// such as a step budget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecOptions {}

pub struct Interpreter {
    _options: ExecOptions,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_options(ExecOptions::default())
    }

    pub fn with_options(options: ExecOptions) -> Self {
        Self { _options: options }
    }

    /// Runs `program` on `input` and returns the output variable's final
    /// binding. Fails only on malformed ASTs; a parser-produced AST with
    /// `complete == true` always executes.
    pub fn run(&self, program: &Program, input: Tree) -> Result<Tree, InterpreterError> {
        Machine::new(program, input)?.run(program)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::{Command, Expression, Ident, Program, SwitchCase, SwitchDefault};
    use crate::token::{Op, Position};

    fn ident(name: &str) -> Ident {
        Ident::new(name, Position::default())
    }

    fn var(name: &str) -> Expression {
        Expression::Identifier(ident(name))
    }

    fn op(op: Op, args: Vec<Expression>) -> Expression {
        Expression::Operation {
            op,
            args: args.into_iter().map(Some).collect(),
            complete: true,
        }
    }

    fn assign(name: &str, value: Expression) -> Command {
        Command::Assign {
            ident: ident(name),
            arg: Some(value),
            complete: true,
        }
    }

    fn program(input: &str, body: Vec<Command>, output: &str) -> Program {
        Program {
            name: Some(ident("prog")),
            input: Some(ident(input)),
            output: Some(ident(output)),
            body,
            complete: true,
        }
    }

    fn run(program: &Program, input: Tree) -> Tree {
        Interpreter::new().run(program, input).expect("run failed")
    }

    #[test]
    fn identity_program_returns_its_input() {
        let identity = program("X", vec![], "X");
        assert_eq!(run(&identity, Tree::Nil), Tree::Nil);

        let pair = Tree::cons(Tree::Nil, Tree::Nil);
        assert_eq!(run(&identity, pair.clone()), pair);
    }

    #[test]
    fn unset_output_defaults_to_nil() {
        let prog = program("X", vec![], "Y");
        assert_eq!(run(&prog, Tree::from_nat(4)), Tree::Nil);
    }

    #[test]
    fn evaluates_the_semantic_equations() {
        // Y := hd cons X X;  Z := tl cons Y X;  H := hd nil;  T := tl nil
        let prog = program(
            "X",
            vec![
                assign("Y", op(Op::Hd, vec![op(Op::Cons, vec![var("X"), var("nil")])])),
                assign("Z", op(Op::Tl, vec![op(Op::Cons, vec![var("nil"), var("X")])])),
                assign("P", op(Op::Cons, vec![var("Y"), var("Z")])),
            ],
            "P",
        );
        let input = Tree::from_nat(2);
        let expected = Tree::cons(Tree::from_nat(2), Tree::from_nat(2));
        assert_eq!(run(&prog, input), expected);

        let nil_proj = program(
            "X",
            vec![assign("Y", op(Op::Cons, vec![
                op(Op::Hd, vec![var("nil")]),
                op(Op::Tl, vec![var("nil")]),
            ]))],
            "Y",
        );
        assert_eq!(run(&nil_proj, Tree::Nil), Tree::cons(Tree::Nil, Tree::Nil));
    }

    #[test]
    fn conditional_picks_a_branch_on_nil() {
        let prog = program(
            "X",
            vec![Command::Cond {
                condition: Some(var("X")),
                then_body: vec![assign("Y", var("nil"))],
                else_body: vec![assign("Y", op(Op::Cons, vec![var("nil"), var("nil")]))],
                complete: true,
            }],
            "Y",
        );
        assert_eq!(run(&prog, Tree::cons(Tree::Nil, Tree::Nil)), Tree::Nil);
        assert_eq!(run(&prog, Tree::Nil), Tree::cons(Tree::Nil, Tree::Nil));
    }

    #[test]
    fn while_loop_adds_two_numbers() {
        // X := hd XY; Y := tl XY; while X { Y := cons nil Y; X := tl X }
        let prog = program(
            "XY",
            vec![
                assign("X", op(Op::Hd, vec![var("XY")])),
                assign("Y", op(Op::Tl, vec![var("XY")])),
                Command::Loop {
                    condition: Some(var("X")),
                    body: vec![
                        assign("Y", op(Op::Cons, vec![var("nil"), var("Y")])),
                        assign("X", op(Op::Tl, vec![var("X")])),
                    ],
                    complete: true,
                },
            ],
            "Y",
        );
        let input = Tree::cons(Tree::from_nat(3), Tree::from_nat(2));
        assert_eq!(run(&prog, input), Tree::from_nat(5));
    }

    #[test]
    fn deep_loops_do_not_exhaust_the_host_stack() {
        let prog = program(
            "X",
            vec![Command::Loop {
                condition: Some(var("X")),
                body: vec![assign("X", op(Op::Tl, vec![var("X")]))],
                complete: true,
            }],
            "X",
        );
        assert_eq!(run(&prog, Tree::from_nat(100_000)), Tree::Nil);
    }

    #[test]
    fn deeply_nested_expressions_evaluate_iteratively() {
        // cons nil (cons nil (... X)) nested a couple thousand levels
        let mut expr = var("X");
        for _ in 0..2_000 {
            expr = op(Op::Cons, vec![var("nil"), expr]);
        }
        let prog = program("X", vec![assign("Y", expr)], "Y");
        assert_eq!(run(&prog, Tree::Nil), Tree::from_nat(2_000));
    }

    #[test]
    fn switch_runs_the_first_matching_case() {
        let switch = Command::Switch {
            condition: Some(var("X")),
            cases: vec![
                SwitchCase {
                    condition: Some(var("nil")),
                    body: vec![assign("Y", op(Op::Cons, vec![var("nil"), var("nil")]))],
                    complete: true,
                },
                SwitchCase {
                    condition: Some(op(Op::Cons, vec![var("nil"), var("nil")])),
                    body: vec![assign("Y", var("nil"))],
                    complete: true,
                },
            ],
            default: SwitchDefault {
                body: vec![assign("Y", var("X"))],
                complete: true,
            },
            complete: true,
        };
        let prog = program("X", vec![switch], "Y");

        assert_eq!(run(&prog, Tree::Nil), Tree::cons(Tree::Nil, Tree::Nil));
        assert_eq!(run(&prog, Tree::cons(Tree::Nil, Tree::Nil)), Tree::Nil);
        assert_eq!(run(&prog, Tree::from_nat(3)), Tree::from_nat(3));
    }

    #[test]
    fn equality_evaluates_to_the_boolean_encoding() {
        let equal = Expression::Equal {
            left: Some(Box::new(var("X"))),
            right: Some(Box::new(op(Op::Cons, vec![var("nil"), var("nil")]))),
            complete: true,
        };
        let prog = program("X", vec![assign("Y", equal)], "Y");

        assert_eq!(
            run(&prog, Tree::from_nat(1)),
            Tree::cons(Tree::Nil, Tree::Nil)
        );
        assert_eq!(run(&prog, Tree::Nil), Tree::Nil);
    }

    #[test]
    fn literal_replacement_does_not_leak_between_iterations() {
        // the loop body evaluates the same AST expression twice with
        // different stores
        let prog = program(
            "X",
            vec![
                assign("N", var("X")),
                Command::Loop {
                    condition: Some(var("N")),
                    body: vec![
                        assign("Y", op(Op::Cons, vec![var("N"), var("Y")])),
                        assign("N", op(Op::Tl, vec![var("N")])),
                    ],
                    complete: true,
                },
            ],
            "Y",
        );
        let output = run(&prog, Tree::from_nat(2));
        let expected = Tree::cons(
            Tree::from_nat(1),
            Tree::cons(Tree::from_nat(2), Tree::Nil),
        );
        assert_eq!(output, expected);
    }

    #[test]
    fn malformed_assignment_is_rejected() {
        let prog = program(
            "X",
            vec![Command::Assign {
                ident: ident("Y"),
                arg: None,
                complete: false,
            }],
            "Y",
        );
        let error = Interpreter::new()
            .run(&prog, Tree::Nil)
            .expect_err("expected a malformed AST error");
        assert!(matches!(error, InterpreterError::MalformedAst { .. }));
    }

    #[test]
    fn program_without_input_variable_is_rejected() {
        let prog = Program {
            name: Some(ident("prog")),
            input: None,
            output: Some(ident("Y")),
            body: vec![],
            complete: false,
        };
        let error = Interpreter::new()
            .run(&prog, Tree::Nil)
            .expect_err("expected a malformed AST error");
        assert!(matches!(error, InterpreterError::MalformedAst { .. }));
    }
}
