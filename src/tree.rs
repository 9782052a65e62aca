//! The binary tree, WHILE's only runtime value.

use std::fmt;
use std::mem;
use std::rc::Rc;

/// A tree is `nil` or a pair of trees. Trees are immutable after
/// construction, so subtrees are shared freely via `Rc`.
#[derive(Debug, Clone)]
pub enum Tree {
    Nil,
    Cons(Rc<Tree>, Rc<Tree>),
}

impl Tree {
    pub fn cons(left: Tree, right: Tree) -> Self {
        Tree::Cons(Rc::new(left), Rc::new(right))
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Tree::Nil)
    }

    /// Left subtree. `nil` has no children and yields `nil`.
    pub fn hd(&self) -> Tree {
        match self {
            Tree::Nil => Tree::Nil,
            Tree::Cons(left, _) => (**left).clone(),
        }
    }

    /// Right subtree. `nil` has no children and yields `nil`.
    pub fn tl(&self) -> Tree {
        match self {
            Tree::Nil => Tree::Nil,
            Tree::Cons(_, right) => (**right).clone(),
        }
    }

    /// Encodes a natural number: `0` is `nil`, `n + 1` is `(nil, encode(n))`.
    pub fn from_nat(n: u64) -> Self {
        let mut tree = Tree::Nil;
        for _ in 0..n {
            tree = Tree::cons(Tree::Nil, tree);
        }
        tree
    }
}

// Structural equality over a worklist; runtime trees can be deeper than the
// host stack allows.
impl PartialEq for Tree {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some(pair) = pending.pop() {
            match pair {
                (Tree::Nil, Tree::Nil) => {}
                (Tree::Cons(ll, lr), Tree::Cons(rl, rr)) => {
                    if Rc::ptr_eq(ll, rl) && Rc::ptr_eq(lr, rr) {
                        continue;
                    }
                    pending.push((lr, rr));
                    pending.push((ll, rl));
                }
                _ => return false,
            }
        }
        true
    }
}

impl Eq for Tree {}

// Unshared chains are unlinked iteratively; the derived drop glue would
// recurse once per level.
impl Drop for Tree {
    fn drop(&mut self) {
        if !matches!(self, Tree::Cons(..)) {
            return;
        }
        let nil = Rc::new(Tree::Nil);
        let mut pending: Vec<Rc<Tree>> = Vec::new();
        if let Tree::Cons(left, right) = self {
            pending.push(mem::replace(left, Rc::clone(&nil)));
            pending.push(mem::replace(right, Rc::clone(&nil)));
        }
        while let Some(node) = pending.pop() {
            if let Ok(mut unshared) = Rc::try_unwrap(node) {
                if let Tree::Cons(left, right) = &mut unshared {
                    pending.push(mem::replace(left, Rc::clone(&nil)));
                    pending.push(mem::replace(right, Rc::clone(&nil)));
                }
            }
        }
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        enum Item<'t> {
            Tree(&'t Tree),
            Text(&'static str),
        }

        let mut pending = vec![Item::Tree(self)];
        while let Some(item) = pending.pop() {
            match item {
                Item::Text(text) => f.write_str(text)?,
                Item::Tree(Tree::Nil) => f.write_str("nil")?,
                Item::Tree(Tree::Cons(left, right)) => {
                    pending.push(Item::Text(")"));
                    pending.push(Item::Tree(right));
                    pending.push(Item::Text("."));
                    pending.push(Item::Tree(left));
                    pending.push(Item::Text("("));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_naturals() {
        assert_eq!(Tree::from_nat(0), Tree::Nil);
        for n in 0..8 {
            assert_eq!(Tree::from_nat(n + 1), Tree::cons(Tree::Nil, Tree::from_nat(n)));
        }
    }

    #[test]
    fn head_and_tail_project_pairs() {
        let pair = Tree::cons(Tree::from_nat(1), Tree::from_nat(2));
        assert_eq!(pair.hd(), Tree::from_nat(1));
        assert_eq!(pair.tl(), Tree::from_nat(2));
    }

    #[test]
    fn head_and_tail_of_nil_are_nil() {
        assert_eq!(Tree::Nil.hd(), Tree::Nil);
        assert_eq!(Tree::Nil.tl(), Tree::Nil);
    }

    #[test]
    fn equality_is_structural() {
        let shared = Rc::new(Tree::from_nat(3));
        let left = Tree::Cons(Rc::clone(&shared), Rc::clone(&shared));
        let right = Tree::cons(Tree::from_nat(3), Tree::from_nat(3));
        assert_eq!(left, right);
        assert_ne!(left, Tree::cons(Tree::from_nat(3), Tree::from_nat(4)));
    }

    #[test]
    fn compares_deep_trees_without_recursion() {
        let deep = Tree::from_nat(200_000);
        assert_eq!(deep, Tree::from_nat(200_000));
        assert_ne!(deep, Tree::from_nat(200_001));
    }

    #[test]
    fn displays_dot_notation() {
        assert_eq!(Tree::Nil.to_string(), "nil");
        let tree = Tree::cons(Tree::Nil, Tree::cons(Tree::Nil, Tree::Nil));
        assert_eq!(tree.to_string(), "(nil.(nil.nil))");
    }
}
