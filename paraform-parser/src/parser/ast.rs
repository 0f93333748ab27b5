//! The expression tree.
//!
//! A [`Node`] is either a leaf holding an opaque operand token (an identifier or a number, never
//! interpreted) or an internal node holding one of the four [`Op`]s and exactly two children. A
//! node with only one child cannot be represented; collaborators that hold trees in a
//! "value plus optional children" shape go through [`Node::try_from_parts`], which rejects them.
//!
//! Trees are never mutated after construction. Every rewrite in `paraform-compute` builds a new
//! tree, cloning the parts it does not touch.
//!
//! # Canonical rendering
//!
//! The [`Display`](fmt::Display) implementation renders every internal node fully parenthesized
//! and without whitespace, e.g. `((A+B)*C)`. Two trees with the same rendering have the same
//! shape and the same leaves, so the rendering doubles as the key used to deduplicate trees. It is
//! a structural check only: `(A+B)` and `(B+A)` are different keys.

use crate::parser::error::{kind, Error};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The precedence of a binary operator. Operators with higher precedence bind tighter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    /// Addition and subtraction.
    Term,

    /// Multiplication and division.
    Factor,

    /// Operands and parenthesized expressions. No operator has this precedence.
    Primary,
}

impl Precedence {
    /// Returns the next-highest precedence.
    pub fn next(self) -> Self {
        match self {
            Self::Term => Self::Factor,
            Self::Factor | Self::Primary => Self::Primary,
        }
    }
}

/// An arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Op {
    #[cfg_attr(feature = "serde", serde(rename = "+"))]
    Add,
    #[cfg_attr(feature = "serde", serde(rename = "-"))]
    Sub,
    #[cfg_attr(feature = "serde", serde(rename = "*"))]
    Mul,
    #[cfg_attr(feature = "serde", serde(rename = "/"))]
    Div,
}

impl Op {
    /// Every operator, in the order `+ - * /`.
    pub const ALL: [Op; 4] = [Op::Add, Op::Sub, Op::Mul, Op::Div];

    /// Returns the symbol of the operator.
    pub fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Sub => '-',
            Self::Mul => '*',
            Self::Div => '/',
        }
    }

    /// Returns the operator with the given symbol, if any.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(Self::Add),
            "-" => Some(Self::Sub),
            "*" => Some(Self::Mul),
            "/" => Some(Self::Div),
            _ => None,
        }
    }

    /// Returns the precedence of the operator.
    pub fn precedence(self) -> Precedence {
        match self {
            Self::Add | Self::Sub => Precedence::Term,
            Self::Mul | Self::Div => Precedence::Factor,
        }
    }

    /// Returns true if `(a op b) op c` equals `a op (b op c)`, which holds for `+` and `*`.
    pub fn is_associative(self) -> bool {
        matches!(self, Self::Add | Self::Mul)
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A node of the expression tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Node {
    /// An operand token, such as `A` or `3.5`.
    Leaf(String),

    /// An operator applied to two operands.
    Binary {
        /// The operator.
        op: Op,

        /// The left-hand side.
        lhs: Box<Node>,

        /// The right-hand side.
        rhs: Box<Node>,
    },
}

impl Node {
    /// Creates a leaf holding the given token.
    pub fn leaf(value: impl Into<String>) -> Self {
        Self::Leaf(value.into())
    }

    /// Creates an internal node joining `lhs` and `rhs` with `op`.
    pub fn binary(op: Op, lhs: Node, rhs: Node) -> Self {
        Self::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs) }
    }

    /// Creates a node from a value and its optional children.
    ///
    /// A node with no children is a leaf, whatever its value. A node with both children must hold
    /// one of `+ - * /`. A node with exactly one child is malformed.
    pub fn try_from_parts(
        value: impl Into<String>,
        lhs: Option<Node>,
        rhs: Option<Node>,
    ) -> Result<Self, Error> {
        let value = value.into();
        match (lhs, rhs) {
            (None, None) => Ok(Self::Leaf(value)),
            (Some(lhs), Some(rhs)) => match Op::from_symbol(&value) {
                Some(op) => Ok(Self::binary(op, lhs, rhs)),
                None => Err(Error::unspanned(kind::UnknownOperator { symbol: value })),
            },
            (Some(_), None) => Err(Error::unspanned(kind::MalformedNode { value, missing: "right" })),
            (None, Some(_)) => Err(Error::unspanned(kind::MalformedNode { value, missing: "left" })),
        }
    }

    /// Returns true if the node is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    /// Returns the operator of an internal node.
    pub fn op(&self) -> Option<Op> {
        match self {
            Self::Leaf(_) => None,
            Self::Binary { op, .. } => Some(*op),
        }
    }

    /// Returns the children of an internal node.
    pub fn children(&self) -> Option<(&Node, &Node)> {
        match self {
            Self::Leaf(_) => None,
            Self::Binary { lhs, rhs, .. } => Some((lhs, rhs)),
        }
    }

    /// Returns true if the node is an internal node with the given operator.
    pub fn is_op(&self, target: Op) -> bool {
        self.op() == Some(target)
    }

    /// Returns the canonical rendering of the tree. See the [module-level documentation](self).
    pub fn canonical(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf(value) => write!(f, "{}", value),
            Self::Binary { op, lhs, rhs } => write!(f, "({}{}{})", lhs, op, rhs),
        }
    }
}
