#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A rewrite applied while reshaping a tree into its parallel form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Step {
    /// `a/b/c/d = a/((b*c)*d)`
    DivisionChain,

    /// `a-b-c-d = a-((b+c)+d)`
    SubtractionChain,

    /// A chain of three or more `+` or `*` operands was rebuilt as a balanced tree.
    Rebalance,
}
