//! Generation of algebraically equivalent forms of a tree.
//!
//! Two families of rewrites are supported:
//!
//! - [`assoc`]: regrouping chains of `+` or `*` (associativity).
//! - [`distribute`]: distributing `*` over `+` and factoring it back out (distributivity).
//!
//! Both generators explore breadth-first from the base tree and deduplicate forms by their
//! canonical rendering. Neither assumes commutativity, so operand order never changes. The
//! number of forms can grow very quickly, so both take a cap on the number of results and stop
//! silently once it is reached; the result is then a prefix of the full breadth-first order.

pub mod assoc;
pub mod distribute;

use log::debug;
use paraform_parser::parser::ast::Node;
use std::collections::{HashSet, VecDeque};

pub use assoc::{assoc_generate, parenthesizations};
pub use distribute::{dist_generate, dist_rewrites};

/// The breadth-first work list shared by the generators.
///
/// Forms are kept in discovery order, and each distinct rendering is only accepted once.
#[derive(Debug)]
struct Discovered {
    max_results: usize,
    seen: HashSet<String>,
    forms: Vec<Node>,
    queue: VecDeque<(Node, usize)>,
}

impl Discovered {
    /// Creates a work list seeded with the base tree, at depth zero.
    fn new(base: &Node, max_results: usize) -> Self {
        let mut discovered = Self {
            max_results,
            seen: HashSet::new(),
            forms: Vec::new(),
            queue: VecDeque::new(),
        };
        if max_results > 0 {
            discovered.push(base.clone(), 0);
        }
        discovered
    }

    /// Records a form reached after `depth` rewrites, unless an identical form was already seen.
    fn push(&mut self, form: Node, depth: usize) {
        if self.is_full() || !self.seen.insert(form.canonical()) {
            return;
        }
        self.queue.push_back((form.clone(), depth));
        self.forms.push(form);
    }

    /// Returns the next form to expand, if the cap has not been reached.
    fn pop(&mut self) -> Option<(Node, usize)> {
        if self.is_full() {
            return None;
        }
        self.queue.pop_front()
    }

    fn is_full(&self) -> bool {
        self.forms.len() >= self.max_results
    }

    /// Returns every form discovered, in discovery order.
    fn into_forms(self, generator: &str) -> Vec<Node> {
        if self.is_full() && !self.queue.is_empty() {
            debug!("{} generator stopped at its cap of {} forms", generator, self.max_results);
        }
        self.forms
    }
}
