//! Beam search over equivalent forms.

use log::debug;
use paraform_parser::parser::ast::Node;
use std::collections::HashSet;
use crate::{
    equiv::{dist_rewrites, parenthesizations},
    error::Error,
    tree::{collect_chain, preorder, replace},
};
use super::{sort_candidates, Candidate, SearchOptions};

/// Returns the forms one rewrite away from `root`.
///
/// First come up to `assoc_limit` regroupings: the nodes of `root` are visited in preorder, and
/// every `+` or `*` node whose chain has three or more operands contributes the parenthesizations
/// of that chain that differ from the node itself. Then come up to `dist_limit` distributive
/// rewrites, again visiting the nodes in preorder.
pub fn neighbors(root: &Node, assoc_limit: usize, dist_limit: usize) -> Vec<Node> {
    let mut out = Vec::new();

    if assoc_limit > 0 {
        'nodes: for (id, node) in preorder(root) {
            let Some(op) = node.op().filter(|op| op.is_associative()) else {
                continue;
            };

            let operands = collect_chain(node, op);
            if operands.len() < 3 {
                continue;
            }

            let current = node.canonical();
            for variant in parenthesizations(op, &operands, assoc_limit + 1) {
                if variant.canonical() == current {
                    continue;
                }
                out.push(replace(root, id, variant));
                if out.len() >= assoc_limit {
                    break 'nodes;
                }
            }
        }
    }

    let regrouped = out.len();
    for (id, node) in preorder(root) {
        for rewrite in dist_rewrites(node) {
            if out.len() - regrouped >= dist_limit {
                return out;
            }
            out.push(replace(root, id, rewrite));
        }
    }

    out
}

/// Searches outward from `base`, keeping the best [`beam_width`] neighbors of each round.
///
/// Each round scores the frontier's forms that have not been visited yet, then replaces the
/// frontier with the best neighbors of those forms. The search stops after
/// [`rounds`](SearchOptions::rounds) rounds or when the frontier runs dry. Returns the best
/// [`top_k`](SearchOptions::top_k) visited candidates, best first.
///
/// [`beam_width`]: SearchOptions::beam_width
pub fn beam_search(base: &Node, options: &SearchOptions) -> Result<Vec<Candidate>, Error> {
    let machine = options.machine()?;
    let score = |form: Node| Candidate::evaluate(0, form, &options.costs, &machine);

    let mut seen = HashSet::new();
    let mut visited = Vec::new();
    let mut frontier = vec![score(base.clone())?];

    for round in 0..options.rounds {
        let mut next = Vec::new();
        for mut candidate in frontier {
            if !seen.insert(candidate.rendering.clone()) {
                continue;
            }

            for neighbor in neighbors(&candidate.form, options.neighbors_assoc, options.neighbors_dist) {
                next.push(score(neighbor)?);
            }

            candidate.index = visited.len() + 1;
            visited.push(candidate);
        }

        sort_candidates(&mut next);
        next.truncate(options.beam_width);
        debug!(
            "beam round {}: {} visited, {} in frontier, best makespan {:?}",
            round + 1,
            visited.len(),
            next.len(),
            next.first().map(|candidate| candidate.metrics.makespan),
        );

        frontier = next;
        if frontier.is_empty() {
            break;
        }
    }

    sort_candidates(&mut visited);
    visited.truncate(options.top_k);
    Ok(visited)
}
