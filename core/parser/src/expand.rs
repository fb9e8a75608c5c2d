//! FILENAME: core/parser/src/expand.rs
//! PURPOSE: Turns a segment AST into the ordered list of variable groups.
//! CONTEXT: Third stage of the pipeline. Kept apart from the parser so the
//! grammar and the product expansion can be tested independently.
//!
//! RULES:
//! - Variable(v)  --> [[v]]
//! - Group(e)     --> expand(e)
//! - Add(items)   --> expand(item_1) ++ expand(item_2) ++ ...
//! - Nest(items)  --> Cartesian product of expand(item_i), leftmost slot
//!                    varying slowest, each combination concatenated in order.
//!
//! Example: `q5 + (q2 + q3) > (q4 + q5) > q6` expands to
//! [q5], [q2,q4,q6], [q2,q5,q6], [q3,q4,q6], [q3,q5,q6].

use crate::ast::GroupExpr;
use crate::table_spec::GroupSpec;

/// Expands an AST into groups. Always returns at least one group.
pub fn expand(expr: &GroupExpr) -> Vec<GroupSpec> {
    match expr {
        GroupExpr::Variable(name) => vec![GroupSpec::single(name.clone())],
        GroupExpr::Group(inner) => expand(inner),
        GroupExpr::Add(items) => items.iter().flat_map(expand).collect(),
        GroupExpr::Nest(items) => {
            let slots: Vec<Vec<GroupSpec>> = items.iter().map(expand).collect();
            cartesian_product(&slots)
        }
    }
}

/// Product over slots. Single-valued slots stay fixed; multi-valued slots
/// multiply the number of combinations.
fn cartesian_product(slots: &[Vec<GroupSpec>]) -> Vec<GroupSpec> {
    let mut combinations = vec![GroupSpec::default()];

    for slot in slots {
        let mut next = Vec::with_capacity(combinations.len() * slot.len());
        for prefix in &combinations {
            for alternative in slot {
                next.push(prefix.concat(alternative));
            }
        }
        combinations = next;
    }

    combinations
}
