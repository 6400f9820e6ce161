// src/tree/diff.rs

use crate::tree::node::ConfigNode;

/// Structural inequality of two optional subtrees.
///
/// - both absent: equal
/// - exactly one absent: different
/// - different child counts: different
/// - otherwise different iff a label is missing on the other side or a
///   shared label's subtrees differ.
///
/// Child order never matters.
pub fn differs(a: Option<&ConfigNode>, b: Option<&ConfigNode>) -> bool {
    match (a, b) {
        (None, None) => false,
        (Some(_), None) | (None, Some(_)) => true,
        (Some(a), Some(b)) => {
            if a.len() != b.len() {
                return true;
            }
            a.children().any(|(label, a_child)| match b.child(label) {
                None => true,
                Some(b_child) => differs(Some(a_child), Some(b_child)),
            })
        }
    }
}
