//! Table-name hierarchy helpers.
//!
//! Child tables are named `parent.child`; the catalog is displayed as a tree,
//! so every parent must come directly before its descendants.

use std::cmp::Ordering;

const SYSTEM_PREFIX: &str = "SYS$";

pub fn is_system_table(name: &str) -> bool {
    name.starts_with(SYSTEM_PREFIX)
}

/// Drop system tables and order names for tree display.
///
/// Names compare segment by segment (split on `.`), so `users` precedes
/// `users.orders`, which precedes `users.orders.items`, and siblings are
/// alphabetical (case-insensitive first, then exact).
pub fn sort_table_tree(names: Vec<String>) -> Vec<String> {
    let mut names: Vec<String> = names.into_iter().filter(|n| !is_system_table(n)).collect();
    names.sort_by(|a, b| compare_tree(a, b));
    names.dedup();
    names
}

fn compare_tree(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ord = x
                    .to_lowercase()
                    .cmp(&y.to_lowercase())
                    .then_with(|| x.cmp(y));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

/// Nesting level: 0 for top-level tables.
pub fn table_depth(name: &str) -> usize {
    name.matches('.').count()
}

/// Last dotted segment.
pub fn leaf_name(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

pub fn parent_table(name: &str) -> Option<&str> {
    name.rfind('.').map(|i| &name[..i])
}

/// Ancestor table names, outermost first.
pub fn ancestors(name: &str) -> Vec<String> {
    let mut result = Vec::new();
    let mut current = parent_table(name);
    while let Some(parent) = current {
        result.push(parent.to_string());
        current = parent_table(parent);
    }
    result.reverse();
    result
}
