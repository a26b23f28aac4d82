//! Two-level LanguaL hierarchy.
//!
//! Rows arrive flattened: a code, its descriptor and, when it has one, its
//! parent's code and descriptor. Either side may come first, so every write
//! is "get or create the top-level node, then mutate it".

use indexmap::IndexMap;

use crate::model::{LangualChild, LangualNode, LangualRow};

/// Fold LanguaL rows into top-level nodes, in first-reference order.
pub fn build(rows: Vec<LangualRow>) -> Vec<LangualNode> {
    let mut nodes: IndexMap<String, LangualNode> = IndexMap::new();

    for row in rows {
        match row.parent_code {
            None => {
                let node = nodes
                    .entry(row.code.clone())
                    .or_insert_with(|| LangualNode {
                        code: row.code,
                        descriptor: String::new(),
                        children: Vec::new(),
                    });
                node.descriptor = row.descriptor;
            }
            Some(parent_code) => {
                let child = LangualChild {
                    code: row.code,
                    descriptor: row.descriptor,
                };

                let parent_descriptor = row.parent_descriptor;
                let node = nodes
                    .entry(parent_code.clone())
                    .or_insert_with(|| LangualNode {
                        code: parent_code,
                        descriptor: parent_descriptor.unwrap_or_default(),
                        children: Vec::new(),
                    });
                node.children.push(child);
            }
        }
    }

    nodes.into_values().collect()
}
