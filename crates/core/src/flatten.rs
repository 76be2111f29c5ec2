use crate::model::NodeRecord;
use crate::parser::SyntaxNode;

/// Flattens a normalized parse tree into pre-order node records.
///
/// Ids are assigned in visit order, root first, so a parent's id is always
/// smaller than any descendant's. Child ids are recorded in left-to-right
/// order but are not necessarily contiguous once siblings recurse.
///
/// The traversal uses an explicit stack; generated or malformed source can
/// nest thousands of levels deep.
pub fn flatten(root: &SyntaxNode) -> Vec<NodeRecord> {
    let mut records: Vec<NodeRecord> = Vec::new();
    let mut stack: Vec<(&SyntaxNode, Option<usize>)> = vec![(root, None)];

    while let Some((node, parent)) = stack.pop() {
        let id = records.len();
        if let Some(parent_id) = parent {
            records[parent_id].children.push(id);
        }
        records.push(NodeRecord {
            id,
            kind: node.kind.clone(),
            value: node.value.clone(),
            children: Vec::with_capacity(node.children.len()),
        });
        for child in node.children.iter().rev() {
            stack.push((child, Some(id)));
        }
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ScalarValue;

    fn sample_tree() -> SyntaxNode {
        // program
        // ├── binary_expression
        // │   ├── 1
        // │   └── 2
        // └── identifier "x"
        SyntaxNode::with_children(
            "program",
            vec![
                SyntaxNode::with_children(
                    "binary_expression",
                    vec![
                        SyntaxNode::leaf("decimal_integer_literal", ScalarValue::Int(1)),
                        SyntaxNode::leaf("decimal_integer_literal", ScalarValue::Int(2)),
                    ],
                ),
                SyntaxNode::leaf("identifier", ScalarValue::from("x")),
            ],
        )
    }

    /// Rebuilds a tree from the flattened records via the `children` links.
    fn rebuild(records: &[NodeRecord], id: usize) -> SyntaxNode {
        let record = &records[id];
        SyntaxNode {
            kind: record.kind.clone(),
            value: record.value.clone(),
            children: record
                .children
                .iter()
                .map(|&child| rebuild(records, child))
                .collect(),
        }
    }

    fn assert_preorder_invariants(records: &[NodeRecord]) {
        assert_eq!(records[0].id, 0);
        for (position, record) in records.iter().enumerate() {
            assert_eq!(record.id, position);
            for &child in &record.children {
                assert!(child > record.id, "child {} <= parent {}", child, record.id);
                assert!(child < records.len());
            }
        }
    }

    #[test]
    fn assigns_preorder_ids_from_zero() {
        let records = flatten(&sample_tree());
        assert_eq!(records.len(), 5);
        assert_preorder_invariants(&records);

        assert_eq!(records[0].kind, "program");
        assert_eq!(records[0].children, vec![1, 4]);
        assert_eq!(records[1].kind, "binary_expression");
        assert_eq!(records[1].children, vec![2, 3]);
        assert_eq!(records[4].kind, "identifier");
        assert_eq!(records[4].value, Some(ScalarValue::from("x")));
    }

    #[test]
    fn single_node_tree() {
        let records = flatten(&SyntaxNode::leaf("identifier", ScalarValue::from("y")));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, 0);
        assert!(records[0].children.is_empty());
    }

    #[test]
    fn roundtrips_small_synthetic_trees() {
        let mut trees = vec![
            sample_tree(),
            SyntaxNode::new("program"),
            SyntaxNode::with_children(
                "program",
                (0..10)
                    .map(|i| SyntaxNode::leaf("identifier", ScalarValue::Int(i)))
                    .collect(),
            ),
        ];
        // Uneven 5-level tree.
        let mut deep = SyntaxNode::leaf("identifier", ScalarValue::Bool(true));
        for kind in ["block", "if_statement", "method_declaration", "program"] {
            deep = SyntaxNode::with_children(
                kind,
                vec![deep.clone(), SyntaxNode::leaf("comment", ScalarValue::from("//"))],
            );
        }
        trees.push(deep);

        for tree in trees {
            let records = flatten(&tree);
            assert_preorder_invariants(&records);
            assert_eq!(rebuild(&records, 0), tree);
        }
    }

    #[test]
    fn survives_pathological_nesting_depth() {
        let mut tree = SyntaxNode::leaf("decimal_integer_literal", ScalarValue::Int(0));
        let depth = 50_000;
        for _ in 0..depth {
            tree = SyntaxNode::with_children("parenthesized_expression", vec![tree]);
        }

        let records = flatten(&tree);
        assert_eq!(records.len(), depth + 1);
        assert_preorder_invariants(&records);
        // Linear chain: each parent has exactly its successor as child.
        assert_eq!(records[depth - 1].children, vec![depth]);
        // The chain is dropped here; `SyntaxNode`'s iterative teardown keeps
        // that stack-safe too.
    }
}
