use std::collections::HashMap;

use thiserror::Error;

use crate::record::Record;

/// Deepest level below a root that `build_forest` accepts. Building, walking
/// and layout recurse once per level.
pub const MAX_DEPTH: usize = 512;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HierarchyError {
    #[error("duplicate record id `{0}`")]
    DuplicateId(String),
    #[error("cyclic parent references: {}", cycle.join(" -> "))]
    CyclicHierarchy { cycle: Vec<String> },
    #[error("record `{id}` is nested deeper than {max} levels")]
    TooDeep { id: String, max: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub record: Record,
    /// Sorted ascending by `record.position`.
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn id(&self) -> &str {
        &self.record.id
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    fn count(&self) -> usize {
        1 + self.children.iter().map(TreeNode::count).sum::<usize>()
    }

    fn find(&self, id: &str) -> Option<&TreeNode> {
        if self.id() == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    fn walk<'a>(&'a self, depth: usize, visit: &mut impl FnMut(&'a TreeNode, usize)) {
        visit(self, depth);
        for child in &self.children {
            child.walk(depth + 1, visit);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Forest {
    /// Root nodes in input order.
    pub roots: Vec<TreeNode>,
    /// Ids of records dropped because their parent does not exist.
    pub orphans: Vec<String>,
}

impl Forest {
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.roots.iter().map(TreeNode::count).sum()
    }

    pub fn find(&self, id: &str) -> Option<&TreeNode> {
        self.roots.iter().find_map(|root| root.find(id))
    }

    /// Pre-order traversal of every node, collapsed or not, with its depth.
    pub fn walk<'a>(&'a self, mut visit: impl FnMut(&'a TreeNode, usize)) {
        for root in &self.roots {
            root.walk(0, &mut visit);
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    Visiting,
    /// Depth below the top of the record's parent chain.
    Done(usize),
}

/// Builds the forest from flat records.
///
/// Records whose `parent_id` names an unknown record are dropped together with
/// their descendants and listed in [`Forest::orphans`]. Children are sorted by
/// `position`; ties keep input order.
pub fn build_forest(records: &[Record]) -> Result<Forest, HierarchyError> {
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(records.len());
    for (idx, record) in records.iter().enumerate() {
        if index.insert(record.id.as_str(), idx).is_some() {
            return Err(HierarchyError::DuplicateId(record.id.clone()));
        }
    }

    let parent_of = |idx: usize| -> Option<usize> {
        records[idx]
            .parent_id
            .as_deref()
            .and_then(|parent| index.get(parent).copied())
    };
    check_parent_chains(records, parent_of)?;

    let mut children_of: HashMap<usize, Vec<usize>> = HashMap::new();
    let mut roots = Vec::new();
    let mut orphans = Vec::new();
    for (idx, record) in records.iter().enumerate() {
        match record.parent_id.as_deref() {
            None => roots.push(idx),
            Some(parent) => match index.get(parent) {
                Some(&parent_idx) => children_of.entry(parent_idx).or_default().push(idx),
                None => {
                    tracing::warn!(
                        id = %record.id,
                        parent_id = %parent,
                        "dropping record whose parent does not exist"
                    );
                    orphans.push(record.id.clone());
                }
            },
        }
    }

    let forest = Forest {
        roots: roots
            .into_iter()
            .map(|idx| assemble(idx, records, &children_of))
            .collect(),
        orphans,
    };
    tracing::debug!(
        records = records.len(),
        roots = forest.roots.len(),
        nodes = forest.node_count(),
        "built hierarchy"
    );
    Ok(forest)
}

/// Walks every parent chain once, iteratively, failing on cycles and on
/// rooted chains deeper than [`MAX_DEPTH`]. Chains ending at a missing parent
/// are dropped later and are not depth checked.
fn check_parent_chains(
    records: &[Record],
    parent_of: impl Fn(usize) -> Option<usize>,
) -> Result<(), HierarchyError> {
    let mut marks = vec![Mark::Unvisited; records.len()];
    let mut rooted = vec![false; records.len()];
    for start in 0..records.len() {
        let mut trail = Vec::new();
        let mut cursor = Some(start);
        // Depth and rootedness of the node just above the trail's top.
        let mut above: Option<(usize, bool)> = None;
        while let Some(idx) = cursor {
            match marks[idx] {
                Mark::Done(depth) => {
                    above = Some((depth, rooted[idx]));
                    break;
                }
                Mark::Visiting => {
                    let entry = trail.iter().position(|&t| t == idx).unwrap_or(0);
                    let mut cycle: Vec<String> = trail[entry..]
                        .iter()
                        .map(|&t: &usize| records[t].id.clone())
                        .collect();
                    cycle.push(records[idx].id.clone());
                    return Err(HierarchyError::CyclicHierarchy { cycle });
                }
                Mark::Unvisited => {
                    marks[idx] = Mark::Visiting;
                    trail.push(idx);
                    cursor = parent_of(idx);
                }
            }
        }

        let (mut depth, is_rooted) = match above {
            Some((depth, is_rooted)) => (depth + 1, is_rooted),
            None => match trail.last() {
                Some(&top) => (0, records[top].parent_id.is_none()),
                None => continue,
            },
        };
        for &idx in trail.iter().rev() {
            if is_rooted && depth > MAX_DEPTH {
                return Err(HierarchyError::TooDeep {
                    id: records[idx].id.clone(),
                    max: MAX_DEPTH,
                });
            }
            marks[idx] = Mark::Done(depth);
            rooted[idx] = is_rooted;
            depth += 1;
        }
    }
    Ok(())
}

fn assemble(idx: usize, records: &[Record], children_of: &HashMap<usize, Vec<usize>>) -> TreeNode {
    let mut children: Vec<TreeNode> = children_of
        .get(&idx)
        .map(|kids| {
            kids.iter()
                .map(|&child| assemble(child, records, children_of))
                .collect()
        })
        .unwrap_or_default();
    children.sort_by_key(|child| child.record.position);
    TreeNode {
        record: records[idx].clone(),
        children,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: &str, parent: Option<&str>, position: i64) -> Record {
        Record::new(id, parent, position, format!("Node {id}"))
    }

    #[test]
    fn sorts_children_by_position() {
        let records = vec![
            rec("1", None, 0),
            rec("c", Some("1"), 2),
            rec("a", Some("1"), 0),
            rec("b", Some("1"), 1),
        ];
        let forest = build_forest(&records).unwrap();
        assert_eq!(forest.roots.len(), 1);
        let order: Vec<&str> = forest.roots[0].children.iter().map(TreeNode::id).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn equal_positions_keep_input_order() {
        let records = vec![
            rec("1", None, 0),
            rec("y", Some("1"), 3),
            rec("x", Some("1"), 3),
        ];
        let forest = build_forest(&records).unwrap();
        let order: Vec<&str> = forest.roots[0].children.iter().map(TreeNode::id).collect();
        assert_eq!(order, vec!["y", "x"]);
    }

    #[test]
    fn roots_follow_input_order() {
        let records = vec![rec("b", None, 5), rec("a", None, 0)];
        let forest = build_forest(&records).unwrap();
        let order: Vec<&str> = forest.roots.iter().map(TreeNode::id).collect();
        assert_eq!(order, vec!["b", "a"]);
    }

    #[test]
    fn orphans_are_dropped_with_their_subtree() {
        let records = vec![
            rec("1", None, 0),
            rec("2", Some("1"), 0),
            rec("3", Some("missing"), 0),
            rec("4", Some("3"), 0),
        ];
        let forest = build_forest(&records).unwrap();
        assert_eq!(forest.node_count(), 2);
        assert_eq!(forest.orphans, vec!["3".to_string()]);
        assert!(forest.find("4").is_none());
    }

    #[test]
    fn detects_cycles() {
        let records = vec![
            rec("root", None, 0),
            rec("a", Some("c"), 0),
            rec("b", Some("a"), 0),
            rec("c", Some("b"), 0),
        ];
        let err = build_forest(&records).unwrap_err();
        match err {
            HierarchyError::CyclicHierarchy { cycle } => {
                assert_eq!(cycle.first(), cycle.last());
                assert_eq!(cycle.len(), 4);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn detects_self_parent() {
        let records = vec![rec("a", Some("a"), 0)];
        assert_eq!(
            build_forest(&records),
            Err(HierarchyError::CyclicHierarchy {
                cycle: vec!["a".to_string(), "a".to_string()]
            })
        );
    }

    fn chain(len: usize) -> Vec<Record> {
        (0..len)
            .map(|idx| {
                let parent = idx.checked_sub(1).map(|p| p.to_string());
                rec(&idx.to_string(), parent.as_deref(), 0)
            })
            .collect()
    }

    #[test]
    fn accepts_chain_at_depth_limit() {
        let forest = build_forest(&chain(MAX_DEPTH + 1)).unwrap();
        assert_eq!(forest.node_count(), MAX_DEPTH + 1);
    }

    #[test]
    fn rejects_chain_past_depth_limit() {
        // Reversed input so depths are resolved through already finished chains.
        let mut records = chain(MAX_DEPTH * 4);
        records.reverse();
        let err = build_forest(&records).unwrap_err();
        assert_eq!(
            err,
            HierarchyError::TooDeep {
                id: (MAX_DEPTH + 1).to_string(),
                max: MAX_DEPTH
            }
        );
    }

    #[test]
    fn deep_orphan_chain_is_dropped_not_rejected() {
        let mut records = chain(MAX_DEPTH + 10);
        records[0].parent_id = Some("missing".to_string());
        records.push(rec("root", None, 0));
        let forest = build_forest(&records).unwrap();
        assert_eq!(forest.node_count(), 1);
        assert_eq!(forest.orphans, vec!["0".to_string()]);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let records = vec![rec("1", None, 0), rec("1", None, 1)];
        assert_eq!(
            build_forest(&records),
            Err(HierarchyError::DuplicateId("1".to_string()))
        );
    }

    #[test]
    fn walk_reports_depths() {
        let records = vec![
            rec("1", None, 0),
            rec("2", Some("1"), 0),
            rec("3", Some("2"), 0),
        ];
        let forest = build_forest(&records).unwrap();
        let mut seen = Vec::new();
        forest.walk(|node, depth| seen.push((node.id().to_string(), depth)));
        assert_eq!(
            seen,
            vec![
                ("1".to_string(), 0),
                ("2".to_string(), 1),
                ("3".to_string(), 2)
            ]
        );
    }
}
