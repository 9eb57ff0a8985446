//! Duplicate-name detection

use crate::code::Code;
use crate::context::ValidationContext;
use crate::diagnostic::Findings;
use std::collections::HashMap;
use tarmac_core::NodeId;

/// Group `ids` by name, keeping groups in order of first appearance
pub fn group_by_name<'g>(ctx: &ValidationContext<'g>, ids: &[NodeId]) -> Vec<(&'g str, Vec<NodeId>)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<NodeId>)> = Vec::new();
    for &id in ids {
        let name = ctx.graph.name(id);
        match index.get(name) {
            Some(&i) => groups[i].1.push(id),
            None => {
                index.insert(name, groups.len());
                groups.push((name, vec![id]));
            }
        }
    }
    groups
}

/// One diagnostic per name shared by more than one node. Returns whether any
/// duplicate was found.
pub fn check_duplicate_names(ctx: &ValidationContext, kind: &str, ids: &[NodeId], out: &mut Findings) -> bool {
    let mut found = false;
    for (name, members) in group_by_name(ctx, ids) {
        if members.len() > 1 {
            found = true;
            out.emit(
                Code::DuplicateName,
                format!("The {} name '{}' is used {} times.", kind, name, members.len()),
                members,
            );
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValidationConfig;
    use crate::diagnostic::DiagnosticList;
    use tarmac_scene::{Entity, SceneGraph};

    fn graph_with(names: &[&str]) -> (SceneGraph, Vec<NodeId>) {
        let mut g = SceneGraph::new();
        let ids = names
            .iter()
            .map(|n| g.add(g.root(), *n, Entity::Group).unwrap())
            .collect();
        (g, ids)
    }

    fn run(g: &SceneGraph, ids: &[NodeId]) -> (bool, DiagnosticList) {
        let config = ValidationConfig::default();
        let ctx = ValidationContext::new(g, &config);
        let mut list = DiagnosticList::new();
        let mut out = Findings::new(&mut list, None, config.export_target);
        let found = check_duplicate_names(&ctx, "ramp", ids, &mut out);
        (found, list)
    }

    #[test]
    fn test_unique_names_are_clean() {
        let (g, ids) = graph_with(&["A1", "A2", "A3", "B1"]);
        let (found, list) = run(&g, &ids);
        assert!(!found);
        assert!(list.is_empty());
    }

    #[test]
    fn test_one_repeat_gives_one_diagnostic_of_two() {
        let (g, ids) = graph_with(&["A1", "A2", "A1", "B1"]);
        let (found, list) = run(&g, &ids);
        assert!(found);
        assert_eq!(list.len(), 1);
        assert_eq!(list.as_slice()[0].nodes(), &[ids[0], ids[2]]);
    }

    #[test]
    fn test_groups_in_first_appearance_order() {
        let (g, ids) = graph_with(&["B", "A", "A", "B", "B"]);
        let (_, list) = run(&g, &ids);
        assert_eq!(list.len(), 2);
        assert_eq!(list.as_slice()[0].nodes().len(), 3);
        assert_eq!(list.as_slice()[1].nodes().len(), 2);
    }
}
