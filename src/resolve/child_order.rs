// Mon Oct 19 2026 - Alex

use crate::schema::{DefId, DepTarget, SchemaError, SchemaResult, TypeGraph, TypeKind};

pub const MAX_REORDER_PASSES: usize = 100;

/// Orders the nested children of `owner` so that a child used by an earlier
/// sibling is moved in front of it. Swaps one pair per pass and gives up
/// with [`SchemaError::CyclicChildScopes`] once the pass ceiling is hit.
pub fn order_children(graph: &TypeGraph, owner: DefId) -> SchemaResult<Vec<DefId>> {
    let mut ordered = graph.def(owner).children().to_vec();
    let mut passes = 0;

    while swap_first_misordered(graph, &mut ordered)? {
        passes += 1;
        if passes > MAX_REORDER_PASSES {
            return Err(SchemaError::CyclicChildScopes(graph.def(owner).name.clone()));
        }
    }

    if passes > 0 {
        log::debug!("Reordered children of {} in {} passes", graph.def(owner).name, passes);
    }
    Ok(ordered)
}

fn swap_first_misordered(graph: &TypeGraph, children: &mut [DefId]) -> SchemaResult<bool> {
    for later in 0..children.len() {
        for earlier in 0..later {
            if references(graph, children[earlier], children[later])? {
                children.swap(earlier, later);
                return Ok(true);
            }
        }
    }
    Ok(false)
}

/// Whether any member of `from` depends on `target`, at any strength.
fn references(graph: &TypeGraph, from: DefId, target: DefId) -> SchemaResult<bool> {
    let def = graph.def(from);
    if def.kind() != TypeKind::Class {
        return Ok(false);
    }

    for member in def.members()? {
        let hit = member
            .subtype
            .dependencies(graph, true)
            .iter()
            .any(|dep| dep.target == DepTarget::Def(target));
        if hit {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::graph::tests::graph_from;
    use serde_json::json;

    fn member_of(name: &str, idx: i64) -> serde_json::Value {
        json!({ "name": name, "offset": 0, "traits": { "subtype": { "type": "ref", "ref_idx": idx } } })
    }

    #[test]
    fn test_dependent_sibling_moves_back() {
        let graph = graph_from(json!({ "defs": [
            { "name": "COuter", "type": "class", "size": 8, "alignment": 4, "traits": { "child_class_idx": [1, 2] } },
            { "name": "COuter::First", "type": "class", "size": 4, "alignment": 4, "traits": {
                "parent_class_idx": 0, "members": [member_of("m_second", 2)]
            }},
            { "name": "COuter::Second", "type": "class", "size": 4, "alignment": 4, "traits": { "parent_class_idx": 0 } }
        ]}));

        let outer = graph.find("COuter").unwrap();
        let ordered = order_children(&graph, outer).unwrap();
        let names: Vec<&str> = ordered.iter().map(|id| graph.def(*id).name.as_str()).collect();
        assert_eq!(names, vec!["COuter::Second", "COuter::First"]);
    }

    #[test]
    fn test_independent_children_keep_order() {
        let graph = graph_from(json!({ "defs": [
            { "name": "COuter", "type": "class", "size": 8, "alignment": 4, "traits": { "child_class_idx": [1, 2] } },
            { "name": "COuter::A", "type": "class", "size": 4, "alignment": 4, "traits": { "parent_class_idx": 0 } },
            { "name": "COuter::B", "type": "enum", "size": 4, "alignment": 4, "traits": { "parent_class_idx": 0, "fields": [] } }
        ]}));

        let outer = graph.find("COuter").unwrap();
        assert_eq!(order_children(&graph, outer).unwrap(), graph.def(outer).children().to_vec());
    }

    #[test]
    fn test_cyclic_children_are_fatal() {
        let graph = graph_from(json!({ "defs": [
            { "name": "COuter", "type": "class", "size": 8, "alignment": 4, "traits": { "child_class_idx": [1, 2] } },
            { "name": "COuter::Ping", "type": "class", "size": 8, "alignment": 8, "traits": {
                "parent_class_idx": 0,
                "members": [{ "name": "m_pong", "offset": 0, "traits": { "subtype": { "type": "ptr", "subtype": { "type": "ref", "ref_idx": 2 } } } }]
            }},
            { "name": "COuter::Pong", "type": "class", "size": 8, "alignment": 8, "traits": {
                "parent_class_idx": 0,
                "members": [{ "name": "m_ping", "offset": 0, "traits": { "subtype": { "type": "ptr", "subtype": { "type": "ref", "ref_idx": 1 } } } }]
            }}
        ]}));

        let outer = graph.find("COuter").unwrap();
        assert!(matches!(order_children(&graph, outer), Err(SchemaError::CyclicChildScopes(name)) if name == "COuter"));
    }
}
