//! C9 — Status Serializer (§4.9): a deterministic, insertion-ordered
//! nested map. Dependencies are recursed into before the owning node's
//! own map is closed off (dependency-subtree-first), and a `trace` set
//! guards against cycles in the dependency graph the same way the
//! name-status and RRSIG evaluators do.

use crate::graph::NameGraph;
use crate::ids::NodeId;
use serde_json::{Map, Value};

const VERSION: &str = "1.0";

pub fn serialize(graph: &NameGraph, root: NodeId) -> Value {
    let mut trace = Vec::new();
    let mut top = Map::new();
    top.insert("version".to_string(), Value::String(VERSION.to_string()));
    top.insert("name".to_string(), serialize_node(graph, root, &mut trace));
    Value::Object(top)
}

fn serialize_node(graph: &NameGraph, node_id: NodeId, trace: &mut Vec<NodeId>) -> Value {
    if trace.contains(&node_id) {
        return Value::String("<cycle>".to_string());
    }
    trace.push(node_id);

    let node = graph.node(node_id);
    let mut map = Map::new();

    map.insert("name".to_string(), Value::String(node.name.clone()));
    map.insert(
        "status".to_string(),
        node.status
            .map(|s| Value::String(s.as_str().to_string()))
            .unwrap_or(Value::Null),
    );

    let mut yxdomain: Vec<&String> = node.yxdomain.iter().collect();
    yxdomain.sort();
    map.insert(
        "yxdomain".to_string(),
        Value::Array(yxdomain.into_iter().map(|s| Value::String(s.clone())).collect()),
    );

    let mut rrsets = Map::new();
    for r in &node.rrsets {
        let key = format!("{}/{}", r.owner, r.rdtype.as_str());
        let status = r
            .response_component_status
            .map(|s| s.as_str())
            .unwrap_or("UNKNOWN");
        rrsets.insert(key, Value::String(status.to_string()));
    }
    map.insert("rrsets".to_string(), Value::Object(rrsets));

    let mut delegation_entries: Vec<(&str, &str)> = node
        .delegation
        .iter()
        .filter_map(|(rdtype, info)| info.status.map(|s| (rdtype.as_str(), s.as_str())))
        .collect();
    delegation_entries.sort();
    let mut delegation = Map::new();
    for (rdtype, status) in delegation_entries {
        delegation.insert(rdtype.to_string(), Value::String(status.to_string()));
    }
    map.insert("delegation".to_string(), Value::Object(delegation));

    let mut negatives = Map::new();
    for n in &node.negative_responses {
        let key = format!("{}/{}", n.qname, n.rdtype.as_str());
        let status = n
            .response_component_status
            .map(|s| s.as_str())
            .unwrap_or("UNKNOWN");
        negatives.insert(key, Value::String(status.to_string()));
    }
    map.insert("negative_responses".to_string(), Value::Object(negatives));

    let mut dependency_names: Vec<&String> = node.cname_targets.keys().collect();
    dependency_names.sort();
    let mut dependencies = Map::new();
    for target_name in dependency_names {
        if let Some(Some(target_id)) = node.cname_targets.get(target_name) {
            dependencies.insert(target_name.clone(), serialize_node(graph, *target_id, trace));
        }
    }
    map.insert("dependencies".to_string(), Value::Object(dependencies));

    trace.pop();
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::{ComponentStatus, NameStatus};
    use crate::graph::AnalysisType;
    use crate::graph::NameNode;
    use crate::types::RrsetInfo;
    use dnssec_analysis_domain::RecordType;

    #[test]
    fn serializes_name_status_and_rrset_component_status() {
        let mut graph = NameGraph::new();
        let mut node = NameNode::new("example.", AnalysisType::Authoritative, 1000);
        node.status = Some(NameStatus::NoError);
        let mut rrset = RrsetInfo::new("example.".into(), RecordType::A, 300);
        rrset.response_component_status = Some(ComponentStatus::Secure);
        node.push_rrset(rrset);
        let id = graph.add_node(node);

        let value = serialize(&graph, id);

        assert_eq!(value["version"], Value::String("1.0".to_string()));
        assert_eq!(value["name"]["name"], Value::String("example.".to_string()));
        assert_eq!(value["name"]["status"], Value::String("NOERROR".to_string()));
        assert_eq!(
            value["name"]["rrsets"]["example./A"],
            Value::String("SECURE".to_string())
        );
    }

    #[test]
    fn recurses_into_cname_dependencies() {
        let mut graph = NameGraph::new();
        let target = NameNode::new("target.example.", AnalysisType::Authoritative, 1000);
        let target_id = graph.add_node(target);

        let mut source = NameNode::new("source.example.", AnalysisType::Authoritative, 1000);
        source
            .cname_targets
            .insert("target.example.".to_string(), Some(target_id));
        let source_id = graph.add_node(source);

        let value = serialize(&graph, source_id);

        assert_eq!(
            value["name"]["dependencies"]["target.example."]["name"],
            Value::String("target.example.".to_string())
        );
    }

    #[test]
    fn self_referential_dependency_does_not_recurse_forever() {
        let mut graph = NameGraph::new();
        let mut node = NameNode::new("loop.example.", AnalysisType::Authoritative, 1000);
        node.cname_targets.insert("loop.example.".to_string(), None);
        let id = graph.add_node(node);
        graph
            .node_mut(id)
            .cname_targets
            .insert("loop.example.".to_string(), Some(id));

        let value = serialize(&graph, id);

        assert_eq!(
            value["name"]["dependencies"]["loop.example."],
            Value::String("<cycle>".to_string())
        );
    }
}
