//! C3 — Name-Status Evaluator (§4.1).

use crate::enums::NameStatus;
use crate::graph::NameGraph;
use crate::ids::NodeId;
use dnssec_analysis_domain::{DomainError, RecordType};

/// Populates `status`, `yxdomain`, `yxrrset`, `nxrrset` on `node_id`.
/// `trace` carries the value-extended visited set (§5, §9): encountering
/// `node_id` already in `trace` means a dependency cycle, and the
/// recursion returns early having done nothing further for this visit.
pub fn populate_name_status(
    graph: &mut NameGraph,
    node_id: NodeId,
    trace: &[NodeId],
) -> Result<(), DomainError> {
    if trace.contains(&node_id) {
        return Err(DomainError::LoopDetected);
    }
    let mut trace = trace.to_vec();
    trace.push(node_id);

    if graph.node(node_id).status.is_some() {
        return Ok(());
    }

    let name = graph.node(node_id).name.clone();

    // Positive answers: owner and (owner, rdtype) -> yxdomain/yxrrset,
    // including DNAME-synthesized CNAME targets transitively.
    let answer_rrset_ids: Vec<_> = graph
        .node(node_id)
        .rrsets
        .iter()
        .enumerate()
        .map(|(i, _)| crate::ids::RrsetId(i))
        .collect();

    for id in &answer_rrset_ids {
        let node = graph.node(node_id);
        let r = node.rrset(*id);
        let owner = r.owner.clone();
        let rdtype = r.rdtype;
        let synthesized = r.cname_info_from_dname.clone();
        drop(r);

        let node = graph.node_mut(node_id);
        node.yxdomain.insert(owner.clone());
        node.yxrrset.insert((owner.clone(), rdtype));
        if let Some(synth_owner) = synthesized {
            node.yxdomain.insert(synth_owner.clone());
            node.yxrrset.insert((synth_owner, RecordType::CNAME));
        }
    }

    // NODATA proofs.
    let nodata_ids: Vec<_> = {
        let node = graph.node(node_id);
        node.negative_responses
            .iter()
            .enumerate()
            .zip(node.negative_kind.iter())
            .filter(|(_, kind)| matches!(kind, crate::graph::NegativeKind::NoData))
            .map(|((i, _), _)| crate::ids::NegativeId(i))
            .collect()
    };

    for id in nodata_ids {
        let node = graph.node(node_id);
        let neg = node.negative(id);
        let qname = neg.qname.clone();
        let rdtype = neg.rdtype;

        let matches_this_node = qname == name;
        let rd_and_ra = neg
            .servers_clients
            .iter()
            .filter_map(|scr| node.responses.get(scr.response.0))
            .any(|r| r.recursion_desired() && r.recursion_available());
        let is_upward_referral_of_zone = neg
            .servers_clients
            .iter()
            .filter_map(|scr| node.responses.get(scr.response.0))
            .all(|r| r.is_upward_referral());

        let node = graph.node_mut(node_id);
        if (matches_this_node || rd_and_ra) && !is_upward_referral_of_zone {
            node.yxdomain.insert(qname.clone());
        }
        node.nxrrset.insert((qname, rdtype));
    }

    // NXDOMAIN proofs.
    let nxdomain_ids: Vec<_> = {
        let node = graph.node(node_id);
        node.negative_responses
            .iter()
            .enumerate()
            .zip(node.negative_kind.iter())
            .filter(|(_, kind)| matches!(kind, crate::graph::NegativeKind::NxDomain))
            .map(|((i, _), _)| crate::ids::NegativeId(i))
            .collect()
    };
    let mut any_nxdomain_for_name = false;
    for id in &nxdomain_ids {
        let node = graph.node(node_id);
        let neg = node.negative(*id);
        let (qname, rdtype) = (neg.qname.clone(), neg.rdtype);
        if qname == name && rdtype != RecordType::DS {
            any_nxdomain_for_name = true;
        }
        graph.node_mut(node_id).nxrrset.insert((qname, rdtype));
    }

    // Referral check: queries for this node's own name with rdtype NS.
    if let Some(agg) = graph
        .node(node_id)
        .queries
        .get(&(name.clone(), RecordType::NS))
        .cloned()
    {
        let node = graph.node(node_id);
        let proper_referral = agg
            .responses
            .iter()
            .filter_map(|rid| node.responses.get(rid.0))
            .any(|r| r.is_referral() && !r.is_upward_referral());
        if proper_referral {
            graph.node_mut(node_id).yxdomain.insert(name.clone());
        }
    }

    // CNAME propagation, guarded by the trace set.
    let cname_targets: Vec<(String, Option<NodeId>)> = graph
        .node(node_id)
        .cname_targets
        .iter()
        .map(|(k, v)| (k.clone(), *v))
        .collect();

    for (target_name, target_id) in cname_targets {
        if let Some(target_id) = target_id {
            if populate_name_status(graph, target_id, &trace).is_err() {
                // Cycle through a CNAME dependency: best-effort only, no
                // further propagation for this link (§5).
                continue;
            }
            let target_yxrrset: Vec<(String, RecordType)> = graph
                .node(target_id)
                .yxrrset
                .iter()
                .filter(|(owner, _)| owner == &target_name)
                .cloned()
                .collect();

            let node = graph.node_mut(node_id);
            for (_, rdtype) in target_yxrrset {
                node.yxrrset.insert((target_name.clone(), rdtype));
            }
        }
    }

    let node = graph.node_mut(node_id);
    node.status = Some(if node.yxdomain.contains(&name) {
        NameStatus::NoError
    } else if any_nxdomain_for_name {
        NameStatus::NxDomain
    } else {
        NameStatus::Indeterminate
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::AnalysisType;
    use crate::graph::NameNode;
    use crate::types::RrsetInfo;

    #[test]
    fn answered_name_is_noerror() {
        let mut graph = NameGraph::new();
        let mut node = NameNode::new("example.", AnalysisType::Authoritative, 1000);
        node.push_rrset(RrsetInfo::new("example.".into(), RecordType::A, 300));
        let id = graph.add_node(node);

        populate_name_status(&mut graph, id, &[]).unwrap();

        assert_eq!(graph.node(id).status, Some(NameStatus::NoError));
        assert!(graph.node(id).yxdomain.contains("example."));
        assert!(graph.node(id).yxrrset.contains(&("example.".to_string(), RecordType::A)));
    }

    #[test]
    fn nxdomain_proof_without_any_answer_yields_nxdomain_status() {
        let mut graph = NameGraph::new();
        let mut node = NameNode::new("nope.example.", AnalysisType::Authoritative, 1000);
        node.push_negative(
            crate::types::NegativeResponseInfo::new("nope.example.".into(), RecordType::A),
            crate::graph::NegativeKind::NxDomain,
        );
        let id = graph.add_node(node);

        populate_name_status(&mut graph, id, &[]).unwrap();

        assert_eq!(graph.node(id).status, Some(NameStatus::NxDomain));
    }

    #[test]
    fn indeterminate_when_nothing_resolved_the_name() {
        let mut graph = NameGraph::new();
        let node = NameNode::new("stub.example.", AnalysisType::Authoritative, 1000);
        let id = graph.add_node(node);

        populate_name_status(&mut graph, id, &[]).unwrap();

        assert_eq!(graph.node(id).status, Some(NameStatus::Indeterminate));
    }

    #[test]
    fn revisiting_a_node_already_in_trace_is_a_loop() {
        let mut graph = NameGraph::new();
        let node = NameNode::new("loopy.example.", AnalysisType::Authoritative, 1000);
        let id = graph.add_node(node);

        let err = populate_name_status(&mut graph, id, &[id]).unwrap_err();
        assert!(matches!(err, DomainError::LoopDetected));
    }

    #[test]
    fn cname_target_status_propagates_into_the_source_node() {
        let mut graph = NameGraph::new();

        let mut target = NameNode::new("target.example.", AnalysisType::Authoritative, 1000);
        target.push_rrset(RrsetInfo::new("target.example.".into(), RecordType::A, 300));
        let target_id = graph.add_node(target);

        let mut source = NameNode::new("source.example.", AnalysisType::Authoritative, 1000);
        source.push_rrset(RrsetInfo::new("source.example.".into(), RecordType::CNAME, 300));
        source
            .cname_targets
            .insert("target.example.".to_string(), Some(target_id));
        let source_id = graph.add_node(source);

        populate_name_status(&mut graph, source_id, &[]).unwrap();

        assert!(graph
            .node(source_id)
            .yxrrset
            .contains(&("target.example.".to_string(), RecordType::A)));
    }
}
