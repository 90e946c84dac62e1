//! C7 — Response-Error Classifier (§4.7): per-response EDNS/EDNS-flag
//! fallback taxonomy and authoritative/recursive expectation checks.

use crate::diagnostics::{Diagnostic, DiagnosticCode, Severity};
use crate::graph::{AnalysisType, NameGraph};
use crate::ids::{NodeId, ResponseId, ServerClientResponse};

pub fn classify_response_errors(graph: &mut NameGraph, node_id: NodeId) {
    let analysis_type = graph.node(node_id).analysis_type;
    let response_ids: Vec<_> = (0..graph.node(node_id).responses.len()).map(ResponseId).collect();

    for rid in response_ids {
        classify_one(graph, node_id, rid, analysis_type);
    }
}

fn classify_one(graph: &mut NameGraph, node_id: NodeId, rid: ResponseId, analysis_type: AnalysisType) {
    let r = graph.node(node_id).response(rid).clone();
    let scr = ServerClientResponse::new(r.server, r.client, rid);

    if r.rcode != 0 && r.rcode != 3 {
        file_diag(graph, node_id, scr, DiagnosticCode::InvalidRcode);
    }

    if r.query.edns_requested && r.effective_edns.is_none() {
        file_diag(graph, node_id, scr, DiagnosticCode::EdnsIgnored);
    }

    if let Some(version) = r.effective_edns {
        if version != 0 {
            file_diag(graph, node_id, scr, DiagnosticCode::UnsupportedEdnsVersion);
        }
    }

    // High-to-low bit order (§4.7): the DO bit (0x8000) is checked
    // before any lower EDNS flag bit.
    if r.query.edns_requested && r.effective_edns.is_some() {
        for bit in (0..16).rev() {
            let mask = 1u16 << bit;
            if r.query.edns_flags & mask != r.effective_edns_flags & mask {
                file_diag(graph, node_id, scr, DiagnosticCode::ResponseErrorWithEdnsFlag);
            }
        }
    }

    if r.effective_edns_max_udp_payload != 0
        && r.msg_size > r.effective_edns_max_udp_payload as usize
    {
        file_diag(graph, node_id, scr, DiagnosticCode::PmtuExceeded);
    }

    match analysis_type {
        AnalysisType::Authoritative if !r.aa => {
            file_diag(graph, node_id, scr, DiagnosticCode::NotAuthoritative)
        }
        AnalysisType::Recursive if !r.ra => {
            file_diag(graph, node_id, scr, DiagnosticCode::RecursionNotAvailable)
        }
        _ => {}
    }

    if !r.is_valid {
        file_diag(graph, node_id, scr, DiagnosticCode::UnknownResponseError);
    }
}

fn file_diag(graph: &mut NameGraph, node_id: NodeId, scr: ServerClientResponse, code: DiagnosticCode) {
    let diag = Diagnostic::new(code, Severity::Warning, scr);
    graph.node_mut(node_id).response_errors.push(Severity::Warning, diag);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NameNode;
    use crate::ids::{ClientId, ServerId};
    use crate::types::{Query, Response};

    fn base_response() -> Response {
        Response {
            server: ServerId(0),
            client: ClientId(0),
            rcode: 0,
            query: Query {
                edns_requested: true,
                edns_flags: 0x8000,
                edns_max_udp_payload: 4096,
            },
            effective_edns: Some(0),
            effective_edns_flags: 0x8000,
            effective_edns_max_udp_payload: 4096,
            effective_tcp: false,
            history: Vec::new(),
            responsive_cause_index: None,
            responsive_cause_index_tcp: None,
            tcp_responsive: true,
            udp_responsive: true,
            msg_size: 512,
            aa: true,
            ra: false,
            rd: false,
            is_referral: false,
            is_upward_referral: false,
            is_complete: true,
            is_valid: true,
        }
    }

    fn codes_for(node: NameNode, analysis_type: AnalysisType) -> Vec<DiagnosticCode> {
        let mut graph = NameGraph::new();
        let mut node = node;
        node.analysis_type = analysis_type;
        let id = graph.add_node(node);
        classify_response_errors(&mut graph, id);
        graph
            .node(id)
            .response_errors
            .warnings
            .iter()
            .map(|d| d.code)
            .collect()
    }

    #[test]
    fn clean_authoritative_response_has_no_diagnostics() {
        let mut node = NameNode::new("example.", AnalysisType::Authoritative, 1000);
        node.push_response(base_response());
        let codes = codes_for(node, AnalysisType::Authoritative);
        assert!(codes.is_empty());
    }

    #[test]
    fn edns_requested_but_omitted_is_flagged() {
        let mut node = NameNode::new("example.", AnalysisType::Authoritative, 1000);
        let mut r = base_response();
        r.effective_edns = None;
        node.push_response(r);
        let codes = codes_for(node, AnalysisType::Authoritative);
        assert!(codes.contains(&DiagnosticCode::EdnsIgnored));
    }

    #[test]
    fn dropped_do_bit_is_flagged_as_edns_flag_mismatch() {
        let mut node = NameNode::new("example.", AnalysisType::Authoritative, 1000);
        let mut r = base_response();
        r.effective_edns_flags = 0x0000;
        node.push_response(r);
        let codes = codes_for(node, AnalysisType::Authoritative);
        assert!(codes.contains(&DiagnosticCode::ResponseErrorWithEdnsFlag));
    }

    #[test]
    fn non_authoritative_answer_on_authoritative_analysis_is_flagged() {
        let mut node = NameNode::new("example.", AnalysisType::Authoritative, 1000);
        let mut r = base_response();
        r.aa = false;
        node.push_response(r);
        let codes = codes_for(node, AnalysisType::Authoritative);
        assert!(codes.contains(&DiagnosticCode::NotAuthoritative));
    }

    #[test]
    fn recursive_analysis_expects_recursion_available() {
        let mut node = NameNode::new("resolver.", AnalysisType::Recursive, 1000);
        let mut r = base_response();
        r.ra = false;
        node.push_response(r);
        let codes = codes_for(node, AnalysisType::Recursive);
        assert!(codes.contains(&DiagnosticCode::RecursionNotAvailable));
    }

    #[test]
    fn oversized_message_exceeds_pmtu() {
        let mut node = NameNode::new("example.", AnalysisType::Authoritative, 1000);
        let mut r = base_response();
        r.msg_size = 9000;
        node.push_response(r);
        let codes = codes_for(node, AnalysisType::Authoritative);
        assert!(codes.contains(&DiagnosticCode::PmtuExceeded));
    }
}
