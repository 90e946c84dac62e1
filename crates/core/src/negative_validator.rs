//! C5 — Negative-Response Evaluator (§4.5): validates NODATA/NXDOMAIN
//! proof bundles (SOA ownership + NSEC/NSEC3 coverage) collected for
//! this node's queries.

use crate::diagnostics::{Diagnostic, DiagnosticCode, Severity};
use crate::graph::{NameGraph, NegativeKind};
use crate::ids::NodeId;
use crate::types::NsecProofStatus;

pub fn validate_negative_responses(graph: &mut NameGraph, node_id: NodeId) {
    let zone_name = zone_name_for(graph, node_id);

    let ids: Vec<_> = (0..graph.node(node_id).negative_responses.len())
        .map(crate::ids::NegativeId)
        .collect();

    for id in ids {
        validate_one(graph, node_id, id, &zone_name);
    }

    check_inconsistent_nxdomain(graph, node_id);
}

fn zone_name_for(graph: &NameGraph, node_id: NodeId) -> String {
    let node = graph.node(node_id);
    match node.zone {
        Some(zone_id) => graph.node(zone_id).name.clone(),
        None => node.name.clone(),
    }
}

fn validate_one(graph: &mut NameGraph, node_id: NodeId, id: crate::ids::NegativeId, zone_name: &str) {
    let kind = graph.node(node_id).negative_kind[id.0];
    let (soa_ids, nsec_set_ids, servers_clients) = {
        let neg = graph.node(node_id).negative(id);
        (
            neg.soa_rrset_info.clone(),
            neg.nsec_set_info.clone(),
            neg.servers_clients.clone(),
        )
    };

    let (missing_soa_code, soa_owner_mismatch_code, missing_nsec_code) = match kind {
        NegativeKind::NoData => (
            DiagnosticCode::MissingSoaForNodata,
            DiagnosticCode::SoaOwnerNotZoneForNodata,
            DiagnosticCode::MissingNsecForNodata,
        ),
        NegativeKind::NxDomain => (
            DiagnosticCode::MissingSoaForNxdomain,
            DiagnosticCode::SoaOwnerNotZoneForNxdomain,
            DiagnosticCode::MissingNsecForNxdomain,
        ),
    };

    if soa_ids.is_empty() {
        file_negative_diag(graph, node_id, id, missing_soa_code, servers_clients.first().copied());
    } else {
        for soa_id in &soa_ids {
            let owner = graph.node(node_id).rrset(*soa_id).owner.clone();
            if owner != zone_name {
                file_negative_diag(
                    graph,
                    node_id,
                    id,
                    soa_owner_mismatch_code,
                    servers_clients.first().copied(),
                );
            }
        }
    }

    if nsec_set_ids.is_empty() {
        file_negative_diag(graph, node_id, id, missing_nsec_code, servers_clients.first().copied());
        return;
    }

    let qname = graph.node(node_id).negative(id).qname.clone();
    let mut statuses = std::collections::HashMap::new();

    for nsec_set_id in &nsec_set_ids {
        let (use_nsec3, covers_qname_directly, nonempty, member_rrset_ids, member_scrs) = {
            let nsec_set = graph.node(node_id).nsec_set(*nsec_set_id);
            (
                nsec_set.use_nsec3,
                nsec_set.rrsets.contains_key(&qname),
                !nsec_set.rrsets.is_empty(),
                nsec_set.rrsets.values().copied().collect::<Vec<_>>(),
                nsec_set.servers_clients.clone(),
            )
        };

        // Opt-out (RFC 5155 §3.2) lets an NSEC3 span validly cover a name
        // without proving its non-existence — checked only for NSEC3 sets.
        let opt_out = use_nsec3
            && member_rrset_ids
                .iter()
                .any(|rid| graph.node(node_id).rrset(*rid).records.iter().any(|r| nsec3_opt_out(r)));

        let proof = proof_for_qname(use_nsec3, covers_qname_directly, nonempty, opt_out, kind);
        for scr in &member_scrs {
            statuses.insert(*scr, proof);
        }
    }

    graph.node_mut(node_id).negative_mut(id).status_by_response = statuses;
}

/// NODATA is proven by an NSEC/NSEC3 bundle covering `qname` exactly
/// (the owner exists, just not for the queried rdtype); NXDOMAIN is
/// proven by a non-empty bundle that does NOT have `qname` as one of
/// its direct members (the name itself does not exist). `opt_out` only
/// ever reaches `NsecProofStatus` on a valid proof — it does not change
/// whether coverage itself was established.
fn proof_for_qname(
    use_nsec3: bool,
    covers_qname_directly: bool,
    nonempty: bool,
    opt_out: bool,
    kind: NegativeKind,
) -> NsecProofStatus {
    let valid = match kind {
        NegativeKind::NoData => covers_qname_directly,
        NegativeKind::NxDomain => nonempty && !covers_qname_directly,
    };

    if valid {
        NsecProofStatus::valid(use_nsec3, opt_out)
    } else {
        NsecProofStatus::invalid(use_nsec3)
    }
}

/// RFC 5155 §3.2 NSEC3 rdata: `[hash_alg:1][flags:1][iterations:2]
/// [salt_len:1][salt][hash_len:1][next_hashed_owner][type_bitmap]`.
/// Bit 0 of the flags octet is Opt-Out.
fn nsec3_opt_out(rdata: &[u8]) -> bool {
    rdata.get(1).map(|flags| flags & 0x01 != 0).unwrap_or(false)
}

fn file_negative_diag(
    graph: &mut NameGraph,
    node_id: NodeId,
    id: crate::ids::NegativeId,
    code: DiagnosticCode,
    scr: Option<crate::ids::ServerClientResponse>,
) {
    let Some(scr) = scr else { return };
    let diag = Diagnostic::new(code, Severity::Warning, scr);
    graph.node_mut(node_id).negative_mut(id).warnings.push(Severity::Warning, diag);
}

/// §4.5: the same (qname, rdtype) query should not have yielded both a
/// NODATA and an NXDOMAIN proof across different responses.
fn check_inconsistent_nxdomain(graph: &mut NameGraph, node_id: NodeId) {
    let query_keys: Vec<_> = graph.node(node_id).queries.keys().cloned().collect();

    for key in query_keys {
        let (nodata, nxdomain) = {
            let agg = &graph.node(node_id).queries[&key];
            (!agg.nodata_info.is_empty(), !agg.nxdomain_info.is_empty())
        };

        if nodata && nxdomain {
            let scr = {
                let agg = &graph.node(node_id).queries[&key];
                agg.nodata_info
                    .first()
                    .and_then(|id| graph.node(node_id).negative(*id).servers_clients.first().copied())
            };
            if let Some(scr) = scr {
                let diag = Diagnostic::new(DiagnosticCode::InconsistentNxdomain, Severity::Warning, scr);
                graph.node_mut(node_id).response_errors.push(Severity::Warning, diag);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::AnalysisType;
    use crate::graph::NameNode;
    use crate::ids::{ClientId, ResponseId, ServerClientResponse, ServerId};
    use crate::types::response::{Query, Response};
    use crate::types::{NsecSetInfo, RrsetInfo};
    use dnssec_analysis_domain::RecordType;

    fn scr(response: usize) -> ServerClientResponse {
        ServerClientResponse::new(ServerId(0), ClientId(0), ResponseId(response))
    }

    fn sample_response() -> Response {
        Response {
            server: ServerId(0),
            client: ClientId(0),
            rcode: 3,
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
            msg_size: 200,
            aa: true,
            ra: false,
            rd: false,
            is_referral: false,
            is_upward_referral: false,
            is_complete: true,
            is_valid: true,
        }
    }

    #[test]
    fn nxdomain_proof_valid_when_nsec_set_does_not_cover_qname_directly() {
        let mut graph = NameGraph::new();
        let mut node = NameNode::new("example.", AnalysisType::Authoritative, 1000);
        node.push_response(sample_response());

        let soa_id = node.push_rrset(RrsetInfo::new("example.".into(), RecordType::SOA, 300));

        let mut nsec_set = NsecSetInfo::new(false);
        nsec_set.servers_clients.push(scr(0));
        nsec_set
            .rrsets
            .insert("a.example.".into(), soa_id);
        let nsec_set_id = node.push_nsec_set(nsec_set);

        let mut neg = crate::types::NegativeResponseInfo::new("nope.example.".into(), RecordType::A);
        neg.servers_clients.push(scr(0));
        neg.soa_rrset_info.push(soa_id);
        neg.nsec_set_info.push(nsec_set_id);
        let neg_id = node.push_negative(neg, crate::graph::NegativeKind::NxDomain);

        let id = graph.add_node(node);
        validate_negative_responses(&mut graph, id);

        let status = graph.node(id).negative(neg_id).status_by_response[&scr(0)];
        assert!(status.is_valid());
    }

    #[test]
    fn nodata_proof_invalid_when_nsec_set_does_not_cover_qname() {
        let mut graph = NameGraph::new();
        let mut node = NameNode::new("example.", AnalysisType::Authoritative, 1000);
        node.push_response(sample_response());

        let soa_id = node.push_rrset(RrsetInfo::new("example.".into(), RecordType::SOA, 300));

        let mut nsec_set = NsecSetInfo::new(false);
        nsec_set.servers_clients.push(scr(0));
        nsec_set.rrsets.insert("other.example.".into(), soa_id);
        let nsec_set_id = node.push_nsec_set(nsec_set);

        let mut neg = crate::types::NegativeResponseInfo::new("txt.example.".into(), RecordType::TXT);
        neg.servers_clients.push(scr(0));
        neg.soa_rrset_info.push(soa_id);
        neg.nsec_set_info.push(nsec_set_id);
        let neg_id = node.push_negative(neg, crate::graph::NegativeKind::NoData);

        let id = graph.add_node(node);
        validate_negative_responses(&mut graph, id);

        let status = graph.node(id).negative(neg_id).status_by_response[&scr(0)];
        assert!(!status.is_valid());
    }

    #[test]
    fn nsec3_opt_out_span_is_valid_but_flagged_opt_out() {
        let mut graph = NameGraph::new();
        let mut node = NameNode::new("example.", AnalysisType::Authoritative, 1000);
        node.push_response(sample_response());

        let soa_id = node.push_rrset(RrsetInfo::new("example.".into(), RecordType::SOA, 300));

        let mut nsec3_rrset = RrsetInfo::new("cover.example.".into(), RecordType::NSEC3, 300);
        nsec3_rrset.records.push(vec![1, 0x01, 0, 1, 0, 0, 20]);
        let nsec3_rrset_id = node.push_rrset(nsec3_rrset);

        let mut nsec_set = NsecSetInfo::new(true);
        nsec_set.servers_clients.push(scr(0));
        nsec_set.rrsets.insert("cover.example.".into(), nsec3_rrset_id);
        let nsec_set_id = node.push_nsec_set(nsec_set);

        let mut neg = crate::types::NegativeResponseInfo::new("nope.example.".into(), RecordType::A);
        neg.servers_clients.push(scr(0));
        neg.soa_rrset_info.push(soa_id);
        neg.nsec_set_info.push(nsec_set_id);
        let neg_id = node.push_negative(neg, crate::graph::NegativeKind::NxDomain);

        let id = graph.add_node(node);
        validate_negative_responses(&mut graph, id);

        let status = graph.node(id).negative(neg_id).status_by_response[&scr(0)];
        assert!(status.is_valid());
        assert!(status.opt_out);
    }

    #[test]
    fn missing_nsec_set_files_a_warning() {
        let mut graph = NameGraph::new();
        let mut node = NameNode::new("example.", AnalysisType::Authoritative, 1000);
        node.push_response(sample_response());
        let soa_id = node.push_rrset(RrsetInfo::new("example.".into(), RecordType::SOA, 300));

        let mut neg = crate::types::NegativeResponseInfo::new("nope.example.".into(), RecordType::A);
        neg.servers_clients.push(scr(0));
        neg.soa_rrset_info.push(soa_id);
        let neg_id = node.push_negative(neg, crate::graph::NegativeKind::NxDomain);

        let id = graph.add_node(node);
        validate_negative_responses(&mut graph, id);

        assert!(!graph.node(id).negative(neg_id).warnings.is_empty());
    }
}
