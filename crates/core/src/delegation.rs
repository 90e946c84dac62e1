//! C6 — Delegation/DS Evaluator (§4.6): binds DS/DLV records to this
//! zone's own DNSKEYs and derives the final per-rdtype delegation
//! status plus NS/glue and server-reachability diagnostics.

use crate::crypto::CryptoEngine;
use crate::diagnostics::{Diagnostic, DiagnosticCode, Severity};
use crate::enums::{DelegationStatus, DsStatus};
use crate::graph::{AnalysisType, DelegationInfo, NameGraph};
use crate::ids::{DnskeyId, NodeId, ServerClientResponse};
use crate::types::{DsBinding, DsBindingGroup, DsRecord};
use dnssec_analysis_domain::RecordType;
use std::collections::HashSet;
use tracing::warn;

const DELEGATION_SIGNER_TYPES: [RecordType; 2] = [RecordType::DS, RecordType::DLV];

/// Opt-in per SPEC_FULL §4.6-detail: IPv4 absence for a delegated NS name
/// is always an error-class warning, IPv6 absence only when enabled.
const CHECK_IPV6_ABSENCE: bool = false;

pub fn evaluate_delegation(graph: &mut NameGraph, node_id: NodeId, crypto: &CryptoEngine) {
    for rdtype in DELEGATION_SIGNER_TYPES {
        if rdtype == RecordType::DLV && graph.node(node_id).dlv_parent.is_none() {
            continue;
        }
        evaluate_one(graph, node_id, rdtype, crypto);
    }

    evaluate_ns_and_glue(graph, node_id);
    evaluate_server_reachability(graph, node_id);
}

fn ds_query_nxdomain_scr(graph: &NameGraph, node_id: NodeId, name: &str, rdtype: RecordType) -> Option<ServerClientResponse> {
    let agg = graph.node(node_id).queries.get(&(name.to_string(), rdtype))?;
    let neg_id = agg.nxdomain_info.first()?;
    graph.node(node_id).negative(*neg_id).servers_clients.first().copied()
}

fn has_valid_response(graph: &NameGraph, node_id: NodeId) -> bool {
    graph
        .node(node_id)
        .responses
        .iter()
        .any(|r| r.is_valid && (r.udp_responsive || r.tcp_responsive))
}

fn evaluate_one(graph: &mut NameGraph, node_id: NodeId, rdtype: RecordType, crypto: &CryptoEngine) {
    let name = graph.node(node_id).name.clone();

    let ds_rrset_ids: Vec<_> = graph
        .node(node_id)
        .rrsets
        .iter()
        .enumerate()
        .filter(|(_, r)| r.rdtype == rdtype && r.owner == name)
        .map(|(i, _)| crate::ids::RrsetId(i))
        .collect();

    let has_query = graph
        .node(node_id)
        .queries
        .keys()
        .any(|(qname, t)| qname == &name && *t == rdtype);

    let nxdomain_scr = ds_query_nxdomain_scr(graph, node_id, &name, rdtype);

    if ds_rrset_ids.is_empty() {
        let mut status = if has_query {
            DelegationStatus::Insecure
        } else {
            DelegationStatus::Incomplete
        };
        let mut warnings = crate::diagnostics::Diagnostics::default();
        if status == DelegationStatus::Insecure {
            if let Some(scr) = nxdomain_scr {
                let diag = Diagnostic::new(DiagnosticCode::NoNsInParent, Severity::Warning, scr);
                warnings.push(Severity::Warning, diag);
                status = DelegationStatus::Incomplete;
            }
        }
        let info = DelegationInfo {
            status: Some(status),
            warnings,
            ..Default::default()
        };
        graph.node_mut(node_id).delegation.insert(rdtype, info);
        return;
    }

    let mut dnskey_with_ds = Vec::new();
    let mut any_ds_seen = false;
    let mut secure_path = false;
    let mut supported_algs_seen: HashSet<u8> = HashSet::new();
    let mut algs_validating_sep: HashSet<u8> = HashSet::new();
    let mut ds_binding_status: Vec<DsBindingGroup> = Vec::new();
    let mut warnings = crate::diagnostics::Diagnostics::default();
    let mut first_scr: Option<ServerClientResponse> = None;

    for rrset_id in &ds_rrset_ids {
        let (records, scr) = {
            let rrset = graph.node(node_id).rrset(*rrset_id);
            (rrset.records.clone(), rrset.servers_clients.first().copied())
        };
        if first_scr.is_none() {
            first_scr = scr;
        }

        for raw in &records {
            let ds = match DsRecord::parse(raw) {
                Ok(ds) => ds,
                Err(_) => continue,
            };
            any_ds_seen = true;

            if rdtype == RecordType::DS {
                graph.node_mut(node_id).dnssec_algorithms_in_ds.insert(ds.algorithm);
                graph
                    .node_mut(node_id)
                    .dnssec_algorithms_digest_in_ds
                    .insert(ds.digest_type);
            } else {
                graph.node_mut(node_id).dnssec_algorithms_in_dlv.insert(ds.algorithm);
                graph
                    .node_mut(node_id)
                    .dnssec_algorithms_digest_in_dlv
                    .insert(ds.digest_type);
            }

            let supported = crypto.supported_algs().contains(&ds.algorithm)
                && crypto.supported_digest_algs().contains(&ds.digest_type);

            let mut group = DsBindingGroup::default();

            if !supported {
                group.bindings.push(DsBinding {
                    dnskey: None,
                    status: DsStatus::AlgorithmIgnored,
                });
                ds_binding_status.push(group);
                continue;
            }

            secure_path = true;
            supported_algs_seen.insert(ds.algorithm);

            let candidates: Vec<DnskeyId> = graph
                .node(node_id)
                .dnskeys
                .iter()
                .enumerate()
                .filter(|(_, d)| d.rdata.algorithm == ds.algorithm && d.matches_tag(ds.key_tag))
                .map(|(i, _)| DnskeyId(i))
                .collect();

            if candidates.is_empty() {
                group.bindings.push(DsBinding {
                    dnskey: None,
                    status: DsStatus::IndeterminateNoDnskey,
                });
                ds_binding_status.push(group);
                continue;
            }

            for dnskey_id in candidates {
                let meta = graph.node(node_id).dnskey(dnskey_id);
                let pre_revoke_only = meta.rdata.is_revoked()
                    && ds.key_tag == meta.key_tag_no_revoke
                    && ds.key_tag != meta.key_tag;

                let status = if pre_revoke_only {
                    DsStatus::IndeterminateMatchPreRevoke
                } else {
                    match crypto.verify_ds(&ds, &meta.rdata, &name) {
                        Ok(true) => DsStatus::Valid,
                        Ok(false) => DsStatus::InvalidDigest,
                        Err(_) => DsStatus::AlgorithmIgnored,
                    }
                };

                if status == DsStatus::Valid {
                    if !dnskey_with_ds.contains(&dnskey_id) {
                        dnskey_with_ds.push(dnskey_id);
                    }
                    if meta.is_ksk_role {
                        algs_validating_sep.insert(ds.algorithm);
                    }
                }

                group.bindings.push(DsBinding {
                    dnskey: Some(dnskey_id),
                    status,
                });
            }

            ds_binding_status.push(group);
        }
    }

    let mut status = if !algs_validating_sep.is_empty() {
        DelegationStatus::Secure
    } else if secure_path {
        DelegationStatus::Bogus
    } else {
        DelegationStatus::Insecure
    };

    match status {
        DelegationStatus::Bogus => {
            warn!(zone = %name, rdtype = %rdtype, "delegation signer present but no DS binding validated");
            for alg in supported_algs_seen.difference(&algs_validating_sep) {
                if let Some(scr) = first_scr {
                    let diag = Diagnostic::new(DiagnosticCode::MissingSepForAlg, Severity::Warning, scr)
                        .with_detail(format!("algorithm {alg}"));
                    warnings.push(Severity::Warning, diag);
                }
            }
        }
        DelegationStatus::Insecure if any_ds_seen => {
            if let Some(scr) = first_scr {
                let diag = Diagnostic::new(DiagnosticCode::NoSep, Severity::Warning, scr)
                    .with_detail(format!("source={rdtype}"));
                warnings.push(Severity::Warning, diag);
            }
        }
        _ => {}
    }

    if status == DelegationStatus::Insecure && !has_valid_response(graph, node_id) {
        status = DelegationStatus::Lame;
    }

    if status == DelegationStatus::Insecure {
        if let Some(scr) = nxdomain_scr {
            let diag = Diagnostic::new(DiagnosticCode::NoNsInParent, Severity::Warning, scr);
            warnings.push(Severity::Warning, diag);
            status = DelegationStatus::Incomplete;
        }
    }

    let info = DelegationInfo {
        status: Some(status),
        warnings,
        errors: crate::diagnostics::Diagnostics::default(),
        dnskey_with_ds,
        ds_binding_status,
    };
    graph.node_mut(node_id).delegation.insert(rdtype, info);
}

/// Hand-rolled, no-compression-pointer domain name decode, mirroring
/// `RrsigRecord`'s private signer-name parser — NS rdata is never
/// compressed relative to this crate's stored raw records.
fn decode_ns_name(data: &[u8]) -> Option<String> {
    let mut name = String::new();
    let mut pos = 0;

    loop {
        if pos >= data.len() {
            return None;
        }
        let len = data[pos] as usize;
        if len == 0 {
            break;
        }
        if len > 63 || pos + 1 + len > data.len() {
            return None;
        }
        if !name.is_empty() {
            name.push('.');
        }
        name.push_str(&String::from_utf8_lossy(&data[pos + 1..pos + 1 + len]));
        pos += 1 + len;
    }

    Some(format!("{name}."))
}

fn ns_names(graph: &NameGraph, node_id: NodeId, owner: &str) -> HashSet<String> {
    graph
        .node(node_id)
        .rrsets
        .iter()
        .filter(|r| r.rdtype == RecordType::NS && r.owner == owner)
        .flat_map(|r| r.records.iter())
        .filter_map(|raw| decode_ns_name(raw))
        .collect()
}

fn address_records(graph: &NameGraph, node_id: NodeId, owner: &str) -> (Vec<Vec<u8>>, Vec<Vec<u8>>) {
    let mut v4 = Vec::new();
    let mut v6 = Vec::new();
    for r in graph.node(node_id).rrsets.iter().filter(|r| r.owner == owner) {
        match r.rdtype {
            RecordType::A => v4.extend(r.records.iter().cloned()),
            RecordType::AAAA => v6.extend(r.records.iter().cloned()),
            _ => {}
        }
    }
    (v4, v6)
}

fn first_rrset_scr(graph: &NameGraph, node_id: NodeId, rdtype: RecordType, owner: &str) -> Option<ServerClientResponse> {
    graph
        .node(node_id)
        .rrsets
        .iter()
        .find(|r| r.rdtype == rdtype && r.owner == owner)
        .and_then(|r| r.servers_clients.first().copied())
}

/// §4.6 step 4: cross-checks the NS RRset this zone published against
/// the NS names the parent delegated, flags NS-name set differences,
/// and checks glue consistency for every in-bailiwick NS name.
fn evaluate_ns_and_glue(graph: &mut NameGraph, node_id: NodeId) {
    let name = graph.node(node_id).name.clone();

    let Some(parent_id) = graph.node(node_id).parent else {
        return;
    };

    let ns_in_parent = ns_names(graph, parent_id, &name);
    let ns_in_child = ns_names(graph, node_id, &name);

    let parent_scr = first_rrset_scr(graph, parent_id, RecordType::NS, &name);
    let child_scr = first_rrset_scr(graph, node_id, RecordType::NS, &name);

    if ns_in_parent.is_empty() && !ns_in_child.is_empty() {
        if let Some(scr) = child_scr {
            let diag = Diagnostic::new(DiagnosticCode::NoNsInParent, Severity::Warning, scr);
            graph.node_mut(node_id).response_errors.push(Severity::Warning, diag);
        }
    }

    for missing in ns_in_child.difference(&ns_in_parent) {
        if let Some(scr) = child_scr {
            let diag = Diagnostic::new(DiagnosticCode::NsNameNotInParent, Severity::Warning, scr)
                .with_detail(missing.clone());
            graph.node_mut(node_id).response_errors.push(Severity::Warning, diag);
        }
    }

    for missing in ns_in_parent.difference(&ns_in_child) {
        if let Some(scr) = parent_scr {
            let diag = Diagnostic::new(DiagnosticCode::NsNameNotInChild, Severity::Warning, scr)
                .with_detail(missing.clone());
            graph.node_mut(node_id).response_errors.push(Severity::Warning, diag);
        }
    }

    let all_ns_names: HashSet<String> = ns_in_parent.union(&ns_in_child).cloned().collect();
    let diag_scr = child_scr.or(parent_scr);
    for ns_name in &all_ns_names {
        check_glue_for_ns_name(graph, node_id, parent_id, &name, ns_name, diag_scr);
    }
}

/// Glue ("additional section" addresses the parent attached to its
/// referral) is modeled as A/AAAA `RrsetInfo`s owned by `ns_name` on the
/// *parent* node; the child's own authoritative answer for the same
/// name lives on the node `ns_dependencies` resolved to, since this
/// crate's data model has no dedicated glue field.
fn check_glue_for_ns_name(
    graph: &mut NameGraph,
    node_id: NodeId,
    parent_id: NodeId,
    zone_name: &str,
    ns_name: &str,
    scr: Option<ServerClientResponse>,
) {
    let Some(scr) = scr else { return };

    let in_bailiwick = ns_name == zone_name || ns_name.ends_with(&format!(".{zone_name}"));
    let (glue_v4, glue_v6) = address_records(graph, parent_id, ns_name);

    if in_bailiwick && glue_v4.is_empty() && glue_v6.is_empty() {
        let diag = Diagnostic::new(DiagnosticCode::MissingGlueForNsName, Severity::Warning, scr)
            .with_detail(ns_name.to_string());
        graph.node_mut(node_id).response_errors.push(Severity::Warning, diag);
    }

    let resolved = graph.node(node_id).ns_dependencies.get(ns_name).copied();
    let (child_v4, child_v6) = match resolved {
        Some(Some(rid)) => address_records(graph, rid, ns_name),
        Some(None) => {
            let diag = Diagnostic::new(DiagnosticCode::ErrorResolvingNsName, Severity::Warning, scr)
                .with_detail(ns_name.to_string());
            graph.node_mut(node_id).response_errors.push(Severity::Warning, diag);
            (Vec::new(), Vec::new())
        }
        None => (Vec::new(), Vec::new()),
    };

    if in_bailiwick && !glue_v4.is_empty() && !child_v4.is_empty() {
        let mut g = glue_v4.clone();
        g.sort();
        let mut c = child_v4.clone();
        c.sort();
        if g != c {
            let diag = Diagnostic::new(DiagnosticCode::GlueMismatchError, Severity::Warning, scr)
                .with_detail(ns_name.to_string());
            graph.node_mut(node_id).response_errors.push(Severity::Warning, diag);
        }
    }

    let mut all_v4 = glue_v4;
    all_v4.extend(child_v4);
    let mut all_v6 = glue_v6;
    all_v6.extend(child_v6);

    if all_v4.is_empty() && all_v6.is_empty() {
        let diag = Diagnostic::new(DiagnosticCode::NoAddressForNsName, Severity::Warning, scr)
            .with_detail(ns_name.to_string());
        graph.node_mut(node_id).response_errors.push(Severity::Warning, diag);
        return;
    }

    if all_v4.is_empty() {
        let diag = Diagnostic::new(DiagnosticCode::NoNsAddressesForIpv4, Severity::Warning, scr)
            .with_detail(ns_name.to_string());
        graph.node_mut(node_id).response_errors.push(Severity::Warning, diag);
    }
    if CHECK_IPV6_ABSENCE && all_v6.is_empty() {
        let diag = Diagnostic::new(DiagnosticCode::NoNsAddressesForIpv6, Severity::Warning, scr)
            .with_detail(ns_name.to_string());
        graph.node_mut(node_id).response_errors.push(Severity::Warning, diag);
    }
}

/// §4.6 step 5: every server/transport this zone's NS RRset named
/// should have produced a responsive, valid, authoritative answer;
/// otherwise the collector's own retry history already recorded the
/// failure mode.
fn evaluate_server_reachability(graph: &mut NameGraph, node_id: NodeId) {
    let is_authoritative = graph.node(node_id).analysis_type == AnalysisType::Authoritative;

    let responses: Vec<_> = graph
        .node(node_id)
        .responses
        .iter()
        .enumerate()
        .map(|(i, r)| {
            (
                crate::ids::ResponseId(i),
                r.server,
                r.client,
                r.udp_responsive,
                r.tcp_responsive,
                r.is_valid,
                r.aa,
            )
        })
        .collect();

    for (response_id, server, client, udp_responsive, tcp_responsive, is_valid, aa) in responses {
        let scr = ServerClientResponse::new(server, client, response_id);
        let responsive = udp_responsive || tcp_responsive;

        if !udp_responsive {
            let diag = Diagnostic::new(DiagnosticCode::ServerUnresponsiveUdp, Severity::Warning, scr);
            graph.node_mut(node_id).response_errors.push(Severity::Warning, diag);
        }
        if !tcp_responsive {
            let diag = Diagnostic::new(DiagnosticCode::ServerUnresponsiveTcp, Severity::Warning, scr);
            graph.node_mut(node_id).response_errors.push(Severity::Warning, diag);
        }
        if responsive && !is_valid {
            let diag = Diagnostic::new(DiagnosticCode::ServerInvalidResponse, Severity::Warning, scr);
            graph.node_mut(node_id).response_errors.push(Severity::Warning, diag);
        }
        if responsive && is_valid && !aa && is_authoritative {
            let diag = Diagnostic::new(DiagnosticCode::ServerNotAuthoritative, Severity::Warning, scr);
            graph.node_mut(node_id).response_errors.push(Severity::Warning, diag);
        }
    }
}
