//! C4 — RRSIG Validator (§4.3), including the wildcard-proof evaluator.

use crate::crypto::CryptoEngine;
use crate::diagnostics::{Diagnostic, DiagnosticCode, Severity};
use crate::enums::RrsigStatus;
use crate::graph::NameGraph;
use crate::ids::{DnskeyId, NodeId, RrsetId};
use crate::trust_anchor::TrustAnchorStore;
use crate::types::{NsecProofStatus, RrsigBinding, RrsigBindingGroup, WildcardProofStatus};
use dnssec_analysis_domain::RecordType;
use std::collections::HashSet;
use tracing::debug;

/// Validates every RRSIG covering every RRset on `node_id`, resolves
/// wildcard proofs, and finalizes DNSKEY roles (§4.3 step 6).
pub fn validate_rrsigs(
    graph: &mut NameGraph,
    node_id: NodeId,
    crypto: &CryptoEngine,
    trust_anchors: &TrustAnchorStore,
) {
    crate::index::build_dnskey_index(graph.node_mut(node_id));

    let rrset_ids: Vec<RrsetId> = (0..graph.node(node_id).rrsets.len()).map(RrsetId).collect();

    let signer_names: HashSet<String> = rrset_ids
        .iter()
        .flat_map(|id| {
            graph
                .node(node_id)
                .rrset(*id)
                .rrsigs
                .iter()
                .map(|s| s.signer_name.clone())
        })
        .collect();

    for signer in &signer_names {
        if let Some(signer_id) = graph.resolve(node_id, signer) {
            crate::index::build_dnskey_index(graph.node_mut(signer_id));
        }
    }

    for rrset_id in &rrset_ids {
        validate_one_rrset(graph, node_id, *rrset_id, crypto);
    }

    finalize_dnskey_roles(graph, node_id);
    mark_trust_anchored_keys(graph, node_id, trust_anchors);
    debug!(node = %graph.node(node_id).name, rrsets = rrset_ids.len(), "rrsig validation complete");
}

fn validate_one_rrset(graph: &mut NameGraph, node_id: NodeId, rrset_id: RrsetId, crypto: &CryptoEngine) {
    let analysis_end = graph.node(node_id).analysis_end;

    let (owner, records, rrsigs, fully_dname_synthesized) = {
        let rrset = graph.node(node_id).rrset(rrset_id);
        let fully_synth = !rrset.servers_clients.is_empty()
            && rrset
                .servers_clients
                .iter()
                .all(|scr| rrset.is_dname_synthesized(*scr));
        (
            rrset.owner.clone(),
            rrset.records.clone(),
            rrset.rrsigs.clone(),
            fully_synth,
        )
    };

    if rrsigs.is_empty() {
        if !fully_dname_synthesized {
            let scr = graph.node(node_id).rrset(rrset_id).servers_clients.first().copied();
            if let Some(scr) = scr {
                let diag = Diagnostic::new(DiagnosticCode::MissingRrsig, Severity::Warning, scr);
                graph
                    .node_mut(node_id)
                    .rrset_mut(rrset_id)
                    .warnings
                    .push(Severity::Warning, diag);
            }
        }
        return;
    }

    let mut groups = Vec::with_capacity(rrsigs.len());
    let mut validated_algorithms = HashSet::new();

    for rrsig in &rrsigs {
        let mut group = RrsigBindingGroup::default();

        let Some(signer_id) = graph.resolve(node_id, &rrsig.signer_name) else {
            // Stub zone: the collector never analysed the signer (§4.3
            // step 4's "skip the stub node" rule) — no candidate keys.
            group.bindings.push(RrsigBinding {
                dnskey: None,
                status: RrsigStatus::IndeterminateNoDnskey,
            });
            groups.push(group);
            continue;
        };

        let candidate_ids: Vec<DnskeyId> = graph
            .node(signer_id)
            .dnskeys
            .iter()
            .enumerate()
            .filter(|(_, d)| d.rdata.algorithm == rrsig.algorithm && d.matches_tag(rrsig.key_tag))
            .map(|(i, _)| DnskeyId(i))
            .collect();

        if candidate_ids.is_empty() {
            group.bindings.push(RrsigBinding {
                dnskey: None,
                status: RrsigStatus::IndeterminateNoDnskey,
            });
            groups.push(group);
            continue;
        }

        for dnskey_id in candidate_ids {
            let meta = graph.node(signer_id).dnskey(dnskey_id);
            let pre_revoke_only = meta.rdata.is_revoked()
                && rrsig.key_tag == meta.key_tag_no_revoke
                && rrsig.key_tag != meta.key_tag;

            let status = if pre_revoke_only {
                RrsigStatus::IndeterminateMatchPreRevoke
            } else if rrsig.is_premature(analysis_end) {
                RrsigStatus::Premature
            } else if rrsig.is_expired(analysis_end) {
                RrsigStatus::Expired
            } else {
                match crypto.verify_rrsig(rrsig, &meta.rdata, &owner, &records) {
                    Ok(true) => {
                        validated_algorithms.insert(rrsig.algorithm);
                        RrsigStatus::Valid
                    }
                    Ok(false) => RrsigStatus::InvalidSig,
                    Err(_) => RrsigStatus::AlgorithmIgnored,
                }
            };

            group.bindings.push(RrsigBinding {
                dnskey: Some(dnskey_id),
                status,
            });
        }

        groups.push(group);
    }

    let is_dnskey_rrset = graph.node(node_id).rrset(rrset_id).rdtype == RecordType::DNSKEY;
    graph.node_mut(node_id).rrset_mut(rrset_id).rrsig_status = groups;
    if is_dnskey_rrset {
        graph
            .node_mut(node_id)
            .dnssec_algorithms_in_dnskey
            .extend(validated_algorithms);
    }

    validate_wildcard_proofs(graph, node_id, rrset_id);
}

/// §4.4: a wildcard-covering proof is valid exactly when the bundled
/// NSEC/NSEC3 set actually contains the owner names needed to prove
/// the wildcard synthesis (non-empty) — opt-out is left `false` here
/// since the bit lives in the NSEC3 rdata the negative-response
/// evaluator (C5) parses, not in this RRSIG-driven pass.
fn validate_wildcard_proofs(graph: &mut NameGraph, node_id: NodeId, rrset_id: RrsetId) {
    let wildcard_info: Vec<(String, crate::ids::NsecSetId)> = graph
        .node(node_id)
        .rrset(rrset_id)
        .wildcard_info
        .iter()
        .map(|(k, v)| (k.clone(), *v))
        .collect();

    if wildcard_info.is_empty() {
        return;
    }

    let mut statuses = Vec::with_capacity(wildcard_info.len());
    let mut missing_proof = false;

    for (wildcard_owner, nsec_set_id) in wildcard_info {
        let nsec_set = graph.node(node_id).nsec_set(nsec_set_id);
        let proof = if nsec_set.rrsets.is_empty() {
            missing_proof = true;
            NsecProofStatus::invalid(nsec_set.use_nsec3)
        } else {
            NsecProofStatus::valid(nsec_set.use_nsec3, false)
        };
        statuses.push(WildcardProofStatus { wildcard_owner, proof });
    }

    graph.node_mut(node_id).rrset_mut(rrset_id).wildcard_status = statuses;

    if missing_proof {
        let scr = graph.node(node_id).rrset(rrset_id).servers_clients.first().copied();
        if let Some(scr) = scr {
            let diag = Diagnostic::new(DiagnosticCode::MissingNsecForWildcard, Severity::Warning, scr);
            graph
                .node_mut(node_id)
                .rrset_mut(rrset_id)
                .warnings
                .push(Severity::Warning, diag);
        }
    }
}

/// §4.3 step 6: a key's role is determined by what it actually signs,
/// not by the SEP flag alone — a key that validly signs the zone's own
/// DNSKEY RRset is acting as the KSK; a key that validly signs anything
/// else is acting as a ZSK. A key can hold both roles at once.
fn finalize_dnskey_roles(graph: &mut NameGraph, node_id: NodeId) {
    let (dnskey_rrsets, other_rrsets): (Vec<RrsetId>, Vec<RrsetId>) = graph
        .node(node_id)
        .rrsets
        .iter()
        .enumerate()
        .map(|(i, r)| (RrsetId(i), r.rdtype == RecordType::DNSKEY))
        .fold((Vec::new(), Vec::new()), |(mut dk, mut other), (id, is_dnskey)| {
            if is_dnskey {
                dk.push(id);
            } else {
                other.push(id);
            }
            (dk, other)
        });

    let mut ksk_ids = HashSet::new();
    for id in &dnskey_rrsets {
        for group in &graph.node(node_id).rrset(*id).rrsig_status {
            for binding in &group.bindings {
                if binding.status == RrsigStatus::Valid {
                    if let Some(dnskey_id) = binding.dnskey {
                        ksk_ids.insert(dnskey_id);
                    }
                }
            }
        }
    }

    let mut zsk_ids = HashSet::new();
    for id in &other_rrsets {
        for group in &graph.node(node_id).rrset(*id).rrsig_status {
            for binding in &group.bindings {
                if binding.status == RrsigStatus::Valid {
                    if let Some(dnskey_id) = binding.dnskey {
                        zsk_ids.insert(dnskey_id);
                    }
                }
            }
        }
    }

    let node = graph.node_mut(node_id);
    for id in ksk_ids {
        node.dnskey_mut(id).is_ksk_role = true;
    }
    for id in zsk_ids {
        node.dnskey_mut(id).is_zsk_role = true;
    }
}

fn mark_trust_anchored_keys(graph: &mut NameGraph, node_id: NodeId, trust_anchors: &TrustAnchorStore) {
    let zone = graph.node(node_id).name.clone();
    let anchored_ids: Vec<DnskeyId> = graph
        .node(node_id)
        .dnskeys
        .iter()
        .enumerate()
        .filter(|(_, d)| trust_anchors.is_trusted(&d.rdata, &zone))
        .map(|(i, _)| DnskeyId(i))
        .collect();

    let node = graph.node_mut(node_id);
    for id in anchored_ids {
        node.dnskey_mut(id).is_ksk_role = true;
    }
}
