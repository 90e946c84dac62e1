//! C8 — Component-Status Propagator (§4.8). Building/coloring the trust
//! graph itself is out of scope for this crate; [`TrustGraph`] is the
//! seam an external coloring implementation plugs into. When the graph
//! has no opinion on an element this module falls back to a local rule
//! derived from what C4/C5 already computed for it.

use crate::enums::{ComponentStatus, RrsigStatus};
use crate::graph::NameGraph;
use crate::ids::{NegativeId, NodeId, NsecSetId, RrsetId};
use crate::trust_anchor::TrustAnchorStore;
use dnssec_analysis_domain::RecordType;
use std::collections::HashMap;

/// Identifies one analysed element by its stable (zone, owner, rdtype)
/// triple rather than an in-process pointer, so an external coloring
/// graph can be built independently of this crate's arena layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentKey {
    pub zone: String,
    pub owner: String,
    pub rdtype: RecordType,
}

/// External collaborator: given a component key, returns the status the
/// caller's trust-graph coloring assigned to it, or `None` if it has no
/// opinion (this crate then falls back to a local rule, §4.8).
pub trait TrustGraph {
    fn component_status(&self, key: &ComponentKey) -> Option<ComponentStatus>;
}

/// A `TrustGraph` with no external opinions — every lookup falls
/// through to this crate's local rules. Useful for callers that have
/// not built a coloring graph, and for tests.
pub struct NullTrustGraph;

impl TrustGraph for NullTrustGraph {
    fn component_status(&self, _key: &ComponentKey) -> Option<ComponentStatus> {
        None
    }
}

pub fn propagate_component_status(
    graph: &mut NameGraph,
    node_id: NodeId,
    trust_graph: &dyn TrustGraph,
    trust_anchors: &TrustAnchorStore,
) {
    let _ = trust_anchors;
    propagate_rrsets(graph, node_id, trust_graph);
    // DNSKEYMeta carries no status field of its own (§9: avoid duplicate,
    // potentially-inconsistent state) — its status is derived on demand
    // via `index::dnskey_component_status`, reading the owning RRsetInfo
    // status this pass just populated.
    propagate_nsec_sets(graph, node_id, trust_graph);
    propagate_negative_responses(graph, node_id, trust_graph);
}

fn zone_name(graph: &NameGraph, node_id: NodeId) -> String {
    let node = graph.node(node_id);
    match node.zone {
        Some(zone_id) => graph.node(zone_id).name.clone(),
        None => node.name.clone(),
    }
}

fn propagate_rrsets(graph: &mut NameGraph, node_id: NodeId, trust_graph: &dyn TrustGraph) {
    let zone = zone_name(graph, node_id);
    let rrset_ids: Vec<RrsetId> = (0..graph.node(node_id).rrsets.len()).map(RrsetId).collect();

    for id in rrset_ids {
        let (owner, rdtype, has_valid_rrsig, all_indeterminate) = {
            let rrset = graph.node(node_id).rrset(id);
            let has_valid = rrset.rrsig_status.iter().any(|g| g.is_valid());
            let all_indeterminate = !rrset.rrsig_status.is_empty()
                && rrset.rrsig_status.iter().all(|g| {
                    g.bindings.iter().all(|b| {
                        matches!(
                            b.status,
                            RrsigStatus::IndeterminateNoDnskey | RrsigStatus::IndeterminateMatchPreRevoke
                        )
                    })
                });
            (rrset.owner.clone(), rrset.rdtype, has_valid, all_indeterminate)
        };

        let key = ComponentKey { zone: zone.clone(), owner, rdtype };
        let status = trust_graph.component_status(&key).unwrap_or_else(|| {
            if has_valid_rrsig {
                ComponentStatus::Secure
            } else if all_indeterminate {
                ComponentStatus::Insecure
            } else {
                ComponentStatus::Bogus
            }
        });

        graph.node_mut(node_id).rrset_mut(id).response_component_status = Some(status);
    }
}

fn propagate_nsec_sets(graph: &mut NameGraph, node_id: NodeId, trust_graph: &dyn TrustGraph) {
    let zone = zone_name(graph, node_id);
    let nsec_set_ids: Vec<NsecSetId> = (0..graph.node(node_id).nsec_sets.len()).map(NsecSetId).collect();

    for id in nsec_set_ids {
        let (use_nsec3, owners): (bool, Vec<String>) = {
            let set = graph.node(node_id).nsec_set(id);
            (set.use_nsec3, set.rrsets.keys().cloned().collect())
        };
        let rdtype = if use_nsec3 { RecordType::NSEC3 } else { RecordType::NSEC };

        let mut statuses = HashMap::new();
        for owner in owners {
            let rrset_id = graph.node(node_id).nsec_set(id).rrsets.get(&owner).copied();
            let key = ComponentKey { zone: zone.clone(), owner: owner.clone(), rdtype };

            let status = trust_graph.component_status(&key).unwrap_or_else(|| {
                rrset_id
                    .and_then(|rid| graph.node(node_id).rrset(rid).response_component_status)
                    .unwrap_or(ComponentStatus::Insecure)
            });
            statuses.insert(owner, status);
        }

        graph.node_mut(node_id).nsec_set_mut(id).component_status = statuses;
    }
}

fn propagate_negative_responses(graph: &mut NameGraph, node_id: NodeId, trust_graph: &dyn TrustGraph) {
    let zone = zone_name(graph, node_id);
    let ids: Vec<NegativeId> = (0..graph.node(node_id).negative_responses.len())
        .map(NegativeId)
        .collect();

    for id in ids {
        let (qname, rdtype, fully_proven, nsec_set_ids, any_invalid_proof, any_opt_out) = {
            let neg = graph.node(node_id).negative(id);
            let any_invalid_proof = neg
                .servers_clients
                .iter()
                .any(|scr| matches!(neg.status_by_response.get(scr), Some(s) if !s.is_valid()));
            let any_opt_out = neg.status_by_response.values().any(|s| s.is_valid() && s.opt_out);
            (
                neg.qname.clone(),
                neg.rdtype,
                neg.fully_proven(),
                neg.nsec_set_info.clone(),
                any_invalid_proof,
                any_opt_out,
            )
        };

        let key = ComponentKey { zone: zone.clone(), owner: qname, rdtype };
        let status = trust_graph.component_status(&key).unwrap_or_else(|| {
            if any_invalid_proof {
                // §4.8: a proof was present but failed to validate — distinct
                // from a proof simply missing, which is INSECURE instead.
                ComponentStatus::Bogus
            } else if !fully_proven {
                ComponentStatus::Insecure
            } else if any_opt_out {
                // A validly proven NSEC3 opt-out span doesn't itself prove
                // non-existence, only that no signed delegation covers it.
                ComponentStatus::Insecure
            } else {
                let all_secure = nsec_set_ids.iter().all(|nsid| {
                    graph
                        .node(node_id)
                        .nsec_set(*nsid)
                        .component_status
                        .values()
                        .all(|s| s.is_secure())
                });
                if all_secure {
                    ComponentStatus::NonExistent
                } else {
                    ComponentStatus::Insecure
                }
            }
        });

        graph.node_mut(node_id).negative_mut(id).response_component_status = Some(status);
    }
}
