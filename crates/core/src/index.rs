//! C2 — DNSKEY indexer (§4.2). The rest of "Response Index" (per-node
//! RRset/RRSIG/NSEC-set/negative-response indices) is the arena storage
//! the collector already populates on [`crate::graph::NameNode`]; this
//! module only builds the derived `dnskeys`/`dnskey_sets` structures,
//! which the collector cannot populate itself because merging by rdata
//! and detecting CNAME pollution is evaluator logic.

use crate::enums::ComponentStatus;
use crate::graph::NameNode;
use crate::ids::DnskeyId;
use crate::types::{DnskeyMeta, DnskeyRecord};
use dnssec_analysis_domain::RecordType;
use std::collections::HashMap;

/// Builds `dnskeys` (rdata -> DNSKEYMeta, provenance-merged) and
/// `dnskey_sets` (one per distinct DNSKEY RRset) from this node's own
/// DNSKEY answer rrsets. Idempotent: re-running after the first
/// successful call is a no-op.
pub fn build_dnskey_index(node: &mut NameNode) {
    if node.dnskey_indexed {
        return;
    }
    node.dnskey_indexed = true;

    // identity (algorithm, key_tag, owner) -> arena index, to merge
    // provenance across multiple RRsets/responses returning the same key.
    let mut by_identity: HashMap<(u8, u16, String), DnskeyId> = HashMap::new();

    let rrset_ids: Vec<_> = node
        .rrsets
        .iter()
        .enumerate()
        .filter(|(_, r)| r.rdtype == RecordType::DNSKEY && r.owner == node.name)
        .map(|(i, _)| crate::ids::RrsetId(i))
        .collect();

    for rrset_id in rrset_ids {
        // CNAME-polluted entries are skipped (§4.2): a DNSKEY rrset
        // whose owner was itself a CNAME target rather than a direct
        // answer has no business seeding the zone's key set.
        if node.rrset(rrset_id).cname_info_from_dname.is_some() {
            continue;
        }

        let owner = node.rrset(rrset_id).owner.clone();
        let ttl = node.rrset(rrset_id).ttl;
        let servers_clients = node.rrset(rrset_id).servers_clients.clone();
        let records = node.rrset(rrset_id).records.clone();

        let mut set_members = Vec::new();

        for rdata in &records {
            let parsed = match DnskeyRecord::parse(rdata) {
                Ok(d) => d,
                Err(_) => continue,
            };

            let identity = {
                let tag = parsed.calculate_key_tag();
                (parsed.algorithm, tag, owner.clone())
            };

            let dnskey_id = match by_identity.get(&identity) {
                Some(id) => *id,
                None => {
                    let id = node.push_dnskey(DnskeyMeta::new(parsed, owner.clone(), ttl));
                    by_identity.insert(identity, id);
                    id
                }
            };

            let meta = node.dnskey_mut(dnskey_id);
            meta.rrset_infos.push(rrset_id);
            for scr in &servers_clients {
                if !meta.servers_clients.contains(scr) {
                    meta.servers_clients.push(*scr);
                }
            }
            set_members.push(dnskey_id);
        }

        if !set_members.is_empty() {
            node.dnskey_sets.push((set_members, rrset_id));
        }
    }
}

/// Component-status accessor mirroring §4.8's "DNSKEYMeta RRset info"
/// rule: a DNSKEY anchored directly by the graph is forced SECURE,
/// otherwise it inherits the owning RRsetInfo's component status.
pub fn dnskey_component_status(
    node: &NameNode,
    dnskey_id: DnskeyId,
    graph_anchored: bool,
) -> Option<ComponentStatus> {
    if graph_anchored {
        return Some(ComponentStatus::Secure);
    }
    let meta = node.dnskey(dnskey_id);
    meta.rrset_infos
        .iter()
        .find_map(|id| node.rrset(*id).response_component_status)
}
