use super::rrsig::RrsigRecord;
use crate::diagnostics::Diagnostics;
use crate::enums::{ComponentStatus, RrsigStatus};
use crate::ids::{DnskeyId, NsecSetId, RrsetId, ServerClientResponse};
use dnssec_analysis_domain::RecordType;
use std::collections::HashMap;

/// DNAME synthesis provenance: the CNAME this RRset's owner inherited by
/// a DNAME further up the tree.
#[derive(Debug, Clone)]
pub struct DnameInfo {
    pub owner: String,
    pub target_suffix: String,
}

/// Outcome of validating one wildcard-covering NSEC/NSEC3 proof.
#[derive(Debug, Clone)]
pub struct WildcardProofStatus {
    pub wildcard_owner: String,
    pub proof: super::NsecProofStatus,
}

/// One (DNSKEY candidate, verification outcome) pair for a single
/// RRSIG. `dnskey` is `None` for the sentinel "no matching DNSKEY"
/// binding (invariant 1 requires this entry to exist even then).
#[derive(Debug, Clone)]
pub struct RrsigBinding {
    pub dnskey: Option<DnskeyId>,
    pub status: RrsigStatus,
}

/// The selected priority-group of bindings for one RRSIG: *valid* beats
/// *invalid* beats *indeterminate* (§4.3 step 4's "first group in
/// priority order" rule).
#[derive(Debug, Clone, Default)]
pub struct RrsigBindingGroup {
    pub bindings: Vec<RrsigBinding>,
}

impl RrsigBindingGroup {
    pub fn is_valid(&self) -> bool {
        self.bindings.iter().any(|b| b.status.is_valid())
    }
}

/// RRsetInfo (§3): an RRset together with its provenance and the
/// evaluator outputs attached to it by C4/C5.
#[derive(Debug, Clone)]
pub struct RrsetInfo {
    pub owner: String,
    pub rdtype: RecordType,
    pub ttl: u32,
    /// Raw wire rdata, one entry per RR in the set — kept uninterpreted
    /// so the crypto facade can canonicalize the set for TBS regardless
    /// of rdtype.
    pub records: Vec<Vec<u8>>,
    pub rrsigs: Vec<RrsigRecord>,
    pub servers_clients: Vec<ServerClientResponse>,
    pub dname_info: Option<DnameInfo>,
    pub cname_info_from_dname: Option<String>,
    /// wildcard-owner name -> NSEC/NSEC3 proof bundle covering it.
    pub wildcard_info: HashMap<String, NsecSetId>,
    pub soa_rrset_info: Vec<RrsetId>,
    /// Responses in which this RRset was synthesized by a DNAME rather
    /// than directly signed; algorithm-coverage checks are suppressed
    /// for these (§4.3 step 3).
    pub dname_synthesized_responses: Vec<ServerClientResponse>,

    pub warnings: Diagnostics,
    pub errors: Diagnostics,
    /// Parallel to `rrsigs`: the selected binding group per RRSIG.
    pub rrsig_status: Vec<RrsigBindingGroup>,
    pub wildcard_status: Vec<WildcardProofStatus>,
    pub response_component_status: Option<ComponentStatus>,
}

impl RrsetInfo {
    pub fn new(owner: String, rdtype: RecordType, ttl: u32) -> Self {
        Self {
            owner,
            rdtype,
            ttl,
            records: Vec::new(),
            rrsigs: Vec::new(),
            servers_clients: Vec::new(),
            dname_info: None,
            cname_info_from_dname: None,
            wildcard_info: HashMap::new(),
            soa_rrset_info: Vec::new(),
            dname_synthesized_responses: Vec::new(),
            warnings: Diagnostics::default(),
            errors: Diagnostics::default(),
            rrsig_status: Vec::new(),
            wildcard_status: Vec::new(),
            response_component_status: None,
        }
    }

    /// Identity key used instead of object identity, per Design Notes:
    /// `(qname, rdtype, signers-clients-fingerprint)`.
    pub fn identity_fingerprint(&self) -> u64 {
        use std::hash::{Hash, Hasher};
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        self.owner.hash(&mut hasher);
        self.rdtype.to_u16().hash(&mut hasher);
        for scr in &self.servers_clients {
            scr.hash(&mut hasher);
        }
        hasher.finish()
    }

    pub fn is_dname_synthesized(&self, scr: ServerClientResponse) -> bool {
        self.dname_synthesized_responses.contains(&scr)
    }
}
