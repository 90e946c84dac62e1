//! C1 — Name Graph: the arena that owns every `DomainNameAnalysis` node
//! and all cross-references between them (§3, §9 "Cyclic graphs").
//!
//! Parent/DLV-parent/zone links, and the four dependency maps
//! (cname/mx/ns-dep/signer), are `Option<NodeId>` indices into
//! `NameGraph::nodes` rather than pointers, so cyclic dependency graphs
//! (CNAME loops, NS-dependency loops) are representable without `Rc`/
//! `Weak` and without unsafe code.

use crate::diagnostics::Diagnostics;
use crate::enums::{DelegationStatus, NameStatus};
use crate::ids::{DnskeyId, NegativeId, NodeId, NsecSetId, ResponseId, RrsetId};
use crate::types::{DnskeyMeta, DsBindingGroup, NegativeResponseInfo, NsecSetInfo, Response, RrsetInfo};
use dnssec_analysis_domain::RecordType;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisType {
    Authoritative,
    Recursive,
    Cache,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegativeKind {
    NoData,
    NxDomain,
}

/// Query aggregate (§3): one per (qname, rdtype), grouping the retries,
/// positive answers, and negative/error infos the collector observed.
#[derive(Debug, Clone, Default)]
pub struct QueryAggregate {
    pub responses: Vec<ResponseId>,
    pub answer_rrsets: Vec<RrsetId>,
    pub nodata_info: Vec<NegativeId>,
    pub nxdomain_info: Vec<NegativeId>,
}

/// Per-(rdtype) delegation result, one for DS and (optionally) one for DLV.
#[derive(Debug, Clone, Default)]
pub struct DelegationInfo {
    pub status: Option<DelegationStatus>,
    pub warnings: Diagnostics,
    pub errors: Diagnostics,
    pub dnskey_with_ds: Vec<DnskeyId>,
    /// Parallel to the DS rdata encountered across every DS/DLV RRset for
    /// this rdtype: the selected binding group per DS record (§4.6 step 2,
    /// invariant 1's DS-side counterpart).
    pub ds_binding_status: Vec<DsBindingGroup>,
}

/// One `DomainNameAnalysis` node (§3).
pub struct NameNode {
    pub name: String,
    pub analysis_type: AnalysisType,
    pub is_zone: bool,

    /// Timestamp this node's analysis was collected at — the sole "now"
    /// reference the crypto facade is allowed to use, so evaluation is
    /// deterministic and reproducible from the same corpus (§5).
    pub analysis_end: u32,

    pub parent: Option<NodeId>,
    pub dlv_parent: Option<NodeId>,
    pub zone: Option<NodeId>,

    pub queries: HashMap<(String, RecordType), QueryAggregate>,
    pub cname_targets: HashMap<String, Option<NodeId>>,
    pub mx_targets: HashMap<String, Option<NodeId>>,
    pub ns_dependencies: HashMap<String, Option<NodeId>>,
    pub external_signers: HashMap<String, Option<NodeId>>,

    pub responses: Vec<Response>,
    pub rrsets: Vec<RrsetInfo>,
    pub dnskeys: Vec<DnskeyMeta>,
    /// One entry per distinct DNSKEY RRset returned for this node's name.
    pub dnskey_sets: Vec<(Vec<DnskeyId>, RrsetId)>,
    /// Set once the DNSKEY indexer (C2, §4.2) has run; subsequent calls
    /// are no-ops (idempotent, per the data model lifecycle note).
    pub dnskey_indexed: bool,
    pub negative_responses: Vec<NegativeResponseInfo>,
    pub negative_kind: Vec<NegativeKind>,
    pub nsec_sets: Vec<NsecSetInfo>,

    // --- evaluator outputs (§3), initially absent ---
    pub status: Option<NameStatus>,
    pub yxdomain: HashSet<String>,
    pub yxrrset: HashSet<(String, RecordType)>,
    pub nxrrset: HashSet<(String, RecordType)>,
    pub response_errors: Diagnostics,
    pub delegation: HashMap<RecordType, DelegationInfo>,

    pub dnssec_algorithms_in_dnskey: HashSet<u8>,
    pub dnssec_algorithms_in_ds: HashSet<u8>,
    pub dnssec_algorithms_in_dlv: HashSet<u8>,
    pub dnssec_algorithms_digest_in_ds: HashSet<u8>,
    pub dnssec_algorithms_digest_in_dlv: HashSet<u8>,
}

impl NameNode {
    pub fn new(name: impl Into<String>, analysis_type: AnalysisType, analysis_end: u32) -> Self {
        Self {
            name: name.into(),
            analysis_type,
            is_zone: false,
            analysis_end,
            parent: None,
            dlv_parent: None,
            zone: None,
            queries: HashMap::new(),
            cname_targets: HashMap::new(),
            mx_targets: HashMap::new(),
            ns_dependencies: HashMap::new(),
            external_signers: HashMap::new(),
            responses: Vec::new(),
            rrsets: Vec::new(),
            dnskeys: Vec::new(),
            dnskey_sets: Vec::new(),
            dnskey_indexed: false,
            negative_responses: Vec::new(),
            negative_kind: Vec::new(),
            nsec_sets: Vec::new(),
            status: None,
            yxdomain: HashSet::new(),
            yxrrset: HashSet::new(),
            nxrrset: HashSet::new(),
            response_errors: Diagnostics::default(),
            delegation: HashMap::new(),
            dnssec_algorithms_in_dnskey: HashSet::new(),
            dnssec_algorithms_in_ds: HashSet::new(),
            dnssec_algorithms_in_dlv: HashSet::new(),
            dnssec_algorithms_digest_in_ds: HashSet::new(),
            dnssec_algorithms_digest_in_dlv: HashSet::new(),
        }
    }

    pub fn push_response(&mut self, r: Response) -> ResponseId {
        self.responses.push(r);
        ResponseId(self.responses.len() - 1)
    }

    pub fn push_rrset(&mut self, r: RrsetInfo) -> RrsetId {
        self.rrsets.push(r);
        RrsetId(self.rrsets.len() - 1)
    }

    pub fn push_dnskey(&mut self, d: DnskeyMeta) -> DnskeyId {
        self.dnskeys.push(d);
        DnskeyId(self.dnskeys.len() - 1)
    }

    pub fn push_negative(&mut self, n: NegativeResponseInfo, kind: NegativeKind) -> NegativeId {
        self.negative_responses.push(n);
        self.negative_kind.push(kind);
        NegativeId(self.negative_responses.len() - 1)
    }

    pub fn push_nsec_set(&mut self, n: NsecSetInfo) -> NsecSetId {
        self.nsec_sets.push(n);
        NsecSetId(self.nsec_sets.len() - 1)
    }

    pub fn rrset(&self, id: RrsetId) -> &RrsetInfo {
        &self.rrsets[id.0]
    }

    pub fn rrset_mut(&mut self, id: RrsetId) -> &mut RrsetInfo {
        &mut self.rrsets[id.0]
    }

    pub fn dnskey(&self, id: DnskeyId) -> &DnskeyMeta {
        &self.dnskeys[id.0]
    }

    pub fn dnskey_mut(&mut self, id: DnskeyId) -> &mut DnskeyMeta {
        &mut self.dnskeys[id.0]
    }

    pub fn negative(&self, id: NegativeId) -> &NegativeResponseInfo {
        &self.negative_responses[id.0]
    }

    pub fn negative_mut(&mut self, id: NegativeId) -> &mut NegativeResponseInfo {
        &mut self.negative_responses[id.0]
    }

    pub fn nsec_set(&self, id: NsecSetId) -> &NsecSetInfo {
        &self.nsec_sets[id.0]
    }

    pub fn nsec_set_mut(&mut self, id: NsecSetId) -> &mut NsecSetInfo {
        &mut self.nsec_sets[id.0]
    }

    pub fn response(&self, id: ResponseId) -> &Response {
        &self.responses[id.0]
    }

    /// DNSKEYs playing the key-signing role, per §3 invariant 2.
    pub fn ksks(&self) -> impl Iterator<Item = DnskeyId> + '_ {
        self.dnskeys
            .iter()
            .enumerate()
            .filter(|(_, d)| d.is_ksk_role)
            .map(|(i, _)| DnskeyId(i))
    }

    pub fn zsks(&self) -> impl Iterator<Item = DnskeyId> + '_ {
        self.dnskeys
            .iter()
            .enumerate()
            .filter(|(_, d)| d.is_zsk_role)
            .map(|(i, _)| DnskeyId(i))
    }

    pub fn published_keys(&self) -> impl Iterator<Item = DnskeyId> + '_ {
        self.dnskeys
            .iter()
            .enumerate()
            .filter(|(_, d)| !d.is_ksk_role && !d.is_zsk_role)
            .map(|(i, _)| DnskeyId(i))
    }

    pub fn revoked_keys(&self) -> impl Iterator<Item = DnskeyId> + '_ {
        self.dnskeys
            .iter()
            .enumerate()
            .filter(|(_, d)| d.is_revoked_role)
            .map(|(i, _)| DnskeyId(i))
    }

    pub fn dnskey_with_ds(&self) -> Vec<DnskeyId> {
        self.delegation
            .get(&RecordType::DS)
            .map(|d| d.dnskey_with_ds.clone())
            .unwrap_or_default()
    }
}

/// NameGraph (C1): the arena of all `NameNode`s plus a name -> index
/// lookup used to resolve signer/dependency names during evaluation.
#[derive(Default)]
pub struct NameGraph {
    nodes: Vec<NameNode>,
    by_name: HashMap<(String, u8 /* AnalysisType discriminant */), NodeId>,
}

impl NameGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: NameNode) -> NodeId {
        let key = (node.name.clone(), analysis_type_tag(node.analysis_type));
        let id = NodeId(self.nodes.len());
        self.by_name.insert(key, id);
        self.nodes.push(node);
        id
    }

    pub fn node(&self, id: NodeId) -> &NameNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut NameNode {
        &mut self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn find(&self, name: &str, analysis_type: AnalysisType) -> Option<NodeId> {
        self.by_name
            .get(&(name.to_string(), analysis_type_tag(analysis_type)))
            .copied()
    }

    /// Resolves a signer/dependency name to a node of the same analysis
    /// type as `from`, if the collector analysed it. A `None` result
    /// means "stub node" — the caller (§4.3 step 4) must skip it.
    pub fn resolve(&self, from: NodeId, name: &str) -> Option<NodeId> {
        self.find(name, self.nodes[from.0].analysis_type)
    }

    pub fn iter_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }
}

fn analysis_type_tag(t: AnalysisType) -> u8 {
    match t {
        AnalysisType::Authoritative => 0,
        AnalysisType::Recursive => 1,
        AnalysisType::Cache => 2,
    }
}
