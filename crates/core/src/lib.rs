//! Offline DNSSEC authentication assessment over a pre-collected corpus
//! of DNS queries and responses.
//!
//! This crate performs no I/O and issues no DNS queries of its own: the
//! caller collects a [`graph::NameGraph`] of [`graph::NameNode`]s ahead
//! of time (by whatever means — a live resolver, a packet capture, a
//! fixture file) and hands it to [`populate_status`], which runs the
//! RRSIG/DS/NSEC validation pipeline and fills in each node's evaluator
//! outputs in place. [`populate_response_component_status`] then mirrors
//! those outputs through an externally supplied [`propagator::TrustGraph`]
//! to produce final chain-aware component statuses, and [`serializer::serialize`]
//! renders one node's subtree to a deterministic JSON value.

mod crypto;
mod delegation;
mod diagnostics;
mod enums;
mod error;
mod graph;
mod ids;
mod index;
mod name_status;
mod negative_validator;
mod propagator;
mod response_errors;
mod rrsig_validator;
pub mod serializer;
mod trust_anchor;
mod types;

pub use crypto::CryptoEngine;
pub use diagnostics::{Diagnostic, DiagnosticCode, Diagnostics, Severity};
pub use enums::{ComponentStatus, DelegationStatus, DsStatus, NameStatus, NsecStatus, RrsigStatus};
pub use error::{AnalysisError, Result};
pub use graph::{AnalysisType, DelegationInfo, NameGraph, NameNode, NegativeKind, QueryAggregate};
pub use ids::{
    ClientId, DnskeyId, NegativeId, NodeId, NsecSetId, QueryId, ResponseId, RrsetId, ServerClientResponse,
    ServerId,
};
pub use propagator::{ComponentKey, NullTrustGraph, TrustGraph};
pub use trust_anchor::{TrustAnchor, TrustAnchorStore};
pub use types::{
    Cause, DnameInfo, DnskeyMeta, DnskeyRecord, DsRecord, HistoryEvent, NegativeResponseInfo, NsecProofStatus,
    NsecSetInfo, Query, Response, RetryAction, RrsetInfo, RrsigRecord, WildcardProofStatus,
};

/// Runs the full authentication pipeline (C2-C7) over every node in
/// `graph`, in dependency order: name status first (so CNAME/referral
/// propagation sees already-resolved targets), then DNSKEY indexing,
/// RRSIG validation and DNSKEY role finalization, negative-response
/// validation, delegation/DS binding, and response-error
/// classification. Does not touch component status — call
/// [`populate_response_component_status`] afterward for that.
pub fn populate_status(graph: &mut NameGraph, crypto: &CryptoEngine, trust_anchors: &TrustAnchorStore) {
    let node_ids: Vec<NodeId> = graph.iter_ids().collect();

    for node_id in &node_ids {
        let _ = name_status::populate_name_status(graph, *node_id, &[]);
    }

    for node_id in &node_ids {
        rrsig_validator::validate_rrsigs(graph, *node_id, crypto, trust_anchors);
        negative_validator::validate_negative_responses(graph, *node_id);
        delegation::evaluate_delegation(graph, *node_id, crypto);
        response_errors::classify_response_errors(graph, *node_id);
    }
}

/// Mirrors C4-C6's local outputs into final, chain-aware component
/// statuses via `trust_graph` (§4.8). Call after [`populate_status`].
pub fn populate_response_component_status(
    graph: &mut NameGraph,
    trust_graph: &dyn TrustGraph,
    trust_anchors: &TrustAnchorStore,
) {
    let node_ids: Vec<NodeId> = graph.iter_ids().collect();
    for node_id in node_ids {
        propagator::propagate_component_status(graph, node_id, trust_graph, trust_anchors);
    }
}
