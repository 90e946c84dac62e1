//! End-to-end scenarios, one per literal case in the testable-properties
//! section: builds a small hand-constructed corpus, runs the full
//! pipeline, and checks the resulting statuses.

use dnssec_analysis_core::{
    populate_response_component_status, populate_status, AnalysisType, ComponentStatus,
    CryptoEngine, DelegationStatus, DiagnosticCode, NameGraph, NameNode, NullTrustGraph, RrsetInfo,
    TrustAnchorStore,
};
use dnssec_analysis_domain::RecordType;
use ring::signature::{Ed25519KeyPair, KeyPair};
use sha2::{Digest, Sha256};

fn base_response() -> dnssec_analysis_core::Response {
    dnssec_analysis_core::Response {
        server: dnssec_analysis_core::ServerId(0),
        client: dnssec_analysis_core::ClientId(0),
        rcode: 0,
        query: dnssec_analysis_core::Query {
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

fn signing_keypair() -> Ed25519KeyPair {
    let rng = ring::rand::SystemRandom::new();
    let pkcs8 = Ed25519KeyPair::generate_pkcs8(&rng).unwrap();
    Ed25519KeyPair::from_pkcs8(pkcs8.as_ref()).unwrap()
}

fn build_tbs(
    rrsig: &dnssec_analysis_core::RrsigRecord,
    owner: &str,
    records: &[Vec<u8>],
) -> Vec<u8> {
    fn wire(name: &str) -> Vec<u8> {
        let mut w = Vec::new();
        for label in name.trim_end_matches('.').split('.') {
            if label.is_empty() {
                continue;
            }
            w.push(label.len() as u8);
            w.extend_from_slice(label.to_lowercase().as_bytes());
        }
        w.push(0);
        w
    }

    let mut tbs = Vec::new();
    tbs.extend_from_slice(&rrsig.type_covered.to_u16().to_be_bytes());
    tbs.push(rrsig.algorithm);
    tbs.push(rrsig.labels);
    tbs.extend_from_slice(&rrsig.original_ttl.to_be_bytes());
    tbs.extend_from_slice(&rrsig.signature_expiration.to_be_bytes());
    tbs.extend_from_slice(&rrsig.signature_inception.to_be_bytes());
    tbs.extend_from_slice(&rrsig.key_tag.to_be_bytes());
    tbs.extend_from_slice(&wire(&rrsig.signer_name));

    let owner_wire = wire(owner);
    let mut canonical: Vec<&Vec<u8>> = records.iter().collect();
    canonical.sort();
    for rdata in canonical {
        tbs.extend_from_slice(&owner_wire);
        tbs.extend_from_slice(&rrsig.type_covered.to_u16().to_be_bytes());
        tbs.extend_from_slice(&1u16.to_be_bytes());
        tbs.extend_from_slice(&rrsig.original_ttl.to_be_bytes());
        tbs.extend_from_slice(&(rdata.len() as u16).to_be_bytes());
        tbs.extend_from_slice(rdata);
    }
    tbs
}

fn ds_wire(key: &dnssec_analysis_core::DnskeyRecord, owner: &str, digest_type: u8) -> Vec<u8> {
    let mut data = Vec::new();
    for label in owner.trim_end_matches('.').split('.') {
        if label.is_empty() {
            continue;
        }
        data.push(label.len() as u8);
        data.extend_from_slice(label.to_lowercase().as_bytes());
    }
    data.push(0);
    data.extend_from_slice(&key.flags.to_be_bytes());
    data.push(key.protocol);
    data.push(key.algorithm);
    data.extend_from_slice(&key.public_key);

    let mut hasher = Sha256::new();
    hasher.update(&data);
    let digest = hasher.finalize().to_vec();

    let mut wire = Vec::new();
    wire.extend_from_slice(&key.calculate_key_tag().to_be_bytes());
    wire.push(key.algorithm);
    wire.push(digest_type);
    wire.extend_from_slice(&digest);
    wire
}

/// Scenario 1: secure chain, one algorithm — a zone apex signed by a
/// KSK whose DS record matches, plus a ZSK signing a plain A RRset.
#[test]
fn secure_chain_one_algorithm() {
    let mut graph = NameGraph::new();
    let mut node = NameNode::new("example.", AnalysisType::Authoritative, 1000);

    let ksk_pair = signing_keypair();
    let ksk = dnssec_analysis_core::DnskeyRecord {
        flags: 257,
        protocol: 3,
        algorithm: 15,
        public_key: ksk_pair.public_key().as_ref().to_vec(),
    };
    let zsk_pair = signing_keypair();
    let zsk = dnssec_analysis_core::DnskeyRecord {
        flags: 256,
        protocol: 3,
        algorithm: 15,
        public_key: zsk_pair.public_key().as_ref().to_vec(),
    };

    node.push_response(base_response());
    let dnskey_records = vec![
        {
            let mut w = Vec::new();
            w.extend_from_slice(&ksk.flags.to_be_bytes());
            w.push(ksk.protocol);
            w.push(ksk.algorithm);
            w.extend_from_slice(&ksk.public_key);
            w
        },
        {
            let mut w = Vec::new();
            w.extend_from_slice(&zsk.flags.to_be_bytes());
            w.push(zsk.protocol);
            w.push(zsk.algorithm);
            w.extend_from_slice(&zsk.public_key);
            w
        },
    ];

    let response_scr = dnssec_analysis_core::ServerClientResponse::new(
        dnssec_analysis_core::ServerId(0),
        dnssec_analysis_core::ClientId(0),
        dnssec_analysis_core::ResponseId(0),
    );

    let mut dnskey_rrset = RrsetInfo::new("example.".into(), RecordType::DNSKEY, 3600);
    dnskey_rrset.records = dnskey_records.clone();
    dnskey_rrset.servers_clients = vec![response_scr];

    let mut dnskey_rrsig = dnssec_analysis_core::RrsigRecord {
        type_covered: RecordType::DNSKEY,
        algorithm: 15,
        labels: 1,
        original_ttl: 3600,
        signature_expiration: 2000,
        signature_inception: 0,
        key_tag: ksk.calculate_key_tag(),
        signer_name: "example.".to_string(),
        signature: Vec::new(),
    };
    let tbs = build_tbs(&dnskey_rrsig, "example.", &dnskey_records);
    dnskey_rrsig.signature = ksk_pair.sign(&tbs).as_ref().to_vec();
    dnskey_rrset.rrsigs.push(dnskey_rrsig);
    node.push_rrset(dnskey_rrset);

    let a_records = vec![vec![192, 0, 2, 1]];
    let mut a_rrset = RrsetInfo::new("example.".into(), RecordType::A, 300);
    a_rrset.records = a_records.clone();
    a_rrset.servers_clients = vec![response_scr];
    let mut a_rrsig = dnssec_analysis_core::RrsigRecord {
        type_covered: RecordType::A,
        algorithm: 15,
        labels: 1,
        original_ttl: 300,
        signature_expiration: 2000,
        signature_inception: 0,
        key_tag: zsk.calculate_key_tag(),
        signer_name: "example.".to_string(),
        signature: Vec::new(),
    };
    let tbs = build_tbs(&a_rrsig, "example.", &a_records);
    a_rrsig.signature = zsk_pair.sign(&tbs).as_ref().to_vec();
    a_rrset.rrsigs.push(a_rrsig);
    node.push_rrset(a_rrset);

    let mut ds_rrset = RrsetInfo::new("example.".into(), RecordType::DS, 3600);
    ds_rrset.records = vec![ds_wire(&ksk, "example.", 2)];
    ds_rrset.servers_clients = vec![response_scr];
    node.push_rrset(ds_rrset);

    let id = graph.add_node(node);

    let crypto = CryptoEngine::with_default_algorithms();
    let anchors = TrustAnchorStore::empty();
    populate_status(&mut graph, &crypto, &anchors);
    populate_response_component_status(&mut graph, &NullTrustGraph, &anchors);

    assert_eq!(
        graph.node(id).delegation[&RecordType::DS].status,
        Some(DelegationStatus::Secure)
    );
    assert!(graph.node(id).ksks().any(|k| graph.node(id).dnskey(k).key_tag == ksk.calculate_key_tag()));
    assert!(graph.node(id).zsks().any(|k| graph.node(id).dnskey(k).key_tag == zsk.calculate_key_tag()));
    assert_eq!(graph.node(id).dnskey_with_ds(), {
        let ksk_id = graph.node(id).ksks().next().unwrap();
        vec![ksk_id]
    });
}

/// Scenario 2: DS present but with an unsupported digest type never
/// matches any DNSKEY, so the delegation reports no secure binding.
#[test]
fn unsupported_ds_digest_type_yields_no_binding() {
    let mut graph = NameGraph::new();
    let mut node = NameNode::new("example.", AnalysisType::Authoritative, 1000);
    node.push_response(base_response());
    let response_scr = dnssec_analysis_core::ServerClientResponse::new(
        dnssec_analysis_core::ServerId(0),
        dnssec_analysis_core::ClientId(0),
        dnssec_analysis_core::ResponseId(0),
    );

    let ksk = dnssec_analysis_core::DnskeyRecord {
        flags: 257,
        protocol: 3,
        algorithm: 8,
        public_key: vec![1, 2, 3, 4, 5, 6, 7, 8],
    };
    let mut meta = dnssec_analysis_core::DnskeyMeta::new(ksk.clone(), "example.".into(), 3600);
    meta.is_ksk_role = true;
    node.push_dnskey(meta);

    let mut ds_rrset = RrsetInfo::new("example.".into(), RecordType::DS, 3600);
    ds_rrset.records = vec![ds_wire(&ksk, "example.", 99)];
    ds_rrset.servers_clients = vec![response_scr];
    node.push_rrset(ds_rrset);

    let id = graph.add_node(node);
    let crypto = CryptoEngine::with_default_algorithms();
    populate_status(&mut graph, &crypto, &TrustAnchorStore::empty());

    let info = &graph.node(id).delegation[&RecordType::DS];
    assert!(info.dnskey_with_ds.is_empty());
    assert_eq!(info.status, Some(DelegationStatus::Insecure));
    assert!(info.warnings.warnings.iter().any(|d| d.code == DiagnosticCode::NoSep));
}

/// Scenario 3: bogus NXDOMAIN — the NSEC set returned actually covers
/// the qname directly, so it fails to prove non-existence.
#[test]
fn bogus_nxdomain_proof() {
    let mut graph = NameGraph::new();
    let mut node = NameNode::new("example.", AnalysisType::Authoritative, 1000);
    node.push_response(base_response());
    let response_scr = dnssec_analysis_core::ServerClientResponse::new(
        dnssec_analysis_core::ServerId(0),
        dnssec_analysis_core::ClientId(0),
        dnssec_analysis_core::ResponseId(0),
    );

    let soa_id = node.push_rrset(RrsetInfo::new("example.".into(), RecordType::SOA, 300));

    let mut nsec_set = dnssec_analysis_core::NsecSetInfo::new(false);
    nsec_set.servers_clients.push(response_scr);
    // Covers a.example. directly, which fails to prove its non-existence.
    nsec_set.rrsets.insert("a.example.".into(), soa_id);
    let nsec_set_id = node.push_nsec_set(nsec_set);

    let mut neg = dnssec_analysis_core::NegativeResponseInfo::new("a.example.".into(), RecordType::A);
    neg.servers_clients.push(response_scr);
    neg.soa_rrset_info.push(soa_id);
    neg.nsec_set_info.push(nsec_set_id);
    node.push_negative(neg, dnssec_analysis_core::NegativeKind::NxDomain);

    let id = graph.add_node(node);
    let crypto = CryptoEngine::with_default_algorithms();
    let anchors = TrustAnchorStore::empty();
    populate_status(&mut graph, &crypto, &anchors);
    populate_response_component_status(&mut graph, &NullTrustGraph, &anchors);

    let neg = &graph.node(id).negative_responses[0];
    let status = neg.status_by_response[&response_scr];
    assert!(!status.is_valid());
    assert_eq!(neg.response_component_status, Some(ComponentStatus::Bogus));
}

/// Scenario 5: inconsistent NXDOMAIN — the same (server,client) pair
/// produced both a NODATA and an NXDOMAIN proof for the same query.
#[test]
fn inconsistent_nxdomain_is_flagged() {
    let mut graph = NameGraph::new();
    let mut node = NameNode::new("example.", AnalysisType::Authoritative, 1000);
    node.push_response(base_response());
    let response_scr = dnssec_analysis_core::ServerClientResponse::new(
        dnssec_analysis_core::ServerId(0),
        dnssec_analysis_core::ClientId(0),
        dnssec_analysis_core::ResponseId(0),
    );

    let nodata = dnssec_analysis_core::NegativeResponseInfo::new("foo.example.".into(), RecordType::A);
    let nodata_id = node.push_negative(nodata, dnssec_analysis_core::NegativeKind::NoData);
    let nxdomain = dnssec_analysis_core::NegativeResponseInfo::new("foo.example.".into(), RecordType::A);
    let nxdomain_id = node.push_negative(nxdomain, dnssec_analysis_core::NegativeKind::NxDomain);

    let mut agg = dnssec_analysis_core::QueryAggregate::default();
    agg.nodata_info.push(nodata_id);
    agg.nxdomain_info.push(nxdomain_id);
    node.queries
        .insert(("foo.example.".to_string(), RecordType::A), agg);
    node.negative_mut(nodata_id).servers_clients.push(response_scr);
    node.negative_mut(nxdomain_id).servers_clients.push(response_scr);

    let id = graph.add_node(node);
    let crypto = CryptoEngine::with_default_algorithms();
    populate_status(&mut graph, &crypto, &TrustAnchorStore::empty());

    let codes: Vec<DiagnosticCode> = graph
        .node(id)
        .response_errors
        .warnings
        .iter()
        .map(|d| d.code)
        .collect();
    assert!(codes.contains(&DiagnosticCode::InconsistentNxdomain));
}

/// Scenario 6: wildcard — a valid NSEC/NSEC3 proof accompanies a
/// wildcard-synthesized answer, so no missing-proof diagnostic fires.
#[test]
fn wildcard_proof_valid_suppresses_missing_nsec_diagnostic() {
    let mut graph = NameGraph::new();
    let mut node = NameNode::new("example.", AnalysisType::Authoritative, 1000);
    node.push_response(base_response());
    let response_scr = dnssec_analysis_core::ServerClientResponse::new(
        dnssec_analysis_core::ServerId(0),
        dnssec_analysis_core::ClientId(0),
        dnssec_analysis_core::ResponseId(0),
    );

    let soa_id = node.push_rrset(RrsetInfo::new("example.".into(), RecordType::SOA, 300));
    let mut nsec_set = dnssec_analysis_core::NsecSetInfo::new(false);
    nsec_set.servers_clients.push(response_scr);
    nsec_set.rrsets.insert("x.example.".into(), soa_id);
    let nsec_set_id = node.push_nsec_set(nsec_set);

    let mut answer = RrsetInfo::new("x.example.".into(), RecordType::A, 300);
    answer.records.push(vec![192, 0, 2, 2]);
    answer.servers_clients.push(response_scr);
    answer
        .wildcard_info
        .insert("*.example.".to_string(), nsec_set_id);
    node.push_rrset(answer);

    let id = graph.add_node(node);
    let crypto = CryptoEngine::with_default_algorithms();
    populate_status(&mut graph, &crypto, &TrustAnchorStore::empty());

    let rrset = &graph.node(id).rrsets[0];
    assert_eq!(rrset.wildcard_status.len(), 1);
    assert!(rrset.wildcard_status[0].proof.is_valid());
    assert!(!rrset
        .warnings
        .warnings
        .iter()
        .any(|d| d.code == DiagnosticCode::MissingNsecForWildcard));
}
