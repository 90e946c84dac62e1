//! Diagnostic errors (§7, domain 1): accumulated, non-aborting
//! misbehaviors attached to the specific (server,client,response) triples
//! that exhibited them.

use crate::ids::ServerClientResponse;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    NetworkError,
    FormError,
    Timeout,
    InvalidRcode,
    UnknownResponseError,
    EdnsIgnored,
    UnsupportedEdnsVersion,
    PmtuExceeded,
    ResponseErrorWithEdns,
    ResponseErrorWithEdnsFlag,
    NotAuthoritative,
    RecursionNotAvailable,
    MissingRrsig,
    UnableToRetrieveDnssecRecords,
    MissingRrsigForAlgDnskey,
    MissingRrsigForAlgDs,
    MissingRrsigForAlgDlv,
    MissingNsecForWildcard,
    MissingNsecForNodata,
    MissingNsecForNxdomain,
    MissingSoaForNodata,
    MissingSoaForNxdomain,
    SoaOwnerNotZoneForNodata,
    SoaOwnerNotZoneForNxdomain,
    UpwardReferral,
    NoSep,
    MissingSepForAlg,
    RevokedNotSigning,
    TrustAnchorNotSigning,
    DnskeyNotAtZoneApex,
    DnskeyMissingFromServers,
    NoNsInParent,
    NsNameNotInChild,
    NsNameNotInParent,
    ErrorResolvingNsName,
    GlueMismatchError,
    MissingGlueForNsName,
    NoAddressForNsName,
    NoNsAddressesForIpv4,
    NoNsAddressesForIpv6,
    ServerUnresponsiveUdp,
    ServerUnresponsiveTcp,
    ServerInvalidResponse,
    ServerNotAuthoritative,
    InconsistentNxdomain,
    LoopDetected,
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::NetworkError => "NetworkError",
            DiagnosticCode::FormError => "FormError",
            DiagnosticCode::Timeout => "Timeout",
            DiagnosticCode::InvalidRcode => "InvalidRcode",
            DiagnosticCode::UnknownResponseError => "UnknownResponseError",
            DiagnosticCode::EdnsIgnored => "EDNSIgnored",
            DiagnosticCode::UnsupportedEdnsVersion => "UnsupportedEDNSVersion",
            DiagnosticCode::PmtuExceeded => "PMTUExceeded",
            DiagnosticCode::ResponseErrorWithEdns => "ResponseErrorWithEDNS",
            DiagnosticCode::ResponseErrorWithEdnsFlag => "ResponseErrorWithEDNSFlag",
            DiagnosticCode::NotAuthoritative => "NotAuthoritative",
            DiagnosticCode::RecursionNotAvailable => "RecursionNotAvailable",
            DiagnosticCode::MissingRrsig => "MissingRRSIG",
            DiagnosticCode::UnableToRetrieveDnssecRecords => "UnableToRetrieveDNSSECRecords",
            DiagnosticCode::MissingRrsigForAlgDnskey => "MissingRRSIGForAlgDNSKEY",
            DiagnosticCode::MissingRrsigForAlgDs => "MissingRRSIGForAlgDS",
            DiagnosticCode::MissingRrsigForAlgDlv => "MissingRRSIGForAlgDLV",
            DiagnosticCode::MissingNsecForWildcard => "MissingNSECForWildcard",
            DiagnosticCode::MissingNsecForNodata => "MissingNSECForNODATA",
            DiagnosticCode::MissingNsecForNxdomain => "MissingNSECForNXDOMAIN",
            DiagnosticCode::MissingSoaForNodata => "MissingSOAForNODATA",
            DiagnosticCode::MissingSoaForNxdomain => "MissingSOAForNXDOMAIN",
            DiagnosticCode::SoaOwnerNotZoneForNodata => "SOAOwnerNotZoneForNODATA",
            DiagnosticCode::SoaOwnerNotZoneForNxdomain => "SOAOwnerNotZoneForNXDOMAIN",
            DiagnosticCode::UpwardReferral => "UpwardReferral",
            DiagnosticCode::NoSep => "NoSEP",
            DiagnosticCode::MissingSepForAlg => "MissingSEPForAlg",
            DiagnosticCode::RevokedNotSigning => "RevokedNotSigning",
            DiagnosticCode::TrustAnchorNotSigning => "TrustAnchorNotSigning",
            DiagnosticCode::DnskeyNotAtZoneApex => "DNSKEYNotAtZoneApex",
            DiagnosticCode::DnskeyMissingFromServers => "DNSKEYMissingFromServers",
            DiagnosticCode::NoNsInParent => "NoNSInParent",
            DiagnosticCode::NsNameNotInChild => "NSNameNotInChild",
            DiagnosticCode::NsNameNotInParent => "NSNameNotInParent",
            DiagnosticCode::ErrorResolvingNsName => "ErrorResolvingNSName",
            DiagnosticCode::GlueMismatchError => "GlueMismatchError",
            DiagnosticCode::MissingGlueForNsName => "MissingGlueForNSName",
            DiagnosticCode::NoAddressForNsName => "NoAddressForNSName",
            DiagnosticCode::NoNsAddressesForIpv4 => "NoNSAddressesForIPv4",
            DiagnosticCode::NoNsAddressesForIpv6 => "NoNSAddressesForIPv6",
            DiagnosticCode::ServerUnresponsiveUdp => "ServerUnresponsiveUDP",
            DiagnosticCode::ServerUnresponsiveTcp => "ServerUnresponsiveTCP",
            DiagnosticCode::ServerInvalidResponse => "ServerInvalidResponse",
            DiagnosticCode::ServerNotAuthoritative => "ServerNotAuthoritative",
            DiagnosticCode::InconsistentNxdomain => "InconsistentNXDOMAIN",
            DiagnosticCode::LoopDetected => "LoopDetected",
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single accumulated diagnostic, attributed to the (server,client,
/// response) triples that exhibited it (invariant 5).
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub severity: Severity,
    pub servers_clients: Vec<ServerClientResponse>,
    pub detail: Option<String>,
}

impl Diagnostic {
    pub fn new(code: DiagnosticCode, severity: Severity, scr: ServerClientResponse) -> Self {
        Self {
            code,
            severity,
            servers_clients: vec![scr],
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn extend(&mut self, scr: ServerClientResponse) {
        if !self.servers_clients.contains(&scr) {
            self.servers_clients.push(scr);
        }
    }
}

/// Diagnostics split into warnings and errors, the way every evaluator
/// output field in §3 stores them (`rrset_warnings`/`rrset_errors`, etc).
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    pub warnings: Vec<Diagnostic>,
    pub errors: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn push(&mut self, severity: Severity, d: Diagnostic) {
        match severity {
            Severity::Warning => self.warnings.push(d),
            Severity::Error => self.errors.push(d),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty() && self.errors.is_empty()
    }
}
