use thiserror::Error;

/// Structural failures: programmer-visible conditions, not accumulated diagnostics.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("malformed DNS record data: {0}")]
    InvalidDnsResponse(String),

    #[error("unsupported DNSSEC algorithm: {0}")]
    UnsupportedAlgorithm(u8),

    #[error("unsupported DS/DLV digest type: {0}")]
    UnsupportedDigestType(u8),

    #[error("populate_ds_status called for rdtype {0:?}, expected DS or DLV")]
    InvalidDsQueryType(crate::RecordType),

    #[error("DLV status requested but no DLV parent is known for this name")]
    MissingDlvName,

    #[error("zone {0} has no DS queries in the collected corpus")]
    MissingDsQueries(String),

    #[error("dependency cycle detected while traversing the name graph")]
    LoopDetected,
}
