use crate::enums::DsStatus;
use crate::ids::DnskeyId;
use dnssec_analysis_domain::DomainError;
use std::fmt;

/// A parsed DS (or DLV — same wire shape) rdata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DsRecord {
    pub key_tag: u16,
    pub algorithm: u8,
    pub digest_type: u8,
    pub digest: Vec<u8>,
}

impl DsRecord {
    pub fn parse(data: &[u8]) -> Result<Self, DomainError> {
        if data.len() < 4 {
            return Err(DomainError::InvalidDnsResponse("DS record too short".into()));
        }

        let key_tag = u16::from_be_bytes([data[0], data[1]]);
        let algorithm = data[2];
        let digest_type = data[3];
        let digest = data[4..].to_vec();

        Self::validate_digest_length(digest_type, digest.len())?;

        Ok(Self {
            key_tag,
            algorithm,
            digest_type,
            digest,
        })
    }

    fn validate_digest_length(digest_type: u8, length: usize) -> Result<(), DomainError> {
        let expected = match digest_type {
            1 => 20,
            2 => 32,
            4 => 48,
            _ => return Ok(()),
        };

        if length != expected {
            return Err(DomainError::InvalidDnsResponse(format!(
                "invalid digest length for type {digest_type}: got {length}, expected {expected}"
            )));
        }

        Ok(())
    }

    pub fn digest_type_name(&self) -> &'static str {
        match self.digest_type {
            1 => "SHA-1",
            2 => "SHA-256",
            4 => "SHA-384",
            _ => "Unknown",
        }
    }

    pub fn algorithm_name(&self) -> &'static str {
        super::dnskey::algorithm_name(self.algorithm)
    }
}

impl fmt::Display for DsRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DS(tag={}, algo={}, digest={})",
            self.key_tag,
            self.algorithm_name(),
            self.digest_type_name()
        )
    }
}

/// One (DNSKEY candidate, verification outcome) pair for a single DS
/// rdata. Mirrors `RrsigBinding`: `dnskey` is `None` for the sentinel
/// "no matching DNSKEY" binding.
#[derive(Debug, Clone)]
pub struct DsBinding {
    pub dnskey: Option<DnskeyId>,
    pub status: DsStatus,
}

/// The selected priority-group of bindings for one DS rdata, same
/// valid-beats-invalid-beats-indeterminate rule as `RrsigBindingGroup`
/// (§4.6 step 2).
#[derive(Debug, Clone, Default)]
pub struct DsBindingGroup {
    pub bindings: Vec<DsBinding>,
}

impl DsBindingGroup {
    pub fn is_valid(&self) -> bool {
        self.bindings.iter().any(|b| b.status.is_valid())
    }
}
