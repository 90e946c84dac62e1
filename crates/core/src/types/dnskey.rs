use crate::diagnostics::Diagnostics;
use crate::ids::{RrsetId, ServerClientResponse};
use dnssec_analysis_domain::DomainError;
use std::fmt;

/// A parsed DNSKEY rdata. Adapted from the wire-parsing/key-tag logic a
/// live resolver uses, minus any assumption about where the bytes came
/// from (a previously collected corpus, not a socket).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnskeyRecord {
    pub flags: u16,
    pub protocol: u8,
    pub algorithm: u8,
    pub public_key: Vec<u8>,
}

const FLAG_ZONE_KEY: u16 = 0x0100;
const FLAG_SEP: u16 = 0x0001;
const FLAG_REVOKE: u16 = 0x0080;

impl DnskeyRecord {
    pub fn parse(data: &[u8]) -> Result<Self, DomainError> {
        if data.len() < 4 {
            return Err(DomainError::InvalidDnsResponse(
                "DNSKEY record too short".into(),
            ));
        }

        let flags = u16::from_be_bytes([data[0], data[1]]);
        let protocol = data[2];
        let algorithm = data[3];
        let public_key = data[4..].to_vec();

        if protocol != 3 {
            return Err(DomainError::InvalidDnsResponse(format!(
                "invalid DNSKEY protocol: {protocol} (expected 3)"
            )));
        }

        if flags & FLAG_ZONE_KEY == 0 {
            return Err(DomainError::InvalidDnsResponse(
                "DNSKEY zone-key flag not set".into(),
            ));
        }

        Ok(Self {
            flags,
            protocol,
            algorithm,
            public_key,
        })
    }

    pub fn is_sep(&self) -> bool {
        self.flags & FLAG_SEP != 0
    }

    pub fn is_revoked(&self) -> bool {
        self.flags & FLAG_REVOKE != 0
    }

    /// RFC 4034 appendix B key-tag algorithm.
    pub fn calculate_key_tag(&self) -> u16 {
        Self::key_tag_for_flags(self.flags, self.protocol, self.algorithm, &self.public_key)
    }

    /// The key tag the record would have had before the revoke bit was
    /// set — a DS minted before revocation still carries this tag, so
    /// binding rules must accept either value (§4.3).
    pub fn calculate_key_tag_no_revoke(&self) -> u16 {
        Self::key_tag_for_flags(
            self.flags & !FLAG_REVOKE,
            self.protocol,
            self.algorithm,
            &self.public_key,
        )
    }

    fn key_tag_for_flags(flags: u16, protocol: u8, algorithm: u8, public_key: &[u8]) -> u16 {
        let mut wire = Vec::with_capacity(4 + public_key.len());
        wire.extend_from_slice(&flags.to_be_bytes());
        wire.push(protocol);
        wire.push(algorithm);
        wire.extend_from_slice(public_key);

        let mut accumulator: u32 = 0;
        for chunk in wire.chunks(2) {
            if chunk.len() == 2 {
                accumulator += u32::from(u16::from_be_bytes([chunk[0], chunk[1]]));
            } else {
                accumulator += u32::from(chunk[0]) << 8;
            }
        }
        accumulator += accumulator >> 16;
        (accumulator & 0xFFFF) as u16
    }

    pub fn algorithm_name(&self) -> &'static str {
        algorithm_name(self.algorithm)
    }
}

pub fn algorithm_name(algorithm: u8) -> &'static str {
    match algorithm {
        5 => "RSA/SHA-1",
        7 => "RSASHA1-NSEC3-SHA1",
        8 => "RSA/SHA-256",
        10 => "RSA/SHA-512",
        13 => "ECDSA P-256/SHA-256",
        14 => "ECDSA P-384/SHA-384",
        15 => "Ed25519",
        16 => "Ed448",
        _ => "Unknown",
    }
}

impl fmt::Display for DnskeyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DNSKEY(flags={}, algo={}, tag={}, {})",
            self.flags,
            self.algorithm_name(),
            self.calculate_key_tag(),
            if self.is_sep() { "SEP" } else { "ZSK" }
        )
    }
}

/// DNSKEYMeta (§3): the rdata plus provenance, roles, and diagnostics
/// accumulated as the RRSIG and DS evaluators walk the graph. Indexed by
/// `(algorithm, key_tag, owner)` rather than object identity, per the
/// Design Notes guidance for implementations without reference identity.
#[derive(Debug, Clone)]
pub struct DnskeyMeta {
    pub rdata: DnskeyRecord,
    pub owner: String,
    pub ttl: u32,
    pub key_tag: u16,
    pub key_tag_no_revoke: u16,
    pub rrset_infos: Vec<RrsetId>,
    pub servers_clients: Vec<ServerClientResponse>,
    pub warnings: Diagnostics,
    pub errors: Diagnostics,
    /// Role finalization output: set once all RRSIGs/DS bindings on the
    /// zone are known (§4.3 step 6, "DNSKEY role finalization").
    pub is_ksk_role: bool,
    pub is_zsk_role: bool,
    pub is_revoked_role: bool,
}

impl DnskeyMeta {
    pub fn new(rdata: DnskeyRecord, owner: String, ttl: u32) -> Self {
        let key_tag = rdata.calculate_key_tag();
        let key_tag_no_revoke = rdata.calculate_key_tag_no_revoke();
        let is_revoked_role = rdata.is_revoked();
        Self {
            rdata,
            owner,
            ttl,
            key_tag,
            key_tag_no_revoke,
            rrset_infos: Vec::new(),
            servers_clients: Vec::new(),
            warnings: Diagnostics::default(),
            errors: Diagnostics::default(),
            is_ksk_role: false,
            is_zsk_role: false,
            is_revoked_role,
        }
    }

    /// Identity key used instead of object identity (Design Notes).
    pub fn identity(&self) -> (u8, u16, String) {
        (self.rdata.algorithm, self.key_tag, self.owner.clone())
    }

    pub fn matches_tag(&self, tag: u16) -> bool {
        tag == self.key_tag || tag == self.key_tag_no_revoke
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revoke_bit_changes_tag_but_no_revoke_tag_is_recoverable() {
        let base = DnskeyRecord {
            flags: FLAG_ZONE_KEY | FLAG_SEP,
            protocol: 3,
            algorithm: 8,
            public_key: vec![1, 2, 3, 4, 5, 6, 7, 8],
        };
        let mut revoked = base.clone();
        revoked.flags |= FLAG_REVOKE;

        assert_ne!(base.calculate_key_tag(), revoked.calculate_key_tag());
        assert_eq!(base.calculate_key_tag(), revoked.calculate_key_tag_no_revoke());
    }

    #[test]
    fn rejects_non_zone_key() {
        let data = [0x00, 0x00, 0x03, 0x08, 0xAA, 0xBB];
        assert!(DnskeyRecord::parse(&data).is_err());
    }
}
