//! Trust anchors (§6 inputs): a set of (zone-name, DNSKEY-rdata) pairs
//! supplied by the caller, not loaded by this crate from any network or
//! disk source.

use crate::types::DnskeyRecord;
use base64::{engine::general_purpose::STANDARD, Engine};

#[derive(Debug, Clone)]
pub struct TrustAnchor {
    pub zone: String,
    pub dnskey: DnskeyRecord,
    pub description: String,
}

impl TrustAnchor {
    pub fn new(zone: impl Into<String>, dnskey: DnskeyRecord, description: impl Into<String>) -> Self {
        Self {
            zone: normalize_zone(&zone.into()),
            dnskey,
            description: description.into(),
        }
    }

    pub fn matches(&self, dnskey: &DnskeyRecord) -> bool {
        if self.dnskey.algorithm != dnskey.algorithm {
            return false;
        }
        if self.dnskey.calculate_key_tag() != dnskey.calculate_key_tag() {
            return false;
        }
        self.dnskey.public_key == dnskey.public_key
    }
}

fn normalize_zone(zone: &str) -> String {
    if zone.is_empty() || zone == "." {
        ".".to_string()
    } else if zone.ends_with('.') {
        zone.to_string()
    } else {
        format!("{zone}.")
    }
}

#[derive(Debug, Clone, Default)]
pub struct TrustAnchorStore {
    anchors: Vec<TrustAnchor>,
}

impl TrustAnchorStore {
    pub fn new(anchors: Vec<TrustAnchor>) -> Self {
        Self { anchors }
    }

    pub fn empty() -> Self {
        Self { anchors: Vec::new() }
    }

    /// Convenience constructor seeded with the well-known root KSK-2017
    /// trust anchor, for callers analyzing the public DNS hierarchy.
    pub fn with_root_anchor() -> Self {
        Self {
            anchors: vec![TrustAnchor::new(".", root_ksk_20326(), "Root KSK-2017 (20326)")],
        }
    }

    pub fn add_anchor(&mut self, anchor: TrustAnchor) {
        self.anchors.push(anchor);
    }

    pub fn is_trusted(&self, dnskey: &DnskeyRecord, zone: &str) -> bool {
        let normalized = normalize_zone(zone);
        self.anchors
            .iter()
            .any(|a| a.zone == normalized && a.matches(dnskey))
    }

    pub fn anchors_for_zone(&self, zone: &str) -> Vec<&TrustAnchor> {
        let normalized = normalize_zone(zone);
        self.anchors.iter().filter(|a| a.zone == normalized).collect()
    }

    pub fn get_all_anchors(&self) -> &[TrustAnchor] {
        &self.anchors
    }
}

fn root_ksk_20326() -> DnskeyRecord {
    let public_key_b64 = concat!(
        "AwEAAaz/tAm8yTn4Mfeh5eyI96WSVexTBAvkMgJzkKTOiW1vkIbzxeF3",
        "+/4RgWOq7HrxRixHlFlExOLAJr5emLvN7SWXgnLh4+B5xQlNVz8Og8kv",
        "ArMtNROxVQuCaSnIDdD5LKyWbRd2n9WGe2R8PzgCmr3EgVLrjyBxWezF",
        "0jLHwVN8efS3rCj/EWgvIWgb9tarpVUDK/b58Da+sqqls3eNbuv7pr+e",
        "oZG+SrDK6nWeL3c6H5Apxz7LjVc1uTIdsIXxuOLYA4/ilBmSVIzuDWfd",
        "RUfhHdY6+cn8HFRm+2hM8AnXGXws9555KrUB5qihylGa8subX2Nn6UwN",
        "R1AkUTV74bU="
    );
    let public_key = STANDARD
        .decode(public_key_b64)
        .expect("hardcoded root KSK constant must decode");

    DnskeyRecord {
        flags: 257,
        protocol: 3,
        algorithm: 8,
        public_key,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_anchor_is_trusted_for_root_zone() {
        let store = TrustAnchorStore::with_root_anchor();
        let anchor_key = store.get_all_anchors()[0].dnskey.clone();
        assert!(store.is_trusted(&anchor_key, "."));
        assert!(store.is_trusted(&anchor_key, ""));
    }

    #[test]
    fn injected_anchor_matches_only_its_zone() {
        let dnskey = DnskeyRecord {
            flags: 0x0101,
            protocol: 3,
            algorithm: 13,
            public_key: vec![1; 64],
        };
        let store = TrustAnchorStore::new(vec![TrustAnchor::new(
            "example.",
            dnskey.clone(),
            "test anchor",
        )]);
        assert!(store.is_trusted(&dnskey, "example."));
        assert!(store.is_trusted(&dnskey, "example"));
        assert!(!store.is_trusted(&dnskey, "other.example."));
    }
}
