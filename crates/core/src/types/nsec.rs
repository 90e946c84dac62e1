use crate::ids::ServerClientResponse;
use crate::ids::RrsetId;
use std::collections::HashMap;

/// Outcome of validating one NSEC/NSEC3 proof (NODATA, NXDOMAIN or
/// wildcard) against a name. `opt_out` only ever applies to NSEC3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NsecProofStatus {
    pub validation_status: crate::enums::NsecStatus,
    pub opt_out: bool,
    pub use_nsec3: bool,
}

impl NsecProofStatus {
    pub fn valid(use_nsec3: bool, opt_out: bool) -> Self {
        Self {
            validation_status: crate::enums::NsecStatus::Valid,
            opt_out,
            use_nsec3,
        }
    }

    pub fn invalid(use_nsec3: bool) -> Self {
        Self {
            validation_status: crate::enums::NsecStatus::Invalid,
            opt_out: false,
            use_nsec3,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self.validation_status, crate::enums::NsecStatus::Valid)
    }
}

/// NSECSetInfo (§3): a bundle of NSEC or NSEC3 rrsets indexed by owner
/// name, returned together in one response.
#[derive(Debug, Clone)]
pub struct NsecSetInfo {
    pub use_nsec3: bool,
    /// owner name -> rrset holding that owner's NSEC/NSEC3 record.
    pub rrsets: HashMap<String, RrsetId>,
    pub servers_clients: Vec<ServerClientResponse>,
    /// Per-member component status, populated by C8 (§4.8: "status is
    /// computed per-member NSEC by asking G for a sub-node under
    /// (set, nsec-name)").
    pub component_status: HashMap<String, crate::enums::ComponentStatus>,
}

impl NsecSetInfo {
    pub fn new(use_nsec3: bool) -> Self {
        Self {
            use_nsec3,
            rrsets: HashMap::new(),
            servers_clients: Vec::new(),
            component_status: HashMap::new(),
        }
    }
}
