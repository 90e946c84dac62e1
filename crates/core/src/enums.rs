//! Status enums (§3). Each is a tagged variant with a single canonical
//! string mapping used by the serializer — never the raw integer codes
//! a wire-level encoding might suggest (Design Notes: "Global type enums
//! with integer codes").

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RrsigStatus {
    Valid,
    InvalidSig,
    Expired,
    Premature,
    AlgorithmIgnored,
    IndeterminateNoDnskey,
    IndeterminateMatchPreRevoke,
}

impl RrsigStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RrsigStatus::Valid => "VALID",
            RrsigStatus::InvalidSig => "INVALID_SIG",
            RrsigStatus::Expired => "EXPIRED",
            RrsigStatus::Premature => "PREMATURE",
            RrsigStatus::AlgorithmIgnored => "ALGORITHM_IGNORED",
            RrsigStatus::IndeterminateNoDnskey => "INDETERMINATE_NO_DNSKEY",
            RrsigStatus::IndeterminateMatchPreRevoke => "INDETERMINATE_MATCH_PRE_REVOKE",
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, RrsigStatus::Valid)
    }
}

impl fmt::Display for RrsigStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DsStatus {
    Valid,
    InvalidDigest,
    AlgorithmIgnored,
    IndeterminateNoDnskey,
    IndeterminateMatchPreRevoke,
}

impl DsStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DsStatus::Valid => "VALID",
            DsStatus::InvalidDigest => "INVALID_DIGEST",
            DsStatus::AlgorithmIgnored => "ALGORITHM_IGNORED",
            DsStatus::IndeterminateNoDnskey => "INDETERMINATE_NO_DNSKEY",
            DsStatus::IndeterminateMatchPreRevoke => "INDETERMINATE_MATCH_PRE_REVOKE",
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, DsStatus::Valid)
    }
}

impl fmt::Display for DsStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NsecStatus {
    Valid,
    Invalid,
}

impl NsecStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NsecStatus::Valid => "VALID",
            NsecStatus::Invalid => "INVALID",
        }
    }
}

impl fmt::Display for NsecStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DelegationStatus {
    Secure,
    Insecure,
    Bogus,
    Lame,
    Incomplete,
}

impl DelegationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DelegationStatus::Secure => "SECURE",
            DelegationStatus::Insecure => "INSECURE",
            DelegationStatus::Bogus => "BOGUS",
            DelegationStatus::Lame => "LAME",
            DelegationStatus::Incomplete => "INCOMPLETE",
        }
    }
}

impl fmt::Display for DelegationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameStatus {
    NoError,
    NxDomain,
    Indeterminate,
}

impl NameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NameStatus::NoError => "NOERROR",
            NameStatus::NxDomain => "NXDOMAIN",
            NameStatus::Indeterminate => "INDETERMINATE",
        }
    }
}

impl fmt::Display for NameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The final, chain-aware status assigned to a response component by C8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentStatus {
    Secure,
    Insecure,
    Bogus,
    NonExistent,
}

impl ComponentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentStatus::Secure => "SECURE",
            ComponentStatus::Insecure => "INSECURE",
            ComponentStatus::Bogus => "BOGUS",
            ComponentStatus::NonExistent => "NON_EXISTENT",
        }
    }

    pub fn is_secure(&self) -> bool {
        matches!(self, ComponentStatus::Secure)
    }
}

impl fmt::Display for ComponentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
