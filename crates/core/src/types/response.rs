use crate::ids::{ClientId, ServerId};

/// A retry-history cause, per §6's input contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cause {
    NetworkError,
    FormErr,
    Timeout,
    Rcode(u16),
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryAction {
    NoChange,
    SetTcp,
    DisableEdns,
    ChangeEdnsFlags,
    ChangeEdnsMaxUdpPayload,
}

#[derive(Debug, Clone)]
pub struct HistoryEvent {
    pub cause: Cause,
    pub cause_arg: Option<String>,
    pub action: RetryAction,
}

/// What was actually requested for this query, before any retry fallback.
#[derive(Debug, Clone, Copy)]
pub struct Query {
    pub edns_requested: bool,
    pub edns_flags: u16,
    pub edns_max_udp_payload: u16,
}

/// One collected response to a query, carrying everything the
/// response-error classifier (C7) and the rest of the evaluator need.
#[derive(Debug, Clone)]
pub struct Response {
    pub server: ServerId,
    pub client: ClientId,

    pub rcode: u16,
    pub query: Query,

    /// `None` means the response omitted EDNS entirely.
    pub effective_edns: Option<u8>,
    pub effective_edns_flags: u16,
    pub effective_edns_max_udp_payload: u16,
    pub effective_tcp: bool,

    pub history: Vec<HistoryEvent>,
    pub responsive_cause_index: Option<usize>,
    pub responsive_cause_index_tcp: Option<usize>,
    pub tcp_responsive: bool,
    pub udp_responsive: bool,
    pub msg_size: usize,

    pub aa: bool,
    pub ra: bool,
    pub rd: bool,
    pub is_referral: bool,
    pub is_upward_referral: bool,
    pub is_complete: bool,
    pub is_valid: bool,
}

impl Response {
    pub fn is_valid_response(&self) -> bool {
        self.is_valid
    }

    pub fn is_complete_response(&self) -> bool {
        self.is_complete
    }

    pub fn is_referral(&self) -> bool {
        self.is_referral
    }

    pub fn is_upward_referral(&self) -> bool {
        self.is_upward_referral
    }

    pub fn is_authoritative(&self) -> bool {
        self.aa
    }

    pub fn recursion_desired(&self) -> bool {
        self.rd
    }

    pub fn recursion_available(&self) -> bool {
        self.ra
    }

    pub fn dnssec_requested(&self) -> bool {
        self.query.edns_requested && self.query.edns_flags & 0x8000 != 0
    }

    pub fn edns_omitted(&self) -> bool {
        self.effective_edns.is_none()
    }
}
