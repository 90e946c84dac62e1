use crate::diagnostics::Diagnostics;
use crate::enums::ComponentStatus;
use crate::ids::{NsecSetId, RrsetId, ServerClientResponse};
use dnssec_analysis_domain::RecordType;

/// NegativeResponseInfo (§3): one NODATA or NXDOMAIN proof bundle for a
/// (qname, rdtype) pair.
#[derive(Debug, Clone)]
pub struct NegativeResponseInfo {
    pub qname: String,
    pub rdtype: RecordType,
    pub servers_clients: Vec<ServerClientResponse>,
    pub soa_rrset_info: Vec<RrsetId>,
    pub nsec_set_info: Vec<NsecSetId>,
    pub warnings: Diagnostics,
    pub errors: Diagnostics,
    /// Final per-(server,client,response) proof status, keyed the same
    /// way the wildcard evaluator tracks "last valid wins" (§4.4/§4.5).
    pub status_by_response: std::collections::HashMap<ServerClientResponse, super::NsecProofStatus>,
    pub response_component_status: Option<ComponentStatus>,
}

impl NegativeResponseInfo {
    pub fn new(qname: String, rdtype: RecordType) -> Self {
        Self {
            qname,
            rdtype,
            servers_clients: Vec::new(),
            soa_rrset_info: Vec::new(),
            nsec_set_info: Vec::new(),
            warnings: Diagnostics::default(),
            errors: Diagnostics::default(),
            status_by_response: std::collections::HashMap::new(),
            response_component_status: None,
        }
    }

    /// True once every (server,client,response) that returned this
    /// negative response has at least one valid proof recorded.
    pub fn fully_proven(&self) -> bool {
        self.servers_clients
            .iter()
            .all(|scr| matches!(self.status_by_response.get(scr), Some(s) if s.is_valid()))
    }
}
