pub mod dnskey;
pub mod ds;
pub mod negative;
pub mod nsec;
pub mod response;
pub mod rrset;
pub mod rrsig;

pub use dnskey::{DnskeyMeta, DnskeyRecord};
pub use ds::{DsBinding, DsBindingGroup, DsRecord};
pub use negative::NegativeResponseInfo;
pub use nsec::{NsecProofStatus, NsecSetInfo};
pub use response::{Cause, HistoryEvent, Query, Response, RetryAction};
pub use rrset::{DnameInfo, RrsetInfo, RrsigBinding, RrsigBindingGroup, WildcardProofStatus};
pub use rrsig::RrsigRecord;
