//! Small `Copy` index types used instead of pointers/`Rc` so the name
//! graph can be arena-owned (see the crate-level docs on cyclic graphs).

use std::fmt;

macro_rules! index_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub usize);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

index_newtype!(NodeId);
index_newtype!(RrsetId);
index_newtype!(DnskeyId);
index_newtype!(NegativeId);
index_newtype!(NsecSetId);
index_newtype!(QueryId);
index_newtype!(ResponseId);

/// Interned DNS server identity (an IP address or resolver label, assigned
/// by the collector). Small and `Copy` so provenance tuples stay cheap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ServerId(pub usize);

/// Interned querying-client identity (the stub resolver/vantage point).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClientId(pub usize);

/// A (server, client, response) attribution triple. Diagnostics and
/// provenance sets are built from these so aggregation never loses the
/// attribution required by the data model's invariant 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ServerClientResponse {
    pub server: ServerId,
    pub client: ClientId,
    pub response: ResponseId,
}

impl ServerClientResponse {
    pub fn new(server: ServerId, client: ClientId, response: ResponseId) -> Self {
        Self {
            server,
            client,
            response,
        }
    }
}
