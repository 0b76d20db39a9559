//! Identity of remote SPARQL and Graph Store endpoints

use std::fmt;

use crate::error::OxilinkError;
use crate::Result;

/// Immutable identity of a remote endpoint.
///
/// Derives value equality and hashing, so it can be used as a map key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Origin {
    uri: String,
}

impl Origin {
    /// Create an origin from an endpoint URI. The URI must be non-empty.
    pub fn new(uri: impl Into<String>) -> Result<Self> {
        let uri = uri.into();
        if uri.is_empty() {
            return Err(OxilinkError::Config(
                "endpoint URI must be non-empty".to_string(),
            ));
        }
        Ok(Self { uri })
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}

impl AsRef<str> for Origin {
    fn as_ref(&self) -> &str {
        &self.uri
    }
}
