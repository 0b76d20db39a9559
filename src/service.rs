//! Per-endpoint service contexts and prefix lookup
//!
//! The registry is an immutable snapshot built once at construction.
//! Lookup is a pure function over that snapshot, so concurrent requests can
//! share a registry without synchronization.

use std::collections::HashMap;

/// Configuration attached to a single endpoint: optional HTTP Basic
/// credentials plus free-form protocol options.
#[derive(Debug, Clone, Default)]
pub struct ServiceContext {
    username: Option<String>,
    password: Option<String>,
    options: HashMap<String, String>,
}

impl ServiceContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context with HTTP Basic credentials set.
    pub fn with_credentials(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
            options: HashMap::new(),
        }
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// True when a username or password is present. Authentication is
    /// applied to a request only when this holds.
    pub fn has_credentials(&self) -> bool {
        self.username.is_some() || self.password.is_some()
    }

    pub fn set_option(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.options.insert(name.into(), value.into());
    }

    pub fn option(&self, name: &str) -> Option<&str> {
        self.options.get(name).map(String::as_str)
    }
}

/// Immutable endpoint-to-context map with prefix lookup.
///
/// Entries are sorted at build time by descending key length (then
/// lexicographically), so [`lookup`](Self::lookup) deterministically
/// returns the longest registered prefix of the request URI.
#[derive(Debug, Clone, Default)]
pub struct ServiceRegistry {
    entries: Vec<(String, ServiceContext)>,
}

impl ServiceRegistry {
    pub fn builder() -> ServiceRegistryBuilder {
        ServiceRegistryBuilder::default()
    }

    /// Find the context whose endpoint key is the longest prefix of `uri`.
    ///
    /// A request URI with a query string still matches its endpoint:
    /// `http://example.org/sparql?query=...` resolves the context
    /// registered for `http://example.org/sparql`.
    pub fn lookup(&self, uri: &str) -> Option<&ServiceContext> {
        self.entries
            .iter()
            .find(|(key, _)| uri.starts_with(key.as_str()))
            .map(|(_, context)| context)
    }

    /// Context registered under exactly this endpoint URI.
    pub fn get(&self, endpoint: &str) -> Option<&ServiceContext> {
        self.entries
            .iter()
            .find(|(key, _)| key == endpoint)
            .map(|(_, context)| context)
    }

    pub fn contains(&self, endpoint: &str) -> bool {
        self.get(endpoint).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builder collecting endpoint contexts before the registry is frozen.
#[derive(Debug, Default)]
pub struct ServiceRegistryBuilder {
    entries: HashMap<String, ServiceContext>,
}

impl ServiceRegistryBuilder {
    /// Register a context for an endpoint, replacing any previous one.
    pub fn context(mut self, endpoint: impl Into<String>, context: ServiceContext) -> Self {
        self.entries.insert(endpoint.into(), context);
        self
    }

    /// Register an endpoint with an empty context.
    pub fn endpoint(self, endpoint: impl Into<String>) -> Self {
        self.context(endpoint, ServiceContext::new())
    }

    /// Register an endpoint with HTTP Basic credentials.
    pub fn credentials(
        self,
        endpoint: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.context(endpoint, ServiceContext::with_credentials(username, password))
    }

    pub fn build(self) -> ServiceRegistry {
        let mut entries: Vec<_> = self.entries.into_iter().collect();
        entries.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        ServiceRegistry { entries }
    }
}
