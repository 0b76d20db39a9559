//! SPARQL 1.1 Graph Store HTTP Protocol client
//!
//! RESTful CRUD on the graphs of a remote dataset. The target graph is
//! selected through a query parameter: `default` (empty flag) for the
//! default graph, `graph=<URI>` for a named graph. Writes always ship
//! N-Triples; reads negotiate from the graph media-type list.

use oxigraph::io::RdfFormat;
use oxigraph::model::Graph;
use tracing::debug;

use crate::client::HttpClient;
use crate::content;
use crate::error::OxilinkError;
use crate::media_type;
use crate::origin::Origin;
use crate::service::ServiceRegistry;
use crate::Result;

/// The graph a Graph Store operation addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphTarget {
    /// The store's default graph.
    Default,
    /// A named graph.
    Named(String),
}

impl GraphTarget {
    pub fn named(uri: impl Into<String>) -> Self {
        Self::Named(uri.into())
    }

    /// The query parameter selecting this target.
    fn param(&self) -> (&'static str, &str) {
        match self {
            Self::Default => ("default", ""),
            Self::Named(uri) => ("graph", uri.as_str()),
        }
    }
}

/// Client for remote SPARQL Graph Store endpoints.
#[derive(Debug, Clone)]
pub struct GraphStoreClient {
    client: HttpClient,
    registry: ServiceRegistry,
}

impl GraphStoreClient {
    pub fn new(client: HttpClient) -> Self {
        Self::with_registry(client, ServiceRegistry::default())
    }

    pub fn with_registry(client: HttpClient, registry: ServiceRegistry) -> Self {
        Self { client, registry }
    }

    /// Client plus registry built from loaded settings.
    pub fn from_config(config: &crate::config::ClientConfig) -> Result<Self> {
        Ok(Self::with_registry(
            HttpClient::with_config(config)?,
            config.registry(),
        ))
    }

    pub fn registry(&self) -> &ServiceRegistry {
        &self.registry
    }

    /// Check whether the store holds the target graph. Unlike the other
    /// operations this never treats a non-2xx response as an error: the
    /// status family *is* the answer.
    pub async fn contains(&self, store: &Origin, target: &GraphTarget) -> Result<bool> {
        debug!(store = %store, ?target, "HEAD graph");
        let response = self
            .client
            .send_raw(
                reqwest::Method::HEAD,
                store.uri(),
                None,
                Some(&[target.param()]),
                None,
                self.registry.lookup(store.uri()),
            )
            .await?;
        Ok(response.status().is_success())
    }

    /// Fetch the target graph.
    pub async fn get(&self, store: &Origin, target: &GraphTarget) -> Result<Graph> {
        debug!(store = %store, ?target, "GET graph");
        let response = self
            .client
            .get(
                store.uri(),
                Some(self.client.media_types().graph()),
                Some(&[target.param()]),
                self.registry.lookup(store.uri()),
            )
            .await?;
        let media_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string())
            .ok_or_else(|| {
                OxilinkError::Parse("response carried no usable content type".to_string())
            })?;
        let body = response.bytes().await?;
        content::parse_graph(&body, &media_type)
    }

    /// Merge a graph into the target graph (POST).
    pub async fn add(
        &self,
        store: &Origin,
        target: &GraphTarget,
        graph: &Graph,
    ) -> Result<reqwest::Response> {
        debug!(store = %store, ?target, "POST graph");
        self.client
            .post(
                store.uri(),
                ntriples_body(graph)?,
                media_type::APPLICATION_N_TRIPLES,
                None,
                Some(&[target.param()]),
                self.registry.lookup(store.uri()),
            )
            .await
    }

    /// Create or replace the target graph (PUT).
    pub async fn put(
        &self,
        store: &Origin,
        target: &GraphTarget,
        graph: &Graph,
    ) -> Result<reqwest::Response> {
        debug!(store = %store, ?target, "PUT graph");
        self.client
            .put(
                store.uri(),
                ntriples_body(graph)?,
                media_type::APPLICATION_N_TRIPLES,
                None,
                Some(&[target.param()]),
                self.registry.lookup(store.uri()),
            )
            .await
    }

    /// Delete the target graph's contents.
    pub async fn delete(&self, store: &Origin, target: &GraphTarget) -> Result<reqwest::Response> {
        debug!(store = %store, ?target, "DELETE graph");
        self.client
            .delete(
                store.uri(),
                None,
                Some(&[target.param()]),
                self.registry.lookup(store.uri()),
            )
            .await
    }
}

fn ntriples_body(graph: &Graph) -> Result<String> {
    let bytes = content::serialize_graph(graph, RdfFormat::NTriples)?;
    String::from_utf8(bytes).map_err(|e| OxilinkError::Serialize(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxigraph::model::{NamedNode, Triple};

    #[test]
    fn test_target_params() {
        assert_eq!(GraphTarget::Default.param(), ("default", ""));
        assert_eq!(
            GraphTarget::named("http://example.org/g").param(),
            ("graph", "http://example.org/g")
        );
    }

    #[test]
    fn test_ntriples_body() {
        let mut graph = Graph::new();
        graph.insert(&Triple::new(
            NamedNode::new("http://example.org/s").unwrap(),
            NamedNode::new("http://example.org/p").unwrap(),
            NamedNode::new("http://example.org/o").unwrap(),
        ));

        let body = ntriples_body(&graph).unwrap();
        assert_eq!(
            body.trim(),
            "<http://example.org/s> <http://example.org/p> <http://example.org/o> ."
        );
    }
}
