//! Remote SPARQL 1.1 Protocol client
//!
//! Queries and updates are sent as `application/x-www-form-urlencoded`
//! POST bodies with the text under the `query` or `update` field. The
//! accept header follows the expected result kind; ASK is pinned to XML
//! results because the boolean extraction only reads XML.

use oxigraph::model::{Graph, Variable};
use sparesults::QuerySolution;
use spargebra::{Query, Update};
use tracing::{debug, trace};

use crate::client::{encode_component, HttpClient};
use crate::content;
use crate::error::OxilinkError;
use crate::media_type;
use crate::origin::Origin;
use crate::service::ServiceRegistry;
use crate::Result;

/// Form field carrying the query text.
pub const QUERY_FIELD: &str = "query";
/// Form field carrying the update text.
pub const UPDATE_FIELD: &str = "update";

/// The declared kind of a query, for dispatch and error messages.
pub(crate) fn query_kind(query: &Query) -> &'static str {
    match query {
        Query::Select { .. } => "SELECT",
        Query::Construct { .. } => "CONSTRUCT",
        Query::Describe { .. } => "DESCRIBE",
        Query::Ask { .. } => "ASK",
    }
}

/// Materialized result of a SELECT query.
pub struct ResultSet {
    variables: Vec<Variable>,
    solutions: Vec<QuerySolution>,
}

impl ResultSet {
    pub(crate) fn new(variables: Vec<Variable>, solutions: Vec<QuerySolution>) -> Self {
        Self {
            variables,
            solutions,
        }
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn solutions(&self) -> &[QuerySolution] {
        &self.solutions
    }

    pub fn into_solutions(self) -> Vec<QuerySolution> {
        self.solutions
    }

    pub fn len(&self) -> usize {
        self.solutions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }
}

/// Client for remote SPARQL Protocol endpoints.
///
/// Credentials are resolved per call from the service registry by URI
/// prefix; endpoints without a registered context are queried without
/// authentication.
#[derive(Debug, Clone)]
pub struct SparqlClient {
    client: HttpClient,
    registry: ServiceRegistry,
}

impl SparqlClient {
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

    /// Build the form body: the operation text under `field`, then the
    /// caller's extra parameters. A caller parameter reusing the reserved
    /// field name is skipped, since that field is handled separately.
    fn form_body(field: &str, text: &str, params: Option<&[(&str, &str)]>) -> String {
        let mut body = format!("{}={}", field, encode_component(text));
        if let Some(params) = params {
            for (name, value) in params {
                if *name == field {
                    continue;
                }
                trace!(name, value, "copying protocol parameter");
                body.push('&');
                body.push_str(&encode_component(name));
                body.push('=');
                body.push_str(&encode_component(value));
            }
        }
        body
    }

    async fn post_form(
        &self,
        endpoint: &Origin,
        field: &str,
        text: &str,
        accepted: Option<&[&'static str]>,
        params: Option<&[(&str, &str)]>,
    ) -> Result<reqwest::Response> {
        let context = self.registry.lookup(endpoint.uri());
        self.client
            .post(
                endpoint.uri(),
                Self::form_body(field, text, params),
                media_type::APPLICATION_FORM_URLENCODED,
                accepted,
                None,
                context,
            )
            .await
    }

    /// Load an RDF graph from a remote endpoint. Only CONSTRUCT and
    /// DESCRIBE queries produce graphs.
    pub async fn load_graph(
        &self,
        endpoint: &Origin,
        query: &Query,
        params: Option<&[(&str, &str)]>,
    ) -> Result<Graph> {
        match query {
            Query::Construct { .. } | Query::Describe { .. } => {}
            other => {
                return Err(OxilinkError::QueryTypeMismatch {
                    expected: "CONSTRUCT or DESCRIBE",
                    actual: query_kind(other),
                })
            }
        }
        debug!(endpoint = %endpoint, kind = query_kind(query), "remote graph query");

        let response = self
            .post_form(
                endpoint,
                QUERY_FIELD,
                &query.to_string(),
                Some(self.client.media_types().graph()),
                params,
            )
            .await?;
        let media_type = response_media_type(&response)?;
        let body = response.bytes().await?;
        content::parse_graph(&body, &media_type)
    }

    /// Load a result set from a remote endpoint. SELECT queries only.
    pub async fn select(
        &self,
        endpoint: &Origin,
        query: &Query,
        params: Option<&[(&str, &str)]>,
    ) -> Result<ResultSet> {
        match query {
            Query::Select { .. } => {}
            other => {
                return Err(OxilinkError::QueryTypeMismatch {
                    expected: "SELECT",
                    actual: query_kind(other),
                })
            }
        }
        debug!(endpoint = %endpoint, "remote select query");

        let response = self
            .post_form(
                endpoint,
                QUERY_FIELD,
                &query.to_string(),
                Some(self.client.media_types().result_set()),
                params,
            )
            .await?;
        let media_type = response_media_type(&response)?;
        let body = response.bytes().await?;
        let (variables, solutions) = content::parse_solutions(&body, &media_type)?;
        Ok(ResultSet::new(variables, solutions))
    }

    /// Evaluate an ASK query against a remote endpoint.
    ///
    /// The accept header is pinned to `application/sparql-results+xml`
    /// regardless of the configured result-set list.
    pub async fn ask(
        &self,
        endpoint: &Origin,
        query: &Query,
        params: Option<&[(&str, &str)]>,
    ) -> Result<bool> {
        match query {
            Query::Ask { .. } => {}
            other => {
                return Err(OxilinkError::QueryTypeMismatch {
                    expected: "ASK",
                    actual: query_kind(other),
                })
            }
        }
        debug!(endpoint = %endpoint, "remote ask query");

        let response = self
            .post_form(
                endpoint,
                QUERY_FIELD,
                &query.to_string(),
                Some(&[media_type::APPLICATION_SPARQL_RESULTS_XML]),
                params,
            )
            .await?;
        let body = response.bytes().await?;
        content::parse_boolean_xml(&body)
    }

    /// Execute an update request on a remote endpoint.
    pub async fn update(
        &self,
        endpoint: &Origin,
        update: &Update,
        params: Option<&[(&str, &str)]>,
    ) -> Result<()> {
        debug!(endpoint = %endpoint, "remote update");
        self.post_form(endpoint, UPDATE_FIELD, &update.to_string(), None, params)
            .await?;
        Ok(())
    }
}

/// Content type declared by a response; parameter stripping is left to the
/// format lookup.
fn response_media_type(response: &reqwest::Response) -> Result<String> {
    response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string())
        .ok_or_else(|| {
            OxilinkError::Parse("response carried no usable content type".to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_body_reserved_field_skipped() {
        let body = SparqlClient::form_body(
            QUERY_FIELD,
            "ASK { ?s ?p ?o }",
            Some(&[("query", "injected"), ("timeout", "5")]),
        );
        assert!(body.starts_with("query=ASK%20%7B%20%3Fs%20%3Fp%20%3Fo%20%7D"));
        assert!(body.contains("&timeout=5"));
        assert!(!body.contains("injected"));
    }

    #[test]
    fn test_form_body_encodes_values() {
        let body = SparqlClient::form_body(UPDATE_FIELD, "INSERT DATA {}", None);
        assert_eq!(body, "update=INSERT%20DATA%20%7B%7D");
    }

    #[test]
    fn test_query_kind() {
        let query = Query::parse("SELECT * WHERE { ?s ?p ?o }", None).unwrap();
        assert_eq!(query_kind(&query), "SELECT");
        let query = Query::parse("ASK { ?s ?p ?o }", None).unwrap();
        assert_eq!(query_kind(&query), "ASK");
    }

    #[tokio::test]
    async fn test_load_graph_rejects_select_before_io() {
        let client = SparqlClient::new(HttpClient::new().unwrap());
        let endpoint = Origin::new("http://unreachable.invalid/sparql").unwrap();
        let query = Query::parse("SELECT * WHERE { ?s ?p ?o }", None).unwrap();

        let err = client.load_graph(&endpoint, &query, None).await.unwrap_err();
        assert!(matches!(
            err,
            OxilinkError::QueryTypeMismatch {
                actual: "SELECT",
                ..
            }
        ));
    }
}
