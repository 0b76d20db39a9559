//! Content-negotiated responses for read-only Linked Data resources
//!
//! A resource is anything that can hand over the graph describing it; the
//! responder turns that graph into an HTTP response in whichever offered
//! serialization the client's `Accept` header picks, with the default
//! serialization forced to the front of the offered list.

use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::Response;
use oxigraph::model::Graph;
use tracing::debug;

use crate::config::ResourceConfig;
use crate::content;
use crate::error::OxilinkError;
use crate::media_type::{self, MediaTypes};
use crate::Result;

/// Builds content-negotiated responses for graph payloads.
#[derive(Debug, Clone)]
pub struct GraphResponder {
    offered: Vec<&'static str>,
    cache_control: Option<HeaderValue>,
}

impl GraphResponder {
    /// Responder offering the registered graph media types, with Turtle
    /// forced to the front as the default serialization.
    pub fn new(media_types: &MediaTypes) -> Self {
        let mut offered = vec![media_type::TEXT_TURTLE];
        for &registered in media_types.graph() {
            if registered != media_type::TEXT_TURTLE {
                offered.push(registered);
            }
        }
        Self {
            offered,
            cache_control: None,
        }
    }

    /// Attach a `Cache-Control` value to every response.
    pub fn with_cache_control(mut self, value: &str) -> Result<Self> {
        let value = HeaderValue::from_str(value).map_err(|e| {
            OxilinkError::Config(format!("invalid cache-control value {value:?}: {e}"))
        })?;
        self.cache_control = Some(value);
        Ok(self)
    }

    /// Responder configured from settings: the cache-control header is
    /// attached when the property is set, omitted entirely otherwise.
    pub fn from_config(media_types: &MediaTypes, config: &ResourceConfig) -> Result<Self> {
        let responder = Self::new(media_types);
        match &config.cache_control {
            Some(value) => responder.with_cache_control(value),
            None => Ok(responder),
        }
    }

    /// Media types offered for negotiation, default first.
    pub fn offered(&self) -> &[&'static str] {
        &self.offered
    }

    /// Build a response for the graph, serialized in the media type the
    /// `Accept` header negotiates.
    pub fn respond(&self, accept: Option<&str>, graph: &Graph) -> Result<Response> {
        let media_type = content::negotiate(accept, &self.offered)?;
        debug!(media_type, triples = graph.len(), "responding with graph");

        let format = content::rdf_format(media_type)?;
        let body = content::serialize_graph(graph, format)?;

        let mut builder = Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, media_type);
        if let Some(cache_control) = &self.cache_control {
            builder = builder.header(header::CACHE_CONTROL, cache_control.clone());
        }
        builder
            .body(Body::from(body))
            .map_err(|e| OxilinkError::Serialize(e.to_string()))
    }
}

/// A read-only Linked Data resource: a URI and the graph describing it.
///
/// Language and encoding negotiation are not offered; the default methods
/// return empty lists and exist only as extension points.
pub trait LinkedDataResource {
    /// URI of this resource.
    fn uri(&self) -> &str;

    /// The graph describing this resource.
    fn graph(&self) -> &Graph;

    /// Content languages offered for negotiation.
    fn languages(&self) -> Vec<String> {
        Vec::new()
    }

    /// Content encodings offered for negotiation.
    fn encodings(&self) -> Vec<String> {
        Vec::new()
    }

    /// Content-negotiated response describing this resource.
    fn response(&self, responder: &GraphResponder, accept: Option<&str>) -> Result<Response> {
        responder.respond(accept, self.graph())
    }
}
