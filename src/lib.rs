//! # Oxilink
//!
//! Thin client and response glue over the Oxigraph RDF/SPARQL stack and the
//! reqwest/axum HTTP stack. The heavy lifting (query evaluation, RDF
//! storage, connection management, content parsing) lives in those
//! libraries; this crate translates between them:
//!
//! - [`HttpClient`]: per-verb HTTP helpers with query-parameter encoding,
//!   accept-header construction and status-family checking
//! - [`SparqlClient`]: the SPARQL 1.1 Protocol over HTTP (form-encoded
//!   query/update POST, typed result unwrapping)
//! - [`LocalService`]: the same query operations against an in-process
//!   Oxigraph store
//! - [`GraphStoreClient`]: the SPARQL 1.1 Graph Store HTTP Protocol
//! - [`GraphResponder`] / [`LinkedDataResource`]: content-negotiated HTTP
//!   responses for Linked Data resources
//! - [`ServiceRegistry`]: per-endpoint credentials and options, looked up
//!   by URI prefix
//!
//! Every remote operation is a single attempt awaited to completion; there
//! is no retry, pooling or scheduling beyond what reqwest itself provides.

pub mod client;
pub mod config;
pub mod content;
pub mod error;
pub mod graph_store;
pub mod local;
pub mod media_type;
pub mod origin;
pub mod resource;
pub mod service;
pub mod sparql;

pub use client::HttpClient;
pub use config::{ClientConfig, ResourceConfig, ServiceEntry};
pub use error::{ErrorResponse, OxilinkError};
pub use graph_store::{GraphStoreClient, GraphTarget};
pub use local::LocalService;
pub use media_type::MediaTypes;
pub use origin::Origin;
pub use resource::{GraphResponder, LinkedDataResource};
pub use service::{ServiceContext, ServiceRegistry};
pub use sparql::{ResultSet, SparqlClient};

/// Result type alias for oxilink operations
pub type Result<T> = std::result::Result<T, OxilinkError>;

/// Version information for oxilink
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
