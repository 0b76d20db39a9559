//! In-process SPARQL execution over an Oxigraph store
//!
//! Mirrors the remote operations for a local dataset: the same typed
//! surface, with evaluation delegated to the store's query engine. Every
//! operation holds a scoped execution handle that is released on all exit
//! paths, including type mismatches and evaluation errors; the live count
//! is observable through [`LocalService::active_executions`].

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use oxigraph::model::{Graph, GraphNameRef};
use oxigraph::sparql::{QueryResults, QuerySolution};
use oxigraph::store::Store;
use spargebra::Query;
use tracing::debug;

use crate::error::OxilinkError;
use crate::sparql::query_kind;
use crate::Result;

/// Local query service over an in-process store.
#[derive(Clone)]
pub struct LocalService {
    store: Store,
    active: Arc<AtomicUsize>,
}

impl LocalService {
    /// Wrap an existing store (the dataset case).
    pub fn new(store: Store) -> Self {
        Self {
            store,
            active: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Load a single in-memory graph into a fresh store (the model case).
    /// The triples land in the default graph.
    pub fn from_graph(graph: &Graph) -> Result<Self> {
        let store = Store::new()?;
        for triple in graph.iter() {
            store.insert(triple.in_graph(GraphNameRef::DefaultGraph))?;
        }
        Ok(Self::new(store))
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Number of query executions currently in flight.
    pub fn active_executions(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    fn begin(&self) -> ExecutionScope {
        ExecutionScope::enter(Arc::clone(&self.active))
    }

    /// Evaluate a CONSTRUCT or DESCRIBE query into a graph.
    pub fn load_graph(&self, query: &Query) -> Result<Graph> {
        debug!(kind = query_kind(query), "local graph query");
        let _scope = self.begin();

        match query {
            Query::Construct { .. } | Query::Describe { .. } => {}
            other => {
                return Err(OxilinkError::QueryTypeMismatch {
                    expected: "CONSTRUCT or DESCRIBE",
                    actual: query_kind(other),
                })
            }
        }

        match self.store.query(query.to_string().as_str())? {
            QueryResults::Graph(triples) => {
                let mut graph = Graph::new();
                for triple in triples {
                    let triple = triple?;
                    graph.insert(&triple);
                }
                Ok(graph)
            }
            _ => Err(OxilinkError::Query(
                "graph query did not produce triples".to_string(),
            )),
        }
    }

    /// Evaluate a SELECT query into a materialized solution sequence.
    pub fn select(&self, query: &Query) -> Result<Vec<QuerySolution>> {
        debug!("local select query");
        let _scope = self.begin();

        match query {
            Query::Select { .. } => {}
            other => {
                return Err(OxilinkError::QueryTypeMismatch {
                    expected: "SELECT",
                    actual: query_kind(other),
                })
            }
        }

        match self.store.query(query.to_string().as_str())? {
            QueryResults::Solutions(solutions) => {
                let mut rows = Vec::new();
                for solution in solutions {
                    rows.push(solution?);
                }
                Ok(rows)
            }
            _ => Err(OxilinkError::Query(
                "select query did not produce solutions".to_string(),
            )),
        }
    }

    /// Evaluate an ASK query.
    pub fn ask(&self, query: &Query) -> Result<bool> {
        debug!("local ask query");
        let _scope = self.begin();

        match query {
            Query::Ask { .. } => {}
            other => {
                return Err(OxilinkError::QueryTypeMismatch {
                    expected: "ASK",
                    actual: query_kind(other),
                })
            }
        }

        match self.store.query(query.to_string().as_str())? {
            QueryResults::Boolean(value) => Ok(value),
            _ => Err(OxilinkError::Query(
                "ask query did not produce a boolean".to_string(),
            )),
        }
    }
}

/// Scope of one query execution. Dropping it releases the slot, which
/// happens on every exit path out of the operation that opened it.
struct ExecutionScope {
    active: Arc<AtomicUsize>,
}

impl ExecutionScope {
    fn enter(active: Arc<AtomicUsize>) -> Self {
        active.fetch_add(1, Ordering::SeqCst);
        Self { active }
    }
}

impl Drop for ExecutionScope {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxigraph::model::{NamedNode, Triple};

    fn example_service() -> LocalService {
        let mut graph = Graph::new();
        let triple = Triple::new(
            NamedNode::new("http://example.org/s").unwrap(),
            NamedNode::new("http://example.org/p").unwrap(),
            NamedNode::new("http://example.org/o").unwrap(),
        );
        graph.insert(&triple);
        LocalService::from_graph(&graph).unwrap()
    }

    #[test]
    fn test_construct_returns_graph() {
        let service = example_service();
        let query = Query::parse(
            "CONSTRUCT { ?s ?p ?o } WHERE { ?s ?p ?o }",
            None,
        )
        .unwrap();

        let graph = service.load_graph(&query).unwrap();
        assert_eq!(graph.len(), 1);
        assert_eq!(service.active_executions(), 0);
    }

    #[test]
    fn test_describe_accepted_by_graph_helper() {
        let service = example_service();
        let query = Query::parse("DESCRIBE <http://example.org/s>", None).unwrap();
        assert!(service.load_graph(&query).is_ok());
    }

    #[test]
    fn test_select_with_graph_helper_is_type_mismatch() {
        let service = example_service();
        let query = Query::parse("SELECT * WHERE { ?s ?p ?o }", None).unwrap();

        let err = service.load_graph(&query).unwrap_err();
        assert!(matches!(
            err,
            OxilinkError::QueryTypeMismatch {
                expected: "CONSTRUCT or DESCRIBE",
                actual: "SELECT",
            }
        ));
    }

    #[test]
    fn test_scope_released_on_type_mismatch() {
        let service = example_service();
        let query = Query::parse("CONSTRUCT { ?s ?p ?o } WHERE { ?s ?p ?o }", None).unwrap();

        assert!(service.select(&query).is_err());
        assert_eq!(service.active_executions(), 0);

        assert!(service.ask(&query).is_err());
        assert_eq!(service.active_executions(), 0);
    }

    #[test]
    fn test_select_returns_solutions() {
        let service = example_service();
        let query = Query::parse("SELECT ?s WHERE { ?s ?p ?o }", None).unwrap();

        let rows = service.select(&query).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].get("s").is_some());
        assert_eq!(service.active_executions(), 0);
    }

    #[test]
    fn test_ask_answers() {
        let service = example_service();

        let query = Query::parse("ASK { ?s ?p ?o }", None).unwrap();
        assert!(service.ask(&query).unwrap());

        let query = Query::parse(
            "ASK { <http://example.org/missing> ?p ?o }",
            None,
        )
        .unwrap();
        assert!(!service.ask(&query).unwrap());
    }
}
