//! Media types for RDF graph and SPARQL result-set payloads

pub const TEXT_TURTLE: &str = "text/turtle";
pub const APPLICATION_N_TRIPLES: &str = "application/n-triples";
pub const APPLICATION_RDF_XML: &str = "application/rdf+xml";
pub const APPLICATION_SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";
pub const APPLICATION_SPARQL_RESULTS_XML: &str = "application/sparql-results+xml";
pub const TEXT_CSV: &str = "text/csv";
pub const TEXT_TSV: &str = "text/tab-separated-values";
pub const APPLICATION_FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// The two fixed accept lists, partitioned by payload kind.
///
/// Built once at construction and read-only afterwards. The graph list is
/// used wherever an RDF graph is expected (CONSTRUCT/DESCRIBE results,
/// Graph Store reads), the result-set list wherever tabular SELECT output
/// is expected.
#[derive(Debug, Clone)]
pub struct MediaTypes {
    graph: Vec<&'static str>,
    result_set: Vec<&'static str>,
}

impl MediaTypes {
    pub fn new() -> Self {
        Self {
            graph: vec![TEXT_TURTLE, APPLICATION_N_TRIPLES, APPLICATION_RDF_XML],
            result_set: vec![
                APPLICATION_SPARQL_RESULTS_JSON,
                APPLICATION_SPARQL_RESULTS_XML,
                TEXT_CSV,
                TEXT_TSV,
            ],
        }
    }

    /// Acceptable media types for RDF graph payloads.
    pub fn graph(&self) -> &[&'static str] {
        &self.graph
    }

    /// Acceptable media types for SELECT result sets.
    pub fn result_set(&self) -> &[&'static str] {
        &self.result_set
    }
}

impl Default for MediaTypes {
    fn default() -> Self {
        Self::new()
    }
}

/// Join a media-type list into an `Accept` header value.
pub fn accept_value(types: &[&'static str]) -> String {
    types.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lists_non_empty() {
        let media_types = MediaTypes::new();
        assert!(!media_types.graph().is_empty());
        assert!(!media_types.result_set().is_empty());
    }

    #[test]
    fn test_graph_list_leads_with_turtle() {
        assert_eq!(MediaTypes::new().graph()[0], TEXT_TURTLE);
    }

    #[test]
    fn test_accept_value_joins() {
        assert_eq!(
            accept_value(&[TEXT_TURTLE, APPLICATION_N_TRIPLES]),
            "text/turtle, application/n-triples"
        );
    }
}
