//! Content negotiation and RDF payload codecs
//!
//! Negotiation picks a serialization from an offered media-type list, with
//! the first offered type acting as the default when the client expresses
//! no preference. The codecs translate between wire payloads and the
//! Oxigraph model/result types; the actual parsing and serialization is
//! the library's.

use oxigraph::io::{RdfFormat, RdfParser, RdfSerializer};
use oxigraph::model::{Graph, GraphNameRef, Triple, Variable};
use sparesults::{
    QueryResultsFormat, QueryResultsParser, QuerySolution, ReaderQueryResultsParserOutput,
};

use crate::error::OxilinkError;
use crate::Result;

/// Parse an `Accept` header into media types ordered by quality.
fn parse_accept(accept: &str) -> Vec<(String, f32)> {
    let mut types: Vec<(String, f32)> = accept
        .split(',')
        .filter_map(|part| {
            let mut segments = part.trim().split(';');
            let media_type = segments.next()?.trim().to_lowercase();
            if media_type.is_empty() {
                return None;
            }
            let quality = segments
                .filter_map(|segment| segment.trim().strip_prefix("q="))
                .find_map(|q| q.parse::<f32>().ok())
                .unwrap_or(1.0);
            Some((media_type, quality))
        })
        .collect();

    types.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    types
}

/// Pick a media type from `offered` for the given `Accept` header.
///
/// `offered[0]` is the default: it is returned when no header is present
/// and when the client sends a wildcard. Returns
/// [`OxilinkError::NotAcceptable`] when nothing matches.
pub fn negotiate(accept: Option<&str>, offered: &[&'static str]) -> Result<&'static str> {
    debug_assert!(!offered.is_empty());
    let Some(accept) = accept else {
        return Ok(offered[0]);
    };

    for (media_type, _quality) in parse_accept(accept) {
        if media_type == "*/*" {
            return Ok(offered[0]);
        }
        if let Some(prefix) = media_type.strip_suffix("/*") {
            if let Some(found) = offered
                .iter()
                .find(|o| o.split('/').next() == Some(prefix))
            {
                return Ok(*found);
            }
            continue;
        }
        if let Some(found) = offered.iter().find(|o| **o == media_type) {
            return Ok(*found);
        }
    }

    Err(OxilinkError::NotAcceptable(accept.to_string()))
}

/// The RDF format registered for a media type, parameters ignored.
pub fn rdf_format(media_type: &str) -> Result<RdfFormat> {
    RdfFormat::from_media_type(media_type)
        .ok_or_else(|| OxilinkError::Parse(format!("unsupported RDF media type: {media_type}")))
}

/// The result-set format registered for a media type.
pub fn results_format(media_type: &str) -> Result<QueryResultsFormat> {
    QueryResultsFormat::from_media_type(media_type).ok_or_else(|| {
        OxilinkError::Parse(format!("unsupported result-set media type: {media_type}"))
    })
}

/// Parse an RDF graph payload in the format named by `media_type`.
///
/// Quads are flattened into the default graph.
pub fn parse_graph(data: &[u8], media_type: &str) -> Result<Graph> {
    let format = rdf_format(media_type)?;
    let mut graph = Graph::new();
    for quad in RdfParser::from_format(format).for_reader(data) {
        let triple = Triple::from(quad?);
        graph.insert(&triple);
    }
    Ok(graph)
}

/// Serialize a graph in the given format.
pub fn serialize_graph(graph: &Graph, format: RdfFormat) -> Result<Vec<u8>> {
    let mut serializer = RdfSerializer::from_format(format).for_writer(Vec::new());
    for triple in graph.iter() {
        serializer.serialize_quad(triple.in_graph(GraphNameRef::DefaultGraph))?;
    }
    Ok(serializer.finish()?)
}

/// Parse a SELECT result-set payload in the format named by `media_type`.
pub fn parse_solutions(
    data: &[u8],
    media_type: &str,
) -> Result<(Vec<Variable>, Vec<QuerySolution>)> {
    let format = results_format(media_type)?;
    match QueryResultsParser::from_format(format).for_reader(data)? {
        ReaderQueryResultsParserOutput::Solutions(reader) => {
            let variables = reader.variables().to_vec();
            let mut solutions = Vec::new();
            for solution in reader {
                solutions.push(solution?);
            }
            Ok((variables, solutions))
        }
        ReaderQueryResultsParserOutput::Boolean(_) => Err(OxilinkError::Parse(
            "expected solutions, endpoint returned a boolean result".to_string(),
        )),
    }
}

/// Extract the boolean of an ASK result from an XML result-set payload.
///
/// XML only: this is the one result format the boolean path reads, which
/// is why remote ASK requests pin their accept header to it.
pub fn parse_boolean_xml(data: &[u8]) -> Result<bool> {
    match QueryResultsParser::from_format(QueryResultsFormat::Xml).for_reader(data)? {
        ReaderQueryResultsParserOutput::Boolean(value) => Ok(value),
        ReaderQueryResultsParserOutput::Solutions(_) => Err(OxilinkError::Parse(
            "expected a boolean result, endpoint returned solutions".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media_type;
    use oxigraph::model::NamedNode;

    fn example_graph() -> Graph {
        let mut graph = Graph::new();
        let triple = Triple::new(
            NamedNode::new("http://example.org/s").unwrap(),
            NamedNode::new("http://example.org/p").unwrap(),
            NamedNode::new("http://example.org/o").unwrap(),
        );
        graph.insert(&triple);
        graph
    }

    #[test]
    fn test_negotiate_defaults_without_header() {
        let offered = [media_type::TEXT_TURTLE, media_type::APPLICATION_N_TRIPLES];
        assert_eq!(negotiate(None, &offered).unwrap(), media_type::TEXT_TURTLE);
    }

    #[test]
    fn test_negotiate_wildcard_maps_to_default() {
        let offered = [media_type::TEXT_TURTLE, media_type::APPLICATION_N_TRIPLES];
        assert_eq!(
            negotiate(Some("*/*"), &offered).unwrap(),
            media_type::TEXT_TURTLE
        );
    }

    #[test]
    fn test_negotiate_honours_quality() {
        let offered = [media_type::TEXT_TURTLE, media_type::APPLICATION_RDF_XML];
        let accept = "application/rdf+xml;q=0.9, text/turtle;q=0.2";
        assert_eq!(
            negotiate(Some(accept), &offered).unwrap(),
            media_type::APPLICATION_RDF_XML
        );
    }

    #[test]
    fn test_negotiate_rejects_unknown() {
        let offered = [media_type::TEXT_TURTLE];
        assert!(matches!(
            negotiate(Some("application/pdf"), &offered),
            Err(OxilinkError::NotAcceptable(_))
        ));
    }

    #[test]
    fn test_parse_accept_ordering() {
        let types = parse_accept("text/turtle;q=0.5, application/n-triples");
        assert_eq!(types[0].0, "application/n-triples");
        assert_eq!(types[1].0, "text/turtle");
    }

    #[test]
    fn test_serialize_then_parse_ntriples() {
        let graph = example_graph();
        let bytes = serialize_graph(&graph, RdfFormat::NTriples).unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(text.contains("<http://example.org/s>"));

        let parsed = parse_graph(&bytes, media_type::APPLICATION_N_TRIPLES).unwrap();
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn test_media_type_parameters_ignored() {
        let graph = example_graph();
        let bytes = serialize_graph(&graph, RdfFormat::NTriples).unwrap();
        let parsed = parse_graph(&bytes, "application/n-triples; charset=utf-8").unwrap();
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn test_parse_solutions_json() {
        let json = r#"{
            "head": { "vars": ["name"] },
            "results": {
                "bindings": [
                    { "name": { "type": "literal", "value": "Alice" } }
                ]
            }
        }"#;

        let (variables, solutions) = parse_solutions(
            json.as_bytes(),
            media_type::APPLICATION_SPARQL_RESULTS_JSON,
        )
        .unwrap();
        assert_eq!(variables.len(), 1);
        assert_eq!(variables[0].as_str(), "name");
        assert_eq!(solutions.len(), 1);
    }

    #[test]
    fn test_parse_boolean_xml() {
        let xml = r#"<?xml version="1.0"?>
            <sparql xmlns="http://www.w3.org/2005/sparql-results#">
                <head/>
                <boolean>true</boolean>
            </sparql>"#;
        assert!(parse_boolean_xml(xml.as_bytes()).unwrap());

        let xml = r#"<?xml version="1.0"?>
            <sparql xmlns="http://www.w3.org/2005/sparql-results#">
                <head/>
                <boolean>false</boolean>
            </sparql>"#;
        assert!(!parse_boolean_xml(xml.as_bytes()).unwrap());
    }
}
