//! GraphQL `Get` query construction and result parsing for searches
//!
//! Collection and property names are spliced into the query text, so they
//! must be valid GraphQL names; user-provided strings are emitted as JSON
//! string literals, which GraphQL accepts verbatim.

use serde_json::{Map, Value};

use crate::error::{WeaviateError, WeaviateResult};
use crate::models::{SearchHit, SearchMode, SearchQuery};

/// `[_A-Za-z][_0-9A-Za-z]*`
pub fn is_graphql_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_ascii_alphabetic() => {
            chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
        }
        _ => false,
    }
}

pub fn validate_collection_name(name: &str) -> WeaviateResult<()> {
    if is_graphql_name(name) {
        Ok(())
    } else {
        Err(WeaviateError::InvalidArgument(format!(
            "'{}' is not a valid collection name",
            name
        )))
    }
}

fn string_literal(value: &str) -> String {
    // serde_json escapes quotes, backslashes and control characters
    Value::String(value.to_string()).to_string()
}

/// Build the `Get` query for `query` against `collection`, returning the
/// given properties plus the ranking metadata the mode produces.
pub fn build_search_query(
    collection: &str,
    query: &SearchQuery,
    properties: &[String],
) -> WeaviateResult<String> {
    validate_collection_name(collection)?;

    let operator = match &query.mode {
        SearchMode::NearText => format!("nearText: {{concepts: [{}]}}", string_literal(&query.query)),
        SearchMode::Bm25 => format!("bm25: {{query: {}}}", string_literal(&query.query)),
        SearchMode::Hybrid { alpha } => format!(
            "hybrid: {{query: {}, alpha: {}}}",
            string_literal(&query.query),
            alpha
        ),
    };

    let mut arguments = vec![operator, format!("limit: {}", query.limit)];
    if let Some(tenant) = &query.tenant {
        arguments.push(format!("tenant: {}", string_literal(tenant)));
    }

    let additional = match query.mode {
        SearchMode::NearText => "_additional { id distance certainty }",
        SearchMode::Bm25 | SearchMode::Hybrid { .. } => "_additional { id score }",
    };

    let mut selection: Vec<&str> = properties
        .iter()
        .map(String::as_str)
        .filter(|p| is_graphql_name(p))
        .collect();
    selection.push(additional);

    Ok(format!(
        "{{ Get {{ {}({}) {{ {} }} }} }}",
        collection,
        arguments.join(", "),
        selection.join(" ")
    ))
}

/// Weaviate reports `score` as a string and `distance` as a number; accept both
fn number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Extract hits from the `data` member of a GraphQL response
pub fn parse_hits(collection: &str, mut data: Value) -> WeaviateResult<Vec<SearchHit>> {
    let hits = data
        .get_mut("Get")
        .and_then(|get| get.get_mut(collection))
        .map(Value::take);
    let items = match hits {
        Some(Value::Array(items)) => items,
        Some(Value::Null) | None => return Ok(Vec::new()),
        Some(other) => {
            return Err(WeaviateError::Decode(format!(
                "expected a list of {} objects, got {}",
                collection, other
            )));
        }
    };

    items
        .into_iter()
        .map(|item| {
            let Value::Object(mut properties) = item else {
                return Err(WeaviateError::Decode(format!(
                    "expected {} object, got {}",
                    collection, item
                )));
            };

            let additional = match properties.remove("_additional") {
                Some(Value::Object(map)) => map,
                _ => Map::new(),
            };

            let id = additional
                .get("id")
                .and_then(Value::as_str)
                .ok_or_else(|| WeaviateError::Decode("search hit without id".to_string()))?
                .to_string();

            Ok(SearchHit {
                id,
                collection: collection.to_string(),
                properties,
                score: number(additional.get("score")),
                distance: number(additional.get("distance")),
                certainty: number(additional.get("certainty")),
            })
        })
        .collect()
}
