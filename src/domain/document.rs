//! Roadmap document parsing.
//!
//! The document is a JSON array of nodes. Each node needs a non-empty string
//! `name`; `endpoints`, `definitions` and `children` are optional arrays.
//! Nodes that violate this are skipped together with their subtree and
//! reported, the rest of the document still loads.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::domain::entities::{Forest, NodePath, TreeNode};
use crate::domain::error::DomainError;

/// Parsed forest plus the nodes that were dropped on the way.
#[derive(Debug, Default)]
pub struct ParsedDocument {
    pub forest: Forest,
    pub skipped: Vec<DomainError>,
}

/// Parse a roadmap document from JSON text.
///
/// Fails only if the text is not JSON or the top level is not an array.
pub fn parse_document(text: &str) -> Result<ParsedDocument, DomainError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| DomainError::MalformedDocument(e.to_string()))?;
    parse_value(value)
}

/// Parse an already decoded JSON value.
pub fn parse_value(value: Value) -> Result<ParsedDocument, DomainError> {
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(DomainError::MalformedDocument(format!(
                "expected an array of nodes, found {}",
                kind_of(&other)
            )))
        }
    };

    let mut skipped = Vec::new();
    let roots = parse_siblings(items, &NodePath::default(), &mut skipped);
    debug!(
        "parsed document: {} roots, {} skipped nodes",
        roots.len(),
        skipped.len()
    );
    Ok(ParsedDocument {
        forest: Forest::new(roots),
        skipped,
    })
}

fn parse_siblings(
    items: Vec<Value>,
    parent: &NodePath,
    skipped: &mut Vec<DomainError>,
) -> Vec<Arc<TreeNode>> {
    let mut seen = HashSet::new();
    let mut nodes = Vec::with_capacity(items.len());

    for (index, item) in items.into_iter().enumerate() {
        match parse_node(item, parent, index, skipped) {
            Ok(node) => {
                if seen.insert(node.name.clone()) {
                    nodes.push(Arc::new(node));
                } else {
                    report(
                        skipped,
                        DomainError::MalformedNode {
                            path: parent.child(node.name.as_str()).to_string(),
                            reason: "duplicate sibling name".into(),
                        },
                    );
                }
            }
            Err(err) => report(skipped, err),
        }
    }
    nodes
}

fn parse_node(
    item: Value,
    parent: &NodePath,
    index: usize,
    skipped: &mut Vec<DomainError>,
) -> Result<TreeNode, DomainError> {
    // Nodes without a usable name are located by their position.
    let positional = || {
        if parent.is_empty() {
            format!("#{index}")
        } else {
            format!("{parent}{}#{index}", NodePath::SEPARATOR)
        }
    };

    let mut fields = match item {
        Value::Object(fields) => fields,
        other => {
            return Err(DomainError::MalformedNode {
                path: positional(),
                reason: format!("expected an object, found {}", kind_of(&other)),
            })
        }
    };

    let name = match fields.remove("name") {
        Some(Value::String(name)) if !name.trim().is_empty() => name,
        Some(Value::String(_)) => {
            return Err(DomainError::MalformedNode {
                path: positional(),
                reason: "empty name".into(),
            })
        }
        Some(other) => {
            return Err(DomainError::MalformedNode {
                path: positional(),
                reason: format!("name must be a string, found {}", kind_of(&other)),
            })
        }
        None => {
            return Err(DomainError::MalformedNode {
                path: positional(),
                reason: "missing name".into(),
            })
        }
    };
    let path = parent.child(name.as_str());

    let endpoints = string_list(&mut fields, "endpoints", &path)?;
    let definitions = string_list(&mut fields, "definitions", &path)?;
    let children = match take_array(&mut fields, "children", &path)? {
        Some(items) => parse_siblings(items, &path, skipped),
        None => Vec::new(),
    };

    Ok(TreeNode {
        name,
        endpoints,
        definitions,
        children,
    })
}

/// Absent and `null` both mean "no entries".
fn take_array(
    fields: &mut Map<String, Value>,
    key: &str,
    path: &NodePath,
) -> Result<Option<Vec<Value>>, DomainError> {
    match fields.remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => Ok(Some(items)),
        Some(other) => Err(DomainError::MalformedNode {
            path: path.to_string(),
            reason: format!("{key} must be an array, found {}", kind_of(&other)),
        }),
    }
}

fn string_list(
    fields: &mut Map<String, Value>,
    key: &str,
    path: &NodePath,
) -> Result<Vec<String>, DomainError> {
    let Some(items) = take_array(fields, key, path)? else {
        return Ok(Vec::new());
    };
    items
        .into_iter()
        .map(|item| match item {
            Value::String(s) => Ok(s),
            other => Err(DomainError::MalformedNode {
                path: path.to_string(),
                reason: format!("{key} entries must be strings, found {}", kind_of(&other)),
            }),
        })
        .collect()
}

fn report(skipped: &mut Vec<DomainError>, err: DomainError) {
    warn!("skipping node: {err}");
    skipped.push(err);
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_absent_and_null_fields_when_parsing_then_treated_as_empty() {
        let doc = parse_document(
            r#"[{"name": "src"}, {"name": "lib", "endpoints": null, "children": []}]"#,
        )
        .unwrap();

        assert!(doc.skipped.is_empty());
        assert_eq!(doc.forest.len(), 2);
        for root in &doc.forest {
            assert!(root.endpoints.is_empty());
            assert!(root.definitions.is_empty());
            assert!(root.children.is_empty());
            assert!(!root.is_expandable());
        }
    }

    #[test]
    fn given_nested_children_when_parsing_then_builds_recursive_tree() {
        let doc = parse_document(
            r#"[{"name": "api", "endpoints": ["/a", "/b"],
                 "children": [{"name": "v1", "definitions": ["handler"]}]}]"#,
        )
        .unwrap();

        let api = &doc.forest.roots()[0];
        assert_eq!(api.endpoints, vec!["/a", "/b"]);
        assert_eq!(api.children[0].name, "v1");
        assert_eq!(api.children[0].definitions, vec!["handler"]);
    }

    #[test]
    fn given_node_without_name_when_parsing_then_skips_it_and_keeps_siblings() {
        let doc = parse_document(
            r#"[{"endpoints": ["/x"]}, {"name": ""}, {"name": 3}, {"name": "ok"}]"#,
        )
        .unwrap();

        assert_eq!(doc.forest.len(), 1);
        assert_eq!(doc.forest.roots()[0].name, "ok");
        assert_eq!(doc.skipped.len(), 3);
        assert!(doc.skipped[0].to_string().contains("#0"));
    }

    #[test]
    fn given_wrong_field_type_when_parsing_then_skips_node_with_subtree() {
        let doc = parse_document(
            r#"[{"name": "bad", "definitions": "f", "children": [{"name": "c"}]},
                {"name": "parent", "children": [{"name": "kid", "endpoints": [1]}]}]"#,
        )
        .unwrap();

        let names: Vec<_> = doc.forest.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["parent"]);
        assert!(doc.forest.roots()[0].children.is_empty());
        assert_eq!(doc.skipped.len(), 2);
        assert!(doc.skipped[1].to_string().contains("parent > kid"));
    }

    #[test]
    fn given_duplicate_sibling_names_when_parsing_then_keeps_first() {
        let doc = parse_document(
            r#"[{"name": "a", "definitions": ["first"]}, {"name": "a", "definitions": ["second"]}]"#,
        )
        .unwrap();

        assert_eq!(doc.forest.len(), 1);
        assert_eq!(doc.forest.roots()[0].definitions, vec!["first"]);
        assert_eq!(doc.skipped.len(), 1);
    }

    #[test]
    fn given_same_name_under_different_parents_when_parsing_then_both_kept() {
        let doc = parse_document(
            r#"[{"name": "a", "children": [{"name": "index.js"}]},
                {"name": "b", "children": [{"name": "index.js"}]}]"#,
        )
        .unwrap();

        assert!(doc.skipped.is_empty());
        assert_eq!(doc.forest.stats().nodes, 4);
    }

    #[test]
    fn given_non_array_document_when_parsing_then_fails() {
        let err = parse_document(r#"{"name": "src"}"#).unwrap_err();
        assert!(matches!(err, DomainError::MalformedDocument(_)));
        assert!(parse_document("not json").is_err());
    }
}
