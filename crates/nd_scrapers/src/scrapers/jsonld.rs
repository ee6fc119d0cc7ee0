use scraper::Html;
use serde_json::Value;

use super::extract::parse_selector;

/// Every JSON-LD object in the document, with `@graph` arrays flattened.
fn json_ld_objects(document: &Html) -> Vec<Value> {
    let mut objects = Vec::new();

    let Ok(script_selector) = parse_selector("script[type='application/ld+json']") else {
        return objects;
    };

    for script in document.select(&script_selector) {
        let text = script.text().collect::<String>();
        let Ok(json) = serde_json::from_str::<Value>(text.trim()) else {
            continue;
        };
        let items = match json {
            Value::Array(items) => items,
            other => vec![other],
        };
        for item in items {
            match item.get("@graph").and_then(Value::as_array) {
                Some(graph) => objects.extend(graph.iter().cloned()),
                None => objects.push(item),
            }
        }
    }

    objects
}

/// Extracts author names from JSON-LD metadata, in document order.
pub fn extract_authors(document: &Html) -> Vec<String> {
    let mut authors = Vec::new();

    for object in json_ld_objects(document) {
        match object.get("author") {
            Some(Value::Array(arr)) => {
                for author_obj in arr {
                    if let Some(name) = author_name(author_obj) {
                        authors.push(name);
                    }
                }
            }
            Some(author) => {
                if let Some(name) = author_name(author) {
                    authors.push(name);
                }
            }
            None => {}
        }
    }

    authors
}

fn author_name(value: &Value) -> Option<String> {
    let name = match value {
        Value::Object(obj) => obj.get("name").and_then(Value::as_str)?,
        Value::String(s) => s.as_str(),
        _ => return None,
    };
    let name = name.trim();
    (!name.is_empty()).then(|| name.to_string())
}

/// Extracts `keywords`, which sites publish either as an array or as one comma-separated string.
pub fn extract_keywords(document: &Html) -> Vec<String> {
    let mut keywords = Vec::new();

    for object in json_ld_objects(document) {
        match object.get("keywords") {
            Some(Value::Array(arr)) => {
                keywords.extend(arr.iter().filter_map(Value::as_str).map(str::to_string));
            }
            Some(Value::String(s)) => {
                keywords.extend(s.split(',').map(str::to_string));
            }
            _ => {}
        }
    }

    keywords
        .into_iter()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect()
}
