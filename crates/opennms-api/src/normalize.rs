// Payload normalization for legacy v1 endpoints.
//
// The v1 API (`/rest/`) predates the JSON-first v2 surface: keys are
// hyphenated, XML attributes surface as `@`-prefixed keys once parsed, and
// a field may hold a single child in one payload and a list of children in
// the next. Everything below turns those payloads into plain
// `serde_json::Value` trees with underscore keys so the typed models can
// deserialize them uniformly. Key fixing is recursive; cardinality is fixed
// at the call site that knows the expected shape (`one_or_many`).

use serde_json::{Map, Value};

use crate::error::Error;

/// Normalize one key: strip a leading attribute marker (`@`) and replace
/// hyphens with underscores.
pub fn normalize_key(key: &str) -> String {
    key.strip_prefix('@').unwrap_or(key).replace('-', "_")
}

/// Recursively normalize every key in a payload.
///
/// Scalars pass through unchanged; objects recurse with normalized keys;
/// arrays recurse element-wise. Normalizing an already-normalized payload
/// is a no-op.
pub fn normalize_value(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut cleaned = Map::with_capacity(map.len());
            for (key, inner) in map {
                cleaned.insert(normalize_key(&key), normalize_value(inner));
            }
            Value::Object(cleaned)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_value).collect()),
        scalar => scalar,
    }
}

/// Fix the collapsed/expanded list ambiguity of the legacy format.
///
/// A field holding one child deserializes as an object, the same field with
/// two children as an array. Callers that expect a collection go through
/// here: `null` yields an empty vec, an array yields its elements, anything
/// else yields a single-element vec.
pub fn one_or_many(value: Value) -> Vec<Value> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items,
        single => vec![single],
    }
}

/// Parse a legacy XML payload into a `Value` tree.
///
/// Shape matches what the v1 endpoints imply: attributes become `@`-prefixed
/// keys, repeated child elements collapse into arrays, an element with only
/// text content becomes a string, and mixed content keeps its text under
/// `#text`. Run the result through [`normalize_value`] before deserializing.
pub(crate) fn xml_to_value(text: &str) -> Result<Value, Error> {
    use quick_xml::Reader;
    use quick_xml::events::Event;

    struct Frame {
        name: String,
        map: Map<String, Value>,
        text: String,
    }

    fn insert_child(map: &mut Map<String, Value>, name: String, child: Value) {
        match map.get_mut(&name) {
            None => {
                map.insert(name, child);
            }
            Some(Value::Array(items)) => items.push(child),
            Some(existing) => {
                let first = existing.take();
                map.insert(name, Value::Array(vec![first, child]));
            }
        }
    }

    fn close(frame: Frame) -> (String, Value) {
        let text = frame.text.trim();
        let value = if frame.map.is_empty() {
            if text.is_empty() {
                Value::Null
            } else {
                Value::String(text.to_owned())
            }
        } else {
            let mut map = frame.map;
            if !text.is_empty() {
                map.insert("#text".to_owned(), Value::String(text.to_owned()));
            }
            Value::Object(map)
        };
        (frame.name, value)
    }

    fn open(element: &quick_xml::events::BytesStart<'_>) -> Result<Frame, Error> {
        let name = String::from_utf8_lossy(element.name().as_ref()).into_owned();
        let mut map = Map::new();
        for attr in element.attributes() {
            let attr = attr.map_err(|e| Error::Xml(e.to_string()))?;
            let key = format!("@{}", String::from_utf8_lossy(attr.key.as_ref()));
            let value = attr
                .unescape_value()
                .map_err(|e| Error::Xml(e.to_string()))?
                .into_owned();
            map.insert(key, Value::String(value));
        }
        Ok(Frame {
            name,
            map,
            text: String::new(),
        })
    }

    let mut reader = Reader::from_str(text);
    let mut stack: Vec<Frame> = Vec::new();
    let mut root = Map::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(element)) => stack.push(open(&element)?),
            Ok(Event::Empty(element)) => {
                let (name, value) = close(open(&element)?);
                match stack.last_mut() {
                    Some(parent) => insert_child(&mut parent.map, name, value),
                    None => insert_child(&mut root, name, value),
                }
            }
            Ok(Event::Text(t)) => {
                if let Some(frame) = stack.last_mut() {
                    frame
                        .text
                        .push_str(&t.unescape().map_err(|e| Error::Xml(e.to_string()))?);
                }
            }
            Ok(Event::CData(t)) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&String::from_utf8_lossy(&t));
                }
            }
            Ok(Event::End(_)) => {
                let Some(frame) = stack.pop() else {
                    return Err(Error::Xml("unbalanced closing tag".to_owned()));
                };
                let (name, value) = close(frame);
                match stack.last_mut() {
                    Some(parent) => insert_child(&mut parent.map, name, value),
                    None => insert_child(&mut root, name, value),
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(Error::Xml(e.to_string())),
        }
    }

    if !stack.is_empty() {
        return Err(Error::Xml("unexpected end of document".to_owned()));
    }
    Ok(Value::Object(root))
}

/// Convert a normalized legacy `model-import` envelope into the v2 list
/// envelope shape (`{count, offset, totalCount, <key>: [...]}`).
///
/// Two forms exist: a bare payload whose root key is `model_import` (a
/// single requisition document), and a wrapped list where the outer element
/// carries string-typed counters and a one-or-many `model_import` child.
pub(crate) fn v1_envelope_to_v2(endpoint_key: &str, data: &Value) -> Value {
    fn int_field(value: Option<&Value>) -> Option<i64> {
        match value? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    if let Some(model) = data.get("model_import") {
        if let Some(obj) = model.as_object() {
            let mut payload = obj.clone();
            payload.remove("xmlns");
            return Value::Object(payload);
        }
    }

    if let Some(outer) = data.get(endpoint_key).and_then(Value::as_object) {
        let mut v2 = Map::new();
        for field in ["count", "offset", "totalCount"] {
            if let Some(n) = int_field(outer.get(field)) {
                v2.insert(field.to_owned(), n.into());
            }
        }
        let records = outer.get("model_import").cloned().unwrap_or(Value::Null);
        v2.insert(endpoint_key.to_owned(), Value::Array(one_or_many(records)));
        return Value::Object(v2);
    }

    data.clone()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn normalize_key_strips_attribute_marker_and_hyphens() {
        assert_eq!(normalize_key("@date-stamp"), "date_stamp");
        assert_eq!(normalize_key("foreign-source"), "foreign_source");
        assert_eq!(normalize_key("totalCount"), "totalCount");
    }

    #[test]
    fn normalize_value_recurses_into_objects_and_arrays() {
        let raw = json!({
            "foreign-source": "test",
            "node": [
                {"node-label": "a", "meta-data": {"@key": "k", "value": "v"}},
                {"node-label": "b"}
            ],
            "count": 2
        });
        let cleaned = normalize_value(raw);
        assert_eq!(cleaned["foreign_source"], "test");
        assert_eq!(cleaned["node"][0]["node_label"], "a");
        assert_eq!(cleaned["node"][0]["meta_data"]["key"], "k");
        assert_eq!(cleaned["node"][1]["node_label"], "b");
        assert_eq!(cleaned["count"], 2);
    }

    #[test]
    fn normalize_value_is_idempotent() {
        let raw = json!({"foreign-source": "x", "node": [{"ip-addr": "10.0.0.1"}]});
        let once = normalize_value(raw);
        let twice = normalize_value(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn normalize_value_passes_scalar_lists_through() {
        let raw = json!({"names": ["a", "b", "c"], "n": 3});
        let cleaned = normalize_value(raw.clone());
        assert_eq!(cleaned, raw);
    }

    #[test]
    fn one_or_many_fixes_cardinality() {
        assert!(one_or_many(Value::Null).is_empty());
        assert_eq!(one_or_many(json!([1, 2])).len(), 2);
        assert_eq!(one_or_many(json!({"a": 1})).len(), 1);
    }

    #[test]
    fn xml_with_attributes_and_repeated_children() {
        let xml = r#"<model-import foreign-source="servers" date-stamp="1704904715000">
            <node node-label="web01" foreign-id="1"/>
            <node node-label="web02" foreign-id="2"/>
        </model-import>"#;
        let value = normalize_value(xml_to_value(xml).expect("parse"));
        let import = &value["model_import"];
        assert_eq!(import["foreign_source"], "servers");
        assert_eq!(import["date_stamp"], "1704904715000");
        let nodes = import["node"].as_array().expect("node list");
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0]["node_label"], "web01");
        assert_eq!(nodes[1]["foreign_id"], "2");
    }

    #[test]
    fn xml_single_child_stays_collapsed_until_one_or_many() {
        let xml = r#"<model-import foreign-source="s"><node node-label="only"/></model-import>"#;
        let value = normalize_value(xml_to_value(xml).expect("parse"));
        let node = value["model_import"]["node"].clone();
        assert!(node.is_object());
        assert_eq!(one_or_many(node).len(), 1);
    }

    #[test]
    fn xml_text_content_becomes_string() {
        let xml = "<count>17</count>";
        let value = xml_to_value(xml).expect("parse");
        assert_eq!(value["count"], "17");
    }

    #[test]
    fn legacy_envelope_converts_to_v2_shape() {
        let data = normalize_value(json!({
            "requisitions": {
                "count": "2",
                "offset": "0",
                "totalCount": "2",
                "model-import": [
                    {"foreign-source": "a"},
                    {"foreign-source": "b"}
                ]
            }
        }));
        let v2 = v1_envelope_to_v2("requisitions", &data);
        assert_eq!(v2["totalCount"], 2);
        assert_eq!(v2["requisitions"].as_array().expect("list").len(), 2);
    }

    #[test]
    fn bare_model_import_payload_unwraps() {
        let data = normalize_value(json!({
            "model-import": {"xmlns": "http://xmlns.opennms.org/xsd/config/model-import",
                             "foreign-source": "servers"}
        }));
        let v2 = v1_envelope_to_v2("requisitions", &data);
        assert_eq!(v2["foreign_source"], "servers");
        assert!(v2.get("xmlns").is_none());
    }
}
