//! XML codec.
//!
//! Each field becomes a child element of a root named after the record type.
//! Sequences are written as repeated sibling elements with the field's tag,
//! nested objects recurse, and nulls are omitted. Reading is therefore
//! ambiguous: a one-element sequence looks exactly like a scalar, and every
//! scalar comes back as text. [`decode`] resolves both by walking the
//! record's [`EntityShape`].
//!
//! Known losses, accepted by design of the format:
//! - an explicit null and an absent field read back identically;
//! - values inside free-form mappings read back as strings.

use invoicekit_model::{EntityShape, FieldShape};
use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use serde_json::{Map, Number, Value};

use crate::error::{StorageError, StorageResult};

// ================================================================
// Encoding
// ================================================================

pub fn encode(value: &Value, root: &str) -> StorageResult<String> {
    let fields = value
        .as_object()
        .ok_or_else(|| StorageError::Xml("record must serialize to an object".into()))?;

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_err)?;
    write_object(&mut writer, root, fields)?;

    let mut xml = String::from_utf8(writer.into_inner())
        .map_err(|e| StorageError::Xml(e.to_string()))?;
    xml.push('\n');
    Ok(xml)
}

fn write_object(writer: &mut Writer<Vec<u8>>, tag: &str, fields: &Map<String, Value>) -> StorageResult<()> {
    check_tag(tag)?;
    if fields.values().all(Value::is_null) {
        writer
            .write_event(Event::Empty(BytesStart::new(tag)))
            .map_err(xml_err)?;
        return Ok(());
    }

    writer
        .write_event(Event::Start(BytesStart::new(tag)))
        .map_err(xml_err)?;
    for (key, value) in fields {
        write_value(writer, key, value)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(tag)))
        .map_err(xml_err)?;
    Ok(())
}

fn write_value(writer: &mut Writer<Vec<u8>>, tag: &str, value: &Value) -> StorageResult<()> {
    match value {
        Value::Null => Ok(()),
        Value::Object(fields) => write_object(writer, tag, fields),
        Value::Array(items) => {
            for item in items {
                match item {
                    // Nested sequences have no sibling-element form; keep them as JSON text.
                    Value::Array(_) => write_text(writer, tag, &item.to_string())?,
                    other => write_value(writer, tag, other)?,
                }
            }
            Ok(())
        }
        Value::Bool(b) => write_text(writer, tag, if *b { "true" } else { "false" }),
        Value::Number(n) => write_text(writer, tag, &n.to_string()),
        Value::String(s) => write_text(writer, tag, s),
    }
}

fn write_text(writer: &mut Writer<Vec<u8>>, tag: &str, text: &str) -> StorageResult<()> {
    check_tag(tag)?;
    writer
        .write_event(Event::Start(BytesStart::new(tag)))
        .map_err(xml_err)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(xml_err)?;
    writer
        .write_event(Event::End(BytesEnd::new(tag)))
        .map_err(xml_err)?;
    Ok(())
}

/// Field names become element names, so they must be valid XML names.
fn check_tag(tag: &str) -> StorageResult<()> {
    let mut chars = tag.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_');
    let valid_rest = chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid_start && valid_rest && !tag.to_ascii_lowercase().starts_with("xml") {
        Ok(())
    } else {
        Err(StorageError::Xml(format!(
            "'{tag}' cannot be used as an element name"
        )))
    }
}

fn xml_err(err: impl std::fmt::Display) -> StorageError {
    StorageError::Xml(err.to_string())
}

// ================================================================
// Decoding
// ================================================================

#[derive(Debug, Default)]
struct Node {
    name: String,
    text: Option<String>,
    children: Vec<Node>,
}

impl Node {
    fn named(name: &[u8]) -> Self {
        Self {
            name: String::from_utf8_lossy(name).into_owned(),
            ..Self::default()
        }
    }

    fn push_text(&mut self, text: &str) {
        self.text.get_or_insert_with(String::new).push_str(text);
    }

    /// Raw value before shape coercion: objects for elements with children,
    /// text for leaves, null for empty leaves.
    fn into_value(self) -> Value {
        if self.children.is_empty() {
            self.text.map_or(Value::Null, Value::String)
        } else {
            Value::Object(children_to_map(self.children))
        }
    }
}

fn children_to_map(children: Vec<Node>) -> Map<String, Value> {
    let mut map = Map::new();
    for child in children {
        let name = child.name.clone();
        let value = child.into_value();
        match map.get_mut(&name) {
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                map.insert(name, value);
            }
        }
    }
    map
}

fn parse_tree(text: &str) -> StorageResult<Node> {
    let mut reader = Reader::from_str(text);
    let mut stack: Vec<Node> = Vec::new();
    let mut root: Option<Node> = None;

    loop {
        match reader.read_event().map_err(xml_err)? {
            Event::Start(e) => stack.push(Node::named(e.name().as_ref())),
            Event::Empty(e) => attach(&mut stack, &mut root, Node::named(e.name().as_ref())),
            Event::Text(t) => {
                if let Some(top) = stack.last_mut() {
                    top.push_text(&t.unescape().map_err(xml_err)?);
                }
            }
            Event::CData(c) => {
                if let Some(top) = stack.last_mut() {
                    top.push_text(&String::from_utf8_lossy(&c.into_inner()));
                }
            }
            Event::End(_) => {
                let node = stack
                    .pop()
                    .ok_or_else(|| StorageError::Xml("unbalanced closing tag".into()))?;
                attach(&mut stack, &mut root, node);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(StorageError::Xml("unexpected end of document".into()));
    }
    root.ok_or_else(|| StorageError::Xml("document has no root element".into()))
}

fn attach(stack: &mut [Node], root: &mut Option<Node>, node: Node) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => *root = Some(node),
    }
}

pub fn decode(text: &str, shape: &EntityShape) -> StorageResult<Value> {
    let root = parse_tree(text)?;
    let mut fields = children_to_map(root.children);
    coerce_fields(&mut fields, shape)?;
    Ok(Value::Object(fields))
}

fn coerce_fields(fields: &mut Map<String, Value>, shape: &EntityShape) -> StorageResult<()> {
    for declared in &shape.fields {
        match fields.get_mut(&declared.name) {
            Some(value) => {
                let raw = value.take();
                *value = coerce(&declared.name, raw, &declared.shape)?;
            }
            None => match &declared.shape {
                FieldShape::Sequence(_) => {
                    fields.insert(declared.name.clone(), Value::Array(Vec::new()));
                }
                FieldShape::Mapping => {
                    fields.insert(declared.name.clone(), Value::Object(Map::new()));
                }
                _ => {}
            },
        }
    }
    Ok(())
}

fn coerce(field: &str, value: Value, shape: &FieldShape) -> StorageResult<Value> {
    match shape {
        FieldShape::Sequence(inner) => {
            let items = match value {
                Value::Array(items) => items,
                lone => vec![lone],
            };
            items
                .into_iter()
                .map(|item| coerce(field, item, inner))
                .collect::<StorageResult<Vec<_>>>()
                .map(Value::Array)
        }
        FieldShape::Mapping => Ok(match value {
            Value::Null => Value::Object(Map::new()),
            Value::String(s) if s.trim().is_empty() => Value::Object(Map::new()),
            // Entries are written as text, so an empty entry was an empty string.
            Value::Object(entries) => Value::Object(
                entries
                    .into_iter()
                    .map(|(key, entry)| match entry {
                        Value::Null => (key, Value::String(String::new())),
                        other => (key, other),
                    })
                    .collect(),
            ),
            other => other,
        }),
        FieldShape::Record(nested) => {
            let mut fields = match value {
                Value::Object(fields) => fields,
                Value::Null => Map::new(),
                Value::String(s) if s.trim().is_empty() => Map::new(),
                other => return Ok(other),
            };
            coerce_fields(&mut fields, nested)?;
            Ok(Value::Object(fields))
        }
        // An element that is present but empty was written from an empty string.
        FieldShape::Text => Ok(match value {
            Value::Null => Value::String(String::new()),
            other => other,
        }),
        FieldShape::Integer => match value {
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| invalid_scalar(field, "an integer", &s)),
            other => Ok(other),
        },
        FieldShape::Number => match value {
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| invalid_scalar(field, "a number", &s)),
            other => Ok(other),
        },
        FieldShape::Boolean => match value {
            Value::String(s) => match s.trim() {
                "true" | "True" | "TRUE" | "1" => Ok(Value::Bool(true)),
                "false" | "False" | "FALSE" | "0" => Ok(Value::Bool(false)),
                _ => Err(invalid_scalar(field, "a boolean", &s)),
            },
            other => Ok(other),
        },
    }
}

fn invalid_scalar(field: &str, expected: &str, found: &str) -> StorageError {
    StorageError::Xml(format!("field '{field}' expects {expected}, found {found:?}"))
}
