//! Information page generation
//!
//! Shapes expanded metadata into a view model and renders it through an
//! askama template into a single self-contained HTML document. The template
//! owns no logic beyond display; everything it shows is prepared here from
//! fully-qualified (expanded) field keys.

use std::fs;
use std::path::Path;

use askama::Template;
use serde_json::Value;

use crate::context::ContextResolver;
use crate::error::Result;
use crate::expand::expand_all;
use crate::metadata::load_metadata;
use crate::repo::base_iri_or_relative;
use crate::vocab::{dc, schema, Vocabulary};
use crate::walk::find_items;

/// Options for information page generation
#[derive(Debug, Clone, Default)]
pub struct PageOptions {
    /// Link to local relative paths even when the metadata sits inside a
    /// repository with a resolvable remote
    pub include_relative_paths: bool,
    /// Recognized metadata keys
    pub vocab: Vocabulary,
}

/// A displayable hyperlink
#[derive(Debug, Clone)]
pub struct Link {
    pub href: String,
    pub label: String,
}

/// Creator block shown for the object and for each knowledge entry
#[derive(Debug, Clone)]
pub struct Creator {
    pub name: String,
    pub affiliation: String,
    pub email: String,
    pub website: String,
}

/// One implementation reference under a knowledge entry
#[derive(Debug, Clone)]
pub struct Implementation {
    pub href: String,
    pub label: String,
    pub types: Vec<String>,
}

/// One entry of the knowledge list
#[derive(Debug, Clone)]
pub struct KnowledgeEntry {
    pub name: String,
    pub ko_type: Link,
    pub description: Option<String>,
    pub implementations: Vec<Implementation>,
    pub depends_on: Option<String>,
    pub source: Option<String>,
    pub format: Option<String>,
    pub date: Option<String>,
    pub creator: Option<Creator>,
}

/// One entry of the services list
#[derive(Debug, Clone)]
pub struct ServiceEntry {
    pub name: String,
    pub ko_type: Link,
    pub depends_on: String,
    pub implementation: Link,
}

/// A documentation or test section entry
#[derive(Debug, Clone)]
pub struct Section {
    pub href: String,
    pub title: String,
    pub description: String,
}

/// View model for the information page template.
///
/// Built from expanded metadata only; the section lists are consumed for
/// display and never mutated.
#[derive(Template)]
#[template(path = "info_page.html")]
pub struct PageData {
    pub title: String,
    pub description_lines: Vec<String>,
    pub id_href: String,
    pub id_label: String,
    pub identifier: String,
    pub ko_type: Link,
    pub version: String,
    pub date: String,
    pub license: Option<Link>,
    pub source: Option<String>,
    pub creator: Creator,
    pub knowledge: Vec<KnowledgeEntry>,
    pub services: Vec<ServiceEntry>,
    pub documentation: Vec<Section>,
    pub tests: Vec<Section>,
}

impl PageData {
    /// Shape an expanded metadata tree into the page view model
    pub fn build(expanded: &Value, vocab: &Vocabulary, base_iri: &str) -> Self {
        let documentation = find_items(expanded, &vocab.documentation_iri)
            .iter()
            .map(|doc| Section {
                href: node_id(doc).unwrap_or_else(|| "#".to_string()),
                title: field_str(doc, &dc("title")).unwrap_or_else(|| "Untitled".to_string()),
                description: field_str(doc, &dc("description"))
                    .unwrap_or_else(|| "No description".to_string()),
            })
            .collect();

        let tests = find_items(expanded, &vocab.test_iri)
            .iter()
            .map(|test| Section {
                // Test links point at the implementation, not the entry itself
                href: first_node(test, &vocab.implemented_by_iri)
                    .and_then(|n| node_id(&n))
                    .unwrap_or_else(|| "#".to_string()),
                title: field_str(test, &dc("title")).unwrap_or_else(|| "Untitled".to_string()),
                description: field_str(test, &dc("description"))
                    .unwrap_or_else(|| "No description".to_string()),
            })
            .collect();

        let knowledge = find_items(expanded, &vocab.knowledge_iri)
            .iter()
            .map(|entry| build_knowledge(entry, vocab))
            .collect();

        let services = find_items(expanded, &vocab.service_iri)
            .iter()
            .map(|entry| build_service(entry, vocab))
            .collect();

        let description = field_str(expanded, &dc("description")).unwrap_or_default();

        PageData {
            title: field_str(expanded, &dc("title")).unwrap_or_else(|| "Untitled".to_string()),
            description_lines: description.lines().map(String::from).collect(),
            id_href: parent_of(base_iri),
            id_label: node_id(expanded)
                .map(|id| last_segment(&id))
                .unwrap_or_else(|| "Undefined".to_string()),
            identifier: field_str(expanded, &dc("identifier"))
                .unwrap_or_else(|| "Undefined".to_string()),
            ko_type: type_link(expanded),
            version: field_str(expanded, &dc("version"))
                .unwrap_or_else(|| "Undefined".to_string()),
            date: field_str(expanded, &dc("date")).unwrap_or_else(|| "Undefined".to_string()),
            license: first_node(expanded, &dc("license"))
                .and_then(|l| node_id(&l))
                .map(|href| Link {
                    label: filename(&href),
                    href,
                }),
            source: field_str(expanded, &dc("source")),
            creator: build_creator(first_node(expanded, &schema("creator")).as_ref())
                .unwrap_or_else(undefined_creator),
            knowledge,
            services,
            documentation,
            tests,
        }
    }
}

/// Render the information page for a metadata file.
///
/// Runs the whole pipeline: load, context normalization (fetching external
/// contexts), base-IRI resolution with relative fallback, expansion passes,
/// section extraction, template rendering.
pub fn render_information_page(metadata_path: &Path, options: &PageOptions) -> Result<String> {
    let metadata = load_metadata(metadata_path)?;

    let mut resolver = ContextResolver::new();
    let units = resolver.normalize_document(&metadata)?;

    let base_iri = base_iri_or_relative(metadata_path, options.include_relative_paths);
    let expanded = expand_all(&metadata, &base_iri, &units);

    let data = PageData::build(&expanded, &options.vocab, &base_iri);
    Ok(data.render()?)
}

/// Render the information page and write it to `output`
pub fn write_information_page(
    metadata_path: &Path,
    output: &Path,
    options: &PageOptions,
) -> Result<()> {
    let html = render_information_page(metadata_path, options)?;
    fs::write(output, html)?;
    Ok(())
}

fn build_knowledge(entry: &Value, vocab: &Vocabulary) -> KnowledgeEntry {
    let implementations = nodes_of(entry, &vocab.implemented_by_iri)
        .into_iter()
        .map(|imp| {
            let href = node_id(&imp).unwrap_or_else(|| "Undefined".to_string());
            let label = field_str(&imp, &dc("title")).unwrap_or_else(|| filename(&href));
            Implementation {
                types: types_of(&imp),
                href,
                label,
            }
        })
        .collect();

    KnowledgeEntry {
        name: node_id(entry)
            .map(|id| last_segment(&id))
            .unwrap_or_default(),
        ko_type: type_link(entry),
        description: field_str(entry, &dc("description")),
        implementations,
        depends_on: first_node(entry, &vocab.depends_on_iri)
            .and_then(|d| node_id(&d))
            .map(|id| last_segment(&id)),
        source: field_str(entry, &dc("source")),
        format: field_str(entry, &dc("format")),
        date: field_str(entry, &dc("date")),
        creator: build_creator(first_node(entry, &schema("creator")).as_ref()),
    }
}

fn build_service(entry: &Value, vocab: &Vocabulary) -> ServiceEntry {
    let implementation_id = first_node(entry, &vocab.implemented_by_iri)
        .and_then(|n| node_id(&n))
        .unwrap_or_else(|| "Undefined".to_string());
    // Directory references have no useful filename; show the service id
    let label = match filename(&implementation_id).as_str() {
        "" | "." => node_id(entry)
            .unwrap_or_default()
            .replace("_:", ""),
        name => name.to_string(),
    };

    ServiceEntry {
        name: node_id(entry)
            .map(|id| last_segment(&id))
            .unwrap_or_default(),
        ko_type: type_link(entry),
        depends_on: first_node(entry, &vocab.depends_on_iri)
            .and_then(|d| node_id(&d))
            .map(|id| last_segment(&id))
            .unwrap_or_else(|| "Undefined".to_string()),
        implementation: Link {
            href: implementation_id,
            label,
        },
    }
}

fn build_creator(node: Option<&Value>) -> Option<Creator> {
    let node = node?;
    let given = field_str(node, &schema("givenName")).unwrap_or_default();
    let family = field_str(node, &schema("familyName")).unwrap_or_default();
    let name = field_str(node, &schema("name")).unwrap_or_default();
    let full_name = [given, family, name]
        .iter()
        .filter(|part| !part.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join(" ");

    Some(Creator {
        name: if full_name.is_empty() {
            "Undefined".to_string()
        } else {
            full_name
        },
        affiliation: field_str(node, &schema("affiliation"))
            .unwrap_or_else(|| "Undefined".to_string()),
        email: field_str(node, &schema("email")).unwrap_or_else(|| "Undefined".to_string()),
        website: node_id(node).unwrap_or_else(|| "Undefined".to_string()),
    })
}

fn undefined_creator() -> Creator {
    Creator {
        name: "Undefined".to_string(),
        affiliation: "Undefined".to_string(),
        email: "Undefined".to_string(),
        website: "Undefined".to_string(),
    }
}

/// First value under `key`, unwrapping a single-element array.
///
/// Expanded metadata in the wild stores a field as a bare value, an object,
/// or a one-element array of either; lookups accept all of them.
fn first_node(node: &Value, key: &str) -> Option<Value> {
    match node.get(key)? {
        Value::Array(items) => items.first().cloned(),
        other => Some(other.clone()),
    }
}

/// String content of a field: a bare string or a `{"@value": …}` wrapper
fn string_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(_) => value
            .get("@value")
            .and_then(Value::as_str)
            .map(String::from),
        _ => None,
    }
}

fn field_str(node: &Value, key: &str) -> Option<String> {
    first_node(node, key).as_ref().and_then(string_of)
}

/// All nodes under `key`, whether the value is a single object or an array
fn nodes_of(node: &Value, key: &str) -> Vec<Value> {
    match node.get(key) {
        Some(Value::Array(items)) => items.clone(),
        Some(other) => vec![other.clone()],
        None => Vec::new(),
    }
}

fn node_id(node: &Value) -> Option<String> {
    node.get("@id").and_then(Value::as_str).map(String::from)
}

/// `@type` values as a list of IRIs (string or array form)
fn types_of(node: &Value) -> Vec<String> {
    match node.get("@type") {
        Some(Value::String(t)) => vec![t.clone()],
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(|t| t.as_str().map(String::from))
            .collect(),
        _ => Vec::new(),
    }
}

fn type_link(node: &Value) -> Link {
    match types_of(node).into_iter().next() {
        Some(iri) => Link {
            label: short_label(&iri),
            href: iri,
        },
        None => Link {
            href: String::new(),
            label: "Undefined".to_string(),
        },
    }
}

/// Human label for an IRI: the fragment, or the last path segment
fn short_label(iri: &str) -> String {
    match iri.rsplit_once('#') {
        Some((_, fragment)) if !fragment.is_empty() => fragment.to_string(),
        _ => last_segment(iri),
    }
}

fn last_segment(id: &str) -> String {
    id.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(id)
        .to_string()
}

/// Filename component of a URL or path, ignoring query and fragment
fn filename(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or("");
    path.rsplit('/').next().unwrap_or("").to_string()
}

/// Everything before the last path segment, used as the page's id link
fn parent_of(iri: &str) -> String {
    match iri.rsplit_once('/') {
        Some((parent, _)) => parent.to_string(),
        None => String::new(),
    }
}
