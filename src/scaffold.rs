//! Scaffolding for new Knowledge Objects
//!
//! `init` writes a starter descriptor plus license, readme, and a rendered
//! information page, giving a KO directory that packages and renders out of
//! the box.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde_json::{json, Value};

use crate::error::Result;
use crate::page::{write_information_page, PageOptions};
use crate::vocab::{DC_NS, DEPENDS_ON, IMPLEMENTED_BY, KOIO_NS, METADATA_FILENAME, SCHEMA_NS};

/// Files written by [`init`]
#[derive(Debug)]
pub struct InitReport {
    pub metadata: PathBuf,
    pub license: PathBuf,
    pub readme: PathBuf,
    pub page: PathBuf,
}

/// Scaffold a Knowledge Object named `name` inside `dir`.
///
/// Writes `metadata.json`, `license.md`, `README.md`, and `index.html`
/// rendered through the normal page pipeline.
pub fn init(name: &str, dir: &Path, options: &PageOptions) -> Result<InitReport> {
    let metadata_path = dir.join(METADATA_FILENAME);
    let metadata = starter_metadata(name, &Local::now().format("%Y-%m-%d").to_string());
    fs::write(&metadata_path, serde_json::to_string_pretty(&metadata)?)?;

    let license_path = dir.join("license.md");
    fs::write(&license_path, "KO's license content goes here.")?;

    let readme_path = dir.join("README.md");
    fs::write(&readme_path, "KO's readme content goes here.")?;

    let page_path = dir.join("index.html");
    write_information_page(&metadata_path, &page_path, options)?;

    Ok(InitReport {
        metadata: metadata_path,
        license: license_path,
        readme: readme_path,
        page: page_path,
    })
}

/// The starter descriptor.
///
/// Carries an inline `@context` so a freshly scaffolded object renders
/// without a network fetch.
fn starter_metadata(name: &str, date: &str) -> Value {
    let slug = name.replace([' ', '_'], "-");
    json!({
        "@context": {
            "dc": DC_NS,
            "schema": SCHEMA_NS,
            "koio": KOIO_NS,
            "implementedBy": {"@id": IMPLEMENTED_BY, "@type": "@id"},
            "dependsOn": {"@id": DEPENDS_ON, "@type": "@id"}
        },
        "@id": slug,
        "@type": "koio:KnowledgeObject",
        "dc:title": name,
        "dc:identifier": format!("ark:{}", slug),
        "dc:version": "v1.0",
        "dc:date": date,
        "dc:license": {"@id": "license.md"},
        "koio:hasKnowledge": [],
        "koio:hasDocumentation": [
            {
                "@id": "README.md",
                "@type": "InformationArtifact",
                "dc:title": "README.md",
                "dc:description": "KO readme file."
            },
            {
                "@id": "index.html",
                "@type": "InformationArtifact",
                "dc:title": "Knowledge Object Information Page",
                "dc:description": "Knowledge object information page."
            }
        ]
    })
}
