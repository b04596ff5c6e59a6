//! Vocabulary definitions for Knowledge Object metadata
//!
//! The metadata descriptors in the wild mix three key conventions: short
//! prefixed keys (`dc:title`), fully expanded IRIs, and bare terms resolved
//! through `@context`. The recognized keys are therefore configuration, held
//! in [`Vocabulary`], rather than constants scattered through the code.

/// Dublin Core elements namespace
pub const DC_NS: &str = "http://purl.org/dc/elements/1.1/";

/// schema.org namespace
pub const SCHEMA_NS: &str = "http://schema.org/";

/// KOIO ontology namespace
pub const KOIO_NS: &str = "https://kgrid.org/koio#";

/// "is implemented by" relation (SWO_0000085)
pub const IMPLEMENTED_BY: &str = "http://www.ebi.ac.uk/swo/SWO_0000085";

/// "depends on" relation (RO_0002502)
pub const DEPENDS_ON: &str = "http://purl.obolibrary.org/obo/RO_0002502";

/// Standard metadata descriptor filename
pub const METADATA_FILENAME: &str = "metadata.json";

/// Relative marker used as base IRI when no repository URL is available
pub const RELATIVE_BASE: &str = "./";

/// Recognized metadata keys.
///
/// `license_key` and `version_key` are read from raw (unexpanded) metadata by
/// the archive builder; the `*_iri` fields are read from expanded metadata by
/// the page generator.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    /// License entry in raw metadata, e.g. `dc:license`
    pub license_key: String,
    /// Version entry in raw metadata, e.g. `dc:version`
    pub version_key: String,
    /// Documentation relation in expanded metadata
    pub documentation_iri: String,
    /// Test relation in expanded metadata
    pub test_iri: String,
    /// Knowledge relation in expanded metadata
    pub knowledge_iri: String,
    /// Service relation in expanded metadata
    pub service_iri: String,
    /// Implementation relation in expanded metadata
    pub implemented_by_iri: String,
    /// Dependency relation in expanded metadata
    pub depends_on_iri: String,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            license_key: "dc:license".to_string(),
            version_key: "dc:version".to_string(),
            documentation_iri: format!("{}hasDocumentation", KOIO_NS),
            test_iri: format!("{}hasTest", KOIO_NS),
            knowledge_iri: format!("{}hasKnowledge", KOIO_NS),
            service_iri: format!("{}hasService", KOIO_NS),
            implemented_by_iri: IMPLEMENTED_BY.to_string(),
            depends_on_iri: DEPENDS_ON.to_string(),
        }
    }
}

/// Build a Dublin Core IRI from a bare element name
pub fn dc(element: &str) -> String {
    format!("{}{}", DC_NS, element)
}

/// Build a schema.org IRI from a bare term name
pub fn schema(term: &str) -> String {
    format!("{}{}", SCHEMA_NS, term)
}
