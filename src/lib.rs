//! Knowledge Object packaging and information pages
//!
//! A Knowledge Object (KO) is a directory of files described by a JSON-LD
//! metadata descriptor. This library provides the two pipelines behind the
//! `ko-pack` CLI:
//!
//! 1. **Packaging**: walk the metadata tree for every `@id` reference,
//!    deduplicate paths already covered by a referenced directory, and write
//!    a gzip-compressed tar archive rooted at the metadata file's directory.
//! 2. **Information pages**: normalize the document's `@context` (fetching
//!    external contexts), resolve a base IRI from the enclosing git
//!    repository's branch URL (or fall back to relative links), expand the
//!    metadata so every key and `@id` is absolute, extract documentation and
//!    test sections, and render a self-contained HTML page.
//!
//! # Usage
//!
//! ## Package a Knowledge Object
//!
//! ```ignore
//! use ko_pack::{package, PackageOptions};
//!
//! let report = package("my-ko/metadata.json".as_ref(), &PackageOptions::default())?;
//! println!("wrote {}", report.archive_path.display());
//! ```
//!
//! ## Render an information page
//!
//! ```ignore
//! use ko_pack::{write_information_page, PageOptions};
//!
//! write_information_page(
//!     "my-ko/metadata.json".as_ref(),
//!     "my-ko/index.html".as_ref(),
//!     &PageOptions::default(),
//! )?;
//! ```

pub mod archive;
pub mod context;
pub mod error;
pub mod expand;
pub mod metadata;
pub mod page;
pub mod paths;
pub mod repo;
pub mod scaffold;
pub mod vocab;
pub mod walk;

// Re-export main types for convenience
pub use crate::archive::{package, PackageOptions, PackageReport};
pub use crate::context::{ContextResolver, ContextUnit};
pub use crate::error::{KoError, Result};
pub use crate::expand::{expand, expand_all};
pub use crate::metadata::load_metadata;
pub use crate::page::{
    render_information_page, write_information_page, PageData, PageOptions,
};
pub use crate::paths::filter_files;
pub use crate::repo::{base_iri_or_relative, resolve_base_iri};
pub use crate::scaffold::{init, InitReport};
pub use crate::vocab::Vocabulary;
pub use crate::walk::{extract_ids, find_items};
