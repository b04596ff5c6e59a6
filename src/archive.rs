//! Archive building for Knowledge Objects
//!
//! Collects every file the metadata references, plus the metadata file and
//! the license, and writes them into a gzip-compressed tar archive rooted at
//! the metadata file's directory.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use serde_json::Value;
use tracing::warn;

use crate::error::{KoError, Result};
use crate::metadata::load_metadata;
use crate::paths::filter_files;
use crate::vocab::Vocabulary;
use crate::walk::extract_ids;

/// Options for [`package`]
#[derive(Debug, Clone, Default)]
pub struct PackageOptions {
    /// Archive location; defaults to `<dirname>-<version>.tar.gz` next to
    /// the metadata file
    pub output: Option<PathBuf>,
    /// Place all members under a `<dirname>_<version>/` folder inside the
    /// archive instead of at its root
    pub nested: bool,
    /// Recognized metadata keys
    pub vocab: Vocabulary,
}

/// What an invocation of [`package`] produced
#[derive(Debug)]
pub struct PackageReport {
    /// The archive that was written
    pub archive_path: PathBuf,
    /// Member names added to the archive, relative to the metadata directory
    pub added: Vec<PathBuf>,
    /// Referenced paths that were absent from disk and skipped
    pub skipped: Vec<PathBuf>,
}

/// Package a Knowledge Object into a `.tar.gz` archive.
///
/// Exactly one archive is written per invocation. Referenced paths missing
/// from disk are skipped with a warning and listed in the report; the
/// archive is still produced with whatever exists. The archive is assembled
/// in a temporary sibling file and renamed into place, so a crash never
/// leaves a half-written `.tar.gz` behind.
pub fn package(metadata_path: &Path, options: &PackageOptions) -> Result<PackageReport> {
    let metadata_path = metadata_path
        .canonicalize()
        .map_err(|e| KoError::MetadataLoad {
            path: metadata_path.display().to_string(),
            reason: e.to_string(),
        })?;
    let metadata_dir = metadata_path
        .parent()
        .ok_or_else(|| KoError::InvalidPath(metadata_path.clone()))?
        .to_path_buf();

    let metadata = load_metadata(&metadata_path)?;

    let candidates = collect_candidates(&metadata_path, &metadata_dir, &metadata, &options.vocab);

    let mut skipped: Vec<PathBuf> = candidates
        .iter()
        .filter(|p| !p.exists())
        .cloned()
        .collect();
    skipped.sort();
    skipped.dedup();
    for path in &skipped {
        warn!(path = %path.display(), "referenced path does not exist and will be skipped");
    }

    let mut members = filter_files(candidates);
    members.sort();

    let output = match &options.output {
        Some(path) => path.clone(),
        None => {
            let dirname = dir_name(&metadata_dir)?;
            let version = required_version(&metadata, &options.vocab)?;
            metadata_dir.join(format!("{}-{}.tar.gz", dirname, version))
        }
    };

    let prefix = if options.nested {
        let dirname = dir_name(&metadata_dir)?;
        let version = required_version(&metadata, &options.vocab)?;
        Some(format!(
            "{}_{}",
            dirname.replace('-', "_"),
            version.replace('-', "_")
        ))
    } else {
        None
    };

    let added = write_archive(&output, &metadata_dir, &members, prefix.as_deref())?;

    Ok(PackageReport {
        archive_path: output,
        added,
        skipped,
    })
}

/// Everything the archive should contain, before deduplication: the metadata
/// file itself, every `@id` reference joined onto the metadata directory,
/// and the license reference if present.
fn collect_candidates(
    metadata_path: &Path,
    metadata_dir: &Path,
    metadata: &Value,
    vocab: &Vocabulary,
) -> Vec<PathBuf> {
    let mut candidates = vec![metadata_path.to_path_buf()];

    for id in extract_ids(metadata) {
        candidates.push(resolve_candidate(metadata_dir, &id));
    }

    if let Some(license_id) = metadata
        .get(&vocab.license_key)
        .and_then(|l| l.get("@id"))
        .and_then(Value::as_str)
    {
        candidates.push(resolve_candidate(metadata_dir, license_id));
    }

    candidates
}

/// Join a reference onto the metadata directory and normalize it when it
/// exists on disk, so containment checks compare canonical forms.
fn resolve_candidate(metadata_dir: &Path, id: &str) -> PathBuf {
    let joined = metadata_dir.join(id);
    joined.canonicalize().unwrap_or(joined)
}

fn dir_name(metadata_dir: &Path) -> Result<String> {
    metadata_dir
        .file_name()
        .and_then(|n| n.to_str())
        .map(String::from)
        .ok_or_else(|| KoError::InvalidPath(metadata_dir.to_path_buf()))
}

fn required_version(metadata: &Value, vocab: &Vocabulary) -> Result<String> {
    crate::metadata::top_level_str(metadata, &vocab.version_key)
        .map(String::from)
        .ok_or_else(|| KoError::MissingField(vocab.version_key.clone()))
}

/// Write the archive atomically: members go into `<output>.tmp`, which is
/// renamed over the final path once the gzip stream is closed.
fn write_archive(
    output: &Path,
    metadata_dir: &Path,
    members: &[PathBuf],
    prefix: Option<&str>,
) -> Result<Vec<PathBuf>> {
    let tmp_path = tmp_sibling(output);
    let file = File::create(&tmp_path)?;
    let encoder = GzEncoder::new(file, Compression::default());
    let mut builder = tar::Builder::new(encoder);

    let mut added = Vec::new();
    for path in members {
        if !path.exists() {
            warn!(path = %path.display(), "path vanished before archiving, skipped");
            continue;
        }

        // Member names must stay inside the metadata directory
        let relative = match path.strip_prefix(metadata_dir) {
            Ok(rel) => rel,
            Err(_) => {
                warn!(path = %path.display(), "path escapes the metadata directory, skipped");
                continue;
            }
        };

        let member_name = match prefix {
            Some(prefix) => PathBuf::from(prefix).join(relative),
            None => relative.to_path_buf(),
        };

        if path.is_dir() {
            builder.append_dir_all(&member_name, path)?;
        } else {
            builder.append_path_with_name(path, &member_name)?;
        }
        added.push(member_name);
    }

    let encoder = builder.into_inner()?;
    encoder.finish()?;
    fs::rename(&tmp_path, output)?;

    Ok(added)
}

/// `<output>.tmp`, in the same directory so the final rename stays on one
/// filesystem
fn tmp_sibling(output: &Path) -> PathBuf {
    let mut name = output.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::collections::BTreeSet;
    use std::fs;
    use tempfile::TempDir;

    fn write_ko(dir: &Path, metadata: &str) -> PathBuf {
        let path = dir.join("metadata.json");
        fs::write(&path, metadata).unwrap();
        path
    }

    fn archive_members(path: &Path) -> BTreeSet<String> {
        let file = File::open(path).unwrap();
        let mut archive = tar::Archive::new(GzDecoder::new(file));
        archive
            .entries()
            .unwrap()
            .map(|e| e.unwrap().path().unwrap().display().to_string())
            .collect()
    }

    #[test]
    fn test_package_flat_members() {
        let tmp = TempDir::new().unwrap();
        let metadata_path = write_ko(
            tmp.path(),
            r#"{
                "@id": "my-ko",
                "dc:version": "v1.0",
                "koio:hasKnowledge": [
                    {"@id": "a.txt"},
                    {"@id": "sub"}
                ]
            }"#,
        );
        fs::write(tmp.path().join("a.txt"), "a").unwrap();
        fs::create_dir(tmp.path().join("sub")).unwrap();
        fs::write(tmp.path().join("sub/b.txt"), "b").unwrap();

        let report = package(&metadata_path, &PackageOptions::default()).unwrap();

        let members = archive_members(&report.archive_path);
        assert!(members.contains("metadata.json"));
        assert!(members.contains("a.txt"));
        assert!(members.contains("sub/b.txt"));
        assert!(report.skipped.iter().all(|p| !p.ends_with("a.txt")));
    }

    #[test]
    fn test_package_nested_members() {
        let tmp = TempDir::new().unwrap();
        let ko_dir = tmp.path().join("my-ko");
        fs::create_dir(&ko_dir).unwrap();
        let metadata_path = write_ko(
            &ko_dir,
            r#"{"@id": "my-ko", "dc:version": "v1.0", "koio:hasKnowledge": [{"@id": "a.txt"}]}"#,
        );
        fs::write(ko_dir.join("a.txt"), "a").unwrap();

        let options = PackageOptions {
            nested: true,
            ..Default::default()
        };
        let report = package(&metadata_path, &options).unwrap();

        let members = archive_members(&report.archive_path);
        assert!(members.contains("my_ko_v1.0/metadata.json"));
        assert!(members.contains("my_ko_v1.0/a.txt"));
    }

    #[test]
    fn test_package_default_output_name() {
        let tmp = TempDir::new().unwrap();
        let ko_dir = tmp.path().join("my-ko");
        fs::create_dir(&ko_dir).unwrap();
        let metadata_path = write_ko(&ko_dir, r#"{"@id": "my-ko", "dc:version": "v2.1"}"#);

        let report = package(&metadata_path, &PackageOptions::default()).unwrap();
        assert_eq!(
            report.archive_path.file_name().unwrap().to_str().unwrap(),
            "my-ko-v2.1.tar.gz"
        );
        assert!(report.archive_path.exists());
    }

    #[test]
    fn test_package_missing_reference_tolerated() {
        let tmp = TempDir::new().unwrap();
        let metadata_path = write_ko(
            tmp.path(),
            r#"{"@id": "ko", "dc:version": "v1.0", "koio:hasKnowledge": [{"@id": "missing.txt"}]}"#,
        );

        let report = package(&metadata_path, &PackageOptions::default()).unwrap();

        let members = archive_members(&report.archive_path);
        assert!(members.contains("metadata.json"));
        assert!(!members.iter().any(|m| m.contains("missing.txt")));
        assert!(report
            .skipped
            .iter()
            .any(|p| p.ends_with("missing.txt")));
    }

    #[test]
    fn test_package_includes_license() {
        let tmp = TempDir::new().unwrap();
        let metadata_path = write_ko(
            tmp.path(),
            r#"{"@id": "ko", "dc:version": "v1.0", "dc:license": {"@id": "license.md"}}"#,
        );
        fs::write(tmp.path().join("license.md"), "MIT").unwrap();

        let report = package(&metadata_path, &PackageOptions::default()).unwrap();
        assert!(archive_members(&report.archive_path).contains("license.md"));
    }

    #[test]
    fn test_package_missing_version_without_output_fails() {
        let tmp = TempDir::new().unwrap();
        let metadata_path = write_ko(tmp.path(), r#"{"@id": "ko"}"#);

        let result = package(&metadata_path, &PackageOptions::default());
        assert!(matches!(result, Err(KoError::MissingField(_))));
    }

    #[test]
    fn test_package_explicit_output_needs_no_version() {
        let tmp = TempDir::new().unwrap();
        let metadata_path = write_ko(tmp.path(), r#"{"@id": "ko"}"#);
        let output = tmp.path().join("out.tar.gz");

        let options = PackageOptions {
            output: Some(output.clone()),
            ..Default::default()
        };
        let report = package(&metadata_path, &options).unwrap();
        assert_eq!(report.archive_path, output);
        assert!(output.exists());
    }

    #[test]
    fn test_package_no_temp_file_left_behind() {
        let tmp = TempDir::new().unwrap();
        let metadata_path = write_ko(tmp.path(), r#"{"@id": "ko", "dc:version": "v1.0"}"#);

        let report = package(&metadata_path, &PackageOptions::default()).unwrap();
        assert!(!tmp_sibling(&report.archive_path).exists());
    }
}
