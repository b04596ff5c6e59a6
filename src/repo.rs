//! Base IRI resolution from a version-controlled working tree
//!
//! When the metadata file sits inside a git repository with a configured
//! remote, relative references can be expanded against the remote's branch
//! URL instead of staying repository-local. Introspection is read-only and
//! shells out to `git`; a missing repository or remote is an expected
//! condition, not an error.

use std::path::Path;
use std::process::Command;

use crate::vocab::RELATIVE_BASE;

/// Run a git query and return trimmed stdout, or `None` on spawn failure or
/// a nonzero exit
fn run_git(args: &[&str], dir: &Path) -> Option<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Resolve the branch URL to use as base IRI for a metadata file.
///
/// Returns `<remoteHttpsUrl>/blob/<branch>/<pathRelativeToRepoRoot>` when the
/// file sits inside a working tree with an `origin` remote, `None` otherwise.
pub fn resolve_base_iri(metadata_path: &Path) -> Option<String> {
    let dir = match metadata_path.parent() {
        Some(parent) if parent.as_os_str().is_empty() => Path::new("."),
        Some(parent) => parent,
        None => Path::new("."),
    };

    let toplevel = run_git(&["rev-parse", "--show-toplevel"], dir)?;
    let remote = run_git(&["remote", "get-url", "origin"], dir)?;
    let branch = run_git(&["rev-parse", "--abbrev-ref", "HEAD"], dir)?;

    let repo_root = Path::new(&toplevel).canonicalize().ok()?;
    let metadata_path = metadata_path.canonicalize().ok()?;
    let relative = metadata_path.strip_prefix(&repo_root).ok()?;

    Some(format!(
        "{}/blob/{}/{}",
        remote_web_url(&remote),
        branch,
        relative.display()
    ))
}

/// Resolve the base IRI with the relative fallback applied: the branch URL
/// when available and wanted, the `./` marker otherwise
pub fn base_iri_or_relative(metadata_path: &Path, include_relative_paths: bool) -> String {
    if include_relative_paths {
        return RELATIVE_BASE.to_string();
    }
    resolve_base_iri(metadata_path).unwrap_or_else(|| RELATIVE_BASE.to_string())
}

/// Translate a remote URL into its web form: SSH remotes become HTTPS and a
/// trailing `.git` is stripped
fn remote_web_url(remote: &str) -> String {
    let remote = remote.strip_suffix(".git").unwrap_or(remote);
    match remote.strip_prefix("git@github.com:") {
        Some(rest) => format!("https://github.com/{}", rest),
        None => remote.to_string(),
    }
}
