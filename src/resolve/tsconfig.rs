//! Base directory discovery from `tsconfig.json` / `jsconfig.json`.
//!
//! Only `compilerOptions.baseUrl` is read. A manifest that is missing,
//! unreadable or malformed simply yields no base directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::resolver::normalize_path;

/// Manifest file names, searched in this order in each directory.
pub const MANIFEST_NAMES: &[&str] = &["tsconfig.json", "jsconfig.json"];

/// The part of a compiler manifest this crate cares about.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompilerManifest {
    #[serde(rename = "compilerOptions", default)]
    pub compiler_options: CompilerOptions,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompilerOptions {
    #[serde(rename = "baseUrl")]
    pub base_url: Option<String>,
}

/// Parse manifest text. Plain JSON first, then JSON5 for the comments and
/// trailing commas that compiler manifests commonly carry.
pub fn parse_manifest(content: &str) -> Option<CompilerManifest> {
    let value: Value = serde_json::from_str(content)
        .ok()
        .or_else(|| json_five::from_str::<Value>(content).ok())?;
    serde_json::from_value(value).ok()
}

/// Walk upward from `start` to the first directory holding a manifest.
pub fn find_manifest(start: &Path) -> Option<PathBuf> {
    let start = if start.is_file() {
        start.parent()?
    } else {
        start
    };
    start.ancestors().find_map(|dir| {
        MANIFEST_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
    })
}

/// `compilerOptions.baseUrl` of `manifest`, anchored at its directory.
pub fn base_url_from_manifest(manifest: &Path) -> Option<PathBuf> {
    let content = match fs::read_to_string(manifest) {
        Ok(content) => content,
        Err(err) => {
            debug!(path = %manifest.display(), %err, "cannot read manifest");
            return None;
        }
    };

    let Some(parsed) = parse_manifest(&content) else {
        debug!(path = %manifest.display(), "malformed manifest, ignoring baseUrl");
        return None;
    };

    let base_url = parsed.compiler_options.base_url?;
    let anchor = manifest.parent().unwrap_or_else(|| Path::new(""));
    Some(normalize_path(&anchor.join(base_url)))
}

/// Work out the base directory for one operation.
///
/// An explicit `base_url` wins (relative values are taken from `cwd`), then an
/// explicit manifest, then a manifest found by walking up from `root`.
pub fn discover_base_dir(
    base_url: Option<&Path>,
    manifest: Option<&Path>,
    root: &Path,
    cwd: &Path,
) -> Option<PathBuf> {
    if let Some(base_url) = base_url {
        let absolute = if base_url.is_absolute() {
            base_url.to_path_buf()
        } else {
            cwd.join(base_url)
        };
        return Some(normalize_path(&absolute));
    }

    let manifest = match manifest {
        Some(explicit) if explicit.is_absolute() => explicit.to_path_buf(),
        Some(explicit) => cwd.join(explicit),
        None => find_manifest(root)?,
    };
    let base = base_url_from_manifest(&manifest);
    debug!(manifest = %manifest.display(), base = ?base, "base directory");
    base
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_manifest_json() {
        let parsed = parse_manifest(r#"{"compilerOptions": {"baseUrl": "src"}}"#).unwrap();
        assert_eq!(parsed.compiler_options.base_url.as_deref(), Some("src"));
    }

    #[test]
    fn test_parse_manifest_json5() {
        let content = r#"{
            // comment
            "compilerOptions": {
                "baseUrl": ".",
                "strict": true,
            },
        }"#;
        let parsed = parse_manifest(content).unwrap();
        assert_eq!(parsed.compiler_options.base_url.as_deref(), Some("."));
    }

    #[test]
    fn test_parse_manifest_without_compiler_options() {
        let parsed = parse_manifest(r#"{"include": ["src"]}"#).unwrap();
        assert!(parsed.compiler_options.base_url.is_none());
    }

    #[test]
    fn test_parse_manifest_garbage() {
        assert!(parse_manifest("{ not json at all").is_none());
    }

    #[test]
    fn test_discover_walks_upward() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("packages/app/src")).unwrap();
        fs::write(
            dir.path().join("packages/app/tsconfig.json"),
            r#"{"compilerOptions": {"baseUrl": "./src"}}"#,
        )
        .unwrap();

        let root = dir.path().join("packages/app/src");
        let base = discover_base_dir(None, None, &root, dir.path());
        assert_eq!(base, Some(dir.path().join("packages/app/src")));
    }

    #[test]
    fn test_discover_prefers_explicit_base_url() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("tsconfig.json"),
            r#"{"compilerOptions": {"baseUrl": "src"}}"#,
        )
        .unwrap();

        let base = discover_base_dir(Some(Path::new("lib")), None, dir.path(), dir.path());
        assert_eq!(base, Some(dir.path().join("lib")));
    }

    #[test]
    fn test_discover_explicit_manifest() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("config")).unwrap();
        fs::write(
            dir.path().join("config/tsconfig.base.json"),
            r#"{"compilerOptions": {"baseUrl": ".."}}"#,
        )
        .unwrap();

        let base = discover_base_dir(
            None,
            Some(Path::new("config/tsconfig.base.json")),
            dir.path(),
            dir.path(),
        );
        assert_eq!(base, Some(dir.path().to_path_buf()));
    }

    #[test]
    fn test_malformed_manifest_yields_none() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("tsconfig.json"), "{ compilerOptions: [").unwrap();

        assert_eq!(discover_base_dir(None, None, dir.path(), dir.path()), None);
    }
}
