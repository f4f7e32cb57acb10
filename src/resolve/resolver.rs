//! Module specifier resolution.
//!
//! Maps an import specifier plus the file containing it to the file an
//! editor's "go to definition" would open. Resolution never fails loudly:
//! anything that does not land on an existing file comes back as `None` or,
//! for package specifiers, as [`ModuleId::Package`].

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use tracing::trace;

use crate::analysis::ModuleId;

/// Extensions probed when a specifier has none, most specific first.
pub const DEFAULT_EXTENSIONS: &[&str] = &[
    "ts", "tsx", "js", "jsx", "mjs", "cjs", "mts", "cts", "vue", "svelte",
];

const CASE_INSENSITIVE_FS: bool = cfg!(any(windows, target_os = "macos"));

/// Resolves specifiers for one search root.
///
/// The base directory is fixed at construction and never changes during an
/// operation.
#[derive(Debug, Clone)]
pub struct ModuleResolver {
    base_dir: Option<PathBuf>,
    extensions: Vec<String>,
}

impl Default for ModuleResolver {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ModuleResolver {
    pub fn new(base_dir: Option<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.map(|b| normalize_path(&b)),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }

    /// Replace the probing order.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|e| e.into().trim_start_matches('.').to_string())
            .collect();
        self
    }

    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Resolve `specifier` as written in `from_file`.
    ///
    /// Precedence: relative, absolute, bare package, base-directory-relative,
    /// then relative again as a fallback. Package specifiers with a `/`
    /// (`@scope/pkg`, `lodash/fp`) that do not land on a project file are
    /// passed through as packages.
    pub fn resolve(&self, specifier: &str, from_file: &Path) -> Option<ModuleId> {
        let from_dir = from_file.parent().unwrap_or_else(|| Path::new(""));

        if is_relative(specifier) {
            return self.probe(&from_dir.join(specifier)).map(ModuleId::File);
        }

        if Path::new(specifier).is_absolute() {
            return self.probe(Path::new(specifier)).map(ModuleId::File);
        }

        if !specifier.contains('/') {
            return Some(ModuleId::Package(specifier.to_string()));
        }

        if let Some(base) = &self.base_dir {
            if let Some(found) = self.probe(&base.join(specifier)) {
                return Some(ModuleId::File(found));
            }
        }

        if let Some(found) = self.probe(&from_dir.join(specifier)) {
            return Some(ModuleId::File(found));
        }

        trace!(specifier, from = %from_file.display(), "treating as package");
        Some(ModuleId::Package(specifier.to_string()))
    }

    /// Probe a candidate path: as given, with each extension, then as a
    /// directory with an `index.*` file.
    pub fn probe(&self, candidate: &Path) -> Option<PathBuf> {
        let candidate = normalize_path(candidate);

        if self.has_known_extension(&candidate) && candidate.is_file() {
            return Some(candidate);
        }

        for ext in &self.extensions {
            let with_ext = append_extension(&candidate, ext);
            if with_ext.is_file() {
                return Some(with_ext);
            }
        }

        if candidate.is_dir() {
            for ext in &self.extensions {
                let index = candidate.join(format!("index.{}", ext));
                if index.is_file() {
                    return Some(index);
                }
            }
        }

        None
    }

    /// Resolve a target file named on the command line.
    ///
    /// Relative paths are taken from `cwd`, the directory the user ran the
    /// command in, not the search root. A path with an extension is used as
    /// given; a dotted stem such as `api.client` is still probed.
    pub fn resolve_target(&self, target: &Path, cwd: &Path) -> PathBuf {
        let absolute = if target.is_absolute() {
            target.to_path_buf()
        } else {
            cwd.join(target)
        };
        let absolute = normalize_path(&absolute);

        if self.has_known_extension(&absolute) {
            return absolute;
        }
        self.probe(&absolute).unwrap_or(absolute)
    }

    /// `index.<ext>` files beside `file`, in probing order.
    pub fn sibling_barrels(&self, file: &Path) -> Vec<PathBuf> {
        let Some(dir) = file.parent() else {
            return Vec::new();
        };
        self.extensions
            .iter()
            .map(|ext| dir.join(format!("index.{}", ext)))
            .filter(|p| p.is_file() && !paths_match(p, file))
            .collect()
    }

    fn has_known_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|known| known.eq_ignore_ascii_case(ext)))
    }
}

/// True for the script extensions in [`DEFAULT_EXTENSIONS`]. Anything else
/// after the last dot is part of the stem (`Button.stories`, `api.client`).
fn is_script_extension(ext: &str) -> bool {
    DEFAULT_EXTENSIONS.iter().any(|known| known.eq_ignore_ascii_case(ext))
}

/// `./x`, `../x`, `.` and `..`
pub fn is_relative(specifier: &str) -> bool {
    specifier.starts_with("./")
        || specifier.starts_with("../")
        || specifier == "."
        || specifier == ".."
}

/// The one notion of "same file" used everywhere.
///
/// Separators are unified, `.`/`..` are folded, a trailing script
/// extension is dropped, and case is folded on case-insensitive filesystems.
pub fn paths_match(a: &Path, b: &Path) -> bool {
    path_key(a) == path_key(b)
}

/// True when a resolved import points at `file`.
pub fn module_matches(id: &ModuleId, file: &Path) -> bool {
    id.as_file().is_some_and(|path| paths_match(path, file))
}

/// The form [`paths_match`] compares; use it to key sets and maps of files.
pub fn path_key(path: &Path) -> String {
    let unified = PathBuf::from(path.to_string_lossy().replace('\\', "/"));
    let normalized = normalize_path(&unified);
    let script_ext = normalized
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(is_script_extension);
    let stripped = match normalized.file_stem() {
        Some(stem) if script_ext => normalized.with_file_name(stem),
        _ => normalized,
    };
    let text = stripped.to_string_lossy().replace('\\', "/");
    if CASE_INSENSITIVE_FS {
        text.to_lowercase()
    } else {
        text
    }
}

/// Fold `.` and `..` without touching the filesystem.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// `Foo.config` + `ts` = `Foo.config.ts`
fn append_extension(path: &Path, ext: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

/// Extension-stripped file name, used for name-based matching.
pub fn basename_without_extension(path: &str) -> &str {
    let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    if name.trim_start_matches('.').is_empty() {
        return name;
    }
    match name.rfind('.') {
        Some(idx) if idx > 0 && is_script_extension(&name[idx + 1..]) => &name[..idx],
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_project() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src/components/Button")).unwrap();
        fs::create_dir_all(root.join("src/utils")).unwrap();
        fs::write(root.join("src/App.tsx"), "").unwrap();
        fs::write(root.join("src/components/Test.tsx"), "").unwrap();
        fs::write(root.join("src/components/Test.js"), "").unwrap();
        fs::write(root.join("src/components/Button/index.ts"), "").unwrap();
        fs::write(root.join("src/utils/format.ts"), "").unwrap();
        fs::write(root.join("src/styles.css"), "").unwrap();
        dir
    }

    #[test]
    fn test_relative_resolves_to_sibling() {
        let dir = create_test_project();
        let app = dir.path().join("src/App.tsx");
        let resolver = ModuleResolver::default();

        assert_eq!(
            resolver.resolve("./utils/format", &app),
            Some(ModuleId::File(dir.path().join("src/utils/format.ts")))
        );
        assert_eq!(
            resolver.resolve("../src/utils/format.ts", &app),
            Some(ModuleId::File(dir.path().join("src/utils/format.ts")))
        );
    }

    #[test]
    fn test_extension_order_prefers_typed() {
        let dir = create_test_project();
        let app = dir.path().join("src/App.tsx");
        let resolver = ModuleResolver::default();

        assert_eq!(
            resolver.resolve("./components/Test", &app),
            Some(ModuleId::File(dir.path().join("src/components/Test.tsx")))
        );

        let js_first = ModuleResolver::default().with_extensions([".js", ".tsx"]);
        assert_eq!(
            js_first.resolve("./components/Test", &app),
            Some(ModuleId::File(dir.path().join("src/components/Test.js")))
        );
    }

    #[test]
    fn test_directory_index() {
        let dir = create_test_project();
        let app = dir.path().join("src/App.tsx");
        let resolver = ModuleResolver::default();

        assert_eq!(
            resolver.resolve("./components/Button", &app),
            Some(ModuleId::File(dir.path().join("src/components/Button/index.ts")))
        );
    }

    #[test]
    fn test_unresolvable_relative_is_none() {
        let dir = create_test_project();
        let app = dir.path().join("src/App.tsx");
        let resolver = ModuleResolver::default();

        assert_eq!(resolver.resolve("./missing", &app), None);
        // Known file on disk, but not a script extension.
        assert_eq!(resolver.resolve("./styles.css", &app), None);
    }

    #[test]
    fn test_absolute_specifier() {
        let dir = create_test_project();
        let app = dir.path().join("src/App.tsx");
        let target = dir.path().join("src/utils/format");
        let resolver = ModuleResolver::default();

        assert_eq!(
            resolver.resolve(target.to_str().unwrap(), &app),
            Some(ModuleId::File(dir.path().join("src/utils/format.ts")))
        );
    }

    #[test]
    fn test_bare_module_passthrough() {
        let resolver = ModuleResolver::new(Some(PathBuf::from("/nowhere")));
        assert_eq!(
            resolver.resolve("react", Path::new("/p/src/App.tsx")),
            Some(ModuleId::Package("react".to_string()))
        );
        assert_eq!(
            resolver.resolve("@tanstack/react-query", Path::new("/p/src/App.tsx")),
            Some(ModuleId::Package("@tanstack/react-query".to_string()))
        );
    }

    #[test]
    fn test_base_dir_resolution() {
        let dir = create_test_project();
        let app = dir.path().join("src/components/Test.tsx");
        let resolver = ModuleResolver::new(Some(dir.path().join("src")));

        assert_eq!(
            resolver.resolve("utils/format", &app),
            Some(ModuleId::File(dir.path().join("src/utils/format.ts")))
        );

        let without = ModuleResolver::default();
        assert_eq!(
            without.resolve("utils/format", &app),
            Some(ModuleId::Package("utils/format".to_string()))
        );
    }

    #[test]
    fn test_paths_match_ignores_extension() {
        let base = Path::new("/p/src/Foo");
        for ext in DEFAULT_EXTENSIONS {
            let with_ext = PathBuf::from(format!("/p/src/Foo.{}", ext));
            assert!(paths_match(base, &with_ext));
            assert!(paths_match(&with_ext, base));
            assert!(paths_match(&with_ext, &with_ext));
        }
        assert!(paths_match(Path::new("/p/src/Foo.ts"), Path::new("/p/src/Foo.tsx")));
        assert!(paths_match(Path::new("/p/src/./a/../Foo.ts"), Path::new("/p/src/Foo")));
        assert!(!paths_match(Path::new("/p/a/Foo.ts"), Path::new("/p/b/Foo.ts")));
    }

    #[test]
    fn test_resolve_target_uses_cwd() {
        let dir = create_test_project();
        let resolver = ModuleResolver::default();

        let target = resolver.resolve_target(Path::new("components/Test"), &dir.path().join("src"));
        assert_eq!(target, dir.path().join("src/components/Test.tsx"));

        // An explicit extension skips probing.
        let target = resolver.resolve_target(Path::new("src/components/Test.js"), dir.path());
        assert_eq!(target, dir.path().join("src/components/Test.js"));
    }

    #[test]
    fn test_sibling_barrels() {
        let dir = create_test_project();
        fs::write(dir.path().join("src/components/index.ts"), "").unwrap();
        let resolver = ModuleResolver::default();

        let barrels = resolver.sibling_barrels(&dir.path().join("src/components/Test.tsx"));
        assert_eq!(barrels, vec![dir.path().join("src/components/index.ts")]);
    }

    #[test]
    fn test_basename_without_extension() {
        assert_eq!(basename_without_extension("./components/Test"), "Test");
        assert_eq!(basename_without_extension("/a/b/Test.tsx"), "Test");
        assert_eq!(basename_without_extension("react"), "react");
        assert_eq!(basename_without_extension(".."), "..");
        assert_eq!(basename_without_extension("./Button.stories"), "Button.stories");
        assert_eq!(basename_without_extension("src/Button.stories.tsx"), "Button.stories");
    }

    #[test]
    fn test_paths_match_keeps_dotted_stems() {
        let stem = Path::new("/app/src/api.client");
        for ext in DEFAULT_EXTENSIONS {
            let with_ext = PathBuf::from(format!("/app/src/api.client.{}", ext));
            assert!(paths_match(stem, &with_ext));
        }
        assert!(!paths_match(stem, Path::new("/app/src/api.ts")));
        assert!(!paths_match(Path::new("/app/src/api.client.ts"), Path::new("/app/src/api.ts")));
        assert_eq!(path_key(Path::new("/app/Button.stories.tsx")), path_key(Path::new("/app/Button.stories")));
    }

    #[test]
    fn test_resolve_target_probes_dotted_stem() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("api.ts"), "").unwrap();
        fs::write(dir.path().join("api.client.ts"), "").unwrap();
        let resolver = ModuleResolver::default();

        let target = resolver.resolve_target(Path::new("api.client"), dir.path());
        assert_eq!(target, dir.path().join("api.client.ts"));
    }

    #[test]
    fn test_is_relative() {
        assert!(is_relative("./a"));
        assert!(is_relative("../a"));
        assert!(is_relative(".."));
        assert!(!is_relative(".hidden"));
        assert!(!is_relative("a/b"));
    }
}
