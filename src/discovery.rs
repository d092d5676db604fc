//! Case file discovery and loading.
//!
//! Cases can live in YAML (`.yaml`, `.yml`) or JSON (`.json`) files, each holding a
//! sequence of entries:
//!
//! ```yaml
//! - name: "upper-cases ascii"
//!   input: "a"
//!   want: "A"
//! - name: "rejects empty input"
//!   input: ""
//!   error: "empty"          # expected error substring
//! ```
//!
//! Missing `receiver`, `input` and `want` default to nil, a missing `error` to "no error
//! expected". Entry names must be non-empty and unique within a file.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use miette::Diagnostic;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

use crate::case::{Case, Cases};
use crate::value::Value;

/// File extensions recognised as case files.
pub const CASE_FILE_EXTENSIONS: &[&str] = &["yaml", "yml", "json"];

/// Errors raised while loading a case file.
#[derive(Debug, Error, Diagnostic)]
pub enum LoadError {
    #[error("failed to read {}", .path.display())]
    #[diagnostic(code(casebook::load::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse YAML in {}", .path.display())]
    #[diagnostic(
        code(casebook::load::yaml),
        help("a case file is a sequence of entries with `name`, `input`, `want` and `error` keys")
    )]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to parse JSON in {}", .path.display())]
    #[diagnostic(
        code(casebook::load::json),
        help("a case file is an array of objects with `name`, `input`, `want` and `error` keys")
    )]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{} is not a case file", .path.display())]
    #[diagnostic(
        code(casebook::load::extension),
        help("case files end in .yaml, .yml or .json")
    )]
    UnsupportedExtension { path: PathBuf },

    #[error("entry #{index} in {} has an empty name", .path.display())]
    #[diagnostic(code(casebook::load::empty_name))]
    EmptyName { path: PathBuf, index: usize },

    #[error("case name {name:?} appears more than once in {}", .path.display())]
    #[diagnostic(
        code(casebook::load::duplicate_name),
        help("case names must be unique within a file")
    )]
    DuplicateName { path: PathBuf, name: String },
}

/// One entry as written in a case file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CaseEntry {
    name: String,
    #[serde(default)]
    receiver: Value,
    #[serde(default)]
    input: Value,
    #[serde(default)]
    want: Value,
    #[serde(default)]
    error: String,
}

impl CaseEntry {
    fn into_named(self) -> (String, Case) {
        let case = Case {
            receiver: self.receiver,
            input: self.input,
            want: self.want,
            error: self.error,
        };
        (self.name, case)
    }
}

/// The cases loaded from one file, in file order.
#[derive(Debug, Clone)]
pub struct CaseFile {
    pub path: PathBuf,
    pub entries: Vec<(String, Case)>,
}

impl CaseFile {
    /// The entries as an unordered named collection.
    pub fn cases(&self) -> Cases {
        self.entries.iter().cloned().collect()
    }

    /// `(name, case)` pairs in file order, ready for [`crate::run_ordered`].
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Case)> {
        self.entries.iter().map(|(name, case)| (name.as_str(), case))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// True if `path` has a case file extension.
pub fn is_case_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| CASE_FILE_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

/// Discovers all case files recursively under `root`, sorted by path.
///
/// A `root` that is itself a case file yields just that file.
pub fn discover_case_files<P: AsRef<Path>>(root: P) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_case_file(e.path()))
        .map(|e| e.path().to_path_buf())
        .collect();
    files.sort();
    files
}

/// Loads and validates the cases in `path`.
pub fn load_case_file(path: &Path) -> Result<CaseFile, LoadError> {
    if !is_case_file(path) {
        return Err(LoadError::UnsupportedExtension {
            path: path.to_path_buf(),
        });
    }
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let entries = parse_entries(path, &content)?;
    let entries = validate(path, entries)?;
    debug!(path = %path.display(), cases = entries.len(), "loaded case file");
    Ok(CaseFile {
        path: path.to_path_buf(),
        entries,
    })
}

/// Loads every case file under `root`, keeping per-file results.
///
/// A `root` that is a file is loaded as a case file whatever its extension, so a
/// file that is not one yields [`LoadError::UnsupportedExtension`].
pub fn load_all<P: AsRef<Path>>(root: P) -> Vec<(PathBuf, Result<CaseFile, LoadError>)> {
    let root = root.as_ref();
    if root.is_file() {
        return vec![(root.to_path_buf(), load_case_file(root))];
    }
    discover_case_files(root)
        .into_iter()
        .map(|path| {
            let loaded = load_case_file(&path);
            (path, loaded)
        })
        .collect()
}

// =============================================================================
// PRIVATE HELPERS
// =============================================================================

fn parse_entries(path: &Path, content: &str) -> Result<Vec<CaseEntry>, LoadError> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => {
            // An empty YAML document holds no cases.
            if content.trim().is_empty() {
                return Ok(Vec::new());
            }
            serde_yaml::from_str(content).map_err(|source| LoadError::Yaml {
                path: path.to_path_buf(),
                source,
            })
        }
        Some("json") => serde_json::from_str(content).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        }),
        _ => Err(LoadError::UnsupportedExtension {
            path: path.to_path_buf(),
        }),
    }
}

fn validate(path: &Path, entries: Vec<CaseEntry>) -> Result<Vec<(String, Case)>, LoadError> {
    let mut seen = HashSet::new();
    let mut named = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        if entry.name.trim().is_empty() {
            return Err(LoadError::EmptyName {
                path: path.to_path_buf(),
                index,
            });
        }
        if !seen.insert(entry.name.clone()) {
            return Err(LoadError::DuplicateName {
                path: path.to_path_buf(),
                name: entry.name,
            });
        }
        named.push(entry.into_named());
    }
    Ok(named)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_entries_keep_file_order() {
        let entries = parse_entries(
            Path::new("cases.yaml"),
            "- name: b\n  input: 1\n  want: 1\n- name: a\n  input: x\n  error: Boom\n",
        )
        .unwrap();
        let named = validate(Path::new("cases.yaml"), entries).unwrap();
        assert_eq!(named[0].0, "b");
        assert_eq!(named[0].1.want, Value::Int(1));
        assert_eq!(named[1].0, "a");
        assert_eq!(named[1].1.error, "Boom");
    }

    #[test]
    fn json_entries_parse() {
        let entries = parse_entries(
            Path::new("cases.json"),
            r#"[{"name": "n", "input": [], "want": null}]"#,
        )
        .unwrap();
        let named = validate(Path::new("cases.json"), entries).unwrap();
        assert_eq!(named[0].1.input.seq_len(), Some(0));
        assert!(named[0].1.want.is_nil());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let entries = parse_entries(Path::new("d.yml"), "- name: x\n- name: x\n").unwrap();
        let err = validate(Path::new("d.yml"), entries).unwrap_err();
        assert!(matches!(err, LoadError::DuplicateName { ref name, .. } if name == "x"));
    }

    #[test]
    fn blank_names_are_rejected() {
        let entries = parse_entries(Path::new("e.yml"), "- name: ok\n- name: '  '\n").unwrap();
        let err = validate(Path::new("e.yml"), entries).unwrap_err();
        assert!(matches!(err, LoadError::EmptyName { index: 1, .. }));
    }

    #[test]
    fn unknown_keys_are_a_parse_error() {
        let err = parse_entries(Path::new("u.yaml"), "- name: x\n  wnat: 1\n").unwrap_err();
        assert!(matches!(err, LoadError::Yaml { .. }));
    }

    #[test]
    fn other_extensions_are_unsupported() {
        assert!(!is_case_file(Path::new("notes.txt")));
        assert!(is_case_file(Path::new("a/b.yml")));
        let err = parse_entries(Path::new("notes.txt"), "").unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedExtension { .. }));
    }

    #[test]
    fn empty_yaml_file_has_no_cases() {
        assert!(parse_entries(Path::new("empty.yaml"), "\n").unwrap().is_empty());
    }
}
