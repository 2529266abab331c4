//! # Content Collection
//!
//! Walks every allowed directory and produces two things:
//!
//! - the ordered list of `(relative path, text)` pairs for eligible files
//! - a box-drawing rendering of the directory structure
//!
//! Paths are reported relative to the collector's base directory (the
//! process working directory in the CLI). Ignore patterns are glob
//! expressions over those relative paths; a pattern without a `/` also
//! matches against the entry's own name, so `build` prunes every `build`
//! directory wherever it sits. An ignored directory is never descended into.
//!
//! Collection is best-effort: unreadable files and missing directories are
//! recorded in [`Collection::problems`] and the walk carries on. File bytes
//! that are not valid UTF-8 are replaced rather than rejected.

use crate::error::{AssistError, Result};
use crate::model::Context;
use glob::Pattern;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE: &str = "│   ";
const SPACE: &str = "    ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedFile {
    pub path: String,
    pub content: String,
}

impl CollectedFile {
    /// The file content inside a markdown fence. This is the form that gets
    /// fingerprinted and placed in prompts.
    pub fn wrapped(&self) -> String {
        format!("```\n{}\n```", self.content)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collection {
    pub files: Vec<CollectedFile>,
    pub tree: String,
    pub problems: Vec<String>,
}

/// Checks that `pattern` is a usable glob before it is stored.
pub fn validate_pattern(pattern: &str) -> Result<()> {
    Pattern::new(pattern)
        .map(|_| ())
        .map_err(|e| AssistError::Pattern {
            pattern: pattern.to_string(),
            message: e.msg.to_string(),
        })
}

/// Compiled form of the context's ignore patterns.
pub struct IgnoreSet {
    patterns: Vec<(bool, Pattern)>,
}

impl IgnoreSet {
    pub fn compile<S: AsRef<str>>(patterns: &[S]) -> Self {
        let mut compiled = Vec::with_capacity(patterns.len());
        for raw in patterns {
            let raw = raw.as_ref();
            match Pattern::new(raw) {
                Ok(p) => compiled.push((!raw.contains('/'), p)),
                Err(e) => warn!("skipping invalid ignore pattern '{}': {}", raw, e),
            }
        }
        Self { patterns: compiled }
    }

    pub fn is_ignored(&self, rel: &Path) -> bool {
        let rel_str = rel.to_string_lossy();
        let name = rel.file_name().map(|n| n.to_string_lossy());
        self.patterns.iter().any(|(match_name, p)| {
            p.matches(&rel_str) || (*match_name && name.as_ref().is_some_and(|n| p.matches(n)))
        })
    }
}

/// Lower-cased extension with its leading dot; empty when there is none.
fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

pub struct ContentCollector {
    base: PathBuf,
}

impl ContentCollector {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn from_current_dir() -> Result<Self> {
        Ok(Self::new(std::env::current_dir()?))
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    fn absolute(&self, dir: &str) -> PathBuf {
        self.base.join(dir)
    }

    /// Path of `within` (relative to an allowed dir) as seen from the base.
    fn display_path(&self, dir: &str, within: &Path) -> PathBuf {
        let joined = Path::new(dir).join(within);
        let joined = if joined.is_absolute() {
            joined
                .strip_prefix(&self.base)
                .map(Path::to_path_buf)
                .unwrap_or(joined)
        } else {
            joined
        };
        let cleaned: PathBuf = joined
            .components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect();
        if cleaned.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            cleaned
        }
    }

    pub fn collect(&self, ctx: &Context) -> Collection {
        let ignores = IgnoreSet::compile(&ctx.ignored_patterns);
        let mut collection = Collection::default();

        for dir in &ctx.allowed_dirs {
            self.collect_dir(ctx, &ignores, dir, &mut collection);
        }
        collection.tree = self.render_tree(ctx, &ignores, &mut collection.problems);

        debug!(
            files = collection.files.len(),
            problems = collection.problems.len(),
            "collection finished"
        );
        collection
    }

    /// Only the directory rendering, without reading any file.
    pub fn tree(&self, ctx: &Context) -> (String, Vec<String>) {
        let ignores = IgnoreSet::compile(&ctx.ignored_patterns);
        let mut problems = Vec::new();
        let tree = self.render_tree(ctx, &ignores, &mut problems);
        (tree, problems)
    }

    fn collect_dir(&self, ctx: &Context, ignores: &IgnoreSet, dir: &str, out: &mut Collection) {
        let root = self.absolute(dir);
        let walker = WalkDir::new(&root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                let within = entry.path().strip_prefix(&root).unwrap_or(entry.path());
                !ignores.is_ignored(&self.display_path(dir, within))
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    // The tree rendering reports unreadable directories.
                    debug!("walk error under '{}': {}", dir, e);
                    continue;
                }
            };
            let path = entry.path();
            let file_type = entry.file_type();
            if !(file_type.is_file() || (file_type.is_symlink() && path.is_file())) {
                continue;
            }
            if !ctx.allows_extension(&extension_of(path)) {
                continue;
            }

            let within = path.strip_prefix(&root).unwrap_or(path);
            let rel = self.display_path(dir, within);
            match fs::read(path) {
                Ok(bytes) => out.files.push(CollectedFile {
                    path: rel.to_string_lossy().into_owned(),
                    content: String::from_utf8_lossy(&bytes).into_owned(),
                }),
                Err(e) => {
                    warn!("skipping unreadable file '{}': {}", rel.display(), e);
                    out.problems
                        .push(format!("Error reading file {}: {}", rel.display(), e));
                }
            }
        }
    }

    fn render_tree(&self, ctx: &Context, ignores: &IgnoreSet, problems: &mut Vec<String>) -> String {
        let mut lines = Vec::new();
        for dir in &ctx.allowed_dirs {
            lines.push(format!("Directory structure for {}:", dir));
            let name = Path::new(dir)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| dir.clone());
            lines.push(format!("{}/", name));
            if ignores.is_ignored(&self.display_path(dir, Path::new(""))) {
                continue;
            }
            self.render_level(dir, Path::new(""), "", ignores, &mut lines, problems);
        }
        lines.join("\n")
    }

    fn render_level(
        &self,
        dir: &str,
        within: &Path,
        prefix: &str,
        ignores: &IgnoreSet,
        lines: &mut Vec<String>,
        problems: &mut Vec<String>,
    ) {
        let abs = self.absolute(dir).join(within);
        let mut entries: Vec<_> = match fs::read_dir(&abs) {
            Ok(rd) => rd.filter_map(|e| e.ok()).collect(),
            Err(e) => {
                lines.push(format!("{}Error accessing directory: {}", prefix, e));
                problems.push(format!("Error accessing directory {}: {}", abs.display(), e));
                return;
            }
        };
        entries.sort_by_key(|e| e.file_name());

        let visible: Vec<_> = entries
            .into_iter()
            .filter(|e| !ignores.is_ignored(&self.display_path(dir, &within.join(e.file_name()))))
            .collect();

        let count = visible.len();
        for (i, entry) in visible.into_iter().enumerate() {
            let last = i + 1 == count;
            let connector = if last { LAST_BRANCH } else { BRANCH };
            let name = entry.file_name().to_string_lossy().into_owned();
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);

            if is_dir {
                lines.push(format!("{}{}{}/", prefix, connector, name));
                let child_prefix = format!("{}{}", prefix, if last { SPACE } else { PIPE });
                let child = within.join(entry.file_name());
                self.render_level(dir, &child, &child_prefix, ignores, lines, problems);
            } else {
                lines.push(format!("{}{}{}", prefix, connector, name));
            }
        }
    }
}
