use crate::fingerprint::Digest;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};

/// Extension entries that make every file eligible.
pub const WILDCARD_EXTENSIONS: [&str; 2] = ["*", ".*"];

/// Patterns installed at startup unless the user opts out.
pub const DEFAULT_IGNORES: [&str; 11] = [
    "*venu*", "*venv*", "*.git*", "*.idea*", "*.jpg", "*.bmp", "*.png", "*.jpeg", "*.pdf",
    "*LICENSE", "*.zip",
];

/// The watch configuration plus the record of content already delivered.
///
/// Field names on disk follow the established save-file layout (`dir`,
/// `dir_ignore`, `url`, `hashes`, `allowed_extensions`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    #[serde(rename = "url", default)]
    pub urls: Vec<String>,

    #[serde(rename = "dir", default)]
    pub allowed_dirs: Vec<String>,

    #[serde(rename = "dir_ignore", default)]
    pub ignored_patterns: Vec<String>,

    #[serde(
        rename = "hashes",
        default,
        serialize_with = "serialize_seen",
        deserialize_with = "deserialize_keys"
    )]
    pub seen_digests: BTreeSet<Digest>,

    #[serde(
        default = "default_extensions",
        serialize_with = "serialize_extensions",
        deserialize_with = "deserialize_extensions"
    )]
    pub allowed_extensions: BTreeSet<String>,
}

fn default_extensions() -> BTreeSet<String> {
    BTreeSet::from(["*".to_string()])
}

fn serialize_seen<S: Serializer>(set: &BTreeSet<Digest>, s: S) -> Result<S::Ok, S::Error> {
    s.collect_map(set.iter().map(|d| (d, 1u32)))
}

fn serialize_extensions<S: Serializer>(set: &BTreeSet<String>, s: S) -> Result<S::Ok, S::Error> {
    s.collect_map(set.iter().map(|e| (e, 0u32)))
}

fn deserialize_keys<'de, D, T>(d: D) -> Result<BTreeSet<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Ord,
{
    let map = BTreeMap::<T, IgnoredAny>::deserialize(d)?;
    Ok(map.into_keys().collect())
}

/// Older save files may hold extensions without the leading dot.
fn deserialize_extensions<'de, D: Deserializer<'de>>(d: D) -> Result<BTreeSet<String>, D::Error> {
    let keys: BTreeSet<String> = deserialize_keys(d)?;
    Ok(keys.iter().map(|e| normalize_extension(e)).collect())
}

impl Default for Context {
    fn default() -> Self {
        Self {
            urls: Vec::new(),
            allowed_dirs: Vec::new(),
            ignored_patterns: Vec::new(),
            seen_digests: BTreeSet::new(),
            allowed_extensions: default_extensions(),
        }
    }
}

fn insert_unique(items: &mut Vec<String>, item: &str) -> bool {
    if items.iter().any(|i| i == item) {
        return false;
    }
    items.push(item.to_string());
    true
}

fn remove_item(items: &mut Vec<String>, item: &str) -> bool {
    let before = items.len();
    items.retain(|i| i != item);
    items.len() != before
}

/// Normalizes user input into the stored extension form: lower-case with a
/// leading dot. Wildcard sentinels are kept verbatim.
pub fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim().to_lowercase();
    if WILDCARD_EXTENSIONS.contains(&ext.as_str()) || ext.starts_with('.') {
        ext
    } else {
        format!(".{}", ext)
    }
}

impl Context {
    /// A context seeded with the given ignore patterns and extensions.
    pub fn seeded<I, E>(ignores: I, extensions: E) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        let mut ctx = Context {
            allowed_extensions: BTreeSet::new(),
            ..Context::default()
        };
        for pattern in ignores {
            ctx.add_ignore(pattern.as_ref());
        }
        for ext in extensions {
            ctx.add_extension(ext.as_ref());
        }
        ctx
    }

    pub fn add_dir(&mut self, path: &str) -> bool {
        insert_unique(&mut self.allowed_dirs, path)
    }

    pub fn remove_dir(&mut self, path: &str) -> bool {
        remove_item(&mut self.allowed_dirs, path)
    }

    pub fn add_ignore(&mut self, pattern: &str) -> bool {
        insert_unique(&mut self.ignored_patterns, pattern)
    }

    pub fn remove_ignore(&mut self, pattern: &str) -> bool {
        remove_item(&mut self.ignored_patterns, pattern)
    }

    pub fn add_url(&mut self, url: &str) -> bool {
        insert_unique(&mut self.urls, url)
    }

    pub fn remove_url(&mut self, url: &str) -> bool {
        remove_item(&mut self.urls, url)
    }

    pub fn add_extension(&mut self, ext: &str) -> bool {
        self.allowed_extensions.insert(normalize_extension(ext))
    }

    pub fn remove_extension(&mut self, ext: &str) -> bool {
        self.allowed_extensions.remove(&normalize_extension(ext))
    }

    pub fn has_wildcard(&self) -> bool {
        WILDCARD_EXTENSIONS
            .iter()
            .any(|w| self.allowed_extensions.contains(*w))
    }

    /// `ext` is the lower-cased extension including its leading dot, or the
    /// empty string for files without one.
    pub fn allows_extension(&self, ext: &str) -> bool {
        self.has_wildcard() || (!ext.is_empty() && self.allowed_extensions.contains(ext))
    }

    /// Unions `digests` into the seen-set, returning how many were new.
    pub fn mark_all_seen<I: IntoIterator<Item = Digest>>(&mut self, digests: I) -> usize {
        digests
            .into_iter()
            .filter(|d| self.seen_digests.insert(d.clone()))
            .count()
    }
}

/// The full session state: what `save` writes and `load` restores.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectState {
    #[serde(default)]
    pub project_name: String,
    #[serde(default)]
    pub context: Context,
}

impl ProjectState {
    pub fn new(context: Context) -> Self {
        Self {
            project_name: String::new(),
            context,
        }
    }

    pub fn set_project_name(&mut self, name: &str) {
        self.project_name = name.to_string();
    }

    pub fn snapshot(&self) -> ProjectState {
        self.clone()
    }

    pub fn restore(&mut self, state: ProjectState) {
        *self = state;
    }
}
