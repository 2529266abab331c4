//! # Command Catalog and Resolution
//!
//! Interactive input is free-form text. Resolution turns one line into:
//!
//! 1. an [`ArgMap`]: every `-key` token with the value token that follows it
//!    (or an explicit "no value"), and
//! 2. the catalog [`Command`] whose name appears among those keys.
//!
//! ```text
//! "-dir+ /tmp/proj"  →  { "dir+": "/tmp/proj" }  →  Command(dir+)
//! "-dir+"            →  { "dir+": <none> }        →  Command(dir+), not usage-valid
//! "-foo"             →  { "foo": <none> }         →  unknown
//! ```
//!
//! The catalog is built once and shared read-only ([`CATALOG`]); resolution is
//! a pure function of catalog and line. The only side effect is the optional
//! append-only [`ResolutionLog`].

use chrono::Local;
use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Prefix that turns a token into a key.
pub const MARKER: char = '-';

const LOG_HEADER: &str = "Time | Valid/Invalid | Command(if Valid) | InputParameters";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Help,
    Name,
    AddDir,
    RemoveDir,
    AddIgnore,
    RemoveIgnore,
    AddUrl,
    RemoveUrl,
    AddExtension,
    RemoveExtension,
    Status,
    PrintDir,
    Print,
    PromptFirst,
    PromptFirstCopy,
    Prompt,
    PromptCopy,
    Update,
    Save,
    Load,
}

#[derive(Debug, Clone)]
pub struct Command {
    pub kind: CommandKind,
    /// Marker-prefixed name as the user sees it, e.g. `-dir+`.
    pub name: &'static str,
    /// Placeholder for the value the command takes; empty when it takes none.
    pub inputs: &'static str,
    pub required: Vec<&'static str>,
    pub optional: Vec<&'static str>,
    pub help: &'static str,
}

impl Command {
    fn new(kind: CommandKind, name: &'static str, help: &'static str) -> Self {
        Self {
            kind,
            name,
            inputs: "",
            required: Vec::new(),
            optional: Vec::new(),
            help,
        }
    }

    fn with_inputs(mut self, inputs: &'static str) -> Self {
        self.inputs = inputs;
        self
    }

    pub fn key(&self) -> String {
        bare_key(self.name)
    }

    pub fn takes_input(&self) -> bool {
        !self.inputs.is_empty()
    }

    /// One help entry, e.g. ` -dir+ [Directory] : Adds directory to watch-list`.
    pub fn usage(&self) -> String {
        let mut out = format!(" {} ", self.name);
        if self.takes_input() {
            out.push_str(&format!("[{}] ", self.inputs));
        }
        out.push_str(": ");
        out.push_str(self.help);
        if !self.required.is_empty() {
            out.push_str(&format!("\n\t[Require: {}]", self.required.join(", ")));
        }
        if !self.optional.is_empty() {
            out.push_str(&format!("\n\t[Optional: {}]", self.optional.join(", ")));
        }
        out
    }
}

fn bare_key(token: &str) -> String {
    token.trim_start_matches(MARKER).to_lowercase()
}

/// The fixed, ordered set of commands.
pub struct Catalog {
    commands: Vec<Command>,
}

pub static CATALOG: Lazy<Catalog> = Lazy::new(Catalog::standard);

impl Catalog {
    pub fn new(commands: Vec<Command>) -> Self {
        Self { commands }
    }

    pub fn standard() -> Self {
        use CommandKind::*;
        Self::new(vec![
            Command::new(Help, "-help", "Prints help section"),
            Command::new(Name, "-name", "Sets the project name"),
            Command::new(AddDir, "-dir+", "Adds directory to watch-list").with_inputs("Directory"),
            Command::new(RemoveDir, "-dir-", "Removes this directory from watch-list")
                .with_inputs("Directory"),
            Command::new(AddIgnore, "-ignore+", "Adds directory or pattern to ignore-list")
                .with_inputs("Directory/Pattern"),
            Command::new(RemoveIgnore, "-ignore-", "Removes directory or pattern from ignore-list")
                .with_inputs("Directory/Pattern"),
            Command::new(AddUrl, "-url+", "Adds given url to watch-list").with_inputs("Url"),
            Command::new(RemoveUrl, "-url-", "Removes given url from watch-list").with_inputs("Url"),
            Command::new(AddExtension, "-extension+", "Adds given extension to allowed-list")
                .with_inputs("Extension"),
            Command::new(RemoveExtension, "-extension-", "Removes given extension from allowed-list")
                .with_inputs("Extension"),
            Command::new(Status, "-status", "Prints current status"),
            Command::new(PrintDir, "-printdir", "Prints directory structure"),
            Command::new(Print, "-print", "Prints directory structure and contents of all the files"),
            Command::new(PromptFirst, "-prompt-first", "Prints the first prompt"),
            Command::new(PromptFirstCopy, "-prompt-first-copy", "Copies the first prompt to clipboard"),
            Command::new(Prompt, "-prompt", "Prints the updated prompt"),
            Command::new(PromptCopy, "-prompt-copy", "Copies the updated prompt to clipboard"),
            Command::new(Update, "-update", "Records the current content as seen"),
            Command::new(Save, "-save", "Saves the context"),
            Command::new(Load, "-load", "Loads the context"),
        ])
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn get(&self, key: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.key() == key)
    }

    /// The full help listing framed by `header`.
    pub fn help(&self, header: &str) -> String {
        let rule = format!("---------------------- {} ------------------------", header);
        let mut out = vec![rule.clone()];
        out.extend(self.commands.iter().map(Command::usage));
        out.push(rule);
        out.join("\n")
    }

    /// A command is usage-valid when every catalog key present that takes an
    /// input actually carries a value. Keys unknown to the catalog are ignored.
    pub fn is_parameters_valid(&self, args: &ArgMap) -> bool {
        args.iter().all(|(key, value)| {
            value.is_some() || self.get(key).map_or(true, |c| !c.takes_input())
        })
    }

    fn validate<'a>(&'a self, args: &ArgMap) -> Result<&'a Command, ResolveError> {
        let cmd = self
            .commands
            .iter()
            .find(|c| args.contains(&c.key()))
            .ok_or(ResolveError::Unknown)?;

        let missing: Vec<String> = cmd
            .required
            .iter()
            .filter(|req| args.value(&bare_key(req)).is_none())
            .map(|req| req.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ResolveError::Incomplete {
                command: cmd.name.to_string(),
                missing,
            });
        }
        Ok(cmd)
    }
}

/// Parsed `key → value` pairs of one input line. A key present with `None`
/// was given without a value, which is different from the key being absent.
///
/// The mapping keeps the last value token after each key; every token is
/// still available through [`ArgMap::joined`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgMap {
    map: BTreeMap<String, Option<String>>,
    spans: BTreeMap<String, Vec<String>>,
}

impl ArgMap {
    pub fn parse(line: &str) -> Result<Self, ResolveError> {
        let tokens = shell_words::split(line).map_err(|e| ResolveError::Parse(e.to_string()))?;
        let mut args = ArgMap::default();
        let mut key: Option<String> = None;
        for token in tokens {
            if token.starts_with(MARKER) {
                let k = bare_key(&token);
                args.map.insert(k.clone(), None);
                args.spans.insert(k.clone(), Vec::new());
                key = Some(k);
            } else if let Some(k) = &key {
                args.spans.entry(k.clone()).or_default().push(token.clone());
                args.map.insert(k.clone(), Some(token));
            }
        }
        Ok(args)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// The value given for `key`, if the key is present and has one.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.map.get(key).and_then(|v| v.as_deref())
    }

    /// All value tokens after `key`, joined by single spaces.
    pub fn joined(&self, key: &str) -> Option<String> {
        self.spans
            .get(key)
            .filter(|tokens| !tokens.is_empty())
            .map(|tokens| tokens.join(" "))
    }

    pub fn get(&self, key: &str) -> Option<&Option<String>> {
        self.map.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Option<String>)> {
        self.map.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Option<String>)> for ArgMap {
    fn from_iter<T: IntoIterator<Item = (K, Option<String>)>>(iter: T) -> Self {
        let mut args = ArgMap::default();
        for (k, v) in iter {
            let k = k.into();
            args.spans.insert(k.clone(), v.iter().cloned().collect());
            args.map.insert(k, v);
        }
        args
    }
}

impl fmt::Display for ArgMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (k, v)) in self.map.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match v {
                Some(v) => write!(f, "{:?}: {:?}", k, v)?,
                None => write!(f, "{:?}: None", k)?,
            }
        }
        f.write_str("}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The line could not be tokenized (e.g. an unbalanced quote).
    Parse(String),
    Unknown,
    Incomplete {
        command: String,
        missing: Vec<String>,
    },
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::Parse(msg) => write!(f, "Could not parse input: {}", msg),
            ResolveError::Unknown => write!(f, "Unknown command. Enter help for help."),
            ResolveError::Incomplete { command, missing } => write!(
                f,
                "Incomplete command '{}' (missing {}). Enter help for help.",
                command,
                missing.join(", ")
            ),
        }
    }
}

/// Result of resolving one line.
#[derive(Debug, Clone)]
pub struct Resolution<'a> {
    pub args: ArgMap,
    pub outcome: Result<&'a Command, ResolveError>,
}

impl<'a> Resolution<'a> {
    pub fn command(&self) -> Option<&'a Command> {
        self.outcome.as_ref().ok().copied()
    }

    pub fn is_valid(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Append-only record of every resolution attempt.
pub struct ResolutionLog {
    path: PathBuf,
}

impl ResolutionLog {
    /// Starts a fresh log at `path`, truncating anything already there.
    pub fn create(path: impl Into<PathBuf>) -> std::io::Result<Self> {
        let path = path.into();
        let mut file = File::create(&path)?;
        writeln!(file, "{}", LOG_HEADER)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn record(&self, resolution: &Resolution<'_>) -> std::io::Result<()> {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let line = match resolution.command() {
            Some(cmd) => format!("{} -> Valid | {} | {}", timestamp, cmd.key(), resolution.args),
            None => format!("{} -> Invalid | {}", timestamp, resolution.args),
        };
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        writeln!(file, "{}", line)
    }
}

/// Resolves input lines against a catalog, optionally logging each attempt.
pub struct CommandResolver<'a> {
    catalog: &'a Catalog,
    log: Option<ResolutionLog>,
}

impl<'a> CommandResolver<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog, log: None }
    }

    pub fn with_log(mut self, log: ResolutionLog) -> Self {
        self.log = Some(log);
        self
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    pub fn resolve(&self, line: &str) -> Resolution<'a> {
        let resolution = match ArgMap::parse(line) {
            Ok(args) => {
                let outcome = self.catalog.validate(&args);
                Resolution { args, outcome }
            }
            Err(e) => Resolution {
                args: ArgMap::default(),
                outcome: Err(e),
            },
        };

        if let Some(log) = &self.log {
            if let Err(e) = log.record(&resolution) {
                warn!("could not append to {}: {}", log.path().display(), e);
            }
        }
        resolution
    }
}
