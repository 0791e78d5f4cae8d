//! flag
//!
//! Named sets of command-line flags with single-dash parsing.
//!
//! # Syntax
//!
//! Flags are recognized only while they appear contiguously at the start of
//! the argument list:
//!
//! - `-name` / `--name` (boolean flags only)
//! - `-name=value` / `--name=value`
//! - `-name value` (non-boolean flags)
//!
//! The first argument that is not a flag ends parsing; `--` ends parsing and
//! is consumed. A lone `-` is a positional argument. `-h` and `-help` request
//! help unless the set defines flags with those names.
//!
//! # Example
//!
//! ```
//! use subcmd::flag::FlagSet;
//!
//! let mut fset = FlagSet::new("run");
//! let background = fset.bool("background", false, "runs the daemon in background");
//! let port = fset.int("port", 10000, "TCP port number for the daemon");
//!
//! let rest = fset.parse(["-background", "-port=8080", "extra"]).unwrap();
//! assert!(background.get());
//! assert_eq!(port.get(), 8080);
//! assert_eq!(rest, vec!["extra".to_string()]);
//! ```

pub mod duration;
pub mod value;

pub use value::{Flag, FlagValue};

use std::collections::VecDeque;
use std::fmt::Write as _;
use std::io;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use value::{FuncSlot, Slot, TypedSlot};

/// Errors from defining or parsing flags.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlagError {
    /// `-h` or `-help` was given and the set does not define it.
    #[error("flag: help requested")]
    Help,

    #[error("bad flag syntax: {0}")]
    BadSyntax(String),

    #[error("flag provided but not defined: -{0}")]
    Undefined(String),

    #[error("flag needs an argument: -{0}")]
    MissingValue(String),

    #[error("invalid boolean value {value:?} for -{name}: {reason}")]
    InvalidBool {
        name: String,
        value: String,
        reason: String,
    },

    #[error("invalid value {value:?} for flag -{name}: {reason}")]
    InvalidValue {
        name: String,
        value: String,
        reason: String,
    },

    #[error("{set} flag redefined: {name}")]
    Redefined { set: String, name: String },

    #[error("flag {0:?} begins with - or contains =")]
    InvalidName(String),

    #[error("flag set {0:?} has already been parsed")]
    AlreadyParsed(String),
}

impl FlagError {
    /// Check if this is a request for help rather than a failure.
    pub fn is_help(&self) -> bool {
        matches!(self, FlagError::Help)
    }
}

/// Description of a defined flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlagInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub default: String,
    pub usage: String,
    #[serde(skip)]
    pub is_bool: bool,
    #[serde(skip)]
    default_is_zero: bool,
    #[serde(skip)]
    quoted: bool,
}

impl FlagInfo {
    /// Split the usage text into a value placeholder and the displayed usage.
    ///
    /// The first back-quoted word in the usage becomes the placeholder and
    /// loses its quotes; otherwise the placeholder is the type name.
    pub fn placeholder_and_usage(&self) -> (String, String) {
        if let Some(start) = self.usage.find('`') {
            if let Some(len) = self.usage[start + 1..].find('`') {
                let end = start + 1 + len;
                let name = self.usage[start + 1..end].to_string();
                let usage = format!(
                    "{}{}{}",
                    &self.usage[..start],
                    name,
                    &self.usage[end + 1..]
                );
                return (name, usage);
            }
        }
        (self.type_name.clone(), self.usage.clone())
    }

    fn render(&self, out: &mut String) {
        let mut line = format!("  -{}", self.name);
        let (placeholder, usage) = self.placeholder_and_usage();
        if !placeholder.is_empty() {
            line.push(' ');
            line.push_str(&placeholder);
        }
        // Short untyped flags fit the usage on the same line.
        if line.len() <= 4 {
            line.push('\t');
        } else {
            line.push_str("\n    \t");
        }
        line.push_str(&usage.replace('\n', "\n    \t"));
        if !self.default_is_zero {
            if self.quoted {
                let _ = write!(line, " (default {:?})", self.default);
            } else {
                let _ = write!(line, " (default {})", self.default);
            }
        }
        out.push_str(&line);
        out.push('\n');
    }
}

/// Render flag descriptions in the order given, one entry per flag.
pub fn render_defaults<'a>(flags: impl IntoIterator<Item = &'a FlagInfo>) -> String {
    let mut out = String::new();
    for info in flags {
        info.render(&mut out);
    }
    out
}

struct FlagDef {
    info: FlagInfo,
    slot: Box<dyn Slot>,
}

/// A named, ordered set of flag definitions.
///
/// A set parses a single argument list; create a fresh set for every parse.
pub struct FlagSet {
    name: String,
    defs: Vec<FlagDef>,
    actual: Vec<usize>,
    definition_error: Option<FlagError>,
    parsed: bool,
}

impl FlagSet {
    /// Create an empty set. The name identifies the command the flags belong to.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            defs: Vec::new(),
            actual: Vec::new(),
            definition_error: None,
            parsed: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check if no flags are defined.
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Check if [`FlagSet::parse`] has been called.
    pub fn parsed(&self) -> bool {
        self.parsed
    }

    /// Define a flag bound to an existing handle. The handle is reset to `default`.
    pub fn var<T: FlagValue>(&mut self, target: &Flag<T>, name: &str, default: T, usage: &str) {
        let info = FlagInfo {
            name: name.to_string(),
            type_name: T::TYPE_NAME.to_string(),
            default: default.format_value(),
            usage: usage.to_string(),
            is_bool: T::IS_BOOL,
            default_is_zero: default.is_zero(),
            quoted: T::QUOTED,
        };
        target.set(default);
        self.insert(info, Box::new(TypedSlot(target.clone())));
    }

    /// Define a flag with fresh storage and return its handle.
    pub fn define<T: FlagValue>(&mut self, name: &str, default: T, usage: &str) -> Flag<T> {
        let flag = Flag::new(default.clone());
        self.var(&flag, name, default, usage);
        flag
    }

    pub fn bool(&mut self, name: &str, default: bool, usage: &str) -> Flag<bool> {
        self.define(name, default, usage)
    }

    pub fn string(&mut self, name: &str, default: &str, usage: &str) -> Flag<String> {
        self.define(name, default.to_string(), usage)
    }

    pub fn int(&mut self, name: &str, default: i64, usage: &str) -> Flag<i64> {
        self.define(name, default, usage)
    }

    pub fn uint(&mut self, name: &str, default: u64, usage: &str) -> Flag<u64> {
        self.define(name, default, usage)
    }

    pub fn float(&mut self, name: &str, default: f64, usage: &str) -> Flag<f64> {
        self.define(name, default, usage)
    }

    pub fn duration(&mut self, name: &str, default: Duration, usage: &str) -> Flag<Duration> {
        self.define(name, default, usage)
    }

    /// Define a flag that calls `apply` with the raw value each time it appears.
    pub fn func<F>(&mut self, name: &str, usage: &str, apply: F)
    where
        F: FnMut(&str) -> Result<(), String> + Send + 'static,
    {
        let info = FlagInfo {
            name: name.to_string(),
            type_name: "value".to_string(),
            default: String::new(),
            usage: usage.to_string(),
            is_bool: false,
            default_is_zero: true,
            quoted: false,
        };
        self.insert(info, Box::new(FuncSlot(apply)));
    }

    fn insert(&mut self, info: FlagInfo, slot: Box<dyn Slot>) {
        if self.definition_error.is_some() {
            return;
        }
        if info.name.is_empty() || info.name.starts_with('-') || info.name.contains('=') {
            self.definition_error = Some(FlagError::InvalidName(info.name));
            return;
        }
        if self.position(&info.name).is_some() {
            self.definition_error = Some(FlagError::Redefined {
                set: self.name.clone(),
                name: info.name,
            });
            return;
        }
        self.defs.push(FlagDef { info, slot });
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.defs.iter().position(|def| def.info.name == name)
    }

    /// Look up a flag definition by name.
    pub fn lookup(&self, name: &str) -> Option<&FlagInfo> {
        self.position(name).map(|i| &self.defs[i].info)
    }

    /// All flag definitions in declaration order.
    pub fn flags(&self) -> impl Iterator<Item = &FlagInfo> {
        self.defs.iter().map(|def| &def.info)
    }

    /// Flags that were set by parsing or [`FlagSet::set`], in the order first set.
    pub fn visit_set(&self) -> impl Iterator<Item = &FlagInfo> {
        self.actual.iter().map(|&i| &self.defs[i].info)
    }

    /// Check if a flag was set by parsing or [`FlagSet::set`].
    pub fn is_set(&self, name: &str) -> bool {
        self.visit_set().any(|info| info.name == name)
    }

    /// Set a flag's value by name.
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), FlagError> {
        let index = self
            .position(name)
            .ok_or_else(|| FlagError::Undefined(name.to_string()))?;
        self.assign(index, value)
    }

    fn assign(&mut self, index: usize, value: &str) -> Result<(), FlagError> {
        let def = &mut self.defs[index];
        def.slot.set(value).map_err(|reason| {
            if def.info.is_bool {
                FlagError::InvalidBool {
                    name: def.info.name.clone(),
                    value: value.to_string(),
                    reason,
                }
            } else {
                FlagError::InvalidValue {
                    name: def.info.name.clone(),
                    value: value.to_string(),
                    reason,
                }
            }
        })?;
        if !self.actual.contains(&index) {
            self.actual.push(index);
        }
        Ok(())
    }

    /// Parse flags from the start of `args` and return the remaining arguments.
    pub fn parse<I, S>(&mut self, args: I) -> Result<Vec<String>, FlagError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.parsed {
            return Err(FlagError::AlreadyParsed(self.name.clone()));
        }
        self.parsed = true;
        if let Some(err) = self.definition_error.take() {
            return Err(err);
        }

        let mut args: VecDeque<String> = args.into_iter().map(Into::into).collect();
        while self.parse_one(&mut args)? {}

        tracing::trace!(
            flag_set = %self.name,
            set = ?self.visit_set().map(|info| info.name.as_str()).collect::<Vec<_>>(),
            remaining = args.len(),
            "parsed flags"
        );
        Ok(args.into())
    }

    /// Consume one flag from the front of `args`. Returns false when parsing is done.
    fn parse_one(&mut self, args: &mut VecDeque<String>) -> Result<bool, FlagError> {
        let arg = match args.front() {
            Some(arg) => arg.clone(),
            None => return Ok(false),
        };
        if arg.len() < 2 || !arg.starts_with('-') {
            return Ok(false);
        }

        let mut dashes = 1;
        if arg.as_bytes()[1] == b'-' {
            dashes += 1;
            if arg.len() == 2 {
                args.pop_front();
                return Ok(false);
            }
        }
        let body = &arg[dashes..];
        if body.starts_with('-') || body.starts_with('=') {
            return Err(FlagError::BadSyntax(arg.clone()));
        }
        args.pop_front();

        let (name, inline_value) = match body.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (body, None),
        };

        let Some(index) = self.position(name) else {
            if name == "help" || name == "h" {
                return Err(FlagError::Help);
            }
            return Err(FlagError::Undefined(name.to_string()));
        };

        if self.defs[index].info.is_bool {
            self.assign(index, inline_value.unwrap_or("true"))?;
        } else {
            let value = match inline_value {
                Some(value) => value.to_string(),
                None => args
                    .pop_front()
                    .ok_or_else(|| FlagError::MissingValue(name.to_string()))?,
            };
            self.assign(index, &value)?;
        }
        Ok(true)
    }

    /// Usage text for every flag in declaration order.
    pub fn defaults(&self) -> String {
        render_defaults(self.flags())
    }

    /// Write [`FlagSet::defaults`] to `w`.
    pub fn write_defaults(&self, w: &mut impl io::Write) -> io::Result<()> {
        w.write_all(self.defaults().as_bytes())
    }
}

impl std::fmt::Debug for FlagSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlagSet")
            .field("name", &self.name)
            .field("flags", &self.flags().collect::<Vec<_>>())
            .field("parsed", &self.parsed)
            .finish()
    }
}
