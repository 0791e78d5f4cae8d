//! resolver::describe
//!
//! Snapshots of tree levels and the help text rendered from them.

use std::sync::Arc;

use serde::Serialize;

use super::builtins::Builtin;
use crate::command::{synopsis_of, Action, Command};
use crate::error::Error;
use crate::flag::{render_defaults, FlagInfo, FlagSet};

/// What a listed child is backed by.
#[derive(Clone)]
pub(crate) enum Target {
    User {
        command: Arc<dyn Command>,
        flags: Vec<FlagInfo>,
    },
    Builtin(Builtin),
}

/// A child as shown in listings.
#[derive(Clone)]
pub(crate) struct Entry {
    pub(crate) name: String,
    pub(crate) synopsis: Option<String>,
    pub(crate) target: Target,
}

#[derive(Serialize)]
pub(crate) struct CommandSummary<'a> {
    name: &'a str,
    synopsis: Option<&'a str>,
}

impl Entry {
    pub(crate) fn summary(&self) -> CommandSummary<'_> {
        CommandSummary {
            name: &self.name,
            synopsis: self.synopsis.as_deref(),
        }
    }
}

/// Everything needed to describe one node without calling into it again.
#[derive(Clone)]
pub(crate) struct Level {
    pub(crate) path: String,
    pub(crate) synopsis: Option<String>,
    pub(crate) help: Option<String>,
    pub(crate) flags: Vec<FlagInfo>,
    /// `None` for leaves.
    pub(crate) children: Option<Vec<Entry>>,
}

/// A child whose flags and action have been declared for this run.
pub(crate) struct Declared {
    pub(crate) command: Arc<dyn Command>,
    pub(crate) flags: FlagSet,
    pub(crate) action: Action,
}

impl Declared {
    /// Call `command()` on a child of `parent`.
    pub(crate) fn new(command: Arc<dyn Command>, parent: &str) -> Result<Self, Error> {
        let (flags, action) = command.command();
        if flags.name().is_empty() {
            return Err(Error::InvalidConfiguration(format!(
                "a subcommand of '{parent}' declares a flag set with an empty name"
            )));
        }
        Ok(Self {
            command,
            flags,
            action,
        })
    }

    pub(crate) fn name(&self) -> &str {
        self.flags.name()
    }

    pub(crate) fn entry(&self) -> Entry {
        Entry {
            name: self.name().to_string(),
            synopsis: synopsis_of(self.command.as_ref()),
            target: Target::User {
                command: Arc::clone(&self.command),
                flags: self.flags.flags().cloned().collect(),
            },
        }
    }
}

/// Built-ins not shadowed by a user child of the same name.
pub(crate) fn unshadowed_builtins(user: &[Entry]) -> Vec<Builtin> {
    Builtin::ALL
        .into_iter()
        .filter(|builtin| user.iter().all(|entry| entry.name != builtin.name()))
        .collect()
}

/// Listing entries for a node's children, built-ins appended.
fn entries_for(children: &[Arc<dyn Command>], parent: &str) -> Result<Vec<Entry>, Error> {
    let mut entries = children
        .iter()
        .map(|child| Declared::new(Arc::clone(child), parent).map(|d| d.entry()))
        .collect::<Result<Vec<_>, _>>()?;
    let builtins = unshadowed_builtins(&entries);
    entries.extend(builtins.into_iter().map(Builtin::entry));
    Ok(entries)
}

impl Level {
    /// Describe the child `entry` of this level.
    pub(crate) fn child(&self, entry: &Entry) -> Result<Level, Error> {
        let path = format!("{} {}", self.path, entry.name);
        match &entry.target {
            Target::User { command, flags } => {
                let children = match command.subcommands() {
                    Some(children) => Some(entries_for(children, &path)?),
                    None => None,
                };
                Ok(Level {
                    synopsis: entry.synopsis.clone(),
                    help: command.help(),
                    flags: flags.clone(),
                    children,
                    path,
                })
            }
            Target::Builtin(builtin) => Ok(Level {
                synopsis: Some(builtin.synopsis().to_string()),
                help: Some(builtin.help().to_string()),
                flags: builtin.flag_set().flags().cloned().collect(),
                children: None,
                path,
            }),
        }
    }

    /// Walk `names` below this level by exact name, first match wins.
    pub(crate) fn find(&self, names: &[String]) -> Result<Level, Error> {
        let mut current = self.clone();
        for name in names {
            let entry = current
                .children
                .as_ref()
                .and_then(|children| children.iter().find(|entry| entry.name == *name))
                .ok_or_else(|| Error::UnresolvedHelpTarget {
                    segment: name.clone(),
                    parent: current.path.clone(),
                })?;
            current = current.child(entry)?;
        }
        Ok(current)
    }

    /// Full help: usage line, documentation, flags, and subcommands.
    pub(crate) fn render_help(&self) -> String {
        let mut usage = format!("Usage: {}", self.path);
        if !self.flags.is_empty() {
            usage.push_str(" [flags]");
        }
        if self.children.is_some() {
            usage.push_str(" <command>");
        }
        usage.push_str(" [args...]");

        let mut sections = vec![usage];
        let help = self
            .help
            .as_deref()
            .map(str::trim)
            .filter(|help| !help.is_empty());
        // A synopsis taken from the help text's first line is printed once.
        let first_line = help.and_then(|help| help.lines().next()).map(str::trim);
        if let Some(synopsis) = self.synopsis.as_deref() {
            if first_line != Some(synopsis.trim()) {
                sections.push(synopsis.to_string());
            }
        }
        if let Some(help) = help {
            sections.push(help.to_string());
        }
        if !self.flags.is_empty() {
            sections.push(format!(
                "Flags:\n{}",
                render_defaults(&self.flags).trim_end()
            ));
        }
        if let Some(children) = &self.children {
            if !children.is_empty() {
                sections.push(format!("Commands:\n{}", render_commands(children).trim_end()));
            }
        }

        let mut text = sections.join("\n\n");
        text.push('\n');
        text
    }
}

/// Names padded to a common width, each followed by its synopsis.
pub(crate) fn render_commands(entries: &[Entry]) -> String {
    let width = entries.iter().map(|e| e.name.chars().count()).max().unwrap_or(0);
    let mut out = String::new();
    for entry in entries {
        match &entry.synopsis {
            Some(synopsis) => {
                out.push_str(&format!("  {:<width$}  {}\n", entry.name, synopsis));
            }
            None => {
                out.push_str(&format!("  {}\n", entry.name));
            }
        }
    }
    out
}
