//! resolver::builtins
//!
//! The `help`, `flags`, and `commands` children added to every group.
//!
//! # Design
//!
//! Built-ins are synthesized for each run from a [`Level`] snapshot of their
//! parent, so they never call back into the parent's flag set (which the
//! resolver parses) and never become part of the tree itself. A user child
//! with the same name hides the built-in.

use std::sync::Arc;

use super::describe::{render_commands, Entry, Level, Target};
use crate::command::{action, Action, Command};
use crate::error::Error;
use crate::flag::{render_defaults, Flag, FlagSet};
use crate::output::Output;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Builtin {
    Help,
    Flags,
    Commands,
}

impl Builtin {
    pub(crate) const ALL: [Builtin; 3] = [Builtin::Help, Builtin::Flags, Builtin::Commands];

    pub(crate) fn name(self) -> &'static str {
        match self {
            Builtin::Help => "help",
            Builtin::Flags => "flags",
            Builtin::Commands => "commands",
        }
    }

    pub(crate) fn synopsis(self) -> &'static str {
        match self {
            Builtin::Help => "print help for this command or a nested command",
            Builtin::Flags => "print the flags accepted at this level",
            Builtin::Commands => "list the subcommands at this level",
        }
    }

    pub(crate) fn help(self) -> &'static str {
        match self {
            Builtin::Help => {
                "Prints usage, documentation, flags, and subcommands.\n\n\
                 With command names as arguments, prints help for the nested\n\
                 command they name instead, e.g. `help db scan`."
            }
            Builtin::Flags => {
                "Prints the flags accepted at this level in declaration order,\n\
                 with their defaults and usage text."
            }
            Builtin::Commands => {
                "Lists the subcommands at this level with a one-line synopsis\n\
                 for each."
            }
        }
    }

    /// Flag set for one invocation, with the `-json` handle where the built-in has one.
    pub(crate) fn declare(self) -> (FlagSet, Option<Flag<bool>>) {
        let mut fset = FlagSet::new(self.name());
        let json = match self {
            Builtin::Help => None,
            Builtin::Flags | Builtin::Commands => {
                Some(fset.bool("json", false, "print the listing as JSON"))
            }
        };
        (fset, json)
    }

    pub(crate) fn flag_set(self) -> FlagSet {
        self.declare().0
    }

    pub(crate) fn entry(self) -> Entry {
        Entry {
            name: self.name().to_string(),
            synopsis: Some(self.synopsis().to_string()),
            target: Target::Builtin(self),
        }
    }

    /// Attach the built-in to the level it describes.
    pub(crate) fn bind(self, level: Arc<Level>, output: Output) -> Arc<dyn Command> {
        Arc::new(BuiltinCommand {
            builtin: self,
            level,
            output,
        })
    }

    fn execute(self, level: &Level, output: &Output, json: bool, args: &[String]) -> anyhow::Result<()> {
        let text = match self {
            Builtin::Help => level.find(args).map_err(Error::raise)?.render_help(),
            Builtin::Flags if json => {
                format!("{}\n", serde_json::to_string_pretty(&level.flags)?)
            }
            Builtin::Flags => render_defaults(&level.flags),
            Builtin::Commands => {
                let entries = level.children.as_deref().unwrap_or_default();
                if json {
                    let summaries: Vec<_> = entries.iter().map(Entry::summary).collect();
                    format!("{}\n", serde_json::to_string_pretty(&summaries)?)
                } else {
                    render_commands(entries)
                }
            }
        };
        output
            .write_str(&text)
            .map_err(|err| Error::Output(err).raise())?;
        Ok(())
    }
}

struct BuiltinCommand {
    builtin: Builtin,
    level: Arc<Level>,
    output: Output,
}

impl Command for BuiltinCommand {
    fn command(&self) -> (FlagSet, Action) {
        let (fset, json) = self.builtin.declare();
        let builtin = self.builtin;
        let level = Arc::clone(&self.level);
        let output = self.output.clone();
        (
            fset,
            action(move |_ctx, args| async move {
                let json = json.map(|flag| flag.get()).unwrap_or(false);
                builtin.execute(&level, &output, json, &args)
            }),
        )
    }

    fn help(&self) -> Option<String> {
        Some(self.builtin.help().to_string())
    }

    fn synopsis(&self) -> Option<String> {
        Some(self.builtin.synopsis().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf_level() -> Level {
        let mut fset = FlagSet::new("scan");
        fset.string("format", "json", "output format");
        Level {
            path: "prog db scan".to_string(),
            synopsis: Some("scan the database".to_string()),
            help: None,
            flags: fset.flags().cloned().collect(),
            children: None,
        }
    }

    #[test]
    fn flags_lists_level_flags() {
        let out = Output::buffer();
        Builtin::Flags
            .execute(&leaf_level(), &out, false, &[])
            .unwrap();
        assert_eq!(
            out.contents(),
            "  -format string\n    \toutput format (default \"json\")\n"
        );
    }

    #[test]
    fn flags_as_json() {
        let out = Output::buffer();
        Builtin::Flags
            .execute(&leaf_level(), &out, true, &[])
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out.contents()).unwrap();
        assert_eq!(parsed[0]["name"], "format");
        assert_eq!(parsed[0]["type"], "string");
        assert_eq!(parsed[0]["default"], "json");
    }

    #[test]
    fn help_on_leaf_rejects_nested_target() {
        let out = Output::buffer();
        let err = Builtin::Help
            .execute(&leaf_level(), &out, false, &["deeper".to_string()])
            .unwrap_err();
        assert!(matches!(
            Error::from_action(err),
            Error::UnresolvedHelpTarget { segment, parent }
                if segment == "deeper" && parent == "prog db scan"
        ));
        assert_eq!(out.contents(), "");
    }

    #[test]
    fn builtin_help_describes_itself() {
        let (fset, json) = Builtin::Commands.declare();
        assert_eq!(fset.name(), "commands");
        assert!(json.is_some());
        assert!(Builtin::Help.declare().1.is_none());
        assert_eq!(Builtin::Help.entry().name, "help");
    }
}
