//! resolver
//!
//! Selects and runs the deepest subcommand named by the arguments.
//!
//! # Algorithm
//!
//! Starting at an implicit root group that holds the top-level commands,
//! each level:
//!
//! 1. Declares its children (one `command()` call each) and appends the
//!    `help`, `flags`, and `commands` built-ins to groups
//! 2. Parses its own flags from the front of the remaining arguments
//! 3. Descends into the child whose name equals the first positional
//!    argument, if any
//! 4. Otherwise runs its own action with the positional arguments left
//!
//! `-h`/`-help` at any level prints that level's help and ends the run
//! successfully without running an action.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use subcmd::{action, group, Action, Command, Context, FlagSet, Output, Runner};
//!
//! struct Scan;
//!
//! impl Command for Scan {
//!     fn command(&self) -> (FlagSet, Action) {
//!         (FlagSet::new("scan"), action(|_ctx, args| async move {
//!             assert_eq!(args, vec!["prefix".to_string()]);
//!             Ok(())
//!         }))
//!     }
//! }
//!
//! let scan: Arc<dyn Command> = Arc::new(Scan);
//! let db = group("db", "manage database", vec![scan]);
//! let runtime = tokio::runtime::Runtime::new().unwrap();
//! runtime
//!     .block_on(
//!         Runner::new("prog")
//!             .output(Output::buffer())
//!             .run(Context::new(), &[db], ["db", "scan", "prefix"]),
//!     )
//!     .unwrap();
//! ```

mod builtins;
mod describe;

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::command::group::fallback_action;
use crate::command::{synopsis_of, Action, Command, Context};
use crate::error::Error;
use crate::flag::{FlagError, FlagSet};
use crate::output::Output;

use builtins::Builtin;
use describe::{unshadowed_builtins, Declared, Entry, Level};

/// Program name used when none can be derived from the process arguments.
const DEFAULT_PROGRAM: &str = "command";

/// Configured entry point for resolving a command tree.
///
/// A runner is consumed by [`Runner::run`] because the global flag set can
/// only be parsed once.
#[derive(Debug)]
pub struct Runner {
    program: String,
    global_flags: Option<FlagSet>,
    output: Output,
}

impl Runner {
    /// Create a runner for `program`, which names the root in help output.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            global_flags: None,
            output: Output::default(),
        }
    }

    /// Create a runner named after the running executable.
    pub fn from_env() -> Self {
        let program = std::env::args_os()
            .next()
            .and_then(|arg0| {
                Path::new(&arg0)
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
            })
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_PROGRAM.to_string());
        Self::new(program)
    }

    /// Flags recognized at the root, ahead of the first subcommand name.
    ///
    /// The set's name replaces the program name in help output.
    pub fn global_flags(mut self, flags: FlagSet) -> Self {
        self.global_flags = Some(flags);
        self
    }

    /// Where help, usage, and listings are written. Defaults to stderr.
    pub fn output(mut self, output: Output) -> Self {
        self.output = output;
        self
    }

    /// Resolve `args` against `cmds` and run the selected action.
    ///
    /// `args` must not include the program name.
    pub async fn run<I, S>(self, ctx: Context, cmds: &[Arc<dyn Command>], args: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if cmds.is_empty() {
            return Err(Error::InvalidArgument("no commands to run".to_string()));
        }

        let program = self.program;
        let flags = self.global_flags.unwrap_or_else(|| FlagSet::new(program));
        if flags.name().is_empty() {
            return Err(Error::InvalidConfiguration(
                "the global flag set has an empty name".to_string(),
            ));
        }

        let root = Frame {
            path: flags.name().to_string(),
            synopsis: None,
            help: None,
            children: Some(cmds.to_vec()),
            action: fallback_action(flags.name().to_string()),
            flags,
        };
        let resolver = Resolver {
            output: self.output,
        };
        resolver
            .resolve(ctx, root, args.into_iter().map(Into::into).collect())
            .await
    }
}

/// Resolve `args` against `cmds` with a [`Runner`] named after the executable.
pub async fn run<I, S>(ctx: Context, cmds: &[Arc<dyn Command>], args: I) -> Result<(), Error>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Runner::from_env().run(ctx, cmds, args).await
}

/// A node on the resolution path, already declared.
struct Frame {
    path: String,
    synopsis: Option<String>,
    help: Option<String>,
    children: Option<Vec<Arc<dyn Command>>>,
    flags: FlagSet,
    action: Action,
}

impl Frame {
    fn child(parent: &str, declared: Declared) -> Self {
        let command = declared.command;
        Self {
            path: format!("{} {}", parent, declared.flags.name()),
            synopsis: synopsis_of(command.as_ref()),
            help: command.help(),
            children: command.subcommands().map(<[_]>::to_vec),
            flags: declared.flags,
            action: declared.action,
        }
    }

    fn level(&self, children: Option<Vec<Entry>>) -> Level {
        Level {
            path: self.path.clone(),
            synopsis: self.synopsis.clone(),
            help: self.help.clone(),
            flags: self.flags.flags().cloned().collect(),
            children,
        }
    }
}

struct Resolver {
    output: Output,
}

impl Resolver {
    async fn resolve(&self, ctx: Context, mut frame: Frame, mut args: Vec<String>) -> Result<(), Error> {
        loop {
            debug!(command = %frame.path, args = ?args, "resolving");

            let mut declared = Vec::new();
            let level = match frame.children.take() {
                Some(children) => {
                    for child in children {
                        declared.push(Declared::new(child, &frame.path)?);
                    }
                    let mut entries: Vec<Entry> = declared.iter().map(Declared::entry).collect();
                    let builtins = unshadowed_builtins(&entries);
                    entries.extend(builtins.iter().copied().map(Builtin::entry));

                    let level = Arc::new(frame.level(Some(entries)));
                    for builtin in builtins {
                        let command = builtin.bind(Arc::clone(&level), self.output.clone());
                        declared.push(Declared::new(command, &frame.path)?);
                    }
                    level
                }
                None => Arc::new(frame.level(None)),
            };

            let mut rest = match frame.flags.parse(args) {
                Ok(rest) => rest,
                Err(FlagError::Help) => {
                    debug!(command = %frame.path, "help requested");
                    self.output.write_str(&level.render_help())?;
                    return Ok(());
                }
                Err(err) => {
                    self.output.write_line(&err)?;
                    self.output.write_str(&level.render_help())?;
                    return Err(err.into());
                }
            };

            let selected = rest
                .first()
                .and_then(|name| declared.iter().position(|child| child.name() == name));
            if let Some(index) = selected {
                let child = declared.swap_remove(index);
                frame = Frame::child(&frame.path, child);
                args = rest.split_off(1);
                continue;
            }

            debug!(command = %frame.path, args = ?rest, "dispatching action");
            return match (frame.action)(ctx, rest).await {
                Ok(()) => Ok(()),
                Err(err) => {
                    let err = Error::from_action(err);
                    if level.children.is_some() && err.is_subcommand_error() {
                        self.output.write_str(&level.render_help())?;
                    }
                    Err(err)
                }
            };
        }
    }
}
