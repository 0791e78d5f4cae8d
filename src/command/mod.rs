//! command
//!
//! The capability every node of a subcommand tree implements.
//!
//! # Architecture
//!
//! A [`Command`] declares its flags and returns the action to run when it is
//! selected. Leaves implement the trait directly; interior nodes are built
//! with [`Group`]. The resolver never mutates the tree: it only reads it and
//! calls [`Command::command`] on the nodes it visits.
//!
//! # Invariants
//!
//! - The returned [`FlagSet`] name is the command's name and must be non-empty
//! - `command()` is called at most once per node per run, so implementations
//!   may create a fresh [`FlagSet`] on every call
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use subcmd::{action, Action, Command, Flag, FlagSet};
//!
//! struct RunCmd {
//!     background: Flag<bool>,
//! }
//!
//! impl Command for RunCmd {
//!     fn command(&self) -> (FlagSet, Action) {
//!         let mut fset = FlagSet::new("run");
//!         fset.var(&self.background, "background", false, "runs the daemon in background");
//!         let background = self.background.clone();
//!         (
//!             fset,
//!             action(move |_ctx, args| async move {
//!                 println!("background={} args={:?}", background.get(), args);
//!                 Ok(())
//!             }),
//!         )
//!     }
//!
//!     fn help(&self) -> Option<String> {
//!         Some("Runs the daemon.\n\nStarts serving requests until stopped.".to_string())
//!     }
//! }
//!
//! let run: Arc<dyn Command> = Arc::new(RunCmd { background: Flag::new(false) });
//! assert_eq!(subcmd::command::synopsis_of(run.as_ref()).as_deref(), Some("Runs the daemon."));
//! ```

pub mod context;
pub mod group;

pub use context::Context;
pub use group::{group, Group};

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::flag::FlagSet;

/// Future returned by an [`Action`].
pub type ActionFuture = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send>>;

/// Entry point of a selected command.
///
/// Receives the run's context and the positional arguments left after every
/// flag and subcommand name along the resolved path has been consumed.
pub type Action = Box<dyn FnOnce(Context, Vec<String>) -> ActionFuture + Send>;

/// Box an async closure as an [`Action`].
pub fn action<F, Fut>(f: F) -> Action
where
    F: FnOnce(Context, Vec<String>) -> Fut + Send + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    Box::new(move |ctx, args| Box::pin(f(ctx, args)))
}

/// A node in a subcommand tree.
pub trait Command: Send + Sync {
    /// Declare this command's flags and return its action.
    ///
    /// The flag set's name is taken as the subcommand name.
    fn command(&self) -> (FlagSet, Action);

    /// Detailed documentation. The first non-empty line doubles as the
    /// synopsis when [`Command::synopsis`] returns `None`.
    fn help(&self) -> Option<String> {
        None
    }

    /// One-line description shown in command listings.
    fn synopsis(&self) -> Option<String> {
        None
    }

    /// Child commands. `Some` marks an interior node, even when empty.
    fn subcommands(&self) -> Option<&[Arc<dyn Command>]> {
        None
    }
}

/// One-line description of a command.
///
/// Resolution order: [`Command::synopsis`], then the first non-empty line of
/// [`Command::help`], then nothing.
pub fn synopsis_of(command: &dyn Command) -> Option<String> {
    if let Some(synopsis) = command.synopsis().filter(|s| !s.trim().is_empty()) {
        return Some(synopsis.trim().to_string());
    }
    command.help().and_then(|help| {
        help.lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Documented {
        synopsis: Option<&'static str>,
        help: Option<&'static str>,
    }

    impl Command for Documented {
        fn command(&self) -> (FlagSet, Action) {
            (FlagSet::new("doc"), action(|_, _| async { Ok(()) }))
        }

        fn help(&self) -> Option<String> {
            self.help.map(str::to_string)
        }

        fn synopsis(&self) -> Option<String> {
            self.synopsis.map(str::to_string)
        }
    }

    #[test]
    fn synopsis_prefers_explicit_synopsis() {
        let cmd = Documented {
            synopsis: Some("short"),
            help: Some("long help\nmore"),
        };
        assert_eq!(synopsis_of(&cmd).as_deref(), Some("short"));
    }

    #[test]
    fn synopsis_falls_back_to_first_help_line() {
        let cmd = Documented {
            synopsis: None,
            help: Some("\n  First line of help.\nRest of the text.\n"),
        };
        assert_eq!(synopsis_of(&cmd).as_deref(), Some("First line of help."));
    }

    #[test]
    fn synopsis_absent_without_docs() {
        let cmd = Documented {
            synopsis: Some("  "),
            help: None,
        };
        assert_eq!(synopsis_of(&cmd), None);
    }

    #[tokio::test]
    async fn action_boxes_async_closure() {
        let run = action(|_ctx, args| async move {
            anyhow::ensure!(args == vec!["x".to_string()], "unexpected args {args:?}");
            Ok(())
        });
        run(Context::new(), vec!["x".to_string()]).await.unwrap();
    }
}
