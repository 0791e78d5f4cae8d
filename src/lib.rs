//! subcmd - subcommand routing with per-level flags
//!
//! Programs describe their command line as a tree of named commands. Each
//! level declares its own flags; [`run`] walks the tree along the arguments,
//! parsing each level's flags on the way, and runs the deepest command the
//! arguments name with whatever positional arguments are left.
//!
//! Every group also answers to `help`, `flags`, and `commands` unless one of
//! its own children uses the name.
//!
//! # Modules
//!
//! - [`flag`] - Flag sets and their parser
//! - [`command`] - The [`Command`] capability, actions, and [`Group`]
//! - [`resolver`] - Tree descent, built-ins, and the [`Runner`] entry point
//! - [`output`] - Diagnostic output stream
//! - [`error`] - Error type
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use subcmd::{action, group, Action, Command, Context, Flag, FlagSet};
//!
//! struct RunCmd {
//!     background: Flag<bool>,
//!     port: Flag<i64>,
//! }
//!
//! impl Command for RunCmd {
//!     fn command(&self) -> (FlagSet, Action) {
//!         let mut fset = FlagSet::new("run");
//!         fset.var(&self.background, "background", false, "runs the daemon in background");
//!         fset.var(&self.port, "port", 10000, "TCP port number for the daemon");
//!         let port = self.port.clone();
//!         (fset, action(move |_ctx, _args| async move {
//!             println!("listening on {}", port.get());
//!             Ok(())
//!         }))
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), subcmd::Error> {
//!     let run: Arc<dyn Command> = Arc::new(RunCmd {
//!         background: Flag::default(),
//!         port: Flag::default(),
//!     });
//!     let cmds = vec![run, group("jobs", "manage jobs", vec![])];
//!     subcmd::run(Context::new(), &cmds, std::env::args().skip(1)).await
//! }
//! ```

pub mod command;
pub mod error;
pub mod flag;
pub mod output;
pub mod resolver;

pub use command::{action, group, Action, ActionFuture, Command, Context, Group};
pub use error::Error;
pub use flag::{Flag, FlagError, FlagSet, FlagValue};
pub use output::Output;
pub use resolver::{run, Runner};
