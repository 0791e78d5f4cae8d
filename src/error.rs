//! error
//!
//! Errors returned from a run.
//!
//! # Design
//!
//! Resolution stops at the first error. Flag errors keep the flag parser's
//! messages, and errors returned by actions pass through unchanged as
//! [`Error::Action`]. Requesting help with `-h` is not an error.
//!
//! # Example
//!
//! ```
//! use subcmd::Error;
//!
//! let err = Error::UnresolvedHelpTarget {
//!     segment: "scan".to_string(),
//!     parent: "prog db".to_string(),
//! };
//! assert!(err.to_string().contains("scan"));
//! assert!(err.action_error().is_none());
//! ```

use thiserror::Error;

use crate::flag::FlagError;

/// Errors from resolving and running a command.
#[derive(Debug, Error)]
pub enum Error {
    /// A command declared an unusable flag set, such as one with an empty name.
    #[error("invalid command configuration: {0}")]
    InvalidConfiguration(String),

    /// The arguments to [`crate::run`] were unusable.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A flag could not be parsed.
    #[error(transparent)]
    Flag(#[from] FlagError),

    /// `help` was asked to describe a command that does not exist.
    #[error("help: no command {segment:?} under '{parent}'")]
    UnresolvedHelpTarget { segment: String, parent: String },

    /// A group was selected without naming one of its children.
    #[error("{group}: missing subcommand")]
    MissingSubcommand { group: String },

    /// A group was given an argument that names none of its children.
    #[error("{group}: unknown subcommand {name:?}")]
    UnknownSubcommand { group: String, name: String },

    /// The selected action failed.
    #[error(transparent)]
    Action(anyhow::Error),

    /// Help or listing output could not be written.
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// A crate error raised by a group fallback or a built-in from inside its action.
#[derive(Debug, Error)]
#[error("{0}")]
pub(crate) struct Raised(pub(crate) Error);

impl Error {
    /// Hand the error out of a crate-provided action so it keeps its kind.
    pub(crate) fn raise(self) -> anyhow::Error {
        anyhow::Error::new(Raised(self))
    }

    /// Wrap an action failure.
    ///
    /// Only errors marked with [`Error::raise`] and carrying no added context
    /// are unwrapped. Everything else, including a `subcmd::Error` returned by
    /// a user action, is kept untouched as [`Error::Action`].
    pub(crate) fn from_action(err: anyhow::Error) -> Self {
        if err.chain().count() > 1 {
            return Error::Action(err);
        }
        match err.downcast::<Raised>() {
            Ok(Raised(err)) => err,
            Err(err) => Error::Action(err),
        }
    }

    /// The error returned by the selected action, if that is what failed.
    pub fn action_error(&self) -> Option<&anyhow::Error> {
        match self {
            Error::Action(err) => Some(err),
            _ => None,
        }
    }

    /// Check if the error came from parsing flags.
    pub fn is_flag_error(&self) -> bool {
        matches!(self, Error::Flag(_))
    }

    /// Check if a group was reached without a usable subcommand name.
    pub fn is_subcommand_error(&self) -> bool {
        matches!(
            self,
            Error::MissingSubcommand { .. } | Error::UnknownSubcommand { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_errors_pass_through() {
        let err = Error::from_action(anyhow::anyhow!("disk full"));
        assert_eq!(err.to_string(), "disk full");
        assert!(err.action_error().is_some());
    }

    #[test]
    fn raised_errors_keep_their_kind() {
        let err = Error::from_action(
            Error::MissingSubcommand {
                group: "db".to_string(),
            }
            .raise(),
        );
        assert!(err.is_subcommand_error());
        assert!(err.action_error().is_none());
    }

    #[test]
    fn user_returned_crate_errors_stay_action_errors() {
        let err = Error::from_action(Error::InvalidArgument("inner".to_string()).into());
        assert_eq!(err.to_string(), "invalid argument: inner");
        assert!(err.action_error().is_some());
    }

    #[test]
    fn context_on_raised_errors_is_kept() {
        let raised = Error::MissingSubcommand {
            group: "db".to_string(),
        }
        .raise()
        .context("while syncing");
        let err = Error::from_action(raised);
        assert_eq!(err.to_string(), "while syncing");
        assert!(err.action_error().is_some());
    }

    #[test]
    fn flag_errors_are_transparent() {
        let err: Error = FlagError::Undefined("x".to_string()).into();
        assert_eq!(err.to_string(), "flag provided but not defined: -x");
        assert!(err.is_flag_error());
    }
}
