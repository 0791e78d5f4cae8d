//! command::group
//!
//! Interior nodes of a subcommand tree.

use std::fmt;
use std::sync::Arc;

use super::{action, Action, Command};
use crate::error::Error;
use crate::flag::FlagSet;

type FlagSetup = Box<dyn Fn(&mut FlagSet) + Send + Sync>;

/// A named parent of other commands.
///
/// Children keep insertion order for listings; lookup is by exact name and
/// the first child with a matching name wins.
pub struct Group {
    name: String,
    description: String,
    children: Vec<Arc<dyn Command>>,
    flags: Option<FlagSetup>,
}

impl Group {
    /// Create a group with no flags of its own.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        children: Vec<Arc<dyn Command>>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            children,
            flags: None,
        }
    }

    /// Give the group its own flags.
    ///
    /// `setup` is called once per run to declare flags on a set named after
    /// the group.
    pub fn with_flags<F>(mut self, setup: F) -> Self
    where
        F: Fn(&mut FlagSet) + Send + Sync + 'static,
    {
        self.flags = Some(Box::new(setup));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn children(&self) -> &[Arc<dyn Command>] {
        &self.children
    }
}

/// Action of a group whose arguments named none of its children.
pub(crate) fn fallback_action(group: String) -> Action {
    action(move |_ctx, args| async move {
        let err = match args.into_iter().next() {
            None => Error::MissingSubcommand { group },
            Some(name) => Error::UnknownSubcommand { group, name },
        };
        Err(err.raise())
    })
}

impl Command for Group {
    fn command(&self) -> (FlagSet, Action) {
        let mut flags = FlagSet::new(self.name.clone());
        if let Some(setup) = &self.flags {
            setup(&mut flags);
        }
        (flags, fallback_action(self.name.clone()))
    }

    fn synopsis(&self) -> Option<String> {
        Some(self.description.clone()).filter(|d| !d.is_empty())
    }

    fn subcommands(&self) -> Option<&[Arc<dyn Command>]> {
        Some(&self.children)
    }
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("children", &self.children.len())
            .field("custom_flags", &self.flags.is_some())
            .finish()
    }
}

/// Build a group and share it as a tree node.
pub fn group(
    name: impl Into<String>,
    description: impl Into<String>,
    children: Vec<Arc<dyn Command>>,
) -> Arc<dyn Command> {
    Arc::new(Group::new(name, description, children))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Context;

    #[test]
    fn group_declares_empty_flag_set_named_after_itself() {
        let db = Group::new("db", "manage database", Vec::new());
        let (flags, _) = db.command();
        assert_eq!(flags.name(), "db");
        assert!(flags.is_empty());
        assert_eq!(db.synopsis().as_deref(), Some("manage database"));
        assert!(db.subcommands().is_some());
    }

    #[test]
    fn custom_flags_are_declared_on_group_named_set() {
        let db = Group::new("db", "", Vec::new()).with_flags(|fset| {
            fset.string("dsn", "", "database to open");
        });
        let (flags, _) = db.command();
        assert_eq!(flags.name(), db.name());
        assert!(flags.lookup("dsn").is_some());
        assert_eq!(db.synopsis(), None);
    }

    #[tokio::test]
    async fn fallback_reports_missing_and_unknown_subcommands() {
        let db = Group::new("db", "", Vec::new());

        let (_, run) = db.command();
        let err = run(Context::new(), Vec::new()).await.unwrap_err();
        assert!(matches!(
            Error::from_action(err),
            Error::MissingSubcommand { group: parent } if parent == "db"
        ));

        let (_, run) = db.command();
        let err = run(Context::new(), vec!["nope".to_string()]).await.unwrap_err();
        assert_eq!(err.to_string(), "db: unknown subcommand \"nope\"");
    }
}
