//! subcmd-demo
//!
//! A small daemon-control command line built on `subcmd`. Actions only print
//! what they were asked to do.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use subcmd::flag::duration;
use subcmd::{action, group, output, Action, Command, Context, Flag, FlagSet, Runner};
use tracing_subscriber::EnvFilter;

const PROGRAM: &str = "subcmd-demo";

/// `run`: start the daemon.
struct RunCmd {
    dry_run: Flag<bool>,
    background: Flag<bool>,
    port: Flag<i64>,
    ip: Flag<String>,
    data_dir: Flag<String>,
}

impl RunCmd {
    fn new(dry_run: &Flag<bool>) -> Self {
        Self {
            dry_run: dry_run.clone(),
            background: Flag::default(),
            port: Flag::default(),
            ip: Flag::default(),
            data_dir: Flag::default(),
        }
    }
}

impl Command for RunCmd {
    fn command(&self) -> (FlagSet, Action) {
        let mut fset = FlagSet::new("run");
        fset.var(&self.background, "background", false, "runs the daemon in background");
        fset.var(&self.port, "port", 10000, "TCP port number for the daemon");
        fset.var(&self.ip, "ip", "0.0.0.0".to_string(), "TCP ip address for the daemon");
        fset.var(&self.data_dir, "data-dir", String::new(), "path to the data `directory`");

        let dry_run = self.dry_run.clone();
        let background = self.background.clone();
        let port = self.port.clone();
        let ip = self.ip.clone();
        let data_dir = self.data_dir.clone();
        (
            fset,
            action(move |_ctx, args| async move {
                let data_dir = match data_dir.get() {
                    dir if dir.is_empty() => std::env::var("HOME")
                        .map(|home| format!("{home}/.data"))
                        .unwrap_or_else(|_| ".data".to_string()),
                    dir => dir,
                };
                println!(
                    "{}run: background={} listen={}:{} data-dir={} args={:?}",
                    prefix(&dry_run),
                    background.get(),
                    ip.get(),
                    port.get(),
                    data_dir,
                    args
                );
                Ok(())
            }),
        )
    }

    fn help(&self) -> Option<String> {
        Some(
            "Runs the daemon.\n\n\
             Serves requests on the given address until interrupted."
                .to_string(),
        )
    }
}

/// Flags a demo leaf can declare.
enum Opt {
    Text {
        name: &'static str,
        default: &'static str,
        usage: &'static str,
    },
    Wait {
        name: &'static str,
        usage: &'static str,
    },
}

type Reader = (&'static str, Box<dyn Fn() -> String + Send>);

/// A leaf that reports its flags and arguments.
struct Echo {
    path: &'static str,
    help: &'static str,
    opts: Vec<Opt>,
    dry_run: Flag<bool>,
}

impl Echo {
    fn leaf(path: &'static str, help: &'static str, opts: Vec<Opt>, dry_run: &Flag<bool>) -> Arc<dyn Command> {
        Arc::new(Self {
            path,
            help,
            opts,
            dry_run: dry_run.clone(),
        })
    }

    fn name(&self) -> &'static str {
        self.path.rsplit(' ').next().unwrap_or(self.path)
    }
}

impl Command for Echo {
    fn command(&self) -> (FlagSet, Action) {
        let mut fset = FlagSet::new(self.name());
        let mut readers: Vec<Reader> = Vec::new();
        for opt in &self.opts {
            match *opt {
                Opt::Text { name, default, usage } => {
                    let flag = fset.string(name, default, usage);
                    readers.push((name, Box::new(move || flag.get())));
                }
                Opt::Wait { name, usage } => {
                    let flag = fset.duration(name, Duration::ZERO, usage);
                    readers.push((name, Box::new(move || duration::format(flag.get()))));
                }
            }
        }

        let path = self.path;
        let dry_run = self.dry_run.clone();
        (
            fset,
            action(move |_ctx, args| async move {
                let flags: Vec<String> = readers
                    .iter()
                    .map(|(name, read)| format!(" {}={}", name, read()))
                    .collect();
                println!("{}{}:{} args={:?}", prefix(&dry_run), path, flags.concat(), args);
                Ok(())
            }),
        )
    }

    fn help(&self) -> Option<String> {
        Some(self.help.to_string())
    }
}

fn prefix(dry_run: &Flag<bool>) -> &'static str {
    if dry_run.get() {
        "[dry-run] "
    } else {
        ""
    }
}

fn commands(dry_run: &Flag<bool>) -> Vec<Arc<dyn Command>> {
    let format = |usage| Opt::Text {
        name: "format",
        default: "json",
        usage,
    };
    let wait = |name, usage| Opt::Wait { name, usage };
    let leaf = |path, help, opts| Echo::leaf(path, help, opts, dry_run);
    let run: Arc<dyn Command> = Arc::new(RunCmd::new(dry_run));

    vec![
        run,
        group(
            "jobs",
            "manage jobs",
            vec![
                leaf("jobs list", "Lists all jobs.", vec![format("list output format")]),
                leaf("jobs summary", "Summarizes job states.", vec![format("summary output format")]),
            ],
        ),
        group(
            "job",
            "manage single job",
            vec![
                leaf("job pause", "Pauses a job.", vec![wait("timeout", "pause duration")]),
                leaf("job resume", "Resumes a paused job.", vec![wait("timeout", "resume duration")]),
                leaf("job cancel", "Cancels a job.", vec![wait("after", "cancellation delay")]),
                leaf("job archive", "Archives a finished job.", vec![]),
                leaf("job delete", "Deletes a job.", vec![]),
            ],
        ),
        group(
            "db",
            "manage database",
            vec![
                leaf("db get", "Prints the value of a key.", vec![]),
                leaf("db set", "Sets the value of a key.", vec![]),
                leaf("db delete", "Deletes a key.", vec![]),
                leaf("db scan", "Lists keys with a prefix.", vec![]),
                leaf("db backup", "Writes a database backup.", vec![]),
            ],
        ),
    ]
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let dry_run = Flag::new(false);
    let mut globals = FlagSet::new(PROGRAM);
    globals.var(&dry_run, "dry-run", false, "print actions without performing them");

    let cmds = commands(&dry_run);
    let result = Runner::new(PROGRAM)
        .global_flags(globals)
        .run(Context::new(), &cmds, std::env::args().skip(1))
        .await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::error(&err);
            ExitCode::FAILURE
        }
    }
}
