//! Command-line parsing
//!
//! Flags are single-dash words (`-del`, `-dir`, `-t 5m`). They are
//! rewritten into clap's `--long` form before parsing; everything from
//! the first positional argument on is the wrapped command and is left
//! untouched.

use clap::Parser;
use clicache_core::{CommandLine, Mode, Result, Settings, DEFAULT_BUCKET_WIDTH};
use clicache_utils::default_cache_dir;
use std::ffi::OsString;
use std::fmt::Write as _;
use std::path::PathBuf;

/// A flag as it appears on the command line and in the usage text
struct FlagSpec {
    name: &'static str,
    takes_value: bool,
    usage: &'static str,
}

const FLAGS: &[FlagSpec] = &[
    FlagSpec {
        name: "c",
        takes_value: false,
        usage: "include cwd in hash",
    },
    FlagSpec {
        name: "del",
        takes_value: false,
        usage: "delete this entry",
    },
    FlagSpec {
        name: "dir",
        takes_value: true,
        usage: "directory to store/retrieve cache info",
    },
    FlagSpec {
        name: "h",
        takes_value: false,
        usage: "Show this help",
    },
    FlagSpec {
        name: "purge",
        takes_value: false,
        usage: "delete all cache entries",
    },
    FlagSpec {
        name: "t",
        takes_value: true,
        usage: "max duration to cache output (cache keys are rounded by this amount)",
    },
    FlagSpec {
        name: "v",
        takes_value: false,
        usage: "verbose",
    },
];

#[derive(Parser, Debug)]
#[command(name = "clicache")]
#[command(about = "clicache caches the STDOUT of a given command", long_about = None)]
#[command(disable_help_flag = true, disable_version_flag = true)]
pub struct Cli {
    #[arg(long = "h")]
    pub show_help: bool,

    #[arg(long = "del", conflicts_with = "purge")]
    pub delete: bool,

    #[arg(long = "purge")]
    pub purge: bool,

    #[arg(long = "v")]
    pub verbose: bool,

    #[arg(long = "c")]
    pub hash_cwd: bool,

    #[arg(long = "t", default_value = DEFAULT_BUCKET_WIDTH)]
    pub bucket: String,

    #[arg(long = "dir")]
    pub dir: Option<PathBuf>,

    /// Command to run and its arguments, kept as raw OS strings
    #[arg(
        trailing_var_arg = true,
        value_name = "COMMAND",
        value_parser = clap::value_parser!(OsString)
    )]
    pub command: Vec<OsString>,
}

impl Cli {
    fn mode(&self) -> Mode {
        if self.purge {
            Mode::Purge
        } else if self.delete {
            Mode::Delete
        } else {
            Mode::Run
        }
    }

    /// Build the immutable settings for this invocation
    pub fn settings(&self) -> Result<Settings> {
        let dir = self.dir.clone().unwrap_or_else(default_cache_dir);
        Ok(Settings::new(dir)
            .with_bucket(&self.bucket)?
            .with_mode(self.mode())
            .with_hash_cwd(self.hash_cwd)
            .with_verbose(self.verbose))
    }

    pub fn command_line(&self) -> CommandLine {
        CommandLine::from_vec(self.command.clone())
    }
}

/// What `main` should do
#[derive(Debug)]
pub enum Invocation {
    /// Print usage and exit 1, optionally after a parse error message
    Usage { error: Option<String> },
    Run(Cli),
}

/// Parse the process arguments, program name included
pub fn parse<I>(args: I) -> Invocation
where
    I: IntoIterator<Item = OsString>,
{
    let cli = match Cli::try_parse_from(normalize(args)) {
        Ok(cli) => cli,
        Err(e) => {
            let message = e.to_string();
            let first_line = message.lines().next().unwrap_or_default().to_string();
            return Invocation::Usage {
                error: Some(first_line),
            };
        }
    };

    if cli.show_help || (cli.command.is_empty() && cli.mode() != Mode::Purge) {
        return Invocation::Usage { error: None };
    }
    Invocation::Run(cli)
}

fn lookup_flag(name: &str) -> Option<&'static FlagSpec> {
    FLAGS.iter().find(|flag| flag.name == name)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

/// Rewrite known single-dash flags into `--name` form.
///
/// Stops at the first positional argument or a literal `--`; the rest is
/// passed through verbatim. Unknown flags are passed through for clap to
/// reject. Boolean flags accept `-name=false` to switch them off. A value
/// flag always takes the next word as its value, even one starting with `-`.
pub fn normalize<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut iter = args.into_iter();
    let mut out: Vec<OsString> = iter.next().into_iter().collect();

    while let Some(arg) = iter.next() {
        let Some(text) = arg.to_str() else {
            out.push(arg);
            break;
        };
        if text == "--" || text == "-" || !text.starts_with('-') {
            out.push(arg);
            break;
        }

        let body = text.strip_prefix("--").unwrap_or(&text[1..]);
        let (name, value) = match body.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (body, None),
        };
        let Some(flag) = lookup_flag(name) else {
            out.push(arg);
            continue;
        };

        match (flag.takes_value, value) {
            (true, Some(value)) => out.push(format!("--{name}={value}").into()),
            (true, None) => match iter.next() {
                Some(value) => {
                    let mut joined = OsString::from(format!("--{name}="));
                    joined.push(&value);
                    out.push(joined);
                }
                None => out.push(format!("--{name}").into()),
            },
            (false, None) => out.push(format!("--{name}").into()),
            (false, Some(value)) => match parse_bool(value) {
                Some(true) => out.push(format!("--{name}").into()),
                Some(false) => {}
                None => out.push(arg),
            },
        }
    }

    out.extend(iter);
    out
}

/// Usage text listing every flag with its default
pub fn usage() -> String {
    let mut text = String::from("clicache caches the STDOUT of a given command\n\n");
    text.push_str("Usage: clicache [flags] command [args...]\n\n");

    let default_dir = default_cache_dir();
    for flag in FLAGS {
        let default = match flag.name {
            "t" => Some(DEFAULT_BUCKET_WIDTH.to_string()),
            "dir" => Some(default_dir.display().to_string()),
            _ => None,
        };

        let _ = write!(text, "  -{}", flag.name);
        if flag.takes_value {
            text.push_str(" string");
        }
        if flag.name.len() == 1 && !flag.takes_value {
            text.push('\t');
        } else {
            text.push_str("\n    \t");
        }
        text.push_str(flag.usage);
        if let Some(default) = default {
            let _ = write!(text, " (default {default:?})");
        }
        text.push('\n');
    }
    text
}
