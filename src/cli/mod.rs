//! Command-line interface module with the topic help system

pub mod help;
pub mod topic;

pub use help::{HelpExit, HelpSystem};
pub use topic::{Command, Topic};

use clap::Parser;
use std::path::PathBuf;

/// Network performance test utility
///
/// Everything after the command word is collected verbatim so that the
/// abbreviated `-opt` style arguments of the subcommands reach the help
/// dispatcher untouched.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "nwtest")]
#[command(about, long_about = None)]
#[command(disable_help_flag = true, disable_version_flag = true, disable_help_subcommand = true)]
pub struct Cli {
    /// Force colored diagnostics
    #[arg(long)]
    pub color: bool,

    /// Disable colored diagnostics
    #[arg(long)]
    pub no_color: bool,

    /// Enable debug diagnostics on stderr
    #[arg(long)]
    pub debug: bool,

    /// Read settings from this file instead of ./.env
    #[arg(long, value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    /// Command word: h[elp], s[erver] or c[lient]
    #[arg(value_name = "COMMAND")]
    pub command: Option<String>,

    /// Arguments of the command
    #[arg(value_name = "ARGS", trailing_var_arg = true, allow_hyphen_values = true, num_args = 0..)]
    pub args: Vec<String>,
}

impl Cli {
    /// Validate CLI arguments for conflicts
    pub fn validate(&self) -> Result<(), String> {
        if self.color && self.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }
        Ok(())
    }

    /// Move global flags written after the command word out of `args`
    ///
    /// Subcommand options use a single dash, so only the double-dash global
    /// flags are taken.
    pub fn hoist_global_flags(mut self) -> Self {
        let mut args = Vec::with_capacity(self.args.len());
        let mut rest = std::mem::take(&mut self.args).into_iter();

        while let Some(arg) = rest.next() {
            match arg.as_str() {
                "--debug" => self.debug = true,
                "--color" => self.color = true,
                "--no-color" => self.no_color = true,
                "--env-file" => match rest.next() {
                    Some(path) => self.env_file = Some(PathBuf::from(path)),
                    None => args.push(arg),
                },
                _ => match arg.strip_prefix("--env-file=") {
                    Some(path) => self.env_file = Some(PathBuf::from(path)),
                    None => args.push(arg),
                },
            }
        }

        self.args = args;
        self
    }

    /// Resolved command word, if any
    pub fn command(&self) -> Option<Command> {
        self.command.as_deref().and_then(Command::from_token)
    }

    /// Topic to display
    ///
    /// Only `help <topic>` names a topic. A bare `help`, an unknown topic and
    /// any other command all resolve to `None`, which displays usage.
    pub fn requested_topic(&self) -> Option<Topic> {
        match self.command() {
            Some(Command::Help) => self.args.first().and_then(|token| Topic::from_token(token)),
            _ => None,
        }
    }

    /// Check if colors should be enabled for diagnostics
    pub fn use_colors(&self) -> bool {
        if self.color {
            true
        } else if self.no_color {
            false
        } else {
            supports_color()
        }
    }
}

/// Check if stderr is likely to render ANSI colors
fn supports_color() -> bool {
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    #[cfg(target_os = "windows")]
    {
        if std::env::var("ANSICON").is_ok() || std::env::var("ConEmuANSI").is_ok() {
            return true;
        }
    }

    cfg!(unix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("nwtest").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_parsing_basic() {
        let cli = parse(&[]);
        assert!(cli.command.is_none());
        assert!(cli.args.is_empty());
        assert!(!cli.debug);
        assert_eq!(cli.requested_topic(), None);
    }

    #[test]
    fn test_help_topic_resolution() {
        assert_eq!(parse(&["help", "server"]).requested_topic(), Some(Topic::Server));
        assert_eq!(parse(&["h", "m"]).requested_topic(), Some(Topic::Metrics));
        assert_eq!(parse(&["HELP", "Full"]).requested_topic(), Some(Topic::Full));
        assert_eq!(parse(&["help", "u"]).requested_topic(), Some(Topic::Usage));
    }

    #[test]
    fn test_unknown_topics_fall_back() {
        assert_eq!(parse(&["help"]).requested_topic(), None);
        assert_eq!(parse(&["help", "bogus"]).requested_topic(), None);
        assert_eq!(parse(&["nonsense"]).requested_topic(), None);
    }

    #[test]
    fn test_subcommand_arguments_are_collected() {
        let cli = parse(&["client", "localhost", "9000", "-d", "30", "-nodelay"]);
        assert_eq!(cli.command(), Some(Command::Client));
        assert_eq!(cli.args, vec!["localhost", "9000", "-d", "30", "-nodelay"]);
        assert_eq!(cli.requested_topic(), None);

        let cli = parse(&["s", "9000", "-4"]);
        assert_eq!(cli.command(), Some(Command::Server));
        assert_eq!(cli.requested_topic(), None);
    }

    #[test]
    fn test_global_flags() {
        let cli = parse(&["--debug", "--no-color", "--env-file", "custom.env", "help", "c"]);
        assert!(cli.debug);
        assert!(!cli.use_colors());
        assert_eq!(cli.env_file, Some(PathBuf::from("custom.env")));
        assert_eq!(cli.requested_topic(), Some(Topic::Client));
    }

    #[test]
    fn test_trailing_global_flags_are_hoisted() {
        let cli = parse(&["help", "server", "--debug", "--no-color", "--env-file=alt.env"])
            .hoist_global_flags();
        assert!(cli.debug);
        assert!(cli.no_color);
        assert_eq!(cli.env_file, Some(PathBuf::from("alt.env")));
        assert_eq!(cli.args, vec!["server"]);
        assert_eq!(cli.requested_topic(), Some(Topic::Server));

        let cli = parse(&["c", "host", "9000", "-d", "5", "--env-file", "x.env"]).hoist_global_flags();
        assert_eq!(cli.args, vec!["host", "9000", "-d", "5"]);
        assert_eq!(cli.env_file, Some(PathBuf::from("x.env")));
        assert!(!cli.debug);
    }

    #[test]
    fn test_dangling_env_file_flag_is_kept() {
        let cli = parse(&["help", "m", "--env-file"]).hoist_global_flags();
        assert_eq!(cli.env_file, None);
        assert_eq!(cli.args, vec!["m", "--env-file"]);
        assert_eq!(cli.requested_topic(), Some(Topic::Metrics));
    }

    #[test]
    fn test_help_flag_is_not_intercepted() {
        assert!(Cli::try_parse_from(["nwtest", "--help"]).is_err());
        assert!(Cli::try_parse_from(["nwtest", "--version"]).is_err());
    }

    #[test]
    fn test_cli_validation() {
        let cli = parse(&["--color", "--no-color"]);
        assert!(cli.validate().is_err());
        assert!(parse(&["--color"]).validate().is_ok());
        assert!(parse(&["--color"]).use_colors());
    }
}
