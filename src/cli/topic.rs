//! Help topics and command tokens
//!
//! Tokens are matched case-insensitively and may be abbreviated to any prefix
//! of the full word, so `s`, `SERV` and `server` all name the server topic.

use std::fmt;

/// Documentation category selected by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Usage,
    Help,
    General,
    Server,
    Client,
    Metrics,
    Full,
}

impl Topic {
    /// Every topic, in the order the help subcommand lists them
    pub const ALL: [Topic; 7] = [
        Topic::Help,
        Topic::Usage,
        Topic::General,
        Topic::Client,
        Topic::Server,
        Topic::Metrics,
        Topic::Full,
    ];

    /// Full lowercase name of the topic
    pub fn name(self) -> &'static str {
        match self {
            Topic::Usage => "usage",
            Topic::Help => "help",
            Topic::General => "general",
            Topic::Server => "server",
            Topic::Client => "client",
            Topic::Metrics => "metrics",
            Topic::Full => "full",
        }
    }

    /// Resolve a possibly abbreviated token; `None` when nothing matches
    pub fn from_token(token: &str) -> Option<Topic> {
        Self::ALL
            .into_iter()
            .find(|topic| is_abbreviation(token, topic.name()))
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Top-level subcommand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    Server,
    Client,
}

impl Command {
    pub fn name(self) -> &'static str {
        match self {
            Command::Help => "help",
            Command::Server => "server",
            Command::Client => "client",
        }
    }

    pub fn from_token(token: &str) -> Option<Command> {
        [Command::Help, Command::Server, Command::Client]
            .into_iter()
            .find(|command| is_abbreviation(token, command.name()))
    }
}

/// True when `token` is a non-empty, case-insensitive prefix of `word`
pub(crate) fn is_abbreviation(token: &str, word: &str) -> bool {
    let token = token.trim().to_ascii_lowercase();
    !token.is_empty() && word.starts_with(&token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_names_resolve() {
        for topic in Topic::ALL {
            assert_eq!(Topic::from_token(topic.name()), Some(topic));
        }
    }

    #[test]
    fn test_single_letter_abbreviations() {
        assert_eq!(Topic::from_token("h"), Some(Topic::Help));
        assert_eq!(Topic::from_token("u"), Some(Topic::Usage));
        assert_eq!(Topic::from_token("g"), Some(Topic::General));
        assert_eq!(Topic::from_token("c"), Some(Topic::Client));
        assert_eq!(Topic::from_token("s"), Some(Topic::Server));
        assert_eq!(Topic::from_token("m"), Some(Topic::Metrics));
        assert_eq!(Topic::from_token("f"), Some(Topic::Full));
    }

    #[test]
    fn test_case_insensitive_prefixes() {
        assert_eq!(Topic::from_token("SERV"), Some(Topic::Server));
        assert_eq!(Topic::from_token("Metr"), Some(Topic::Metrics));
        assert_eq!(Topic::from_token("GeNeRaL"), Some(Topic::General));
    }

    #[test]
    fn test_unrecognised_tokens() {
        assert_eq!(Topic::from_token(""), None);
        assert_eq!(Topic::from_token("helpme"), None);
        assert_eq!(Topic::from_token("x"), None);
        assert_eq!(Topic::from_token("clientx"), None);
        assert_eq!(Topic::from_token("-h"), None);
    }

    #[test]
    fn test_command_tokens() {
        assert_eq!(Command::from_token("h"), Some(Command::Help));
        assert_eq!(Command::from_token("Serv"), Some(Command::Server));
        assert_eq!(Command::from_token("client"), Some(Command::Client));
        assert_eq!(Command::from_token("usage"), None);
        assert_eq!(Command::from_token(""), None);
    }

    #[test]
    fn test_display_uses_name() {
        assert_eq!(Topic::Metrics.to_string(), "metrics");
    }
}
