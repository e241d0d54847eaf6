//! Bot command parsing.
//!
//! A command is the text following a trigger marker (`!topmusiccharts` or
//! `topmusiccharts!`) up to the end of its line, made of `name=value` actions:
//!
//! ```text
//! !topmusiccharts provider=all genre=edm amount=10
//! ```
//!
//! [`CommandParser::try_classify`] reports a structured outcome;
//! [`CommandParser::classify`] swallows command-level errors and only hands
//! back the text buffers.

use std::collections::BTreeSet;

use thiserror::Error;
use tracing::debug;

use crate::config::BotSettings;

/// Action names understood by the bot
pub const DEFAULT_ACTIONS: [&str; 5] = ["provider", "genre", "hype", "order", "amount"];

/// A command found in a comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Marker through the end of its line
    pub text: String,
    /// Everything after the marker
    pub body: String,
}

impl Command {
    /// A command without a marker, e.g. typed on the command line.
    pub fn from_body(body: impl Into<String>) -> Self {
        let body = body.into();
        Self {
            text: body.clone(),
            body,
        }
    }
}

/// One `name=value` unit of a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionToken {
    pub name: String,
    pub value: String,
}

impl ActionToken {
    /// Output of running this action. Actions don't do anything yet, so this
    /// echoes the action back.
    pub fn execute(&self) -> String {
        format!("{}={}\n", self.name, self.value)
    }
}

/// A well-formed action, checked against the vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Valid(ActionToken),
    Invalid(ActionToken),
}

/// Outcome of classifying a command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// Well-formed actions in command order
    pub actions: Vec<Action>,
    /// Chunks without exactly one action separator
    pub malformed: Vec<String>,
    /// Output of the valid actions, in command order
    pub valid_string: String,
    /// Not rendered yet; see `actions` for the invalid tokens
    pub invalid_string: String,
    /// Not rendered yet; see `malformed` for the chunks
    pub badformat_string: String,
}

impl Classification {
    pub fn valid(&self) -> impl Iterator<Item = &ActionToken> {
        self.actions.iter().filter_map(|action| match action {
            Action::Valid(token) => Some(token),
            Action::Invalid(_) => None,
        })
    }

    pub fn invalid(&self) -> impl Iterator<Item = &ActionToken> {
        self.actions.iter().filter_map(|action| match action {
            Action::Invalid(token) => Some(token),
            Action::Valid(_) => None,
        })
    }
}

/// Command-level rejections.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("The command is empty")]
    Empty,

    #[error("No well-formed action in command: {chunks:?}")]
    Invalid { chunks: Vec<String> },
}

/// Finds and classifies bot commands.
#[derive(Debug, Clone)]
pub struct CommandParser {
    trigger: String,
    vocabulary: BTreeSet<String>,
    action_separator: char,
    command_separator: Option<char>,
}

impl Default for CommandParser {
    fn default() -> Self {
        Self {
            trigger: "topmusiccharts".to_string(),
            vocabulary: DEFAULT_ACTIONS.iter().map(|a| a.to_string()).collect(),
            action_separator: '=',
            command_separator: None,
        }
    }
}

impl CommandParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_settings(settings: &BotSettings) -> Self {
        Self::new()
            .with_trigger(&settings.trigger)
            .with_action_separator(settings.action_separator)
            .with_command_separator(settings.command_separator)
    }

    pub fn with_trigger(mut self, trigger: &str) -> Self {
        self.trigger = trigger.to_string();
        self
    }

    pub fn with_vocabulary<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.vocabulary = actions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_action_separator(mut self, separator: char) -> Self {
        self.action_separator = separator;
        self
    }

    /// `None` splits on any whitespace.
    pub fn with_command_separator(mut self, separator: Option<char>) -> Self {
        self.command_separator = separator;
        self
    }

    pub fn trigger(&self) -> &str {
        &self.trigger
    }

    /// Find the first trigger marker in `raw` and return the command it starts.
    ///
    /// The trigger name is matched case-sensitively here, while
    /// [`Bot::is_trigger`](crate::bot::Bot::is_trigger) matches it
    /// case-insensitively.
    pub fn parse_command(&self, raw: &str) -> Option<Command> {
        let prefixed = format!("!{}", self.trigger);
        let suffixed = format!("{}!", self.trigger);

        let (start, marker_len) = [&prefixed, &suffixed]
            .into_iter()
            .filter_map(|marker| raw.find(marker.as_str()).map(|at| (at, marker.len())))
            .min_by_key(|(at, _)| *at)?;

        let line = &raw[start..];
        let line = match line.find(['\n', '\r']) {
            Some(end) => &line[..end],
            None => line,
        };

        Some(Command {
            text: line.to_string(),
            body: line[marker_len..].trim().to_string(),
        })
    }

    /// Split a command into actions and check them against the vocabulary.
    pub fn try_classify(&self, command: &Command) -> Result<Classification, CommandError> {
        if command.body.is_empty() {
            return Err(CommandError::Empty);
        }

        let chunks: Vec<&str> = match self.command_separator {
            Some(separator) => command.body.split(separator).collect(),
            None => command.body.split_whitespace().collect(),
        };

        let (well_formed, malformed): (Vec<&str>, Vec<&str>) = chunks
            .into_iter()
            .partition(|chunk| chunk.matches(self.action_separator).count() == 1);

        if well_formed.is_empty() {
            return Err(CommandError::Invalid {
                chunks: malformed.into_iter().map(str::to_string).collect(),
            });
        }

        let mut classification = Classification {
            malformed: malformed.into_iter().map(str::to_string).collect(),
            ..Default::default()
        };

        for chunk in well_formed {
            let Some((name, value)) = chunk.split_once(self.action_separator) else {
                continue;
            };
            let token = ActionToken {
                name: name.to_string(),
                value: value.to_string(),
            };

            if self.vocabulary.contains(name) {
                classification.valid_string.push_str(&token.execute());
                classification.actions.push(Action::Valid(token));
            } else {
                classification.actions.push(Action::Invalid(token));
            }
        }

        Ok(classification)
    }

    /// Like [`try_classify`](Self::try_classify), but a rejected command yields an
    /// empty classification.
    pub fn classify(&self, command: &Command) -> Classification {
        self.try_classify(command).unwrap_or_else(|e| {
            debug!("Ignoring command '{}': {}", command.text, e);
            Classification::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(text: &str) -> Command {
        Command::from_body(text)
    }

    #[test]
    fn test_parse_prefixed_marker() {
        let parser = CommandParser::new();
        let command = parser
            .parse_command("hey !topmusiccharts genre=house\nthanks")
            .unwrap();

        assert_eq!(command.text, "!topmusiccharts genre=house");
        assert_eq!(command.body, "genre=house");
    }

    #[test]
    fn test_parse_suffixed_marker() {
        let parser = CommandParser::new();
        let command = parser.parse_command("topmusiccharts! amount=5").unwrap();

        assert_eq!(command.body, "amount=5");
    }

    #[test]
    fn test_parse_earliest_marker_wins() {
        let parser = CommandParser::new();
        let command = parser
            .parse_command("topmusiccharts! a=1 then !topmusiccharts b=2")
            .unwrap();

        assert_eq!(command.body, "a=1 then !topmusiccharts b=2");
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        let parser = CommandParser::new();
        assert!(parser.parse_command("!TopMusicCharts genre=house").is_none());
        assert!(parser.parse_command("no command here").is_none());
    }

    #[test]
    fn test_parse_marker_only() {
        let parser = CommandParser::new();
        let command = parser.parse_command("!topmusiccharts\nmore").unwrap();
        assert_eq!(command.body, "");
    }

    #[test]
    fn test_classify_mixed_command() {
        let parser = CommandParser::new();
        let result = parser
            .try_classify(&body("provider=all genre=edm badtoken"))
            .unwrap();

        let valid: Vec<_> = result.valid().map(|t| t.name.as_str()).collect();
        assert_eq!(valid, vec!["provider", "genre"]);
        assert_eq!(result.malformed, vec!["badtoken"]);
        assert_eq!(result.valid_string, "provider=all\ngenre=edm\n");
        assert!(result.invalid_string.is_empty());
        assert!(result.badformat_string.is_empty());
    }

    #[test]
    fn test_classify_empty_command() {
        let parser = CommandParser::new();
        assert_eq!(parser.try_classify(&body("")), Err(CommandError::Empty));
        assert_eq!(parser.classify(&body("")), Classification::default());
    }

    #[test]
    fn test_classify_unknown_action() {
        let parser = CommandParser::new();
        let result = parser.classify(&body("foo=bar"));

        let invalid: Vec<_> = result.invalid().cloned().collect();
        assert_eq!(
            invalid,
            vec![ActionToken {
                name: "foo".to_string(),
                value: "bar".to_string()
            }]
        );
        assert!(result.valid_string.is_empty());
        // Invalid actions are tracked but not rendered.
        assert!(result.invalid_string.is_empty());
    }

    #[test]
    fn test_classify_all_malformed() {
        let parser = CommandParser::new();
        let command = body("genre order==top");

        assert_eq!(
            parser.try_classify(&command),
            Err(CommandError::Invalid {
                chunks: vec!["genre".to_string(), "order==top".to_string()]
            })
        );
        assert_eq!(parser.classify(&command), Classification::default());
    }

    #[test]
    fn test_classify_custom_separators() {
        let parser = CommandParser::new()
            .with_action_separator(':')
            .with_command_separator(Some(','));
        let result = parser.try_classify(&body("genre:house,amount:5")).unwrap();

        assert_eq!(result.valid().count(), 2);
        assert_eq!(result.valid_string, "genre=house\namount=5\n");
    }

    #[test]
    fn test_custom_vocabulary() {
        let parser = CommandParser::new().with_vocabulary(["genre"]);
        let result = parser.classify(&body("genre=house provider=all"));

        assert_eq!(result.valid().count(), 1);
        assert_eq!(result.invalid().count(), 1);
    }

    #[test]
    fn test_from_settings() {
        let settings = BotSettings {
            trigger: "charts".to_string(),
            ..BotSettings::default()
        };
        let parser = CommandParser::from_settings(&settings);

        assert_eq!(parser.trigger(), "charts");
        assert!(parser.parse_command("!charts genre=house").is_some());
    }
}
