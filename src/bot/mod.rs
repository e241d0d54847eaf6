//! Comment bot: picks up trigger comments and builds chart replies.
//!
//! ```text
//! CommentListing → Dispatcher (bounded queue, N workers) → Bot::handle → Reply
//! ```
//!
//! Fetching comments and posting replies belong to the caller; this module only
//! decides which comments to answer and what to answer with.

mod dispatcher;
mod seen;

pub use dispatcher::{spawn_dispatcher, DispatchError, Dispatcher, DispatcherHandle};
pub use seen::SeenComments;

use crate::command::CommandParser;
use crate::config::BotSettings;
use crate::domain::Comment;

/// Footer appended to every reply
pub const END_MESSAGE: &str = concat!(
    "\n\n_______\n\n",
    "|[^(FAQs)](/r/TopMusicCharts/comments/50d7zl/topmusiccharts_bot_info/)",
    "|[^(Commands)](/r/TopMusicCharts/comments/)",
    "|[^(Feedback)](/message/compose/?to=TopMusicCharts&subject=Feedback)",
    "\n|-|-|-|-|-|-|"
);

/// A reply to post under a comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub comment_id: String,
    pub body: String,
}

pub struct Bot {
    parser: CommandParser,
    username: String,
    seen: SeenComments,
}

impl Bot {
    pub fn new(parser: CommandParser, username: impl Into<String>) -> Self {
        Self {
            parser,
            username: username.into(),
            seen: SeenComments::new(),
        }
    }

    pub fn from_settings(settings: &BotSettings) -> Self {
        Self::new(CommandParser::from_settings(settings), &settings.username)
    }

    pub fn seen(&self) -> &SeenComments {
        &self.seen
    }

    /// Whether `comment` mentions the trigger (in any case) and was written by
    /// someone other than the bot.
    pub fn mentions_trigger(&self, comment: &Comment) -> bool {
        let body = comment.body.to_lowercase();
        let trigger = self.parser.trigger().to_lowercase();

        let mentioned =
            body.contains(&format!("{}!", trigger)) || body.contains(&format!("!{}", trigger));

        mentioned && comment.author != self.username
    }

    /// Whether `comment` should be answered. A comment is accepted only the first
    /// time it is offered.
    pub fn is_trigger(&self, comment: &Comment) -> bool {
        self.mentions_trigger(comment) && self.seen.mark(&comment.id)
    }

    /// Build the reply for `comment`, if it carries a command.
    pub fn handle(&self, comment: &Comment) -> Option<Reply> {
        let command = self.parser.parse_command(&comment.body)?;
        let classification = self.parser.classify(&command);

        Some(Reply {
            comment_id: comment.id.clone(),
            body: Self::build_reply(&classification.valid_string),
        })
    }

    pub fn build_reply(message: &str) -> String {
        format!("{}{}", message, END_MESSAGE)
    }
}
