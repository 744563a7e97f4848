use std::sync::OnceLock;

use regex::Regex;

/// A parsed `@chatbot <username> <query>` invocation.
///
/// The username is a single non-whitespace token; names containing spaces
/// cannot be addressed with this grammar and fail to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatbotCommand {
    pub target_username: String,
    pub query: String,
}

fn command_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^@chatbot\s+(\S+)\s+(.+)$").expect("command pattern is valid")
    })
}

impl ChatbotCommand {
    /// Recognizes the command grammar in a message body. Returns `None` for
    /// anything that is not a well-formed invocation; this includes
    /// malformed commands with a missing query.
    pub fn parse(content: &str) -> Option<Self> {
        let captures = command_pattern().captures(content)?;

        Some(Self {
            target_username: captures[1].to_string(),
            query: captures[2].trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_basic_command() {
        let command = ChatbotCommand::parse("@chatbot alice what's the weather").unwrap();

        assert_eq!(command.target_username, "alice");
        assert_eq!(command.query, "what's the weather");
    }

    #[test]
    fn test_case_insensitive_prefix() {
        let command = ChatbotCommand::parse("@ChatBot Bob tell me about fruit").unwrap();

        assert_eq!(command.target_username, "Bob");
        assert_eq!(command.query, "tell me about fruit");
    }

    #[test]
    fn test_non_commands_return_none() {
        assert_eq!(ChatbotCommand::parse("hello everyone"), None);
        assert_eq!(ChatbotCommand::parse("chatbot alice hi"), None);
        assert_eq!(ChatbotCommand::parse("say @chatbot alice hi"), None);
    }

    #[test]
    fn test_missing_query_is_not_a_command() {
        assert_eq!(ChatbotCommand::parse("@chatbot"), None);
        assert_eq!(ChatbotCommand::parse("@chatbot alice"), None);
        assert_eq!(ChatbotCommand::parse("@chatbot alice "), None);
    }

    #[test]
    fn test_username_is_first_token_only() {
        let command = ChatbotCommand::parse("@chatbot mary jane what did I say").unwrap();

        // A name with spaces cannot be expressed; "jane" becomes part of the
        // query.
        assert_eq!(command.target_username, "mary");
        assert_eq!(command.query, "jane what did I say");
    }
}
