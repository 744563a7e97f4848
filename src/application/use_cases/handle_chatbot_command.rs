use std::sync::Arc;

use uuid::Uuid;

use crate::application::use_cases::imitate_user::{ImitateUserRequest, ImitateUserUseCase};
use crate::domain::entities::{ChatMessage, MessageBody, User};
use crate::domain::repositories::message_repository::NewChatMessage;
use crate::domain::repositories::{MessageRepository, UserRepository};
use crate::domain::value_objects::ChatbotCommand;

#[derive(Debug)]
pub enum ChatbotCommandError {
    RepositoryError(String),
}

impl std::fmt::Display for ChatbotCommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatbotCommandError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for ChatbotCommandError {}

#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// The message body did not match the command grammar.
    NotACommand,
    /// A reply row was written, either an answer or a chat-visible error.
    Replied(ChatMessage),
}

/// Runs the `@chatbot <username> <query>` pipeline for an incoming message.
///
/// Pipeline failures (unknown user, empty history, upstream errors) are
/// converted into an `Error: …` reply so the command always produces visible
/// feedback in the channel. Only failures to write the reply itself
/// propagate. Replies are not deduplicated; re-running the same command
/// inserts a fresh row.
pub struct HandleChatbotCommandUseCase {
    user_repository: Arc<dyn UserRepository>,
    message_repository: Arc<dyn MessageRepository>,
    imitate_user: Arc<ImitateUserUseCase>,
    chatbot: User,
}

impl HandleChatbotCommandUseCase {
    /// `chatbot` is the sentinel identity provisioned at startup; all
    /// synthetic replies are attributed to it.
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        message_repository: Arc<dyn MessageRepository>,
        imitate_user: Arc<ImitateUserUseCase>,
        chatbot: User,
    ) -> Self {
        Self {
            user_repository,
            message_repository,
            imitate_user,
            chatbot,
        }
    }

    pub async fn execute(
        &self,
        channel_id: Uuid,
        content: &str,
    ) -> Result<CommandOutcome, ChatbotCommandError> {
        let Some(command) = ChatbotCommand::parse(content) else {
            return Ok(CommandOutcome::NotACommand);
        };

        tracing::info!(
            "Handling chatbot command targeting {} in channel {}",
            command.target_username,
            channel_id
        );

        let body = match self.answer_command(&command).await {
            Ok(body) => body,
            Err(message) => {
                tracing::warn!("Chatbot command failed, replying with error: {}", message);
                MessageBody::text_only(format!("Error: {}", message))
            }
        };

        let reply = self
            .message_repository
            .insert(NewChatMessage {
                channel_id,
                user_id: Some(self.chatbot.id()),
                parent_id: None,
                body,
            })
            .await
            .map_err(|e| ChatbotCommandError::RepositoryError(e.to_string()))?;

        Ok(CommandOutcome::Replied(reply))
    }

    async fn answer_command(&self, command: &ChatbotCommand) -> Result<MessageBody, String> {
        let target = self
            .user_repository
            .find_by_name(&command.target_username)
            .await
            .map_err(|e| e.to_string())?
            .ok_or_else(|| format!("User \"{}\" not found.", command.target_username))?;

        let response = self
            .imitate_user
            .execute(ImitateUserRequest {
                user_id: target.id(),
                query: command.query.clone(),
                max_results: None,
            })
            .await
            .map_err(|e| e.to_string())?;

        Ok(MessageBody::imitating(
            response.answer,
            command.target_username.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use pgvector::Vector;
    use serde_json::json;

    use super::*;
    use crate::application::ports::chat_completion::{
        ChatCompletionError, ChatCompletionProvider, CompletionRequest,
    };
    use crate::application::ports::embedding_provider::{
        EmbeddingProvider, EmbeddingProviderError,
    };
    use crate::application::ports::vector_index::{
        MetadataFilter, VectorIndex, VectorIndexError, VectorMatch, VectorRecord,
    };
    use crate::application::services::{AnswerService, RetrievalService};
    use crate::domain::entities::CHATBOT_NAME;
    use crate::domain::repositories::message_repository::{
        MessageRepositoryError, MessageWithAuthor,
    };
    use crate::domain::repositories::user_repository::UserRepositoryError;

    struct RecordingMessageRepository {
        inserted: Mutex<Vec<ChatMessage>>,
    }

    impl RecordingMessageRepository {
        fn new() -> Self {
            Self {
                inserted: Mutex::new(Vec::new()),
            }
        }

        fn inserted(&self) -> Vec<ChatMessage> {
            self.inserted.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MessageRepository for RecordingMessageRepository {
        async fn insert(
            &self,
            new_message: NewChatMessage,
        ) -> Result<ChatMessage, MessageRepositoryError> {
            let message = ChatMessage::new(
                new_message.channel_id,
                new_message.user_id,
                new_message.parent_id,
                new_message.body,
            );
            self.inserted.lock().unwrap().push(message.clone());
            Ok(message)
        }

        async fn list_all_with_authors(
            &self,
        ) -> Result<Vec<MessageWithAuthor>, MessageRepositoryError> {
            Ok(Vec::new())
        }

        async fn increment_reply_count(
            &self,
            _message_id: Uuid,
        ) -> Result<(), MessageRepositoryError> {
            Ok(())
        }
    }

    struct FixedUserRepository {
        users: Vec<User>,
    }

    #[async_trait]
    impl UserRepository for FixedUserRepository {
        async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, UserRepositoryError> {
            Ok(self.users.iter().find(|u| u.id() == id).cloned())
        }

        async fn find_by_name(&self, name: &str) -> Result<Option<User>, UserRepositoryError> {
            Ok(self
                .users
                .iter()
                .find(|u| u.name().eq_ignore_ascii_case(name))
                .cloned())
        }

        async fn find_or_create(&self, name: &str) -> Result<User, UserRepositoryError> {
            Ok(self
                .users
                .iter()
                .find(|u| u.name() == name)
                .cloned()
                .unwrap_or_else(|| User::new(name.to_string())))
        }
    }

    struct FixedEmbeddingProvider;

    #[async_trait]
    impl EmbeddingProvider for FixedEmbeddingProvider {
        async fn embed(&self, _text: &str) -> Result<Vector, EmbeddingProviderError> {
            Ok(Vector::from(vec![0.5, 0.5, 0.5]))
        }

        fn embedding_dimension(&self) -> usize {
            3
        }
    }

    /// Returns canned matches only when the query filter targets the given
    /// user id, mimicking an index that holds that user's messages.
    struct FilteredVectorIndex {
        indexed_user: Uuid,
    }

    #[async_trait]
    impl VectorIndex for FilteredVectorIndex {
        async fn upsert(&self, _records: &[VectorRecord]) -> Result<(), VectorIndexError> {
            Ok(())
        }

        async fn query(
            &self,
            _vector: &Vector,
            _top_k: usize,
            filter: Option<&MetadataFilter>,
        ) -> Result<Vec<VectorMatch>, VectorIndexError> {
            let matches_user = filter
                .is_some_and(|f| f.field == "user_id" && f.value == json!(self.indexed_user.to_string()));

            if !matches_user {
                return Ok(Vec::new());
            }

            let metadata = match json!({
                "text": "I love durians and mangoes.",
                "user_name": "bob",
                "created_at": "2025-01-01T00:00:00+00:00",
            }) {
                serde_json::Value::Object(map) => map,
                _ => unreachable!(),
            };

            Ok(vec![VectorMatch {
                id: "seed-0".to_string(),
                score: 0.92,
                metadata,
            }])
        }

        async fn delete(&self, _ids: &[String]) -> Result<(), VectorIndexError> {
            Ok(())
        }

        async fn list_ids(&self) -> Result<Vec<String>, VectorIndexError> {
            Ok(Vec::new())
        }
    }

    struct CannedCompletionProvider;

    #[async_trait]
    impl ChatCompletionProvider for CannedCompletionProvider {
        async fn complete(
            &self,
            _request: CompletionRequest,
        ) -> Result<String, ChatCompletionError> {
            Ok("Durians are the king of fruits, mangoes a close second.".to_string())
        }
    }

    fn build_use_case(
        bob: &User,
        messages: Arc<RecordingMessageRepository>,
    ) -> HandleChatbotCommandUseCase {
        let chatbot = User::new(CHATBOT_NAME.to_string());
        let users: Arc<dyn UserRepository> = Arc::new(FixedUserRepository {
            users: vec![bob.clone(), chatbot.clone()],
        });

        let retrieval = Arc::new(RetrievalService::new(
            Arc::new(FixedEmbeddingProvider),
            Arc::new(FilteredVectorIndex {
                indexed_user: bob.id(),
            }),
        ));
        let answers = Arc::new(AnswerService::new(Arc::new(CannedCompletionProvider)));
        let imitate = Arc::new(ImitateUserUseCase::new(users.clone(), retrieval, answers));

        HandleChatbotCommandUseCase::new(users, messages, imitate, chatbot)
    }

    #[tokio::test]
    async fn test_command_produces_imitation_reply() {
        let bob = User::new("bob".to_string());
        let messages = Arc::new(RecordingMessageRepository::new());
        let use_case = build_use_case(&bob, messages.clone());
        let channel_id = Uuid::new_v4();

        let outcome = use_case
            .execute(channel_id, "@chatbot bob tell me about fruit")
            .await
            .unwrap();

        let CommandOutcome::Replied(reply) = outcome else {
            panic!("expected a reply");
        };
        assert_eq!(reply.channel_id(), channel_id);
        assert_eq!(reply.imitating_user(), Some("bob"));
        assert!(!reply.text().is_empty());
        assert_eq!(messages.inserted().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_user_becomes_chat_visible_error() {
        let bob = User::new("bob".to_string());
        let messages = Arc::new(RecordingMessageRepository::new());
        let use_case = build_use_case(&bob, messages.clone());

        let outcome = use_case
            .execute(Uuid::new_v4(), "@chatbot mallory what did I say")
            .await
            .unwrap();

        let CommandOutcome::Replied(reply) = outcome else {
            panic!("expected a reply");
        };
        assert_eq!(reply.text(), "Error: User \"mallory\" not found.");
        assert!(reply.imitating_user().is_none());
    }

    #[tokio::test]
    async fn test_user_without_history_gets_fallback_reply() {
        let bob = User::new("bob".to_string());
        // alice exists but has nothing indexed, so retrieval returns no
        // context and the reply degrades to an error message.
        let alice = User::new("alice".to_string());
        let messages = Arc::new(RecordingMessageRepository::new());

        let chatbot = User::new(CHATBOT_NAME.to_string());
        let users: Arc<dyn UserRepository> = Arc::new(FixedUserRepository {
            users: vec![bob.clone(), alice.clone(), chatbot.clone()],
        });
        let retrieval = Arc::new(RetrievalService::new(
            Arc::new(FixedEmbeddingProvider),
            Arc::new(FilteredVectorIndex {
                indexed_user: bob.id(),
            }),
        ));
        let answers = Arc::new(AnswerService::new(Arc::new(CannedCompletionProvider)));
        let imitate = Arc::new(ImitateUserUseCase::new(users.clone(), retrieval, answers));
        let use_case =
            HandleChatbotCommandUseCase::new(users, messages.clone(), imitate, chatbot);

        let outcome = use_case
            .execute(Uuid::new_v4(), "@chatbot alice any thoughts")
            .await
            .unwrap();

        let CommandOutcome::Replied(reply) = outcome else {
            panic!("expected a reply");
        };
        assert!(reply.text().starts_with("Error:"));
    }

    #[tokio::test]
    async fn test_non_command_writes_nothing() {
        let bob = User::new("bob".to_string());
        let messages = Arc::new(RecordingMessageRepository::new());
        let use_case = build_use_case(&bob, messages.clone());

        let outcome = use_case
            .execute(Uuid::new_v4(), "just a normal message")
            .await
            .unwrap();

        assert_eq!(outcome, CommandOutcome::NotACommand);
        assert!(messages.inserted().is_empty());
    }

    #[tokio::test]
    async fn test_repeated_commands_duplicate_replies() {
        let bob = User::new("bob".to_string());
        let messages = Arc::new(RecordingMessageRepository::new());
        let use_case = build_use_case(&bob, messages.clone());
        let channel_id = Uuid::new_v4();

        use_case
            .execute(channel_id, "@chatbot bob tell me about fruit")
            .await
            .unwrap();
        use_case
            .execute(channel_id, "@chatbot bob tell me about fruit")
            .await
            .unwrap();

        // Reply writes are not idempotent: identical invocations insert
        // distinct rows.
        let inserted = messages.inserted();
        assert_eq!(inserted.len(), 2);
        assert_ne!(inserted[0].id(), inserted[1].id());
    }
}
