use std::sync::Arc;

use crate::{
    application::{
        ports::{ChatCompletionProvider, EmbeddingProvider, VectorIndex},
        services::{AnswerService, RetrievalService},
        use_cases::{
            HandleChatbotCommandUseCase, ImitateUserUseCase, PostMessageUseCase,
            ReindexMessagesUseCase, SearchHistoryUseCase,
        },
    },
    domain::entities::user::CHATBOT_NAME,
    domain::repositories::{MessageRepository, UserRepository},
    infrastructure::{
        database::{
            create_connection_pool, get_connection_from_pool,
            repositories::{PostgresMessageRepository, PostgresUserRepository},
            run_migrations,
        },
        external_services::{OpenAiCompletionsClient, OpenAiEmbeddingsClient, PineconeIndexClient},
    },
    presentation::http::handlers::{ChatHandler, IndexHandler, MessageHandler},
};

pub struct AppContainer {
    // Repositories
    pub message_repository: Arc<dyn MessageRepository>,
    pub user_repository: Arc<dyn UserRepository>,

    // External services
    pub embedding_provider: Arc<dyn EmbeddingProvider>,
    pub completion_provider: Arc<dyn ChatCompletionProvider>,
    pub vector_index: Arc<dyn VectorIndex>,

    // Application services
    pub retrieval_service: Arc<RetrievalService>,
    pub answer_service: Arc<AnswerService>,

    // Use cases
    pub search_history_use_case: Arc<SearchHistoryUseCase>,
    pub imitate_user_use_case: Arc<ImitateUserUseCase>,
    pub chatbot_command_use_case: Arc<HandleChatbotCommandUseCase>,
    pub post_message_use_case: Arc<PostMessageUseCase>,
    pub reindex_use_case: Arc<ReindexMessagesUseCase>,

    // HTTP handlers
    pub chat_handler: Arc<ChatHandler>,
    pub message_handler: Arc<MessageHandler>,
    pub index_handler: Arc<IndexHandler>,
}

impl AppContainer {
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let db_pool = create_connection_pool()?;
        let mut conn = get_connection_from_pool(&db_pool)
            .map_err(|e| format!("Failed to create database connection: {}", e))?;
        run_migrations(&mut conn).map_err(|e| format!("Failed to run migrations: {}", e))?;
        drop(conn);

        // Repositories
        let message_repository: Arc<dyn MessageRepository> =
            Arc::new(PostgresMessageRepository::new(db_pool.clone()));
        let user_repository: Arc<dyn UserRepository> =
            Arc::new(PostgresUserRepository::new(db_pool));

        // The chatbot's sentinel identity must exist before any command can
        // be answered; provision it once here rather than lazily per request.
        let chatbot = user_repository.find_or_create(CHATBOT_NAME).await?;
        tracing::info!("Chatbot user provisioned with id {}", chatbot.id());

        // External services
        let embedding_provider: Arc<dyn EmbeddingProvider> =
            Arc::new(OpenAiEmbeddingsClient::from_env()?);
        let completion_provider: Arc<dyn ChatCompletionProvider> =
            Arc::new(OpenAiCompletionsClient::from_env()?);
        let vector_index: Arc<dyn VectorIndex> = Arc::new(PineconeIndexClient::from_env()?);

        // Application services
        let retrieval_service = Arc::new(RetrievalService::new(
            embedding_provider.clone(),
            vector_index.clone(),
        ));
        let answer_service = Arc::new(AnswerService::new(completion_provider.clone()));

        // Use cases
        let search_history_use_case = Arc::new(SearchHistoryUseCase::new(
            retrieval_service.clone(),
            answer_service.clone(),
        ));
        let imitate_user_use_case = Arc::new(ImitateUserUseCase::new(
            user_repository.clone(),
            retrieval_service.clone(),
            answer_service.clone(),
        ));
        let chatbot_command_use_case = Arc::new(HandleChatbotCommandUseCase::new(
            user_repository.clone(),
            message_repository.clone(),
            imitate_user_use_case.clone(),
            chatbot,
        ));
        let post_message_use_case = Arc::new(PostMessageUseCase::new(
            message_repository.clone(),
            chatbot_command_use_case.clone(),
        ));
        let reindex_use_case = Arc::new(ReindexMessagesUseCase::new(
            message_repository.clone(),
            embedding_provider.clone(),
            vector_index.clone(),
        ));

        // HTTP handlers
        let chat_handler = Arc::new(ChatHandler::new(
            search_history_use_case.clone(),
            imitate_user_use_case.clone(),
        ));
        let message_handler = Arc::new(MessageHandler::new(post_message_use_case.clone()));
        let index_handler = Arc::new(IndexHandler::new(reindex_use_case.clone()));

        Ok(Self {
            message_repository,
            user_repository,
            embedding_provider,
            completion_provider,
            vector_index,
            retrieval_service,
            answer_service,
            search_history_use_case,
            imitate_user_use_case,
            chatbot_command_use_case,
            post_message_use_case,
            reindex_use_case,
            chat_handler,
            message_handler,
            index_handler,
        })
    }
}
