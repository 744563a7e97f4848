pub mod postgres_message_repository;
pub mod postgres_user_repository;

pub use postgres_message_repository::PostgresMessageRepository;
pub use postgres_user_repository::PostgresUserRepository;
