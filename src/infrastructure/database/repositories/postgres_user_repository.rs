use async_trait::async_trait;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::User;
use crate::domain::repositories::UserRepository;
use crate::domain::repositories::user_repository::UserRepositoryError;
use crate::infrastructure::database::models::{NewUserModel, UserModel};
use crate::infrastructure::database::schema::users;
use crate::infrastructure::database::{DbPool, get_connection_from_pool};

pub struct PostgresUserRepository {
    pool: DbPool,
}

impl PostgresUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| UserRepositoryError::DatabaseError(e.to_string()))?;

        let result = users::table
            .find(id)
            .first::<UserModel>(&mut conn)
            .optional()
            .map_err(|e| UserRepositoryError::DatabaseError(e.to_string()))?;

        Ok(result.map(User::from))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| UserRepositoryError::DatabaseError(e.to_string()))?;

        // ILIKE with no wildcards: case-insensitive exact match.
        let result = users::table
            .filter(users::name.ilike(name))
            .first::<UserModel>(&mut conn)
            .optional()
            .map_err(|e| UserRepositoryError::DatabaseError(e.to_string()))?;

        Ok(result.map(User::from))
    }

    async fn find_or_create(&self, name: &str) -> Result<User, UserRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| UserRepositoryError::DatabaseError(e.to_string()))?;

        // Relies on the unique constraint on users.name: concurrent callers
        // race on the insert, then both read the surviving row.
        diesel::insert_into(users::table)
            .values(&NewUserModel {
                name: name.to_string(),
            })
            .on_conflict(users::name)
            .do_nothing()
            .execute(&mut conn)
            .map_err(|e| UserRepositoryError::DatabaseError(e.to_string()))?;

        let user = users::table
            .filter(users::name.eq(name))
            .first::<UserModel>(&mut conn)
            .map_err(|e| UserRepositoryError::DatabaseError(e.to_string()))?;

        Ok(User::from(user))
    }
}
