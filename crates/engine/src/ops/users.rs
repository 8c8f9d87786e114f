use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};

use crate::{EngineError, ResultEngine, UserNew, organizations, users};

use super::{Engine, with_tx};

impl Engine {
    /// Registers a new user. Fails if the email is already taken.
    pub async fn create_user(&self, cmd: UserNew) -> ResultEngine<users::Model> {
        with_tx!(self, |db_tx| {
            let existing = users::Entity::find()
                .filter(users::Column::Email.eq(cmd.email.clone()))
                .one(&db_tx)
                .await?;
            if existing.is_some() {
                return Err(EngineError::ExistingKey(cmd.email));
            }

            let now = Utc::now();
            let active = users::ActiveModel {
                id: ActiveValue::NotSet,
                name: ActiveValue::Set(cmd.name),
                email: ActiveValue::Set(cmd.email),
                password: ActiveValue::Set(cmd.password),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
            };
            let model = active.insert(&db_tx).await?;
            Ok(model)
        })
    }

    pub async fn find_user_by_id(&self, user_id: i32) -> ResultEngine<users::Model> {
        with_tx!(self, |db_tx| self.require_user(&db_tx, user_id).await)
    }

    pub async fn find_organization_by_unique_name(
        &self,
        unique_name: &str,
    ) -> ResultEngine<organizations::Model> {
        with_tx!(self, |db_tx| {
            organizations::Entity::find()
                .filter(organizations::Column::UniqueName.eq(unique_name.to_string()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(format!("organization {unique_name} not exists")))
        })
    }
}
