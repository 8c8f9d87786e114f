use chrono::Utc;
use sea_orm::{ActiveValue, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{EngineError, MemberRole, ResultEngine, memberships, users};

use super::{Engine, with_tx};

impl Engine {
    /// Adds a user to an organization with the given role.
    ///
    /// The `(user, organization)` pair is unique; adding an existing member
    /// fails with `ExistingKey`.
    pub async fn add_member(
        &self,
        organization_id: i32,
        user_id: i32,
        role: &str,
    ) -> ResultEngine<memberships::Model> {
        let role = MemberRole::try_from(role)?;
        with_tx!(self, |db_tx| {
            self.require_organization(&db_tx, organization_id).await?;
            self.require_user(&db_tx, user_id).await?;

            let existing = memberships::Entity::find_by_id((user_id, organization_id))
                .one(&db_tx)
                .await?;
            if existing.is_some() {
                return Err(EngineError::ExistingKey(format!(
                    "user {user_id} in organization {organization_id}"
                )));
            }

            let membership = memberships::ActiveModel {
                user_id: ActiveValue::Set(user_id),
                organization_id: ActiveValue::Set(organization_id),
                role: ActiveValue::Set(role.as_str().to_string()),
                created_at: ActiveValue::Set(Utc::now()),
            }
            .insert(&db_tx)
            .await?;
            Ok(membership)
        })
    }

    /// Removes a member. The last owner of an organization cannot leave.
    pub async fn remove_member(&self, organization_id: i32, user_id: i32) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let membership = self.require_member(&db_tx, organization_id, user_id).await?;

            if membership.role == MemberRole::Owner.as_str() {
                let owners = memberships::Entity::find()
                    .filter(memberships::Column::OrganizationId.eq(organization_id))
                    .filter(memberships::Column::Role.eq(MemberRole::Owner.as_str()))
                    .count(&db_tx)
                    .await?;
                if owners <= 1 {
                    return Err(EngineError::InvalidRole(
                        "cannot remove the last owner".to_string(),
                    ));
                }
            }

            memberships::Entity::delete_by_id((user_id, organization_id))
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// Resolves the role a user holds in an organization.
    ///
    /// A non-member gets `KeyNotFound`, the same answer as for an
    /// organization that does not exist.
    pub async fn member_role(
        &self,
        organization_id: i32,
        user_id: i32,
    ) -> ResultEngine<MemberRole> {
        with_tx!(self, |db_tx| {
            let membership = self.require_member(&db_tx, organization_id, user_id).await?;
            MemberRole::try_from(membership.role.as_str())
        })
    }

    /// Lists an organization's members with their roles.
    pub async fn list_members(
        &self,
        organization_id: i32,
    ) -> ResultEngine<Vec<(users::Model, MemberRole)>> {
        with_tx!(self, |db_tx| {
            self.require_organization(&db_tx, organization_id).await?;

            let rows: Vec<(memberships::Model, Option<users::Model>)> =
                memberships::Entity::find()
                    .filter(memberships::Column::OrganizationId.eq(organization_id))
                    .find_also_related(users::Entity)
                    .order_by_asc(memberships::Column::UserId)
                    .all(&db_tx)
                    .await?;

            let mut out = Vec::with_capacity(rows.len());
            for (membership, user) in rows {
                let Some(user) = user else { continue };
                out.push((user, MemberRole::try_from(membership.role.as_str())?));
            }
            Ok(out)
        })
    }
}
