use chrono::Utc;
use sea_orm::{ActiveValue, PaginatorTrait, QueryFilter, TransactionTrait, prelude::*};

use crate::{
    EngineError, MemberRole, OrganizationNew, OrganizationPatch, ResultEngine, categories,
    invoices, memberships, organizations,
};

use super::{Engine, with_tx};

impl Engine {
    /// Creates an organization and joins the creator as its first member.
    ///
    /// Organization insert and creator membership commit in the same
    /// transaction. The `unique_name` lookup is only a fast path for a
    /// friendly conflict message; the unique index on the column is what
    /// serializes two racing creations, surfacing as a `Database` error for
    /// the loser that slipped past the check.
    pub async fn create_organization(
        &self,
        cmd: OrganizationNew,
        creator_user_id: i32,
    ) -> ResultEngine<(organizations::Model, memberships::Model)> {
        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, creator_user_id).await?;

            let taken = organizations::Entity::find()
                .filter(organizations::Column::UniqueName.eq(cmd.unique_name.clone()))
                .one(&db_tx)
                .await?;
            if taken.is_some() {
                return Err(EngineError::ExistingKey(cmd.unique_name));
            }

            let now = Utc::now();
            let organization = organizations::ActiveModel {
                id: ActiveValue::NotSet,
                name: ActiveValue::Set(cmd.name),
                unique_name: ActiveValue::Set(cmd.unique_name),
                phone: ActiveValue::Set(String::new()),
                address: ActiveValue::Set(String::new()),
                date_format: ActiveValue::Set(String::new()),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
            }
            .insert(&db_tx)
            .await?;

            let membership = memberships::ActiveModel {
                user_id: ActiveValue::Set(creator_user_id),
                organization_id: ActiveValue::Set(organization.id),
                role: ActiveValue::Set(MemberRole::Owner.as_str().to_string()),
                created_at: ActiveValue::Set(now),
            }
            .insert(&db_tx)
            .await?;

            Ok((organization, membership))
        })
    }

    /// Applies a partial update to an organization.
    ///
    /// `None` fields stay untouched; an explicit empty string overwrites.
    pub async fn update_organization(
        &self,
        organization_id: i32,
        patch: OrganizationPatch,
    ) -> ResultEngine<organizations::Model> {
        with_tx!(self, |db_tx| {
            let current = self.require_organization(&db_tx, organization_id).await?;

            if let Some(unique_name) = patch.unique_name.as_ref()
                && *unique_name != current.unique_name
            {
                let taken = organizations::Entity::find()
                    .filter(organizations::Column::UniqueName.eq(unique_name.clone()))
                    .one(&db_tx)
                    .await?;
                if taken.is_some() {
                    return Err(EngineError::ExistingKey(unique_name.clone()));
                }
            }

            let mut active: organizations::ActiveModel = current.into();
            if let Some(name) = patch.name {
                active.name = ActiveValue::Set(name);
            }
            if let Some(unique_name) = patch.unique_name {
                active.unique_name = ActiveValue::Set(unique_name);
            }
            if let Some(phone) = patch.phone {
                active.phone = ActiveValue::Set(phone);
            }
            if let Some(address) = patch.address {
                active.address = ActiveValue::Set(address);
            }
            if let Some(date_format) = patch.date_format {
                active.date_format = ActiveValue::Set(date_format);
            }
            active.updated_at = ActiveValue::Set(Utc::now());

            let model = active.update(&db_tx).await?;
            Ok(model)
        })
    }

    pub async fn find_organization(
        &self,
        organization_id: i32,
    ) -> ResultEngine<organizations::Model> {
        with_tx!(self, |db_tx| {
            self.require_organization(&db_tx, organization_id).await
        })
    }

    /// Deletes an organization and its memberships.
    ///
    /// Policy: the delete is rejected while invoices or categories still
    /// reference the organization; financial records never disappear as a
    /// side effect of tenant removal.
    pub async fn delete_organization(&self, organization_id: i32) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_organization(&db_tx, organization_id).await?;

            let invoice_count = invoices::Entity::find()
                .filter(invoices::Column::OrganizationId.eq(organization_id))
                .count(&db_tx)
                .await?;
            let category_count = categories::Entity::find()
                .filter(categories::Column::OrganizationId.eq(organization_id))
                .count(&db_tx)
                .await?;
            if invoice_count > 0 || category_count > 0 {
                return Err(EngineError::InvalidDelete(format!(
                    "organization {organization_id} still owns {invoice_count} invoices and {category_count} categories"
                )));
            }

            memberships::Entity::delete_many()
                .filter(memberships::Column::OrganizationId.eq(organization_id))
                .exec(&db_tx)
                .await?;
            organizations::Entity::delete_by_id(organization_id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }
}
