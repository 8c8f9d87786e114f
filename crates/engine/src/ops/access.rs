//! Tenant-scoping and existence guards shared by the ops modules.
//!
//! Every guard that scopes by organization answers `KeyNotFound` both for
//! rows that do not exist and for rows owned by another organization, so
//! the two cases cannot be told apart by a caller.

use sea_orm::{DatabaseTransaction, QueryFilter, prelude::*};

use crate::{EngineError, ResultEngine, categories, invoices, memberships, organizations, users};

use super::Engine;

impl Engine {
    pub(super) async fn require_user(
        &self,
        db: &DatabaseTransaction,
        user_id: i32,
    ) -> ResultEngine<users::Model> {
        users::Entity::find_by_id(user_id)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("user {user_id} not exists")))
    }

    pub(super) async fn require_organization(
        &self,
        db: &DatabaseTransaction,
        organization_id: i32,
    ) -> ResultEngine<organizations::Model> {
        organizations::Entity::find_by_id(organization_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                EngineError::KeyNotFound(format!("organization {organization_id} not exists"))
            })
    }

    pub(super) async fn require_member(
        &self,
        db: &DatabaseTransaction,
        organization_id: i32,
        user_id: i32,
    ) -> ResultEngine<memberships::Model> {
        memberships::Entity::find_by_id((user_id, organization_id))
            .one(db)
            .await?
            .ok_or_else(|| {
                EngineError::KeyNotFound(format!(
                    "user {user_id} is not a member of organization {organization_id}"
                ))
            })
    }

    /// Fetches an invoice through the tenant-scoped predicate.
    ///
    /// The organization filter is part of the query, never applied after the
    /// fetch; an invoice owned by another organization is indistinguishable
    /// from a nonexistent one.
    pub(super) async fn require_invoice(
        &self,
        db: &DatabaseTransaction,
        organization_id: i32,
        invoice_id: i32,
    ) -> ResultEngine<invoices::Model> {
        invoices::Entity::find_by_id(invoice_id)
            .filter(invoices::Column::OrganizationId.eq(organization_id))
            .one(db)
            .await?
            .ok_or_else(|| {
                EngineError::KeyNotFound(format!(
                    "invoice {invoice_id} not exists in organization {organization_id}"
                ))
            })
    }

    pub(super) async fn require_category(
        &self,
        db: &DatabaseTransaction,
        organization_id: i32,
        category_id: i32,
    ) -> ResultEngine<categories::Model> {
        categories::Entity::find_by_id(category_id)
            .filter(categories::Column::OrganizationId.eq(organization_id))
            .one(db)
            .await?
            .ok_or_else(|| {
                EngineError::KeyNotFound(format!(
                    "category {category_id} not exists in organization {organization_id}"
                ))
            })
    }
}
