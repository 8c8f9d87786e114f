use chrono::Utc;
use sea_orm::{ActiveValue, Condition, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    CategoryListFilter, CategoryNew, CategoryWithSpend, InvoiceKind, ResultEngine, categories,
    invoices,
};

use super::{Engine, normalize_optional_text, with_tx};

impl Engine {
    pub async fn create_category(
        &self,
        organization_id: i32,
        cmd: CategoryNew,
    ) -> ResultEngine<categories::Model> {
        with_tx!(self, |db_tx| {
            self.require_organization(&db_tx, organization_id).await?;

            let now = Utc::now();
            let category = categories::ActiveModel {
                id: ActiveValue::NotSet,
                organization_id: ActiveValue::Set(organization_id),
                name: ActiveValue::Set(cmd.name),
                color: ActiveValue::Set(cmd.color.as_str().to_string()),
                icon: ActiveValue::Set(cmd.icon.as_str().to_string()),
                kind: ActiveValue::Set(cmd.kind.as_str().to_string()),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
            }
            .insert(&db_tx)
            .await?;
            Ok(category)
        })
    }

    /// Fetches a single category scoped to the organization, with its spend.
    pub async fn find_category(
        &self,
        organization_id: i32,
        category_id: i32,
    ) -> ResultEngine<CategoryWithSpend> {
        with_tx!(self, |db_tx| {
            let category = self
                .require_category(&db_tx, organization_id, category_id)
                .await?;
            let invoices = invoices::Entity::find()
                .filter(invoices::Column::OrganizationId.eq(organization_id))
                .all(&db_tx)
                .await?;
            let kind = InvoiceKind::try_from(category.kind.as_str())?;
            let spent_minor = categories::spent_amount(kind, &invoices);
            Ok(CategoryWithSpend {
                category,
                spent_minor,
            })
        })
    }

    pub async fn delete_category(&self, organization_id: i32, category_id: i32) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_category(&db_tx, organization_id, category_id)
                .await?;
            categories::Entity::delete_by_id(category_id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// Lists an organization's categories with their spend aggregates,
    /// together with the match count and the filter that produced the page.
    ///
    /// The organization's invoices are loaded once and every category sums
    /// against that same snapshot, so a list is internally consistent even
    /// while invoices are being written concurrently.
    pub async fn list_categories(
        &self,
        organization_id: i32,
        filter: CategoryListFilter,
    ) -> ResultEngine<(Vec<CategoryWithSpend>, u64, CategoryListFilter)> {
        with_tx!(self, |db_tx| {
            self.require_organization(&db_tx, organization_id).await?;

            let mut query = categories::Entity::find()
                .filter(categories::Column::OrganizationId.eq(organization_id));
            if let Some(kind) = filter.kind {
                query = query.filter(categories::Column::Kind.eq(kind.as_str()));
            }
            if let Some(text) = normalize_optional_text(filter.text.as_deref()) {
                query = query.filter(Condition::any().add(categories::Column::Name.contains(&text)));
            }
            let models = query
                .order_by_asc(categories::Column::Id)
                .all(&db_tx)
                .await?;

            let invoices = invoices::Entity::find()
                .filter(invoices::Column::OrganizationId.eq(organization_id))
                .all(&db_tx)
                .await?;

            let mut out = Vec::with_capacity(models.len());
            for category in models {
                let kind = InvoiceKind::try_from(category.kind.as_str())?;
                let spent_minor = categories::spent_amount(kind, &invoices);
                out.push(CategoryWithSpend {
                    category,
                    spent_minor,
                });
            }
            let total = out.len() as u64;
            Ok((out, total, filter))
        })
    }
}
