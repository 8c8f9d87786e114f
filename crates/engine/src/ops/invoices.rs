use chrono::Utc;
use sea_orm::{
    ActiveValue, Condition, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};

use crate::{
    EngineError, InvoiceListFilter, InvoiceNew, InvoicePatch, ResultEngine, invoice_links,
    invoices,
};

use super::{Engine, normalize_optional_text, with_tx};

impl Engine {
    /// Records an invoice for an organization on behalf of a member.
    ///
    /// The invoice row and its audit link row commit in the same
    /// transaction; `total_minor` falls back to `amount_minor` when the
    /// caller does not supply it.
    pub async fn create_invoice(
        &self,
        organization_id: i32,
        user_id: i32,
        cmd: InvoiceNew,
    ) -> ResultEngine<invoices::Model> {
        if cmd.amount_minor <= 0 {
            return Err(EngineError::InvalidAmount(cmd.amount_minor));
        }
        let total_minor = cmd.total_minor.unwrap_or(cmd.amount_minor);
        if total_minor <= 0 {
            return Err(EngineError::InvalidAmount(total_minor));
        }

        with_tx!(self, |db_tx| {
            self.require_organization(&db_tx, organization_id).await?;
            self.require_member(&db_tx, organization_id, user_id).await?;

            let now = Utc::now();
            let invoice = invoices::ActiveModel {
                id: ActiveValue::NotSet,
                organization_id: ActiveValue::Set(organization_id),
                name: ActiveValue::Set(cmd.name),
                note: ActiveValue::Set(normalize_optional_text(cmd.note.as_deref())),
                amount_minor: ActiveValue::Set(cmd.amount_minor),
                total_minor: ActiveValue::Set(total_minor),
                date: ActiveValue::Set(cmd.date),
                kind: ActiveValue::Set(cmd.kind.as_str().to_string()),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
            }
            .insert(&db_tx)
            .await?;

            invoice_links::ActiveModel {
                id: ActiveValue::NotSet,
                user_id: ActiveValue::Set(user_id),
                organization_id: ActiveValue::Set(organization_id),
                invoice_id: ActiveValue::Set(invoice.id),
            }
            .insert(&db_tx)
            .await?;

            Ok(invoice)
        })
    }

    /// Fetches a single invoice scoped to the organization.
    pub async fn find_invoice(
        &self,
        organization_id: i32,
        invoice_id: i32,
    ) -> ResultEngine<invoices::Model> {
        with_tx!(self, |db_tx| {
            self.require_invoice(&db_tx, organization_id, invoice_id)
                .await
        })
    }

    /// Applies a partial update to an invoice.
    ///
    /// Follows the "falsy means absent" contract of [`InvoicePatch`]: empty
    /// strings and zero amounts leave the stored value alone.
    pub async fn update_invoice(
        &self,
        organization_id: i32,
        invoice_id: i32,
        patch: InvoicePatch,
    ) -> ResultEngine<invoices::Model> {
        if let Some(amount_minor) = patch.amount_minor
            && amount_minor < 0
        {
            return Err(EngineError::InvalidAmount(amount_minor));
        }
        if let Some(total_minor) = patch.total_minor
            && total_minor < 0
        {
            return Err(EngineError::InvalidAmount(total_minor));
        }

        with_tx!(self, |db_tx| {
            let current = self.require_invoice(&db_tx, organization_id, invoice_id).await?;

            let mut active: invoices::ActiveModel = current.into();
            if let Some(name) = patch.name.filter(|name| !name.is_empty()) {
                active.name = ActiveValue::Set(name);
            }
            if let Some(note) = normalize_optional_text(patch.note.as_deref()) {
                active.note = ActiveValue::Set(Some(note));
            }
            if let Some(amount_minor) = patch.amount_minor.filter(|amount| *amount != 0) {
                active.amount_minor = ActiveValue::Set(amount_minor);
            }
            if let Some(total_minor) = patch.total_minor.filter(|total| *total != 0) {
                active.total_minor = ActiveValue::Set(total_minor);
            }
            if let Some(date) = patch.date {
                active.date = ActiveValue::Set(date);
            }
            if let Some(kind) = patch.kind {
                active.kind = ActiveValue::Set(kind.as_str().to_string());
            }
            active.updated_at = ActiveValue::Set(Utc::now());

            let model = active.update(&db_tx).await?;
            Ok(model)
        })
    }

    /// Deletes an invoice together with its audit link rows.
    ///
    /// Both deletes commit in the same transaction; a failure in either
    /// leaves both tables untouched.
    pub async fn delete_invoice(&self, organization_id: i32, invoice_id: i32) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_invoice(&db_tx, organization_id, invoice_id)
                .await?;

            invoice_links::Entity::delete_many()
                .filter(invoice_links::Column::OrganizationId.eq(organization_id))
                .filter(invoice_links::Column::InvoiceId.eq(invoice_id))
                .exec(&db_tx)
                .await?;
            invoices::Entity::delete_by_id(invoice_id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// Lists an organization's invoices, newest first, together with the
    /// match count and the filter that produced the page.
    ///
    /// Present filter fields AND together; `date_from`/`date_to` form a
    /// half-open `[from, to)` range and a reversed range is rejected.
    pub async fn list_invoices(
        &self,
        organization_id: i32,
        filter: InvoiceListFilter,
    ) -> ResultEngine<(Vec<invoices::Model>, u64, InvoiceListFilter)> {
        if let (Some(from), Some(to)) = (filter.date_from, filter.date_to)
            && from >= to
        {
            return Err(EngineError::InvalidFilter(format!(
                "date_from {from} is not before date_to {to}"
            )));
        }

        with_tx!(self, |db_tx| {
            self.require_organization(&db_tx, organization_id).await?;

            let mut query = invoices::Entity::find()
                .filter(invoices::Column::OrganizationId.eq(organization_id));
            if let Some(from) = filter.date_from {
                query = query.filter(invoices::Column::Date.gte(from));
            }
            if let Some(to) = filter.date_to {
                query = query.filter(invoices::Column::Date.lt(to));
            }
            if let Some(kind) = filter.kind {
                query = query.filter(invoices::Column::Kind.eq(kind.as_str()));
            }
            if let Some(text) = normalize_optional_text(filter.text.as_deref()) {
                query = query.filter(
                    Condition::any()
                        .add(invoices::Column::Name.contains(&text))
                        .add(invoices::Column::Note.contains(&text)),
                );
            }

            let models = query
                .order_by_desc(invoices::Column::Date)
                .order_by_desc(invoices::Column::Id)
                .all(&db_tx)
                .await?;
            let total = models.len() as u64;
            Ok((models, total, filter))
        })
    }
}
