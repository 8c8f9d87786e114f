//! Invoice endpoints, all scoped under an organization.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use api_types::invoice::{InvoiceList, InvoiceListResponse, InvoiceNew, InvoiceUpdate, InvoiceView};
use engine::{InvoiceKind, invoices, users as user_entity};

use crate::{ServerError, server::ServerState};

fn kind_view(kind: &str) -> api_types::InvoiceKind {
    match kind {
        "income" => api_types::InvoiceKind::Income,
        _ => api_types::InvoiceKind::Expense,
    }
}

fn view(invoice: invoices::Model) -> InvoiceView {
    InvoiceView {
        id: invoice.id,
        name: invoice.name,
        note: invoice.note,
        amount_minor: invoice.amount_minor,
        total_minor: invoice.total_minor,
        date: invoice.date,
        kind: kind_view(&invoice.kind),
        created_at: invoice.created_at,
        updated_at: invoice.updated_at,
    }
}

fn kind_from_api(kind: api_types::InvoiceKind) -> InvoiceKind {
    match kind {
        api_types::InvoiceKind::Income => InvoiceKind::Income,
        api_types::InvoiceKind::Expense => InvoiceKind::Expense,
    }
}

pub async fn create(
    Extension(user): Extension<user_entity::Model>,
    State(state): State<ServerState>,
    Path(org_id): Path<i32>,
    Json(payload): Json<InvoiceNew>,
) -> Result<(StatusCode, Json<InvoiceView>), ServerError> {
    if payload.name.is_empty() {
        return Err(ServerError::Generic("name must not be empty".to_string()));
    }

    let invoice = state
        .engine
        .create_invoice(
            org_id,
            user.id,
            engine::InvoiceNew {
                name: payload.name,
                note: payload.note,
                amount_minor: payload.amount_minor,
                total_minor: payload.total_minor,
                date: payload.date,
                kind: kind_from_api(payload.kind),
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(view(invoice))))
}

pub async fn get(
    Extension(user): Extension<user_entity::Model>,
    State(state): State<ServerState>,
    Path((org_id, invoice_id)): Path<(i32, i32)>,
) -> Result<Json<InvoiceView>, ServerError> {
    state.engine.member_role(org_id, user.id).await?;
    let invoice = state.engine.find_invoice(org_id, invoice_id).await?;
    Ok(Json(view(invoice)))
}

pub async fn update(
    Extension(user): Extension<user_entity::Model>,
    State(state): State<ServerState>,
    Path((org_id, invoice_id)): Path<(i32, i32)>,
    Json(payload): Json<InvoiceUpdate>,
) -> Result<Json<InvoiceView>, ServerError> {
    state.engine.member_role(org_id, user.id).await?;

    let invoice = state
        .engine
        .update_invoice(
            org_id,
            invoice_id,
            engine::InvoicePatch {
                name: payload.name,
                note: payload.note,
                amount_minor: payload.amount_minor,
                total_minor: payload.total_minor,
                date: payload.date,
                kind: payload.kind.map(kind_from_api),
            },
        )
        .await?;
    Ok(Json(view(invoice)))
}

pub async fn remove(
    Extension(user): Extension<user_entity::Model>,
    State(state): State<ServerState>,
    Path((org_id, invoice_id)): Path<(i32, i32)>,
) -> Result<StatusCode, ServerError> {
    state.engine.member_role(org_id, user.id).await?;
    state.engine.delete_invoice(org_id, invoice_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list(
    Extension(user): Extension<user_entity::Model>,
    State(state): State<ServerState>,
    Path(org_id): Path<i32>,
    Query(query): Query<InvoiceList>,
) -> Result<Json<InvoiceListResponse>, ServerError> {
    state.engine.member_role(org_id, user.id).await?;

    let (models, total, _filter) = state
        .engine
        .list_invoices(
            org_id,
            engine::InvoiceListFilter {
                date_from: query.date_from,
                date_to: query.date_to,
                kind: query.kind.map(kind_from_api),
                text: query.text.clone(),
            },
        )
        .await?;

    Ok(Json(InvoiceListResponse {
        invoices: models.into_iter().map(view).collect(),
        total,
        params: query,
    }))
}
