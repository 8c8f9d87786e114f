//! Category endpoints with read-time spend aggregation.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use api_types::category::{
    CategoryColor, CategoryIcon, CategoryList, CategoryListResponse, CategoryNew, CategoryView,
};
use engine::{CategoryWithSpend, InvoiceKind, MemberRole, users as user_entity};

use crate::{ServerError, organizations::require_role, server::ServerState};

fn color_view(color: &str) -> CategoryColor {
    match color {
        "secondary" => CategoryColor::Secondary,
        "success" => CategoryColor::Success,
        "warning" => CategoryColor::Warning,
        "danger" => CategoryColor::Danger,
        "info" => CategoryColor::Info,
        _ => CategoryColor::Primary,
    }
}

fn icon_view(icon: &str) -> CategoryIcon {
    match icon {
        "mdi-airplane" => CategoryIcon::MdiAirplane,
        "mdi-briefcase" => CategoryIcon::MdiBriefcase,
        "mdi-cart" => CategoryIcon::MdiCart,
        "mdi-food" => CategoryIcon::MdiFood,
        "mdi-home" => CategoryIcon::MdiHome,
        "mdi-gift" => CategoryIcon::MdiGift,
        "mdi-tools" => CategoryIcon::MdiTools,
        _ => CategoryIcon::MdiReceipt,
    }
}

fn kind_view(kind: &str) -> api_types::InvoiceKind {
    match kind {
        "income" => api_types::InvoiceKind::Income,
        _ => api_types::InvoiceKind::Expense,
    }
}

fn view(with_spend: CategoryWithSpend) -> CategoryView {
    let category = with_spend.category;
    CategoryView {
        id: category.id,
        name: category.name,
        color: color_view(&category.color),
        icon: icon_view(&category.icon),
        kind: kind_view(&category.kind),
        spent_minor: with_spend.spent_minor,
        created_at: category.created_at,
        updated_at: category.updated_at,
    }
}

fn color_from_api(color: CategoryColor) -> engine::CategoryColor {
    match color {
        CategoryColor::Primary => engine::CategoryColor::Primary,
        CategoryColor::Secondary => engine::CategoryColor::Secondary,
        CategoryColor::Success => engine::CategoryColor::Success,
        CategoryColor::Warning => engine::CategoryColor::Warning,
        CategoryColor::Danger => engine::CategoryColor::Danger,
        CategoryColor::Info => engine::CategoryColor::Info,
    }
}

fn icon_from_api(icon: CategoryIcon) -> engine::CategoryIcon {
    match icon {
        CategoryIcon::MdiAirplane => engine::CategoryIcon::MdiAirplane,
        CategoryIcon::MdiBriefcase => engine::CategoryIcon::MdiBriefcase,
        CategoryIcon::MdiCart => engine::CategoryIcon::MdiCart,
        CategoryIcon::MdiFood => engine::CategoryIcon::MdiFood,
        CategoryIcon::MdiHome => engine::CategoryIcon::MdiHome,
        CategoryIcon::MdiGift => engine::CategoryIcon::MdiGift,
        CategoryIcon::MdiReceipt => engine::CategoryIcon::MdiReceipt,
        CategoryIcon::MdiTools => engine::CategoryIcon::MdiTools,
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
    Json(payload): Json<CategoryNew>,
) -> Result<(StatusCode, Json<CategoryView>), ServerError> {
    require_role(
        &state,
        org_id,
        user.id,
        &[MemberRole::Owner, MemberRole::Admin],
    )
    .await?;

    if payload.name.is_empty() {
        return Err(ServerError::Generic("name must not be empty".to_string()));
    }

    let category = state
        .engine
        .create_category(
            org_id,
            engine::CategoryNew {
                name: payload.name,
                color: color_from_api(payload.color),
                icon: icon_from_api(payload.icon),
                kind: kind_from_api(payload.kind),
            },
        )
        .await?;

    let with_spend = state.engine.find_category(org_id, category.id).await?;
    Ok((StatusCode::CREATED, Json(view(with_spend))))
}

pub async fn get(
    Extension(user): Extension<user_entity::Model>,
    State(state): State<ServerState>,
    Path((org_id, category_id)): Path<(i32, i32)>,
) -> Result<Json<CategoryView>, ServerError> {
    state.engine.member_role(org_id, user.id).await?;
    let with_spend = state.engine.find_category(org_id, category_id).await?;
    Ok(Json(view(with_spend)))
}

pub async fn remove(
    Extension(user): Extension<user_entity::Model>,
    State(state): State<ServerState>,
    Path((org_id, category_id)): Path<(i32, i32)>,
) -> Result<StatusCode, ServerError> {
    require_role(
        &state,
        org_id,
        user.id,
        &[MemberRole::Owner, MemberRole::Admin],
    )
    .await?;
    state.engine.delete_category(org_id, category_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list(
    Extension(user): Extension<user_entity::Model>,
    State(state): State<ServerState>,
    Path(org_id): Path<i32>,
    Query(query): Query<CategoryList>,
) -> Result<Json<CategoryListResponse>, ServerError> {
    state.engine.member_role(org_id, user.id).await?;

    let (models, total, _filter) = state
        .engine
        .list_categories(
            org_id,
            engine::CategoryListFilter {
                kind: query.kind.map(kind_from_api),
                text: query.text.clone(),
            },
        )
        .await?;

    Ok(Json(CategoryListResponse {
        categories: models.into_iter().map(view).collect(),
        total,
        params: query,
    }))
}
