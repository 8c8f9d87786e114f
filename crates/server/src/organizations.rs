//! Organization lifecycle endpoints.
//!
//! Every organization-scoped route resolves the requester's membership
//! first; a non-member gets 404, never a hint that the organization exists.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use api_types::organization::{OrganizationNew, OrganizationUpdate, OrganizationView};
use engine::{MemberRole, organizations, users as user_entity};

use crate::{ServerError, server::ServerState};

fn view(org: organizations::Model) -> OrganizationView {
    OrganizationView {
        id: org.id,
        name: org.name,
        unique_name: org.unique_name,
        phone: org.phone,
        address: org.address,
        date_format: org.date_format,
        created_at: org.created_at,
        updated_at: org.updated_at,
    }
}

pub(crate) async fn require_role(
    state: &ServerState,
    organization_id: i32,
    user_id: i32,
    allowed: &[MemberRole],
) -> Result<MemberRole, ServerError> {
    let role = state.engine.member_role(organization_id, user_id).await?;
    if allowed.contains(&role) {
        Ok(role)
    } else {
        Err(ServerError::Forbidden(format!(
            "role {} may not perform this action",
            role.as_str()
        )))
    }
}

pub async fn create(
    Extension(user): Extension<user_entity::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<OrganizationNew>,
) -> Result<(StatusCode, Json<OrganizationView>), ServerError> {
    if payload.name.is_empty() || payload.unique_name.is_empty() {
        return Err(ServerError::Generic(
            "name and unique_name must not be empty".to_string(),
        ));
    }

    let (org, _membership) = state
        .engine
        .create_organization(
            engine::OrganizationNew {
                name: payload.name,
                unique_name: payload.unique_name,
            },
            user.id,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(view(org))))
}

#[derive(Deserialize)]
pub struct UniqueNameQuery {
    pub unique_name: String,
}

pub async fn find_by_unique_name(
    Extension(user): Extension<user_entity::Model>,
    State(state): State<ServerState>,
    Query(query): Query<UniqueNameQuery>,
) -> Result<Json<OrganizationView>, ServerError> {
    let org = state
        .engine
        .find_organization_by_unique_name(&query.unique_name)
        .await?;
    state.engine.member_role(org.id, user.id).await?;
    Ok(Json(view(org)))
}

pub async fn get(
    Extension(user): Extension<user_entity::Model>,
    State(state): State<ServerState>,
    Path(org_id): Path<i32>,
) -> Result<Json<OrganizationView>, ServerError> {
    state.engine.member_role(org_id, user.id).await?;
    let org = state.engine.find_organization(org_id).await?;
    Ok(Json(view(org)))
}

pub async fn update(
    Extension(user): Extension<user_entity::Model>,
    State(state): State<ServerState>,
    Path(org_id): Path<i32>,
    Json(payload): Json<OrganizationUpdate>,
) -> Result<Json<OrganizationView>, ServerError> {
    require_role(
        &state,
        org_id,
        user.id,
        &[MemberRole::Owner, MemberRole::Admin],
    )
    .await?;

    let org = state
        .engine
        .update_organization(
            org_id,
            engine::OrganizationPatch {
                name: payload.name,
                unique_name: payload.unique_name,
                phone: payload.phone,
                address: payload.address,
                date_format: payload.date_format,
            },
        )
        .await?;
    Ok(Json(view(org)))
}

pub async fn remove(
    Extension(user): Extension<user_entity::Model>,
    State(state): State<ServerState>,
    Path(org_id): Path<i32>,
) -> Result<StatusCode, ServerError> {
    require_role(&state, org_id, user.id, &[MemberRole::Owner]).await?;
    state.engine.delete_organization(org_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
