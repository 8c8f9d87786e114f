//! Membership management endpoints.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

use api_types::membership::{MemberAdd, MemberView, MembersResponse, MembershipRole};
use engine::{MemberRole, users as user_entity};

use crate::{ServerError, organizations::require_role, server::ServerState};

fn role_view(role: MemberRole) -> MembershipRole {
    match role {
        MemberRole::Owner => MembershipRole::Owner,
        MemberRole::Admin => MembershipRole::Admin,
        MemberRole::Member => MembershipRole::Member,
    }
}

pub async fn list(
    Extension(user): Extension<user_entity::Model>,
    State(state): State<ServerState>,
    Path(org_id): Path<i32>,
) -> Result<Json<MembersResponse>, ServerError> {
    state.engine.member_role(org_id, user.id).await?;

    let members = state
        .engine
        .list_members(org_id)
        .await?
        .into_iter()
        .map(|(member, role)| MemberView {
            user_id: member.id,
            name: member.name,
            email: member.email,
            role: role_view(role),
        })
        .collect();

    Ok(Json(MembersResponse { members }))
}

pub async fn add(
    Extension(user): Extension<user_entity::Model>,
    State(state): State<ServerState>,
    Path(org_id): Path<i32>,
    Json(payload): Json<MemberAdd>,
) -> Result<StatusCode, ServerError> {
    require_role(
        &state,
        org_id,
        user.id,
        &[MemberRole::Owner, MemberRole::Admin],
    )
    .await?;

    state
        .engine
        .add_member(org_id, payload.user_id, payload.role.as_str())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove(
    Extension(user): Extension<user_entity::Model>,
    State(state): State<ServerState>,
    Path((org_id, member_user_id)): Path<(i32, i32)>,
) -> Result<StatusCode, ServerError> {
    // Members may leave on their own; removing someone else takes
    // owner or admin rights.
    if member_user_id != user.id {
        require_role(
            &state,
            org_id,
            user.id,
            &[MemberRole::Owner, MemberRole::Admin],
        )
        .await?;
    } else {
        state.engine.member_role(org_id, user.id).await?;
    }

    state.engine.remove_member(org_id, member_user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
