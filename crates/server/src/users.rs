//! Signup and current-user endpoints.

use axum::{Extension, Json, extract::State, http::StatusCode};

use api_types::user::{UserNew, UserView};
use engine::users as user_entity;

use crate::{ServerError, server::ServerState};

pub async fn signup(
    State(state): State<ServerState>,
    Json(payload): Json<UserNew>,
) -> Result<(StatusCode, Json<UserView>), ServerError> {
    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(ServerError::Generic(
            "email and password must not be empty".to_string(),
        ));
    }

    let user = state
        .engine
        .create_user(engine::UserNew {
            name: payload.name,
            email: payload.email,
            password: payload.password,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(UserView {
            id: user.id,
            name: user.name,
            email: user.email,
        }),
    ))
}

pub async fn current(
    Extension(user): Extension<user_entity::Model>,
) -> Result<Json<UserView>, ServerError> {
    Ok(Json(UserView {
        id: user.id,
        name: user.name,
        email: user.email,
    }))
}
