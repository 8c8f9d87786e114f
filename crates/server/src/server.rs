use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use std::sync::Arc;

use crate::{categories, invoices, memberships, organizations, users};
use engine::{Engine, users as user_entity};

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub db: DatabaseConnection,
}

async fn auth(
    auth_header: Option<TypedHeader<Authorization<Basic>>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    // Without the Option the extractor answers a missing header with 400;
    // absent credentials are a 401.
    let Some(auth_header) = auth_header else {
        return Err(StatusCode::UNAUTHORIZED);
    };
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let user = user_entity::Entity::find()
        .filter(user_entity::Column::Email.eq(auth_header.username()))
        .filter(user_entity::Column::Password.eq(auth_header.password()))
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let Some(user) = user else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/user", get(users::current))
        .route(
            "/organizations",
            post(organizations::create).get(organizations::find_by_unique_name),
        )
        .route(
            "/organizations/{org_id}",
            get(organizations::get)
                .patch(organizations::update)
                .delete(organizations::remove),
        )
        .route(
            "/organizations/{org_id}/members",
            get(memberships::list).post(memberships::add),
        )
        .route(
            "/organizations/{org_id}/members/{user_id}",
            delete(memberships::remove),
        )
        .route(
            "/organizations/{org_id}/invoices",
            get(invoices::list).post(invoices::create),
        )
        .route(
            "/organizations/{org_id}/invoices/{invoice_id}",
            get(invoices::get)
                .patch(invoices::update)
                .delete(invoices::remove),
        )
        .route(
            "/organizations/{org_id}/categories",
            get(categories::list).post(categories::create),
        )
        .route(
            "/organizations/{org_id}/categories/{category_id}",
            get(categories::get).delete(categories::remove),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        // Signup stays outside the auth layer.
        .route("/users", post(users::signup))
        .with_state(state)
}

pub async fn run(engine: Engine, db: DatabaseConnection) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, db, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        db,
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, db, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request as HttpRequest, StatusCode, header},
    };
    use base64::{Engine as _, engine::general_purpose::STANDARD};
    use http_body_util::BodyExt;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;
    use tower::ServiceExt;

    use super::*;

    async fn state() -> ServerState {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("connect to in-memory database");
        Migrator::up(&db, None).await.expect("run migrations");
        let engine = Engine::builder().database(db.clone()).build();
        ServerState {
            engine: Arc::new(engine),
            db,
        }
    }

    fn basic_auth(email: &str, password: &str) -> String {
        format!("Basic {}", STANDARD.encode(format!("{email}:{password}")))
    }

    #[tokio::test]
    async fn signup_then_create_organization() {
        let app = router(state().await);

        let signup = HttpRequest::builder()
            .method("POST")
            .uri("/users")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                r#"{"name":"Ada","email":"ada@example.com","password":"pw"}"#,
            ))
            .expect("build request");
        let res = app.clone().oneshot(signup).await.expect("signup response");
        assert_eq!(res.status(), StatusCode::CREATED);

        let create = HttpRequest::builder()
            .method("POST")
            .uri("/organizations")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, basic_auth("ada@example.com", "pw"))
            .body(Body::from(r#"{"name":"Acme","unique_name":"acme"}"#))
            .expect("build request");
        let res = app.clone().oneshot(create).await.expect("create response");
        assert_eq!(res.status(), StatusCode::CREATED);

        let body = res.into_body().collect().await.expect("read body").to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).expect("parse body");
        assert_eq!(json["unique_name"], "acme");
    }

    #[tokio::test]
    async fn requests_without_credentials_are_rejected() {
        let app = router(state().await);

        let req = HttpRequest::builder()
            .uri("/organizations/1")
            .body(Body::empty())
            .expect("build request");
        let res = app.clone().oneshot(req).await.expect("response");
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let req = HttpRequest::builder()
            .uri("/organizations/1")
            .header(header::AUTHORIZATION, basic_auth("nobody@example.com", "pw"))
            .body(Body::empty())
            .expect("build request");
        let res = app.oneshot(req).await.expect("response");
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn foreign_organization_is_not_found() {
        let app = router(state().await);

        for (name, email) in [("Ada", "ada@example.com"), ("Bob", "bob@example.com")] {
            let signup = HttpRequest::builder()
                .method("POST")
                .uri("/users")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(format!(
                    r#"{{"name":"{name}","email":"{email}","password":"pw"}}"#
                )))
                .expect("build request");
            let res = app.clone().oneshot(signup).await.expect("signup response");
            assert_eq!(res.status(), StatusCode::CREATED);
        }

        let create = HttpRequest::builder()
            .method("POST")
            .uri("/organizations")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, basic_auth("ada@example.com", "pw"))
            .body(Body::from(r#"{"name":"Acme","unique_name":"acme"}"#))
            .expect("build request");
        let res = app.clone().oneshot(create).await.expect("create response");
        assert_eq!(res.status(), StatusCode::CREATED);
        let body = res.into_body().collect().await.expect("read body").to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).expect("parse body");
        let org_id = json["id"].as_i64().expect("organization id");

        // Bob is not a member, so the organization looks nonexistent to him.
        let req = HttpRequest::builder()
            .uri(format!("/organizations/{org_id}"))
            .header(header::AUTHORIZATION, basic_auth("bob@example.com", "pw"))
            .body(Body::empty())
            .expect("build request");
        let res = app.oneshot(req).await.expect("response");
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
