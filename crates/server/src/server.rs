use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, patch, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use std::sync::Arc;

use crate::{
    advances, boq, categories, expenses, organizations, parties, payments, projects, summaries,
    tasks, user,
};
use ledger::Ledger;

#[derive(Clone)]
pub struct ServerState {
    pub ledger: Arc<Ledger>,
    pub db: DatabaseConnection,
}

async fn auth(
    auth_header: TypedHeader<Authorization<Basic>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let user: Option<user::Model> = user::Entity::find()
        .filter(user::Column::Username.eq(auth_header.username()))
        .filter(user::Column::Password.eq(auth_header.password()))
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
        .route(
            "/orgs",
            post(organizations::create).get(organizations::list),
        )
        .route("/orgs/{org_id}", get(organizations::get))
        .route(
            "/orgs/{org_id}/members",
            get(organizations::list_members).post(organizations::upsert_member),
        )
        .route(
            "/orgs/{org_id}/members/{username}",
            delete(organizations::remove_member),
        )
        .route(
            "/orgs/{org_id}/projects",
            post(projects::create).get(projects::list),
        )
        .route(
            "/orgs/{org_id}/projects/{project_id}",
            get(projects::get)
                .patch(projects::update)
                .delete(projects::remove),
        )
        .route(
            "/orgs/{org_id}/projects/{project_id}/stages",
            post(projects::create_stage).get(projects::list_stages),
        )
        .route(
            "/orgs/{org_id}/stages/{stage_id}",
            patch(projects::update_stage).delete(projects::remove_stage),
        )
        .route(
            "/orgs/{org_id}/categories",
            post(categories::create).get(categories::list),
        )
        .route(
            "/orgs/{org_id}/categories/{category_id}",
            patch(categories::rename).delete(categories::remove),
        )
        .route(
            "/orgs/{org_id}/parties",
            post(parties::create).get(parties::list),
        )
        .route(
            "/orgs/{org_id}/parties/{party_id}",
            get(parties::get).patch(parties::update).delete(parties::remove),
        )
        .route(
            "/orgs/{org_id}/projects/{project_id}/expenses",
            post(expenses::create).get(expenses::list),
        )
        .route(
            "/orgs/{org_id}/expenses/{expense_id}",
            get(expenses::get)
                .patch(expenses::update)
                .delete(expenses::remove),
        )
        .route(
            "/orgs/{org_id}/expenses/{expense_id}/approve",
            post(expenses::approve),
        )
        .route(
            "/orgs/{org_id}/projects/{project_id}/payments",
            post(payments::create).get(payments::list),
        )
        .route(
            "/orgs/{org_id}/payments/{payment_id}",
            get(payments::get).delete(payments::remove),
        )
        .route(
            "/orgs/{org_id}/projects/{project_id}/advances",
            post(advances::create).get(advances::list),
        )
        .route(
            "/orgs/{org_id}/advances/{advance_id}",
            patch(advances::update).delete(advances::remove),
        )
        .route(
            "/orgs/{org_id}/projects/{project_id}/tasks",
            post(tasks::create).get(tasks::list),
        )
        .route(
            "/orgs/{org_id}/tasks/{task_id}",
            patch(tasks::update).delete(tasks::remove),
        )
        .route(
            "/orgs/{org_id}/projects/{project_id}/boq",
            post(boq::create).get(boq::list),
        )
        .route(
            "/orgs/{org_id}/boq/{item_id}",
            patch(boq::update).delete(boq::remove),
        )
        .route(
            "/orgs/{org_id}/projects/{project_id}/parties/{party_id}/outstanding",
            get(summaries::party_outstanding),
        )
        .route(
            "/orgs/{org_id}/projects/{project_id}/parties/{party_id}/unpaid",
            get(summaries::unpaid_expenses),
        )
        .route(
            "/orgs/{org_id}/projects/{project_id}/summaries/categories",
            get(summaries::expenses_by_category),
        )
        .route(
            "/orgs/{org_id}/projects/{project_id}/summaries/advances/{member}",
            get(summaries::member_advance_summary),
        )
        .route(
            "/orgs/{org_id}/projects/{project_id}/summaries/finance",
            get(summaries::project_finance),
        )
        .route(
            "/orgs/{org_id}/summaries/credits",
            get(summaries::credits_summary),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .with_state(state)
}

/// Builds the full application router. Used directly by the API tests.
pub fn app(ledger: Ledger, db: DatabaseConnection) -> Router {
    router(ServerState {
        ledger: Arc::new(ledger),
        db,
    })
}

pub async fn run(ledger: Ledger, db: DatabaseConnection, bind: &str) {
    let listener = match tokio::net::TcpListener::bind(bind).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(ledger, db, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    ledger: Ledger,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app(ledger, db)).await
}

pub fn spawn_with_listener(
    ledger: Ledger,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(ledger, db, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
