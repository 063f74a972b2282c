use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::extract::cookie::CookieJar;
use sea_orm::DatabaseConnection;

use std::sync::Arc;

use crate::{PageCache, auth, customers, invoices};
use engine::{
    Engine, EngineError,
    auth::{CredentialsProvider, IdentityProvider, SessionStore},
};

pub(crate) const SESSION_COOKIE: &str = "session";

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub cache: Arc<PageCache>,
    pub identity: Arc<dyn IdentityProvider>,
    pub sessions: Arc<SessionStore>,
}

impl ServerState {
    /// Wires the engine, page cache and credentials sign-in over `db`.
    pub fn new(db: DatabaseConnection) -> Result<Self, EngineError> {
        let cache = Arc::new(PageCache::new());
        let sessions = Arc::new(SessionStore::new());
        let engine = Engine::builder()
            .database(db.clone())
            .revalidate(cache.clone())
            .build()?;

        Ok(Self {
            engine: Arc::new(engine),
            cache,
            identity: Arc::new(CredentialsProvider::new(db, sessions.clone())),
            sessions,
        })
    }
}

/// Signed-in user, available to dashboard handlers as an extension.
#[derive(Clone, Debug)]
pub struct SessionUser {
    pub email: String,
}

async fn require_session(
    State(state): State<ServerState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(email) = jar
        .get(SESSION_COOKIE)
        .and_then(|cookie| state.sessions.user(cookie.value()))
    else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    request.extensions_mut().insert(SessionUser { email });
    Ok(next.run(request).await)
}

pub fn router(state: ServerState) -> Router {
    let dashboard = Router::new()
        .route(
            "/dashboard/invoices",
            get(invoices::list).post(invoices::create),
        )
        .route(
            "/dashboard/invoices/{id}",
            get(invoices::get).post(invoices::update),
        )
        .route("/dashboard/invoices/{id}/delete", post(invoices::delete))
        .route("/dashboard/customers", get(customers::list))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .merge(dashboard)
        .with_state(state)
}

pub async fn run_with_listener(
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState::new(db).map_err(std::io::Error::other)?;

    axum::serve(listener, router(state)).await
}
