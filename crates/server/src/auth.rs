//! Sign-in and sign-out endpoints.

use axum::{
    Form, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use engine::{
    FormData,
    auth::{AuthOutcome, authenticate},
};
use serde::Serialize;

use crate::{ServerError, server::{SESSION_COOKIE, ServerState}};

#[derive(Serialize)]
struct LoginFailed {
    error: &'static str,
}

pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    Form(form): Form<FormData>,
) -> Result<Response, ServerError> {
    match authenticate(state.identity.as_ref(), &form).await? {
        AuthOutcome::Redirect(sign_in) => {
            let jar = match sign_in.session {
                Some(token) => jar.add(
                    Cookie::build((SESSION_COOKIE, token))
                        .path("/")
                        .http_only(true),
                ),
                None => jar,
            };
            Ok((jar, Redirect::to(&sign_in.redirect_to)).into_response())
        }
        AuthOutcome::Failed(code) => {
            Ok((StatusCode::UNAUTHORIZED, Json(LoginFailed { error: code })).into_response())
        }
    }
}

pub async fn logout(State(state): State<ServerState>, jar: CookieJar) -> Response {
    let jar = match jar.get(SESSION_COOKIE).map(|c| c.value().to_string()) {
        Some(token) => {
            state.identity.sign_out(&token).await;
            jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
        }
        None => jar,
    };
    (jar, Redirect::to("/login")).into_response()
}
