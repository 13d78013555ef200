//! Entry-page handlers for the admin area
//!
//! Only requests the gate chose to forward reach these handlers, with the
//! resolved session context attached. The pages are deliberately minimal:
//! real admin markup comes from the content collaborator, but the CSRF
//! token must be embedded as page metadata here because it is tied to the
//! rendering session.

use admin_gate::{
    CacheClass, FORGOTTEN_PATH, GateError, SIGNIN_PATH, SessionContext, clear_session_cookie,
};
use axum::{
    Extension, Form,
    extract::{Path, State},
    response::{Html, IntoResponse, Response},
};
use http::StatusCode;
use serde::Deserialize;

use crate::error::{gate_error_response, private_error_response};
use crate::respond::{redirect_response, stamp_session_headers};
use crate::state::GateState;

fn entry_page(title: &str, csrf_token: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<title>{title}</title>\n\
         <meta name=\"csrf-token\" content=\"{csrf_token}\" />\n</head>\n\
         <body>\n{body}\n</body>\n</html>\n"
    )
}

pub(crate) async fn admin_shell(Extension(ctx): Extension<SessionContext>) -> Html<String> {
    Html(entry_page(
        "Admin",
        &ctx.csrf_token,
        "<div id=\"admin\">Dashboard</div>",
    ))
}

pub(crate) async fn signin_page(Extension(ctx): Extension<SessionContext>) -> Html<String> {
    Html(entry_page(
        "Sign In",
        &ctx.csrf_token,
        "<form method=\"post\" action=\"/ghost/signin/\">\n\
         <input name=\"username\" />\n<input name=\"password\" type=\"password\" />\n\
         <button type=\"submit\">Sign In</button>\n</form>",
    ))
}

pub(crate) async fn signup_page(Extension(ctx): Extension<SessionContext>) -> Html<String> {
    Html(entry_page(
        "Sign Up",
        &ctx.csrf_token,
        "<form method=\"post\" action=\"/ghost/signup/\">\n\
         <input name=\"username\" />\n<input name=\"password\" type=\"password\" />\n\
         <button type=\"submit\">Create Account</button>\n</form>",
    ))
}

pub(crate) async fn forgotten_page(Extension(ctx): Extension<SessionContext>) -> Html<String> {
    Html(entry_page(
        "Forgotten Password",
        &ctx.csrf_token,
        "<form method=\"post\" action=\"/ghost/forgotten/\">\n\
         <input name=\"email\" />\n<button type=\"submit\">Send Reset</button>\n</form>",
    ))
}

#[derive(Deserialize)]
pub(crate) struct SigninForm {
    username: String,
    password: String,
}

/// Credential submission. The gate middleware has already validated the
/// CSRF header against the anonymous session; a successful check here
/// replaces that session with an authenticated one and sets its cookie.
/// Rejected credentials answer 401 with the same generic message for every
/// cause.
pub(crate) async fn signin_submit(
    State(state): State<GateState>,
    Extension(ctx): Extension<SessionContext>,
    Form(form): Form<SigninForm>,
) -> Response {
    match state
        .gate
        .sign_in(&ctx.session_id, &form.username, &form.password)
        .await
    {
        Ok((session_id, session)) => {
            let mut response =
                Html("<!DOCTYPE html>\n<html><body>Signed in</body></html>\n").into_response();
            if let Err(e) = stamp_session_headers(
                response.headers_mut(),
                &session_id,
                session.created_at,
                session.expires_at,
            ) {
                tracing::error!("Failed to set authenticated session cookie: {e}");
                return gate_error_response(e.into());
            }
            response
        }
        Err(GateError::ValidationFailure) => private_error_response(
            StatusCode::UNAUTHORIZED,
            GateError::ValidationFailure.to_string(),
        ),
        Err(err) => gate_error_response(err),
    }
}

pub(crate) async fn signout(
    State(state): State<GateState>,
    Extension(ctx): Extension<SessionContext>,
) -> Response {
    if let Err(err) = state.gate.sign_out(&ctx.session_id).await {
        return gate_error_response(err);
    }

    let mut response = redirect_response(StatusCode::FOUND, SIGNIN_PATH, CacheClass::Private, None);
    if let Err(e) = clear_session_cookie(response.headers_mut()) {
        tracing::error!("Failed to clear session cookie: {e}");
        return gate_error_response(e.into());
    }
    response
}

/// `/ghost/reset/` with no token: nothing to look up.
pub(crate) async fn reset_root() -> Response {
    gate_error_response(GateError::NotFound)
}

/// A reset link always lands on the forgotten-password page; token lookup
/// belongs to the password-reset collaborator, not the gate.
pub(crate) async fn reset_link(Path(_token): Path<String>) -> Response {
    redirect_response(StatusCode::FOUND, FORGOTTEN_PATH, CacheClass::Private, None)
}

/// Fallback for unrouted paths. The middleware has already chosen the cache
/// class from the route classification.
pub(crate) async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Page Not Found").into_response()
}
