//! End-to-end flows through the admin router
//!
//! These tests drive the real router with in-memory collaborators and
//! verify the externally observable contract: redirect targets, status
//! codes, cache-control classes, cookie expiry, and CSRF behavior.

use std::sync::Arc;

use admin_gate::{
    Gate, GateConfig, InMemoryContentResolver, InMemorySessionStore, InMemoryUserDirectory,
    TlsPolicy, parse_secure_origin,
};
use admin_gate_axum::{GateState, admin_router_no_trace};
use axum::{Router, body::Body};
use chrono::{DateTime, Duration};
use http::{
    Request, Response, StatusCode,
    header::{CACHE_CONTROL, CONTENT_TYPE, COOKIE, DATE, LOCATION, SET_COOKIE},
};
use http_body_util::BodyExt;
use tower::ServiceExt;

const PRIVATE_CACHE: &str =
    "no-cache, private, no-store, must-revalidate, max-stale=0, post-check=0, pre-check=0";
const YEAR_CACHE: &str = "public, max-age=31536000";

struct TestApp {
    router: Router,
    users: Arc<InMemoryUserDirectory>,
    content: Arc<InMemoryContentResolver>,
}

fn app_with_config(tls: TlsPolicy, trust_proxy: bool) -> TestApp {
    let sessions = Arc::new(InMemorySessionStore::new());
    let users = Arc::new(InMemoryUserDirectory::new());
    let content = Arc::new(InMemoryContentResolver::new());
    let gate = Gate::new(
        GateConfig { tls, trust_proxy },
        sessions,
        users.clone(),
        content.clone(),
    );
    TestApp {
        router: admin_router_no_trace(GateState::new(gate, false)),
        users,
        content,
    }
}

fn app() -> TestApp {
    app_with_config(TlsPolicy::Disabled, false)
}

fn redirect_app() -> TestApp {
    app_with_config(
        TlsPolicy::RequireRedirect {
            secure_origin: parse_secure_origin("https://admin.example.com").unwrap(),
        },
        false,
    )
}

async fn send(app: &TestApp, request: Request<Body>) -> Response<Body> {
    app.router.clone().oneshot(request).await.unwrap()
}

async fn get(app: &TestApp, path: &str) -> Response<Body> {
    send(
        app,
        Request::builder().uri(path).body(Body::empty()).unwrap(),
    )
    .await
}

async fn get_with_cookie(app: &TestApp, path: &str, cookie: &str) -> Response<Body> {
    send(
        app,
        Request::builder()
            .uri(path)
            .header(COOKIE, cookie)
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

fn header<'a>(response: &'a Response<Body>, name: http::header::HeaderName) -> Option<&'a str> {
    response.headers().get(name).and_then(|v| v.to_str().ok())
}

/// The `name=value` pair of the session cookie, for replay on requests.
fn session_cookie(response: &Response<Body>) -> Option<String> {
    let raw = header(response, SET_COOKIE)?;
    Some(raw.split(';').next().unwrap().to_string())
}

fn cookie_expires(response: &Response<Body>) -> DateTime<chrono::FixedOffset> {
    let raw = header(response, SET_COOKIE).expect("set-cookie expected");
    let expires = raw
        .split(';')
        .map(str::trim)
        .find_map(|attr| attr.strip_prefix("Expires="))
        .expect("Expires attribute expected");
    DateTime::parse_from_rfc2822(expires).expect("Expires should be an HTTP date")
}

async fn body_string(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn extract_csrf_token(body: &str) -> String {
    body.split("name=\"csrf-token\" content=\"")
        .nth(1)
        .expect("csrf meta tag expected")
        .split('"')
        .next()
        .unwrap()
        .to_string()
}

fn signin_post(cookie: &str, csrf_token: &str, credentials: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/ghost/signin/")
        .header(COOKIE, cookie)
        .header("x-csrf-token", csrf_token)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(credentials.to_string()))
        .unwrap()
}

/// Run the fresh-install + sign-in dance, returning the authenticated
/// session cookie.
async fn sign_in(app: &TestApp) -> String {
    app.users.create_user("admin", "Sl1m3rson99").await;
    let response = get(app, "/ghost/signin/").await;
    assert_eq!(response.status(), StatusCode::OK);
    let anon_cookie = session_cookie(&response).expect("anonymous session cookie expected");
    let token = extract_csrf_token(&body_string(response).await);

    let response = send(app, signin_post(&anon_cookie, &token, "username=admin&password=Sl1m3rson99")).await;
    assert_eq!(response.status(), StatusCode::OK);
    session_cookie(&response).expect("authenticated session cookie expected")
}

#[tokio::test]
async fn test_legacy_aliases_redirect_permanently_with_year_cache() {
    let app = app();
    let cases = [
        ("/logout/", "/ghost/signout/"),
        ("/signout/", "/ghost/signout/"),
        ("/signin/", "/ghost/signin/"),
        ("/signup/", "/ghost/signup/"),
    ];

    for (path, target) in cases {
        let response = get(&app, path).await;
        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY, "{path}");
        assert_eq!(header(&response, LOCATION), Some(target), "{path}");
        assert_eq!(header(&response, CACHE_CONTROL), Some(YEAR_CACHE), "{path}");
        // Permanent mappings never touch session state
        assert!(response.headers().get(SET_COOKIE).is_none(), "{path}");
    }
}

#[tokio::test]
async fn test_reject_mode_blocks_insecure_admin_requests() {
    let app = app_with_config(TlsPolicy::RequireReject, false);

    for path in ["/ghost/", "/ghost/signin/", "/ghost/editor/1/view/"] {
        let response = get(&app, path).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{path}");
        assert!(response.headers().get(SET_COOKIE).is_none(), "{path}");
        assert_eq!(
            header(&response, CACHE_CONTROL),
            Some(PRIVATE_CACHE),
            "{path}"
        );
        let body = body_string(response).await;
        assert!(!body.contains("<meta"), "no admin markup may leak: {path}");
    }
}

#[tokio::test]
async fn test_slashless_admin_prefix_is_canonicalized_behind_the_gate() {
    let app = app();
    let response = get(&app, "/ghost").await;
    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(header(&response, LOCATION), Some("/ghost/"));
    assert_eq!(header(&response, CACHE_CONTROL), Some(PRIVATE_CACHE));
    assert!(response.headers().get(SET_COOKIE).is_none());

    // Under reject mode the slashless form is blocked like the admin root
    let app = app_with_config(TlsPolicy::RequireReject, false);
    let response = get(&app, "/ghost").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_redirect_mode_points_at_the_secure_origin() {
    let app = redirect_app();

    let response = get(&app, "/ghost/signin/?next=dashboard").await;
    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(
        header(&response, LOCATION),
        Some("https://admin.example.com/ghost/signin/?next=dashboard")
    );

    let response = get(&app, "/ghost/").await;
    assert_eq!(
        header(&response, LOCATION),
        Some("https://admin.example.com/ghost/")
    );
}

#[tokio::test]
async fn test_trusted_proxy_header_satisfies_reject_mode() {
    let app = app_with_config(TlsPolicy::RequireReject, true);
    let response = send(
        &app,
        Request::builder()
            .uri("/ghost/signup/")
            .header("x-forwarded-proto", "https")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_spoofed_proxy_header_is_ignored_without_trust() {
    let app = app_with_config(TlsPolicy::RequireReject, false);
    let response = send(
        &app,
        Request::builder()
            .uri("/ghost/")
            .header("x-forwarded-proto", "https")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_anonymous_root_redirect_tracks_user_existence() {
    let app = app();

    // Fresh install: repeated resolution is stable
    for _ in 0..2 {
        let response = get(&app, "/ghost/").await;
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(header(&response, LOCATION), Some("/ghost/signup/"));
        assert_eq!(header(&response, CACHE_CONTROL), Some(PRIVATE_CACHE));
    }

    // Once a user exists the same request lands on sign-in
    app.users.create_user("admin", "Sl1m3rson99").await;
    let response = get(&app, "/ghost/").await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(header(&response, LOCATION), Some("/ghost/signin/"));
}

#[tokio::test]
async fn test_signin_redirects_to_signup_while_no_user_exists() {
    let app = app();
    let response = get(&app, "/ghost/signin/").await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(header(&response, LOCATION), Some("/ghost/signup/"));
}

#[tokio::test]
async fn test_signup_page_sets_cookie_expiring_in_twelve_hours() {
    let app = app();
    let response = get(&app, "/ghost/signup/").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, CACHE_CONTROL), Some(PRIVATE_CACHE));

    // Expires and Date must derive from the same instant, 12 hours apart
    let date = DateTime::parse_from_rfc2822(header(&response, DATE).expect("Date expected"))
        .expect("Date should be an HTTP date");
    let expires = cookie_expires(&response);
    assert_eq!(expires - date, Duration::hours(12));
}

#[tokio::test]
async fn test_anonymous_signin_page_sets_cookie_but_no_csrf_header() {
    let app = app();
    app.users.create_user("admin", "Sl1m3rson99").await;
    let response = get(&app, "/ghost/signin/").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(SET_COOKIE).is_some());
    // The token travels only in page content, never response headers
    assert!(response.headers().get("x-csrf-token").is_none());
    assert!(response.headers().get("x-cache-invalidate").is_none());
    let body = body_string(response).await;
    assert!(body.contains("name=\"csrf-token\""));
}

#[tokio::test]
async fn test_csrf_round_trip_accepts_the_embedded_token() {
    let app = app();
    let authed_cookie = sign_in(&app).await;

    let response = get_with_cookie(&app, "/ghost/", &authed_cookie).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_altered_csrf_token_is_rejected_without_session_mutation() {
    let app = app();
    app.users.create_user("admin", "Sl1m3rson99").await;

    let response = get(&app, "/ghost/signin/").await;
    let cookie = session_cookie(&response).unwrap();
    let token = extract_csrf_token(&body_string(response).await);

    let mut altered = token.clone();
    altered.pop();
    altered.push('x');
    let response = send(
        &app,
        signin_post(&cookie, &altered, "username=admin&password=Sl1m3rson99"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(response.headers().get(SET_COOKIE).is_none());

    // The browser's session is still anonymous: the original token works
    let response = get_with_cookie(&app, "/ghost/", &cookie).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(header(&response, LOCATION), Some("/ghost/signin/"));

    let response = send(
        &app,
        signin_post(&cookie, &token, "username=admin&password=Sl1m3rson99"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_missing_csrf_token_is_rejected() {
    let app = app();
    app.users.create_user("admin", "Sl1m3rson99").await;

    let response = get(&app, "/ghost/signin/").await;
    let cookie = session_cookie(&response).unwrap();

    let response = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/ghost/signin/")
            .header(COOKIE, cookie)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("username=admin&password=Sl1m3rson99"))
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_bad_credentials_fail_generically() {
    let app = app();
    app.users.create_user("admin", "Sl1m3rson99").await;

    let response = get(&app, "/ghost/signin/").await;
    let cookie = session_cookie(&response).unwrap();
    let token = extract_csrf_token(&body_string(response).await);

    let response = send(&app, signin_post(&cookie, &token, "username=admin&password=wrong")).await;
    // Credential rejection is unauthorized, unlike the forbidden CSRF case
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(SET_COOKIE).is_none());
    assert_eq!(header(&response, CACHE_CONTROL), Some(PRIVATE_CACHE));
    let body = body_string(response).await;
    // Never reveal which input failed or whether the account exists
    assert!(!body.contains("password"));
    assert!(!body.contains("user"));
}

#[tokio::test]
async fn test_fresh_install_through_editor_view_scenario() {
    let app = app();

    // Fresh install: the admin root sends the browser to first-run setup
    let response = get(&app, "/ghost/").await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(header(&response, LOCATION), Some("/ghost/signup/"));

    app.content.publish("1", "/welcome-to-ghost/").await;
    let authed_cookie = sign_in(&app).await;

    let response = get_with_cookie(&app, "/ghost/", &authed_cookie).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, CACHE_CONTROL), Some(PRIVATE_CACHE));

    let response = get_with_cookie(&app, "/ghost/editor/1/view/", &authed_cookie).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(header(&response, LOCATION), Some("/welcome-to-ghost/"));
}

#[tokio::test]
async fn test_editor_view_for_unknown_item_is_not_found() {
    let app = app();
    let authed_cookie = sign_in(&app).await;

    let response = get_with_cookie(&app, "/ghost/editor/9/view/", &authed_cookie).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_string(response).await;
    assert!(body.contains("Page Not Found"));
}

#[tokio::test]
async fn test_reset_routes() {
    let app = app();

    let response = get(&app, "/ghost/reset/").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(header(&response, CACHE_CONTROL), Some(PRIVATE_CACHE));
    let body = body_string(response).await;
    assert!(body.contains("Page Not Found"));

    let response = get(&app, "/ghost/reset/athing/").await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(header(&response, LOCATION), Some("/ghost/forgotten/"));
    assert_eq!(header(&response, CACHE_CONTROL), Some(PRIVATE_CACHE));
}

#[tokio::test]
async fn test_forgotten_page_renders_for_anonymous_visitors() {
    let app = app();
    let response = get(&app, "/ghost/forgotten/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, CACHE_CONTROL), Some(PRIVATE_CACHE));
}

#[tokio::test]
async fn test_signout_destroys_the_session() {
    let app = app();
    let authed_cookie = sign_in(&app).await;

    let response = get_with_cookie(&app, "/ghost/signout/", &authed_cookie).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(header(&response, LOCATION), Some("/ghost/signin/"));
    let raw = header(&response, SET_COOKIE).expect("clearing cookie expected");
    assert!(raw.contains("Max-Age=0"));

    // The old cookie no longer authenticates
    let response = get_with_cookie(&app, "/ghost/", &authed_cookie).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(header(&response, LOCATION), Some("/ghost/signin/"));
}

#[tokio::test]
async fn test_public_paths_are_outside_the_gate() {
    let app = app();
    let response = get(&app, "/welcome-to-ghost/").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(header(&response, CACHE_CONTROL), Some("public, max-age=0"));
    assert!(response.headers().get(SET_COOKIE).is_none());
}
