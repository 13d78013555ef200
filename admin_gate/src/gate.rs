//! Gate orchestrator
//!
//! Composes the decision stages in a fixed order: TLS enforcement, legacy
//! alias resolution, authentication state, CSRF validation for mutating
//! methods, then cache-control selection. The first stage to produce a
//! terminal outcome short-circuits the rest.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use http::{HeaderMap, Method, StatusCode};

use crate::cache::CacheClass;
use crate::config::{
    ADMIN_PREFIX, FORGOTTEN_PATH, GateConfig, RESET_PATH, SIGNIN_PATH, SIGNUP_PATH,
};
use crate::content::ContentResolver;
use crate::errors::GateError;
use crate::legacy::resolve_legacy_alias;
use crate::session::{
    SessionId, SessionStore, StoredSession, is_mutating, mint_csrf_token, session_id_from_headers,
    verify_csrf_header,
};
use crate::transport::{self, TlsDecision};
use crate::users::UserDirectory;

/// Per-request route category, derived from the path and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// One of the deprecated top-level aliases.
    LegacyAlias,
    /// The admin root itself.
    SslProtectedAdmin,
    /// Sign-in, sign-up, forgotten and reset pages: reachable anonymously,
    /// but only over an acceptable transport.
    AuthEntry,
    /// Everything else under the admin prefix.
    AuthProtected,
    /// Outside the admin area; the public router owns it.
    PublicCacheEligible,
}

impl RouteClass {
    pub fn classify(path: &str) -> Self {
        if resolve_legacy_alias(path).is_some() {
            return RouteClass::LegacyAlias;
        }
        if path == ADMIN_PREFIX || path == ADMIN_PREFIX.trim_end_matches('/') {
            return RouteClass::SslProtectedAdmin;
        }
        if path.starts_with(ADMIN_PREFIX) {
            if path == SIGNIN_PATH
                || path == SIGNUP_PATH
                || path == FORGOTTEN_PATH
                || path.starts_with(RESET_PATH)
            {
                return RouteClass::AuthEntry;
            }
            return RouteClass::AuthProtected;
        }
        RouteClass::PublicCacheEligible
    }

    pub fn requires_tls(self) -> bool {
        matches!(
            self,
            RouteClass::SslProtectedAdmin | RouteClass::AuthEntry | RouteClass::AuthProtected
        )
    }
}

/// The session resolved (or created) for the current request, handed to the
/// content collaborator alongside the forward decision.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub session_id: SessionId,
    pub user_id: Option<String>,
    pub csrf_token: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// True when this request created the session, meaning the response must
    /// carry the Set-Cookie whose Expires derives from `issued_at`.
    pub fresh: bool,
}

impl SessionContext {
    fn from_session(session_id: SessionId, session: &StoredSession, fresh: bool) -> Self {
        Self {
            session_id,
            user_id: session.user_id.clone(),
            csrf_token: session.csrf_token.clone(),
            issued_at: session.created_at,
            expires_at: session.expires_at,
            fresh,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }
}

/// Final decision for a request that was not rejected outright.
#[derive(Debug, Clone)]
pub enum Directive {
    /// Hand the request to the content collaborator with the session
    /// context attached.
    Forward {
        session: Option<SessionContext>,
        cache: CacheClass,
    },
    Redirect {
        status: StatusCode,
        location: String,
        cache: CacheClass,
        session: Option<SessionContext>,
    },
}

/// The admin routing gate. Collaborators are injected; the gate holds no
/// process-wide state of its own.
pub struct Gate {
    config: GateConfig,
    sessions: Arc<dyn SessionStore>,
    users: Arc<dyn UserDirectory>,
    content: Arc<dyn ContentResolver>,
}

impl Gate {
    pub fn new(
        config: GateConfig,
        sessions: Arc<dyn SessionStore>,
        users: Arc<dyn UserDirectory>,
        content: Arc<dyn ContentResolver>,
    ) -> Self {
        Self {
            config,
            sessions,
            users,
            content,
        }
    }

    /// Evaluate one request against the full pipeline.
    pub async fn evaluate(
        &self,
        method: &Method,
        path: &str,
        query: Option<&str>,
        headers: &HeaderMap,
        transport_secure: bool,
    ) -> Result<Directive, GateError> {
        let class = RouteClass::classify(path);

        // Stage 1: TLS enforcement, admin area only.
        if class.requires_tls() {
            match transport::enforce(&self.config, headers, transport_secure, path, query) {
                TlsDecision::Allow => {}
                TlsDecision::Redirect(location) => {
                    return Ok(Directive::Redirect {
                        status: StatusCode::MOVED_PERMANENTLY,
                        location,
                        cache: CacheClass::Private,
                        session: None,
                    });
                }
                TlsDecision::Reject => return Err(GateError::TransportPolicyViolation),
            }
        }

        // Stage 2: legacy aliases, no session side effects.
        if let Some(target) = resolve_legacy_alias(path) {
            return Ok(Directive::Redirect {
                status: StatusCode::MOVED_PERMANENTLY,
                location: target.to_string(),
                cache: CacheClass::Year,
                session: None,
            });
        }

        // Canonicalize the slashless admin prefix before any session work,
        // keeping it behind the TLS stage above.
        if path == ADMIN_PREFIX.trim_end_matches('/') {
            let location = match query {
                Some(q) => format!("{ADMIN_PREFIX}?{q}"),
                None => ADMIN_PREFIX.to_string(),
            };
            return Ok(Directive::Redirect {
                status: StatusCode::MOVED_PERMANENTLY,
                location,
                cache: CacheClass::Private,
                session: None,
            });
        }

        if class == RouteClass::PublicCacheEligible {
            return Ok(Directive::Forward {
                session: None,
                cache: CacheClass::Public,
            });
        }

        // Resolve the browser's session, or start an anonymous one. Mutating
        // requests never create a session: without a pre-existing session no
        // CSRF token can match, so they fail validation untouched.
        let existing = match session_id_from_headers(headers) {
            Some(id) => self.sessions.get(&id).await?.map(|s| (id, s)),
            None => None,
        };

        let (mut ctx, session) = match existing {
            Some((id, session)) => (
                SessionContext::from_session(id.clone(), &session, false),
                session,
            ),
            None => {
                if is_mutating(method) {
                    tracing::debug!("Mutating request without a session");
                    return Err(GateError::ValidationFailure);
                }
                let session = StoredSession::anonymous(mint_csrf_token()?, Utc::now());
                let id = self.sessions.create(session.clone()).await?;
                (SessionContext::from_session(id, &session, true), session)
            }
        };

        // Stage 3: authentication state machine.
        if let Some(directive) = self.evaluate_auth(&ctx, class, path).await? {
            return Ok(directive);
        }

        // Stage 4: CSRF validation for mutating methods. The generic error
        // hides whether the token was absent or mismatched.
        if is_mutating(method) {
            verify_csrf_header(headers, &session.csrf_token).map_err(|e| {
                tracing::warn!("CSRF validation failed: {e}");
                GateError::ValidationFailure
            })?;
        }

        // Re-issue the CSRF token on every authenticated full-page render.
        if ctx.is_authenticated() && method == Method::GET {
            let token = mint_csrf_token()?;
            let mut refreshed = session;
            refreshed.csrf_token = token.clone();
            self.sessions.update(&ctx.session_id, refreshed).await?;
            ctx.csrf_token = token;
        }

        // Stage 5: cache-control selection for the forwarded request.
        Ok(Directive::Forward {
            session: Some(ctx),
            cache: CacheClass::Private,
        })
    }

    async fn evaluate_auth(
        &self,
        ctx: &SessionContext,
        class: RouteClass,
        path: &str,
    ) -> Result<Option<Directive>, GateError> {
        let authenticated = ctx.is_authenticated();

        match class {
            RouteClass::AuthEntry => {
                // First-run setup: sign-in is pointless with zero users.
                if path == SIGNIN_PATH && !authenticated && !self.users.has_admin_user().await? {
                    return Ok(Some(self.auth_redirect(SIGNUP_PATH, ctx)));
                }
                Ok(None)
            }
            RouteClass::SslProtectedAdmin | RouteClass::AuthProtected => {
                if !authenticated {
                    let target = if self.users.has_admin_user().await? {
                        SIGNIN_PATH
                    } else {
                        SIGNUP_PATH
                    };
                    return Ok(Some(self.auth_redirect(target, ctx)));
                }
                if let Some(post_id) = editor_view_target(path) {
                    // Redirect-only route: resolve the item's public URL,
                    // never render an editor view for this alias.
                    let Some(url) = self.content.public_url(post_id).await? else {
                        return Err(GateError::NotFound);
                    };
                    return Ok(Some(Directive::Redirect {
                        status: StatusCode::FOUND,
                        location: url,
                        cache: CacheClass::Private,
                        session: Some(ctx.clone()),
                    }));
                }
                Ok(None)
            }
            RouteClass::LegacyAlias | RouteClass::PublicCacheEligible => Ok(None),
        }
    }

    fn auth_redirect(&self, target: &str, ctx: &SessionContext) -> Directive {
        Directive::Redirect {
            status: StatusCode::FOUND,
            location: target.to_string(),
            cache: CacheClass::Private,
            session: Some(ctx.clone()),
        }
    }

    /// Validate credentials and establish an authenticated session,
    /// replacing the browser's prior session. On CSRF or credential failure
    /// no session state changes.
    pub async fn sign_in(
        &self,
        prior: &SessionId,
        identification: &str,
        secret: &str,
    ) -> Result<(SessionId, StoredSession), GateError> {
        let Some(user_id) = self.users.verify_credentials(identification, secret).await? else {
            tracing::debug!("Sign-in rejected");
            return Err(GateError::ValidationFailure);
        };

        self.sessions.invalidate(prior).await?;
        let session = StoredSession::authenticated(user_id, mint_csrf_token()?, Utc::now());
        let id = self.sessions.create(session.clone()).await?;
        Ok((id, session))
    }

    /// Destroy the session (explicit sign-out).
    pub async fn sign_out(&self, id: &SessionId) -> Result<(), GateError> {
        self.sessions.invalidate(id).await?;
        Ok(())
    }
}

fn editor_view_target(path: &str) -> Option<&str> {
    let rest = path.strip_prefix("/ghost/editor/")?;
    let id = rest.strip_suffix("/view/")?;
    (!id.is_empty() && !id.contains('/')).then_some(id)
}
