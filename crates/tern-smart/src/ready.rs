//! Authorization callback handling.
//!
//! [`SmartLaunch::ready`] consumes the callback parameters the
//! authorization server redirected back with and produces a
//! [`SmartClient`]: a configured [`FhirClient`] plus the launch context
//! (patient, user, state). Four sources are tried in order:
//!
//! 1. a bypass session's synthesized token (open servers),
//! 2. a previously persisted token (page reload),
//! 3. an authorization code, exchanged at the token endpoint,
//! 4. an implicit-grant URL fragment.

use std::fmt;

use serde_json::Value;
use tern_client::{ClientConfig, FhirClient};
use tern_core::{Credential, HttpRequest, TransportError};
use tracing::{debug, info};
use url::Url;

use crate::authorize::SmartLaunch;
use crate::error::{SmartError, SmartResult};
use crate::types::{AuthorizationSession, TokenResponse};

/// Seconds before expiry at which a refreshable token is refreshed
/// instead of reused.
const REFRESH_WINDOW_SECS: i64 = 120;

/// Parameters the authorization server redirected back with.
#[derive(Debug, Clone, Default)]
pub struct CallbackParams {
    /// Authorization code (authorization-code grant).
    pub code: Option<String>,
    /// State GUID threading back to the stored session.
    pub state: Option<String>,
    /// Raw URL fragment (implicit grant), without the leading `#`.
    pub fragment: Option<String>,
}

impl CallbackParams {
    /// Extracts callback parameters from the redirected-to URL.
    #[must_use]
    pub fn from_url(url: &Url) -> Self {
        let mut params = Self {
            fragment: url.fragment().map(str::to_string),
            ..Self::default()
        };
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "code" => params.code = Some(value.into_owned()),
                "state" => params.state = Some(value.into_owned()),
                _ => {}
            }
        }
        params
    }
}

/// A completed launch: the configured client and its launch context.
pub struct SmartClient {
    /// FHIR client authorized for the launched session.
    pub api: FhirClient,
    /// The token backing the client's credential.
    pub token: TokenResponse,
    /// Patient context, when the launch granted one.
    pub patient_id: Option<String>,
    /// Authorized user, from the ID token's `profile` claim.
    pub user_id: Option<String>,
    /// The session's state GUID.
    pub state: String,
}

// The client holds middleware closures, so Debug is written by hand over
// the context fields.
impl fmt::Debug for SmartClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmartClient")
            .field("token", &self.token)
            .field("patient_id", &self.patient_id)
            .field("user_id", &self.user_id)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl SmartLaunch {
    /// Completes the launch from the authorization callback.
    pub async fn ready(&self, params: CallbackParams) -> SmartResult<SmartClient> {
        // Bypass sessions carry a synthesized token; replay it.
        if let Some(state) = &params.state {
            if let Some(session) = self.store().get_session(state).await? {
                if let Some(fake) = session.fake_token_response.clone() {
                    debug!(%state, "replaying bypass token");
                    return self.finish(session, fake).await;
                }
            }
        }

        // A persisted token means the page was reloaded mid-session.
        if let Some(stored) = self.store().get_token(params.state.as_deref()).await? {
            if stored.access_token.is_some() {
                return self.resume(stored).await;
            }
        }

        if let Some(code) = &params.code {
            let state = params
                .state
                .clone()
                .ok_or_else(|| SmartError::state_mismatch("callback carried a code but no state"))?;
            let session = self.session(&state).await?;
            let mut token = self.exchange_code(&session, code).await?;
            token.state = Some(state);
            info!("authorization code exchanged");
            return self.finish(session, token).await;
        }

        if let Some(fragment) = &params.fragment {
            let token = TokenResponse::from_fragment(fragment);
            let state = token.state.clone().ok_or_else(|| {
                SmartError::state_mismatch("fragment token response carried no state")
            })?;
            let session = self.session(&state).await?;
            return self.finish(session, token).await;
        }

        Err(SmartError::configuration(
            "callback carried no token, code, or fragment",
        ))
    }

    async fn session(&self, state: &str) -> SmartResult<AuthorizationSession> {
        self.store()
            .get_session(state)
            .await?
            .ok_or_else(|| SmartError::session_not_found(state))
    }

    /// Picks a persisted token back up, refreshing it once when it is
    /// about to expire and the grant allows refresh.
    async fn resume(&self, stored: TokenResponse) -> SmartResult<SmartClient> {
        let state = stored
            .state
            .clone()
            .ok_or_else(|| SmartError::state_mismatch("stored token carries no state"))?;
        let session = self.session(&state).await?;

        let refreshable = stored.refresh_token.is_some() && stored.has_online_access();
        if refreshable && stored.expires_within(REFRESH_WINDOW_SECS) {
            debug!(%state, "access token near expiry, refreshing");
            let refresh_token = stored.refresh_token.clone().unwrap_or_default();
            let mut token = self
                .token_request(
                    &session,
                    &[
                        ("grant_type", "refresh_token"),
                        ("refresh_token", &refresh_token),
                    ],
                )
                .await?;
            token.state = Some(state);
            if token.refresh_token.is_none() {
                token.refresh_token = stored.refresh_token;
            }
            return self.finish(session, token).await;
        }

        self.finish(session, stored).await
    }

    async fn exchange_code(
        &self,
        session: &AuthorizationSession,
        code: &str,
    ) -> SmartResult<TokenResponse> {
        let redirect_uri = session.client.redirect_uri.clone().ok_or_else(|| {
            SmartError::configuration("stored session's client has no redirect_uri")
        })?;
        self.token_request(
            session,
            &[
                ("code", code),
                ("grant_type", "authorization_code"),
                ("redirect_uri", &redirect_uri),
            ],
        )
        .await
    }

    /// Posts a form to the session's token endpoint. Confidential
    /// clients authenticate with HTTP Basic; public clients put their
    /// `client_id` in the body.
    async fn token_request(
        &self,
        session: &AuthorizationSession,
        fields: &[(&str, &str)],
    ) -> SmartResult<TokenResponse> {
        let oauth2 = session.provider.oauth2.as_ref().ok_or_else(|| {
            SmartError::configuration("session's provider has no OAuth endpoints")
        })?;

        let mut form = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in fields {
            form.append_pair(key, value);
        }

        let mut request = HttpRequest::new("POST", &oauth2.token_uri)
            .with_header("Content-Type", "application/x-www-form-urlencoded")
            .with_header("Accept", "application/json");
        match &session.client.client_secret {
            Some(secret) => {
                let credential = Credential::basic(&session.client.client_id, secret);
                if let Some(header) = credential.authorization_header() {
                    request = request.with_header("Authorization", header);
                }
            }
            None => {
                form.append_pair("client_id", &session.client.client_id);
            }
        }
        request.body = Some(form.finish());

        let response = match self.transport().send(request).await {
            Ok(response) => response,
            Err(TransportError::Http { status, body }) => {
                return Err(SmartError::token_exchange(format!("HTTP {status}: {body}")));
            }
            Err(err) => return Err(err.into()),
        };
        parse_token_response(response.body)
    }

    /// Persists the token and builds the authorized client.
    async fn finish(
        &self,
        session: AuthorizationSession,
        token: TokenResponse,
    ) -> SmartResult<SmartClient> {
        self.store().put_token(&session.state, &token).await?;

        let credential = match &token.access_token {
            Some(access_token) => Credential::bearer(access_token),
            None => Credential::None,
        };
        let mut config =
            ClientConfig::new(&session.provider.url).with_credential(credential);
        if let Some(patient) = &token.patient {
            config = config.with_patient(patient);
        }
        let api = FhirClient::new(config, self.transport());

        Ok(SmartClient {
            patient_id: token.patient.clone(),
            user_id: token.user_profile(),
            state: session.state.clone(),
            api,
            token,
        })
    }
}

fn parse_token_response(body: Value) -> SmartResult<TokenResponse> {
    let token: TokenResponse = serde_json::from_value(body)?;
    if token.access_token.is_none() {
        return Err(SmartError::token_exchange(
            "token endpoint answered without an access_token",
        ));
    }
    Ok(token)
}
