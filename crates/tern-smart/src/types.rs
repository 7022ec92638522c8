//! SMART launch and token types.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

/// OAuth client registration supplied by the launching application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientRegistration {
    /// Registered OAuth client identifier.
    pub client_id: String,

    /// Client secret for confidential clients. When present, token
    /// requests authenticate with HTTP Basic instead of a body
    /// `client_id`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,

    /// Requested scopes (space-separated).
    pub scope: String,

    /// Redirect URI registered for the client.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_uri: Option<String>,

    /// Opaque EHR launch parameter, set when the app was launched with a
    /// `launch` URL parameter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub launch: Option<String>,
}

impl ClientRegistration {
    /// Creates a registration for a public client.
    #[must_use]
    pub fn new(client_id: impl Into<String>, scope: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: None,
            scope: scope.into(),
            redirect_uri: None,
            launch: None,
        }
    }

    /// Sets the redirect URI.
    #[must_use]
    pub fn with_redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(redirect_uri.into());
        self
    }

    /// Sets the client secret, making this a confidential client.
    #[must_use]
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.client_secret = Some(secret.into());
        self
    }
}

/// OAuth endpoint URIs discovered from a server's conformance statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthUris {
    /// Authorization endpoint.
    pub authorize_uri: String,
    /// Token endpoint.
    pub token_uri: String,
    /// Dynamic registration endpoint, when advertised.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub register_uri: Option<String>,
}

/// A FHIR server and its (optional) OAuth security endpoints.
///
/// A provider without `oauth2` is an open server: the launch machinery
/// bypasses authorization entirely and issues unauthenticated requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provider {
    /// FHIR service base URL.
    pub url: String,
    /// OAuth endpoints, absent for open servers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oauth2: Option<OAuthUris>,
}

impl Provider {
    /// Creates an open (no-OAuth) provider.
    #[must_use]
    pub fn open(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            oauth2: None,
        }
    }
}

/// Authorization session persisted across the redirect round-trip,
/// keyed by the generated `state` value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizationSession {
    /// The normalized client registration at `authorize()` time.
    pub client: ClientRegistration,
    /// The provider the session was started against.
    pub provider: Provider,
    /// Requested response type (`code` or `token`).
    pub response_type: String,
    /// The state GUID threading the round-trip.
    pub state: String,
    /// Synthesized token response for open servers (bypass mode).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fake_token_response: Option<TokenResponse>,
    /// Completed token response, for per-state token persistence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_response: Option<TokenResponse>,
}

/// Response from the token endpoint (or parsed from an implicit-grant
/// fragment). All fields are optional; the flow validates what it needs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenResponse {
    /// The access token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    /// Token type, `Bearer` when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,

    /// Access token lifetime in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,

    /// Granted scopes (space-separated).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    /// Refresh token, when `online_access`/`offline_access` was granted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// OpenID Connect ID token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,

    /// Patient context from the SMART launch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient: Option<String>,

    /// The state value this token belongs to. Merged in by the flow; the
    /// reload path uses it to find the owning session.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl TokenResponse {
    /// Parses an implicit-grant URL fragment (`access_token=...&state=...`).
    #[must_use]
    pub fn from_fragment(fragment: &str) -> Self {
        let mut token = Self::default();
        for (key, value) in url::form_urlencoded::parse(fragment.as_bytes()) {
            let value = value.into_owned();
            match key.as_ref() {
                "access_token" => token.access_token = Some(value),
                "token_type" => token.token_type = Some(value),
                "expires_in" => token.expires_in = value.parse().ok(),
                "scope" => token.scope = Some(value),
                "refresh_token" => token.refresh_token = Some(value),
                "id_token" => token.id_token = Some(value),
                "patient" => token.patient = Some(value),
                "state" => token.state = Some(value),
                _ => {}
            }
        }
        token
    }

    /// Decodes the access token's JWT claims, when it is a JWT.
    #[must_use]
    pub fn access_claims(&self) -> Option<Value> {
        decode_jwt_payload(self.access_token.as_deref()?)
    }

    /// Expiry instant from the decoded access token's `exp` claim.
    #[must_use]
    pub fn expires_at(&self) -> Option<OffsetDateTime> {
        let exp = self.access_claims()?.get("exp")?.as_i64()?;
        OffsetDateTime::from_unix_timestamp(exp).ok()
    }

    /// Whether the access token expires within `window_secs` from now.
    ///
    /// A token without a decodable `exp` claim is treated as not
    /// expiring.
    #[must_use]
    pub fn expires_within(&self, window_secs: i64) -> bool {
        match self.expires_at() {
            Some(expires_at) => {
                expires_at - OffsetDateTime::now_utc() < time::Duration::seconds(window_secs)
            }
            None => false,
        }
    }

    /// Whether the granted scope includes `online_access`.
    #[must_use]
    pub fn has_online_access(&self) -> bool {
        self.scope
            .as_deref()
            .is_some_and(|scope| scope.split_whitespace().any(|s| s == "online_access"))
    }

    /// The `profile` claim of the ID token, identifying the user.
    #[must_use]
    pub fn user_profile(&self) -> Option<String> {
        let claims = decode_jwt_payload(self.id_token.as_deref()?)?;
        claims.get("profile")?.as_str().map(str::to_string)
    }
}

/// Decodes the payload segment of a JWT without verifying the signature.
///
/// Signature verification is the token issuer's collaborator concern;
/// this layer only reads claims (`exp`, `profile`) for flow decisions.
#[must_use]
pub fn decode_jwt_payload(token: &str) -> Option<Value> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    serde_json::from_slice(&bytes).ok()
}
