//! Authorization kickoff.
//!
//! [`SmartLaunch::authorize`] turns a launch request into either an
//! authorization redirect URL (OAuth-secured servers) or a bypass
//! redirect with a synthesized token (open servers). In both cases the
//! session is persisted under a fresh `state` GUID before the outcome is
//! returned, so the callback half of the flow can pick it up.

use std::sync::Arc;

use tern_core::Transport;
use tracing::info;
use url::Url;
use uuid::Uuid;

use crate::discovery::discover;
use crate::error::{SmartError, SmartResult};
use crate::session::SessionStore;
use crate::types::{AuthorizationSession, ClientRegistration, Provider, TokenResponse};

/// SMART launch context parameters, usually taken from the launch URL's
/// query string (`iss`, `launch`) or from out-of-band configuration.
#[derive(Debug, Clone, Default)]
pub struct LaunchParams {
    /// Issuer URL of the launching EHR's FHIR server.
    pub iss: Option<String>,

    /// FHIR service URL for standalone launches against servers that do
    /// not pass `iss`. When set without `iss`, authorization is bypassed
    /// and the server is treated as open.
    pub fhir_service_url: Option<String>,

    /// Opaque launch context handle from the EHR.
    pub launch: Option<String>,

    /// Patient to pin the bypass session to, for open servers.
    pub patient_id: Option<String>,
}

impl LaunchParams {
    /// Parses launch parameters from a URL query string (without the
    /// leading `?`). Unknown parameters are ignored.
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let mut params = Self::default();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            let value = value.into_owned();
            match key.as_ref() {
                "iss" => params.iss = Some(value),
                "fhirServiceUrl" => params.fhir_service_url = Some(value),
                "launch" => params.launch = Some(value),
                "patientId" => params.patient_id = Some(value),
                _ => {}
            }
        }
        params
    }
}

/// Everything needed to start an authorization round-trip.
#[derive(Debug, Clone)]
pub struct LaunchRequest {
    /// The OAuth client registration.
    pub client: ClientRegistration,

    /// Explicit FHIR server URL, overriding `iss`/`fhirServiceUrl`.
    pub server: Option<String>,

    /// Pre-resolved provider, skipping endpoint discovery.
    pub provider: Option<Provider>,

    /// OAuth response type; defaults to `code`.
    pub response_type: Option<String>,

    /// Launch context parameters.
    pub params: LaunchParams,
}

impl LaunchRequest {
    /// Creates a request with just a client registration; everything
    /// else comes from [`LaunchParams`] or defaults.
    #[must_use]
    pub fn new(client: ClientRegistration, params: LaunchParams) -> Self {
        Self {
            client,
            server: None,
            provider: None,
            response_type: None,
            params,
        }
    }

    /// Overrides the FHIR server URL.
    #[must_use]
    pub fn with_server(mut self, server: impl Into<String>) -> Self {
        self.server = Some(server.into());
        self
    }

    /// Supplies a pre-resolved provider, skipping discovery.
    #[must_use]
    pub fn with_provider(mut self, provider: Provider) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Sets the OAuth response type.
    #[must_use]
    pub fn with_response_type(mut self, response_type: impl Into<String>) -> Self {
        self.response_type = Some(response_type.into());
        self
    }
}

/// Where the host application must send the user next.
///
/// The library never navigates; it hands the URL back to the host, which
/// owns the user agent.
#[derive(Debug, Clone)]
pub enum AuthorizeOutcome {
    /// Navigate to the authorization endpoint.
    Redirect {
        /// Fully-built authorization URL.
        url: Url,
        /// The state GUID the session was stored under.
        state: String,
    },

    /// Open server: authorization was bypassed, navigate straight to the
    /// redirect URI. The callback half replays the synthesized token.
    Bypass {
        /// The client's redirect URI with `state` appended.
        redirect: Url,
        /// The state GUID the session was stored under.
        state: String,
    },
}

impl AuthorizeOutcome {
    /// The state GUID of the stored session.
    #[must_use]
    pub fn state(&self) -> &str {
        match self {
            Self::Redirect { state, .. } | Self::Bypass { state, .. } => state,
        }
    }
}

/// Drives the authorization half of the SMART launch flow.
pub struct SmartLaunch {
    transport: Arc<dyn Transport>,
    store: Arc<dyn SessionStore>,
}

impl SmartLaunch {
    /// Creates a launch driver over the given transport and session
    /// store.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, store: Arc<dyn SessionStore>) -> Self {
        Self { transport, store }
    }

    /// The session store, shared with the callback half of the flow.
    #[must_use]
    pub fn store(&self) -> Arc<dyn SessionStore> {
        Arc::clone(&self.store)
    }

    /// The injected transport.
    #[must_use]
    pub fn transport(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.transport)
    }

    /// Starts an authorization round-trip.
    ///
    /// Normalizes the request (default response type, launch scope),
    /// resolves the provider (override, bypass, or discovery), persists
    /// the session, and returns the redirect the host must perform.
    pub async fn authorize(&self, request: LaunchRequest) -> SmartResult<AuthorizeOutcome> {
        // A stale token from a previous launch must not shadow this one.
        self.store.clear_token().await?;

        let mut client = request.client;
        let response_type = request.response_type.unwrap_or_else(|| "code".to_string());

        if let Some(launch) = &request.params.launch {
            if !client.scope.split_whitespace().any(|s| s == "launch") {
                client.scope = format!("{} launch", client.scope);
            }
            client.launch = Some(launch.clone());
        }

        let redirect_uri = client.redirect_uri.clone().ok_or_else(|| {
            SmartError::configuration("client registration has no redirect_uri")
        })?;

        let server = request
            .server
            .or_else(|| request.params.iss.clone())
            .or_else(|| request.params.fhir_service_url.clone())
            .ok_or_else(|| {
                SmartError::configuration("no server: set server, iss, or fhirServiceUrl")
            })?;

        // fhirServiceUrl without iss means an open server: skip
        // discovery and synthesize the authorization outcome.
        let bypass = request.params.fhir_service_url.is_some() && request.params.iss.is_none();

        let provider = match request.provider {
            Some(provider) => provider,
            None if bypass => Provider::open(&server),
            None => discover(self.transport.as_ref(), &server).await?,
        };

        let state = Uuid::new_v4().to_string();

        match &provider.oauth2 {
            Some(oauth2) => {
                let mut url = Url::parse(&oauth2.authorize_uri)
                    .map_err(|e| SmartError::configuration(format!("bad authorize URI: {e}")))?;
                {
                    let mut pairs = url.query_pairs_mut();
                    pairs
                        .append_pair("client_id", &client.client_id)
                        .append_pair("response_type", &response_type)
                        .append_pair("scope", &client.scope)
                        .append_pair("redirect_uri", &redirect_uri)
                        .append_pair("state", &state)
                        .append_pair("aud", &server);
                    if let Some(launch) = &client.launch {
                        pairs.append_pair("launch", launch);
                    }
                }

                let session = AuthorizationSession {
                    client,
                    provider,
                    response_type,
                    state: state.clone(),
                    fake_token_response: None,
                    token_response: None,
                };
                self.store.put_session(&session).await?;
                info!(%state, "authorization redirect prepared");
                Ok(AuthorizeOutcome::Redirect { url, state })
            }
            None => {
                let fake = TokenResponse {
                    patient: request.params.patient_id.clone(),
                    state: Some(state.clone()),
                    ..Default::default()
                };
                let session = AuthorizationSession {
                    client,
                    provider,
                    response_type,
                    state: state.clone(),
                    fake_token_response: Some(fake),
                    token_response: None,
                };
                self.store.put_session(&session).await?;

                let mut redirect = Url::parse(&redirect_uri)
                    .map_err(|e| SmartError::configuration(format!("bad redirect URI: {e}")))?;
                redirect.query_pairs_mut().append_pair("state", &state);
                info!(%state, "open server, authorization bypassed");
                Ok(AuthorizeOutcome::Bypass { redirect, state })
            }
        }
    }
}
