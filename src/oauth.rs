//! OAuth 2.0 authorization-code flow against Google's endpoints.
//!
//! The flow itself (PKCE, CSRF state, code exchange, token refresh) lives
//! in [`OAuthManager`]. How the authorization code gets from the user back
//! to us is abstracted behind [`ConsentPrompt`], with two implementations:
//! a loopback-redirect variant that drives the user's browser, and an
//! out-of-band variant that reads a pasted code from stdin.

use crate::config::InstalledClientSecret;
use crate::error::AuthError;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::service::service_fn;
use hyper::{Request, Response, body};
use oauth2::basic::{BasicClient, BasicTokenResponse};
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, PkceCodeChallenge, RedirectUrl,
    Scope, TokenResponse, TokenUrl, reqwest,
};
use std::net::SocketAddr;
use tokio::io::AsyncBufReadExt;
use tokio::net::TcpListener;
use url::Url;

const SCOPE_UPLOAD: &str = "https://www.googleapis.com/auth/youtube.upload";
const SCOPE_READONLY: &str = "https://www.googleapis.com/auth/youtube.readonly";

/// Legacy out-of-band redirect target: the provider displays the code for
/// the user to copy instead of redirecting anywhere.
const OOB_REDIRECT: &str = "urn:ietf:wg:oauth:2.0:oob";

const CONSENT_DONE_HTML: &str =
    "<html><body>Authorization complete. You can close this tab and return to the terminal.</body></html>";
const CONSENT_CANCELLED_HTML: &str =
    "<html><body>Authorization was cancelled. You can close this tab.</body></html>";

/// Obtains an authorization code from the user, given the authorization URL
/// they must visit.
///
/// Returning [`AuthError::Cancelled`] is the normal signal for "the user
/// backed out"; anything else means the interaction channel itself broke.
#[allow(async_fn_in_trait)]
pub trait ConsentPrompt {
    /// The redirect URI to register with the authorization request.
    fn redirect_uri(&self) -> Result<RedirectUrl, AuthError>;

    /// Shows `auth_url` to the user and waits for the resulting code.
    ///
    /// `state` is the CSRF token embedded in the URL; implementations that
    /// see the provider's redirect must verify it matches.
    async fn obtain_code(
        &mut self,
        auth_url: &Url,
        state: &CsrfToken,
    ) -> Result<AuthorizationCode, AuthError>;
}

/// Out-of-band prompt: print the URL, read the pasted code from stdin.
///
/// Cannot validate the CSRF state (the user relays the code by hand), so an
/// empty line is the only cancellation signal.
#[derive(Debug, Default)]
pub struct StdinPrompt;

impl ConsentPrompt for StdinPrompt {
    fn redirect_uri(&self) -> Result<RedirectUrl, AuthError> {
        RedirectUrl::new(OOB_REDIRECT.to_string())
            .map_err(|e| AuthError::Interaction(format!("construct out-of-band redirect: {e}")))
    }

    async fn obtain_code(
        &mut self,
        auth_url: &Url,
        _state: &CsrfToken,
    ) -> Result<AuthorizationCode, AuthError> {
        println!("Open this URL in your browser and authorize the application:");
        println!();
        println!("  {auth_url}");
        println!();
        println!("Paste the authorization code here and press enter (empty line aborts):");

        let mut line = String::new();
        let mut stdin = tokio::io::BufReader::new(tokio::io::stdin());
        stdin
            .read_line(&mut line)
            .await
            .map_err(|e| AuthError::Interaction(format!("read authorization code: {e}")))?;

        let code = line.trim();
        if code.is_empty() {
            return Err(AuthError::Cancelled);
        }
        Ok(AuthorizationCode::new(code.to_string()))
    }
}

/// Browser-driven prompt: bind an ephemeral localhost port, open the user's
/// browser at the authorization URL, and catch the provider's redirect with
/// a one-shot HTTP server.
pub struct LoopbackPrompt {
    listener: Option<TcpListener>,
    addr: SocketAddr,
}

impl LoopbackPrompt {
    /// Binds the redirect listener. Must happen before the authorization
    /// URL is built, since the ephemeral port becomes part of the redirect
    /// URI.
    pub async fn bind() -> Result<Self, AuthError> {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| AuthError::Interaction(format!("bind redirect listener: {e}")))?;
        let addr = listener
            .local_addr()
            .map_err(|e| AuthError::Interaction(format!("resolve redirect address: {e}")))?;
        Ok(Self {
            listener: Some(listener),
            addr,
        })
    }

    /// Serves exactly one connection: validates the CSRF state, extracts
    /// the code, answers the browser with a static page, then shuts down.
    async fn serve_one(
        listener: TcpListener,
        state: CsrfToken,
    ) -> Result<AuthorizationCode, AuthError> {
        let (conn, _) = listener
            .accept()
            .await
            .map_err(|e| AuthError::Interaction(format!("accept redirect connection: {e}")))?;
        let conn = hyper_util::rt::TokioIo::new(conn);

        let (got, mut gotten) = tokio::sync::mpsc::channel(1);
        let service = service_fn(move |req: Request<body::Incoming>| {
            let state = state.clone();
            let got = got.clone();
            async move {
                let mut presented_state = None;
                let mut presented_code = None;
                for (k, v) in form_urlencoded::parse(req.uri().query().unwrap_or("").as_bytes()) {
                    match &*k {
                        "state" => presented_state = Some(v),
                        "code" => presented_code = Some(v),
                        _ => {}
                    }
                }
                if presented_state.as_deref() != Some(state.secret().as_str()) {
                    return Err("authorization redirect carried an invalid state token");
                }
                let outcome = match presented_code {
                    Some(code) if !code.is_empty() => {
                        Ok(AuthorizationCode::new(code.into_owned()))
                    }
                    // The provider redirects without a code when the user
                    // denies consent.
                    _ => Err(AuthError::Cancelled),
                };
                let page = if outcome.is_ok() {
                    CONSENT_DONE_HTML
                } else {
                    CONSENT_CANCELLED_HTML
                };
                got.send(outcome)
                    .await
                    .expect("receiver is held until the server exits");
                Ok(Response::new(Full::<Bytes>::from(page)))
            }
        });

        let mut serve =
            std::pin::pin!(hyper::server::conn::http1::Builder::new().serve_connection(conn, service));

        tokio::select! {
            exit = &mut serve => {
                match exit {
                    Err(e) => Err(AuthError::Interaction(format!("redirect server got bad request: {e}"))),
                    Ok(()) => Err(AuthError::Interaction("redirect server exited prematurely".to_string())),
                }
            }
            outcome = gotten.recv() => {
                serve.as_mut().graceful_shutdown();
                outcome.expect("channel outlives the service closure")
            }
        }
    }
}

impl ConsentPrompt for LoopbackPrompt {
    fn redirect_uri(&self) -> Result<RedirectUrl, AuthError> {
        RedirectUrl::new(format!("http://{}:{}", self.addr.ip(), self.addr.port()))
            .map_err(|e| AuthError::Interaction(format!("construct redirect uri: {e}")))
    }

    async fn obtain_code(
        &mut self,
        auth_url: &Url,
        state: &CsrfToken,
    ) -> Result<AuthorizationCode, AuthError> {
        let listener = self
            .listener
            .take()
            .ok_or_else(|| AuthError::Interaction("redirect listener already used".to_string()))?;

        let state = state.clone();
        let (tx, rx) = tokio::sync::oneshot::channel();
        tokio::spawn(async move {
            let _ = tx.send(Self::serve_one(listener, state).await);
        });

        if let Err(e) = webbrowser::open(auth_url.as_str()) {
            tracing::warn!(error = %e, "could not open a browser; falling back to manual navigation");
            println!("Open this URL in your browser to authorize the application:");
            println!();
            println!("  {auth_url}");
        }

        rx.await
            .map_err(|_| AuthError::Interaction("redirect listener dropped prematurely".to_string()))?
    }
}

/// Drives authorization-code and refresh-token exchanges for one OAuth
/// client registration.
#[derive(Debug, Clone)]
pub struct OAuthManager {
    client_id: String,
    client_secret: String,
    auth_uri: String,
    token_uri: String,
}

impl OAuthManager {
    pub fn new(secret: &InstalledClientSecret) -> Self {
        Self {
            client_id: secret.client_id.clone(),
            client_secret: secret.client_secret.clone(),
            auth_uri: secret.auth_uri.clone(),
            token_uri: secret.token_uri.clone(),
        }
    }

    /// Runs one complete authorization-code flow: build the authorization
    /// URL (upload + read-only scopes), hand it to the prompt, and exchange
    /// the returned code for tokens.
    ///
    /// Nothing is persisted here; the caller decides what to do with the
    /// returned credentials.
    pub async fn authorize(
        &self,
        prompt: &mut impl ConsentPrompt,
    ) -> Result<BasicTokenResponse, AuthError> {
        let redirect_uri = prompt.redirect_uri()?;
        let auth_url = AuthUrl::new(self.auth_uri.clone())
            .map_err(|e| AuthError::Exchange(format!("invalid authorization endpoint: {e}")))?;
        let token_url = TokenUrl::new(self.token_uri.clone())
            .map_err(|e| AuthError::Exchange(format!("invalid token endpoint: {e}")))?;

        let client = BasicClient::new(ClientId::new(self.client_id.clone()))
            .set_client_secret(ClientSecret::new(self.client_secret.clone()))
            .set_auth_uri(auth_url)
            .set_token_uri(token_url)
            .set_redirect_uri(redirect_uri);

        let csrf = CsrfToken::new_random();
        let state = csrf.clone();
        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();
        let (auth_url, _csrf_token) = client
            // the flow runs exactly once, so the state token is never re-used
            .authorize_url(move || state.clone())
            .add_scope(Scope::new(SCOPE_UPLOAD.to_string()))
            .add_scope(Scope::new(SCOPE_READONLY.to_string()))
            .set_pkce_challenge(pkce_challenge)
            .url();

        tracing::info!(url = %auth_url, "asking user to follow the OAuth consent flow");
        let code = prompt.obtain_code(&auth_url, &csrf).await?;

        let token = client
            .exchange_code(code)
            .set_pkce_verifier(pkce_verifier)
            .request_async(&no_redirect_http_client())
            .await
            .map_err(|e| AuthError::Exchange(e.to_string()))?;

        if token.access_token().secret().is_empty() {
            return Err(AuthError::CredentialsUnobtainable);
        }
        Ok(token)
    }

    /// Exchanges a refresh token for a new access token.
    ///
    /// Returns `Ok(None)` when the grant is gone (no refresh token, or the
    /// provider reports `invalid_grant`); the caller should then fall back
    /// to [`Self::authorize`]. Network failures are real errors.
    pub async fn refresh(
        &self,
        token: BasicTokenResponse,
    ) -> Result<Option<BasicTokenResponse>, AuthError> {
        let Some(refresh_token) = token.refresh_token() else {
            tracing::warn!("no refresh token available, cannot refresh");
            return Ok(None);
        };

        tracing::debug!("attempting to refresh OAuth token");
        let token_url = TokenUrl::new(self.token_uri.clone())
            .map_err(|e| AuthError::Exchange(format!("invalid token endpoint: {e}")))?;
        let client = BasicClient::new(ClientId::new(self.client_id.clone()))
            .set_client_secret(ClientSecret::new(self.client_secret.clone()))
            .set_token_uri(token_url);

        match client
            .exchange_refresh_token(refresh_token)
            .request_async(&no_redirect_http_client())
            .await
        {
            Ok(new_token) => {
                tracing::debug!("successfully refreshed OAuth token");
                Ok(Some(new_token))
            }
            Err(ref e @ oauth2::RequestTokenError::ServerResponse(ref sr))
                if matches!(
                    sr.error(),
                    oauth2::basic::BasicErrorResponseType::InvalidGrant
                ) =>
            {
                tracing::warn!("refresh token considered an invalid grant: {e}");
                Ok(None)
            }
            Err(e) => Err(AuthError::Exchange(e.to_string())),
        }
    }
}

fn no_redirect_http_client() -> reqwest::Client {
    reqwest::ClientBuilder::new()
        // SSRF no thank you.
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("building reqwest client should not fail")
}
