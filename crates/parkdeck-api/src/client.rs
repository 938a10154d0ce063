// Hand-crafted async HTTP client for the ParkDeck platform API.
//
// Wraps `reqwest::Client` with base-URL handling, per-request bearer
// injection, and envelope normalization. All endpoint modules
// (lots, packages, subscriptions, etc.) are implemented as inherent
// methods via separate files to keep this module focused on transport
// mechanics.

use std::future::Future;

use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::auth::TokenSource;
use crate::envelope::{self, Page};
use crate::error::Error;
use crate::transport::TransportConfig;

// ── Error response shape ─────────────────────────────────────────────

#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the ParkDeck platform API.
///
/// Reads the access token from its [`TokenSource`] on every request, so
/// token rotation (login, refresh) is visible immediately. Cheap to
/// clone; all clones share the same connection pool and token cell.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    tokens: TokenSource,
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client against the platform gateway URL.
    pub fn new(
        base_url: &str,
        tokens: TokenSource,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url: Self::normalize_base_url(base_url)?,
            tokens,
        })
    }

    /// Wrap an existing `reqwest::Client` (used by tests).
    pub fn from_reqwest(
        base_url: &str,
        http: reqwest::Client,
        tokens: TokenSource,
    ) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: Self::normalize_base_url(base_url)?,
            tokens,
        })
    }

    /// The shared token cell.
    pub fn tokens(&self) -> &TokenSource {
        &self.tokens
    }

    /// The gateway base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Ensure the base URL ends with a single `/` so relative joins work.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"api/v1/parking-service/parking-lots"`)
    /// onto the base URL.
    fn url(&self, path: &str) -> Url {
        // base_url always ends with `/`, so joining a relative path works.
        self.base_url
            .join(path)
            .expect("path should be valid relative URL")
    }

    /// Attach the bearer token, if one is loaded.
    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.tokens.access_token() {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path);
        debug!("GET {url}");

        let resp = self.authorize(self.http.get(url)).send().await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path);
        debug!("GET {url} params={params:?}");

        let resp = self
            .authorize(self.http.get(url).query(params))
            .send()
            .await?;
        self.handle_response(resp).await
    }

    /// GET a paginated collection, normalizing both page shapes.
    pub(crate) async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Page<T>, Error> {
        let url = self.url(path);
        debug!("GET {url} params={params:?}");

        let resp = self
            .authorize(self.http.get(url).query(params))
            .send()
            .await?;
        let body = self.success_body(resp).await?;
        let data = envelope::unwrap_data(&body, 200)?;
        envelope::decode_page(data, &body)
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path);
        debug!("POST {url}");

        let resp = self.authorize(self.http.post(url).json(body)).send().await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path);
        debug!("PUT {url}");

        let resp = self.authorize(self.http.put(url).json(body)).send().await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn patch<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path);
        debug!("PATCH {url}");

        let resp = self
            .authorize(self.http.patch(url).json(body))
            .send()
            .await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path);
        debug!("DELETE {url}");

        let resp = self.authorize(self.http.delete(url)).send().await?;
        self.handle_empty(resp).await
    }

    /// GET an opaque binary payload (spreadsheet export).
    pub(crate) async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, Error> {
        let url = self.url(path);
        debug!("GET {url} (binary)");

        let resp = self.authorize(self.http.get(url)).send().await?;
        let status = resp.status();
        if status.is_success() {
            Ok(resp.bytes().await?.to_vec())
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    /// POST an opaque binary payload (spreadsheet import).
    pub(crate) async fn post_bytes<T: DeserializeOwned>(
        &self,
        path: &str,
        payload: Vec<u8>,
    ) -> Result<T, Error> {
        let url = self.url(path);
        debug!("POST {url} (binary, {} bytes)", payload.len());

        let resp = self
            .authorize(
                self.http
                    .post(url)
                    .header("Content-Type", "application/octet-stream")
                    .body(payload),
            )
            .send()
            .await?;
        self.handle_response(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    /// Return the body text of a successful response, or map the
    /// failure to an error. 401 always means the session is gone.
    async fn success_body(&self, resp: reqwest::Response) -> Result<String, Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(resp.text().await?)
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let body = self.success_body(resp).await?;
        let data = envelope::unwrap_data(&body, 200)?;
        envelope::decode(data, &body)
    }

    async fn handle_empty(&self, resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            // Some mutation endpoints return an envelope, some nothing.
            // Either way there is no payload the caller needs.
            Ok(())
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn parse_error(&self, status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Error::SessionExpired;
        }

        let raw = resp.text().await.unwrap_or_default();

        if let Ok(err) = serde_json::from_str::<ErrorBody>(&raw) {
            Error::Api {
                status: status.as_u16(),
                message: err.message.unwrap_or_else(|| status.to_string()),
                code: err.code,
            }
        } else {
            Error::Api {
                status: status.as_u16(),
                message: if raw.is_empty() {
                    status.to_string()
                } else {
                    raw
                },
                code: None,
            }
        }
    }

    // ── Pagination helper ────────────────────────────────────────────

    /// Collect all pages of a paged endpoint into a single `Vec<T>`.
    pub async fn paginate_all<T, F, Fut>(&self, size: u32, fetch: F) -> Result<Vec<T>, Error>
    where
        F: Fn(u32, u32) -> Fut,
        Fut: Future<Output = Result<Page<T>, Error>>,
    {
        let mut all = Vec::new();
        let mut page: u32 = 0;

        loop {
            let result = fetch(page, size).await?;
            let received = result.content.len();
            all.extend(result.content);

            let done = received < usize::try_from(size).unwrap_or(0)
                || page + 1 >= result.total_pages
                || u64::try_from(all.len()).unwrap_or(u64::MAX) >= result.total_elements;
            if done {
                break;
            }

            page += 1;
        }

        Ok(all)
    }
}
