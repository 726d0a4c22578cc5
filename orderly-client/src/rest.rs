//! Low-level REST client for the tenant data store
//!
//! Thin wrapper over reqwest speaking the store's PostgREST
//! conventions: filters as `col=eq.value` query parameters, ordering as
//! `order=col.asc`, upserts via `on_conflict` plus a resolution Prefer
//! header, and single-row reads via the object Accept header. The
//! response handler is the only place store errors are classified.

use reqwest::{Client, StatusCode, header};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{ClientConfig, StoreError, StoreResult};

/// Filter/order parameters for a table request.
#[derive(Debug, Clone, Default)]
pub struct Query {
    params: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Equality filter: `col=eq.value`
    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.params
            .push((column.to_string(), format!("eq.{}", value.to_string())));
        self
    }

    /// Ascending order on `column`
    pub fn order_asc(mut self, column: &str) -> Self {
        self.params
            .push(("order".to_string(), format!("{}.asc", column)));
        self
    }

    /// Descending order on `column`
    pub fn order_desc(mut self, column: &str) -> Self {
        self.params
            .push(("order".to_string(), format!("{}.desc", column)));
        self
    }

    /// Column projection, including embedded relations
    /// (e.g. `*,tenants(*),profiles(*)`)
    pub fn select(mut self, columns: &str) -> Self {
        self.params
            .push(("select".to_string(), columns.to_string()));
        self
    }

    fn params(&self) -> &[(String, String)] {
        &self.params
    }
}

/// HTTP client for the relational REST API
#[derive(Debug, Clone)]
pub struct RestClient {
    client: Client,
    base_url: String,
    api_key: String,
    token: Option<String>,
}

impl RestClient {
    /// Create a new REST client from configuration
    pub fn new(config: &ClientConfig) -> StoreResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: config.rest_url(),
            api_key: config.api_key.clone(),
            token: None,
        })
    }

    /// Set the session token used for row-level policy checks
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn url(&self, table: &str) -> String {
        format!("{}/{}", self.base_url, table)
    }

    fn bearer(&self) -> String {
        // Anonymous requests authenticate with the api key itself.
        let token = self.token.as_deref().unwrap_or(&self.api_key);
        format!("Bearer {}", token)
    }

    fn request(&self, method: reqwest::Method, table: &str, query: &Query) -> reqwest::RequestBuilder {
        self.client
            .request(method, self.url(table))
            .query(query.params())
            .header("apikey", &self.api_key)
            .header(header::AUTHORIZATION, self.bearer())
    }

    /// Select all rows matching the query
    pub async fn select<T: DeserializeOwned>(&self, table: &str, query: &Query) -> StoreResult<Vec<T>> {
        let response = self.request(reqwest::Method::GET, table, query).send().await?;
        Self::handle_response(response).await
    }

    /// Select exactly one row; zero rows map to `StoreError::RowNotFound`
    pub async fn select_single<T: DeserializeOwned>(&self, table: &str, query: &Query) -> StoreResult<T> {
        let response = self
            .request(reqwest::Method::GET, table, query)
            .header(header::ACCEPT, "application/vnd.pgrst.object+json")
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Insert a single row and return the persisted representation
    pub async fn insert<T: DeserializeOwned, B: Serialize>(&self, table: &str, body: &B) -> StoreResult<T> {
        let response = self
            .request(reqwest::Method::POST, table, &Query::new())
            .header("Prefer", "return=representation")
            .header(header::ACCEPT, "application/vnd.pgrst.object+json")
            .json(body)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Insert several rows in one request
    pub async fn insert_many<T: DeserializeOwned, B: Serialize>(
        &self,
        table: &str,
        rows: &[B],
    ) -> StoreResult<Vec<T>> {
        let response = self
            .request(reqwest::Method::POST, table, &Query::new())
            .header("Prefer", "return=representation")
            .json(rows)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Upsert a row on `on_conflict` columns, merging duplicates
    pub async fn upsert<T: DeserializeOwned, B: Serialize>(
        &self,
        table: &str,
        on_conflict: &str,
        body: &B,
    ) -> StoreResult<T> {
        let query = Query {
            params: vec![("on_conflict".to_string(), on_conflict.to_string())],
        };
        let response = self
            .request(reqwest::Method::POST, table, &query)
            .header("Prefer", "return=representation,resolution=merge-duplicates")
            .header(header::ACCEPT, "application/vnd.pgrst.object+json")
            .json(body)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Update matching rows with the supplied partial and return one row
    pub async fn update<T: DeserializeOwned, B: Serialize>(
        &self,
        table: &str,
        query: &Query,
        body: &B,
    ) -> StoreResult<T> {
        let response = self
            .request(reqwest::Method::PATCH, table, query)
            .header("Prefer", "return=representation")
            .header(header::ACCEPT, "application/vnd.pgrst.object+json")
            .json(body)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Delete matching rows
    pub async fn delete(&self, table: &str, query: &Query) -> StoreResult<()> {
        let response = self.request(reqwest::Method::DELETE, table, query).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        Err(Self::classify_error(status, response.text().await?))
    }

    /// Handle the HTTP response
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> StoreResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await?;
            return Err(Self::classify_error(status, text));
        }

        response.json().await.map_err(Into::into)
    }

    fn classify_error(status: StatusCode, body: String) -> StoreError {
        let (code, message) = Self::parse_error_body(&body);

        // The object Accept header makes a zero-row single read come
        // back as 406 with code PGRST116. Only the structured code
        // field counts; a message merely mentioning the code does not.
        if status == StatusCode::NOT_ACCEPTABLE || code.as_deref() == Some("PGRST116") {
            return StoreError::RowNotFound;
        }

        match status {
            StatusCode::UNAUTHORIZED => StoreError::Unauthorized,
            StatusCode::FORBIDDEN => StoreError::Forbidden(message),
            StatusCode::CONFLICT => StoreError::Conflict(message),
            StatusCode::NOT_FOUND => StoreError::RowNotFound,
            StatusCode::BAD_REQUEST => StoreError::Validation(message),
            _ => StoreError::Internal(message),
        }
    }

    /// Pull the error code and human-readable message out of the
    /// store's error body, falling back to the raw text.
    fn parse_error_body(body: &str) -> (Option<String>, String) {
        match serde_json::from_str::<serde_json::Value>(body) {
            Ok(v) => {
                let code = v.get("code").and_then(|c| c.as_str()).map(String::from);
                let message = v
                    .get("message")
                    .and_then(|m| m.as_str())
                    .map(String::from)
                    .unwrap_or_else(|| body.to_string());
                (code, message)
            }
            Err(_) => (None, body.to_string()),
        }
    }
}
