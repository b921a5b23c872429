use std::fmt::Display;

use reqwest::{Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};

use crate::config::SupabaseConfig;
use crate::error::SupabaseError;

const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// REST, RPC and auth access to the hosted backend.
#[derive(Clone)]
pub struct SupabaseClient {
    http: Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseClient {
    pub fn new(config: &SupabaseConfig) -> Self {
        SupabaseClient {
            http: Client::new(),
            base_url: config.url.clone(),
            anon_key: config.anon_key.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Starts a query against `table`.
    pub fn from(&self, table: &str) -> TableQuery<'_> {
        TableQuery {
            client: self,
            table: table.to_string(),
            select: "*".to_string(),
            filters: Vec::new(),
            order: Vec::new(),
            access_token: None,
        }
    }

    /// Calls a stored procedure and returns its raw JSON result.
    pub async fn rpc<P: Serialize>(
        &self,
        function: &str,
        params: &P,
        access_token: Option<&str>,
    ) -> Result<serde_json::Value, SupabaseError> {
        let url = format!("{}/rest/v1/rpc/{}", self.base_url, function);
        let request = self.authorize(self.http.post(url), access_token).json(params);
        let response = check(request.send().await?).await?;
        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    /// Adds the project key and a bearer token (the user's if present, the anon key otherwise).
    pub(crate) fn authorize(&self, request: RequestBuilder, access_token: Option<&str>) -> RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token.unwrap_or(&self.anon_key))
    }
}

pub struct TableQuery<'a> {
    client: &'a SupabaseClient,
    table: String,
    select: String,
    filters: Vec<(String, String)>,
    order: Vec<String>,
    access_token: Option<String>,
}

impl<'a> TableQuery<'a> {
    pub fn select(mut self, columns: &str) -> Self {
        self.select = columns.to_string();
        self
    }

    pub fn eq(mut self, column: &str, value: impl Display) -> Self {
        self.filters.push((column.to_string(), format!("eq.{}", value)));
        self
    }

    pub fn neq(mut self, column: &str, value: impl Display) -> Self {
        self.filters.push((column.to_string(), format!("neq.{}", value)));
        self
    }

    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        let direction = if ascending { "asc" } else { "desc" };
        self.order.push(format!("{}.{}", column, direction));
        self
    }

    pub fn token(mut self, access_token: Option<&str>) -> Self {
        self.access_token = access_token.map(str::to_string);
        self
    }

    fn url(&self) -> String {
        format!("{}/rest/v1/{}", self.client.base_url, self.table)
    }

    pub(crate) fn query_pairs(&self, with_select: bool) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.filters.len() + 2);
        if with_select {
            pairs.push(("select".to_string(), self.select.clone()));
        }
        pairs.extend(self.filters.iter().cloned());
        if !self.order.is_empty() {
            pairs.push(("order".to_string(), self.order.join(",")));
        }
        pairs
    }

    fn request(&self, method: reqwest::Method, with_select: bool) -> RequestBuilder {
        let request = self
            .client
            .http()
            .request(method, self.url())
            .query(&self.query_pairs(with_select));
        self.client.authorize(request, self.access_token.as_deref())
    }

    pub async fn fetch<T: DeserializeOwned>(self) -> Result<Vec<T>, SupabaseError> {
        log::debug!("select from {}", self.table);
        let response = check(self.request(reqwest::Method::GET, true).send().await?).await?;
        Ok(response.json().await?)
    }

    /// Fetches exactly one row; zero or several rows come back as a 406 error.
    pub async fn fetch_single<T: DeserializeOwned>(self) -> Result<T, SupabaseError> {
        let request = self
            .request(reqwest::Method::GET, true)
            .header("Accept", SINGLE_OBJECT);
        let response = check(request.send().await?).await?;
        Ok(response.json().await?)
    }

    /// Exact row count without transferring rows.
    pub async fn count(self) -> Result<u64, SupabaseError> {
        let request = self
            .request(reqwest::Method::HEAD, true)
            .header("Prefer", "count=exact");
        let response = check(request.send().await?).await?;
        response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range)
            .ok_or(SupabaseError::MissingCount)
    }

    pub async fn insert<T: Serialize>(self, rows: &[T]) -> Result<(), SupabaseError> {
        log::debug!("insert {} row(s) into {}", rows.len(), self.table);
        let request = self
            .request(reqwest::Method::POST, false)
            .header("Prefer", "return=minimal")
            .json(rows);
        check(request.send().await?).await?;
        Ok(())
    }

    pub async fn update<T: Serialize>(self, patch: &T) -> Result<(), SupabaseError> {
        log::debug!("update {}", self.table);
        let request = self
            .request(reqwest::Method::PATCH, false)
            .header("Prefer", "return=minimal")
            .json(patch);
        check(request.send().await?).await?;
        Ok(())
    }
}

/// Turns a non-success response into [`SupabaseError::Api`].
pub(crate) async fn check(response: Response) -> Result<Response, SupabaseError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(SupabaseError::Api {
        status: status.as_u16(),
        message: error_message(&body, status.canonical_reason().unwrap_or("request failed")),
    })
}

/// Picks the human-readable part of a REST or auth error body.
pub(crate) fn error_message(body: &str, fallback: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "error_description", "msg", "error"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                if !text.is_empty() {
                    return text.to_string();
                }
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Total from a `Content-Range` header such as `0-24/3573` or `*/0`.
pub(crate) fn parse_content_range(value: &str) -> Option<u64> {
    value.rsplit_once('/')?.1.trim().parse().ok()
}
