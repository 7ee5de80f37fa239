// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client for the upstream content API.
//!
//! Handles:
//! - Bearer token attachment
//! - JSON request/response bodies
//! - Normalizing non-2xx responses into `ApiError::Http` with the best
//!   human-readable message the body offers

use crate::models::{
    ApiEnvelope, Category, CategoryInput, CategoryVideo, CategoryVideos, CustomerUpdate, Product,
    ProductInput, Purchase, PurchasesResponse, UserProfile, VideoInput,
};
use reqwest::{Method, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

/// Errors returned by the content API client.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Non-2xx response. `message` comes from the body's `message` or
    /// `error` field when present.
    #[error("{message}")]
    Http { status: StatusCode, message: String },

    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Invalid response body: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }
}

/// Text of one error-body field: a non-empty string, or the non-empty
/// strings of an array (validation errors) joined with ", ".
fn error_field(body: &Value, key: &str) -> Option<String> {
    match body.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Array(items) => {
            let parts: Vec<&str> = items
                .iter()
                .filter_map(Value::as_str)
                .filter(|s| !s.is_empty())
                .collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        _ => None,
    }
}

/// Pick the message for a failed response.
///
/// `message` wins over `error`; when neither carries text the status line
/// is used.
pub fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|b| error_field(&b, "message").or_else(|| error_field(&b, "error")))
        .unwrap_or_else(|| {
            format!(
                "Erro {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("")
            )
        })
}

/// Default upstream when `API_URL` is not set.
pub const DEFAULT_API_URL: &str = "https://noteplanning-backend.fly.dev";

/// Content API client.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

/// Placeholder body type for requests that send none.
type NoBody = ();

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a request to `endpoint` (a path beginning with `/`).
    pub async fn request<T, B>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
        token: Option<&str>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, endpoint);

        tracing::debug!(
            method = %method,
            url = %url,
            has_token = token.is_some(),
            has_body = body.is_some(),
            "API request"
        );

        let mut builder = self.http.request(method.clone(), &url);
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(method = %method, url = %url, error = %e, "API request failed");
            ApiError::Network(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = error_message(status, &text);
            tracing::warn!(
                method = %method,
                url = %url,
                status = status.as_u16(),
                message = %message,
                "API error response"
            );
            return Err(ApiError::Http { status, message });
        }

        let bytes = response.bytes().await.map_err(ApiError::Network)?;
        // Some mutations answer 204 or an empty 200
        let bytes: &[u8] = if bytes.is_empty() { b"null" } else { &bytes };
        serde_json::from_slice(bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        self.request::<T, NoBody>(Method::GET, endpoint, None, token)
            .await
    }

    async fn send<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        endpoint: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        self.request(method, endpoint, Some(body), token).await
    }

    async fn delete(&self, endpoint: &str, token: &str) -> Result<(), ApiError> {
        self.request::<serde_json::Value, NoBody>(Method::DELETE, endpoint, None, Some(token))
            .await
            .map(|_| ())
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi { client: self }
    }

    pub fn customers(&self) -> CustomersApi<'_> {
        CustomersApi { client: self }
    }

    pub fn products(&self) -> ProductsApi<'_> {
        ProductsApi { client: self }
    }

    pub fn categories(&self) -> CategoriesApi<'_> {
        CategoriesApi { client: self }
    }

    pub fn admin(&self) -> AdminApi<'_> {
        AdminApi { client: self }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Endpoint groups
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginData {
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<LoginData>,
}

/// Registration answers with a token and the created profile when the
/// account is usable right away, or with neither.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl AuthApi<'_> {
    pub async fn register(&self, req: &RegisterRequest<'_>) -> Result<RegisterResponse, ApiError> {
        self.client
            .send(Method::POST, "/v1/auth/register", req, None)
            .await
    }

    pub async fn login(&self, req: &LoginRequest<'_>) -> Result<LoginResponse, ApiError> {
        self.client
            .send(Method::POST, "/v1/auth/login", req, None)
            .await
    }

    pub async fn logout(&self, token: &str) -> Result<(), ApiError> {
        self.client
            .send::<serde_json::Value, _>(
                Method::POST,
                "/v1/auth/logout",
                &serde_json::json!({}),
                Some(token),
            )
            .await
            .map(|_| ())
    }
}

pub struct CustomersApi<'a> {
    client: &'a ApiClient,
}

impl CustomersApi<'_> {
    pub async fn get_profile(&self, id: &str, token: &str) -> Result<UserProfile, ApiError> {
        let envelope: ApiEnvelope<UserProfile> = self
            .client
            .get(&format!("/v1/customers/{}", urlencoding::encode(id)), Some(token))
            .await?;
        Ok(envelope.data)
    }

    pub async fn get_purchases(&self, token: &str) -> Result<Vec<Purchase>, ApiError> {
        let response: PurchasesResponse = self
            .client
            .get("/v1/customers/purchases", Some(token))
            .await?;
        Ok(response.into_purchases())
    }
}

pub struct ProductsApi<'a> {
    client: &'a ApiClient,
}

impl ProductsApi<'_> {
    pub async fn list(&self, token: Option<&str>) -> Result<Vec<Product>, ApiError> {
        let envelope: ApiEnvelope<Vec<Product>> = self.client.get("/v1/products", token).await?;
        Ok(envelope.data)
    }

    pub async fn create(&self, input: &ProductInput, token: &str) -> Result<(), ApiError> {
        self.client
            .send::<serde_json::Value, _>(Method::POST, "/v1/products", input, Some(token))
            .await
            .map(|_| ())
    }

    pub async fn update(&self, id: &str, input: &ProductInput, token: &str) -> Result<(), ApiError> {
        let endpoint = format!("/v1/products/{}", urlencoding::encode(id));
        self.client
            .send::<serde_json::Value, _>(Method::PUT, &endpoint, input, Some(token))
            .await
            .map(|_| ())
    }

    pub async fn delete(&self, id: &str, token: &str) -> Result<(), ApiError> {
        self.client
            .delete(&format!("/v1/products/{}", urlencoding::encode(id)), token)
            .await
    }
}

pub struct CategoriesApi<'a> {
    client: &'a ApiClient,
}

impl CategoriesApi<'_> {
    pub async fn list(&self, token: Option<&str>) -> Result<Vec<Category>, ApiError> {
        let envelope: ApiEnvelope<Vec<Category>> = self.client.get("/v1/categories", token).await?;
        Ok(envelope.data)
    }

    pub async fn videos(&self, slug: &str, token: Option<&str>) -> Result<CategoryVideos, ApiError> {
        let endpoint = format!("/v1/categories/{}/videos", urlencoding::encode(slug));
        let envelope: ApiEnvelope<CategoryVideos> = self.client.get(&endpoint, token).await?;
        Ok(envelope.data)
    }

    pub async fn video(
        &self,
        category_slug: &str,
        video_slug: &str,
        token: Option<&str>,
    ) -> Result<CategoryVideo, ApiError> {
        let endpoint = format!(
            "/v1/categories/{}/video/{}",
            urlencoding::encode(category_slug),
            urlencoding::encode(video_slug)
        );
        let envelope: ApiEnvelope<CategoryVideo> = self.client.get(&endpoint, token).await?;
        Ok(envelope.data)
    }
}

pub struct AdminApi<'a> {
    client: &'a ApiClient,
}

impl AdminApi<'_> {
    pub async fn list_categories(&self, token: &str) -> Result<Vec<Category>, ApiError> {
        self.client.categories().list(Some(token)).await
    }

    pub async fn create_category(&self, input: &CategoryInput, token: &str) -> Result<(), ApiError> {
        self.client
            .send::<serde_json::Value, _>(Method::POST, "/v1/categories", input, Some(token))
            .await
            .map(|_| ())
    }

    pub async fn update_category(
        &self,
        slug: &str,
        input: &CategoryInput,
        token: &str,
    ) -> Result<(), ApiError> {
        let endpoint = format!("/v1/categories/{}", urlencoding::encode(slug));
        self.client
            .send::<serde_json::Value, _>(Method::PUT, &endpoint, input, Some(token))
            .await
            .map(|_| ())
    }

    pub async fn delete_category(&self, slug: &str, token: &str) -> Result<(), ApiError> {
        self.client
            .delete(&format!("/v1/categories/{}", urlencoding::encode(slug)), token)
            .await
    }

    pub async fn create_video(
        &self,
        category_slug: &str,
        input: &VideoInput,
        token: &str,
    ) -> Result<(), ApiError> {
        let endpoint = format!("/v1/categories/{}/video", urlencoding::encode(category_slug));
        self.client
            .send::<serde_json::Value, _>(Method::POST, &endpoint, input, Some(token))
            .await
            .map(|_| ())
    }

    pub async fn update_video(
        &self,
        category_slug: &str,
        video_slug: &str,
        input: &VideoInput,
        token: &str,
    ) -> Result<(), ApiError> {
        let endpoint = format!(
            "/v1/categories/{}/video/{}",
            urlencoding::encode(category_slug),
            urlencoding::encode(video_slug)
        );
        self.client
            .send::<serde_json::Value, _>(Method::PUT, &endpoint, input, Some(token))
            .await
            .map(|_| ())
    }

    pub async fn delete_video(
        &self,
        category_slug: &str,
        video_slug: &str,
        token: &str,
    ) -> Result<(), ApiError> {
        let endpoint = format!(
            "/v1/categories/{}/video/{}",
            urlencoding::encode(category_slug),
            urlencoding::encode(video_slug)
        );
        self.client.delete(&endpoint, token).await
    }

    /// Returns the users and the backend's reported total.
    pub async fn list_users(&self, token: &str) -> Result<(Vec<UserProfile>, u64), ApiError> {
        let envelope: ApiEnvelope<Vec<UserProfile>> =
            self.client.get("/v1/customers", Some(token)).await?;
        let total = envelope.total.unwrap_or(envelope.data.len() as u64);
        Ok((envelope.data, total))
    }

    pub async fn update_user(
        &self,
        id: &str,
        update: &CustomerUpdate,
        token: &str,
    ) -> Result<(), ApiError> {
        let endpoint = format!("/v1/customers/{}", urlencoding::encode(id));
        self.client
            .send::<serde_json::Value, _>(Method::PUT, &endpoint, update, Some(token))
            .await
            .map(|_| ())
    }

    pub async fn delete_user(&self, id: &str, token: &str) -> Result<(), ApiError> {
        self.client
            .delete(&format!("/v1/customers/{}", urlencoding::encode(id)), token)
            .await
    }
}
