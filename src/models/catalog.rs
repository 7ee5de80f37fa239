// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Catalog models exchanged with the content API (categories, videos,
//! products, purchases).

use serde::{Deserialize, Serialize};

/// Standard `{ success, message, data }` response wrapper.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub data: T,
    #[serde(default)]
    pub pagination: Option<Pagination>,
    #[serde(default)]
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub total_pages: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Body for creating or updating a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    pub name: String,
    pub description: String,
    pub is_active: bool,
    pub sort_order: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: String,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    /// Length in seconds
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub required_products: Vec<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Body for creating or updating a video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoInput {
    pub title: String,
    pub slug: String,
    pub description: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    pub is_published: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_products: Vec<String>,
}

impl VideoInput {
    /// New unpublished video whose slug is derived from the title.
    pub fn from_title(title: &str, description: &str, url: &str) -> Self {
        Self {
            title: title.to_string(),
            slug: slugify(title),
            description: description.to_string(),
            url: url.to_string(),
            thumbnail: None,
            duration: None,
            is_published: false,
            required_products: Vec::new(),
        }
    }
}

/// Lowercase, collapse every run of non `[a-z0-9]` characters into a single
/// `-`, and trim leading/trailing dashes.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for c in title.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// `data` of `GET /v1/categories/{slug}/videos`.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryVideos {
    pub category: Option<Category>,
    #[serde(default)]
    pub videos: Vec<Video>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// `data` of `GET /v1/categories/{category}/video/{video}`.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryVideo {
    pub category: Option<Category>,
    pub video: Video,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub stripe_product_id: Option<String>,
    #[serde(default)]
    pub stripe_price_id: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stripe_product_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stripe_price_id: Option<String>,
    pub is_active: bool,
}

/// Admin edit of a customer record. The id travels in the URL only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerUpdate {
    pub name: String,
    pub email: String,
    pub role: super::Role,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub external_id: Option<String>,
}

/// `GET /v1/customers/purchases` has been seen in three shapes: a bare list,
/// `{ data: [...] }`, and `{ data: { purchases: [...] } }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PurchasesResponse {
    List(Vec<Purchase>),
    Wrapped { data: Vec<Purchase> },
    Nested { data: NestedPurchases },
}

#[derive(Debug, Clone, Deserialize)]
pub struct NestedPurchases {
    pub purchases: Vec<Purchase>,
}

impl PurchasesResponse {
    pub fn into_purchases(self) -> Vec<Purchase> {
        match self {
            PurchasesResponse::List(list) => list,
            PurchasesResponse::Wrapped { data } => data,
            PurchasesResponse::Nested { data } => data.purchases,
        }
    }
}
