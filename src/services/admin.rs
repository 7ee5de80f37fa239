// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin panel operations.
//!
//! Every mutation runs through the shared cooldown coordinator under its
//! panel's action id, so the admin UI never has two writes in flight.

use crate::models::{
    Category, CategoryInput, CustomerUpdate, Product, ProductInput, UserProfile, Video, VideoInput,
};
use crate::services::api::{ApiClient, ApiError};
use crate::services::cooldown::{CooldownCoordinator, StartOutcome};
use crate::services::session::SessionStore;
use std::future::Future;

pub const CATEGORIES_ACTION: &str = "categories-manager";
pub const VIDEOS_ACTION: &str = "videos-manager";
pub const PRODUCTS_ACTION: &str = "products-manager";
pub const USERS_ACTION: &str = "users-manager";

#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error("Token não encontrado")]
    MissingToken,

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// A video together with the category it was listed under.
#[derive(Debug, Clone)]
pub struct CategorizedVideo {
    pub category_slug: String,
    pub category_name: String,
    pub video: Video,
}

#[derive(Debug, Clone)]
pub struct DashboardStats {
    pub total_users: u64,
    pub total_categories: usize,
    pub total_videos: usize,
    pub users: Vec<UserProfile>,
    pub categories: Vec<Category>,
    pub videos: Vec<CategorizedVideo>,
}

#[derive(Clone, Debug)]
pub struct AdminConsole {
    api: ApiClient,
    session: SessionStore,
    cooldown: CooldownCoordinator,
    cooldown_secs: u32,
}

impl AdminConsole {
    pub fn new(
        api: ApiClient,
        session: SessionStore,
        cooldown: CooldownCoordinator,
        cooldown_secs: u32,
    ) -> Self {
        Self {
            api,
            session,
            cooldown,
            cooldown_secs,
        }
    }

    fn token(&self) -> Result<String, AdminError> {
        self.session.get_token().ok_or(AdminError::MissingToken)
    }

    /// Run one write through the coordinator. The token is read inside the
    /// action so a missing session fails it like any other error.
    async fn mutate<F, Fut>(&self, action_id: &str, write: F) -> Result<StartOutcome, AdminError>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<(), ApiError>>,
    {
        let outcome = self
            .cooldown
            .start(action_id, self.cooldown_secs, || async {
                let token = self.token()?;
                write(token).await.map_err(AdminError::from)
            })
            .await?;

        if let Some(notice) = outcome.wait_notice() {
            tracing::info!(action = action_id, notice = %notice, "Admin write deferred");
        }
        Ok(outcome)
    }

    /// Totals for the admin landing page. A category whose videos fail to
    /// load is counted as empty.
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, AdminError> {
        let token = self.token()?;
        let admin = self.api.admin();

        let ((users, total_users), categories) =
            tokio::try_join!(admin.list_users(&token), admin.list_categories(&token))?;

        let mut videos = Vec::new();
        for category in &categories {
            match self
                .api
                .categories()
                .videos(&category.slug, Some(&token))
                .await
            {
                Ok(listing) => videos.extend(listing.videos.into_iter().map(|video| {
                    CategorizedVideo {
                        category_slug: category.slug.clone(),
                        category_name: category.name.clone(),
                        video,
                    }
                })),
                Err(e) => {
                    tracing::warn!(category = %category.slug, error = %e, "Failed to load category videos");
                }
            }
        }

        Ok(DashboardStats {
            total_users,
            total_categories: categories.len(),
            total_videos: videos.len(),
            users,
            categories,
            videos,
        })
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, AdminError> {
        let token = self.token()?;
        Ok(self.api.products().list(Some(&token)).await?)
    }

    pub async fn create_category(&self, input: &CategoryInput) -> Result<StartOutcome, AdminError> {
        self.mutate(CATEGORIES_ACTION, |token| async move {
            self.api.admin().create_category(input, &token).await
        })
        .await
    }

    pub async fn update_category(
        &self,
        slug: &str,
        input: &CategoryInput,
    ) -> Result<StartOutcome, AdminError> {
        self.mutate(CATEGORIES_ACTION, |token| async move {
            self.api.admin().update_category(slug, input, &token).await
        })
        .await
    }

    pub async fn delete_category(&self, slug: &str) -> Result<StartOutcome, AdminError> {
        self.mutate(CATEGORIES_ACTION, |token| async move {
            self.api.admin().delete_category(slug, &token).await
        })
        .await
    }

    pub async fn create_video(
        &self,
        category_slug: &str,
        input: &VideoInput,
    ) -> Result<StartOutcome, AdminError> {
        self.mutate(VIDEOS_ACTION, |token| async move {
            self.api
                .admin()
                .create_video(category_slug, input, &token)
                .await
        })
        .await
    }

    pub async fn update_video(
        &self,
        category_slug: &str,
        video_slug: &str,
        input: &VideoInput,
    ) -> Result<StartOutcome, AdminError> {
        self.mutate(VIDEOS_ACTION, |token| async move {
            self.api
                .admin()
                .update_video(category_slug, video_slug, input, &token)
                .await
        })
        .await
    }

    pub async fn delete_video(
        &self,
        category_slug: &str,
        video_slug: &str,
    ) -> Result<StartOutcome, AdminError> {
        self.mutate(VIDEOS_ACTION, |token| async move {
            self.api
                .admin()
                .delete_video(category_slug, video_slug, &token)
                .await
        })
        .await
    }

    pub async fn create_product(&self, input: &ProductInput) -> Result<StartOutcome, AdminError> {
        self.mutate(PRODUCTS_ACTION, |token| async move {
            self.api.products().create(input, &token).await
        })
        .await
    }

    pub async fn update_product(
        &self,
        id: &str,
        input: &ProductInput,
    ) -> Result<StartOutcome, AdminError> {
        self.mutate(PRODUCTS_ACTION, |token| async move {
            self.api.products().update(id, input, &token).await
        })
        .await
    }

    pub async fn delete_product(&self, id: &str) -> Result<StartOutcome, AdminError> {
        self.mutate(PRODUCTS_ACTION, |token| async move {
            self.api.products().delete(id, &token).await
        })
        .await
    }

    pub async fn update_user(
        &self,
        id: &str,
        update: &CustomerUpdate,
    ) -> Result<StartOutcome, AdminError> {
        self.mutate(USERS_ACTION, |token| async move {
            self.api.admin().update_user(id, update, &token).await
        })
        .await
    }

    pub async fn delete_user(&self, id: &str) -> Result<StartOutcome, AdminError> {
        self.mutate(USERS_ACTION, |token| async move {
            self.api.admin().delete_user(id, &token).await
        })
        .await
    }
}
