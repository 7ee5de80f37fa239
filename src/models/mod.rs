// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod catalog;
pub mod claims;
pub mod user;

pub use catalog::{
    ApiEnvelope, Category, CategoryInput, CategoryVideos, CategoryVideo, CustomerUpdate,
    Pagination, Product, ProductInput, Purchase, PurchasesResponse, Video, VideoInput,
};
pub use claims::{Claims, Role};
pub use user::UserProfile;
