// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-page route guard.
//!
//! A second, coarser check that wraps protected page content. It reads the
//! session store (never the cookie) when the page mounts and hides the content
//! while a client-side redirect is in flight. It is not a security boundary.

use crate::middleware::edge_guard::{DEFAULT_LANDING, LOGIN_PATH};
use crate::services::session::SessionStore;

/// Client-side navigation.
pub trait Navigator {
    fn navigate(&self, path: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardRequirement {
    /// Any stored token.
    Session,
    /// A stored profile with role ADMIN.
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardView {
    /// Check not run yet; show a placeholder.
    Loading,
    /// Show the wrapped content.
    Render,
    /// Show nothing; a redirect has been issued.
    Hidden,
}

#[derive(Debug, Clone)]
pub struct ClientGuard {
    requirement: GuardRequirement,
    view: GuardView,
}

impl ClientGuard {
    pub fn new(requirement: GuardRequirement) -> Self {
        Self {
            requirement,
            view: GuardView::Loading,
        }
    }

    pub fn session() -> Self {
        Self::new(GuardRequirement::Session)
    }

    pub fn admin() -> Self {
        Self::new(GuardRequirement::Admin)
    }

    pub fn view(&self) -> GuardView {
        self.view
    }

    /// Run the check once the page is mounted.
    pub fn mount(&mut self, session: &SessionStore, navigator: &dyn Navigator) -> GuardView {
        let redirect = match self.requirement {
            GuardRequirement::Session => session.get_token().is_none().then_some(LOGIN_PATH),
            GuardRequirement::Admin => {
                let is_admin = session.get_user().is_some_and(|u| u.role.is_admin());
                (!is_admin).then_some(DEFAULT_LANDING)
            }
        };

        self.view = match redirect {
            Some(path) => {
                tracing::debug!(requirement = ?self.requirement, path, "Client guard redirect");
                navigator.navigate(path);
                GuardView::Hidden
            }
            None => GuardView::Render,
        };
        self.view
    }

    /// Produce the wrapped content only when it may be shown.
    pub fn render<T>(&self, content: impl FnOnce() -> T) -> Option<T> {
        (self.view == GuardView::Render).then(content)
    }
}
