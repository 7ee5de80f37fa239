// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Login, registration and logout on top of the content API and the
//! session store.

use crate::middleware::edge_guard::{ADMIN_LANDING, DEFAULT_LANDING, LOGIN_PATH};
use crate::models::UserProfile;
use crate::services::api::{ApiClient, ApiError, LoginRequest, RegisterRequest};
use crate::services::cooldown::{CooldownCoordinator, StartOutcome};
use crate::services::session::SessionStore;
use crate::services::storage::StorageError;
use axum_extra::extract::cookie::Cookie;
use serde::Deserialize;
use std::collections::BTreeMap;
use validator::{Validate, ValidationErrors};

/// Coordinator action id of the login form's submit button.
pub const LOGIN_ACTION: &str = "login-submit";
/// Coordinator action id of the registration form's submit button.
pub const REGISTER_ACTION: &str = "register-submit";

/// Logins only need single-flight; a failed attempt must be retryable at once.
pub const LOGIN_COOLDOWN_SECS: u32 = 0;
pub const REGISTER_COOLDOWN_SECS: u32 = 3;

/// Field name → first validation message for that field.
pub type FieldErrors = BTreeMap<String, String>;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid form fields: {0:?}")]
    Validation(FieldErrors),

    #[error("Resposta inválida do servidor")]
    InvalidResponse,

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Another submission is in flight or cooling down; nothing was sent.
    #[error("{}", dropped_notice(.0))]
    Dropped(StartOutcome),
}

fn dropped_notice(outcome: &StartOutcome) -> String {
    outcome
        .wait_notice()
        .unwrap_or_else(|| "Aguarde a conclusão da operação em andamento.".to_string())
}

impl From<ValidationErrors> for AuthError {
    fn from(errors: ValidationErrors) -> Self {
        let fields = errors
            .field_errors()
            .into_iter()
            .filter_map(|(field, errs)| {
                let message = errs.first()?.message.as_ref()?.to_string();
                Some((field.to_string(), message))
            })
            .collect();
        AuthError::Validation(fields)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(email(message = "Email inválido"))]
    pub email: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterForm {
    #[validate(length(min = 2, message = "O nome deve ter no mínimo 2 caracteres."))]
    pub name: String,
    #[validate(email(message = "Email inválido. Por favor, insira um email válido."))]
    pub email: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
}

/// Successful login.
#[derive(Debug)]
pub struct LoginOutcome {
    /// Where to send the user next.
    pub landing: &'static str,
    /// Mirror cookie for the edge guard.
    pub cookie: Cookie<'static>,
    pub user: Option<UserProfile>,
}

/// Successful registration. Without a token the user still has to log in.
#[derive(Debug)]
pub struct RegisterOutcome {
    pub landing: &'static str,
    pub cookie: Option<Cookie<'static>>,
}

/// Auth flows bound to one session.
///
/// Login and registration are submitted through `cooldown`, so a second
/// submit while the first is in flight (or a registration inside its
/// cooldown) fails with `AuthError::Dropped` without reaching the backend.
#[derive(Clone, Debug)]
pub struct AuthFlow {
    api: ApiClient,
    session: SessionStore,
    cooldown: CooldownCoordinator,
}

impl AuthFlow {
    pub fn new(api: ApiClient, session: SessionStore, cooldown: CooldownCoordinator) -> Self {
        Self {
            api,
            session,
            cooldown,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub async fn login(&self, form: &LoginForm) -> Result<LoginOutcome, AuthError> {
        form.validate()?;

        let mut landed = None;
        let slot = &mut landed;
        let outcome = self
            .cooldown
            .start(LOGIN_ACTION, LOGIN_COOLDOWN_SECS, move || async move {
                *slot = Some(self.submit_login(form).await?);
                Ok::<(), AuthError>(())
            })
            .await?;

        landed.ok_or(AuthError::Dropped(outcome))
    }

    pub async fn register(&self, form: &RegisterForm) -> Result<RegisterOutcome, AuthError> {
        form.validate()?;

        let mut registered = None;
        let slot = &mut registered;
        let outcome = self
            .cooldown
            .start(REGISTER_ACTION, REGISTER_COOLDOWN_SECS, move || async move {
                *slot = Some(self.submit_register(form).await?);
                Ok::<(), AuthError>(())
            })
            .await?;

        if let Some(notice) = outcome.wait_notice() {
            tracing::info!(notice = %notice, "Registration submit dropped");
        }
        registered.ok_or(AuthError::Dropped(outcome))
    }

    async fn submit_login(&self, form: &LoginForm) -> Result<LoginOutcome, AuthError> {
        let response = self
            .api
            .auth()
            .login(&LoginRequest {
                email: &form.email,
                password: &form.password,
            })
            .await?;

        let token = match response.data.and_then(|d| d.token) {
            Some(token) if response.success && !token.is_empty() => token,
            _ => {
                tracing::warn!(message = ?response.message, "Login response without token");
                return Err(AuthError::InvalidResponse);
            }
        };

        let cookie = self.session.set_session(&token)?;
        let user = self.session.get_user();
        let landing = landing_for(user.as_ref());

        tracing::info!(landing, "Login successful");

        Ok(LoginOutcome {
            landing,
            cookie,
            user,
        })
    }

    async fn submit_register(&self, form: &RegisterForm) -> Result<RegisterOutcome, AuthError> {
        let response = self
            .api
            .auth()
            .register(&RegisterRequest {
                name: &form.name,
                email: &form.email,
                password: &form.password,
            })
            .await?;

        let Some(token) = response.token.filter(|t| !t.is_empty()) else {
            tracing::info!("Registered without session, sending user to login");
            return Ok(RegisterOutcome {
                landing: LOGIN_PATH,
                cookie: None,
            });
        };

        let cookie = self.session.set_session(&token)?;
        if let Some(user) = &response.user {
            self.session.set_user(user)?;
        }

        tracing::info!("Registration successful");

        Ok(RegisterOutcome {
            landing: DEFAULT_LANDING,
            cookie: Some(cookie),
        })
    }

    /// Tell the backend (best effort) and forget the local session.
    pub async fn logout(&self) -> Result<Cookie<'static>, AuthError> {
        if let Some(token) = self.session.get_token() {
            if let Err(e) = self.api.auth().logout(&token).await {
                tracing::warn!(error = %e, "Backend logout failed, clearing session anyway");
            }
        }

        Ok(self.session.clear_session()?)
    }
}

/// Admins land on the admin panel, everyone else on the dashboard.
pub fn landing_for(user: Option<&UserProfile>) -> &'static str {
    match user {
        Some(user) if user.role.is_admin() => ADMIN_LANDING,
        _ => DEFAULT_LANDING,
    }
}

/// Message shown on the login form for a failed attempt.
pub fn friendly_login_error(error: &AuthError) -> String {
    match error {
        AuthError::Api(ApiError::Http { message, .. })
            if message.contains("Invalid credentials")
                || message.contains("Authentication failed") =>
        {
            "Email ou senha incorretos".to_string()
        }
        AuthError::Api(ApiError::Network(_)) => {
            "Erro de conexão. Verifique sua internet".to_string()
        }
        AuthError::InvalidResponse | AuthError::Api(ApiError::Decode(_)) => {
            "Erro no servidor. Tente novamente mais tarde".to_string()
        }
        AuthError::Validation(fields) => fields
            .values()
            .next()
            .cloned()
            .unwrap_or_else(|| "Erro ao fazer login. Tente novamente.".to_string()),
        AuthError::Storage(_) => "Erro ao fazer login. Tente novamente.".to_string(),
        AuthError::Dropped(_) => error.to_string(),
        AuthError::Api(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use reqwest::StatusCode;

    #[test]
    fn test_login_form_validation_messages() {
        let form = LoginForm {
            email: "not-an-email".to_string(),
            password: "123".to_string(),
        };

        let AuthError::Validation(fields) = AuthError::from(form.validate().unwrap_err()) else {
            panic!("expected validation error");
        };
        assert_eq!(fields.get("email").map(String::as_str), Some("Email inválido"));
        assert_eq!(
            fields.get("password").map(String::as_str),
            Some("A senha deve ter no mínimo 6 caracteres")
        );
    }

    #[test]
    fn test_register_form_validation() {
        let form = RegisterForm {
            name: "A".to_string(),
            email: "ana@example.com".to_string(),
            password: "segredo1".to_string(),
        };

        let AuthError::Validation(fields) = AuthError::from(form.validate().unwrap_err()) else {
            panic!("expected validation error");
        };
        assert_eq!(fields.len(), 1);
        assert!(fields.contains_key("name"));
    }

    #[test]
    fn test_landing_for_roles() {
        let admin = UserProfile {
            role: Role::Admin,
            ..Default::default()
        };
        let member = UserProfile {
            role: Role::Member,
            ..Default::default()
        };
        assert_eq!(landing_for(Some(&admin)), "/admin");
        assert_eq!(landing_for(Some(&member)), "/dashboard");
        assert_eq!(landing_for(None), "/dashboard");
    }

    #[test]
    fn test_friendly_login_error() {
        let bad_credentials = AuthError::Api(ApiError::Http {
            status: StatusCode::UNAUTHORIZED,
            message: "Invalid credentials".to_string(),
        });
        assert_eq!(friendly_login_error(&bad_credentials), "Email ou senha incorretos");

        assert_eq!(
            friendly_login_error(&AuthError::InvalidResponse),
            "Erro no servidor. Tente novamente mais tarde"
        );

        let other = AuthError::Api(ApiError::Http {
            status: StatusCode::FORBIDDEN,
            message: "Conta bloqueada".to_string(),
        });
        assert_eq!(friendly_login_error(&other), "Conta bloqueada");
    }

    #[test]
    fn test_dropped_submit_messages() {
        let cooling = AuthError::Dropped(StartOutcome::CoolingDown {
            action_id: REGISTER_ACTION.to_string(),
            remaining: 2,
        });
        assert_eq!(
            friendly_login_error(&cooling),
            "Por favor, aguarde 2 segundos antes de tentar novamente."
        );

        let busy = AuthError::Dropped(StartOutcome::Busy);
        assert_eq!(
            busy.to_string(),
            "Aguarde a conclusão da operação em andamento."
        );
    }
}
