//! Auth service - business capability layer
//!
//! The only writer of the session: login, registration, logout and the
//! emergency reset all go through here.

use tracing::{info, warn};

use crate::clients::ApiClient;
use crate::error::{AppResult, ValidationError};
use crate::models::{
    AuthResponse, Role, StudentCredentials, TeacherCredentials, TeacherRegistration,
};
use crate::session::{Session, SessionContext};

/// Authentication service
///
/// Responsibilities:
/// - exchange credentials for a token
/// - tag the session with the role of the endpoint that issued it
/// - persist and clear the session
#[derive(Debug, Clone)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    fn session(&self) -> &SessionContext {
        self.client.session()
    }

    pub async fn login_teacher(&self, email: &str, password: &str) -> AppResult<Session> {
        require_fields("login", &[email, password])?;
        let response = self
            .client
            .login_teacher(&TeacherCredentials {
                email: email.trim().to_string(),
                password: password.to_string(),
            })
            .await?;
        self.establish(Role::Teacher, response).await
    }

    pub async fn login_student(&self, username: &str, password: &str) -> AppResult<Session> {
        require_fields("login", &[username, password])?;
        let response = self
            .client
            .login_student(&StudentCredentials {
                username: username.trim().to_string(),
                password: password.to_string(),
            })
            .await?;
        self.establish(Role::Student, response).await
    }

    /// Registers a teacher account and logs it in
    pub async fn register_teacher(&self, registration: &TeacherRegistration) -> AppResult<Session> {
        require_fields(
            "registration",
            &[
                registration.email.as_str(),
                registration.password.as_str(),
                registration.first_name.as_str(),
                registration.last_name.as_str(),
            ],
        )?;
        let response = self.client.register_teacher(registration).await?;
        self.establish(Role::Teacher, response).await
    }

    pub async fn logout(&self) -> AppResult<()> {
        if let Some(session) = self.session().current() {
            info!("👋 Logging out {}", session.user.display_name());
        }
        self.session().end().await
    }

    /// Drops the session even when the stored copy is unreadable
    pub async fn emergency_reset(&self) -> AppResult<()> {
        warn!(
            "🧹 Emergency reset: removing {}",
            self.session().store().path().display()
        );
        self.session().end().await
    }

    pub fn whoami(&self) -> Option<Session> {
        self.session().current()
    }

    async fn establish(&self, role: Role, response: AuthResponse) -> AppResult<Session> {
        let session = Session {
            token: response.access_token,
            role,
            user: response.user,
        };
        self.session().establish(session.clone()).await?;
        info!("🔐 Logged in as {} ({})", session.user.display_name(), role);
        Ok(session)
    }
}

fn require_fields(form: &'static str, values: &[&str]) -> Result<(), ValidationError> {
    if values.iter().any(|v| v.trim().is_empty()) {
        return Err(ValidationError::MissingFields { form });
    }
    Ok(())
}
