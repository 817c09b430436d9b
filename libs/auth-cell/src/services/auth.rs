use std::sync::Arc;
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, info, warn};

use session_cell::SessionStore;
use shared_api::ApiClient;
use shared_models::auth::{AuthPayload, Identity};
use shared_models::error::ClientError;
use shared_models::pagination::ApiResponse;

use crate::models::{LoginRequest, RegisterDoctorRequest, RegisterPatientRequest};

pub struct AuthService {
    api: Arc<ApiClient>,
    session: Arc<SessionStore>,
}

impl AuthService {
    pub fn new(api: Arc<ApiClient>, session: Arc<SessionStore>) -> Self {
        Self { api, session }
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Authenticate and start a session. A failure leaves the current session untouched.
    pub async fn login(&self, request: LoginRequest) -> Result<Identity, ClientError> {
        debug!("Logging in {} as {}", request.email, request.role);
        request.validate()?;

        let identity = self.authenticate("/auth/login", request.to_body()).await?;
        if identity.role != request.role {
            warn!(
                "Backend returned role {} for a {} login, trusting the backend",
                identity.role, request.role
            );
        }
        Ok(identity)
    }

    pub async fn register_patient(&self, request: RegisterPatientRequest) -> Result<Identity, ClientError> {
        debug!("Registering patient account for {}", request.email);
        let body = request.to_body()?;
        self.authenticate("/auth/register/patient", body).await
    }

    pub async fn register_doctor(&self, request: RegisterDoctorRequest) -> Result<Identity, ClientError> {
        debug!("Registering doctor account for {}", request.email);
        let body = request.to_body()?;
        self.authenticate("/auth/register/doctor", body).await
    }

    pub fn logout(&self) {
        self.session.logout();
    }

    async fn authenticate(&self, path: &str, body: Value) -> Result<Identity, ClientError> {
        let response: ApiResponse<AuthPayload> = self
            .api
            .credential_request(Method::POST, path, body)
            .await?;

        if !response.success {
            let message = if response.message.is_empty() {
                "Authentication failed".to_string()
            } else {
                response.message
            };
            return Err(ClientError::Auth(message));
        }

        let AuthPayload { user, token } = response.data;
        if token.trim().is_empty() {
            return Err(ClientError::Decode("Backend returned an empty token".to_string()));
        }

        info!("Authenticated {} as {}", user.email, user.role);
        self.session.login(user.clone(), token);
        Ok(user)
    }
}
