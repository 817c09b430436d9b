use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use shared_models::auth::Role;
use shared_models::error::ClientError;
use shared_utils::validation::{check_email, check_name, check_password, normalize_photo_url};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>, role: Role) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            role,
        }
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        check_email(&self.email).map_err(ClientError::Validation)?;
        check_password(&self.password).map_err(ClientError::Validation)?;
        Ok(())
    }

    pub fn to_body(&self) -> Value {
        json!({
            "email": self.email.trim(),
            "password": self.password,
            "role": self.role.as_wire(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterPatientRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub photo_url: Option<String>,
}

impl RegisterPatientRequest {
    pub fn validate(&self) -> Result<Option<String>, ClientError> {
        check_name(&self.name).map_err(ClientError::Validation)?;
        check_email(&self.email).map_err(ClientError::Validation)?;
        check_password(&self.password).map_err(ClientError::Validation)?;
        normalize_photo_url(self.photo_url.as_deref()).map_err(ClientError::Validation)
    }

    /// Validated request body; a blank photo URL is left out.
    pub fn to_body(&self) -> Result<Value, ClientError> {
        let photo_url = self.validate()?;
        let mut body = json!({
            "name": self.name.trim(),
            "email": self.email.trim(),
            "password": self.password,
        });
        if let Some(url) = photo_url {
            body["photo_url"] = json!(url);
        }
        Ok(body)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterDoctorRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub specialization: String,
    pub photo_url: Option<String>,
}

impl RegisterDoctorRequest {
    pub fn validate(&self) -> Result<Option<String>, ClientError> {
        check_name(&self.name).map_err(ClientError::Validation)?;
        check_email(&self.email).map_err(ClientError::Validation)?;
        check_password(&self.password).map_err(ClientError::Validation)?;
        if self.specialization.trim().is_empty() {
            return Err(ClientError::Validation("Please select a specialization".to_string()));
        }
        normalize_photo_url(self.photo_url.as_deref()).map_err(ClientError::Validation)
    }

    pub fn to_body(&self) -> Result<Value, ClientError> {
        let photo_url = self.validate()?;
        let mut body = json!({
            "name": self.name.trim(),
            "email": self.email.trim(),
            "password": self.password,
            "specialization": self.specialization.trim(),
        });
        if let Some(url) = photo_url {
            body["photo_url"] = json!(url);
        }
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_validation() {
        assert!(LoginRequest::new("a@b.com", "secret", Role::Patient).validate().is_ok());
        assert_eq!(
            LoginRequest::new("a@b", "secret", Role::Patient).validate(),
            Err(ClientError::Validation("Invalid email address".to_string()))
        );
        assert!(LoginRequest::new("a@b.com", "short", Role::Doctor).validate().is_err());
    }

    #[test]
    fn test_login_body_uses_wire_role() {
        let body = LoginRequest::new(" a@b.com ", "secret", Role::Doctor).to_body();
        assert_eq!(body["role"], "DOCTOR");
        assert_eq!(body["email"], "a@b.com");
    }

    #[test]
    fn test_blank_photo_url_is_omitted() {
        let request = RegisterPatientRequest {
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            password: "secret1".to_string(),
            photo_url: Some("".to_string()),
        };
        let body = request.to_body().unwrap();
        assert!(body.get("photo_url").is_none());
    }

    #[test]
    fn test_doctor_requires_specialization() {
        let request = RegisterDoctorRequest {
            name: "Greg".to_string(),
            email: "greg@example.com".to_string(),
            password: "secret1".to_string(),
            specialization: " ".to_string(),
            photo_url: None,
        };
        assert_eq!(
            request.validate(),
            Err(ClientError::Validation("Please select a specialization".to_string()))
        );
    }
}
