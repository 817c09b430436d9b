use std::path::Path;
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use base64::{Engine as _, engine::general_purpose};
use serde_json::json;
use uuid::Uuid;

use shared_config::ClientConfig;
use shared_models::auth::{Identity, Role};

pub const TEST_JWT_SECRET: &str = "test-secret-key-for-jwt-signing-must-be-long-enough";

pub struct TestConfig {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:4000/api/v1".to_string(),
            request_timeout_secs: 5,
        }
    }
}

impl TestConfig {
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            api_base_url: base_url.to_string(),
            ..Self::default()
        }
    }

    pub fn to_client_config(&self, session_file: &Path) -> ClientConfig {
        ClientConfig {
            api_base_url: self.api_base_url.clone(),
            session_file: session_file.to_path_buf(),
            request_timeout_secs: self.request_timeout_secs,
            ..ClientConfig::default()
        }
    }
}

pub struct TestIdentity {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub specialization: Option<String>,
}

impl TestIdentity {
    pub fn new(email: &str, role: Role) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: "Test User".to_string(),
            email: email.to_string(),
            role,
            specialization: None,
        }
    }

    pub fn doctor(email: &str) -> Self {
        Self {
            name: "Dr. Test".to_string(),
            specialization: Some("Cardiology".to_string()),
            ..Self::new(email, Role::Doctor)
        }
    }

    pub fn patient(email: &str) -> Self {
        Self {
            name: "Test Patient".to_string(),
            ..Self::new(email, Role::Patient)
        }
    }

    pub fn to_identity(&self) -> Identity {
        Identity {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
            photo_url: None,
            specialization: self.specialization.clone(),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "id": self.id,
            "name": self.name,
            "email": self.email,
            "role": self.role.as_wire(),
            "specialization": self.specialization
        })
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(user: &TestIdentity, exp_hours: Option<i64>) -> String {
        let now = Utc::now();
        let exp = now + Duration::hours(exp_hours.unwrap_or(24));

        let header = json!({
            "alg": "HS256",
            "typ": "JWT"
        });

        let payload = json!({
            "sub": user.id,
            "email": user.email,
            "role": user.role.as_wire(),
            "iat": now.timestamp(),
            "exp": exp.timestamp()
        });

        let header_encoded = general_purpose::URL_SAFE_NO_PAD.encode(header.to_string());
        let payload_encoded = general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string());

        let signing_input = format!("{}.{}", header_encoded, payload_encoded);

        let mut mac = Hmac::<Sha256>::new_from_slice(TEST_JWT_SECRET.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(signing_input.as_bytes());
        let signature = mac.finalize().into_bytes();
        let signature_encoded = general_purpose::URL_SAFE_NO_PAD.encode(signature);

        format!("{}.{}", signing_input, signature_encoded)
    }

    pub fn create_expired_token(user: &TestIdentity) -> String {
        Self::create_test_token(user, Some(-1))
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }
}

/// JSON bodies shaped like the MedConnect backend's responses.
pub struct MockApiResponses;

impl MockApiResponses {
    pub fn auth_response(user: &TestIdentity, token: &str) -> serde_json::Value {
        json!({
            "success": true,
            "message": "Login successful",
            "data": {
                "user": user.to_json(),
                "token": token
            }
        })
    }

    pub fn doctor_json(id: &str, name: &str, specialization: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "email": format!("{}@medconnect.test", id),
            "specialization": specialization,
            "photo_url": null
        })
    }

    pub fn appointment_json(id: &str, patient_id: &str, doctor_id: &str, status: &str) -> serde_json::Value {
        json!({
            "id": id,
            "patient_id": patient_id,
            "doctor_id": doctor_id,
            "date": "2030-01-15T00:00:00.000Z",
            "status": status,
            "doctor": Self::doctor_json(doctor_id, "Dr. Test", "Cardiology"),
            "patient": {
                "id": patient_id,
                "name": "Test Patient",
                "email": "patient@example.com"
            }
        })
    }

    pub fn envelope(data: serde_json::Value, message: &str) -> serde_json::Value {
        json!({
            "success": true,
            "message": message,
            "data": data
        })
    }

    pub fn paginated(items: Vec<serde_json::Value>, current_page: u32, total_pages: u32) -> serde_json::Value {
        let total_items = items.len() as u64 * total_pages as u64;
        json!({
            "data": items,
            "pagination": {
                "current_page": current_page,
                "total_pages": total_pages,
                "total_items": total_items,
                "items_per_page": 9
            }
        })
    }

    pub fn error_response(message: &str) -> serde_json::Value {
        json!({
            "success": false,
            "message": message
        })
    }
}
