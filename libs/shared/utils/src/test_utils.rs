use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::{JwtClaims, User, UserRole};

use crate::jwt::encode_token;

pub struct TestConfig {
    pub jwt_secret: String,
    pub supabase_url: String,
    pub supabase_api_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            supabase_api_key: "test-api-key".to_string(),
        }
    }
}

impl TestConfig {
    pub fn with_supabase_url(url: &str) -> Self {
        Self {
            supabase_url: url.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_api_key: self.supabase_api_key.clone(),
            jwt_secret: self.jwt_secret.clone(),
            port: 3000,
            token_ttl_hours: 24,
            clinic_utc_offset_minutes: 0,
            db_connect_timeout_secs: 2,
        }
    }
}

pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: UserRole,
}

impl Default for TestUser {
    fn default() -> Self {
        Self::new("test@example.com", UserRole::Patient)
    }
}

impl TestUser {
    pub fn new(email: &str, role: UserRole) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name: "Test User".to_string(),
            role,
        }
    }

    pub fn doctor(email: &str) -> Self {
        Self::new(email, UserRole::Doctor)
    }

    pub fn patient(email: &str) -> Self {
        Self::new(email, UserRole::Patient)
    }

    pub fn to_user(&self) -> User {
        User {
            id: self.id,
            email: Some(self.email.clone()),
            role: self.role,
            name: Some(self.name.clone()),
            issued_at: Some(Utc::now()),
        }
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(user: &TestUser, secret: &str, exp_hours: Option<i64>) -> String {
        let now = Utc::now();
        let exp = now + Duration::hours(exp_hours.unwrap_or(24));

        let claims = JwtClaims {
            sub: user.id.to_string(),
            exp: Some(exp.timestamp().max(0) as u64),
            iat: Some(now.timestamp() as u64),
            email: Some(user.email.clone()),
            role: Some(user.role.to_string()),
            name: Some(user.name.clone()),
        };

        encode_token(&claims, secret).expect("test secret is non-empty")
    }

    pub fn create_expired_token(user: &TestUser, secret: &str) -> String {
        Self::create_test_token(user, secret, Some(-1))
    }

    pub fn create_invalid_signature_token(user: &TestUser) -> String {
        Self::create_test_token(user, "wrong-secret", Some(24))
    }
}

pub struct MockSupabaseResponses;

impl MockSupabaseResponses {
    pub fn user_response(user_id: Uuid, email: &str, password_hash: &str) -> serde_json::Value {
        json!({
            "id": user_id,
            "name": "Test User",
            "email": email,
            "password_hash": password_hash,
            "role": "patient",
            "created_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn slot_response(slot_id: Uuid, start_time: DateTime<Utc>, status: &str) -> serde_json::Value {
        json!({
            "id": slot_id,
            "doctor_id": null,
            "start_time": start_time.to_rfc3339(),
            "end_time": (start_time + Duration::minutes(30)).to_rfc3339(),
            "status": status,
            "created_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn booking_response(booking_id: Uuid, user_id: Uuid, slot_id: Uuid) -> serde_json::Value {
        json!({
            "id": booking_id,
            "user_id": user_id,
            "slot_id": slot_id,
            "status": "confirmed",
            "created_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn booking_with_slot_response(
        booking_id: Uuid,
        user_id: Uuid,
        slot_id: Uuid,
        start_time: DateTime<Utc>,
    ) -> serde_json::Value {
        let mut booking = Self::booking_response(booking_id, user_id, slot_id);
        booking["slot"] = Self::slot_response(slot_id, start_time, "booked");
        booking
    }
}
