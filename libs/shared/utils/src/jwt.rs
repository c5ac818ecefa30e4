use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Duration, TimeZone, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::debug;
use uuid::Uuid;

use shared_models::auth::{JwtClaims, JwtHeader, User, UserRole};

type HmacSha256 = Hmac<Sha256>;

fn sign(signing_input: &str, jwt_secret: &str) -> Result<Vec<u8>, String> {
    let mut mac = HmacSha256::new_from_slice(jwt_secret.as_bytes())
        .map_err(|_| "Failed to create HMAC".to_string())?;
    mac.update(signing_input.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Serialize and sign arbitrary claims as an HS256 compact JWT.
pub fn encode_token(claims: &JwtClaims, jwt_secret: &str) -> Result<String, String> {
    if jwt_secret.is_empty() {
        return Err("JWT secret is not set".to_string());
    }

    let header = JwtHeader {
        alg: "HS256".to_string(),
        typ: "JWT".to_string(),
    };
    let header_json = serde_json::to_string(&header).map_err(|e| e.to_string())?;
    let claims_json = serde_json::to_string(claims).map_err(|e| e.to_string())?;

    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(header_json),
        URL_SAFE_NO_PAD.encode(claims_json)
    );
    let signature = sign(&signing_input, jwt_secret)?;

    Ok(format!("{}.{}", signing_input, URL_SAFE_NO_PAD.encode(signature)))
}

/// Issue an access token for a freshly authenticated account.
pub fn issue_token(
    user_id: Uuid,
    email: &str,
    role: UserRole,
    name: &str,
    jwt_secret: &str,
    ttl: Duration,
) -> Result<(String, DateTime<Utc>), String> {
    let now = Utc::now();
    let expires_at = now + ttl;

    let claims = JwtClaims {
        sub: user_id.to_string(),
        exp: Some(expires_at.timestamp() as u64),
        iat: Some(now.timestamp() as u64),
        email: Some(email.to_string()),
        role: Some(role.to_string()),
        name: Some(name.to_string()),
    };

    let token = encode_token(&claims, jwt_secret)?;
    debug!("Issued token for user: {}", user_id);
    Ok((token, expires_at))
}

pub fn validate_token(token: &str, jwt_secret: &str) -> Result<User, String> {
    if jwt_secret.is_empty() {
        return Err("JWT secret is not set".to_string());
    }

    // Split token into parts
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err("Invalid token format".to_string());
    }

    let header_b64 = parts[0];
    let claims_b64 = parts[1];
    let signature_b64 = parts[2];

    let signature = match URL_SAFE_NO_PAD.decode(signature_b64) {
        Ok(sig) => sig,
        Err(e) => {
            debug!("Failed to decode signature: {}", e);
            return Err("Invalid signature encoding".to_string());
        }
    };

    let mut mac = HmacSha256::new_from_slice(jwt_secret.as_bytes())
        .map_err(|_| "Failed to create HMAC".to_string())?;
    mac.update(format!("{}.{}", header_b64, claims_b64).as_bytes());

    if mac.verify_slice(&signature).is_err() {
        debug!("Token signature verification failed");
        return Err("Invalid token signature".to_string());
    }

    let claims_json = URL_SAFE_NO_PAD
        .decode(claims_b64)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .ok_or_else(|| "Invalid claims encoding".to_string())?;

    let claims: JwtClaims = match serde_json::from_str(&claims_json) {
        Ok(c) => c,
        Err(e) => {
            debug!("Failed to parse claims: {}", e);
            return Err("Invalid claims format".to_string());
        }
    };

    if let Some(exp) = claims.exp {
        let now = Utc::now().timestamp() as u64;
        if exp < now {
            debug!("Token expired at {} (now: {})", exp, now);
            return Err("Token expired".to_string());
        }
    }

    let id = Uuid::parse_str(&claims.sub).map_err(|_| "Invalid token subject".to_string())?;

    let issued_at = claims
        .iat
        .and_then(|timestamp| Utc.timestamp_opt(timestamp as i64, 0).single());

    let user = User {
        id,
        email: claims.email,
        role: UserRole::parse_lossy(claims.role.as_deref()),
        name: claims.name,
        issued_at,
    };

    debug!("Token validated successfully for user: {}", user.id);
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const SECRET: &str = "unit-test-secret";

    #[test]
    fn test_issued_token_validates() {
        let user_id = Uuid::new_v4();
        let (token, expires_at) = issue_token(
            user_id,
            "doc@example.com",
            UserRole::Doctor,
            "Dr. Who",
            SECRET,
            Duration::hours(1),
        )
        .unwrap();

        assert!(expires_at > Utc::now());
        let user = validate_token(&token, SECRET).unwrap();
        assert_eq!(user.id, user_id);
        assert_eq!(user.role, UserRole::Doctor);
        assert_eq!(user.name.as_deref(), Some("Dr. Who"));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let (token, _) = issue_token(
            Uuid::new_v4(),
            "a@example.com",
            UserRole::Patient,
            "A",
            SECRET,
            Duration::hours(1),
        )
        .unwrap();
        assert_matches!(validate_token(&token, "other"), Err(msg) if msg == "Invalid token signature");
    }

    #[test]
    fn test_expired_token_rejected() {
        let (token, _) = issue_token(
            Uuid::new_v4(),
            "a@example.com",
            UserRole::Patient,
            "A",
            SECRET,
            Duration::hours(-1),
        )
        .unwrap();
        assert_matches!(validate_token(&token, SECRET), Err(msg) if msg == "Token expired");
    }

    #[test]
    fn test_non_uuid_subject_rejected() {
        let claims = JwtClaims {
            sub: "not-a-uuid".to_string(),
            exp: None,
            iat: None,
            email: None,
            role: None,
            name: None,
        };
        let token = encode_token(&claims, SECRET).unwrap();
        assert_matches!(validate_token(&token, SECRET), Err(msg) if msg == "Invalid token subject");
        assert!(validate_token("invalid.token", SECRET).is_err());
    }
}
