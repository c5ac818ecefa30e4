use crate::error::ClientError;
use crate::models::RegisterPayload;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    /// Trimmed `(email, password)`, both required.
    pub fn validate(&self) -> Result<(String, String), ClientError> {
        let email = self.email.trim();
        let password = self.password.trim();

        if email.is_empty() || password.is_empty() {
            return Err(ClientError::Validation(
                "Please enter both email and password".to_string(),
            ));
        }

        Ok((email.to_string(), password.to_string()))
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub is_doctor: bool,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<RegisterPayload, ClientError> {
        let name = self.name.trim();
        let email = self.email.trim();
        // trimmed the same way the server trims before hashing
        let password = self.password.trim();

        if name.is_empty() || email.is_empty() {
            return Err(ClientError::Validation("Name and email are required".to_string()));
        }
        if password != self.confirm_password.trim() {
            return Err(ClientError::Validation("Passwords do not match".to_string()));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ClientError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        Ok(RegisterPayload {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            is_doctor: self.is_doctor,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn register_form(password: &str, confirm: &str) -> RegisterForm {
        RegisterForm {
            name: "Ana".to_string(),
            email: "ana@clinic.io".to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
            is_doctor: false,
        }
    }

    #[test]
    fn test_login_form_trims_and_requires_fields() {
        let form = LoginForm {
            email: "  ana@clinic.io ".to_string(),
            password: " secret1 ".to_string(),
        };
        assert_eq!(form.validate().unwrap(), ("ana@clinic.io".to_string(), "secret1".to_string()));

        let blank = LoginForm {
            email: "ana@clinic.io".to_string(),
            password: "   ".to_string(),
        };
        assert_matches!(blank.validate(), Err(ClientError::Validation(_)));
    }

    #[test]
    fn test_register_form_rules() {
        assert!(register_form("secret1", "secret1").validate().is_ok());
        assert_matches!(
            register_form("secret1", "secret2").validate(),
            Err(ClientError::Validation(msg)) if msg == "Passwords do not match"
        );
        assert_matches!(register_form("12345", "12345").validate(), Err(ClientError::Validation(_)));
    }

    #[test]
    fn test_register_form_counts_trimmed_password() {
        assert_matches!(
            register_form("     a", "     a").validate(),
            Err(ClientError::Validation(msg)) if msg.starts_with("Password must be at least")
        );

        let payload = register_form(" secret1 ", "secret1").validate().unwrap();
        assert_eq!(payload.password, "secret1");
    }
}
