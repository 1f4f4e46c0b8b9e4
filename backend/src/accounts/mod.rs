//! User accounts and the authenticated-user capability
//!
//! The registry is an in-memory map keyed by lowercased email. Passwords are
//! stored as SHA-256 hex digests. A successful signup or login yields an
//! [`AuthenticatedUser`], which is what protected service operations require.

use std::sync::LazyLock;

use chrono::{DateTime, Local};
use dashmap::DashMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::config::AccountsConfig;

static EMAIL_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").ok()
});

/// Signup and login failures, with user-facing messages
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AuthError {
    #[error("Le champ {0} est requis")]
    MissingField(String),

    #[error("Email et mot de passe requis")]
    MissingCredentials,

    #[error("Format d'email invalide")]
    InvalidEmail,

    #[error("Un compte avec cet email existe déjà")]
    EmailTaken,

    #[error("{0}")]
    WeakPassword(String),

    #[error("Les mots de passe ne correspondent pas")]
    PasswordMismatch,

    /// Same error for unknown email and wrong password
    #[error("Email ou mot de passe incorrect")]
    InvalidCredentials,
}

/// Stored account
#[derive(Debug, Clone)]
pub struct UserAccount {
    pub id: String,
    pub full_name: String,
    pub email: String,
    password_hash: String,
    pub created_at: DateTime<Local>,
    pub last_login: DateTime<Local>,
}

impl UserAccount {
    fn new(id: String, full_name: String, email: String, password: &str) -> Self {
        let now = Local::now();
        Self {
            id,
            full_name,
            email,
            password_hash: hash_password(password),
            created_at: now,
            last_login: now,
        }
    }

    fn identity(&self) -> AuthenticatedUser {
        AuthenticatedUser {
            id: self.id.clone(),
            email: self.email.clone(),
            full_name: self.full_name.clone(),
        }
    }
}

/// Proof that a user signed up or logged in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: String,
    pub email: String,
    #[serde(rename = "nom_complet")]
    pub full_name: String,
}

/// Signup form
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SignupRequest {
    pub nom_complet: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// SHA-256 hex digest of a password
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN
        .as_ref()
        .map_or(false, |pattern| pattern.is_match(email))
}

/// Length (in characters), at least one digit, at least one letter
pub fn validate_password(password: &str, min_length: usize) -> Result<(), AuthError> {
    if password.chars().count() < min_length {
        return Err(AuthError::WeakPassword(format!(
            "Le mot de passe doit contenir au moins {} caractères",
            min_length
        )));
    }
    if !password.chars().any(char::is_numeric) {
        return Err(AuthError::WeakPassword(
            "Le mot de passe doit contenir au moins un chiffre".to_string(),
        ));
    }
    if !password.chars().any(char::is_alphabetic) {
        return Err(AuthError::WeakPassword(
            "Le mot de passe doit contenir au moins une lettre".to_string(),
        ));
    }
    Ok(())
}

/// Thread-safe account store
pub struct AccountRegistry {
    accounts: DashMap<String, UserAccount>,
    min_password_length: usize,
}

impl AccountRegistry {
    pub fn new(config: &AccountsConfig) -> Self {
        let registry = Self {
            accounts: DashMap::new(),
            min_password_length: config.min_password_length,
        };
        if config.seed_demo_accounts {
            registry.seed_demo_accounts();
        }
        registry
    }

    fn seed_demo_accounts(&self) {
        let seeds = [
            ("admin123", "Administrateur ERP", "admin@erp.ma", "admin123"),
            ("demo_user_123", "Utilisateur Démo", "demo@erp.ma", "demo123"),
        ];
        for (id, name, email, password) in seeds {
            self.accounts.insert(
                email.to_string(),
                UserAccount::new(id.to_string(), name.to_string(), email.to_string(), password),
            );
        }
        info!(accounts = self.accounts.len(), "demo accounts seeded");
    }

    /// Register a new account and return its identity
    pub fn signup(&self, request: &SignupRequest) -> Result<AuthenticatedUser, AuthError> {
        let fields = [
            ("nom_complet", &request.nom_complet),
            ("email", &request.email),
            ("password", &request.password),
            ("confirm_password", &request.confirm_password),
        ];
        for (name, value) in fields {
            if value.is_empty() {
                return Err(AuthError::MissingField(name.to_string()));
            }
        }

        let full_name = request.nom_complet.trim().to_string();
        let email = request.email.trim().to_lowercase();

        if !is_valid_email(&email) {
            return Err(AuthError::InvalidEmail);
        }
        if self.accounts.contains_key(&email) {
            return Err(AuthError::EmailTaken);
        }
        validate_password(&request.password, self.min_password_length)?;
        if request.password != request.confirm_password {
            return Err(AuthError::PasswordMismatch);
        }

        // A concurrent signup may have claimed the email since the check above
        let account = match self.accounts.entry(email.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => return Err(AuthError::EmailTaken),
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                let account = UserAccount::new(
                    Uuid::new_v4().simple().to_string(),
                    full_name,
                    email,
                    &request.password,
                );
                slot.insert(account.clone());
                account
            }
        };

        info!(email = %account.email, "new user registered");
        Ok(account.identity())
    }

    /// Check credentials and record the login time
    pub fn login(&self, email: &str, password: &str) -> Result<AuthenticatedUser, AuthError> {
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let email = email.trim().to_lowercase();
        let mut account = self
            .accounts
            .get_mut(&email)
            .ok_or(AuthError::InvalidCredentials)?;

        if account.password_hash != hash_password(password) {
            return Err(AuthError::InvalidCredentials);
        }

        account.last_login = Local::now();
        info!(email = %email, "user logged in");
        Ok(account.identity())
    }

    pub fn contains(&self, email: &str) -> bool {
        self.accounts.contains_key(email)
    }

    pub fn get(&self, email: &str) -> Option<UserAccount> {
        self.accounts.get(email).map(|r| r.clone())
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl Default for AccountRegistry {
    fn default() -> Self {
        Self::new(&AccountsConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_registry() -> AccountRegistry {
        AccountRegistry::new(&AccountsConfig {
            seed_demo_accounts: false,
            ..AccountsConfig::default()
        })
    }

    fn signup_request(email: &str) -> SignupRequest {
        SignupRequest {
            nom_complet: "  Amina Benali ".to_string(),
            email: email.to_string(),
            password: "motdepasse1".to_string(),
            confirm_password: "motdepasse1".to_string(),
        }
    }

    #[test]
    fn test_hash_password_is_sha256_hex() {
        assert_eq!(
            hash_password("admin123"),
            "240be518fabd2724ddb6f04eeb1da5967448d7e831c08c8fa822809f74c720a9"
        );
    }

    #[test]
    fn test_demo_accounts_seeded() {
        let registry = AccountRegistry::default();
        assert_eq!(registry.len(), 2);

        let demo = registry.login("demo@erp.ma", "demo123").unwrap();
        assert_eq!(demo.id, "demo_user_123");
        assert_eq!(demo.full_name, "Utilisateur Démo");
    }

    #[test]
    fn test_signup_normalizes_and_logs_in() {
        let registry = empty_registry();
        let user = registry.signup(&signup_request("  Amina@Example.MA ")).unwrap();

        assert_eq!(user.email, "amina@example.ma");
        assert_eq!(user.full_name, "Amina Benali");
        assert_eq!(user.id.len(), 32);
        assert!(registry.contains("amina@example.ma"));

        let again = registry.login("AMINA@example.ma", "motdepasse1").unwrap();
        assert_eq!(again, user);
    }

    #[test]
    fn test_signup_rejects_duplicates() {
        let registry = empty_registry();
        registry.signup(&signup_request("a@b.ma")).unwrap();
        assert_eq!(
            registry.signup(&signup_request("A@B.ma")).unwrap_err(),
            AuthError::EmailTaken
        );
    }

    #[test]
    fn test_signup_field_validation_order() {
        let registry = empty_registry();
        let mut request = signup_request("a@b.ma");
        request.password.clear();
        request.confirm_password.clear();
        assert_eq!(
            registry.signup(&request).unwrap_err(),
            AuthError::MissingField("password".to_string())
        );

        let request = signup_request("not-an-email");
        assert_eq!(registry.signup(&request).unwrap_err(), AuthError::InvalidEmail);

        let mut request = signup_request("a@b.ma");
        request.confirm_password = "autrechose1".to_string();
        assert_eq!(registry.signup(&request).unwrap_err(), AuthError::PasswordMismatch);
    }

    #[test]
    fn test_password_rules() {
        assert!(validate_password("abc12345", 8).is_ok());
        assert_eq!(
            validate_password("abc1", 8).unwrap_err().to_string(),
            "Le mot de passe doit contenir au moins 8 caractères"
        );
        assert_eq!(
            validate_password("abcdefgh", 8).unwrap_err().to_string(),
            "Le mot de passe doit contenir au moins un chiffre"
        );
        assert_eq!(
            validate_password("12345678", 8).unwrap_err().to_string(),
            "Le mot de passe doit contenir au moins une lettre"
        );
        // Length counts characters, not bytes
        assert!(validate_password("éééééé1", 8).is_err());
    }

    #[test]
    fn test_login_failures_share_one_error() {
        let registry = AccountRegistry::default();
        assert_eq!(
            registry.login("nobody@erp.ma", "whatever1").unwrap_err(),
            AuthError::InvalidCredentials
        );
        assert_eq!(
            registry.login("demo@erp.ma", "wrong").unwrap_err(),
            AuthError::InvalidCredentials
        );
        assert_eq!(registry.login("", "x").unwrap_err(), AuthError::MissingCredentials);
    }

    #[test]
    fn test_login_updates_last_login() {
        let registry = AccountRegistry::default();
        let before = registry.get("admin@erp.ma").unwrap().last_login;
        registry.login("admin@erp.ma", "admin123").unwrap();
        let after = registry.get("admin@erp.ma").unwrap().last_login;
        assert!(after >= before);
    }
}
