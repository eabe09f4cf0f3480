//! Authentication configuration (Supabase GoTrue)

use secrecy::SecretString;
use serde::Deserialize;

use super::error::ValidationError;

/// Auth provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Supabase project URL (https://xyz.supabase.co)
    pub supabase_url: String,

    /// Anon (publishable) API key, sent as `apikey` on token validation
    pub supabase_anon_key: SecretString,

    /// Comma-separated admin email allow-list.
    ///
    /// Empty means any authenticated user passes the admin check; that
    /// permissive default is logged loudly at startup.
    #[serde(default)]
    pub admin_emails: String,
}

impl AuthConfig {
    /// Parsed admin allow-list, trimmed and de-blanked
    pub fn admin_allow_list(&self) -> Vec<String> {
        self.admin_emails
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Validate auth configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.supabase_url.is_empty() {
            return Err(ValidationError::MissingRequired("SUPABASE_URL"));
        }
        if !self.supabase_url.starts_with("http://") && !self.supabase_url.starts_with("https://") {
            return Err(ValidationError::InvalidSupabaseUrl);
        }
        use secrecy::ExposeSecret;
        if self.supabase_anon_key.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("SUPABASE_ANON_KEY"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config(admin_emails: &str) -> AuthConfig {
        AuthConfig {
            supabase_url: "https://xyz.supabase.co".to_string(),
            supabase_anon_key: SecretString::new("anon-key".to_string()),
            admin_emails: admin_emails.to_string(),
        }
    }

    #[test]
    fn allow_list_parses_and_trims() {
        let config = base_config(" a@x.com, b@y.com ,,");
        assert_eq!(config.admin_allow_list(), vec!["a@x.com", "b@y.com"]);
    }

    #[test]
    fn empty_allow_list_is_empty_vec() {
        assert!(base_config("").admin_allow_list().is_empty());
    }

    #[test]
    fn non_http_url_rejected() {
        let mut config = base_config("");
        config.supabase_url = "ftp://nope".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn valid_config_accepted() {
        assert!(base_config("admin@example.com").validate().is_ok());
    }
}
