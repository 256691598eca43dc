use reqwest::RequestBuilder;
use secrecy::{ExposeSecret, SecretString};
use voicedu_config::{AuthScheme, TtsConfig};

use crate::error::{Result, TtsError};

/// Provider credentials plus the scheme used to present them
///
/// Resolution happens per request, so a deployment without credentials still
/// serves everything that does not need the provider.
#[derive(Debug, Clone)]
pub struct Credentials {
    scheme: AuthScheme,
    key: Option<SecretString>,
    secret: Option<SecretString>,
}

/// Resolved `Authorization` strategy for one provider call
#[derive(PartialEq, Eq)]
pub enum ProviderAuth<'a> {
    /// `Authorization: Basic base64(key:secret)`
    Basic { key: &'a str, secret: &'a str },
    /// `Authorization: Bearer key`
    Bearer { token: &'a str },
}

impl Credentials {
    pub fn new(scheme: AuthScheme, key: Option<SecretString>, secret: Option<SecretString>) -> Self {
        Self { scheme, key, secret }
    }

    pub fn from_config(config: &TtsConfig) -> Self {
        Self::new(config.auth, config.api_key.clone(), config.api_secret.clone())
    }

    /// Pick the authentication strategy for the configured scheme
    ///
    /// Blank values count as missing. A scheme needing both parts with only
    /// one present is treated as having no credentials at all.
    pub fn resolve(&self) -> Result<ProviderAuth<'_>> {
        let key = present(self.key.as_ref());
        let secret = present(self.secret.as_ref());

        match (self.scheme, key, secret) {
            (AuthScheme::Basic | AuthScheme::Auto, Some(key), Some(secret)) => Ok(ProviderAuth::Basic { key, secret }),
            (AuthScheme::Bearer | AuthScheme::Auto, Some(token), _) => Ok(ProviderAuth::Bearer { token }),
            _ => Err(TtsError::MissingCredentials),
        }
    }
}

impl std::fmt::Debug for ProviderAuth<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Basic { .. } => f.write_str("Basic([REDACTED])"),
            Self::Bearer { .. } => f.write_str("Bearer([REDACTED])"),
        }
    }
}

impl ProviderAuth<'_> {
    /// Attach the `Authorization` header to an outgoing request
    pub fn apply(&self, builder: RequestBuilder) -> RequestBuilder {
        match self {
            Self::Basic { key, secret } => builder.basic_auth(key, Some(secret)),
            Self::Bearer { token } => builder.bearer_auth(token),
        }
    }
}

fn present(value: Option<&SecretString>) -> Option<&str> {
    value.map(|v| v.expose_secret()).filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials(scheme: AuthScheme, key: Option<&str>, secret: Option<&str>) -> Credentials {
        Credentials::new(scheme, key.map(SecretString::from), secret.map(SecretString::from))
    }

    #[test]
    fn auto_uses_basic_with_key_and_secret() {
        let creds = credentials(AuthScheme::Auto, Some("pub"), Some("priv"));
        assert_eq!(creds.resolve().unwrap(), ProviderAuth::Basic { key: "pub", secret: "priv" });
    }

    #[test]
    fn auto_uses_bearer_with_key_only() {
        let creds = credentials(AuthScheme::Auto, Some("pub"), None);
        assert_eq!(creds.resolve().unwrap(), ProviderAuth::Bearer { token: "pub" });

        let creds = credentials(AuthScheme::Auto, Some("pub"), Some(""));
        assert_eq!(creds.resolve().unwrap(), ProviderAuth::Bearer { token: "pub" });
    }

    #[test]
    fn secret_without_key_is_missing() {
        let creds = credentials(AuthScheme::Auto, None, Some("priv"));
        assert!(matches!(creds.resolve(), Err(TtsError::MissingCredentials)));
    }

    #[test]
    fn basic_with_half_the_pair_is_missing() {
        let creds = credentials(AuthScheme::Basic, Some("pub"), None);
        assert!(matches!(creds.resolve(), Err(TtsError::MissingCredentials)));

        let creds = credentials(AuthScheme::Basic, Some("  "), Some("priv"));
        assert!(matches!(creds.resolve(), Err(TtsError::MissingCredentials)));
    }

    #[test]
    fn bearer_ignores_secret() {
        let creds = credentials(AuthScheme::Bearer, Some("pub"), Some("priv"));
        assert_eq!(creds.resolve().unwrap(), ProviderAuth::Bearer { token: "pub" });
    }

    #[test]
    fn nothing_configured_is_missing() {
        for scheme in [AuthScheme::Auto, AuthScheme::Basic, AuthScheme::Bearer] {
            let creds = credentials(scheme, None, None);
            assert!(matches!(creds.resolve(), Err(TtsError::MissingCredentials)));
        }
    }

    #[test]
    fn basic_header_encodes_pair() {
        let client = reqwest::Client::new();
        let auth = ProviderAuth::Basic { key: "pub", secret: "priv" };

        let request = auth.apply(client.get("http://localhost/voices")).build().unwrap();
        let header = request.headers().get(reqwest::header::AUTHORIZATION).unwrap();

        // base64("pub:priv")
        assert_eq!(header.to_str().unwrap(), "Basic cHViOnByaXY=");
    }
}
