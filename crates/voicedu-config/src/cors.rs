use std::time::Duration;

use serde::Deserialize;

/// CORS configuration
///
/// Defaults mirror what browser clients of the handlers need: any origin,
/// `GET`/`POST`/`OPTIONS`, and the `Content-Type` and `Authorization` headers.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorsConfig {
    /// Allowed origins (wildcard "*" or explicit list)
    #[serde(default)]
    pub origins: AnyOrArray,
    /// Allowed HTTP methods (wildcard "*" or explicit list)
    #[serde(default = "default_methods")]
    pub methods: AnyOrArray,
    /// Allowed request headers (wildcard "*" or explicit list)
    #[serde(default = "default_headers")]
    pub headers: AnyOrArray,
    /// Max age for preflight cache in seconds
    #[serde(default)]
    pub max_age: Option<u64>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            origins: AnyOrArray::Any,
            methods: default_methods(),
            headers: default_headers(),
            max_age: None,
        }
    }
}

impl CorsConfig {
    /// Get max age as Duration
    pub fn max_age_duration(&self) -> Option<Duration> {
        self.max_age.map(Duration::from_secs)
    }
}

/// Either a wildcard "*" or explicit list of values
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawAnyOrArray")]
pub enum AnyOrArray {
    /// Match any value
    #[default]
    Any,
    /// Explicit list
    List(Vec<String>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAnyOrArray {
    One(String),
    Many(Vec<String>),
}

impl From<RawAnyOrArray> for AnyOrArray {
    fn from(raw: RawAnyOrArray) -> Self {
        let values = match raw {
            RawAnyOrArray::One(value) => vec![value],
            RawAnyOrArray::Many(values) => values,
        };

        if values.iter().any(|v| v == "*") {
            Self::Any
        } else {
            Self::List(values)
        }
    }
}

fn default_methods() -> AnyOrArray {
    AnyOrArray::List(vec!["GET".to_string(), "POST".to_string(), "OPTIONS".to_string()])
}

fn default_headers() -> AnyOrArray {
    AnyOrArray::List(vec!["Content-Type".to_string(), "Authorization".to_string()])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_string() {
        let config: CorsConfig = toml::from_str(r#"origins = "*""#).unwrap();
        assert_eq!(config.origins, AnyOrArray::Any);
        assert_eq!(config.methods, default_methods());
    }

    #[test]
    fn wildcard_inside_list_wins() {
        let config: CorsConfig = toml::from_str(r#"headers = ["Content-Type", "*"]"#).unwrap();
        assert_eq!(config.headers, AnyOrArray::Any);
    }

    #[test]
    fn explicit_origins() {
        let config: CorsConfig = toml::from_str(
            r#"
            origins = ["https://app.voicedu.dev", "http://localhost:5173"]
            max_age = 600
            "#,
        )
        .unwrap();

        assert_eq!(
            config.origins,
            AnyOrArray::List(vec![
                "https://app.voicedu.dev".to_string(),
                "http://localhost:5173".to_string()
            ])
        );
        assert_eq!(config.max_age_duration(), Some(Duration::from_secs(600)));
    }

    #[test]
    fn single_origin_string() {
        let config: CorsConfig = toml::from_str(r#"origins = "https://app.voicedu.dev""#).unwrap();
        assert_eq!(config.origins, AnyOrArray::List(vec!["https://app.voicedu.dev".to_string()]));
    }
}
