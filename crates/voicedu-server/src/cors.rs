use http::{Method, header::HeaderName};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use voicedu_config::{AnyOrArray, CorsConfig};

/// Build a Tower CORS layer from configuration
///
/// Unparseable entries are skipped with a warning.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let mut layer = match &config.origins {
        AnyOrArray::Any => CorsLayer::new().allow_origin(AllowOrigin::any()),
        AnyOrArray::List(origins) => CorsLayer::new().allow_origin(parse_all::<http::HeaderValue>("origin", origins)),
    };

    layer = match &config.methods {
        AnyOrArray::Any => layer.allow_methods(AllowMethods::any()),
        AnyOrArray::List(methods) => layer.allow_methods(parse_all::<Method>("method", methods)),
    };

    layer = match &config.headers {
        AnyOrArray::Any => layer.allow_headers(AllowHeaders::any()),
        AnyOrArray::List(headers) => layer.allow_headers(parse_all::<HeaderName>("header", headers)),
    };

    if let Some(duration) = config.max_age_duration() {
        layer = layer.max_age(duration);
    }

    layer
}

fn parse_all<T: std::str::FromStr>(kind: &str, values: &[String]) -> Vec<T> {
    values
        .iter()
        .filter_map(|value| {
            let parsed = value.parse().ok();
            if parsed.is_none() {
                tracing::warn!("Ignoring invalid CORS {kind}: {value}");
            }
            parsed
        })
        .collect()
}
