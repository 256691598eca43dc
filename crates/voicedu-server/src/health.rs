use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct Hello {
    ok: bool,
    msg: &'static str,
}

/// Liveness handler
pub async fn health_handler() -> Json<Hello> {
    Json(Hello {
        ok: true,
        msg: "hello from voicedu",
    })
}
