use actix_web::{web, HttpResponse};
use serde_json::{json, Map, Value};

use crate::state::AppState;

/// Handler for GET /health
///
/// Answers 503 with status `degraded` when any backing store is down.
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let mut checks = Map::new();
    let mut healthy = true;

    for check in &state.health_checks {
        let up = check.is_healthy().await;
        if !up {
            tracing::warn!(component = check.component(), "Health check failed");
        }
        healthy &= up;
        checks.insert(
            check.component().to_string(),
            Value::from(if up { "up" } else { "down" }),
        );
    }

    let body = json!({
        "status": if healthy { "healthy" } else { "degraded" },
        "service": "saasboard-auth-api",
        "version": env!("CARGO_PKG_VERSION"),
        "checks": checks,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    if healthy {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}
