use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::health;
use super::middleware::{logging_middleware, metrics_middleware};
use super::predict;
use super::state::AppState;

/// Prediction API routes with request logging, metrics and permissive CORS
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::health_check))
        .route("/live", get(health::live_check))
        .route("/predict", post(predict::predict))
        .with_state(state)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::infrastructure::services::{PredictionService, fixtures};

    fn loaded() -> Router {
        let service =
            PredictionService::with_artifact(fixtures::water_artifact(), "models/rf_model.json")
                .unwrap();
        create_router(AppState::new(service))
    }

    fn unloaded() -> Router {
        create_router(AppState::new(PredictionService::unloaded()))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn predict_request(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/predict")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn clean_payload() -> Value {
        serde_json::to_value(fixtures::clean_sample()).unwrap()
    }

    #[tokio::test]
    async fn test_root_reports_identity() {
        let (status, body) = send(loaded(), get_request("/")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Water Potability Prediction API is running.");
        assert_eq!(body["model_loaded"], true);
        assert_eq!(body["model_info"]["model_path"], "models/rf_model.json");
        assert_eq!(body["model_info"]["model_type"], "Random Forest Classifier");

        let (_, body) = send(unloaded(), get_request("/")).await;
        assert_eq!(body["model_loaded"], false);
        assert!(body["model_info"].is_null());
    }

    #[tokio::test]
    async fn test_health_and_ready_when_loaded() {
        for path in ["/health", "/ready"] {
            let (status, body) = send(loaded(), get_request(path)).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, json!({"status": "healthy", "model_loaded": true}));
        }
    }

    #[tokio::test]
    async fn test_health_unavailable_without_model() {
        for path in ["/health", "/ready"] {
            let (status, body) = send(unloaded(), get_request(path)).await;
            assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
            assert_eq!(body["error"]["message"], "Model not loaded");
        }
    }

    #[tokio::test]
    async fn test_live_always_ok() {
        let (status, _) = send(unloaded(), get_request("/live")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_predict_returns_label_and_verdict() {
        let (status, body) = send(loaded(), predict_request(clean_payload())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["prediction"], 1);
        assert_eq!(body["result"], "Water is Consumable");
    }

    #[tokio::test]
    async fn test_predict_documented_sample() {
        let payload = json!({
            "ph": 7.0,
            "Hardness": 200,
            "Solids": 20000,
            "Chloramines": 7,
            "Sulfate": 300,
            "Conductivity": 400,
            "Organic_carbon": 15,
            "Trihalomethanes": 60,
            "Turbidity": 4
        });

        let (status, body) = send(loaded(), predict_request(payload)).await;

        assert_eq!(status, StatusCode::OK);
        let expected = match body["prediction"].as_u64() {
            Some(1) => "Water is Consumable",
            Some(0) => "Water is Not Consumable",
            other => panic!("prediction must be 0 or 1, got {:?}", other),
        };
        assert_eq!(body["result"], expected);
    }

    #[tokio::test]
    async fn test_predict_without_model_is_503() {
        let (status, body) = send(unloaded(), predict_request(clean_payload())).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"]["message"], "Model not loaded");
    }

    #[tokio::test]
    async fn test_predict_missing_field_is_client_error() {
        let mut payload = clean_payload();
        payload.as_object_mut().unwrap().remove("Turbidity");

        let (status, body) = send(loaded(), predict_request(payload)).await;

        assert!(status.is_client_error());
        assert_eq!(body["error"]["type"], "invalid_request_error");
        assert_eq!(body["error"]["param"], "Turbidity");
    }

    #[tokio::test]
    async fn test_predict_wrong_type_is_client_error() {
        let mut payload = clean_payload();
        payload["ph"] = json!("acidic");

        let (status, body) = send(loaded(), predict_request(payload)).await;
        assert!(status.is_client_error());
        assert_eq!(body["error"]["code"], "json_parse_error");
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let request = Request::builder()
            .uri("/live")
            .header(header::ORIGIN, "http://example.com")
            .body(Body::empty())
            .unwrap();

        let response = loaded().oneshot(request).await.unwrap();
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }
}
