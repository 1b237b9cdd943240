pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::extraction::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/cv/extract", post(handlers::handle_extract))
        .route("/api/v1/cv/extract/pdf", post(handlers::handle_extract_pdf))
        .route("/api/v1/cv/segment", post(handlers::handle_segment))
        .route("/api/v1/cv/industry", post(handlers::handle_industry))
        .route("/api/v1/cv/render", post(handlers::handle_render))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::extraction::pipeline::Pipeline;
    use crate::extraction::skills::RecognizerRegistry;
    use crate::keywords::tests::sample_db;
    use crate::llm_client::tests::{FailingOracle, ShoutingOracle};
    use crate::llm_client::TextOracle;

    const CV: &str = "Jane Doe\njane@example.com\n\nExperience\n\
                      Backend Engineer at Acme Corp (2019-2022)\n- Deployed Docker services\n\
                      Education\nBSc Computer Science\nSkills\nPython, Kubernetes";

    fn app_with(oracle: Arc<dyn TextOracle>) -> Router {
        let config = Config::from_vars(|key| (key == "PIPELINE_STRATEGY").then(|| "heuristic".to_string()))
            .unwrap();
        let pipeline = Pipeline::new(
            oracle,
            Arc::new(sample_db()),
            Arc::new(RecognizerRegistry::with_pattern_recognizers()),
            config.rewrite_concurrency,
        );
        build_router(AppState {
            pipeline: Arc::new(pipeline),
            config,
        })
    }

    fn app() -> Router {
        app_with(Arc::new(FailingOracle))
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> Response {
        app.oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "cv-optimizer");
    }

    #[tokio::test]
    async fn test_extract_heuristic_with_unreachable_oracle() {
        let response = post_json(app(), "/api/v1/cv/extract", json!({ "raw_text": CV, "lang": "en" })).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["industry"], "tech");
        assert_eq!(body["industry_source"], "detected");
        assert_eq!(body["strategy_used"], "heuristic");
        assert_eq!(body["lang"], "en");
        assert_eq!(body["record"]["name"], "Jane Doe");
        assert_eq!(body["record"]["contact_info"], "jane@example.com");
        assert_eq!(body["record"]["experience"][0]["company"], "Acme Corp");
        assert_eq!(body["record"]["experience"][0]["bullets"][0], "Deployed Docker services");
        let skills: Vec<&str> = body["record"]["skills"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert!(skills.contains(&"Docker"));
        assert!(skills.contains(&"Kubernetes"));
        assert!(body["request_id"].is_string());
    }

    #[tokio::test]
    async fn test_extract_rewrites_bullets_through_oracle() {
        let response = post_json(
            app_with(Arc::new(ShoutingOracle)),
            "/api/v1/cv/extract",
            json!({ "raw_text": CV, "lang": "en", "industry": "finance", "strategy": "heuristic" }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["industry"], "finance");
        assert_eq!(body["industry_source"], "forced");
        assert_eq!(body["record"]["experience"][0]["bullets"][0], "DEPLOYED DOCKER SERVICES");
    }

    #[tokio::test]
    async fn test_blank_text_is_bad_request() {
        let response = post_json(app(), "/api/v1/cv/extract", json!({ "raw_text": "   \n" })).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let extract_body = body_json(response).await;
        assert_eq!(extract_body["error"]["code"], "VALIDATION_ERROR");

        let response = post_json(app(), "/api/v1/cv/segment", json!({ "raw_text": "" })).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let segment_body = body_json(response).await;
        assert_eq!(segment_body["error"]["message"], extract_body["error"]["message"]);
    }

    #[tokio::test]
    async fn test_unknown_selectors_are_bad_requests() {
        for body in [
            json!({ "raw_text": CV, "lang": "fr" }),
            json!({ "raw_text": CV, "industry": "farming" }),
            json!({ "raw_text": CV, "strategy": "guess" }),
        ] {
            let response = post_json(app(), "/api/v1/cv/extract", body).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn test_generative_without_oracle_is_unprocessable() {
        let response = post_json(
            app(),
            "/api/v1/cv/extract",
            json!({ "raw_text": CV, "strategy": "generative" }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_segment_returns_buckets() {
        let response = post_json(app(), "/api/v1/cv/segment", json!({ "raw_text": CV })).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["lang"], "en");
        assert_eq!(body["sections"]["contact"][0], "Jane Doe");
        assert_eq!(body["sections"]["education"][0], "BSc Computer Science");
    }

    #[tokio::test]
    async fn test_industry_scores() {
        let response = post_json(app(), "/api/v1/cv/industry", json!({ "raw_text": CV, "lang": "en" })).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["industry"], "tech");
        assert_eq!(body["scores"].as_array().unwrap().len(), 5);
        assert_eq!(body["scores"][0]["industry"], "tech");
    }

    #[tokio::test]
    async fn test_render_returns_html() {
        let record = json!({
            "name": "Ana Pérez",
            "contact_info": "ana@example.com",
            "summary": "",
            "experience": [],
            "education": "Grado en Informática",
            "certifications": [],
            "skills": ["Rust"],
            "lang": "es"
        });
        let response = post_json(
            app(),
            "/api/v1/cv/render",
            json!({ "record": record, "template": "executive" }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
        assert!(content_type.starts_with("text/html"));

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("Formación"));
        assert!(html.contains("Ana Pérez"));
    }

    #[tokio::test]
    async fn test_unreadable_pdf_is_unprocessable() {
        let boundary = "cvboundary";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"lang\"\r\n\r\n\
             en\r\n\
             --{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"cv.pdf\"\r\n\
             Content-Type: application/pdf\r\n\r\n\
             not a pdf at all\r\n\
             --{boundary}--\r\n"
        );
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/cv/extract/pdf")
                    .header(
                        header::CONTENT_TYPE,
                        format!("multipart/form-data; boundary={boundary}"),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_pdf_upload_without_file_is_bad_request() {
        let boundary = "cvboundary";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"lang\"\r\n\r\n\
             en\r\n\
             --{boundary}--\r\n"
        );
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/cv/extract/pdf")
                    .header(
                        header::CONTENT_TYPE,
                        format!("multipart/form-data; boundary={boundary}"),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
