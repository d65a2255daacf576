// API Integration Tests
//
// Purpose: Drive every endpoint through the router without binding a socket
// Run with: cargo test --features api --test api_integration_tests

#[cfg(feature = "api")]
mod api_tests {
    use agroforestry_planner::{create_router, AppState, Planner};
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt; // for oneshot

    // Helper: Create test app on the built-in catalog and reference sites
    fn create_test_app() -> (axum::Router, AppState) {
        let state = AppState::with_planner(Planner::default());
        (create_router(state.clone()), state)
    }

    // Helper: Parse JSON response
    async fn json_response(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");
        serde_json::from_slice(&body).expect("Failed to parse JSON")
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn dharwad_farm() -> Value {
        json!({
            "latitude": "15.8221",
            "longitude": 75.0302,
            "land_area": "2.5",
            "investment_capacity": "medium",
            "sand": 40,
            "silt": 40,
            "clay": 20,
            "rainfall_mm": 800
        })
    }

    // =========================================================================
    // Section 1: Health Check
    // =========================================================================

    #[tokio::test]
    async fn test_health_check() {
        let (app, _) = create_test_app();

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = json_response(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["catalog_tiers"], 36);
        assert!(body["timestamp"].is_string());
    }

    // =========================================================================
    // Section 2: Single Plan
    // =========================================================================

    #[tokio::test]
    async fn test_create_plan() {
        let (app, _) = create_test_app();

        let response = app.oneshot(post_json("/api/plans", dharwad_farm())).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_response(response).await;
        assert_eq!(body["tier"]["farm_size"], "medium");
        assert_eq!(body["tier"]["soil"], "loamy");
        assert_eq!(body["tier"]["rainfall"], "moderate");
        assert_eq!(body["system"]["canopy_trees"][0]["name"], "Tamarind Trees");
        assert_eq!(body["system"]["canopy_trees"][0]["layer"], "canopy_tree");
        assert_eq!(body["economics"]["estimated_investment"], 75000.0);
        assert!(body["economics"]["payback_period"]["months"].is_u64());
        assert_eq!(body["budget_range"], "50,000-1,00,000");
    }

    #[tokio::test]
    async fn test_repeated_plan_is_cached() {
        let (app, state) = create_test_app();

        let first = app
            .clone()
            .oneshot(post_json("/api/plans", dharwad_farm()))
            .await
            .unwrap();
        let first = json_response(first).await;

        state.cache.run_pending_tasks().await;
        assert_eq!(state.cache.entry_count(), 1);

        let second = app.oneshot(post_json("/api/plans", dharwad_farm())).await.unwrap();
        assert_eq!(json_response(second).await, first);
    }

    #[tokio::test]
    async fn test_missing_longitude_is_unprocessable() {
        let (app, _) = create_test_app();

        let mut farm = dharwad_farm();
        farm.as_object_mut().unwrap().remove("longitude");

        let response = app.oneshot(post_json("/api/plans", farm)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = json_response(response).await;
        assert_eq!(body["field"], "longitude");
    }

    #[tokio::test]
    async fn test_unmapped_location_is_service_unavailable() {
        let (app, _) = create_test_app();

        let response = app
            .oneshot(post_json(
                "/api/plans",
                json!({"latitude": 51.5, "longitude": -0.12, "land_area_acres": 3}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = json_response(response).await;
        assert!(body["error"].as_str().unwrap().contains("data unavailable"));
    }

    #[tokio::test]
    async fn test_unmapped_location_with_texture_and_rainfall_is_planned() {
        let (app, _) = create_test_app();

        let mut farm = dharwad_farm();
        farm["latitude"] = json!(21.1458);
        farm["longitude"] = json!(79.0882);

        let response = app.oneshot(post_json("/api/plans", farm)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_response(response).await;
        assert_eq!(body["tier"]["soil"], "loamy");
        assert_eq!(body["farm_location"]["region"], "Unmapped location");
        let fields: Vec<&str> = body["degradations"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|d| d["field"].as_str())
            .collect();
        assert!(fields.contains(&"soil"));
        assert!(fields.contains(&"climate"));
    }

    // =========================================================================
    // Section 3: Batch
    // =========================================================================

    #[tokio::test]
    async fn test_batch_reports_each_farm() {
        let (app, _) = create_test_app();

        let response = app
            .oneshot(post_json(
                "/api/plans/batch",
                json!({
                    "farms": [
                        dharwad_farm(),
                        {"latitude": 26.25, "longitude": 73.0, "land_area_acres": 8},
                        {"latitude": 15.8, "land_area_acres": 1}
                    ]
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_response(response).await;
        assert_eq!(body["total_count"], 3);
        assert_eq!(body["planned_count"], 2);
        assert_eq!(body["results"][0]["plan"]["tier"]["farm_size"], "medium");
        assert_eq!(body["results"][1]["plan"]["tier"]["soil"], "sandy");
        assert_eq!(body["results"][2]["field"], "longitude");
    }

    #[tokio::test]
    async fn test_oversized_batch_rejected() {
        let (app, _) = create_test_app();

        let farms: Vec<Value> = (0..101).map(|_| dharwad_farm()).collect();
        let response = app
            .oneshot(post_json("/api/plans/batch", json!({ "farms": farms })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
