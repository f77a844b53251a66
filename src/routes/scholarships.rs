use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::core::{Category, ParamField};
use crate::error::SuperCollegeError;
use crate::models::{CategorySearchRequest, DetailResponse, ErrorResponse, HealthResponse, ParamsSearchRequest, ScholarshipsResponse};
use crate::services::SuperCollege;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub supercollege: Arc<SuperCollege>,
}

/// Configure all scholarship routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/scholarships/search", web::post().to(search))
        .route("/scholarships/by/{category}", web::post().to(search_by_category))
        .route("/scholarships/{uuid}", web::get().to(details));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Search with field overrides
///
/// POST /api/v1/scholarships/search
///
/// Request body:
/// ```json
/// { "params": { "major": "101", "gpa": "3.5" } }
/// ```
async fn search(
    state: web::Data<AppState>,
    req: web::Json<ParamsSearchRequest>,
) -> impl Responder {
    let mut overrides = Vec::with_capacity(req.params.len());
    for (name, value) in &req.params {
        match name.parse::<ParamField>() {
            Ok(field) if field.is_authentication() => {
                return bad_request("Invalid parameter", format!("{} is set from configuration", field));
            }
            Ok(field) => overrides.push((field, value.clone())),
            Err(e) => return bad_request("Invalid parameter", e.to_string()),
        }
    }

    tracing::info!("Searching scholarships with {} overrides", overrides.len());

    match state.supercollege.fetch_by_params(overrides).await {
        Ok(scholarships) => HttpResponse::Ok().json(ScholarshipsResponse::from(scholarships)),
        Err(e) => remote_error("Failed to search scholarships", e),
    }
}

/// Search on one category
///
/// POST /api/v1/scholarships/by/{category}
///
/// Request body:
/// ```json
/// { "ids": ["11", "12"] }
/// ```
async fn search_by_category(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<CategorySearchRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return bad_request("Validation failed", errors.to_string());
    }

    let category = match path.parse::<Category>() {
        Ok(category) => category,
        Err(e) => return bad_request("Invalid category", e.to_string()),
    };

    tracing::info!("Searching scholarships by {}: {:?}", category, req.ids);

    match state.supercollege.fetch_by_category(category, req.ids.as_slice()).await {
        Ok(scholarships) => HttpResponse::Ok().json(ScholarshipsResponse::from(scholarships)),
        Err(e) => remote_error("Failed to search scholarships", e),
    }
}

/// Scholarship details
///
/// GET /api/v1/scholarships/{uuid}
async fn details(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let uuid = path.into_inner();

    match state.supercollege.fetch_details(&uuid).await {
        Ok(details) => HttpResponse::Ok().json(DetailResponse { s_uuid: uuid, details }),
        Err(e) => remote_error("Failed to fetch scholarship details", e),
    }
}

fn bad_request(error: &str, message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: 400,
    })
}

fn remote_error(error: &str, e: SuperCollegeError) -> HttpResponse {
    tracing::error!("{}: {}", error, e);
    HttpResponse::BadGateway().json(ErrorResponse {
        error: error.to_string(),
        message: e.to_string(),
        status_code: 502,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SuperCollegeSettings;
    use crate::core::Argument;
    use crate::services::{Operation, RpcTransport, TransportError};
    use actix_web::{test, App};
    use async_trait::async_trait;
    use serde_json::{json, Value};

    struct StubTransport;

    #[async_trait]
    impl RpcTransport for StubTransport {
        async fn invoke(&self, operation: Operation, args: &[Argument]) -> Result<Value, TransportError> {
            match operation {
                Operation::FindMatches => {
                    let major = args.iter().find(|a| a.name == "major").map(|a| a.value.clone());
                    Ok(json!({"scholarships": {"award": [{"major": major}]}}))
                }
                Operation::GetDetails => Err(TransportError::Fault {
                    code: "Server".into(),
                    message: "Unknown award".into(),
                }),
            }
        }
    }

    fn state() -> AppState {
        let credentials = SuperCollegeSettings {
            wsdl: Some("https://x/ws?wsdl".into()),
            api_key: Some("k".into()),
            site_url: Some("https://site".into()),
            site_id: Some("42".into()),
            api_return_format: Some("json".into()),
            ..SuperCollegeSettings::default()
        }
        .validate()
        .unwrap();

        AppState {
            supercollege: Arc::new(SuperCollege::with_transport(&credentials, StubTransport)),
        }
    }

    #[actix_web::test]
    async fn test_search_by_category() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/scholarships/by/major")
            .set_json(json!({"ids": ["11", "12"]}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["total_results"], 1);
        assert_eq!(body["scholarships"][0]["major"], "11,12");
    }

    #[actix_web::test]
    async fn test_search_rejects_auth_override() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/scholarships/search")
            .set_json(json!({"params": {"apikey": ""}}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 400);
    }

    #[actix_web::test]
    async fn test_details_maps_remote_failure() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/scholarships/abc").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 502);
    }
}
