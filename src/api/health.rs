use actix_web::{HttpResponse, Responder, get, web};
use serde::Serialize;
use tracing::error;

use crate::api::job::JobService;

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: String,
    catalog: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    jobs: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    saved: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Health check endpoint
///
/// Reports catalog size and the number of saved jobs.
#[get("/health")]
async fn health_check(service: web::Data<JobService>) -> impl Responder {
    match service.lock_saved() {
        Ok(saved) => HttpResponse::Ok().json(HealthResponse {
            status: "healthy".to_string(),
            catalog: "loaded".to_string(),
            jobs: Some(service.catalog().len()),
            saved: Some(saved.len()),
            error: None,
        }),
        Err(e) => {
            error!("Health check failed: {}", e);
            HttpResponse::ServiceUnavailable().json(HealthResponse {
                status: "unhealthy".to_string(),
                catalog: "loaded".to_string(),
                jobs: Some(service.catalog().len()),
                saved: None,
                error: Some(e.to_string()),
            })
        }
    }
}

/// Readiness check endpoint
///
/// Ready once the catalog holds at least one job and saved jobs are usable.
#[get("/ready")]
async fn readiness_check(service: web::Data<JobService>) -> impl Responder {
    if service.catalog().is_empty() {
        error!("Readiness check failed: catalog is empty");
        return HttpResponse::ServiceUnavailable().json(HealthResponse {
            status: "not_ready".to_string(),
            catalog: "empty".to_string(),
            jobs: Some(0),
            saved: None,
            error: Some("Catalog has no jobs".to_string()),
        });
    }

    match service.lock_saved() {
        Ok(_) => HttpResponse::Ok().json(HealthResponse {
            status: "ready".to_string(),
            catalog: "loaded".to_string(),
            jobs: None,
            saved: None,
            error: None,
        }),
        Err(e) => {
            error!("Readiness check failed: {}", e);
            HttpResponse::ServiceUnavailable().json(HealthResponse {
                status: "not_ready".to_string(),
                catalog: "loaded".to_string(),
                jobs: None,
                saved: None,
                error: Some(e.to_string()),
            })
        }
    }
}

/// Liveness check endpoint
///
/// Simple check that the process is alive. Does not check dependencies.
#[get("/live")]
async fn liveness_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "alive".to_string(),
        catalog: "not_checked".to_string(),
        jobs: None,
        saved: None,
        error: None,
    })
}

pub fn health_config(config: &mut web::ServiceConfig) {
    config
        .service(health_check)
        .service(readiness_check)
        .service(liveness_check);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::job::service::fixtures::{service, shared_saved};
    use crate::catalog::JobStore;
    use crate::query::PAGE_SIZE;
    use actix_web::{App, http::StatusCode, test};
    use serde_json::Value;
    use std::sync::Arc;

    #[actix_web::test]
    async fn test_health_reports_counts() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(service()))
                .configure(health_config),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["jobs"], 30);
        assert_eq!(body["saved"], 0);
    }

    #[actix_web::test]
    async fn test_ready_fails_on_empty_catalog() {
        let empty = JobService::new(Arc::new(JobStore::new(Vec::new()).unwrap()), shared_saved(), PAGE_SIZE);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(empty))
                .configure(health_config),
        )
        .await;

        let req = test::TestRequest::get().uri("/ready").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[actix_web::test]
    async fn test_live() {
        let app = test::init_service(App::new().configure(health_config)).await;
        let req = test::TestRequest::get().uri("/live").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
