use actix_multipart::form::MultipartForm;
use actix_web::{
    HttpResponse, get, post,
    web::{Data, Path, ServiceConfig, scope},
};
use actix_web_validator::Query;

use super::models::{Application, ApplicationForm};
use super::service::{JobService, ServiceError};
use crate::query::{QueryParams, QueryState};

#[get("")]
async fn list_jobs(service: Data<JobService>, params: Query<QueryParams>) -> Result<HttpResponse, ServiceError> {
    let state = QueryState::from_params(&params)?;
    let response = service.list(state)?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/categories")]
async fn list_categories(service: Data<JobService>) -> HttpResponse {
    HttpResponse::Ok().json(service.categories())
}

#[get("/{id}")]
async fn get_job(service: Data<JobService>, path: Path<String>) -> Result<HttpResponse, ServiceError> {
    let response = service.detail(&path.into_inner())?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/{id}/apply")]
async fn apply_for_job(
    service: Data<JobService>,
    path: Path<String>,
    form: MultipartForm<ApplicationForm>,
) -> Result<HttpResponse, ServiceError> {
    let application = Application::from(form.into_inner());
    let response = service.apply(&path.into_inner(), application)?;
    Ok(HttpResponse::Ok().json(response))
}

pub fn job_config(config: &mut ServiceConfig) {
    // categories must be registered ahead of the {id} route
    config.service(
        scope("jobs")
            .service(list_jobs)
            .service(list_categories)
            .service(get_job)
            .service(apply_for_job),
    );
}
