use actix_web::{
    HttpResponse, get, post,
    web::{Data, ServiceConfig, scope},
};
use actix_web_validator::Json;

use crate::api::job::{models::ToggleSaved, service::ServiceError, JobService};

#[get("")]
async fn list_saved(service: Data<JobService>) -> Result<HttpResponse, ServiceError> {
    let response = service.saved_jobs()?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("")]
async fn toggle_saved(service: Data<JobService>, body: Json<ToggleSaved>) -> Result<HttpResponse, ServiceError> {
    let response = service.toggle_saved(&body.id)?;
    Ok(HttpResponse::Ok().json(response))
}

pub fn saved_config(config: &mut ServiceConfig) {
    config.service(scope("saved").service(list_saved).service(toggle_saved));
}
