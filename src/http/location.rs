use actix_web::{get, post, web, HttpResponse};
use serde_json::json;

use crate::error::AppError;
use crate::models::location_check::LocationCheckRequest;
use crate::service::LocationService;

#[post("/location/check")]
pub async fn check(
    service: web::Data<LocationService>,
    req: web::Json<LocationCheckRequest>,
) -> Result<HttpResponse, AppError> {
    let response = service.check_location(&req).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/system/health")]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}
