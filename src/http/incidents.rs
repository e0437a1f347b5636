use actix_web::{delete, get, post, put, web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::cache::ActiveIncidentCache;
use crate::error::AppError;
use crate::models::incident::{CreateIncidentRequest, UpdateIncidentRequest};
use crate::service::IncidentService;

use super::auth::RequireApiKey;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub minutes: Option<i64>,
}

#[post("/incidents")]
pub async fn create(
    _auth: RequireApiKey,
    service: web::Data<IncidentService>,
    req: web::Json<CreateIncidentRequest>,
) -> Result<HttpResponse, AppError> {
    let incident = service.create_incident(&req).await?;
    Ok(HttpResponse::Created().json(incident))
}

#[get("/incidents")]
pub async fn list(
    _auth: RequireApiKey,
    service: web::Data<IncidentService>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    let (incidents, page, page_size) = service
        .list_incidents(query.page.unwrap_or(1), query.page_size.unwrap_or(20))
        .await?;
    Ok(HttpResponse::Ok().json(json!({
        "data": incidents,
        "page": page,
        "page_size": page_size,
    })))
}

/// Bulk read of the active set, served through the read-through cache.
#[get("/incidents/active")]
pub async fn active(
    _auth: RequireApiKey,
    cache: web::Data<ActiveIncidentCache>,
) -> Result<HttpResponse, AppError> {
    let incidents = cache.get_active().await?;
    Ok(HttpResponse::Ok().json(json!({ "data": incidents })))
}

#[get("/incidents/stats")]
pub async fn stats(
    _auth: RequireApiKey,
    service: web::Data<IncidentService>,
    query: web::Query<StatsQuery>,
) -> Result<HttpResponse, AppError> {
    let stats = service.get_stats(query.minutes).await?;
    Ok(HttpResponse::Ok().json(json!({ "data": stats })))
}

#[get("/incidents/{id}")]
pub async fn get_by_id(
    _auth: RequireApiKey,
    service: web::Data<IncidentService>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let incident = service.get_incident(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(incident))
}

#[put("/incidents/{id}")]
pub async fn update(
    _auth: RequireApiKey,
    service: web::Data<IncidentService>,
    id: web::Path<Uuid>,
    req: web::Json<UpdateIncidentRequest>,
) -> Result<HttpResponse, AppError> {
    let incident = service.update_incident(id.into_inner(), &req).await?;
    Ok(HttpResponse::Ok().json(incident))
}

#[delete("/incidents/{id}")]
pub async fn remove(
    _auth: RequireApiKey,
    service: web::Data<IncidentService>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    service.delete_incident(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "incident deleted" })))
}
