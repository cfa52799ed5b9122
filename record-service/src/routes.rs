use actix_web::{web, HttpResponse, Responder};
use common::models::Customer;
use serde_json::json;
use tracing::info;

use crate::{error::AppError, AppState};

#[actix_web::get("/users")]
async fn list_users(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let customers = app_state.records.list().await?;

    Ok(HttpResponse::Ok().json(customers))
}

#[actix_web::post("/users")]
async fn create_user(
    req: web::Json<Customer>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let customer = req.into_inner();
    info!("Adding customer {}", customer.phone);

    app_state.records.create(customer).await?;

    Ok(HttpResponse::Created().json(json!({ "message": "User added successfully" })))
}

#[actix_web::put("/users/{phone}")]
async fn update_user(
    path: web::Path<String>,
    req: web::Json<Customer>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let phone = path.into_inner();
    info!("Updating customer {}", phone);

    app_state.records.update(&phone, req.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "User updated successfully" })))
}

#[actix_web::delete("/users/{phone}")]
async fn delete_user(
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let phone = path.into_inner();
    info!("Deleting customer {}", phone);

    let removed = app_state.records.delete(&phone).await?;
    info!("Removed {} record(s) for {}", removed, phone);

    Ok(HttpResponse::Ok().json(json!({ "message": "User deleted successfully" })))
}

#[actix_web::get("/health")]
async fn health_check() -> impl Responder {
    HttpResponse::Ok().content_type("text/plain").body("OK")
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| AppError::from(err).into()))
        .service(health_check)
        .service(list_users)
        .service(create_user)
        .service(update_user)
        .service(delete_user);
}
