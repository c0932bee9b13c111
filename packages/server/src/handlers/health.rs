use actix_web::HttpResponse;
use prassign_server_models::HealthResponse;

pub async fn get() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse::ok())
}
