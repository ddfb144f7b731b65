pub mod models;

use crate::health::{self, HealthState};
use actix_web::{http::StatusCode, web, HttpResponse};
use self::models::{
    ApiResponse, BalanceResponse, CreateUserRequest, IncreaseBalanceRequest, ListMessagesQuery,
    SmsRequest, SmsResponse, UserResponse,
};
use sms_gateway_logic::{error::ServiceError, services::SmsGateway, types::NewMessage};
use std::sync::Arc;

pub fn configure(
    config: &mut web::ServiceConfig,
    gateway: Arc<SmsGateway>,
    health_state: Arc<HealthState>,
) {
    config
        .app_data(web::Data::from(gateway))
        .app_data(web::Data::from(health_state))
        .route("/healthz", web::get().to(health::healthz))
        .service(
            web::scope("/api/v1")
                .route("/users", web::post().to(create_user))
                .route("/users/{id}", web::get().to(get_user))
                .route("/users/{id}/balance", web::post().to(increase_balance))
                .route("/users/{id}/messages", web::get().to(get_user_messages))
                .route("/users/{id}/messages", web::post().to(send_single))
                .route("/users/{id}/messages/bulk", web::post().to(send_bulk)),
        );
}

fn error_response(err: ServiceError) -> HttpResponse {
    let status = match &err {
        ServiceError::EmptyName
        | ServiceError::EmptyContent
        | ServiceError::EmptyReceiver
        | ServiceError::InvalidBalance => StatusCode::BAD_REQUEST,
        ServiceError::UserNotFound | ServiceError::MessageNotFound => StatusCode::NOT_FOUND,
        ServiceError::InsufficientBalance => StatusCode::PAYMENT_REQUIRED,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    HttpResponse::build(status).json(ApiResponse::<()>::message(err.to_string()))
}

async fn create_user(
    gateway: web::Data<SmsGateway>,
    request: web::Json<CreateUserRequest>,
) -> HttpResponse {
    match gateway.create_user(&request.name).await {
        Ok(user) => HttpResponse::Ok().json(ApiResponse::data(UserResponse::from(user))),
        Err(err) => error_response(err),
    }
}

async fn get_user(gateway: web::Data<SmsGateway>, user_id: web::Path<i64>) -> HttpResponse {
    match gateway.get_user(*user_id).await {
        Ok(user) => HttpResponse::Ok().json(ApiResponse::data(UserResponse::from(user))),
        Err(err) => error_response(err),
    }
}

async fn get_user_messages(
    gateway: web::Data<SmsGateway>,
    user_id: web::Path<i64>,
    query: web::Query<ListMessagesQuery>,
) -> HttpResponse {
    match gateway
        .get_user_messages(*user_id, query.skip, query.limit, query.desc)
        .await
    {
        Ok(messages) => {
            let messages = messages
                .into_iter()
                .map(SmsResponse::from)
                .collect::<Vec<_>>();
            HttpResponse::Ok().json(ApiResponse::data(messages))
        }
        Err(err) => error_response(err),
    }
}

async fn increase_balance(
    gateway: web::Data<SmsGateway>,
    user_id: web::Path<i64>,
    request: web::Json<IncreaseBalanceRequest>,
) -> HttpResponse {
    match gateway.increase_user_balance(*user_id, request.balance).await {
        Ok(balance) => HttpResponse::Ok().json(ApiResponse::data(BalanceResponse { balance })),
        Err(err) => error_response(err),
    }
}

async fn send_single(
    gateway: web::Data<SmsGateway>,
    user_id: web::Path<i64>,
    request: web::Json<SmsRequest>,
) -> HttpResponse {
    match gateway
        .send_single(*user_id, request.into_inner().into())
        .await
    {
        Ok(()) => {
            HttpResponse::Ok().json(ApiResponse::<()>::message("message scheduled successfully"))
        }
        Err(err) => error_response(err),
    }
}

async fn send_bulk(
    gateway: web::Data<SmsGateway>,
    user_id: web::Path<i64>,
    request: web::Json<Vec<SmsRequest>>,
) -> HttpResponse {
    let messages = request
        .into_inner()
        .into_iter()
        .map(NewMessage::from)
        .collect::<Vec<_>>();
    match gateway.send_bulk(*user_id, messages).await {
        Ok(()) => {
            HttpResponse::Ok().json(ApiResponse::<()>::message("messages scheduled successfully"))
        }
        Err(err) => error_response(err),
    }
}
