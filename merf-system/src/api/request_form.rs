use actix_easy_multipart::MultipartForm;
use actix_web::{post, web, HttpResponse};
use domain_request::service::SubmissionService;

use super::{
    dtos::{SubmitRequestForm, SubmitResponse},
    ApiResult,
};
use crate::infrastructure::ServiceProvider;

#[post("/requests")]
pub async fn submit(
    sp: web::Data<ServiceProvider>,
    form: MultipartForm<SubmitRequestForm>,
) -> ApiResult<HttpResponse> {
    let cmd = form.0.into_command().await?;
    let outcome = sp.submission_service.submit(cmd).await?;
    Ok(HttpResponse::Created().json(SubmitResponse::from(outcome)))
}
