use std::str::FromStr;

use actix_web::{
    get,
    http::header::{ContentDisposition, ContentType},
    post, web, HttpRequest, HttpResponse,
};
use domain_request::{
    command::ReviewCommand,
    model::vo::{AdminSession, DocumentKind, ReferenceNo, ReviewDecision},
    service::{AccessGateService, ExportService, ReviewService},
};

use super::{
    dtos::{LoginRequest, LoginResponse, ReviewRequest},
    extract_session_id, ApiError, ApiResult,
};
use crate::infrastructure::ServiceProvider;

async fn session(sp: &ServiceProvider, req: &HttpRequest) -> ApiResult<AdminSession> {
    let session_id = extract_session_id(req)?;
    Ok(sp.access_gate_service.authorize(session_id).await?)
}

#[post("/admin/login")]
pub async fn login(
    sp: web::Data<ServiceProvider>,
    data: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let session = sp.access_gate_service.login(&data.password).await?;
    Ok(HttpResponse::Ok().json(LoginResponse::from(session)))
}

#[post("/admin/logout")]
pub async fn logout(
    sp: web::Data<ServiceProvider>,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    let session_id = extract_session_id(&req)?;
    sp.access_gate_service.logout(session_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[get("/admin/requests/pending")]
pub async fn list_pending(
    sp: web::Data<ServiceProvider>,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    let session = session(&sp, &req).await?;
    Ok(HttpResponse::Ok().json(sp.review_service.list_pending(&session).await?))
}

#[get("/admin/requests")]
pub async fn list_all(
    sp: web::Data<ServiceProvider>,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    let session = session(&sp, &req).await?;
    Ok(HttpResponse::Ok().json(sp.review_service.list_all(&session).await?))
}

async fn decide(
    sp: &ServiceProvider,
    req: &HttpRequest,
    reference_no: &str,
    decision: ReviewDecision,
    remarks: String,
) -> ApiResult<HttpResponse> {
    let session = session(sp, req).await?;
    let reference_no = ReferenceNo::from_str(reference_no)
        .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
    let record = sp
        .review_service
        .decide(
            &session,
            ReviewCommand {
                reference_no,
                decision,
                remarks,
            },
        )
        .await?;
    Ok(HttpResponse::Ok().json(record))
}

#[post("/admin/requests/{reference_no}/approve")]
pub async fn approve(
    sp: web::Data<ServiceProvider>,
    req: HttpRequest,
    reference_no: web::Path<String>,
    data: Option<web::Json<ReviewRequest>>,
) -> ApiResult<HttpResponse> {
    let remarks = data.map(|el| el.0.remarks).unwrap_or_default();
    decide(&sp, &req, &reference_no, ReviewDecision::Approve, remarks).await
}

#[post("/admin/requests/{reference_no}/return")]
pub async fn return_request(
    sp: web::Data<ServiceProvider>,
    req: HttpRequest,
    reference_no: web::Path<String>,
    data: Option<web::Json<ReviewRequest>>,
) -> ApiResult<HttpResponse> {
    let remarks = data.map(|el| el.0.remarks).unwrap_or_default();
    decide(&sp, &req, &reference_no, ReviewDecision::Return, remarks).await
}

#[get("/admin/export.csv")]
pub async fn export_csv(
    sp: web::Data<ServiceProvider>,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    let session = session(&sp, &req).await?;
    let content = sp.export_service.export_csv(&session).await?;
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(ContentDisposition::attachment("merf_requests.csv"))
        .body(content))
}

#[get("/admin/documents/{kind}/{stored_name}")]
pub async fn download_document(
    sp: web::Data<ServiceProvider>,
    req: HttpRequest,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let session = session(&sp, &req).await?;
    let (kind, stored_name) = path.into_inner();
    let kind =
        DocumentKind::from_str(&kind).map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
    let content = sp.review_service.document(&session, kind, &stored_name).await?;
    let content_type = if stored_name.to_lowercase().ends_with(".pdf") {
        "application/pdf".to_string()
    } else {
        ContentType::octet_stream().to_string()
    };
    Ok(HttpResponse::Ok()
        .content_type(content_type)
        .insert_header(ContentDisposition::attachment(stored_name))
        .body(content))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test, App};
    use chrono::NaiveDate;
    use domain_request::{
        command::SubmitRequestCommand,
        model::{
            entity::RequestRecord,
            vo::{DocumentUpload, RequestStatus},
        },
        service::SubmissionService,
    };
    use serde_json::{json, Value};

    use super::*;
    use crate::infrastructure::config::MerfConfig;

    async fn provider(base: &std::path::Path) -> ServiceProvider {
        let mut config = MerfConfig::default();
        config.storage.record_file = base.join("records.jsonl").display().to_string();
        config.storage.memorandum_dir = base.join("memorandum").display().to_string();
        config.storage.activity_matrix_dir = base.join("matrix").display().to_string();
        config.admin.password = "s3cret".to_string();
        ServiceProvider::build(config).await.unwrap()
    }

    async fn submit(sp: &ServiceProvider) -> RequestRecord {
        sp.submission_service
            .submit(SubmitRequestCommand {
                program_owner: "Jane".to_string(),
                training_title: "Leadership 101".to_string(),
                venue: "Hall A".to_string(),
                date_start: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
                date_end: NaiveDate::from_ymd_opt(2024, 1, 12).unwrap(),
                memorandum: Some(DocumentUpload::new("memo.pdf", b"%PDF-memo".to_vec())),
                activity_matrix: Some(DocumentUpload::new("matrix.pdf", b"%PDF-mx".to_vec())),
            })
            .await
            .unwrap()
            .record
    }

    #[actix_web::test]
    async fn login_review_and_download() {
        let dir = tempfile::tempdir().unwrap();
        let sp = provider(dir.path()).await;
        let record = submit(&sp).await;
        let reference_no = record.reference_no.clone().unwrap().to_string();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(sp))
                .service(login)
                .service(list_pending)
                .service(list_all)
                .service(approve)
                .service(download_document)
                .service(export_csv),
        )
        .await;

        let denied = test::TestRequest::post()
            .uri("/admin/login")
            .set_json(json!({ "password": "guess" }))
            .send_request(&app)
            .await;
        assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);

        let res: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::post()
                .uri("/admin/login")
                .set_json(json!({ "password": "s3cret" }))
                .to_request(),
        )
        .await;
        let bearer = format!("Bearer {}", res["sessionId"].as_str().unwrap());

        let anonymous = test::TestRequest::get()
            .uri("/admin/requests/pending")
            .send_request(&app)
            .await;
        assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

        let pending: Vec<RequestRecord> = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri("/admin/requests/pending")
                .insert_header(("Authorization", bearer.as_str()))
                .to_request(),
        )
        .await;
        assert_eq!(pending, vec![record.clone()]);

        let memo = test::TestRequest::get()
            .uri(&format!("/admin/documents/memorandum/{}", record.memorandum_file))
            .insert_header(("Authorization", bearer.as_str()))
            .send_request(&app)
            .await;
        assert_eq!(memo.status(), StatusCode::OK);
        assert_eq!(test::read_body(memo).await.as_ref(), b"%PDF-memo");

        let approved: RequestRecord = test::call_and_read_body_json(
            &app,
            test::TestRequest::post()
                .uri(&format!("/admin/requests/{reference_no}/approve"))
                .insert_header(("Authorization", bearer.as_str()))
                .set_json(json!({ "remarks": "ok" }))
                .to_request(),
        )
        .await;
        assert_eq!(approved.status, RequestStatus::Approved);
        assert_eq!(approved.admin_remarks, "ok");

        let again = test::TestRequest::post()
            .uri(&format!("/admin/requests/{reference_no}/approve"))
            .insert_header(("Authorization", bearer.as_str()))
            .send_request(&app)
            .await;
        assert_eq!(again.status(), StatusCode::CONFLICT);

        let csv = test::TestRequest::get()
            .uri("/admin/export.csv")
            .insert_header(("Authorization", bearer.as_str()))
            .send_request(&app)
            .await;
        assert_eq!(csv.status(), StatusCode::OK);
        let csv = String::from_utf8(test::read_body(csv).await.to_vec()).unwrap();
        assert_eq!(csv.lines().count(), 2);
    }
}
