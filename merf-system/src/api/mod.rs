use std::{fmt, str::FromStr};

use actix_web::{http::StatusCode, HttpRequest, HttpResponse, ResponseError};
use domain_request::exception::RequestException;
use serde::Serialize;
use tracing::error;
use uuid::Uuid;

pub mod admin;
pub mod dtos;
pub mod request_form;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug)]
pub enum ApiError {
    Request(RequestException),
    InvalidRequest(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request(e) => write!(f, "{e}"),
            Self::InvalidRequest(description) => write!(f, "{description}"),
        }
    }
}

impl From<RequestException> for ApiError {
    fn from(e: RequestException) -> Self {
        Self::Request(e)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::Request(e.into())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        let e = match self {
            Self::InvalidRequest(_) => return StatusCode::BAD_REQUEST,
            Self::Request(e) => e,
        };
        match e {
            e if e.is_validation() => StatusCode::BAD_REQUEST,
            RequestException::AuthFailed | RequestException::SessionExpired => {
                StatusCode::UNAUTHORIZED
            }
            RequestException::NoSuchRecord { .. } | RequestException::NoSuchDocument { .. } => {
                StatusCode::NOT_FOUND
            }
            RequestException::NotPending { .. } | RequestException::FeatureDisabled { .. } => {
                StatusCode::CONFLICT
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {self:?}");
        }
        HttpResponse::build(status).json(ErrorBody {
            error: self.to_string(),
        })
    }
}

/// Session id from an `Authorization: Bearer <id>` header.
fn extract_session_id(req: &HttpRequest) -> ApiResult<Uuid> {
    let token = req
        .headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|el| el.to_str().ok())
        .and_then(|el| el.strip_prefix("Bearer "))
        .ok_or(ApiError::Request(RequestException::SessionExpired))?;
    Uuid::from_str(token.trim()).map_err(|e| {
        ApiError::InvalidRequest(format!(r#"error when parse session id from "{token}": {e}"#))
    })
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;
    use domain_request::model::vo::{DocumentKind, ReferenceNo, RequestStatus};

    use super::*;

    #[test]
    fn exceptions_map_to_status_codes() {
        let cases = [
            (
                RequestException::EmptyDocument {
                    kind: DocumentKind::Memorandum,
                },
                StatusCode::BAD_REQUEST,
            ),
            (RequestException::AuthFailed, StatusCode::UNAUTHORIZED),
            (
                RequestException::NoSuchRecord {
                    reference_no: ReferenceNo::generate(2024, 0),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                RequestException::NotPending {
                    reference_no: ReferenceNo::generate(2024, 0),
                    status: RequestStatus::Approved,
                },
                StatusCode::CONFLICT,
            ),
            (
                RequestException::Storage {
                    source: anyhow::anyhow!("disk full"),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (e, status) in cases {
            assert_eq!(ApiError::from(e).status_code(), status);
        }
    }

    #[test]
    fn bearer_header_carries_the_session_id() {
        let id = Uuid::new_v4();
        let req = TestRequest::default()
            .insert_header(("Authorization", format!("Bearer {id}")))
            .to_http_request();
        assert_eq!(extract_session_id(&req).unwrap(), id);

        let req = TestRequest::default().to_http_request();
        assert!(matches!(
            extract_session_id(&req),
            Err(ApiError::Request(RequestException::SessionExpired))
        ));

        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer nope"))
            .to_http_request();
        assert!(matches!(extract_session_id(&req), Err(ApiError::InvalidRequest(_))));
    }
}
