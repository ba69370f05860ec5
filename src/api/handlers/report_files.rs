//! Report files rendered by the reporter service and fetched from its bucket.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::api::errors::ApiError;
use crate::api::extract::{validate_request, Bound, CurrentUser};
use crate::api::router::{AppState, RouteGroups};
use crate::application::dto::reports::{parse_report_file_name, ReportFile, ReportFileRequest};
use crate::application::methods::ReporterMethod;
use crate::domain::constants::report_file_key;
use crate::domain::{errors, Envelope};

pub fn register(groups: &mut RouteGroups) {
    groups
        .auth_user
        .post("/report_file", create_report_file_handler)
        .get("/report_file/download/{file}", download_report_file_handler);
}

/// POST /report_file with `{"file_type": "pdf", "report_type": "vat", "params": {...}}`
///
/// The reporter renders asynchronously and notifies the user when done.
pub async fn create_report_file_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Bound(request): Bound<ReportFileRequest>,
) -> Result<Json<Envelope>, ApiError> {
    validate_request(&request)?;
    let report = ReportFile::new(user.id, request);

    let envelope = state
        .gateway
        .reporter(ReporterMethod::CreateFile, &report)
        .await
        .map_err(|e| ApiError::from_gateway(e, &errors::CREATE_REPORT_FILE))?;

    tracing::info!(
        user_id = %report.user_id,
        report_type = %report.report_type,
        file_type = %report.file_type,
        "report file requested"
    );
    Ok(Json(envelope))
}

fn content_type(extension: &str) -> &'static str {
    match extension {
        "csv" => "text/csv",
        "pdf" => "application/pdf",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        _ => "application/octet-stream",
    }
}

/// GET /report_file/download/{file_id}.{extension}
///
/// Only files generated for the caller are reachable. The local copy is
/// removed once read.
pub async fn download_report_file_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(file): Path<String>,
) -> Result<Response, ApiError> {
    let Some((file_id, extension)) = parse_report_file_name(&file) else {
        tracing::error!(file = %file, "report file name must be <id>.<extension>");
        return Err(ApiError::bad_request(&errors::REQUEST_PARAMS_INCORRECT));
    };

    let key = report_file_key(&user.id, file_id, extension);
    let path = std::env::temp_dir().join(&key);

    state
        .report_storage
        .download(&key, &path)
        .await
        .map_err(|e| {
            tracing::error!(file_name = %key, error = %e, "report file download failed");
            ApiError::internal_error(&errors::DOWNLOAD_REPORT_FILE)
        })?;

    let content = tokio::fs::read(&path).await;
    if let Err(e) = tokio::fs::remove_file(&path).await {
        tracing::warn!(path = %path.display(), error = %e, "failed to remove report temp file");
    }
    let content = content.map_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "failed to read report file");
        ApiError::internal_error(&errors::DOWNLOAD_REPORT_FILE)
    })?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, content_type(extension))],
        content,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::*;
    use crate::application::ports::StorageError;
    use axum::http::Method;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_report_file_sends_user_and_params() {
        let mut app = TestApp::new();
        app.reporter
            .expect_call()
            .withf(|method, req, _| {
                method == "CreateFile"
                    && req["user_id"] == USER_ID
                    && req["file_type"] == "csv"
                    && req["send_notification"] == true
            })
            .times(1)
            .returning(|_, _, _| Ok(Envelope::default().with_field("file_id", json!(OBJECT_ID))));

        let (status, body) = send(
            app.router(),
            json_request(
                Method::POST,
                "/admin/api/v1/report_file",
                json!({"file_type": "csv", "report_type": "royalty", "params": {"id": OBJECT_ID}}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["file_id"], OBJECT_ID);
    }

    #[tokio::test]
    async fn test_create_report_file_transport_error() {
        let mut app = TestApp::new();
        expect_transport_error(&mut app.reporter, "CreateFile");

        let (status, body) = send(
            app.router(),
            json_request(
                Method::POST,
                "/admin/api/v1/report_file",
                json!({"file_type": "pdf", "report_type": "vat"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "ma000101");
    }

    #[tokio::test]
    async fn test_download_rejects_malformed_name() {
        let mut app = TestApp::new();
        app.report_storage.expect_download().never();

        let (status, body) = send(
            app.router(),
            request(Method::GET, "/admin/api/v1/report_file/download/report"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "ma000023");
    }

    #[tokio::test]
    async fn test_download_reads_and_removes_file() {
        let file_id = uuid::Uuid::new_v4().simple().to_string();
        let expected_key = format!("report_{USER_ID}_{file_id}.csv");
        let mut app = TestApp::new();
        let key = expected_key.clone();
        app.report_storage
            .expect_download()
            .withf(move |name, _| name == key)
            .times(1)
            .returning(|_, destination| {
                std::fs::write(destination, b"id;amount\n1;10\n")?;
                Ok(16)
            });

        let uri = format!("/admin/api/v1/report_file/download/{file_id}.csv");
        let response = send_raw(app.router(), request(Method::GET, &uri)).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"id;amount\n1;10\n");
        assert!(!std::env::temp_dir().join(expected_key).exists());
    }

    #[tokio::test]
    async fn test_download_failure() {
        let mut app = TestApp::new();
        app.report_storage
            .expect_download()
            .returning(|key, _| Err(StorageError::NotFound(key.to_string())));

        let (status, body) = send(
            app.router(),
            request(Method::GET, "/admin/api/v1/report_file/download/missing.pdf"),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "ma000102");
    }
}
