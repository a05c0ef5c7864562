use std::sync::Arc;

use axum::{
    http::{Method, Uri},
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use crate::web::{log::RequestRecord, routes::SubscribeOutcome, Error, REQUEST_ID_HEADER};

/// Turns an `Error` stashed in the response extensions into the JSON error body the client expects,
/// and logs a line for every request.
pub async fn response_mapper(req_method: Method, uri: Uri, resp: Response) -> Response {
    let req_id = resp
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|id| id.to_str().ok())
        .and_then(|id| Uuid::parse_str(id).ok())
        .unwrap_or_else(Uuid::new_v4);

    let web_error = resp.extensions().get::<Arc<Error>>().map(Arc::as_ref);
    let client_status_and_error = web_error.map(Error::status_code_and_client_error);

    if let (Some(er), Some((status, _))) = (web_error, &client_status_and_error) {
        if status.is_server_error() {
            tracing::error!("SERVER ERROR: {er} ID: {req_id}");
        } else {
            tracing::debug!("CLIENT ERROR: {er} ID: {req_id}");
        }
    }

    let err_resp = client_status_and_error.as_ref().map(|(status, cl_err)| {
        let mut err_resp = (*status, Json(cl_err.body())).into_response();
        // Keep the propagated request id on the rebuilt response.
        if let Some(id) = resp.headers().get(REQUEST_ID_HEADER) {
            err_resp.headers_mut().insert(REQUEST_ID_HEADER, id.clone());
        }
        err_resp
    });

    RequestRecord {
        req_id,
        req_method: &req_method,
        uri: &uri,
        status: client_status_and_error
            .as_ref()
            .map_or(resp.status(), |(status, _)| *status),
        web_error,
        client_error: client_status_and_error.as_ref().map(|(_, cl_err)| cl_err),
        subscribe_outcome: resp.extensions().get::<SubscribeOutcome>().copied(),
    }
    .emit();

    err_resp.unwrap_or(resp)
}
