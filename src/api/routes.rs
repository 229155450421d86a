// ============================================================
// Layer 1b — Routes and Error Mapping
// ============================================================
// Status codes:
//
//   200  prediction served
//   422  body is not a valid FeatureRecord
//   500  the record could not be processed by the pipeline
//   503  no model loaded
//
// Every error body is `{"detail": "..."}`.

use std::convert::Infallible;
use std::sync::Arc;

use serde::Serialize;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

use crate::application::predict_use_case::PredictionService;
use crate::domain::errors::PredictError;
use crate::domain::feature_record::FeatureRecord;

const MAX_BODY_BYTES: u64 = 16 * 1024;

#[derive(Debug, Serialize)]
struct PredictResponse {
    prediction: String,
    details:    String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

pub fn routes(
    service: Arc<PredictionService>,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let predict = warp::path("predict")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .and(with_service(service.clone()))
        .and_then(handle_predict);

    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_service(service))
        .and_then(handle_health);

    predict
        .or(health)
        .recover(handle_rejection)
        .with(warp::trace::request())
}

fn with_service(
    service: Arc<PredictionService>,
) -> impl Filter<Extract = (Arc<PredictionService>,), Error = Infallible> + Clone {
    warp::any().map(move || service.clone())
}

async fn handle_predict(
    record: FeatureRecord,
    service: Arc<PredictionService>,
) -> Result<warp::reply::Response, Infallible> {
    match service.predict(&record) {
        Ok(p) => {
            tracing::debug!("Predicted {} ({:?})", p.species, p.probabilities);
            let body = PredictResponse {
                details:    format!("predicted index: {}", p.class_index),
                prediction: p.species,
            };
            Ok(warp::reply::with_status(warp::reply::json(&body), StatusCode::OK).into_response())
        }
        Err(e) => Ok(predict_error_response(e)),
    }
}

async fn handle_health(service: Arc<PredictionService>) -> Result<warp::reply::Response, Infallible> {
    let health = service.health();
    Ok(warp::reply::with_status(warp::reply::json(&health), StatusCode::OK).into_response())
}

fn predict_error_response(err: PredictError) -> warp::reply::Response {
    match &err {
        PredictError::ServiceUnavailable(_) => {
            tracing::warn!("Prediction refused: {}", err);
            error_response(StatusCode::SERVICE_UNAVAILABLE, &err.to_string())
        }
        PredictError::Processing(_) => {
            tracing::error!("Prediction failed: {}", err);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> warp::reply::Response {
    let body = ErrorBody { detail: message.to_string() };
    warp::reply::with_status(warp::reply::json(&body), status).into_response()
}

pub async fn handle_rejection(err: Rejection) -> Result<warp::reply::Response, Infallible> {
    if err.is_not_found() {
        Ok(error_response(StatusCode::NOT_FOUND, "not found"))
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        Ok(error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            &format!("invalid request body: {}", e),
        ))
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        Ok(error_response(StatusCode::PAYLOAD_TOO_LARGE, "request payload too large"))
    } else if err.find::<warp::reject::LengthRequired>().is_some() {
        Ok(error_response(StatusCode::LENGTH_REQUIRED, "content length required"))
    } else if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        Ok(error_response(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "expected an application/json body",
        ))
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        Ok(error_response(StatusCode::METHOD_NOT_ALLOWED, "method not allowed"))
    } else {
        tracing::error!("Unhandled rejection: {:?}", err);
        Ok(error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal server error"))
    }
}
