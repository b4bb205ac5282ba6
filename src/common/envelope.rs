// src/common/envelope.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::common::error::AppError;

/// Envelope de sucesso: `{ "success": true, <chaves>, "errorMessage": null }`.
#[derive(Debug, Default)]
pub struct Envelope {
    status: Option<StatusCode>,
    payload: Map<String, Value>,
}

impl Envelope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn created() -> Self {
        Self {
            status: Some(StatusCode::CREATED),
            payload: Map::new(),
        }
    }

    pub fn with<T: Serialize>(mut self, key: &str, value: T) -> Result<Self, AppError> {
        let value = serde_json::to_value(value)
            .map_err(|e| AppError::InternalServerError(anyhow::anyhow!(e)))?;
        self.payload.insert(key.to_string(), value);
        Ok(self)
    }

    pub fn into_value(self) -> Value {
        let mut body = Map::new();
        body.insert("success".into(), Value::Bool(true));
        for (key, value) in self.payload {
            body.insert(key, value);
        }
        body.insert("errorMessage".into(), Value::Null);
        Value::Object(body)
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        let status = self.status.unwrap_or(StatusCode::OK);
        (status, Json(self.into_value())).into_response()
    }
}
