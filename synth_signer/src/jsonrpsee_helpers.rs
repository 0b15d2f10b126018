// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use serde_json::value::Value;

use crate::error_codes::{JsonRpcErrorCode, JsonRpcWarningCode};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct JsonRpcWarning {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Envelope of every successful response: `{ "data": ..., "warnings": [...] }`.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct JsonRpcResponse<T: Serialize> {
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warnings: Option<Vec<JsonRpcWarning>>,
}

pub type JsonRpcError = jsonrpsee::types::ErrorObjectOwned;
pub type JsonRpcResult<T> = Result<JsonRpcResponse<T>, JsonRpcError>;

impl<T: Serialize> JsonRpcResponse<T> {
    pub fn ok(data: T) -> Self {
        JsonRpcResponse {
            data,
            warnings: None,
        }
    }

    /// No `warnings` field is emitted when `warnings` is empty.
    pub fn warn(data: T, warnings: Vec<JsonRpcWarning>) -> Self {
        JsonRpcResponse {
            data,
            warnings: (!warnings.is_empty()).then_some(warnings),
        }
    }
}

impl JsonRpcWarning {
    pub fn new<S: Serialize>(code: JsonRpcWarningCode, message: String, data: Option<S>) -> Self {
        JsonRpcWarning {
            code: code as i32,
            message,
            data: data.and_then(|d| serde_json::to_value(&d).ok()),
        }
    }
}

pub fn json_rpc_error<S: Serialize>(
    code: JsonRpcErrorCode,
    message: impl Into<String>,
    data: Option<S>,
) -> JsonRpcError {
    jsonrpsee::types::ErrorObject::owned(code as i32, message, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_warnings_are_omitted() {
        let json = serde_json::to_value(JsonRpcResponse::warn(1, vec![])).unwrap();
        assert_eq!(json, serde_json::json!({ "data": 1 }));
    }

    #[test]
    fn warnings_carry_code() {
        let warning = JsonRpcWarning::new(
            JsonRpcWarningCode::DeprecatedVersion,
            "old".to_owned(),
            None::<()>,
        );
        let json = serde_json::to_value(JsonRpcResponse::warn("x", vec![warning])).unwrap();
        assert_eq!(json["warnings"][0]["code"], -32101);
        assert!(json["warnings"][0].get("data").is_none());
    }

    #[test]
    fn error_uses_code_value() {
        let err = json_rpc_error(JsonRpcErrorCode::InvalidArgument, "bad", None::<()>);
        assert_eq!(err.code(), -32003);
        assert_eq!(err.message(), "bad");
    }
}
