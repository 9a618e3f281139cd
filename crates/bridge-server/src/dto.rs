//! Deploy request parsing and validation.

use bridge_store::Deploy;
use serde_json::{Map, Value};

/// Reasons a deploy body is rejected before anything is written.
#[derive(thiserror::Error, Debug)]
pub enum RequestError {
    #[error("malformed JSON body: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("request body must be a JSON object")]
    NotAnObject,

    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("invalid field `{field}`: {reason}")]
    InvalidField {
        field: &'static str,
        reason: &'static str,
    },
}

/// Validated deploy submission from the editor.
///
/// Wire format: `{"code": str, "fileNum": str|number, "layout": any, "jsContent": str}`.
#[derive(Debug, Clone, PartialEq)]
pub struct DeployRequest {
    pub code: String,
    pub file_num: String,
    pub layout: Value,
    pub js_content: String,
}

impl DeployRequest {
    /// Parses and validates a raw request body.
    pub fn from_slice(body: &[u8]) -> Result<Self, RequestError> {
        let Value::Object(mut fields) = serde_json::from_slice::<Value>(body)? else {
            return Err(RequestError::NotAnObject);
        };

        let code = take_string(&mut fields, "code")?;
        let file_num = match take(&mut fields, "fileNum")? {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            _ => {
                return Err(RequestError::InvalidField {
                    field: "fileNum",
                    reason: "expected a string or number",
                })
            }
        };
        // Any JSON value is a valid layout, including null.
        let layout = take(&mut fields, "layout")?;
        let js_content = take_string(&mut fields, "jsContent")?;

        validate_file_stem("code", &code)?;
        validate_file_stem("fileNum", &file_num)?;

        Ok(Self {
            code,
            file_num,
            layout,
            js_content,
        })
    }

    pub fn into_deploy(self) -> Deploy {
        Deploy {
            code: self.code,
            file_num: self.file_num,
            layout: self.layout,
            js_content: self.js_content,
        }
    }
}

fn take(fields: &mut Map<String, Value>, field: &'static str) -> Result<Value, RequestError> {
    fields.remove(field).ok_or(RequestError::MissingField(field))
}

fn take_string(fields: &mut Map<String, Value>, field: &'static str) -> Result<String, RequestError> {
    match take(fields, field)? {
        Value::String(s) => Ok(s),
        _ => Err(RequestError::InvalidField {
            field,
            reason: "expected a string",
        }),
    }
}

/// Values end up inside file names, so they must stay within their directory.
fn validate_file_stem(field: &'static str, value: &str) -> Result<(), RequestError> {
    let reason = if value.is_empty() {
        "must not be empty"
    } else if value.contains(['/', '\\', '\0']) {
        "must not contain path separators"
    } else if value == "." || value == ".." {
        "must not be a relative path component"
    } else {
        return Ok(());
    };
    Err(RequestError::InvalidField { field, reason })
}
