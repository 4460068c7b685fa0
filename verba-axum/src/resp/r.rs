use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;
use verba_core::{CallArgs, Replace, Translate, Translator};

use crate::i18n::current;
use crate::resp::code::Code;
use crate::resp::err::E;

/// 统一响应体，`message` 按当前请求的语言翻译
#[derive(Debug, Serialize)]
pub struct R<T: Serialize> {
    pub code: i32,
    pub message: String,
    pub data: T,
}

impl<T: Serialize> R<T> {
    pub fn ok(data: T) -> Self {
        let code = Code::Ok.as_i32();
        Self {
            code,
            message: message_of(code, Replace::new()),
            data,
        }
    }
}

impl<T: Serialize + Default> R<T> {
    pub fn err(err: E) -> Self {
        let (code, message) = map_err(err);
        Self {
            code,
            message,
            data: T::default(),
        }
    }

    pub fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(err) => Self::err(err),
        }
    }
}

impl<T: Serialize> IntoResponse for R<T> {
    fn into_response(self) -> axum::response::Response {
        let status = if self.code == Code::InternalServerError.as_i32() {
            StatusCode::INTERNAL_SERVER_ERROR
        } else {
            StatusCode::OK
        };

        (status, Json(self)).into_response()
    }
}

fn map_err(err: E) -> (i32, String) {
    match err {
        E::Code(code) => (code, message_of(code, Replace::new())),
        E::Msg(code, params) => (code, message_of(code, params)),
        E::Sys(err) => {
            log::error!("{:?}", err);
            let code = Code::InternalServerError.as_i32();
            (code, message_of(code, Replace::new()))
        }
        E::Val(err) => {
            log::error!("{:?}", err);
            let is_missing = err
                .field_errors()
                .values()
                .any(|errs| errs.iter().any(|e| e.code == "required"));
            let code = if is_missing {
                Code::MissingParam.as_i32()
            } else {
                Code::IllegalParam.as_i32()
            };
            (code, message_of(code, Replace::new()))
        }
    }
}

fn message_of(code: i32, params: Replace) -> String {
    let key = code.to_string();
    let mut args = CallArgs::new().replace(params);
    if let Some(known) = Code::from_i32(code) {
        args = args.fallback(known.default_message());
    }

    match current() {
        Some(tr) => tr.translate_with(&key, &args),
        None => Translator::new().translate_with(&key, &args),
    }
}

#[macro_export]
macro_rules! r {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(err) => return $crate::resp::r::R::err(err.into()),
        }
    };
}
