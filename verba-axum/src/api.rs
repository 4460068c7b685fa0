//! JSON 翻译接口
//!
//! - `POST /translate`：按请求语言翻译一个键；请求体无法解析时返回 400
//! - `GET /locales`：已注册的语言标签，默认语言在前

use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use validator::Validate;
use verba_core::{CallArgs, Context, LocaleRegistry, Replace, Translate};

use crate::i18n::Tr;
use crate::r;
use crate::resp::code::Code;
use crate::resp::err::E;
use crate::resp::r::R;

#[derive(Debug, Deserialize, Validate)]
pub struct TranslateReq {
    #[validate(required, length(min = 1, max = 1024))]
    pub key: Option<String>,
    pub count: Option<i64>,
    #[serde(default)]
    pub replace: Replace,
    pub context: Option<Context>,
    pub fallback: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct Translation {
    pub locale: Option<String>,
    pub text: String,
}

pub fn router(registry: Arc<LocaleRegistry>) -> Router {
    Router::new()
        .route("/translate", post(translate))
        .route("/locales", get(locales))
        .with_state(registry)
}

async fn translate(
    Tr(tr): Tr,
    req: Result<Json<TranslateReq>, JsonRejection>,
) -> R<Option<Translation>> {
    let Json(req) = match req {
        Ok(req) => req,
        Err(rejection) => {
            log::warn!("rejected translate body: {}", rejection.body_text());
            return R::err(E::Code(Code::BadRequest.as_i32()));
        }
    };
    r!(req.validate());

    let key = req.key.unwrap_or_default();
    let args = CallArgs {
        count: req.count,
        replace: req.replace,
        context: req.context,
        fallback: req.fallback,
    };

    R::ok(Some(Translation {
        locale: tr.tag().map(ToString::to_string),
        text: tr.translate_with(&key, &args),
    }))
}

async fn locales(State(registry): State<Arc<LocaleRegistry>>) -> R<Vec<String>> {
    R::ok(registry.tags().iter().map(ToString::to_string).collect())
}
