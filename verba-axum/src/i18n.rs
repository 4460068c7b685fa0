//! 请求级别的翻译器：中间件负责协商，处理函数通过 [`Tr`] 或 [`current`] 取用。

pub mod middleware;

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use verba_core::BoundTranslator;

pub use middleware::{CURRENT_TRANSLATOR, handle_i18n};

/// 当前请求协商出的翻译器；未经过 i18n 中间件时为空字典（原样返回键）
#[derive(Debug, Clone, Default)]
pub struct Tr(pub BoundTranslator);

impl<S: Send + Sync> FromRequestParts<S> for Tr {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let translator = parts
            .extensions
            .get::<BoundTranslator>()
            .cloned()
            .or_else(current)
            .unwrap_or_default();
        Ok(Tr(translator))
    }
}

/// 当前 task 中的翻译器，不在中间件作用域内时返回 `None`
pub fn current() -> Option<BoundTranslator> {
    CURRENT_TRANSLATOR.try_with(Clone::clone).ok()
}
