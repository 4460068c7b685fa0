use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::{ACCEPT_LANGUAGE, CONTENT_LANGUAGE};
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use tokio::task_local;
use verba_core::{BoundTranslator, LocaleRegistry};

task_local! {
    pub static CURRENT_TRANSLATOR: BoundTranslator;
}

/// 按 `Accept-Language` 选择翻译器，写入请求扩展与当前 task，
/// 并在响应上标注 `Content-Language`。
pub async fn handle_i18n(
    State(registry): State<Arc<LocaleRegistry>>,
    mut req: Request,
    next: Next,
) -> Response {
    let translator = resolve_translator(&registry, req.headers());
    let tag = translator.tag().map(ToString::to_string);
    req.extensions_mut().insert(translator.clone());

    let mut response = CURRENT_TRANSLATOR.scope(translator, next.run(req)).await;

    if let Some(tag) = tag
        && let Ok(value) = HeaderValue::from_str(&tag)
    {
        response.headers_mut().insert(CONTENT_LANGUAGE, value);
    }
    response
}

fn resolve_translator(registry: &LocaleRegistry, headers: &HeaderMap) -> BoundTranslator {
    let header = headers
        .get(ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    registry.select(header)
}

#[cfg(test)]
mod tests {
    use super::*;
    use verba_core::Translate;

    fn registry() -> LocaleRegistry {
        let registry = LocaleRegistry::new();
        registry.must_register_document("zh-CN", r#"{"values": {"200": "成功"}}"#);
        registry.must_register_document("en", r#"{"values": {"200": "Ok"}}"#);
        registry
    }

    fn resolve(registry: &LocaleRegistry, header: Option<&str>) -> (String, String) {
        let mut headers = HeaderMap::new();
        if let Some(header) = header {
            headers.insert(ACCEPT_LANGUAGE, header.parse().unwrap());
        }
        let tr = resolve_translator(registry, &headers);
        (
            tr.tag().map(ToString::to_string).unwrap_or_default(),
            tr.translate("200"),
        )
    }

    #[test]
    fn test_resolve_translator() {
        let registry = registry();

        assert_eq!(resolve(&registry, Some("fr;q=0.9, en;q=0.8")), ("en".into(), "Ok".into()));
        // 默认语言
        assert_eq!(resolve(&registry, Some("fr;q=1.0")), ("zh-CN".into(), "成功".into()));
        assert_eq!(resolve(&registry, None), ("zh-CN".into(), "成功".into()));
        assert_eq!(resolve(&registry, Some("zh-TW,zh;q=0.9")), ("zh-CN".into(), "成功".into()));
        assert_eq!(resolve(&registry, Some("EN-us")), ("en".into(), "Ok".into()));
    }

    #[test]
    fn test_empty_registry() {
        let registry = LocaleRegistry::new();
        assert_eq!(resolve(&registry, Some("en")), (String::new(), "200".into()));
    }
}
