use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::middleware::{Next, from_fn, from_fn_with_state};
use axum::response::Response;
use axum::Router;
use tokio::signal;
use verba_core::LocaleRegistry;

use crate::i18n::handle_i18n;

type Middleware = Box<dyn FnOnce(Router) -> Router + Send>;

pub struct WebServer {
    router: Router,
    addr: String,
    middlewares: Vec<Middleware>,
}

impl WebServer {
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            router: Router::new(),
            addr: addr.into(),
            middlewares: Vec::new(),
        }
    }

    /// 按 `Accept-Language` 为每个请求选择翻译器
    pub fn layer_i18n(mut self, registry: Arc<LocaleRegistry>) -> Self {
        self.middlewares
            .push(Box::new(move |r| r.layer(from_fn_with_state(registry, handle_i18n))));
        self
    }

    /// 挂载任意 `from_fn` 中间件，如 [`log_request`]
    pub fn layer_fn<F, Fut>(mut self, f: F) -> Self
    where
        F: Clone + Send + Sync + 'static + Fn(Request, Next) -> Fut,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.middlewares.push(Box::new(|r| r.layer(from_fn(f))));
        self
    }

    pub fn mount(mut self, router: Router) -> Self {
        self.router = self.router.merge(router);
        self
    }

    /// 应用全部中间件后的路由；中间件在最后统一挂载，与调用顺序无关
    pub fn into_router(self) -> Router {
        self.middlewares
            .into_iter()
            .fold(self.router, |router, m| m(router))
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    pub async fn start(self) -> anyhow::Result<()> {
        log::info!("🚀 Starting web server at {}", self.addr);

        let addr = self.addr.clone();
        let router = self.into_router();
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        // 优雅关闭处理
        let server = axum::serve(listener, router).with_graceful_shutdown(wait_for_shutdown());
        if let Err(e) = server.await {
            log::error!("Server error: {}", e);
            return Err(anyhow::anyhow!("Server error: {}", e));
        }

        log::info!("🛑 Server stopped");
        Ok(())
    }
}

/// 请求日志：方法、路径、状态码与耗时
pub async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let started = Instant::now();

    let response = next.run(req).await;
    log::info!(
        "{} {} -> {} ({:?})",
        method,
        uri,
        response.status().as_u16(),
        started.elapsed()
    );
    response
}

async fn wait_for_shutdown() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            log::info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            log::info!("Received terminate signal, starting graceful shutdown");
        },
    }
}
