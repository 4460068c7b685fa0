use log::error;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
pub use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, time::ChronoLocal},
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
};

const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";
const DEFAULT_LOG_DIR: &str = "./logs";
const DEFAULT_FILE_PREFIX: &str = "verba.log";
const DEFAULT_LEVEL: &str = "info";
const DEFAULT_CLEANUP_INTERVAL: Duration = Duration::from_secs(3600);

/// 日志初始化错误
#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("invalid log filter '{directive}': {reason}")]
    Filter { directive: String, reason: String },
    #[error("global subscriber already set: {0}")]
    Init(#[from] TryInitError),
}

/// 日志配置构建器
///
/// 控制台输出与按天滚动的文件输出可分别开关；文件输出使用非阻塞写入，
/// 并可按 `max_files` 在后台定期清理旧日志文件。
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// 日志文件前缀 (实际文件名会包含日期，如 verba.log.2023-10-01)
    file_prefix: String,
    log_dir: PathBuf,
    /// 时间格式字符串 (基于 Chrono 格式)
    time_format: String,
    /// 日志级别或 env-filter 指令，如 `info,verba_core=debug`
    level: String,
    /// 为 true 时 `RUST_LOG` 优先于 `level`
    use_env: bool,
    console: bool,
    file: bool,
    max_files: Option<i16>,
    cleanup_interval: Duration,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            level: DEFAULT_LEVEL.to_string(),
            use_env: true,
            console: true,
            file: true,
            max_files: None,
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL,
        }
    }
}

impl LoggerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// 滚动日志文件将以此为前缀，并附加日期后缀。
    pub fn file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.file_prefix = prefix.into();
        self
    }

    pub fn log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = dir.into();
        self
    }

    /// 格式参考 chrono::format::strftime
    pub fn time_format(mut self, format: impl Into<String>) -> Self {
        self.time_format = format.into();
        self
    }

    /// 设置日志级别，接受 `debug` 这样的单一级别，也接受 env-filter 指令
    pub fn level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// 是否让 `RUST_LOG` 环境变量覆盖 `level`
    pub fn use_env(mut self, enable: bool) -> Self {
        self.use_env = enable;
        self
    }

    pub fn enable_console(mut self, enable: bool) -> Self {
        self.console = enable;
        self
    }

    pub fn enable_file(mut self, enable: bool) -> Self {
        self.file = enable;
        self
    }

    /// 超过此数量的旧日志文件将被自动删除。
    pub fn max_files(mut self, count: i16) -> Self {
        self.max_files = Some(count);
        self
    }

    pub fn cleanup_interval(mut self, interval: Duration) -> Self {
        self.cleanup_interval = interval;
        self
    }

    /// 生效的过滤指令
    pub fn directive(&self) -> String {
        if self.use_env
            && let Ok(env) = std::env::var(EnvFilter::DEFAULT_ENV)
            && !env.trim().is_empty()
        {
            return env;
        }
        self.level.clone()
    }

    fn filter(&self) -> Result<EnvFilter, LoggerError> {
        let directive = self.directive();
        EnvFilter::try_new(&directive).map_err(|e| LoggerError::Filter {
            directive,
            reason: e.to_string(),
        })
    }

    /// 初始化日志系统
    ///
    /// 注册全局 tracing subscriber，并在配置了 `max_files` 时启动清理任务。
    /// 返回的 `WorkerGuard` 必须被持有，以确保异步日志在程序结束前被刷新。
    pub fn try_init(self) -> Result<Option<WorkerGuard>, LoggerError> {
        let console_layer = if self.console {
            Some(
                fmt::layer()
                    .with_timer(ChronoLocal::new(self.time_format.clone()))
                    .with_writer(std::io::stdout)
                    .with_filter(self.filter()?),
            )
        } else {
            None
        };

        let (file_layer, guard) = if self.file {
            let file_appender = tracing_appender::rolling::daily(&self.log_dir, &self.file_prefix);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = fmt::layer()
                .with_timer(ChronoLocal::new(self.time_format.clone()))
                .with_ansi(false)
                .with_writer(non_blocking)
                .with_filter(self.filter()?);
            (Some(layer), Some(guard))
        } else {
            (None, None)
        };

        Registry::default()
            .with(console_layer)
            .with(file_layer)
            .try_init()?;

        self.spawn_cleanup_task_if_needed();
        Ok(guard)
    }

    /// 同 [`LoggerConfig::try_init`]，失败时打印到 stderr 并返回 `None`
    pub fn init(self) -> Option<WorkerGuard> {
        match self.try_init() {
            Ok(guard) => guard,
            Err(e) => {
                eprintln!("failed to initialize logger: {}", e);
                None
            }
        }
    }

    fn spawn_cleanup_task_if_needed(&self) {
        let Some(max_files) = self.max_files else {
            return;
        };
        if !self.file {
            return;
        }

        let log_dir = self.log_dir.clone();
        let file_prefix = self.file_prefix.clone();
        let interval = self.cleanup_interval;
        let keep = usize::try_from(max_files).unwrap_or(0);

        std::thread::spawn(move || {
            loop {
                cleanup_old_logs(&log_dir, &file_prefix, keep);
                std::thread::sleep(interval);
            }
        });
    }
}

/// 保留最新的 `max_files` 个以 `file_prefix` 开头的日志文件，返回删除的数量
pub fn cleanup_old_logs(log_dir: &Path, file_prefix: &str, max_files: usize) -> usize {
    if !log_dir.exists() {
        return 0;
    }

    let read_dir = match std::fs::read_dir(log_dir) {
        Ok(dir) => dir,
        Err(e) => {
            error!("Failed to read log directory: {}", e);
            return 0;
        }
    };

    let mut log_files: Vec<(PathBuf, String)> = read_dir
        .filter_map(|entry| {
            let entry = entry.ok()?;
            let file_name = entry.file_name().into_string().ok()?;
            file_name
                .starts_with(file_prefix)
                .then(|| (entry.path(), file_name))
        })
        .collect();

    // 按文件名降序排序 (依赖于日期后缀格式为 ISO 8601 兼容，如 .2023-10-01)
    log_files.sort_by(|a, b| b.1.cmp(&a.1));

    let mut removed = 0;
    for (path, _) in log_files.iter().skip(max_files) {
        match std::fs::remove_file(path) {
            Ok(()) => removed += 1,
            Err(e) => error!("Failed to remove old log file {:?}: {}", path, e),
        }
    }
    removed
}
