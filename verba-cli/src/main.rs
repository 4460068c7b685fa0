use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use verba_axum::server::log_request;
use verba_axum::{WebServer, api};
use verba_core::config::AppConfig;
use verba_core::{CallArgs, Context, LocaleRegistry, Replace, Translate, loader};
use verba_logger::LoggerConfig;

#[derive(Parser)]
#[command(name = "verba", version, about = "Key-based translations with locale negotiation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the YAML config file; defaults apply when it does not exist.
    #[arg(short, long, default_value = "verba.yaml")]
    config: PathBuf,

    /// Dictionary directory, overrides `locales.dir`.
    #[arg(short, long, env = "VERBA_LOCALES")]
    locales: Option<PathBuf>,

    /// Fallback locale, overrides `locales.default`.
    #[arg(short, long)]
    default: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate one key for an Accept-Language preference.
    Translate {
        key: String,
        /// Accept-Language value, e.g. "ja,en-US;q=0.7".
        #[arg(long, default_value = "")]
        lang: String,
        #[arg(short = 'n', long, allow_negative_numbers = true)]
        count: Option<i64>,
        /// Placeholder value, repeatable.
        #[arg(short, long = "replace", value_name = "NAME=VALUE", value_parser = parse_pair)]
        replace: Vec<(String, String)>,
        /// Context tag, repeatable.
        #[arg(short = 'x', long = "context", value_name = "NAME=VALUE", value_parser = parse_pair)]
        context: Vec<(String, String)>,
        /// Text used when the key has no entry.
        #[arg(short, long)]
        fallback: Option<String>,
    },
    /// Parse every dictionary file and report its size.
    Check {
        /// Files to check; the locales directory when empty.
        files: Vec<PathBuf>,
    },
    /// Show which registered locale a preference list resolves to.
    Negotiate { header: String },
    /// Serve the translation API over HTTP.
    Serve {
        /// Listen address, overrides `server.addr`.
        #[arg(long)]
        addr: Option<String>,
    },
}

static REGISTRY: OnceLock<Arc<LocaleRegistry>> = OnceLock::new();

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{}'", raw)),
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut config = if cli.config.exists() {
        AppConfig::load(&cli.config)
            .with_context(|| format!("failed to load config {}", cli.config.display()))?
    } else {
        AppConfig::default()
    };

    if let Some(dir) = &cli.locales {
        config.locales.dir = dir.clone();
    }
    if let Some(default) = &cli.default {
        config.locales.default = Some(default.clone());
    }
    Ok(config)
}

/// 进程内共享的注册表，首次使用时从字典目录加载
fn registry(config: &AppConfig) -> anyhow::Result<Arc<LocaleRegistry>> {
    if let Some(registry) = REGISTRY.get() {
        return Ok(Arc::clone(registry));
    }

    let dir = &config.locales.dir;
    let loaded = LocaleRegistry::from_dir(dir, config.locales.default.as_deref())
        .with_context(|| format!("failed to load locales from {}", dir.display()))?;
    Ok(Arc::clone(REGISTRY.get_or_init(|| Arc::new(loaded))))
}

fn init_logger(config: &AppConfig, console_level: Option<&str>) -> Option<verba_logger::WorkerGuard> {
    let log = &config.log;
    let mut logger = LoggerConfig::new()
        .level(console_level.unwrap_or(&log.level))
        .log_dir(&log.dir)
        .file_prefix(&log.file_prefix)
        .enable_console(log.console)
        .enable_file(log.file);
    if let Some(max_files) = log.max_files {
        logger = logger.max_files(max_files);
    }
    logger.init()
}

fn check(files: &[PathBuf], dir: &Path) -> anyhow::Result<()> {
    let paths = if files.is_empty() {
        loader::dictionary_files(dir)?
    } else {
        files.to_vec()
    };

    let mut failed = 0;
    for path in &paths {
        match loader::load_file(path) {
            Ok(dictionary) => println!(
                "ok    {} ({} entries, {} contexts)",
                path.display(),
                dictionary.len(),
                dictionary.contexts().len()
            ),
            Err(e) => {
                failed += 1;
                println!("error {}", e);
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} dictionaries failed to parse", failed, paths.len());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Translate {
            key,
            lang,
            count,
            replace,
            context,
            fallback,
        } => {
            let _guard = init_logger(&config, Some("warn"));
            let tr = registry(&config)?.select(&lang);
            let args = CallArgs {
                count,
                replace: replace.into_iter().collect::<Replace>(),
                context: (!context.is_empty()).then(|| context.into_iter().collect::<Context>()),
                fallback,
            };
            println!("{}", tr.translate_with(&key, &args));
        }
        Commands::Check { files } => {
            let _guard = init_logger(&config, Some("warn"));
            check(&files, &config.locales.dir)?;
        }
        Commands::Negotiate { header } => {
            let _guard = init_logger(&config, Some("warn"));
            match registry(&config)?.negotiate(&header) {
                Some(negotiated) => println!("{} ({:?})", negotiated.tag, negotiated.confidence),
                None => anyhow::bail!("no locales registered in {}", config.locales.dir.display()),
            }
        }
        Commands::Serve { addr } => {
            let _guard = init_logger(&config, None);
            let registry = registry(&config)?;
            tracing::info!(
                locales = ?registry.tags().iter().map(ToString::to_string).collect::<Vec<_>>(),
                "locales loaded"
            );

            WebServer::new(addr.unwrap_or_else(|| config.server.addr.clone()))
                .mount(api::router(Arc::clone(&registry)))
                .layer_i18n(registry)
                .layer_fn(log_request)
                .start()
                .await?;
        }
    }

    Ok(())
}
