mod server;

use clap::{Parser, Subcommand};
use parlance_core::config::{self, shellexpand, ConfigSource, SiteConfig};
use parlance_core::locale::{LocaleResolver, Resolution};
use parlance_core::translation::Catalog;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

#[derive(Parser)]
#[command(
    name = "parlance",
    version,
    about = "Parlance: localized web front-end with locale-prefixed routing"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml", env = "PARLANCE_CONFIG")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server.
    Serve,
    /// Show how a request path would be resolved.
    Resolve {
        /// Request path, optionally with a query (`/about?x=1`).
        path: String,
        /// Accept-Language header value.
        #[arg(short, long)]
        accept_language: Option<String>,
    },
    /// Look up translation keys for a locale.
    Translate {
        locale: String,
        /// Dotted keys, e.g. `welcome.title`.
        #[arg(required = true)]
        keys: Vec<String>,
        #[arg(short, long)]
        namespace: Option<String>,
    },
    /// Report keys missing from non-default locales.
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let (cfg, source) = config::load(&cli.config)?;
    let _guard = init_tracing(&cfg.site)?;
    if source == ConfigSource::Defaults {
        info!("Config file not found at {}, using defaults", cli.config);
    }

    match cli.command {
        Commands::Serve => {
            info!("config: {}", cli.config);
            let catalog = Catalog::load(&cfg.i18n)?;
            server::serve(&cfg, catalog).await?;
        }
        Commands::Resolve {
            path,
            accept_language,
        } => {
            let resolver = LocaleResolver::new(&cfg.i18n, &cfg.server);
            let (path, query) = match path.split_once('?') {
                Some((p, q)) => (p, Some(q)),
                None => (path.as_str(), None),
            };
            match resolver.resolve(path, query, accept_language.as_deref()) {
                Resolution::Bypass => println!("bypass: {path} is served without a locale"),
                Resolution::Localized(locale) => println!("localized: {locale}"),
                Resolution::Redirect { locale, location } => {
                    println!("redirect: {location} (locale {locale})")
                }
            }
        }
        Commands::Translate {
            locale,
            keys,
            namespace,
        } => {
            let catalog = Catalog::load(&cfg.i18n)?;
            let t = catalog.translator(&locale, namespace.as_deref());
            if t.locale() != locale {
                println!("note: '{locale}' is not supported, using '{}'", t.locale());
            }
            for key in &keys {
                println!("{key} = {}", t.t(key));
            }
        }
        Commands::Check => {
            let catalog = Catalog::load(&cfg.i18n)?;
            let namespace = catalog.default_namespace().to_string();
            let mut gaps = 0;
            for locale in &cfg.i18n.locales {
                let missing = catalog.missing_keys(locale, &namespace);
                if missing.is_empty() {
                    println!("  {locale}: complete");
                } else {
                    println!("  {locale}: {} missing", missing.len());
                    for key in &missing {
                        println!("    - {key}");
                    }
                    gaps += missing.len();
                }
            }
            if gaps > 0 {
                anyhow::bail!("{gaps} translation keys missing");
            }
        }
    }

    Ok(())
}

/// Install the global subscriber. `RUST_LOG` overrides `site.log_level`.
///
/// With `site.log_dir` set, logs go to a daily rolling file and the returned
/// guard must live until exit so buffered lines are flushed.
fn init_tracing(site: &SiteConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&site.log_level))?;

    if site.log_dir.is_empty() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    }

    let dir = shellexpand(&site.log_dir);
    std::fs::create_dir_all(&dir)?;
    let appender = tracing_appender::rolling::daily(&dir, "parlance.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Ok(Some(guard))
}
