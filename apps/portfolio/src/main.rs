mod config;
mod contact;
mod content;
mod errors;
mod images;
mod render;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::contact::controller::ContactController;
use crate::contact::dispatch::NotificationDispatcher;
use crate::contact::notifier::SmtpNotifier;
use crate::contact::store::{JsonFileStore, SubmissionStore};
use crate::content::models::PortfolioContent;
use crate::images::ImageResolver;
use crate::routes::build_router;
use crate::state::AppState;

/// Slack on top of the SMTP timeout before the dispatcher gives up on a send.
const DISPATCH_GRACE: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting portfolio v{}", env!("CARGO_PKG_VERSION"));

    // Page content is validated up front; a bad file stops startup.
    let content = PortfolioContent::load(&config.content_path).with_context(|| {
        format!("loading page content from {}", config.content_path.display())
    })?;
    info!(
        "Loaded content for {} ({} projects)",
        content.profile.full_name(),
        content.projects.len()
    );

    let images = ImageResolver::new(&config.images_dir);
    let keys = content.image_refs().into_iter().map(|r| r.key.as_str());
    let missing = images.missing_assets(keys);
    if missing.is_empty() {
        info!("All image paths verified");
    } else {
        for key in &missing {
            warn!(
                "Image '{key}' not found under {}; placeholder will be served",
                config.images_dir.display()
            );
        }
    }

    let store = Arc::new(JsonFileStore::new(&config.messages_path));
    match store.load().await {
        Ok(records) => info!(
            "Submission store at {} ({} stored)",
            store.path().display(),
            records.len()
        ),
        Err(e) => warn!("Submission store at {} is unreadable: {e}", store.path().display()),
    }

    let notifier = SmtpNotifier::from_config(&config.mail, &content.profile.email);
    if notifier.is_configured() {
        info!(
            "Email notifications enabled via {}:{}",
            config.mail.smtp_server, config.mail.smtp_port
        );
    } else {
        warn!("SENDER_EMAIL or SENDER_PASSWORD not set; email notifications disabled");
    }
    let (notifications, _worker) =
        NotificationDispatcher::spawn(Arc::new(notifier), config.mail.timeout + DISPATCH_GRACE);

    let state = AppState {
        content: Arc::new(content),
        contact: ContactController::new(store, notifications),
        images,
    };

    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
