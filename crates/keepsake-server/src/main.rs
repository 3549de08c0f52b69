mod config;

use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use keepsake_api::{AppStateInner, CapsuleService, SystemClock};
use keepsake_crypto::{CapsuleCipher, KeyFile};
use keepsake_db::StoreBackend;
use keepsake_render::{FontSet, FsFontResolver, Renderer, Style};

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "keepsake=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    let backend = StoreBackend::from_url(&config.database_url)?;
    let store = keepsake_db::open_store(&backend)?;
    info!("Capsule store ready ({:?})", backend);

    // Without a key the server still starts; creating and opening capsules
    // then fails with a configuration error.
    let key_file = KeyFile::new(&config.key_file);
    let cipher = match key_file.load_or_generate() {
        Ok(key) => Some(CapsuleCipher::new(key)),
        Err(e) => {
            error!("Could not load capsule key from {}: {:#}", key_file.path().display(), e);
            None
        }
    };

    let fonts = FontSet::resolve(&FsFontResolver::new(&config.font_dir, config.fallback_font.clone()));
    let renderer = Renderer::new(Style::default(), fonts);

    if config.image_requires_unlock {
        info!("Keepsake images require an unlocked capsule");
    } else {
        warn!("Keepsake images are served regardless of unlock date");
    }

    let state = Arc::new(AppStateInner {
        service: CapsuleService::new(store, cipher, Arc::new(SystemClock)),
        renderer,
        public_url: config.public_url.clone(),
        image_requires_unlock: config.image_requires_unlock,
    });

    let app = keepsake_api::router(state).layer(TraceLayer::new_for_http());

    let addr = config.socket_addr()?;
    info!("Keepsake server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
