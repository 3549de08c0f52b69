pub mod capsules;
pub mod clock;
pub mod error;
pub mod pages;
pub mod service;

use std::sync::Arc;

use axum::{Router, routing::get};

use keepsake_render::Renderer;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::CapsuleError;
pub use service::{CapsuleService, NewCapsuleRequest, Revealed};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub service: CapsuleService,
    pub renderer: Renderer,
    /// Base used for shareable links, e.g. `https://capsule.example`.
    pub public_url: Option<String>,
    /// Refuse keepsake images for capsules that are still locked.
    pub image_requires_unlock: bool,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(capsules::index).post(capsules::create_capsule))
        .route("/v/{id}", get(capsules::view_capsule))
        .route("/generate-image/{id}", get(capsules::generate_image))
        .with_state(state)
}
