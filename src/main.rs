mod client;
mod config;
mod dispatch;
mod error;
mod events;
mod extract;
mod handlers;
mod session;
mod types;
mod upload;
mod validate;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use clap::Parser;
use log::info;
use tower_http::cors::CorsLayer;

use config::Config;
use events::Notifier;
use handlers::{catalog, messages, AppState};
use session::RemoteSession;

async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<impl IntoResponse, StatusCode> {
    let Some(api_key) = state.api_key.as_deref() else {
        return Ok(next.run(req).await);
    };

    let auth_header = req
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let token = auth_header.strip_prefix("Bearer ").unwrap_or(auth_header);

    if token == api_key {
        Ok(next.run(req).await)
    } else {
        Err(StatusCode::UNAUTHORIZED)
    }
}

pub fn router(state: Arc<AppState>, body_limit: usize) -> Router {
    let catalog_routes = Router::new()
        .route("/products", get(catalog::get_products))
        .route("/product", get(catalog::get_product_by_id))
        .route("/edit-product", post(catalog::edit_product))
        .route("/delete-products", post(catalog::delete_products))
        .route("/change-product-image", post(catalog::change_product_image))
        .route("/add-product-image", post(catalog::add_product_image))
        .route("/remove-product-image", post(catalog::remove_product_image))
        .route("/collections", get(catalog::get_collections))
        .route("/create-collection", post(catalog::create_collection))
        .route("/edit-collection", post(catalog::edit_collection))
        .route("/delete-collection", post(catalog::delete_collection))
        .route("/set-product-visibility", post(catalog::set_product_visibility))
        .route("/set-cart-enabled", post(catalog::update_cart_enabled));

    let api_routes = Router::new()
        .route("/send-message", post(messages::send_message))
        .route("/send-image", post(messages::send_image))
        .route("/send-file", post(messages::send_file))
        .route("/send-file-base64", post(messages::send_file_base64))
        .route("/send-voice", post(messages::send_voice))
        .route("/send-voice-base64", post(messages::send_voice_base64))
        .route("/send-link-preview", post(messages::send_link_preview))
        .route("/send-location", post(messages::send_location))
        .route("/send-buttons", post(messages::send_buttons))
        .route("/send-list-message", post(messages::send_list_message))
        .route("/send-poll-message", post(messages::send_poll_message))
        .route("/send-status", post(messages::send_status))
        .route("/send-reply", post(messages::reply_message))
        .route("/send-mentioned", post(messages::send_mentioned))
        .route("/send-sticker", post(messages::send_image_as_sticker))
        .route("/send-sticker-gif", post(messages::send_image_as_sticker_gif))
        .route("/events", get(events::events_handler))
        .nest("/catalog", catalog_routes)
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        // Added after the auth layer, so it stays public
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pretty_env_logger::init_timed();

    let config = Config::parse();

    let session_url = config.session_url.as_deref().ok_or_else(|| {
        anyhow::anyhow!("No messaging session configured (set WPP_SESSION_URL or --session-url)")
    })?;
    let client = RemoteSession::new(session_url, config.session_token.clone())?;

    let upload_dir = config.upload_dir();
    tokio::fs::create_dir_all(&upload_dir).await?;
    info!("Upload dir: {}", upload_dir.display());

    let state = Arc::new(AppState {
        client: Arc::new(client),
        notifier: Notifier::new(64),
        upload_dir,
        api_key: config.api_key(),
    });
    if state.api_key.is_none() {
        log::warn!("No API key configured, /api is open");
    }

    let app = router(state, config.body_limit());

    let addr = config.addr();
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::json;

    use super::*;
    use crate::testing::{call, get, RecordingClient};

    fn protected_app(dir: &std::path::Path) -> Router {
        let state = Arc::new(AppState {
            client: Arc::new(RecordingClient::new()),
            notifier: Notifier::new(4),
            upload_dir: dir.to_path_buf(),
            api_key: Some("s3cret".into()),
        });
        router(state, 1024)
    }

    #[tokio::test]
    async fn health_is_public() {
        let dir = tempfile::tempdir().unwrap();
        let (status, body) = call(protected_app(dir.path()), get("/api/health")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn api_requires_bearer_key() {
        let dir = tempfile::tempdir().unwrap();
        let (status, _) = call(
            protected_app(dir.path()),
            get("/api/catalog/products?phone=5511"),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let request = Request::get("/api/catalog/products?phone=5511")
            .header("authorization", "Bearer s3cret")
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(protected_app(dir.path()), request).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["response"]["id"], json!("msg-1"));
    }
}
