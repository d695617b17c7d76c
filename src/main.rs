use std::sync::Arc;
use anyhow::Context;
use dayone::{
    ai::{GeminiClient, TextGenerator},
    app::{self, AppState},
    config::Config,
    services::Repository,
    storage::RedisStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize basic tracing subscriber
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::load().context("Failed to load configuration")?;

    // Initialize Redis client
    let redis_client = if config.redis.sentinel_enabled {
        let url = config
            .redis
            .sentinel_url
            .clone()
            .context("Sentinel URL not configured")?;
        Arc::new(redis::Client::open(url).context("Failed to connect to Redis Sentinel")?)
    } else {
        Arc::new(redis::Client::open(config.redis.url.as_str()).context("Failed to connect to Redis")?)
    };

    let repository = Repository::new(Arc::new(RedisStore::new(redis_client)));

    // The AI proxy stays mounted without a key and reports it per request
    let generator: Option<Arc<dyn TextGenerator>> = match config.ai.api_key.as_deref() {
        Some(key) => match GeminiClient::new(key, &config.ai.base_url, &config.ai.model) {
            Ok(client) => {
                tracing::info!("AI generation enabled with {}", client.model());
                Some(Arc::new(client) as Arc<dyn TextGenerator>)
            }
            Err(e) => {
                tracing::warn!("AI generation disabled: {}", e);
                None
            }
        },
        None => {
            tracing::warn!("GEMINI_API_KEY not set; AI generation disabled");
            None
        }
    };

    let cors = app::cors_layer(&config.ai.allowed_origin)
        .context("Invalid allowed origin for CORS")?;

    let state = AppState {
        repository,
        generator,
        ai: config.ai.clone(),
        bcrypt_cost: config.server.bcrypt_cost,
    };
    let app = app::router(state, cors, config.server.max_body_size);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind server on {}", addr))?;

    tracing::info!("Server running on {}", addr);
    axum::serve(listener, app.into_make_service())
        .await
        .context("Failed to start server")?;

    Ok(())
}
