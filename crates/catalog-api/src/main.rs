//! Card Catalog API server entry point.

use std::sync::Arc;

use catalog_api::config::Config;
use catalog_api::error::AppError;
use catalog_api::state::AppState;
use catalog_api::{build_router, telemetry};
use catalog_cache::cached_repository::CachedCardRepository;
use catalog_cache::in_memory::InMemoryCache;
use catalog_cache::redis_cache::RedisCache;
use catalog_core::cache::Cache;
use catalog_core::publisher::EventPublisher;
use catalog_core::repository::CardRepository;
use catalog_event_store::MIGRATOR;
use catalog_event_store::in_memory::InMemoryEventStore;
use catalog_event_store::pg_event_store::PgEventStore;
use catalog_messaging::tracing_publisher::TracingEventPublisher;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

async fn build_event_store(config: &Config) -> Result<Arc<dyn CardRepository>, AppError> {
    let Some(database_url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set, card events will be kept in memory only");
        return Ok(Arc::new(InMemoryEventStore::new()));
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(database_url)
        .await?;
    MIGRATOR.run(&pool).await?;
    tracing::info!("Connected to PostgreSQL, migrations applied");

    Ok(Arc::new(PgEventStore::new(pool)))
}

async fn build_cache(config: &Config) -> Arc<dyn Cache> {
    let Some(redis_url) = config.redis_url.as_deref() else {
        return Arc::new(InMemoryCache::new());
    };

    match RedisCache::connect(redis_url).await {
        Ok(cache) => {
            tracing::info!("Connected to Redis card cache");
            Arc::new(cache)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Redis unreachable, falling back to in-process cache");
            Arc::new(InMemoryCache::new())
        }
    }
}

#[cfg(feature = "kafka")]
fn build_publisher(config: &Config) -> Arc<dyn EventPublisher> {
    use catalog_messaging::kafka::KafkaEventPublisher;

    if let Some(brokers) = config.kafka_brokers.as_deref() {
        match KafkaEventPublisher::new(brokers) {
            Ok(publisher) => return Arc::new(publisher),
            Err(e) => tracing::warn!(error = %e, "Kafka producer unavailable, logging events instead"),
        }
    }
    Arc::new(TracingEventPublisher)
}

#[cfg(not(feature = "kafka"))]
fn build_publisher(config: &Config) -> Arc<dyn EventPublisher> {
    if config.kafka_brokers.is_some() {
        tracing::warn!("KAFKA_BROKERS set but the kafka feature is disabled, logging events instead");
    }
    Arc::new(TracingEventPublisher)
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = Config::from_env()?;
    let tracer_provider = telemetry::init(config.otlp_endpoint.as_deref())?;

    tracing::info!("Starting Card Catalog API server");

    let event_store = build_event_store(&config).await?;
    let cache = build_cache(&config).await;
    let card_repository =
        Arc::new(CachedCardRepository::new(event_store, cache).with_ttl(config.cache_ttl));
    let app_state = AppState::new(card_repository, build_publisher(&config));

    let app = build_router(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = config.bind_address()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    if let Some(provider) = tracer_provider
        && let Err(e) = provider.shutdown()
    {
        tracing::warn!(error = %e, "failed to flush spans on shutdown");
    }

    Ok(())
}
