//! Routes for the card catalog.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use catalog_cards::application::command_handlers;
use catalog_cards::application::query_handlers::{self, CardView};
use catalog_cards::domain::commands;
use catalog_core::error::DomainError;
use catalog_core::repository::SearchFilter;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST / and PUT /{id}.
#[derive(Debug, Deserialize)]
pub struct CardRequest {
    /// Display name.
    pub name: String,
    /// Play cost.
    #[serde(default)]
    pub cost: i64,
    /// Owning faction.
    #[serde(default)]
    pub faction: String,
    /// Top-level category.
    #[serde(default)]
    pub category: String,
    /// Category refinement.
    #[serde(default)]
    pub sub_category: String,
    /// Free-form rules text.
    #[serde(default)]
    pub description: String,
}

/// Query string for GET /. Absent or empty parameters do not filter.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    /// Exact name.
    pub name: Option<String>,
    /// Exact cost, kept as text so an empty value means unfiltered.
    pub cost: Option<String>,
    /// Exact faction.
    pub faction: Option<String>,
    /// Exact category.
    pub category: Option<String>,
    /// Exact sub-category.
    #[serde(alias = "sub")]
    pub sub_category: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl TryFrom<SearchParams> for SearchFilter {
    type Error = DomainError;

    fn try_from(params: SearchParams) -> Result<Self, Self::Error> {
        let cost = non_empty(params.cost)
            .map(|raw| {
                raw.parse::<i64>()
                    .map_err(|_| DomainError::Validation(format!("cost must be an integer: {raw}")))
            })
            .transpose()?;

        Ok(SearchFilter {
            name: non_empty(params.name),
            cost,
            faction: non_empty(params.faction),
            category: non_empty(params.category),
            sub_category: non_empty(params.sub_category),
        })
    }
}

/// POST /
#[instrument(skip(state, request), fields(name = %request.name))]
async fn create_card(
    State(state): State<AppState>,
    Json(request): Json<CardRequest>,
) -> Result<Json<CardView>, ApiError> {
    let command = commands::CreateCard {
        card_id: Uuid::new_v4(),
        name: request.name,
        cost: request.cost,
        faction: request.faction,
        category: request.category,
        sub_category: request.sub_category,
        description: request.description,
    };

    info!(card_id = %command.card_id, "handling create_card command");

    let card = command_handlers::handle_create_card(
        &command,
        &*state.card_repository,
        &*state.event_publisher,
    )
    .await?;

    Ok(Json(CardView::from(card)))
}

/// PUT /{card_id}
#[instrument(skip(state, request), fields(card_id = %card_id))]
async fn update_card(
    State(state): State<AppState>,
    Path(card_id): Path<Uuid>,
    Json(request): Json<CardRequest>,
) -> Result<Json<CardView>, ApiError> {
    let command = commands::UpdateCard {
        card_id,
        name: request.name,
        cost: request.cost,
        faction: request.faction,
        category: request.category,
        sub_category: request.sub_category,
        description: request.description,
    };

    info!("handling update_card command");

    let card = command_handlers::handle_update_card(
        &command,
        &*state.card_repository,
        &*state.event_publisher,
    )
    .await?;

    Ok(Json(CardView::from(card)))
}

/// GET /{card_id}
#[instrument(skip(state), fields(card_id = %card_id))]
async fn get_card(
    State(state): State<AppState>,
    Path(card_id): Path<Uuid>,
) -> Result<Json<CardView>, ApiError> {
    let view = query_handlers::get_card_by_id(card_id, &*state.card_repository).await?;
    Ok(Json(view))
}

/// GET /
#[instrument(skip(state, params))]
async fn search_cards(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<CardView>>, ApiError> {
    let filter = SearchFilter::try_from(params)?;
    let views = query_handlers::search_cards(&filter, &*state.card_repository).await?;
    info!(matches = views.len(), "card search finished");
    Ok(Json(views))
}

/// Returns the router for the card catalog.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(search_cards).post(create_card))
        .route("/{card_id}", get(get_card).put(update_card))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use catalog_core::card::Card;
    use catalog_core::repository::CardRepository;
    use catalog_test_support::{
        EmptyCardRepository, FailingCardRepository, RecordingCardRepository,
        RecordingEventPublisher,
    };
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    fn app_state_with(card_repository: Arc<dyn CardRepository>) -> AppState {
        AppState::new(card_repository, Arc::new(RecordingEventPublisher::new()))
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_card_returns_200_with_card_view() {
        // Arrange
        let repo = Arc::new(RecordingCardRepository::new(None));
        let app = router().with_state(app_state_with(repo.clone()));
        let body = serde_json::json!({
            "name": "Fireball",
            "cost": 3,
            "faction": "Ember",
            "category": "Spell",
            "sub_category": "Evocation",
            "description": "Deal 3 damage."
        });

        // Act
        let response = app.oneshot(json_request("POST", "/", &body)).await.unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["name"], "Fireball");
        assert_eq!(json["cost"], 3);
        assert_eq!(json["sub_category"], "Evocation");
        assert!(json["card_id"].is_string());
        assert_eq!(repo.saved_batches().len(), 1);
    }

    #[tokio::test]
    async fn test_create_card_with_empty_name_returns_400() {
        let app = router().with_state(app_state_with(Arc::new(EmptyCardRepository)));
        let body = serde_json::json!({ "name": "", "cost": 1 });

        let response = app.oneshot(json_request("POST", "/", &body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_create_card_returns_500_when_store_fails() {
        let app = router().with_state(app_state_with(Arc::new(FailingCardRepository)));
        let body = serde_json::json!({ "name": "Fireball", "cost": 3 });

        let response = app.oneshot(json_request("POST", "/", &body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"], "store_unavailable");
    }

    #[tokio::test]
    async fn test_update_unknown_card_returns_404() {
        let app = router().with_state(app_state_with(Arc::new(EmptyCardRepository)));
        let body = serde_json::json!({ "name": "Fireball", "cost": 4 });
        let uri = format!("/{}", Uuid::new_v4());

        let response = app.oneshot(json_request("PUT", &uri, &body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["error"], "card_not_found");
    }

    #[tokio::test]
    async fn test_get_card_returns_200_with_card_view() {
        // Arrange
        let card_id = Uuid::new_v4();
        let repo = RecordingCardRepository::new(Some(Card {
            id: card_id,
            name: "Fireball".to_owned(),
            cost: 3,
            ..Card::default()
        }));
        let app = router().with_state(app_state_with(Arc::new(repo)));

        let request = Request::builder()
            .uri(format!("/{card_id}"))
            .body(Body::empty())
            .unwrap();

        // Act
        let response = app.oneshot(request).await.unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["card_id"], card_id.to_string());
        assert_eq!(json["cost"], 3);
    }

    #[tokio::test]
    async fn test_get_card_with_malformed_id_returns_400() {
        let app = router().with_state(app_state_with(Arc::new(EmptyCardRepository)));

        let request = Request::builder()
            .uri("/not-a-uuid")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_search_translates_query_into_filter() {
        // Arrange
        let repo = Arc::new(RecordingCardRepository::new(None));
        let app = router().with_state(app_state_with(repo.clone()));

        let request = Request::builder()
            .uri("/?name=Fireball&cost=0&faction=&sub=Evocation")
            .body(Body::empty())
            .unwrap();

        // Act
        let response = app.oneshot(request).await.unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!([]));
        assert_eq!(
            repo.searches(),
            vec![SearchFilter {
                name: Some("Fireball".to_owned()),
                cost: Some(0),
                faction: None,
                category: None,
                sub_category: Some("Evocation".to_owned()),
            }]
        );
    }

    #[tokio::test]
    async fn test_search_with_non_numeric_cost_returns_400() {
        let app = router().with_state(app_state_with(Arc::new(EmptyCardRepository)));

        let request = Request::builder()
            .uri("/?cost=three")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
