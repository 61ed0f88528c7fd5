use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::models::{ErrorDetail, SearchQuery, SearchResponse};
use crate::state::AppState;
use crate::workflow;

/// POST /search - Full search pipeline for one location:
///   1. Web search scoped to groundwater levels at the location
///   2. Metadata extraction (title, snippet, link, publication date)
///   3. Relevance filtering and sorting via the configured strategy
///
/// Failures anywhere in the pipeline surface as a 500 with a
/// `{"detail": ...}` body carrying the error chain.
pub async fn search(
    State(state): State<AppState>,
    Json(req): Json<SearchQuery>,
) -> Result<Json<SearchResponse>, (StatusCode, Json<ErrorDetail>)> {
    let query_location = req.query_location.trim().to_string();
    if query_location.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorDetail::new("query_location is required")),
        ));
    }

    match workflow::run(&state, &query_location).await {
        Ok(sorted_results) => Ok(Json(SearchResponse { sorted_results })),
        Err(e) => {
            tracing::error!("Search pipeline failed for \"{query_location}\": {e:#}");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorDetail::new(format!("{e:#}"))),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn state() -> AppState {
        AppState::new(Config::default()).unwrap()
    }

    #[tokio::test]
    async fn test_blank_location_is_rejected() {
        for location in ["", "   ", "\n\t"] {
            let req = SearchQuery {
                query_location: location.to_string(),
            };
            let err = search(State(state()), Json(req)).await.unwrap_err();
            assert_eq!(err.0, StatusCode::BAD_REQUEST);
            assert_eq!(err.1 .0.detail, "query_location is required");
        }
    }
}
