use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    extract::{Query, State},
    response::Json,
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    aggregator::Aggregator,
    error::DATA_UNAVAILABLE_MESSAGE,
    location_resolver::LocationInput,
    models::DashboardResult,
};

pub const WELCOME_MESSAGE: &str = "Bienvenue sur l'app SafeBreathe Strasbourg !";

#[derive(Serialize, Deserialize)]
pub struct ApiWelcome {
    pub message: String,
}

/// Raw `/dashboard-data` parameters; coordinates are parsed leniently
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub city: Option<String>,
}

impl DashboardQuery {
    pub fn to_input(&self) -> LocationInput {
        LocationInput::from_query(
            parse_coordinate("lat", self.lat.as_deref()),
            parse_coordinate("lon", self.lon.as_deref()),
            self.city.as_deref(),
        )
    }
}

fn parse_coordinate(name: &str, raw: Option<&str>) -> Option<f64> {
    let raw = raw.map(str::trim).filter(|value| !value.is_empty())?;
    match raw.parse::<f64>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring unparseable {name}={raw:?}");
            None
        }
    }
}

#[derive(Clone)]
struct DashboardState {
    aggregator: Arc<Aggregator>,
    request_budget: Duration,
}

/// `request_budget` bounds a whole `/dashboard-data` call; running out of it
/// still answers with the JSON error body
pub fn router(aggregator: Arc<Aggregator>, request_budget: Duration) -> Router {
    Router::new()
        .route("/", get(welcome))
        .route("/dashboard-data", get(get_dashboard_data))
        .with_state(DashboardState {
            aggregator,
            request_budget,
        })
}

async fn welcome() -> Json<ApiWelcome> {
    Json(ApiWelcome {
        message: WELCOME_MESSAGE.to_string(),
    })
}

async fn get_dashboard_data(
    State(state): State<DashboardState>,
    Query(query): Query<DashboardQuery>,
) -> Json<DashboardResult> {
    let dashboard = state.aggregator.dashboard(query.to_input());
    match tokio::time::timeout(state.request_budget, dashboard).await {
        Ok(result) => Json(result),
        Err(_) => {
            warn!(
                "Dashboard request exceeded its {}s budget",
                state.request_budget.as_secs()
            );
            Json(DashboardResult::error(DATA_UNAVAILABLE_MESSAGE))
        }
    }
}
