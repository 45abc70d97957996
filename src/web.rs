//! HTTP JSON interface to the holiday store.
//!
//! ```text
//! GET /holidays
//! GET /holidays/{country}
//! GET /holidays/{country}/{year}
//! GET /holidays/{country}/{year}/{month}
//! GET /holidays/{country}/{year}/{month}/{day}
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use log::{info, warn};
use serde::Serialize;
use thiserror::Error;

use crate::country::{CountryHolidaySet, SpecificationError};
use crate::export::{holidays_in_month, holidays_on};
use crate::holiday::{Names, ResolvedHoliday};
use crate::holiday_set::BindingError;
use crate::source::HolidayStore;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Specification(#[from] SpecificationError),
    #[error(transparent)]
    Binding(#[from] BindingError),
    #[error("{year:04}-{month:02}-{day:02} is not a valid date")]
    InvalidDate { year: i32, month: u32, day: u32 },
    #[error("{0} is not a valid month")]
    InvalidMonth(u32),
    #[error(transparent)]
    InvalidPath(#[from] PathRejection),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Specification(SpecificationError::UnknownCountry(_)) => StatusCode::NOT_FOUND,
            ApiError::Specification(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Binding(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InvalidDate { .. } | ApiError::InvalidMonth(_) | ApiError::InvalidPath(_) => {
                StatusCode::BAD_REQUEST
            }
        };
        let mut message = self.to_string();
        if let ApiError::Binding(BindingError::HolidayBindingFailed { source, .. }) = &self {
            message = format!("{}: {}", message, source);
        }
        if status.is_server_error() {
            warn!("request failed: {}", message);
        }
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// Shared, read-only state of all handlers
#[derive(Clone)]
pub struct AppState {
    store: Arc<HolidayStore>,
}

impl AppState {
    pub fn new(store: HolidayStore) -> Self {
        AppState { store: Arc::new(store) }
    }
}

#[derive(Serialize)]
struct CountryDescription {
    names: Names,
    #[serde(rename = "country-code-alpha2")]
    alpha2: String,
    #[serde(rename = "country-code-alpha3")]
    alpha3: String,
}

impl From<&CountryHolidaySet> for CountryDescription {
    fn from(set: &CountryHolidaySet) -> Self {
        CountryDescription {
            names: set.names().clone(),
            alpha2: set.alpha2().to_string(),
            alpha3: set.alpha3().to_string(),
        }
    }
}

#[derive(Serialize)]
struct AvailableCountries {
    available_countries: Vec<CountryDescription>,
}

#[derive(Serialize)]
struct HolidayList {
    holidays: Vec<ResolvedHoliday>,
}

async fn available_countries(State(state): State<AppState>) -> Json<AvailableCountries> {
    Json(AvailableCountries {
        available_countries: state.store.iter().map(CountryDescription::from).collect(),
    })
}

async fn country_description(
    State(state): State<AppState>,
    Path(country): Path<String>,
) -> Result<Json<CountryDescription>, ApiError> {
    let set = state.store.get(&country)?;
    Ok(Json(CountryDescription::from(set)))
}

async fn holidays_in_year(
    State(state): State<AppState>,
    path: Result<Path<(String, i32)>, PathRejection>,
) -> Result<Json<HolidayList>, ApiError> {
    let Path((country, year)) = path?;
    let holidays = state.store.get(&country)?.bind_year(year)?;
    Ok(Json(HolidayList { holidays }))
}

async fn holidays_in_year_month(
    State(state): State<AppState>,
    path: Result<Path<(String, i32, u32)>, PathRejection>,
) -> Result<Json<HolidayList>, ApiError> {
    let Path((country, year, month)) = path?;
    if !(1..=12).contains(&month) {
        return Err(ApiError::InvalidMonth(month));
    }
    let holidays = state.store.get(&country)?.bind_year(year)?;
    Ok(Json(HolidayList {
        holidays: holidays_in_month(&holidays, month),
    }))
}

async fn holidays_on_date(
    State(state): State<AppState>,
    path: Result<Path<(String, i32, u32, u32)>, PathRejection>,
) -> Result<Json<HolidayList>, ApiError> {
    let Path((country, year, month, day)) = path?;
    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or(ApiError::InvalidDate { year, month, day })?;
    let holidays = state.store.get(&country)?.bind_year(year)?;
    Ok(Json(HolidayList {
        holidays: holidays_on(&holidays, date),
    }))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/holidays", get(available_countries))
        .route("/holidays/", get(available_countries))
        .route("/holidays/:country", get(country_description))
        .route("/holidays/:country/", get(country_description))
        .route("/holidays/:country/:year", get(holidays_in_year))
        .route("/holidays/:country/:year/:month", get(holidays_in_year_month))
        .route("/holidays/:country/:year/:month/:day", get(holidays_on_date))
        .with_state(state)
}

/// Serve the HTTP interface until the process is stopped
pub async fn serve(store: HolidayStore, addr: SocketAddr) -> std::io::Result<()> {
    let router = create_router(AppState::new(store));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("serving holidays on http://{}", listener.local_addr()?);
    axum::serve(listener, router).await
}
