use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use log::{debug, error, info};
use thermal_skies_core::{HourlyRecord, Location};
use tokio::sync::RwLock;

use crate::{ForecastSource, ProviderError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForecastStatus {
    /// Nothing fetched yet for this session
    Pending,
    Loading,
    Ready,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastState {
    pub location: Location,
    pub hourly: Vec<HourlyRecord>,
    pub heat_flux_source_var: Option<String>,
    pub selected_index: usize,
    pub status: ForecastStatus,
    pub last_error: Option<String>,
}

impl ForecastState {
    fn new(location: Location, status: ForecastStatus) -> Self {
        Self {
            location,
            hourly: Vec::new(),
            heat_flux_source_var: None,
            selected_index: 0,
            status,
            last_error: None,
        }
    }

    pub fn loading(&self) -> bool {
        matches!(
            self.status,
            ForecastStatus::Pending | ForecastStatus::Loading
        )
    }

    pub fn selected_hour(&self) -> Option<&HourlyRecord> {
        self.hourly.get(self.selected_index)
    }

    pub fn last_index(&self) -> usize {
        self.hourly.len().saturating_sub(1)
    }
}

/// Holds the forecast the UI is looking at.
///
/// Mutation goes through [`ForecastStore::set_location`] and
/// [`ForecastStore::set_selected_index`] only.
pub struct ForecastStore {
    source: Arc<dyn ForecastSource>,
    state: RwLock<ForecastState>,
    generation: AtomicU64,
}

impl ForecastStore {
    pub fn new(source: Arc<dyn ForecastSource>, location: Location) -> Self {
        Self {
            source,
            state: RwLock::new(ForecastState::new(location, ForecastStatus::Pending)),
            generation: AtomicU64::new(0),
        }
    }

    pub async fn snapshot(&self) -> ForecastState {
        self.state.read().await.clone()
    }

    /// Fetch the current location if nothing has been fetched yet.
    pub async fn ensure_loaded(&self) -> ForecastState {
        let (generation, location) = {
            let mut state = self.state.write().await;
            if state.status != ForecastStatus::Pending {
                return state.clone();
            }
            let location = state.location;
            (self.begin(&mut state, location), location)
        };
        self.fetch(generation, location).await
    }

    /// Replace the forecast with one for `location`.
    ///
    /// The previous hours are dropped immediately. If another location is set
    /// while this fetch is in flight, this result is discarded.
    pub async fn set_location(&self, location: Location) -> ForecastState {
        let generation = {
            let mut state = self.state.write().await;
            self.begin(&mut state, location)
        };
        self.fetch(generation, location).await
    }

    /// Select an hour, clamped into the available range. Never refetches.
    pub async fn set_selected_index(&self, index: usize) -> ForecastState {
        let mut state = self.state.write().await;
        state.selected_index = index.min(state.last_index());
        state.clone()
    }

    fn begin(&self, state: &mut ForecastState, location: Location) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *state = ForecastState::new(location, ForecastStatus::Loading);
        generation
    }

    async fn fetch(&self, generation: u64, location: Location) -> ForecastState {
        info!("fetching forecast for {}", location);
        let result = self.source.forecast(&location).await;
        self.commit(generation, location, result).await
    }

    async fn commit(
        &self,
        generation: u64,
        location: Location,
        result: Result<crate::Forecast, ProviderError>,
    ) -> ForecastState {
        let mut state = self.state.write().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("discarding stale forecast for {}", location);
            return state.clone();
        }

        match result {
            Ok(forecast) => {
                info!(
                    "loaded {} forecast hours for {}",
                    forecast.hourly.len(),
                    location
                );
                state.hourly = forecast.hourly;
                state.heat_flux_source_var = forecast.heat_flux_source_var;
                state.selected_index = 0;
                state.status = ForecastStatus::Ready;
                state.last_error = None;
            }
            Err(e) => {
                error!("forecast fetch for {} failed: {}", location, e);
                state.hourly.clear();
                state.heat_flux_source_var = None;
                state.selected_index = 0;
                state.status = ForecastStatus::Failed;
                state.last_error = Some(e.to_string());
            }
        }
        state.clone()
    }
}
