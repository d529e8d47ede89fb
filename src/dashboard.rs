//! The entry point of the crate: a client that loads the four datasets once,
//! shares the outcome between all callers and builds per-location views from it.

use crate::config::{normalize_base_url, DashboardConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::dashboard_data::DashboardData;
use crate::datasets::error::DatasetError;
use crate::datasets::loader::DatasetLoader;
use crate::datasets::normalizer::NumericPolicy;
use crate::error::DashboardError;
use crate::types::location::Location;
use crate::types::view::LocationData;
use bon::bon;
use chrono::Utc;
use log::{debug, info};
use reqwest::Client;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tokio::sync::{Mutex, OnceCell};

type LoadOutcome = Result<Arc<DashboardData>, Arc<DatasetError>>;

/// One load attempt: the loader driving it and the cell its outcome lands in.
#[derive(Debug, Clone)]
struct Generation {
    loader: DatasetLoader,
    outcome: Arc<OnceCell<LoadOutcome>>,
}

impl Generation {
    fn new(loader: DatasetLoader) -> Self {
        Self {
            loader,
            outcome: Arc::new(OnceCell::new()),
        }
    }
}

/// Loads the dashboard datasets at most once and serves views from them.
///
/// Concurrent calls to [`WeatherDashboard::load`] share a single fetch. Both a
/// successful and a failed outcome are kept until [`WeatherDashboard::invalidate`]
/// is called.
///
/// # Examples
///
/// ```rust,no_run
/// # use state_weather::{WeatherDashboard, DashboardError, NumericPolicy};
/// # use std::time::Duration;
/// # async fn run() -> Result<(), DashboardError> {
/// let dashboard = WeatherDashboard::builder()
///     .base_url("http://localhost:8080")
///     .timeout(Duration::from_secs(10))
///     .numeric_policy(NumericPolicy::Strict)
///     .build();
///
/// for location in dashboard.locations().await? {
///     println!("{} ({})", location.state_name, location.id);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct WeatherDashboard {
    current: Mutex<Generation>,
}

#[bon]
impl WeatherDashboard {
    #[builder]
    pub fn new(
        #[builder(into)] base_url: Option<String>,
        timeout: Option<Duration>,
        numeric_policy: Option<NumericPolicy>,
        client: Option<Client>,
    ) -> Self {
        let base_url = normalize_base_url(base_url.as_deref().unwrap_or(DEFAULT_BASE_URL));
        let loader = DatasetLoader::new(
            &base_url,
            client.unwrap_or_default(),
            timeout.unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            numeric_policy.unwrap_or_default(),
        );
        Self {
            current: Mutex::new(Generation::new(loader)),
        }
    }

    pub fn from_config(config: &DashboardConfig) -> Self {
        Self::builder()
            .base_url(config.base_url.clone())
            .timeout(config.timeout())
            .numeric_policy(config.numeric_policy)
            .build()
    }

    /// Creates a client configured from the environment (see [`DashboardConfig::from_env`]).
    pub fn from_env() -> Result<Self, DashboardError> {
        Ok(Self::from_config(&DashboardConfig::from_env()?))
    }

    pub async fn base_url(&self) -> String {
        self.current.lock().await.loader.base_url().to_string()
    }

    /// Returns the loaded data, fetching it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Load`] if any dataset failed to fetch or decode.
    /// The same error is returned to every caller until the client is invalidated.
    pub async fn load(&self) -> Result<Arc<DashboardData>, DashboardError> {
        let generation = self.current.lock().await.clone();

        if let Some(outcome) = generation.outcome.get() {
            debug!("Dashboard data served from memo");
            return outcome.clone().map_err(DashboardError::Load);
        }

        let loader = generation.loader;
        generation
            .outcome
            .get_or_init(|| async move { loader.load().await.map(Arc::new).map_err(Arc::new) })
            .await
            .clone()
            .map_err(DashboardError::Load)
    }

    /// Locations for a selection list, sorted by state name.
    pub async fn locations(&self) -> Result<Vec<Location>, DashboardError> {
        Ok(self.load().await?.locations().to_vec())
    }

    /// The view of one location at the current instant. Unknown identifiers fall
    /// back to the first location; `None` only if there are no locations at all.
    pub async fn location_data(
        &self,
        location_id: &str,
    ) -> Result<Option<LocationData>, DashboardError> {
        let data = self.load().await?;
        Ok(data.for_location(location_id).now(Utc::now()).call())
    }

    /// Drops the memoized outcome so the next [`WeatherDashboard::load`] fetches
    /// again. A cancelled client becomes usable again.
    pub async fn invalidate(&self) {
        let mut current = self.current.lock().await;
        let loader = current.loader.renewed();
        *current = Generation::new(loader);
        info!("Dashboard data invalidated");
    }

    /// Cancels in-flight and future fetches until the next
    /// [`WeatherDashboard::invalidate`].
    pub async fn cancel(&self) {
        self.current.lock().await.loader.cancel();
    }
}

static SHARED: OnceLock<Result<WeatherDashboard, DashboardError>> = OnceLock::new();

/// The process-wide client, configured from the environment on first use.
pub fn shared() -> Result<&'static WeatherDashboard, DashboardError> {
    SHARED
        .get_or_init(WeatherDashboard::from_env)
        .as_ref()
        .map_err(Clone::clone)
}

/// Loads the data of the process-wide client.
pub async fn load_dashboard() -> Result<Arc<DashboardData>, DashboardError> {
    shared()?.load().await
}
