//! Dashboard wiring: user directory → selector, selector → selection state
//! machine, selection → chart surface.
//!
//! The controller is shared by reference between overlapping selection
//! handlers. All interaction state sits behind one mutex that is only held
//! between suspension points, so a slow response can interleave with newer
//! selections but never tear the visible state.

use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use std::time::Duration;

use crate::chart::{ChartSpec, ChartSurface, ChartVariant, Dataset, SelectorMode};
use crate::config::Config;
use crate::directory::{User, UserDirectory};
use crate::error::{DashboardError, DashboardResult, with_timeout};
use crate::presence::{PresenceApi, UserId};
use crate::selection::{Resolution, SelectionController, SelectionPhase, SelectionState};
use crate::services::cache::{DatasetCache, cache_key};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorOption {
    pub label: String,
    pub value: String,
}

/// The mutually exclusive region below the selector.
#[derive(Debug, Clone, PartialEq)]
pub enum MainRegion {
    Empty,
    Loading,
    Chart(ChartSpec),
    Error(String),
}

impl MainRegion {
    #[must_use]
    pub fn loading_visible(&self) -> bool {
        matches!(self, Self::Loading)
    }

    #[must_use]
    pub fn chart_visible(&self) -> bool {
        matches!(self, Self::Chart(_))
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }
}

impl From<&SelectionPhase> for MainRegion {
    fn from(phase: &SelectionPhase) -> Self {
        match phase {
            SelectionPhase::Idle => Self::Empty,
            SelectionPhase::Loading => Self::Loading,
            SelectionPhase::Rendered(chart) => Self::Chart(chart.clone()),
            SelectionPhase::Error(message) => Self::Error(message.clone()),
        }
    }
}

/// Snapshot of everything the page shows.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    /// `None` while the selector is hidden
    pub selector: Option<Vec<SelectorOption>>,
    pub avatar_url: Option<String>,
    pub main: MainRegion,
}

#[derive(Debug)]
pub enum SelectionOutcome {
    Idle,
    Rendered,
    Failed(DashboardError),
    /// A newer selection took over before this one's response arrived
    Superseded,
}

#[derive(Debug, Clone, PartialEq)]
enum DirectoryStatus {
    Pending,
    Ready,
    Failed(String),
}

struct Session<S> {
    directory_status: DirectoryStatus,
    selection: SelectionController,
    avatar_url: Option<String>,
    surface: S,
}

pub struct DashboardController<A, S> {
    api: Arc<A>,
    variant: ChartVariant,
    request_timeout: Duration,
    directory: OnceLock<UserDirectory>,
    session: Mutex<Session<S>>,
    cache: Option<DatasetCache>,
}

impl<A: PresenceApi, S: ChartSurface> DashboardController<A, S> {
    #[must_use]
    pub fn new(api: Arc<A>, surface: S, config: &Config) -> Self {
        Self::from_parts(
            api,
            surface,
            config.chart_variant,
            config.request_timeout(),
            DatasetCache::from_config(config),
        )
    }

    #[must_use]
    pub fn from_parts(
        api: Arc<A>,
        surface: S,
        variant: ChartVariant,
        request_timeout: Duration,
        cache: Option<DatasetCache>,
    ) -> Self {
        Self {
            api,
            variant,
            request_timeout,
            directory: OnceLock::new(),
            session: Mutex::new(Session {
                directory_status: DirectoryStatus::Pending,
                selection: SelectionController::new(),
                avatar_url: None,
                surface,
            }),
            cache,
        }
    }

    /// Load the user directory. The selector stays hidden behind the loading
    /// indicator until this succeeds; on failure the error is shown instead.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::DirectoryLoadFailure` or `DashboardError::Timeout`
    /// if the user list cannot be loaded.
    pub async fn start(&self) -> DashboardResult<()> {
        self.lock_session().directory_status = DirectoryStatus::Pending;
        tracing::info!(variant = ?self.variant, "Loading user directory");

        let loaded =
            with_timeout(self.request_timeout, UserDirectory::load(self.api.as_ref())).await;

        let mut session = self.lock_session();
        match loaded {
            Ok(directory) => {
                if self.directory.set(directory).is_err() {
                    tracing::warn!("User directory already loaded, keeping the first copy");
                }
                session.directory_status = DirectoryStatus::Ready;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "User directory unavailable");
                session.directory_status = DirectoryStatus::Failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Handle a selector change. An empty value is the placeholder and clears
    /// the selection; anything else loads and draws that user's chart unless
    /// a later selection supersedes it first.
    pub async fn on_selection_change(&self, value: &str) -> SelectionOutcome {
        let user = match self.resolve_selection(value) {
            Ok(Some(user)) => user,
            Ok(None) => {
                let mut session = self.lock_session();
                session.selection.deselect();
                session.surface.hide();
                return SelectionOutcome::Idle;
            }
            Err(e) => {
                tracing::warn!(error = %e, value, "Selection rejected");
                let mut session = self.lock_session();
                session.selection.reject(&e);
                session.surface.hide();
                return SelectionOutcome::Failed(e);
            }
        };

        let token = {
            let mut session = self.lock_session();
            // Avatar follows the selection regardless of how the fetch ends.
            session.avatar_url = Some(user.avatar_url.clone());
            session.surface.hide();
            session.selection.select(user.id)
        };

        let outcome = self.load_chart(user.id).await;

        let mut guard = self.lock_session();
        let session = &mut *guard;
        match session.selection.resolve(token, outcome) {
            Resolution::Rendered => {
                if let SelectionPhase::Rendered(chart) = session.selection.phase() {
                    session.surface.draw(chart);
                    tracing::info!(
                        user_id = %user.id,
                        rows = chart.data.row_count(),
                        "Chart rendered"
                    );
                }
                SelectionOutcome::Rendered
            }
            Resolution::Failed(e) => {
                tracing::warn!(user_id = %user.id, error = %e, "Chart unavailable");
                SelectionOutcome::Failed(e)
            }
            Resolution::Stale => SelectionOutcome::Superseded,
        }
    }

    #[must_use]
    pub fn view(&self) -> DashboardView {
        let session = self.lock_session();
        let (selector, main) = match &session.directory_status {
            DirectoryStatus::Pending => (None, MainRegion::Loading),
            DirectoryStatus::Failed(message) => (None, MainRegion::Error(message.clone())),
            DirectoryStatus::Ready => (
                Some(self.selector_options()),
                MainRegion::from(session.selection.phase()),
            ),
        };

        DashboardView {
            selector,
            avatar_url: session.avatar_url.clone(),
            main,
        }
    }

    #[must_use]
    pub fn selection_state(&self) -> SelectionState {
        self.lock_session().selection.state().clone()
    }

    #[must_use]
    pub fn directory(&self) -> Option<&UserDirectory> {
        self.directory.get()
    }

    #[must_use]
    pub fn cache(&self) -> Option<&DatasetCache> {
        self.cache.as_ref()
    }

    #[must_use]
    pub fn variant(&self) -> ChartVariant {
        self.variant
    }

    /// Run `f` against the chart surface.
    pub fn with_surface<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.lock_session().surface)
    }

    fn selector_options(&self) -> Vec<SelectorOption> {
        let Some(directory) = self.directory.get() else {
            return Vec::new();
        };
        let mode = self.variant.selector_mode();

        directory
            .users()
            .iter()
            .enumerate()
            .map(|(index, user)| SelectorOption {
                label: user.name.clone(),
                value: match mode {
                    SelectorMode::ById => user.id.to_string(),
                    SelectorMode::Positional => index.to_string(),
                },
            })
            .collect()
    }

    fn resolve_selection(&self, value: &str) -> DashboardResult<Option<User>> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(None);
        }

        let directory = self.directory.get().ok_or_else(|| {
            DashboardError::UnknownSelection(format!("{value} (users not loaded yet)"))
        })?;

        let user = match self.variant.selector_mode() {
            SelectorMode::ById => value
                .parse::<UserId>()
                .ok()
                .and_then(|id| directory.get(id)),
            SelectorMode::Positional => value
                .parse::<usize>()
                .ok()
                .and_then(|index| directory.at(index)),
        };

        user.cloned()
            .map(Some)
            .ok_or_else(|| DashboardError::UnknownSelection(value.to_string()))
    }

    /// Fetch (or reuse) the user's dataset and build the chart. Only datasets
    /// that build cleanly are cached, so a contract violation is re-fetched
    /// on the next selection.
    async fn load_chart(&self, user_id: UserId) -> DashboardResult<ChartSpec> {
        let key = cache_key(self.variant.endpoint(), &[&user_id.to_string()]);

        if let Some(cache) = &self.cache
            && let Some(hit) = cache.get(&key).await
        {
            return hit.build_chart();
        }

        let dataset = self.fetch_dataset(user_id).await?;
        let chart = dataset.build_chart()?;

        if let Some(cache) = &self.cache {
            cache.insert(key, Arc::new(dataset)).await;
        }
        Ok(chart)
    }

    async fn fetch_dataset(&self, user_id: UserId) -> DashboardResult<Dataset> {
        let api = self.api.as_ref();
        let dataset = match self.variant {
            ChartVariant::MeanWeekday => Dataset::MeanWeekday(
                with_timeout(self.request_timeout, api.mean_time_weekday(user_id)).await?,
            ),
            ChartVariant::IntervalTimeline => Dataset::IntervalTimeline(
                with_timeout(self.request_timeout, api.presence_start_end(user_id)).await?,
            ),
        };
        tracing::debug!(
            user_id = %user_id,
            endpoint = self.variant.endpoint(),
            rows = dataset.len(),
            "Dataset fetched"
        );
        Ok(dataset)
    }

    fn lock_session(&self) -> MutexGuard<'_, Session<S>> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
