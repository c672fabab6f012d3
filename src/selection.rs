//! Selection state machine.
//!
//! ```text
//!  Idle/Rendered/Error --select(user)--> Loading
//!  Loading --resolve(current token, Ok)--> Rendered
//!  Loading --resolve(current token, Err)--> Error
//!  any --deselect--> Idle
//! ```
//!
//! Every `select`, `deselect` and `reject` bumps the request token. A response
//! carrying an older token is stale and dropped, which is the only ordering
//! guarantee needed between overlapping fetches.

use crate::chart::ChartSpec;
use crate::error::{DashboardError, DashboardResult};
use crate::presence::UserId;

/// Token captured by an in-flight fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub selected_user_id: Option<UserId>,
    pub request_token: u64,
}

/// At most one of these is visible at a time, so a chart, the loading
/// indicator and the error affordance can never overlap.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SelectionPhase {
    #[default]
    Idle,
    Loading,
    Rendered(ChartSpec),
    Error(String),
}

/// What happened to a response handed to [`SelectionController::resolve`].
#[derive(Debug)]
pub enum Resolution {
    Rendered,
    Failed(DashboardError),
    Stale,
}

#[derive(Debug, Default)]
pub struct SelectionController {
    state: SelectionState,
    phase: SelectionPhase,
}

impl SelectionController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    #[must_use]
    pub fn phase(&self) -> &SelectionPhase {
        &self.phase
    }

    #[must_use]
    pub fn current_token(&self) -> RequestToken {
        RequestToken(self.state.request_token)
    }

    #[must_use]
    pub fn is_current(&self, token: RequestToken) -> bool {
        token == self.current_token() && matches!(self.phase, SelectionPhase::Loading)
    }

    /// Start loading `user_id`; the returned token must accompany the response.
    pub fn select(&mut self, user_id: UserId) -> RequestToken {
        let token = self.advance();
        self.state.selected_user_id = Some(user_id);
        self.phase = SelectionPhase::Loading;
        tracing::debug!(user_id = %user_id, token = token.0, "Selection loading");
        token
    }

    /// Clear the selection; any in-flight response becomes stale.
    pub fn deselect(&mut self) {
        let token = self.advance();
        self.state.selected_user_id = None;
        self.phase = SelectionPhase::Idle;
        tracing::debug!(token = token.0, "Selection cleared");
    }

    /// Record a selection that could not be started at all.
    pub fn reject(&mut self, error: &DashboardError) {
        self.advance();
        self.state.selected_user_id = None;
        self.phase = SelectionPhase::Error(error.to_string());
    }

    /// Apply the outcome of the fetch started with `token`.
    pub fn resolve(
        &mut self,
        token: RequestToken,
        outcome: DashboardResult<ChartSpec>,
    ) -> Resolution {
        if !self.is_current(token) {
            tracing::debug!(
                token = token.0,
                current = self.state.request_token,
                "Dropping stale response"
            );
            return Resolution::Stale;
        }

        match outcome {
            Ok(chart) => {
                self.phase = SelectionPhase::Rendered(chart);
                Resolution::Rendered
            }
            Err(e) => {
                self.phase = SelectionPhase::Error(e.to_string());
                Resolution::Failed(e)
            }
        }
    }

    fn advance(&mut self) -> RequestToken {
        self.state.request_token = self.state.request_token.wrapping_add(1);
        self.current_token()
    }
}
