use std::sync::Arc;

use crate::config::Config;
use crate::form_state::FormStateStore;
use crate::rate_limit::SubmissionRateLimiter;
use crate::submission::store::SubmissionStore;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn SubmissionStore>,
    pub form_states: FormStateStore,
    pub submission_limiter: SubmissionRateLimiter,
}
