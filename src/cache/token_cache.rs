use std::sync::{Arc, Mutex, MutexGuard};

use chrono::DateTime;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::cache::credential::Credential;
use crate::cache::error::TokenError;
use crate::helpers::time::{get_instant, Clock, SystemClock};
use crate::observability::metrics::{
    get_metrics, try_get_metrics, OUTCOME_HIT, OUTCOME_JOINED, OUTCOME_REFRESH,
};
use crate::sources::fetch::TokenEndpoint;

/// One refresh operation, shared by every caller that needs a token while it runs.
type Refresh = OnceCell<Result<Credential, TokenError>>;

#[derive(Debug, Default)]
struct CacheState {
    current: Option<Credential>,
    in_flight: Option<Arc<Refresh>>,
}

/// Process-wide bearer credential cache with single-flight refresh.
///
/// Construct one per process and share it behind an `Arc`. At most one
/// refresh runs at a time; callers arriving while it runs await the same
/// operation and receive its result or its error.
#[derive(Debug)]
pub struct TokenCache<E, C = SystemClock> {
    endpoint: E,
    clock: C,
    safety_margin_seconds: u64,
    state: Mutex<CacheState>,
}

impl<E: TokenEndpoint> TokenCache<E> {
    pub fn new(endpoint: E, safety_margin_seconds: u64) -> Self {
        Self::with_clock(endpoint, SystemClock, safety_margin_seconds)
    }
}

impl<E: TokenEndpoint, C: Clock> TokenCache<E, C> {
    pub fn with_clock(endpoint: E, clock: C, safety_margin_seconds: u64) -> Self {
        Self {
            endpoint,
            clock,
            safety_margin_seconds,
            state: Mutex::new(CacheState::default()),
        }
    }

    /// Returns a bearer token that stays valid beyond the safety margin,
    /// refreshing it when needed.
    pub async fn get_token(&self) -> Result<String, TokenError> {
        let metrics = get_metrics().await;

        // validity check and slot claim must not be separated by an await
        let refresh = {
            let mut state = self.lock_state();
            let now = self.clock.now();
            if let Some(credential) = state
                .current
                .as_ref()
                .filter(|c| c.is_usable_at(now, self.safety_margin_seconds))
            {
                debug!("using cached access token");
                metrics.token_requests.with_label_values(&[OUTCOME_HIT]).inc();
                return Ok(credential.value.clone());
            }

            match &state.in_flight {
                Some(refresh) => {
                    debug!("waiting for ongoing token refresh");
                    metrics.token_requests.with_label_values(&[OUTCOME_JOINED]).inc();
                    refresh.clone()
                }
                None => {
                    metrics.token_requests.with_label_values(&[OUTCOME_REFRESH]).inc();
                    let refresh = Arc::new(Refresh::new());
                    state.in_flight = Some(refresh.clone());
                    refresh
                }
            }
        };

        refresh
            .get_or_init(|| self.refresh(&refresh))
            .await
            .as_ref()
            .map(|credential| credential.value.clone())
            .map_err(Clone::clone)
    }

    /// Client identifier that travels next to the token on every content call.
    pub fn client_id(&self) -> Result<String, TokenError> {
        self.endpoint.client_id()
    }

    /// Drops the cached credential and forgets any in-flight refresh.
    ///
    /// A refresh already running is not cancelled; its result is still cached
    /// when it completes.
    pub fn invalidate(&self) {
        let mut state = self.lock_state();
        state.current = None;
        state.in_flight = None;
        if let Some(metrics) = try_get_metrics() {
            metrics.token_invalidations.inc();
        }
        info!("token cache cleared");
    }

    /// Drops the cached credential only while it still holds `rejected`.
    ///
    /// Concurrent requests rejected with the same token clear it once; later
    /// callers find it gone (or already rotated) and leave the cache and any
    /// in-flight refresh untouched. Returns whether anything was cleared.
    pub fn invalidate_if_current(&self, rejected: &str) -> bool {
        let mut state = self.lock_state();
        if !state.current.as_ref().is_some_and(|c| c.value == rejected) {
            debug!("rejected token already rotated, keeping cache");
            return false;
        }
        state.current = None;
        if let Some(metrics) = try_get_metrics() {
            metrics.token_invalidations.inc();
        }
        info!("rejected token removed from cache");
        true
    }

    /// Copy of the current credential, valid or not.
    pub fn current(&self) -> Option<Credential> {
        self.lock_state().current.clone()
    }

    async fn refresh(&self, slot: &Arc<Refresh>) -> Result<Credential, TokenError> {
        let metrics = get_metrics().await;
        let start = get_instant();
        info!("fetching new access token");

        let result = self
            .endpoint
            .request_token()
            .await
            .and_then(|response| Credential::from_response(response, self.clock.now()))
            .and_then(|credential| self.ensure_outlives_margin(credential));
        metrics.token_refresh_duration.observe(start.elapsed().as_secs_f64());

        let mut state = self.lock_state();
        // an invalidate() may have handed the slot to a newer refresh
        if state.in_flight.as_ref().is_some_and(|current| Arc::ptr_eq(current, slot)) {
            state.in_flight = None;
        }

        match &result {
            Ok(credential) => {
                let expires_at = credential.expires_at();
                state.current = Some(credential.clone());
                metrics.token_expiry_unix.set(expires_at);
                info!(
                    "new access token obtained, type: {}, scopes: {:?}, expires at: {}",
                    credential.kind,
                    credential.granted_scopes,
                    DateTime::from_timestamp(expires_at, 0)
                        .map(|at| at.to_rfc3339())
                        .unwrap_or_else(|| expires_at.to_string())
                );
            }
            Err(err) => {
                metrics.token_refresh_failures.with_label_values(&[err.kind()]).inc();
                warn!("access token refresh failed: {}", err);
            }
        }
        result
    }

    fn ensure_outlives_margin(&self, credential: Credential) -> Result<Credential, TokenError> {
        if credential.is_usable_at(credential.issued_at, self.safety_margin_seconds) {
            Ok(credential)
        } else {
            Err(TokenError::MalformedResponse(format!(
                "token lifetime of {}s does not exceed the {}s safety margin",
                credential.validity_seconds, self.safety_margin_seconds
            )))
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, CacheState> {
        // state is replaced wholesale under the lock, a poisoned guard is still consistent
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
