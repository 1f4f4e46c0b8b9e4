//! Per-session login state and calculation history
//!
//! All mutation of one session goes through the map's per-entry write guard,
//! so concurrent requests on the same session never lose an append.

use chrono::Local;
use dashmap::DashMap;
use thiserror::Error;
use uuid::Uuid;

use super::{CalculationHistory, HistoryEntry};
use crate::accounts::AuthenticatedUser;
use crate::config::{ConfigError, DEFAULT_HISTORY_CAPACITY};
use crate::costs::CostReport;

/// The session ID was never opened, or has been logged out since
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Session inconnue ou expirée")]
pub struct UnknownSession;

/// State attached to one browser session
#[derive(Debug, Clone)]
pub struct SessionState {
    pub user: Option<AuthenticatedUser>,
    pub history: CalculationHistory,
}

impl SessionState {
    fn new(capacity: usize) -> Self {
        Self {
            user: None,
            history: CalculationHistory::with_capacity(capacity),
        }
    }
}

/// Thread-safe session store
pub struct SessionStore {
    sessions: DashMap<String, SessionState>,
    history_capacity: usize,
}

impl SessionStore {
    pub fn new(history_capacity: usize) -> Result<Self, ConfigError> {
        if history_capacity == 0 {
            return Err(ConfigError::Invalid(
                "history.capacity must be positive".to_string(),
            ));
        }
        Ok(Self {
            sessions: DashMap::new(),
            history_capacity,
        })
    }

    /// Open an empty session and return its ID
    pub fn open(&self) -> String {
        let session_id = Uuid::new_v4().to_string();
        self.sessions
            .insert(session_id.clone(), SessionState::new(self.history_capacity));
        session_id
    }

    /// Attach a user to a session opened with [`open`](Self::open)
    pub fn login(&self, session_id: &str, user: AuthenticatedUser) -> Result<(), UnknownSession> {
        let mut state = self.sessions.get_mut(session_id).ok_or(UnknownSession)?;
        state.user = Some(user);
        Ok(())
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.sessions.contains_key(session_id)
    }

    /// Clear the session entirely, history included. Returns the user that
    /// was logged in, if any.
    pub fn logout(&self, session_id: &str) -> Option<AuthenticatedUser> {
        self.sessions
            .remove(session_id)
            .and_then(|(_, state)| state.user)
    }

    /// Logged-in user of a session
    pub fn current_user(&self, session_id: &str) -> Option<AuthenticatedUser> {
        self.sessions.get(session_id).and_then(|s| s.user.clone())
    }

    /// Record a calculation in the history of an open session
    pub fn record(
        &self,
        session_id: &str,
        report: &CostReport,
        user_id: &str,
    ) -> Result<(), UnknownSession> {
        let mut state = self.sessions.get_mut(session_id).ok_or(UnknownSession)?;
        state
            .history
            .push(HistoryEntry::from_report(report, user_id, Local::now()));
        Ok(())
    }

    /// History entries of `user_id` in this session, newest first
    pub fn history_for(&self, session_id: &str, user_id: &str) -> Vec<HistoryEntry> {
        self.sessions
            .get(session_id)
            .map(|s| s.history.entries_for(user_id))
            .unwrap_or_default()
    }

    /// Cloned snapshot of a session
    pub fn get(&self, session_id: &str) -> Option<SessionState> {
        self.sessions.get(session_id).map(|r| r.clone())
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self {
            sessions: DashMap::new(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::costs::{CostCalculator, ParameterSet};
    use crate::models::company::CompanyProfile;
    use std::sync::Arc;
    use std::thread;

    fn user(id: &str) -> AuthenticatedUser {
        AuthenticatedUser {
            id: id.to_string(),
            email: format!("{}@erp.ma", id),
            full_name: id.to_uppercase(),
        }
    }

    fn report() -> CostReport {
        let company = CompanyProfile::new("DN", "Distribution", "Moyenne", 2e7, 150).unwrap();
        CostCalculator::new().calculate_total_costs(&company, &ParameterSet::new())
    }

    #[test]
    fn test_open_login_logout() {
        let store = SessionStore::default();
        let sid = store.open();
        assert!(store.current_user(&sid).is_none());

        store.login(&sid, user("amina")).unwrap();
        assert_eq!(store.current_user(&sid).unwrap().id, "amina");

        assert_eq!(store.logout(&sid).unwrap().id, "amina");
        assert!(store.current_user(&sid).is_none());
        assert_eq!(store.session_count(), 0);
    }

    #[test]
    fn test_record_respects_capacity() {
        let store = SessionStore::new(2).unwrap();
        let sid = store.open();
        let report = report();
        for _ in 0..3 {
            store.record(&sid, &report, "amina").unwrap();
        }
        assert_eq!(store.get(&sid).unwrap().history.len(), 2);
    }

    #[test]
    fn test_history_is_per_session_and_per_user() {
        let store = SessionStore::default();
        let a = store.open();
        let b = store.open();
        let report = report();

        store.record(&a, &report, "amina").unwrap();
        store.record(&a, &report, "youssef").unwrap();
        store.record(&b, &report, "amina").unwrap();

        assert_eq!(store.history_for(&a, "amina").len(), 1);
        assert_eq!(store.history_for(&b, "amina").len(), 1);
        assert!(store.history_for("unknown", "amina").is_empty());
    }

    #[test]
    fn test_concurrent_appends_are_not_lost() {
        let store = Arc::new(SessionStore::new(1000).unwrap());
        let sid = store.open();
        let report = Arc::new(report());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                let report = Arc::clone(&report);
                let sid = sid.clone();
                thread::spawn(move || {
                    for _ in 0..25 {
                        store.record(&sid, &report, "amina").unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.get(&sid).unwrap().history.len(), 200);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(SessionStore::new(0), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_unknown_session_ids_are_not_created() {
        let store = SessionStore::default();
        let report = report();

        assert_eq!(store.login("forged", user("amina")), Err(UnknownSession));
        assert_eq!(store.record("forged", &report, "amina"), Err(UnknownSession));
        assert_eq!(store.session_count(), 0);
        assert!(!store.contains("forged"));

        let sid = store.open();
        store.logout(&sid);
        assert_eq!(store.login(&sid, user("amina")), Err(UnknownSession));
        assert_eq!(store.session_count(), 0);
    }
}
