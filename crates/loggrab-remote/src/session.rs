//! Keyed registry of open sessions.
//!
//! Sessions are stored by alias and one of them is "current". Opening a
//! session makes it current; `open` and `switch` both hand back the alias
//! that was current before so callers can restore it.

use crate::executor::RemoteExecutor;
use loggrab_common::{GrabError, GrabResult, SessionAlias};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Alias-keyed set of open sessions with one current session.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: HashMap<SessionAlias, Box<dyn RemoteExecutor>>,
    current: Option<SessionAlias>,
}

impl std::fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut aliases: Vec<_> = self.sessions.keys().map(|a| a.as_str()).collect();
        aliases.sort_unstable();
        f.debug_struct("SessionRegistry")
            .field("sessions", &aliases)
            .field("current", &self.current)
            .finish()
    }
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an open session under `alias` and make it current.
    ///
    /// Returns the previously current alias.
    pub fn open(
        &mut self,
        alias: SessionAlias,
        session: Box<dyn RemoteExecutor>,
    ) -> GrabResult<Option<SessionAlias>> {
        if self.sessions.contains_key(&alias) {
            return Err(GrabError::session_already_open(alias.as_str()));
        }

        debug!(alias = %alias, host = %session.host(), "Session registered");
        self.sessions.insert(alias.clone(), session);
        Ok(self.current.replace(alias))
    }

    /// Make `alias` the current session.
    ///
    /// Returns the previously current alias.
    pub fn switch(&mut self, alias: &SessionAlias) -> GrabResult<Option<SessionAlias>> {
        if !self.sessions.contains_key(alias) {
            return Err(GrabError::session_not_found(alias.as_str()));
        }
        Ok(self.current.replace(alias.clone()))
    }

    /// The current session.
    pub fn current(&self) -> GrabResult<&dyn RemoteExecutor> {
        let alias = self.current.as_ref().ok_or(GrabError::NoActiveSession)?;
        self.sessions
            .get(alias)
            .map(|session| &**session)
            .ok_or_else(|| GrabError::session_not_found(alias.as_str()))
    }

    pub fn current_alias(&self) -> Option<&SessionAlias> {
        self.current.as_ref()
    }

    pub fn get(&self, alias: &SessionAlias) -> Option<&dyn RemoteExecutor> {
        self.sessions.get(alias).map(|session| &**session)
    }

    pub fn contains(&self, alias: &SessionAlias) -> bool {
        self.sessions.contains_key(alias)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Close and forget the current session.
    ///
    /// Returns the alias that was closed. No session is current afterwards.
    pub async fn close_current(&mut self) -> GrabResult<SessionAlias> {
        let alias = self.current.take().ok_or(GrabError::NoActiveSession)?;
        if let Some(session) = self.sessions.remove(&alias) {
            session.close().await?;
        }
        Ok(alias)
    }

    /// Close every session.
    ///
    /// All sessions are attempted; the first failure is returned afterwards.
    pub async fn close_all(&mut self) -> GrabResult<()> {
        self.current = None;

        let mut first_error = None;
        for (alias, session) in self.sessions.drain() {
            if let Err(e) = session.close().await {
                warn!(alias = %alias, error = %e, "Error closing session");
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
