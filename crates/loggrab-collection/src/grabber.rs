//! Test lifecycle driver.
//!
//! `LogGrabber` owns the configuration, the open sessions and the offsets
//! recorded by the last tracking run. A test runner calls it at four points:
//!
//! - `start_suite`: open one session per configured server
//! - `start_test`: record the current length of every matching log
//! - `end_test`: depending on the collect policy, download what was appended
//!   and package it into the test's log directory
//! - `end_suite`: close every session

use crate::archive::assemble_archive;
use crate::config::ServerLogsConfig;
use crate::extractor::{self, ExtractionContext};
use crate::tracker;
use crate::transport::SessionFactory;
use crate::types::{ExtractionReport, PreparedState};
use chrono::Utc;
use loggrab_advanced_logging::{LogDirResolver, TestScope};
use loggrab_common::{CollectPolicy, GrabResult, TestStatus};
use loggrab_remote::SessionRegistry;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Captures remote log lines written during each test.
pub struct LogGrabber {
    config: ServerLogsConfig,
    factory: Arc<dyn SessionFactory>,
    resolver: Arc<dyn LogDirResolver>,
    policy: CollectPolicy,
    sessions: SessionRegistry,
    state: PreparedState,
}

impl std::fmt::Debug for LogGrabber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogGrabber")
            .field("servers", &self.config.servers.len())
            .field("policy", &self.policy)
            .field("sessions", &self.sessions)
            .field("tracked_logs", &self.state.log_count())
            .finish()
    }
}

impl LogGrabber {
    pub fn new(
        config: ServerLogsConfig,
        factory: Arc<dyn SessionFactory>,
        resolver: Arc<dyn LogDirResolver>,
    ) -> Self {
        Self {
            config,
            factory,
            resolver,
            policy: CollectPolicy::default(),
            sessions: SessionRegistry::new(),
            state: PreparedState::default(),
        }
    }

    pub fn with_policy(mut self, policy: CollectPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Offsets recorded by the last tracking run.
    pub fn prepared_state(&self) -> &PreparedState {
        &self.state
    }

    /// Replace the recorded offsets, e.g. with a state saved by another
    /// process.
    pub fn restore_state(&mut self, state: PreparedState) {
        self.state = state;
    }

    /// Open a session to every configured server that has none yet.
    pub async fn start_suite(&mut self) -> GrabResult<()> {
        for server in &self.config.servers {
            let alias = server.alias();
            if self.sessions.contains(&alias) {
                debug!(alias = %alias, "Session already open");
                continue;
            }

            let session = self.factory.connect(server).await?;
            self.sessions.open(alias, session)?;
        }

        info!(sessions = self.sessions.len(), "Suite sessions opened");
        Ok(())
    }

    pub async fn start_test(&mut self) -> GrabResult<()> {
        self.prepare_logs().await
    }

    /// Collect the test's logs if the policy asks for it.
    ///
    /// The recorded offsets are used up either way.
    pub async fn end_test(
        &mut self,
        scope: &TestScope,
        status: TestStatus,
    ) -> GrabResult<Option<ExtractionReport>> {
        if !self.policy.should_collect(status) {
            debug!(scope = %scope, status = %status, policy = %self.policy, "Skipping log collection");
            self.state = PreparedState::default();
            return Ok(None);
        }

        let base_dir = self.resolver.resolve_log_dir(scope).await?;
        let report = self.download_logs(&base_dir).await?;
        Ok(Some(report))
    }

    pub async fn end_suite(&mut self) -> GrabResult<()> {
        self.sessions.close_all().await
    }

    /// Record the current line count of every log matching the
    /// configuration, replacing the previous state.
    pub async fn prepare_logs(&mut self) -> GrabResult<()> {
        let mut state = PreparedState::default();

        for server in &self.config.servers {
            self.sessions.switch(&server.alias())?;
            let session = self.sessions.current()?;

            if let Some(tracked) = tracker::track_server(session, server).await? {
                state.servers.push(tracked);
            }
        }

        info!(
            servers = state.servers.len(),
            logs = state.log_count(),
            "Log offsets prepared"
        );

        self.state = state;
        Ok(())
    }

    /// Download everything appended since `prepare_logs` into `base_dir`
    /// and package it as `<base_dir>/<timestamp>_logs.zip`.
    pub async fn download_logs(&mut self, base_dir: &Path) -> GrabResult<ExtractionReport> {
        let state = std::mem::take(&mut self.state);
        let context = ExtractionContext {
            tmpdir: self.config.tmpdir.clone(),
            staging_dir: extractor::staging_dir(base_dir),
            timestamp: Utc::now().timestamp(),
        };

        let mut fragments = Vec::new();
        for server in &state.servers {
            self.sessions.switch(&server.alias)?;
            let session = self.sessions.current()?;
            fragments.extend(extractor::extract_server(session, server, &context).await?);
        }

        let archive = assemble_archive(&context.staging_dir, base_dir, context.timestamp).await?;

        match &archive {
            Some(path) => info!(
                archive = %path.display(),
                fragments = fragments.len(),
                "Logs collected"
            ),
            None => info!("No new log lines"),
        }

        Ok(ExtractionReport {
            timestamp: context.timestamp,
            fragments,
            archive,
        })
    }
}
