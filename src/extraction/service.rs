// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Async extraction service
//!
//! Pipelines are CPU-bound and blocking, so each call runs on the blocking
//! pool behind a semaphore bounding how many run at once. The per-call
//! timeout covers waiting for a worker slot as well as the job itself,
//! and expiry is reported as [`EngineError::Timeout`].

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::{info, warn};

use super::{
    EngineError, ExtractionEngines, ExtractionError, PostExtractionResult, PostExtractor,
    ProfileExtractionResult, ProfileExtractor,
};
use crate::config::ExtractionConfig;

/// Shared entry point for profile and post extraction
#[derive(Clone)]
pub struct ExtractionService {
    profile: Arc<ProfileExtractor>,
    post: Arc<PostExtractor>,
    workers: Arc<Semaphore>,
    timeout: Duration,
}

impl ExtractionService {
    pub fn new(engines: &ExtractionEngines, max_concurrent: usize, timeout: Duration) -> Self {
        Self {
            profile: Arc::new(engines.profile_extractor()),
            post: Arc::new(engines.post_extractor()),
            workers: Arc::new(Semaphore::new(max_concurrent.max(1))),
            timeout,
        }
    }

    /// Validate `config`, load every engine and build the service
    pub fn from_config(config: &ExtractionConfig) -> anyhow::Result<Self> {
        config.validate().map_err(anyhow::Error::msg)?;
        let engines = ExtractionEngines::from_config(config)?;
        Ok(Self::new(
            &engines,
            config.max_concurrent_extractions,
            config.extraction_timeout(),
        ))
    }

    /// Worker slots currently free
    pub fn available_workers(&self) -> usize {
        self.workers.available_permits()
    }

    pub async fn extract_profile(
        &self,
        image_base64: String,
    ) -> Result<ProfileExtractionResult, ExtractionError> {
        let extractor = self.profile.clone();
        self.run("profile", move || extractor.extract(&image_base64))
            .await
    }

    pub async fn extract_post(
        &self,
        image_base64: String,
    ) -> Result<PostExtractionResult, ExtractionError> {
        let extractor = self.post.clone();
        self.run("post", move || extractor.extract(&image_base64))
            .await
    }

    async fn run<T, F>(&self, surface: &'static str, job: F) -> Result<T, ExtractionError>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T, ExtractionError> + Send + 'static,
    {
        let start = Instant::now();
        let workers = self.workers.clone();
        let attempt = async move {
            let permit = match workers.acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => return Err(ExtractionError::from(EngineError::WorkerCrashed(e.to_string()))),
            };
            // The permit is held until the blocking job ends, even past a timeout
            let handle = tokio::task::spawn_blocking(move || {
                let _permit = permit;
                job()
            });
            match handle.await {
                Ok(result) => result,
                Err(join_error) => Err(ExtractionError::from(EngineError::WorkerCrashed(
                    join_error.to_string(),
                ))),
            }
        };

        match tokio::time::timeout(self.timeout, attempt).await {
            Ok(result) => {
                match &result {
                    Ok(_) => info!(
                        surface,
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        "Extraction finished"
                    ),
                    Err(e) if e.is_client_error() => info!(surface, "Rejected input: {}", e),
                    Err(e) => warn!(surface, "Extraction failed: {}", e),
                }
                result
            }
            Err(_) => {
                let timeout_ms = self.timeout.as_millis() as u64;
                warn!(
                    surface,
                    timeout_ms,
                    free_workers = self.workers.available_permits(),
                    "Extraction timed out"
                );
                Err(EngineError::Timeout { timeout_ms }.into())
            }
        }
    }
}
