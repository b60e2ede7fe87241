//! Short-lived staging of priced orders.

use chrono::Duration;
use dashmap::DashMap;
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use super::orders_model::{OrderCalculation, OrderPreview, OrderRequest, OrderType};
use crate::constants::DEFAULT_PREVIEW_TTL_SECS;
use crate::errors::ConflictError;
use crate::utils::time_utils::Clock;
use crate::{Error, Result};

/// Store for order previews awaiting confirmation.
pub trait PreviewStore: Send + Sync {
    /// Stages a priced order under a fresh token.
    fn cache(
        &self,
        order_type: OrderType,
        request: OrderRequest,
        calculation: OrderCalculation,
    ) -> OrderPreview;

    /// Returns the staged order without removing it.
    ///
    /// Unknown ids are `NotFound`. Expired entries are evicted and reported
    /// as `PreviewExpired`. A stored kind other than `expected` is
    /// `PreviewTypeMismatch`.
    fn consume(&self, preview_id: &str, expected: OrderType) -> Result<OrderPreview>;

    /// Evicts the entry. Returns false when it was already gone.
    ///
    /// Execution claims a preview by removing it, so of two concurrent
    /// executions only one gets `true`.
    fn remove(&self, preview_id: &str) -> bool;

    /// Puts a claimed preview back after a failed commit. Expired previews
    /// are dropped.
    fn restore(&self, preview: OrderPreview);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewCacheConfig {
    pub ttl_secs: i64,
}

impl Default for PreviewCacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_PREVIEW_TTL_SECS,
        }
    }
}

/// In-process [`PreviewStore`] over a sharded map.
///
/// Expired entries are swept on every write; there is no background task.
pub struct PreviewCache {
    entries: DashMap<String, OrderPreview>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl PreviewCache {
    pub fn new(config: PreviewCacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            ttl: Duration::seconds(config.ttl_secs.max(1)),
            clock,
        }
    }

    fn evict_expired(&self) {
        let now = self.clock.now();
        let before = self.entries.len();
        self.entries.retain(|_, preview| preview.expires_at > now);
        let evicted = before.saturating_sub(self.entries.len());
        if evicted > 0 {
            debug!("Evicted {} expired order previews", evicted);
        }
    }
}

impl PreviewStore for PreviewCache {
    fn cache(
        &self,
        order_type: OrderType,
        request: OrderRequest,
        calculation: OrderCalculation,
    ) -> OrderPreview {
        self.evict_expired();

        let created_at = self.clock.now();
        let preview = OrderPreview {
            preview_id: Uuid::new_v4().to_string(),
            order_type,
            request,
            calculation,
            created_at,
            expires_at: created_at + self.ttl,
        };
        self.entries
            .insert(preview.preview_id.clone(), preview.clone());
        preview
    }

    fn consume(&self, preview_id: &str, expected: OrderType) -> Result<OrderPreview> {
        let preview = self
            .entries
            .get(preview_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| Error::not_found("preview", preview_id))?;

        if preview.expires_at <= self.clock.now() {
            self.entries.remove(preview_id);
            return Err(ConflictError::PreviewExpired(preview_id.to_string()).into());
        }
        if preview.order_type != expected {
            return Err(ConflictError::PreviewTypeMismatch {
                preview_id: preview_id.to_string(),
                expected: expected.to_string(),
                actual: preview.order_type.to_string(),
            }
            .into());
        }
        Ok(preview)
    }

    fn remove(&self, preview_id: &str) -> bool {
        self.entries.remove(preview_id).is_some()
    }

    fn restore(&self, preview: OrderPreview) {
        if preview.expires_at > self.clock.now() {
            self.entries.insert(preview.preview_id.clone(), preview);
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
