//! Batch lookup and risk listing over local and remote data.
//!
//! The local reference directory is read-only and always available. The
//! remote service is authoritative when it answers; when it does not, results
//! degrade to local data instead of failing.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info};
use url::Url;

use super::gateway::RequestGateway;
use crate::domain::risk::normalize_entry;
use crate::domain::{
    ListingSource, LookupKey, LookupOutcome, LookupResult, PredictionRequest, PredictionResult,
    ReferenceDirectory, ReferenceRecord, RiskEntry, RiskListing, ServiceEndpoints,
};
use crate::error::RequestError;
use crate::port::HttpRequest;

pub const PREDICT_PATH: &str = "/predict";
pub const HIGH_RISK_PATH: &str = "/highrisk";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(8);

/// Merges local reference records with remote predictions.
#[derive(Clone)]
pub struct ReconciliationEngine {
    gateway: RequestGateway,
    predict_url: Url,
    high_risk_url: Url,
    directory: Arc<ReferenceDirectory>,
    timeout: Duration,
}

impl ReconciliationEngine {
    pub fn new(
        gateway: RequestGateway,
        endpoints: &ServiceEndpoints,
        directory: Arc<ReferenceDirectory>,
        timeout: Duration,
    ) -> Self {
        Self {
            gateway,
            predict_url: endpoints.http_url(PREDICT_PATH),
            high_risk_url: endpoints.http_url(HIGH_RISK_PATH),
            directory,
            timeout,
        }
    }

    #[must_use]
    pub fn directory(&self) -> &ReferenceDirectory {
        &self.directory
    }

    /// Resolve a batch by key.
    ///
    /// The remote prediction is requested whether or not the batch is known
    /// locally. Its failure only matters when there is no local record.
    pub async fn lookup(&self, raw_key: &str) -> LookupOutcome {
        let Some(key) = LookupKey::parse(raw_key) else {
            return LookupOutcome::EmptyKey;
        };

        let local = self.directory.get(&key);
        let remote = match self.predict(&key, local).await {
            Ok(prediction) => Some(prediction),
            Err(e) => {
                debug!(error = %e, batch = %key, local = local.is_some(), "Prediction unavailable");
                None
            }
        };

        let phone = local.and_then(|r| self.directory.supplier_phone(&r.supplier_id));
        match LookupResult::merge(key.clone(), local, remote.as_ref(), phone) {
            Some(result) => {
                info!(
                    batch = %result.key,
                    quality_pct = result.quality_pct,
                    source = ?result.quality_source,
                    "Batch resolved"
                );
                LookupOutcome::Found(result)
            }
            None => {
                info!(batch = %key, "Batch not found");
                LookupOutcome::NotFound(key)
            }
        }
    }

    async fn predict(
        &self,
        key: &LookupKey,
        local: Option<&ReferenceRecord>,
    ) -> Result<PredictionResult, RequestError> {
        let request = PredictionRequest::for_lookup(key, local, &self.directory);
        let body = serde_json::to_value(&request)
            .map_err(|e| RequestError::MalformedPayload(e.to_string()))?;

        let response = self
            .gateway
            .request(HttpRequest::post_json(self.predict_url.clone(), body), self.timeout)
            .await?;

        let value = response
            .into_json()
            .ok_or_else(|| RequestError::MalformedPayload("prediction is not JSON".into()))?;
        serde_json::from_value(value).map_err(|e| RequestError::MalformedPayload(e.to_string()))
    }

    /// Up to `limit` risk records, remote first, local high-risk records otherwise.
    ///
    /// An empty listing is a valid result from either source.
    pub async fn risk_listing(&self, limit: usize) -> RiskListing {
        match self.remote_listing(limit).await {
            Ok(listing) => listing,
            Err(e) => {
                debug!(error = %e, "Remote risk listing unavailable, using local records");
                let entries = self
                    .directory
                    .high_risk()
                    .take(limit)
                    .map(|record| {
                        let phone = self.directory.supplier_phone(&record.supplier_id);
                        RiskEntry::new(record.clone()).with_phone(phone)
                    })
                    .collect();
                RiskListing {
                    source: ListingSource::Local,
                    entries,
                }
            }
        }
    }

    async fn remote_listing(&self, limit: usize) -> Result<RiskListing, RequestError> {
        let mut url = self.high_risk_url.clone();
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());

        let body = self
            .gateway
            .request(HttpRequest::get(url), self.timeout)
            .await?;

        let rows = match body.into_json() {
            Some(Value::Array(rows)) => rows,
            _ => {
                return Err(RequestError::MalformedPayload(
                    "risk listing is not a sequence".into(),
                ))
            }
        };

        let entries = rows
            .iter()
            .filter_map(normalize_entry)
            .take(limit)
            .collect();
        Ok(RiskListing {
            source: ListingSource::Remote,
            entries,
        })
    }
}
