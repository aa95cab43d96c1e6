//! Content lifecycle: persistence, owner-scoped listing and the expiry sweep
//! around the [`ContentStore`] port.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::content::store::ContentStore;
use crate::errors::AppError;
use crate::generation::bundle::GeneratedBundle;
use crate::models::content::ContentRecord;

/// Flat size added to the estimate of any record carrying audio.
pub const AUDIO_SIZE_ESTIMATE_KB: i64 = 500;
/// Only the head of the prompt is kept for auditing.
pub const PROMPT_SNIPPET_CHARS: usize = 1000;

const DEFAULT_PAGE_SIZE: u32 = 20;
const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageRequest {
    #[serde(default)]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub size: u32,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    fn limit(&self) -> i64 {
        i64::from(self.size.clamp(1, MAX_PAGE_SIZE))
    }

    fn offset(&self) -> i64 {
        i64::from(self.page) * self.limit()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total: i64,
}

/// Listing view of a record. Carries flags and derived numbers only, never
/// the text bodies.
#[derive(Debug, Clone, Serialize)]
pub struct ContentSummary {
    pub content_id: Uuid,
    pub title: String,
    pub persona: String,
    pub created_at: DateTime<Utc>,
    pub has_audio: bool,
    pub has_script: bool,
    pub has_short_version: bool,
    /// Whole days left before the sweep removes the record. Negative once
    /// overdue.
    pub days_until_expiry: i64,
    pub estimated_size_kb: i64,
}

pub fn summarize(record: &ContentRecord, now: DateTime<Utc>, retention_days: i64) -> ContentSummary {
    let age_days = (now - record.created_at).num_days();
    let text_bytes = record.text.len()
        + record.text_short.len()
        + record.description.len()
        + record.tags.len();
    let mut estimated_size_kb = (text_bytes / 1024) as i64;
    if record.has_audio() {
        estimated_size_kb += AUDIO_SIZE_ESTIMATE_KB;
    }

    ContentSummary {
        content_id: record.content_id,
        title: record.title.clone(),
        persona: record.persona.clone(),
        created_at: record.created_at,
        has_audio: record.has_audio(),
        has_script: !record.text.trim().is_empty(),
        has_short_version: !record.text_short.trim().is_empty(),
        days_until_expiry: retention_days - age_days,
        estimated_size_kb,
    }
}

fn prompt_snippet(prompt: &str) -> Option<String> {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        None
    } else {
        Some(prompt.chars().take(PROMPT_SNIPPET_CHARS).collect())
    }
}

#[derive(Clone)]
pub struct ContentLifecycle {
    store: Arc<dyn ContentStore>,
    retention_days: i64,
}

impl ContentLifecycle {
    pub fn new(store: Arc<dyn ContentStore>, retention_days: i64) -> Self {
        Self {
            store,
            retention_days,
        }
    }

    pub fn retention_days(&self) -> i64 {
        self.retention_days
    }

    /// Persists a COMPLETED bundle for `owner_id`. Anything else is rejected
    /// before the store is touched.
    pub async fn save(
        &self,
        bundle: &GeneratedBundle,
        owner_id: Uuid,
        prompt: &str,
    ) -> Result<ContentRecord, AppError> {
        if !bundle.is_completed() {
            return Err(AppError::Validation(format!(
                "Only completed content can be saved (status {:?})",
                bundle.status
            )));
        }

        let now = Utc::now();
        let record = ContentRecord {
            content_id: Uuid::new_v4(),
            owner_id,
            process_id: bundle.process_id.clone(),
            title: bundle.title.clone(),
            persona: bundle.persona.as_str().to_string(),
            text: bundle.text.clone(),
            text_short: bundle.text_short.clone(),
            description: bundle.description.clone(),
            tags: bundle.tags.clone(),
            audio: bundle.audio.clone(),
            additional_content: serde_json::to_value(&bundle.generated_content)
                .map_err(|e| AppError::Internal(e.into()))?,
            prompt_used: prompt_snippet(prompt),
            created_at: now,
            updated_at: now,
        };

        self.store.insert(&record).await?;
        info!(
            "Saved content {} for owner {} (process {})",
            record.content_id, owner_id, record.process_id
        );
        Ok(record)
    }

    pub async fn list_summaries(
        &self,
        owner_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<ContentSummary>, AppError> {
        let records = self
            .store
            .list_by_owner(owner_id, page.limit(), page.offset())
            .await?;
        let total = self.store.count_by_owner(owner_id).await?;
        let now = Utc::now();

        Ok(Page {
            items: records
                .iter()
                .map(|r| summarize(r, now, self.retention_days))
                .collect(),
            page: page.page,
            size: page.limit() as u32,
            total,
        })
    }

    pub async fn get_owned(
        &self,
        content_id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<ContentRecord>, AppError> {
        Ok(self.store.find_owned(content_id, owner_id).await?)
    }

    pub async fn delete(&self, content_id: Uuid, owner_id: Uuid) -> Result<bool, AppError> {
        let deleted = self.store.delete_owned(content_id, owner_id).await?;
        if deleted {
            info!("Deleted content {content_id} for owner {owner_id}");
        }
        Ok(deleted)
    }

    pub async fn count(&self, owner_id: Uuid) -> Result<i64, AppError> {
        Ok(self.store.count_by_owner(owner_id).await?)
    }

    pub async fn update_enhancements(
        &self,
        content_id: Uuid,
        owner_id: Uuid,
        description: Option<&str>,
        audio: Option<&str>,
    ) -> Result<Option<ContentRecord>, AppError> {
        Ok(self
            .store
            .update_enhancements(content_id, owner_id, description, audio, Utc::now())
            .await?)
    }

    /// Deletes every record created before `now - retention`. The cutoff is
    /// fixed once, so records saved while the delete runs are never matched.
    pub async fn sweep_expired_at(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let cutoff = now - Duration::days(self.retention_days);
        let deleted = self.store.delete_created_before(cutoff).await?;
        info!("Expiry sweep removed {deleted} records created before {cutoff}");
        Ok(deleted)
    }

    pub async fn sweep_expired(&self) -> Result<u64, AppError> {
        self.sweep_expired_at(Utc::now()).await
    }
}


#[cfg(test)]
mod tests {
    use super::testing::record;
    use super::*;
    use crate::content::store::testing::MemoryContentStore;
    use crate::generation::bundle::BundleStatus;
    use crate::generation::request::Persona;

    fn lifecycle(store: Arc<MemoryContentStore>) -> ContentLifecycle {
        ContentLifecycle::new(store, 7)
    }

    #[tokio::test]
    async fn test_sweep_deletes_only_expired() {
        let store = Arc::new(MemoryContentStore::default());
        let owner = Uuid::new_v4();
        let old = record(owner, "antigo", Duration::days(8));
        let fresh = record(owner, "novo", Duration::days(2));
        store.records.lock().unwrap().extend([old.clone(), fresh.clone()]);

        let deleted = lifecycle(store.clone()).sweep_expired().await.unwrap();

        assert_eq!(deleted, 1);
        let remaining = store.all();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].content_id, fresh.content_id);
    }

    #[tokio::test]
    async fn test_error_bundle_is_never_saved() {
        let store = Arc::new(MemoryContentStore::default());
        let bundle = GeneratedBundle::failed("p", Persona::Generic, BundleStatus::Error, "x");
        let result = lifecycle(store.clone()).save(&bundle, Uuid::new_v4(), "").await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(store.insert_count(), 0);
    }

    #[tokio::test]
    async fn test_save_assigns_owner_and_trims_prompt() {
        let store = Arc::new(MemoryContentStore::default());
        let owner = Uuid::new_v4();
        let mut bundle =
            GeneratedBundle::failed("p-7", Persona::Prayer, BundleStatus::Completed, "ok");
        bundle.title = "Título".to_string();
        let prompt = "x".repeat(5000);

        let saved = lifecycle(store.clone()).save(&bundle, owner, &prompt).await.unwrap();

        assert_eq!(saved.owner_id, owner);
        assert_eq!(saved.persona, "PRAYER");
        assert_eq!(saved.prompt_used.as_deref().map(str::len), Some(PROMPT_SNIPPET_CHARS));
        assert_eq!(store.all().len(), 1);
    }

    #[tokio::test]
    async fn test_other_owner_sees_nothing() {
        let store = Arc::new(MemoryContentStore::default());
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let rec = record(owner, "meu", Duration::hours(1));
        store.records.lock().unwrap().push(rec.clone());
        let lifecycle = lifecycle(store.clone());

        assert!(lifecycle.get_owned(rec.content_id, stranger).await.unwrap().is_none());
        assert!(!lifecycle.delete(rec.content_id, stranger).await.unwrap());
        assert!(lifecycle.delete(rec.content_id, owner).await.unwrap());
        assert!(store.all().is_empty());
    }

    #[tokio::test]
    async fn test_summaries_carry_no_bodies() {
        let store = Arc::new(MemoryContentStore::default());
        let owner = Uuid::new_v4();
        let rec = record(owner, "Resumo", Duration::days(2) + Duration::hours(3));
        store.records.lock().unwrap().push(rec.clone());

        let page = lifecycle(store)
            .list_summaries(owner, PageRequest::default())
            .await
            .unwrap();

        assert_eq!(page.total, 1);
        let summary = &page.items[0];
        assert!(summary.has_script);
        assert!(!summary.has_audio);
        assert_eq!(summary.days_until_expiry, 5);

        let json = serde_json::to_string(&page).unwrap();
        assert!(!json.contains(&rec.text), "script leaked into listing: {json}");
        assert!(!json.contains(&rec.description), "description leaked: {json}");
    }

    #[tokio::test]
    async fn test_listing_is_newest_first_and_paginated() {
        let store = Arc::new(MemoryContentStore::default());
        let owner = Uuid::new_v4();
        for (i, hours) in [5, 1, 3].into_iter().enumerate() {
            store
                .records
                .lock()
                .unwrap()
                .push(record(owner, &format!("r{i}"), Duration::hours(hours)));
        }
        let lifecycle = lifecycle(store);

        let first = lifecycle
            .list_summaries(owner, PageRequest { page: 0, size: 2 })
            .await
            .unwrap();
        let titles: Vec<&str> = first.items.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["r1", "r2"]);
        assert_eq!(first.total, 3);

        let second = lifecycle
            .list_summaries(owner, PageRequest { page: 1, size: 2 })
            .await
            .unwrap();
        assert_eq!(second.items.len(), 1);
        assert_eq!(second.items[0].title, "r0");
    }

    #[test]
    fn test_size_estimate_adds_audio_allowance() {
        let mut rec = record(Uuid::new_v4(), "x", Duration::zero());
        rec.text = "a".repeat(4096);
        rec.description.clear();
        rec.tags.clear();
        let summary = summarize(&rec, Utc::now(), 7);
        assert_eq!(summary.estimated_size_kb, 4);

        rec.audio = Some("data:audio/mp3;base64,AAAA".to_string());
        let summary = summarize(&rec, Utc::now(), 7);
        assert_eq!(summary.estimated_size_kb, 504);
        assert!(summary.has_audio);
    }

    #[test]
    fn test_overdue_records_report_negative_days() {
        let rec = record(Uuid::new_v4(), "x", Duration::days(9));
        assert_eq!(summarize(&rec, Utc::now(), 7).days_until_expiry, -2);
    }
}
