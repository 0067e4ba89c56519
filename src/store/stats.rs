//! Summary counts over the whole store.

use serde::Serialize;
use std::collections::BTreeMap;

use super::touchpoints::parse_timestamp;
use super::types::Metadata;
use super::{read_json, Store, StoreResult};

/// Aggregate view used by `ohara stats`.
#[derive(Debug, Serialize)]
pub struct StoreStats {
    pub total_touchpoints: usize,
    /// Includes categories no longer in the registry.
    pub by_category: BTreeMap<String, usize>,
    pub by_tag: BTreeMap<String, usize>,
    pub oldest: Option<String>,
    pub newest: Option<String>,
    pub category_count: usize,
    pub tag_count: usize,
    pub report_count: usize,
}

impl Store {
    pub fn stats(&self) -> StoreResult<StoreStats> {
        let (touchpoints, metadata) = {
            let (_touchpoints_guard, _metadata_guard) = self.read_touchpoints_then_metadata()?;
            let metadata: Metadata = read_json(&self.metadata_path())?;
            (self.load_touchpoints()?, metadata)
        };

        let mut by_category = BTreeMap::new();
        let mut by_tag = BTreeMap::new();
        for tp in &touchpoints {
            *by_category.entry(tp.category.clone()).or_insert(0) += 1;
            for tag in &tp.tags {
                *by_tag.entry(tag.clone()).or_insert(0) += 1;
            }
        }

        let mut dated: Vec<_> = touchpoints
            .iter()
            .filter_map(|tp| parse_timestamp(&tp.date).map(|t| (t, &tp.date)))
            .collect();
        dated.sort_by_key(|(t, _)| *t);

        Ok(StoreStats {
            total_touchpoints: touchpoints.len(),
            by_category,
            by_tag,
            oldest: dated.first().map(|(_, d)| d.to_string()),
            newest: dated.last().map(|(_, d)| d.to_string()),
            category_count: metadata.categories.len(),
            tag_count: metadata.tags.len(),
            report_count: self.list_reports()?.len(),
        })
    }
}
