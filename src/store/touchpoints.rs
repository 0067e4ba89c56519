//! Touchpoint repository: filtered listing, create, update, delete.
//!
//! Every mutation is a whole-collection read-modify-write of
//! `touchpoints.json` under the exclusive touchpoint lock. Create and update
//! sanitize their input first, then validate the cleaned values against a
//! metadata snapshot read under the shared metadata lock.

use chrono::{DateTime, SecondsFormat, Utc};

use super::sanitize::{clean_input, CleanInput};
use super::types::{Metadata, Touchpoint, TouchpointFilter, TouchpointInput};
use super::{read_json, write_json, Store, StoreError, StoreResult};

/// Current UTC time in the stored timestamp format.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse a timestamp in the stored format (RFC 3339).
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

impl Store {
    /// List touchpoints matching every supplied filter, in creation order.
    ///
    /// A malformed `start_date` is a validation error. Stored records whose
    /// own date cannot be parsed are left out of date-filtered results.
    pub fn list_touchpoints(&self, filter: &TouchpointFilter) -> StoreResult<Vec<Touchpoint>> {
        let start = match filter.start_date() {
            Some(raw) => Some(parse_timestamp(raw).ok_or_else(|| {
                StoreError::Validation(format!("invalid start_date format: {raw}"))
            })?),
            None => None,
        };

        let _guard = self.read_touchpoints_lock()?;
        let touchpoints = self.load_touchpoints()?;
        let total = touchpoints.len();

        let result: Vec<Touchpoint> = touchpoints
            .into_iter()
            .filter(|tp| filter.category().map_or(true, |c| tp.category == c))
            .filter(|tp| filter.tag().map_or(true, |t| tp.tags.iter().any(|x| x == t)))
            .filter(|tp| match start {
                None => true,
                Some(start) => match parse_timestamp(&tp.date) {
                    Some(date) => date >= start,
                    None => {
                        tracing::warn!(id = %tp.id, date = %tp.date, "skipping touchpoint with malformed date");
                        false
                    }
                },
            })
            .collect();

        tracing::debug!(total, matched = result.len(), "listed touchpoints");
        Ok(result)
    }

    /// Create a touchpoint with a fresh id and the current timestamp.
    pub fn create_touchpoint(&self, input: TouchpointInput) -> StoreResult<Touchpoint> {
        let input = clean_input(input);

        let (_touchpoints_guard, metadata_guard) = self.lock_touchpoints_then_metadata()?;
        let metadata: Metadata = read_json(&self.metadata_path())?;
        drop(metadata_guard);
        validate(&input, &metadata)?;

        let mut touchpoints = self.load_touchpoints()?;
        let touchpoint = Touchpoint {
            id: uuid::Uuid::now_v7().to_string(),
            date: now_timestamp(),
            description: input.description,
            category: input.category,
            tags: input.tags,
            people_involved: input.people_involved,
            url: input.url,
        };
        touchpoints.push(touchpoint.clone());
        self.save_touchpoints(&touchpoints)?;

        tracing::info!(id = %touchpoint.id, category = %touchpoint.category, "touchpoint created");
        Ok(touchpoint)
    }

    /// Replace the editable fields of touchpoint `id`, keeping its id and date.
    pub fn update_touchpoint(&self, id: &str, input: TouchpointInput) -> StoreResult<Touchpoint> {
        let input = clean_input(input);

        let (_touchpoints_guard, metadata_guard) = self.lock_touchpoints_then_metadata()?;
        let metadata: Metadata = read_json(&self.metadata_path())?;
        drop(metadata_guard);
        validate(&input, &metadata)?;

        let mut touchpoints = self.load_touchpoints()?;
        let Some(existing) = touchpoints.iter_mut().find(|tp| tp.id == id) else {
            return Err(StoreError::not_found("touchpoint", id));
        };
        existing.description = input.description;
        existing.category = input.category;
        existing.tags = input.tags;
        existing.people_involved = input.people_involved;
        existing.url = input.url;
        let updated = existing.clone();

        self.save_touchpoints(&touchpoints)?;

        tracing::info!(id = %updated.id, "touchpoint updated");
        Ok(updated)
    }

    /// Permanently remove touchpoint `id`.
    pub fn delete_touchpoint(&self, id: &str) -> StoreResult<()> {
        let _guard = self.write_touchpoints_lock()?;
        let mut touchpoints = self.load_touchpoints()?;

        let before = touchpoints.len();
        touchpoints.retain(|tp| tp.id != id);
        if touchpoints.len() == before {
            return Err(StoreError::not_found("touchpoint", id));
        }

        self.save_touchpoints(&touchpoints)?;

        tracing::info!(id, remaining = touchpoints.len(), "touchpoint deleted");
        Ok(())
    }

    /// Caller must hold the touchpoint lock.
    pub(crate) fn load_touchpoints(&self) -> StoreResult<Vec<Touchpoint>> {
        read_json(&self.touchpoints_path())
    }

    fn save_touchpoints(&self, touchpoints: &[Touchpoint]) -> StoreResult<()> {
        write_json(&self.touchpoints_path(), touchpoints)
    }
}

/// Check sanitized input against the registry snapshot.
fn validate(input: &CleanInput, metadata: &Metadata) -> StoreResult<()> {
    if input.description.is_empty() {
        return Err(StoreError::Validation("description is required".into()));
    }
    if !metadata.has_category(&input.category) {
        return Err(StoreError::Validation(format!(
            "unknown category: {}",
            input.category
        )));
    }
    if let Some(tag) = input.tags.iter().find(|t| !metadata.has_tag(t)) {
        return Err(StoreError::Validation(format!("unknown tag: {tag}")));
    }
    Ok(())
}
