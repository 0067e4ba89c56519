//! Metadata registry: the sets of valid categories and tags.
//!
//! No in-memory cache; every call re-reads `metadata.json`. Removing a name
//! does not touch touchpoints that already reference it.

use super::types::Metadata;
use super::{read_json, write_json, Store, StoreError, StoreResult};

#[derive(Debug, Clone, Copy)]
enum Vocabulary {
    Category,
    Tag,
}

impl Vocabulary {
    fn kind(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Tag => "tag",
        }
    }

    fn names(self, metadata: &mut Metadata) -> &mut Vec<String> {
        match self {
            Self::Category => &mut metadata.categories,
            Self::Tag => &mut metadata.tags,
        }
    }
}

impl Store {
    /// Snapshot of the registry, read fresh from disk.
    pub fn get_metadata(&self) -> StoreResult<Metadata> {
        let _guard = self.read_metadata_lock()?;
        read_json(&self.metadata_path())
    }

    pub fn add_category(&self, name: &str) -> StoreResult<()> {
        self.add_name(Vocabulary::Category, name)
    }

    pub fn remove_category(&self, name: &str) -> StoreResult<()> {
        self.remove_name(Vocabulary::Category, name)
    }

    pub fn add_tag(&self, name: &str) -> StoreResult<()> {
        self.add_name(Vocabulary::Tag, name)
    }

    pub fn remove_tag(&self, name: &str) -> StoreResult<()> {
        self.remove_name(Vocabulary::Tag, name)
    }

    fn add_name(&self, vocabulary: Vocabulary, name: &str) -> StoreResult<()> {
        let kind = vocabulary.kind();
        if name.is_empty() {
            return Err(StoreError::Validation(format!("{kind} name is required")));
        }

        let _guard = self.write_metadata_lock()?;
        let mut metadata: Metadata = read_json(&self.metadata_path())?;
        let names = vocabulary.names(&mut metadata);
        if names.iter().any(|n| n == name) {
            return Err(StoreError::already_exists(kind, name));
        }
        names.push(name.to_string());
        write_json(&self.metadata_path(), &metadata)?;

        tracing::info!(kind, name, "metadata entry added");
        Ok(())
    }

    fn remove_name(&self, vocabulary: Vocabulary, name: &str) -> StoreResult<()> {
        let kind = vocabulary.kind();
        if name.is_empty() {
            return Err(StoreError::Validation(format!("{kind} name is required")));
        }

        let _guard = self.write_metadata_lock()?;
        let mut metadata: Metadata = read_json(&self.metadata_path())?;
        let names = vocabulary.names(&mut metadata);
        let Some(pos) = names.iter().position(|n| n == name) else {
            return Err(StoreError::not_found(kind, name));
        };
        names.remove(pos);
        write_json(&self.metadata_path(), &metadata)?;

        tracing::info!(kind, name, "metadata entry removed");
        Ok(())
    }
}
