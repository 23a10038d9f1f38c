//! Best score persistence
//!
//! The session only talks to `BestScoreStore`. LocalStorage backs it in the
//! browser; an in-memory store backs native runs and tests. A remote profile
//! service would be another implementation of the same trait.

use crate::error::StoreError;

/// Where the best score lives
pub trait BestScoreStore {
    fn read_best(&self) -> Result<u32, StoreError>;
    fn write_best(&mut self, score: u32) -> Result<(), StoreError>;
}

/// Persist `score` if it beats the stored best
///
/// Returns whether a new best was written.
pub fn record_best(store: &mut dyn BestScoreStore, score: u32) -> Result<bool, StoreError> {
    let previous = store.read_best()?;
    if score <= previous {
        return Ok(false);
    }
    store.write_best(score)?;
    log::info!("New best score: {} (was {})", score, previous);
    Ok(true)
}

/// Process-local store
#[derive(Debug, Clone, Default)]
pub struct MemoryBestScore {
    best: u32,
}

impl MemoryBestScore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_best(best: u32) -> Self {
        Self { best }
    }

    pub fn best(&self) -> u32 {
        self.best
    }
}

impl BestScoreStore for MemoryBestScore {
    fn read_best(&self) -> Result<u32, StoreError> {
        Ok(self.best)
    }

    fn write_best(&mut self, score: u32) -> Result<(), StoreError> {
        self.best = score;
        Ok(())
    }
}

/// LocalStorage-backed store
#[derive(Debug, Clone, Default)]
pub struct LocalBestScore;

impl LocalBestScore {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "maxPuntos";

    pub fn new() -> Self {
        Self
    }
}

/// Parse a stored value; anything unreadable counts as no best yet
pub fn parse_stored_best(raw: Option<&str>) -> u32 {
    raw.and_then(|s| s.trim().parse::<u32>().ok()).unwrap_or(0)
}

#[cfg(target_arch = "wasm32")]
impl LocalBestScore {
    fn storage() -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| StoreError::new("LocalStorage unavailable"))
    }
}

#[cfg(target_arch = "wasm32")]
impl BestScoreStore for LocalBestScore {
    fn read_best(&self) -> Result<u32, StoreError> {
        let storage = Self::storage()?;
        let raw = storage
            .get_item(Self::STORAGE_KEY)
            .map_err(|_| StoreError::new("could not read best score"))?;
        Ok(parse_stored_best(raw.as_deref()))
    }

    fn write_best(&mut self, score: u32) -> Result<(), StoreError> {
        let storage = Self::storage()?;
        storage
            .set_item(Self::STORAGE_KEY, &score.to_string())
            .map_err(|_| StoreError::new("could not save best score"))
    }
}

/// Native stub: there is nowhere to persist to
#[cfg(not(target_arch = "wasm32"))]
impl BestScoreStore for LocalBestScore {
    fn read_best(&self) -> Result<u32, StoreError> {
        Err(StoreError::new("LocalStorage unavailable"))
    }

    fn write_best(&mut self, _score: u32) -> Result<(), StoreError> {
        Err(StoreError::new("LocalStorage unavailable"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingStore;

    impl BestScoreStore for FailingStore {
        fn read_best(&self) -> Result<u32, StoreError> {
            Err(StoreError::new("offline"))
        }

        fn write_best(&mut self, _score: u32) -> Result<(), StoreError> {
            Err(StoreError::new("offline"))
        }
    }

    #[test]
    fn test_record_best_only_on_improvement() {
        let mut store = MemoryBestScore::with_best(20);
        assert!(!record_best(&mut store, 15).unwrap());
        assert!(!record_best(&mut store, 20).unwrap());
        assert_eq!(store.best(), 20);
        assert!(record_best(&mut store, 21).unwrap());
        assert_eq!(store.best(), 21);
    }

    #[test]
    fn test_record_best_surfaces_errors() {
        let err = record_best(&mut FailingStore, 10).unwrap_err();
        assert_eq!(err.message, "offline");
    }

    #[test]
    fn test_parse_stored_best() {
        assert_eq!(parse_stored_best(None), 0);
        assert_eq!(parse_stored_best(Some("42")), 42);
        assert_eq!(parse_stored_best(Some(" 7 ")), 7);
        assert_eq!(parse_stored_best(Some("garbage")), 0);
        assert_eq!(parse_stored_best(Some("-3")), 0);
    }
}
