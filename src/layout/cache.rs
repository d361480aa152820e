/*!
 * Memoization of line-wrap results.
 *
 * The same caption text is re-wrapped many times across highlight
 * sub-intervals and fit tests, so wrap results are cached per run, keyed
 * by the exact style/text tuple. Entries are returned by clone so callers
 * cannot mutate the shared cache state.
 */

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use log::debug;
use parking_lot::RwLock;

use crate::errors::LayoutError;

use super::measure::TextStyle;
use super::wrap::WrapResult;

/// Cache key combining the text with every style input that affects wrapping.
///
/// Equality is structural; two equal keys must always produce equal wrap
/// results within a run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WrapKey {
    /// Text being wrapped
    text: String,

    /// Resolved font path
    font: PathBuf,

    /// Font size in pixels
    font_size: u32,

    /// Stroke width in pixels
    stroke_width: u32,

    /// Bounding box width in pixels
    frame_width: u32,
}

impl WrapKey {
    /// Create a new wrap cache key
    pub fn new(text: &str, style: &TextStyle, frame_width: u32) -> Self {
        Self {
            text: text.to_string(),
            font: style.font.clone(),
            font_size: style.font_size,
            stroke_width: style.stroke_width,
            frame_width,
        }
    }
}

/// Per-run cache for wrap results
pub struct LayoutCache {
    /// Internal cache storage
    wraps: Arc<RwLock<HashMap<WrapKey, WrapResult>>>,

    /// Cache hit counter
    hits: Arc<RwLock<usize>>,

    /// Cache miss counter
    misses: Arc<RwLock<usize>>,
}

impl LayoutCache {
    /// Create a new, empty layout cache
    pub fn new() -> Self {
        Self {
            wraps: Arc::new(RwLock::new(HashMap::new())),
            hits: Arc::new(RwLock::new(0)),
            misses: Arc::new(RwLock::new(0)),
        }
    }

    /// Return the cached wrap result for `key`, computing and storing it on
    /// a miss. The returned value is a copy; mutating it does not affect
    /// the cache.
    ///
    /// Concurrent callers may race on the same key and compute twice; the
    /// compute function is pure, so the duplicate work is wasteful but
    /// harmless.
    pub fn get_or_compute<F>(&self, key: WrapKey, compute: F) -> Result<WrapResult, LayoutError>
    where
        F: FnOnce() -> Result<WrapResult, LayoutError>,
    {
        if let Some(found) = self.wraps.read().get(&key) {
            let mut hits = self.hits.write();
            *hits += 1;
            return Ok(found.clone());
        }

        let mut misses = self.misses.write();
        *misses += 1;
        drop(misses);

        let value = compute()?;
        self.wraps.write().insert(key, value.clone());

        Ok(value)
    }

    /// Get cache statistics
    pub fn stats(&self) -> (usize, usize, f64) {
        let hits = *self.hits.read();
        let misses = *self.misses.read();
        let total = hits + misses;

        let hit_rate = if total > 0 {
            hits as f64 / total as f64
        } else {
            0.0
        };

        (hits, misses, hit_rate)
    }

    /// Clear the cache between independent runs
    pub fn clear(&self) {
        let mut wraps = self.wraps.write();
        wraps.clear();

        let mut hits = self.hits.write();
        *hits = 0;

        let mut misses = self.misses.write();
        *misses = 0;

        debug!("Layout cache cleared");
    }

    /// Get the number of entries in the cache
    pub fn len(&self) -> usize {
        self.wraps.read().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.wraps.read().is_empty()
    }
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LayoutCache {
    fn clone(&self) -> Self {
        Self {
            wraps: self.wraps.clone(),
            hits: self.hits.clone(),
            misses: self.misses.clone(),
        }
    }
}
