use crate::retrieval::cds_client::CdsClient;
use crate::retrieval::error::RetrievalError;
use crate::retrieval::loader::ReanalysisLoader;
use crate::retrieval::request::DataRequest;
use polars::prelude::LazyFrame;
use std::collections::{hash_map::Entry, HashMap};
use std::path::Path;
use tokio::sync::Mutex;

pub struct FrameFetcher {
    loader: ReanalysisLoader,
    lazyframe_cache: Mutex<HashMap<String, LazyFrame>>,
}

impl FrameFetcher {
    pub fn new(cache_dir: &Path, client: CdsClient) -> Self {
        Self {
            loader: ReanalysisLoader::new(cache_dir, client),
            lazyframe_cache: Mutex::new(HashMap::new()),
        }
    }

    /// Gets the LazyFrame for a request, using the in-memory cache if possible.
    pub async fn get_cache_lazyframe(
        &self,
        request: &DataRequest,
    ) -> Result<LazyFrame, RetrievalError> {
        let key = request.cache_slug();

        // Fast path: check if already in cache.
        {
            let cache = self.lazyframe_cache.lock().await;
            if let Some(cached_frame) = cache.get(&key) {
                return Ok(cached_frame.clone());
            }
            // Not in cache, release the lock before loading.
        }

        // Slow path: load the frame outside the lock.
        let loaded_frame = self.loader.get_frame(request).await?;

        // Use the Entry API to handle the race where another caller loaded
        // the same request while we were downloading.
        let mut cache = self.lazyframe_cache.lock().await;
        match cache.entry(key) {
            Entry::Occupied(entry) => Ok(entry.get().clone()),
            Entry::Vacant(entry) => {
                entry.insert(loaded_frame.clone());
                Ok(loaded_frame)
            }
        }
    }
}
