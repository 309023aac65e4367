use std::sync::Arc;

use crate::{config::AppConfig, db, store::RecordStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let pool = db::connect(&config).await?;
        let store = Arc::new(db::PgStore::new(pool)) as Arc<dyn RecordStore>;
        Ok(Self::from_parts(store, Arc::new(config)))
    }

    pub fn from_parts(store: Arc<dyn RecordStore>, config: Arc<AppConfig>) -> Self {
        Self { store, config }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        Self::with_store(Arc::new(crate::store::memory::MemoryStore::default()))
    }

    #[cfg(test)]
    pub fn with_store(store: Arc<dyn RecordStore>) -> Self {
        let config = AppConfig::from_lookup(|_| None);
        Self::from_parts(store, Arc::new(config))
    }
}
