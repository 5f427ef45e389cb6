use crate::config::settings::AppConfig;
use crate::infrastructure::storage::downloads::DownloadStore;
use crate::modules::jobs::repository::JobRepository;
use crate::workers::pipeline::JobQueue;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub jobs: JobRepository,
    pub storage: DownloadStore,
    pub queue: JobQueue,
}

impl AppState {
    pub fn new(config: AppConfig, storage: DownloadStore) -> Self {
        Self {
            config,
            jobs: JobRepository::new(),
            storage,
            queue: JobQueue::new(),
        }
    }
}
