use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::{
    config::Config,
    repository::{AttemptHistoryStore, PgAttemptStore, PgCatalog, QuizCatalog, UserDirectory},
    services::{AttemptQueryService, AttemptRecorder, HistoryRetentionPolicy, QuizEvaluator},
};

#[derive(Clone)]
pub struct AppState {
    pub evaluator: QuizEvaluator,
    pub queries: AttemptQueryService,
    pub users: Arc<dyn UserDirectory>,
    pub config: Config,
}

impl AppState {
    pub fn new(
        store: Arc<dyn AttemptHistoryStore>,
        catalog: Arc<dyn QuizCatalog>,
        users: Arc<dyn UserDirectory>,
        config: Config,
    ) -> Self {
        let recorder = AttemptRecorder::new(
            store.clone(),
            HistoryRetentionPolicy::new(config.history_cap),
        );

        Self {
            evaluator: QuizEvaluator::new(catalog.clone(), recorder),
            queries: AttemptQueryService::new(store, catalog),
            users,
            config,
        }
    }

    /// State backed entirely by the Postgres pool.
    pub fn postgres(pool: PgPool, config: Config) -> Self {
        let catalog = Arc::new(PgCatalog::new(pool.clone()));
        Self::new(
            Arc::new(PgAttemptStore::new(pool)),
            catalog.clone(),
            catalog,
            config,
        )
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
