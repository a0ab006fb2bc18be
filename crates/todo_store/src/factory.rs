//! Construction of per-session stores from configuration.

use std::sync::Arc;

use crate::{
    Backend, Config, Database, IdGenerator, PasswordVerifier, SeedData, SequentialIdGenerator,
    Session, SessionTodoStore, SqlTodoStore, StoreResult, TodoStore,
};

/// Builds a [`TodoStore`] for each session, backed by the configured backend.
///
/// Create one factory per process and call [`StoreFactory::for_session`] for
/// every request.
pub enum StoreFactory {
    /// Durable SQL backend.
    Sql {
        /// Database connection pool.
        db: Database,
        /// Password verification capability.
        verifier: Arc<dyn PasswordVerifier>,
    },
    /// In-memory session backend.
    Session {
        /// Fixture copied into every new session.
        seed: SeedData,
        /// Identifier generator shared by all sessions.
        ids: Arc<dyn IdGenerator>,
    },
}

impl StoreFactory {
    /// Creates a factory for the configured backend.
    ///
    /// The SQL backend connects and creates missing tables; the session
    /// backend loads its seed fixture.
    pub async fn from_config(
        config: &Config,
        verifier: Arc<dyn PasswordVerifier>,
    ) -> StoreResult<Self> {
        tracing::info!(backend = %config.backend, "Creating todo store factory");

        match config.backend {
            Backend::Sqlite => {
                let db = Database::connect(&config.database_url, config.max_connections).await?;
                db.init_schema().await?;
                Ok(Self::Sql { db, verifier })
            }
            Backend::Session => {
                let seed = match &config.seed_path {
                    Some(path) => SeedData::load(path)?,
                    None => SeedData::builtin()?,
                };
                Ok(Self::session(seed))
            }
        }
    }

    /// Creates a session backend factory with its own identifier generator.
    pub fn session(seed: SeedData) -> Self {
        Self::Session {
            seed,
            ids: Arc::new(SequentialIdGenerator::new()),
        }
    }

    /// Returns the backend this factory builds stores for.
    pub fn backend(&self) -> Backend {
        match self {
            Self::Sql { .. } => Backend::Sqlite,
            Self::Session { .. } => Backend::Session,
        }
    }

    /// Builds a store scoped to the session's user.
    pub fn for_session(&self, session: &mut Session) -> Box<dyn TodoStore> {
        match self {
            Self::Sql { db, verifier } => Box::new(SqlTodoStore::new(
                db.clone(),
                session.username.clone(),
                Arc::clone(verifier),
            )),
            Self::Session { seed, ids } => {
                Box::new(SessionTodoStore::new(session, seed, Arc::clone(ids)))
            }
        }
    }
}
