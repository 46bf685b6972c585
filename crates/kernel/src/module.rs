use async_trait::async_trait;
use sqlx::PgPool;

/// Context provided to modules during initialization
pub struct InitCtx<'a> {
    pub settings: &'a crate::settings::Settings,
    pub db: &'a PgPool,
}

/// Schema change contributed by a module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    pub id: &'static str,
    pub up: &'static str,
}

/// Lifecycle trait implemented by every bookshelf module
#[async_trait]
pub trait Module: Sync + Send {
    /// Unique name for this module
    fn name(&self) -> &'static str;

    /// Called after migrations have been applied
    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Migrations contributed by this module, applied in the order returned
    fn migrations(&self) -> Vec<Migration> {
        vec![]
    }

    /// Release module resources during shutdown. The shared pool is not
    /// owned by modules and must not be closed here.
    async fn stop(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
