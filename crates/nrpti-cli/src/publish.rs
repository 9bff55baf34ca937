//! # Publish CLI: Create a master + flavour record set.
//!
//! ```bash
//! nrpti publish Order record.json --actor "Lee Admin" --role admin:lng
//! cat record.json | nrpti publish Inspection - --actor Root --role sysadmin
//! ```
//!
//! Writes to PostgreSQL when `DATABASE_URL` is set, otherwise to an
//! in-memory store that is discarded on exit (a dry run). Prints the
//! published documents as JSON.
//!
//! Exit codes: 0 published, 1 rejected before anything was written,
//! 2 write failed and was rolled back, 3 write failed and the rollback left
//! orphaned documents.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;

use nrpti_core::{Actor, RecordType, Role};
use nrpti_publish::{
    BuilderCatalog, FlavourOrchestrator, Publication, PublishConfig, PublishError, RecordInput,
    Rollback,
};
use nrpti_store::{postgres::init_pool, DocumentStore, MemoryStore, PgDocumentStore};

/// Publish subcommand arguments.
#[derive(Args, Debug)]
pub struct PublishArgs {
    pub record_type: RecordType,

    /// Record input JSON file, or `-` for stdin.
    pub input: PathBuf,

    /// Display name recorded as `addedBy` / `publishedBy`.
    #[arg(long)]
    pub actor: String,

    /// Role held by the actor. Repeatable.
    #[arg(long = "role", required = true)]
    pub roles: Vec<String>,
}

impl PublishArgs {
    pub fn actor(&self) -> Actor {
        for raw in &self.roles {
            if raw.trim().parse::<Role>().is_err() {
                tracing::warn!(role = %raw, "ignoring unknown role");
            }
        }
        Actor::from_role_strings(self.actor.clone(), &self.roles)
    }
}

/// Open the store the configuration selects.
pub async fn open_store(config: &PublishConfig) -> Result<Arc<dyn DocumentStore>> {
    match &config.database_url {
        Some(url) => {
            let pool = init_pool(url, config.db_max_connections)
                .await
                .context("failed to connect to PostgreSQL")?;
            let store = PgDocumentStore::new(pool);
            store.ensure_schema().await?;
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; publishing to an in-memory store");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

/// Publish `input` through an orchestrator built from `config` over `store`.
pub async fn publish(
    args: &PublishArgs,
    input: RecordInput,
    config: &PublishConfig,
    store: Arc<dyn DocumentStore>,
) -> Result<Publication, PublishError> {
    let resolver = config
        .legislation_resolver()
        .map_err(|e| PublishError::Internal(format!("legislation table: {e}")))?;
    let orchestrator = FlavourOrchestrator::from_config(store, BuilderCatalog::new(resolver), config);
    orchestrator
        .create_record(&args.actor(), args.record_type, &input)
        .await
}

/// Exit code for a failed publication.
pub fn exit_code(err: &PublishError) -> u8 {
    match err.rollback() {
        _ if err.is_validation() => 1,
        Some(Rollback::Orphaned(_)) => 3,
        Some(Rollback::Clean { .. }) => 2,
        None => 1,
    }
}

/// Execute the publish subcommand.
pub fn run_publish(args: &PublishArgs, config: &PublishConfig) -> Result<u8> {
    let input = RecordInput::from_value(crate::read_json(&args.input)?)?;
    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    let outcome = runtime.block_on(async {
        let store = open_store(config).await?;
        anyhow::Ok(publish(args, input, config, store).await)
    })?;

    match outcome {
        Ok(publication) => {
            println!("{}", serde_json::to_string_pretty(&publication)?);
            Ok(0)
        }
        Err(err) => {
            eprintln!("publish failed: {err}");
            if let Some(rollback) = err.rollback() {
                eprintln!("rollback: {rollback}");
                for id in rollback.orphans() {
                    eprintln!("  orphaned: {id}");
                }
            }
            Ok(exit_code(&err))
        }
    }
}
