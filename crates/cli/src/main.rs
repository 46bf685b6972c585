use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;

use bookshelf_app::books::models::{
    AddBookRequest, DeleteBookRequest, GetBookRequest, GetBooksRequest,
};
use bookshelf_kernel::{settings::Settings, Ctx, InitCtx, ModuleRegistry};

/// Catalog books in a Postgres-backed bookshelf.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending schema migrations.
    Migrate,
    #[command(flatten)]
    Book(BookCommand),
}

#[derive(Subcommand)]
enum BookCommand {
    /// Add a book to the catalog.
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        author: String,
    },
    /// Show a single book.
    Get { id: i64 },
    /// List every book in insertion order.
    List,
    /// Remove a book. Removing a missing book is not an error.
    Delete { id: i64 },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load bookshelf settings")?;
    bookshelf_telemetry::init(&settings.telemetry)?;

    tracing::debug!(env = ?settings.environment, "bookshelf cli starting");

    let pool = bookshelf_db::connect(&settings.database)
        .await
        .with_context(|| "failed to connect to database")?;

    let mut registry = ModuleRegistry::new();
    bookshelf_app::register_all(&mut registry);

    let result = run(cli.command, &settings, &registry, pool.clone()).await;

    registry.stop_all().await?;
    pool.close().await;
    result
}

async fn run(
    command: Commands,
    settings: &Settings,
    registry: &ModuleRegistry,
    pool: sqlx::PgPool,
) -> anyhow::Result<()> {
    match command {
        Commands::Migrate => {
            let applied = bookshelf_db::run_migrations(&pool, &registry.collect_migrations())
                .await
                .with_context(|| "migrate")?;
            tracing::info!(applied, "migrations complete");
            Ok(())
        }
        Commands::Book(command) => {
            registry
                .init_all(&InitCtx {
                    settings,
                    db: &pool,
                })
                .await?;
            run_book(command, settings, pool).await
        }
    }
}

async fn run_book(
    command: BookCommand,
    settings: &Settings,
    pool: sqlx::PgPool,
) -> anyhow::Result<()> {
    let svc = bookshelf_app::books::postgres_service(pool);
    let ctx = Ctx::with_timeout(settings.database.statement_timeout());

    match command {
        BookCommand::Add { title, author } => {
            let resp = svc
                .add_book(&ctx, AddBookRequest { title, author })
                .await
                .with_context(|| "add")?;
            print_json(&resp)
        }
        BookCommand::Get { id } => {
            let resp = svc
                .get_book(&ctx, GetBookRequest { id })
                .await
                .with_context(|| "get")?;
            print_json(&resp)
        }
        BookCommand::List => {
            let resp = svc
                .get_books(&ctx, GetBooksRequest {})
                .await
                .with_context(|| "list")?;
            print_json(&resp)
        }
        BookCommand::Delete { id } => {
            let resp = svc
                .delete_book(&ctx, DeleteBookRequest { id })
                .await
                .with_context(|| "delete")?;
            print_json(&resp)
        }
    }
}

fn print_json<T: Serialize>(body: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(body)?);
    Ok(())
}
