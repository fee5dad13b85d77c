use cartasmart_api::{
    config::{init_tracing, load_config},
    db::{close_pool, establish_connection_from_app_config},
    migrator::Migrator,
};
use clap::{Parser, Subcommand};
use sea_orm_migration::MigratorTrait;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "migration", about = "Manage the CartaSmart database schema")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Clone, Copy)]
enum Command {
    /// Apply all pending migrations (default)
    Up,
    /// Roll back the most recent migration
    Down,
    /// Drop every table and re-apply all migrations
    Fresh,
    /// List applied and pending migrations
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = load_config()?;
    init_tracing(cfg.log_level(), cfg.log_json);

    info!("Connecting to database");
    let db = establish_connection_from_app_config(&cfg).await?;

    let command = cli.command.unwrap_or(Command::Up);
    let result = match command {
        Command::Up => Migrator::up(&db, None).await,
        Command::Down => Migrator::down(&db, Some(1)).await,
        Command::Fresh => Migrator::fresh(&db).await,
        Command::Status => Migrator::status(&db).await,
    };

    if let Err(e) = result {
        error!("Migration command failed: {}", e);
        close_pool(db).await?;
        return Err(e.into());
    }

    info!("Migration command completed");
    close_pool(db).await?;
    Ok(())
}
