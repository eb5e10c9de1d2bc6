//! Recreate the database from scratch: drop every table, re-run the
//! migrations and reseed the genre list.
//!
//! Reads `DATABASE_URL` (default `sqlite://soundshelf.db`). Destroys all data.

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "soundshelf_db=info,soundshelf_setup=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://soundshelf.db".into());

    let pool = soundshelf_db::create_pool(&database_url)
        .await
        .with_context(|| format!("opening {database_url}"))?;

    soundshelf_db::reset_schema(&pool)
        .await
        .context("dropping tables")?;
    soundshelf_db::run_migrations(&pool)
        .await
        .context("running migrations")?;

    let genres = soundshelf_db::repositories::GenreRepo::list(&pool)
        .await
        .context("reading seeded genres")?;
    tracing::info!(
        url = %database_url,
        genres = ?genres.iter().map(|g| g.name.as_str()).collect::<Vec<_>>(),
        "Database recreated"
    );

    pool.close().await;
    Ok(())
}
