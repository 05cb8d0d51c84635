//! Seed a demo workspace and print a development access token.
//!
//! ```text
//! DATABASE_URL=... JWT_SECRET=... cargo run --bin flux-seed
//! ```
//!
//! `SEED_EMAIL` / `SEED_NAME` choose the demo user (default
//! `demo@flux.dev` / `Demo User`). Re-running resets that user's nodes.

use anyhow::Context;
use flux_api::auth::jwt::{generate_access_token, JwtConfig};
use flux_db::models::user::CreateUser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flux_db=info,flux_seed=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let jwt = JwtConfig::from_env();
    let owner = CreateUser {
        email: std::env::var("SEED_EMAIL").unwrap_or_else(|_| "demo@flux.dev".into()),
        name: std::env::var("SEED_NAME").unwrap_or_else(|_| "Demo User".into()),
    };

    let pool = flux_db::create_pool(&database_url)
        .await
        .context("Failed to connect to database")?;
    flux_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let summary = flux_db::seed::seed_demo_workspace(&pool, &owner)
        .await
        .context("Failed to seed demo workspace")?;
    let token = generate_access_token(summary.user.id, &jwt).context("Failed to sign token")?;

    println!(
        "Seeded {} nodes for {} (user id {})",
        summary.created, summary.user.email, summary.user.id
    );
    if summary.cleared > 0 {
        println!("Removed {} nodes from a previous seed", summary.cleared);
    }
    println!("Access token ({} min):\n{token}", jwt.access_token_expiry_mins);

    pool.close().await;
    Ok(())
}
