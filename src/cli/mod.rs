use clap::{Parser, Subcommand};
use tracing::info;

use crate::config::AppConfig;
use crate::database;

#[derive(Parser)]
#[command(name = "leadlist", about = "LeadList CRM backend", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the API server")]
    Serve {
        #[arg(long, help = "Port to listen on (overrides PORT)")]
        port: Option<u16>,
    },

    #[command(about = "Apply pending database migrations")]
    Migrate,

    #[command(about = "Seed demo accounts and default categories")]
    Seed,
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = AppConfig::from_env();

    match cli.command {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            crate::serve(config).await
        }
        Commands::Migrate => {
            let pool = database::connect(&config.database).await?;
            database::migrate(&pool).await?;
            Ok(())
        }
        Commands::Seed => {
            let pool = database::connect(&config.database).await?;
            database::migrate(&pool).await?;
            seed(&pool, &config).await
        }
    }
}

/// Idempotent bootstrap data: an admin account, a demo user, and a starter
/// set of categories.
async fn seed(pool: &sqlx::PgPool, config: &AppConfig) -> anyhow::Result<()> {
    seed_user(pool, config, "admin@leadlist.com", "admin123", "Admin User", "ADMIN").await?;
    seed_user(pool, config, "user@leadlist.com", "user123", "Test User", "USER").await?;

    let categories = [
        ("New Clients", "Potential new clients", "#3b82f6"),
        ("Existing Clients", "Active existing clients", "#10b981"),
        ("Partnerships", "Partnership opportunities", "#8b5cf6"),
        ("Referrals", "Referred clients", "#f59e0b"),
    ];

    for (name, description, color) in categories {
        let inserted = sqlx::query(
            "INSERT INTO categories (name, description, color) VALUES ($1, $2, $3) \
             ON CONFLICT (name) DO NOTHING",
        )
        .bind(name)
        .bind(description)
        .bind(color)
        .execute(pool)
        .await?;

        if inserted.rows_affected() > 0 {
            info!("Seeded category: {}", name);
        }
    }

    info!("Seed complete");
    Ok(())
}

async fn seed_user(
    pool: &sqlx::PgPool,
    config: &AppConfig,
    email: &str,
    password: &str,
    name: &str,
    role: &str,
) -> anyhow::Result<()> {
    let (existing,) =
        sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM users WHERE email = $1")
            .bind(email)
            .fetch_one(pool)
            .await?;

    if existing > 0 {
        info!("Seed user already exists: {}", email);
        return Ok(());
    }

    let password_hash = bcrypt::hash(password, config.security.bcrypt_cost)?;
    sqlx::query("INSERT INTO users (email, password, name, role) VALUES ($1, $2, $3, $4::user_role)")
        .bind(email)
        .bind(password_hash)
        .bind(name)
        .bind(role)
        .execute(pool)
        .await?;

    info!("Seeded user: {}", email);
    Ok(())
}
