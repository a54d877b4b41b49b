//! Seed script for development — populates a fresh database with sample data.
//!
//! Usage: `cargo run --bin seed`
//!
//! Requires `DATABASE_URL` (reads .env). Inserts preset pattern configs for
//! two demo tenants plus one customized pattern, skipping rows that already
//! exist.

use sqlx::types::Json;
use sqlx::PgPool;

use numera::models::pattern_config::{default_preset, PlaceholderMap, SYSTEM_DEFAULT_NOTE};

const DEMO_TENANTS: &[&str] = &["A01", "B02"];
const DOCUMENT_TYPES: &[&str] = &["PR", "PO", "CN", "GRN", "SR", "PL"];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let db_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    // Run migrations first
    sqlx::migrate!("./migrations").run(&pool).await?;

    println!("=== numera Seed Script ===");

    seed_preset_configs(&pool).await?;
    seed_custom_config(&pool).await?;

    println!("\n=== Seed complete! ===");
    Ok(())
}

async fn seed_preset_configs(pool: &PgPool) -> anyhow::Result<()> {
    let mut inserted = 0u32;

    for tenant in DEMO_TENANTS {
        for document_type in DOCUMENT_TYPES {
            let (format, placeholders) = default_preset(document_type);
            let result = sqlx::query(
                "INSERT INTO pattern_configs (tenant_id, document_type, format, placeholders, note, created_by)
                 VALUES ($1, $2, $3, $4, $5, 'seed')
                 ON CONFLICT (tenant_id, document_type) WHERE deleted_at IS NULL DO NOTHING",
            )
            .bind(tenant)
            .bind(document_type)
            .bind(&format)
            .bind(Json(&placeholders))
            .bind(SYSTEM_DEFAULT_NOTE)
            .execute(pool)
            .await?;
            inserted += result.rows_affected() as u32;
        }
    }

    println!("[done] Seeded {inserted} preset pattern configs");
    Ok(())
}

/// A customized purchase-request pattern for the first demo tenant: yearly
/// period with a random suffix, e.g. `PR/2024/0042-XK`.
async fn seed_custom_config(pool: &PgPool) -> anyhow::Result<()> {
    let mut placeholders = PlaceholderMap::new();
    placeholders.insert("T".to_string(), "PR".to_string());
    placeholders.insert("Y".to_string(), "date('yyyy')".to_string());
    placeholders.insert("R".to_string(), "running(4,'0')".to_string());
    placeholders.insert("X".to_string(), "random(2,['A'-'Z'])".to_string());

    let result = sqlx::query(
        "UPDATE pattern_configs
         SET format = $3, placeholders = $4, note = 'customized demo pattern', updated_by = 'seed',
             updated_at = NOW()
         WHERE tenant_id = $1 AND document_type = $2 AND deleted_at IS NULL
           AND note = $5",
    )
    .bind(DEMO_TENANTS[0])
    .bind("PR")
    .bind("{T}/{Y}/{R}-{X}")
    .bind(Json(&placeholders))
    .bind(SYSTEM_DEFAULT_NOTE)
    .execute(pool)
    .await?;

    if result.rows_affected() > 0 {
        println!("[done] Customized PR pattern for tenant {}", DEMO_TENANTS[0]);
    } else {
        println!("[skip] PR pattern for tenant {} already customized", DEMO_TENANTS[0]);
    }
    Ok(())
}
