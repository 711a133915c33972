//! Replace the catalogue with sample data
//!
//! Seeds 5 categories and 20 products, each with three consecutive 30-day
//! price intervals starting today (the last one open-ended). Prices go through
//! the same timeline resolution as `POST /prices`.

use chrono::{Duration, Utc};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, Database, EntityTrait, Set};
use sea_orm_migration::MigratorTrait;

use pricebook_backend::config::Config;
use pricebook_backend::entities::{categories, prelude::*, products};
use pricebook_backend::services::pricing::set_price;
use pricebook_backend::services::timeline::PriceInterval;

const CATEGORY_NAMES: [&str; 5] = ["Electronics", "Books", "Clothing", "Home", "Toys"];
const PRODUCT_COUNT: usize = 20;
const INTERVALS_PER_PRODUCT: i64 = 3;
const INTERVAL_DAYS: i64 = 30;

const SKU_PREFIX: &str = "PRD";
const SKU_SUFFIX_LEN: usize = 6;
const SKU_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// "PRD" followed by six uppercase alphanumerics
fn generate_sku<R: Rng>(rng: &mut R) -> String {
    let suffix: String = (0..SKU_SUFFIX_LEN)
        .map(|_| SKU_CHARS[rng.gen_range(0..SKU_CHARS.len())] as char)
        .collect();
    format!("{}{}", SKU_PREFIX, suffix)
}

/// Price between 10.00 and 500.00
fn generate_price<R: Rng>(rng: &mut R) -> Decimal {
    Decimal::new(rng.gen_range(1_000..=50_000), 2)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    dotenvy::dotenv().ok();
    let config = Config::from_env();
    let db = Database::connect(&config.database_url).await?;
    migration::Migrator::up(&db, None).await?;

    PriceChangeHistory::delete_many().exec(&db).await?;
    Prices::delete_many().exec(&db).await?;
    Products::delete_many().exec(&db).await?;
    Categories::delete_many().exec(&db).await?;
    println!("Cleared existing catalogue");

    let mut category_ids = Vec::with_capacity(CATEGORY_NAMES.len());
    for name in CATEGORY_NAMES {
        let category = categories::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        }
        .insert(&db)
        .await?;
        category_ids.push(category.id);
    }
    println!("Created {} categories", category_ids.len());

    let mut rng = StdRng::from_entropy();
    let today = Utc::now().date_naive();
    for i in 1..=PRODUCT_COUNT {
        let category_id = *category_ids
            .choose(&mut rng)
            .ok_or("no categories to assign")?;
        let name = format!("Product {}", i);

        let product = products::ActiveModel {
            description: Set(Some(format!("This is a description for {}.", name))),
            name: Set(name),
            category_id: Set(category_id),
            sku: Set(generate_sku(&mut rng)),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        for j in 0..INTERVALS_PER_PRODUCT {
            let start = today + Duration::days(INTERVAL_DAYS * j);
            let end = (j < INTERVALS_PER_PRODUCT - 1).then(|| start + Duration::days(INTERVAL_DAYS - 1));
            let proposal = PriceInterval::new(product.id, generate_price(&mut rng), start, end);
            set_price(&db, &proposal).await?;
        }
    }
    println!(
        "Created {} products with {} price intervals each",
        PRODUCT_COUNT, INTERVALS_PER_PRODUCT
    );

    Ok(())
}
