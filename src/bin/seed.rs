use clap::Parser;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::faker::number::en::NumberWithFormat;
use fake::Fake;
use rand::seq::SliceRandom;
use rand::Rng;
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;

use repset::{
    domain::{CreateAddonRequest, CreateBookingRequest, CreateCouponRequest, CreateTrainerRequest, RecordPaymentRequest},
    notifications::NotificationCenter,
    service::ServiceContext,
};

#[derive(Parser)]
#[command(name = "seed", about = "Populate the database with demo catalog and sample checkout data")]
struct Args {
    /// Database to seed. Falls back to DATABASE_URL, then sqlite:repset.db.
    #[arg(long)]
    database_url: Option<String>,

    /// Number of sample customers to generate.
    #[arg(long, default_value_t = 4)]
    customers: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    println!("🌱 Starting database seeding...");

    let database_url = args
        .database_url
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .unwrap_or_else(|| "sqlite:repset.db".to_string());

    let db_pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    // Run migrations first
    println!("📋 Running migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await?;

    // No sinks registered: seeding should not notify anyone
    let notifications = Arc::new(NotificationCenter::new());
    let ctx = ServiceContext::new(db_pool, notifications, "Repset Fitness".to_string());

    // Seed membership plans
    println!("🏋️ Creating membership plans...");
    let plans = ctx.plan_service.seed_defaults().await?;
    println!("  ✅ Created {} plans", plans.len());

    // Seed add-on services
    println!("🧾 Creating add-on services...");
    let addons = vec![
        CreateAddonRequest {
            name: "Personal Training".to_string(),
            slug: None,
            description: Some("One-on-one session with a certified trainer".to_string()),
            price: 1500,
            duration_minutes: Some(60),
        },
        CreateAddonRequest {
            name: "Diet Consultation".to_string(),
            slug: None,
            description: Some("Personalised nutrition plan with our dietician".to_string()),
            price: 800,
            duration_minutes: Some(45),
        },
        CreateAddonRequest {
            name: "Physiotherapy Session".to_string(),
            slug: None,
            description: Some("Injury assessment and recovery session".to_string()),
            price: 1200,
            duration_minutes: Some(60),
        },
    ];
    let mut addon_slugs = Vec::new();
    for request in addons {
        let addon = ctx.addon_service.create(request).await?;
        addon_slugs.push(addon.slug);
    }
    println!("  ✅ Created {} add-on services", addon_slugs.len());

    // Seed trainers
    println!("💪 Creating trainers...");
    let trainers = vec![
        CreateTrainerRequest {
            name: "Arjun Mehta".to_string(),
            specialty: "Strength & Conditioning".to_string(),
            bio: Some("Former state-level powerlifter, coaching since 2015.".to_string()),
            photo_url: None,
            experience_years: 9,
        },
        CreateTrainerRequest {
            name: "Priya Nair".to_string(),
            specialty: "Yoga & Mobility".to_string(),
            bio: Some("RYT-500 certified, specialises in functional mobility.".to_string()),
            photo_url: None,
            experience_years: 7,
        },
        CreateTrainerRequest {
            name: "Sandeep Kulkarni".to_string(),
            specialty: "CrossFit".to_string(),
            bio: None,
            photo_url: None,
            experience_years: 5,
        },
    ];
    for request in trainers {
        ctx.trainer_service.create(request).await?;
    }
    println!("  ✅ Created 3 trainers");

    // Seed coupons
    println!("🏷️ Creating coupons...");
    ctx.coupon_service
        .create(CreateCouponRequest {
            code: "SAVE500".to_string(),
            discount: 500,
            valid_until: None,
        })
        .await?;
    ctx.coupon_service
        .create(CreateCouponRequest {
            code: "TRIAL100".to_string(),
            discount: 100,
            valid_until: Some(chrono::Utc::now() + chrono::Duration::days(30)),
        })
        .await?;
    println!("  ✅ Created 2 coupons (SAVE500, TRIAL100)");

    // Sample customers: bookings and payments in various states
    println!("👥 Creating {} sample customers...", args.customers);
    let mut rng = rand::thread_rng();
    let mut verified = 0usize;

    for i in 0..args.customers {
        let name: String = Name().fake();
        let email: String = SafeEmail().fake();
        let phone: String = NumberWithFormat("98########").fake();

        let plan = plans
            .choose(&mut rng)
            .ok_or_else(|| anyhow::anyhow!("no plans were seeded"))?;
        let coupon_code = if rng.gen_bool(0.5) {
            Some("SAVE500".to_string())
        } else {
            None
        };

        let payment = ctx
            .payment_service
            .record(RecordPaymentRequest {
                plan_slug: plan.slug.clone(),
                customer_name: name.clone(),
                customer_email: email.clone(),
                customer_phone: phone.clone(),
                coupon_code,
                transaction_note: None,
            })
            .await?;

        // Verify every other payment so both states show up in the admin list
        if i % 2 == 0 {
            ctx.payment_service.verify(payment.id).await?;
            verified += 1;
        }

        if let Some(slug) = addon_slugs.choose(&mut rng) {
            let booking = ctx
                .booking_service
                .place(CreateBookingRequest {
                    addon_slug: slug.clone(),
                    customer_name: name,
                    customer_email: email,
                    customer_phone: phone,
                    preferred_date: (chrono::Utc::now() + chrono::Duration::days(rng.gen_range(1..14)))
                        .date_naive(),
                    note: None,
                })
                .await?;

            if rng.gen_bool(0.5) {
                ctx.booking_service.confirm(booking.id).await?;
            }
        }
    }
    println!(
        "  ✅ Created {} payments ({} verified) and bookings",
        args.customers, verified
    );

    println!("\n✨ Database seeding complete!");
    println!("\n📝 Try it out:");
    println!("  GET  /public/plans");
    println!("  POST /public/payments  (plan_slug: \"{}\", coupon_code: \"SAVE500\")", plans[0].slug);
    println!("  Verified payments expose /public/payments/:id/receipt");

    Ok(())
}
