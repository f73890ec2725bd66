use repset::{
    domain::{CreateMembershipPlanRequest, PlanDuration},
    repository::{MembershipPlanRepository, SqliteMembershipPlanRepository},
};
use sqlx::SqlitePool;

#[tokio::test]
async fn test_plan_crud() -> anyhow::Result<()> {
    // Create an in-memory SQLite database
    let pool = SqlitePool::connect(":memory:").await?;

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await?;

    // Create repository
    let repo = SqliteMembershipPlanRepository::new(pool.clone());

    // Test Create
    let create_request = CreateMembershipPlanRequest {
        name: "Pro".to_string(),
        slug: None,
        description: Some("Our most popular plan".to_string()),
        duration: "quarterly".to_string(),
        price: 3999,
        perks: vec!["All equipment".to_string(), "Group classes".to_string()],
    };

    let plan = repo.create(create_request).await?;
    assert_eq!(plan.name, "Pro");
    assert_eq!(plan.slug, "pro");
    assert_eq!(plan.duration, PlanDuration::Quarterly);
    assert_eq!(plan.price, 3999);
    assert!(plan.is_active);

    // Test Find by ID
    let found = repo.find_by_id(plan.id).await?;
    assert!(found.is_some());
    assert_eq!(found.unwrap().id, plan.id);

    // Test Find by Slug
    let found_by_slug = repo.find_by_slug("pro").await?;
    assert!(found_by_slug.is_some());
    assert_eq!(found_by_slug.unwrap().perks.len(), 2);

    // Test List
    let plans = repo.list(false).await?;
    assert_eq!(plans.len(), 1);

    // Test Update
    let update = repset::domain::UpdateMembershipPlanRequest {
        price: Some(4499),
        is_active: Some(false),
        ..Default::default()
    };

    let updated = repo.update(plan.id, update).await?;
    assert_eq!(updated.price, 4499);
    assert!(!updated.is_active);

    // Inactive plans drop out of the default listing
    let active_only = repo.list(false).await?;
    assert!(active_only.is_empty());
    let all = repo.list(true).await?;
    assert_eq!(all.len(), 1);

    // Test Delete
    repo.delete(plan.id).await?;
    let deleted = repo.find_by_id(plan.id).await?;
    assert!(deleted.is_none());

    Ok(())
}

#[tokio::test]
async fn test_plan_seed_and_reorder() -> anyhow::Result<()> {
    let pool = SqlitePool::connect(":memory:").await?;
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await?;

    let repo = SqliteMembershipPlanRepository::new(pool.clone());

    let seeded = repo.seed_defaults().await?;
    assert_eq!(seeded.len(), 3);

    // Seeding twice must not duplicate; the second call has nothing to add
    let reseeded = repo.seed_defaults().await?;
    assert!(reseeded.is_empty());
    assert_eq!(repo.list(false).await?.len(), 3);

    // Reverse the display order
    let mut ids: Vec<_> = seeded.iter().map(|p| p.id).collect();
    ids.reverse();
    repo.reorder(&ids).await?;

    let listed = repo.list(false).await?;
    let listed_ids: Vec<_> = listed.iter().map(|p| p.id).collect();
    assert_eq!(listed_ids, ids);

    Ok(())
}
