//! PostgreSQL repository tests against a throwaway container with the real migrations.

use domain_users::{PostgresUserRepository, Role, User, UserFilter, UserRepository};
use test_utils::{TestDataBuilder, TestDatabase};

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_seeded_admin_is_found_case_insensitively() {
    let db = TestDatabase::new().await;
    let repo = PostgresUserRepository::new(db.connection());

    let admin = repo
        .get_by_email("SuperAdmin@Vascomm.co.id")
        .await
        .unwrap()
        .expect("seeded admin");

    assert_eq!(admin.role, Role::Admin);
    assert_eq!(admin.name, "Super Admin");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_soft_deleted_user_keeps_email_reserved() {
    let db = TestDatabase::new().await;
    let repo = PostgresUserRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("soft_delete");
    let email = builder.email("jane");

    let user = repo
        .create(User::new("Jane".into(), email.clone(), "hash".into(), Role::User))
        .await
        .unwrap();

    let deleted = repo.soft_delete(user.id).await.unwrap().expect("active user");
    assert!(deleted.is_deleted());

    assert!(repo.get_by_id(user.id).await.unwrap().is_none());
    assert!(repo.get_by_email(&email).await.unwrap().is_none());
    assert!(repo.email_exists(&email).await.unwrap());
    assert!(repo.soft_delete(user.id).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_list_search_and_paging() {
    let db = TestDatabase::new().await;
    let repo = PostgresUserRepository::new(db.connection());

    let all = repo.list(UserFilter::default()).await.unwrap();
    assert_eq!(all.len(), 2);

    let found = repo
        .list(UserFilter {
            search: Some("super".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(found.len(), 1);

    let page = repo
        .list(UserFilter {
            take: Some(1),
            skip: Some(1),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].id, all[1].id);
}
