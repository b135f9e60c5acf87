use hotel_booking::domain::entities::NewUser;
use hotel_booking::domain::repositories::UserRepository;
use hotel_booking::error::AppError;
use hotel_booking::infrastructure::persistence::PgUserRepository;
use sqlx::PgPool;
use std::sync::Arc;

fn new_user(email: &str) -> NewUser {
    NewUser {
        email: email.to_string(),
        password_hash: "hash".to_string(),
        first_name: "Ana".to_string(),
        last_name: "Silva".to_string(),
        country: None,
        city: None,
        phone: None,
        image_url: None,
        is_admin: false,
    }
}

#[sqlx::test]
async fn test_email_is_stored_lowercase(pool: PgPool) {
    let repo = PgUserRepository::new(Arc::new(pool));

    let user = repo.create(new_user("Ana@Example.COM")).await.unwrap();

    assert_eq!(user.email, "ana@example.com");
    let found = repo.find_by_email("ana@example.com").await.unwrap();
    assert_eq!(found.map(|u| u.id), Some(user.id));
}

#[sqlx::test]
async fn test_duplicate_email_is_conflict(pool: PgPool) {
    let repo = PgUserRepository::new(Arc::new(pool));
    repo.create(new_user("ana@example.com")).await.unwrap();

    let err = repo.create(new_user("ANA@example.com")).await.unwrap_err();

    assert!(matches!(err, AppError::Conflict { .. }));
}
