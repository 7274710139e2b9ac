use sqlx::SqlitePool;
use uuid::Uuid;

/// Creates an in-memory SQLite pool with migrations run
pub async fn create_test_pool() -> SqlitePool {
    ac_db::connection::connect_in_memory()
        .await
        .expect("Failed to create test pool")
}

/// Inserts a stub user for foreign key constraints
pub async fn create_test_user(pool: &SqlitePool, user_id: Uuid) {
    let id = user_id.to_string();
    let email = format!("test-{}@example.com", user_id);

    sqlx::query(
        "INSERT INTO users (id, email, created_at, updated_at) VALUES (?, ?, 0, 0)",
    )
    .bind(&id)
    .bind(&email)
    .execute(pool)
    .await
    .expect("Failed to create test user");
}

/// Inserts a stub account for foreign key constraints
pub async fn create_test_account(pool: &SqlitePool, account_id: Uuid) {
    let id = account_id.to_string();
    let name = format!("Test Account {}", account_id);

    sqlx::query(
        "INSERT INTO accounts (id, name, created_at, updated_at) VALUES (?, ?, 0, 0)",
    )
    .bind(&id)
    .bind(&name)
    .execute(pool)
    .await
    .expect("Failed to create test account");
}
