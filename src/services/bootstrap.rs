//! # 관리자 계정 부트스트랩
//!
//! 새 사용자는 항상 `candidate` 역할로 생성되므로, 시드 없이는 관리자
//! 엔드포인트에 접근할 수 있는 계정이 존재하지 않습니다. 서버 시작 시
//! `ADMIN_EMAIL` / `ADMIN_PASSWORD`가 모두 설정되어 있으면 해당 계정을
//! 생성하고 admin으로 승격합니다.
//!
//! 멱등합니다: 이미 존재하는 이메일이면 생성을 건너뛰고 역할만 보장하며,
//! 비밀번호는 변경하지 않습니다 (비밀번호 재설정 용도가 아닙니다).

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};

use crate::db::users as db_users;
use crate::error::AppError;
use sqlx::SqlitePool;

/// 관리자 계정을 생성하거나 기존 계정을 admin으로 승격합니다.
///
/// 생성/승격된 사용자의 id를 반환합니다.
pub async fn ensure_admin(
    pool: &SqlitePool,
    email: &str,
    password: &str,
) -> Result<String, AppError> {
    let email = email.trim().to_lowercase();

    if let Some(user) = db_users::find_by_email(pool, &email).await? {
        if !user.is_admin() {
            db_users::set_role(pool, &user.id, "admin").await?;
            tracing::info!("Promoted existing user {} to admin", email);
        }
        return Ok(user.id);
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?
        .to_string();

    let user_id = uuid::Uuid::now_v7().to_string();
    let user = db_users::create_user(pool, &user_id, "Admin", &email, &password_hash).await?;
    db_users::set_role(pool, &user.id, "admin").await?;
    tracing::info!("Seeded admin account {}", email);

    Ok(user.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn seeds_a_usable_admin_account() {
        let pool = test_pool().await;

        let id = ensure_admin(&pool, "Admin@Example.com", "admin123456")
            .await
            .unwrap();

        // 이메일은 소문자로 저장되고 역할은 admin이어야 합니다
        let user = db_users::find_by_email(&pool, "admin@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.id, id);
        assert!(user.is_admin());
    }

    #[tokio::test]
    async fn is_idempotent_and_keeps_the_existing_password() {
        let pool = test_pool().await;

        let first = ensure_admin(&pool, "admin@example.com", "admin123456")
            .await
            .unwrap();
        let hash_before = db_users::find_by_id(&pool, &first)
            .await
            .unwrap()
            .unwrap()
            .password_hash;

        // 두 번째 호출은 새 계정을 만들지도, 비밀번호를 바꾸지도 않습니다
        let second = ensure_admin(&pool, "admin@example.com", "different-password")
            .await
            .unwrap();
        assert_eq!(first, second);

        let user = db_users::find_by_id(&pool, &first).await.unwrap().unwrap();
        assert_eq!(user.password_hash, hash_before);
        assert_eq!(db_users::count_candidates(&pool).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn promotes_an_existing_candidate() {
        let pool = test_pool().await;
        db_users::create_user(&pool, "u1", "A", "a@example.com", "h")
            .await
            .unwrap();

        let id = ensure_admin(&pool, "a@example.com", "ignored").await.unwrap();
        assert_eq!(id, "u1");

        let user = db_users::find_by_id(&pool, "u1").await.unwrap().unwrap();
        assert!(user.is_admin());
        // 기존 비밀번호 해시는 그대로입니다
        assert_eq!(user.password_hash, "h");
    }
}
