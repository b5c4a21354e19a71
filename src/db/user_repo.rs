use sqlx::PgPool;

use crate::auth::TelegramUser;
use crate::models::User;

/// Insert a user on first authentication or refresh profile fields on a
/// repeat one. Role is never touched here: promotion is an out-of-band
/// administrative action, not part of the login path. The unique constraint
/// on telegram_id makes concurrent first logins collapse into one row.
pub async fn upsert_user(pool: &PgPool, telegram_id: i64, profile: &TelegramUser) -> anyhow::Result<User> {
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (telegram_id, username, first_name, last_name, language_code, is_premium)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (telegram_id) DO UPDATE
            SET username = EXCLUDED.username,
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                language_code = EXCLUDED.language_code,
                is_premium = EXCLUDED.is_premium,
                updated_at = NOW()
        RETURNING *
        "#,
    )
    .bind(telegram_id)
    .bind(&profile.username)
    .bind(&profile.first_name)
    .bind(&profile.last_name)
    .bind(&profile.language_code)
    .bind(profile.is_premium)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

/// Fetch a user by Telegram id.
pub async fn get_user_by_telegram_id(pool: &PgPool, telegram_id: i64) -> anyhow::Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        "SELECT * FROM users WHERE telegram_id = $1",
    )
    .bind(telegram_id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}
