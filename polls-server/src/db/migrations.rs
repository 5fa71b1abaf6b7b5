//! Schema bootstrap for poll tables
//!
//! Idempotent `CREATE ... IF NOT EXISTS` statements run on startup.

use sqlx::PgPool;

use super::repos::DbError;

/// Create the question and choice tables if they are missing
pub async fn run(pool: &PgPool) -> Result<(), DbError> {
    tracing::info!("Running poll migrations...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS polls_question (
            id BIGSERIAL PRIMARY KEY,
            question_text VARCHAR(200) NOT NULL,
            pub_date TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS polls_choice (
            id BIGSERIAL PRIMARY KEY,
            question_id BIGINT NOT NULL REFERENCES polls_question(id) ON DELETE CASCADE,
            choice_text VARCHAR(200) NOT NULL,
            votes INTEGER NOT NULL DEFAULT 0 CHECK (votes >= 0)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_polls_question_pub_date ON polls_question(pub_date DESC)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_polls_choice_question ON polls_choice(question_id)",
    )
    .execute(pool)
    .await?;

    tracing::info!("Poll migrations complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_pool;

    #[tokio::test]
    #[ignore = "requires database"]
    async fn migrations_are_idempotent() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = create_pool(&url).await.expect("pool creation failed");

        run(&pool).await.expect("first run");
        run(&pool).await.expect("second run");
    }
}
