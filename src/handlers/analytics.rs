use axum::{extract::State, Json};
use chrono::Utc;
use sqlx::SqlitePool;

use crate::{
    analytics,
    error::AppError,
    middleware::CurrentUser,
    models::{AnalyticsResponse, LeaderboardEntry, Task},
};

#[utoipa::path(
    get,
    path = "/analytics",
    responses(
        (status = 200, description = "Dashboard metrics for the current user", body = AnalyticsResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer" = [])
    )
)]
pub async fn dashboard(
    State(pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<AnalyticsResponse>, AppError> {
    let tasks = sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE user_email = ?")
        .bind(&user.email)
        .fetch_all(&pool)
        .await?;

    let dashboard =
        analytics::build_dashboard(&tasks, Utc::now().date_naive(), &mut rand::thread_rng());

    Ok(Json(dashboard))
}

#[utoipa::path(
    get,
    path = "/leaderboard",
    responses(
        (status = 200, description = "Users ranked by total streak", body = Vec<LeaderboardEntry>),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer" = [])
    )
)]
pub async fn leaderboard(
    State(pool): State<SqlitePool>,
    CurrentUser(_user): CurrentUser,
) -> Result<Json<Vec<LeaderboardEntry>>, AppError> {
    // Only completed tasks score; users without any still rank with 0.
    // Name is the tiebreak so equal totals list deterministically.
    let entries = sqlx::query_as::<_, LeaderboardEntry>(
        "SELECT u.name AS name, COALESCE(SUM(t.streak), 0) AS total_streak \
         FROM users u \
         LEFT JOIN tasks t ON t.user_email = u.email AND t.status = 'completed' \
         GROUP BY u.email, u.name \
         ORDER BY total_streak DESC, u.name ASC",
    )
    .fetch_all(&pool)
    .await?;

    Ok(Json(entries))
}
