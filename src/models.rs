use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

// --- Domain Models (Mapped to DB) ---

#[derive(Debug, Serialize, FromRow, Clone, ToSchema)]
pub struct User {
    pub email: String,
    pub name: String,
    #[serde(skip)]
    pub hashed_password: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
pub enum Priority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Completed,
}

#[derive(Debug, Serialize, FromRow, Clone, ToSchema)]
pub struct Task {
    pub task_id: String,
    pub name: String,
    pub description: String,
    pub deadline: NaiveDate,
    pub priority: Priority,
    pub linked_goal: Option<String>,
    pub status: TaskStatus,
    pub streak: i64,
    pub created_at: NaiveDateTime,
    pub completed_at: Option<NaiveDateTime>,
    pub user_email: String,
}

// --- Request/Response DTOs ---

#[derive(Debug, Deserialize, ToSchema)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
    /// Display name of the authenticated user, for the caller's greeting.
    pub name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTask {
    pub task_id: String,
    pub name: String,
    pub description: String,
    pub deadline: NaiveDate,
    pub priority: Priority,
    pub linked_goal: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTask {
    pub name: Option<String>,
    pub description: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub priority: Option<Priority>,
    pub linked_goal: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CompleteTaskResponse {
    /// False when the task was already completed and the call was a no-op.
    pub newly_completed: bool,
    pub message: String,
    pub task: Task,
}

// --- Analytics / leaderboard shapes ---

#[derive(Debug, Clone, Serialize, PartialEq, ToSchema)]
pub struct DistributionSlice {
    pub label: String,
    pub value: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq, ToSchema)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub completed: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq, ToSchema)]
pub struct ActivityPoint {
    pub t: f64,
    pub value: f64,
}

/// Decorative filler series. `demo` is always true so no client mistakes
/// it for stored data.
#[derive(Debug, Clone, Serialize, PartialEq, ToSchema)]
pub struct SampleSeries {
    pub demo: bool,
    pub points: Vec<ActivityPoint>,
}

#[derive(Debug, Clone, Serialize, PartialEq, ToSchema)]
pub struct AnalyticsResponse {
    pub completed: i64,
    pub pending: i64,
    /// Percentage in [0, 100]; 0.0 when the user has no tasks.
    pub completion_rate: f64,
    pub distribution: Vec<DistributionSlice>,
    pub completion_trend: Vec<TrendPoint>,
    pub sample_activity: SampleSeries,
}

#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LeaderboardEntry {
    pub name: String,
    pub total_streak: i64,
}

// Claims para JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Email del usuario
    pub exp: usize,
}
