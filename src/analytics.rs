use chrono::{Duration, NaiveDate};
use rand::Rng;

use crate::models::{
    ActivityPoint, AnalyticsResponse, DistributionSlice, SampleSeries, Task, TaskStatus,
    TrendPoint,
};

const TREND_DAYS: usize = 10;
const ACTIVITY_POINTS: usize = 100;

/// Aggregates one user's already-fetched tasks into chart-ready form.
/// Pure over its inputs; never touches the store.
pub fn build_dashboard(tasks: &[Task], today: NaiveDate, rng: &mut impl Rng) -> AnalyticsResponse {
    let completed = tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Completed)
        .count() as i64;
    let pending = tasks.len() as i64 - completed;

    AnalyticsResponse {
        completed,
        pending,
        completion_rate: completion_rate(completed, pending),
        distribution: vec![
            DistributionSlice {
                label: "completed".to_string(),
                value: completed,
            },
            DistributionSlice {
                label: "pending".to_string(),
                value: pending,
            },
        ],
        completion_trend: completion_trend(tasks, today),
        sample_activity: sample_activity(rng),
    }
}

pub fn completion_rate(completed: i64, pending: i64) -> f64 {
    let total = completed + pending;
    if total == 0 {
        return 0.0;
    }
    completed as f64 / total as f64 * 100.0
}

/// Completions per day over the trailing window, derived from each task's
/// completion timestamp.
fn completion_trend(tasks: &[Task], today: NaiveDate) -> Vec<TrendPoint> {
    let mut points = Vec::with_capacity(TREND_DAYS);
    for offset in (0..TREND_DAYS).rev() {
        let date = today - Duration::days(offset as i64);
        let completed = tasks
            .iter()
            .filter(|t| t.completed_at.map(|at| at.date()) == Some(date))
            .count() as i64;
        points.push(TrendPoint { date, completed });
    }
    points
}

/// ECG-style filler wave: a low sine baseline with a handful of random
/// spikes. Pure decoration for the dashboard's "activity monitor" widget.
fn sample_activity(rng: &mut impl Rng) -> SampleSeries {
    let mut peaks = [0.0f64; ACTIVITY_POINTS];
    for _ in 0..5 {
        let pos = rng.gen_range(0..ACTIVITY_POINTS - 3);
        peaks[pos] = 0.8;
        peaks[pos + 1] = 1.0;
        peaks[pos + 2] = 0.8;
    }

    let points = (0..ACTIVITY_POINTS)
        .map(|i| {
            let t = i as f64 / (ACTIVITY_POINTS - 1) as f64 * 4.0 * std::f64::consts::PI;
            ActivityPoint {
                t,
                value: t.sin() * 0.2 + peaks[i],
            }
        })
        .collect();

    SampleSeries { demo: true, points }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;
    use chrono::NaiveDateTime;
    use rand::{rngs::StdRng, SeedableRng};

    fn task(task_id: &str, status: TaskStatus, completed_at: Option<NaiveDateTime>) -> Task {
        Task {
            task_id: task_id.to_string(),
            name: format!("task {task_id}"),
            description: "fixture".to_string(),
            deadline: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
            priority: Priority::Medium,
            linked_goal: None,
            status,
            streak: if status == TaskStatus::Completed { 1 } else { 0 },
            created_at: NaiveDate::from_ymd_opt(2026, 1, 1)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            completed_at,
            user_email: "fixture@example.com".to_string(),
        }
    }

    #[test]
    fn rate_is_zero_without_tasks() {
        assert_eq!(completion_rate(0, 0), 0.0);
    }

    #[test]
    fn dashboard_counts_and_rate() {
        let tasks = vec![
            task("a", TaskStatus::Completed, None),
            task("b", TaskStatus::Pending, None),
            task("c", TaskStatus::Pending, None),
            task("d", TaskStatus::Completed, None),
        ];
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let dashboard = build_dashboard(&tasks, today, &mut StdRng::seed_from_u64(7));

        assert_eq!(dashboard.completed, 2);
        assert_eq!(dashboard.pending, 2);
        assert_eq!(dashboard.completion_rate, 50.0);
        assert_eq!(dashboard.distribution[0].value, 2);
        assert_eq!(dashboard.distribution[1].value, 2);
    }

    #[test]
    fn empty_dashboard_has_no_rate_fault() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let dashboard = build_dashboard(&[], today, &mut StdRng::seed_from_u64(7));

        assert_eq!(dashboard.completed, 0);
        assert_eq!(dashboard.pending, 0);
        assert_eq!(dashboard.completion_rate, 0.0);
    }

    #[test]
    fn trend_buckets_completions_by_day() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let two_days_ago = (today - Duration::days(2)).and_hms_opt(14, 30, 0).unwrap();
        let tasks = vec![
            task("a", TaskStatus::Completed, Some(two_days_ago)),
            task("b", TaskStatus::Completed, Some(two_days_ago)),
            task("c", TaskStatus::Pending, None),
        ];

        let trend = completion_trend(&tasks, today);
        assert_eq!(trend.len(), TREND_DAYS);
        assert_eq!(trend.last().unwrap().date, today);

        let bucket = trend
            .iter()
            .find(|p| p.date == today - Duration::days(2))
            .expect("missing day");
        assert_eq!(bucket.completed, 2);
        assert_eq!(trend.iter().map(|p| p.completed).sum::<i64>(), 2);
    }

    #[test]
    fn sample_activity_is_marked_demo_and_bounded() {
        let series = sample_activity(&mut StdRng::seed_from_u64(42));
        assert!(series.demo);
        assert_eq!(series.points.len(), ACTIVITY_POINTS);
        for point in &series.points {
            assert!(point.value >= -0.2 - 1e-9 && point.value <= 1.2 + 1e-9);
        }
    }
}
