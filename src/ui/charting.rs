use itertools::{Itertools, MinMaxResult};

use crate::results::ResultRecord;

const SECS_PER_DAY: f64 = 86_400.0;

/// (days since the first result, estimated mean) for each record
pub fn history_points(records: &[ResultRecord]) -> Vec<(f64, f64)> {
    let Some(first) = records.first() else {
        return Vec::new();
    };
    records
        .iter()
        .map(|r| {
            let secs = (r.created_at - first.created_at).num_seconds() as f64;
            (secs / SECS_PER_DAY, r.est_mean as f64)
        })
        .collect()
}

/// Compute X (days) and Y (words) bounds for the history chart
pub fn compute_chart_params(points: &[(f64, f64)]) -> ([f64; 2], [f64; 2]) {
    let x_max = points
        .iter()
        .map(|&(x, _)| x)
        .fold(0.0_f64, f64::max)
        .max(1.0);

    let (y_min, y_max) = match points.iter().map(|&(_, y)| y).minmax_by(|a, b| a.total_cmp(b)) {
        MinMaxResult::NoElements => (0.0, 1.0),
        MinMaxResult::OneElement(y) => (y, y),
        MinMaxResult::MinMax(lo, hi) => (lo, hi),
    };

    // pad so a flat line is not drawn on the frame edge
    let pad = ((y_max - y_min) * 0.1).max(500.0);
    let lower = ((y_min - pad) / 1000.0).floor() * 1000.0;
    let upper = ((y_max + pad) / 1000.0).ceil() * 1000.0;

    ([0.0, x_max], [lower.max(0.0), upper])
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Local};

    fn record(days_ago: i64, est_mean: i64) -> ResultRecord {
        ResultRecord {
            id: days_ago,
            user: "u".into(),
            total: 20,
            correct: 10,
            avg_difficulty: 3.0,
            est_mean,
            est_lo: est_mean - 1000,
            est_hi: est_mean + 1000,
            created_at: Local::now() - Duration::days(days_ago),
        }
    }

    #[test]
    fn test_history_points_start_at_zero() {
        let points = history_points(&[record(3, 15_000), record(1, 18_000), record(0, 17_000)]);
        assert_eq!(points.len(), 3);
        assert_eq!(points[0], (0.0, 15_000.0));
        assert!((points[1].0 - 2.0).abs() < 1e-3);
        assert!((points[2].0 - 3.0).abs() < 1e-3);
    }

    #[test]
    fn test_history_points_empty() {
        assert!(history_points(&[]).is_empty());
    }

    #[test]
    fn test_compute_chart_params_empty() {
        let (x, y) = compute_chart_params(&[]);
        assert_eq!(x, [0.0, 1.0]);
        assert_eq!(y, [0.0, 1000.0]);
    }

    #[test]
    fn test_compute_chart_params_bounds_contain_points() {
        let points = [(0.0, 14_200.0), (4.5, 22_100.0), (9.0, 19_000.0)];
        let (x, y) = compute_chart_params(&points);
        assert_eq!(x, [0.0, 9.0]);
        assert!(y[0] <= 14_200.0 && y[1] >= 22_100.0);
        assert_eq!(y[0] % 1000.0, 0.0);
    }

    #[test]
    fn test_single_point_gets_padding() {
        let (_, y) = compute_chart_params(&[(0.0, 20_000.0)]);
        assert!(y[0] < 20_000.0 && y[1] > 20_000.0);
    }

    #[test]
    fn test_format_label() {
        assert_eq!(format_label(1.0), "1");
        assert_eq!(format_label(1.2345), "1.23");
    }
}
