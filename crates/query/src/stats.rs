//! Launch statistics

use launchcore_core::{Launch, LaunchStatus, LaunchSummary, RocketUsage};
use std::collections::HashMap;

/// Records examined when building a summary
pub const SUMMARY_SCAN_LIMIT: u32 = 1000;

/// Number of rockets reported in a summary
pub const TOP_ROCKETS: usize = 5;

/// Reduce launches to summary statistics.
///
/// Rockets with equal counts keep the order in which they first appear in
/// `launches`, so the caller's sort order decides ties.
pub fn summarize(launches: &[Launch]) -> LaunchSummary {
    let count_status = |status: LaunchStatus| launches.iter().filter(|l| l.status == status).count();

    let total_launches = launches.len();
    let successful_launches = count_status(LaunchStatus::Success);
    let failed_launches = count_status(LaunchStatus::Failed);
    let upcoming_launches = count_status(LaunchStatus::Upcoming);

    let success_rate = if total_launches == 0 {
        0.0
    } else {
        round2(successful_launches as f64 / total_launches as f64 * 100.0)
    };

    LaunchSummary {
        total_launches,
        successful_launches,
        failed_launches,
        upcoming_launches,
        success_rate,
        most_used_rockets: top_rockets(launches, TOP_ROCKETS),
    }
}

fn top_rockets(launches: &[Launch], n: usize) -> Vec<RocketUsage> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut usage: Vec<RocketUsage> = Vec::new();

    for launch in launches {
        match index.get(launch.rocket_name.as_str()) {
            Some(&slot) => usage[slot].count += 1,
            None => {
                index.insert(&launch.rocket_name, usage.len());
                usage.push(RocketUsage {
                    rocket_name: launch.rocket_name.clone(),
                    count: 1,
                });
            }
        }
    }

    // stable: ties stay in first-seen order
    usage.sort_by(|a, b| b.count.cmp(&a.count));
    usage.truncate(n);
    usage
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
