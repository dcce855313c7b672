use crate::analysis::{HealthScore, assess_health};

#[test]
fn exactly_five_percent_errors_is_good() {
    let health = assess_health(1000, 50, 99);
    assert_eq!(health.score, HealthScore::Good);
    assert_eq!(health.error_rate_pct, Some(5.0));
}

#[test]
fn thresholds_step_down_to_fair_and_poor() {
    assert_eq!(assess_health(1000, 51, 0).score, HealthScore::Fair);
    assert_eq!(assess_health(1000, 0, 101).score, HealthScore::Fair);
    assert_eq!(assess_health(1000, 100, 200).score, HealthScore::Fair);
    assert_eq!(assess_health(1000, 101, 0).score, HealthScore::Poor);
    assert_eq!(assess_health(1000, 0, 201).score, HealthScore::Poor);
}

#[test]
fn no_ranges_means_insufficient_data() {
    let health = assess_health(0, 3, 1);
    assert_eq!(health.score, HealthScore::InsufficientData);
    assert_eq!(health.error_rate_pct, None);
    assert_eq!(health.disconnect_rate_pct, None);
}

#[test]
fn score_renders_in_capitals() {
    assert_eq!(HealthScore::Good.to_string(), "GOOD");
    assert_eq!(HealthScore::InsufficientData.to_string(), "INSUFFICIENT DATA");
}
