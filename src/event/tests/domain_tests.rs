//! Record, rule, and calendar tests.

use crate::event::domain::{
    AutoCheckRule, AutoChecker, EventKind, EventPayload, EventRecord, MonthKey,
};
use crate::inventory::domain::{ComputerId, ComputerStatus, ProjectId};
use chrono::NaiveDate;
use mockable::DefaultClock;
use rstest::rstest;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

#[rstest]
fn error_descriptions_use_unix_line_endings() {
    let record = EventRecord::error(
        ComputerId::new(),
        ProjectId::new(),
        "apt failed\r\nexit code 100",
        &DefaultClock,
    );

    assert_eq!(record.error_description(), Some("apt failed\nexit code 100"));
    assert_eq!(record.kind(), EventKind::Error);
    assert!(!record.is_checked());
}

#[rstest]
fn notifications_concern_no_computer() {
    let record = EventRecord::notification("maintenance tonight", &DefaultClock);

    assert_eq!(record.computer(), None);
    assert_eq!(record.project(), None);
    assert_eq!(record.kind(), EventKind::Notification);
}

#[rstest]
fn status_log_keeps_the_new_status() {
    let record = EventRecord::status_log(
        ComputerId::new(),
        ProjectId::new(),
        ComputerStatus::InRepair,
        &DefaultClock,
    );

    assert_eq!(
        record.payload(),
        &EventPayload::StatusLog {
            status: ComputerStatus::InRepair
        }
    );
}

#[rstest]
fn acknowledgement_is_not_repeated() {
    let mut record = EventRecord::migration(ComputerId::new(), ProjectId::new(), &DefaultClock);

    assert!(record.check_ok(&DefaultClock));
    let first_check = record.checked_at();
    assert!(!record.check_ok(&DefaultClock));

    assert!(record.is_checked());
    assert_eq!(record.checked_at(), first_check);
}

#[rstest]
fn auto_check_records_the_rule() {
    let rule = AutoCheckRule::new("mirror unreachable");
    let mut record = EventRecord::error(
        ComputerId::new(),
        ProjectId::new(),
        "mirror unreachable",
        &DefaultClock,
    );

    record.auto_check(rule.id(), &DefaultClock);

    assert!(record.is_checked());
    assert_eq!(record.auto_checked_by(), Some(rule.id()));
}

#[rstest]
fn payload_serializes_with_kind_tag() {
    let record = EventRecord::synchronization(
        ComputerId::new(),
        ProjectId::new(),
        Some("nightly".to_owned()),
        &DefaultClock,
    );

    let json = serde_json::to_value(record.payload()).expect("payload serializes");

    assert_eq!(json.get("kind"), Some(&serde_json::json!("synchronization")));
    assert_eq!(json.get("consumer"), Some(&serde_json::json!("nightly")));
}

#[rstest]
#[case::substring("dpkg lock held", "lock", true)]
#[case::anchored("lock held", "^dpkg", false)]
#[case::alternation("timeout contacting mirror", "refused|timeout", true)]
fn checker_matches_anywhere_in_the_description(
    #[case] description: &str,
    #[case] pattern: &str,
    #[case] expected: bool,
) {
    let rule = AutoCheckRule::new(pattern);
    let checker = AutoChecker::compile(std::slice::from_ref(&rule));

    assert_eq!(checker.first_match(description) == Some(rule.id()), expected);
}

#[rstest]
fn malformed_patterns_are_skipped() {
    let broken = AutoCheckRule::new("(unclosed");
    let valid = AutoCheckRule::new("unclosed");

    let checker = AutoChecker::compile(&[broken, valid.clone()]);

    assert_eq!(checker.len(), 1);
    assert_eq!(checker.first_match("(unclosed"), Some(valid.id()));
}

#[rstest]
fn first_matching_rule_wins() {
    let first = AutoCheckRule::new("disk");
    let second = AutoCheckRule::new("disk full");

    let checker = AutoChecker::compile(&[first.clone(), second]);

    assert_eq!(checker.first_match("disk full on /var"), Some(first.id()));
}

#[rstest]
fn month_range_spans_year_boundaries() {
    let months = MonthKey::range(date(2023, 11, 20), date(2024, 2, 3));

    let labels: Vec<String> = months.iter().map(ToString::to_string).collect();
    assert_eq!(labels, ["2023-11", "2023-12", "2024-01", "2024-02"]);
}

#[rstest]
fn month_range_is_empty_when_reversed() {
    assert!(MonthKey::range(date(2024, 3, 1), date(2024, 1, 31)).is_empty());
}
