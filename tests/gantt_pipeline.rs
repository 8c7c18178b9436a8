// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use chrono::{NaiveDate, NaiveTime};

use naiad::format::mermaid::parse_gantt_diagram;
use naiad::layout::layout_gantt;
use naiad::model::DisplayMode;
use naiad::schedule::{schedule_gantt, ScheduleOptions};

fn date(text: &str) -> NaiveDate {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").expect("date literal")
}

const RELEASE_PLAN: &str = "\
gantt
    title Release 1.4
    dateFormat YYYY-MM-DD
    excludes weekends
    section Design
    Wireframes       :des1, 2024-01-02, 3d
    Review           :des2, after des1, 2d
    section Build
    Backend          :dev1, after des2, 5d
    Frontend         :dev2, after des2, 4d
    section Ship
    Release          :milestone, rel1, after dev1 dev2, 0d
";

#[test]
fn release_plan_compiles_end_to_end() {
    let ast = parse_gantt_diagram(RELEASE_PLAN)
        .unwrap_or_else(|err| panic!("expected the release plan to parse, got error: {err}"));
    assert_eq!(ast.title(), Some("Release 1.4"));
    assert_eq!(
        ast.sections(),
        ["Design".to_owned(), "Build".to_owned(), "Ship".to_owned()]
    );

    let options = ScheduleOptions::new().with_today(date("2024-06-03"));
    let schedule = schedule_gantt(&ast, &options)
        .unwrap_or_else(|err| panic!("expected the release plan to schedule, got error: {err}"));
    assert!(schedule.resolution().is_full());
    assert!(schedule.warnings().is_empty());

    let midnight = |text: &str| date(text).and_time(NaiveTime::MIN);

    // 2024-01-02 is a Tuesday; three working days land on Friday, and the
    // review's two days then skip the weekend.
    let wireframes = schedule.find_task("des1").expect("des1");
    assert_eq!(wireframes.start_time(), Some(midnight("2024-01-02")));
    assert_eq!(wireframes.end_time(), Some(midnight("2024-01-05")));

    let review = schedule.find_task("des2").expect("des2");
    assert_eq!(review.start_time(), Some(midnight("2024-01-05")));
    assert_eq!(review.end_time(), Some(midnight("2024-01-09")));

    // The milestone starts after the later of the two build tracks.
    let backend = schedule.find_task("dev1").expect("dev1");
    let frontend = schedule.find_task("dev2").expect("dev2");
    let release = schedule.find_task("rel1").expect("rel1");
    let latest = backend.end_time().max(frontend.end_time());
    assert_eq!(release.start_time(), latest);
    assert_eq!(release.end_time(), release.start_time());
    assert!(release.flags().milestone());

    for task in schedule.tasks() {
        let start = task.start_time().expect("resolved start");
        let end = task.end_time().expect("resolved end");
        assert!(end >= start, "task {} ends before it starts", task.task_id());
    }

    let layout = layout_gantt(&ast, &schedule);
    assert_eq!(layout.task_rows().len(), schedule.tasks().len());
    assert_eq!(layout.row_count(), 5);
    assert!(!layout.exclude_bands().is_empty());
    assert!(layout.warnings().is_empty());
}

#[test]
fn compact_mode_reuses_rows_across_the_pipeline() {
    let source = "\
gantt
    section Tracks
    a :a1, 2024-01-01, 2024-01-11
    b :b1, 2024-01-05, 2024-01-15
    c :c1, 2024-01-12, 2024-01-20
";
    let mut ast = parse_gantt_diagram(source).expect("parse");
    ast.set_display_mode(DisplayMode::Compact);
    let options = ScheduleOptions::new().with_today(date("2024-06-03"));
    let schedule = schedule_gantt(&ast, &options).expect("schedule");
    let layout = layout_gantt(&ast, &schedule);

    assert_eq!(layout.row_count(), 2);

    // No two tasks on the same row overlap.
    for (i, left) in layout.task_rows().iter().enumerate() {
        for right in layout.task_rows().iter().skip(i + 1) {
            if left.row() != right.row() {
                continue;
            }
            let a = schedule.find_task(left.task_id().as_str()).expect("task");
            let b = schedule.find_task(right.task_id().as_str()).expect("task");
            assert!(
                a.end_time() <= b.start_time() || b.end_time() <= a.start_time(),
                "row {} holds overlapping tasks",
                left.row()
            );
        }
    }
}

#[test]
fn malformed_lines_fail_the_whole_parse() {
    let source = "\
gantt
    Good :a1, 2024-01-01, 1d
    ???
";
    let err = parse_gantt_diagram(source).expect_err("parse must fail");
    let message = err.to_string();
    assert!(
        message.contains("line 3"),
        "error should name the offending line: {message}"
    );
}

#[test]
fn schedule_serializes_for_the_rendering_collaborator() {
    let ast = parse_gantt_diagram(RELEASE_PLAN).expect("parse");
    let options = ScheduleOptions::new().with_today(date("2024-06-03"));
    let schedule = schedule_gantt(&ast, &options).expect("schedule");
    let layout = layout_gantt(&ast, &schedule);

    let schedule_json = serde_json::to_value(&schedule).expect("schedule to JSON");
    let tasks = schedule_json["tasks"].as_array().expect("tasks array");
    assert_eq!(tasks.len(), 5);
    assert_eq!(tasks[0]["task_id"], "des1");
    assert_eq!(tasks[0]["section"], "Design");
    assert_eq!(schedule_json["resolution"], "Full");

    let layout_json = serde_json::to_value(&layout).expect("layout to JSON");
    assert_eq!(
        layout_json["task_rows"].as_array().expect("rows").len(),
        5
    );
}
