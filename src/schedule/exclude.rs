// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::Serialize;

use super::date::format_with;
use crate::model::gantt_ast::GanttAst;

/// Band computation is skipped beyond this span; a degenerate date range must
/// not stall the compile.
pub const MAX_BAND_SPAN_DAYS: i64 = 5 * 365;

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

/// Whether a calendar day is skipped when computing padded end dates.
///
/// An explicit `includes` entry (the date formatted with the configured
/// format) always wins. Otherwise a day is excluded when `excludes` names
/// `weekends` and the day falls on the configured weekend, names the
/// lowercase English weekday, or names the formatted date itself.
pub fn is_excluded_day(date: NaiveDate, ast: &GanttAst) -> bool {
    let formatted = format_with(date.and_time(NaiveTime::MIN), ast.date_format());
    if ast.includes().iter().any(|token| *token == formatted) {
        return false;
    }
    let weekday = date.weekday();
    if ast.excludes().iter().any(|token| token == "weekends")
        && ast.weekend_start().contains(weekday)
    {
        return true;
    }
    if ast
        .excludes()
        .iter()
        .any(|token| token == weekday_name(weekday))
    {
        return true;
    }
    ast.excludes().iter().any(|token| *token == formatted)
}

/// Push a task's end past excluded days, one day per excluded day in the
/// span.
///
/// Returns the padded end plus the pre-padding end for display width; the
/// latter is `None` when no trailing adjustment applies.
pub(crate) fn fix_task_dates(
    start: NaiveDateTime,
    end: NaiveDateTime,
    ast: &GanttAst,
) -> (NaiveDateTime, Option<NaiveDateTime>) {
    let mut end = end;
    let mut render_end = None;
    let mut invalid = false;
    let mut cursor = start + Duration::days(1);
    while cursor <= end {
        if !invalid {
            render_end = Some(end);
        }
        invalid = is_excluded_day(cursor.date(), ast);
        if invalid {
            end += Duration::days(1);
        }
        cursor += Duration::days(1);
    }

    let render_end = match render_end {
        Some(render) if render != end => Some(render),
        _ => None,
    };
    (end, render_end)
}

/// A contiguous run of excluded days, as a half-open day range. Used only for
/// visual shading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExcludeBand {
    start: NaiveDate,
    end: NaiveDate,
}

impl ExcludeBand {
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Exclusive: the first non-excluded day after the band.
    pub fn end(&self) -> NaiveDate {
        self.end
    }
}

/// Contiguous excluded-day bands across `[min, max]`, or `None` when the span
/// exceeds [`MAX_BAND_SPAN_DAYS`].
pub fn exclude_bands(min: NaiveDate, max: NaiveDate, ast: &GanttAst) -> Option<Vec<ExcludeBand>> {
    if max.signed_duration_since(min).num_days() > MAX_BAND_SPAN_DAYS {
        return None;
    }

    let mut bands = Vec::new();
    let mut open: Option<NaiveDate> = None;
    let mut day = min;
    while day <= max {
        if is_excluded_day(day, ast) {
            open.get_or_insert(day);
        } else if let Some(start) = open.take() {
            bands.push(ExcludeBand { start, end: day });
        }
        day += Duration::days(1);
    }
    if let Some(start) = open {
        bands.push(ExcludeBand {
            start,
            end: max + Duration::days(1),
        });
    }
    Some(bands)
}
