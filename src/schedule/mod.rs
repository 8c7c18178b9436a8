// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Fixed-point task scheduling.
//!
//! [`schedule_gantt`] resolves each task's symbolic start/end into absolute
//! timestamps by sweeping the task list until every task is processed or the
//! sweep budget runs out. Forward references (`after` a task declared later)
//! converge across sweeps; true cycles are reported, not fatal.

pub(crate) mod date;
pub mod exclude;


use std::fmt;

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::model::gantt_ast::{GanttAst, GanttTask, TaskFlags, TimeSpec};
use crate::model::ids::TaskId;

pub use date::DateParseError;
pub use exclude::{exclude_bands, is_excluded_day, ExcludeBand, MAX_BAND_SPAN_DAYS};

/// Sweep budget for dependency resolution. Bounds pathological or cyclic
/// chains instead of detecting cycles explicitly.
pub const MAX_RESOLUTION_SWEEPS: usize = 10;

/// Inputs that make scheduling deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleOptions {
    today: Option<NaiveDate>,
}

impl ScheduleOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin "today" (the fallback for unresolved references) instead of using
    /// the local calendar date.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn today(&self) -> Option<NaiveDate> {
        self.today
    }

    fn effective_today(&self) -> NaiveDateTime {
        self.today
            .unwrap_or_else(|| Local::now().date_naive())
            .and_time(NaiveTime::MIN)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GanttScheduleError {
    InvalidDate {
        task_id: TaskId,
        text: String,
        reason: DateParseError,
    },
}

impl fmt::Display for GanttScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDate {
                task_id,
                text,
                reason,
            } => write!(f, "invalid date for task {task_id}: {text:?} {reason}"),
        }
    }
}

impl std::error::Error for GanttScheduleError {}

/// Non-fatal scheduling anomalies; the diagram still schedules best-effort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ScheduleWarning {
    UnknownDurationUnit { task_id: TaskId, unit: String },
    UnparseableEnd { task_id: TaskId, text: String },
    EndBeforeStart { task_id: TaskId },
    UnresolvedDependency { task_id: TaskId },
}

impl fmt::Display for ScheduleWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownDurationUnit { task_id, unit } => write!(
                f,
                "task {task_id}: unrecognized duration unit '{unit}', no adjustment applied"
            ),
            Self::UnparseableEnd { task_id, text } => write!(
                f,
                "task {task_id}: end {text:?} is neither a date nor a duration, no adjustment applied"
            ),
            Self::EndBeforeStart { task_id } => {
                write!(f, "task {task_id}: end precedes start, clamped to the start")
            }
            Self::UnresolvedDependency { task_id } => write!(
                f,
                "task {task_id}: dependency chain did not converge within {MAX_RESOLUTION_SWEEPS} sweeps"
            ),
        }
    }
}

/// Whether every task converged within the sweep budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Resolution {
    Full,
    Partial { unresolved: Vec<TaskId> },
}

impl Resolution {
    pub fn is_full(&self) -> bool {
        matches!(self, Self::Full)
    }
}

/// One task with absolute timestamps, ready for layout and rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduledTask {
    task_id: TaskId,
    description: String,
    section: Option<String>,
    flags: TaskFlags,
    classes: Vec<String>,
    start_time: Option<NaiveDateTime>,
    end_time: Option<NaiveDateTime>,
    manual_end_time: bool,
    render_end_time: Option<NaiveDateTime>,
}

impl ScheduledTask {
    pub fn task_id(&self) -> &TaskId {
        &self.task_id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn section(&self) -> Option<&str> {
        self.section.as_deref()
    }

    pub fn flags(&self) -> TaskFlags {
        self.flags
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// `None` only when the dependency chain failed to converge.
    pub fn start_time(&self) -> Option<NaiveDateTime> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<NaiveDateTime> {
        self.end_time
    }

    /// True when the end was an explicit date; such ends are never padded
    /// past excluded days.
    pub fn manual_end_time(&self) -> bool {
        self.manual_end_time
    }

    /// The end before trailing excluded-day padding, for display width.
    /// `None` when no adjustment applied.
    pub fn render_end_time(&self) -> Option<NaiveDateTime> {
        self.render_end_time
    }
}

/// The scheduler's output: tasks in declaration order plus the convergence
/// result and any non-fatal anomalies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GanttSchedule {
    tasks: Vec<ScheduledTask>,
    resolution: Resolution,
    warnings: Vec<ScheduleWarning>,
}

impl GanttSchedule {
    pub fn tasks(&self) -> &[ScheduledTask] {
        &self.tasks
    }

    pub fn find_task(&self, id: &str) -> Option<&ScheduledTask> {
        self.tasks.iter().find(|task| task.task_id().as_str() == id)
    }

    pub fn resolution(&self) -> &Resolution {
        &self.resolution
    }

    pub fn warnings(&self) -> &[ScheduleWarning] {
        &self.warnings
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Slot {
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
    render_end: Option<NaiveDateTime>,
    manual_end: bool,
    processed: bool,
}

/// First declaration-order position of a task id, mirroring lookup order in
/// the source syntax.
fn position_of(ast: &GanttAst, id: &TaskId) -> Option<usize> {
    ast.tasks()
        .iter()
        .position(|task| task.task_id() == id)
}

/// Latest end among the referenced tasks. `None` means "not yet" (an existing
/// reference is unresolved); the today fallback applies only when no
/// reference names an existing task.
fn after_reference(
    ids: &[TaskId],
    ast: &GanttAst,
    slots: &[Slot],
    today: NaiveDateTime,
) -> Option<NaiveDateTime> {
    let mut any_exist = false;
    let mut latest: Option<NaiveDateTime> = None;
    for id in ids {
        let Some(pos) = position_of(ast, id) else {
            continue;
        };
        any_exist = true;
        let end = slots[pos].end?;
        latest = Some(match latest {
            Some(current) if current >= end => current,
            _ => end,
        });
    }
    if !any_exist {
        return Some(today);
    }
    latest
}

/// Earliest start among the referenced tasks; same fallback contract as
/// [`after_reference`].
fn until_reference(
    ids: &[TaskId],
    ast: &GanttAst,
    slots: &[Slot],
    today: NaiveDateTime,
) -> Option<NaiveDateTime> {
    let mut any_exist = false;
    let mut earliest: Option<NaiveDateTime> = None;
    for id in ids {
        let Some(pos) = position_of(ast, id) else {
            continue;
        };
        any_exist = true;
        let start = slots[pos].start?;
        earliest = Some(match earliest {
            Some(current) if current <= start => current,
            _ => start,
        });
    }
    if !any_exist {
        return Some(today);
    }
    earliest
}

fn resolve_start(
    idx: usize,
    task: &GanttTask,
    ast: &GanttAst,
    slots: &[Slot],
    today: NaiveDateTime,
    warnings: &mut Vec<ScheduleWarning>,
) -> Result<Option<NaiveDateTime>, GanttScheduleError> {
    match task.raw_start() {
        TimeSpec::PrevTaskEnd => {
            if idx == 0 {
                Ok(Some(today))
            } else {
                Ok(slots[idx - 1].end)
            }
        }
        TimeSpec::After(ids) => Ok(after_reference(ids, ast, slots, today)),
        TimeSpec::Until(ids) => Ok(until_reference(ids, ast, slots, today)),
        TimeSpec::Date(text) => date::resolve_date(text, ast.date_format())
            .map(Some)
            .map_err(|reason| GanttScheduleError::InvalidDate {
                task_id: task.task_id().clone(),
                text: text.clone(),
                reason,
            }),
        TimeSpec::Duration { amount, unit } => {
            let reference = if idx == 0 {
                Some(today)
            } else {
                slots[idx - 1].end
            };
            let Some(reference) = reference else {
                return Ok(None);
            };
            match date::add_duration(reference, *amount, unit) {
                Some(start) => Ok(Some(start)),
                None => {
                    warnings.push(ScheduleWarning::UnknownDurationUnit {
                        task_id: task.task_id().clone(),
                        unit: unit.clone(),
                    });
                    Ok(Some(reference))
                }
            }
        }
    }
}

struct EndOutcome {
    end: NaiveDateTime,
    manual: bool,
}

fn resolve_end(
    idx: usize,
    task: &GanttTask,
    ast: &GanttAst,
    slots: &[Slot],
    start: NaiveDateTime,
    today: NaiveDateTime,
    warnings: &mut Vec<ScheduleWarning>,
) -> Option<EndOutcome> {
    match task.raw_end() {
        TimeSpec::Until(ids) => until_reference(ids, ast, slots, today).map(|end| EndOutcome {
            end,
            manual: false,
        }),
        TimeSpec::After(ids) => after_reference(ids, ast, slots, today).map(|end| EndOutcome {
            end,
            manual: false,
        }),
        TimeSpec::PrevTaskEnd => {
            let end = if idx == 0 {
                Some(today)
            } else {
                slots[idx - 1].end
            };
            end.map(|end| EndOutcome { end, manual: false })
        }
        TimeSpec::Date(text) => match date::resolve_date(text, ast.date_format()) {
            Ok(mut end) => {
                if ast.inclusive_end_dates() {
                    end += chrono::Duration::days(1);
                }
                Some(EndOutcome { end, manual: true })
            }
            Err(_) => {
                warnings.push(ScheduleWarning::UnparseableEnd {
                    task_id: task.task_id().clone(),
                    text: text.clone(),
                });
                Some(EndOutcome {
                    end: start,
                    manual: false,
                })
            }
        },
        TimeSpec::Duration { amount, unit } => match date::add_duration(start, *amount, unit) {
            Some(end) => Some(EndOutcome { end, manual: false }),
            None => {
                warnings.push(ScheduleWarning::UnknownDurationUnit {
                    task_id: task.task_id().clone(),
                    unit: unit.clone(),
                });
                Some(EndOutcome {
                    end: start,
                    manual: false,
                })
            }
        },
    }
}

/// Resolve every task's symbolic times into absolute timestamps.
///
/// Structural failures (a start date that parses with nothing) abort the
/// whole schedule; everything else degrades into [`ScheduleWarning`]s. The
/// invariant `end_time >= start_time` holds for every processed task.
pub fn schedule_gantt(
    ast: &GanttAst,
    options: &ScheduleOptions,
) -> Result<GanttSchedule, GanttScheduleError> {
    let today = options.effective_today();
    let mut slots = vec![Slot::default(); ast.tasks().len()];
    let mut warnings = Vec::new();

    let mut all_processed = slots.is_empty();
    let mut sweeps = 0;
    while !all_processed && sweeps < MAX_RESOLUTION_SWEEPS {
        all_processed = true;
        for (idx, task) in ast.tasks().iter().enumerate() {
            if slots[idx].processed {
                continue;
            }

            if slots[idx].start.is_none() {
                let start = resolve_start(idx, task, ast, &slots, today, &mut warnings)?;
                slots[idx].start = start;
            }

            if let Some(start) = slots[idx].start {
                if let Some(outcome) =
                    resolve_end(idx, task, ast, &slots, start, today, &mut warnings)
                {
                    let mut end = outcome.end;
                    if end < start {
                        warnings.push(ScheduleWarning::EndBeforeStart {
                            task_id: task.task_id().clone(),
                        });
                        end = start;
                    }

                    slots[idx].end = Some(end);
                    slots[idx].manual_end = outcome.manual;
                    if !outcome.manual && !ast.excludes().is_empty() {
                        let (fixed_end, render_end) = exclude::fix_task_dates(start, end, ast);
                        slots[idx].end = Some(fixed_end);
                        slots[idx].render_end = render_end;
                    }
                    slots[idx].processed = true;
                }
            }

            all_processed &= slots[idx].processed;
        }
        sweeps += 1;
    }

    let mut unresolved = Vec::new();
    for (task, slot) in ast.tasks().iter().zip(&slots) {
        if !slot.processed {
            unresolved.push(task.task_id().clone());
            warnings.push(ScheduleWarning::UnresolvedDependency {
                task_id: task.task_id().clone(),
            });
        }
    }
    let resolution = if unresolved.is_empty() {
        Resolution::Full
    } else {
        Resolution::Partial { unresolved }
    };

    let tasks = ast
        .tasks()
        .iter()
        .zip(&slots)
        .map(|(task, slot)| ScheduledTask {
            task_id: task.task_id().clone(),
            description: task.description().to_owned(),
            section: task.section().map(ToOwned::to_owned),
            flags: task.flags(),
            classes: task.classes().to_vec(),
            start_time: slot.start,
            end_time: slot.end,
            manual_end_time: slot.manual_end,
            render_end_time: slot.render_end,
        })
        .collect();

    Ok(GanttSchedule {
        tasks,
        resolution,
        warnings,
    })
}
