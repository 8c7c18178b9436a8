// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::model::gantt_ast::{DisplayMode, GanttAst};
use crate::model::ids::TaskId;
use crate::schedule::exclude::{exclude_bands, ExcludeBand, MAX_BAND_SPAN_DAYS};
use crate::schedule::GanttSchedule;

/// A task's display row. Rows within a section never overlap in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskRow {
    task_id: TaskId,
    row: usize,
}

impl TaskRow {
    pub fn task_id(&self) -> &TaskId {
        &self.task_id
    }

    pub fn row(&self) -> usize {
        self.row
    }
}

/// The contiguous row range a section occupies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionLane {
    name: Option<String>,
    first_row: usize,
    row_count: usize,
}

impl SectionLane {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn first_row(&self) -> usize {
        self.first_row
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum LayoutWarning {
    ExcludeSpanTooLarge { days: i64 },
}

impl fmt::Display for LayoutWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExcludeSpanTooLarge { days } => write!(
                f,
                "excluded-day bands skipped: the {days}-day span exceeds {MAX_BAND_SPAN_DAYS} days"
            ),
        }
    }
}

/// Deterministic "coordinates-only" layout for a scheduled Gantt diagram.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GanttLayout {
    task_rows: Vec<TaskRow>,
    row_count: usize,
    section_lanes: Vec<SectionLane>,
    exclude_bands: Vec<ExcludeBand>,
    time_range: Option<(NaiveDateTime, NaiveDateTime)>,
    warnings: Vec<LayoutWarning>,
}

impl GanttLayout {
    /// One entry per task, in declaration order.
    pub fn task_rows(&self) -> &[TaskRow] {
        &self.task_rows
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn section_lanes(&self) -> &[SectionLane] {
        &self.section_lanes
    }

    /// Contiguous excluded-day runs across the diagram's time range, for
    /// visual shading.
    pub fn exclude_bands(&self) -> &[ExcludeBand] {
        &self.exclude_bands
    }

    /// Earliest start and latest end across resolved tasks.
    pub fn time_range(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        self.time_range
    }

    pub fn warnings(&self) -> &[LayoutWarning] {
        &self.warnings
    }
}

/// Task indices grouped by section in first-appearance order. Tasks declared
/// before any `section` line form a leading unsectioned group.
fn section_groups(schedule: &GanttSchedule) -> Vec<(Option<String>, Vec<usize>)> {
    let mut groups: Vec<(Option<String>, Vec<usize>)> = Vec::new();
    for (idx, task) in schedule.tasks().iter().enumerate() {
        let section = task.section().map(ToOwned::to_owned);
        match groups.iter_mut().find(|(name, _)| *name == section) {
            Some((_, indices)) => indices.push(idx),
            None => groups.push((section, vec![idx])),
        }
    }
    groups
}

/// Greedy interval partitioning over one section's tasks.
///
/// Tasks sorted by `(start, declaration index)` are placed into the first row
/// slot whose last end does not pass their start; ties on equal starts break
/// by declaration order. Tasks without resolved times get fresh rows after
/// the packed ones.
fn pack_section(
    schedule: &GanttSchedule,
    indices: &[usize],
    base_row: usize,
    rows: &mut [usize],
) -> usize {
    let mut timed: Vec<(NaiveDateTime, NaiveDateTime, usize)> = Vec::new();
    let mut untimed: Vec<usize> = Vec::new();
    for &idx in indices {
        let task = &schedule.tasks()[idx];
        match (task.start_time(), task.end_time()) {
            (Some(start), Some(end)) => timed.push((start, end, idx)),
            _ => untimed.push(idx),
        }
    }
    timed.sort_by_key(|&(start, _, idx)| (start, idx));

    let mut slot_ends: Vec<NaiveDateTime> = Vec::new();
    for (start, end, idx) in timed {
        let slot = slot_ends.iter().position(|&last_end| last_end <= start);
        match slot {
            Some(slot) => {
                slot_ends[slot] = end;
                rows[idx] = base_row + slot;
            }
            None => {
                rows[idx] = base_row + slot_ends.len();
                slot_ends.push(end);
            }
        }
    }

    let mut used = slot_ends.len();
    for idx in untimed {
        rows[idx] = base_row + used;
        used += 1;
    }
    used
}

/// Assign each task a display row and compute the shading bands.
///
/// Compact mode packs each section's overlapping tasks into the minimum
/// number of rows (classic interval-graph coloring), with section row ranges
/// offset to avoid collision. Normal mode gives every task its own row in
/// declaration order.
pub fn layout_gantt(ast: &GanttAst, schedule: &GanttSchedule) -> GanttLayout {
    let mut rows = vec![0usize; schedule.tasks().len()];
    let mut section_lanes = Vec::new();
    let mut row_count = 0usize;

    let groups = section_groups(schedule);
    match ast.display_mode() {
        DisplayMode::Normal => {
            for (idx, row) in rows.iter_mut().enumerate() {
                *row = idx;
            }
            row_count = schedule.tasks().len();
            for (name, indices) in groups {
                let first_row = indices.iter().copied().min().unwrap_or(0);
                section_lanes.push(SectionLane {
                    name,
                    first_row,
                    row_count: indices.len(),
                });
            }
        }
        DisplayMode::Compact => {
            for (name, indices) in groups {
                let used = pack_section(schedule, &indices, row_count, &mut rows);
                section_lanes.push(SectionLane {
                    name,
                    first_row: row_count,
                    row_count: used,
                });
                row_count += used;
            }
        }
    }

    let task_rows = schedule
        .tasks()
        .iter()
        .zip(&rows)
        .map(|(task, &row)| TaskRow {
            task_id: task.task_id().clone(),
            row,
        })
        .collect();

    let time_range = diagram_time_range(schedule);
    let mut warnings = Vec::new();
    let mut bands = Vec::new();
    if !ast.excludes().is_empty() {
        if let Some((min, max)) = time_range {
            match exclude_bands(min.date(), max.date(), ast) {
                Some(computed) => bands = computed,
                None => warnings.push(LayoutWarning::ExcludeSpanTooLarge {
                    days: max.date().signed_duration_since(min.date()).num_days(),
                }),
            }
        }
    }

    GanttLayout {
        task_rows,
        row_count,
        section_lanes,
        exclude_bands: bands,
        time_range,
        warnings,
    }
}

fn diagram_time_range(schedule: &GanttSchedule) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let mut range: Option<(NaiveDateTime, NaiveDateTime)> = None;
    for task in schedule.tasks() {
        let (Some(start), Some(end)) = (task.start_time(), task.end_time()) else {
            continue;
        };
        range = Some(match range {
            None => (start, end),
            Some((min, max)) => (min.min(start), max.max(end)),
        });
    }
    range
}
