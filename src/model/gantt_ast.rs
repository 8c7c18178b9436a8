// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::ids::TaskId;

/// The fully interpreted diagram state for one Gantt source text.
///
/// One value per parse; the caller owns its lifetime. Tasks are appended in
/// declaration order and never removed — scheduling and layout read them by
/// index and by id.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GanttAst {
    title: Option<String>,
    acc_title: Option<String>,
    acc_descr: Option<String>,
    date_format: Option<String>,
    axis_format: Option<String>,
    tick_interval: Option<TickInterval>,
    today_marker: TodayMarker,
    excludes: Vec<String>,
    includes: Vec<String>,
    weekend_start: WeekendDay,
    week_start: Option<Weekday>,
    inclusive_end_dates: bool,
    top_axis: bool,
    display_mode: DisplayMode,
    sections: Vec<String>,
    tasks: Vec<GanttTask>,
    links: BTreeMap<TaskId, String>,
    callbacks: BTreeMap<TaskId, CallbackBinding>,
}

/// Default day.js-style date format when no `dateFormat` directive is given.
pub const DEFAULT_DATE_FORMAT: &str = "YYYY-MM-DD";

impl GanttAst {
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title<T: Into<String>>(&mut self, title: Option<T>) {
        self.title = title.map(Into::into);
    }

    pub fn acc_title(&self) -> Option<&str> {
        self.acc_title.as_deref()
    }

    pub fn set_acc_title<T: Into<String>>(&mut self, acc_title: Option<T>) {
        self.acc_title = acc_title.map(Into::into);
    }

    pub fn acc_descr(&self) -> Option<&str> {
        self.acc_descr.as_deref()
    }

    pub fn set_acc_descr<T: Into<String>>(&mut self, acc_descr: Option<T>) {
        self.acc_descr = acc_descr.map(Into::into);
    }

    /// The configured day.js-style date format, or the default.
    pub fn date_format(&self) -> &str {
        self.date_format.as_deref().unwrap_or(DEFAULT_DATE_FORMAT)
    }

    pub fn set_date_format(&mut self, date_format: impl Into<String>) {
        self.date_format = Some(date_format.into());
    }

    pub fn axis_format(&self) -> Option<&str> {
        self.axis_format.as_deref()
    }

    pub fn set_axis_format(&mut self, axis_format: impl Into<String>) {
        self.axis_format = Some(axis_format.into());
    }

    pub fn tick_interval(&self) -> Option<TickInterval> {
        self.tick_interval
    }

    pub fn set_tick_interval(&mut self, tick_interval: TickInterval) {
        self.tick_interval = Some(tick_interval);
    }

    pub fn today_marker(&self) -> &TodayMarker {
        &self.today_marker
    }

    pub fn set_today_marker(&mut self, today_marker: TodayMarker) {
        self.today_marker = today_marker;
    }

    /// Lowercased exclusion tokens: weekday names, `"weekends"`, or dates
    /// formatted with [`GanttAst::date_format`].
    pub fn excludes(&self) -> &[String] {
        &self.excludes
    }

    pub fn add_excludes<I: IntoIterator<Item = String>>(&mut self, tokens: I) {
        self.excludes.extend(tokens);
    }

    /// Inclusion overrides; a date listed here is never treated as excluded.
    pub fn includes(&self) -> &[String] {
        &self.includes
    }

    pub fn add_includes<I: IntoIterator<Item = String>>(&mut self, tokens: I) {
        self.includes.extend(tokens);
    }

    pub fn weekend_start(&self) -> WeekendDay {
        self.weekend_start
    }

    pub fn set_weekend_start(&mut self, weekend_start: WeekendDay) {
        self.weekend_start = weekend_start;
    }

    pub fn week_start(&self) -> Option<Weekday> {
        self.week_start
    }

    pub fn set_week_start(&mut self, week_start: Weekday) {
        self.week_start = Some(week_start);
    }

    pub fn inclusive_end_dates(&self) -> bool {
        self.inclusive_end_dates
    }

    pub fn set_inclusive_end_dates(&mut self, inclusive_end_dates: bool) {
        self.inclusive_end_dates = inclusive_end_dates;
    }

    pub fn top_axis(&self) -> bool {
        self.top_axis
    }

    pub fn set_top_axis(&mut self, top_axis: bool) {
        self.top_axis = top_axis;
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    /// There is no textual directive for this; the embedding configuration
    /// surface sets it before layout.
    pub fn set_display_mode(&mut self, display_mode: DisplayMode) {
        self.display_mode = display_mode;
    }

    /// Section names in declaration order.
    pub fn sections(&self) -> &[String] {
        &self.sections
    }

    pub fn push_section(&mut self, name: impl Into<String>) {
        self.sections.push(name.into());
    }

    /// Tasks in declaration order.
    pub fn tasks(&self) -> &[GanttTask] {
        &self.tasks
    }

    pub fn tasks_mut(&mut self) -> &mut Vec<GanttTask> {
        &mut self.tasks
    }

    /// First task whose id matches, in declaration order.
    pub fn find_task(&self, id: &str) -> Option<&GanttTask> {
        self.tasks.iter().find(|task| task.task_id().as_str() == id)
    }

    pub fn links(&self) -> &BTreeMap<TaskId, String> {
        &self.links
    }

    pub fn links_mut(&mut self) -> &mut BTreeMap<TaskId, String> {
        &mut self.links
    }

    pub fn callbacks(&self) -> &BTreeMap<TaskId, CallbackBinding> {
        &self.callbacks
    }

    pub fn callbacks_mut(&mut self) -> &mut BTreeMap<TaskId, CallbackBinding> {
        &mut self.callbacks
    }
}

/// One schedulable unit, as declared. Times stay symbolic until scheduling.
#[derive(Debug, Clone, PartialEq)]
pub struct GanttTask {
    task_id: TaskId,
    description: String,
    section: Option<String>,
    raw_start: TimeSpec,
    raw_end: TimeSpec,
    flags: TaskFlags,
    classes: Vec<String>,
}

impl GanttTask {
    pub fn new(
        task_id: TaskId,
        description: impl Into<String>,
        raw_start: TimeSpec,
        raw_end: TimeSpec,
    ) -> Self {
        Self {
            task_id,
            description: description.into(),
            section: None,
            raw_start,
            raw_end,
            flags: TaskFlags::default(),
            classes: Vec::new(),
        }
    }

    pub fn task_id(&self) -> &TaskId {
        &self.task_id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// The section active at declaration time, if any.
    pub fn section(&self) -> Option<&str> {
        self.section.as_deref()
    }

    pub fn set_section<T: Into<String>>(&mut self, section: Option<T>) {
        self.section = section.map(Into::into);
    }

    pub fn raw_start(&self) -> &TimeSpec {
        &self.raw_start
    }

    pub fn raw_end(&self) -> &TimeSpec {
        &self.raw_end
    }

    pub fn flags(&self) -> TaskFlags {
        self.flags
    }

    pub fn flags_mut(&mut self) -> &mut TaskFlags {
        &mut self.flags
    }

    /// Extra style tags attached via `click` bindings and class directives.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn push_class(&mut self, class: impl Into<String>) {
        self.classes.push(class.into());
    }
}

/// An unresolved start or end specification.
#[derive(Debug, Clone, PartialEq)]
pub enum TimeSpec {
    /// An absolute date string, parsed with the configured format at
    /// resolution time.
    Date(String),
    /// Start at the previous task's end (single-field task payload).
    PrevTaskEnd,
    /// Start after the latest end among the referenced tasks.
    After(Vec<TaskId>),
    /// End before the earliest start among the referenced tasks.
    Until(Vec<TaskId>),
    /// A relative duration added to the reference timestamp. The unit is kept
    /// verbatim; unrecognized units resolve to no adjustment.
    Duration { amount: f64, unit: String },
}

/// Style flags parsed once from the leading tag tokens of a task payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskFlags {
    active: bool,
    done: bool,
    crit: bool,
    milestone: bool,
    vert: bool,
}

impl TaskFlags {
    pub fn active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn done(&self) -> bool {
        self.done
    }

    pub fn set_done(&mut self, done: bool) {
        self.done = done;
    }

    pub fn crit(&self) -> bool {
        self.crit
    }

    pub fn set_crit(&mut self, crit: bool) {
        self.crit = crit;
    }

    pub fn milestone(&self) -> bool {
        self.milestone
    }

    pub fn set_milestone(&mut self, milestone: bool) {
        self.milestone = milestone;
    }

    pub fn vert(&self) -> bool {
        self.vert
    }

    pub fn set_vert(&mut self, vert: bool) {
        self.vert = vert;
    }
}

/// Axis tick cadence from the `tickInterval` directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickInterval {
    count: u32,
    unit: TickUnit,
}

impl TickInterval {
    pub fn new(count: u32, unit: TickUnit) -> Self {
        Self { count, unit }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn unit(&self) -> TickUnit {
        self.unit
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickUnit {
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
}

impl TickUnit {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "millisecond" => Some(Self::Millisecond),
            "second" => Some(Self::Second),
            "minute" => Some(Self::Minute),
            "hour" => Some(Self::Hour),
            "day" => Some(Self::Day),
            "week" => Some(Self::Week),
            "month" => Some(Self::Month),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Millisecond => "millisecond",
            Self::Second => "second",
            Self::Minute => "minute",
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }
}

/// The `todayMarker` directive: default styling, disabled, or custom CSS.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TodayMarker {
    #[default]
    Default,
    Off,
    Styled(String),
}

/// Which day opens the weekend, per the `weekend` directive. The weekend is
/// that day and the following one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeekendDay {
    Friday,
    #[default]
    Saturday,
}

impl WeekendDay {
    /// Whether `weekday` falls on the configured weekend.
    pub fn contains(self, weekday: Weekday) -> bool {
        match self {
            Self::Friday => matches!(weekday, Weekday::Fri | Weekday::Sat),
            Self::Saturday => matches!(weekday, Weekday::Sat | Weekday::Sun),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    #[default]
    Normal,
    Compact,
}

/// A `click … call name(args)` binding, kept purely as data. Attaching it to
/// any concrete UI is the rendering collaborator's responsibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackBinding {
    name: String,
    args: Option<String>,
}

impl CallbackBinding {
    pub fn new(name: impl Into<String>, args: Option<String>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> Option<&str> {
        self.args.as_deref()
    }
}
