// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use super::ident::validate_mermaid_ident;
pub use super::ident::MermaidIdentError;

use crate::model::gantt_ast::{
    CallbackBinding, GanttAst, GanttTask, TaskFlags, TickInterval, TickUnit, TimeSpec, TodayMarker,
    WeekendDay,
};
use crate::model::ids::TaskId;

#[derive(Debug, Clone, PartialEq)]
pub enum MermaidGanttParseError {
    MissingHeader,
    UnsupportedSyntax {
        line_no: usize,
        line: String,
    },
    MissingDirectiveArgument {
        line_no: usize,
        keyword: &'static str,
    },
    InvalidTickInterval {
        line_no: usize,
        text: String,
    },
    InvalidWeekday {
        line_no: usize,
        text: String,
    },
    InvalidWeekend {
        line_no: usize,
        text: String,
    },
    MissingTaskDescription {
        line_no: usize,
        line: String,
    },
    InvalidTaskData {
        line_no: usize,
        line: String,
    },
    InvalidTaskId {
        line_no: usize,
        name: String,
        reason: MermaidIdentError,
    },
    InvalidClickLine {
        line_no: usize,
        line: String,
    },
    InvalidClickTarget {
        line_no: usize,
        name: String,
        reason: MermaidIdentError,
    },
}

impl fmt::Display for MermaidGanttParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingHeader => f.write_str("expected 'gantt' as the first non-empty line"),
            Self::UnsupportedSyntax { line_no, line } => {
                write!(f, "unsupported Mermaid syntax on line {line_no}: {line}")
            }
            Self::MissingDirectiveArgument { line_no, keyword } => {
                write!(
                    f,
                    "missing argument on line {line_no} (expected '{keyword} <value>')"
                )
            }
            Self::InvalidTickInterval { line_no, text } => write!(
                f,
                "invalid tick interval on line {line_no}: {text} (expected '<count><millisecond|second|minute|hour|day|week|month>')"
            ),
            Self::InvalidWeekday { line_no, text } => write!(
                f,
                "invalid weekday on line {line_no}: {text} (expected 'monday'..'sunday')"
            ),
            Self::InvalidWeekend { line_no, text } => write!(
                f,
                "invalid weekend start on line {line_no}: {text} (expected 'friday' or 'saturday')"
            ),
            Self::MissingTaskDescription { line_no, line } => write!(
                f,
                "missing task description on line {line_no}: {line} (expected '<description> : <data>')"
            ),
            Self::InvalidTaskData { line_no, line } => write!(
                f,
                "invalid task data on line {line_no}: {line} (expected 1 to 3 fields after tags)"
            ),
            Self::InvalidTaskId {
                line_no,
                name,
                reason,
            } => write!(f, "invalid task id on line {line_no}: {name} ({reason})"),
            Self::InvalidClickLine { line_no, line } => write!(
                f,
                "invalid click binding on line {line_no}: {line} (expected 'click <id> href \"<url>\"' and/or 'click <id> call <name>(<args>)')"
            ),
            Self::InvalidClickTarget {
                line_no,
                name,
                reason,
            } => write!(f, "invalid click target on line {line_no}: {name} ({reason})"),
        }
    }
}

impl std::error::Error for MermaidGanttParseError {}

/// One parsed, semantically typed instruction from a single source line.
#[derive(Debug, Clone, PartialEq)]
pub enum GanttDirective {
    DateFormat(String),
    AxisFormat(String),
    TickInterval(TickInterval),
    Includes(Vec<String>),
    Excludes(Vec<String>),
    TodayMarker(TodayMarker),
    Title(String),
    AccTitle(String),
    AccDescr(String),
    Section(String),
    Weekday(chrono::Weekday),
    Weekend(WeekendDay),
    TopAxis,
    InclusiveEndDates,
    Click {
        task_id: TaskId,
        href: Option<String>,
        callback: Option<CallbackBinding>,
    },
    Task {
        description: String,
        payload: String,
    },
}

/// Leading payload tokens recognized as style flags.
const TASK_TAGS: [&str; 5] = ["active", "done", "crit", "milestone", "vert"];

fn is_comment_line(trimmed: &str) -> bool {
    trimmed.starts_with("%%")
}

fn after_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^after\s+([A-Za-z0-9_\- ]+)$").expect("valid regex"))
}

fn until_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^until\s+([A-Za-z0-9_\- ]+)$").expect("valid regex"))
}

fn duration_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+(?:\.\d+)?)\s*([A-Za-z]+)$").expect("valid regex"))
}

fn tick_interval_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([1-9][0-9]*)(millisecond|second|minute|hour|day|week|month)$")
            .expect("valid regex")
    })
}

fn split_first_token(text: &str) -> Option<(&str, &str)> {
    let text = text.trim_start();
    if text.is_empty() {
        return None;
    }
    match text.find(char::is_whitespace) {
        Some(idx) => Some((&text[..idx], text[idx..].trim_start())),
        None => Some((text, "")),
    }
}

/// Splits a comma/whitespace-separated token list, lowercased.
fn split_token_list(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

fn required_argument<'a>(
    trimmed: &'a str,
    keyword: &'static str,
    line_no: usize,
) -> Result<&'a str, MermaidGanttParseError> {
    let rest = trimmed.get(keyword.len()..).unwrap_or_default().trim();
    if rest.is_empty() {
        return Err(MermaidGanttParseError::MissingDirectiveArgument { line_no, keyword });
    }
    Ok(rest)
}

fn weekday_from_keyword(keyword: &str) -> Option<chrono::Weekday> {
    match keyword {
        "monday" => Some(chrono::Weekday::Mon),
        "tuesday" => Some(chrono::Weekday::Tue),
        "wednesday" => Some(chrono::Weekday::Wed),
        "thursday" => Some(chrono::Weekday::Thu),
        "friday" => Some(chrono::Weekday::Fri),
        "saturday" => Some(chrono::Weekday::Sat),
        "sunday" => Some(chrono::Weekday::Sun),
        _ => None,
    }
}

fn acc_field_value<'a>(trimmed: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = trimmed.strip_prefix(keyword)?.trim_start();
    let rest = rest.strip_prefix(':')?;
    Some(rest.trim())
}

/// Classify one non-empty, non-comment line into a typed directive.
fn classify_line(
    trimmed: &str,
    line_no: usize,
) -> Result<GanttDirective, MermaidGanttParseError> {
    if let Some(value) = acc_field_value(trimmed, "accTitle") {
        return Ok(GanttDirective::AccTitle(value.to_owned()));
    }
    if let Some(value) = acc_field_value(trimmed, "accDescr") {
        return Ok(GanttDirective::AccDescr(value.to_owned()));
    }

    let keyword = trimmed.split_whitespace().next().unwrap_or_default();
    match keyword {
        "dateFormat" => {
            let fmt = required_argument(trimmed, "dateFormat", line_no)?;
            Ok(GanttDirective::DateFormat(fmt.to_owned()))
        }
        "axisFormat" => {
            let fmt = required_argument(trimmed, "axisFormat", line_no)?;
            Ok(GanttDirective::AxisFormat(fmt.to_owned()))
        }
        "tickInterval" => {
            let spec = required_argument(trimmed, "tickInterval", line_no)?;
            let captures = tick_interval_re().captures(spec).ok_or_else(|| {
                MermaidGanttParseError::InvalidTickInterval {
                    line_no,
                    text: spec.to_owned(),
                }
            })?;
            let count = captures[1].parse::<u32>().map_err(|_| {
                MermaidGanttParseError::InvalidTickInterval {
                    line_no,
                    text: spec.to_owned(),
                }
            })?;
            let unit = TickUnit::from_keyword(&captures[2]).ok_or_else(|| {
                MermaidGanttParseError::InvalidTickInterval {
                    line_no,
                    text: spec.to_owned(),
                }
            })?;
            Ok(GanttDirective::TickInterval(TickInterval::new(count, unit)))
        }
        "includes" => {
            let list = required_argument(trimmed, "includes", line_no)?;
            Ok(GanttDirective::Includes(split_token_list(list)))
        }
        "excludes" => {
            let list = required_argument(trimmed, "excludes", line_no)?;
            Ok(GanttDirective::Excludes(split_token_list(list)))
        }
        "todayMarker" => {
            let value = required_argument(trimmed, "todayMarker", line_no)?;
            let marker = if value.eq_ignore_ascii_case("off") {
                TodayMarker::Off
            } else {
                TodayMarker::Styled(value.to_owned())
            };
            Ok(GanttDirective::TodayMarker(marker))
        }
        "title" => {
            let text = required_argument(trimmed, "title", line_no)?;
            Ok(GanttDirective::Title(text.to_owned()))
        }
        "section" => {
            let name = required_argument(trimmed, "section", line_no)?;
            Ok(GanttDirective::Section(name.to_owned()))
        }
        "weekday" => {
            let name = required_argument(trimmed, "weekday", line_no)?;
            let weekday = weekday_from_keyword(name).ok_or_else(|| {
                MermaidGanttParseError::InvalidWeekday {
                    line_no,
                    text: name.to_owned(),
                }
            })?;
            Ok(GanttDirective::Weekday(weekday))
        }
        "weekend" => {
            let name = required_argument(trimmed, "weekend", line_no)?;
            let weekend = match name {
                "friday" => WeekendDay::Friday,
                "saturday" => WeekendDay::Saturday,
                _ => {
                    return Err(MermaidGanttParseError::InvalidWeekend {
                        line_no,
                        text: name.to_owned(),
                    })
                }
            };
            Ok(GanttDirective::Weekend(weekend))
        }
        "topAxis" if trimmed == "topAxis" => Ok(GanttDirective::TopAxis),
        "inclusiveEndDates" if trimmed == "inclusiveEndDates" => {
            Ok(GanttDirective::InclusiveEndDates)
        }
        "click" => parse_click_line(trimmed, line_no),
        _ => {
            let Some((description, payload)) = trimmed.split_once(':') else {
                return Err(MermaidGanttParseError::UnsupportedSyntax {
                    line_no,
                    line: trimmed.to_owned(),
                });
            };
            let description = description.trim();
            if description.is_empty() {
                return Err(MermaidGanttParseError::MissingTaskDescription {
                    line_no,
                    line: trimmed.to_owned(),
                });
            }
            Ok(GanttDirective::Task {
                description: description.to_owned(),
                payload: payload.trim().to_owned(),
            })
        }
    }
}

fn parse_quoted<'a>(
    text: &'a str,
    line_no: usize,
    line: &str,
) -> Result<(String, &'a str), MermaidGanttParseError> {
    let rest = text.strip_prefix('"').ok_or_else(|| {
        MermaidGanttParseError::InvalidClickLine {
            line_no,
            line: line.to_owned(),
        }
    })?;
    let close = rest
        .find('"')
        .ok_or_else(|| MermaidGanttParseError::InvalidClickLine {
            line_no,
            line: line.to_owned(),
        })?;
    Ok((rest[..close].to_owned(), rest[close + 1..].trim_start()))
}

fn parse_callback<'a>(
    text: &'a str,
    line_no: usize,
    line: &str,
) -> Result<(CallbackBinding, &'a str), MermaidGanttParseError> {
    let end = text
        .find(|c: char| c.is_whitespace() || c == '(')
        .unwrap_or(text.len());
    let name = &text[..end];
    if name.is_empty() {
        return Err(MermaidGanttParseError::InvalidClickLine {
            line_no,
            line: line.to_owned(),
        });
    }
    let rest = text[end..].trim_start();
    if let Some(after_paren) = rest.strip_prefix('(') {
        let close = after_paren.find(')').ok_or_else(|| {
            MermaidGanttParseError::InvalidClickLine {
                line_no,
                line: line.to_owned(),
            }
        })?;
        let args = after_paren[..close].trim();
        let args = (!args.is_empty()).then(|| args.to_owned());
        return Ok((
            CallbackBinding::new(name, args),
            after_paren[close + 1..].trim_start(),
        ));
    }
    Ok((CallbackBinding::new(name, None), rest))
}

fn parse_click_line(
    trimmed: &str,
    line_no: usize,
) -> Result<GanttDirective, MermaidGanttParseError> {
    let rest = trimmed.get("click".len()..).unwrap_or_default();
    let Some((target, mut rest)) = split_first_token(rest) else {
        return Err(MermaidGanttParseError::InvalidClickLine {
            line_no,
            line: trimmed.to_owned(),
        });
    };
    validate_mermaid_ident(target).map_err(|reason| {
        MermaidGanttParseError::InvalidClickTarget {
            line_no,
            name: target.to_owned(),
            reason,
        }
    })?;
    let task_id = TaskId::new(target).map_err(|_| MermaidGanttParseError::InvalidClickTarget {
        line_no,
        name: target.to_owned(),
        reason: MermaidIdentError::ContainsWhitespace,
    })?;

    let mut href = None;
    let mut callback = None;
    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("href") {
            let after = after.trim_start();
            let (url, remaining) = parse_quoted(after, line_no, trimmed)?;
            href = Some(url);
            rest = remaining;
        } else if let Some(after) = rest.strip_prefix("call") {
            let (binding, remaining) = parse_callback(after.trim_start(), line_no, trimmed)?;
            callback = Some(binding);
            rest = remaining;
        } else if rest.starts_with('"') {
            let (url, remaining) = parse_quoted(rest, line_no, trimmed)?;
            href = Some(url);
            rest = remaining;
        } else {
            let (binding, remaining) = parse_callback(rest, line_no, trimmed)?;
            callback = Some(binding);
            rest = remaining;
        }
    }

    if href.is_none() && callback.is_none() {
        return Err(MermaidGanttParseError::InvalidClickLine {
            line_no,
            line: trimmed.to_owned(),
        });
    }

    Ok(GanttDirective::Click {
        task_id,
        href,
        callback,
    })
}

fn reference_ids(
    list: &str,
    line_no: usize,
) -> Result<Vec<TaskId>, MermaidGanttParseError> {
    list.split_whitespace()
        .map(|token| {
            TaskId::new(token).map_err(|_| MermaidGanttParseError::InvalidTaskId {
                line_no,
                name: token.to_owned(),
                reason: MermaidIdentError::ContainsWhitespace,
            })
        })
        .collect()
}

/// Start specifications: `after <ids>`, `until <ids>`, or an absolute date.
fn classify_start(text: &str, line_no: usize) -> Result<TimeSpec, MermaidGanttParseError> {
    if let Some(captures) = after_re().captures(text) {
        return Ok(TimeSpec::After(reference_ids(&captures[1], line_no)?));
    }
    if let Some(captures) = until_re().captures(text) {
        return Ok(TimeSpec::Until(reference_ids(&captures[1], line_no)?));
    }
    Ok(TimeSpec::Date(text.to_owned()))
}

/// End specifications additionally recognize relative durations.
fn classify_end(text: &str, line_no: usize) -> Result<TimeSpec, MermaidGanttParseError> {
    if let Some(captures) = until_re().captures(text) {
        return Ok(TimeSpec::Until(reference_ids(&captures[1], line_no)?));
    }
    if let Some(captures) = after_re().captures(text) {
        return Ok(TimeSpec::After(reference_ids(&captures[1], line_no)?));
    }
    if let Some(captures) = duration_re().captures(text) {
        let amount = captures[1].parse::<f64>().unwrap_or(f64::NAN);
        return Ok(TimeSpec::Duration {
            amount,
            unit: captures[2].to_owned(),
        });
    }
    Ok(TimeSpec::Date(text.to_owned()))
}

struct TaskBuilder {
    current_section: Option<String>,
    auto_task_count: usize,
}

impl TaskBuilder {
    fn new() -> Self {
        Self {
            current_section: None,
            auto_task_count: 0,
        }
    }

    fn next_auto_id(&mut self) -> TaskId {
        self.auto_task_count += 1;
        TaskId::new(format!("task{}", self.auto_task_count)).expect("valid generated id")
    }

    fn build(
        &mut self,
        description: String,
        payload: &str,
        line_no: usize,
        line: &str,
    ) -> Result<GanttTask, MermaidGanttParseError> {
        let mut items: Vec<&str> = payload.split(',').map(str::trim).collect();
        if items.iter().all(|item| item.is_empty()) {
            return Err(MermaidGanttParseError::InvalidTaskData {
                line_no,
                line: line.to_owned(),
            });
        }

        // Tags are only stripped from the front of the list; a tag word later
        // in the payload is time data.
        let mut flags = TaskFlags::default();
        while let Some(first) = items.first() {
            let Some(tag) = TASK_TAGS.iter().find(|tag| *tag == first) else {
                break;
            };
            match *tag {
                "active" => flags.set_active(true),
                "done" => flags.set_done(true),
                "crit" => flags.set_crit(true),
                "milestone" => flags.set_milestone(true),
                "vert" => flags.set_vert(true),
                _ => unreachable!("matched tag"),
            }
            items.remove(0);
        }

        let (task_id, raw_start, raw_end) = match items.as_slice() {
            [end] => (
                self.next_auto_id(),
                TimeSpec::PrevTaskEnd,
                classify_end(end, line_no)?,
            ),
            [start, end] => (
                self.next_auto_id(),
                classify_start(start, line_no)?,
                classify_end(end, line_no)?,
            ),
            [id, start, end] => {
                validate_mermaid_ident(id).map_err(|reason| {
                    MermaidGanttParseError::InvalidTaskId {
                        line_no,
                        name: (*id).to_owned(),
                        reason,
                    }
                })?;
                let task_id =
                    TaskId::new(*id).map_err(|_| MermaidGanttParseError::InvalidTaskId {
                        line_no,
                        name: (*id).to_owned(),
                        reason: MermaidIdentError::ContainsWhitespace,
                    })?;
                (
                    task_id,
                    classify_start(start, line_no)?,
                    classify_end(end, line_no)?,
                )
            }
            _ => {
                return Err(MermaidGanttParseError::InvalidTaskData {
                    line_no,
                    line: line.to_owned(),
                })
            }
        };

        let mut task = GanttTask::new(task_id, description, raw_start, raw_end);
        task.set_section(self.current_section.clone());
        *task.flags_mut() = flags;
        Ok(task)
    }
}

fn apply_directive(
    ast: &mut GanttAst,
    builder: &mut TaskBuilder,
    directive: GanttDirective,
    line_no: usize,
    line: &str,
) -> Result<(), MermaidGanttParseError> {
    match directive {
        GanttDirective::DateFormat(fmt) => ast.set_date_format(fmt),
        GanttDirective::AxisFormat(fmt) => ast.set_axis_format(fmt),
        GanttDirective::TickInterval(tick) => ast.set_tick_interval(tick),
        GanttDirective::Includes(tokens) => ast.add_includes(tokens),
        GanttDirective::Excludes(tokens) => ast.add_excludes(tokens),
        GanttDirective::TodayMarker(marker) => ast.set_today_marker(marker),
        GanttDirective::Title(text) => ast.set_title(Some(text)),
        GanttDirective::AccTitle(text) => ast.set_acc_title(Some(text)),
        GanttDirective::AccDescr(text) => ast.set_acc_descr(Some(text)),
        GanttDirective::Section(name) => {
            builder.current_section = Some(name.clone());
            ast.push_section(name);
        }
        GanttDirective::Weekday(weekday) => ast.set_week_start(weekday),
        GanttDirective::Weekend(weekend) => ast.set_weekend_start(weekend),
        GanttDirective::TopAxis => ast.set_top_axis(true),
        GanttDirective::InclusiveEndDates => ast.set_inclusive_end_dates(true),
        GanttDirective::Click {
            task_id,
            href,
            callback,
        } => {
            if let Some(url) = href {
                ast.links_mut().insert(task_id.clone(), url);
            }
            if let Some(binding) = callback {
                ast.callbacks_mut().insert(task_id, binding);
            }
        }
        GanttDirective::Task {
            description,
            payload,
        } => {
            let task = builder.build(description, &payload, line_no, line)?;
            ast.tasks_mut().push(task);
        }
    }
    Ok(())
}

/// Parse a Mermaid `gantt` diagram into a [`GanttAst`].
///
/// Supported lines (after the `gantt` header):
/// - `dateFormat <fmt>` / `axisFormat <fmt>` / `tickInterval <n><unit>`
/// - `includes <list>` / `excludes <list>` (comma or whitespace separated)
/// - `todayMarker off` / `todayMarker <css>`
/// - `title <text>`, `accTitle: <text>`, `accDescr: <text>`
/// - `section <name>`
/// - `weekday <monday..sunday>`, `weekend <friday|saturday>`
/// - `topAxis`, `inclusiveEndDates`
/// - `click <id> href "<url>"` and/or `click <id> call <name>(<args>)`
/// - task lines: `<description> : [tags,] [id,] [start,] <end>`
///
/// Parsing is all-or-nothing: the first malformed line fails the whole
/// diagram with an error naming the line.
pub fn parse_gantt_diagram(input: &str) -> Result<GanttAst, MermaidGanttParseError> {
    let mut ast = GanttAst::default();
    let mut builder = TaskBuilder::new();
    let mut saw_header = false;

    for (idx, raw_line) in input.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = raw_line.trim();
        if trimmed.is_empty() || is_comment_line(trimmed) {
            continue;
        }

        if !saw_header {
            if trimmed == "gantt" {
                saw_header = true;
                continue;
            }
            return Err(MermaidGanttParseError::MissingHeader);
        }

        let directive = classify_line(trimmed, line_no)?;
        apply_directive(&mut ast, &mut builder, directive, line_no, trimmed)?;
    }

    if !saw_header {
        return Err(MermaidGanttParseError::MissingHeader);
    }

    // Click bindings may precede their task's declaration; attach the style
    // class once the whole document is interpreted.
    let clickable: BTreeSet<TaskId> = ast
        .links()
        .keys()
        .chain(ast.callbacks().keys())
        .cloned()
        .collect();
    for task in ast.tasks_mut() {
        if clickable.contains(task.task_id())
            && !task.classes().iter().any(|class| class == "clickable")
        {
            task.push_class("clickable");
        }
    }

    Ok(ast)
}

#[cfg(test)]
mod tests {
    use super::{parse_gantt_diagram, MermaidGanttParseError, MermaidIdentError};
    use crate::model::gantt_ast::{TickUnit, TimeSpec, TodayMarker, WeekendDay};
    use crate::model::ids::TaskId;

    fn tid(value: &str) -> TaskId {
        TaskId::new(value).expect("task id")
    }

    #[test]
    fn parses_config_directives_and_tasks() {
        let input = r#"
            %% comment
            gantt
            title Release plan
            dateFormat YYYY-MM-DD
            axisFormat %d/%m
            tickInterval 1week
            excludes weekends, 2024-01-01
            includes 2024-01-06
            todayMarker off
            weekend friday
            weekday monday
            topAxis
            inclusiveEndDates

            section Phase 1
            Design :a1, 2024-01-02, 3d
            Build :after a1, 5d

            section Phase 2
            Ship :1d
        "#;

        let ast = parse_gantt_diagram(input).expect("parse");
        assert_eq!(ast.title(), Some("Release plan"));
        assert_eq!(ast.date_format(), "YYYY-MM-DD");
        assert_eq!(ast.axis_format(), Some("%d/%m"));
        let tick = ast.tick_interval().expect("tick interval");
        assert_eq!(tick.count(), 1);
        assert_eq!(tick.unit(), TickUnit::Week);
        assert_eq!(
            ast.excludes(),
            ["weekends".to_owned(), "2024-01-01".to_owned()]
        );
        assert_eq!(ast.includes(), ["2024-01-06".to_owned()]);
        assert_eq!(ast.today_marker(), &TodayMarker::Off);
        assert_eq!(ast.weekend_start(), WeekendDay::Friday);
        assert_eq!(ast.week_start(), Some(chrono::Weekday::Mon));
        assert!(ast.top_axis());
        assert!(ast.inclusive_end_dates());

        assert_eq!(ast.sections(), ["Phase 1".to_owned(), "Phase 2".to_owned()]);
        assert_eq!(ast.tasks().len(), 3);

        let design = &ast.tasks()[0];
        assert_eq!(design.task_id(), &tid("a1"));
        assert_eq!(design.description(), "Design");
        assert_eq!(design.section(), Some("Phase 1"));
        assert_eq!(
            design.raw_start(),
            &TimeSpec::Date("2024-01-02".to_owned())
        );
        assert_eq!(
            design.raw_end(),
            &TimeSpec::Duration {
                amount: 3.0,
                unit: "d".to_owned()
            }
        );

        let build = &ast.tasks()[1];
        assert_eq!(build.raw_start(), &TimeSpec::After(vec![tid("a1")]));

        let ship = &ast.tasks()[2];
        assert_eq!(ship.section(), Some("Phase 2"));
        assert_eq!(ship.raw_start(), &TimeSpec::PrevTaskEnd);
    }

    #[test]
    fn generates_sequential_ids_only_for_anonymous_tasks() {
        let input = "\
gantt
First :1d
Named :n1, 2024-01-01, 2d
Second :1d
";
        let ast = parse_gantt_diagram(input).expect("parse");
        let ids: Vec<&str> = ast
            .tasks()
            .iter()
            .map(|task| task.task_id().as_str())
            .collect();
        assert_eq!(ids, ["task1", "n1", "task2"]);
    }

    #[test]
    fn strips_leading_tags_into_flags() {
        let input = "\
gantt
Kickoff :milestone, crit, m1, 2024-01-01, 0d
";
        let ast = parse_gantt_diagram(input).expect("parse");
        let task = &ast.tasks()[0];
        assert!(task.flags().milestone());
        assert!(task.flags().crit());
        assert!(!task.flags().active());
        assert_eq!(task.task_id(), &tid("m1"));
    }

    #[test]
    fn tag_words_after_time_data_are_not_stripped() {
        let input = "\
gantt
Oops :2024-01-01, done
";
        let ast = parse_gantt_diagram(input).expect("parse");
        let task = &ast.tasks()[0];
        assert!(!task.flags().done());
        assert_eq!(task.raw_end(), &TimeSpec::Date("done".to_owned()));
    }

    #[test]
    fn classifies_until_and_multi_id_after_references() {
        let input = "\
gantt
a :ta, 2024-01-01, 1d
b :tb, 2024-01-05, 1d
c :tc, after ta tb, until tb
";
        let ast = parse_gantt_diagram(input).expect("parse");
        let task = &ast.tasks()[2];
        assert_eq!(
            task.raw_start(),
            &TimeSpec::After(vec![tid("ta"), tid("tb")])
        );
        assert_eq!(task.raw_end(), &TimeSpec::Until(vec![tid("tb")]));
    }

    #[test]
    fn parses_click_bindings_and_marks_tasks_clickable() {
        let input = "\
gantt
click a1 href \"https://example.com\"
click a2 call onTask(arg1, arg2)
Design :a1, 2024-01-01, 1d
Build :a2, 2024-01-02, 1d
Plain :a3, 2024-01-03, 1d
";
        let ast = parse_gantt_diagram(input).expect("parse");
        assert_eq!(
            ast.links().get(&tid("a1")).map(String::as_str),
            Some("https://example.com")
        );
        let binding = ast.callbacks().get(&tid("a2")).expect("callback");
        assert_eq!(binding.name(), "onTask");
        assert_eq!(binding.args(), Some("arg1, arg2"));

        assert_eq!(ast.tasks()[0].classes(), ["clickable".to_owned()]);
        assert_eq!(ast.tasks()[1].classes(), ["clickable".to_owned()]);
        assert!(ast.tasks()[2].classes().is_empty());
    }

    #[test]
    fn click_supports_combined_callback_and_href() {
        let input = "\
gantt
click a1 call notify() href \"https://example.com\"
Design :a1, 2024-01-01, 1d
";
        let ast = parse_gantt_diagram(input).expect("parse");
        assert!(ast.links().contains_key(&tid("a1")));
        let binding = ast.callbacks().get(&tid("a1")).expect("callback");
        assert_eq!(binding.name(), "notify");
        assert_eq!(binding.args(), None);
    }

    #[test]
    fn rejects_missing_header() {
        let err = parse_gantt_diagram("title Oops\n").unwrap_err();
        assert_eq!(err, MermaidGanttParseError::MissingHeader);
    }

    #[test]
    fn rejects_unsupported_syntax_with_line_number() {
        let err = parse_gantt_diagram("gantt\njust some words\n").unwrap_err();
        assert_eq!(
            err,
            MermaidGanttParseError::UnsupportedSyntax {
                line_no: 2,
                line: "just some words".to_owned(),
            }
        );
    }

    #[test]
    fn rejects_section_without_name() {
        let err = parse_gantt_diagram("gantt\nsection\n").unwrap_err();
        assert_eq!(
            err,
            MermaidGanttParseError::MissingDirectiveArgument {
                line_no: 2,
                keyword: "section",
            }
        );
    }

    #[test]
    fn rejects_malformed_tick_interval() {
        let err = parse_gantt_diagram("gantt\ntickInterval 0day\n").unwrap_err();
        assert_eq!(
            err,
            MermaidGanttParseError::InvalidTickInterval {
                line_no: 2,
                text: "0day".to_owned(),
            }
        );
    }

    #[test]
    fn rejects_task_with_too_many_fields() {
        let err =
            parse_gantt_diagram("gantt\nBad :a1, 2024-01-01, 2024-01-02, extra\n").unwrap_err();
        assert_eq!(
            err,
            MermaidGanttParseError::InvalidTaskData {
                line_no: 2,
                line: "Bad :a1, 2024-01-01, 2024-01-02, extra".to_owned(),
            }
        );
    }

    #[test]
    fn rejects_task_with_invalid_explicit_id() {
        let err = parse_gantt_diagram("gantt\nBad :a!1, 2024-01-01, 1d\n").unwrap_err();
        assert_eq!(
            err,
            MermaidGanttParseError::InvalidTaskId {
                line_no: 2,
                name: "a!1".to_owned(),
                reason: MermaidIdentError::InvalidChar { ch: '!' },
            }
        );
    }

    #[test]
    fn rejects_empty_task_payload() {
        let err = parse_gantt_diagram("gantt\nBad :\n").unwrap_err();
        assert_eq!(
            err,
            MermaidGanttParseError::InvalidTaskData {
                line_no: 2,
                line: "Bad :".to_owned(),
            }
        );
    }

    #[test]
    fn parses_accessibility_fields() {
        let input = "\
gantt
accTitle: Plan accessibility title
accDescr: Longer description for readers
Design :a1, 2024-01-01, 1d
";
        let ast = parse_gantt_diagram(input).expect("parse");
        assert_eq!(ast.acc_title(), Some("Plan accessibility title"));
        assert_eq!(ast.acc_descr(), Some("Longer description for readers"));
    }

    #[test]
    fn digit_only_payload_is_a_date_not_a_duration() {
        let input = "\
gantt
Epoch :a1, 1704067200000, 1704153600000
";
        let ast = parse_gantt_diagram(input).expect("parse");
        let task = &ast.tasks()[0];
        assert_eq!(
            task.raw_start(),
            &TimeSpec::Date("1704067200000".to_owned())
        );
        assert_eq!(task.raw_end(), &TimeSpec::Date("1704153600000".to_owned()));
    }
}
