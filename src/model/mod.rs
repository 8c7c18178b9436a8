// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model and AST types.
//!
//! A parse produces one [`GanttAst`]: config directives, sections, and tasks
//! with symbolic time specifications.

pub mod gantt_ast;
pub mod ids;

pub use gantt_ast::{
    CallbackBinding, DisplayMode, GanttAst, GanttTask, TaskFlags, TickInterval, TickUnit, TimeSpec,
    TodayMarker, WeekendDay, DEFAULT_DATE_FORMAT,
};
pub use ids::{Id, IdError, TaskId};
