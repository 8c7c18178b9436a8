// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Naiad — Gantt DSL compiler and interval scheduler for Mermaid-backed timelines.
//!
//! The pipeline is three pure stages: [`format::mermaid::parse_gantt_diagram`]
//! builds a [`model::GanttAst`] from source text,
//! [`schedule::schedule_gantt`] resolves symbolic task times into absolute
//! timestamps, and [`layout::layout_gantt`] packs tasks into display rows and
//! computes excluded-day bands. Rendering surfaces consume the results
//! read-only.

pub mod format;
pub mod layout;
pub mod model;
pub mod schedule;
