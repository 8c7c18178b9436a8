// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Layout algorithms for diagrams.
//!
//! This module computes display rows and excluded-day bands for scheduled
//! Gantt tasks; pixel geometry stays with the rendering collaborator.

pub mod gantt;

pub use gantt::{layout_gantt, GanttLayout, LayoutWarning, SectionLane, TaskRow};
