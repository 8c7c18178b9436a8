// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mermaid-ish parsing for the Gantt diagram kind.

pub mod gantt;
mod ident;

pub use gantt::{parse_gantt_diagram, GanttDirective, MermaidGanttParseError};
pub use ident::MermaidIdentError;
