// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Domain layer: pure data types and aggregation shared between UI and persistence.

pub mod entry;
pub mod store;
pub mod summary;

pub use entry::TimesheetEntry;
pub use store::TimesheetStore;
pub use summary::Summary;
