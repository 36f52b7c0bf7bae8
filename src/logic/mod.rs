// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Side-effecting business logic kept out of the UI layer.

pub mod persistence;
