// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Record storage seam.
//!
//! The relational store belongs to the host application. This crate only
//! needs a batch lookup by primary key (result mapping) and a full scan
//! (index rebuilds), expressed by [`traits::RecordStore`].

pub mod traits;
pub mod memory;
