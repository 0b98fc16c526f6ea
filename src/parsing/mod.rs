// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Field parsers for OCR text
//!
//! Parsers never fail loudly: unparsable input yields `None` and the
//! caller substitutes the field's sentinel.

pub mod date;
pub mod number;

pub use date::{parse_date, parse_date_at};
pub use number::parse_number;
