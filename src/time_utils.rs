// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time handling.

use chrono::{DateTime, SecondsFormat, Utc};

/// Current Unix time in seconds.
pub fn now_unix() -> i64 {
    Utc::now().timestamp()
}

/// Format a Unix timestamp as RFC3339 with a `Z` suffix. `None` if the
/// timestamp is out of range.
pub fn format_unix_rfc3339(secs: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp(secs, 0).map(|d| d.to_rfc3339_opts(SecondsFormat::Secs, true))
}
