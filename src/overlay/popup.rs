// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Wirework-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Wirework and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Popup content helpers: relative time labels, badge labels, row building.

use crate::model::ContactVisit;
use crate::surface::PopupRow;

/// Rows shown in the recent-contacts popup are capped at this many.
pub const RECENT_CONTACTS_LIMIT: usize = 5;

/// Badge counts above this render as `999+`.
const BADGE_COUNT_CAP: u64 = 999;

/// Relative time label with integer minute/hour/day thresholds.
pub fn relative_label(now_ms: i64, then_ms: i64) -> String {
    let elapsed_ms = now_ms.saturating_sub(then_ms).max(0);
    let minutes = elapsed_ms / 60_000;
    if minutes < 1 {
        return "just now".to_owned();
    }
    if minutes < 60 {
        return format!("{minutes}m ago");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{hours}h ago");
    }
    format!("{}d ago", hours / 24)
}

/// Formats a badge count, capping at `999+`.
pub fn format_count(count: u64) -> String {
    if count > BADGE_COUNT_CAP {
        return "999+".to_owned();
    }
    let mut buf = itoa::Buffer::new();
    buf.format(count).to_owned()
}

/// Builds at most [`RECENT_CONTACTS_LIMIT`] display rows from fetched visits.
pub fn build_rows(now_ms: i64, visits: &[ContactVisit]) -> Vec<PopupRow> {
    visits
        .iter()
        .take(RECENT_CONTACTS_LIMIT)
        .map(|visit| PopupRow {
            contact_id: visit.contact().as_str().to_owned(),
            title: visit
                .name()
                .unwrap_or(visit.contact().as_str())
                .to_owned(),
            detail: visit.operand().map(str::to_owned),
            when: visit.time_ms().map(|then| relative_label(now_ms, then)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use crate::model::{ContactId, ContactVisit};

    use super::{build_rows, format_count, relative_label, RECENT_CONTACTS_LIMIT};

    const MINUTE: i64 = 60_000;
    const HOUR: i64 = 60 * MINUTE;
    const DAY: i64 = 24 * HOUR;

    #[rstest]
    #[case(0, "just now")]
    #[case(MINUTE - 1, "just now")]
    #[case(MINUTE, "1m ago")]
    #[case(59 * MINUTE, "59m ago")]
    #[case(HOUR, "1h ago")]
    #[case(23 * HOUR + 59 * MINUTE, "23h ago")]
    #[case(DAY, "1d ago")]
    #[case(3 * DAY + 5 * HOUR, "3d ago")]
    fn relative_label_thresholds(#[case] elapsed: i64, #[case] expected: &str) {
        let now = 10 * DAY;
        assert_eq!(relative_label(now, now - elapsed), expected);
    }

    #[test]
    fn relative_label_clamps_future_timestamps() {
        assert_eq!(relative_label(0, HOUR), "just now");
    }

    #[rstest]
    #[case(0, "0")]
    #[case(12, "12")]
    #[case(999, "999")]
    #[case(1000, "999+")]
    fn format_count_caps(#[case] count: u64, #[case] expected: &str) {
        assert_eq!(format_count(count), expected);
    }

    #[test]
    fn build_rows_caps_and_falls_back_to_contact_id() {
        let visits = (0..8)
            .map(|idx| {
                ContactVisit::new(
                    ContactId::new(format!("c{idx}")).expect("contact id"),
                    (idx == 0).then(|| "Ann".to_owned()),
                    None,
                    Some(0),
                )
            })
            .collect::<Vec<_>>();

        let rows = build_rows(2 * MINUTE, &visits);
        assert_eq!(rows.len(), RECENT_CONTACTS_LIMIT);
        assert_eq!(rows[0].title, "Ann");
        assert_eq!(rows[1].title, "c1");
        assert_eq!(rows[0].when.as_deref(), Some("2m ago"));
    }
}
