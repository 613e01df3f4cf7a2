//! Due-date status classification.
//!
//! Pure functions that map an obligation's due date onto the four-level
//! urgency vocabulary using the day windows in the registry. Persistence
//! never happens here; callers decide whether to store the result.

use crate::registry::{ObligationKind, Status};
use chrono::NaiveDate;

/// Classifies an obligation by how many days remain until its due date.
///
/// The day windows come from the kind's registry record. With the standard
/// windows: more than 7 days out is `Early`, 3 to 7 days is `Soon`, 1 or 2
/// days is `Urgent`, and the due day itself or anything past it is
/// `Overdue`. Total over all date pairs; same-day comparison counts as zero
/// days remaining.
#[must_use]
pub fn classify(kind: ObligationKind, due_date: NaiveDate, today: NaiveDate) -> Status {
    let days_remaining = (due_date - today).num_days();
    let thresholds = kind.spec().thresholds;

    if days_remaining <= 0 {
        Status::Overdue
    } else if days_remaining <= thresholds.urgent_within {
        Status::Urgent
    } else if days_remaining <= thresholds.soon_within {
        Status::Soon
    } else {
        Status::Early
    }
}

/// Orders obligations for presentation: most pressing status first, then
/// earliest due date, so the top of a listing is always the next action.
#[must_use]
pub fn presentation_order(
    a: (Status, NaiveDate),
    b: (Status, NaiveDate),
) -> std::cmp::Ordering {
    (a.0.priority(), a.1).cmp(&(b.0.priority(), b.1))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_classify_well_before_due() {
        let today = date(2025, 3, 1);
        for kind in ObligationKind::ALL {
            assert_eq!(classify(kind, date(2025, 3, 9), today), Status::Early);
            assert_eq!(classify(kind, date(2026, 3, 1), today), Status::Early);
        }
    }

    #[test]
    fn test_classify_soon_window() {
        let today = date(2025, 3, 1);
        for kind in ObligationKind::ALL {
            assert_eq!(classify(kind, date(2025, 3, 4), today), Status::Soon);
            assert_eq!(classify(kind, date(2025, 3, 8), today), Status::Soon);
        }
    }

    #[test]
    fn test_classify_urgent_window_is_reachable() {
        let today = date(2025, 3, 1);
        for kind in ObligationKind::ALL {
            assert_eq!(classify(kind, date(2025, 3, 2), today), Status::Urgent);
            assert_eq!(classify(kind, date(2025, 3, 3), today), Status::Urgent);
        }
    }

    #[test]
    fn test_classify_due_today_is_overdue() {
        let today = date(2025, 3, 1);
        for kind in ObligationKind::ALL {
            assert_eq!(classify(kind, today, today), Status::Overdue);
        }
    }

    #[test]
    fn test_classify_past_due_is_overdue() {
        let today = date(2025, 3, 10);
        for kind in ObligationKind::ALL {
            assert_eq!(classify(kind, date(2025, 3, 9), today), Status::Overdue);
            assert_eq!(classify(kind, date(2024, 3, 10), today), Status::Overdue);
        }
    }

    #[test]
    fn test_classify_cis_five_days_out() {
        let today = date(2025, 6, 14);
        assert_eq!(
            classify(ObligationKind::Cis, date(2025, 6, 19), today),
            Status::Soon
        );
    }

    #[test]
    fn test_classify_boundary_sweep() {
        // Exact transition days with the standard windows
        let today = date(2025, 1, 15);
        let cases = [
            (-1_i64, Status::Overdue),
            (0, Status::Overdue),
            (1, Status::Urgent),
            (2, Status::Urgent),
            (3, Status::Soon),
            (7, Status::Soon),
            (8, Status::Early),
        ];
        for (days, expected) in cases {
            let due = today + chrono::Duration::days(days);
            assert_eq!(
                classify(ObligationKind::Account, due, today),
                expected,
                "{days} days out should be {expected}"
            );
        }
    }

    #[test]
    fn test_classify_crosses_month_and_year_ends() {
        assert_eq!(
            classify(ObligationKind::PayRun, date(2025, 1, 2), date(2024, 12, 31)),
            Status::Urgent
        );
        assert_eq!(
            classify(ObligationKind::Vat, date(2025, 3, 3), date(2025, 2, 27)),
            Status::Soon
        );
    }

    #[test]
    fn test_presentation_order_sorts_status_then_date() {
        let overdue_late = (Status::Overdue, date(2025, 3, 20));
        let overdue_early = (Status::Overdue, date(2025, 3, 1));
        let urgent = (Status::Urgent, date(2025, 2, 1));
        let early = (Status::Early, date(2024, 1, 1));

        assert_eq!(
            presentation_order(overdue_early, overdue_late),
            std::cmp::Ordering::Less
        );
        assert_eq!(
            presentation_order(overdue_late, urgent),
            std::cmp::Ordering::Less
        );
        assert_eq!(presentation_order(urgent, early), std::cmp::Ordering::Less);
    }
}
