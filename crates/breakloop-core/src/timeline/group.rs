//! Day-grouping of urges.
//!
//! Groups are computed in the caller's UTC offset so that a late-night
//! urge lands on the day the user experienced it, not the UTC day.

use chrono::{FixedOffset, NaiveDate, Utc};
use serde::Serialize;

use crate::urge::Urge;

/// One day's worth of urges on the timeline.
#[derive(Debug, Clone, Serialize)]
pub struct DayGroup {
    /// Calendar date of the bucket, in the offset handed to the grouper.
    pub date: NaiveDate,
    /// Heading for the bucket: "Today", "Yesterday", or a long-form date.
    pub label: String,
    /// Urges of that day, latest first.
    pub urges: Vec<Urge>,
}

/// Heading for a day bucket relative to `today`.
///
/// `"Today"` and `"Yesterday"` for the two most recent days, otherwise a
/// long-form date such as `"February 10, 2026"`. Future dates always get
/// the long form.
pub fn day_label(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        "Today".to_string()
    } else if today.pred_opt() == Some(date) {
        "Yesterday".to_string()
    } else {
        date.format("%B %-d, %Y").to_string()
    }
}

/// Group urges into day buckets for display.
///
/// Each urge is bucketed by the calendar day of its occurrence time in
/// `offset`; `today` anchors the "Today"/"Yesterday" headings. Buckets are
/// ordered most recent day first and urges inside a bucket latest first.
/// The input order does not matter. An empty slice yields no buckets.
pub fn group_by_day(urges: &[Urge], offset: FixedOffset, today: NaiveDate) -> Vec<DayGroup> {
    let mut sorted: Vec<Urge> = urges.to_vec();
    sorted.sort_by(|a, b| b.time().cmp(&a.time()));

    // Descending times give non-increasing dates, so one pass over the
    // sorted urges can never reopen an earlier bucket.
    let mut groups: Vec<DayGroup> = Vec::new();
    for urge in sorted {
        let date = urge.time().with_timezone(&offset).date_naive();
        match groups.last_mut() {
            Some(group) if group.date == date => group.urges.push(urge),
            _ => groups.push(DayGroup {
                date,
                label: day_label(date, today),
                urges: vec![urge],
            }),
        }
    }
    groups
}

/// [`group_by_day`] anchored to the current wall-clock day in `offset`.
pub fn group_by_day_now(urges: &[Urge], offset: FixedOffset) -> Vec<DayGroup> {
    let today = Utc::now().with_timezone(&offset).date_naive();
    group_by_day(urges, offset, today)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone};

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn urge_at(time: DateTime<Utc>) -> Urge {
        Urge::new(time, "habit-1", "test context").unwrap()
    }

    #[test]
    fn labels_today_and_yesterday() {
        let today = date(2026, 2, 12);
        assert_eq!(day_label(date(2026, 2, 12), today), "Today");
        assert_eq!(day_label(date(2026, 2, 11), today), "Yesterday");
    }

    #[test]
    fn labels_older_days_with_long_form_date() {
        let today = date(2026, 2, 12);
        assert_eq!(day_label(date(2026, 2, 10), today), "February 10, 2026");
        assert_eq!(day_label(date(2025, 12, 31), today), "December 31, 2025");
    }

    #[test]
    fn labels_future_days_with_long_form_date() {
        let today = date(2026, 2, 12);
        assert_eq!(day_label(date(2026, 2, 13), today), "February 13, 2026");
    }

    #[test]
    fn groups_descend_by_day_and_urges_descend_within_a_day() {
        let today = date(2026, 2, 12);
        let noon_old = urge_at(Utc.with_ymd_and_hms(2026, 2, 9, 12, 0, 0).unwrap());
        let late = urge_at(Utc.with_ymd_and_hms(2026, 2, 12, 15, 0, 0).unwrap());
        let early = urge_at(Utc.with_ymd_and_hms(2026, 2, 12, 9, 0, 0).unwrap());

        // Deliberately scrambled input order.
        let groups = group_by_day(
            &[noon_old.clone(), late.clone(), early.clone()],
            utc(),
            today,
        );

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].date, date(2026, 2, 12));
        assert_eq!(groups[0].label, "Today");
        assert_eq!(groups[0].urges, vec![late, early]);
        assert_eq!(groups[1].date, date(2026, 2, 9));
        assert_eq!(groups[1].label, "February 9, 2026");
        assert_eq!(groups[1].urges, vec![noon_old]);
    }

    #[test]
    fn every_urge_lands_in_exactly_one_group() {
        let today = date(2026, 2, 12);
        let urges: Vec<Urge> = (0..10)
            .map(|i| urge_at(Utc.with_ymd_and_hms(2026, 2, 1 + i, 8, 30, 0).unwrap()))
            .collect();

        let groups = group_by_day(&urges, utc(), today);

        let total: usize = groups.iter().map(|g| g.urges.len()).sum();
        assert_eq!(total, urges.len());
        for pair in groups.windows(2) {
            assert!(pair[0].date > pair[1].date);
        }
    }

    #[test]
    fn urges_at_the_same_instant_share_a_group() {
        let today = date(2026, 2, 12);
        let t = Utc.with_ymd_and_hms(2026, 2, 12, 10, 0, 0).unwrap();
        let groups = group_by_day(&[urge_at(t), urge_at(t)], utc(), today);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].urges.len(), 2);
    }

    #[test]
    fn offset_decides_which_day_a_late_urge_belongs_to() {
        let today = date(2026, 2, 12);
        let t = Utc.with_ymd_and_hms(2026, 2, 10, 23, 30, 0).unwrap();
        let urge = urge_at(t);

        let utc_groups = group_by_day(std::slice::from_ref(&urge), utc(), today);
        assert_eq!(utc_groups[0].date, date(2026, 2, 10));

        // 23:30 UTC is already past midnight two hours east.
        let east = FixedOffset::east_opt(2 * 3600).unwrap();
        let east_groups = group_by_day(std::slice::from_ref(&urge), east, today);
        assert_eq!(east_groups[0].date, date(2026, 2, 11));
    }

    #[test]
    fn spans_month_boundaries() {
        let today = date(2026, 3, 2);
        let march = urge_at(Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap());
        let february = urge_at(Utc.with_ymd_and_hms(2026, 2, 28, 10, 0, 0).unwrap());

        let groups = group_by_day(&[february, march], utc(), today);

        assert_eq!(groups[0].label, "Yesterday");
        assert_eq!(groups[1].label, "February 28, 2026");
    }

    #[test]
    fn empty_input_yields_no_groups() {
        assert!(group_by_day(&[], utc(), date(2026, 2, 12)).is_empty());
    }

    #[test]
    fn group_by_day_now_puts_a_fresh_urge_under_today() {
        let urge = urge_at(Utc::now());
        let groups = group_by_day_now(std::slice::from_ref(&urge), utc());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].label, "Today");
    }
}
