//! Groups dated amounts into Sunday-to-Saturday weeks of a billing period.
//!
//! Records are bucketed by the calendar week they fall in. The week a
//! bucket covers may start before or end after the billing period, in which
//! case the dates shown in its label are clipped to the period so that a
//! report never shows days outside of it.

use std::collections::BTreeMap;

use time::{Date, Duration};

use crate::{billing_period::PeriodRange, money::Amount};

/// A record with a date and an amount of money that can be grouped by week.
pub trait DatedAmount {
    /// The day the record happened.
    fn date(&self) -> Date;

    /// The amount of money the record is for.
    fn amount(&self) -> Amount;
}

/// The records that fall in one calendar week of a billing period.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekBucket<T> {
    /// The label shown for the week, e.g. "Semana (01/09 - 06/09)".
    pub label: String,
    /// The Sunday the calendar week starts on. May precede the billing period.
    pub week_start: Date,
    /// The first day of the week that lies within the billing period.
    pub display_start: Date,
    /// The last day of the week that lies within the billing period.
    pub display_end: Date,
    /// The sum of the amounts of `records`.
    pub total: Amount,
    /// The records in this week, in the order they were given.
    pub records: Vec<T>,
}

/// The Sunday on or before `date`.
pub fn week_start(date: Date) -> Date {
    let days_since_sunday = date.weekday().number_days_from_sunday();

    date.saturating_sub(Duration::days(days_since_sunday.into()))
}

/// The Saturday that ends the week starting on `week_start`.
fn week_end(week_start: Date) -> Date {
    week_start.saturating_add(Duration::days(6))
}

/// Format the label for a week shown from `start` to `end`.
pub fn week_label(start: Date, end: Date) -> String {
    format!(
        "Semana ({:02}/{:02} - {:02}/{:02})",
        start.day(),
        u8::from(start.month()),
        end.day(),
        u8::from(end.month())
    )
}

/// Group `records` into the calendar weeks of `period`, earliest week first.
///
/// Weeks start on Sunday. Records are grouped by the unclipped start of
/// their week, while each bucket's display dates are clipped to `period`.
/// Weeks without records are not included, so no records yields no weeks.
pub fn group_by_week<T: DatedAmount>(period: PeriodRange, records: Vec<T>) -> Vec<WeekBucket<T>> {
    let mut weeks: BTreeMap<Date, WeekBucket<T>> = BTreeMap::new();

    for record in records {
        let start = week_start(record.date());

        let bucket = weeks.entry(start).or_insert_with(|| {
            let display_start = start.clamp(period.start(), period.end());
            let display_end = week_end(start).clamp(period.start(), period.end());

            WeekBucket {
                label: week_label(display_start, display_end),
                week_start: start,
                display_start,
                display_end,
                total: Amount::ZERO,
                records: Vec::new(),
            }
        });

        bucket.total += record.amount();
        bucket.records.push(record);
    }

    weeks.into_values().collect()
}

#[cfg(test)]
mod tests {
    use time::{Date, Weekday, macros::date};

    use crate::{billing_period::PeriodRange, money::Amount};

    use super::{DatedAmount, group_by_week, week_label, week_start};

    #[derive(Debug, Clone, PartialEq)]
    struct Record {
        id: i64,
        date: Date,
        cents: i64,
    }

    impl DatedAmount for Record {
        fn date(&self) -> Date {
            self.date
        }

        fn amount(&self) -> Amount {
            Amount::from_cents(self.cents)
        }
    }

    fn record(id: i64, date: Date, cents: i64) -> Record {
        Record { id, date, cents }
    }

    fn september() -> PeriodRange {
        PeriodRange::new(date!(2025 - 09 - 01), date!(2025 - 09 - 30)).unwrap()
    }

    #[test]
    fn sunday_starts_its_own_week() {
        let sunday = date!(2025 - 09 - 07);
        assert_eq!(sunday.weekday(), Weekday::Sunday);

        assert_eq!(week_start(sunday), sunday);
    }

    #[test]
    fn saturday_belongs_to_previous_sunday() {
        assert_eq!(week_start(date!(2025 - 09 - 13)), date!(2025 - 09 - 07));
    }

    #[test]
    fn week_start_crosses_month_boundary() {
        assert_eq!(week_start(date!(2025 - 09 - 01)), date!(2025 - 08 - 31));
    }

    #[test]
    fn label_is_zero_padded() {
        assert_eq!(
            week_label(date!(2025 - 01 - 05), date!(2025 - 01 - 11)),
            "Semana (05/01 - 11/01)"
        );
    }

    #[test]
    fn no_records_gives_no_weeks() {
        let weeks = group_by_week::<Record>(september(), Vec::new());

        assert!(weeks.is_empty());
    }

    #[test]
    fn first_week_is_clipped_to_period_start() {
        let weeks = group_by_week(
            september(),
            vec![
                record(1, date!(2025 - 09 - 01), 10000),
                record(2, date!(2025 - 09 - 06), 5000),
            ],
        );

        assert_eq!(weeks.len(), 1);
        let week = &weeks[0];
        assert_eq!(week.week_start, date!(2025 - 08 - 31));
        assert_eq!(week.display_start, date!(2025 - 09 - 01));
        assert_eq!(week.display_end, date!(2025 - 09 - 06));
        assert_eq!(week.label, "Semana (01/09 - 06/09)");
        assert_eq!(week.total, Amount::from_cents(15000));
    }

    #[test]
    fn sunday_record_opens_a_new_week() {
        let weeks = group_by_week(
            september(),
            vec![
                record(1, date!(2025 - 09 - 01), 10000),
                record(2, date!(2025 - 09 - 07), 5000),
            ],
        );

        let labels: Vec<&str> = weeks.iter().map(|week| week.label.as_str()).collect();
        assert_eq!(labels, ["Semana (01/09 - 06/09)", "Semana (07/09 - 13/09)"]);
        assert_eq!(weeks[0].total, Amount::from_cents(10000));
        assert_eq!(weeks[1].total, Amount::from_cents(5000));
    }

    #[test]
    fn last_week_is_clipped_to_period_end() {
        let weeks = group_by_week(september(), vec![record(1, date!(2025 - 09 - 30), 1)]);

        assert_eq!(weeks[0].week_start, date!(2025 - 09 - 28));
        assert_eq!(weeks[0].label, "Semana (28/09 - 30/09)");
    }

    #[test]
    fn weeks_are_sorted_when_records_are_not() {
        let weeks = group_by_week(
            september(),
            vec![
                record(1, date!(2025 - 09 - 25), 1),
                record(2, date!(2025 - 09 - 02), 1),
                record(3, date!(2025 - 09 - 16), 1),
                record(4, date!(2025 - 09 - 03), 1),
            ],
        );

        let starts: Vec<Date> = weeks.iter().map(|week| week.week_start).collect();
        assert_eq!(
            starts,
            [
                date!(2025 - 08 - 31),
                date!(2025 - 09 - 14),
                date!(2025 - 09 - 21)
            ]
        );
        let first_week_ids: Vec<i64> = weeks[0].records.iter().map(|record| record.id).collect();
        assert_eq!(first_week_ids, [2, 4]);
    }

    #[test]
    fn every_record_lands_in_exactly_one_week() {
        let records: Vec<Record> = (0..30)
            .map(|day| {
                record(
                    day,
                    date!(2025 - 09 - 01).saturating_add(time::Duration::days(day)),
                    day * 100,
                )
            })
            .collect();

        let weeks = group_by_week(september(), records.clone());

        let mut grouped: Vec<Record> = weeks.into_iter().flat_map(|week| week.records).collect();
        grouped.sort_by_key(|record| record.id);
        assert_eq!(grouped, records);
    }

    #[test]
    fn display_dates_stay_within_period() {
        let period = september();
        let weeks = group_by_week(
            period,
            vec![
                record(1, date!(2025 - 08 - 20), 1),
                record(2, date!(2025 - 09 - 10), 1),
                record(3, date!(2025 - 10 - 15), 1),
            ],
        );

        for week in &weeks {
            assert!(period.contains(week.display_start), "{week:?}");
            assert!(period.contains(week.display_end), "{week:?}");
            assert!(week.display_start <= week.display_end, "{week:?}");
        }
    }

    #[test]
    fn totals_are_exact() {
        let weeks = group_by_week(
            september(),
            vec![
                record(1, date!(2025 - 09 - 02), 10),
                record(2, date!(2025 - 09 - 03), 20),
            ],
        );

        assert_eq!(weeks[0].total.to_string(), "0.30");
    }
}
