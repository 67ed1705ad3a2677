//! Recurring-payment date engine.
//!
//! Pure calendar math: given an anchor date and a billing cycle, find the
//! next occurrence on/after a reference date. Day-of-month anchors clamp to
//! the end of shorter months and snap back in longer ones (an anchor on the
//! 31st pays on Feb 28/29 and again on Mar 31), and Feb 29 anchors clamp to
//! Feb 28 outside leap years.

use chrono::{Datelike, Duration, NaiveDate};

use crate::domain::{BillingCycle, Subscription};

/// Earliest date on/after `reference` reachable from `anchor` by advancing
/// whole billing periods. An anchor that is still in the future is returned
/// unchanged; so is an anchor equal to the reference.
pub fn next_payment_date(
    anchor: NaiveDate,
    reference: NaiveDate,
    cycle: BillingCycle,
) -> NaiveDate {
    if anchor >= reference {
        return anchor;
    }
    let mut steps = 0;
    let mut candidate = anchor;
    while candidate < reference {
        steps += 1;
        candidate = match cycle {
            BillingCycle::Monthly => shift_month(anchor, steps),
            BillingCycle::Yearly => shift_year(anchor, steps),
        };
    }
    candidate
}

/// Whether the subscription's next payment relative to `month_start` lands
/// inside that calendar month.
pub fn due_in_month(subscription: &Subscription, month_start: NaiveDate) -> bool {
    let due = next_payment_date(
        subscription.anchor_date,
        month_start,
        subscription.billing_cycle,
    );
    same_month(due, month_start)
}

pub fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

/// First day of the given calendar month. Months outside 1..=12 are clamped.
pub fn month_start(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month.clamp(1, 12), 1).expect("valid first of month")
}

/// Moves a date by whole months, re-applying the source day-of-month and
/// clamping to the target month's last day when it is shorter.
pub fn shift_month(date: NaiveDate, months: i32) -> NaiveDate {
    let mut year = date.year();
    let mut month = date.month() as i32 + months;
    let mut day = date.day();
    while month > 12 {
        month -= 12;
        year += 1;
    }
    while month < 1 {
        month += 12;
        year -= 1;
    }
    day = day.min(days_in_month(year, month as u32));
    NaiveDate::from_ymd_opt(year, month as u32, day).expect("clamped day fits month")
}

/// Moves a date by whole years, clamping Feb 29 to Feb 28 off leap years.
pub fn shift_year(date: NaiveDate, years: i32) -> NaiveDate {
    let year = date.year() + years;
    let month = date.month();
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).expect("clamped day fits month")
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };
    let first_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, month, 28).expect("fallback date"));
    let last_current = first_next - Duration::days(1);
    last_current.day()
}

pub fn month_label(month: u32) -> &'static str {
    match month {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        12 => "Dec",
        _ => "",
    }
}
