//! Calendar arithmetic for timestamp resolution.
//!
//! Timestamps are canonical `"YYYY:JJJ:HH:MM"` strings built from a year
//! and day-of-year. The conversions honour the Gregorian adoption of
//! September 1752, when eleven days were dropped, so historical reference
//! times normalise the same way everywhere else in the ecosystem.

/// Cumulative days at the end of each month in a normal year.
const LDMONTH: [i32; 13] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334, 365];

fn leap(year: i32) -> bool {
    if year < 0 {
        return (-1 - year) % 4 == 0;
    }
    let by_four = year % 4 == 0;
    if year <= 1752 {
        return by_four;
    }
    by_four && (year % 100 != 0 || year % 400 == 0)
}

/// Day of year on which the given month ends.
fn jmonth(year: i32, month: i32) -> i32 {
    let mut month = month;
    let mut year = year;
    year += vnorm(&mut month, 1, 12);
    if year == 0 {
        year += 1;
    }

    let m = month as usize;
    let normal = LDMONTH[m];
    let with_leap = if m < 2 { normal } else { normal + 1 };
    if year == 1752 {
        // Eleven days were dropped in September 1752.
        if m < 9 {
            with_leap
        } else {
            with_leap - 11
        }
    } else if leap(year) {
        with_leap
    } else {
        normal
    }
}

/// Number of days in the given year (365, 366, or 355 in 1752).
fn ndyear(year: i32) -> i32 {
    jmonth(year, 12)
}

/// Brings `value` into `[min, max]` and returns the carry into the next
/// larger unit.
fn vnorm(value: &mut i32, min: i32, max: i32) -> i32 {
    let range = max - min + 1;
    let carry = (*value - min).div_euclid(range);
    *value = (*value - min).rem_euclid(range) + min;
    carry
}

/// Converts a conventional date to a day of year.
pub(crate) fn jdate(year: i32, month: i32, day: i32) -> i32 {
    let mut jday = day;
    if month > 1 {
        jday += jmonth(year, month - 1);
    }
    if year == 1752 && month == 9 && day >= 14 {
        jday -= 11;
    }
    jday
}

/// Normalizes a (year, day-of-year) pair after arithmetic pushed the day
/// out of range.
pub(crate) fn jnorm(year: &mut i32, jday: &mut i32) {
    while *jday > ndyear(*year) {
        *jday -= ndyear(*year);
        *year += 1;
    }
    while *jday <= 0 {
        *year -= 1;
        *jday += ndyear(*year);
    }
}

/// Normalizes a full date-time so every element is in range, carrying
/// overflow upward.
pub(crate) fn tnorm(year: &mut i32, jday: &mut i32, hour: &mut i32, minute: &mut i32) {
    *hour += vnorm(minute, 0, 59);
    *jday += vnorm(hour, 0, 23);
    jnorm(year, jday);
}

/// Formats the canonical timestamp string.
pub(crate) fn build_tstamp(year: i32, jday: i32, hour: i32, minute: i32) -> String {
    format!("{year:04}:{jday:03}:{hour:02}:{minute:02}")
}

/// Expands a possibly-abbreviated year. Values of 100 and over follow
/// the coded-century convention (1900 + value); two-digit years fall in
/// the 100-year window starting 49 years before the anchor.
pub(crate) fn full_year(abbrev: i32, anchor_year: i32) -> i32 {
    if abbrev >= 100 {
        return 1900 + abbrev;
    }
    let start = anchor_year - 49;
    let mut year = abbrev + (start / 100) * 100;
    if year < start {
        year += 100;
    }
    year
}
