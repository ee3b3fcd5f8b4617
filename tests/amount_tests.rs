// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use tallybook::utils::{format_minor, parse_amount_minor, parse_timestamp_ms};

#[test]
fn whole_and_fraction() {
    assert_eq!(parse_amount_minor("12.5"), Some(1250));
    assert_eq!(parse_amount_minor("12"), Some(1200));
    assert_eq!(parse_amount_minor("12.50"), Some(1250));
    assert_eq!(parse_amount_minor("0.07"), Some(7));
}

#[test]
fn thousands_separators_are_stripped() {
    assert_eq!(parse_amount_minor("1,234.56"), Some(123_456));
    assert_eq!(parse_amount_minor("1,000"), Some(100_000));
}

#[test]
fn fraction_is_truncated_to_two_digits() {
    assert_eq!(parse_amount_minor("12.345"), Some(1234));
    assert_eq!(parse_amount_minor("12.999"), Some(1299));
}

#[test]
fn blank_or_garbage_is_no_value_not_zero() {
    assert_eq!(parse_amount_minor(""), None);
    assert_eq!(parse_amount_minor("   "), None);
    assert_eq!(parse_amount_minor("abc"), None);
    assert_eq!(parse_amount_minor("12.x"), None);
    assert_eq!(parse_amount_minor(".50"), None);
}

#[test]
fn trailing_dot_means_zero_fraction() {
    assert_eq!(parse_amount_minor("12."), Some(1200));
}

#[test]
fn surrounding_whitespace_is_ignored() {
    assert_eq!(parse_amount_minor("  42.01 "), Some(4201));
}

#[test]
fn format_minor_renders_two_digits() {
    assert_eq!(format_minor(0), "0.00");
    assert_eq!(format_minor(7), "0.07");
    assert_eq!(format_minor(1250), "12.50");
    assert_eq!(format_minor(-50), "-0.50");
    assert_eq!(format_minor(-123_456), "-1234.56");
}

#[test]
fn timestamps_parse_with_and_without_time() {
    assert_eq!(parse_timestamp_ms("1970-01-01 00:00").unwrap(), 0);
    assert_eq!(parse_timestamp_ms("1970-01-02").unwrap(), 86_400_000);
    assert!(parse_timestamp_ms("not a date").is_err());
}
