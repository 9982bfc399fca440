// This file is part of the tpg-resource project
//
// Copyright (C) ANEO, 2024-2024. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License")
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use time::Duration;

const NANOSECOND: u64 = 1;
const MICROSECOND: u64 = 1_000 * NANOSECOND;
const MILLISECOND: u64 = 1_000 * MICROSECOND;
const SECOND: u64 = 1_000 * MILLISECOND;
const MINUTE: u64 = 60 * SECOND;
const HOUR: u64 = 60 * MINUTE;

/// Parse a duration written as a sequence of decimal numbers with units
///
/// The accepted syntax is the one of the Google APIs and Go: `300ms`, `-1.5h`, `2h45m`, `60.0s`.
/// Valid units are `ns`, `us` (or `µs`), `ms`, `s`, `m` and `h`. A lone `0` needs no unit.
/// Returns `None` when the input is malformed or overflows.
pub fn parse_duration(s: &str) -> Option<Duration> {
    let (negative, mut rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    if rest == "0" {
        return Some(Duration::ZERO);
    }
    if rest.is_empty() {
        return None;
    }

    let mut total: u64 = 0;
    while !rest.is_empty() {
        let (integer, after) = split_digits(rest);
        rest = after;
        let mut fraction = "";
        if let Some(after) = rest.strip_prefix('.') {
            (fraction, rest) = split_digits(after);
        }
        if integer.is_empty() && fraction.is_empty() {
            return None;
        }

        let unit_len = rest
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(rest.len());
        let (unit, after) = rest.split_at(unit_len);
        rest = after;
        let unit = unit_nanos(unit)?;

        let integer = if integer.is_empty() {
            0
        } else {
            integer.parse::<u64>().ok()?
        };
        let mut value = integer.checked_mul(unit)?;
        if !fraction.is_empty() {
            let mut scale = 1.0;
            let mut fraction_value = 0.0;
            for digit in fraction.bytes() {
                scale *= 10.0;
                fraction_value += f64::from(digit - b'0') / scale;
            }
            value = value.checked_add((fraction_value * unit as f64) as u64)?;
        }
        total = total.checked_add(value)?;
    }

    let total = i64::try_from(total).ok()?;
    Some(Duration::nanoseconds(if negative { -total } else { total }))
}

fn split_digits(s: &str) -> (&str, &str) {
    let end = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    s.split_at(end)
}

fn unit_nanos(unit: &str) -> Option<u64> {
    match unit {
        "ns" => Some(NANOSECOND),
        "us" | "µs" | "μs" => Some(MICROSECOND),
        "ms" => Some(MILLISECOND),
        "s" => Some(SECOND),
        "m" => Some(MINUTE),
        "h" => Some(HOUR),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("0", Duration::ZERO)]
    #[case("-0", Duration::ZERO)]
    #[case("0s", Duration::ZERO)]
    #[case("60s", Duration::seconds(60))]
    #[case("60.0s", Duration::seconds(60))]
    #[case("1m", Duration::seconds(60))]
    #[case("1m30s", Duration::seconds(90))]
    #[case("1.5h", Duration::minutes(90))]
    #[case(".5s", Duration::milliseconds(500))]
    #[case("5.s", Duration::seconds(5))]
    #[case("+3ms", Duration::milliseconds(3))]
    #[case("-2h45m", Duration::minutes(-165))]
    #[case("10us", Duration::microseconds(10))]
    #[case("10µs", Duration::microseconds(10))]
    #[case("1ns", Duration::nanoseconds(1))]
    #[case("3600s", Duration::hours(1))]
    fn valid(#[case] input: &str, #[case] expected: Duration) {
        assert_eq!(parse_duration(input), Some(expected));
    }

    #[rstest]
    #[case("")]
    #[case("-")]
    #[case("s")]
    #[case(".s")]
    #[case("60")]
    #[case("60x")]
    #[case("1.5")]
    #[case("1 s")]
    #[case("9999999999999999999h")]
    #[case("3000000h")]
    fn invalid(#[case] input: &str) {
        assert_eq!(parse_duration(input), None);
    }
}
