use serde::{Deserialize, Serialize};
use std::fmt;

/// Day of the week a trade was opened on, in calendar order (Monday first).
///
/// The derived `Ord` follows declaration order, so ordered maps keyed by
/// `Weekday` iterate Mon -> Sun.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    #[serde(rename = "Mon")]
    Monday,
    #[serde(rename = "Tue")]
    Tuesday,
    #[serde(rename = "Wed")]
    Wednesday,
    #[serde(rename = "Thu")]
    Thursday,
    #[serde(rename = "Fri")]
    Friday,
    #[serde(rename = "Sat")]
    Saturday,
    #[serde(rename = "Sun")]
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// The short label used as the external key ("Mon", "Tue", ...).
    pub fn label(&self) -> &'static str {
        match self {
            Weekday::Monday => "Mon",
            Weekday::Tuesday => "Tue",
            Weekday::Wednesday => "Wed",
            Weekday::Thursday => "Thu",
            Weekday::Friday => "Fri",
            Weekday::Saturday => "Sat",
            Weekday::Sunday => "Sun",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
            chrono::Weekday::Sun => Weekday::Sunday,
        }
    }
}

/// Calendar month, January first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Month {
    #[serde(rename = "Jan")]
    January,
    #[serde(rename = "Feb")]
    February,
    #[serde(rename = "Mar")]
    March,
    #[serde(rename = "Apr")]
    April,
    #[serde(rename = "May")]
    May,
    #[serde(rename = "Jun")]
    June,
    #[serde(rename = "Jul")]
    July,
    #[serde(rename = "Aug")]
    August,
    #[serde(rename = "Sep")]
    September,
    #[serde(rename = "Oct")]
    October,
    #[serde(rename = "Nov")]
    November,
    #[serde(rename = "Dec")]
    December,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Month::January => "Jan",
            Month::February => "Feb",
            Month::March => "Mar",
            Month::April => "Apr",
            Month::May => "May",
            Month::June => "Jun",
            Month::July => "Jul",
            Month::August => "Aug",
            Month::September => "Sep",
            Month::October => "Oct",
            Month::November => "Nov",
            Month::December => "Dec",
        }
    }
}

impl Month {
    /// The month a date falls in.
    pub fn of<D: chrono::Datelike>(date: &D) -> Self {
        // `Datelike::month` is always within 1..=12.
        match date.month() {
            1 => Month::January,
            2 => Month::February,
            3 => Month::March,
            4 => Month::April,
            5 => Month::May,
            6 => Month::June,
            7 => Month::July,
            8 => Month::August,
            9 => Month::September,
            10 => Month::October,
            11 => Month::November,
            _ => Month::December,
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What to do with a trade whose timestamp cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidTradePolicy {
    /// Abort the whole batch on the first invalid trade.
    #[default]
    Reject,
    /// Leave invalid trades out and analyse the rest.
    Skip,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekdays_sort_in_calendar_order() {
        let mut days = vec![Weekday::Sunday, Weekday::Wednesday, Weekday::Monday];
        days.sort();
        assert_eq!(days, vec![Weekday::Monday, Weekday::Wednesday, Weekday::Sunday]);
    }

    #[test]
    fn serialized_keys_match_labels() {
        for day in Weekday::ALL {
            let json = serde_json::to_string(&day).unwrap();
            assert_eq!(json, format!("\"{}\"", day.label()));
        }
        for month in Month::ALL {
            let json = serde_json::to_string(&month).unwrap();
            assert_eq!(json, format!("\"{}\"", month.label()));
        }
    }

    #[test]
    fn month_of_a_date() {
        let january = chrono::NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let december = chrono::NaiveDate::from_ymd_opt(2023, 12, 1).unwrap();
        assert_eq!(Month::of(&january), Month::January);
        assert_eq!(Month::of(&december), Month::December);
        for (number, month) in (1..=12).zip(Month::ALL) {
            let date = chrono::NaiveDate::from_ymd_opt(2024, number, 15).unwrap();
            assert_eq!(Month::of(&date), month);
        }
    }

    #[test]
    fn policy_reads_snake_case() {
        let policy: InvalidTradePolicy = serde_json::from_str("\"skip\"").unwrap();
        assert_eq!(policy, InvalidTradePolicy::Skip);
        assert_eq!(InvalidTradePolicy::default(), InvalidTradePolicy::Reject);
    }
}
