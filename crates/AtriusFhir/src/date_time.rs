use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::Arc;
use chrono::{DateTime as ChronoDateTime, FixedOffset, NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use atrius_fhirpath_support::evaluation_result::EvaluationResult;
use atrius_fhirpath_support::traits::IntoEvaluationResult;
use atrius_fhirpath_support::type_info::TypeInfoResult;

static DATE_TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(\d{4})(?:-(\d{2})(?:-(\d{2})(?:T(\d{2}):(\d{2}):(\d{2})(\.\d+)?(Z|[+-]\d{2}:\d{2})?)?)?)?$",
    )
    .expect("date-time pattern is valid")
});

static TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{2}):(\d{2}):(\d{2})(\.\d+)?$").expect("time pattern is valid"));

/// A lexical value that does not match the FHIR grammar for its type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid FHIR {kind} value '{value}'")]
pub struct DateTimeParseError {
    pub kind: &'static str,
    pub value: String,
}

/// Precision levels for FHIR Date values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatePrecision {
    /// YYYY
    Year,
    /// YYYY-MM
    YearMonth,
    /// YYYY-MM-DD
    Full,
}

/// Precision levels for FHIR DateTime values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DateTimePrecision {
    Year,
    YearMonth,
    Date,
    /// Date and time to the second.
    Second,
    /// Date and time with a fractional second.
    Fraction,
}

/// Precision levels for FHIR Time values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimePrecision {
    Second,
    Fraction,
}

fn parse_time_of_day(h: &str, m: &str, s: &str, fraction: Option<&str>) -> Option<NaiveTime> {
    let (hour, minute, second) = (h.parse().ok()?, m.parse().ok()?, s.parse::<u32>().ok()?);
    let nanos = match fraction {
        Some(f) => {
            let digits = &f[1..];
            let padded: String = digits.chars().chain(std::iter::repeat('0')).take(9).collect();
            padded.parse::<u32>().ok()?
        }
        None => 0,
    };
    // A leap second is carried by chrono as second 59 with nanos past one billion.
    if second == 60 {
        NaiveTime::from_hms_nano_opt(hour, minute, 59, 1_000_000_000 + nanos)
    } else {
        NaiveTime::from_hms_nano_opt(hour, minute, second, nanos)
    }
}

fn parse_offset(tz: &str) -> Option<FixedOffset> {
    if tz == "Z" {
        return FixedOffset::east_opt(0);
    }
    let sign = if tz.starts_with('-') { -1 } else { 1 };
    let hours: i32 = tz[1..3].parse().ok()?;
    let minutes: i32 = tz[4..6].parse().ok()?;
    if hours > 14 || minutes > 59 || (hours == 14 && minutes > 0) {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Precision-aware FHIR `date`.
///
/// Keeps the original lexical form; equality and hashing use it, so
/// `2024-03` and `2024-03-01` are different values.
///
/// ```rust
/// use atrius_fhir_lib::date_time::{DatePrecision, PrecisionDate};
///
/// let date = PrecisionDate::parse("2024-03").unwrap();
/// assert_eq!(date.precision(), DatePrecision::YearMonth);
/// assert_eq!(date.original_string(), "2024-03");
/// assert!(PrecisionDate::parse("2024-02-30").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct PrecisionDate {
    year: i32,
    month: Option<u32>,
    day: Option<u32>,
    precision: DatePrecision,
    original_string: Arc<str>,
}

impl PrecisionDate {
    pub fn from_year(year: i32) -> Self {
        Self {
            year,
            month: None,
            day: None,
            precision: DatePrecision::Year,
            original_string: Arc::from(format!("{:04}", year)),
        }
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Self {
        Self {
            year,
            month: Some(month),
            day: Some(day),
            precision: DatePrecision::Full,
            original_string: Arc::from(format!("{:04}-{:02}-{:02}", year, month, day)),
        }
    }

    /// Parses `YYYY`, `YYYY-MM` or `YYYY-MM-DD`, checking calendar validity.
    pub fn parse(s: &str) -> Option<Self> {
        let caps = DATE_TIME_RE.captures(s)?;
        if caps.get(4).is_some() {
            return None;
        }
        Self::from_captures(&caps, s)
    }

    fn from_captures(caps: &regex::Captures<'_>, original: &str) -> Option<Self> {
        let year: i32 = caps[1].parse().ok()?;
        let month = caps.get(2).map(|m| m.as_str().parse::<u32>()).transpose().ok()?;
        let day = caps.get(3).map(|d| d.as_str().parse::<u32>()).transpose().ok()?;
        if let Some(m) = month
            && !(1..=12).contains(&m)
        {
            return None;
        }
        if let (Some(m), Some(d)) = (month, day) {
            NaiveDate::from_ymd_opt(year, m, d)?;
        }
        let precision = match (month, day) {
            (None, _) => DatePrecision::Year,
            (Some(_), None) => DatePrecision::YearMonth,
            (Some(_), Some(_)) => DatePrecision::Full,
        };
        let date_len = match precision {
            DatePrecision::Year => 4,
            DatePrecision::YearMonth => 7,
            DatePrecision::Full => 10,
        };
        Some(Self {
            year,
            month,
            day,
            precision,
            original_string: Arc::from(&original[..date_len]),
        })
    }

    pub fn precision(&self) -> DatePrecision {
        self.precision
    }

    pub fn original_string(&self) -> &str {
        &self.original_string
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> Option<u32> {
        self.month
    }

    pub fn day(&self) -> Option<u32> {
        self.day
    }

    /// The first calendar day covered by this date.
    pub fn to_naive_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month.unwrap_or(1), self.day.unwrap_or(1))
    }

    /// Chronological comparison; `None` when precisions differ and the
    /// shared components are equal.
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        let ord = self
            .year
            .cmp(&other.year)
            .then(self.month.unwrap_or(0).cmp(&other.month.unwrap_or(0)))
            .then(self.day.unwrap_or(0).cmp(&other.day.unwrap_or(0)));
        match (ord, self.precision == other.precision) {
            (Ordering::Equal, false) => None,
            (ord, _) => Some(ord),
        }
    }
}

/// Precision-aware FHIR `dateTime`. A time of day requires a timezone.
///
/// ```rust
/// use atrius_fhir_lib::date_time::{DateTimePrecision, PrecisionDateTime};
///
/// let dt = PrecisionDateTime::parse("2024-05-01T09:30:00+02:00").unwrap();
/// assert_eq!(dt.precision(), DateTimePrecision::Second);
/// assert!(PrecisionDateTime::parse("2024-05-01T09:30:00").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct PrecisionDateTime {
    date: PrecisionDate,
    time: Option<NaiveTime>,
    offset: Option<FixedOffset>,
    precision: DateTimePrecision,
    original_string: Arc<str>,
}

impl PrecisionDateTime {
    pub fn parse(s: &str) -> Option<Self> {
        let caps = DATE_TIME_RE.captures(s)?;
        let date = PrecisionDate::from_captures(&caps, s)?;
        let (time, offset, precision) = match caps.get(4) {
            None => {
                let precision = match date.precision() {
                    DatePrecision::Year => DateTimePrecision::Year,
                    DatePrecision::YearMonth => DateTimePrecision::YearMonth,
                    DatePrecision::Full => DateTimePrecision::Date,
                };
                (None, None, precision)
            }
            Some(hour) => {
                let fraction = caps.get(7).map(|f| f.as_str());
                let time = parse_time_of_day(hour.as_str(), &caps[5], &caps[6], fraction)?;
                let offset = parse_offset(caps.get(8)?.as_str())?;
                let precision = if fraction.is_some() {
                    DateTimePrecision::Fraction
                } else {
                    DateTimePrecision::Second
                };
                (Some(time), Some(offset), precision)
            }
        };
        Some(Self {
            date,
            time,
            offset,
            precision,
            original_string: Arc::from(s),
        })
    }

    pub fn from_date(date: PrecisionDate) -> Self {
        let precision = match date.precision() {
            DatePrecision::Year => DateTimePrecision::Year,
            DatePrecision::YearMonth => DateTimePrecision::YearMonth,
            DatePrecision::Full => DateTimePrecision::Date,
        };
        let original_string = Arc::from(date.original_string());
        Self {
            date,
            time: None,
            offset: None,
            precision,
            original_string,
        }
    }

    pub fn precision(&self) -> DateTimePrecision {
        self.precision
    }

    pub fn original_string(&self) -> &str {
        &self.original_string
    }

    pub fn date(&self) -> &PrecisionDate {
        &self.date
    }

    /// The instant this value denotes, when it carries a time of day.
    pub fn to_chrono_datetime(&self) -> Option<ChronoDateTime<FixedOffset>> {
        let naive = self.date.to_naive_date()?.and_time(self.time?);
        naive.and_local_timezone(self.offset?).single()
    }

    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self.to_chrono_datetime(), other.to_chrono_datetime()) {
            (Some(a), Some(b)) => Some(a.cmp(&b)),
            (None, None) => self.date.compare(&other.date),
            _ => None,
        }
    }
}

/// FHIR `instant`: a dateTime with at least second precision and a timezone.
#[derive(Debug, Clone)]
pub struct PrecisionInstant(PrecisionDateTime);

impl PrecisionInstant {
    pub fn parse(s: &str) -> Option<Self> {
        let dt = PrecisionDateTime::parse(s)?;
        (dt.precision() >= DateTimePrecision::Second).then_some(Self(dt))
    }

    pub fn original_string(&self) -> &str {
        self.0.original_string()
    }

    pub fn as_datetime(&self) -> &PrecisionDateTime {
        &self.0
    }

    pub fn to_chrono_datetime(&self) -> Option<ChronoDateTime<FixedOffset>> {
        self.0.to_chrono_datetime()
    }
}

/// FHIR `time`: `hh:mm:ss` with an optional fraction, no timezone.
#[derive(Debug, Clone)]
pub struct PrecisionTime {
    time: NaiveTime,
    precision: TimePrecision,
    original_string: Arc<str>,
}

impl PrecisionTime {
    pub fn parse(s: &str) -> Option<Self> {
        let caps = TIME_RE.captures(s)?;
        let fraction = caps.get(4).map(|f| f.as_str());
        let time = parse_time_of_day(&caps[1], &caps[2], &caps[3], fraction)?;
        Some(Self {
            time,
            precision: if fraction.is_some() { TimePrecision::Fraction } else { TimePrecision::Second },
            original_string: Arc::from(s),
        })
    }

    pub fn precision(&self) -> TimePrecision {
        self.precision
    }

    pub fn original_string(&self) -> &str {
        &self.original_string
    }

    pub fn to_naive_time(&self) -> NaiveTime {
        self.time
    }
}

macro_rules! lexical_value {
    ($ty:ty, $kind:literal, $eval:expr) => {
        impl PartialEq for $ty {
            fn eq(&self, other: &Self) -> bool {
                self.original_string() == other.original_string()
            }
        }

        impl Eq for $ty {}

        impl Hash for $ty {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.original_string().hash(state);
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.original_string())
            }
        }

        impl FromStr for $ty {
            type Err = DateTimeParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$ty>::parse(s).ok_or_else(|| DateTimeParseError {
                    kind: $kind,
                    value: s.to_string(),
                })
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.original_string())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(de::Error::custom)
            }
        }

        impl IntoEvaluationResult for $ty {
            fn to_evaluation_result(&self) -> EvaluationResult {
                let make: fn(String) -> EvaluationResult = $eval;
                make(self.original_string().to_string())
            }
        }
    };
}

lexical_value!(PrecisionDate, "date", |s| EvaluationResult::Date(
    s,
    Some(TypeInfoResult::new("FHIR", "date"))
));
lexical_value!(PrecisionDateTime, "dateTime", |s| EvaluationResult::DateTime(
    s,
    Some(TypeInfoResult::new("FHIR", "dateTime"))
));
lexical_value!(PrecisionInstant, "instant", |s| EvaluationResult::DateTime(
    s,
    Some(TypeInfoResult::new("FHIR", "instant"))
));
lexical_value!(PrecisionTime, "time", |s| EvaluationResult::Time(
    s,
    Some(TypeInfoResult::new("FHIR", "time"))
));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_keep_their_precision() {
        assert_eq!(PrecisionDate::parse("2024").unwrap().precision(), DatePrecision::Year);
        assert_eq!(PrecisionDate::parse("2024-02-29").unwrap().day(), Some(29));
        assert!(PrecisionDate::parse("2023-02-29").is_none());
        assert!(PrecisionDate::parse("2024-13").is_none());
        assert!(PrecisionDate::parse("2024-01-01T10:00:00Z").is_none());
    }

    #[test]
    fn date_times_require_a_zone_with_a_time() {
        assert!(PrecisionDateTime::parse("2024-01-01T10:00:00Z").is_some());
        assert!(PrecisionDateTime::parse("2024-01-01T10:00:00.125-05:00").is_some());
        assert!(PrecisionDateTime::parse("2024-01-01T10:00:00").is_none());
        assert!(PrecisionDateTime::parse("2024-01-01T24:00:00Z").is_none());
        assert!(PrecisionDateTime::parse("2024-01-01T10:00:00+15:00").is_none());
    }

    #[test]
    fn instants_need_second_precision() {
        assert!(PrecisionInstant::parse("2024-01-01").is_none());
        let instant = PrecisionInstant::parse("2024-01-01T10:00:00Z").unwrap();
        let same = PrecisionInstant::parse("2024-01-01T11:00:00+01:00").unwrap();
        assert_ne!(instant, same);
        assert_eq!(instant.as_datetime().compare(same.as_datetime()), Some(Ordering::Equal));
    }

    #[test]
    fn times_accept_fractions_and_leap_seconds() {
        assert_eq!(PrecisionTime::parse("08:15:00.5").unwrap().precision(), TimePrecision::Fraction);
        assert!(PrecisionTime::parse("23:59:60").is_some());
        assert!(PrecisionTime::parse("8:15:00").is_none());
    }

    #[test]
    fn serde_uses_the_lexical_form() {
        let date: PrecisionDate = serde_json::from_str("\"2021-06\"").unwrap();
        assert_eq!(serde_json::to_string(&date).unwrap(), "\"2021-06\"");
        let err = serde_json::from_str::<PrecisionDate>("\"June 2021\"").unwrap_err();
        assert!(err.to_string().contains("invalid FHIR date value"));
    }
}
