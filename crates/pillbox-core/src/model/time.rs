//! Wall-clock primitives: time of day and weekday sets.
//!
//! Weekday indices follow the persisted format: 0 = Sunday .. 6 = Saturday.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{PillboxError, Result};

/// Minutes in one calendar day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// A wall-clock time with minute precision and no date component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay {
    minutes: u16,
}

impl TimeOfDay {
    pub fn new(hour: u32, minute: u32) -> Result<Self> {
        if hour > 23 || minute > 59 {
            return Err(PillboxError::InvalidInput(format!(
                "Invalid time of day: {:02}:{:02}",
                hour, minute
            )));
        }
        Ok(Self {
            minutes: (hour * 60 + minute) as u16,
        })
    }

    pub fn from_minute_of_day(minutes: u32) -> Result<Self> {
        if minutes >= MINUTES_PER_DAY {
            return Err(PillboxError::InvalidInput(format!(
                "Minute of day out of range: {}",
                minutes
            )));
        }
        Ok(Self {
            minutes: minutes as u16,
        })
    }

    /// Truncates seconds.
    pub fn from_naive_time(time: NaiveTime) -> Self {
        use chrono::Timelike;
        Self {
            minutes: (time.hour() * 60 + time.minute()) as u16,
        }
    }

    pub fn hour(&self) -> u32 {
        u32::from(self.minutes) / 60
    }

    pub fn minute(&self) -> u32 {
        u32::from(self.minutes) % 60
    }

    pub fn minute_of_day(&self) -> u32 {
        u32::from(self.minutes)
    }

    /// The top of this time's hour.
    pub fn truncate_to_hour(&self) -> Self {
        Self {
            minutes: self.minutes - self.minutes % 60,
        }
    }

    pub fn to_naive_time(&self) -> NaiveTime {
        NaiveTime::from_num_seconds_from_midnight_opt(self.minute_of_day() * 60, 0)
            .unwrap_or(NaiveTime::MIN)
    }

    /// The instant this time falls at on `date`.
    pub fn on(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.to_naive_time())
    }

    /// Subtract `minutes`, borrowing across midnight.
    ///
    /// Returns the resulting time together with the number of whole days
    /// borrowed (0 when the result stays on the same day).
    pub fn minus_minutes(&self, minutes: u32) -> (TimeOfDay, u32) {
        let total = i64::from(self.minute_of_day()) - i64::from(minutes);
        let day = i64::from(MINUTES_PER_DAY);
        let borrowed = (-total.div_euclid(day)) as u32;
        let minutes = total.rem_euclid(day) as u16;
        (TimeOfDay { minutes }, borrowed)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = PillboxError;

    fn from_str(value: &str) -> Result<Self> {
        let invalid = || {
            PillboxError::InvalidInput(format!("Invalid time (expected HH:MM): {}", value))
        };
        let (hour, minute) = value.trim().split_once(':').ok_or_else(invalid)?;
        if hour.is_empty() || hour.len() > 2 || minute.len() != 2 {
            return Err(invalid());
        }
        let hour: u32 = hour.parse().map_err(|_| invalid())?;
        let minute: u32 = minute.parse().map_err(|_| invalid())?;
        TimeOfDay::new(hour, minute)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(D::Error::custom)
    }
}

/// Index of a weekday in the persisted format (Sunday = 0).
pub fn weekday_index(day: Weekday) -> u8 {
    day.num_days_from_sunday() as u8
}

/// Inverse of [`weekday_index`].
pub fn weekday_from_index(index: u8) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

/// A set of weekdays. An empty set never fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Weekdays(u8);

impl Weekdays {
    pub const EVERY_DAY: Weekdays = Weekdays(0b0111_1111);

    pub fn empty() -> Self {
        Self(0)
    }

    pub fn from_indices<I: IntoIterator<Item = u8>>(indices: I) -> Result<Self> {
        let mut set = Self::empty();
        for index in indices {
            let day = weekday_from_index(index).ok_or_else(|| {
                PillboxError::InvalidInput(format!("Weekday index out of range (0-6): {}", index))
            })?;
            set.insert(day);
        }
        Ok(set)
    }

    pub fn insert(&mut self, day: Weekday) {
        self.0 |= 1 << weekday_index(day);
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & (1 << weekday_index(day)) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Indices in ascending order (Sunday first).
    pub fn indices(&self) -> Vec<u8> {
        (0..7).filter(|i| self.0 & (1 << i) != 0).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        self.indices().into_iter().filter_map(weekday_from_index)
    }

    /// Move every day `days` weekdays earlier (wrapping within the week).
    pub fn shift_back(&self, days: u32) -> Weekdays {
        let shift = (days % 7) as u8;
        let mut shifted = Weekdays::empty();
        for index in self.indices() {
            let target = (index + 7 - shift) % 7;
            shifted.0 |= 1 << target;
        }
        shifted
    }
}

impl FromStr for Weekdays {
    type Err = PillboxError;

    /// Parse a comma-separated list of indices (`1,3,5`) or names (`mon,wed`).
    fn from_str(value: &str) -> Result<Self> {
        let mut set = Weekdays::empty();
        for part in value.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let day = match part.parse::<u8>() {
                Ok(index) => weekday_from_index(index),
                Err(_) => part.parse::<Weekday>().ok(),
            }
            .ok_or_else(|| PillboxError::InvalidInput(format!("Invalid weekday: {}", part)))?;
            set.insert(day);
        }
        Ok(set)
    }
}

impl Serialize for Weekdays {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.indices().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Weekdays {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = Vec::<u8>::deserialize(deserializer)?;
        Weekdays::from_indices(raw).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(value: &str) -> TimeOfDay {
        value.parse().unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!(t("08:00").to_string(), "08:00");
        assert_eq!(t("8:05").to_string(), "08:05");
        assert_eq!(t("23:59").minute_of_day(), 23 * 60 + 59);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["24:00", "12:60", "1200", "12:5", "", "ab:cd", "123:00"] {
            assert!(bad.parse::<TimeOfDay>().is_err(), "{} should fail", bad);
        }
    }

    #[test]
    fn test_truncate_to_hour() {
        assert_eq!(t("09:45").truncate_to_hour(), t("09:00"));
        assert_eq!(t("00:00").truncate_to_hour(), t("00:00"));
        assert_eq!(t("23:59").truncate_to_hour(), t("23:00"));
    }

    #[test]
    fn test_minus_minutes_same_day() {
        assert_eq!(t("08:00").minus_minutes(15), (t("07:45"), 0));
        assert_eq!(t("08:00").minus_minutes(0), (t("08:00"), 0));
    }

    #[test]
    fn test_minus_minutes_borrows_across_midnight() {
        assert_eq!(t("00:10").minus_minutes(15), (t("23:55"), 1));
        assert_eq!(t("00:00").minus_minutes(1), (t("23:59"), 1));
    }

    #[test]
    fn test_minus_minutes_multi_day() {
        assert_eq!(t("06:00").minus_minutes(MINUTES_PER_DAY + 60), (t("05:00"), 1));
        assert_eq!(t("00:30").minus_minutes(2 * MINUTES_PER_DAY), (t("00:30"), 2));
        assert_eq!(t("00:30").minus_minutes(2 * MINUTES_PER_DAY + 31), (t("23:59"), 3));
    }

    #[test]
    fn test_time_serde_as_string() {
        let json = serde_json::to_string(&t("07:05")).unwrap();
        assert_eq!(json, "\"07:05\"");
        let back: TimeOfDay = serde_json::from_str("\"21:30\"").unwrap();
        assert_eq!(back, t("21:30"));
        assert!(serde_json::from_str::<TimeOfDay>("\"25:00\"").is_err());
    }

    #[test]
    fn test_weekday_index_sunday_zero() {
        assert_eq!(weekday_index(Weekday::Sun), 0);
        assert_eq!(weekday_index(Weekday::Sat), 6);
        assert_eq!(weekday_from_index(1), Some(Weekday::Mon));
        assert_eq!(weekday_from_index(7), None);
    }

    #[test]
    fn test_weekdays_parse_indices_and_names() {
        let by_index: Weekdays = "1,3,5".parse().unwrap();
        let by_name: Weekdays = "mon, Wed,friday".parse().unwrap();
        assert_eq!(by_index, by_name);
        assert_eq!(by_index.indices(), vec![1, 3, 5]);
        assert!("1,9".parse::<Weekdays>().is_err());
    }

    #[test]
    fn test_weekdays_shift_back_wraps() {
        let days = Weekdays::from_indices([0, 1, 3]).unwrap();
        assert_eq!(days.shift_back(1).indices(), vec![0, 2, 6]);
        assert_eq!(days.shift_back(7), days);
        assert_eq!(Weekdays::EVERY_DAY.shift_back(3), Weekdays::EVERY_DAY);
    }

    #[test]
    fn test_weekdays_serde_sorted_array() {
        let days = Weekdays::from_indices([5, 1, 3]).unwrap();
        assert_eq!(serde_json::to_string(&days).unwrap(), "[1,3,5]");
        let back: Weekdays = serde_json::from_str("[6,0]").unwrap();
        assert!(back.contains(Weekday::Sat));
        assert!(back.contains(Weekday::Sun));
        assert_eq!(back.len(), 2);
        assert!(serde_json::from_str::<Weekdays>("[8]").is_err());
    }
}
