//! Wall clocks for the CLI.

use chrono::{NaiveDateTime, Utc};
use chrono_tz::Tz;
use pillbox_core::{Clock, FixedClock, SystemClock};

use crate::constants::NOW_ENV;
use crate::errors::CliError;
use crate::helpers::parse_timezone;

/// Local time in a configured IANA zone.
#[derive(Debug, Clone, Copy)]
pub struct TzClock(pub Tz);

impl Clock for TzClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.0).naive_local()
    }
}

/// Pick the clock: `PILLBOX_NOW`, else the configured zone, else system local time.
pub fn resolve_clock(timezone: Option<&str>) -> anyhow::Result<Box<dyn Clock>> {
    if let Ok(value) = std::env::var(NOW_ENV) {
        if !value.trim().is_empty() {
            return Ok(Box::new(FixedClock(parse_now(&value)?)));
        }
    }
    match timezone {
        Some(name) => Ok(Box::new(TzClock(parse_timezone(name)?))),
        None => Ok(Box::new(SystemClock)),
    }
}

fn parse_now(value: &str) -> anyhow::Result<NaiveDateTime> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M"))
        .map_err(|_| {
            CliError::invalid_input(format!(
                "Invalid {} (expected YYYY-MM-DDTHH:MM): {}",
                NOW_ENV, value
            ))
            .into()
        })
}
