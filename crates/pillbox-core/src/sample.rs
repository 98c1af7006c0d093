//! Starter medication list written on first run.

use chrono::{Duration, NaiveDateTime};

use crate::error::Result;
use crate::model::{Medication, NewMedication, NewSchedule, TimeOfDay, Weekdays};

fn seeded(
    id: &str,
    medication: NewMedication,
    now: NaiveDateTime,
) -> Result<Medication> {
    let mut n = 0;
    medication.build(id.to_string(), now, || {
        n += 1;
        format!("{}-{}", id, n)
    })
}

fn weekly(time: &str, days: Weekdays) -> Result<NewSchedule> {
    Ok(NewSchedule::weekly(time.parse::<TimeOfDay>()?, days))
}

/// The sample medications, with refill dates relative to `now`.
///
/// Ids are fixed (`"1"`..`"3"`, schedules `"{med}-{n}"`) so a seeded
/// installation is reproducible.
pub fn sample_medications(now: NaiveDateTime) -> Result<Vec<Medication>> {
    let today = now.date();
    let mon_wed_fri = Weekdays::from_indices([1, 3, 5])?;

    let aspirin = NewMedication::new("Aspirin", "100mg")
        .with_instructions("Take with food")
        .with_color("#4caf50")
        .with_refill_date(today + Duration::days(15))
        .with_schedule(weekly("08:00", mon_wed_fri)?)
        .with_schedule(weekly("20:00", mon_wed_fri)?);

    let vitamin_d = NewMedication::new("Vitamin D", "1000 IU")
        .with_instructions("Take daily with a meal")
        .with_color("#ff9800")
        .with_refill_date(today + Duration::days(45))
        .with_schedule(weekly("12:00", Weekdays::EVERY_DAY)?);

    let metformin = NewMedication::new("Metformin", "500mg")
        .with_instructions("Take twice daily with meals")
        .with_color("#2196f3")
        .with_refill_date(today + Duration::days(30))
        .with_schedule(weekly("08:00", Weekdays::EVERY_DAY)?)
        .with_schedule(weekly("18:00", Weekdays::EVERY_DAY)?);

    Ok(vec![
        seeded("1", aspirin, now)?,
        seeded("2", vitamin_d, now)?,
        seeded("3", metformin, now)?,
    ])
}
