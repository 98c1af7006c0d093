//! Taken/not-taken bookkeeping per schedule and calendar day.
//!
//! Every function here is a pure transformation: it takes the current
//! medication list and returns the updated one.

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::model::{weekday_index, Adherence, Medication, Schedule};

/// Position of a (medication, schedule) pair in `medications`.
pub fn locate(
    medications: &[Medication],
    medication_id: &str,
    schedule_id: &str,
) -> Option<(usize, usize)> {
    let med_idx = medications.iter().position(|m| m.id == medication_id)?;
    let sched_idx = medications[med_idx]
        .schedules
        .iter()
        .position(|s| s.id == schedule_id)?;
    Some((med_idx, sched_idx))
}

fn update_schedule(
    medications: &[Medication],
    medication_id: &str,
    schedule_id: &str,
    now: NaiveDateTime,
    apply: impl FnOnce(&mut Schedule),
) -> Vec<Medication> {
    let mut updated = medications.to_vec();
    if let Some((m, s)) = locate(medications, medication_id, schedule_id) {
        apply(&mut updated[m].schedules[s]);
        updated[m].updated_at = now;
    }
    updated
}

/// Set the taken bit of `date` and stamp `lastTakenDate = now`.
///
/// `date` is the day of the dose, which may differ from `now` (a late entry
/// for yesterday, or a window that opens before midnight). Unknown ids leave
/// the list unchanged. Marking an already-taken dose again keeps the bit and
/// refreshes `lastTakenDate`.
pub fn mark_taken(
    medications: &[Medication],
    medication_id: &str,
    schedule_id: &str,
    date: NaiveDate,
    now: NaiveDateTime,
) -> Vec<Medication> {
    update_schedule(medications, medication_id, schedule_id, now, |schedule| {
        match &mut schedule.adherence {
            Adherence::Single { taken, taken_on } => {
                *taken = true;
                *taken_on = Some(date);
            }
            Adherence::Weekly {
                taken_by_day,
                taken_dates,
            } => {
                taken_by_day[weekday_index(date.weekday()) as usize] = true;
                if let Err(pos) = taken_dates.binary_search(&date) {
                    taken_dates.insert(pos, date);
                }
            }
        }
        schedule.last_taken_date = Some(now);
    })
}

/// Clear the taken bit of `date` and drop it from the history.
///
/// A bit recorded for another day is left alone. `lastTakenDate` is left as
/// is. Unknown ids leave the list unchanged.
pub fn unmark_taken(
    medications: &[Medication],
    medication_id: &str,
    schedule_id: &str,
    date: NaiveDate,
    now: NaiveDateTime,
) -> Vec<Medication> {
    update_schedule(medications, medication_id, schedule_id, now, |schedule| {
        let recorded = match &schedule.adherence {
            Adherence::Single { taken_on, .. } => schedule.single_taken_on(*taken_on),
            Adherence::Weekly { .. } => None,
        };
        match &mut schedule.adherence {
            Adherence::Single { taken, taken_on } => {
                if recorded.map_or(true, |day| day == date) {
                    *taken = false;
                    *taken_on = None;
                }
            }
            Adherence::Weekly {
                taken_by_day,
                taken_dates,
            } => {
                if taken_dates.contains(&date) {
                    taken_by_day[weekday_index(date.weekday()) as usize] = false;
                    taken_dates.retain(|d| *d != date);
                }
            }
        }
    })
}

/// Clear every taken bit whose day is before `today`.
///
/// Each bit is tied to the calendar day it was recorded for: a single bit to
/// its `takenOn` day, a weekly bit to the dates in `takenDates` falling on its
/// weekday. Bits for `today` or later survive, so a repeated or late reset
/// never erases that progress. The `takenDates` history and `lastTakenDate`
/// are untouched.
pub fn reset_daily(medications: &[Medication], today: NaiveDate) -> Vec<Medication> {
    let mut updated = medications.to_vec();
    for schedule in updated.iter_mut().flat_map(|m| m.schedules.iter_mut()) {
        let single_day = match &schedule.adherence {
            Adherence::Single { taken_on, .. } => schedule.single_taken_on(*taken_on),
            Adherence::Weekly { .. } => None,
        };
        match &mut schedule.adherence {
            Adherence::Single { taken, taken_on } => {
                if single_day.map_or(true, |day| day < today) {
                    *taken = false;
                    *taken_on = None;
                }
            }
            Adherence::Weekly {
                taken_by_day,
                taken_dates,
            } => {
                for (idx, bit) in taken_by_day.iter_mut().enumerate() {
                    let current = taken_dates
                        .iter()
                        .any(|d| *d >= today && weekday_index(d.weekday()) as usize == idx);
                    if !current {
                        *bit = false;
                    }
                }
            }
        }
    }
    updated
}

/// Number of taken bits currently set across all schedules.
pub fn taken_bit_count(medications: &[Medication]) -> usize {
    medications
        .iter()
        .flat_map(|m| m.schedules.iter())
        .map(|s| match &s.adherence {
            Adherence::Single { taken, .. } => usize::from(*taken),
            Adherence::Weekly { taken_by_day, .. } => {
                taken_by_day.iter().filter(|b| **b).count()
            }
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NewMedication, NewSchedule};

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    }

    fn at(date: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
        date.and_hms_opt(h, m, 0).unwrap()
    }

    fn meds() -> Vec<Medication> {
        let mut n = 0;
        let med = NewMedication::new("Aspirin", "100mg")
            .with_schedule(NewSchedule::daily("08:00".parse().unwrap()))
            .with_schedule(NewSchedule::weekly(
                "20:00".parse().unwrap(),
                "1,3,5".parse().unwrap(),
            ))
            .build("m".to_string(), at(monday(), 0, 0), || {
                n += 1;
                format!("s{}", n)
            })
            .unwrap();
        vec![med]
    }

    #[test]
    fn test_mark_taken_single() {
        let now = at(monday(), 8, 2);
        let updated = mark_taken(&meds(), "m", "s1", monday(), now);
        let schedule = &updated[0].schedules[0];
        assert!(schedule.is_taken_on(monday()));
        assert_eq!(schedule.last_taken_date, Some(now));
        assert_eq!(updated[0].updated_at, now);
    }

    #[test]
    fn test_mark_taken_weekly_records_history() {
        let now = at(monday(), 20, 5);
        let updated = mark_taken(&meds(), "m", "s2", monday(), now);
        let schedule = &updated[0].schedules[1];
        assert!(schedule.is_taken_on(monday()));
        assert!(!schedule.is_taken_on(monday().succ_opt().unwrap()));
        assert_eq!(schedule.taken_history(), vec![monday()]);
    }

    #[test]
    fn test_mark_taken_is_idempotent_but_refreshes_stamp() {
        let first = at(monday(), 20, 0);
        let second = at(monday(), 20, 10);
        let once = mark_taken(&meds(), "m", "s2", monday(), first);
        let twice = mark_taken(&once, "m", "s2", monday(), second);
        let schedule = &twice[0].schedules[1];
        assert_eq!(schedule.taken_history(), vec![monday()]);
        assert_eq!(schedule.last_taken_date, Some(second));
        assert_eq!(taken_bit_count(&once), taken_bit_count(&twice));
    }

    #[test]
    fn test_mark_taken_unknown_ids_is_noop() {
        let original = meds();
        let now = at(monday(), 8, 0);
        assert_eq!(mark_taken(&original, "nope", "s1", monday(), now), original);
        assert_eq!(mark_taken(&original, "m", "nope", monday(), now), original);
    }

    #[test]
    fn test_unmark_taken() {
        let now = at(monday(), 20, 0);
        let marked = mark_taken(&meds(), "m", "s2", monday(), now);
        let unmarked = unmark_taken(&marked, "m", "s2", monday(), at(monday(), 20, 1));
        let schedule = &unmarked[0].schedules[1];
        assert!(!schedule.is_taken_on(monday()));
        assert!(schedule.taken_history().is_empty());
        assert_eq!(schedule.last_taken_date, Some(now));
    }

    #[test]
    fn test_reset_clears_previous_day_but_keeps_history() {
        let now = at(monday(), 20, 0);
        let marked = mark_taken(&meds(), "m", "s2", monday(), now);
        let marked = mark_taken(&marked, "m", "s1", monday(), now);

        let tuesday = monday().succ_opt().unwrap();
        let reset = reset_daily(&marked, tuesday);
        assert_eq!(taken_bit_count(&reset), 0);
        assert_eq!(reset[0].schedules[1].taken_history(), vec![monday()]);
        assert_eq!(reset[0].schedules[0].last_taken_date, Some(now));
        assert_eq!(reset[0].schedules[1].last_taken_date, Some(now));
    }

    #[test]
    fn test_reset_same_day_preserves_progress() {
        let now = at(monday(), 8, 0);
        let marked = mark_taken(&meds(), "m", "s1", monday(), now);
        let marked = mark_taken(&marked, "m", "s2", monday(), now);
        let reset = reset_daily(&marked, monday());
        assert_eq!(reset, marked);
        let again = reset_daily(&reset, monday());
        assert_eq!(again, marked);
    }

    #[test]
    fn test_reset_after_missed_days_catches_up() {
        let marked = mark_taken(&meds(), "m", "s2", monday(), at(monday(), 20, 0));
        let friday = NaiveDate::from_ymd_opt(2024, 3, 8).unwrap();
        let reset = reset_daily(&marked, friday);
        assert_eq!(taken_bit_count(&reset), 0);
    }

    #[test]
    fn test_reset_clears_stale_weekday_bit_on_same_weekday() {
        // Taken last Monday, reset runs the following Monday: stale
        let marked = mark_taken(&meds(), "m", "s2", monday(), at(monday(), 20, 0));
        let next_monday = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
        let reset = reset_daily(&marked, next_monday);
        assert!(!reset[0].schedules[1].is_taken_on(next_monday));
    }

    #[test]
    fn test_marking_yesterday_does_not_mark_today() {
        let sunday = monday().pred_opt().unwrap();
        let now = at(monday(), 9, 0);
        let marked = mark_taken(&meds(), "m", "s1", sunday, now);
        let schedule = &marked[0].schedules[0];
        assert!(schedule.is_taken_on(sunday));
        assert!(!schedule.is_taken_on(monday()));

        let reset = reset_daily(&marked, monday());
        assert!(!reset[0].schedules[0].is_taken_on(monday()));
        assert!(!reset[0].schedules[0].is_taken_on(monday().succ_opt().unwrap()));
        assert_eq!(taken_bit_count(&reset), 0);
    }

    #[test]
    fn test_weekly_bit_does_not_carry_to_next_week() {
        let marked = mark_taken(&meds(), "m", "s2", monday(), at(monday(), 20, 0));
        let next_monday = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
        assert!(!marked[0].schedules[1].is_taken_on(next_monday));
    }

    #[test]
    fn test_dose_credited_before_midnight_survives_reset() {
        let tuesday = monday().succ_opt().unwrap();
        let marked = mark_taken(&meds(), "m", "s1", tuesday, at(monday(), 23, 55));
        let marked = mark_taken(&marked, "m", "s2", tuesday, at(monday(), 23, 55));

        let same_evening = reset_daily(&marked, monday());
        assert_eq!(same_evening, marked);

        let after_midnight = reset_daily(&marked, tuesday);
        assert!(after_midnight[0].schedules[0].is_taken_on(tuesday));
        assert!(after_midnight[0].schedules[1].is_taken_on(tuesday));
        assert_eq!(after_midnight, marked);
    }

    #[test]
    fn test_unmark_other_day_keeps_bit() {
        let now = at(monday(), 8, 0);
        let marked = mark_taken(&meds(), "m", "s1", monday(), now);
        let marked = mark_taken(&marked, "m", "s2", monday(), now);
        let sunday = monday().pred_opt().unwrap();
        let unmarked = unmark_taken(&marked, "m", "s1", sunday, now);
        let unmarked = unmark_taken(&unmarked, "m", "s2", sunday, now);
        assert!(unmarked[0].schedules[0].is_taken_on(monday()));
        assert!(unmarked[0].schedules[1].is_taken_on(monday()));
    }
}
