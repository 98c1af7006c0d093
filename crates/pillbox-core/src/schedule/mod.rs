//! Schedule evaluation: occurrence expansion, dose windows, adherence and refills.

pub mod adherence;
pub mod occurrence;
pub mod refill;
pub mod window;

pub use adherence::{locate, mark_taken, reset_daily, taken_bit_count, unmark_taken};
pub use occurrence::{
    dose_date, group_by_hour, group_by_time, next_occurrence, occurrences_on, summarize,
    DaySummary, ScheduleOccurrence, TimeGroup,
};
pub use refill::{refills_due, RefillDue};
pub use window::{status, DoseStatus, DoseWindow};
