//! Reminder compilation and dispatch.

pub mod compiler;
pub mod dispatcher;

pub use compiler::{
    compile, compile_with, reminder_trigger, NotificationSpec, Trigger, TriggerExpansion,
    PRIMARY_TITLE, REMINDER_TITLE,
};
pub use dispatcher::{replace_all, DispatchFailure, InMemoryDispatcher, NotificationDispatcher};
