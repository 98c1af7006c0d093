use chrono::NaiveDateTime;
use pillbox_core::schedule::{group_by_hour, group_by_time, summarize, TimeGroup};
use pillbox_core::{DaySummary, FixedClock};

use crate::app::AppContext;
use crate::cli::{GroupBy, NextArgs, TodayArgs};
use crate::helpers::{parse_date, parse_time};
use crate::output::{day_json, occurrence_json, occurrence_table, print_json};
use crate::ui::format::format_duration;
use crate::ui::theme::{styled, styles};
use crate::ui::{blank_line, header, hint, kv, print, UiContext};

fn summary_line(summary: &DaySummary) -> String {
    format!(
        "{} taken, {} available, {} upcoming, {} overdue (of {})",
        summary.taken, summary.available, summary.upcoming, summary.overdue, summary.total
    )
}

fn groups_json(groups: &[TimeGroup], now: NaiveDateTime) -> anyhow::Result<serde_json::Value> {
    let mut out = Vec::with_capacity(groups.len());
    for group in groups {
        let occurrences = group
            .occurrences
            .iter()
            .map(|o| occurrence_json(o, now))
            .collect::<anyhow::Result<Vec<_>>>()?;
        out.push(serde_json::json!({
            "time": group.time,
            "occurrences": occurrences,
        }));
    }
    Ok(serde_json::Value::Array(out))
}

pub fn handle_today(ctx: &AppContext, args: &TodayArgs) -> anyhow::Result<()> {
    let ui = ctx.ui(args.json);
    let store = ctx.open_store(&ui)?;

    let clock_now = store.now();
    let date = match args.date.as_deref() {
        Some(value) => parse_date(value)?,
        None => clock_now.date(),
    };
    let now = match args.at.as_deref() {
        Some(value) => parse_time(value)?.on(date),
        None => clock_now,
    };

    let occurrences = store.occurrences_on(date);
    let summary = summarize(&occurrences, now);
    let groups = args.group.map(|group| match group {
        GroupBy::Time => group_by_time(&occurrences),
        GroupBy::Hour => group_by_hour(&occurrences),
    });

    if ui.mode.is_json() {
        let mut value = day_json(now, &occurrences, &summary)?;
        if let (Some(groups), Some(map)) = (&groups, value.as_object_mut()) {
            map.insert("groups".to_string(), groups_json(groups, now)?);
        }
        return print_json(&value);
    }

    if !ctx.quiet() {
        print(&ui, &header(&ui, "today", Some(&date.to_string())));
        print(&ui, &kv(&ui, "Summary", &summary_line(&summary)));
        blank_line(&ui);
    }
    if occurrences.is_empty() {
        print(&ui, &format!("No doses scheduled for {}.", date));
        return Ok(());
    }

    match groups {
        Some(groups) => print_groups(&ui, &groups, now),
        None => print(&ui, &occurrence_table(&ui, &occurrences, now)),
    }
    if !ctx.quiet() && summary.available > 0 {
        blank_line(&ui);
        print(&ui, &hint(&ui, "pillbox take <MEDICATION> <SCHEDULE>"));
    }
    Ok(())
}

fn print_groups(ui: &UiContext, groups: &[TimeGroup], now: NaiveDateTime) {
    for (i, group) in groups.iter().enumerate() {
        if i > 0 {
            blank_line(ui);
        }
        let title = if ui.mode.is_pretty() {
            styled(&group.time.to_string(), styles::bold(), ui.color)
        } else {
            format!("group={}", group.time)
        };
        print(ui, &title);
        print(ui, &occurrence_table(ui, &group.occurrences, now));
    }
}

pub fn handle_next(ctx: &AppContext, args: &NextArgs) -> anyhow::Result<()> {
    let ui = ctx.ui(args.json);
    let mut store = ctx.open_store(&ui)?;
    if let Some(value) = args.at.as_deref() {
        let at = parse_time(value)?.on(store.now().date());
        store.set_clock(Box::new(FixedClock(at)));
    }

    let now = store.now();
    let next = store.next_occurrence();

    if ui.mode.is_json() {
        let value = match &next {
            Some(occurrence) => occurrence_json(occurrence, now)?,
            None => serde_json::Value::Null,
        };
        return print_json(&value);
    }

    let Some(occurrence) = next else {
        print(&ui, "No more doses today.");
        return Ok(());
    };
    if !ctx.quiet() {
        print(&ui, &header(&ui, "next", None));
    }
    let until = format_duration(occurrence.scheduled_at() - now);
    print(
        &ui,
        &kv(
            &ui,
            "Next",
            &format!(
                "{} {} {} (in {})",
                occurrence.time_of_day, occurrence.medication_name, occurrence.dosage, until
            ),
        ),
    );
    print(
        &ui,
        &kv(
            &ui,
            "Dose",
            &format!("{} {}", occurrence.medication_id, occurrence.schedule_id),
        ),
    );
    Ok(())
}
