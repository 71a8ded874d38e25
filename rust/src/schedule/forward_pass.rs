//! Forward pass: earliest start/finish dates in topological order.

use chrono::{Days, NaiveDate};

use crate::error::EngineError;
use crate::interner::TaskIdx;
use crate::models::{DependencyType, ScheduledDates, TaskId};
use crate::{log_checks, log_debug};

use super::graph::{Constraint, GraphEdge, ScheduleGraph};

/// Shift a date by a signed number of days, `None` when leaving chrono's range.
pub(crate) fn shift_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    if days >= 0 {
        date.checked_add_days(Days::new(days as u64))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    }
}

/// Earliest date the successor may start to satisfy one edge.
///
/// `duration` is the successor's effective duration. Returns `Ok(None)` for
/// edge types the engine does not interpret.
fn required_start(
    edge: &GraphEdge,
    pred: ScheduledDates,
    duration: u32,
    task_id: &TaskId,
) -> Result<Option<NaiveDate>, EngineError> {
    let duration = i64::from(duration);
    let (anchor, offset) = match edge.dep_type {
        DependencyType::FS => (pred.end_date, edge.lag_days.checked_add(1)),
        DependencyType::SS => (pred.start_date, Some(edge.lag_days)),
        DependencyType::FF => (pred.end_date, edge.lag_days.checked_sub(duration)),
        DependencyType::SF => (pred.start_date, edge.lag_days.checked_sub(duration)),
        DependencyType::Other(_) => return Ok(None),
    };
    offset
        .and_then(|days| shift_days(anchor, days))
        .map(Some)
        .ok_or_else(|| EngineError::DateOutOfRange {
            task_id: task_id.clone(),
        })
}

/// Apply the task's own constraint on top of the predecessor-derived start.
fn apply_constraint(derived: Option<NaiveDate>, constraint: Constraint) -> Option<NaiveDate> {
    match constraint {
        Constraint::MustStartOn(date) => Some(date),
        Constraint::StartNoEarlierThan(date) => match derived {
            Some(start) if start >= date => Some(start),
            _ => Some(date),
        },
        Constraint::None => derived,
    }
}

/// Compute earliest dates for every task in `order`.
///
/// The returned vector is indexed by [`TaskIdx`]; tasks not in `order` stay
/// `None`. Tasks with neither predecessors nor a constraint are anchored to
/// `reference_date`. A predecessor-derived start is used as-is whatever its
/// year; "nothing derived yet" is `None`, not a 1970 placeholder, so starts
/// before 1970 are not replaced by `reference_date`.
pub fn forward_pass(
    graph: &ScheduleGraph,
    order: &[TaskIdx],
    reference_date: NaiveDate,
    verbosity: u8,
) -> Result<Vec<Option<ScheduledDates>>, EngineError> {
    let mut dates: Vec<Option<ScheduledDates>> = vec![None; graph.len()];

    for &idx in order {
        let i = idx as usize;
        let task_id = graph.task_id(idx);
        let duration = graph.durations[i];

        // Max of all predecessor requirements; None until one applies
        let mut earliest_start: Option<NaiveDate> = None;
        for edge in &graph.preds[i] {
            // Predecessors precede us in `order`, so they are always computed
            let Some(pred) = dates[edge.pred as usize] else {
                continue;
            };
            let Some(required) = required_start(edge, pred, duration, task_id)? else {
                log_checks!(
                    verbosity,
                    task_id = %task_id,
                    dep_type = %edge.dep_type,
                    "skipping edge with unrecognized type"
                );
                continue;
            };
            log_debug!(
                verbosity,
                task_id = %task_id,
                pred_id = %graph.task_id(edge.pred),
                dep_type = %edge.dep_type,
                lag = edge.lag_days,
                pred_duration = edge.pred_duration,
                pred_is_milestone = edge.pred_is_milestone,
                pred_constraint = ?edge.pred_constraint,
                %required,
                "edge requirement"
            );
            earliest_start = Some(earliest_start.map_or(required, |current| current.max(required)));
        }

        let constraint = graph.constraints[i];
        let constrained = apply_constraint(earliest_start, constraint);
        if constrained != earliest_start {
            log_checks!(
                verbosity,
                task_id = %task_id,
                ?constraint,
                "constraint moved start"
            );
        }

        let start_date = constrained.unwrap_or(reference_date);
        let end_date = shift_days(start_date, i64::from(duration)).ok_or_else(|| {
            EngineError::DateOutOfRange {
                task_id: task_id.clone(),
            }
        })?;

        log_debug!(
            verbosity,
            task_id = %task_id,
            %start_date,
            %end_date,
            "computed dates"
        );

        dates[i] = Some(ScheduledDates {
            start_date,
            end_date,
        });
    }

    Ok(dates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConstraintType, Predecessor, TaskRecord};
    use crate::schedule::ordering::topological_order;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn make_task(id: &str, duration: u32, deps: Vec<(&str, DependencyType, i64)>) -> TaskRecord {
        let mut task = TaskRecord::new(id, duration);
        task.predecessors = deps
            .into_iter()
            .map(|(pred, ty, lag)| Predecessor::new(pred, ty, lag))
            .collect();
        task
    }

    fn run(tasks: &[TaskRecord], reference: NaiveDate) -> Vec<Option<(NaiveDate, NaiveDate)>> {
        let graph = ScheduleGraph::build(tasks, 0);
        let topo = topological_order(&graph);
        forward_pass(&graph, &topo.order, reference, 0)
            .unwrap()
            .into_iter()
            .map(|d| d.map(|d| (d.start_date, d.end_date)))
            .collect()
    }

    #[test]
    fn test_shift_days() {
        let d = date(2025, 1, 10);
        assert_eq!(shift_days(d, 5), Some(date(2025, 1, 15)));
        assert_eq!(shift_days(d, -10), Some(date(2024, 12, 31)));
        assert_eq!(shift_days(d, 0), Some(d));
        assert_eq!(shift_days(d, i64::MAX), None);
        assert_eq!(shift_days(d, i64::MIN), None);
    }

    #[test]
    fn test_root_anchored_to_reference() {
        let today = date(2025, 6, 2);
        let result = run(&[make_task("a", 5, vec![])], today);
        assert_eq!(result[0], Some((today, date(2025, 6, 7))));
    }

    #[test]
    fn test_finish_to_start_with_lag() {
        let today = date(2025, 1, 1);
        let tasks = vec![
            make_task("a", 5, vec![]),
            make_task("b", 3, vec![("a", DependencyType::FS, 2)]),
        ];
        let result = run(&tasks, today);

        // a: Jan 1 - Jan 6; b starts Jan 6 + 2 + 1 = Jan 9, ends Jan 12
        assert_eq!(result[0], Some((date(2025, 1, 1), date(2025, 1, 6))));
        assert_eq!(result[1], Some((date(2025, 1, 9), date(2025, 1, 12))));
    }

    #[test]
    fn test_start_to_start_negative_lag() {
        let today = date(2025, 1, 10);
        let tasks = vec![
            make_task("a", 4, vec![]),
            make_task("b", 2, vec![("a", DependencyType::SS, -3)]),
        ];
        let result = run(&tasks, today);

        // Lead time may pull the successor before the reference date
        assert_eq!(result[1], Some((date(2025, 1, 7), date(2025, 1, 9))));
    }

    #[test]
    fn test_finish_to_finish() {
        let today = date(2025, 1, 1);
        let tasks = vec![
            make_task("a", 10, vec![]),
            make_task("b", 3, vec![("a", DependencyType::FF, 1)]),
        ];
        let result = run(&tasks, today);

        // a ends Jan 11; b starts Jan 11 - 3 + 1 = Jan 9, ends Jan 12
        assert_eq!(result[1], Some((date(2025, 1, 9), date(2025, 1, 12))));
    }

    #[test]
    fn test_start_to_finish() {
        let today = date(2025, 1, 10);
        let tasks = vec![
            make_task("a", 2, vec![]),
            make_task("b", 4, vec![("a", DependencyType::SF, 0)]),
        ];
        let result = run(&tasks, today);

        // b starts Jan 10 - 4 = Jan 6, ends Jan 10
        assert_eq!(result[1], Some((date(2025, 1, 6), date(2025, 1, 10))));
    }

    #[test]
    fn test_max_of_predecessors() {
        let today = date(2025, 1, 1);
        let tasks = vec![
            make_task("short", 1, vec![]),
            make_task("long", 7, vec![]),
            make_task(
                "join",
                2,
                vec![("short", DependencyType::FS, 0), ("long", DependencyType::FS, 0)],
            ),
        ];
        let result = run(&tasks, today);

        // long ends Jan 8, join starts Jan 9
        assert_eq!(result[2], Some((date(2025, 1, 9), date(2025, 1, 11))));
    }

    #[test]
    fn test_unrecognized_edge_contributes_nothing() {
        let today = date(2025, 1, 1);
        let tasks = vec![
            make_task("a", 30, vec![]),
            make_task("b", 2, vec![("a", DependencyType::Other("XX".into()), 0)]),
        ];
        let result = run(&tasks, today);

        // Only edge skipped: b is anchored like a root task
        assert_eq!(result[1], Some((today, date(2025, 1, 3))));
    }

    #[test]
    fn test_must_start_on_overrides_predecessors() {
        let today = date(2025, 1, 1);
        let pinned = date(2025, 1, 3);
        let mut b = make_task("b", 2, vec![("a", DependencyType::FS, 0)]);
        b.constraint_type = ConstraintType::MustStartOn;
        b.constraint_date = Some(pinned);
        let tasks = vec![make_task("a", 20, vec![]), b];

        let result = run(&tasks, today);
        assert_eq!(result[1], Some((pinned, date(2025, 1, 5))));
    }

    #[test]
    fn test_start_no_earlier_than_is_a_floor() {
        let today = date(2025, 1, 1);
        let tasks_with_floor = |floor: NaiveDate| {
            let mut b = make_task("b", 1, vec![("a", DependencyType::FS, 0)]);
            b.constraint_type = ConstraintType::StartNoEarlierThan;
            b.constraint_date = Some(floor);
            vec![make_task("a", 5, vec![]), b]
        };

        // Predecessor-derived start is Jan 7
        let early_floor = run(&tasks_with_floor(date(2025, 1, 4)), today);
        assert_eq!(early_floor[1].map(|d| d.0), Some(date(2025, 1, 7)));

        let late_floor = run(&tasks_with_floor(date(2025, 2, 1)), today);
        assert_eq!(late_floor[1].map(|d| d.0), Some(date(2025, 2, 1)));
    }

    #[test]
    fn test_constraint_on_root_task() {
        let today = date(2025, 1, 1);
        let mut a = make_task("a", 3, vec![]);
        a.constraint_type = ConstraintType::StartNoEarlierThan;
        a.constraint_date = Some(date(2024, 12, 1));

        // A past floor still replaces the reference-date anchor
        let result = run(&[a], today);
        assert_eq!(result[0].map(|d| d.0), Some(date(2024, 12, 1)));
    }

    #[test]
    fn test_zero_duration_milestone_is_a_point() {
        let today = date(2025, 1, 1);
        let mut m = make_task("m", 0, vec![("a", DependencyType::FS, 0)]);
        m.is_milestone = true;
        let tasks = vec![make_task("a", 2, vec![]), m];

        let result = run(&tasks, today);
        assert_eq!(result[1], Some((date(2025, 1, 4), date(2025, 1, 4))));
    }

    #[test]
    fn test_milestone_with_duration_spans_it() {
        let today = date(2025, 1, 1);
        let mut m = make_task("m", 3, vec![]);
        m.is_milestone = true;

        // Milestones are not floored to one day, but a stored duration is kept
        let result = run(&[m], today);
        assert_eq!(result[0], Some((today, date(2025, 1, 4))));
    }

    #[test]
    fn test_pre_1970_derived_start_is_kept() {
        let today = date(1969, 12, 20);
        let tasks = vec![
            make_task("a", 5, vec![]),
            make_task("b", 2, vec![("a", DependencyType::FS, 0)]),
        ];
        let result = run(&tasks, today);

        // Derived start counts even before 1970; b is not re-anchored to today
        assert_eq!(result[1], Some((date(1969, 12, 26), date(1969, 12, 28))));
    }

    #[test]
    fn test_zero_duration_task_spans_one_day() {
        let today = date(2025, 1, 1);
        let result = run(&[make_task("a", 0, vec![])], today);
        assert_eq!(result[0], Some((today, date(2025, 1, 2))));
    }

    #[test]
    fn test_excluded_tasks_stay_unset() {
        let today = date(2025, 1, 1);
        let tasks = vec![
            make_task("a", 1, vec![("b", DependencyType::FS, 0)]),
            make_task("b", 1, vec![("a", DependencyType::FS, 0)]),
            make_task("c", 1, vec![]),
        ];
        let result = run(&tasks, today);

        assert_eq!(result[0], None);
        assert_eq!(result[1], None);
        assert!(result[2].is_some());
    }

    #[test]
    fn test_lag_overflow_is_reported() {
        let today = date(2025, 1, 1);
        let tasks = vec![
            make_task("a", 1, vec![]),
            make_task("b", 1, vec![("a", DependencyType::FS, i64::MAX)]),
        ];
        let graph = ScheduleGraph::build(&tasks, 0);
        let topo = topological_order(&graph);
        let err = forward_pass(&graph, &topo.order, today, 0).unwrap_err();

        match err {
            EngineError::DateOutOfRange { task_id } => assert_eq!(task_id.as_str(), "b"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
