use chrono::NaiveDateTime;
use tracing::debug;

use logsift_types::{Constraint, Demand, Field, TIMESTAMP_FORMAT};

use crate::range::{ResolvedRange, resolve};

/// Translate a demand into its ordered constraint list
///
/// Constraints are implicitly AND-ed and appended in a fixed order (levels,
/// modes, channels, request id, actor, date bounds), so the same demand
/// always produces the same list. An unconstrained demand produces an empty
/// list, meaning "match all rows".
///
/// `now` is the reference instant for date-range resolution; callers sample
/// it once per search.
pub fn constraints_from_demand(demand: &Demand, now: NaiveDateTime) -> Vec<Constraint> {
    let mut constraints = Vec::new();

    if !demand.levels().is_empty() {
        constraints.push(Constraint::In(
            Field::Level,
            demand
                .levels()
                .iter()
                .map(|level| level.as_str().to_string())
                .collect(),
        ));
    }
    if !demand.modes().is_empty() {
        constraints.push(Constraint::In(Field::Mode, demand.modes().clone()));
    }
    if !demand.channels().is_empty() {
        constraints.push(Constraint::In(Field::Channel, demand.channels().clone()));
    }
    if let Some(request_id) = demand.request_id() {
        constraints.push(Constraint::Equals(Field::RequestId, request_id.to_string()));
    }
    if let Some(actor) = demand.actor() {
        let parts: Vec<&str> = actor.split('_').collect();
        if let [mode, user_id] = parts[..] {
            constraints.push(Constraint::Equals(Field::Mode, mode.to_string()));
            constraints.push(Constraint::Equals(Field::UserId, user_id.to_string()));
        } else {
            // Anything but <mode>_<id> filters nothing
            debug!(actor, "ignoring malformed actor selector");
        }
    }
    if let Some(preset) = demand.date_range() {
        let ResolvedRange { start, end } =
            resolve(preset, now, demand.date_start(), demand.date_end());
        if let Some(start) = start {
            constraints.push(Constraint::GreaterOrEqual(
                Field::Datetime,
                start.format(TIMESTAMP_FORMAT).to_string(),
            ));
        }
        if let Some(end) = end {
            constraints.push(Constraint::LessOrEqual(
                Field::Datetime,
                end.format(TIMESTAMP_FORMAT).to_string(),
            ));
        }
    }

    debug!(count = constraints.len(), "translated demand");
    constraints
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use logsift_types::{DateRangePreset, LogLevel};
    use std::collections::BTreeSet;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 10)
            .unwrap()
            .and_hms_opt(15, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_empty_demand_matches_all() {
        assert!(constraints_from_demand(&Demand::new(), now()).is_empty());
    }

    #[test]
    fn test_level_set_becomes_in_constraint() {
        let demand = Demand::new().with_levels([LogLevel::Warning, LogLevel::Error].into());
        let constraints = constraints_from_demand(&demand, now());
        let expected: BTreeSet<String> = ["warning".to_string(), "error".to_string()].into();
        assert_eq!(constraints, vec![Constraint::In(Field::Level, expected)]);
    }

    #[test]
    fn test_actor_splits_into_mode_and_user_id() {
        let demand = Demand::new().with_actor("BE_12");
        let constraints = constraints_from_demand(&demand, now());
        assert_eq!(
            constraints,
            vec![
                Constraint::Equals(Field::Mode, "BE".to_string()),
                Constraint::Equals(Field::UserId, "12".to_string()),
            ]
        );
    }

    #[test]
    fn test_malformed_actor_is_ignored() {
        for actor in ["BE", "BE_12_x", "a_b_c_d"] {
            let demand = Demand::new().with_actor(actor);
            let constraints = constraints_from_demand(&demand, now());
            assert!(constraints.is_empty(), "actor {actor:?} should filter nothing");
        }
    }

    #[test]
    fn test_bare_underscore_actor_splits_into_empty_parts() {
        // "_" is two empty parts, so it passes the two-part check
        let demand = Demand::new().with_actor("_");
        let constraints = constraints_from_demand(&demand, now());
        assert_eq!(
            constraints,
            vec![
                Constraint::Equals(Field::Mode, String::new()),
                Constraint::Equals(Field::UserId, String::new()),
            ]
        );
    }

    #[test]
    fn test_date_range_appends_lower_then_upper() {
        let demand = Demand::new().with_date_range(DateRangePreset::Last7Days);
        let constraints = constraints_from_demand(&demand, now());
        assert_eq!(
            constraints,
            vec![
                Constraint::GreaterOrEqual(Field::Datetime, "2024-06-03 00:00:00".to_string()),
                Constraint::LessOrEqual(Field::Datetime, "2024-06-10 15:00:00".to_string()),
            ]
        );
    }

    #[test]
    fn test_custom_range_with_unparseable_start() {
        let demand = Demand::new()
            .with_date_range(DateRangePreset::Custom)
            .with_date_start("last tuesday");
        let constraints = constraints_from_demand(&demand, now());
        // Bad lower bound drops out; upper bound defaults to now
        assert_eq!(
            constraints,
            vec![Constraint::LessOrEqual(
                Field::Datetime,
                "2024-06-10 15:00:00".to_string()
            )]
        );
    }

    #[test]
    fn test_constraint_order_is_stable() {
        let demand = Demand::new()
            .with_levels([LogLevel::Error].into())
            .with_modes(["BE".to_string()].into())
            .with_channels(["auth".to_string()].into())
            .with_request_id("req-9")
            .with_actor("FE_7")
            .with_date_range(DateRangePreset::ThisMonth);
        let constraints = constraints_from_demand(&demand, now());
        let fields: Vec<Field> = constraints.iter().map(|c| c.field()).collect();
        assert_eq!(
            fields,
            vec![
                Field::Level,
                Field::Mode,
                Field::Channel,
                Field::RequestId,
                Field::Mode,
                Field::UserId,
                Field::Datetime,
                Field::Datetime,
            ]
        );
    }

    #[test]
    fn test_translation_is_idempotent() {
        let demand = Demand::new()
            .with_levels([LogLevel::Error].into())
            .with_actor("BE_12")
            .with_date_range(DateRangePreset::ThisWeek);
        let first = constraints_from_demand(&demand, now());
        let second = constraints_from_demand(&demand, now());
        assert_eq!(first, second);
    }
}
