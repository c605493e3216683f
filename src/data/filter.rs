use std::collections::BTreeSet;

use super::model::{Dataset, DaySelection, ScheduleCode};

// ---------------------------------------------------------------------------
// Filter predicate: selected day + selected neighborhoods
// ---------------------------------------------------------------------------

/// The user's current selection. Rebuilt from the controls on every change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    pub day: DaySelection,
    pub neighborhoods: BTreeSet<String>,
}

impl FilterState {
    /// Initialise a [`FilterState`] with every neighborhood selected.
    pub fn select_all(dataset: &Dataset) -> Self {
        FilterState {
            day: DaySelection::All,
            neighborhoods: dataset.neighborhoods.clone(),
        }
    }

    /// True when the neighborhood selection is empty and the filter falls
    /// back to the whole dataset.
    pub fn is_fallback(&self) -> bool {
        self.neighborhoods.is_empty()
    }
}

/// Map a day selection to the schedule codes that should match it.
///
/// Matching is by token substring over the closed vocabulary: a combined code
/// such as `MTH` matches both Monday and Thursday. "TH" is tested as a token
/// so Tuesday (`T`) never picks up Thursday codes and vice versa.
pub fn resolve_day(day: DaySelection) -> Vec<ScheduleCode> {
    let keep = |code: &ScheduleCode| -> bool {
        let token = code.as_str();
        match day {
            DaySelection::All => true,
            DaySelection::Tuesday => token.contains('T') && !token.contains("TH"),
            DaySelection::Thursday => token.contains("TH"),
            DaySelection::Monday => token.contains('M'),
            DaySelection::Wednesday => token.contains('W'),
            DaySelection::Friday => token.contains('F'),
        }
    };
    ScheduleCode::ALL.into_iter().filter(keep).collect()
}

/// Return indices of records that pass the filter.
///
/// A record passes when its schedule code is one of `codes` and its
/// neighborhood is selected. An empty neighborhood selection returns every
/// record instead of nothing, so the map and charts never go blank from a
/// "select none" click.
pub fn filter_records(
    dataset: &Dataset,
    codes: &[ScheduleCode],
    neighborhoods: &BTreeSet<String>,
) -> Vec<usize> {
    if neighborhoods.is_empty() {
        return (0..dataset.len()).collect();
    }

    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| {
            rec.schedule.is_some_and(|code| codes.contains(&code))
                && neighborhoods.contains(&rec.mailing_neighborhood)
        })
        .map(|(i, _)| i)
        .collect()
}

/// Convenience: resolve the day and filter in one step.
pub fn filtered_indices(dataset: &Dataset, filters: &FilterState) -> Vec<usize> {
    let codes = resolve_day(filters.day);
    filter_records(dataset, &codes, &filters.neighborhoods)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::ScheduleCode::*;
    use crate::data::test_support::record;

    fn sample() -> Dataset {
        Dataset::from_records(vec![
            record("Back Bay", "M"),
            record("Back Bay", "T"),
            record("South End", "M"),
        ])
    }

    #[test]
    fn test_resolve_each_day() {
        assert_eq!(resolve_day(DaySelection::All), ScheduleCode::ALL.to_vec());
        assert_eq!(resolve_day(DaySelection::Monday), vec![M, MF, MTH]);
        assert_eq!(resolve_day(DaySelection::Tuesday), vec![T, TF]);
        assert_eq!(resolve_day(DaySelection::Wednesday), vec![W]);
        assert_eq!(resolve_day(DaySelection::Thursday), vec![TH, MTH]);
        assert_eq!(resolve_day(DaySelection::Friday), vec![F, MF, TF]);
    }

    #[test]
    fn test_tuesday_and_thursday_are_disjoint() {
        let tue = resolve_day(DaySelection::Tuesday);
        let thu = resolve_day(DaySelection::Thursday);
        assert!(tue.iter().all(|c| !thu.contains(c)));
    }

    #[test]
    fn test_combo_codes_match_every_constituent_day() {
        let days_for = |code: ScheduleCode| -> Vec<DaySelection> {
            DaySelection::OPTIONS[1..]
                .iter()
                .copied()
                .filter(|d| resolve_day(*d).contains(&code))
                .collect()
        };
        assert_eq!(
            days_for(MTH),
            vec![DaySelection::Monday, DaySelection::Thursday]
        );
        assert_eq!(days_for(MF), vec![DaySelection::Monday, DaySelection::Friday]);
        assert_eq!(days_for(TF), vec![DaySelection::Tuesday, DaySelection::Friday]);
    }

    #[test]
    fn test_filter_by_day_and_neighborhood() {
        let ds = sample();
        let filters = FilterState {
            day: DaySelection::Monday,
            neighborhoods: ds.neighborhoods.clone(),
        };
        assert_eq!(filtered_indices(&ds, &filters), vec![0, 2]);

        let only_back_bay = FilterState {
            day: DaySelection::All,
            neighborhoods: BTreeSet::from(["Back Bay".to_string()]),
        };
        assert_eq!(filtered_indices(&ds, &only_back_bay), vec![0, 1]);
    }

    #[test]
    fn test_empty_neighborhood_selection_falls_back_to_everything() {
        let ds = sample();
        let filters = FilterState {
            day: DaySelection::Wednesday,
            neighborhoods: BTreeSet::new(),
        };
        assert!(filters.is_fallback());
        assert_eq!(filtered_indices(&ds, &filters).len(), ds.len());
    }

    #[test]
    fn test_unknown_codes_never_match_a_day() {
        let ds = Dataset::from_records(vec![record("Back Bay", "S"), record("Back Bay", "W")]);
        let filters = FilterState::select_all(&ds);
        assert_eq!(filtered_indices(&ds, &filters), vec![1]);
    }
}
