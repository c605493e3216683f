use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::error::NoData;
use super::model::{Record, ScheduleCode};

/// Label of the bucket that absorbs rare values.
pub const OTHER_LABEL: &str = "other";

/// Values whose share of the total is below this are folded into "other".
pub const DEFAULT_OTHER_THRESHOLD: f64 = 0.05;

// ---------------------------------------------------------------------------
// Mode of the schedule code
// ---------------------------------------------------------------------------

/// Most frequent schedule code in `records`.
///
/// Ties go to the lexicographically smallest token. Records without a valid
/// code are ignored.
pub fn most_common_code(records: &[&Record]) -> Result<ScheduleCode, NoData> {
    let mut counts = [0usize; ScheduleCode::COUNT];
    for code in records.iter().filter_map(|r| r.schedule) {
        counts[code.index()] += 1;
    }

    let mut by_token = ScheduleCode::ALL;
    by_token.sort_by_key(|c| c.as_str());

    let best = by_token
        .into_iter()
        .max_by(|a, b| {
            counts[a.index()]
                .cmp(&counts[b.index()])
                .then_with(|| b.as_str().cmp(a.as_str()))
        })
        .ok_or(NoData)?;

    if counts[best.index()] == 0 {
        return Err(NoData);
    }
    Ok(best)
}

// ---------------------------------------------------------------------------
// Neighborhood × schedule-code cross-tabulation
// ---------------------------------------------------------------------------

/// Per-neighborhood counts, one column for every code in
/// [`ScheduleCode::ALL`] so absent codes show up as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CrossTab {
    pub rows: BTreeMap<String, [u32; ScheduleCode::COUNT]>,
}

#[cfg(test)]
impl CrossTab {
    pub fn count(&self, neighborhood: &str, code: ScheduleCode) -> u32 {
        self.rows
            .get(neighborhood)
            .map_or(0, |row| row[code.index()])
    }

    pub fn row_total(&self, neighborhood: &str) -> u32 {
        self.rows
            .get(neighborhood)
            .map_or(0, |row| row.iter().sum())
    }
}

/// Count records per neighborhood and schedule code.
///
/// Records without a known code are not counted, so a neighborhood that has
/// only those gets no row at all.
pub fn cross_tabulate(records: &[&Record]) -> Result<CrossTab, NoData> {
    let mut table = CrossTab::default();
    for rec in records {
        let Some(code) = rec.schedule else { continue };
        table
            .rows
            .entry(rec.mailing_neighborhood.clone())
            .or_default()[code.index()] += 1;
    }
    if table.rows.is_empty() {
        return Err(NoData);
    }
    Ok(table)
}

// ---------------------------------------------------------------------------
// Categorical frequency with small-category collapsing
// ---------------------------------------------------------------------------

/// Categorical columns summarised as proportion charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryColumn {
    PwdDistrict,
    Recollect,
}

impl CategoryColumn {
    pub fn value(self, record: &Record) -> Option<&str> {
        match self {
            CategoryColumn::PwdDistrict => record.pwd_district.as_deref(),
            CategoryColumn::Recollect => record.recollect.as_deref(),
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            CategoryColumn::PwdDistrict => "Public Works District",
            CategoryColumn::Recollect => "Recollection Frequency",
        }
    }
}

/// Labels and counts, ordered by descending count.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Proportions {
    pub labels: Vec<String>,
    pub counts: Vec<usize>,
}

impl Proportions {
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    #[cfg(test)]
    pub fn get(&self, label: &str) -> Option<usize> {
        self.labels
            .iter()
            .position(|l| l == label)
            .map(|i| self.counts[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.counts.iter().copied())
    }
}

/// Value counts of `column` over `records`, with rare values collapsed.
pub fn category_shares(
    records: &[&Record],
    column: CategoryColumn,
    threshold: f64,
) -> Result<Proportions, NoData> {
    collapse_minor(records.iter().map(|r| column.value(r)), threshold)
}

/// Count values and fold every value whose share is below `threshold` into
/// the [`OTHER_LABEL`] bucket.
///
/// Missing values count toward the total and always land in "other". Ties in
/// the output keep first-appearance order.
pub fn collapse_minor<'a, I>(values: I, threshold: f64) -> Result<Proportions, NoData>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut order: Vec<(&'a str, usize)> = Vec::new();
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut missing = 0usize;
    let mut total = 0usize;

    for value in values {
        total += 1;
        match value {
            Some(v) => {
                let slot = *index.entry(v).or_insert_with(|| {
                    order.push((v, 0));
                    order.len() - 1
                });
                order[slot].1 += 1;
            }
            None => missing += 1,
        }
    }

    if total == 0 {
        return Err(NoData);
    }

    let cutoff = threshold * total as f64;
    let mut other = missing;
    let mut kept: Vec<(String, usize)> = Vec::with_capacity(order.len() + 1);
    for (label, count) in order {
        if label != OTHER_LABEL && count as f64 >= cutoff {
            kept.push((label.to_string(), count));
        } else {
            other += count;
        }
    }
    if other > 0 {
        kept.push((OTHER_LABEL.to_string(), other));
    }

    // Stable: equal counts keep their first-appearance order.
    kept.sort_by(|a, b| b.1.cmp(&a.1));

    let (labels, counts) = kept.into_iter().unzip();
    Ok(Proportions { labels, counts })
}

// ---------------------------------------------------------------------------
// Map centre
// ---------------------------------------------------------------------------

/// Midpoint of the x and y extents of `points`.
pub fn map_center<I>(points: I) -> Result<[f64; 2], NoData>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let (min_x, max_x, min_y, max_y) = points.into_iter().fold(
        (
            f64::INFINITY,
            f64::NEG_INFINITY,
            f64::INFINITY,
            f64::NEG_INFINITY,
        ),
        |(x0, x1, y0, y1), (x, y)| (x0.min(x), x1.max(x), y0.min(y), y1.max(y)),
    );

    if min_x > max_x || min_y > max_y {
        return Err(NoData);
    }
    Ok([(min_x + max_x) / 2.0, (min_y + max_y) / 2.0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::record;

    fn refs(records: &[Record]) -> Vec<&Record> {
        records.iter().collect()
    }

    fn labelled(pairs: &[(&str, usize)]) -> Vec<Option<String>> {
        pairs
            .iter()
            .flat_map(|(label, n)| std::iter::repeat(Some(label.to_string())).take(*n))
            .collect()
    }

    #[test]
    fn test_mode_picks_most_frequent() {
        let recs = vec![
            record("Back Bay", "M"),
            record("Back Bay", "TH"),
            record("South End", "TH"),
        ];
        assert_eq!(most_common_code(&refs(&recs)), Ok(ScheduleCode::TH));
    }

    #[test]
    fn test_mode_tie_goes_to_smallest_token() {
        let recs = vec![record("Back Bay", "W"), record("Back Bay", "F")];
        assert_eq!(most_common_code(&refs(&recs)), Ok(ScheduleCode::F));

        let recs = vec![record("Back Bay", "MTH"), record("Back Bay", "MF")];
        assert_eq!(most_common_code(&refs(&recs)), Ok(ScheduleCode::MF));
    }

    #[test]
    fn test_mode_on_empty_subset_is_no_data() {
        assert_eq!(most_common_code(&[]), Err(NoData));

        let unknown = vec![record("Back Bay", "S")];
        assert_eq!(most_common_code(&refs(&unknown)), Err(NoData));
    }

    #[test]
    fn test_cross_tab_has_every_code_column() {
        let recs = vec![
            record("Back Bay", "M"),
            record("Back Bay", "T"),
            record("Back Bay", "M"),
            record("South End", "MTH"),
        ];
        let table = cross_tabulate(&refs(&recs)).unwrap();

        assert_eq!(table.rows.len(), 2);
        for row in table.rows.values() {
            assert_eq!(row.len(), 8);
        }
        assert_eq!(table.count("Back Bay", ScheduleCode::M), 2);
        assert_eq!(table.count("Back Bay", ScheduleCode::T), 1);
        assert_eq!(table.count("Back Bay", ScheduleCode::TF), 0);
        assert_eq!(table.row_total("Back Bay"), 3);
        assert_eq!(table.row_total("South End"), 1);
    }

    #[test]
    fn test_cross_tab_on_empty_subset_is_no_data() {
        assert_eq!(cross_tabulate(&[]), Err(NoData));

        let unknown = vec![record("Roxbury", "S"), record("Roxbury", "")];
        assert_eq!(cross_tabulate(&refs(&unknown)), Err(NoData));
    }

    #[test]
    fn test_cross_tab_skips_unknown_codes() {
        let recs = vec![
            record("Back Bay", "M"),
            record("Back Bay", "XYZ"),
            record("Roxbury", ""),
        ];
        let table = cross_tabulate(&refs(&recs)).unwrap();

        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.row_total("Back Bay"), 1);
        assert!(!table.rows.contains_key("Roxbury"));
    }

    #[test]
    fn test_collapse_keeps_values_at_threshold() {
        let values = labelled(&[("A", 60), ("B", 30), ("C", 5), ("D", 5)]);
        let shares = collapse_minor(values.iter().map(Option::as_deref), DEFAULT_OTHER_THRESHOLD).unwrap();
        assert_eq!(shares.labels, ["A", "B", "C", "D"]);
        assert_eq!(shares.counts, [60, 30, 5, 5]);
        assert_eq!(shares.get(OTHER_LABEL), None);
    }

    #[test]
    fn test_collapse_folds_values_below_threshold() {
        let values = labelled(&[("A", 91), ("B", 5), ("C", 4)]);
        let shares = collapse_minor(values.iter().map(Option::as_deref), DEFAULT_OTHER_THRESHOLD).unwrap();
        assert_eq!(shares.labels, ["A", "B", "other"]);
        assert_eq!(shares.counts, [91, 5, 4]);
        assert_eq!(shares.total(), 100);
    }

    #[test]
    fn test_collapse_sums_several_minor_values_and_missing() {
        let mut values = labelled(&[("A", 94), ("B", 2), ("C", 2)]);
        values.extend([None, None]);
        let shares = collapse_minor(values.iter().map(Option::as_deref), DEFAULT_OTHER_THRESHOLD).unwrap();
        assert_eq!(shares.labels, ["A", "other"]);
        assert_eq!(shares.counts, [94, 6]);
    }

    #[test]
    fn test_collapse_orders_by_count_then_first_seen() {
        let values = labelled(&[("B", 10), ("A", 20), ("C", 10)]);
        let shares = collapse_minor(values.iter().map(Option::as_deref), DEFAULT_OTHER_THRESHOLD).unwrap();
        assert_eq!(shares.labels, ["A", "B", "C"]);
    }

    #[test]
    fn test_collapse_on_empty_input_is_no_data() {
        assert_eq!(
            collapse_minor(Vec::<Option<&str>>::new(), DEFAULT_OTHER_THRESHOLD),
            Err(NoData)
        );
    }

    #[test]
    fn test_category_shares_reads_the_requested_column() {
        let mut a = record("Back Bay", "M");
        a.pwd_district = Some("1C".into());
        a.recollect = Some("FA".into());
        let mut b = record("Back Bay", "M");
        b.pwd_district = Some("10A".into());
        b.recollect = Some("FA".into());
        let recs = vec![a, b];

        let districts =
            category_shares(&refs(&recs), CategoryColumn::PwdDistrict, 0.05).unwrap();
        assert_eq!(districts.labels, ["1C", "10A"]);

        let recollect = category_shares(&refs(&recs), CategoryColumn::Recollect, 0.05).unwrap();
        assert_eq!(recollect.iter().collect::<Vec<_>>(), [("FA", 2)]);
    }

    #[test]
    fn test_map_center_is_midpoint_of_extents() {
        let center = map_center([(-71.2, 42.2), (-71.0, 42.4), (-71.1, 42.25)]).unwrap();
        assert!((center[0] + 71.1).abs() < 1e-9);
        assert!((center[1] - 42.3).abs() < 1e-9);
    }

    #[test]
    fn test_map_center_of_nothing_is_no_data() {
        assert_eq!(map_center(std::iter::empty::<(f64, f64)>()), Err(NoData));
    }
}
