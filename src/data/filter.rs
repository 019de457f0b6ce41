use super::model::Publication;

// ---------------------------------------------------------------------------
// Year range selection
// ---------------------------------------------------------------------------

/// Inclusive range of publication years.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    /// Build a range, swapping the ends if they are reversed.
    pub fn new(start: i32, end: i32) -> Self {
        if start <= end {
            YearRange { start, end }
        } else {
            YearRange {
                start: end,
                end: start,
            }
        }
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.start..=self.end).contains(&year)
    }

    /// Restrict this range to `bounds`.
    pub fn clamp_to(&self, bounds: YearRange) -> Self {
        YearRange::new(
            self.start.clamp(bounds.start, bounds.end),
            self.end.clamp(bounds.start, bounds.end),
        )
    }
}

/// Smallest and largest numeric year, or `None` when no record has one.
pub fn year_bounds(records: &[Publication]) -> Option<YearRange> {
    let mut years = records.iter().filter_map(Publication::year);
    let first = years.next()?;
    let (min, max) = years.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y)));
    Some(YearRange::new(min, max))
}

/// Return indices of publications whose year lies in `range`.
///
/// Source order is preserved. A record without a numeric year never passes.
pub fn filter_by_year(records: &[Publication], range: YearRange) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, rec)| rec.year().is_some_and(|y| range.contains(y)))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, PublicationSet, Table, PUBLICATION_COLUMNS};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn publications(years: &[CellValue]) -> Vec<Publication> {
        let mut table = Table::new(
            vec!["Year".into()],
            years.iter().map(|y| vec![y.clone()]).collect(),
        );
        table.ensure_columns(&PUBLICATION_COLUMNS);
        PublicationSet::from_table(table).records
    }

    fn years(values: &[i64]) -> Vec<Publication> {
        publications(&values.iter().map(|&y| CellValue::Integer(y)).collect::<Vec<_>>())
    }

    #[test]
    fn reversed_range_is_normalized() {
        assert_eq!(YearRange::new(2021, 2018), YearRange::new(2018, 2021));
    }

    #[test]
    fn clamp_keeps_range_inside_bounds() {
        let bounds = YearRange::new(2015, 2020);
        assert_eq!(
            YearRange::new(2010, 2030).clamp_to(bounds),
            YearRange::new(2015, 2020)
        );
        assert_eq!(
            YearRange::new(2016, 2017).clamp_to(bounds),
            YearRange::new(2016, 2017)
        );
    }

    #[test]
    fn bounds_skip_non_numeric_years() {
        let recs = publications(&[
            CellValue::sentinel(),
            CellValue::Integer(2020),
            CellValue::Float(2017.0),
            CellValue::Null,
        ]);
        assert_eq!(year_bounds(&recs), Some(YearRange::new(2017, 2020)));
    }

    #[test]
    fn bounds_of_yearless_records_are_none() {
        assert_eq!(year_bounds(&publications(&[CellValue::sentinel()])), None);
        assert_eq!(year_bounds(&[]), None);
    }

    #[test]
    fn full_range_keeps_every_dated_row() {
        let recs = years(&[2019, 2019, 2020, 2017]);
        let bounds = year_bounds(&recs).unwrap();
        assert_eq!(filter_by_year(&recs, bounds), vec![0, 1, 2, 3]);
    }

    #[rstest]
    #[case(2018, 2019, vec![0, 1, 4])]
    #[case(2020, 2020, vec![2])]
    #[case(2021, 2030, vec![])]
    fn range_is_inclusive(#[case] start: i32, #[case] end: i32, #[case] expected: Vec<usize>) {
        let recs = years(&[2019, 2019, 2020, 2017, 2018]);
        assert_eq!(filter_by_year(&recs, YearRange::new(start, end)), expected);
    }

    #[test]
    fn narrowing_never_grows_or_leaks() {
        let recs = years(&[2015, 2016, 2017, 2018, 2019, 2020, 2021, 2019, 2016]);
        let full = year_bounds(&recs).unwrap();
        let total = filter_by_year(&recs, full).len();

        for start in full.start..=full.end {
            for end in start..=full.end {
                let range = YearRange::new(start, end);
                let visible = filter_by_year(&recs, range);
                assert!(visible.len() <= total);
                for i in visible {
                    let y = recs[i].year().unwrap();
                    assert!(range.contains(y), "{y} outside {range:?}");
                }
            }
        }
    }
}
