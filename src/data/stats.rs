use std::collections::BTreeMap;

use super::model::Publication;

/// Number of publications per year among `indices`, ascending by year.
pub fn articles_per_year(records: &[Publication], indices: &[usize]) -> BTreeMap<i32, usize> {
    let mut counts = BTreeMap::new();
    for rec in indices.iter().filter_map(|&i| records.get(i)) {
        if let Some(year) = rec.year() {
            *counts.entry(year).or_insert(0) += 1;
        }
    }
    counts
}

/// Mean citation count per year among `indices`.
///
/// Non-numeric citation cells are skipped; a year with none left is omitted.
pub fn average_citations_per_year(
    records: &[Publication],
    indices: &[usize],
) -> BTreeMap<i32, f64> {
    let mut sums: BTreeMap<i32, (f64, usize)> = BTreeMap::new();
    for rec in indices.iter().filter_map(|&i| records.get(i)) {
        let (Some(year), Some(citations)) = (rec.year(), rec.citations()) else {
            continue;
        };
        let entry = sums.entry(year).or_insert((0.0, 0));
        entry.0 += citations;
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(year, (sum, n))| (year, sum / n as f64))
        .collect()
}

/// Plot points for an author's citation history.
pub fn author_series(history: &BTreeMap<i32, u64>) -> Vec<[f64; 2]> {
    history
        .iter()
        .map(|(&year, &count)| [f64::from(year), count as f64])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, PublicationSet, Table, PUBLICATION_COLUMNS};
    use pretty_assertions::assert_eq;

    fn publications(rows: &[(CellValue, CellValue)]) -> Vec<Publication> {
        let mut table = Table::new(
            vec!["Year".into(), "Citations".into()],
            rows.iter()
                .map(|(y, c)| vec![y.clone(), c.clone()])
                .collect(),
        );
        table.ensure_columns(&PUBLICATION_COLUMNS);
        PublicationSet::from_table(table).records
    }

    fn all(records: &[Publication]) -> Vec<usize> {
        (0..records.len()).collect()
    }

    #[test]
    fn counts_articles_per_year() {
        let recs = publications(&[
            (CellValue::Integer(2019), CellValue::Integer(1)),
            (CellValue::Integer(2019), CellValue::Integer(2)),
            (CellValue::Integer(2020), CellValue::Integer(3)),
        ]);
        assert_eq!(
            articles_per_year(&recs, &all(&recs)),
            BTreeMap::from([(2019, 2), (2020, 1)])
        );
    }

    #[test]
    fn counts_only_selected_rows() {
        let recs = publications(&[
            (CellValue::Integer(2019), CellValue::Null),
            (CellValue::Integer(2020), CellValue::Null),
            (CellValue::sentinel(), CellValue::Null),
        ]);
        assert_eq!(
            articles_per_year(&recs, &[1, 2]),
            BTreeMap::from([(2020, 1)])
        );
    }

    #[test]
    fn averages_numeric_citations() {
        let recs = publications(&[
            (CellValue::Integer(2019), CellValue::Integer(10)),
            (CellValue::Integer(2019), CellValue::Integer(20)),
            (CellValue::Integer(2019), CellValue::sentinel()),
            (CellValue::Integer(2020), CellValue::Float(5.0)),
            (CellValue::Integer(2021), CellValue::Null),
        ]);
        assert_eq!(
            average_citations_per_year(&recs, &all(&recs)),
            BTreeMap::from([(2019, 15.0), (2020, 5.0)])
        );
    }

    #[test]
    fn author_series_is_year_ordered() {
        let history = BTreeMap::from([(2021, 9_u64), (2019, 3)]);
        assert_eq!(author_series(&history), vec![[2019.0, 3.0], [2021.0, 9.0]]);
    }
}
