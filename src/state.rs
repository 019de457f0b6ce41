use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::DashboardConfig;
use crate::data::cache::DatasetCache;
use crate::data::filter::{filter_by_year, year_bounds, YearRange};
use crate::data::loader::{load_authors, load_publications};
use crate::data::model::{AuthorSet, LoadOutcome, Notice, PublicationSet};
use crate::data::stats::{articles_per_year, average_citations_per_year};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    publications_cache: DatasetCache<LoadOutcome<PublicationSet>>,
    authors_cache: DatasetCache<LoadOutcome<AuthorSet>>,

    /// Loaded publications and the notices raised loading them.
    pub publications: Arc<LoadOutcome<PublicationSet>>,

    /// Loaded authors and the notices raised loading them.
    pub authors: Arc<LoadOutcome<AuthorSet>>,

    /// Full span of publication years (None when no row has a numeric year).
    pub year_bounds: Option<YearRange>,

    /// Year range currently selected in the UI.
    pub year_range: Option<YearRange>,

    /// Indices of publications passing the year filter (cached).
    pub visible_indices: Vec<usize>,

    /// "Articles Published Per Year" over the visible rows.
    pub articles_per_year: BTreeMap<i32, usize>,

    /// "Average Citations Per Year" over the visible rows.
    pub average_citations: BTreeMap<i32, f64>,
}

impl AppState {
    /// Build the state and load both datasets.
    pub fn new(config: DashboardConfig) -> Self {
        let mut state = Self {
            config,
            publications_cache: DatasetCache::new(),
            authors_cache: DatasetCache::new(),
            publications: Arc::default(),
            authors: Arc::default(),
            year_bounds: None,
            year_range: None,
            visible_indices: Vec::new(),
            articles_per_year: BTreeMap::new(),
            average_citations: BTreeMap::new(),
        };
        state.load();
        state
    }

    /// Fetch both datasets, reading only the ones not already cached.
    pub fn load(&mut self) {
        let publications_path = self.config.publications_path.clone();
        let authors_path = self.config.authors_path.clone();

        if !self.publications_cache.is_loaded() {
            log::debug!("Reading publications from {}", publications_path.display());
        }
        if !self.authors_cache.is_loaded() {
            log::debug!("Reading authors from {}", authors_path.display());
        }

        let publications = self
            .publications_cache
            .get_or_load(|| load_publications(&publications_path));
        self.authors = self
            .authors_cache
            .get_or_load(|| load_authors(&authors_path));

        if !Arc::ptr_eq(&publications, &self.publications) {
            self.publications = publications;
            let old_bounds = self.year_bounds;
            self.year_bounds = year_bounds(&self.publications.data.records);
            // A range the user narrowed survives a reload; a full range follows the new data.
            self.year_range = match (self.year_range, self.year_bounds) {
                (Some(range), Some(bounds)) if Some(range) != old_bounds => {
                    Some(range.clamp_to(bounds))
                }
                (_, bounds) => bounds,
            };
            self.refilter();
        }
    }

    /// Forget both cached datasets and read the files again.
    pub fn reload(&mut self) {
        log::info!("Reloading datasets");
        self.publications_cache.invalidate();
        self.authors_cache.invalidate();
        self.load();
    }

    /// Point the publications loader at another file.
    pub fn set_publications_path(&mut self, path: PathBuf) {
        self.config.publications_path = path;
        self.publications_cache.invalidate();
        self.year_range = None;
        self.load();
    }

    /// Point the author loader at another file.
    pub fn set_authors_path(&mut self, path: PathBuf) {
        self.config.authors_path = path;
        self.authors_cache.invalidate();
        self.load();
    }

    /// Select a year range; it is kept within the data's bounds.
    pub fn set_year_range(&mut self, range: YearRange) {
        let Some(bounds) = self.year_bounds else {
            return;
        };
        let range = range.clamp_to(bounds);
        if self.year_range != Some(range) {
            self.year_range = Some(range);
            self.refilter();
        }
    }

    /// Recompute `visible_indices` and the per-year aggregates after a change.
    pub fn refilter(&mut self) {
        let records = &self.publications.data.records;
        self.visible_indices = match self.year_range {
            Some(range) => filter_by_year(records, range),
            // Without any numeric year there is nothing to filter on.
            None => (0..records.len()).collect(),
        };
        self.articles_per_year = articles_per_year(records, &self.visible_indices);
        self.average_citations = average_citations_per_year(records, &self.visible_indices);
    }

    /// All notices raised by the most recent loads.
    pub fn notices(&self) -> impl Iterator<Item = &Notice> {
        self.publications
            .notices
            .iter()
            .chain(self.authors.notices.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::NoticeLevel;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const PUBLICATIONS: &str = "Title,Authors,Year,Publisher,Citations,Link\n\
        A,X,2019,P,10,l\n\
        B,Y,2019,P,20,l\n\
        C,Z,2020,P,6,l\n\
        D,W,2022,P,1,l\n";

    const AUTHORS: &str = "Name,Affiliation,Interests,Cited by,H-Index,i10-Index,Citations Per Year\n\
        Ada,Oxford,Cardiology,120,5,3,\"{2019: 40, 2020: 80}\"\n";

    fn config(dir: &TempDir) -> DashboardConfig {
        let publications_path = dir.path().join("pubs.csv");
        let authors_path = dir.path().join("authors.csv");
        std::fs::write(&publications_path, PUBLICATIONS).unwrap();
        std::fs::write(&authors_path, AUTHORS).unwrap();
        DashboardConfig {
            publications_path,
            authors_path,
            ..DashboardConfig::default()
        }
    }

    #[test]
    fn initial_load_shows_everything() {
        let dir = TempDir::new().unwrap();
        let state = AppState::new(config(&dir));

        assert_eq!(state.notices().count(), 0);
        assert_eq!(state.year_bounds, Some(YearRange::new(2019, 2022)));
        assert_eq!(state.year_range, state.year_bounds);
        assert_eq!(state.visible_indices, vec![0, 1, 2, 3]);
        assert_eq!(
            state.articles_per_year,
            BTreeMap::from([(2019, 2), (2020, 1), (2022, 1)])
        );
        assert_eq!(state.average_citations.get(&2019), Some(&15.0));
        assert_eq!(state.authors.data.len(), 1);
    }

    #[test]
    fn year_range_filters_rows_and_aggregates() {
        let dir = TempDir::new().unwrap();
        let mut state = AppState::new(config(&dir));

        state.set_year_range(YearRange::new(2020, 2030));

        assert_eq!(state.year_range, Some(YearRange::new(2020, 2022)));
        assert_eq!(state.visible_indices, vec![2, 3]);
        assert_eq!(
            state.articles_per_year,
            BTreeMap::from([(2020, 1), (2022, 1)])
        );
    }

    #[test]
    fn missing_files_leave_empty_datasets_and_two_errors() {
        let dir = TempDir::new().unwrap();
        let state = AppState::new(DashboardConfig {
            publications_path: dir.path().join("nope.csv"),
            authors_path: dir.path().join("nope.xlsx"),
            ..DashboardConfig::default()
        });

        assert!(state.publications.data.is_empty());
        assert!(state.authors.data.is_empty());
        assert!(state.visible_indices.is_empty());
        assert_eq!(state.year_bounds, None);
        let levels: Vec<_> = state.notices().map(|n| n.level).collect();
        assert_eq!(levels, vec![NoticeLevel::Error, NoticeLevel::Error]);
    }

    #[test]
    fn cached_data_is_kept_until_reload() {
        let dir = TempDir::new().unwrap();
        let cfg = config(&dir);
        let mut state = AppState::new(cfg.clone());

        std::fs::write(&cfg.publications_path, "Title,Year\nOnly,2021\n").unwrap();
        state.load();
        assert_eq!(state.publications.data.len(), 4);

        state.reload();
        assert_eq!(state.publications.data.len(), 1);
        assert_eq!(state.year_range, Some(YearRange::new(2021, 2021)));
        assert_eq!(state.visible_indices, vec![0]);
    }

    #[test]
    fn full_range_follows_reloaded_data() {
        let dir = TempDir::new().unwrap();
        let cfg = config(&dir);
        let mut state = AppState::new(cfg.clone());
        assert_eq!(state.year_range, Some(YearRange::new(2019, 2022)));

        std::fs::write(
            &cfg.publications_path,
            format!("{PUBLICATIONS}E,V,2015,P,3,l\nF,U,2024,P,0,l\n"),
        )
        .unwrap();
        state.reload();

        assert_eq!(state.year_bounds, Some(YearRange::new(2015, 2024)));
        assert_eq!(state.year_range, state.year_bounds);
        assert_eq!(state.visible_indices, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn narrowed_range_survives_reload() {
        let dir = TempDir::new().unwrap();
        let cfg = config(&dir);
        let mut state = AppState::new(cfg.clone());
        state.set_year_range(YearRange::new(2019, 2020));

        std::fs::write(
            &cfg.publications_path,
            format!("{PUBLICATIONS}E,V,2015,P,3,l\nF,U,2024,P,0,l\n"),
        )
        .unwrap();
        state.reload();

        assert_eq!(state.year_range, Some(YearRange::new(2019, 2020)));
        assert_eq!(state.visible_indices, vec![0, 1, 2]);
    }

    #[test]
    fn switching_publications_file_resets_range() {
        let dir = TempDir::new().unwrap();
        let mut state = AppState::new(config(&dir));
        state.set_year_range(YearRange::new(2019, 2019));

        let other = dir.path().join("other.csv");
        std::fs::write(&other, "Title,Year\nA,2000\nB,2005\n").unwrap();
        state.set_publications_path(other);

        assert_eq!(state.year_range, Some(YearRange::new(2000, 2005)));
        assert_eq!(state.visible_indices, vec![0, 1]);
    }
}
