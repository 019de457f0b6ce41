use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    /// Uniform integer in `lo..=hi`.
    fn range(&mut self, lo: u64, hi: u64) -> u64 {
        lo + self.next_u64() % (hi - lo + 1)
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.next_u64() as usize % items.len()]
    }
}

const TOPICS: [&str; 8] = [
    "Coronary artery disease",
    "Heart failure",
    "Atrial fibrillation",
    "Hypertension",
    "Cardiomyopathy",
    "Myocardial infarction",
    "Valvular heart disease",
    "Congenital heart defects",
];

const ANGLES: [&str; 6] = [
    "risk prediction with machine learning",
    "a multicentre cohort study",
    "outcomes after intervention",
    "biomarkers and early diagnosis",
    "a systematic review",
    "imaging-based assessment",
];

const PUBLISHERS: [&str; 5] = ["Elsevier", "Springer", "Wiley", "BMJ", "Nature Portfolio"];

const SURNAMES: [&str; 10] = [
    "Okafor", "Lindqvist", "Tanaka", "Moreau", "Patel", "Kowalski", "Haddad", "Silva", "Nguyen",
    "Becker",
];

const AFFILIATIONS: [&str; 4] = [
    "University of Oxford",
    "Karolinska Institutet",
    "Mayo Clinic",
    "University of Tokyo",
];

const INTERESTS: [&str; 4] = [
    "Cardiology, Machine Learning",
    "Epidemiology, Heart Failure",
    "Cardiac Imaging",
    "Preventive Cardiology, Statistics",
];

fn write_publications(path: &Path, rng: &mut SimpleRng) -> Result<usize> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(["Title", "Authors", "Year", "Publisher", "Citations", "Link"])?;

    let mut rows = 0;
    for year in 2015..=2024_u64 {
        // Older papers have had longer to collect citations.
        let age = 2025 - year;
        for _ in 0..rng.range(2, 7) {
            let title = format!("{}: {}", rng.pick(&TOPICS), rng.pick(&ANGLES));
            let authors = format!("{} A, {} B", rng.pick(&SURNAMES), rng.pick(&SURNAMES));
            let citations = rng.range(0, 15 * age);
            let link = format!("https://doi.org/10.5555/heart.{year}.{rows:04}");
            writer.write_record([
                title,
                authors,
                year.to_string(),
                rng.pick(&PUBLISHERS).to_string(),
                citations.to_string(),
                link,
            ])?;
            rows += 1;
        }
    }
    writer.flush()?;
    Ok(rows)
}

fn write_authors(path: &Path, rng: &mut SimpleRng) -> Result<usize> {
    let mut names = Vec::new();
    let mut affiliations = Vec::new();
    let mut interests = Vec::new();
    let mut cited_by = Vec::new();
    let mut h_index = Vec::new();
    let mut i10_index = Vec::new();
    let mut histories: Vec<Option<String>> = Vec::new();

    for (i, surname) in SURNAMES.iter().take(6).enumerate() {
        let first_year = 2015 + rng.range(0, 4);
        let entries: Vec<(u64, u64)> = (first_year..=2024)
            .map(|y| (y, rng.range(5, 40) * (y - first_year + 1)))
            .collect();
        let total: u64 = entries.iter().map(|&(_, c)| c).sum();
        let history = entries
            .iter()
            .map(|(y, c)| format!("{y}: {c}"))
            .collect::<Vec<_>>()
            .join(", ");

        names.push(format!("Dr. {surname}"));
        affiliations.push(AFFILIATIONS[i % AFFILIATIONS.len()].to_string());
        interests.push(INTERESTS[i % INTERESTS.len()].to_string());
        cited_by.push(total as i64);
        h_index.push(rng.range(3, 30) as i64);
        i10_index.push(rng.range(1, 40) as i64);
        // The last author has no history, to show the fallback message.
        histories.push((i < 5).then(|| format!("{{{history}}}")));
    }

    let schema = Arc::new(Schema::new(vec![
        Field::new("Name", DataType::Utf8, false),
        Field::new("Affiliation", DataType::Utf8, false),
        Field::new("Interests", DataType::Utf8, false),
        Field::new("Cited by", DataType::Int64, false),
        Field::new("H-Index", DataType::Int64, false),
        Field::new("i10-Index", DataType::Int64, false),
        Field::new("Citations Per Year", DataType::Utf8, true),
    ]));

    let n = names.len();
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(names)),
            Arc::new(StringArray::from(affiliations)),
            Arc::new(StringArray::from(interests)),
            Arc::new(Int64Array::from(cited_by)),
            Arc::new(Int64Array::from(h_index)),
            Arc::new(Int64Array::from(i10_index)),
            Arc::new(StringArray::from(histories)),
        ],
    )
    .context("building author record batch")?;

    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(n)
}

fn main() -> Result<()> {
    let out_dir = Path::new("sample_data");
    std::fs::create_dir_all(out_dir).context("creating sample_data/")?;

    let mut rng = SimpleRng::new(42);

    let publications = out_dir.join("heart_disease_dataset.csv");
    let n_publications = write_publications(&publications, &mut rng)?;

    let authors = out_dir.join("author_details_output.parquet");
    let n_authors = write_authors(&authors, &mut rng)?;

    let config = serde_json::json!({
        "publications_path": "heart_disease_dataset.csv",
        "authors_path": "author_details_output.parquet",
    });
    let config_path = out_dir.join("dashboard.json");
    std::fs::write(&config_path, serde_json::to_string_pretty(&config)?)
        .with_context(|| format!("writing {}", config_path.display()))?;

    println!(
        "Wrote {n_publications} publications to {}, {n_authors} authors to {} and {}",
        publications.display(),
        authors.display(),
        config_path.display()
    );
    println!("Run the dashboard from inside {} to use them.", out_dir.display());
    Ok(())
}
