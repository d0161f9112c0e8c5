use std::ops::RangeInclusive;
use std::path::Path;

use thiserror::Error;
use tracing::{debug, info, warn};

pub mod csv;
pub mod source;

use crate::model::category::{CATEGORY_COUNT, Category, category_order};
use crate::model::score::CategoryScore;
use csv::{ColumnSpec, CsvRecord, HeaderIndex, records};
use source::read_text;

pub const TEXT_COLUMN: &str = "text";

/// Ratings are 1..=5; 0 marks a review with no rating mass at all.
pub const STORED_SCORE_RANGE: RangeInclusive<f64> = 0.0..=5.0;
pub const USEFULNESS_RANGE: RangeInclusive<f64> = 0.0..=1.0;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("schema error: missing columns {}", .0.join(", "))]
    Schema(Vec<String>),
    #[error("parse error at line {line}: {msg}")]
    Parse { line: usize, msg: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelledReview {
    pub text: String,
    /// Indexed by `Category::index`.
    pub scores: [CategoryScore; CATEGORY_COUNT],
}

impl LabelledReview {
    pub fn score(&self, category: Category) -> &CategoryScore {
        &self.scores[category.index()]
    }
}

/// Read-only table of labelled reviews, loaded once and shared by reference.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    reviews: Vec<LabelledReview>,
}

impl Dataset {
    pub fn from_reviews(reviews: Vec<LabelledReview>) -> Self {
        Self { reviews }
    }

    pub fn len(&self) -> usize {
        self.reviews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&LabelledReview> {
        self.reviews.get(idx)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LabelledReview> {
        self.reviews.iter()
    }
}

pub fn load_dataset(path: &Path) -> Result<Dataset, DatasetError> {
    let content = read_text(path)?;
    let dataset = parse_dataset(&content)?;
    info!(
        path = %path.display(),
        reviews = dataset.len(),
        "loaded labelled reviews"
    );
    Ok(dataset)
}

pub fn parse_dataset(content: &str) -> Result<Dataset, DatasetError> {
    let mut rows = records(content);
    let header = read_header(&mut rows)?;
    let index = HeaderIndex::new(&header.fields);

    let mut specs = vec![ColumnSpec::new(TEXT_COLUMN)];
    for &category in category_order() {
        let legacy = category.legacy_label();
        specs.push(ColumnSpec::with_alias(
            category.score_column(),
            legacy.map(|l| format!("{l}_score")),
        ));
        specs.push(ColumnSpec::with_alias(
            category.usefulness_column(),
            legacy.map(|l| format!("{l}_usefulness")),
        ));
    }
    let positions = index.resolve(&specs)?;
    let text_col = positions[0];

    let mut reviews = Vec::new();
    let mut missing_cells = 0usize;
    for row in rows {
        let row = row?;
        if row.is_blank() {
            continue;
        }
        check_width(&row, index.width())?;

        let mut scores = [CategoryScore {
            category: Category::Food,
            score: 0.0,
            usefulness: 0.0,
        }; CATEGORY_COUNT];
        for (slot, &category) in scores.iter_mut().zip(category_order()) {
            let base = 1 + 2 * category.index();
            let score = parse_cell(&row, positions[base], &header.fields)?;
            check_range(&row, positions[base], &header.fields, score, STORED_SCORE_RANGE)?;
            let usefulness = parse_cell(&row, positions[base + 1], &header.fields)?;
            check_range(
                &row,
                positions[base + 1],
                &header.fields,
                usefulness,
                USEFULNESS_RANGE,
            )?;
            if score.is_none() || usefulness.is_none() {
                missing_cells += 1;
            }
            *slot = CategoryScore {
                category,
                score: score.unwrap_or(0.0),
                usefulness: usefulness.unwrap_or(0.0),
            };
        }

        reviews.push(LabelledReview {
            text: row.fields[text_col].clone(),
            scores,
        });
    }

    if missing_cells > 0 {
        warn!(
            categories = missing_cells,
            "missing score/usefulness values loaded as 0"
        );
    }
    debug!(reviews = reviews.len(), "parsed labelled table");
    Ok(Dataset::from_reviews(reviews))
}

pub(crate) fn read_header(
    rows: &mut csv::CsvRecords<'_>,
) -> Result<CsvRecord, DatasetError> {
    match rows.next() {
        Some(header) => header,
        None => Err(DatasetError::Parse {
            line: 1,
            msg: "file is empty".to_string(),
        }),
    }
}

pub(crate) fn check_width(row: &CsvRecord, width: usize) -> Result<(), DatasetError> {
    if row.fields.len() != width {
        return Err(DatasetError::Parse {
            line: row.line,
            msg: format!("expected {} fields, found {}", width, row.fields.len()),
        });
    }
    Ok(())
}

/// Parses a numeric cell. Empty and `NaN` cells are missing values.
pub(crate) fn parse_cell(
    row: &CsvRecord,
    col: usize,
    header: &[String],
) -> Result<Option<f64>, DatasetError> {
    let raw = row.fields[col].trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(DatasetError::Parse {
            line: row.line,
            msg: format!("column {}: not a finite number: {raw:?}", header[col].trim()),
        }),
    }
}

fn check_range(
    row: &CsvRecord,
    col: usize,
    header: &[String],
    value: Option<f64>,
    range: RangeInclusive<f64>,
) -> Result<(), DatasetError> {
    match value {
        Some(v) if !range.contains(&v) => Err(DatasetError::Parse {
            line: row.line,
            msg: format!(
                "column {}: {v} is outside [{}, {}]",
                header[col].trim(),
                range.start(),
                range.end()
            ),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
