//! Turns a table of raw per-category answer-token signals into the labelled
//! table consumed by the viewer.

use std::fs;
use std::io::Write;
use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::input::csv::{ColumnSpec, HeaderIndex, records, write_record};
use crate::input::source::read_text;
use crate::input::{DatasetError, TEXT_COLUMN, check_width, parse_cell, read_header};
use crate::model::category::{Category, category_order};
use crate::model::score::{SIGNAL_LEN, SIGNAL_TOKENS, ScoreError, SignalKind, estimate};

#[derive(Debug, Error)]
pub enum LabelError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error("line {line}, {category}: {source}")]
    Score {
        line: usize,
        category: Category,
        #[source]
        source: ScoreError,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub fn signal_columns() -> Vec<ColumnSpec> {
    let mut specs = vec![ColumnSpec::new(TEXT_COLUMN)];
    for &category in category_order() {
        for token in SIGNAL_TOKENS {
            specs.push(ColumnSpec::with_alias(
                category.token_column(token),
                category.legacy_label().map(|l| format!("{l}_{token}")),
            ));
        }
    }
    specs
}

pub fn labelled_header() -> Vec<String> {
    let mut cols = vec![TEXT_COLUMN.to_string()];
    for &category in category_order() {
        cols.push(category.score_column());
        cols.push(category.usefulness_column());
    }
    cols
}

/// Labels every row of `content`, writing the labelled CSV to `out`.
/// Returns the number of reviews written.
pub fn label_table<W: Write>(
    content: &str,
    kind: SignalKind,
    out: &mut W,
) -> Result<usize, LabelError> {
    let mut rows = records(content);
    let header = read_header(&mut rows)?;
    let index = HeaderIndex::new(&header.fields);
    let positions = index.resolve(&signal_columns())?;
    let text_col = positions[0];

    let out_header = labelled_header();
    write_record(out, &out_header.iter().map(String::as_str).collect::<Vec<_>>())?;

    let mut written = 0usize;
    let mut signal = [0.0f64; SIGNAL_LEN];
    for row in rows {
        let row = row?;
        if row.is_blank() {
            continue;
        }
        check_width(&row, index.width())?;

        let mut cells = Vec::with_capacity(out_header.len());
        cells.push(row.fields[text_col].clone());
        for &category in category_order() {
            let base = 1 + category.index() * SIGNAL_LEN;
            for (slot, &col) in signal.iter_mut().zip(&positions[base..base + SIGNAL_LEN]) {
                *slot = parse_cell(&row, col, &header.fields)?.ok_or_else(|| {
                    LabelError::Score {
                        line: row.line,
                        category,
                        source: ScoreError::InvalidInput(format!(
                            "missing value in column {}",
                            header.fields[col].trim()
                        )),
                    }
                })?;
            }
            let est = estimate(&signal, kind).map_err(|source| LabelError::Score {
                line: row.line,
                category,
                source,
            })?;
            cells.push(est.score.to_string());
            cells.push(est.usefulness.to_string());
        }
        write_record(out, &cells.iter().map(String::as_str).collect::<Vec<_>>())?;
        written += 1;
    }

    Ok(written)
}

pub fn label_file(input: &Path, output: &Path, kind: SignalKind) -> Result<usize, LabelError> {
    let content = read_text(input)?;
    // Nothing touches `output` until every row has been labelled.
    let mut labelled = Vec::<u8>::with_capacity(content.len());
    let written = label_table(&content, kind, &mut labelled)?;

    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(output, &labelled)?;
    info!(
        input = %input.display(),
        output = %output.display(),
        reviews = written,
        ?kind,
        "labelled reviews"
    );
    Ok(written)
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/label.rs"]
mod tests;
