use std::io::Cursor;
use std::path::{Path, PathBuf};

use super::*;
use crate::cli::{MAX_SHOW_COUNT, MaskArgs};
use crate::model::category::category_order;

fn write_dataset(dir: &Path, rows: &[(&str, f64, f64)]) -> PathBuf {
    let mut cols = vec!["text".to_string()];
    for c in category_order() {
        cols.push(c.score_column());
        cols.push(c.usefulness_column());
    }
    let mut content = cols.join(",");
    content.push('\n');
    for (text, score, usefulness) in rows {
        let mut cells = vec![format!("\"{text}\"")];
        for _ in category_order() {
            cells.push(score.to_string());
            cells.push(usefulness.to_string());
        }
        content.push_str(&cells.join(","));
        content.push('\n');
    }
    let path = dir.join("labelled.csv");
    std::fs::write(&path, content).unwrap();
    path
}

fn show_args(data: PathBuf, count: u32, format: OutputFormat) -> ShowArgs {
    ShowArgs {
        data,
        mask: MaskArgs { threshold: 0.1 },
        seed: Some(11),
        count,
        format,
    }
}

#[test]
fn test_show_text_single_review() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_dataset(dir.path(), &[("Crispy, hot fries", 4.0, 0.8)]);
    let mut out = Vec::new();
    run_show(&show_args(data, 1, OutputFormat::Text), &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("Review:\n  Crispy, hot fries\n"));
    assert_eq!(text.matches("4.000").count(), 7);
}

#[test]
fn test_show_json_multiple_reviews() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_dataset(dir.path(), &[("a", 2.0, 0.05), ("b", 3.0, 0.5)]);
    let mut out = Vec::new();
    run_show(&show_args(data, 3, OutputFormat::Json), &mut out).unwrap();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    let payloads = v.as_array().unwrap();
    assert_eq!(payloads.len(), 3);
    for p in payloads {
        let expected = if p["text"] == "a" { 0.0 } else { 3.0 };
        assert_eq!(p["bars"].as_array().unwrap().len(), 7);
        assert_eq!(p["bars"][0]["score"], expected);
    }
}

/// Accepts `limit` bytes, then fails every write.
struct LimitedWriter {
    written: Vec<u8>,
    limit: usize,
}

impl Write for LimitedWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if self.written.len() + buf.len() > self.limit {
            return Err(std::io::Error::other("output closed"));
        }
        self.written.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_show_max_count_streams_json() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_dataset(dir.path(), &[("repeat", 3.0, 0.5)]);
    let mut out = Vec::new();
    run_show(&show_args(data, MAX_SHOW_COUNT, OutputFormat::Json), &mut out).unwrap();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(v.as_array().map(|a| a.len()), Some(MAX_SHOW_COUNT as usize));
}

#[test]
fn test_show_writes_each_review_before_the_next() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_dataset(dir.path(), &[("first", 3.0, 0.5)]);
    let mut out = LimitedWriter {
        written: Vec::new(),
        limit: 1024,
    };
    let err = run_show(&show_args(data, MAX_SHOW_COUNT, OutputFormat::Text), &mut out)
        .unwrap_err();
    assert!(matches!(err, AppError::Io(_)));
    let text = String::from_utf8(out.written).unwrap();
    assert!(text.starts_with("Review:\n  first\n"));
}

#[test]
fn test_show_empty_dataset_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_dataset(dir.path(), &[]);
    let err = run_show(&show_args(data, 1, OutputFormat::Text), &mut Vec::<u8>::new()).unwrap_err();
    assert!(matches!(err, AppError::Sample(SampleError::EmptyDataset)));
}

#[test]
fn test_show_rejects_bad_threshold() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_dataset(dir.path(), &[("a", 2.0, 0.5)]);
    let mut args = show_args(data, 1, OutputFormat::Text);
    args.mask.threshold = 2.0;
    assert!(matches!(
        run_show(&args, &mut Vec::<u8>::new()),
        Err(AppError::Score(ScoreError::InvalidInput(_)))
    ));
}

#[test]
fn test_browse_refreshes_until_quit() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_dataset(dir.path(), &[("only one", 5.0, 1.0)]);
    let args = BrowseArgs {
        data,
        mask: MaskArgs { threshold: 0.1 },
        seed: None,
    };
    let mut out = Vec::new();
    run_browse(&args, Cursor::new("\n\nq\n\n"), &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.matches("Review:").count(), 3);
}

#[test]
fn test_score_text_and_json() {
    let mut out = Vec::new();
    let args = ScoreArgs {
        values: vec![7.0, 8.0, 10.0, 12.0, 9.0, 3.0],
        probabilities: false,
        format: OutputFormat::Text,
    };
    run_score(&args, &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "score: 3.882\nusefulness: 1.000\n");

    let mut out = Vec::<u8>::new();
    let args = ScoreArgs {
        values: vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        probabilities: true,
        format: OutputFormat::Json,
    };
    assert!(matches!(
        run_score(&args, &mut out),
        Err(AppError::Score(ScoreError::InvalidInput(_)))
    ));
}

#[test]
fn test_label_then_stats() {
    let dir = tempfile::tempdir().unwrap();
    let mut cols = vec!["text".to_string()];
    let mut cells = vec!["fine".to_string()];
    for c in category_order() {
        for token in crate::model::score::SIGNAL_TOKENS {
            cols.push(c.token_column(token));
            cells.push(if token == "4" { "10" } else { "0" }.to_string());
        }
    }
    let input = dir.path().join("signals.csv");
    std::fs::write(&input, format!("{}\n{}\n", cols.join(","), cells.join(","))).unwrap();
    let labelled = dir.path().join("labelled.csv");

    let mut out = Vec::new();
    run_label(
        &LabelArgs {
            input,
            out: labelled.clone(),
            probabilities: false,
        },
        &mut out,
    )
    .unwrap();
    assert!(String::from_utf8(out).unwrap().starts_with("labelled 1 reviews"));

    let mut out = Vec::new();
    run_stats(
        &StatsArgs {
            data: labelled,
            mask: MaskArgs { threshold: 0.1 },
            format: OutputFormat::Json,
        },
        &mut out,
    )
    .unwrap();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(v["reviews"], 1);
    assert_eq!(v["categories"][6]["category"], "SPEED");
    assert_eq!(v["categories"][6]["retained"], 1);
}
