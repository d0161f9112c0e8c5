use super::*;
use crate::input::parse_dataset;
use crate::model::score::estimate_from_logits;

const REFERENCE: [f64; SIGNAL_LEN] = [7.0, 8.0, 10.0, 12.0, 9.0, 3.0];

fn signal_table(text: &str, values: [f64; SIGNAL_LEN]) -> String {
    let header = signal_columns()
        .into_iter()
        .map(|s| s.name)
        .collect::<Vec<_>>()
        .join(",");
    let mut cells = vec![text.to_string()];
    for _ in category_order() {
        cells.extend(values.iter().map(|v| v.to_string()));
    }
    format!("{header}\n{}\n", cells.join(","))
}

#[test]
fn test_label_then_load_round_trip() {
    let table = signal_table("\"Tender steak, rude waiter\"", REFERENCE);
    let mut out = Vec::new();
    assert_eq!(label_table(&table, SignalKind::Logits, &mut out).unwrap(), 1);

    let labelled = String::from_utf8(out).unwrap();
    let ds = parse_dataset(&labelled).unwrap();
    let review = ds.get(0).unwrap();
    assert_eq!(review.text, "Tender steak, rude waiter");

    let expected = estimate_from_logits(&REFERENCE).unwrap();
    for slot in &review.scores {
        assert_eq!(slot.score, expected.score);
        assert_eq!(slot.usefulness, expected.usefulness);
    }
}

#[test]
fn test_label_probabilities() {
    let table = signal_table("ok", [0.0, 0.0, 0.5, 0.5, 0.0, 1.0]);
    let mut out = Vec::new();
    label_table(&table, SignalKind::Probabilities, &mut out).unwrap();
    let ds = parse_dataset(&String::from_utf8(out).unwrap()).unwrap();
    let food = ds.get(0).unwrap().score(Category::Food);
    assert_eq!(food.score, 3.5);
    assert_eq!(food.usefulness, 0.5);
}

#[test]
fn test_label_output_header_order() {
    let header = labelled_header();
    assert_eq!(header[0], "text");
    assert_eq!(header[1], "FOOD_score");
    assert_eq!(header[2], "FOOD_usefulness");
    assert_eq!(header[14], "SPEED_usefulness");
}

#[test]
fn test_label_missing_columns() {
    let err = label_table("text,FOOD_1\nhi,1\n", SignalKind::Logits, &mut Vec::<u8>::new())
        .unwrap_err();
    match err {
        LabelError::Dataset(DatasetError::Schema(missing)) => {
            assert!(missing.contains(&"FOOD_NOT".to_string()));
            assert!(!missing.contains(&"FOOD_1".to_string()));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_label_reports_row_and_category() {
    let table = signal_table("bad", [0.0, -1.0, 0.0, 0.0, 0.0, 0.0]);
    let err = label_table(&table, SignalKind::Probabilities, &mut Vec::<u8>::new()).unwrap_err();
    match err {
        LabelError::Score { line, category, .. } => {
            assert_eq!(line, 2);
            assert_eq!(category, Category::Food);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_label_missing_value_is_invalid() {
    let table = signal_table("gap", REFERENCE).replacen(",7,", ",,", 1);
    let err = label_table(&table, SignalKind::Logits, &mut Vec::<u8>::new()).unwrap_err();
    assert!(matches!(
        err,
        LabelError::Score {
            source: ScoreError::InvalidInput(_),
            ..
        }
    ));
}

#[test]
fn test_label_file_writes_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("signals.csv");
    let output = dir.path().join("out/labelled.csv");
    std::fs::write(&input, signal_table("fine", REFERENCE)).unwrap();

    assert_eq!(label_file(&input, &output, SignalKind::Logits).unwrap(), 1);
    let written = std::fs::read_to_string(&output).unwrap();
    assert!(written.starts_with("text,FOOD_score,FOOD_usefulness"));
}

#[test]
fn test_label_file_failure_keeps_previous_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("signals.csv");
    let good = signal_table("ok", REFERENCE);
    let bad_row = good.lines().nth(1).unwrap().replacen(",7,", ",x,", 1);
    std::fs::write(&input, format!("{good}{bad_row}\n")).unwrap();

    let existing = dir.path().join("labelled.csv");
    std::fs::write(&existing, "previous\n").unwrap();
    let err = label_file(&input, &existing, SignalKind::Logits).unwrap_err();
    assert!(matches!(
        err,
        LabelError::Dataset(DatasetError::Parse { line: 3, .. })
    ));
    assert_eq!(std::fs::read_to_string(&existing).unwrap(), "previous\n");

    let fresh = dir.path().join("fresh.csv");
    assert!(label_file(&input, &fresh, SignalKind::Logits).is_err());
    assert!(!fresh.exists());
}
