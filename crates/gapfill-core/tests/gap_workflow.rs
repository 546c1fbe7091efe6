//! End-to-end: gap an ad, fill it as two models would, score, compare and
//! write every report artifact.

use std::collections::BTreeMap;

use gapfill_core::{
    build_inputs, compare_models, create_gaps, exact_match_rate, fill_gaps, find_gaps,
    read_run_report_json, write_comparison_md, write_evaluations_csv, write_run_report_json,
    GapfillConfig, ModelRun, RunReport, RunSpan,
};

const AD: &str = "Sprzedam zadbany samochód osobowy z silnikiem benzynowym, kolor czerwony, \
                  skrzynia manualna, klimatyzacja, rok 2018, przebieg 98000 km";

fn garbage_fills(removed: &BTreeMap<u32, String>) -> BTreeMap<u32, String> {
    removed.keys().map(|i| (*i, "123".to_string())).collect()
}

#[test]
fn gapped_ad_round_trips_through_fill() {
    let gapped = create_gaps(AD, 30.0, 7).expect("create gaps");
    assert!(gapped.gaps_created > 0);
    assert_eq!(gapped.removed.len(), gapped.gaps_created);

    let slots = find_gaps(&gapped.text_with_gaps, 5);
    let indices: Vec<u32> = slots.iter().map(|s| s.gap_index).collect();
    let expected: Vec<u32> = (1..=gapped.gaps_created as u32).collect();
    assert_eq!(indices, expected);

    let restored = fill_gaps(&gapped.text_with_gaps, &gapped.removed);
    let normalized: Vec<&str> = AD.split_whitespace().collect();
    assert_eq!(restored, normalized.join(" "));
    assert_eq!(exact_match_rate(&gapped.removed, &gapped.removed), 1.0);
}

#[test]
fn same_seed_same_gaps() {
    let a = create_gaps(AD, 50.0, 42).expect("create gaps");
    let b = create_gaps(AD, 50.0, 42).expect("create gaps");
    assert_eq!(a, b);
}

#[tokio::test]
async fn reference_fills_beat_garbage_fills() {
    let config = GapfillConfig::default();
    let scorer = config.scorer();
    let gapped = create_gaps(AD, 40.0, 3).expect("create gaps");

    let reference_inputs = build_inputs(
        &gapped.text_with_gaps,
        &gapped.removed,
        config.context_window,
    );
    assert_eq!(reference_inputs.len(), gapped.gaps_created);

    let garbage = garbage_fills(&gapped.removed);
    let garbage_inputs = build_inputs(&gapped.text_with_gaps, &garbage, config.context_window);
    assert_eq!(exact_match_rate(&gapped.removed, &garbage), 0.0);

    let reference = {
        let _span = RunSpan::enter("reference");
        scorer
            .evaluate_all_parallel(reference_inputs.clone(), config.parallel_chunk_size)
            .await
            .expect("parallel evaluation")
    };
    let junk = {
        let _span = RunSpan::enter("junk");
        scorer.evaluate_all(&garbage_inputs)
    };

    let comparison = compare_models(&[
        ModelRun::new("junk", junk.clone()),
        ModelRun::new("reference", reference.clone()),
    ]);
    assert_eq!(comparison.winner.as_deref(), Some("reference"));
    assert!(comparison.margin > 0.0);

    let dir = tempfile::tempdir().expect("temp dir");
    let report = RunReport::new("reference", &reference_inputs, reference).expect("report");
    let json_path = dir.path().join("reference.json");
    write_run_report_json(&json_path, &report).expect("write json");
    write_evaluations_csv(
        &dir.path().join("reference.csv"),
        "reference",
        &report.aggregate,
    )
    .expect("write csv");
    write_comparison_md(&dir.path().join("comparison.md"), &comparison)
        .expect("write md");

    let loaded = read_run_report_json(&json_path).expect("read json");
    assert_eq!(loaded.model, "reference");
    assert_eq!(loaded.aggregate.total_gaps, gapped.gaps_created);

    let md = std::fs::read_to_string(dir.path().join("comparison.md"))
        .expect("read md");
    assert!(md.contains("- winner: `reference`"));
}

#[test]
fn preposition_is_picked_up_from_marker_neighbour() {
    let slots = find_gaps("Auto z [GAP:1] silnikiem", 2);
    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0].preposition, "z");
    assert_eq!(slots[0].context, "Auto z silnikiem");
}

#[test]
fn unfilled_markers_are_skipped() {
    let fills: BTreeMap<u32, String> = [(2, "czerwony".to_string())].into_iter().collect();
    let inputs = build_inputs("[GAP:1] i [GAP:2]", &fills, 5);
    assert_eq!(inputs.len(), 1);
    assert_eq!(inputs[0].gap_index, 2);
    assert_eq!(fill_gaps("[GAP:1] i [GAP:2]", &fills), "[GAP:1] i czerwony");
}
