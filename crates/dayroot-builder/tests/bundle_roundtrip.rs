//! End-to-end bundle building against a temporary directory:
//! sort order, chunking, manifest faithfulness, proof round trips, and the
//! no-partial-bundle guarantee on validation failure.

use std::fs;
use std::path::Path;

use serde_json::json;

use dayroot_builder::{build_bundle, BuildOptions};
use dayroot_core::merkle::{compute_leaf, verify_proof};
use dayroot_core::model::{Checkpoint, Manifest, ProofIndex, RecordProof, GENESIS_PREV_CHECKPOINT};
use dayroot_core::profile::Profile;
use dayroot_core::record::{canonical_bytes, Record};
use dayroot_core::{hash::sha256_hex, DayrootError};

fn profile() -> Profile {
    Profile::from_json_bytes(
        br#"{
            "profile_id": "domain-onchain-payments",
            "profile_version": "1",
            "required_fields": ["domain", "txid"],
            "canonical_fields": ["domain", "txid", "amount", "memo"],
            "normalizers": {
                "domain": "idna_lower_strip_trailing_dot",
                "txid": "lower_hex",
                "amount": "decimal_string",
                "memo": "trim_ascii_optional"
            },
            "sort_keys": ["domain", "canonical_bytes"]
        }"#,
    )
    .unwrap()
}

fn txid(fill: char) -> String {
    format!("0x{}", fill.to_string().repeat(64))
}

fn record(domain: &str, tx: &str, amount: &str) -> Record {
    let mut r = Record::new();
    r.insert("domain".into(), json!(domain));
    r.insert("txid".into(), json!(tx));
    r.insert("amount".into(), json!(amount));
    r
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn sorts_records_before_emission() {
    let out = tempfile::tempdir().unwrap();
    let records = vec![
        record("b.com", &txid('1'), "2"),
        record("a.com", &txid('2'), "1"),
    ];

    let report = build_bundle(records, &profile(), "2026-01-17", out.path(), &BuildOptions::default())
        .await
        .unwrap();

    assert_eq!(report.records_count, 2);
    let lines = read_lines(&report.bundle_dir.join("records-000.jsonl"));
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("a.com"));
    assert!(lines[1].contains("b.com"));
}

#[tokio::test]
async fn single_record_root_equals_leaf() {
    let out = tempfile::tempdir().unwrap();
    let p = profile();
    let r = record("only.example", &txid('a'), "10");
    let leaf = compute_leaf(&canonical_bytes(&r, &p).unwrap());

    let report = build_bundle(vec![r], &p, "2026-01-17", out.path(), &BuildOptions::default())
        .await
        .unwrap();

    assert_eq!(report.daily_root, leaf);
    let written = fs::read_to_string(report.bundle_dir.join("daily_root.txt")).unwrap();
    assert_eq!(written, format!("{leaf}\n"));
}

#[tokio::test]
async fn proofs_round_trip_and_detect_tampering() {
    let out = tempfile::tempdir().unwrap();
    let p = profile();
    let records: Vec<Record> = (0..100)
        .map(|i| {
            record(
                &format!("host{i:03}.example"),
                &format!("0x{:064x}", i + 1),
                "1",
            )
        })
        .collect();

    let report = build_bundle(records, &p, "2026-01-17", out.path(), &BuildOptions::default())
        .await
        .unwrap();

    let index: ProofIndex = serde_json::from_str(
        &fs::read_to_string(report.bundle_dir.join("proofs/proof_index.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(index.total_records, 100);
    assert_eq!(index.merkle_root, report.daily_root);
    assert_eq!(index.proofs.len(), 100);

    for (i, entry) in index.proofs.iter().enumerate() {
        assert_eq!(entry.record_index, i);
        let proof: RecordProof = serde_json::from_str(
            &fs::read_to_string(report.bundle_dir.join(&entry.proof_file)).unwrap(),
        )
        .unwrap();
        assert_eq!(proof.leaf_index, i);
        assert_eq!(proof.leaf_hash, entry.leaf_hash);
        assert!(verify_proof(&proof.leaf_hash, &proof.proof, &proof.expected_root));

        // Flip one hex digit of one sibling: the proof must die.
        let mut forged = proof.clone();
        let sib = &mut forged.proof[0].sibling_hash;
        let flipped = if sib.starts_with('0') {
            sib.replacen('0', "1", 1)
        } else {
            let first = sib.chars().next().unwrap();
            sib.replacen(first, "0", 1)
        };
        *sib = flipped;
        assert!(!verify_proof(&forged.leaf_hash, &forged.proof, &forged.expected_root));
    }
}

#[tokio::test]
async fn proof_index_leaves_match_recanonicalized_records() {
    let out = tempfile::tempdir().unwrap();
    let p = profile();
    let records: Vec<Record> = (0..7)
        .map(|i| record(&format!("h{i}.example"), &format!("0x{:064x}", i + 1), "3"))
        .collect();

    let report = build_bundle(records, &p, "2026-01-17", out.path(), &BuildOptions::default())
        .await
        .unwrap();

    let index: ProofIndex = serde_json::from_str(
        &fs::read_to_string(report.bundle_dir.join("proofs/proof_index.json")).unwrap(),
    )
    .unwrap();

    let lines = read_lines(&report.bundle_dir.join("records-000.jsonl"));
    assert_eq!(lines.len(), index.total_records);
    for (entry, line) in index.proofs.iter().zip(&lines) {
        let rec: Record = serde_json::from_str(line).unwrap();
        let leaf = compute_leaf(&canonical_bytes(&rec, &p).unwrap());
        assert_eq!(entry.leaf_hash, leaf);
    }
}

#[tokio::test]
async fn chunks_at_ten_thousand_records() {
    let out = tempfile::tempdir().unwrap();
    let p = profile();
    let records: Vec<Record> = (0..20_001)
        .map(|i| {
            record(
                &format!("d{i:05}.example"),
                &format!("0x{:064x}", i + 1),
                "1",
            )
        })
        .collect();

    let report = build_bundle(records, &p, "2026-01-17", out.path(), &BuildOptions::default())
        .await
        .unwrap();

    assert_eq!(report.record_files, 3);
    let c0 = read_lines(&report.bundle_dir.join("records-000.jsonl"));
    let c1 = read_lines(&report.bundle_dir.join("records-001.jsonl"));
    let c2 = read_lines(&report.bundle_dir.join("records-002.jsonl"));
    assert_eq!((c0.len(), c1.len(), c2.len()), (10_000, 10_000, 1));

    // Concatenation preserves sort order across chunk boundaries.
    let all: Vec<String> = c0.into_iter().chain(c1).chain(c2).collect();
    let mut sorted = all.clone();
    sorted.sort();
    assert_eq!(all, sorted);
}

#[tokio::test]
async fn manifest_is_faithful_to_emitted_bytes() {
    let out = tempfile::tempdir().unwrap();
    let records: Vec<Record> = (0..7)
        .map(|i| record(&format!("m{i}.example"), &format!("0x{:064x}", i + 1), "5"))
        .collect();

    let report = build_bundle(records, &profile(), "2026-01-17", out.path(), &BuildOptions::default())
        .await
        .unwrap();

    let manifest: Manifest = serde_json::from_str(
        &fs::read_to_string(report.bundle_dir.join("manifest.json")).unwrap(),
    )
    .unwrap();

    let mut paths: Vec<String> = manifest.files.iter().map(|f| f.path.clone()).collect();
    let mut sorted = paths.clone();
    sorted.sort();
    assert_eq!(paths, sorted);
    paths.sort();
    assert_eq!(
        paths,
        vec![
            "core_spec.json",
            "daily_root.txt",
            "profile.json",
            "records-000.jsonl"
        ]
    );

    for f in &manifest.files {
        let bytes = fs::read(report.bundle_dir.join(&f.path)).unwrap();
        assert_eq!(f.sha256, sha256_hex(&bytes), "digest mismatch for {}", f.path);
        assert_eq!(f.size, bytes.len() as u64, "size mismatch for {}", f.path);
    }

    assert_eq!(manifest.daily_root_sha256, report.daily_root);
    let core_spec_bytes = fs::read(report.bundle_dir.join("core_spec.json")).unwrap();
    assert_eq!(manifest.core_spec_sha256, sha256_hex(&core_spec_bytes));
    let profile_bytes = fs::read(report.bundle_dir.join("profile.json")).unwrap();
    assert_eq!(manifest.profile_sha256, sha256_hex(&profile_bytes));
}

#[tokio::test]
async fn checkpoint_chains_from_previous_day() {
    let out = tempfile::tempdir().unwrap();
    let p = profile();

    let day1 = build_bundle(
        vec![record("a.example", &txid('1'), "1")],
        &p,
        "2026-01-17",
        out.path(),
        &BuildOptions::default(),
    )
    .await
    .unwrap();

    let day1_checkpoint = day1.bundle_dir.join("checkpoint.json");
    let cp1: Checkpoint =
        serde_json::from_str(&fs::read_to_string(&day1_checkpoint).unwrap()).unwrap();
    assert_eq!(cp1.prev_checkpoint_sha256, GENESIS_PREV_CHECKPOINT);
    assert_eq!(cp1.daily_root, day1.daily_root);
    assert_eq!(
        cp1.manifest_sha256,
        sha256_hex(&fs::read(day1.bundle_dir.join("manifest.json")).unwrap())
    );

    let day2 = build_bundle(
        vec![record("b.example", &txid('2'), "2")],
        &p,
        "2026-01-18",
        out.path(),
        &BuildOptions {
            prev_checkpoint: Some(day1_checkpoint.clone()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let cp2: Checkpoint = serde_json::from_str(
        &fs::read_to_string(day2.bundle_dir.join("checkpoint.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(
        cp2.prev_checkpoint_sha256,
        sha256_hex(&fs::read(&day1_checkpoint).unwrap())
    );
}

#[tokio::test]
async fn invalid_format_aborts_with_no_bundle() {
    let out = tempfile::tempdir().unwrap();
    let records = vec![record(" Example.COM ", "0xAB", "1")];

    let err = build_bundle(records, &profile(), "2026-01-17", out.path(), &BuildOptions::default())
        .await
        .unwrap_err();

    match err {
        DayrootError::InvalidFormat { field, value, rule } => {
            assert_eq!(field, "txid");
            assert_eq!(value, "0xAB");
            assert_eq!(rule, "lower_hex");
        }
        other => panic!("expected InvalidFormat, got {other:?}"),
    }
    assert!(!out.path().join("proofs").exists());
}

#[tokio::test]
async fn missing_required_field_aborts_with_no_bundle() {
    let out = tempfile::tempdir().unwrap();
    let mut r = Record::new();
    r.insert("domain".into(), json!("a.example"));
    r.insert("amount".into(), json!("1"));

    let err = build_bundle(
        vec![record("ok.example", &txid('1'), "1"), r],
        &profile(),
        "2026-01-17",
        out.path(),
        &BuildOptions::default(),
    )
    .await
    .unwrap_err();

    match err {
        DayrootError::MissingRequiredField { record_index, field } => {
            assert_eq!(record_index, 1);
            assert_eq!(field, "txid");
        }
        other => panic!("expected MissingRequiredField, got {other:?}"),
    }
    assert!(!out.path().join("proofs").exists());
}

#[tokio::test]
async fn empty_batch_is_empty_leaf_set() {
    let out = tempfile::tempdir().unwrap();
    let err = build_bundle(vec![], &profile(), "2026-01-17", out.path(), &BuildOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, DayrootError::EmptyLeafSet));
    assert!(!out.path().join("proofs").exists());
}

#[tokio::test]
async fn rebuild_from_same_inputs_is_byte_identical() {
    let p = profile();
    let records = || {
        vec![
            record("x.example", &txid('3'), "7"),
            record("y.example", &txid('4'), "8"),
        ]
    };

    let out1 = tempfile::tempdir().unwrap();
    let out2 = tempfile::tempdir().unwrap();
    let r1 = build_bundle(records(), &p, "2026-01-17", out1.path(), &BuildOptions::default())
        .await
        .unwrap();
    let r2 = build_bundle(records(), &p, "2026-01-17", out2.path(), &BuildOptions::default())
        .await
        .unwrap();

    assert_eq!(r1.daily_root, r2.daily_root);
    for name in [
        "records-000.jsonl",
        "daily_root.txt",
        "core_spec.json",
        "profile.json",
        "manifest.json",
        "checkpoint.json",
    ] {
        let b1 = fs::read(r1.bundle_dir.join(name)).unwrap();
        let b2 = fs::read(r2.bundle_dir.join(name)).unwrap();
        assert_eq!(b1, b2, "bundle file differs: {name}");
    }
}

#[tokio::test]
async fn input_permutation_does_not_change_root() {
    let p = profile();
    let records: Vec<Record> = (0..25)
        .map(|i| record(&format!("p{i:02}.example"), &format!("0x{:064x}", i + 1), "1"))
        .collect();
    let mut shuffled = records.clone();
    shuffled.reverse();
    shuffled.swap(0, 7);
    shuffled.swap(3, 19);

    let out1 = tempfile::tempdir().unwrap();
    let out2 = tempfile::tempdir().unwrap();
    let r1 = build_bundle(records, &p, "2026-01-17", out1.path(), &BuildOptions::default())
        .await
        .unwrap();
    let r2 = build_bundle(shuffled, &p, "2026-01-17", out2.path(), &BuildOptions::default())
        .await
        .unwrap();

    assert_eq!(r1.daily_root, r2.daily_root);
    assert_eq!(
        fs::read(r1.bundle_dir.join("records-000.jsonl")).unwrap(),
        fs::read(r2.bundle_dir.join("records-000.jsonl")).unwrap()
    );
}
