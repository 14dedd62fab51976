//! Integration tests for reconciliation-core

use bigdecimal::BigDecimal;
use reconciliation_core::{
    compute_match_score, find_attachment, find_transaction, is_confident, normalize_reference,
    utils::{load_attachments_file, load_transactions_file, StrictRecordValidator},
    Attachment, CriterionOutcome, Degradation, DefaultRecordValidator, MatchBasis, MatchConfig,
    MatchState, ReconError, ReconciliationSummary, Reconciler, Scorer, Transaction,
};
use std::collections::HashSet;
use std::path::PathBuf;
use std::str::FromStr;

fn dec(value: &str) -> BigDecimal {
    BigDecimal::from_str(value).unwrap()
}

fn data_path(file: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("demos/data")
        .join(file)
}

fn jane_transaction() -> Transaction {
    Transaction::new("tx-1", dec("100.00"))
        .with_contact("Jane Doe")
        .with_date("2024-01-10")
        .with_reference("")
}

fn jane_invoice(amount: &str, invoice_date: &str) -> Attachment {
    Attachment::new("att-1")
        .with_kind("invoice")
        .with_field("total_amount", amount)
        .with_field("supplier", "Jane Doe Consulting")
        .with_field("invoice_date", invoice_date)
}

#[test]
fn test_sample_data_reconciliation() {
    let transactions =
        load_transactions_file(data_path("transactions.json"), &DefaultRecordValidator).unwrap();
    let attachments =
        load_attachments_file(data_path("attachments.json"), &DefaultRecordValidator).unwrap();
    let config = MatchConfig::from_toml_file(data_path("match.toml")).unwrap();

    let reconciler = Reconciler::new(config).unwrap();
    let report = reconciler.reconcile(&transactions, &attachments);

    let pairs: Vec<(&str, &str, MatchBasis)> = report
        .matches
        .iter()
        .map(|m| (m.transaction_id.as_str(), m.attachment_id.as_str(), m.basis))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("1", "101", MatchBasis::Exact),
            ("2", "102", MatchBasis::Heuristic { score: 6 }),
            ("3", "103", MatchBasis::Heuristic { score: 5 }),
            ("5", "105", MatchBasis::Exact),
        ]
    );
    assert_eq!(report.unmatched_transactions, vec!["4".to_string()]);
    assert_eq!(
        report.unmatched_attachments,
        vec!["104".to_string(), "106".to_string()]
    );

    let summary = ReconciliationSummary::from_report(
        &report,
        &transactions,
        &attachments,
        reconciler.config(),
    );
    assert_eq!(summary.matched.len(), 4);
    assert_eq!(summary.unmatched_transactions[0].contact.as_deref(), Some("Parking Service"));
    assert_eq!(
        summary.unmatched_attachments[1].counterparty.as_deref(),
        Some("Office Supplies AB")
    );
}

#[test]
fn test_both_directions_agree_on_sample_data() {
    let transactions =
        load_transactions_file(data_path("transactions.json"), &DefaultRecordValidator).unwrap();
    let attachments =
        load_attachments_file(data_path("attachments.json"), &DefaultRecordValidator).unwrap();
    let reconciler = Reconciler::default();

    let forward = reconciler.reconcile(&transactions, &attachments);
    let backward = reconciler.reconcile_by_attachment(&transactions, &attachments);

    let mut forward_pairs: Vec<_> = forward
        .matches
        .iter()
        .map(|m| (m.transaction_id.clone(), m.attachment_id.clone()))
        .collect();
    let mut backward_pairs: Vec<_> = backward
        .matches
        .iter()
        .map(|m| (m.transaction_id.clone(), m.attachment_id.clone()))
        .collect();
    forward_pairs.sort();
    backward_pairs.sort();

    assert_eq!(forward_pairs, backward_pairs);
    assert_eq!(forward.unmatched_transactions, backward.unmatched_transactions);
    assert_eq!(forward.unmatched_attachments, backward.unmatched_attachments);
}

#[test]
fn test_strict_validator_rejects_sample_attachment_without_amount() {
    let json = r#"[{"id": 7, "type": "receipt", "data": {"issuer": "Kiosk"}}]"#;
    let result =
        reconciliation_core::utils::load_attachments_str(json, &StrictRecordValidator::default());
    assert!(matches!(result, Err(ReconError::InvalidRecord(_))));
}

#[test]
fn test_reference_normalization_examples() {
    assert_eq!(normalize_reference("RF 0001234"), "1234");
    assert_eq!(normalize_reference("rf00045"), "45");

    for raw in ["RF 0001234", "rf00045", " 0 0 RF 9", "", "RFrf000"] {
        let once = normalize_reference(raw);
        assert_eq!(normalize_reference(&once), once);
    }
}

#[test]
fn test_documented_scores() {
    let tx = jane_transaction();

    let full = compute_match_score(&tx, &jane_invoice("100.00", "2024-01-12"));
    assert_eq!(full, 6);
    assert!(is_confident(full));

    let late = compute_match_score(&tx, &jane_invoice("100.00", "2024-02-01"));
    assert_eq!(late, 5);
    assert!(is_confident(late));

    let wrong_amount = compute_match_score(&tx, &jane_invoice("99.99", "2024-01-12"));
    assert_eq!(wrong_amount, 3);
    assert!(!is_confident(wrong_amount));
    assert!(find_attachment(&tx, &[jane_invoice("99.99", "2024-01-12")], &HashSet::new()).is_none());
}

#[test]
fn test_score_symmetric_when_roles_swap() {
    let tx = Transaction::new("t", dec("75.00"))
        .with_contact("Acme")
        .with_date("2024-06-01");
    let att = Attachment::new("a")
        .with_field("total_amount", "75")
        .with_field("supplier", "Acme Trading")
        .with_field("due_date", "2024-06-05");

    let swapped_tx = Transaction::new("t", dec("75"))
        .with_contact("Acme Trading")
        .with_date("2024-06-05");
    let swapped_att = Attachment::new("a")
        .with_field("total_amount", "75.00")
        .with_field("supplier", "Acme")
        .with_field("due_date", "2024-06-01");

    assert_eq!(
        compute_match_score(&tx, &att),
        compute_match_score(&swapped_tx, &swapped_att)
    );
}

#[test]
fn test_exact_reference_wins_with_zero_score() {
    let tx = Transaction::new("t1", dec("-5.00"))
        .with_contact("Someone")
        .with_date("2020-01-01")
        .with_reference("RF 0000 31337");
    let strong = jane_invoice("5.00", "2020-01-01").with_field("supplier", "Someone");
    let weak = Attachment::new("att-2").with_field("reference", "31337");

    assert_eq!(compute_match_score(&tx, &weak), 0);

    let attachments = vec![strong, weak];
    let found = find_attachment(&tx, &attachments, &HashSet::new()).unwrap();
    assert_eq!(found.id, "att-2");
}

#[test]
fn test_used_ids_exclude_best_candidate() {
    let transactions = vec![jane_transaction()];
    let attachments = vec![
        jane_invoice("100.00", "2024-01-12"),
        Attachment::new("att-2")
            .with_field("total_amount", 100)
            .with_field("issuer", "Jane Doe")
            .with_field("due_date", "2024-03-01"),
    ];

    let mut state = MatchState::new();
    let first = find_attachment(&transactions[0], &attachments, state.used_attachment_ids()).unwrap();
    assert_eq!(first.id, "att-1");
    assert!(state.claim(&transactions[0].id, &first.id));

    let second = find_attachment(&transactions[0], &attachments, state.used_attachment_ids()).unwrap();
    assert_eq!(second.id, "att-2");

    let back = find_transaction(&attachments[0], &transactions, state.used_transaction_ids());
    assert!(back.is_none());
}

#[test]
fn test_empty_references_never_pair_exactly() {
    let transactions = vec![Transaction::new("t1", dec("1")).with_reference("   ")];
    let attachments = vec![
        Attachment::new("a1").with_field("reference", ""),
        Attachment::new("a2").with_field("reference", "RF000"),
    ];

    let report = Reconciler::default().reconcile(&transactions, &attachments);
    assert!(report.matches.is_empty());
    assert_eq!(report.unmatched_transactions, vec!["t1".to_string()]);
    assert_eq!(report.unmatched_attachments.len(), 2);
}

#[test]
fn test_malformed_input_degrades_without_failing() {
    let transactions = vec![Transaction::new("t1", dec("-30.00"))
        .with_contact("Book Store")
        .with_date("31/12/2023")];
    let attachments = vec![Attachment::new("a1")
        .with_field("total_amount", "thirty")
        .with_field("issuer", "Book Store Ltd")
        .with_field("due_date", "end of month")];

    assert_eq!(compute_match_score(&transactions[0], &attachments[0]), 2);

    let report = Reconciler::default().reconcile(&transactions, &attachments);
    assert!(report.matches.is_empty());
    assert_eq!(report.unmatched_transactions, vec!["t1".to_string()]);
}

#[test]
fn test_custom_config_enables_additional_date_format() {
    let config = MatchConfig::from_toml_str(r#"date_formats = ["%d.%m.%Y"]"#).unwrap();
    let transactions = vec![Transaction::new("t1", dec("-30.00"))
        .with_contact("Book Store")
        .with_date("02.01.2024")];
    let attachments = vec![Attachment::new("a1")
        .with_field("total_amount", "31.00")
        .with_field("issuer", "Book Store Ltd")
        .with_field("due_date", "01.01.2024")];

    let default_report = Reconciler::default().reconcile(&transactions, &attachments);
    assert!(default_report.matches.is_empty());
    assert_eq!(
        Scorer::default().breakdown(&transactions[0], &attachments[0]).date,
        CriterionOutcome::Unavailable(Degradation::MalformedDate)
    );

    // dates now parse and fall inside the window, but 30.00 vs 31.00 keeps it below 4
    let breakdown = Scorer::new(&config).breakdown(&transactions[0], &attachments[0]);
    assert_eq!(breakdown.date, CriterionOutcome::Matched);
    assert_eq!(breakdown.total, 3);
    let report = Reconciler::new(config)
        .unwrap()
        .reconcile(&transactions, &attachments);
    assert!(report.matches.is_empty());

    let lenient = MatchConfig {
        confidence_threshold: 3,
        date_formats: vec!["%d.%m.%Y".to_string()],
        ..MatchConfig::default()
    };
    let report = Reconciler::new(lenient)
        .unwrap()
        .reconcile(&transactions, &attachments);
    assert_eq!(report.matches.len(), 1);
    assert_eq!(report.matches[0].basis, MatchBasis::Heuristic { score: 3 });
}

#[test]
fn test_unbounded_amount_does_not_stall_a_run() {
    let transactions = vec![jane_transaction()];
    let attachments = vec![
        Attachment::new("att-huge")
            .with_field("total_amount", "1e999999999")
            .with_field("supplier", "Jane Doe Consulting")
            .with_field("invoice_date", "2024-01-12"),
        jane_invoice("100.00", "2024-01-12"),
    ];
    assert_eq!(compute_match_score(&transactions[0], &attachments[0]), 3);

    let report = Reconciler::default().reconcile(&transactions, &attachments);
    assert_eq!(report.attachment_for("tx-1").map(String::as_str), Some("att-1"));
    assert_eq!(report.matches[0].basis, MatchBasis::Heuristic { score: 6 });

    let json = r#"[{"id": 1, "amount": "1e999999999"}]"#;
    let result = reconciliation_core::utils::load_transactions_str(json, &DefaultRecordValidator);
    assert!(matches!(result, Err(ReconError::Json(_))));
}

#[test]
fn test_numeric_references_pair_exactly() {
    let transactions = reconciliation_core::utils::load_transactions_str(
        r#"[{"id": "t1", "amount": -12.5, "reference": 4711}]"#,
        &DefaultRecordValidator,
    )
    .unwrap();
    let attachments = reconciliation_core::utils::load_attachments_str(
        r#"[{"id": "a1", "data": {"total_amount": 99}}, {"id": "a2", "data": {"reference": 4711}}]"#,
        &DefaultRecordValidator,
    )
    .unwrap();

    let report = Reconciler::default().reconcile(&transactions, &attachments);
    assert_eq!(report.attachment_for("t1").map(String::as_str), Some("a2"));
    assert_eq!(report.matches[0].basis, MatchBasis::Exact);
}
