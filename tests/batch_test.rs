mod common;

use std::time::Duration;

use common::{ids, live, FakeNavigator};
use icris_automation::models::{DocumentType, Outcome, OutcomeKind, RequestSpec};
use icris_automation::orchestrator::{abandon, BatchDriver};
use icris_automation::report::Report;
use icris_automation::workflow::RetryPolicy;
use icris_automation::PageError;

fn retry() -> RetryPolicy {
    RetryPolicy {
        max_retries: 2,
        delay: Duration::ZERO,
    }
}

fn kinds(records: &[icris_automation::StatusRecord]) -> Vec<OutcomeKind> {
    records.iter().map(|r| r.outcome.kind()).collect()
}

fn site() -> FakeNavigator {
    FakeNavigator::new()
        .with_search("A", vec![live("1", "A")])
        .with_search("B", vec![live("2", "B")])
        .with_search("C", vec![live("3", "C")])
        .with_documents("1", 1)
        .with_documents("2", 1)
        .with_documents("3", 1)
}

#[tokio::test]
async fn one_record_per_identifier_in_input_order() {
    let navigator = site().with_search("Ghost", vec![]);
    let spec = RequestSpec::new(DocumentType::AnnualReturn, 1).unwrap();
    let input = ids(&["C", "Ghost", "A", "B"]);

    let run = BatchDriver::new(&navigator, &spec, retry()).run(&input).await;

    assert_eq!(run.records.len(), input.len());
    let order: Vec<&str> = run.records.iter().map(|r| r.identifier.as_str()).collect();
    assert_eq!(order, vec!["C", "Ghost", "A", "B"]);
    assert_eq!(
        kinds(&run.records),
        vec![
            OutcomeKind::Success,
            OutcomeKind::NotFound,
            OutcomeKind::Success,
            OutcomeKind::Success
        ]
    );
    assert!(!run.session_lost);
}

#[tokio::test]
async fn failure_does_not_stop_the_batch() {
    let navigator = site().fail_add("1", vec![PageError::Cart("rejected".into())]);
    let spec = RequestSpec::new(DocumentType::AnnualReturn, 1).unwrap();

    let run = BatchDriver::new(&navigator, &spec, retry())
        .run(&ids(&["A", "B"]))
        .await;

    assert_eq!(kinds(&run.records), vec![OutcomeKind::Failed, OutcomeKind::Success]);
}

#[tokio::test]
async fn session_loss_before_b_abandons_the_rest() {
    // 第 2 次存活检查（处理 B 之前）时会话丢失
    let navigator = site().lose_session_at(2);
    let spec = RequestSpec::new(DocumentType::AnnualReturn, 1).unwrap();

    let run = BatchDriver::new(&navigator, &spec, retry())
        .run(&ids(&["A", "B", "C"]))
        .await;

    assert!(matches!(run.records[0].outcome, Outcome::Success { .. }));
    assert!(run.records[1].outcome.is_session_lost());
    assert!(run.records[2].outcome.is_session_lost());
    assert!(run.session_lost);
    assert_eq!(navigator.count_calls("search:B"), 0);
    assert_eq!(navigator.count_calls("search:C"), 0);
}

#[tokio::test]
async fn session_loss_during_flow_abandons_the_rest() {
    let navigator = site().fail_search("B", vec![PageError::SessionLost("closed".into())]);
    let spec = RequestSpec::new(DocumentType::AnnualReturn, 1).unwrap();

    let run = BatchDriver::new(&navigator, &spec, retry())
        .run(&ids(&["A", "B", "C"]))
        .await;

    assert_eq!(
        kinds(&run.records),
        vec![OutcomeKind::Success, OutcomeKind::Failed, OutcomeKind::Failed]
    );
    assert!(run.records[2].outcome.is_session_lost());
    assert_eq!(navigator.count_calls("search:C"), 0);
}

#[tokio::test]
async fn company_x_and_unknown_number() {
    let navigator = FakeNavigator::new()
        .with_search("Company X", vec![live("1234567", "COMPANY X LIMITED")])
        .with_documents("1234567", 3);
    let spec = RequestSpec::new(DocumentType::AnnualReturn, 3).unwrap();

    let run = BatchDriver::new(&navigator, &spec, retry())
        .run(&ids(&["Company X", "99999999"]))
        .await;
    let report = Report::build(&run.records);

    let rows: Vec<(&str, OutcomeKind)> = report
        .rows()
        .iter()
        .map(|r| (r.identifier.as_str(), r.outcome))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("Company X", OutcomeKind::Success),
            ("99999999", OutcomeKind::NotFound)
        ]
    );
}

#[tokio::test]
async fn rerun_reproduces_outcome_kinds() {
    let navigator = site().with_search(
        "Alpha",
        vec![live("7", "ALPHA ONE"), live("8", "ALPHA TWO")],
    );
    let spec = RequestSpec::new(DocumentType::AnnualReturn, 1).unwrap();
    let input = ids(&["A", "Alpha", "Nobody"]);
    let driver = BatchDriver::new(&navigator, &spec, retry());

    let first = driver.run(&input).await;
    let second = driver.run(&input).await;

    assert_eq!(kinds(&first.records), kinds(&second.records));
}

#[tokio::test]
async fn abandoned_identifiers_are_session_lost() {
    let records = abandon(&ids(&["X", "Y"]));
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.outcome.is_session_lost()));
}

#[tokio::test]
async fn chunk_offsets_do_not_change_outcomes() {
    let navigator = site();
    let spec = RequestSpec::new(DocumentType::AnnualReturn, 1).unwrap();
    let input = ids(&["A", "B", "C"]);
    let driver = BatchDriver::new(&navigator, &spec, retry());

    let first = driver.run_chunk(&input[..2], 0, 3).await;
    let second = driver.run_chunk(&input[2..], 2, 3).await;

    assert_eq!(first.records.len() + second.records.len(), 3);
    assert_eq!(first.success_count() + second.success_count(), 3);
}

fn six() -> FakeNavigator {
    FakeNavigator::new()
        .with_search("A", vec![live("1", "A")])
        .with_search("B", vec![live("2", "B")])
        .with_search("C", vec![live("3", "C")])
        .with_search("D", vec![live("4", "D")])
        .with_search("E", vec![live("5", "E")])
        .with_search("F", vec![live("6", "F")])
        .with_documents("1", 1)
        .with_documents("2", 1)
        .with_documents("3", 1)
        .with_documents("4", 1)
        .with_documents("5", 1)
        .with_documents("6", 1)
}

#[tokio::test]
async fn session_lost_in_first_chunk_abandons_later_chunks() {
    // 第 2 次存活检查（B 之前）会话丢失
    let navigator = six().lose_session_at(2);
    let spec = RequestSpec::new(DocumentType::AnnualReturn, 1).unwrap();
    let input = ids(&["A", "B", "C", "D", "E", "F"]);

    let run = BatchDriver::new(&navigator, &spec, retry())
        .run_chunks(&input, 2, Some(&navigator))
        .await;

    assert!(run.session_lost);
    assert_eq!(
        kinds(&run.records),
        vec![
            OutcomeKind::Success,
            OutcomeKind::Failed,
            OutcomeKind::Failed,
            OutcomeKind::Failed,
            OutcomeKind::Failed,
            OutcomeKind::Failed,
        ]
    );
    assert!(run.records[1..].iter().all(|r| r.outcome.is_session_lost()));
    assert_eq!(navigator.count_calls("search:"), 1);
    assert_eq!(navigator.count_calls("checkout:"), 0);
}

#[tokio::test]
async fn checkout_runs_only_after_chunks_that_carted() {
    let navigator = six().with_search("B", vec![]).with_search("A", vec![]);
    let spec = RequestSpec::new(DocumentType::AnnualReturn, 1).unwrap();
    let input = ids(&["A", "B", "C", "D", "E", "F"]);

    let run = BatchDriver::new(&navigator, &spec, retry())
        .run_chunks(&input, 2, Some(&navigator))
        .await;

    assert!(!run.session_lost);
    assert_eq!(run.records.len(), 6);
    assert_eq!(run.success_count(), 4);
    assert_eq!(navigator.count_calls("checkout:2"), 2);
    // 第一批没有文件加入购物车，第一次结账发生在 C、D 之后
    let calls = navigator.calls();
    let first_checkout = calls.iter().position(|c| c.starts_with("checkout:")).unwrap();
    let add_d = calls.iter().position(|c| c == "add:4").unwrap();
    assert!(add_d < first_checkout);
}

#[tokio::test]
async fn failed_checkout_keeps_outcomes() {
    let spec = RequestSpec::new(DocumentType::AnnualReturn, 1).unwrap();
    let input = ids(&["A", "B", "C"]);

    let plain = six();
    let without = BatchDriver::new(&plain, &spec, retry())
        .run_chunks(&input, 2, None)
        .await;

    let failing = six().fail_checkout();
    let with = BatchDriver::new(&failing, &spec, retry())
        .run_chunks(&input, 2, Some(&failing))
        .await;

    assert_eq!(kinds(&with.records), kinds(&without.records));
    assert_eq!(failing.count_calls("checkout:"), 2);
    assert_eq!(plain.count_calls("checkout:"), 0);
}
