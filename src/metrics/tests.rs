use std::sync::Arc;
use std::time::Duration;

use super::*;

#[test]
fn record_counts_success_and_failure() -> Result<(), String> {
    let accumulator = MetricsAccumulator::new();
    accumulator.record(RequestOutcome::success(200, Duration::from_millis(10)));
    accumulator.record(RequestOutcome::success(404, Duration::from_millis(30)));
    accumulator.record(RequestOutcome::failure(
        "connection refused",
        Duration::from_millis(5),
    ));

    let snapshot = accumulator.snapshot();
    if snapshot.success_count != 2 || snapshot.failure_count != 1 {
        return Err(format!("unexpected counts: {:?}", snapshot));
    }
    if snapshot.latencies != vec![Duration::from_millis(10), Duration::from_millis(30)] {
        return Err(format!("unexpected latencies: {:?}", snapshot.latencies));
    }
    if snapshot.status_histogram.get(&200) != Some(&1)
        || snapshot.status_histogram.get(&404) != Some(&1)
        || snapshot.status_histogram.len() != 2
    {
        return Err(format!(
            "unexpected histogram: {:?}",
            snapshot.status_histogram
        ));
    }
    Ok(())
}

#[test]
fn failed_outcomes_do_not_touch_latencies_or_histogram() -> Result<(), String> {
    let accumulator = MetricsAccumulator::new();
    accumulator.record(RequestOutcome::failure("timeout", Duration::from_secs(10)));

    let snapshot = accumulator.snapshot();
    if !snapshot.latencies.is_empty() || !snapshot.status_histogram.is_empty() {
        return Err(format!("failure leaked into success data: {:?}", snapshot));
    }
    if snapshot.completed() != 1 {
        return Err("Expected one completed outcome".to_owned());
    }
    Ok(())
}

#[test]
fn snapshot_is_detached_from_later_records() -> Result<(), String> {
    let accumulator = MetricsAccumulator::new();
    accumulator.record(RequestOutcome::success(200, Duration::from_millis(1)));
    let before = accumulator.snapshot();
    accumulator.record(RequestOutcome::success(200, Duration::from_millis(1)));

    if before.success_count != 1 || accumulator.snapshot().success_count != 2 {
        return Err("Snapshot changed after a later record".to_owned());
    }
    Ok(())
}

#[test]
fn failure_message_is_never_empty() -> Result<(), String> {
    let outcome = RequestOutcome::failure("", Duration::ZERO);
    match outcome.error_message.as_deref() {
        Some(message) if !message.is_empty() => Ok(()),
        other => Err(format!("unexpected message: {:?}", other)),
    }
}

#[test]
fn concurrent_records_are_all_counted() -> Result<(), String> {
    const WRITERS: u64 = 8;
    const PER_WRITER: u64 = 250;

    let accumulator = Arc::new(MetricsAccumulator::new());
    let handles: Vec<_> = (0..WRITERS)
        .map(|writer| {
            let accumulator = Arc::clone(&accumulator);
            std::thread::spawn(move || {
                for _ in 0..PER_WRITER {
                    if writer % 2 == 0 {
                        accumulator.record(RequestOutcome::success(200, Duration::from_millis(1)));
                    } else {
                        accumulator.record(RequestOutcome::failure("boom", Duration::ZERO));
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle
            .join()
            .map_err(|_panic| "writer thread panicked".to_owned())?;
    }

    let snapshot = accumulator.snapshot();
    let half = WRITERS / 2 * PER_WRITER;
    if snapshot.success_count != half || snapshot.failure_count != half {
        return Err(format!("unexpected counts: {:?}", snapshot.completed()));
    }
    if snapshot.completed() != WRITERS * PER_WRITER {
        return Err("completed count disagrees with the number of records".to_owned());
    }
    if u64::try_from(snapshot.latencies.len()).ok() != Some(half) {
        return Err("latency count mismatch".to_owned());
    }
    Ok(())
}
