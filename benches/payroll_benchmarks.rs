//! Performance benchmarks for the payroll engine.
//!
//! Covers punch extraction from a month-long multi-employee report, report
//! computation over a session, and the summary endpoint end to end.
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use payroll_engine::api::{AppState, create_router};
use payroll_engine::config::{ConfigLoader, PayrollPolicy};
use payroll_engine::extraction::{ExtractionStrategy, extract};
use payroll_engine::models::{Cell, Table};
use payroll_engine::session::Session;

use axum::{body::Body, http::Request};
use tower::ServiceExt;

fn create_test_state() -> AppState {
    let config = ConfigLoader::load("./config/standard").expect("Failed to load config");
    AppState::new(config)
}

fn text(s: impl Into<String>) -> Cell {
    Cell::Text(s.into())
}

/// A report with one titled block per employee and one punch per day of
/// January, including a night shift every Friday.
fn create_report(employee_count: usize) -> Table {
    let mut table = Table::new();
    for e in 0..employee_count {
        table.push(vec![text(format!(
            "Report of work hours for Employee {e:03} between 01/01/2024 and 31/01/2024"
        ))]);
        table.push(vec![text("Date"), text("Time in"), text("Time out")]);
        for day in 1..=31u32 {
            let (time_in, time_out) = if day % 7 == 5 {
                (
                    format!("{day:02}/01/2024 22:00"),
                    format!("{:02}/01/2024 07:30", (day % 31) + 1),
                )
            } else {
                (
                    format!("{day:02}/01/2024 07:00"),
                    format!("{day:02}/01/2024 18:15"),
                )
            };
            table.push(vec![text(format!("{day:02}/01")), text(time_in), text(time_out)]);
        }
        table.push(vec![text("Total hours"), text("")]);
        table.push(Vec::new());
    }
    table
}

fn create_session(employee_count: usize, policy: &PayrollPolicy) -> Session {
    let mut session = Session::new();
    session
        .import_table(&create_report(employee_count), &policy.labels, ExtractionStrategy::Primary)
        .expect("Failed to import report");
    session
}

/// Benchmark: Extraction over reports of growing size.
fn bench_extraction(c: &mut Criterion) {
    let policy = PayrollPolicy::default();
    let mut group = c.benchmark_group("extraction");

    for employee_count in [1, 10, 50].iter() {
        let table = create_report(*employee_count);
        group.throughput(Throughput::Elements(table.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("employees", employee_count),
            &table,
            |b, table| {
                b.iter(|| {
                    black_box(extract(table, &policy.labels, ExtractionStrategy::Primary))
                })
            },
        );
    }

    group.finish();
}

/// Benchmark: Summary and daily export computed from a session.
fn bench_reports(c: &mut Criterion) {
    let policy = PayrollPolicy::default();
    let session = create_session(50, &policy);

    let mut group = c.benchmark_group("reports");
    group.throughput(Throughput::Elements(session.punches().len() as u64));

    group.bench_function("summary_50_employees", |b| {
        b.iter(|| black_box(session.summary_with_totals(&policy)))
    });
    group.bench_function("daily_export_50_employees", |b| {
        b.iter(|| black_box(session.export_daily(session.employee_filter(), &policy)))
    });

    group.finish();
}

/// Benchmark: `POST /reports/summary` including snapshot revival.
fn bench_summary_endpoint(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let state = create_test_state();
    let router = create_router(state.clone());
    let session = create_session(10, state.policy());
    let body = serde_json::json!({ "session": session.snapshot() }).to_string();

    c.bench_function("summary_endpoint_10_employees", |b| {
        b.to_async(&rt).iter(|| async {
            let router = router.clone();
            let response = router
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/reports/summary")
                        .header("Content-Type", "application/json")
                        .body(Body::from(body.clone()))
                        .unwrap(),
                )
                .await
                .unwrap();
            black_box(response)
        })
    });
}

criterion_group!(
    benches,
    bench_extraction,
    bench_reports,
    bench_summary_endpoint,
);
criterion_main!(benches);
