//! `demo` command implementation.
//!
//! Wires the task-list scenario into a [`HandlerRegistry`], publishes
//! `TaskAdded` for every task and round, then queries the count back.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use anyhow::{Context, Result};
use contracts::{DispatchRecord, MediatorConfig};
use dispatcher::{DispatcherBuilder, DispatcherConfig, MetricsSnapshot};
use observability::{DispatchStatsAggregator, MetricsSummary};
use registry::HandlerRegistry;
use serde::Serialize;
use tracing::{info, warn};

use crate::cli::DemoArgs;
use crate::scenario::{self, GetTaskCount, ListTasks, TaskAdded, TaskList};

/// Demo report for JSON output
#[derive(Serialize)]
struct DemoReport {
    strategy: String,
    recorder_slots: usize,
    rounds: u32,
    tasks: Vec<String>,
    task_count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    publish_failures: Vec<PublishFailure>,
    metrics: ReportMetrics,
    elapsed_ms: f64,
}

#[derive(Serialize)]
struct PublishFailure {
    round: u32,
    task: String,
    failed_handlers: usize,
    error: String,
}

#[derive(Serialize)]
struct ReportMetrics {
    requests_sent: u64,
    notifications_published: u64,
    handlers_invoked: u64,
    handler_failures: u64,
    resolution_failures: u64,
    mean_publish_latency_ms: f64,
    mean_request_latency_ms: f64,
}

impl ReportMetrics {
    fn new(snapshot: &MetricsSnapshot, summary: &MetricsSummary) -> Self {
        Self {
            requests_sent: snapshot.requests_sent,
            notifications_published: snapshot.notifications_published,
            handlers_invoked: snapshot.handlers_invoked,
            handler_failures: snapshot.handler_failures,
            resolution_failures: snapshot.resolution_failures,
            mean_publish_latency_ms: summary.publish_latency_ms.mean,
            mean_request_latency_ms: summary.request_latency_ms.mean,
        }
    }
}

/// Execute the `demo` command
pub async fn run_demo(args: &DemoArgs, config: &MediatorConfig) -> Result<()> {
    let start = Instant::now();

    let registry = Arc::new(HandlerRegistry::new());
    let tasks = TaskList::new();
    scenario::register(&registry, &tasks, args.handlers, args.fail_at);

    let stats = Arc::new(Mutex::new(DispatchStatsAggregator::new()));
    let sink = Arc::clone(&stats);

    let mut builder = DispatcherBuilder::new(Arc::clone(&registry))
        .config(DispatcherConfig::from(&config.dispatch))
        .on_dispatch(Arc::new(move |record: &DispatchRecord| {
            sink.lock()
                .unwrap_or_else(PoisonError::into_inner)
                .update(record);
        }));
    if let Some(strategy) = args.strategy {
        builder = builder.publish_strategy(strategy.into());
    }
    let dispatcher = builder.build();

    info!(
        strategy = %dispatcher.publish_strategy(),
        recorder_slots = args.handlers,
        rounds = args.rounds,
        tasks = args.tasks.len(),
        "Running task-list demo"
    );

    let mut publish_failures = Vec::new();
    for round in 1..=args.rounds {
        for name in &args.tasks {
            if let Err(e) = dispatcher.publish(&TaskAdded::new(name.as_str())).await {
                warn!(round, task = %name, error = %e, "Publish failed");
                publish_failures.push(PublishFailure {
                    round,
                    task: name.clone(),
                    failed_handlers: e.failure_count(),
                    error: e.to_string(),
                });
            }
        }
    }

    let task_count = dispatcher
        .send(GetTaskCount)
        .await
        .context("GetTaskCount dispatch failed")?;
    let recorded = dispatcher
        .send(ListTasks)
        .await
        .context("ListTasks dispatch failed")?;

    let summary = stats
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .summary();

    let report = DemoReport {
        strategy: dispatcher.publish_strategy().to_string(),
        recorder_slots: args.handlers,
        rounds: args.rounds,
        tasks: recorded,
        task_count,
        publish_failures,
        metrics: ReportMetrics::new(&dispatcher.metrics(), &summary),
        elapsed_ms: start.elapsed().as_secs_f64() * 1000.0,
    };

    info!(
        task_count = report.task_count,
        failed_publishes = report.publish_failures.len(),
        "Demo completed"
    );

    if args.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{}", json);
    } else {
        print_report(&report, &summary);
    }

    Ok(())
}

fn print_report(report: &DemoReport, summary: &MetricsSummary) {
    println!("Task-list demo ({} strategy)", report.strategy);
    println!("  Recorder slots: {}", report.recorder_slots);
    println!("  Rounds: {}", report.rounds);
    println!("  Recorded tasks ({}):", report.task_count);
    for task in &report.tasks {
        println!("    - {}", task);
    }

    if !report.publish_failures.is_empty() {
        println!("\n⚠ Failed publishes:");
        for failure in &report.publish_failures {
            println!(
                "  - round {} '{}': {} ({} handler(s))",
                failure.round, failure.task, failure.error, failure.failed_handlers
            );
        }
    }

    println!();
    print!("{}", summary);
    println!("Elapsed: {:.2} ms", report.elapsed_ms);
}
