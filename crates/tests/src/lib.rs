//! # Integration Tests
//!
//! Cross-crate tests for the mediator.
//!
//! Covers:
//! - Contract snapshots
//! - The task-list scenario end to end
//! - Publish failure policies and ordering
//! - Host resolver adapters and resolution failures

#[cfg(test)]
mod fixtures {
    use std::sync::{Arc, Mutex, PoisonError};

    use contracts::{Notification, Request};

    #[derive(Debug, Clone)]
    pub struct TaskAdded {
        pub name: String,
    }

    impl TaskAdded {
        pub fn new(name: &str) -> Self {
            Self {
                name: name.to_string(),
            }
        }
    }

    impl Notification for TaskAdded {}

    #[derive(Debug, Clone, Copy)]
    pub struct GetTaskCount;

    impl Request for GetTaskCount {
        type Response = usize;
    }

    /// Shared log of handler side effects
    #[derive(Clone, Default)]
    pub struct Journal(Arc<Mutex<Vec<String>>>);

    impl Journal {
        pub fn push(&self, entry: impl Into<String>) {
            self.0
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(entry.into());
        }

        pub fn entries(&self) -> Vec<String> {
            self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
        }

        pub fn len(&self) -> usize {
            self.0.lock().unwrap_or_else(PoisonError::into_inner).len()
        }

        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }
    }
}

#[cfg(test)]
mod contract_tests {
    use contracts::{HandlerKey, MessageKind, PublishStrategy};

    use crate::fixtures::{GetTaskCount, TaskAdded};

    #[test]
    fn test_default_strategy_is_fail_fast() {
        assert_eq!(PublishStrategy::default(), PublishStrategy::FailFast);
        assert_eq!(contracts::ConfigVersion::default(), contracts::ConfigVersion::V1);
    }

    #[test]
    fn test_keys_distinguish_kind_and_type() {
        let request = HandlerKey::request::<GetTaskCount>();
        let notification = HandlerKey::notification::<TaskAdded>();

        assert_eq!(request.kind(), MessageKind::Request);
        assert_eq!(notification.kind(), MessageKind::Notification);
        assert_ne!(request, notification);
        assert_eq!(request, HandlerKey::request::<GetTaskCount>());
        assert_eq!(notification.short_name(), "TaskAdded");
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use contracts::{notification_fn, request_fn, Mediator, MediatorError, ResolutionError};
    use dispatcher::Dispatcher;
    use registry::HandlerRegistry;

    use crate::fixtures::{GetTaskCount, Journal, TaskAdded};

    fn task_list_registry(tasks: &Journal) -> Arc<HandlerRegistry> {
        let registry = Arc::new(HandlerRegistry::new());

        let journal = tasks.clone();
        let recorder = Arc::new(notification_fn(move |event: &TaskAdded| {
            journal.push(event.name.clone());
            Ok(())
        }));
        registry
            .register_notification::<TaskAdded, _>(Arc::clone(&recorder))
            .register_notification::<TaskAdded, _>(recorder);

        let journal = tasks.clone();
        registry.register_request::<GetTaskCount, _>(request_fn(move |_: &GetTaskCount| {
            Ok(journal.len())
        }));

        registry
    }

    async fn count_via<M: Mediator>(mediator: &M) -> Result<usize, MediatorError> {
        mediator.send(GetTaskCount).await
    }

    async fn add_via<M: Mediator>(mediator: &M, name: &str) -> Result<(), MediatorError> {
        mediator.publish(&TaskAdded::new(name)).await
    }

    /// Same recorder registered twice: one publish records the task twice.
    #[tokio::test]
    async fn test_cleaning_recorded_twice() {
        let tasks = Journal::default();
        let dispatcher = Dispatcher::new(task_list_registry(&tasks));

        dispatcher.publish(&TaskAdded::new("cleaning")).await.unwrap();

        assert_eq!(tasks.entries(), vec!["cleaning", "cleaning"]);
        assert_eq!(dispatcher.send(GetTaskCount).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_send_through_mediator_trait() {
        let tasks = Journal::default();
        tasks.push("a");
        tasks.push("b");
        tasks.push("c");
        let dispatcher = Dispatcher::new(task_list_registry(&tasks));

        assert_eq!(count_via(&dispatcher).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_publish_through_mediator_trait() {
        let tasks = Journal::default();
        let dispatcher = Dispatcher::new(task_list_registry(&tasks));

        add_via(&dispatcher, "cleaning").await.unwrap();

        assert_eq!(tasks.entries(), vec!["cleaning", "cleaning"]);
        assert_eq!(count_via(&dispatcher).await.unwrap(), 2);
    }

    /// The single request handler runs once per send.
    #[tokio::test]
    async fn test_send_invokes_handler_exactly_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let registry = HandlerRegistry::new();
        registry.register_request::<GetTaskCount, _>(request_fn(move |_: &GetTaskCount| {
            Ok(counter.fetch_add(1, Ordering::SeqCst) + 1)
        }));

        let dispatcher = Dispatcher::new(registry);
        assert_eq!(dispatcher.send(GetTaskCount).await.unwrap(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        assert_eq!(dispatcher.send(GetTaskCount).await.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    /// Repeated publish appends each time; repeated send has no side effects.
    #[tokio::test]
    async fn test_repeated_dispatch_is_independent() {
        let tasks = Journal::default();
        let dispatcher = Dispatcher::new(task_list_registry(&tasks));

        dispatcher.publish(&TaskAdded::new("a")).await.unwrap();
        dispatcher.publish(&TaskAdded::new("a")).await.unwrap();
        assert_eq!(tasks.entries(), vec!["a", "a", "a", "a"]);

        assert_eq!(dispatcher.send(GetTaskCount).await.unwrap(), 4);
        assert_eq!(dispatcher.send(GetTaskCount).await.unwrap(), 4);
        assert_eq!(tasks.len(), 4);
    }

    #[tokio::test]
    async fn test_send_without_handler_has_no_side_effects() {
        let tasks = Journal::default();
        let registry = HandlerRegistry::new();
        let journal = tasks.clone();
        registry.register_notification::<TaskAdded, _>(notification_fn(
            move |event: &TaskAdded| {
                journal.push(event.name.clone());
                Ok(())
            },
        ));

        let dispatcher = Dispatcher::new(registry);
        let err = dispatcher.send(GetTaskCount).await.unwrap_err();

        assert!(err.is_resolution());
        assert!(matches!(
            err,
            MediatorError::Resolution(ResolutionError::NotRegistered { .. })
        ));
        assert!(tasks.is_empty());
        assert_eq!(dispatcher.metrics().handlers_invoked, 0);
    }

    #[tokio::test]
    async fn test_publish_without_handlers_succeeds() {
        let dispatcher = Dispatcher::new(HandlerRegistry::new());

        dispatcher.publish(&TaskAdded::new("noop")).await.unwrap();

        let metrics = dispatcher.metrics();
        assert_eq!(metrics.notifications_published, 1);
        assert_eq!(metrics.handlers_invoked, 0);
    }

    /// Handlers registered between dispatches are seen by the next one.
    #[tokio::test]
    async fn test_late_registration_visible_on_next_dispatch() {
        let tasks = Journal::default();
        let registry = Arc::new(HandlerRegistry::new());
        let dispatcher = Dispatcher::new(Arc::clone(&registry));

        dispatcher.publish(&TaskAdded::new("early")).await.unwrap();
        assert_eq!(tasks.len(), 0);

        let journal = tasks.clone();
        registry.register_notification::<TaskAdded, _>(notification_fn(
            move |event: &TaskAdded| {
                journal.push(event.name.clone());
                Ok(())
            },
        ));

        dispatcher.publish(&TaskAdded::new("late")).await.unwrap();
        assert_eq!(tasks.entries(), vec!["late"]);
    }
}

#[cfg(test)]
mod publish_policy_tests {
    use std::sync::Arc;
    use std::time::Duration;

    use contracts::{async_notification_fn, notification_fn, HandlerError, MediatorError};
    use dispatcher::{Dispatcher, PublishStrategy};
    use registry::HandlerRegistry;
    use tokio::sync::Barrier;

    use crate::fixtures::{Journal, TaskAdded};

    /// Registers `k` handlers; the ones listed in `failing` return an error.
    fn numbered_registry(journal: &Journal, k: usize, failing: &[usize]) -> HandlerRegistry {
        let registry = HandlerRegistry::new();
        for i in 0..k {
            let journal = journal.clone();
            let fails = failing.contains(&i);
            registry.register_notification::<TaskAdded, _>(notification_fn(
                move |event: &TaskAdded| {
                    if fails {
                        return Err(HandlerError::new(format!("handler {i} failed")));
                    }
                    journal.push(format!("{i}:{}", event.name));
                    Ok(())
                },
            ));
        }
        registry
    }

    #[tokio::test]
    async fn test_handlers_run_in_registration_order() {
        let journal = Journal::default();
        let dispatcher = Dispatcher::new(numbered_registry(&journal, 4, &[]));

        dispatcher.publish(&TaskAdded::new("x")).await.unwrap();

        assert_eq!(journal.entries(), vec!["0:x", "1:x", "2:x", "3:x"]);
        assert_eq!(dispatcher.metrics().handlers_invoked, 4);
    }

    #[tokio::test]
    async fn test_fail_fast_skips_later_handlers() {
        let journal = Journal::default();
        let dispatcher = Dispatcher::new(numbered_registry(&journal, 4, &[1]));

        let err = dispatcher.publish(&TaskAdded::new("x")).await.unwrap_err();

        match err {
            MediatorError::Handler { index, source, .. } => {
                assert_eq!(index, 1);
                assert_eq!(source.message(), "handler 1 failed");
            }
            other => panic!("expected handler error, got {other:?}"),
        }
        assert_eq!(journal.entries(), vec!["0:x"]);
    }

    #[tokio::test]
    async fn test_continue_on_error_collects_every_failure() {
        let journal = Journal::default();
        let dispatcher = Dispatcher::builder(numbered_registry(&journal, 4, &[0, 2]))
            .publish_strategy(PublishStrategy::ContinueOnError)
            .build();

        let err = dispatcher.publish(&TaskAdded::new("x")).await.unwrap_err();

        match err {
            MediatorError::Aggregate {
                total, failures, ..
            } => {
                assert_eq!(total, 4);
                let indices: Vec<_> = failures.iter().map(|f| f.index).collect();
                assert_eq!(indices, vec![0, 2]);
            }
            other => panic!("expected aggregate error, got {other:?}"),
        }
        assert_eq!(journal.entries(), vec!["1:x", "3:x"]);
    }

    #[tokio::test]
    async fn test_publish_with_overrides_default() {
        let journal = Journal::default();
        let dispatcher = Dispatcher::new(numbered_registry(&journal, 3, &[0]));
        assert_eq!(dispatcher.publish_strategy(), PublishStrategy::FailFast);

        let err = dispatcher
            .publish_with(&TaskAdded::new("x"), PublishStrategy::ContinueOnError)
            .await
            .unwrap_err();

        assert_eq!(err.failure_count(), 1);
        assert_eq!(journal.entries(), vec!["1:x", "2:x"]);
    }

    /// Both handlers must be in flight at once to get past the barrier.
    #[tokio::test]
    async fn test_parallel_runs_handlers_concurrently() {
        let barrier = Arc::new(Barrier::new(2));
        let journal = Journal::default();
        let registry = HandlerRegistry::new();
        for i in 0..2 {
            let barrier = Arc::clone(&barrier);
            let journal = journal.clone();
            registry.register_notification::<TaskAdded, _>(async_notification_fn(
                move |event: TaskAdded| {
                    let barrier = Arc::clone(&barrier);
                    let journal = journal.clone();
                    async move {
                        barrier.wait().await;
                        journal.push(format!("{i}:{}", event.name));
                        Ok(())
                    }
                },
            ));
        }

        let dispatcher = Dispatcher::builder(registry)
            .publish_strategy(PublishStrategy::Parallel)
            .build();

        tokio::time::timeout(
            Duration::from_secs(5),
            dispatcher.publish(&TaskAdded::new("p")),
        )
        .await
        .expect("parallel publish deadlocked")
        .unwrap();

        let mut entries = journal.entries();
        entries.sort();
        assert_eq!(entries, vec!["0:p", "1:p"]);
    }

    #[tokio::test]
    async fn test_parallel_reports_failures_by_position() {
        let journal = Journal::default();
        let dispatcher = Dispatcher::builder(numbered_registry(&journal, 3, &[2]))
            .publish_strategy(PublishStrategy::Parallel)
            .build();

        let err = dispatcher.publish(&TaskAdded::new("x")).await.unwrap_err();

        match err {
            MediatorError::Aggregate { failures, .. } => {
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].index, 2);
            }
            other => panic!("expected aggregate error, got {other:?}"),
        }
        assert_eq!(journal.len(), 2);
    }

    /// Dropping the publish future stops handlers that have not started.
    #[tokio::test]
    async fn test_dropped_publish_stops_sequence() {
        let journal = Journal::default();
        let registry = HandlerRegistry::new();
        let slow = journal.clone();
        registry.register_notification::<TaskAdded, _>(async_notification_fn(
            move |event: TaskAdded| {
                let slow = slow.clone();
                async move {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    slow.push(event.name);
                    Ok(())
                }
            },
        ));
        let after = journal.clone();
        registry.register_notification::<TaskAdded, _>(notification_fn(
            move |event: &TaskAdded| {
                after.push(event.name.clone());
                Ok(())
            },
        ));

        let dispatcher = Dispatcher::new(registry);
        let outcome = tokio::time::timeout(
            Duration::from_millis(20),
            dispatcher.publish(&TaskAdded::new("never")),
        )
        .await;

        assert!(outcome.is_err());
        assert_eq!(journal.len(), 0);
    }
}

#[cfg(test)]
mod resolver_tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use contracts::{
        notification_fn, request_fn, HandlerKey, MediatorError, NotificationHandler, Request,
        RequestHandler, ResolutionError,
    };
    use dispatcher::Dispatcher;
    use registry::{
        erase_notification_handler, erase_request_handler, ErasedHandler, FnResolver,
        HandlerRegistry,
    };

    use crate::fixtures::{GetTaskCount, Journal, TaskAdded};

    struct Echo(String);
    impl Request for Echo {
        type Response = String;
    }

    /// Host container modelled as a map of erased entries.
    fn host_resolver(entries: HashMap<HandlerKey, Vec<ErasedHandler>>) -> FnResolver {
        let entries = Arc::new(entries);
        let many = Arc::clone(&entries);
        FnResolver::new(
            move |key| {
                entries
                    .get(key)
                    .and_then(|list| list.first().cloned())
                    .ok_or(ResolutionError::NotRegistered { key: *key })
            },
            move |key| Ok(many.get(key).cloned().unwrap_or_default()),
        )
    }

    #[tokio::test]
    async fn test_fn_resolver_send_and_publish() {
        let journal = Journal::default();
        let recorder = journal.clone();

        let echo: Arc<dyn RequestHandler<Echo>> =
            Arc::new(request_fn(|req: &Echo| Ok(req.0.to_uppercase())));
        let added: Arc<dyn NotificationHandler<TaskAdded>> =
            Arc::new(notification_fn(move |event: &TaskAdded| {
                recorder.push(event.name.clone());
                Ok(())
            }));

        let mut entries = HashMap::new();
        entries.insert(HandlerKey::request::<Echo>(), vec![erase_request_handler(echo)]);
        entries.insert(
            HandlerKey::notification::<TaskAdded>(),
            vec![
                erase_notification_handler(Arc::clone(&added)),
                erase_notification_handler(added),
            ],
        );

        let dispatcher = Dispatcher::new(host_resolver(entries));

        assert_eq!(dispatcher.send(Echo("hi".into())).await.unwrap(), "HI");
        dispatcher.publish(&TaskAdded::new("cleaning")).await.unwrap();
        assert_eq!(journal.entries(), vec!["cleaning", "cleaning"]);
    }

    #[tokio::test]
    async fn test_host_failure_is_relayed() {
        let resolver = FnResolver::new(
            |key| Err(ResolutionError::host(*key, "container disposed")),
            |key| Err(ResolutionError::host(*key, "container disposed")),
        );
        let dispatcher = Dispatcher::new(resolver);

        let err = dispatcher.send(GetTaskCount).await.unwrap_err();
        assert!(matches!(
            err,
            MediatorError::Resolution(ResolutionError::Host { .. })
        ));

        let err = dispatcher.publish(&TaskAdded::new("x")).await.unwrap_err();
        assert!(err.is_resolution());
        assert_eq!(dispatcher.metrics().resolution_failures, 2);
    }

    #[tokio::test]
    async fn test_two_request_handlers_are_ambiguous() {
        let registry = HandlerRegistry::new();
        registry
            .register_request::<GetTaskCount, _>(request_fn(|_: &GetTaskCount| Ok(1)))
            .register_request::<GetTaskCount, _>(request_fn(|_: &GetTaskCount| Ok(2)));

        let dispatcher = Dispatcher::new(registry);
        match dispatcher.send(GetTaskCount).await {
            Err(MediatorError::Resolution(ResolutionError::Ambiguous { count, .. })) => {
                assert_eq!(count, 2)
            }
            other => panic!("expected ambiguous resolution, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_entry_under_wrong_key_is_type_mismatch() {
        let echo: Arc<dyn RequestHandler<Echo>> =
            Arc::new(request_fn(|req: &Echo| Ok(req.0.clone())));
        let registry = HandlerRegistry::new();
        registry.register_erased(
            HandlerKey::request::<GetTaskCount>(),
            erase_request_handler(echo),
        );

        let dispatcher = Dispatcher::new(registry);
        let err = dispatcher.send(GetTaskCount).await.unwrap_err();
        assert!(matches!(
            err,
            MediatorError::Resolution(ResolutionError::TypeMismatch { .. })
        ));
    }
}

#[cfg(test)]
mod observability_tests {
    use std::sync::{Arc, Mutex, PoisonError};

    use contracts::{notification_fn, request_fn, DispatchOutcome, DispatchRecord, HandlerError};
    use dispatcher::Dispatcher;
    use observability::DispatchStatsAggregator;
    use registry::HandlerRegistry;

    use crate::fixtures::{GetTaskCount, TaskAdded};

    #[tokio::test]
    async fn test_observer_sees_every_dispatch() {
        let records: Arc<Mutex<Vec<DispatchRecord>>> = Arc::default();
        let stats = Arc::new(Mutex::new(DispatchStatsAggregator::new()));

        let registry = HandlerRegistry::new();
        registry
            .register_request::<GetTaskCount, _>(request_fn(|_: &GetTaskCount| Ok(0)))
            .register_notification::<TaskAdded, _>(notification_fn(|_: &TaskAdded| Ok(())))
            .register_notification::<TaskAdded, _>(notification_fn(|_: &TaskAdded| {
                Err(HandlerError::new("full"))
            }));

        let sink = Arc::clone(&records);
        let aggregate = Arc::clone(&stats);
        let dispatcher = Dispatcher::builder(registry)
            .on_dispatch(Arc::new(move |record: &DispatchRecord| {
                aggregate
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .update(record);
                sink.lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(record.clone());
            }))
            .build();

        dispatcher.send(GetTaskCount).await.unwrap();
        assert!(dispatcher.publish(&TaskAdded::new("x")).await.is_err());

        let records = records.lock().unwrap_or_else(PoisonError::into_inner);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].outcome, DispatchOutcome::Completed);
        assert_eq!(records[1].outcome, DispatchOutcome::HandlerFailed);
        assert_eq!(records[1].handlers_resolved, 2);
        assert_eq!(records[1].handlers_invoked, 2);

        let summary = stats.lock().unwrap_or_else(PoisonError::into_inner).summary();
        assert_eq!(summary.total_requests, 1);
        assert_eq!(summary.total_notifications, 1);
        assert_eq!(summary.handler_failures, 1);
    }
}

#[cfg(test)]
mod config_tests {
    use contracts::{notification_fn, HandlerError, MediatorError, PublishStrategy};
    use config_loader::{ConfigFormat, ConfigLoader};
    use dispatcher::create_dispatcher;
    use registry::HandlerRegistry;

    use crate::fixtures::{Journal, TaskAdded};

    #[tokio::test]
    async fn test_configured_strategy_drives_publish() {
        let config = ConfigLoader::load_from_str(
            r#"
[dispatch]
publish_strategy = "continue_on_error"
"#,
            ConfigFormat::Toml,
        )
        .unwrap();
        assert_eq!(
            config.dispatch.publish_strategy,
            PublishStrategy::ContinueOnError
        );

        let journal = Journal::default();
        let registry = HandlerRegistry::new();
        registry.register_notification::<TaskAdded, _>(notification_fn(|_: &TaskAdded| {
            Err(HandlerError::new("first"))
        }));
        let recorder = journal.clone();
        registry.register_notification::<TaskAdded, _>(notification_fn(
            move |event: &TaskAdded| {
                recorder.push(event.name.clone());
                Ok(())
            },
        ));

        let dispatcher = create_dispatcher(registry, &config);
        let err = dispatcher.publish(&TaskAdded::new("x")).await.unwrap_err();

        assert!(matches!(err, MediatorError::Aggregate { .. }));
        assert_eq!(journal.entries(), vec!["x"]);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ConfigLoader::load_from_str("", ConfigFormat::Toml).unwrap();
        assert_eq!(config, contracts::MediatorConfig::default());
    }
}
