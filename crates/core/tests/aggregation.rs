//! Integration tests for history aggregation and the views built on it.

mod common;

use chrono::{TimeZone, Utc};
use common::{FakeApi, task};

use cadence_core::{
    ApiError, CardState, CompletionEntry, FeedEntry, HistoryOverview, NewTask, TaskDetail,
    TaskId, TaskList, TaskType, Timestamp, aggregate_histories, load_feed,
};

mod aggregate {
    use super::*;

    #[tokio::test]
    async fn test_empty_task_list_issues_no_requests() {
        let api = FakeApi::new();
        let aggregate = aggregate_histories(&api, &[]).await;

        assert!(aggregate.by_task.is_empty());
        assert!(aggregate.failed_task_titles().is_empty());
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn test_all_tasks_succeed() {
        let api = FakeApi::new()
            .with_history(1, vec![CompletionEntry::new(1, "2024-01-02T08:00:00Z")])
            .with_history(2, Vec::new());
        let tasks = vec![task(1, "Run"), task(2, "Read")];

        let aggregate = aggregate_histories(&api, &tasks).await;

        assert_eq!(aggregate.by_task.len(), 2);
        assert_eq!(aggregate.by_task[&TaskId::new(1)].len(), 1);
        assert!(aggregate.by_task[&TaskId::new(2)].is_empty());
        assert!(aggregate.error_message().is_none());
        assert_eq!(api.calls(), 2);
    }

    #[tokio::test]
    async fn test_single_failure_does_not_abort_siblings() {
        let api = FakeApi::new()
            .with_history(1, vec![CompletionEntry::new(1, "2024-01-02T08:00:00Z")])
            .with_history(3, vec![CompletionEntry::new(2, "2024-01-03T08:00:00Z")])
            .failing(2);
        let tasks = vec![task(1, "Run"), task(2, "Read"), task(3, "Write")];

        let aggregate = aggregate_histories(&api, &tasks).await;

        assert!(aggregate.by_task.contains_key(&TaskId::new(1)));
        assert!(!aggregate.by_task.contains_key(&TaskId::new(2)));
        assert!(aggregate.by_task.contains_key(&TaskId::new(3)));
        assert_eq!(aggregate.failed_task_titles(), vec!["Read".to_string()]);
        assert_eq!(
            aggregate.error_message().as_deref(),
            Some("Unable to load history for: Read")
        );
    }

    #[tokio::test]
    async fn test_failed_titles_follow_input_order_not_completion_order() {
        // Task 1 fails last, task 3 fails first
        let api = FakeApi::new()
            .failing(1)
            .failing(3)
            .delayed(1, 60)
            .delayed(3, 1);
        let tasks = vec![task(1, "Slow"), task(2, "Fine"), task(3, "Fast")];

        let aggregate = aggregate_histories(&api, &tasks).await;

        assert_eq!(aggregate.failed_task_titles(), vec!["Slow", "Fast"]);
        assert_eq!(
            aggregate.error_message().unwrap(),
            "Unable to load history for: Slow, Fast"
        );
        assert_eq!(aggregate.by_task.len(), 1);
    }

    #[tokio::test]
    async fn test_requests_run_concurrently() {
        let api = FakeApi::new()
            .delayed(1, 30)
            .delayed(2, 30)
            .delayed(3, 30)
            .delayed(4, 30);
        let tasks: Vec<_> = (1..=4).map(|i| task(i, "t")).collect();

        aggregate_histories(&api, &tasks).await;

        assert_eq!(api.max_in_flight(), 4);
    }

    #[tokio::test]
    async fn test_every_task_failing_reports_all() {
        let api = FakeApi::new().failing(1).failing(2);
        let tasks = vec![task(1, "A"), task(2, "B")];
        let aggregate = aggregate_histories(&api, &tasks).await;
        assert!(aggregate.by_task.is_empty());
        assert_eq!(
            aggregate.error_message().unwrap(),
            "Unable to load history for: A, B"
        );
    }
}

mod overview {
    use super::*;

    #[tokio::test]
    async fn test_refresh_populates_cards_in_task_order() {
        let api = FakeApi::new()
            .with_history(
                2,
                vec![
                    CompletionEntry::new(1, "2024-01-02T08:00:00Z"),
                    CompletionEntry::new(2, "2024-01-04T08:00:00Z"),
                ],
            )
            .failing(1);
        let mut overview = HistoryOverview::new(vec![task(2, "Read"), task(1, "Run")]);

        assert!(overview.refresh(&api).await);
        assert!(!overview.is_loading());

        let cards = overview.cards();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].task.id, TaskId::new(2));
        match &cards[0].state {
            CardState::Entries(entries) => {
                assert_eq!(entries.iter().map(|e| e.id).collect::<Vec<_>>(), vec![2, 1]);
            }
            CardState::Failed => panic!("Read should have loaded"),
        }
        assert_eq!(cards[1].state, CardState::Failed);
        assert_eq!(
            overview.error_message().as_deref(),
            Some("Unable to load history for: Run")
        );
    }

    #[tokio::test]
    async fn test_refresh_replaces_previous_results_wholesale() {
        let good = FakeApi::new().with_history(1, vec![CompletionEntry::new(1, "2024-01-02T08:00:00Z")]);
        let broken = FakeApi::new().failing(1);
        let mut overview = HistoryOverview::new(vec![task(1, "Run")]);

        overview.refresh(&good).await;
        assert!(matches!(overview.cards()[0].state, CardState::Entries(ref e) if e.len() == 1));

        overview.refresh(&broken).await;
        assert_eq!(overview.cards()[0].state, CardState::Failed);
        assert!(overview.aggregate().by_task.is_empty());
    }

    #[tokio::test]
    async fn test_refresh_with_no_tasks_skips_network() {
        let api = FakeApi::new();
        let mut overview = HistoryOverview::new(Vec::new());
        assert!(overview.refresh(&api).await);
        assert_eq!(api.calls(), 0);
        assert!(overview.error_message().is_none());
    }

    #[tokio::test]
    async fn test_result_arriving_after_task_switch_is_dropped() {
        let api = FakeApi::new().with_history(1, vec![CompletionEntry::new(1, "2024-01-02T08:00:00Z")]);
        let mut overview = HistoryOverview::new(vec![task(1, "Run")]);

        let (ticket, tasks) = overview.begin_refresh().unwrap();
        let aggregate = aggregate_histories(&api, &tasks).await;

        overview.set_tasks(vec![task(2, "Read")]);
        assert!(!overview.apply(&ticket, aggregate));
        assert!(overview.aggregate().by_task.is_empty());
    }
}

mod detail {
    use super::*;

    #[tokio::test]
    async fn test_invalid_id_fails_without_requests() {
        let api = FakeApi::new().with_task(task(1, "Run"));
        let now = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap();

        let err = TaskDetail::load(&api, "abc", &now).await.unwrap_err();

        assert!(matches!(err, ApiError::InvalidTaskId { .. }));
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn test_loads_task_history_and_stats() {
        let api = FakeApi::new().with_task(task(1, "Run")).with_history(
            1,
            vec![
                CompletionEntry::new(1, "2024-01-02T08:00:00Z"),
                CompletionEntry::new(2, "2024-01-09T08:00:00Z"),
            ],
        );
        let now = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();

        let detail = TaskDetail::load(&api, "1", &now).await.unwrap();

        assert_eq!(detail.task.title, "Run");
        assert_eq!(detail.history[0].id, 2);
        // 2 completions over 9 days since creation
        assert!((detail.stats.lifetime_percent - 2.0 / 9.0 * 100.0).abs() < 1e-9);
        assert!((detail.stats.monthly_percent - 2.0 / 31.0 * 100.0).abs() < 1e-9);

        let grid = detail.grid(
            cadence_core::YearMonth::new(2024, 1).unwrap(),
            &Utc,
            now.date_naive(),
        );
        assert_eq!(grid.completed_count, 2);
        assert_eq!(grid.total_days, 31);
        assert_eq!(grid.completion_percent, 6);
    }

    #[tokio::test]
    async fn test_missing_task_fails_whole_view() {
        let api = FakeApi::new().with_history(5, Vec::new());
        let now = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
        let err = TaskDetail::load(&api, "5", &now).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound { task_id: 5 }));
    }

    #[tokio::test]
    async fn test_history_failure_fails_whole_view() {
        let api = FakeApi::new().with_task(task(1, "Run")).failing(1);
        let now = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
        let err = TaskDetail::load(&api, "1", &now).await.unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 500, .. }));
    }
}

mod task_list {
    use super::*;

    #[tokio::test]
    async fn test_toggle_adopts_server_response() {
        let api = FakeApi::new().with_task(task(1, "Run"));
        let mut list = TaskList::fetch(&api).await.unwrap();

        let updated = list.toggle_completion(&api, TaskId::new(1)).await.unwrap();
        assert!(updated.completed_today);

        let updated = list.toggle_completion(&api, TaskId::new(1)).await.unwrap();
        assert!(!updated.completed_today);
    }

    #[tokio::test]
    async fn test_toggle_unknown_task_sends_nothing() {
        let api = FakeApi::new();
        let mut list = TaskList::new(Vec::new());
        let err = list.toggle_completion(&api, TaskId::new(4)).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound { task_id: 4 }));
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn test_create_appends_server_copy() {
        let api = FakeApi::new().with_task(task(1, "Run"));
        let mut list = TaskList::fetch(&api).await.unwrap();
        let created = list
            .create(&api, &NewTask::new("Stretch", TaskType::Weekly))
            .await
            .unwrap();
        assert_eq!(created.id, TaskId::new(2));
        assert_eq!(created.task_type, TaskType::Weekly);
        assert_eq!(list.tasks().len(), 2);
    }
}

mod feed {
    use super::*;

    fn feed_entry(id: u64, at: &str, title: &str) -> FeedEntry {
        FeedEntry {
            id,
            completed_at: Timestamp::new(at),
            task_id: Some(TaskId::new(1)),
            task_title: title.to_string(),
            task_description: String::new(),
        }
    }

    #[tokio::test]
    async fn test_feed_sorted_newest_first() {
        let api = FakeApi::new().with_feed(vec![
            feed_entry(1, "2024-01-01T00:00:00Z", "Run"),
            feed_entry(2, "2024-03-01T00:00:00Z", "Read"),
            feed_entry(3, "2024-02-01T00:00:00Z", "Run"),
        ]);
        let entries = load_feed(&api).await.unwrap();
        assert_eq!(entries.iter().map(|e| e.id).collect::<Vec<_>>(), vec![2, 3, 1]);
    }
}
