use dashboard::resources::tasks::{
    self, TaskDelete, TaskStatusChange, TaskUpdate,
};
use payloads::endpoints::TASK;
use payloads::requests::TaskFields;
use payloads::{TaskId, TaskPriority, TaskStatus, UserId};
use serde_json::json;
use test_helpers::{spawn_app, task};

#[tokio::test]
async fn assignment_refetches_only_the_assignees_list() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_tasks();
    let h1 = UserId::from("h1");
    let h2 = UserId::from("h2");
    let all = tasks::use_tasks(&app.ctx);
    let mine = tasks::use_housekeeper_tasks(&app.ctx, Some(&h1));
    let theirs = tasks::use_housekeeper_tasks(&app.ctx, Some(&h2));
    all.settled().await;
    assert_eq!(mine.settled().await.items.len(), 1);
    assert_eq!(theirs.settled().await.items.len(), 1);
    app.mock.clear_requests();

    tasks::use_update_task(&app.ctx)
        .trigger(TaskUpdate {
            task_id: TaskId::from("t3"),
            fields: TaskFields {
                housekeeper_id: Some(h1.clone()),
                ..Default::default()
            },
            housekeeper_id: None,
        })
        .await?;

    assert_eq!(app.mock.count("PUT", "/api/task/t3"), 1);
    assert_eq!(app.mock.count("GET", "/api/task"), 1);
    assert_eq!(app.mock.count("GET", "/api/task/housekeeper/h1"), 1);
    assert_eq!(app.mock.count("GET", "/api/task/housekeeper/h2"), 0);
    assert_eq!(mine.state().items.len(), 2);
    assert_eq!(theirs.state().items.len(), 1);
    Ok(())
}

#[tokio::test]
async fn reassignment_refetches_both_housekeepers() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_tasks();
    let h1 = UserId::from("h1");
    let h2 = UserId::from("h2");
    let previous = tasks::use_housekeeper_tasks(&app.ctx, Some(&h1));
    let next = tasks::use_housekeeper_tasks(&app.ctx, Some(&h2));
    previous.settled().await;
    next.settled().await;

    tasks::use_update_task(&app.ctx)
        .trigger(TaskUpdate {
            task_id: TaskId::from("t1"),
            fields: TaskFields {
                housekeeper_id: Some(h2.clone()),
                ..Default::default()
            },
            housekeeper_id: Some(h1.clone()),
        })
        .await?;

    let previous = previous.state();
    assert!(previous.is_empty);
    assert!(!previous.is_loading);
    let titles: Vec<_> = next
        .state()
        .items
        .into_iter()
        .filter_map(|task| task.title)
        .collect();
    assert_eq!(titles, ["Turn down 101", "Deep clean 102"]);
    Ok(())
}

#[tokio::test]
async fn unknown_housekeeper_makes_no_request() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let hook = tasks::use_housekeeper_tasks(&app.ctx, None);
    let state = hook.state();
    assert!(state.is_empty);
    assert!(!state.is_loading);
    assert_eq!(hook.key(), None);

    let blank = tasks::use_housekeeper_tasks(&app.ctx, Some(&UserId::from("")));
    assert_eq!(blank.key(), None);
    assert!(app.mock.requests().is_empty());
    Ok(())
}

#[tokio::test]
async fn status_change_goes_through_the_status_action() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_tasks();
    let t1 = TaskId::from("t1");
    let h1 = UserId::from("h1");
    let detail = tasks::use_task(&app.ctx, Some(&t1));
    let mine = tasks::use_housekeeper_tasks(&app.ctx, Some(&h1));
    detail.settled().await;
    mine.settled().await;

    let task = tasks::use_update_task_status(&app.ctx)
        .trigger(TaskStatusChange {
            task_id: t1.clone(),
            status: TaskStatus::Completed,
            housekeeper_id: Some(h1),
        })
        .await?;
    assert_eq!(task.status, Some(TaskStatus::Completed));

    let request = app
        .mock
        .requests()
        .into_iter()
        .find(|request| request.method == "PUT")
        .expect("status request");
    assert_eq!(request.path, "/api/task/status/t1");
    assert_eq!(request.body, Some(json!({"status": "completed"})));

    let entity = detail.state().entity.expect("task t1");
    assert_eq!(entity.status, Some(TaskStatus::Completed));
    assert_eq!(
        mine.state().items[0].status,
        Some(TaskStatus::Completed)
    );
    Ok(())
}

#[tokio::test]
async fn task_details_fill_in_defaults() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_tasks();

    let state = tasks::use_task(&app.ctx, Some(&TaskId::from("t3")))
        .settled()
        .await;
    let task = state.entity.expect("task t3");
    assert_eq!(task.priority, Some(TaskPriority::Medium));
    assert_eq!(task.status, Some(TaskStatus::Pending));
    assert_eq!(task.housekeeper_id, None);
    Ok(())
}

#[tokio::test]
async fn editing_a_task_refreshes_its_housekeepers_list() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_tasks();
    let h1 = UserId::from("h1");
    let mine = tasks::use_housekeeper_tasks(&app.ctx, Some(&h1));
    mine.settled().await;

    tasks::use_update_task(&app.ctx)
        .trigger(TaskUpdate {
            task_id: TaskId::from("t1"),
            fields: TaskFields {
                title: Some("Renamed".into()),
                ..Default::default()
            },
            housekeeper_id: Some(h1.clone()),
        })
        .await?;

    assert_eq!(app.mock.count("GET", "/api/task/housekeeper/h1"), 2);
    assert_eq!(mine.state().items[0].title.as_deref(), Some("Renamed"));
    Ok(())
}

#[tokio::test]
async fn deleting_a_task_refreshes_its_housekeepers_list() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_tasks();
    let h1 = UserId::from("h1");
    let mine = tasks::use_housekeeper_tasks(&app.ctx, Some(&h1));
    let all = tasks::use_tasks(&app.ctx);
    assert_eq!(mine.settled().await.items.len(), 1);
    all.settled().await;

    tasks::use_delete_task(&app.ctx)
        .trigger(TaskDelete {
            task_id: TaskId::from("t1"),
            housekeeper_id: Some(h1.clone()),
        })
        .await?;

    assert_eq!(app.mock.count("DELETE", "/api/task/t1"), 1);
    let state = mine.state();
    assert!(state.items.is_empty());
    assert!(state.is_empty);
    assert_eq!(all.state().items.len(), 2);
    assert_eq!(app.success_toasts(), ["Task deleted"]);
    Ok(())
}

#[tokio::test]
async fn unknown_priority_does_not_break_the_list() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let mut urgent = task("t1", "Flooded bathroom 305", Some("h1"));
    urgent["priority"] = "urgent".into();
    app.mock
        .seed(&TASK, vec![urgent, task("t2", "Turn down 101", None)]);

    let state = tasks::use_tasks(&app.ctx).settled().await;
    assert_eq!(state.error, None);
    assert_eq!(state.items.len(), 2);
    assert_eq!(state.items[0].priority, Some(TaskPriority::Other));
    assert_eq!(state.items[1].priority, None);
    Ok(())
}
