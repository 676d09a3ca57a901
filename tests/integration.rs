use tempfile::tempdir;

use chrono::NaiveDate;
use taskbot::commands::{Context, Dispatcher, Reply};
use taskbot::error::BotError;
use taskbot::output::Markup;
use taskbot::store::Store;

fn text(reply: Option<Reply>) -> String {
    match reply {
        Some(Reply::Text(t)) => t,
        other => panic!("expected a text reply, got {other:?}"),
    }
}

#[test]
fn test_full_workflow() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("bot.db");
    let store = Store::open(&db).unwrap();

    let user = store.user(100).unwrap();
    let milk = store.create_task(&user, "Buy milk", 15).unwrap();
    let report = store.create_task(&user, "Write report", 90).unwrap();
    assert_eq!(milk.id, 1);
    assert_eq!(report.id, 2);

    // Tag and list
    let home = store.tag_or_create(&user, "home").unwrap();
    store.tag_task(&milk, &home).unwrap();
    let errands = store.list_or_create(&user, "errands").unwrap();
    store.add_to_list(&errands, &milk).unwrap();

    // Plan a day
    let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let plan = store.plan_or_create(&user, day).unwrap();
    store.plan_task(&plan, &report).unwrap();
    store.plan_task(&plan, &milk).unwrap();
    store.close().unwrap();

    // Everything survives a reopen
    let store = Store::open(&db).unwrap();
    let user = store.user(100).unwrap();
    assert_eq!(user.id, 1);
    assert_eq!(store.tasks_for_user(&user).unwrap().len(), 2);
    let tagged = store.tasks_by_tag(&user, "home").unwrap();
    assert_eq!(tagged.len(), 1);
    assert_eq!(tagged[0].name, "Buy milk");
    let list = store.list_by_name(&user, "errands").unwrap();
    assert_eq!(store.tasks_in_list(&list).unwrap()[0].id, milk.id);
    let planned: Vec<u64> = store
        .tasks_by_plan_date(&user, day)
        .unwrap()
        .iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(planned, vec![2, 1]);

    // Deleting removes every association
    let milk = store.task(&user, 1).unwrap();
    store.delete_task(&milk).unwrap();
    assert!(store.tasks_by_tag(&user, "home").unwrap().is_empty());
    assert_eq!(store.tasks_by_plan_date(&user, day).unwrap().len(), 1);
    assert!(matches!(store.task(&user, 1), Err(BotError::TaskNotFound(1))));
}

#[test]
fn test_users_are_isolated() {
    let dir = tempdir().unwrap();
    let dispatcher = Dispatcher::new(Context {
        store: Store::open(&dir.path().join("bot.db")).unwrap(),
        markup: Markup::Plain,
        asset_path: dir.path().join("missing.png"),
    });

    assert_eq!(text(dispatcher.dispatch(1, "/task 10 Mine")), "Task 1 saved.");
    assert_eq!(text(dispatcher.dispatch(2, "/delete 1")), "Task 1 not found.");
    assert_eq!(text(dispatcher.dispatch(2, "/tag 1 secret")), "Task 1 not found.");
    assert_eq!(
        text(dispatcher.dispatch(2, "/list")),
        "Your tasks:\nNo tasks.\n"
    );
    assert_eq!(
        text(dispatcher.dispatch(1, "/list")),
        "Your tasks:\n1. Mine (10m)\n"
    );
}

#[test]
fn test_plan_report_totals_estimates() {
    let dir = tempdir().unwrap();
    let dispatcher = Dispatcher::new(Context {
        store: Store::open(&dir.path().join("bot.db")).unwrap(),
        markup: Markup::Plain,
        asset_path: dir.path().join("missing.png"),
    });

    dispatcher.dispatch(9, "/task 30 Gym");
    dispatcher.dispatch(9, "/task 45 Read");
    assert_eq!(
        text(dispatcher.dispatch(9, "/plan 2024-03-01 1 2")),
        "Plan for 2024-03-01 updated."
    );
    let report = text(dispatcher.dispatch(9, "/plan 2024-03-01"));
    assert!(report.contains("1. Gym (30m)"));
    assert!(report.contains("2. Read (45m)"));
    assert!(report.ends_with("Estimated time for 2024-03-01: 75 m"));

    dispatcher.dispatch(9, "/unplan 2024-03-01 1");
    let report = text(dispatcher.dispatch(9, "/plan 2024-03-01"));
    assert!(!report.contains("Gym"));
    assert!(report.ends_with("Estimated time for 2024-03-01: 45 m"));
}
