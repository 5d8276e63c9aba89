use rusqlite::Connection;
use taskdeck_core::db::open_db_in_memory;
use taskdeck_core::repo::user_repo::{SqliteUserRepository, UserRepository};
use taskdeck_core::{
    AccessLevel, AuthService, CommentService, CoreConfig, NewTask, ProjectService, TaskService,
    User, WorkspaceService,
};

fn test_config() -> CoreConfig {
    CoreConfig::new("cascade-delete-test-secret").unwrap()
}

fn register_user(conn: &Connection, config: &CoreConfig, name: &str, email: &str) -> User {
    let auth = AuthService::new(conn, config);
    let registered = auth.register(name, email, "pw").unwrap();
    let header = format!("Bearer {}", registered.access_token);
    auth.current_user(Some(&header)).unwrap()
}

fn count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })
    .unwrap()
}

#[test]
fn workspace_deletion_tears_down_the_whole_subtree() {
    let conn = open_db_in_memory().unwrap();
    let config = test_config();
    let ada = register_user(&conn, &config, "Ada", "ada@example.com");
    let bob = register_user(&conn, &config, "Bob", "bob@example.com");

    let workspaces = WorkspaceService::new(&conn);
    let workspace = workspaces.create(&ada, "Research").unwrap();
    workspaces
        .add_member(&ada, workspace.id, bob.id, AccessLevel::Member)
        .unwrap();

    let project = ProjectService::new(&conn)
        .create(&ada, workspace.id, "Backlog")
        .unwrap();
    let task = TaskService::new(&conn)
        .create(
            &ada,
            &NewTask {
                name: "Write".to_string(),
                project_id: project.id,
                assigned_to: Some(bob.id),
                remind_at: Some(1_900_000_000_000),
                ..NewTask::default()
            },
        )
        .unwrap();
    CommentService::new(&conn)
        .create(&bob, task.id, "on it")
        .unwrap();

    assert_eq!(count(&conn, "workspace_users"), 2);
    assert_eq!(count(&conn, "projects"), 1);
    assert_eq!(count(&conn, "tasks"), 1);
    assert_eq!(count(&conn, "reminders"), 1);
    assert_eq!(count(&conn, "comments"), 1);

    workspaces.delete(&ada, workspace.id).unwrap();

    assert_eq!(count(&conn, "workspaces"), 0);
    assert_eq!(count(&conn, "workspace_users"), 0);
    assert_eq!(count(&conn, "projects"), 0);
    assert_eq!(count(&conn, "tasks"), 0);
    assert_eq!(count(&conn, "reminders"), 0);
    assert_eq!(count(&conn, "comments"), 0);
    // Accounts survive workspace teardown.
    assert_eq!(count(&conn, "users"), 2);
}

#[test]
fn user_deletion_nullifies_assignments_but_keeps_tasks() {
    let conn = open_db_in_memory().unwrap();
    let config = test_config();
    let ada = register_user(&conn, &config, "Ada", "ada@example.com");
    let bob = register_user(&conn, &config, "Bob", "bob@example.com");

    let workspaces = WorkspaceService::new(&conn);
    let workspace = workspaces.create(&ada, "Research").unwrap();
    workspaces
        .add_member(&ada, workspace.id, bob.id, AccessLevel::Member)
        .unwrap();

    let project = ProjectService::new(&conn)
        .create(&ada, workspace.id, "Backlog")
        .unwrap();
    let tasks = TaskService::new(&conn);
    let task = tasks
        .create(
            &ada,
            &NewTask {
                name: "Handed off".to_string(),
                project_id: project.id,
                assigned_to: Some(bob.id),
                ..NewTask::default()
            },
        )
        .unwrap();
    assert_eq!(task.assigned_to, Some(bob.id));

    SqliteUserRepository::new(&conn).delete_user(bob.id).unwrap();

    let survivor = tasks.get(&ada, task.id).unwrap();
    assert_eq!(survivor.assigned_to, None);
    // Bob's membership went with the account.
    assert_eq!(count(&conn, "workspace_users"), 1);
}

#[test]
fn project_deletion_removes_its_tasks_only() {
    let conn = open_db_in_memory().unwrap();
    let config = test_config();
    let ada = register_user(&conn, &config, "Ada", "ada@example.com");

    let workspace = WorkspaceService::new(&conn).create(&ada, "Research").unwrap();
    let projects = ProjectService::new(&conn);
    let keep = projects.create(&ada, workspace.id, "Keep").unwrap();
    let drop = projects.create(&ada, workspace.id, "Drop").unwrap();

    let tasks = TaskService::new(&conn);
    for (project_id, name) in [(keep.id, "stays"), (drop.id, "goes")] {
        tasks
            .create(
                &ada,
                &NewTask {
                    name: name.to_string(),
                    project_id,
                    ..NewTask::default()
                },
            )
            .unwrap();
    }

    projects.delete(&ada, drop.id).unwrap();

    let remaining = projects.tasks(&ada, keep.id).unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].name, "stays");
    assert_eq!(count(&conn, "tasks"), 1);
}
