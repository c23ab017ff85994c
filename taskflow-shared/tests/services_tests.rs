/// Integration tests for the domain services
///
/// These run against the in-memory store and need no external services.
/// Run with: cargo test -p taskflow-shared --test services_tests

use std::sync::Arc;

use taskflow_shared::auth::authorization::{
    require_project_access, require_project_manage, require_task_access, require_user,
};
use taskflow_shared::auth::jwt::{TokenConfig, TokenService};
use taskflow_shared::auth::middleware::{AuthContext, IdentityGate};
use taskflow_shared::error::Error;
use taskflow_shared::models::{Priority, Role, TaskFilter, TaskStatus, User};
use taskflow_shared::services::access::MembershipService;
use taskflow_shared::services::notifications::NotificationService;
use taskflow_shared::services::projects::{ProjectChanges, ProjectService};
use taskflow_shared::services::tasks::{ActivityAttribution, NewTask, TaskChanges, TaskService};
use taskflow_shared::services::users::{LoginPolicy, ProfileChanges, UserDirectory};
use taskflow_shared::store::{memory::MemoryStore, Store};
use uuid::Uuid;

const SECRET: &str = "integration-test-secret-at-least-32-bytes";

struct Services {
    store: Arc<MemoryStore>,
    users: UserDirectory,
    members: MembershipService,
    projects: ProjectService,
    tasks: TaskService,
    notifications: NotificationService,
    tokens: Arc<TokenService>,
}

fn services_with(policy: LoginPolicy, attribution: ActivityAttribution) -> Services {
    let store = Arc::new(MemoryStore::new());
    let dyn_store: Arc<dyn Store> = store.clone();

    Services {
        users: UserDirectory::new(dyn_store.clone(), policy),
        members: MembershipService::new(dyn_store.clone()),
        projects: ProjectService::new(dyn_store.clone()),
        tasks: TaskService::new(dyn_store.clone(), attribution),
        notifications: NotificationService::new(dyn_store),
        tokens: Arc::new(TokenService::new(TokenConfig::new(SECRET))),
        store,
    }
}

fn services() -> Services {
    services_with(LoginPolicy::default(), ActivityAttribution::default())
}

async fn user(s: &Services, email: &str) -> User {
    s.users
        .register(email, "password123", "Test User")
        .await
        .expect("registration should succeed")
}

fn new_task(title: &str) -> NewTask {
    NewTask {
        title: title.to_string(),
        ..Default::default()
    }
}

// User directory

#[tokio::test]
async fn test_register_duplicate_email_fails() {
    let s = services();
    user(&s, "a@x.com").await;

    let err = s.users.register("a@x.com", "password123", "Other").await.unwrap_err();
    assert!(matches!(err, Error::DuplicateEmail));

    // Distinct emails succeed, including a case variant
    user(&s, "b@x.com").await;
    user(&s, "A@x.com").await;
}

#[tokio::test]
async fn test_register_validates_input() {
    let s = services();

    let err = s.users.register("not-an-email", "123", "A").await.unwrap_err();
    match err {
        Error::ValidationFailed(fields) => {
            let names: Vec<&str> = fields.iter().map(|f| f.field.as_str()).collect();
            assert_eq!(names, vec!["email", "name", "password"]);
        }
        other => panic!("expected ValidationFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_registered_user_is_member_role_and_trimmed() {
    let s = services();
    let u = s
        .users
        .register("  c@x.com ", "password123", "  Carol  ")
        .await
        .unwrap();

    assert_eq!(u.email, "c@x.com");
    assert_eq!(u.name, "Carol");
    assert_eq!(u.role, Role::Member);
    assert!(u.password_hash.starts_with("$argon2id$"));

    let found = s.users.find_by_email("c@x.com").await.unwrap().unwrap();
    assert_eq!(found.id, u.id);
    assert!(s.users.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_login_scenario() {
    let s = services();
    let registered = s.users.register("a@x.com", "pw1pw1", "Alice").await.unwrap();

    let logged_in = s.users.login("a@x.com", "pw1pw1", None).await.unwrap();
    assert_eq!(logged_in.id, registered.id);

    // The issued token resolves back to the same user through the gate
    let token = s.tokens.issue_access(logged_in.id).unwrap();
    let gate = IdentityGate::new(s.tokens.clone(), s.store.clone());
    let context = gate.resolve(Some(&format!("Bearer {}", token))).await.unwrap();
    assert_eq!(require_user(&context).unwrap().id, registered.id);

    let err = s.users.login("a@x.com", "wrong-password", None).await.unwrap_err();
    assert!(matches!(err, Error::Unauthenticated));
}

#[tokio::test]
async fn test_authenticate_does_not_distinguish_failures() {
    let s = services();
    user(&s, "a@x.com").await;

    assert!(s.users.authenticate("nobody@x.com", "password123").await.unwrap().is_none());
    assert!(s.users.authenticate("a@x.com", "wrong-password").await.unwrap().is_none());
    assert!(s.users.authenticate("a@x.com", "password123").await.unwrap().is_some());
}

#[tokio::test]
async fn test_login_does_not_provision_by_default() {
    let s = services();

    let err = s.users.login("new@x.com", "password123", None).await.unwrap_err();
    assert!(matches!(err, Error::Unauthenticated));
    assert!(s.users.find_by_email("new@x.com").await.unwrap().is_none());
}

#[tokio::test]
async fn test_register_on_login_policy() {
    let s = services_with(
        LoginPolicy { register_on_login: true },
        ActivityAttribution::default(),
    );

    let created = s.users.login("new@x.com", "password123", None).await.unwrap();
    assert_eq!(created.email, "new@x.com");
    assert_eq!(created.name, "new");

    // Second login authenticates the same account
    let again = s.users.login("new@x.com", "password123", None).await.unwrap();
    assert_eq!(again.id, created.id);

    // A wrong password never creates or returns an account
    let err = s.users.login("new@x.com", "other-password", None).await.unwrap_err();
    assert!(matches!(err, Error::Unauthenticated));
}

#[tokio::test]
async fn test_update_profile() {
    let s = services();
    let a = user(&s, "a@x.com").await;
    user(&s, "b@x.com").await;

    let updated = s
        .users
        .update_profile(
            a.id,
            ProfileChanges {
                name: Some(" Alicia ".to_string()),
                avatar: Some("avatars/a.png".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Alicia");
    assert_eq!(updated.email, "a@x.com");
    assert_eq!(updated.avatar.as_deref(), Some("avatars/a.png"));
    assert!(updated.updated_at > a.updated_at);

    let err = s
        .users
        .update_profile(
            a.id,
            ProfileChanges {
                email: Some("b@x.com".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateEmail));

    let err = s
        .users
        .update_profile(
            a.id,
            ProfileChanges {
                name: Some(" x ".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ValidationFailed(_)));

    let err = s
        .users
        .update_profile(
            a.id,
            ProfileChanges {
                email: Some("bad".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ValidationFailed(_)));
}

#[tokio::test]
async fn test_update_profile_without_changes_keeps_timestamp() {
    let s = services();
    let a = user(&s, "a@x.com").await;

    let same = s
        .users
        .update_profile(
            a.id,
            ProfileChanges {
                name: Some("Test User".to_string()),
                email: Some("a@x.com".to_string()),
                avatar: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(same.updated_at, a.updated_at);

    let missing = s.users.update_profile(Uuid::new_v4(), ProfileChanges::default()).await;
    assert!(matches!(missing, Err(Error::NotFound(_))));
}

// Membership and projects

#[tokio::test]
async fn test_project_creator_has_manage_access() {
    let s = services();
    let owner = user(&s, "m@x.com").await;

    let project = s.projects.create(owner.id, "P1", None).await.unwrap();

    assert!(s.members.has_access(owner.id, project.id).await.unwrap());
    assert!(s.members.has_manage_access(owner.id, project.id).await.unwrap());

    let members = s.members.list_members(project.id).await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].role, Role::Manager);
}

#[tokio::test]
async fn test_add_and_remove_member() {
    let s = services();
    let owner = user(&s, "m@x.com").await;
    let other = user(&s, "o@x.com").await;
    let project = s.projects.create(owner.id, "P1", None).await.unwrap();

    for role in [Role::Member, Role::Admin] {
        s.members.add_member(project.id, other.id, role).await.unwrap();
        assert!(s.members.has_access(other.id, project.id).await.unwrap());
        assert_eq!(
            s.members.has_manage_access(other.id, project.id).await.unwrap(),
            role.can_manage_project()
        );

        let err = s.members.add_member(project.id, other.id, role).await.unwrap_err();
        assert!(matches!(err, Error::AlreadyMember));

        s.members.remove_member(project.id, other.id).await.unwrap();
        assert!(!s.members.has_access(other.id, project.id).await.unwrap());
    }

    let err = s.members.remove_member(project.id, other.id).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    let err = s
        .members
        .add_member(project.id, Uuid::new_v4(), Role::Member)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound("User")));
}

#[tokio::test]
async fn test_non_member_is_forbidden() {
    let s = services();
    let owner = user(&s, "m@x.com").await;
    let outsider = user(&s, "x@x.com").await;
    let project = s.projects.create(owner.id, "P2", None).await.unwrap();
    let task = s.tasks.create(owner.id, project.id, new_task("T")).await.unwrap();

    let err = require_project_access(&s.members, &outsider, project.id).await.unwrap_err();
    assert!(matches!(err, Error::Forbidden(_)));

    let err = require_project_manage(&s.members, &outsider, project.id).await.unwrap_err();
    assert!(matches!(err, Error::Forbidden(_)));

    let err = require_task_access(&s.members, &s.tasks, &outsider, task.id).await.unwrap_err();
    assert!(matches!(err, Error::Forbidden(_)));

    let err = require_task_access(&s.members, &s.tasks, &outsider, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound("Task")));

    // Plain members have access but not manage access
    s.members.add_member(project.id, outsider.id, Role::Member).await.unwrap();
    require_project_access(&s.members, &outsider, project.id).await.unwrap();
    let err = require_project_manage(&s.members, &outsider, project.id).await.unwrap_err();
    assert!(matches!(err, Error::Forbidden(_)));

    assert!(matches!(require_user(&AuthContext::anonymous()), Err(Error::Unauthenticated)));
}

#[tokio::test]
async fn test_project_update_and_list() {
    let s = services();
    let owner = user(&s, "m@x.com").await;
    let first = s.projects.create(owner.id, "First", None).await.unwrap();
    let second = s.projects.create(owner.id, "Second", Some("desc".to_string())).await.unwrap();

    let listed = s.projects.list_for_user(owner.id).await.unwrap();
    let ids: Vec<Uuid> = listed.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);

    let updated = s
        .projects
        .update(first.id, ProjectChanges { name: Some("Renamed".to_string()), description: None })
        .await
        .unwrap();
    assert_eq!(updated.name, "Renamed");
    assert!(updated.updated_at > first.updated_at);

    let err = s.projects.update(Uuid::new_v4(), ProjectChanges::default()).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    let err = s.projects.create(owner.id, "   ", None).await.unwrap_err();
    assert!(matches!(err, Error::ValidationFailed(_)));
}

#[tokio::test]
async fn test_project_delete_cascades() {
    let s = services();
    let owner = user(&s, "m@x.com").await;
    let project = s.projects.create(owner.id, "P", None).await.unwrap();
    let task = s.tasks.create(owner.id, project.id, new_task("T")).await.unwrap();
    s.tasks.add_comment(owner.id, task.id, "note").await.unwrap();

    s.projects.delete(project.id).await.unwrap();

    assert!(s.projects.get(project.id).await.unwrap().is_none());
    assert!(!s.members.has_access(owner.id, project.id).await.unwrap());
    assert!(s.tasks.get(task.id).await.unwrap().is_none());
    assert!(s.tasks.list_comments(task.id).await.unwrap().is_empty());
    assert!(s.tasks.list_project_activities(project.id, None).await.unwrap().is_empty());
    assert_eq!(s.store.activity_count(), 0);

    let err = s.projects.delete(project.id).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn test_project_stats() {
    let s = services();
    let owner = user(&s, "m@x.com").await;
    let project = s.projects.create(owner.id, "P", None).await.unwrap();

    let empty = s.projects.stats(project.id).await.unwrap();
    assert_eq!(empty.total_tasks, 0);
    assert_eq!(empty.completion_rate, 0.0);

    let done = s.tasks.create(owner.id, project.id, new_task("done")).await.unwrap();
    s.tasks
        .update(
            owner.id,
            done.id,
            TaskChanges {
                status: Some(TaskStatus::Done),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let overdue = NewTask {
        title: "late".to_string(),
        due_date: Some(chrono::Utc::now() - chrono::Duration::days(1)),
        ..Default::default()
    };
    s.tasks.create(owner.id, project.id, overdue).await.unwrap();

    let stats = s.projects.stats(project.id).await.unwrap();
    assert_eq!(stats.total_tasks, 2);
    assert_eq!(stats.completed_tasks, 1);
    assert_eq!(stats.overdue_tasks, 1);
    assert_eq!(stats.completion_rate, 50.0);
}

// Tasks and activities

#[tokio::test]
async fn test_task_lifecycle_scenario() {
    let s = services();
    let m = user(&s, "m@x.com").await;
    let project = s.projects.create(m.id, "P1", None).await.unwrap();

    let t1 = s.tasks.create(m.id, project.id, new_task("T1")).await.unwrap();
    assert_eq!(t1.status, TaskStatus::Todo);
    assert_eq!(t1.priority, Priority::Medium);

    let done = s
        .tasks
        .update(m.id, t1.id, TaskChanges { status: Some(TaskStatus::Done), ..Default::default() })
        .await
        .unwrap();
    assert_eq!(done.status, TaskStatus::Done);
    assert!(done.completed_at.is_some());

    let activities = s.tasks.list_task_activities(t1.id).await.unwrap();
    let actions: Vec<&str> = activities.iter().map(|a| a.action.as_str()).collect();
    assert_eq!(actions, vec!["task_updated", "task_created"]);
    assert_eq!(
        activities[0].description,
        "Updated task 'T1': status changed from 'TODO' to 'DONE'"
    );
    assert_eq!(activities[0].user_id, Some(m.id));

    let reopened = s
        .tasks
        .update(m.id, t1.id, TaskChanges { status: Some(TaskStatus::Todo), ..Default::default() })
        .await
        .unwrap();
    assert!(reopened.completed_at.is_none());
}

#[tokio::test]
async fn test_update_without_changes_emits_no_activity() {
    let s = services();
    let m = user(&s, "m@x.com").await;
    let project = s.projects.create(m.id, "P1", None).await.unwrap();
    let t = s.tasks.create(m.id, project.id, new_task("T")).await.unwrap();
    let before = s.store.activity_count();

    let same = s
        .tasks
        .update(m.id, t.id, TaskChanges { title: Some("T".to_string()), ..Default::default() })
        .await
        .unwrap();
    assert_eq!(same.updated_at, t.updated_at);
    assert_eq!(s.store.activity_count(), before);

    let err = s.tasks.update(m.id, Uuid::new_v4(), TaskChanges::default()).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn test_overlong_text_is_rejected() {
    let s = services();
    let m = user(&s, "m@x.com").await;
    let project = s.projects.create(m.id, "P1", None).await.unwrap();
    let t = s.tasks.create(m.id, project.id, new_task("T")).await.unwrap();

    let err = s
        .tasks
        .create(m.id, project.id, new_task(&"t".repeat(256)))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ValidationFailed(_)));

    let rename = TaskChanges {
        title: Some("t".repeat(256)),
        ..Default::default()
    };
    let err = s.tasks.update(m.id, t.id, rename).await.unwrap_err();
    assert!(matches!(err, Error::ValidationFailed(_)));
    assert_eq!(s.tasks.get(t.id).await.unwrap().unwrap().title, "T");

    let err = s.projects.create(m.id, &"p".repeat(256), None).await.unwrap_err();
    assert!(matches!(err, Error::ValidationFailed(_)));

    let avatar = ProfileChanges {
        avatar: Some("v".repeat(513)),
        ..Default::default()
    };
    let err = s.users.update_profile(m.id, avatar).await.unwrap_err();
    assert!(matches!(err, Error::ValidationFailed(_)));

    let long_email = format!("{}@{}.com", "a".repeat(60), "d".repeat(200));
    let err = s
        .users
        .register(&long_email, "password123", "Long")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ValidationFailed(_)));
}

#[tokio::test]
async fn test_assignee_attribution_policy() {
    let s = services_with(LoginPolicy::default(), ActivityAttribution::AssigneeOrSystem);
    let m = user(&s, "m@x.com").await;
    let assignee = user(&s, "a@x.com").await;
    let project = s.projects.create(m.id, "P1", None).await.unwrap();
    let t = s.tasks.create(m.id, project.id, new_task("T")).await.unwrap();

    s.tasks
        .update(m.id, t.id, TaskChanges { priority: Some(Priority::High), ..Default::default() })
        .await
        .unwrap();
    let latest = &s.tasks.list_task_activities(t.id).await.unwrap()[0];
    assert_eq!(latest.user_id, None);

    s.tasks
        .update(m.id, t.id, TaskChanges { assignee_id: Some(assignee.id), ..Default::default() })
        .await
        .unwrap();
    let latest = &s.tasks.list_task_activities(t.id).await.unwrap()[0];
    assert_eq!(latest.user_id, Some(assignee.id));
    assert_eq!(latest.description, "Updated task 'T': assignee changed");
}

#[tokio::test]
async fn test_unknown_assignee_rejected() {
    let s = services();
    let m = user(&s, "m@x.com").await;
    let project = s.projects.create(m.id, "P1", None).await.unwrap();

    let input = NewTask {
        title: "T".to_string(),
        assignee_id: Some(Uuid::new_v4()),
        ..Default::default()
    };
    let err = s.tasks.create(m.id, project.id, input).await.unwrap_err();
    assert!(matches!(err, Error::ValidationFailed(_)));

    let err = s.tasks.create(m.id, Uuid::new_v4(), new_task("T")).await.unwrap_err();
    assert!(matches!(err, Error::NotFound("Project")));
}

#[tokio::test]
async fn test_delete_task_removes_comments() {
    let s = services();
    let m = user(&s, "m@x.com").await;
    let project = s.projects.create(m.id, "P1", None).await.unwrap();
    let t = s.tasks.create(m.id, project.id, new_task("T")).await.unwrap();
    s.tasks.add_comment(m.id, t.id, "first").await.unwrap();
    s.tasks.add_comment(m.id, t.id, "second").await.unwrap();

    s.tasks.delete(m.id, t.id).await.unwrap();

    assert!(s.tasks.get(t.id).await.unwrap().is_none());
    assert!(s.tasks.list_comments(t.id).await.unwrap().is_empty());

    let activities = s.tasks.list_project_activities(project.id, None).await.unwrap();
    assert_eq!(activities[0].action, "task_deleted");
    assert_eq!(activities[0].task_id, None);
    assert_eq!(activities[0].project_id, Some(project.id));
    assert_eq!(activities.len(), 4);

    let err = s.tasks.delete(m.id, t.id).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn test_comments_ordering_and_activity() {
    let s = services();
    let m = user(&s, "m@x.com").await;
    let project = s.projects.create(m.id, "P1", None).await.unwrap();
    let t = s.tasks.create(m.id, project.id, new_task("T")).await.unwrap();

    s.tasks.add_comment(m.id, t.id, "one").await.unwrap();
    s.tasks.add_comment(m.id, t.id, "two").await.unwrap();

    let comments = s.tasks.list_comments(t.id).await.unwrap();
    let contents: Vec<&str> = comments.iter().map(|c| c.content.as_str()).collect();
    assert_eq!(contents, vec!["one", "two"]);
    assert!(comments.iter().all(|c| c.author_id == m.id));

    let activities = s.tasks.list_task_activities(t.id).await.unwrap();
    assert_eq!(activities[0].action, "comment_added");
    assert_eq!(activities[0].user_id, Some(m.id));

    let err = s.tasks.add_comment(m.id, t.id, "   ").await.unwrap_err();
    assert!(matches!(err, Error::ValidationFailed(_)));

    let err = s.tasks.add_comment(m.id, Uuid::new_v4(), "hi").await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn test_list_filters_and_ordering() {
    let s = services();
    let m = user(&s, "m@x.com").await;
    let project = s.projects.create(m.id, "P1", None).await.unwrap();

    let docs = s
        .tasks
        .create(
            m.id,
            project.id,
            NewTask {
                title: "Write docs".to_string(),
                priority: Some(Priority::High),
                assignee_id: Some(m.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let deploy = s
        .tasks
        .create(
            m.id,
            project.id,
            NewTask {
                title: "Deploy".to_string(),
                description: Some("Ship the DOCS site".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let all = s.tasks.list(project.id, &TaskFilter::default()).await.unwrap();
    let ids: Vec<Uuid> = all.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![deploy.id, docs.id]);

    let search = TaskFilter { search: Some("docs".to_string()), ..Default::default() };
    assert_eq!(s.tasks.list(project.id, &search).await.unwrap().len(), 2);

    let high = TaskFilter {
        search: Some("docs".to_string()),
        priority: Some(Priority::High),
        ..Default::default()
    };
    let found = s.tasks.list(project.id, &high).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, docs.id);

    let assigned = TaskFilter { assignee_id: Some(m.id), ..Default::default() };
    assert_eq!(s.tasks.list(project.id, &assigned).await.unwrap().len(), 1);

    let done = TaskFilter { status: Some(TaskStatus::Done), ..Default::default() };
    assert!(s.tasks.list(project.id, &done).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_project_activity_limit() {
    let s = services();
    let m = user(&s, "m@x.com").await;
    let project = s.projects.create(m.id, "P1", None).await.unwrap();
    for i in 0..3 {
        s.tasks.create(m.id, project.id, new_task(&format!("T{}", i))).await.unwrap();
    }

    let latest = s.tasks.list_project_activities(project.id, Some(2)).await.unwrap();
    assert_eq!(latest.len(), 2);
    assert_eq!(latest[0].description, "Created task 'T2'");

    let clamped = s.tasks.list_project_activities(project.id, Some(0)).await.unwrap();
    assert_eq!(clamped.len(), 1);
}

// Notifications

#[tokio::test]
async fn test_notifications() {
    let s = services();
    let a = user(&s, "a@x.com").await;
    let b = user(&s, "b@x.com").await;

    let first = s.notifications.create(a.id, "Welcome", "Hello").await.unwrap();
    let second = s.notifications.create(a.id, "Assigned", "You have a task").await.unwrap();

    let listed = s.notifications.list(a.id).await.unwrap();
    let ids: Vec<Uuid> = listed.iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
    assert!(listed.iter().all(|n| !n.is_read));

    s.notifications.mark_read(a.id, first.id).await.unwrap();
    // Idempotent
    s.notifications.mark_read(a.id, first.id).await.unwrap();

    let listed = s.notifications.list(a.id).await.unwrap();
    assert!(listed.iter().find(|n| n.id == first.id).unwrap().is_read);

    let err = s.notifications.mark_read(b.id, second.id).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    assert!(s.notifications.list(b.id).await.unwrap().is_empty());
}
