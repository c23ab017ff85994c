/// Domain services
///
/// Each service holds an `Arc<dyn Store>` and is cheap to clone. Services do
/// not check permissions; that is done at the request boundary by
/// [`crate::auth::authorization`] before a service is called.
///
/// # Services
///
/// - `users`: [`users::UserDirectory`], accounts and credentials
/// - `access`: [`access::MembershipService`], memberships and access predicates
/// - `projects`: [`projects::ProjectService`], project lifecycle and statistics
/// - `tasks`: [`tasks::TaskService`], tasks, comments and the activity log
/// - `notifications`: [`notifications::NotificationService`]

pub mod access;
pub mod notifications;
pub mod projects;
pub mod tasks;
pub mod users;
