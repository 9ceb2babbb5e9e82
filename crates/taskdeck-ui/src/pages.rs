mod dashboard;
mod login;
mod not_found;
mod settings;
mod tasks;

pub use dashboard::DashboardPage;
pub use login::LoginPage;
pub use not_found::NotFoundPage;
pub use settings::SettingsPage;
pub use tasks::TasksPage;
