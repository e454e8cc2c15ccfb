pub mod auth;
pub mod health;
pub mod profiles;
pub mod projects;
pub mod stats;
pub mod task_logs;
pub mod tasks;
