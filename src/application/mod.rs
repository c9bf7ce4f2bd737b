pub mod auth;
pub mod bootstrap;
pub mod comments;
pub mod dashboard;
pub mod guard;
pub mod notifications;
pub mod organizations;
pub mod tasks;
