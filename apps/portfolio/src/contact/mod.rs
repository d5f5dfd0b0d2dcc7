// Contact form pipeline: validate → persist → notify → confirm.
// Notification runs on a background worker and never affects the outcome.

pub mod controller;
pub mod dispatch;
pub mod handlers;
pub mod models;
pub mod notifier;
pub mod store;
pub mod validation;
