// Static portfolio content: a fixed schema loaded and validated at startup.

pub mod handlers;
pub mod loader;
pub mod models;
