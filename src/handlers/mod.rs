pub mod daily_logs;
pub mod health;
pub mod predict;
pub mod profile;
