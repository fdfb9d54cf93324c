pub mod handler;
pub mod hooks;
pub mod plugin;
pub mod request;

pub use hooks::{CreateTables, DeployHooks, HookError, RemoveTables};
pub use plugin::{PluginRequest, spawn, start};
pub use request::Request;
