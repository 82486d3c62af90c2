// Infrastructure layer - External dependencies and adapters
pub mod backend_api;
pub mod config;
