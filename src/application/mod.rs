// Application layer - Use cases and data-shaping logic
pub mod align;
pub mod chart_service;
pub mod farm_repository;
pub mod resample;
pub mod scale;
pub mod status_service;
