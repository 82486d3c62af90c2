// Domain layer - Core sensor and chart models
pub mod alert;
pub mod chart;
pub mod sensor;
