// Utility modules
pub mod logging;
