pub mod browser;
pub mod checks;
pub mod config;
pub mod devices;
pub mod doctor;
pub mod report;
