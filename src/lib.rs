pub mod audio;
pub mod controllers;
pub mod dashboard;
pub mod logging;
pub mod settings;
