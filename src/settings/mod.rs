//! Settings module for proxyconv
//!
//! Settings are loaded once by the caller and handed to the format registry;
//! nothing here is global.

pub mod settings_struct;

pub use settings_struct::Settings;
