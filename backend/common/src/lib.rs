//! # Common
//!
//! Pure helpers for the portal forms and displays.
//!
//! - [`phone`]: Brazilian phone masking for form inputs
//! - [`percent`]: pt-BR percentage display for cashback/commission rates
//! - [`password`]: password strength rules shown on sign up
//! - [`preferences`]: typed UI preferences over any key/value store
//!
//! Nothing in here touches the network or the browser directly.

pub mod password;
pub mod percent;
pub mod phone;
pub mod preferences;

pub use password::{Requirement, WeakPassword, validate_password};
pub use percent::format_percent;
pub use phone::{mask_phone, unmask_phone};
pub use preferences::{KeyValueStore, MemoryStore, Preferences, Theme};
