//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// General utility commands
pub mod general;

/// Habit management commands
pub mod habit;

/// Onboarding commands
pub mod onboarding;

/// Daily progress commands (toggle today, toggle a past day, today overview)
pub mod progress;

/// Preference commands
pub mod settings;

/// Statistics and export commands
pub mod stats;

/// Widget dashboard command
pub mod widget;

mod utils;

// Export commands
pub use general::*;
pub use habit::*;
pub use onboarding::*;
pub use progress::*;
pub use settings::*;
pub use stats::*;
pub use widget::*;
