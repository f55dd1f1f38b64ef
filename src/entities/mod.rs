//! Entity module - Contains all SeaORM entity definitions for the shared store.
//! These entities represent the database tables. Each entity has a Model struct
//! for data and an Entity struct for operations.

pub mod completion;
pub mod habit;
pub mod preference;

// Re-export specific types to avoid conflicts
pub use completion::{
    Column as CompletionColumn, Entity as Completion, Model as CompletionModel,
};
pub use habit::{Column as HabitColumn, Entity as Habit, Model as HabitModel};
pub use preference::{
    Column as PreferenceColumn, Entity as Preference, Model as PreferenceModel,
};
