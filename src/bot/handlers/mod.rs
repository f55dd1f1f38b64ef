//! Discord interaction handlers
//!
//! This module provides handlers for Discord interactions such as autocomplete,
//! button clicks on the widget dashboard, and the dashboard refresh loop.

/// Autocomplete handlers for habit names, icons, colors, and categories
pub mod autocomplete;
/// Widget dashboard rendering, button presses, and refresh loop
pub mod widget;
