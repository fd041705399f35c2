//! Reusable UI components, rendered via Leptos SSR.
//!
//! - [`Button`]: form button with variants
//! - [`Badge`]: status pill
//! - [`TextInput`]: single-line text field
//! - [`icons`]: SVG icon components

mod badge;
mod button;
mod icons;
mod input;

pub use badge::{Badge, BadgeVariant};
pub use button::{Button, ButtonVariant};
pub use icons::*;
pub use input::TextInput;
