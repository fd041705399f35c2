//! Badge component for status indicators.

use leptos::prelude::*;

/// Badge visual variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BadgeVariant {
    /// Neutral state.
    #[default]
    Default,
    /// Work in progress.
    Busy,
}

impl BadgeVariant {
    /// Get CSS classes for this variant.
    #[must_use]
    pub fn classes(self) -> &'static str {
        match self {
            Self::Default => "badge",
            Self::Busy => "badge badge-busy",
        }
    }
}

/// Small pill showing a status label.
#[component]
pub fn Badge(
    /// Badge variant.
    #[prop(default = BadgeVariant::Default)]
    variant: BadgeVariant,
    /// Element id, so the label can be updated in place.
    #[prop(optional)]
    id: Option<&'static str>,
    /// Badge content.
    children: Children,
) -> impl IntoView {
    view! {
        <span id=id class=variant.classes()>
            {children()}
        </span>
    }
}
