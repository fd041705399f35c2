//! Button component with variants.

use leptos::prelude::*;

/// Button visual variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ButtonVariant {
    /// Main action of a form.
    #[default]
    Primary,
    /// Less prominent action, e.g. rebuilding the index.
    Secondary,
}

impl ButtonVariant {
    /// Get CSS classes for this variant.
    #[must_use]
    pub fn classes(self) -> &'static str {
        match self {
            Self::Primary => "btn btn-primary",
            Self::Secondary => "btn secondary",
        }
    }
}

/// Form button.
///
/// Without a handler the button is rendered as `type="button"` so that
/// clicking it has no effect.
///
/// # Example
///
/// ```rust,ignore
/// view! {
///     <Button variant=ButtonVariant::Primary submit=true>
///         "Senden"
///     </Button>
/// }
/// ```
#[component]
pub fn Button(
    /// Button variant.
    #[prop(default = ButtonVariant::Primary)]
    variant: ButtonVariant,
    /// Whether the button submits its form.
    #[prop(default = false)]
    submit: bool,
    /// Button content.
    children: Children,
) -> impl IntoView {
    let button_type = if submit { "submit" } else { "button" };

    view! {
        <button type=button_type class=variant.classes()>
            {children()}
        </button>
    }
}
