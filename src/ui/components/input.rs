//! Text input component.

use leptos::prelude::*;

/// Single-line text input.
///
/// # Example
///
/// ```rust,ignore
/// view! {
///     <TextInput name="url" id="link-url" placeholder="https://..." />
/// }
/// ```
#[component]
pub fn TextInput(
    /// Input name attribute.
    name: &'static str,
    /// Input ID attribute.
    id: &'static str,
    /// Placeholder text.
    #[prop(default = "")]
    placeholder: &'static str,
) -> impl IntoView {
    view! {
        <input
            type="text"
            class="text-input"
            name=name
            id=id
            placeholder=placeholder
            autocomplete="off"
        />
    }
}
