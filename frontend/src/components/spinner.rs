use leptos::prelude::*;

pub const DEFAULT_LABEL: &str = "Carregando...";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SpinnerSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl SpinnerSize {
    pub fn class(self) -> &'static str {
        match self {
            SpinnerSize::Small => "loading-spinner loading-spinner-sm",
            SpinnerSize::Medium => "loading-spinner loading-spinner-md",
            SpinnerSize::Large => "loading-spinner loading-spinner-lg",
        }
    }
}

/// Indeterminate loading indicator. Purely presentational.
#[component]
pub fn Spinner(
    #[prop(optional)] size: SpinnerSize,
    #[prop(optional)] label: Option<String>,
) -> impl IntoView {
    let label = label.unwrap_or_else(|| DEFAULT_LABEL.to_string());
    let aria_label = label.clone();

    view! {
        <div class="spinner-container" role="status" aria-live="polite" aria-label=aria_label>
            <div class=size.class()></div>
            <span class="sr-only">{label}</span>
        </div>
    }
}
