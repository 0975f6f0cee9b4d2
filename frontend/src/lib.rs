mod components;
pub mod storage;

use common::{Preferences, Theme};
use leptos::prelude::*;

pub use components::spinner::{Spinner, SpinnerSize};
use storage::BrowserStorage;

#[component]
pub fn App() -> impl IntoView {
    let preferences = Preferences::new(BrowserStorage);
    let (theme, set_theme) = signal(preferences.theme().unwrap_or_default());

    let toggle_theme = move |_| {
        let next = theme.get().toggled();
        Preferences::new(BrowserStorage).set_theme(next);
        set_theme.set(next);
    };

    view! {
        <div class=move || format!("app-container theme-{}", theme.get())>
            <header class="header">
                <button class="button" on:click=toggle_theme>
                    {move || if theme.get() == Theme::Dark { "Tema claro" } else { "Tema escuro" }}
                </button>
            </header>
            <main>
                <Spinner size=SpinnerSize::Large />
            </main>
        </div>
    }
}

/// Client-side render into `<body>`.
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn mount() {
    console_error_panic_hook::set_once();
    mount_to_body(App);
}
