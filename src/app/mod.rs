use crate::api::EnvConfig;
use crate::components::editor::MarkdownEditor;
use crate::components::git_panel::GitStatusPanel;
use crate::components::shift_click::ShiftClickZone;
use crate::components::sortable::StartupList;
use crate::models::StartupEntry;
use crate::state::{AppContext, AppState};
use leptos::ev;
use leptos::prelude::*;
use leptos_dom::helpers::window_event_listener;
use leptos_dom::helpers::WindowListenerHandle;
use serde::Deserialize;

/// Server-rendered bootstrap payload, inlined as JSON in a
/// `#bootstrap-data` script tag.
#[derive(Deserialize, Clone, Debug, Default)]
pub(crate) struct Bootstrap {
    #[serde(default)]
    pub project: String,

    #[serde(default)]
    pub project_path: String,

    #[serde(default)]
    pub items: Vec<StartupEntry>,
}

pub(crate) fn parse_bootstrap(text: &str) -> Bootstrap {
    serde_json::from_str(text).unwrap_or_default()
}

fn read_bootstrap() -> Bootstrap {
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id("bootstrap-data"))
        .and_then(|el| el.text_content())
        .map(|text| parse_bootstrap(&text))
        .unwrap_or_default()
}

/// Theme changes arrive as a window-level custom event; "both" clears the
/// attribute so the UA preference applies.
fn wire_theme_listener() -> WindowListenerHandle {
    window_event_listener(
        ev::Custom::<web_sys::CustomEvent>::new("maestro:theme-changed"),
        move |ev: web_sys::CustomEvent| {
            let theme = js_sys::Reflect::get(&ev.detail(), &"theme".into())
                .ok()
                .and_then(|v| v.as_string())
                .unwrap_or_default();

            let Some(root) = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.document_element())
            else {
                return;
            };

            if theme == "both" {
                let _ = root.remove_attribute("data-theme");
            } else {
                let _ = root.set_attribute("data-theme", &theme);
            }
        },
    )
}

#[component]
pub fn App() -> impl IntoView {
    let bootstrap = read_bootstrap();

    let state = AppState::new();
    state.startup_items.set(bootstrap.items);
    state.session.connect(&EnvConfig::new().ws_url);
    provide_context(AppContext(state.clone()));

    // Theme wiring lives for the page lifetime; keep the handle alive.
    let _theme_handle = StoredValue::new_local(wire_theme_listener());

    let items = state.startup_items;

    view! {
        <ShiftClickZone class="min-h-screen bg-background">
            <div class="mx-auto w-full max-w-[1080px] px-4 py-8">
                <div class="mb-4 flex items-center justify-between">
                    <div class="space-y-1">
                        <h1 class="text-xl font-semibold">"Maestro"</h1>
                        <p class="text-xs text-muted-foreground">"Project startup"</p>
                    </div>

                    <GitStatusPanel project_path=bootstrap.project_path />
                </div>

                <StartupList items=items project=bootstrap.project />

                <div class="mt-6">
                    <MarkdownEditor id="startup-notes" />
                </div>
            </div>
        </ShiftClickZone>
    }
}
