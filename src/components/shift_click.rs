use crate::session::OutboundEvent;
use crate::state::AppContext;
use leptos::prelude::*;
use tw_merge::tw_merge;
use wasm_bindgen::JsCast;

/// A click counts as the fullscreen gesture only with shift held and only
/// outside links; link clicks keep their default navigation even with shift.
pub(crate) fn is_fullscreen_gesture(shift_held: bool, inside_link: bool) -> bool {
    shift_held && !inside_link
}

/// Shift-click gesture detector. Matching clicks suppress the default action
/// and push `toggle_fullscreen`; everything else propagates untouched.
/// Stateless between invocations.
#[component]
pub fn ShiftClickZone(children: Children, #[prop(optional, into)] class: String) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let session = app_state.0.session;

    let on_click = move |ev: web_sys::MouseEvent| {
        let inside_link = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
            .and_then(|el| el.closest("a").ok().flatten())
            .is_some();

        if is_fullscreen_gesture(ev.shift_key(), inside_link) {
            ev.prevent_default();
            session.push(OutboundEvent::ToggleFullscreen, serde_json::json!({}));
        }
    };

    let class = tw_merge!("block", class);

    view! {
        <div class=class on:click=on_click>
            {children()}
        </div>
    }
}
