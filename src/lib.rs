mod api;
mod app;
mod components;
mod models;
mod session;
mod state;

use leptos::prelude::*;

// Needed for `#[wasm_bindgen(start)]` on the wasm entrypoint.
#[cfg(all(target_arch = "wasm32", not(test)))]
use wasm_bindgen::prelude::wasm_bindgen;

// Only register the WASM start function for normal builds (not for tests),
// otherwise wasm-bindgen-test will end up with multiple entry symbols.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();
    mount_to_body(app::App);
}

// WASM-only tests (run with `cargo test --target wasm32-unknown-unknown` + wasm-bindgen-test-runner)
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use crate::components::editor::{mirror_to_input, EditorEngine, TextareaEngine};
    use leptos::prelude::document;
    use std::cell::Cell;
    use std::rc::Rc;
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn make_input() -> web_sys::HtmlInputElement {
        document()
            .create_element("input")
            .unwrap()
            .dyn_into()
            .unwrap()
    }

    fn make_textarea() -> web_sys::HtmlTextAreaElement {
        document()
            .create_element("textarea")
            .unwrap()
            .dyn_into()
            .unwrap()
    }

    #[wasm_bindgen_test]
    fn test_clear_mirrors_empty_value_and_notifies_exactly_once() {
        let input = make_input();
        input.set_value("seeded draft");

        let engine = TextareaEngine::attach(make_textarea(), &input.value());
        assert_eq!(engine.value(), "seeded draft");

        let notifications = Rc::new(Cell::new(0u32));
        let n2 = notifications.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::Event| {
            n2.set(n2.get() + 1);
        }) as Box<dyn FnMut(web_sys::Event)>);
        input
            .add_event_listener_with_callback("input", cb.as_ref().unchecked_ref())
            .unwrap();

        engine.set_value("");
        mirror_to_input(&engine, &input);

        assert_eq!(input.value(), "");
        assert_eq!(notifications.get(), 1);
        cb.forget();
    }

    #[wasm_bindgen_test]
    fn test_mirrored_notification_bubbles_like_user_input() {
        let parent = document().create_element("div").unwrap();
        let input = make_input();
        parent.append_child(&input).unwrap();
        document().body().unwrap().append_child(&parent).unwrap();

        let seen = Rc::new(Cell::new(0u32));
        let s2 = seen.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::Event| {
            s2.set(s2.get() + 1);
        }) as Box<dyn FnMut(web_sys::Event)>);
        parent
            .add_event_listener_with_callback("input", cb.as_ref().unchecked_ref())
            .unwrap();

        let engine = TextareaEngine::attach(make_textarea(), "typed content");
        mirror_to_input(&engine, &input);

        assert_eq!(input.value(), "typed content");
        assert_eq!(seen.get(), 1);
        cb.forget();
        parent.remove();
    }
}
