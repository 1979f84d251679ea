use crate::state::AppContext;
use leptos::html;
use leptos::prelude::*;

/// Narrow capability surface of a text-editing engine. The bridge depends on
/// this interface, not on a concrete editor widget, so the engine can be
/// swapped without touching the mirroring logic.
pub(crate) trait EditorEngine {
    /// Serialized content of the engine's live buffer.
    fn value(&self) -> String;

    /// Replace the buffer content in place; the engine stays attached
    /// (toolbar and session state survive).
    fn set_value(&self, text: &str);
}

/// Plain-text engine backed by a `<textarea>` editing surface.
pub(crate) struct TextareaEngine {
    el: web_sys::HtmlTextAreaElement,
}

impl TextareaEngine {
    /// Wrap an already-seeded surface.
    pub fn new(el: web_sys::HtmlTextAreaElement) -> Self {
        Self { el }
    }

    /// Attach to a surface, seeding it with the bound input's current value.
    pub fn attach(el: web_sys::HtmlTextAreaElement, seed: &str) -> Self {
        el.set_value(seed);
        Self { el }
    }
}

impl EditorEngine for TextareaEngine {
    fn value(&self) -> String {
        self.el.value()
    }

    fn set_value(&self, text: &str) {
        self.el.set_value(text);
    }
}

/// Copy the engine's serialized content into the bound input and synthesize a
/// bubbling `input` event on it, so downstream value observers see the change
/// exactly as if the user had typed into the input directly.
pub(crate) fn mirror_to_input(engine: &impl EditorEngine, input: &web_sys::HtmlInputElement) {
    input.set_value(&engine.value());

    let init = web_sys::EventInit::new();
    init.set_bubbles(true);
    if let Ok(ev) = web_sys::Event::new_with_event_init_dict("input", &init) {
        let _ = input.dispatch_event(&ev);
    }
}

/// Editor bridge: a hidden bound input mirrored from an engine surface.
///
/// On mount the engine is seeded from the input's current value (empty if
/// none). Every engine change re-mirrors and notifies. The inbound
/// `clear-editor` command resets the content to the empty string without
/// detaching the engine.
#[component]
pub fn MarkdownEditor(
    #[prop(optional, into)] id: String,
    #[prop(optional, into)] value: String,
) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let session = app_state.0.session;

    let input_ref: NodeRef<html::Input> = NodeRef::new();
    let textarea_ref: NodeRef<html::Textarea> = NodeRef::new();

    // Attach exactly once, when both nodes exist. Bound is terminal until
    // node removal; clears are content resets, not reattachments.
    let attached: StoredValue<bool> = StoredValue::new(false);
    Effect::new(move |_| {
        let (Some(input), Some(area)) = (input_ref.get(), textarea_ref.get()) else {
            return;
        };
        if attached.get_value() {
            return;
        }
        attached.set_value(true);

        let _ = TextareaEngine::attach(area, &input.value());
    });

    // Handler reads through the NodeRefs at dispatch time. It is removed
    // again on cleanup, before the NodeRef arena slots are disposed, so a
    // destroyed instance can never be dispatched to.
    let clear_handler = session.on_command("clear-editor", move |_| {
        let (Some(input), Some(area)) =
            (input_ref.get_untracked(), textarea_ref.get_untracked())
        else {
            return;
        };

        let engine = TextareaEngine::new(area);
        engine.set_value("");
        mirror_to_input(&engine, &input);
    });
    on_cleanup(move || session.off_command("clear-editor", clear_handler));

    let on_surface_input = move |_| {
        let (Some(input), Some(area)) =
            (input_ref.get_untracked(), textarea_ref.get_untracked())
        else {
            return;
        };

        let engine = TextareaEngine::new(area);
        mirror_to_input(&engine, &input);
    };

    view! {
        <div class="flex flex-col gap-2">
            <textarea
                class="min-h-[160px] w-full rounded-md border bg-background p-3 font-mono text-sm"
                node_ref=textarea_ref
                on:input=on_surface_input
            ></textarea>
            <input type="hidden" id=id value=value node_ref=input_ref />
        </div>
    }
}
