use crate::models::{DragItem, ReorderPayload, StartupEntry};
use crate::session::{OutboundEvent, Session};
use crate::state::AppContext;
use leptos::html;
use leptos::prelude::*;
use leptos_dom::helpers::request_animation_frame;
use tw_merge::tw_merge;
use wasm_bindgen::JsCast;

/// Move the entry at `from` so it ends up at insertion point `to`
/// (`to` counted in the pre-removal list, like a drop "before index to").
/// Out-of-range `from` leaves the list untouched.
pub(crate) fn apply_move<T>(xs: &mut Vec<T>, from: usize, to: usize) {
    if from >= xs.len() {
        return;
    }

    let item = xs.remove(from);
    let mut to = to.min(xs.len() + 1);
    if to > from {
        to -= 1;
    }
    xs.insert(to.min(xs.len()), item);
}

/// Arming state after a mousedown on a row. Only a press on the handle arms
/// the row; a press anywhere else clears whatever arming a previous,
/// released press left behind, so a drag can never start from the row body.
pub(crate) fn arm_for_press(on_handle: bool, path: &str) -> Option<String> {
    on_handle.then(|| path.to_string())
}

/// Resolve a drop into `(from, insertion-point)` positions in the current
/// list. `None` when the dragged id matches no row: foreign `text/plain`
/// drops neither reorder nor emit.
pub(crate) fn resolve_drop(
    xs: &[StartupEntry],
    dragged: &str,
    target: &str,
    insert_after: bool,
) -> Option<(usize, usize)> {
    let from = xs.iter().position(|e| e.path == dragged)?;
    let mut to = xs.iter().position(|e| e.path == target)?;
    if insert_after {
        to += 1;
    }
    Some((from, to))
}

/// Items for the `reorder` payload: each path paired with its 0-based
/// position in final order.
pub(crate) fn drag_items(paths: &[String]) -> Vec<DragItem> {
    paths
        .iter()
        .enumerate()
        .map(|(index, path)| DragItem {
            path: path.clone(),
            index,
        })
        .collect()
}

/// Reads child `data-path` attributes in current DOM order, plus the
/// container's `data-project`, and pushes one `reorder` event. Both
/// attributes are read here, at emission time, so rewrites after mount are
/// honored. Fire-and-forget; DOM order is already the source of truth.
fn emit_reorder(session: Session, container: &web_sys::Element) {
    let children = container.children();
    let mut paths: Vec<String> = Vec::with_capacity(children.length() as usize);
    for i in 0..children.length() {
        if let Some(path) = children.item(i).and_then(|c| c.get_attribute("data-path")) {
            paths.push(path);
        }
    }

    let payload = ReorderPayload {
        items: drag_items(&paths),
        project: container.get_attribute("data-project").unwrap_or_default(),
    };

    let Ok(payload) = serde_json::to_value(payload) else {
        return;
    };
    session.push(OutboundEvent::Reorder, payload);
}

/// Pointer-driven reordering of startup entries.
///
/// Dragging may only start from the `.drag-handle` element inside a row
/// (mousedown on the handle arms the row; dragstart elsewhere is cancelled).
/// The moving row carries a transient `opacity-50` marker until drop/end.
#[component]
pub fn StartupList(
    items: RwSignal<Vec<StartupEntry>>,
    #[prop(into)] project: String,
    #[prop(optional, into)] class: String,
) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let session = app_state.0.session;

    let container_ref: NodeRef<html::Ul> = NodeRef::new();

    // Path of the row currently being dragged (drives the ghost marker).
    let dragging: RwSignal<Option<String>> = RwSignal::new(None);
    // Row armed by a mousedown on its handle; only armed rows may start a drag.
    let armed: RwSignal<Option<String>> = RwSignal::new(None);

    let list_class = tw_merge!("flex flex-col gap-1", class);

    view! {
        <ul class=list_class node_ref=container_ref data-project=project>
            <For
                each=move || items.get()
                key=|entry| entry.path.clone()
                children=move |entry: StartupEntry| {
                    let path = entry.path.clone();
                    let label = if entry.label.is_empty() {
                        entry.path.clone()
                    } else {
                        entry.label.clone()
                    };

                    let path_for_class = path.clone();
                    let path_for_arm = path.clone();
                    let path_for_start = path.clone();
                    let path_for_drop = path.clone();

                    view! {
                        <li
                            class=move || {
                                let base = "flex items-center gap-2 rounded-md border px-3 py-2 text-sm";
                                if dragging.get().as_deref() == Some(path_for_class.as_str()) {
                                    format!("{base} opacity-50")
                                } else {
                                    base.to_string()
                                }
                            }
                            draggable="true"
                            data-path=path.clone()
                            on:mousedown=move |ev: web_sys::MouseEvent| {
                                let on_handle = ev
                                    .target()
                                    .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
                                    .and_then(|el| el.closest(".drag-handle").ok().flatten())
                                    .is_some();
                                armed.set(arm_for_press(on_handle, &path_for_arm));
                            }
                            on:dragstart=move |ev: web_sys::DragEvent| {
                                if armed.get_untracked().as_deref() != Some(path_for_start.as_str()) {
                                    ev.prevent_default();
                                    return;
                                }
                                if let Some(dt) = ev.data_transfer() {
                                    let _ = dt.set_data("text/plain", &path_for_start);
                                    dt.set_drop_effect("move");
                                }
                                dragging.set(Some(path_for_start.clone()));
                            }
                            on:dragover=move |ev: web_sys::DragEvent| {
                                ev.prevent_default();
                                if let Some(dt) = ev.data_transfer() {
                                    dt.set_drop_effect("move");
                                }
                            }
                            on:drop=move |ev: web_sys::DragEvent| {
                                ev.prevent_default();
                                dragging.set(None);
                                armed.set(None);

                                let dragged = ev
                                    .data_transfer()
                                    .and_then(|dt| dt.get_data("text/plain").ok())
                                    .unwrap_or_default();
                                if dragged.trim().is_empty() || dragged == path_for_drop {
                                    return;
                                }

                                // Before/after decided by cursor position inside the target row.
                                let insert_after = ev
                                    .current_target()
                                    .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
                                    .map(|el| el.get_bounding_client_rect())
                                    .map(|rect| {
                                        let mid = rect.top() + rect.height() / 2.0;
                                        (ev.client_y() as f64) >= mid
                                    })
                                    .unwrap_or(true);

                                let target = path_for_drop.clone();
                                let resolved = items.with_untracked(|xs| {
                                    resolve_drop(xs, &dragged, &target, insert_after)
                                });
                                let Some((from, to)) = resolved else {
                                    return;
                                };
                                items.update(|xs| apply_move(xs, from, to));

                                // Emit after the DOM has settled into final order.
                                request_animation_frame(move || {
                                    if let Some(ul) = container_ref.get_untracked() {
                                        emit_reorder(session, &ul);
                                    }
                                });
                            }
                            on:dragend=move |_| {
                                dragging.set(None);
                                armed.set(None);
                            }
                        >
                            <span class="drag-handle cursor-grab select-none text-muted-foreground">
                                "⋮⋮"
                            </span>
                            <span class="font-mono text-xs">{label}</span>
                        </li>
                    }
                }
            />
        </ul>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(paths: &[&str]) -> Vec<String> {
        paths.iter().map(|p| p.to_string()).collect()
    }

    fn rows(paths: &[&str]) -> Vec<StartupEntry> {
        paths
            .iter()
            .map(|p| StartupEntry {
                path: p.to_string(),
                label: String::new(),
            })
            .collect()
    }

    #[test]
    fn test_press_on_handle_arms_row() {
        assert_eq!(arm_for_press(true, "lib/a.ex"), Some("lib/a.ex".to_string()));
    }

    #[test]
    fn test_body_press_after_aborted_handle_press_disarms() {
        // Handle press, release without dragging, then a press on the row
        // body: the second press must clear the stale arming, otherwise a
        // drag could start from outside the handle.
        let mut armed = arm_for_press(true, "lib/a.ex");
        assert_eq!(armed.as_deref(), Some("lib/a.ex"));

        armed = arm_for_press(false, "lib/a.ex");
        assert_eq!(armed, None);
    }

    #[test]
    fn test_resolve_drop_before_and_after_target() {
        let xs = rows(&["a", "b", "c"]);
        assert_eq!(resolve_drop(&xs, "a", "c", false), Some((0, 2)));
        assert_eq!(resolve_drop(&xs, "a", "c", true), Some((0, 3)));
    }

    #[test]
    fn test_resolve_drop_foreign_payload_is_rejected() {
        // Text dragged in from outside the list (a URL, a selection) matches
        // no row; it must neither reorder nor reach the emit path.
        let xs = rows(&["a", "b"]);
        assert_eq!(resolve_drop(&xs, "https://example.com", "b", true), None);
    }

    #[test]
    fn test_apply_move_forward() {
        let mut xs = entries(&["a", "b", "c", "d"]);
        // Drop "a" after "c" (insertion point 3 in the pre-removal list).
        apply_move(&mut xs, 0, 3);
        assert_eq!(xs, entries(&["b", "c", "a", "d"]));
    }

    #[test]
    fn test_apply_move_backward() {
        let mut xs = entries(&["a", "b", "c", "d"]);
        apply_move(&mut xs, 3, 1);
        assert_eq!(xs, entries(&["a", "d", "b", "c"]));
    }

    #[test]
    fn test_apply_move_to_end() {
        let mut xs = entries(&["a", "b", "c"]);
        apply_move(&mut xs, 0, 3);
        assert_eq!(xs, entries(&["b", "c", "a"]));
    }

    #[test]
    fn test_apply_move_same_position_is_noop() {
        let mut xs = entries(&["a", "b", "c"]);
        apply_move(&mut xs, 1, 1);
        assert_eq!(xs, entries(&["a", "b", "c"]));
    }

    #[test]
    fn test_apply_move_out_of_range_from_is_noop() {
        let mut xs = entries(&["a", "b"]);
        apply_move(&mut xs, 5, 0);
        assert_eq!(xs, entries(&["a", "b"]));
    }

    #[test]
    fn test_drag_items_indices_are_a_permutation() {
        let paths = entries(&["x", "y", "z"]);
        let items = drag_items(&paths);
        let mut indices: Vec<usize> = items.iter().map(|i| i.index).collect();
        indices.sort_unstable();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(items[0].path, "x");
        assert_eq!(items[2].path, "z");
    }

    #[test]
    fn test_drag_items_empty_list() {
        assert!(drag_items(&[]).is_empty());
    }

    #[test]
    fn test_drag_items_follow_moved_order() {
        let mut paths = entries(&["a", "b", "c", "d"]);
        apply_move(&mut paths, 0, 3);
        let items = drag_items(&paths);
        let got: Vec<(&str, usize)> = items.iter().map(|i| (i.path.as_str(), i.index)).collect();
        assert_eq!(got, vec![("b", 0), ("c", 1), ("a", 2), ("d", 3)]);
    }
}
