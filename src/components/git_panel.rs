use crate::models::{BranchStatus, RepoStatus};
use crate::state::AppContext;
use leptos::ev;
use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dom::helpers::window_event_listener;
use wasm_bindgen::JsCast;

/// Panel lifecycle. `Loading` doubles as the re-entrancy guard: while a fetch
/// is in flight, further trigger clicks are ignored, so two rapid clicks
/// cannot issue two requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PanelState {
    Idle,
    Loading,
    Loaded { open: bool },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ClickAction {
    Fetch,
    Open,
    Close,
    Ignore,
}

pub(crate) fn on_trigger_click(state: PanelState) -> ClickAction {
    match state {
        PanelState::Idle => ClickAction::Fetch,
        PanelState::Loading => ClickAction::Ignore,
        PanelState::Loaded { open: true } => ClickAction::Close,
        PanelState::Loaded { open: false } => ClickAction::Open,
    }
}

/// Forced close (outside click). A loaded panel keeps its cache; an in-flight
/// fetch keeps running and will still open the panel when it resolves.
pub(crate) fn close(state: PanelState) -> PanelState {
    match state {
        PanelState::Loaded { .. } => PanelState::Loaded { open: false },
        other => other,
    }
}

/// Badge text for an ahead/behind count. Absent and zero counts both render
/// no badge; zero is indistinguishable from absent on the wire.
pub(crate) fn count_badge(count: Option<u32>, sign: char) -> Option<String> {
    match count {
        Some(n) if n > 0 => Some(format!("{sign}{n}")),
        _ => None,
    }
}

fn ahead_badge(count: Option<u32>) -> impl IntoView {
    count_badge(count, '+')
        .map(|text| view! { <span class="badge badge-xs badge-warning">{text}</span> })
}

fn behind_badge(count: Option<u32>) -> impl IntoView {
    count_badge(count, '-')
        .map(|text| view! { <span class="badge badge-xs badge-error">{text}</span> })
}

fn branch_row(b: BranchStatus) -> impl IntoView {
    view! {
        <li>
            <div class="flex items-center justify-between">
                <span class="font-mono text-xs">{b.branch}</span>
                <div class="flex gap-1">
                    {ahead_badge(b.ahead)}
                    {behind_badge(b.behind)}
                </div>
            </div>
        </li>
    }
}

/// Lazy-loaded repository status dropdown.
///
/// First trigger click issues the one and only fetch; afterwards the cached
/// status is toggled open/closed with no further requests. A failed fetch is
/// logged to the console and leaves the panel `Idle`, so the next click
/// retries.
#[component]
pub fn GitStatusPanel(#[prop(optional, into)] project_path: String) -> impl IntoView {
    let app_state = expect_context::<AppContext>();

    let state: RwSignal<PanelState> = RwSignal::new(PanelState::Idle);
    let status: RwSignal<Option<RepoStatus>> = RwSignal::new(None);

    let root_ref: NodeRef<html::Div> = NodeRef::new();

    let load_git_info = move || {
        state.set(PanelState::Loading);

        // Read the path attribute now, not at mount: the server may rewrite
        // it after attach and the fetch must see the current value.
        let project = root_ref
            .get_untracked()
            .and_then(|el| el.get_attribute("data-project-path"))
            .filter(|p| !p.is_empty());

        let api_client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            match api_client.get_repo_status(project.as_deref()).await {
                Ok(info) => {
                    status.set(Some(info));
                    state.set(PanelState::Loaded { open: true });
                }
                Err(e) => {
                    web_sys::console::error_1(&format!("Failed to load git info: {e}").into());
                    state.set(PanelState::Idle);
                }
            }
        });
    };

    let on_trigger = move |_| match on_trigger_click(state.get_untracked()) {
        ClickAction::Fetch => load_git_info(),
        ClickAction::Open => state.set(PanelState::Loaded { open: true }),
        ClickAction::Close => state.set(PanelState::Loaded { open: false }),
        ClickAction::Ignore => {}
    };

    // Any pointer interaction outside the panel root forces it closed. One
    // window listener per instance, removed when the node is destroyed.
    let outside_click = window_event_listener(ev::click, move |ev: web_sys::MouseEvent| {
        let Some(root) = root_ref.get_untracked() else {
            return;
        };

        let inside = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::Node>().ok())
            .map(|n| root.contains(Some(&n)))
            .unwrap_or(false);

        if !inside {
            let now = state.get_untracked();
            let next = close(now);
            if next != now {
                state.set(next);
            }
        }
    });
    on_cleanup(move || outside_click.remove());

    let is_open = move || matches!(state.get(), PanelState::Loaded { open: true });
    let branch_name = move || {
        status
            .get()
            .map(|s| s.current_branch)
            .unwrap_or_default()
    };

    view! {
        <div class="relative" node_ref=root_ref data-project-path=project_path>
            <button
                id="git-dropdown-button"
                class="btn btn-ghost btn-sm gap-2 font-mono"
                on:click=on_trigger
            >
                <span id="git-branch-label" class="text-xs">{branch_name}</span>
            </button>

            <ul
                id="git-dropdown-menu"
                class="menu absolute right-0 z-50 mt-1 w-64 rounded-md border bg-card p-2 shadow-lg"
                style=move || if is_open() { "display: block" } else { "display: none" }
            >
                {move || {
                    status.get().map(|info| {
                        let others = info.other_branches.clone();
                        view! {
                            <li>
                                <div class="flex items-center justify-between">
                                    <span id="git-current-branch" class="font-mono text-xs font-semibold">
                                        {info.current_branch.clone()}
                                    </span>
                                    <div class="flex gap-1">
                                        <span id="git-commits-ahead">{ahead_badge(info.commits_ahead)}</span>
                                        <span id="git-commits-behind">{behind_badge(info.commits_behind)}</span>
                                    </div>
                                </div>
                            </li>
                            <div id="git-other-branches">
                                {(!others.is_empty()).then(|| view! {
                                    <li class="menu-title mt-2">"Other Branches"</li>
                                    {others.into_iter().map(branch_row).collect_view()}
                                })}
                            </div>
                        }
                    })
                }}
            </ul>
        </div>
    }
}
