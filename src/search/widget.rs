use crate::api::ApiClient;
use crate::components::hooks::use_random::use_random_id_for;
use crate::components::hooks::use_scroll_end::use_scroll_end;
use crate::components::ui::Spinner;
use crate::i18n::Locale;
use crate::models::UserOption;
use crate::search::{
    merge_page, next_page_to_load, plan_fetch, results_after_failure, should_query, Debounce,
    FetchPlan, RemoteSource, RequestGuard, SearchCache, SearchPage, UserSearchSource,
    SEARCH_DEBOUNCE_MS,
};
use icons::{Search, User};
use leptos::logging::warn;
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

/// Pixels from the bottom of the result list at which the next page is requested.
const LOAD_MORE_THRESHOLD_PX: i32 = 24;

/// Searchable user picker backed by the user-search endpoint.
///
/// The chosen user's id is written to a hidden input named `name`, so the
/// surrounding server-rendered form posts it like the `<select>` it replaces.
#[component]
pub(crate) fn UserSelect(
    client: ApiClient,
    #[prop(into)] name: String,
    locale: Locale,
) -> impl IntoView {
    let source = UserSearchSource;
    let client = StoredValue::new(client);
    let cache: StoredValue<SearchCache<UserOption>> = StoredValue::new(SearchCache::default());

    let term: RwSignal<String> = RwSignal::new(String::new());
    let open: RwSignal<bool> = RwSignal::new(false);
    let results: RwSignal<Vec<UserOption>> = RwSignal::new(vec![]);
    let more: RwSignal<bool> = RwSignal::new(false);
    let current_page: RwSignal<u32> = RwSignal::new(1);
    let loading: RwSignal<bool> = RwSignal::new(false);
    // True once a response for the current term has arrived; gates the no-results row.
    let answered: RwSignal<bool> = RwSignal::new(false);
    let highlighted: RwSignal<usize> = RwSignal::new(0);
    let selected: RwSignal<Option<UserOption>> = RwSignal::new(None);

    // Guards: newest request wins, only the last debounced term is fetched.
    let request_guard: RwSignal<RequestGuard> = RwSignal::new(RequestGuard::default());
    let debounce: StoredValue<Debounce> = StoredValue::new(Debounce::default());
    let debounce_timer: RwSignal<Option<i32>> = RwSignal::new(None);

    let listbox_id = use_random_id_for("listbox");

    let apply_page = move |page: SearchPage<UserOption>| {
        if page.page <= 1 {
            highlighted.set(0);
        }
        results.set(merge_page(&results.get_untracked(), &page));
        more.set(page.more);
        current_page.set(page.page);
        answered.set(true);
    };

    let fetch_page = move |q: String, page: Option<u32>| {
        let query = source.build_query(&q, page);
        request_guard.update(|g| g.advance());
        let my_id = request_guard.get_untracked().latest();

        let query = match cache.with_value(|c| plan_fetch(c, query)) {
            FetchPlan::Cached(hit) => {
                loading.set(false);
                apply_page(hit);
                return;
            }
            FetchPlan::Network(query) => query,
        };

        loading.set(true);
        let api = client.get_value();
        spawn_local(async move {
            let res = api.search_users(&query).await;

            // A newer keystroke or page request superseded this one.
            if !request_guard.get_untracked().is_current(my_id) {
                return;
            }

            match res {
                Ok(raw) => {
                    let mapped = source.map_response(raw, Some(query.page));
                    cache.update_value(|c| c.insert(query, mapped.clone()));
                    apply_page(mapped);
                }
                Err(e) => {
                    warn!("user search failed for {:?}: {e}", query);
                    results.set(results_after_failure(&results.get_untracked(), query.page));
                    more.set(false);
                    answered.set(true);
                }
            }
            loading.set(false);
        });
    };

    let cancel_debounce = move || {
        debounce.update_value(|d| d.cancel());
        if let Some(tid) = debounce_timer.get_untracked() {
            window().clear_timeout_with_handle(tid);
        }
        debounce_timer.set(None);
    };

    let on_input = move |ev: web_sys::Event| {
        let value = event_target_value(&ev);
        term.set(value.clone());
        open.set(true);
        cancel_debounce();
        // Whatever is in flight belongs to the previous term.
        request_guard.update(|g| g.advance());

        if !should_query(&value) {
            results.set(vec![]);
            more.set(false);
            loading.set(false);
            answered.set(false);
            return;
        }

        let mut generation = 0;
        debounce.update_value(|d| generation = d.schedule(value));
        let cb = Closure::once_into_js(move || {
            debounce_timer.set(None);
            let mut fired = None;
            debounce.update_value(|d| fired = d.fire(generation));
            if let Some(q) = fired {
                fetch_page(q, None);
            }
        });
        let tid = window()
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                cb.as_ref().unchecked_ref(),
                SEARCH_DEBOUNCE_MS,
            )
            .ok();
        debounce_timer.set(tid);
    };

    let load_more = Callback::new(move |_| {
        let next = next_page_to_load(
            loading.get_untracked(),
            more.get_untracked(),
            current_page.get_untracked(),
        );
        if let Some(page) = next {
            fetch_page(term.get_untracked(), Some(page));
        }
    });
    let on_scroll = use_scroll_end(LOAD_MORE_THRESHOLD_PX, load_more);

    let choose = move |user: UserOption| {
        selected.set(Some(user));
        open.set(false);
    };

    let on_keydown = move |ev: web_sys::KeyboardEvent| {
        let count = results.get_untracked().len();
        match ev.key().as_str() {
            "ArrowDown" => {
                ev.prevent_default();
                open.set(true);
                if count > 0 {
                    highlighted.update(|i| *i = (*i + 1).min(count - 1));
                }
            }
            "ArrowUp" => {
                ev.prevent_default();
                highlighted.update(|i| *i = i.saturating_sub(1));
            }
            "Enter" => {
                // Never let Enter submit the host form from inside the picker.
                ev.prevent_default();
                if !open.get_untracked() {
                    return;
                }
                if let Some(user) = results.get_untracked().get(highlighted.get_untracked()) {
                    choose(user.clone());
                }
            }
            "Escape" => {
                open.set(false);
            }
            _ => {}
        }
    };

    let display_value = move || {
        if open.get() {
            term.get()
        } else {
            selected.get().map(|u| u.text).unwrap_or_default()
        }
    };

    let show_no_results = move || {
        answered.get() && !loading.get() && results.get().is_empty() && should_query(&term.get())
    };

    let listbox_for_input = listbox_id.clone();

    view! {
        <div data-name="UserSelect" class="relative w-full">
            <input type="hidden" name=name prop:value=move || selected.get().map(|u| u.id).unwrap_or_default() />

            <div class="relative">
                <span class="pointer-events-none absolute left-3 top-1/2 -translate-y-1/2 text-muted-foreground">
                    <User class="size-4" />
                </span>
                <input
                    type="text"
                    role="combobox"
                    autocomplete="off"
                    aria-expanded=move || open.get().to_string()
                    aria-controls=listbox_for_input
                    class="border-input flex h-9 w-full rounded-md border bg-transparent pl-9 pr-3 py-1 text-sm shadow-xs outline-none placeholder:text-muted-foreground focus-visible:border-ring focus-visible:ring-2 focus-visible:ring-ring/50"
                    placeholder=locale.search_placeholder()
                    prop:value=display_value
                    on:focus=move |_| open.set(true)
                    on:blur=move |_| open.set(false)
                    on:input=on_input
                    on:keydown=on_keydown
                />
            </div>

            <ul
                id=listbox_id
                role="listbox"
                class="absolute z-50 mt-1 max-h-60 w-full overflow-y-auto rounded-md border bg-popover p-1 text-popover-foreground shadow-md"
                class:hidden=move || !open.get() || !should_query(&term.get())
                on:scroll=on_scroll
            >
                {move || {
                    results
                        .get()
                        .into_iter()
                        .enumerate()
                        .map(|(i, user)| {
                            let label = user.text.clone();
                            view! {
                                <li
                                    role="option"
                                    aria-selected=move || (highlighted.get() == i).to_string()
                                    class="flex cursor-pointer items-center gap-2 rounded-sm px-2 py-1.5 text-sm hover:bg-accent hover:text-accent-foreground aria-selected:bg-accent"
                                    on:mouseenter=move |_| highlighted.set(i)
                                    // mousedown fires before the input's blur; keep focus until chosen.
                                    on:mousedown=move |ev: web_sys::MouseEvent| {
                                        ev.prevent_default();
                                        choose(user.clone());
                                    }
                                >
                                    <User class="size-4 text-muted-foreground" />
                                    <span class="truncate">{label}</span>
                                </li>
                            }
                        })
                        .collect_view()
                }}

                <Show when=move || loading.get() fallback=|| ().into_view()>
                    <li class="flex items-center gap-2 px-2 py-1.5 text-xs text-muted-foreground">
                        <Spinner />
                        {move || {
                            if results.get().is_empty() {
                                locale.searching()
                            } else {
                                locale.loading_more()
                            }
                        }}
                    </li>
                </Show>

                <Show when=show_no_results fallback=|| ().into_view()>
                    <li class="flex items-center gap-2 px-2 py-1.5 text-xs text-muted-foreground">
                        <Search class="size-4" />
                        {locale.no_results()}
                    </li>
                </Show>
            </ul>
        </div>
    }
}
