use leptos::prelude::*;

/// Hook for paging a scrollable list.
///
/// Returns the handler to attach to the scrollable element's `on:scroll`.
/// `on_end` runs every time the element is scrolled to within `threshold_px` of its bottom.
pub fn use_scroll_end(threshold_px: i32, on_end: Callback<()>) -> impl Fn(web_sys::Event) + Clone {
    move |ev: web_sys::Event| {
        let target = event_target::<web_sys::HtmlElement>(&ev);
        let near_end = is_near_end(
            target.scroll_top(),
            target.scroll_height(),
            target.client_height(),
            threshold_px,
        );
        if near_end {
            on_end.run(());
        }
    }
}

pub(crate) fn is_near_end(scroll_top: i32, scroll_height: i32, client_height: i32, threshold_px: i32) -> bool {
    scroll_top + client_height >= scroll_height - threshold_px.max(0)
}
