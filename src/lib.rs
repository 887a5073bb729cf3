mod api;
mod components;
mod config;
mod editor;
mod i18n;
mod models;
mod search;
mod upload;

pub use config::EnvConfig;
pub use i18n::Locale;

use crate::api::ApiClient;
use crate::editor::HtmlEditor;
use crate::search::UserSelect;
use leptos::logging::{log, warn};
use leptos::mount::mount_to;
use leptos::prelude::*;
use wasm_bindgen::JsCast;

// Needed for `#[wasm_bindgen]` exports on the wasm build.
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::wasm_bindgen;

/// Form field name used when the host element does not provide one.
const DEFAULT_FIELD_NAME: &str = "user";

/// Mount a user picker into every element matching `selector`.
///
/// A matched `<select>` is hidden and loses its `name`; the picker is inserted
/// right after it and posts the chosen id under that name instead. Any other
/// element is used as the container and may carry the field name in `data-name`.
///
/// Returns the number of pickers mounted.
pub fn mount_user_selects(selector: &str, config: &EnvConfig) -> usize {
    let Some(doc) = web_sys::window().and_then(|w| w.document()) else {
        return 0;
    };
    let nodes = match doc.query_selector_all(selector) {
        Ok(nodes) => nodes,
        Err(_) => {
            warn!("invalid user picker selector {selector:?}");
            return 0;
        }
    };

    let client = ApiClient::from_config(config);
    let locale = config.locale;
    let mut mounted = 0;

    for i in 0..nodes.length() {
        let Some(el) = nodes
            .item(i)
            .and_then(|n| n.dyn_into::<web_sys::HtmlElement>().ok())
        else {
            continue;
        };
        let Some((host, name)) = prepare_select_host(&doc, el) else {
            continue;
        };

        let client = client.clone();
        mount_to(host, move || {
            view! { <UserSelect client=client name=name locale=locale /> }
        })
        .forget();
        mounted += 1;
    }

    mounted
}

fn prepare_select_host(
    doc: &web_sys::Document,
    el: web_sys::HtmlElement,
) -> Option<(web_sys::HtmlElement, String)> {
    if !el.tag_name().eq_ignore_ascii_case("select") {
        let name = el
            .get_attribute("data-name")
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_FIELD_NAME.to_string());
        return Some((el, name));
    }

    let name = el
        .get_attribute("name")
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_FIELD_NAME.to_string());

    let host: web_sys::HtmlElement = doc.create_element("div").ok()?.dyn_into().ok()?;
    el.after_with_node_1(&host).ok()?;
    el.set_hidden(true);
    let _ = el.remove_attribute("name");

    Some((host, name))
}

/// Mount the HTML editor into the first element matching `selector`.
///
/// The element's `data-initial` attribute, when present, seeds the buffer.
pub fn mount_html_editor(selector: &str, config: &EnvConfig) -> bool {
    let Some(doc) = web_sys::window().and_then(|w| w.document()) else {
        return false;
    };
    let Some(root) = doc
        .query_selector(selector)
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok())
    else {
        return false;
    };

    let initial = root.get_attribute("data-initial").unwrap_or_default();
    let client = ApiClient::from_config(config);
    let locale = config.locale;
    let (max_rows, max_cols) = (config.max_table_rows, config.max_table_cols);

    mount_to(root, move || {
        view! {
            <HtmlEditor
                client=client
                locale=locale
                initial=initial
                max_table_rows=max_rows
                max_table_cols=max_cols
            />
        }
    })
    .forget();

    true
}

/// JS entry for pages that add picker elements after load.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = mountUserSelects)]
pub fn mount_user_selects_js(selector: &str) -> usize {
    mount_user_selects(selector, &EnvConfig::load())
}

/// JS entry for pages that render the editor root after load.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = mountHtmlEditor)]
pub fn mount_html_editor_js(selector: &str) -> bool {
    mount_html_editor(selector, &EnvConfig::load())
}

// WASM-only tests (run with `cargo test --target wasm32-unknown-unknown` + wasm-bindgen-test-runner)
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn append_to_body(html: &str) -> web_sys::HtmlElement {
        let doc = web_sys::window().unwrap().document().unwrap();
        let wrapper: web_sys::HtmlElement = doc.create_element("div").unwrap().dyn_into().unwrap();
        wrapper.set_inner_html(html);
        doc.body().unwrap().append_child(&wrapper).unwrap();
        wrapper
    }

    #[wasm_bindgen_test]
    fn test_mount_user_selects_into_containers() {
        let wrapper = append_to_body(
            r#"<div class="picker-a" data-name="grantee"></div><div class="picker-a"></div>"#,
        );

        let n = mount_user_selects(".picker-a", &EnvConfig::default());
        assert_eq!(n, 2);
        assert!(wrapper.query_selector("input[type=hidden][name=grantee]").unwrap().is_some());
        assert!(wrapper.query_selector("input[type=hidden][name=user]").unwrap().is_some());
    }

    #[wasm_bindgen_test]
    fn test_mount_user_selects_replaces_select() {
        let wrapper = append_to_body(r#"<select class="picker-b" name="user"></select>"#);

        assert_eq!(mount_user_selects(".picker-b", &EnvConfig::default()), 1);
        let select = wrapper.query_selector("select").unwrap().unwrap();
        assert!(select.get_attribute("name").is_none());
        assert!(select.has_attribute("hidden"));
        assert!(wrapper.query_selector("input[type=hidden][name=user]").unwrap().is_some());
    }

    #[wasm_bindgen_test]
    fn test_mount_user_selects_with_bad_selector() {
        assert_eq!(mount_user_selects("[[", &EnvConfig::default()), 0);
    }

    #[wasm_bindgen_test]
    fn test_mount_html_editor_renders_contract_ids() {
        let wrapper =
            append_to_body(r#"<div id="editor-under-test" data-initial="<b>hi</b>"></div>"#);

        assert!(mount_html_editor("#editor-under-test", &EnvConfig::default()));
        for id in ["text-editor", "html-preview", "document-title", "table-rows", "table-cols"] {
            let found = wrapper.query_selector(&format!("#{id}")).unwrap();
            assert!(found.is_some(), "missing #{id}");
        }
    }

    #[wasm_bindgen_test]
    fn test_direct_edit_refreshes_preview() {
        let wrapper = append_to_body(r#"<div id="editor-live"></div>"#);
        assert!(mount_html_editor("#editor-live", &EnvConfig::default()));

        let textarea: web_sys::HtmlTextAreaElement = wrapper
            .query_selector("#text-editor")
            .unwrap()
            .unwrap()
            .dyn_into()
            .unwrap();
        let preview = wrapper.query_selector("#html-preview").unwrap().unwrap();

        textarea.set_value("<p>Hello <em>there</em></p>");
        let ev = web_sys::Event::new("input").unwrap();
        textarea.dispatch_event(&ev).unwrap();

        assert_eq!(preview.inner_html(), "<p>Hello <em>there</em></p>");
    }

    #[wasm_bindgen_test]
    fn test_resize_matches_preview_height_to_textarea() {
        let wrapper = append_to_body(r#"<div id="editor-resize"></div>"#);
        assert!(mount_html_editor("#editor-resize", &EnvConfig::default()));

        let textarea: web_sys::HtmlElement = wrapper
            .query_selector("#text-editor")
            .unwrap()
            .unwrap()
            .dyn_into()
            .unwrap();
        let preview: web_sys::HtmlElement = wrapper
            .query_selector("#html-preview")
            .unwrap()
            .unwrap()
            .dyn_into()
            .unwrap();
        textarea.style().set_property("height", "321px").unwrap();

        let win = web_sys::window().unwrap();
        win.dispatch_event(&web_sys::Event::new("resize").unwrap()).unwrap();

        let expected = format!("{}px", textarea.offset_height());
        assert_eq!(preview.style().get_property_value("height").unwrap(), expected);
    }

    #[wasm_bindgen_test]
    fn test_mount_html_editor_missing_root() {
        assert!(!mount_html_editor("#does-not-exist", &EnvConfig::default()));
    }
}

// Only register the WASM start function for normal builds (not for tests),
// otherwise wasm-bindgen-test will end up with multiple entry symbols.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();

    let config = EnvConfig::load();
    let pickers = mount_user_selects(&config.user_select, &config);
    let editor = mount_html_editor(&config.editor_root, &config);
    log!("docflow: mounted {pickers} user picker(s), editor: {editor}");
}
