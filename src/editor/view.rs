use crate::api::ApiClient;
use crate::components::ui::{Button, ButtonSize, ButtonVariant, Input, Label, Spinner};
use crate::config::DEFAULT_MAX_TABLE_DIM;
use crate::editor::{EditorBuffer, Selection, TableSize, TOOLBAR_TAGS};
use crate::i18n::Locale;
use crate::upload::Uploader;
use leptos::ev;
use leptos::html;
use leptos::prelude::*;
use leptos_dom::helpers::window_event_listener;

/// HTML source editor with a live preview pane and a "save as PDF" action.
///
/// Renders the element ids the document pages style against: `text-editor`,
/// `html-preview`, `document-title`, `table-rows`, `table-cols`.
#[component]
pub(crate) fn HtmlEditor(
    client: ApiClient,
    locale: Locale,
    #[prop(optional, into)] initial: String,
    #[prop(default = DEFAULT_MAX_TABLE_DIM)] max_table_rows: u32,
    #[prop(default = DEFAULT_MAX_TABLE_DIM)] max_table_cols: u32,
) -> impl IntoView {
    let buffer: RwSignal<String> = RwSignal::new(initial);
    let title: RwSignal<String> = RwSignal::new(String::new());
    let rows: RwSignal<String> = RwSignal::new("2".to_string());
    let cols: RwSignal<String> = RwSignal::new("2".to_string());

    let textarea_ref: NodeRef<html::Textarea> = NodeRef::new();
    let preview_ref: NodeRef<html::Div> = NodeRef::new();

    let uploader = Uploader::new(client, locale);
    let uploading = uploader.in_flight();

    // Preview is always the raw buffer parsed as HTML. No sanitising.
    let refresh_preview = move || {
        if let Some(preview) = preview_ref.get_untracked() {
            preview.set_inner_html(&buffer.get_untracked());
        }
    };

    let sync_height = move || {
        let (Some(textarea), Some(preview)) = (textarea_ref.get_untracked(), preview_ref.get_untracked())
        else {
            return;
        };
        // Inline style of the DOM node, not the view-builder `style` from the prelude.
        let preview: &web_sys::HtmlElement = preview.as_ref();
        let _ = preview
            .style()
            .set_property("height", &format!("{}px", textarea.offset_height()));
    };

    // Snapshot the textarea (value + UTF-16 selection) as a buffer.
    let read_buffer = move || -> Option<(web_sys::HtmlTextAreaElement, EditorBuffer)> {
        let el = textarea_ref.get_untracked()?;
        let text = el.value();
        let start = el.selection_start().ok().flatten().unwrap_or(0);
        let end = el.selection_end().ok().flatten().unwrap_or(start);
        let selection = Selection::from_utf16(&text, start, end);
        Some((el, EditorBuffer::new(text, selection)))
    };

    let commit = move |el: web_sys::HtmlTextAreaElement, buf: EditorBuffer| {
        el.set_value(&buf.text);
        let _ = el.focus();
        // selectionStart/End are in UTF-16 code units.
        let (start, end) = buf.selection.to_utf16(&buf.text);
        let _ = el.set_selection_range(start, end);
        buffer.set(buf.text);
        refresh_preview();
    };

    let wrap = move |tag: &str| {
        if let Some((el, mut buf)) = read_buffer() {
            buf.wrap_tag(tag);
            commit(el, buf);
        }
    };

    let insert_table = move || {
        let size = TableSize::parse(
            &rows.get_untracked(),
            &cols.get_untracked(),
            max_table_rows,
            max_table_cols,
        );
        if let Some((el, mut buf)) = read_buffer() {
            buf.insert_table(size, locale);
            commit(el, buf);
        }
    };

    let on_input = move |ev: web_sys::Event| {
        buffer.set(event_target_value(&ev));
        refresh_preview();
    };

    // Ctrl/Cmd + B / I / U wrap the selection like the toolbar does.
    let on_keydown = move |ev: web_sys::KeyboardEvent| {
        if !(ev.ctrl_key() || ev.meta_key()) || ev.alt_key() || ev.shift_key() {
            return;
        }
        let tag = match ev.key().to_lowercase().as_str() {
            "b" => "b",
            "i" => "i",
            "u" => "u",
            _ => return,
        };
        ev.prevent_default();
        wrap(tag);
    };

    let on_upload = move |_| {
        let content = buffer.get_untracked();
        uploader.submit(content, &title.get_untracked());
    };

    // Initial paint once both panes are mounted.
    Effect::new(move |_| {
        let (Some(textarea), Some(_)) = (textarea_ref.get(), preview_ref.get()) else {
            return;
        };
        textarea.set_value(&buffer.get_untracked());
        refresh_preview();
        sync_height();
    });

    let resize_handle = window_event_listener(ev::resize, move |_| sync_height());
    on_cleanup(move || resize_handle.remove());

    view! {
        <div data-name="HtmlEditor" class="flex flex-col gap-4">
            <div class="flex flex-wrap items-center gap-1" role="toolbar">
                {TOOLBAR_TAGS
                    .iter()
                    .copied()
                    .map(|tag| {
                        view! {
                            <Button
                                variant=ButtonVariant::Outline
                                size=ButtonSize::Tag
                                attr:title=format!("<{tag}>")
                                on:click=move |_| wrap(tag)
                            >
                                {tag}
                            </Button>
                        }
                    })
                    .collect_view()}
            </div>

            <div class="flex flex-wrap items-end gap-3">
                <div class="flex w-24 flex-col gap-1.5">
                    <Label html_for="table-rows">{locale.rows_label()}</Label>
                    <Input
                        id="table-rows"
                        r#type="number"
                        min="1"
                        max=max_table_rows.to_string()
                        bind_value=rows
                        class="h-8 text-sm"
                    />
                </div>
                <div class="flex w-24 flex-col gap-1.5">
                    <Label html_for="table-cols">{locale.cols_label()}</Label>
                    <Input
                        id="table-cols"
                        r#type="number"
                        min="1"
                        max=max_table_cols.to_string()
                        bind_value=cols
                        class="h-8 text-sm"
                    />
                </div>
                <Button variant=ButtonVariant::Outline size=ButtonSize::Sm on:click=move |_| insert_table()>
                    {locale.insert_table()}
                </Button>
            </div>

            <div class="grid grid-cols-1 gap-4 md:grid-cols-2">
                <textarea
                    id="text-editor"
                    class="min-h-80 w-full resize-y rounded-md border border-input bg-transparent p-3 font-mono text-sm shadow-xs outline-none focus-visible:border-ring focus-visible:ring-2 focus-visible:ring-ring/50"
                    spellcheck="false"
                    node_ref=textarea_ref
                    on:input=on_input
                    on:keydown=on_keydown
                    // Dragging the resize handle ends with a mouseup on the textarea.
                    on:mouseup=move |_| sync_height()
                ></textarea>

                <div class="flex flex-col gap-1.5">
                    <span class="text-xs text-muted-foreground md:hidden">{locale.preview()}</span>
                    <div
                        id="html-preview"
                        class="overflow-auto rounded-md border bg-card p-3 text-sm"
                        aria-label=locale.preview()
                        node_ref=preview_ref
                    ></div>
                </div>
            </div>

            <div class="flex flex-wrap items-center gap-3">
                <Input
                    id="document-title"
                    placeholder=locale.title_placeholder()
                    bind_value=title
                    class="max-w-sm"
                />
                <Button
                    variant=ButtonVariant::Success
                    attr:disabled=move || uploading.get()
                    on:click=on_upload
                >
                    <span class="inline-flex items-center gap-2">
                        <Show when=move || uploading.get() fallback=|| ().into_view()>
                            <Spinner />
                        </Show>
                        {move || if uploading.get() { locale.uploading() } else { locale.upload() }}
                    </span>
                </Button>
            </div>
        </div>
    }
}
