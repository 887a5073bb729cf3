use crate::i18n::Locale;
use serde::{Deserialize, Serialize};
use wasm_bindgen::JsCast;

pub(crate) const DEFAULT_SEARCH_URL: &str = "/documents/user-search/";
pub(crate) const DEFAULT_UPLOAD_URL: &str = "/documents/upload/";
pub(crate) const DEFAULT_USER_SELECT: &str = ".user-select";
pub(crate) const DEFAULT_EDITOR_ROOT: &str = "#html-editor";
pub(crate) const DEFAULT_MAX_TABLE_DIM: u32 = 50;
/// Ceiling for configured table bounds; `window.ENV` cannot raise it.
pub(crate) const TABLE_DIM_LIMIT: u32 = 200;

const CSRF_COOKIE: &str = "csrftoken";

/// Page-level settings injected by the host template through `window.ENV`.
///
/// Every key is accepted both as `SCREAMING_CASE` and `snake_case`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct EnvConfig {
    pub search_url: String,
    pub upload_url: String,
    pub csrf_token: Option<String>,
    pub locale: Locale,
    pub user_select: String,
    pub editor_root: String,
    pub max_table_rows: u32,
    pub max_table_cols: u32,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            search_url: DEFAULT_SEARCH_URL.to_string(),
            upload_url: DEFAULT_UPLOAD_URL.to_string(),
            csrf_token: None,
            locale: Locale::default(),
            user_select: DEFAULT_USER_SELECT.to_string(),
            editor_root: DEFAULT_EDITOR_ROOT.to_string(),
            max_table_rows: DEFAULT_MAX_TABLE_DIM,
            max_table_cols: DEFAULT_MAX_TABLE_DIM,
        }
    }
}

impl EnvConfig {
    /// Read `window.ENV`, falling back to defaults and the Django CSRF cookie.
    pub fn load() -> Self {
        let mut cfg = Self::default();

        if let Some(window) = web_sys::window() {
            if let Some(env) = window.get("ENV") {
                if !env.is_undefined() && env.is_object() {
                    cfg.apply(|key| read_env_key(&env, key));
                }
            }
        }

        if cfg.csrf_token.is_none() {
            cfg.csrf_token = document_cookie().and_then(|c| csrf_from_cookie(&c));
        }

        cfg
    }

    /// Overlay values produced by `lookup` (keyed by lowercase name) onto `self`.
    pub(crate) fn apply(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("search_url").filter(|s| !s.trim().is_empty()) {
            self.search_url = v;
        }
        if let Some(v) = lookup("upload_url").filter(|s| !s.trim().is_empty()) {
            self.upload_url = v;
        }
        if let Some(v) = lookup("csrf_token").filter(|s| !s.trim().is_empty()) {
            self.csrf_token = Some(v);
        }
        if let Some(v) = lookup("locale") {
            self.locale = Locale::from_tag(&v);
        }
        if let Some(v) = lookup("user_select").filter(|s| !s.trim().is_empty()) {
            self.user_select = v;
        }
        if let Some(v) = lookup("editor_root").filter(|s| !s.trim().is_empty()) {
            self.editor_root = v;
        }
        if let Some(v) = lookup("max_table_rows").and_then(|s| parse_table_limit(&s)) {
            self.max_table_rows = v;
        }
        if let Some(v) = lookup("max_table_cols").and_then(|s| parse_table_limit(&s)) {
            self.max_table_cols = v;
        }
    }
}

fn parse_table_limit(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().map(|v| v.min(TABLE_DIM_LIMIT))
}

fn read_env_key(env: &js_sys::Object, key: &str) -> Option<String> {
    // Prefer the documented upper-case form, then the lower-case one.
    [key.to_uppercase(), key.to_string()]
        .iter()
        .find_map(|k| {
            let v = js_sys::Reflect::get(env, &k.as_str().into()).ok()?;
            v.as_string().or_else(|| v.as_f64().map(|n| n.to_string()))
        })
}

fn document_cookie() -> Option<String> {
    let doc = web_sys::window()?.document()?;
    let html_doc: web_sys::HtmlDocument = doc.dyn_into().ok()?;
    html_doc.cookie().ok()
}

/// Extract Django's `csrftoken` value from a `document.cookie` string.
pub(crate) fn csrf_from_cookie(cookie: &str) -> Option<String> {
    cookie
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == CSRF_COOKIE)
        .map(|(_, value)| {
            urlencoding::decode(value)
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| value.to_string())
        })
        .filter(|v| !v.is_empty())
}
