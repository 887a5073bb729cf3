use crate::api::{ApiClient, ApiResult};
use crate::i18n::Locale;
use leptos::logging::error;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// Title used when the title field is left empty.
pub(crate) const DEFAULT_TITLE: &str = "document";

/// Form body for the HTML → PDF conversion endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct UploadPayload {
    pub file_content: String,
    pub title: String,
}

impl UploadPayload {
    pub fn new(file_content: impl Into<String>, title: &str) -> Self {
        let title = title.trim();
        Self {
            file_content: file_content.into(),
            title: if title.is_empty() {
                DEFAULT_TITLE.to_string()
            } else {
                title.to_string()
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum UploadOutcome {
    /// The server stored the PDF and wants us to go here.
    Redirect(String),
    /// Non-2xx response; body kept verbatim for the console.
    HttpFailure { status: u16, body: String },
}

/// Side effects of finishing an upload.
pub(crate) trait UploadEffects {
    fn notify(&self, message: &str);
    fn log_error(&self, context: &str, detail: &str);
    fn navigate(&self, url: &str);
}

/// Blocking alerts, console logging and a real page navigation.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct BrowserEffects;

impl UploadEffects for BrowserEffects {
    fn notify(&self, message: &str) {
        let _ = window().alert_with_message(message);
    }

    fn log_error(&self, context: &str, detail: &str) {
        error!("{context}: {detail}");
    }

    fn navigate(&self, url: &str) {
        let _ = window().location().set_href(url);
    }
}

/// Report the result to the user. Every failure is terminal; nothing is retried.
pub(crate) fn apply_outcome(
    result: ApiResult<UploadOutcome>,
    effects: &impl UploadEffects,
    locale: Locale,
) {
    match result {
        Ok(UploadOutcome::Redirect(url)) => {
            effects.notify(locale.upload_success());
            effects.navigate(&url);
        }
        Ok(UploadOutcome::HttpFailure { status, body }) => {
            effects.log_error(&format!("PDF upload failed ({status})"), &body);
            effects.notify(locale.upload_failed());
        }
        Err(e) => {
            effects.log_error("PDF upload request error", &e.to_string());
            effects.notify(locale.request_failed());
        }
    }
}

/// One-shot submitter with a guard against overlapping uploads.
#[derive(Clone, Copy)]
pub(crate) struct Uploader {
    client: StoredValue<ApiClient>,
    in_flight: RwSignal<bool>,
    locale: Locale,
}

impl Uploader {
    pub fn new(client: ApiClient, locale: Locale) -> Self {
        Self {
            client: StoredValue::new(client),
            in_flight: RwSignal::new(false),
            locale,
        }
    }

    pub fn in_flight(&self) -> Signal<bool> {
        self.in_flight.into()
    }

    /// Start an upload. Returns `false` when one is already running.
    pub fn submit(&self, content: String, title: &str) -> bool {
        if self.in_flight.get_untracked() {
            return false;
        }
        self.in_flight.set(true);

        let payload = UploadPayload::new(content, title);
        let client = self.client.get_value();
        let in_flight = self.in_flight;
        let locale = self.locale;

        spawn_local(async move {
            let result = client.upload_document(&payload).await;
            let navigating = matches!(result, Ok(UploadOutcome::Redirect(_)));
            apply_outcome(result, &BrowserEffects, locale);
            // Leave the trigger disabled while the browser navigates away.
            if !navigating {
                in_flight.set(false);
            }
        });

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::interpret_upload_response;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        alerts: RefCell<Vec<String>>,
        logs: RefCell<Vec<String>>,
        location: RefCell<Option<String>>,
    }

    impl UploadEffects for Recorder {
        fn notify(&self, message: &str) {
            self.alerts.borrow_mut().push(message.to_string());
        }

        fn log_error(&self, context: &str, detail: &str) {
            self.logs.borrow_mut().push(format!("{context}: {detail}"));
        }

        fn navigate(&self, url: &str) {
            *self.location.borrow_mut() = Some(url.to_string());
        }
    }

    #[test]
    fn test_payload_defaults_empty_title() {
        assert_eq!(UploadPayload::new("<p>x</p>", "").title, "document");
        assert_eq!(UploadPayload::new("<p>x</p>", "   ").title, "document");
        let p = UploadPayload::new("<p>x</p>", " Report ");
        assert_eq!(p.title, "Report");
        assert_eq!(p.file_content, "<p>x</p>");
    }

    #[test]
    fn test_success_navigates_without_error_alert() {
        let rec = Recorder::default();
        let result = interpret_upload_response(200, r#"{"redirect_url": "/documents/42/"}"#);
        apply_outcome(result, &rec, Locale::En);

        assert_eq!(rec.location.borrow().as_deref(), Some("/documents/42/"));
        assert_eq!(*rec.alerts.borrow(), vec![Locale::En.upload_success().to_string()]);
        assert!(rec.logs.borrow().is_empty());
    }

    #[test]
    fn test_http_500_logs_body_and_alerts() {
        let rec = Recorder::default();
        let result = interpret_upload_response(500, "conversion crashed");
        apply_outcome(result, &rec, Locale::En);

        assert!(rec.location.borrow().is_none());
        assert_eq!(rec.logs.borrow().len(), 1);
        assert!(rec.logs.borrow()[0].contains("conversion crashed"));
        assert_eq!(*rec.alerts.borrow(), vec![Locale::En.upload_failed().to_string()]);
    }

    #[test]
    fn test_parse_failure_uses_generic_alert() {
        let rec = Recorder::default();
        let result = interpret_upload_response(200, "not json");
        apply_outcome(result, &rec, Locale::Ru);

        assert!(rec.location.borrow().is_none());
        assert_eq!(rec.logs.borrow().len(), 1);
        assert_eq!(*rec.alerts.borrow(), vec![Locale::Ru.request_failed().to_string()]);
    }
}
