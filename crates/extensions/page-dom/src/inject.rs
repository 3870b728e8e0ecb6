//! Value injection that survives framework-managed controls.

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

use crate::document::{ControlKind, NodeId, SharedDocument};
use crate::events::DomEvent;

const DEFAULT_REASSERT_DELAY: Duration = Duration::from_millis(50);

/// Writes a resolved value into a control.
///
/// Plain assignment is tried first; if the page's framework shadows it,
/// the injector escalates to a native prototype write and finally to
/// simulated per-character typing, confirming each attempt by reading
/// the value back. A deferred pass re-asserts the value once more after
/// a short delay, catching frameworks that rewrite it asynchronously.
///
/// Injection never fails the caller: problems are logged and the fill
/// attempt ends with a [`DomEvent::FillComplete`] either way.
pub struct ValueInjector {
    reassert_delay: Duration,
}

impl ValueInjector {
    pub fn new() -> Self {
        Self { reassert_delay: DEFAULT_REASSERT_DELAY }
    }

    /// Overrides how long the deferred re-assertion waits.
    pub fn with_reassert_delay(delay: Duration) -> Self {
        Self { reassert_delay: delay }
    }

    pub async fn inject(&self, doc: &SharedDocument, target: NodeId, value: &str) {
        let kind = {
            let guard = doc.lock();
            guard.control_kind(target)
        };
        let Some(kind) = kind else {
            warn!(node = target, "inject target is not a fillable control");
            return;
        };

        match kind {
            ControlKind::Select => self.fill_select(doc, target, value),
            ControlKind::Checkbox | ControlKind::Radio => self.fill_toggle(doc, target, value),
            ControlKind::File => {
                warn!(node = target, "file inputs cannot be filled programmatically");
            }
            ControlKind::ContentEditable => self.fill_editable(doc, target, value),
            _ => self.fill_text(doc, target, value).await,
        }

        doc.lock().dispatch(target, DomEvent::FillComplete);
    }

    fn fill_select(&self, doc: &SharedDocument, target: NodeId, value: &str) {
        let mut guard = doc.lock();
        let options = guard.select_options(target);
        let exact = options.iter().find(|(_, v, _)| v == value);
        let chosen = exact.or_else(|| {
            let needle = value.to_ascii_lowercase();
            options.iter().find(|(_, v, t)| {
                t.to_ascii_lowercase().contains(&needle)
                    || v.to_ascii_lowercase().contains(&needle)
            })
        });
        match chosen {
            Some((_, option_value, _)) => {
                let option_value = option_value.clone();
                if guard.assign_value(target, &option_value).is_ok() {
                    dispatch_commit(&mut guard, target);
                }
            }
            None => {
                debug!(node = target, value, "no matching option, leaving select unchanged");
            }
        }
    }

    fn fill_toggle(&self, doc: &SharedDocument, target: NodeId, value: &str) {
        let truthy = matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "1");
        let mut guard = doc.lock();
        if guard.set_checked(target, truthy).is_ok() {
            dispatch_commit(&mut guard, target);
        }
    }

    fn fill_editable(&self, doc: &SharedDocument, target: NodeId, value: &str) {
        let mut guard = doc.lock();
        if guard.set_content(target, value).is_ok() {
            dispatch_commit(&mut guard, target);
        }
    }

    async fn fill_text(&self, doc: &SharedDocument, target: NodeId, value: &str) {
        let settled = {
            let mut guard = doc.lock();
            guard.dispatch(target, DomEvent::Focus);

            // Plain assignment, the cheapest write.
            let _ = guard.assign_value(target, value);
            dispatch_commit(&mut guard, target);
            let mut settled = read_back(&guard, target) == value;

            // Native prototype write for frameworks that shadow the
            // value property.
            if !settled {
                debug!(node = target, "plain assignment was shadowed, using native setter");
                let _ = guard.set_value_native(target, value);
                guard.dispatch(target, DomEvent::Input);
                settled = read_back(&guard, target) == value;
            }

            // Simulated typing for frameworks that only accept values
            // arriving one keystroke at a time.
            if !settled {
                debug!(node = target, "native write rejected, simulating keystrokes");
                let _ = guard.set_value_native(target, "");
                let mut typed = String::new();
                for ch in value.chars() {
                    guard.dispatch(target, DomEvent::KeyDown(ch));
                    typed.push(ch);
                    let _ = guard.set_value_native(target, &typed);
                    guard.dispatch(target, DomEvent::Input);
                    guard.dispatch(target, DomEvent::KeyUp(ch));
                }
                guard.dispatch(target, DomEvent::KeyPress);
                guard.dispatch(target, DomEvent::Change);
                guard.dispatch(target, DomEvent::Blur);
                settled = read_back(&guard, target) == value;
            }
            settled
        };

        // A framework can still rewrite the value on its next tick, so
        // check once more after a delay and re-assert if it drifted.
        sleep(self.reassert_delay).await;
        let mut guard = doc.lock();
        if read_back(&guard, target) != value {
            debug!(node = target, settled, "value drifted after fill, re-asserting");
            let _ = guard.set_value_native(target, value);
            guard.dispatch(target, DomEvent::Input);
            guard.dispatch(target, DomEvent::Change);
        }
        if read_back(&guard, target) != value {
            warn!(node = target, "control would not hold the injected value");
        }
    }
}

impl Default for ValueInjector {
    fn default() -> Self {
        Self::new()
    }
}

fn dispatch_commit(doc: &mut crate::document::PageDocument, target: NodeId) {
    doc.dispatch(target, DomEvent::Input);
    doc.dispatch(target, DomEvent::Change);
    doc.dispatch(target, DomEvent::Blur);
}

fn read_back(doc: &crate::document::PageDocument, target: NodeId) -> String {
    doc.value(target).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;
    use crate::document::{PageDocument, ValueInterceptor};

    fn shared(doc: PageDocument) -> SharedDocument {
        Arc::new(Mutex::new(doc))
    }

    fn injector() -> ValueInjector {
        ValueInjector::with_reassert_delay(Duration::from_millis(1))
    }

    fn text_input(doc: &mut PageDocument) -> NodeId {
        doc.append_element(doc.root(), "input")
    }

    #[tokio::test]
    async fn fills_plain_input_and_fires_events() {
        let mut doc = PageDocument::new();
        let input = text_input(&mut doc);
        let doc = shared(doc);
        injector().inject(&doc, input, "jane@acme.com").await;

        let guard = doc.lock();
        assert_eq!(guard.value(input).unwrap(), "jane@acme.com");
        let events = guard.events_for(input);
        assert!(events.contains(&DomEvent::Input));
        assert!(events.contains(&DomEvent::Change));
        assert!(events.contains(&DomEvent::Blur));
        assert_eq!(events.last(), Some(&DomEvent::FillComplete));
    }

    #[tokio::test]
    async fn injecting_twice_is_idempotent() {
        let mut doc = PageDocument::new();
        let input = text_input(&mut doc);
        let doc = shared(doc);
        let inj = injector();
        inj.inject(&doc, input, "42").await;
        inj.inject(&doc, input, "42").await;
        assert_eq!(doc.lock().value(input).unwrap(), "42");
    }

    #[tokio::test]
    async fn native_setter_defeats_shadowed_assignment() {
        // A framework that swallows plain value writes entirely.
        struct Shadow;
        impl ValueInterceptor for Shadow {
            fn on_assign(&self, _: NodeId, _: &str, previous: &str) -> String {
                previous.to_string()
            }
        }

        let mut doc = PageDocument::new();
        let input = text_input(&mut doc);
        doc.set_interceptor(Arc::new(Shadow));
        let doc = shared(doc);
        injector().inject(&doc, input, "resisted").await;

        let guard = doc.lock();
        assert_eq!(guard.value(input).unwrap(), "resisted");
        // The escalation stopped before simulated typing.
        assert!(!guard.events_for(input).iter().any(|e| matches!(e, DomEvent::KeyDown(_))));
    }

    #[tokio::test]
    async fn simulated_typing_defeats_keystroke_only_frameworks() {
        // Accepts a value only when it grows one character per input
        // event, as a controlled component fed by key handlers would.
        struct KeyedOnly {
            last: std::sync::Mutex<String>,
        }
        impl ValueInterceptor for KeyedOnly {
            fn on_assign(&self, _: NodeId, _: &str, previous: &str) -> String {
                previous.to_string()
            }
            fn on_event(&self, _: NodeId, event: &DomEvent, current: &str) -> Option<String> {
                if *event != DomEvent::Input {
                    return None;
                }
                let mut last = self.last.lock().unwrap();
                let grew_by_one = current.len() == last.len() + 1 && current.starts_with(&*last);
                if grew_by_one {
                    *last = current.to_string();
                    None
                } else {
                    Some(last.clone())
                }
            }
        }

        let mut doc = PageDocument::new();
        let input = text_input(&mut doc);
        doc.set_interceptor(Arc::new(KeyedOnly { last: std::sync::Mutex::new(String::new()) }));
        let doc = shared(doc);
        injector().inject(&doc, input, "abc").await;

        let guard = doc.lock();
        assert_eq!(guard.value(input).unwrap(), "abc");
        let events = guard.events_for(input);
        assert!(events.contains(&DomEvent::KeyDown('a')));
        assert!(events.contains(&DomEvent::KeyUp('c')));
    }

    #[tokio::test(start_paused = true)]
    async fn deferred_pass_reasserts_after_late_rewrite() {
        // Fights every write until released, as a framework that
        // rewrites the control on its next render tick would.
        struct Fighting {
            released: Arc<AtomicBool>,
        }
        impl ValueInterceptor for Fighting {
            fn on_assign(&self, _: NodeId, _: &str, previous: &str) -> String {
                previous.to_string()
            }
            fn on_event(&self, _: NodeId, _: &DomEvent, _: &str) -> Option<String> {
                if self.released.load(Ordering::SeqCst) {
                    None
                } else {
                    Some(String::new())
                }
            }
        }

        let released = Arc::new(AtomicBool::new(false));
        let mut doc = PageDocument::new();
        let input = text_input(&mut doc);
        doc.set_interceptor(Arc::new(Fighting { released: released.clone() }));
        let doc = shared(doc);

        let inj = ValueInjector::with_reassert_delay(Duration::from_millis(200));
        let task = {
            let doc = doc.clone();
            tokio::spawn(async move { inj.inject(&doc, input, "final").await })
        };
        sleep(Duration::from_millis(50)).await;
        released.store(true, Ordering::SeqCst);
        task.await.unwrap();

        assert_eq!(doc.lock().value(input).unwrap(), "final");
    }

    #[tokio::test]
    async fn select_matches_exact_option_value() {
        let mut doc = PageDocument::new();
        let select = doc.append_element(doc.root(), "select");
        for (v, t) in [("us", "United States"), ("ca", "Canada")] {
            let opt = doc.append_element(select, "option");
            doc.set_attr(opt, "value", v);
            doc.set_text(opt, t);
        }
        let doc = shared(doc);
        injector().inject(&doc, select, "ca").await;
        assert_eq!(doc.lock().value(select).unwrap(), "ca");
    }

    #[tokio::test]
    async fn select_falls_back_to_case_insensitive_text_match() {
        let mut doc = PageDocument::new();
        let select = doc.append_element(doc.root(), "select");
        let opt = doc.append_element(select, "option");
        doc.set_attr(opt, "value", "us");
        doc.set_text(opt, "United States");
        let doc = shared(doc);
        injector().inject(&doc, select, "united states").await;
        assert_eq!(doc.lock().value(select).unwrap(), "us");
    }

    #[tokio::test]
    async fn select_with_no_match_is_left_unchanged() {
        let mut doc = PageDocument::new();
        let select = doc.append_element(doc.root(), "select");
        let opt = doc.append_element(select, "option");
        doc.set_attr(opt, "value", "us");
        doc.set_text(opt, "United States");
        let doc = shared(doc);
        injector().inject(&doc, select, "Atlantis").await;

        let guard = doc.lock();
        assert_eq!(guard.value(select).unwrap(), "");
        assert_eq!(guard.events_for(select), vec![DomEvent::FillComplete]);
    }

    #[tokio::test]
    async fn checkbox_checks_on_truthy_values() {
        let mut doc = PageDocument::new();
        let a = doc.append_element(doc.root(), "input");
        doc.set_attr(a, "type", "checkbox");
        let b = doc.append_element(doc.root(), "input");
        doc.set_attr(b, "type", "checkbox");
        let doc = shared(doc);
        let inj = injector();
        inj.inject(&doc, a, "true").await;
        inj.inject(&doc, b, "no").await;

        let guard = doc.lock();
        assert!(guard.checked(a));
        assert!(!guard.checked(b));
        assert!(guard.events_for(a).contains(&DomEvent::Change));
    }

    #[tokio::test]
    async fn file_input_is_not_written() {
        let mut doc = PageDocument::new();
        let file = doc.append_element(doc.root(), "input");
        doc.set_attr(file, "type", "file");
        let doc = shared(doc);
        injector().inject(&doc, file, "/etc/passwd").await;

        let guard = doc.lock();
        assert_eq!(guard.value(file).unwrap(), "");
        assert_eq!(guard.events_for(file), vec![DomEvent::FillComplete]);
    }

    #[tokio::test]
    async fn contenteditable_replaces_content() {
        let mut doc = PageDocument::new();
        let div = doc.append_element(doc.root(), "div");
        doc.set_attr(div, "contenteditable", "true");
        doc.set_content(div, "old draft").unwrap();
        let doc = shared(doc);
        injector().inject(&doc, div, "new words").await;

        let guard = doc.lock();
        assert_eq!(guard.value(div).unwrap(), "new words");
        assert!(guard.events_for(div).contains(&DomEvent::Input));
    }

    #[tokio::test]
    async fn non_control_target_is_a_no_op() {
        let mut doc = PageDocument::new();
        let div = doc.append_element(doc.root(), "div");
        let doc = shared(doc);
        injector().inject(&doc, div, "nothing").await;
        assert!(doc.lock().events().is_empty());
    }
}
