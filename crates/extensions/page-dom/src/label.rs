//! Label resolution for form controls.

use tracing::debug;

use crate::document::{NodeId, PageDocument};

/// Finds the human-readable label naming `control`.
///
/// Four strategies are tried in order, the first hit winning:
///
/// 1. a `label` ancestor wrapping the control;
/// 2. a `label` elsewhere in the document whose `for` attribute names
///    the control's `id`;
/// 3. a `label` among the control's preceding siblings, nearest first;
/// 4. walking up the ancestor chain, a `label` among each ancestor's
///    preceding siblings or their descendants.
///
/// Returns `None` when nothing matches; the caller decides what an
/// unlabeled control means.
pub fn resolve(doc: &PageDocument, control: NodeId) -> Option<String> {
    let found = wrapping_label(doc, control)
        .or_else(|| label_for(doc, control))
        .or_else(|| preceding_sibling_label(doc, control))
        .or_else(|| ancestor_sibling_label(doc, control));
    match found {
        Some(label) => {
            let text = doc.inner_text(label);
            (!text.is_empty()).then_some(text)
        }
        None => {
            debug!(node = control, "no label found for control");
            None
        }
    }
}

fn is_label(doc: &PageDocument, id: NodeId) -> bool {
    doc.node(id).map(|n| n.tag == "label").unwrap_or(false)
}

fn wrapping_label(doc: &PageDocument, control: NodeId) -> Option<NodeId> {
    let mut current = doc.node(control).ok()?.parent;
    while let Some(id) = current {
        if is_label(doc, id) {
            return Some(id);
        }
        current = doc.node(id).ok()?.parent;
    }
    None
}

fn label_for(doc: &PageDocument, control: NodeId) -> Option<NodeId> {
    let target = doc.attr(control, "id")?;
    if target.is_empty() {
        return None;
    }
    doc.all_nodes()
        .find(|&id| is_label(doc, id) && doc.attr(id, "for") == Some(target))
}

fn preceding_sibling_label(doc: &PageDocument, control: NodeId) -> Option<NodeId> {
    doc.preceding_siblings(control)
        .into_iter()
        .find(|&sib| is_label(doc, sib))
}

fn ancestor_sibling_label(doc: &PageDocument, control: NodeId) -> Option<NodeId> {
    let mut current = doc.node(control).ok()?.parent;
    while let Some(ancestor) = current {
        for sib in doc.preceding_siblings(ancestor) {
            if is_label(doc, sib) {
                return Some(sib);
            }
            if let Some(nested) = doc.descendants(sib).find(|&d| is_label(doc, d)) {
                return Some(nested);
            }
        }
        current = doc.node(ancestor).ok()?.parent;
    }
    None
}
