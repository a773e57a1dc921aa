use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

static LABEL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^\s*\((\d+[a-z]?)\)\s*").unwrap());

/// A sub-clause of a Pasal. `label` is `None` when the Pasal has no "(n)" markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ayat<'a> {
    pub label: Option<&'a str>,
    pub text: &'a str,
}

/// Split one Pasal's content on line-leading "(1)", "(2a)", ... markers.
pub fn split_ayat(content: &str) -> Vec<Ayat<'_>> {
    let labels: Vec<_> = LABEL_RE.captures_iter(content).collect();

    if labels.is_empty() {
        let text = content.trim();
        if text.is_empty() {
            return Vec::new();
        }
        return vec![Ayat { label: None, text }];
    }

    if let Some(first) = labels[0].get(0) {
        let preamble = content[..first.start()].trim();
        if !preamble.is_empty() {
            debug!(preamble, "text before first ayat label dropped");
        }
    }

    let mut parts = Vec::with_capacity(labels.len());
    for (i, caps) in labels.iter().enumerate() {
        let (Some(whole), Some(label)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let end = labels
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map_or(content.len(), |m| m.start());
        let text = content[whole.end()..end].trim();
        if !text.is_empty() {
            parts.push(Ayat {
                label: Some(label.as_str()),
                text,
            });
        }
    }
    parts
}
