use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?im)^\s*Pasal\s+([0-9]+)\s*$").unwrap());
static PENJELASAN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?im)^\s*Penjelasan\b").unwrap());

/// A top-level section and the raw text between its heading and the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasalBlock<'a> {
    pub number: u32,
    pub content: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Heading {
    start: usize,
    end: usize,
    number: u32,
}

/// Every "Pasal N" heading line, in document order.
fn find_headings(text: &str) -> Vec<Heading> {
    HEADING_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let m = caps.get(0)?;
            let number = match caps[1].parse::<u32>() {
                Ok(n) => n,
                Err(_) => {
                    debug!(heading = m.as_str().trim(), "section number out of range, not a heading");
                    return None;
                }
            };
            Some(Heading {
                start: m.start(),
                end: m.end(),
                number,
            })
        })
        .collect()
}

/// Byte offset of the first line starting with the word "Penjelasan".
fn find_penjelasan(text: &str) -> Option<usize> {
    PENJELASAN_RE.find(text).map(|m| m.start())
}

/// Split normalized text into Pasal blocks.
///
/// Scanning ends at the first "Penjelasan" heading, or at a second
/// "Pasal 1" heading when the explanatory part has no such heading.
/// Blocks with no content are dropped.
pub fn split_pasal_blocks(text: &str) -> Vec<PasalBlock<'_>> {
    let cut = find_penjelasan(text).unwrap_or(text.len());
    if cut < text.len() {
        debug!(offset = cut, "Penjelasan heading found, ignoring the rest");
    }

    let headings: Vec<Heading> = find_headings(text)
        .into_iter()
        .filter(|h| h.start < cut)
        .collect();

    if headings.is_empty() {
        let content = text[..cut].trim();
        if content.is_empty() {
            return Vec::new();
        }
        return vec![PasalBlock { number: 1, content }];
    }

    let mut blocks = Vec::new();
    let mut seen_first = false;
    for (i, heading) in headings.iter().enumerate() {
        if heading.number == 1 {
            if seen_first {
                debug!(offset = heading.start, "Pasal 1 repeated, ignoring the rest");
                break;
            }
            seen_first = true;
        }

        let next = headings.get(i + 1).map_or(cut, |h| h.start);
        let content = text[heading.end.min(next)..next].trim();
        if !content.is_empty() {
            blocks.push(PasalBlock {
                number: heading.number,
                content,
            });
        }
    }

    blocks
}
