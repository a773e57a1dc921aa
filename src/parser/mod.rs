pub mod ayat;
pub mod normalize;
pub mod pasal;

use tracing::debug;

/// One Ayat-level unit of regulation text, before ids are assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub pasal: u32,
    pub ayat: Option<String>,
    pub text: String,
}

/// Three-pass pipeline: raw text → normalized text → Pasal blocks → clauses.
pub fn process_text(raw: &str) -> Vec<Clause> {
    let text = normalize::normalize_text(raw);
    let blocks = pasal::split_pasal_blocks(&text);
    debug!(blocks = blocks.len(), "pasal blocks");

    blocks
        .iter()
        .flat_map(|block| {
            ayat::split_ayat(block.content)
                .into_iter()
                .map(move |a| Clause {
                    pasal: block.number,
                    ayat: a.label.map(str::to_string),
                    text: a.text.to_string(),
                })
        })
        .collect()
}

// ── Tests ──
