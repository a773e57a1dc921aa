use chrono::NaiveDate;
use serde::Serialize;

use crate::parser::Clause;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
pub enum RegulationType {
    #[serde(rename = "POJK")]
    #[value(name = "POJK")]
    Pojk,
    #[serde(rename = "SEOJK")]
    #[value(name = "SEOJK")]
    Seojk,
}

impl RegulationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegulationType::Pojk => "POJK",
            RegulationType::Seojk => "SEOJK",
        }
    }
}

/// Regulation-level metadata. Supplied by the caller, never read from the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Regulation {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: RegulationType,
    pub number_text: String,
    pub title: String,
    pub year: i32,
    pub effective_date: Option<NaiveDate>,
    pub status: String,
    pub replaces_number: Option<String>,
    pub amended_by_number: Option<String>,
    pub revoked_by_number: Option<String>,
    pub source_url: Option<String>,
    pub pdf_path: String,
}

/// One output row: an Ayat, or a whole Pasal when it has no Ayat labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Article {
    pub id: i64,
    pub regulation_id: i64,
    pub pasal: u32,
    pub ayat: Option<String>,
    pub text: String,
}

/// Run-scoped article id sequence: dense, starting at 1.
#[derive(Debug)]
pub struct ArticleIds {
    next: i64,
}

impl ArticleIds {
    pub fn new() -> Self {
        ArticleIds { next: 1 }
    }

    fn take(&mut self) -> i64 {
        let id = self.next;
        self.next += 1;
        id
    }
}

impl Default for ArticleIds {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_articles(
    regulation: &Regulation,
    clauses: Vec<Clause>,
    ids: &mut ArticleIds,
) -> Vec<Article> {
    clauses
        .into_iter()
        .map(|c| Article {
            id: ids.take(),
            regulation_id: regulation.id,
            pasal: c.pasal,
            ayat: c.ayat,
            text: c.text,
        })
        .collect()
}
