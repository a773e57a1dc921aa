use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::{debug, info};

use crate::records::{Article, Regulation};

pub fn connect(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path).with_context(|| format!("Failed to open {:?}", path))?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE regulations (
            id                INTEGER PRIMARY KEY,
            type              TEXT NOT NULL,
            number_text       TEXT NOT NULL,
            title             TEXT NOT NULL,
            year              INTEGER NOT NULL,
            effective_date    TEXT,
            status            TEXT NOT NULL DEFAULT 'active',
            replaces_number   TEXT,
            amended_by_number TEXT,
            revoked_by_number TEXT,
            source_url        TEXT,
            pdf_path          TEXT
        );

        CREATE TABLE articles (
            id            INTEGER PRIMARY KEY,
            regulation_id INTEGER NOT NULL REFERENCES regulations(id),
            pasal         INTEGER NOT NULL,
            ayat          TEXT,
            text          TEXT NOT NULL
        );
        CREATE INDEX idx_articles_regulation ON articles(regulation_id, pasal);

        -- Full-text index over article text, synced by triggers
        CREATE VIRTUAL TABLE articles_fts USING fts5(
            text, content='articles', content_rowid='id', tokenize='unicode61'
        );

        CREATE TRIGGER articles_ai AFTER INSERT ON articles BEGIN
            INSERT INTO articles_fts(rowid, text) VALUES (new.id, new.text);
        END;
        CREATE TRIGGER articles_ad AFTER DELETE ON articles BEGIN
            INSERT INTO articles_fts(articles_fts, rowid, text) VALUES ('delete', old.id, old.text);
        END;
        CREATE TRIGGER articles_au AFTER UPDATE ON articles BEGIN
            INSERT INTO articles_fts(articles_fts, rowid, text) VALUES ('delete', old.id, old.text);
            INSERT INTO articles_fts(rowid, text) VALUES (new.id, new.text);
        END;
        ",
    )?;
    Ok(())
}

pub struct BuildStats {
    pub regulations: usize,
    pub articles: usize,
}

/// Rebuild the store at `path` from scratch. Any previous database there is deleted.
pub fn build_database(
    path: &Path,
    regulations: &[Regulation],
    articles: &[Article],
) -> Result<BuildStats> {
    remove_existing(path)?;
    let conn = connect(path)?;
    init_schema(&conn)?;

    let stats = save_records(&conn, regulations, articles)?;
    conn.execute("INSERT INTO articles_fts(articles_fts) VALUES ('rebuild')", [])?;
    info!(
        regulations = stats.regulations,
        articles = stats.articles,
        "database built"
    );
    Ok(stats)
}

fn remove_existing(path: &Path) -> Result<()> {
    let mut targets = vec![path.to_path_buf()];
    for suffix in ["-wal", "-shm"] {
        let mut side = path.as_os_str().to_owned();
        side.push(suffix);
        targets.push(PathBuf::from(side));
    }
    for target in targets.iter().filter(|p| p.exists()) {
        debug!("Removing {:?}", target);
        fs::remove_file(target).with_context(|| format!("Failed to remove {:?}", target))?;
    }
    Ok(())
}

fn save_records(
    conn: &Connection,
    regulations: &[Regulation],
    articles: &[Article],
) -> Result<BuildStats> {
    let tx = conn.unchecked_transaction()?;
    let mut stats = BuildStats {
        regulations: 0,
        articles: 0,
    };
    {
        let mut r_stmt = tx.prepare(
            "INSERT INTO regulations
             (id, type, number_text, title, year, effective_date, status,
              replaces_number, amended_by_number, revoked_by_number, source_url, pdf_path)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12)",
        )?;
        for r in regulations {
            stats.regulations += r_stmt.execute(rusqlite::params![
                r.id,
                r.kind.as_str(),
                r.number_text,
                r.title,
                r.year,
                r.effective_date.map(|d| d.to_string()),
                r.status,
                r.replaces_number,
                r.amended_by_number,
                r.revoked_by_number,
                r.source_url,
                r.pdf_path,
            ])?;
        }

        let mut a_stmt = tx.prepare(
            "INSERT INTO articles (id, regulation_id, pasal, ayat, text)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        for a in articles {
            stats.articles += a_stmt.execute(rusqlite::params![
                a.id,
                a.regulation_id,
                a.pasal,
                a.ayat,
                a.text,
            ])?;
        }
    }
    tx.commit()?;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::tests::sample_regulation;

    fn article(id: i64, pasal: u32, ayat: Option<&str>, text: &str) -> Article {
        Article {
            id,
            regulation_id: 7,
            pasal,
            ayat: ayat.map(str::to_string),
            text: text.to_string(),
        }
    }

    fn count(conn: &Connection, sql: &str) -> usize {
        conn.query_row(sql, [], |r| r.get(0)).unwrap()
    }

    fn search(conn: &Connection, term: &str) -> Vec<i64> {
        let mut stmt = conn
            .prepare("SELECT rowid FROM articles_fts WHERE articles_fts MATCH ?1 ORDER BY rowid")
            .unwrap();
        let rows = stmt
            .query_map([term], |r| r.get(0))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        rows
    }

    fn sample_articles() -> Vec<Article> {
        vec![
            article(1, 1, Some("1"), "Setiap pihak wajib menyampaikan laporan."),
            article(2, 1, Some("2"), "Ketentuan lanjutan diatur dalam Surat Edaran."),
            article(3, 2, None, "Berlaku efektif sejak diundangkan."),
        ]
    }

    #[test]
    fn rows_match_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ojk.db");
        let articles = sample_articles();

        let stats = build_database(&path, &[sample_regulation()], &articles).unwrap();
        assert_eq!(stats.regulations, 1);
        assert_eq!(stats.articles, articles.len());

        let conn = connect(&path).unwrap();
        assert_eq!(count(&conn, "SELECT COUNT(*) FROM regulations"), 1);
        assert_eq!(count(&conn, "SELECT COUNT(*) FROM articles"), articles.len());

        let (kind, date): (String, Option<String>) = conn
            .query_row("SELECT type, effective_date FROM regulations WHERE id = 7", [], |r| {
                Ok((r.get(0)?, r.get(1)?))
            })
            .unwrap();
        assert_eq!(kind, "POJK");
        assert_eq!(date.as_deref(), Some("2021-12-31"));

        let ayat: Option<String> = conn
            .query_row("SELECT ayat FROM articles WHERE id = 3", [], |r| r.get(0))
            .unwrap();
        assert_eq!(ayat, None);
    }

    #[test]
    fn full_text_search() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ojk.db");
        build_database(&path, &[sample_regulation()], &sample_articles()).unwrap();

        let conn = connect(&path).unwrap();
        assert_eq!(search(&conn, "wajib"), vec![1]);
        assert_eq!(search(&conn, "surat edaran"), vec![2]);
        assert!(search(&conn, "penjelasan").is_empty());
    }

    #[test]
    fn triggers_keep_index_in_sync() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ojk.db");
        build_database(&path, &[sample_regulation()], &sample_articles()).unwrap();

        let conn = connect(&path).unwrap();
        conn.execute("UPDATE articles SET text = 'Ketentuan dicabut.' WHERE id = 1", [])
            .unwrap();
        assert!(search(&conn, "wajib").is_empty());
        assert_eq!(search(&conn, "dicabut"), vec![1]);

        conn.execute("DELETE FROM articles WHERE id = 3", []).unwrap();
        assert!(search(&conn, "efektif").is_empty());

        conn.execute(
            "INSERT INTO articles (id, regulation_id, pasal, ayat, text) VALUES (4, 7, 3, NULL, 'Modal disetor.')",
            [],
        )
        .unwrap();
        assert_eq!(search(&conn, "modal"), vec![4]);
    }

    #[test]
    fn rebuild_replaces_previous_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ojk.db");
        build_database(&path, &[sample_regulation()], &sample_articles()).unwrap();

        let fewer = vec![article(1, 1, None, "Satu-satunya pasal.")];
        let stats = build_database(&path, &[sample_regulation()], &fewer).unwrap();
        assert_eq!(stats.articles, 1);

        let conn = connect(&path).unwrap();
        assert_eq!(count(&conn, "SELECT COUNT(*) FROM articles"), 1);
        assert_eq!(count(&conn, "SELECT COUNT(*) FROM regulations"), 1);
        assert!(search(&conn, "wajib").is_empty());
    }

    #[test]
    fn replaces_non_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ojk.db");
        fs::write(&path, "bukan basis data").unwrap();
        build_database(&path, &[sample_regulation()], &sample_articles()).unwrap();

        let conn = connect(&path).unwrap();
        assert_eq!(count(&conn, "SELECT COUNT(*) FROM articles"), 3);
    }

    #[test]
    fn empty_article_set() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ojk.db");
        let stats = build_database(&path, &[sample_regulation()], &[]).unwrap();
        assert_eq!(stats.articles, 0);
    }

    #[test]
    fn article_needs_known_regulation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ojk.db");
        let orphan = Article {
            regulation_id: 99,
            ..article(1, 1, None, "yatim")
        };
        assert!(build_database(&path, &[sample_regulation()], &[orphan]).is_err());
    }
}
