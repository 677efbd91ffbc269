//! Local article persistence: front-matter parsing, directory discovery, the
//! one-shot identity write-back, and the mutation audit log.

use crate::domain::models::Article;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid front matter format in {0}")]
    FrontMatter(PathBuf),
    #[error("failed to parse YAML front matter in {path}: {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("article already has an identity: {identity} ({path})")]
    IdentityConflict { path: PathBuf, identity: String },
}

#[derive(Debug, Deserialize, Default)]
struct FrontMatter {
    #[serde(default)]
    title: String,
    #[serde(default)]
    path: String,
    #[serde(default)]
    uuid: String,
}

/// Splits a raw file into (front matter, body). The front matter must open
/// the file as a `---` fenced block followed by the body.
fn split_front_matter(raw: &str) -> Option<(&str, &str)> {
    let trimmed = raw.trim();
    let after_open = trimmed.strip_prefix("---")?;
    let after_open = after_open.trim_start_matches(|c| c == ' ' || c == '\t');
    let after_open = after_open.strip_prefix('\n')?;
    let close = after_open.find("\n---")?;
    let front = &after_open[..close];
    let body = after_open[close + "\n---".len()..]
        .trim_start_matches(|c| c == ' ' || c == '\t')
        .strip_prefix('\n')
        .unwrap_or("");
    Some((front, body))
}

pub fn parse_article(raw: &str, file_path: &Path) -> Result<Article, StorageError> {
    let (front, body) = split_front_matter(raw)
        .ok_or_else(|| StorageError::FrontMatter(file_path.to_path_buf()))?;
    let fm: FrontMatter = serde_yaml::from_str(front).map_err(|source| StorageError::Yaml {
        path: file_path.to_path_buf(),
        source,
    })?;
    Ok(Article {
        title: fm.title,
        path: fm.path,
        identity: fm.uuid,
        body: body.trim().to_string(),
        file_path: file_path.to_path_buf(),
    })
}

fn read(path: &Path) -> Result<String, StorageError> {
    std::fs::read_to_string(path).map_err(|source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_ascii_lowercase();
            e == "md" || e == "markdown"
        })
        .unwrap_or(false)
}

/// Loads every Markdown article under `dir` recursively, in lexicographic
/// path order so runs over the same tree always classify in the same order.
/// Any malformed article aborts the whole load.
pub fn load_articles(dir: &Path) -> Result<Vec<Article>, StorageError> {
    let mut articles = Vec::new();
    walk(dir, &mut articles)?;
    Ok(articles)
}

fn walk(dir: &Path, out: &mut Vec<Article>) -> Result<(), StorageError> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(|source| StorageError::Io {
            path: dir.to_path_buf(),
            source,
        })?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .collect();
    paths.sort();

    for path in paths {
        if path.is_dir() {
            walk(&path, out)?;
        } else if is_markdown(&path) {
            let raw = read(&path)?;
            out.push(parse_article(&raw, &path)?);
        }
    }
    Ok(())
}

/// Writes the identity into the article's front matter, exactly once. The
/// file is re-read and re-parsed so unrelated keys survive the rewrite; a
/// non-empty `uuid` already on disk is a conflict, never overwritten.
pub fn assign_identity(article: &mut Article, identity: &str) -> Result<(), StorageError> {
    if !article.identity.is_empty() {
        return Err(StorageError::IdentityConflict {
            path: article.file_path.clone(),
            identity: article.identity.clone(),
        });
    }

    let raw = read(&article.file_path)?;
    let (front, body) = split_front_matter(&raw)
        .ok_or_else(|| StorageError::FrontMatter(article.file_path.clone()))?;
    let mut map: serde_yaml::Mapping =
        serde_yaml::from_str(front).map_err(|source| StorageError::Yaml {
            path: article.file_path.clone(),
            source,
        })?;

    let key = serde_yaml::Value::from("uuid");
    if let Some(existing) = map.get(&key).and_then(|v| v.as_str()) {
        if !existing.is_empty() {
            return Err(StorageError::IdentityConflict {
                path: article.file_path.clone(),
                identity: existing.to_string(),
            });
        }
    }
    map.insert(key, serde_yaml::Value::from(identity));

    let front = serde_yaml::to_string(&map).map_err(|source| StorageError::Yaml {
        path: article.file_path.clone(),
        source,
    })?;
    let rewritten = format!("---\n{front}---\n{body}");
    std::fs::write(&article.file_path, rewritten).map_err(|source| StorageError::Io {
        path: article.file_path.clone(),
        source,
    })?;

    article.identity = identity.to_string();
    Ok(())
}

/// Appends one mutation event to the audit trail. Best-effort: a missing
/// HOME or unwritable path never fails the sync.
pub fn audit(action: &str, data: serde_json::Value) {
    let Ok(home) = std::env::var("HOME") else {
        return;
    };
    let path = PathBuf::from(home).join(".config/hatenasync/audit.jsonl");
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let event = serde_json::json!({
        "ts": unix_now(),
        "action": action,
        "data": data
    });
    let line = format!("{event}\n");
    let _ = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .and_then(|mut f| std::io::Write::write_all(&mut f, line.as_bytes()));
}

fn unix_now() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
