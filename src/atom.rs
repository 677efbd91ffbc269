//! AtomPub client for the Hatena Blog entry collection.
//!
//! One blocking HTTP attempt per call: no retry, no cache, no pagination.
//! The rate-limit condition is signalled in the response body, not by a
//! dedicated status code, so it is detected by a known marker string.

use crate::config::Config;
use crate::domain::models::{Article, RemoteEntry};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const ATOM_NS: &str = "http://www.w3.org/2005/Atom";
const APP_NS: &str = "http://www.w3.org/2007/app";
const HATENA_NS: &str = "http://www.hatena.ne.jp/info/xmlns#hatenablog";
const USER_AGENT: &str = concat!("hatenasync/", env!("CARGO_PKG_VERSION"));
const RATE_LIMIT_MARKER: &str = "Entry limit was exceeded";

#[derive(thiserror::Error, Debug)]
pub enum AtomError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API request failed with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("daily posting limit exceeded")]
    RateLimited,
    #[error("failed to decode entry XML: {0}")]
    Xml(#[from] quick_xml::DeError),
}

impl AtomError {
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, AtomError::RateLimited)
    }

    fn from_status(status: u16, body: String) -> Self {
        if body.contains(RATE_LIMIT_MARKER) {
            AtomError::RateLimited
        } else {
            AtomError::Status { status, body }
        }
    }
}

/// The remote entry collection, as the sync engine sees it. `Client` is the
/// production implementation; tests substitute an in-memory one.
pub trait EntryEndpoint {
    fn list_entries(&self) -> Result<Vec<RemoteEntry>, AtomError>;
    fn create_entry(&self, article: &Article) -> Result<RemoteEntry, AtomError>;
    fn update_entry(&self, target: &str, article: &Article) -> Result<RemoteEntry, AtomError>;
    fn delete_entry(&self, target: &str) -> Result<(), AtomError>;
}

pub struct Client {
    config: Config,
    http: reqwest::blocking::Client,
}

impl Client {
    pub fn new(config: Config) -> Result<Self, AtomError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { config, http })
    }

    fn collection_url(&self) -> String {
        format!(
            "https://blog.hatena.ne.jp/{}/{}/atom/entry",
            self.config.hatena_id, self.config.blog_id
        )
    }

    fn member_url(&self, target: &str) -> String {
        format!("{}/{}", self.collection_url(), target)
    }

    fn request(&self, method: reqwest::Method, url: String) -> reqwest::blocking::RequestBuilder {
        self.http
            .request(method, url)
            .basic_auth(&self.config.hatena_id, Some(&self.config.api_key))
            .header("Content-Type", "application/xml; charset=utf-8")
    }

    fn send_entry(
        &self,
        method: reqwest::Method,
        url: String,
        article: &Article,
        expected: u16,
    ) -> Result<RemoteEntry, AtomError> {
        let payload = render_entry(article)?;
        let resp = self.request(method, url).body(payload).send()?;
        let status = resp.status().as_u16();
        let body = resp.text()?;
        if status != expected {
            return Err(AtomError::from_status(status, body));
        }
        let entry: EntryDoc = quick_xml::de::from_str(&body)?;
        Ok(entry.into())
    }
}

impl EntryEndpoint for Client {
    fn list_entries(&self) -> Result<Vec<RemoteEntry>, AtomError> {
        let resp = self
            .request(reqwest::Method::GET, self.collection_url())
            .send()?;
        let status = resp.status().as_u16();
        let body = resp.text()?;
        if status != 200 {
            return Err(AtomError::from_status(status, body));
        }
        let feed: FeedDoc = quick_xml::de::from_str(&body)?;
        tracing::debug!(entries = feed.entries.len(), "fetched remote feed");
        Ok(feed.entries.into_iter().map(RemoteEntry::from).collect())
    }

    fn create_entry(&self, article: &Article) -> Result<RemoteEntry, AtomError> {
        self.send_entry(reqwest::Method::POST, self.collection_url(), article, 201)
    }

    fn update_entry(&self, target: &str, article: &Article) -> Result<RemoteEntry, AtomError> {
        self.send_entry(reqwest::Method::PUT, self.member_url(target), article, 200)
    }

    fn delete_entry(&self, target: &str) -> Result<(), AtomError> {
        let resp = self
            .request(reqwest::Method::DELETE, self.member_url(target))
            .send()?;
        let status = resp.status().as_u16();
        if status != 200 && status != 204 {
            let body = resp.text()?;
            return Err(AtomError::from_status(status, body));
        }
        Ok(())
    }
}

// ---- wire documents ----

#[derive(Serialize)]
#[serde(rename = "entry")]
struct EntryPayload<'a> {
    #[serde(rename = "@xmlns")]
    xmlns: &'a str,
    #[serde(rename = "@xmlns:app")]
    xmlns_app: &'a str,
    #[serde(rename = "@xmlns:hatenablog")]
    xmlns_hatena: &'a str,
    title: &'a str,
    content: ContentPayload<'a>,
    #[serde(rename = "hatenablog:custom-url", skip_serializing_if = "str::is_empty")]
    custom_url: &'a str,
}

#[derive(Serialize)]
struct ContentPayload<'a> {
    #[serde(rename = "@type")]
    kind: &'a str,
    #[serde(rename = "$text")]
    text: &'a str,
}

fn render_entry(article: &Article) -> Result<String, AtomError> {
    let payload = EntryPayload {
        xmlns: ATOM_NS,
        xmlns_app: APP_NS,
        xmlns_hatena: HATENA_NS,
        title: &article.title,
        content: ContentPayload {
            kind: "text/x-markdown",
            text: &article.body,
        },
        custom_url: &article.path,
    };
    Ok(quick_xml::se::to_string(&payload)?)
}

#[derive(Debug, Deserialize)]
struct FeedDoc {
    #[serde(rename = "entry", default)]
    entries: Vec<EntryDoc>,
}

#[derive(Debug, Deserialize, Default)]
struct EntryDoc {
    #[serde(default)]
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: ContentNode,
    #[serde(default)]
    updated: String,
    #[serde(rename = "link", default)]
    links: Vec<LinkNode>,
    // serde matching is by local name; the app: prefix is stripped.
    #[serde(rename = "control")]
    control: Option<ControlNode>,
}

#[derive(Debug, Deserialize, Default)]
struct ContentNode {
    #[serde(rename = "$text", default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct LinkNode {
    #[serde(rename = "@rel", default)]
    rel: String,
    #[serde(rename = "@href", default)]
    href: String,
}

#[derive(Debug, Deserialize, Default)]
struct ControlNode {
    #[serde(rename = "draft", default)]
    draft: String,
}

impl From<EntryDoc> for RemoteEntry {
    fn from(doc: EntryDoc) -> Self {
        let mut url = String::new();
        let mut edit_url = String::new();
        for link in &doc.links {
            match link.rel.as_str() {
                "alternate" => url = link.href.clone(),
                "edit" => edit_url = link.href.clone(),
                _ => {}
            }
        }
        RemoteEntry {
            id: doc.id,
            title: doc.title,
            body: doc.content.text,
            url,
            edit_url,
            updated: doc.updated,
            draft: doc.control.map(|c| c.draft == "yes").unwrap_or(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const FEED: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom" xmlns:app="http://www.w3.org/2007/app">
  <title>example blog</title>
  <entry>
    <id>tag:blog.hatena.ne.jp,2013:blog-someone-12921228815713000000</id>
    <title>First post</title>
    <link rel="alternate" type="text/html" href="https://example.hatenablog.com/entry/first"/>
    <link rel="edit" href="https://blog.hatena.ne.jp/someone/example/atom/entry/12921228815713000000"/>
    <updated>2024-03-01T10:00:00+09:00</updated>
    <content type="text/x-markdown">hello world</content>
    <app:control><app:draft>no</app:draft></app:control>
  </entry>
  <entry>
    <id>tag:blog.hatena.ne.jp,2013:blog-someone-12921228815713000001</id>
    <title>Draft post</title>
    <link rel="edit" href="https://blog.hatena.ne.jp/someone/example/atom/entry/12921228815713000001"/>
    <updated>2024-03-02T10:00:00+09:00</updated>
    <content type="text/x-markdown">unfinished</content>
    <app:control><app:draft>yes</app:draft></app:control>
  </entry>
</feed>"#;

    #[test]
    fn feed_decodes_entries_links_and_draft_flag() {
        let feed: FeedDoc = quick_xml::de::from_str(FEED).unwrap();
        let entries: Vec<RemoteEntry> = feed.entries.into_iter().map(RemoteEntry::from).collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "First post");
        assert_eq!(entries[0].body, "hello world");
        assert_eq!(entries[0].url, "https://example.hatenablog.com/entry/first");
        assert_eq!(
            entries[0].edit_url,
            "https://blog.hatena.ne.jp/someone/example/atom/entry/12921228815713000000"
        );
        assert!(!entries[0].draft);
        assert!(entries[1].draft);
        assert!(entries[1].url.is_empty());
    }

    #[test]
    fn rendered_entry_carries_title_body_and_custom_url() {
        let article = Article {
            title: "A <b>title".to_string(),
            path: "/entry/a".to_string(),
            identity: String::new(),
            body: "line & more".to_string(),
            file_path: PathBuf::from("a.md"),
        };
        let xml = render_entry(&article).unwrap();
        assert!(xml.contains("A &lt;b&gt;title"));
        assert!(xml.contains("line &amp; more"));
        assert!(xml.contains("<hatenablog:custom-url>/entry/a</hatenablog:custom-url>"));
        assert!(xml.contains(r#"xmlns="http://www.w3.org/2005/Atom""#));
    }

    #[test]
    fn empty_slug_is_omitted_from_the_payload() {
        let article = Article {
            title: "t".to_string(),
            path: String::new(),
            identity: String::new(),
            body: "b".to_string(),
            file_path: PathBuf::from("t.md"),
        };
        let xml = render_entry(&article).unwrap();
        assert!(!xml.contains("custom-url"));
    }

    #[test]
    fn rate_limit_marker_in_body_is_classified() {
        let err = AtomError::from_status(400, "Entry limit was exceeded, try tomorrow".to_string());
        assert!(err.is_rate_limit());
        let err = AtomError::from_status(500, "internal error".to_string());
        assert!(!err.is_rate_limit());
    }
}
