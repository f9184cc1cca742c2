//! Visit planning for a batch crawl
//!
//! Discovered hrefs are resolved against the site root, filtered, and
//! de-duplicated into the ordered list of pages the coordinator visits.

use crate::url::{normalize_url, resolve_href, same_site, IgnoreList};
use std::collections::HashSet;
use url::Url;

/// The ordered set of pages to visit, plus what was filtered out
#[derive(Debug, Default)]
pub struct Frontier {
    urls: Vec<Url>,
    seen: HashSet<Url>,

    /// Links dropped because they matched the ignore list
    pub ignored: usize,

    /// Links dropped because an equivalent URL was already queued
    pub duplicates: usize,

    /// Links dropped because they leave the site or do not resolve
    pub off_site: usize,

    /// Discovered links that made it into the visit list
    pub accepted: usize,
}

impl Frontier {
    /// Builds the visit list for one crawl
    ///
    /// Discovered links keep their document order; the seed comes last
    /// unless `skip_seed` is set. Each distinct page appears once.
    pub fn plan(root: &Url, seed: &Url, discovered: &[String], ignore: &IgnoreList, skip_seed: bool) -> Self {
        let mut frontier = Self::default();

        for href in discovered {
            match resolve_href(root, href) {
                Ok(url) => {
                    if frontier.offer(root, url, ignore) {
                        frontier.accepted += 1;
                    }
                }
                Err(e) => {
                    tracing::debug!("Skipping unresolvable link {:?}: {}", href, e);
                    frontier.off_site += 1;
                }
            }
        }

        if !skip_seed {
            frontier.offer(root, seed.clone(), ignore);
        }

        frontier
    }

    /// Queues `url` unless it is filtered out; returns whether it was queued
    ///
    /// The ignore list sees the fragment, the visit list does not: section
    /// anchors of one page are the same visit.
    fn offer(&mut self, root: &Url, url: Url, ignore: &IgnoreList) -> bool {
        if !same_site(root, &url) {
            tracing::debug!("Skipping off-site link {}", url);
            self.off_site += 1;
            return false;
        }
        if ignore.contains(&url) {
            tracing::debug!("Ignoring {}", url);
            self.ignored += 1;
            return false;
        }

        let mut key = normalize_url(&url);
        key.set_fragment(None);
        if self.seen.insert(key.clone()) {
            self.urls.push(key);
            true
        } else {
            self.duplicates += 1;
            false
        }
    }

    pub fn urls(&self) -> &[Url] {
        &self.urls
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn into_urls(self) -> Vec<Url> {
        self.urls
    }
}
