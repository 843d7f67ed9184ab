// src/crawl/frontier.rs
// =============================================================================
// The frontier: which URLs are still waiting to be crawled.
//
// Two collections, as in any breadth-first search:
// - queue: FIFO of URLs waiting to be visited
// - visited: URLs already handed out by next()
//
// A third set, `enqueued`, mirrors the queue so "is it already queued?" is
// an O(1) lookup instead of a scan of the VecDeque.
//
// Every URL is normalized on the way in, so the sets compare canonical keys.
// The frontier belongs to exactly one crawl loop; it is never shared, so it
// needs no locking.
// =============================================================================

use super::normalize;
use std::collections::{HashSet, VecDeque};

#[derive(Debug)]
pub struct Frontier {
    queue: VecDeque<String>,
    enqueued: HashSet<String>,
    visited: HashSet<String>,
}

impl Frontier {
    /// Creates a frontier seeded with the (normalized) start URL.
    pub fn new(start_url: &str) -> Self {
        let mut frontier = Frontier {
            queue: VecDeque::new(),
            enqueued: HashSet::new(),
            visited: HashSet::new(),
        };
        frontier.offer(start_url);
        frontier
    }

    /// Pops the next URL to crawl and marks it visited.
    ///
    /// Returns None when the queue is empty.
    pub fn next(&mut self) -> Option<String> {
        while let Some(url) = self.queue.pop_front() {
            self.enqueued.remove(&url);
            // offer() already refuses visited URLs, but stay safe if that changes
            if self.visited.insert(url.clone()) {
                return Some(url);
            }
        }
        None
    }

    /// Queues a URL unless it was already visited or is already waiting.
    ///
    /// Returns true if the URL was added.
    pub fn offer(&mut self, url: &str) -> bool {
        let url = normalize(url);
        if self.visited.contains(&url) || self.enqueued.contains(&url) {
            return false;
        }
        self.enqueued.insert(url.clone());
        self.queue.push_back(url);
        true
    }

    #[cfg(test)]
    pub(crate) fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(&normalize(url))
    }

    /// Number of URLs handed out so far.
    pub fn visited_len(&self) -> usize {
        self.visited.len()
    }

    /// Number of URLs still waiting.
    pub fn queued_len(&self) -> usize {
        self.queue.len()
    }
}
