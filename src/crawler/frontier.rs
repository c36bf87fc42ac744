//! Frontier and visited set for the crawl loop
//!
//! The frontier is a deque popped from the back. Where a newly discovered ID
//! lands depends on the configured [`InsertionOrder`]: at the back it is crawled
//! next (depth-first), at the front it waits behind everything already queued
//! (breadth-first).

use crate::config::InsertionOrder;
use std::collections::{HashSet, VecDeque};

/// IDs awaiting a fetch, without duplicates
#[derive(Debug, Clone)]
pub struct Frontier {
    queue: VecDeque<String>,
    members: HashSet<String>,
    order: InsertionOrder,
}

impl Frontier {
    pub fn new(order: InsertionOrder) -> Self {
        Self {
            queue: VecDeque::new(),
            members: HashSet::new(),
            order,
        }
    }

    /// Builds a frontier from IDs in stored order
    ///
    /// The last ID is popped first, so a persisted frontier reloads in the same
    /// order it was written. Duplicates keep their first position.
    pub fn from_ids<I>(ids: I, order: InsertionOrder) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut frontier = Self::new(order);
        for id in ids {
            if frontier.members.insert(id.clone()) {
                frontier.queue.push_back(id);
            }
        }
        frontier
    }

    /// Queues a newly discovered ID
    ///
    /// Returns false if the ID was already queued.
    pub fn insert(&mut self, id: String) -> bool {
        if !self.members.insert(id.clone()) {
            return false;
        }
        match self.order {
            InsertionOrder::DepthFirst => self.queue.push_back(id),
            InsertionOrder::BreadthFirst => self.queue.push_front(id),
        }
        true
    }

    /// Takes the next ID to fetch
    pub fn pop(&mut self) -> Option<String> {
        let id = self.queue.pop_back()?;
        self.members.remove(&id);
        Some(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.members.contains(id)
    }

    pub fn order(&self) -> InsertionOrder {
        self.order
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Queued IDs in stored order
    pub fn to_vec(&self) -> Vec<String> {
        self.queue.iter().cloned().collect()
    }
}

/// IDs already processed in this run, in the order they were processed
#[derive(Debug, Clone, Default)]
pub struct VisitedSet {
    order: Vec<String>,
    members: HashSet<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks an ID visited; returns false if it already was
    pub fn insert(&mut self, id: String) -> bool {
        if !self.members.insert(id.clone()) {
            return false;
        }
        self.order.push(id);
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.members.contains(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.order.clone()
    }
}

impl FromIterator<String> for VisitedSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut visited = Self::new();
        for id in iter {
            visited.insert(id);
        }
        visited
    }
}
