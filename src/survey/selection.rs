use std::collections::HashSet;

use crate::models::{Movie, MovieId};

/// Number of movies a completed survey must contain
pub const CAPACITY: usize = 10;

/// Result of toggling one movie
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Added,
    Removed,
    /// Not selected and the set is already full; nothing changed
    AtCapacity,
}

/// Ordered, duplicate-free selection bounded at [`CAPACITY`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionSet {
    movies: Vec<Movie>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self, movie: &Movie) -> Toggle {
        if let Some(index) = self.position(&movie.movie_id) {
            self.movies.remove(index);
            return Toggle::Removed;
        }
        if self.movies.len() >= CAPACITY {
            return Toggle::AtCapacity;
        }
        self.movies.push(movie.clone());
        Toggle::Added
    }

    pub fn contains(&self, id: &MovieId) -> bool {
        self.position(id).is_some()
    }

    fn position(&self, id: &MovieId) -> Option<usize> {
        self.movies.iter().position(|m| &m.movie_id == id)
    }

    pub fn ids(&self) -> Vec<MovieId> {
        self.movies.iter().map(|m| m.movie_id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.movies.len() == CAPACITY
    }

    pub fn clear(&mut self) {
        self.movies.clear();
    }
}

/// Ids already offered this session. Grows only.
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    order: Vec<MovieId>,
    seen: HashSet<MovieId>,
}

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `id`; returns false if it was already present
    pub fn insert(&mut self, id: MovieId) -> bool {
        if !self.seen.insert(id.clone()) {
            return false;
        }
        self.order.push(id);
        true
    }

    pub fn contains(&self, id: &MovieId) -> bool {
        self.seen.contains(id)
    }

    /// Ids in the order they were first shown
    pub fn ids(&self) -> &[MovieId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Selection progress as displayed above the grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub count: usize,
    pub capacity: usize,
}

impl Progress {
    pub fn percent(&self) -> f64 {
        self.count as f64 / self.capacity as f64 * 100.0
    }

    pub fn rounded_percent(&self) -> u32 {
        self.percent().round() as u32
    }
}
