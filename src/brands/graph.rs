use crate::model::BrandConnection;
use std::collections::{BTreeSet, HashMap};

static NO_NEIGHBORS: BTreeSet<String> = BTreeSet::new();

/// Undirected graph of brand names built from co-occurrence observations.
/// Node order is first-insertion order.
#[derive(Debug, Default, Clone)]
pub struct BrandGraph {
    order: Vec<String>,
    adjacency: HashMap<String, BTreeSet<String>>,
}

impl BrandGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_connections<'a, I>(connections: I) -> Self
    where
        I: IntoIterator<Item = &'a BrandConnection>,
    {
        let mut graph = Self::new();
        for c in connections {
            graph.add_connection(&c.primary, &c.related);
        }
        graph
    }

    /// Inserts symmetric edges between `primary` and each related brand.
    pub fn add_connection<S: AsRef<str>>(&mut self, primary: &str, related: &[S]) {
        let primary = primary.trim().to_lowercase();
        if primary.is_empty() {
            return;
        }
        self.ensure_node(&primary);
        for brand in related {
            let brand = brand.as_ref().trim().to_lowercase();
            if brand.is_empty() {
                continue;
            }
            self.ensure_node(&brand);
            if brand == primary {
                continue;
            }
            self.link(&primary, &brand);
            self.link(&brand, &primary);
        }
    }

    fn ensure_node(&mut self, brand: &str) {
        if !self.adjacency.contains_key(brand) {
            self.order.push(brand.to_string());
            self.adjacency.insert(brand.to_string(), BTreeSet::new());
        }
    }

    fn link(&mut self, from: &str, to: &str) {
        if let Some(set) = self.adjacency.get_mut(from) {
            set.insert(to.to_string());
        }
    }

    /// Direct neighbors of `brand`; empty when the brand is unknown.
    pub fn neighbors(&self, brand: &str) -> &BTreeSet<String> {
        self.adjacency
            .get(&brand.to_lowercase())
            .unwrap_or(&NO_NEIGHBORS)
    }

    pub fn contains(&self, brand: &str) -> bool {
        self.adjacency.contains_key(&brand.to_lowercase())
    }

    /// Brands in first-insertion order.
    pub fn brands(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
