use super::graph::BrandGraph;
use std::collections::{BTreeSet, HashMap};

/// Per-node transitive closure of a [`BrandGraph`].
///
/// Every brand of the graph resolves to its whole connected component
/// (itself included). Members of one component share a single set, and
/// `components()` yields each component once, keyed by its representative:
/// the member inserted into the graph first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EquivalenceClasses {
    classes: Vec<(String, BTreeSet<String>)>,
    index: HashMap<String, usize>,
}

/// Computes the closure of every brand. A brand reached by an earlier
/// traversal already has its full component, so it is only indexed.
pub fn flatten(graph: &BrandGraph) -> EquivalenceClasses {
    let mut classes = Vec::new();
    let mut index = HashMap::with_capacity(graph.len());

    for brand in graph.brands() {
        if index.contains_key(brand) {
            continue;
        }
        let closure = reachable_from(graph, brand);
        let id = classes.len();
        for member in &closure {
            index.insert(member.clone(), id);
        }
        classes.push((brand.to_string(), closure));
    }

    EquivalenceClasses { classes, index }
}

fn reachable_from(graph: &BrandGraph, start: &str) -> BTreeSet<String> {
    let mut reached = BTreeSet::new();
    reached.insert(start.to_string());
    let mut stack = vec![start.to_string()];

    while let Some(current) = stack.pop() {
        for next in graph.neighbors(&current) {
            if reached.insert(next.clone()) {
                stack.push(next.clone());
            }
        }
    }

    reached
}

impl EquivalenceClasses {
    /// Full closure of `brand`, or `None` when the brand is not in the graph.
    pub fn class_of(&self, brand: &str) -> Option<&BTreeSet<String>> {
        self.index
            .get(&brand.to_lowercase())
            .map(|&id| &self.classes[id].1)
    }

    /// Representative key of the component containing `brand`.
    pub fn representative_of(&self, brand: &str) -> Option<&str> {
        self.index
            .get(&brand.to_lowercase())
            .map(|&id| self.classes[id].0.as_str())
    }

    /// Each connected component once, in representative insertion order.
    pub fn components(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.classes.iter().map(|(key, class)| (key.as_str(), class))
    }

    /// Number of brands with a closure.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn component_count(&self) -> usize {
        self.classes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn chain_is_closed_for_every_member() {
        let mut g = BrandGraph::new();
        g.add_connection("a", &["b"]);
        g.add_connection("c", &["b"]);
        g.add_connection("d", &["c"]);
        g.add_connection("x", &["y"]);

        let classes = flatten(&g);
        let abcd = set(&["a", "b", "c", "d"]);
        for brand in ["a", "b", "c", "d"] {
            assert_eq!(classes.class_of(brand), Some(&abcd));
        }
        assert_eq!(classes.class_of("y"), Some(&set(&["x", "y"])));
        assert_eq!(classes.len(), 6);
        assert!(classes.class_of("zzz").is_none());
    }

    #[test]
    fn components_are_yielded_once_keyed_by_first_inserted_member() {
        let mut g = BrandGraph::new();
        g.add_connection("bayer", &["bepanthen", "aspirin"]);
        g.add_connection("nivea", &["beiersdorf"]);
        g.add_connection("aspirin", &["bayer ag"]);

        let classes = flatten(&g);
        let keys: Vec<&str> = classes.components().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["bayer", "nivea"]);
        assert_eq!(classes.component_count(), 2);
        assert_eq!(classes.representative_of("bayer ag"), Some("bayer"));
        assert_eq!(classes.representative_of("beiersdorf"), Some("nivea"));
    }

    #[test]
    fn later_edge_merges_components_under_earliest_member() {
        let mut g = BrandGraph::new();
        g.add_connection("a", &["b"]);
        g.add_connection("c", &["d"]);
        g.add_connection("d", &["b"]);

        let classes = flatten(&g);
        let comps: Vec<(&str, &BTreeSet<String>)> = classes.components().collect();
        assert_eq!(comps.len(), 1);
        assert_eq!(comps[0].0, "a");
        assert_eq!(comps[0].1, &set(&["a", "b", "c", "d"]));
    }

    #[test]
    fn component_members_share_one_set() {
        let mut g = BrandGraph::new();
        g.add_connection("bayer", &["bepanthen", "aspirin"]);

        let classes = flatten(&g);
        let bayer = classes.class_of("bayer").unwrap();
        let aspirin = classes.class_of("aspirin").unwrap();
        assert!(std::ptr::eq(bayer, aspirin));
        assert_eq!(classes.len(), 3);
        assert_eq!(classes.component_count(), 1);
    }

    #[test]
    fn empty_graph_has_no_classes() {
        let classes = flatten(&BrandGraph::new());
        assert!(classes.is_empty());
        assert_eq!(classes.components().count(), 0);
        assert!(classes.representative_of("bayer").is_none());
    }

    #[test]
    fn isolated_brand_is_its_own_class() {
        let mut g = BrandGraph::new();
        g.add_connection("solo", &["solo"]);
        let classes = flatten(&g);
        assert_eq!(classes.class_of("solo"), Some(&set(&["solo"])));
    }

    fn graph_from_edges(edges: &[(u8, u8)]) -> BrandGraph {
        let mut g = BrandGraph::new();
        for (a, b) in edges {
            g.add_connection(&format!("b{a}"), &[format!("b{b}")]);
        }
        g
    }

    proptest! {
        #[test]
        fn connected_brands_share_one_closure(edges in prop::collection::vec((0u8..20, 0u8..20), 0..40)) {
            let g = graph_from_edges(&edges);
            let classes = flatten(&g);
            for brand in g.brands() {
                let class = classes.class_of(brand).unwrap();
                prop_assert!(class.contains(brand));
                for other in class {
                    prop_assert_eq!(classes.class_of(other), Some(class));
                }
            }
        }

        #[test]
        fn flattening_is_idempotent(edges in prop::collection::vec((0u8..20, 0u8..20), 0..40)) {
            let g = graph_from_edges(&edges);
            prop_assert_eq!(flatten(&g), flatten(&g));
        }

        #[test]
        fn components_partition_the_graph(edges in prop::collection::vec((0u8..20, 0u8..20), 0..40)) {
            let g = graph_from_edges(&edges);
            let classes = flatten(&g);
            let mut seen = HashSet::new();
            for (_, class) in classes.components() {
                for brand in class {
                    prop_assert!(seen.insert(brand.clone()));
                }
            }
            prop_assert_eq!(seen.len(), g.len());
        }
    }
}
