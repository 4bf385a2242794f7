//! Directed network graph.
//!
//! Nodes and links are stored in arenas keyed by their ids, so pruning is a
//! key removal and never leaves dangling references behind.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::ScenarioError;
use crate::domain::{Coord, Id, TravelMode};

pub type NodeId = Id<Node>;
pub type LinkId = Id<Link>;

/// A network node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub coord: Coord,
}

impl Node {
    pub fn new(id: NodeId, coord: Coord) -> Self {
        Self { id, coord }
    }
}

/// A directed link between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub id: LinkId,
    pub from: NodeId,
    pub to: NodeId,
    /// Length in metres.
    #[serde(default)]
    pub length_m: f64,
    /// Travel modes allowed on this link.
    #[serde(default)]
    pub modes: BTreeSet<TravelMode>,
}

impl Link {
    pub fn new(id: LinkId, from: NodeId, to: NodeId, length_m: f64) -> Self {
        Self {
            id,
            from,
            to,
            length_m,
            modes: BTreeSet::new(),
        }
    }

    /// Add a mode tag, returning the link for chaining.
    pub fn with_mode(mut self, mode: TravelMode) -> Self {
        self.modes.insert(mode);
        self
    }

    /// True if the link carries at least one mode accepted by `allowed`.
    pub fn has_any_mode(&self, allowed: impl Fn(&TravelMode) -> bool) -> bool {
        self.modes.iter().any(allowed)
    }
}

/// On-disk form of a network: flat node and link lists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct NetworkFile {
    nodes: Vec<Node>,
    links: Vec<Link>,
}

/// A directed graph of nodes and links.
///
/// Every link's endpoints exist as nodes; `add_link` rejects links that
/// would violate this.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "NetworkFile", into = "NetworkFile")]
pub struct Network {
    nodes: BTreeMap<NodeId, Node>,
    links: BTreeMap<LinkId, Link>,
}

impl Network {
    /// Create an empty network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node. Fails if a node with the same id exists.
    pub fn add_node(&mut self, node: Node) -> Result<(), ScenarioError> {
        if self.nodes.contains_key(&node.id) {
            return Err(ScenarioError::DuplicateId {
                kind: "node",
                id: node.id.to_string(),
            });
        }
        self.nodes.insert(node.id.clone(), node);
        Ok(())
    }

    /// Add a link. Fails on a duplicate id or a missing endpoint.
    pub fn add_link(&mut self, link: Link) -> Result<(), ScenarioError> {
        if self.links.contains_key(&link.id) {
            return Err(ScenarioError::DuplicateId {
                kind: "link",
                id: link.id.to_string(),
            });
        }
        for endpoint in [&link.from, &link.to] {
            if !self.nodes.contains_key(endpoint) {
                return Err(ScenarioError::MissingNode {
                    link: link.id.to_string(),
                    node: endpoint.to_string(),
                });
            }
        }
        self.links.insert(link.id.clone(), link);
        Ok(())
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn link(&self, id: &LinkId) -> Option<&Link> {
        self.links.get(id)
    }

    pub fn contains_link(&self, id: &LinkId) -> bool {
        self.links.contains_key(id)
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Iterate nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Iterate links in id order.
    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.links.values()
    }

    /// Iterate links mutably, e.g. to rewrite their mode tags.
    pub fn links_mut(&mut self) -> impl Iterator<Item = &mut Link> {
        self.links.values_mut()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.links.is_empty()
    }

    /// Keep only links for which `keep` returns true.
    pub fn retain_links(&mut self, mut keep: impl FnMut(&Link) -> bool) {
        self.links.retain(|_, link| keep(link));
    }

    /// Keep only nodes for which `keep` returns true.
    ///
    /// Callers must not remove an endpoint of a remaining link.
    pub fn retain_nodes(&mut self, mut keep: impl FnMut(&Node) -> bool) {
        self.nodes.retain(|_, node| keep(node));
    }

    /// Ids of all nodes that are an endpoint of at least one link.
    pub fn endpoint_node_ids(&self) -> BTreeSet<NodeId> {
        self.links
            .values()
            .flat_map(|link| [link.from.clone(), link.to.clone()])
            .collect()
    }

    /// Check that every link's endpoints exist.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        for link in self.links.values() {
            for endpoint in [&link.from, &link.to] {
                if !self.nodes.contains_key(endpoint) {
                    return Err(ScenarioError::MissingNode {
                        link: link.id.to_string(),
                        node: endpoint.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl TryFrom<NetworkFile> for Network {
    type Error = ScenarioError;

    fn try_from(file: NetworkFile) -> Result<Self, Self::Error> {
        let mut network = Network::new();
        for node in file.nodes {
            network.add_node(node)?;
        }
        for link in file.links {
            network.add_link(link)?;
        }
        Ok(network)
    }
}

impl From<Network> for NetworkFile {
    fn from(network: Network) -> Self {
        NetworkFile {
            nodes: network.nodes.into_values().collect(),
            links: network.links.into_values().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_id(s: &str) -> NodeId {
        NodeId::parse(s).unwrap()
    }

    fn link_id(s: &str) -> LinkId {
        LinkId::parse(s).unwrap()
    }

    fn line_network() -> Network {
        let mut network = Network::new();
        for (i, id) in ["a", "b", "c"].iter().enumerate() {
            network
                .add_node(Node::new(node_id(id), Coord::new(i as f64, 0.0)))
                .unwrap();
        }
        network
            .add_link(Link::new(link_id("ab"), node_id("a"), node_id("b"), 100.0))
            .unwrap();
        network
            .add_link(Link::new(link_id("bc"), node_id("b"), node_id("c"), 100.0))
            .unwrap();
        network
    }

    #[test]
    fn add_and_lookup() {
        let network = line_network();
        assert_eq!(network.node_count(), 3);
        assert_eq!(network.link_count(), 2);
        assert!(network.contains_link(&link_id("ab")));
        assert_eq!(network.link(&link_id("bc")).unwrap().from, node_id("b"));
        assert!(network.node(&node_id("z")).is_none());
    }

    #[test]
    fn reject_duplicate_node() {
        let mut network = line_network();
        let err = network
            .add_node(Node::new(node_id("a"), Coord::default()))
            .unwrap_err();
        assert_eq!(
            err,
            ScenarioError::DuplicateId {
                kind: "node",
                id: "a".into()
            }
        );
    }

    #[test]
    fn reject_link_with_missing_endpoint() {
        let mut network = line_network();
        let err = network
            .add_link(Link::new(link_id("cz"), node_id("c"), node_id("z"), 1.0))
            .unwrap_err();
        assert_eq!(
            err,
            ScenarioError::MissingNode {
                link: "cz".into(),
                node: "z".into()
            }
        );
    }

    #[test]
    fn retain_links_and_endpoints() {
        let mut network = line_network();
        network.retain_links(|link| link.id.as_str() == "ab");
        assert_eq!(network.link_count(), 1);

        let endpoints = network.endpoint_node_ids();
        assert_eq!(endpoints.len(), 2);
        assert!(endpoints.contains(&node_id("a")));
        assert!(!endpoints.contains(&node_id("c")));

        network.retain_nodes(|node| endpoints.contains(&node.id));
        assert_eq!(network.node_count(), 2);
        assert!(network.validate().is_ok());
    }

    #[test]
    fn validate_detects_removed_endpoint() {
        let mut network = line_network();
        network.retain_nodes(|node| node.id.as_str() != "c");
        assert!(network.validate().is_err());
    }

    #[test]
    fn has_any_mode() {
        let link = Link::new(link_id("l"), node_id("a"), node_id("b"), 1.0)
            .with_mode(TravelMode::Other("rail".into()));
        assert!(link.has_any_mode(|m| m.as_str() == "rail"));
        assert!(!link.has_any_mode(|m| m.as_str() == "car"));
    }

    #[test]
    fn serde_roundtrip_through_file_form() {
        let mut network = line_network();
        for link in network.links_mut() {
            link.modes.insert(TravelMode::Other("rail".into()));
        }
        let json = serde_json::to_string(&network).unwrap();
        let back: Network = serde_json::from_str(&json).unwrap();
        assert_eq!(back, network);
    }

    #[test]
    fn deserialize_rejects_dangling_link() {
        let json = r#"{
            "nodes": [{"id": "a", "coord": {"x": 0.0, "y": 0.0}}],
            "links": [{"id": "l", "from": "a", "to": "b", "lengthM": 1.0, "modes": ["rail"]}]
        }"#;
        let err = serde_json::from_str::<Network>(json).unwrap_err();
        assert!(err.to_string().contains("missing node b"));
    }
}
