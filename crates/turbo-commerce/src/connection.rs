//! Collection normalization.
//!
//! The storefront returns lists either as paginated connections
//! (`{"edges": [{"node": ..}]}`) or as flat node arrays (`{"nodes": [..]}`).
//! Callers never care which; [`normalize`] flattens both into a `Vec`.

use serde::{Deserialize, Deserializer, Serialize};

/// One pagination edge wrapping an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge<T> {
    /// The wrapped item.
    pub node: T,
}

/// A collection in either of the two shapes the backend returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection<T> {
    /// Paginated shape.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edges: Option<Vec<Edge<T>>>,
    /// Flat shape.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nodes: Option<Vec<T>>,
}

impl<T> Connection<T> {
    /// Build the flat shape.
    pub fn from_nodes(nodes: Vec<T>) -> Self {
        Self {
            edges: None,
            nodes: Some(nodes),
        }
    }

    /// Build the paginated shape.
    pub fn from_edges(items: Vec<T>) -> Self {
        Self {
            edges: Some(items.into_iter().map(|node| Edge { node }).collect()),
            nodes: None,
        }
    }

    /// Flatten into items, in order. `edges` wins if both are present.
    pub fn into_vec(self) -> Vec<T> {
        match (self.edges, self.nodes) {
            (Some(edges), _) => edges.into_iter().map(|edge| edge.node).collect(),
            (None, Some(nodes)) => nodes,
            (None, None) => Vec::new(),
        }
    }
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self {
            edges: None,
            nodes: None,
        }
    }
}

/// Flatten an optional connection. Absent input is an empty list, never an
/// error: partially loaded data is normal during optimistic updates.
pub fn normalize<T>(input: Option<Connection<T>>) -> Vec<T> {
    input.map(Connection::into_vec).unwrap_or_default()
}

/// `deserialize_with` adapter: read a connection field straight into a `Vec`.
pub fn flatten<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Connection<T>>::deserialize(deserializer).map(normalize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> Option<Connection<i32>> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_absent_is_empty() {
        assert_eq!(normalize::<i32>(None), Vec::<i32>::new());
        assert_eq!(normalize(parse(json!(null))), Vec::<i32>::new());
        assert_eq!(normalize(parse(json!({}))), Vec::<i32>::new());
    }

    #[test]
    fn test_flat_nodes() {
        assert_eq!(normalize(parse(json!({"nodes": [1, 2]}))), vec![1, 2]);
    }

    #[test]
    fn test_edges() {
        assert_eq!(
            normalize(parse(json!({"edges": [{"node": 1}, {"node": 2}]}))),
            vec![1, 2]
        );
    }

    #[test]
    fn test_edges_win_over_nodes() {
        let conn = parse(json!({"edges": [{"node": 3}], "nodes": [1, 2]}));
        assert_eq!(normalize(conn), vec![3]);
    }

    #[test]
    fn test_flatten_field() {
        #[derive(Deserialize)]
        struct Product {
            #[serde(default, deserialize_with = "flatten")]
            images: Vec<String>,
        }

        let p: Product = serde_json::from_value(json!({"images": {"nodes": ["a.png"]}})).unwrap();
        assert_eq!(p.images, vec!["a.png"]);
        let p: Product = serde_json::from_value(json!({"images": null})).unwrap();
        assert!(p.images.is_empty());
        let p: Product = serde_json::from_value(json!({})).unwrap();
        assert!(p.images.is_empty());
    }

    #[test]
    fn test_items_without_default() {
        #[derive(Debug, PartialEq, Deserialize)]
        struct Sku(String);

        #[derive(Deserialize)]
        struct Listing {
            #[serde(default, deserialize_with = "flatten")]
            skus: Vec<Sku>,
        }

        let conn: Connection<Sku> = serde_json::from_value(json!({"nodes": ["A-1"]})).unwrap();
        assert_eq!(conn.into_vec(), vec![Sku("A-1".into())]);
        let conn: Connection<Sku> = serde_json::from_value(json!({})).unwrap();
        assert!(conn.into_vec().is_empty());

        let listing: Listing =
            serde_json::from_value(json!({"skus": {"edges": [{"node": "B-2"}]}})).unwrap();
        assert_eq!(listing.skus, vec![Sku("B-2".into())]);
    }

    #[test]
    fn test_builders() {
        assert_eq!(Connection::from_edges(vec!["a", "b"]).into_vec(), vec!["a", "b"]);
        assert_eq!(Connection::from_nodes(vec![7]).into_vec(), vec![7]);
    }
}
