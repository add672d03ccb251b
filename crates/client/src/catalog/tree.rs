//! Category tree normalization.
//!
//! The category endpoints have returned two shapes over time: a nested
//! tree (each node carrying a `children` array) and a flat list where each
//! node references its parent by id, under several field spellings. The
//! tree consumers (rendering, drag-and-drop reordering) should not care
//! which shape came back, so everything funnels through
//! [`normalize_categories`] into one adjacency structure.
//!
//! The normalizer never fails: payloads that don't look like categories at
//! all produce an empty tree, which is exactly what "no categories yet"
//! produces too.

use std::collections::HashMap;

use serde_json::Value;

use backroom_core::CategoryId;

/// Object keys under which the category array may be wrapped.
const LIST_KEYS: [&str; 3] = ["items", "data", "categories"];

/// One normalized category.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CategoryNode {
    /// Display name; empty when the payload carried none.
    pub name: String,
    /// Child ids, in input order.
    pub children: Vec<CategoryId>,
}

/// A normalized category adjacency structure.
///
/// Every id in `root_children` and in any node's `children` list exists as
/// a key in `items`, with one deliberate exception in flat inputs: a node
/// whose parent id is not present in the input set is promoted to a root
/// rather than dropped (see [`normalize_categories`]).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CategoryTree {
    /// Every category, keyed by string-coerced id.
    pub items: HashMap<CategoryId, CategoryNode>,
    /// Ids with no resolvable parent, in input order.
    pub root_children: Vec<CategoryId>,
}

impl CategoryTree {
    /// Whether the tree holds no categories.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of categories in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Look up a node by id.
    #[must_use]
    pub fn get(&self, id: &CategoryId) -> Option<&CategoryNode> {
        self.items.get(id)
    }
}

/// The two input shapes, decided once per payload.
///
/// The detection is a heuristic, not a schema check: if *any* element
/// carries a non-empty `children` array the whole input is treated as
/// nested. Mixed-shape inputs are not specifically supported; flat
/// stragglers inside a nested payload are not independently reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CategoryInput {
    Nested,
    Flat,
}

/// Normalize a raw category payload into an adjacency structure.
///
/// Accepts a bare array or an object wrapping one under `items`, `data`,
/// or `categories`; anything else yields an empty tree. The input is
/// never mutated, the output preserves input order everywhere, and the
/// function is pure: equal inputs produce equal trees.
#[must_use]
pub fn normalize_categories(payload: &Value) -> CategoryTree {
    let Some(list) = extract_list(payload) else {
        return CategoryTree::default();
    };

    match classify(list) {
        CategoryInput::Nested => build_nested(list),
        CategoryInput::Flat => build_flat(list),
    }
}

fn extract_list(payload: &Value) -> Option<&Vec<Value>> {
    match payload {
        Value::Array(list) => Some(list),
        Value::Object(wrapper) => LIST_KEYS
            .iter()
            .find_map(|key| wrapper.get(*key).and_then(Value::as_array)),
        _ => None,
    }
}

fn classify(list: &[Value]) -> CategoryInput {
    let any_nested = list.iter().any(|node| {
        node.get("children")
            .and_then(Value::as_array)
            .is_some_and(|children| !children.is_empty())
    });

    if any_nested {
        CategoryInput::Nested
    } else {
        CategoryInput::Flat
    }
}

// =============================================================================
// Nested input
// =============================================================================

fn build_nested(list: &[Value]) -> CategoryTree {
    let mut tree = CategoryTree::default();

    for node in list {
        visit_nested(node, true, &mut tree);
    }

    tree
}

/// Depth-first registration of a nested node and its declared children.
fn visit_nested(node: &Value, is_root: bool, tree: &mut CategoryTree) {
    let Some(id) = node.get("id").and_then(CategoryId::from_value) else {
        return;
    };

    tree.items.insert(
        id.clone(),
        CategoryNode {
            name: node_name(node),
            children: Vec::new(),
        },
    );

    if is_root {
        tree.root_children.push(id.clone());
    }

    for child in node
        .get("children")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
    {
        let Some(child_id) = child.get("id").and_then(CategoryId::from_value) else {
            continue;
        };

        if let Some(parent) = tree.items.get_mut(&id) {
            parent.children.push(child_id);
        }
        visit_nested(child, false, tree);
    }
}

// =============================================================================
// Flat input
// =============================================================================

/// Three passes over the full input, so parent references that point
/// forward in the array resolve just like backward ones.
fn build_flat(list: &[Value]) -> CategoryTree {
    // Pass 1: index every element by its string-coerced id.
    let mut order: Vec<(CategoryId, String)> = Vec::with_capacity(list.len());
    for node in list {
        if let Some(id) = node.get("id").and_then(CategoryId::from_value) {
            order.push((id, node_name(node)));
        }
    }

    let mut children: HashMap<CategoryId, Vec<CategoryId>> =
        order.iter().map(|(id, _)| (id.clone(), Vec::new())).collect();

    // Pass 2: attach each element to its parent, or to the root list.
    // A parent id pointing outside the supplied set promotes the child to
    // a root instead of dropping it; strict referential integrity is not
    // this function's contract.
    let mut root_children = Vec::new();
    for node in list {
        let Some(id) = node.get("id").and_then(CategoryId::from_value) else {
            continue;
        };

        match resolve_parent(node) {
            Some(parent_id) if children.contains_key(&parent_id) => {
                if let Some(siblings) = children.get_mut(&parent_id) {
                    siblings.push(id);
                }
            }
            _ => root_children.push(id),
        }
    }

    // Pass 3: pair each indexed id with its name and accumulated children.
    // An id indexed twice keeps its accumulated children and the latest
    // name, matching the overwrite semantics of a plain map index.
    let mut items: HashMap<CategoryId, CategoryNode> = HashMap::with_capacity(order.len());
    for (id, name) in order {
        let node_children = children.remove(&id);
        let entry = items.entry(id).or_default();
        entry.name = name;
        if let Some(accumulated) = node_children {
            entry.children = accumulated;
        }
    }

    CategoryTree {
        items,
        root_children,
    }
}

/// Resolve a flat node's parent reference, trying the known field
/// spellings in order. `null`, a missing field, `0`, and `"0"` all mean
/// "no parent".
fn resolve_parent(node: &Value) -> Option<CategoryId> {
    let raw = node
        .get("parent_id")
        .filter(|v| !v.is_null())
        .or_else(|| node.get("parentId").filter(|v| !v.is_null()))
        .or_else(|| {
            node.get("parent")
                .and_then(|parent| parent.get("id"))
                .filter(|v| !v.is_null())
        })?;

    if is_zero(raw) {
        return None;
    }

    CategoryId::from_value(raw)
}

fn is_zero(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s == "0",
        _ => false,
    }
}

fn node_name(node: &Value) -> String {
    node.get("name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned()
}
