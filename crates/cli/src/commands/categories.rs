//! Category catalog commands.

use backroom_client::catalog::{CatalogClient, CategoryTree};
use backroom_core::CategoryId;

use super::{CliError, open_session};

/// Fetch the tenant's categories and render them as an indented tree.
#[allow(clippy::print_stdout)]
pub async fn tree() -> Result<(), CliError> {
    let session = open_session()?;
    let catalog = CatalogClient::new(session.api().clone());

    let tree = catalog.category_tree().await?;
    if tree.is_empty() {
        println!("no categories");
        return Ok(());
    }

    print!("{}", render(&tree));
    Ok(())
}

/// Render a normalized tree as indented text, preserving catalog order.
fn render(tree: &CategoryTree) -> String {
    let mut out = String::new();
    for root in &tree.root_children {
        render_node(tree, root, 0, &mut out);
    }
    out
}

fn render_node(tree: &CategoryTree, id: &CategoryId, depth: usize, out: &mut String) {
    let Some(node) = tree.get(id) else {
        return;
    };

    let indent = "  ".repeat(depth);
    out.push_str(&format!("{indent}{} [{id}]\n", node.name));

    for child in &node.children {
        render_node(tree, child, depth + 1, out);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use backroom_client::catalog::normalize_categories;
    use serde_json::json;

    #[test]
    fn test_render_indents_children() {
        let tree = normalize_categories(&json!([
            {"id": 1, "name": "Apparel", "parent_id": null},
            {"id": 2, "name": "Shirts", "parent_id": 1},
            {"id": 3, "name": "Mugs", "parent_id": null},
        ]));

        let rendered = render(&tree);
        assert_eq!(rendered, "Apparel [1]\n  Shirts [2]\nMugs [3]\n");
    }
}
