//! Plain text rendering for layouts.

use crate::error::{Error, Result};
use crate::model::Tree;

/// Convert a layout to plain text.
///
/// Words of a line are joined by spaces and every line ends with a newline.
/// An empty line separates paragraphs, and another one separates columns.
pub fn to_text(tree: &Tree) -> Result<String> {
    let page = tree.root().ok_or(Error::EmptyTree)?;
    let mut output = String::new();

    for (ci, &column) in tree.children(page).iter().enumerate() {
        if ci > 0 {
            output.push('\n');
        }
        for (pi, &para) in tree.children(column).iter().enumerate() {
            if pi > 0 {
                output.push('\n');
            }
            for &line in tree.children(para) {
                let words: Vec<&str> = tree
                    .children(line)
                    .iter()
                    .filter_map(|&word| tree.text(word))
                    .collect();
                output.push_str(&words.join(" "));
                output.push('\n');
            }
        }
    }

    Ok(output)
}

/// Plain text cannot be turned back into a layout.
pub fn from_text(_text: &str) -> Result<Tree> {
    Err(Error::Unsupported(
        "plain text carries no layout and cannot be read".to_string(),
    ))
}
