//! djvused writer.

use std::io::Write;

use crate::error::{Error, Result};
use crate::model::{NodeId, Tree};

use super::RenderOptions;

/// Write `tree` as a djvused hidden-text script.
///
/// Each node opens on its own line, indented by nesting depth. Word text goes
/// on the following line, one level deeper. Siblings are separated by a
/// newline; closing parentheses follow the last sibling directly.
pub fn write_djvused<W: Write>(out: &mut W, tree: &Tree, options: &RenderOptions) -> Result<()> {
    let root = tree.root().ok_or(Error::EmptyTree)?;
    write_node(out, tree, root, 0, options.indent)?;
    out.write_all(b"\n")?;
    Ok(())
}

/// Render `tree` to a djvused string.
pub fn to_djvused(tree: &Tree, options: &RenderOptions) -> Result<String> {
    let mut buf = Vec::new();
    write_djvused(&mut buf, tree, options)?;
    String::from_utf8(buf).map_err(|e| Error::Render(e.to_string()))
}

fn write_node<W: Write>(
    out: &mut W,
    tree: &Tree,
    id: NodeId,
    depth: usize,
    indent: usize,
) -> Result<()> {
    let node = tree
        .get(id)
        .ok_or_else(|| Error::Render("dangling node id".to_string()))?;

    write_indent(out, depth * indent)?;
    writeln!(out, "({} {}", node.level.tag(), node.bbox)?;

    if let Some(text) = node.text() {
        write_indent(out, (depth + 1) * indent)?;
        write_quoted(out, text.as_bytes())?;
    } else {
        let children = node.children();
        for (i, &child) in children.iter().enumerate() {
            write_node(out, tree, child, depth + 1, indent)?;
            if i + 1 < children.len() {
                out.write_all(b"\n")?;
            }
        }
    }

    out.write_all(b")")?;
    Ok(())
}

fn write_indent<W: Write>(out: &mut W, width: usize) -> Result<()> {
    write!(out, "{:width$}", "", width = width)?;
    Ok(())
}

/// Write `bytes` as a quoted djvused string.
pub fn write_quoted<W: Write>(out: &mut W, bytes: &[u8]) -> Result<()> {
    out.write_all(b"\"")?;
    for &b in bytes {
        match b {
            b'\\' | b'"' => out.write_all(&[b'\\', b])?,
            b'\t' => out.write_all(b"\\t")?,
            b'\n' => out.write_all(b"\\n")?,
            b'\r' => out.write_all(b"\\r")?,
            0..=0x1f => write!(out, "\\{:03o}", b)?,
            _ => out.write_all(&[b])?,
        }
    }
    out.write_all(b"\"")?;
    Ok(())
}

/// Quote a string for djvused.
pub fn quote(text: &str) -> String {
    let mut buf = Vec::with_capacity(text.len() + 2);
    // Writing into a Vec cannot fail, and only ASCII is ever inserted.
    let _ = write_quoted(&mut buf, text.as_bytes());
    String::from_utf8_lossy(&buf).into_owned()
}
