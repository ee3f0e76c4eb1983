//! hOCR rendering.
//!
//! Writes the layout as an HTML document using the hOCR microformat classes
//! `ocr_page`, `ocr_carea`, `ocr_par`, `ocr_line` and `ocrx_word`. The
//! djvused coordinate system grows upward from the bottom of the page while
//! hOCR grows downward, so every box is flipped against the page height.

use std::fmt::Write as _;

use crate::error::{Error, Result};
use crate::model::{BoundingBox, Level, NodeId, Tree};

use super::RenderOptions;

const CAPABILITIES: &str = "ocr_page ocr_carea ocr_par ocr_line ocrx_word";

/// Convert a layout to an hOCR document.
pub fn to_hocr(tree: &Tree, options: &RenderOptions) -> Result<String> {
    let page = tree.root().ok_or(Error::EmptyTree)?;
    let page_height = tree.bbox(page).map(|b| b.y2).unwrap_or_default();

    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    let _ = writeln!(
        out,
        "<title>{}</title>",
        escape_html(options.title.as_deref().unwrap_or(""))
    );
    out.push_str("<meta http-equiv=\"Content-Type\" content=\"text/html; charset=utf-8\"/>\n");
    let _ = writeln!(
        out,
        "<meta name=\"ocr-capabilities\" content=\"{}\"/>",
        CAPABILITIES
    );
    out.push_str("</head>\n<body>\n");

    let writer = HocrWriter {
        tree,
        page_height,
        indent: options.indent,
    };
    writer.element(&mut out, page, 0)?;

    out.push_str("</body>\n</html>\n");
    Ok(out)
}

struct HocrWriter<'a> {
    tree: &'a Tree,
    page_height: f32,
    indent: usize,
}

impl HocrWriter<'_> {
    fn element(&self, out: &mut String, id: NodeId, depth: usize) -> Result<()> {
        let node = self
            .tree
            .get(id)
            .ok_or_else(|| Error::Render("dangling node id".to_string()))?;
        let (tag, class) = element_for(node.level);
        let title = self.title(node.bbox);
        let pad = " ".repeat(depth * self.indent);

        if node.level == Level::Line {
            // Words share the line's row.
            let _ = write!(out, "{}<{} class=\"{}\" title=\"{}\">", pad, tag, class, title);
            for (i, &word) in node.children().iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                self.word(out, word)?;
            }
            let _ = writeln!(out, "</{}>", tag);
            return Ok(());
        }

        if node.is_leaf() {
            out.push_str(&pad);
            self.word(out, id)?;
            out.push('\n');
            return Ok(());
        }

        let _ = writeln!(out, "{}<{} class=\"{}\" title=\"{}\">", pad, tag, class, title);
        for &child in node.children() {
            self.element(out, child, depth + 1)?;
        }
        let _ = writeln!(out, "{}</{}>", pad, tag);
        Ok(())
    }

    fn word(&self, out: &mut String, id: NodeId) -> Result<()> {
        let node = self
            .tree
            .get(id)
            .ok_or_else(|| Error::Render("dangling node id".to_string()))?;
        let _ = write!(
            out,
            "<span class=\"ocrx_word\" title=\"{}\">{}</span>",
            self.title(node.bbox),
            escape_html(node.text().unwrap_or(""))
        );
        Ok(())
    }

    fn title(&self, bbox: BoundingBox) -> String {
        format!("bbox {}", bbox.flipped(self.page_height))
    }
}

fn element_for(level: Level) -> (&'static str, &'static str) {
    match level {
        Level::Page => ("div", "ocr_page"),
        Level::Column => ("div", "ocr_carea"),
        Level::Paragraph => ("p", "ocr_par"),
        Level::Line => ("span", "ocr_line"),
        Level::Word => ("span", "ocrx_word"),
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// hOCR input needs an HTML parser, which this crate does not carry.
pub fn from_hocr(_html: &str) -> Result<Tree> {
    Err(Error::Unsupported(
        "reading hOCR requires an HTML parser".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Tree {
        let mut tree = Tree::with_page(BoundingBox::new(0.0, 0.0, 100.0, 200.0));
        let page = tree.root().unwrap();
        let column = tree.new_node(Level::Column, Some(page));
        tree.set_bbox(column, BoundingBox::new(10.0, 150.0, 90.0, 190.0));
        tree.attach_child(page, column).unwrap();
        let para = tree.new_node(Level::Paragraph, Some(column));
        tree.set_bbox(para, BoundingBox::new(10.0, 150.0, 90.0, 190.0));
        tree.attach_child(column, para).unwrap();
        let line = tree.new_node(Level::Line, Some(para));
        tree.set_bbox(line, BoundingBox::new(10.0, 150.0, 90.0, 190.0));
        tree.attach_child(para, line).unwrap();
        for (text, bbox) in [
            ("a<b", BoundingBox::new(10.0, 150.0, 40.0, 190.0)),
            ("&c", BoundingBox::new(50.0, 160.0, 90.0, 190.0)),
        ] {
            let word = tree.new_word(Some(line), text);
            tree.set_bbox(word, bbox);
            tree.attach_child(line, word).unwrap();
        }
        tree
    }

    #[test]
    fn test_hocr_structure() {
        let html = to_hocr(&sample(), &RenderOptions::default()).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>\n"));
        assert!(html.contains(CAPABILITIES));
        assert!(html.contains("<div class=\"ocr_page\" title=\"bbox 0 0 100 200\">"));
        assert!(html.contains("<div class=\"ocr_carea\" title=\"bbox 10 10 90 50\">"));
        assert!(html.contains("<p class=\"ocr_par\""));
        assert!(html.contains(
            "<span class=\"ocrx_word\" title=\"bbox 10 10 40 50\">a&lt;b</span> \
             <span class=\"ocrx_word\" title=\"bbox 50 10 90 40\">&amp;c</span></span>"
        ));
        assert!(html.ends_with("</html>\n"));
    }

    #[test]
    fn test_hocr_title() {
        let options = RenderOptions::new().with_title("Scan \"1\"");
        let html = to_hocr(&sample(), &options).unwrap();
        assert!(html.contains("<title>Scan &quot;1&quot;</title>"));
    }

    #[test]
    fn test_from_hocr_unsupported() {
        assert!(matches!(from_hocr("<html/>"), Err(Error::Unsupported(_))));
    }
}
