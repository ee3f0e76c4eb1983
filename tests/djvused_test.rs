//! Integration tests for reading, recomputing and writing djvused layouts.

use pdfsed::model::{recompute_and_scale, BoundingBox, Level, Tree};
use pdfsed::parser::{read_djvused, DjvusedReader, ParseOptions};
use pdfsed::render::{to_djvused, to_text, RenderOptions};
use pdfsed::Error;

const TWO_COLUMNS: &str = r#"
(page 0 0 2480 3508
  (column 100 100 1200 3400
    (para 100 3000 1200 3400
      (line 100 3300 1200 3400
        (word 100 3300 500 3400 "Chapter")
        (word 550 3300 700 3400 "1"))
      (line 100 3000 1100 3100
        (word 100 3000 400 3100 "It")
        (word 450 3000 1100 3100 "began\twith \"quotes\"")))
    (para 100 100 1200 500
      (line 100 100 900 200
        (word 100 100 900 200 "back\\slash"))))
  (column 1300 100 2400 3400
    (para 1300 100 2400 3400
      (line 1300 100 2400 3400
        (word 1300 100 2400 3400 "Sidebar")))))
"#;

fn raw(input: &str) -> Tree {
    read_djvused(input.as_bytes(), ParseOptions::new().raw()).unwrap()
}

#[test]
fn test_roundtrip_preserves_structure() {
    let first = raw(TWO_COLUMNS);
    let written = to_djvused(&first, &RenderOptions::default()).unwrap();
    let second = raw(&written);

    assert!(first.same_structure(&second));
    assert_eq!(to_djvused(&second, &RenderOptions::default()).unwrap(), written);
}

#[test]
fn test_roundtrip_keeps_text() {
    let tree = raw(TWO_COLUMNS);
    let texts: Vec<&str> = tree
        .nodes_at(Level::Word)
        .into_iter()
        .filter_map(|w| tree.text(w))
        .collect();
    assert_eq!(
        texts,
        vec![
            "Chapter",
            "1",
            "It",
            "began\twith \"quotes\"",
            "back\\slash",
            "Sidebar"
        ]
    );

    let written = to_djvused(&tree, &RenderOptions::default()).unwrap();
    assert!(written.contains(r#""began\twith \"quotes\"")"#));
    assert!(written.contains(r#""back\\slash")"#));
}

#[test]
fn test_plain_text_projection() {
    let tree = raw(TWO_COLUMNS);
    assert_eq!(
        to_text(&tree).unwrap(),
        "Chapter 1\nIt began\twith \"quotes\"\n\nback\\slash\n\nSidebar\n"
    );
}

#[test]
fn test_line_box_is_union_of_words() {
    let tree = read_djvused(
        "(page 0 0 100 50 (column 0 0 100 50 (para 0 0 100 50 (line 0 0 100 50 \
         (word 0 0 40 20 \"Hi\") (word 45 0 90 20 \"there\")))))"
            .as_bytes(),
        ParseOptions::default(),
    )
    .unwrap();

    let line = tree.nodes_at(Level::Line)[0];
    assert_eq!(tree.bbox(line), Some(BoundingBox::new(0.0, 0.0, 90.0, 20.0)));
    let para = tree.parent(line).unwrap();
    assert_eq!(tree.bbox(para), tree.bbox(line));
}

#[test]
fn test_scaling_words_and_ancestors() {
    let mut tree = raw(
        "(page 0 0 100 100 (column 0 0 1 1 (para 0 0 1 1 (line 0 0 1 1 \
         (word 10 10 20 20 \"a\") (word 30 5 35 25 \"b\")))))",
    );
    recompute_and_scale(&mut tree, 2.0);

    let words = tree.nodes_at(Level::Word);
    assert_eq!(tree.bbox(words[0]), Some(BoundingBox::new(20.0, 20.0, 40.0, 40.0)));
    assert_eq!(tree.bbox(words[1]), Some(BoundingBox::new(60.0, 10.0, 70.0, 50.0)));

    let expected = BoundingBox::new(20.0, 10.0, 70.0, 50.0);
    for level in [Level::Line, Level::Paragraph, Level::Column] {
        let node = tree.nodes_at(level)[0];
        assert_eq!(tree.bbox(node), Some(expected), "{} box", level);
    }
    assert_eq!(
        tree.bbox(tree.root().unwrap()),
        Some(BoundingBox::new(0.0, 0.0, 100.0, 100.0))
    );
}

#[test]
fn test_recompute_identity_at_unit_scale() {
    let mut tree = raw(TWO_COLUMNS);
    let before: Vec<_> = tree
        .nodes_at(Level::Word)
        .into_iter()
        .map(|w| tree.bbox(w))
        .collect();
    recompute_and_scale(&mut tree, 1.0);
    let after: Vec<_> = tree
        .nodes_at(Level::Word)
        .into_iter()
        .map(|w| tree.bbox(w))
        .collect();
    assert_eq!(before, after);

    for level in [Level::Line, Level::Paragraph, Level::Column] {
        for node in tree.nodes_at(level) {
            let union = BoundingBox::union_all(
                tree.children(node).iter().filter_map(|&c| tree.bbox(c)),
            );
            assert_eq!(tree.bbox(node), union);
        }
    }
}

#[test]
fn test_empty_container_keeps_scaled_box() {
    let mut tree = raw("(page 0 0 100 100 (column 2 4 6 8))");
    recompute_and_scale(&mut tree, 0.5);
    let column = tree.nodes_at(Level::Column)[0];
    assert_eq!(tree.bbox(column), Some(BoundingBox::new(1.0, 2.0, 3.0, 4.0)));
}

#[test]
fn test_negative_offset_output_reads_back() {
    let input = "(page 0 0 10 10 (column 0 0 10 10 (para 0 0 10 10 (line 0 0 10 10 \
                 (word 2 2 8 8 \"a\")))))";
    let tree = read_djvused(input.as_bytes(), ParseOptions::new().with_offset(-5.0, 0.0)).unwrap();
    let written = to_djvused(&tree, &RenderOptions::default()).unwrap();
    assert!(written.contains("(word 0 2 3 8"));

    let reread = raw(&written);
    assert!(tree.same_structure(&reread));
}

#[test]
fn test_truncated_input_fails() {
    // Cut inside a word's text
    let cut = TWO_COLUMNS.find("began").unwrap() + 3;
    let result = read_djvused(TWO_COLUMNS[..cut].as_bytes(), ParseOptions::default());
    assert!(matches!(result, Err(Error::StreamExhausted)));

    // Cut inside a coordinate list
    let cut = TWO_COLUMNS.find("1300 100 2400").unwrap() + 5;
    let result = read_djvused(TWO_COLUMNS[..cut].as_bytes(), ParseOptions::default());
    assert!(matches!(result, Err(Error::StreamExhausted)));
}

#[test]
fn test_reader_leaves_tree_unchanged_on_error() {
    let mut tree = Tree::new();
    let mut reader = DjvusedReader::new("(line 0 0 1 1 (word 0 0 1 1 oops))".as_bytes());
    assert!(reader.read_node(&mut tree, None).is_err());
    assert!(tree.is_empty());
}

#[test]
fn test_bad_coordinates() {
    for input in [
        "(page 0 0 ten 10)",
        "(page 0 0 -1 10)",
        "(page 0 0 10)",
        "(page 0 0 1.5 10)",
    ] {
        assert!(
            matches!(
                read_djvused(input.as_bytes(), ParseOptions::default()),
                Err(Error::MalformedToken(_))
            ),
            "{}",
            input
        );
    }
}

#[test]
fn test_invalid_scale_rejected_before_reading() {
    let result = read_djvused(
        "(page 0 0 1 1)".as_bytes(),
        ParseOptions::new().with_scale(0.0),
    );
    assert!(matches!(result, Err(Error::InvalidScale(_))));
}

#[test]
fn test_octal_escapes_roundtrip() {
    let tree = raw("(page 0 0 1 1 (column 0 0 1 1 (para 0 0 1 1 (line 0 0 1 1 (word 0 0 1 1 \"\\001x\\033\")))))");
    let word = tree.nodes_at(Level::Word)[0];
    assert_eq!(tree.text(word), Some("\u{1}x\u{1b}"));

    let written = to_djvused(&tree, &RenderOptions::default()).unwrap();
    assert!(written.contains(r#""\001x\033")"#));
}
