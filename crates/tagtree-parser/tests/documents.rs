//! Integration tests: whole documents through tokenize + build.

use pretty_assertions::assert_eq;
use tagtree_lexer::{tokenize, TokenKind};
use tagtree_parser::{NodeId, Parser, Tree, TEXT_TAG};

const PAGE: &str = r#"
      <html>
          <body>
              <h1>Title</h1>
              <div id="main" class="test">
                  <p>Hello <em>world</em>!</p>
              </div>
          </body>
      </html>"#;

/// Helper: tokenize and build into a fresh root, the way callers wire the two stages.
fn build(source: &str) -> Tree {
    let tokens = tokenize(source).expect("tokenize");
    Parser::new(tokens, Tree::new()).build().expect("build")
}

/// Every non-root node sits exactly once in its parent's children, one level deeper.
fn assert_well_formed(tree: &Tree) {
    assert_eq!(tree[tree.root()].depth, 0);
    assert_eq!(tree.parent(tree.root()), None);

    let mut count = 1;
    for id in tree.descendants(tree.root()) {
        count += 1;
        let node = &tree[id];
        let parent = node.parent.expect("non-root node has a parent");
        assert_eq!(node.depth, tree[parent].depth + 1);
        assert_eq!(tree.children(parent).iter().filter(|&&c| c == id).count(), 1);
        assert_eq!(node.tag == TEXT_TAG, node.content.is_some());
        if node.tag == TEXT_TAG {
            assert!(node.children.is_empty());
            assert!(node.attrs.is_empty());
        }
    }
    assert_eq!(count, tree.len());
}

fn child(tree: &Tree, id: NodeId, index: usize) -> NodeId {
    tree.children(id)[index]
}

#[test]
fn test_full_page_structure() {
    let tree = build(PAGE);
    assert_well_formed(&tree);
    let html = child(&tree, tree.root(), 0);
    let body = child(&tree, html, 0);
    assert_eq!(tree[html].tag, "html");
    assert_eq!(tree[body].tag, "body");
    assert_eq!(tree.children(body).len(), 2);

    let h1 = child(&tree, body, 0);
    let div = child(&tree, body, 1);
    assert_eq!(tree[h1].tag, "h1");
    assert_eq!(tree.text_content(h1), "Title");
    assert_eq!(tree[div].attr("id"), Some("main"));
    assert_eq!(tree[div].attr("class"), Some("test"));

    let p = child(&tree, div, 0);
    assert_eq!(tree[p].tag, "p");
    let kids: Vec<_> = tree.children(p).iter().map(|&c| tree[c].tag.as_str()).collect();
    assert_eq!(kids, vec![TEXT_TAG, "em", TEXT_TAG]);

    let em = child(&tree, p, 1);
    assert_eq!(tree[child(&tree, em, 0)].content.as_deref(), Some("world"));
    assert_eq!(tree[em].depth, 5);
}

#[test]
fn test_full_page_outline() {
    let tree = build(PAGE);
    let expected = "  html\n    body\n      h1\n        TEXT \"Title\"\n      div\n        p\n          TEXT \"Hello\"\n          em\n            TEXT \"world\"\n          TEXT \"!\"\n";
    assert_eq!(tree.outline(), expected);
}

#[test]
fn test_full_page_tokens_include_line_breaks() {
    let tokens = tokenize(PAGE).unwrap();
    assert_eq!(tokens.iter().filter(|t| t.is(TokenKind::LineBreak)).count(), 8);
    // The builder drops them; parsing must not care.
    assert_eq!(build(PAGE), build(&PAGE.replace('\n', " ")));
}

#[test]
fn test_page_with_byte_order_mark() {
    let tree = build(&format!("\u{feff}{PAGE}"));
    assert_well_formed(&tree);
    assert_eq!(tree, build(PAGE));
}

#[test]
fn test_parse_matches_two_stage_build() {
    assert_eq!(Parser::parse(PAGE).unwrap(), build(PAGE));
}

#[test]
fn test_tree_serializes_as_flat_arena() {
    let tree = build("<a href=\"x\">go</a>");
    let value = serde_json::to_value(&tree).unwrap();

    let nodes = value["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 3);
    assert_eq!(nodes[0]["tag"], "root");
    assert!(nodes[0].get("content").is_none());
    assert_eq!(nodes[0]["parent"], serde_json::Value::Null);
    assert_eq!(nodes[1]["attrs"]["href"], "x");
    assert_eq!(nodes[1]["children"], serde_json::json!([2]));
    assert_eq!(nodes[2]["content"], "go");
    assert_eq!(nodes[2]["parent"], 1);
}
