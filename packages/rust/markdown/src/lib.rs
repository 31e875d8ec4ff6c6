//! Notion block rendering, slugs, and front-matter.
//!
//! Converts a page's block list into a Markdown body using a fixed mapping of
//! supported block kinds, and provides the helpers the writer needs to name
//! files and build the YAML header.

mod frontmatter;
mod slug;

use notionsync_shared::{Block, RichText};
use tracing::{instrument, trace};

pub use frontmatter::build_frontmatter;
pub use slug::slugify;

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Render blocks to Markdown.
///
/// Fragments are joined with newlines, the result is trimmed, and exactly one
/// trailing newline is appended, so an empty page renders as `"\n"`.
///
/// Numbered list items always carry the ordinal `1.`; Markdown renderers
/// renumber them on display.
#[instrument(skip_all, fields(blocks = blocks.len()))]
pub fn render_blocks(blocks: &[Block]) -> String {
    let mut lines: Vec<String> = Vec::new();

    for block in blocks {
        match block {
            Block::Paragraph { paragraph } => {
                lines.push(plain_text(&paragraph.rich_text));
                lines.push(String::new());
            }
            Block::Heading1 { heading_1 } => {
                lines.push(format!("# {}", plain_text(&heading_1.rich_text)));
                lines.push(String::new());
            }
            Block::Heading2 { heading_2 } => {
                lines.push(format!("## {}", plain_text(&heading_2.rich_text)));
                lines.push(String::new());
            }
            Block::Heading3 { heading_3 } => {
                lines.push(format!("### {}", plain_text(&heading_3.rich_text)));
                lines.push(String::new());
            }
            Block::BulletedListItem { bulleted_list_item } => {
                lines.push(format!("- {}", plain_text(&bulleted_list_item.rich_text)));
            }
            Block::NumberedListItem { numbered_list_item } => {
                lines.push(format!("1. {}", plain_text(&numbered_list_item.rich_text)));
            }
            Block::Quote { quote } => {
                lines.push(format!("> {}", plain_text(&quote.rich_text)));
            }
            Block::Code { code } => {
                lines.push(format!("```{}", code.language.as_deref().unwrap_or("")));
                lines.push(plain_text(&code.rich_text));
                lines.push("```".to_string());
                lines.push(String::new());
            }
            Block::Unsupported => {
                trace!("skipping unsupported block");
            }
        }
    }

    let mut md = lines.join("\n").trim().to_string();
    md.push('\n');
    md
}

/// Concatenate the `text` content of every run. Runs without a `text`
/// payload (mentions, equations) contribute nothing.
pub fn plain_text(runs: &[RichText]) -> String {
    runs.iter()
        .filter_map(|run| run.text.as_ref())
        .map(|text| text.content.as_str())
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use notionsync_shared::{CodeBlock, TextBlock, TextContent};

    fn code(language: Option<&str>, text: &str) -> Block {
        Block::Code {
            code: CodeBlock {
                rich_text: vec![RichText::plain(text)],
                language: language.map(String::from),
            },
        }
    }

    #[test]
    fn empty_block_list_renders_single_newline() {
        assert_eq!(render_blocks(&[]), "\n");
    }

    #[test]
    fn unsupported_blocks_render_nothing() {
        let blocks = vec![Block::Unsupported, Block::Unsupported];
        assert_eq!(render_blocks(&blocks), "\n");
    }

    #[test]
    fn paragraph_renders_text() {
        let blocks = vec![Block::Paragraph {
            paragraph: TextBlock::plain("Hello world"),
        }];
        assert_eq!(render_blocks(&blocks), "Hello world\n");
    }

    #[test]
    fn headings_use_hash_prefixes() {
        let blocks = vec![
            Block::Heading1 {
                heading_1: TextBlock::plain("One"),
            },
            Block::Heading2 {
                heading_2: TextBlock::plain("Two"),
            },
            Block::Heading3 {
                heading_3: TextBlock::plain("Three"),
            },
        ];
        assert_eq!(render_blocks(&blocks), "# One\n\n## Two\n\n### Three\n");
    }

    #[test]
    fn list_items_stay_adjacent() {
        let blocks = vec![
            Block::BulletedListItem {
                bulleted_list_item: TextBlock::plain("apples"),
            },
            Block::BulletedListItem {
                bulleted_list_item: TextBlock::plain("pears"),
            },
            Block::Paragraph {
                paragraph: TextBlock::plain("after"),
            },
        ];
        assert_eq!(render_blocks(&blocks), "- apples\n- pears\nafter\n");
    }

    #[test]
    fn numbered_items_all_use_ordinal_one() {
        let blocks = vec![
            Block::NumberedListItem {
                numbered_list_item: TextBlock::plain("first"),
            },
            Block::NumberedListItem {
                numbered_list_item: TextBlock::plain("second"),
            },
        ];
        assert_eq!(render_blocks(&blocks), "1. first\n1. second\n");
    }

    #[test]
    fn quote_renders_with_marker() {
        let blocks = vec![Block::Quote {
            quote: TextBlock::plain("be kind"),
        }];
        assert_eq!(render_blocks(&blocks), "> be kind\n");
    }

    #[test]
    fn code_block_is_fenced_with_language() {
        let blocks = vec![
            code(Some("python"), "print(1)"),
            Block::Paragraph {
                paragraph: TextBlock::plain("next"),
            },
        ];
        assert_eq!(render_blocks(&blocks), "```python\nprint(1)\n```\n\nnext\n");
    }

    #[test]
    fn code_block_without_language_has_bare_fence() {
        assert_eq!(render_blocks(&[code(None, "ls -la")]), "```\nls -la\n```\n");
    }

    #[test]
    fn unsupported_blocks_between_content_are_skipped() {
        let blocks = vec![
            Block::Heading1 {
                heading_1: TextBlock::plain("Title"),
            },
            Block::Unsupported,
            Block::Paragraph {
                paragraph: TextBlock::plain("Body"),
            },
        ];
        assert_eq!(render_blocks(&blocks), "# Title\n\nBody\n");
    }

    #[test]
    fn plain_text_joins_runs_and_skips_mentions() {
        let runs = vec![
            RichText::plain("Hello, "),
            RichText {
                plain_text: "@Ana".into(),
                text: None,
            },
            RichText {
                plain_text: "world".into(),
                text: Some(TextContent {
                    content: "world".into(),
                }),
            },
        ];
        assert_eq!(plain_text(&runs), "Hello, world");
    }
}
