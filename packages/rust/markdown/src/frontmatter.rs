//! YAML front-matter for exported pages.

use notionsync_shared::PageMetadata;

/// Build the front-matter block, including the blank line that separates it
/// from the body.
///
/// Optional fields are omitted entirely when absent; `tags` is always present.
pub fn build_frontmatter(meta: &PageMetadata) -> String {
    let mut fm = String::from("---\n");
    push_quoted(&mut fm, "title", &meta.title);
    push_quoted(&mut fm, "category", &meta.category);
    if let Some(subcategory) = &meta.subcategory {
        push_quoted(&mut fm, "subcategory", subcategory);
    }
    if let Some(language) = &meta.language {
        push_quoted(&mut fm, "language", language);
    }
    if let Some(created) = &meta.created {
        push_quoted(&mut fm, "created", created);
    }
    push_quoted(&mut fm, "last_updated", &meta.last_edited);

    let tags: Vec<String> = meta.tags.iter().map(|t| quote_tag(t)).collect();
    fm.push_str(&format!("tags: [{}]\n", tags.join(", ")));

    if let Some(summary) = &meta.summary {
        push_quoted(&mut fm, "summary", summary);
    }
    fm.push_str("---\n\n");
    fm
}

fn push_quoted(fm: &mut String, key: &str, value: &str) {
    fm.push_str(&format!("{key}: \"{}\"\n", escape_yaml_string(value)));
}

/// Quote a tag for the flow list: single quotes unless the tag contains a
/// single quote and no double quote.
fn quote_tag(tag: &str) -> String {
    let quote = if tag.contains('\'') && !tag.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(tag.len() + 2);
    out.push(quote);
    for c in tag.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

/// Escape special characters in a YAML string value.
fn escape_yaml_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
