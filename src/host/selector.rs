//! The selector subset the in-memory host understands.
//!
//! Selector lists (`a, b`), descendant combinators (`.nav .item`), and
//! compounds built from a tag, `#id`, `.class`, `[attr]` and `[attr=value]`.

/// Read-only view of a node tree, addressed by index.
pub(crate) trait Ancestry {
    fn tag(&self, node: usize) -> &str;
    fn attribute(&self, node: usize, name: &str) -> Option<&str>;
    fn has_class(&self, node: usize, class: &str) -> bool;
    fn parent(&self, node: usize) -> Option<usize>;
}

#[derive(Debug, Default, PartialEq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, Option<String>)>,
}

impl Compound {
    fn matches<A: Ancestry>(&self, tree: &A, node: usize) -> bool {
        if let Some(tag) = &self.tag {
            if !tree.tag(node).eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if tree.attribute(node, "id") != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|c| tree.has_class(node, c)) {
            return false;
        }
        self.attrs.iter().all(|(name, value)| {
            match (tree.attribute(node, name), value) {
                (Some(actual), Some(expected)) => actual == expected,
                (Some(_), None) => true,
                (None, _) => false,
            }
        })
    }
}

#[derive(Debug, PartialEq)]
pub(crate) struct SelectorList {
    alternatives: Vec<Vec<Compound>>,
}

impl SelectorList {
    pub(crate) fn parse(source: &str) -> Option<Self> {
        let mut alternatives = Vec::new();
        for part in source.split(',') {
            let compounds = part
                .split_whitespace()
                .map(parse_compound)
                .collect::<Option<Vec<_>>>()?;
            if compounds.is_empty() {
                return None;
            }
            alternatives.push(compounds);
        }
        Some(Self { alternatives })
    }

    pub(crate) fn matches<A: Ancestry>(&self, tree: &A, node: usize) -> bool {
        self.alternatives
            .iter()
            .any(|chain| matches_chain(chain, tree, node))
    }
}

fn matches_chain<A: Ancestry>(chain: &[Compound], tree: &A, node: usize) -> bool {
    let Some((last, rest)) = chain.split_last() else {
        return false;
    };
    if !last.matches(tree, node) {
        return false;
    }

    // Descendant-only chains can be matched greedily, right to left.
    let mut pending = rest.iter().rev().peekable();
    let mut cursor = tree.parent(node);
    while let Some(compound) = pending.peek() {
        match cursor {
            Some(ancestor) => {
                if compound.matches(tree, ancestor) {
                    pending.next();
                }
                cursor = tree.parent(ancestor);
            }
            None => return false,
        }
    }
    true
}

fn parse_compound(source: &str) -> Option<Compound> {
    let mut compound = Compound::default();
    let mut rest = source;

    let tag_len = rest
        .find(|c: char| matches!(c, '.' | '#' | '['))
        .unwrap_or(rest.len());
    if tag_len > 0 {
        let tag = &rest[..tag_len];
        if tag != "*" && !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return None;
        }
        if tag != "*" {
            compound.tag = Some(tag.to_string());
        }
        rest = &rest[tag_len..];
    }

    while let Some(marker) = rest.chars().next() {
        match marker {
            '.' | '#' => {
                let body = &rest[1..];
                let end = body
                    .find(|c: char| matches!(c, '.' | '#' | '['))
                    .unwrap_or(body.len());
                if end == 0 {
                    return None;
                }
                let name = body[..end].to_string();
                if marker == '.' {
                    compound.classes.push(name);
                } else {
                    compound.id = Some(name);
                }
                rest = &body[end..];
            }
            '[' => {
                let close = rest.find(']')?;
                let inner = &rest[1..close];
                let attr = match inner.split_once('=') {
                    Some((name, value)) => (
                        name.trim().to_string(),
                        Some(value.trim().trim_matches(|c| c == '"' || c == '\'').to_string()),
                    ),
                    None => (inner.trim().to_string(), None),
                };
                if attr.0.is_empty() {
                    return None;
                }
                compound.attrs.push(attr);
                rest = &rest[close + 1..];
            }
            _ => return None,
        }
    }

    Some(compound)
}
