//! Segment trie used for pattern matching.
//!
//! One trie exists per HTTP method. Each node holds a single path segment;
//! only nodes that terminate a registered route carry the full pattern.

/// A node of the routing trie.
#[derive(Debug, Default)]
pub struct Node {
    /// Full registered pattern, e.g. `/p/:lang/doc`. Empty on intermediate nodes.
    pattern: String,
    /// The segment this node matches, e.g. `:lang`. Empty at the root.
    part: String,
    children: Vec<Node>,
    /// True when `part` starts with `:` or `*`.
    is_wild: bool,
}

impl Node {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_part(part: &str) -> Self {
        Self {
            pattern: String::new(),
            part: part.to_string(),
            children: Vec::new(),
            is_wild: part.starts_with(':') || part.starts_with('*'),
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn part(&self) -> &str {
        &self.part
    }

    pub fn is_wild(&self) -> bool {
        self.is_wild
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Inserts `parts[height..]` below this node and records `pattern` on the
    /// terminal node. Re-inserting the same pattern reuses the existing branch.
    pub fn insert(&mut self, pattern: &str, parts: &[&str], height: usize) {
        if parts.len() == height {
            self.pattern = pattern.to_string();
            return;
        }

        let part = parts[height];
        let index = match self.children.iter().position(|child| child.part == part) {
            Some(index) => index,
            None => {
                self.children.push(Node::with_part(part));
                self.children.len() - 1
            }
        };

        self.children[index].insert(pattern, parts, height + 1);
    }

    /// Finds the terminal node matching `parts[height..]`.
    ///
    /// Literal children are tried before wild ones; the first subtree that
    /// yields a registered pattern wins.
    pub fn search(&self, parts: &[&str], height: usize) -> Option<&Node> {
        if parts.len() == height || self.part.starts_with('*') {
            if self.pattern.is_empty() {
                return None;
            }
            return Some(self);
        }

        let part = parts[height];
        let literal = self
            .children
            .iter()
            .filter(|child| !child.is_wild && child.part == part);
        let wild = self.children.iter().filter(|child| child.is_wild);

        literal
            .chain(wild)
            .find_map(|child| child.search(parts, height + 1))
    }
}
