//! Config document abstraction layer.
//!
//! `ConfigDocument`, `ConfigSection`, and `ParseNode` wrap the `kdl` crate
//! types so the rest of the config module never touches KDL directly.

/// Parsed KDL document paired with its source text.
pub(super) struct ConfigDocument {
    doc: kdl::KdlDocument,
    source: String,
}

/// Single KDL node with source context for line-number reporting.
pub(super) struct ParseNode<'a> {
    node: &'a kdl::KdlNode,
    source: &'a str,
}

impl ConfigDocument {
    /// Parse a KDL source string into a document.
    pub(super) fn parse(source: &str) -> Result<Self, super::ConfigError> {
        let doc: kdl::KdlDocument = source
            .parse()
            .map_err(|e: kdl::KdlError| super::ConfigError::ParseError(e.to_string()))?;
        Ok(Self {
            doc,
            source: source.to_string(),
        })
    }

    /// Get a named top-level section's children as a borrowed `ConfigSection`.
    ///
    /// `section("gate")` returns the contents of the `gate { ... }` block.
    /// A bare `gate` node without a block counts as an empty section.
    pub(super) fn section(&self, name: &str) -> Option<ConfigSection<'_>> {
        let node = self.doc.get(name)?;
        Some(ConfigSection {
            doc: node.children(),
            source: &self.source,
        })
    }

    /// Line of the second top-level node called `name`, if it repeats.
    pub(super) fn duplicate_section(&self, name: &str) -> Option<usize> {
        self.doc
            .nodes()
            .iter()
            .filter(|node| node.name().value() == name)
            .nth(1)
            .map(|node| {
                ParseNode {
                    node,
                    source: &self.source,
                }
                .line()
            })
    }

    /// Names of top-level nodes, with line numbers, that are not in `known`.
    pub(super) fn unknown_sections(&self, known: &[&str]) -> Vec<(String, usize)> {
        self.doc
            .nodes()
            .iter()
            .map(|node| ParseNode {
                node,
                source: &self.source,
            })
            .filter(|node| !known.contains(&node.name()))
            .map(|node| (node.name().to_string(), node.line()))
            .collect()
    }
}

/// Borrowed view into a KDL section (children block of a top-level node).
pub(super) struct ConfigSection<'a> {
    doc: Option<&'a kdl::KdlDocument>,
    source: &'a str,
}

impl<'a> ConfigSection<'a> {
    /// Iterate over all child nodes in document order.
    pub(super) fn nodes(&self) -> Vec<ParseNode<'a>> {
        let Some(doc) = self.doc else {
            return Vec::new();
        };
        doc.nodes()
            .iter()
            .map(|node| ParseNode {
                node,
                source: self.source,
            })
            .collect()
    }
}

impl<'a> ParseNode<'a> {
    /// The node's identifier (e.g. `"step"`, `"env"`).
    pub(super) fn name(&self) -> &'a str {
        self.node.name().value()
    }

    /// Collect all string-valued positional entries from this node.
    ///
    /// Properties (`key="value"`) are skipped; callers compare against
    /// [`Self::entry_count`] to reject them.
    pub(super) fn string_values(&self) -> Vec<&'a str> {
        self.node
            .entries()
            .iter()
            .filter(|e| e.name().is_none())
            .filter_map(|e| e.value().as_string())
            .collect()
    }

    /// Total number of entries (all types, not just strings).
    pub(super) fn entry_count(&self) -> usize {
        self.node.entries().len()
    }

    /// Whether this node has a children block `{ ... }`.
    pub(super) fn has_children(&self) -> bool {
        self.node.children().is_some()
    }

    /// 1-based line number of this node in the config source.
    pub(super) fn line(&self) -> usize {
        let offset = self.node.span().offset();
        self.source[..offset.min(self.source.len())]
            .bytes()
            .filter(|&b| b == b'\n')
            .count()
            + 1
    }
}
