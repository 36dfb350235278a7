//! Flat schema table and dotted-path navigation.
//!
//! A schema is a depth-first (pre-order) encoded tree of [`ConfEntry`]
//! descriptors. Every `Object` entry records how many slots its subtree
//! occupies (`num_desc`), which lets siblings be scanned without recursion:
//!
//! ```text
//! offset  key        type    num_desc
//!   0     ""         Object  5
//!   1     wifi       Object  3
//!   2     ssid       String  0
//!   3     ap         Object  1
//!   4     channel    Int     0
//!   5     port       Int     0
//! ```
//!
//! The table is generated at build time and never mutated.

use core::fmt;

/// Field type tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfType {
    Int,
    UnsignedInt,
    Double,
    Bool,
    String,
    Object,
}

impl ConfType {
    /// Lowercase name used in log and error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            ConfType::Int => "int",
            ConfType::UnsignedInt => "unsigned int",
            ConfType::Double => "double",
            ConfType::Bool => "bool",
            ConfType::String => "string",
            ConfType::Object => "object",
        }
    }
}

impl fmt::Display for ConfType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One schema descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConfEntry {
    /// Leaf key segment (empty for the root).
    pub key: &'static str,
    pub conf_type: ConfType,
    /// Pre-order position in the root table. Records address fields
    /// relative to the offset of their own object entry.
    pub offset: usize,
    /// Number of transitive descendants (0 for primitives).
    pub num_desc: usize,
}

impl ConfEntry {
    /// Slots consumed by this entry and its subtree.
    pub fn span(&self) -> usize {
        self.num_desc + 1
    }
}

/// Schema invariant violation found by [`Schema::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The table is empty.
    Empty,
    /// The head entry is not an object.
    RootNotObject,
    /// `num_desc` of the entry at this index overruns its parent.
    BadDescendantCount { index: usize },
    /// A primitive entry claims descendants.
    PrimitiveWithDescendants { index: usize },
}

/// Borrowed view of a subtree: the head entry followed by all its
/// descendants, in pre-order.
#[derive(Clone, Copy, Debug)]
pub struct Schema<'a> {
    entries: &'a [ConfEntry],
}

impl<'a> Schema<'a> {
    /// Wrap a table slice. The first entry heads the subtree.
    pub fn new(entries: &'a [ConfEntry]) -> Self {
        debug_assert!(
            entries.first().map(|e| e.span()) == Some(entries.len()),
            "schema slice does not match its head's descendant count"
        );
        Self { entries }
    }

    /// Head entry of this subtree.
    pub fn root(&self) -> &'a ConfEntry {
        &self.entries[0]
    }

    /// Every entry after the head, including nested ones.
    pub fn descendants(&self) -> &'a [ConfEntry] {
        &self.entries[1..]
    }

    /// All entries, head first.
    pub fn entries(&self) -> &'a [ConfEntry] {
        self.entries
    }

    /// Immediate children, each as its own subtree.
    pub fn children(&self) -> Children<'a> {
        Children {
            rest: self.descendants(),
        }
    }

    /// Resolve a dotted path among this subtree's descendants.
    ///
    /// The head itself is never a candidate. Returns `None` for unknown
    /// keys and for paths that try to descend into a primitive.
    pub fn find(&self, path: &str) -> Option<Schema<'a>> {
        let (component, rest) = match path.find('.') {
            Some(i) => (&path[..i], Some(&path[i + 1..])),
            None => (path, None),
        };
        let child = self.children().find(|c| c.root().key == component)?;
        match rest {
            None => Some(child),
            Some(rest) => {
                if child.root().conf_type != ConfType::Object {
                    return None;
                }
                child.find(rest)
            }
        }
    }

    /// Check the pre-order encoding recursively.
    pub fn validate(&self) -> Result<(), SchemaError> {
        let root = self.entries.first().ok_or(SchemaError::Empty)?;
        if root.conf_type != ConfType::Object {
            return Err(SchemaError::RootNotObject);
        }
        if root.span() != self.entries.len() {
            return Err(SchemaError::BadDescendantCount { index: 0 });
        }
        validate_children(self.entries, 0)
    }

    /// Dotted paths of all primitive fields, in table order.
    pub fn key_paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        collect_paths(*self, "", &mut out);
        out
    }
}

fn validate_children(entries: &[ConfEntry], base: usize) -> Result<(), SchemaError> {
    let end = base + entries[base].span();
    let mut i = base + 1;
    while i < end {
        let e = &entries[i];
        if e.conf_type != ConfType::Object && e.num_desc != 0 {
            return Err(SchemaError::PrimitiveWithDescendants { index: i });
        }
        if i + e.span() > end {
            return Err(SchemaError::BadDescendantCount { index: i });
        }
        if e.conf_type == ConfType::Object {
            validate_children(entries, i)?;
        }
        i += e.span();
    }
    Ok(())
}

fn collect_paths(schema: Schema<'_>, prefix: &str, out: &mut Vec<String>) {
    for child in schema.children() {
        let path = if prefix.is_empty() {
            child.root().key.to_string()
        } else {
            format!("{}.{}", prefix, child.root().key)
        };
        if child.root().conf_type == ConfType::Object {
            collect_paths(child, &path, out);
        } else {
            out.push(path);
        }
    }
}

/// Iterator over immediate children, skipping nested subtrees by count.
#[derive(Clone)]
pub struct Children<'a> {
    rest: &'a [ConfEntry],
}

impl<'a> Iterator for Children<'a> {
    type Item = Schema<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let head = self.rest.first()?;
        let span = head.span().min(self.rest.len());
        let (child, rest) = self.rest.split_at(span);
        self.rest = rest;
        Some(Schema { entries: child })
    }
}
