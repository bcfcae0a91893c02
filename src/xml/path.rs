//! Location-path expressions evaluated against a [`Document`] tree.
//!
//! The supported grammar is the slice of XPath 1.0 the mappers need:
//! relative and absolute (`/`, `//`) location paths whose steps are `.`,
//! `..`, `*`, `p:*`, `name` or `p:name`, each optionally followed by a
//! 1-based positional predicate such as `[2]`. Steps may also name their
//! namespace directly as `Q{urn}name` or `Q{urn}*`.
//!
//! `//` abbreviates `/descendant-or-self::node()/`, so a predicate after it
//! counts among the children of each parent: `//b[1]` is every `b` that is
//! the first `b` child of its parent, not the first `b` in the document.

use std::fmt;
use std::ops::Div;

use super::tree::{Document, Node, NodeId};
use crate::core::PathError;

/// A path expression, or the marker for one that could not be built.
///
/// Mappers build paths by interpolating resolved namespace prefixes. When a
/// prefix is missing the expression becomes unresolved and every lookup with
/// it yields nothing, instead of querying with a malformed path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathExpr(Option<String>);

impl PathExpr {
    pub fn new(expr: impl Into<String>) -> Self {
        Self(Some(expr.into()))
    }

    pub fn unresolved() -> Self {
        Self(None)
    }

    pub fn is_resolved(&self) -> bool {
        self.0.is_some()
    }

    pub fn as_str(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// Append `child` as further steps. Unresolved on either side stays unresolved.
    pub fn join(&self, child: impl Into<PathExpr>) -> PathExpr {
        match (&self.0, child.into().0) {
            (Some(parent), Some(child)) => Self::new(format!("{parent}/{child}")),
            _ => Self::unresolved(),
        }
    }
}

impl fmt::Display for PathExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(expr) => f.write_str(expr),
            None => f.write_str("<unresolved>"),
        }
    }
}

impl From<&str> for PathExpr {
    fn from(expr: &str) -> Self {
        Self::new(expr)
    }
}

impl From<String> for PathExpr {
    fn from(expr: String) -> Self {
        Self::new(expr)
    }
}

impl From<&String> for PathExpr {
    fn from(expr: &String) -> Self {
        Self::new(expr.as_str())
    }
}

impl From<&PathExpr> for PathExpr {
    fn from(expr: &PathExpr) -> Self {
        expr.clone()
    }
}

impl<T: Into<PathExpr>> Div<T> for PathExpr {
    type Output = PathExpr;

    fn div(self, child: T) -> PathExpr {
        self.join(child)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Child,
    Descendant,
    SelfNode,
    DescendantOrSelf,
    Parent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum NodeTest {
    /// `.` and `..`: any node, including the document node.
    Node,
    /// `*`: any element.
    AnyElement,
    /// `p:*`: any element in one namespace.
    AnyIn(Option<String>),
    Name {
        namespace: Option<String>,
        local: String,
    },
}

impl NodeTest {
    fn matches(&self, node: &Node<'_>) -> bool {
        match self {
            NodeTest::Node => true,
            NodeTest::AnyElement => node.is_element(),
            NodeTest::AnyIn(urn) => node.is_element() && node.namespace() == urn.as_deref(),
            NodeTest::Name { namespace, local } => {
                node.is_element()
                    && node.local_name() == local
                    && node.namespace() == namespace.as_deref()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Step {
    axis: Axis,
    test: NodeTest,
    position: Option<usize>,
}

/// A path compiled against one document's prefix declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LocationPath {
    absolute: bool,
    steps: Vec<Step>,
}

/// Compile `expr`, binding its prefixes with [`Document::prefix_urn`].
pub(crate) fn compile(doc: &Document, expr: &str) -> Result<LocationPath, PathError> {
    let trimmed = expr.trim();
    if trimmed.is_empty() {
        return Err(PathError::syntax(expr, "empty expression"));
    }

    let (absolute, mut rest, mut descendant) = if let Some(rest) = trimmed.strip_prefix("//") {
        (true, rest, true)
    } else if let Some(rest) = trimmed.strip_prefix('/') {
        (true, rest, false)
    } else {
        (false, trimmed, false)
    };

    let mut steps = Vec::new();
    if absolute && !descendant && rest.is_empty() {
        return Ok(LocationPath { absolute, steps });
    }

    loop {
        let (raw, tail) = split_step(rest);
        steps.push(parse_step(doc, expr, raw, descendant)?);
        match tail {
            None => break,
            Some(tail) => match tail.strip_prefix('/') {
                Some(tail) => {
                    descendant = true;
                    rest = tail;
                }
                None => {
                    descendant = false;
                    rest = tail;
                }
            },
        }
    }

    Ok(LocationPath { absolute, steps })
}

/// Split off the first step, ignoring `/` inside predicates and `Q{urn}`.
fn split_step(path: &str) -> (&str, Option<&str>) {
    let mut depth = 0usize;
    let mut in_urn = false;
    for (i, c) in path.char_indices() {
        match c {
            '{' => in_urn = true,
            '}' => in_urn = false,
            _ if in_urn => {}
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            '/' if depth == 0 => return (&path[..i], Some(&path[i + 1..])),
            _ => {}
        }
    }
    (path, None)
}

fn parse_step(doc: &Document, expr: &str, raw: &str, descendant: bool) -> Result<Step, PathError> {
    if raw.is_empty() {
        return Err(PathError::syntax(expr, "empty step"));
    }

    let name_end = match raw.strip_prefix("Q{") {
        Some(expanded) => expanded.find('}').map_or(raw.len(), |end| end + 3),
        None => 0,
    };
    let (test, position) = match raw[name_end..].find('[').map(|open| open + name_end) {
        Some(open) => {
            let predicate = raw[open + 1..]
                .strip_suffix(']')
                .ok_or_else(|| PathError::syntax(expr, "unterminated predicate"))?;
            let position = predicate
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|p| *p >= 1)
                .ok_or_else(|| {
                    PathError::syntax(expr, format!("unsupported predicate `[{predicate}]`"))
                })?;
            (&raw[..open], Some(position))
        }
        None => (raw, None),
    };

    match test {
        "." if position.is_none() => {
            let axis = if descendant {
                Axis::DescendantOrSelf
            } else {
                Axis::SelfNode
            };
            return Ok(Step {
                axis,
                test: NodeTest::Node,
                position,
            });
        }
        ".." if position.is_none() && !descendant => {
            return Ok(Step {
                axis: Axis::Parent,
                test: NodeTest::Node,
                position,
            });
        }
        "." | ".." => {
            return Err(PathError::syntax(expr, format!("unsupported step `{raw}`")));
        }
        _ => {}
    }

    let test = match test.split_once(':') {
        _ if test == "*" => NodeTest::AnyElement,
        _ if test.starts_with("Q{") => {
            let (urn, local) = test[2..]
                .split_once('}')
                .ok_or_else(|| PathError::syntax(expr, "unterminated `Q{`"))?;
            name_test(expr, (!urn.is_empty()).then(|| urn.to_string()), local)?
        }
        Some((prefix, local)) => {
            if !is_ncname(prefix) {
                return Err(PathError::syntax(expr, format!("invalid prefix `{prefix}`")));
            }
            let urn = doc
                .prefix_urn(prefix)
                .ok_or_else(|| PathError::UnboundPrefix {
                    prefix: prefix.to_string(),
                })?;
            name_test(expr, Some(urn.to_string()), local)?
        }
        None if is_ncname(test) => NodeTest::Name {
            namespace: None,
            local: test.to_string(),
        },
        None => return Err(PathError::syntax(expr, format!("invalid name `{test}`"))),
    };

    let axis = if descendant {
        Axis::Descendant
    } else {
        Axis::Child
    };
    Ok(Step {
        axis,
        test,
        position,
    })
}

fn name_test(expr: &str, namespace: Option<String>, local: &str) -> Result<NodeTest, PathError> {
    if local == "*" {
        Ok(NodeTest::AnyIn(namespace))
    } else if is_ncname(local) {
        Ok(NodeTest::Name {
            namespace,
            local: local.to_string(),
        })
    } else {
        Err(PathError::syntax(expr, format!("invalid name `{local}`")))
    }
}

fn is_ncname(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_')
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

impl LocationPath {
    /// Matching nodes in document order, without duplicates.
    pub(crate) fn evaluate<'d>(&self, context: Node<'d>) -> Vec<Node<'d>> {
        let doc = context.document();
        let start = if self.absolute {
            doc.node().id()
        } else {
            context.id()
        };

        let mut current: Vec<NodeId> = vec![start];
        for step in &self.steps {
            let mut next = Vec::new();
            for id in &current {
                let node = doc.node_at(*id);
                // A positional descendant step counts children per parent.
                let groups: Vec<Vec<Node<'d>>> = match (step.axis, step.position) {
                    (Axis::Descendant, Some(_)) => std::iter::once(node)
                        .chain(node.descendants())
                        .map(|parent| parent.children().collect())
                        .collect(),
                    (Axis::Child, _) => vec![node.children().collect()],
                    (Axis::Descendant, None) => vec![node.descendants().collect()],
                    (Axis::SelfNode, _) => vec![vec![node]],
                    (Axis::DescendantOrSelf, _) => {
                        vec![std::iter::once(node).chain(node.descendants()).collect()]
                    }
                    (Axis::Parent, _) => vec![node.parent().into_iter().collect()],
                };
                for candidates in groups {
                    let matched = candidates.into_iter().filter(|n| step.test.matches(n));
                    match step.position {
                        Some(position) => {
                            next.extend(matched.skip(position - 1).take(1).map(|n| n.id()))
                        }
                        None => next.extend(matched.map(|n| n.id())),
                    }
                }
            }
            next.sort_unstable();
            next.dedup();
            current = next;
        }

        current.into_iter().map(|id| doc.node_at(id)).collect()
    }
}
