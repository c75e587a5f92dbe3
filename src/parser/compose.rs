//! Builds a [`Value`] tree from `yaml-rust2` parse events.
//!
//! The composer owns sequences, scalars, anchors and aliases. What a mapping
//! becomes is left to a [`MappingStrategy`] passed in by the caller.

use std::collections::HashMap;

use tracing::trace;
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser};
use yaml_rust2::scanner::{Marker, TScalarStyle};

use super::ParseError;
use crate::outline::{Pairs, Value};

/// Construction policy for mapping nodes.
pub trait MappingStrategy {
    /// Creates the node a mapping decodes into.
    ///
    /// The node is registered under the mapping's anchor before any of its
    /// entries are decoded.
    fn open(&mut self) -> Pairs {
        Pairs::new()
    }

    /// Adds one decoded `(key, value)` entry to `node`.
    ///
    /// # Arguments
    ///
    /// * `node` - The mapping being built, as returned by `open`.
    /// * `key` - The scalar key.
    /// * `value` - The fully decoded value.
    /// * `marker` - Source position of the event that completed the entry.
    fn entry(
        &mut self,
        node: &Pairs,
        key: String,
        value: Value,
        marker: Marker,
    ) -> Result<(), ParseError>;
}

/// Parses `content` and composes its first document with `strategy`.
///
/// Returns `Ok(None)` when the stream holds no document at all.
pub fn compose<S: MappingStrategy>(
    content: &str,
    strategy: S,
) -> Result<Option<Value>, ParseError> {
    let mut parser = Parser::new_from_str(content);
    let mut composer = Composer::new(strategy);

    parser.load(&mut composer, false)?;

    composer.finish()
}

/// A container that is still receiving children.
enum Open {
    Sequence {
        anchor: usize,
        items: Vec<Value>,
    },
    Mapping {
        node: Pairs,
        key: Option<String>,
    },
}

/// Event receiver that assembles the tree.
///
/// `MarkedEventReceiver` cannot fail, so the first error is kept and every
/// later event is ignored.
struct Composer<S> {
    strategy: S,
    stack: Vec<Open>,
    anchors: HashMap<usize, Value>,
    root: Option<Value>,
    error: Option<ParseError>,
}

impl<S: MappingStrategy> Composer<S> {
    fn new(strategy: S) -> Self {
        Composer {
            strategy,
            stack: Vec::new(),
            anchors: HashMap::new(),
            root: None,
            error: None,
        }
    }

    fn finish(self) -> Result<Option<Value>, ParseError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.root),
        }
    }

    fn handle(&mut self, ev: Event, marker: Marker) -> Result<(), ParseError> {
        match ev {
            Event::Scalar(text, style, anchor, _tag) => {
                let value = decode_scalar(text, style);
                self.register(anchor, &value);
                self.complete(value, marker)
            }

            Event::SequenceStart(anchor, _tag) => {
                self.stack.push(Open::Sequence {
                    anchor,
                    items: Vec::new(),
                });
                Ok(())
            }

            Event::SequenceEnd => match self.stack.pop() {
                Some(Open::Sequence { anchor, items }) => {
                    let value = Value::List(items);
                    self.register(anchor, &value);
                    self.complete(value, marker)
                }
                _ => Err(ParseError::unbalanced("sequence", marker)),
            },

            Event::MappingStart(anchor, _tag) => {
                let node = self.strategy.open();
                // Registered before the entries so aliases inside resolve to this node.
                self.register(anchor, &Value::Pairs(node.clone()));
                self.stack.push(Open::Mapping { node, key: None });
                Ok(())
            }

            Event::MappingEnd => match self.stack.pop() {
                Some(Open::Mapping { node, .. }) => self.complete(Value::Pairs(node), marker),
                _ => Err(ParseError::unbalanced("mapping", marker)),
            },

            Event::Alias(id) => {
                let value = self
                    .anchors
                    .get(&id)
                    .cloned()
                    .ok_or_else(|| ParseError::UnfinishedAlias {
                        line: marker.line(),
                        col: marker.col() + 1,
                    })?;
                self.complete(value, marker)
            }

            // Stream and document boundaries carry no content.
            _ => Ok(()),
        }
    }

    /// Records `value` under `anchor`; id 0 means the node has no anchor.
    fn register(&mut self, anchor: usize, value: &Value) {
        if anchor > 0 {
            trace!(anchor, kind = value.kind(), "registered anchor");
            self.anchors.insert(anchor, value.clone());
        }
    }

    /// Hands a finished node to its parent container, or makes it the root.
    fn complete(&mut self, value: Value, marker: Marker) -> Result<(), ParseError> {
        match self.stack.last_mut() {
            None => {
                if self.root.is_none() {
                    self.root = Some(value);
                }
                Ok(())
            }
            Some(Open::Sequence { items, .. }) => {
                items.push(value);
                Ok(())
            }
            Some(Open::Mapping { node, key }) => match key.take() {
                Some(k) => self.strategy.entry(node, k, value, marker),
                None => match value {
                    Value::Scalar(s) => {
                        *key = Some(s);
                        Ok(())
                    }
                    other => Err(ParseError::NonScalarKey {
                        kind: other.kind(),
                        line: marker.line(),
                        col: marker.col() + 1,
                    }),
                },
            },
        }
    }
}

impl<S: MappingStrategy> MarkedEventReceiver for Composer<S> {
    fn on_event(&mut self, ev: Event, marker: Marker) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.handle(ev, marker) {
            self.error = Some(err);
        }
    }
}

/// Keeps the raw scalar text; a plain null becomes the empty scalar.
fn decode_scalar(text: String, style: TScalarStyle) -> Value {
    let is_null = matches!(style, TScalarStyle::Plain)
        && matches!(text.as_str(), "~" | "null" | "Null" | "NULL" | "");
    if is_null {
        Value::Scalar(String::new())
    } else {
        Value::Scalar(text)
    }
}
