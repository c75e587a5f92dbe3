use tracing::trace;
use yaml_rust2::scanner::Marker;

use super::compose::MappingStrategy;
use super::ParseError;
use crate::outline::{Pairs, Value};

/// Decodes every mapping into ordered pairs.
///
/// Entries are appended in the order they are met. Keys are never compared,
/// so repeated keys stay as separate entries.
#[derive(Debug, Default, Clone, Copy)]
pub struct OrderedPairs;

impl MappingStrategy for OrderedPairs {
    fn entry(
        &mut self,
        node: &Pairs,
        key: String,
        value: Value,
        _marker: Marker,
    ) -> Result<(), ParseError> {
        node.push(&key, value);
        Ok(())
    }
}

/// Decodes mappings into ordered pairs but rejects a key that repeats
/// within the same mapping.
#[derive(Debug, Default, Clone, Copy)]
pub struct UniqueKeys;

impl MappingStrategy for UniqueKeys {
    fn entry(
        &mut self,
        node: &Pairs,
        key: String,
        value: Value,
        marker: Marker,
    ) -> Result<(), ParseError> {
        if node.contains_key(&key) {
            trace!(%key, "duplicate key rejected");
            return Err(ParseError::DuplicateKey {
                key,
                line: marker.line(),
                col: marker.col() + 1,
            });
        }
        node.push(&key, value);
        Ok(())
    }
}
