use std::path::Path;

use super::{read_utf8, require, Codec, CodecError, FormatId};
use crate::atomic::write_atomic;
use crate::capability::{Capabilities, Engine};

/// YAML documents, rewritten in block style with sorted mapping keys.
/// There is no built-in fallback: without the YAML engine
/// both directions fail before touching the file.
pub struct YamlCodec;

impl Codec for YamlCodec {
    fn format(&self) -> FormatId { FormatId::Yaml }

    fn decode(&self, caps: &Capabilities, path: &Path) -> Result<String, CodecError> {
        require(caps, Engine::Yaml)?;
        engine::canonicalize(&read_utf8(path, FormatId::Yaml)?)
    }

    fn encode(&self, caps: &Capabilities, path: &Path, text: &str) -> Result<(), CodecError> {
        require(caps, Engine::Yaml)?;
        let canonical = engine::canonicalize(text)?;
        Ok(write_atomic(path, canonical.as_bytes())?)
    }
}

#[cfg(feature = "yaml")]
mod engine {
    use std::cmp::Ordering;

    use serde_yaml::value::TaggedValue;
    use serde_yaml::Value;

    use crate::codec::{CodecError, FormatId};

    /// Block style, mapping keys sorted at every depth.
    pub(super) fn canonicalize(text: &str) -> Result<String, CodecError> {
        let value: Value = serde_yaml::from_str(text)
            .map_err(|e| CodecError::malformed(FormatId::Yaml, e))?;
        serde_yaml::to_string(&sort_keys(value)).map_err(|e| CodecError::malformed(FormatId::Yaml, e))
    }

    fn sort_keys(value: Value) -> Value {
        match value {
            Value::Mapping(map) => {
                let mut entries: Vec<(Value, Value)> =
                    map.into_iter().map(|(k, v)| (k, sort_keys(v))).collect();
                entries.sort_by(|(a, _), (b, _)| key_order(a, b));
                Value::Mapping(entries.into_iter().collect())
            }
            Value::Sequence(seq) => Value::Sequence(seq.into_iter().map(sort_keys).collect()),
            Value::Tagged(tagged) => {
                let TaggedValue { tag, value } = *tagged;
                Value::Tagged(Box::new(TaggedValue { tag, value: sort_keys(value) }))
            }
            scalar => scalar,
        }
    }

    /// Strings by code point, numbers by value.  Keys of different kinds
    /// group by kind; ties keep source order.
    fn key_order(a: &Value, b: &Value) -> Ordering {
        match (a, b) {
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::Number(a), Value::Number(b)) => {
                a.as_f64().partial_cmp(&b.as_f64()).unwrap_or(Ordering::Equal)
            }
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            _ => rank(a).cmp(&rank(b)),
        }
    }

    fn rank(v: &Value) -> u8 {
        match v {
            Value::Null        => 0,
            Value::Bool(_)     => 1,
            Value::Number(_)   => 2,
            Value::String(_)   => 3,
            Value::Sequence(_) => 4,
            Value::Mapping(_)  => 5,
            Value::Tagged(_)   => 6,
        }
    }
}

#[cfg(not(feature = "yaml"))]
mod engine {
    use crate::capability::Engine;
    use crate::codec::CodecError;

    pub(super) fn canonicalize(_: &str) -> Result<String, CodecError> {
        Err(CodecError::missing(Engine::Yaml))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn absent_engine_never_falls_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("conf.yaml");
        std::fs::write(&path, "key: value\n").unwrap();
        let caps = Capabilities::detected().without(Engine::Yaml);

        let err = YamlCodec.decode(&caps, &path).unwrap_err();
        assert!(matches!(err, CodecError::MissingDependency { engine: Engine::Yaml }));

        let err = YamlCodec.encode(&caps, &path, "other: 1\n").unwrap_err();
        assert!(matches!(err, CodecError::MissingDependency { engine: Engine::Yaml }));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "key: value\n");
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn canonical_form_is_stable() {
        let once = engine::canonicalize("b:   [1, 2]\na: {y: 1, x: 2}\n").unwrap();
        assert_eq!(once, "a:\n  x: 2\n  y: 1\nb:\n- 1\n- 2\n");
        assert_eq!(engine::canonicalize(&once).unwrap(), once);

        let unicode = engine::canonicalize("name: Zoë\n").unwrap();
        assert!(unicode.contains("Zoë"), "{unicode}");
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn mapping_keys_are_sorted() {
        assert_eq!(engine::canonicalize("b: 1\na: 2\n").unwrap(), "a: 2\nb: 1\n");
        assert_eq!(engine::canonicalize("10: x\n9: y\n").unwrap(), "9: y\n10: x\n");
        assert_eq!(
            engine::canonicalize("- {z: 1, m: 2}\n").unwrap(),
            "- m: 2\n  z: 1\n"
        );
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn malformed_input_is_reported() {
        let err = engine::canonicalize("key: [unclosed\n").unwrap_err();
        assert!(matches!(err, CodecError::MalformedInput { format: FormatId::Yaml, .. }));
    }
}
