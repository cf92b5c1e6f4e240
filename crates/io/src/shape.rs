// Dataset shape normalization
//
// Source files come in four layouts. Classification happens once, here, and
// everything downstream works on the canonical SourceDataset.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use mushaf_recon::key::RawKey;
use mushaf_recon::{DatasetKey, Entry, SourceDataset};

use crate::error::IoError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeHint {
    /// `[{"id": 1, "verses": [{"id": 1, "text": .., "translation": ..}]}]`
    ListOfSurahs,
    /// `{"1:1": ..}`
    FlatDict,
    /// `{"1": {"1": ..}}`, with a surah-level entry under `"_surah"`
    NestedDict,
    /// `{"1": ..}` (one entry per surah)
    SurahDict,
}

impl std::fmt::Display for ShapeHint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ListOfSurahs => write!(f, "list_of_surahs"),
            Self::FlatDict => write!(f, "flat_dict"),
            Self::NestedDict => write!(f, "nested_dict"),
            Self::SurahDict => write!(f, "surah_dict"),
        }
    }
}

/// Reserved field holding a surah-level entry inside a nested surah object
/// or a list-of-surahs surah object.
pub const SURAH_ENTRY_FIELD: &str = "_surah";

#[derive(Debug, Clone, Deserialize)]
pub struct SurahDoc {
    pub id: u32,
    #[serde(default, rename = "_surah")]
    pub entry: Option<Value>,
    #[serde(default)]
    pub verses: Vec<VerseDoc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerseDoc {
    pub id: u32,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone)]
pub enum RawDataset {
    ListOfSurahs(Vec<SurahDoc>),
    FlatDict(Map<String, Value>),
    NestedDict(Map<String, Value>),
    SurahDict(Map<String, Value>),
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn looks_nested(map: &Map<String, Value>) -> bool {
    map.values().all(|v| match v {
        Value::Object(inner) => {
            !inner.is_empty() && inner.keys().all(|k| all_digits(k) || k == SURAH_ENTRY_FIELD)
        }
        _ => false,
    })
}

impl RawDataset {
    /// Decide the layout of `value`. With a hint the layout is taken as given
    /// and only checked for the right JSON type.
    pub fn classify(value: Value, hint: Option<ShapeHint>) -> Result<Self, IoError> {
        let shape = match (hint, &value) {
            (Some(h), _) => h,
            (None, Value::Array(_)) => ShapeHint::ListOfSurahs,
            (None, Value::Object(map)) if map.is_empty() || map.keys().any(|k| k.contains(':')) => {
                ShapeHint::FlatDict
            }
            (None, Value::Object(map)) if looks_nested(map) => ShapeHint::NestedDict,
            (None, Value::Object(_)) => ShapeHint::SurahDict,
            (None, other) => {
                return Err(IoError::Shape(format!("expected an array or object, found {}", type_name(other))))
            }
        };

        match (shape, value) {
            (ShapeHint::ListOfSurahs, v @ Value::Array(_)) => {
                let docs: Vec<SurahDoc> =
                    serde_json::from_value(v).map_err(|e| IoError::Shape(format!("list_of_surahs: {e}")))?;
                Ok(Self::ListOfSurahs(docs))
            }
            (ShapeHint::FlatDict, Value::Object(map)) => Ok(Self::FlatDict(map)),
            (ShapeHint::NestedDict, Value::Object(map)) => Ok(Self::NestedDict(map)),
            (ShapeHint::SurahDict, Value::Object(map)) => Ok(Self::SurahDict(map)),
            (shape, other) => Err(IoError::Shape(format!(
                "{shape} cannot be read from {}",
                type_name(&other)
            ))),
        }
    }

    pub fn shape(&self) -> ShapeHint {
        match self {
            Self::ListOfSurahs(_) => ShapeHint::ListOfSurahs,
            Self::FlatDict(_) => ShapeHint::FlatDict,
            Self::NestedDict(_) => ShapeHint::NestedDict,
            Self::SurahDict(_) => ShapeHint::SurahDict,
        }
    }

    /// Canonical dataset. Malformed keys fail; out-of-range keys become
    /// orphans. For `ListOfSurahs`, `text_field` picks the verse field.
    pub fn normalize(self, text_field: &str) -> Result<SourceDataset, IoError> {
        let mut out = SourceDataset::new();

        match self {
            Self::ListOfSurahs(docs) => {
                for surah in docs {
                    if let Some(value) = surah.entry {
                        let label = surah.id.to_string();
                        let entry = entry_from_value(&label, value)?;
                        insert(&mut out, RawKey { surah: surah.id, ayah: None }, &label, entry);
                    }
                    for verse in surah.verses {
                        let raw = RawKey { surah: surah.id, ayah: Some(verse.id) };
                        let text = verse.fields.get(text_field).and_then(Value::as_str).unwrap_or("");
                        insert(&mut out, raw, &format!("{}:{}", surah.id, verse.id), Entry::Text(text.to_string()));
                    }
                }
            }
            Self::FlatDict(map) | Self::SurahDict(map) => {
                for (key, value) in map {
                    let raw = RawKey::parse(&key)?;
                    let entry = entry_from_value(&key, value)?;
                    insert(&mut out, raw, &key, entry);
                }
            }
            Self::NestedDict(map) => {
                for (surah, verses) in map {
                    let Value::Object(verses) = verses else {
                        return Err(IoError::Shape(format!("surah '{surah}' is not an object")));
                    };
                    for (ayah, value) in verses {
                        let key = if ayah == SURAH_ENTRY_FIELD {
                            surah.clone()
                        } else {
                            format!("{surah}:{ayah}")
                        };
                        let raw = RawKey::parse(&key)?;
                        let entry = entry_from_value(&key, value)?;
                        insert(&mut out, raw, &key, entry);
                    }
                }
            }
        }

        out.orphans.sort();
        out.orphans.dedup();
        Ok(out)
    }
}

fn insert(out: &mut SourceDataset, raw: RawKey, label: &str, entry: Entry) {
    match raw.validate() {
        Ok(key) => {
            out.entries.insert(key, entry);
        }
        Err(_) => out.orphans.push(label.to_string()),
    }
}

fn entry_from_value(key: &str, value: Value) -> Result<Entry, IoError> {
    match value {
        Value::String(s) => Ok(Entry::Text(s)),
        Value::Object(map) => Ok(Entry::Record(map)),
        Value::Null => Ok(Entry::Text(String::new())),
        other => Err(IoError::Shape(format!("key '{key}': unsupported value type {}", type_name(&other)))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn entry_value(entry: &Entry) -> Value {
    match entry {
        Entry::Text(s) => Value::String(s.clone()),
        Entry::Record(map) => Value::Object(map.clone()),
    }
}

/// Inverse of [`RawDataset::normalize`]: render `dataset` in `shape`.
/// The nested layouts keep a surah-level entry under [`SURAH_ENTRY_FIELD`]
/// next to that surah's verses, so every key survives a round trip.
pub fn denormalize(dataset: &SourceDataset, shape: ShapeHint, text_field: &str) -> Value {
    match shape {
        ShapeHint::FlatDict | ShapeHint::SurahDict => Value::Object(
            dataset
                .entries
                .iter()
                .map(|(k, e)| (k.to_string(), entry_value(e)))
                .collect(),
        ),
        ShapeHint::NestedDict => {
            let mut map = Map::new();
            for (k, e) in &dataset.entries {
                let field = match k {
                    DatasetKey::Verse(v) => v.ayah().to_string(),
                    DatasetKey::Surah(_) => SURAH_ENTRY_FIELD.to_string(),
                };
                let surah = map
                    .entry(k.surah().to_string())
                    .or_insert_with(|| Value::Object(Map::new()));
                if let Value::Object(inner) = surah {
                    inner.insert(field, entry_value(e));
                }
            }
            Value::Object(map)
        }
        ShapeHint::ListOfSurahs => {
            let mut surahs: Vec<Value> = Vec::new();
            for surah in dataset.surahs_present() {
                let mut obj = Map::new();
                obj.insert("id".into(), Value::from(surah));
                if let Some(e) = dataset.get(&DatasetKey::Surah(surah)) {
                    obj.insert(SURAH_ENTRY_FIELD.into(), entry_value(e));
                }
                let verses: Vec<Value> = dataset
                    .entries
                    .iter()
                    .filter_map(|(k, e)| k.verse().filter(|v| v.surah() == surah).map(|v| (v, e)))
                    .map(|(v, e)| {
                        let mut verse = Map::new();
                        verse.insert("id".into(), Value::from(v.ayah()));
                        verse.insert(text_field.to_string(), entry_value(e));
                        Value::Object(verse)
                    })
                    .collect();
                obj.insert("verses".into(), Value::Array(verses));
                surahs.push(Value::Object(obj));
            }
            Value::Array(surahs)
        }
    }
}
