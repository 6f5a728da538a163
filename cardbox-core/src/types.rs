use serde::{Deserialize, Deserializer, Serialize};

/// A single knowledge card as stored in the collection file and returned by the API.
///
/// Decoding is lenient: fields missing from a hand-edited data file, or set
/// to `null`, read as empty values rather than failing the whole collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Card {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub term: String,
    #[serde(deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(deserialize_with = "null_as_default")]
    pub core: String,
    #[serde(deserialize_with = "null_as_default")]
    pub boundary: String,
    #[serde(deserialize_with = "null_as_default")]
    pub signal: String,
    #[serde(deserialize_with = "null_as_default")]
    pub action: String,
    #[serde(deserialize_with = "nullable_strings")]
    pub aliases: Vec<String>,
}

fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

fn nullable_strings<'de, D>(d: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items: Option<Vec<Option<String>>> = Option::deserialize(d)?;
    Ok(items
        .unwrap_or_default()
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect())
}

/// Request payload for creating or updating a card.
///
/// Every field is optional at the parse boundary; `validate_card` decides
/// what is actually required. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CardInput {
    pub id: Option<String>,
    pub term: Option<String>,
    pub category: Option<String>,
    pub core: Option<String>,
    pub boundary: Option<String>,
    pub signal: Option<String>,
    pub action: Option<String>,
    /// `null` entries are accepted and dropped during validation.
    pub aliases: Option<Vec<Option<String>>>,
}
