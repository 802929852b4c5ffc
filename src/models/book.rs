use mongodb::bson::{self, oid::ObjectId, Bson, DateTime, Document};
use serde_json::{Map, Value};

use crate::error::{StoreError, StoreResult};

pub const ID: &str = "_id";
pub const CREATED_AT: &str = "createdAt";
pub const UPDATED_AT: &str = "updatedAt";

// Keys owned by the store; client values for them are dropped on every write.
const RESERVED: [&str; 4] = [ID, CREATED_AT, UPDATED_AT, "__v"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Text,
    Number,
}

/// The declared fields of a Book. Anything else in a payload is stored as given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookField {
    Title,
    Author,
    Genre,
    PublishedYear,
    Rating,
}

impl BookField {
    pub const ALL: [BookField; 5] = [
        BookField::Title,
        BookField::Author,
        BookField::Genre,
        BookField::PublishedYear,
        BookField::Rating,
    ];

    pub fn key(self) -> &'static str {
        match self {
            BookField::Title => "title",
            BookField::Author => "author",
            BookField::Genre => "genre",
            BookField::PublishedYear => "publishedYear",
            BookField::Rating => "rating",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }

    fn kind(self) -> Kind {
        match self {
            BookField::PublishedYear | BookField::Rating => Kind::Number,
            _ => Kind::Text,
        }
    }

    /// Casts a JSON value to the stored type of this field.
    pub fn cast(self, value: &Value) -> StoreResult<Bson> {
        match self.kind() {
            Kind::Text => cast_text(self.key(), value),
            Kind::Number => cast_number(self.key(), value),
        }
    }
}

fn cast_text(key: &str, value: &Value) -> StoreResult<Bson> {
    match value {
        Value::Null => Ok(Bson::Null),
        Value::String(s) => Ok(Bson::String(s.clone())),
        Value::Number(n) => Ok(Bson::String(number_text(n))),
        Value::Bool(b) => Ok(Bson::String(b.to_string())),
        Value::Array(_) | Value::Object(_) => {
            Err(StoreError::cast(key, "expected a string"))
        }
    }
}

// Whole floats lose their fraction, so `4.0` is stored as "4".
fn number_text(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => format!("{:.0}", f),
        _ => n.to_string(),
    }
}

fn cast_number(key: &str, value: &Value) -> StoreResult<Bson> {
    match value {
        Value::Null => Ok(Bson::Null),
        Value::Bool(b) => Ok(Bson::Int32(i32::from(*b))),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(integer(i))
            } else if let Some(f) = n.as_f64() {
                Ok(Bson::Double(f))
            } else {
                Err(StoreError::cast(key, format!("{} is out of range", n)))
            }
        }
        Value::String(s) => parse_number(key, s),
        Value::Array(_) | Value::Object(_) => {
            Err(StoreError::cast(key, "expected a number"))
        }
    }
}

fn parse_number(key: &str, raw: &str) -> StoreResult<Bson> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Bson::Null);
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        return Ok(integer(i));
    }
    match trimmed.parse::<f64>() {
        Ok(f) if f.is_finite() => Ok(Bson::Double(f)),
        _ => Err(StoreError::cast(key, format!("{:?} is not a number", raw))),
    }
}

fn integer(i: i64) -> Bson {
    i32::try_from(i).map(Bson::Int32).unwrap_or(Bson::Int64(i))
}

/// A single `field = value` equality filter taken from a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub field: BookField,
    pub value: String,
}

impl Filter {
    pub fn new(field: BookField, value: impl Into<String>) -> Self {
        Filter {
            field,
            value: value.into(),
        }
    }

    /// The value cast to the field's stored type.
    pub fn cast_value(&self) -> StoreResult<Bson> {
        self.field.cast(&Value::String(self.value.clone()))
    }

    pub fn to_document(&self) -> StoreResult<Document> {
        let mut document = Document::new();
        document.insert(self.field.key(), self.cast_value()?);
        Ok(document)
    }
}

/// Turns a request body into the fields to write, casting the declared ones.
pub fn cast_payload(body: &Value) -> StoreResult<Document> {
    let object = body
        .as_object()
        .ok_or_else(|| StoreError::cast("body", "expected a JSON object"))?;

    let mut document = Document::new();
    for (key, value) in object {
        if RESERVED.contains(&key.as_str()) {
            continue;
        }
        let bson = match BookField::from_key(key) {
            Some(field) => field.cast(value)?,
            None => bson::to_bson(value)?,
        };
        document.insert(key.clone(), bson);
    }
    Ok(document)
}

pub fn parse_id(raw: &str) -> StoreResult<ObjectId> {
    ObjectId::parse_str(raw).map_err(|_| StoreError::InvalidId(raw.to_string()))
}

/// Assigns the id and both timestamps to a freshly cast payload.
pub fn stamp_new(mut data: Document, now: DateTime) -> Document {
    data.insert(ID, ObjectId::new());
    data.insert(CREATED_AT, now);
    data.insert(UPDATED_AT, now);
    data
}

/// The `$set` body for a partial update.
pub fn stamp_update(mut data: Document, now: DateTime) -> Document {
    data.insert(UPDATED_AT, now);
    data
}

/// Renders a stored book as JSON: ids as hex strings, dates as RFC 3339.
pub fn to_json(book: &Document) -> Value {
    Value::Object(render_document(book))
}

fn render_document(document: &Document) -> Map<String, Value> {
    document
        .iter()
        .map(|(key, value)| (key.clone(), render(value)))
        .collect()
}

fn render(value: &Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => dt
            .try_to_rfc3339_string()
            .map(Value::String)
            .unwrap_or_else(|_| Value::from(dt.timestamp_millis())),
        Bson::Document(inner) => Value::Object(render_document(inner)),
        Bson::Array(items) => Value::Array(items.iter().map(render).collect()),
        other => other.clone().into_relaxed_extjson(),
    }
}

/// Equality as the document store applies it: numbers compare by value.
pub fn values_match(stored: &Bson, wanted: &Bson) -> bool {
    match (as_number(stored), as_number(wanted)) {
        (Some(a), Some(b)) => a == b,
        _ => stored == wanted,
    }
}

fn as_number(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(i) => Some(f64::from(*i)),
        Bson::Int64(i) => Some(*i as f64),
        Bson::Double(f) => Some(*f),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;
    use serde_json::json;

    #[test]
    fn numeric_strings_cast_to_numbers() {
        let field = BookField::PublishedYear;
        assert_eq!(field.cast(&json!("2012")).unwrap(), Bson::Int32(2012));
        assert_eq!(field.cast(&json!(" 2012 ")).unwrap(), Bson::Int32(2012));
        assert_eq!(BookField::Rating.cast(&json!("4.5")).unwrap(), Bson::Double(4.5));
        assert_eq!(field.cast(&json!("")).unwrap(), Bson::Null);
        assert!(matches!(
            field.cast(&json!("soon")),
            Err(StoreError::Cast { .. })
        ));
    }

    #[test]
    fn text_fields_stringify_scalars() {
        assert_eq!(
            BookField::Title.cast(&json!(1984)).unwrap(),
            Bson::String("1984".into())
        );
        assert_eq!(
            BookField::Title.cast(&json!(4.0)).unwrap(),
            Bson::String("4".into())
        );
        assert_eq!(
            BookField::Genre.cast(&json!(2.5)).unwrap(),
            Bson::String("2.5".into())
        );
        assert!(BookField::Author.cast(&json!(["a", "b"])).is_err());
    }

    #[test]
    fn payload_drops_store_owned_keys_and_keeps_extras() {
        let payload = cast_payload(&json!({
            "_id": "abc",
            "createdAt": "yesterday",
            "title": "Dune",
            "publishedYear": "1965",
            "pages": 412
        }))
        .unwrap();

        assert!(!payload.contains_key(ID));
        assert!(!payload.contains_key(CREATED_AT));
        assert_eq!(payload.get_str("title").unwrap(), "Dune");
        assert_eq!(payload.get_i32("publishedYear").unwrap(), 1965);
        assert!(payload.contains_key("pages"));
    }

    #[test]
    fn payload_must_be_an_object() {
        assert!(cast_payload(&json!(["title"])).is_err());
    }

    #[test]
    fn rendering_uses_hex_ids_and_plain_numbers() {
        let book = stamp_new(
            doc! { "title": "Dune", "publishedYear": 1965, "rating": 4.3 },
            DateTime::now(),
        );
        let rendered = to_json(&book);

        let id = book.get_object_id(ID).unwrap().to_hex();
        assert_eq!(rendered["_id"], json!(id));
        assert_eq!(rendered["publishedYear"], json!(1965));
        assert_eq!(rendered["rating"], json!(4.3));
        assert!(rendered["createdAt"].is_string());
    }

    #[test]
    fn numbers_match_across_widths() {
        assert!(values_match(&Bson::Int64(2013), &Bson::Int32(2013)));
        assert!(values_match(&Bson::Double(2013.0), &Bson::Int32(2013)));
        assert!(!values_match(&Bson::String("2013".into()), &Bson::Int32(2013)));
    }

    #[test]
    fn malformed_ids_are_rejected() {
        assert!(matches!(parse_id("nope"), Err(StoreError::InvalidId(_))));
        assert!(parse_id(&ObjectId::new().to_hex()).is_ok());
    }
}
