use indexmap::IndexMap;

/// A single field value.
///
/// Each variant maps onto one literal form of the line protocol, see
/// [`formatting`][crate::formatting] for the exact rendering.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Integer(i64),
    UInteger(u64),
    Float(f64),
    String(String),
    Boolean(bool),
}

macro_rules! impl_from_field_value {
    ($variant:ident, $target:ty, $($source:ty),+) => {
        $(
            impl From<$source> for FieldValue {
                fn from(value: $source) -> Self {
                    FieldValue::$variant(<$target>::from(value))
                }
            }
        )+
    };
}

impl_from_field_value!(Integer, i64, i8, i16, i32, i64);
impl_from_field_value!(UInteger, u64, u8, u16, u32, u64);
impl_from_field_value!(Float, f64, f64);
impl_from_field_value!(String, String, String, &str);
impl_from_field_value!(Boolean, bool, bool);

/// Goes through the `f32`'s shortest decimal form, so `0.1f32` is stored as `0.1` rather than
/// the `0.10000000149011612` a plain widening would produce.
impl From<f32> for FieldValue {
    fn from(value: f32) -> Self {
        let widened = value
            .to_string()
            .parse::<f64>()
            .unwrap_or_else(|_| f64::from(value));
        FieldValue::Float(widened)
    }
}

/// A named, tagged and optionally timestamped set of field values.
///
/// Tags and fields keep the order they were added in, but are always rendered sorted by key, so
/// two measurements holding the same data encode to the same line.
///
/// ```
/// use telegraf_line_client::Measurement;
///
/// let point = Measurement::new("cpu")
///     .add_tag("host", "srv1")
///     .add_field("usage", 64.5)
///     .with_timestamp(1_000_000_000);
///
/// assert_eq!(point.name(), "cpu");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Measurement {
    pub(crate) name: String,
    pub(crate) tags: IndexMap<String, String>,
    pub(crate) fields: IndexMap<String, FieldValue>,
    pub(crate) timestamp: Option<i64>,
}

impl Measurement {
    /// Creates a new [`Measurement`] with no tags, no fields and no timestamp.
    pub fn new<N>(name: N) -> Self
    where
        N: Into<String>,
    {
        Self {
            name: name.into(),
            tags: IndexMap::new(),
            fields: IndexMap::new(),
            timestamp: None,
        }
    }

    /// Adds a tag.
    ///
    /// If the key is already present, its value is replaced.
    #[must_use]
    pub fn add_tag<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Adds a field.
    ///
    /// If the key is already present, its value is replaced.
    #[must_use]
    pub fn add_field<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Sets the timestamp, in nanoseconds since the Unix epoch.
    ///
    /// Without a timestamp the receiver assigns one on arrival.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tags(&self) -> &IndexMap<String, String> {
        &self.tags
    }

    pub fn fields(&self) -> &IndexMap<String, FieldValue> {
        &self.fields
    }

    pub fn timestamp(&self) -> Option<i64> {
        self.timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldValue, Measurement};

    #[test]
    fn test_field_value_conversions() {
        assert_eq!(FieldValue::from(-3i8), FieldValue::Integer(-3));
        assert_eq!(FieldValue::from(42i64), FieldValue::Integer(42));
        assert_eq!(FieldValue::from(7u16), FieldValue::UInteger(7));
        assert_eq!(FieldValue::from(0.5f32), FieldValue::Float(0.5));
        assert_eq!(FieldValue::from(0.1f32), FieldValue::Float(0.1));
        assert_eq!(FieldValue::from(-3.7f32), FieldValue::Float(-3.7));
        assert_eq!(FieldValue::from(true), FieldValue::Boolean(true));
        assert_eq!(
            FieldValue::from("ok"),
            FieldValue::String("ok".to_string())
        );
    }

    #[test]
    fn test_last_write_wins() {
        let point = Measurement::new("mem")
            .add_tag("host", "a")
            .add_tag("host", "b")
            .add_field("used", 1)
            .add_field("used", 2);

        assert_eq!(point.tags().len(), 1);
        assert_eq!(point.tags()["host"], "b");
        assert_eq!(point.fields()["used"], FieldValue::Integer(2));
        assert_eq!(point.timestamp(), None);
    }

    #[test]
    fn test_equality_ignores_insertion_order() {
        let left = Measurement::new("mem")
            .add_tag("a", "1")
            .add_tag("b", "2")
            .add_field("x", 1.0);
        let right = Measurement::new("mem")
            .add_tag("b", "2")
            .add_tag("a", "1")
            .add_field("x", 1.0);

        assert_eq!(left, right);
    }
}
