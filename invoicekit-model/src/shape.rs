use serde::{Deserialize, Serialize};

/// Describes the declared field layout of a record type.
///
/// Formats that cannot carry type information on their own (XML stores
/// everything as element text, and repeats sibling elements for sequences)
/// consult the shape on read to rebuild the typed JSON representation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityShape {
    pub fields: Vec<ShapeField>,
}

/// One named field of an [`EntityShape`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeField {
    pub name: String,
    pub shape: FieldShape,
}

/// The declared kind of a single field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldShape {
    Text,
    Integer,
    Number,
    Boolean,
    /// Repeated values of the inner shape.
    Sequence(Box<FieldShape>),
    /// Free-form string-keyed mapping.
    Mapping,
    /// Nested record with its own declared fields.
    Record(EntityShape),
}

impl FieldShape {
    /// Shorthand for a sequence of `inner`.
    pub fn sequence_of(inner: FieldShape) -> Self {
        Self::Sequence(Box::new(inner))
    }

    /// Shorthand for a sequence of nested records.
    pub fn records(shape: EntityShape) -> Self {
        Self::Sequence(Box::new(Self::Record(shape)))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, Self::Sequence(_))
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, Self::Mapping)
    }

    /// Scalars are everything that maps onto a single text node.
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Self::Text | Self::Integer | Self::Number | Self::Boolean
        )
    }
}

impl EntityShape {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field, keeping declaration order.
    #[must_use]
    pub fn field(mut self, name: &str, shape: FieldShape) -> Self {
        self.fields.push(ShapeField {
            name: name.into(),
            shape,
        });
        self
    }

    #[must_use]
    pub fn text(self, name: &str) -> Self {
        self.field(name, FieldShape::Text)
    }

    #[must_use]
    pub fn integer(self, name: &str) -> Self {
        self.field(name, FieldShape::Integer)
    }

    #[must_use]
    pub fn number(self, name: &str) -> Self {
        self.field(name, FieldShape::Number)
    }

    #[must_use]
    pub fn boolean(self, name: &str) -> Self {
        self.field(name, FieldShape::Boolean)
    }

    #[must_use]
    pub fn mapping(self, name: &str) -> Self {
        self.field(name, FieldShape::Mapping)
    }

    /// Looks up the declared shape of `name`.
    pub fn get(&self, name: &str) -> Option<&FieldShape> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| &f.shape)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
