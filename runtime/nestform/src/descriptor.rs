//! The shapes that can be decoded out of a form.
use std::collections::HashSet;
use std::fmt;

use crate::errors::UnsupportedSchema;

/// The leaf types that can be parsed out of a single parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// The raw value, verbatim.
    String,
    /// A base-10 signed 32-bit integer.
    Int32,
    /// A base-10 signed 64-bit integer.
    Int64,
    /// One of `true`, `1`, `false`, `0`.
    Bool,
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScalarKind::String => "String",
            ScalarKind::Int32 => "i32",
            ScalarKind::Int64 => "i64",
            ScalarKind::Bool => "bool",
        };
        f.write_str(name)
    }
}

/// The target shape of a decoded parameter.
///
/// Descriptors are built once, when the parameters of a handler are declared,
/// and can then be shared across any number of requests.
///
/// # Example
///
/// ```rust
/// use nestform::TypeDescriptor;
///
/// // items[][id]=1&items[][note]=fragile
/// let line = TypeDescriptor::record([
///     ("id", TypeDescriptor::int64()),
///     ("note", TypeDescriptor::optional(TypeDescriptor::string())?),
/// ])?;
/// let items = TypeDescriptor::list(line);
/// # Ok::<(), nestform::errors::UnsupportedSchema>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDescriptor {
    /// A single value, matched by exact key.
    Scalar(ScalarKind),
    /// Decodes to nothing, rather than failing, when the inner value is missing.
    Optional(Box<TypeDescriptor>),
    /// Zero or more values sharing the `name[]` key prefix.
    List(Box<TypeDescriptor>),
    /// A fixed set of named fields, each one under the `name[field]` key prefix.
    Record(RecordDescriptor),
}

impl TypeDescriptor {
    pub fn string() -> Self {
        Self::Scalar(ScalarKind::String)
    }

    pub fn int32() -> Self {
        Self::Scalar(ScalarKind::Int32)
    }

    pub fn int64() -> Self {
        Self::Scalar(ScalarKind::Int64)
    }

    pub fn bool() -> Self {
        Self::Scalar(ScalarKind::Bool)
    }

    /// A list whose elements have the `inner` shape.
    pub fn list(inner: TypeDescriptor) -> Self {
        Self::List(Box::new(inner))
    }

    /// An optional value with the `inner` shape.
    ///
    /// It fails if `inner` is optional itself: there is no way to tell apart
    /// the two levels of absence in a form.
    pub fn optional(inner: TypeDescriptor) -> Result<Self, UnsupportedSchema> {
        if inner.is_optional() {
            return Err(UnsupportedSchema::new(
                "an optional parameter can't wrap another optional parameter",
            ));
        }
        Ok(Self::Optional(Box::new(inner)))
    }

    /// A record with the given fields, in declaration order.
    ///
    /// The declaration order matters: when two fields could both claim a key,
    /// the first one wins.
    /// It fails if a field name is empty, contains brackets, or is declared twice.
    pub fn record<I, N>(fields: I) -> Result<Self, UnsupportedSchema>
    where
        I: IntoIterator<Item = (N, TypeDescriptor)>,
        N: Into<String>,
    {
        let fields = fields
            .into_iter()
            .map(|(name, descriptor)| Field {
                name: name.into(),
                descriptor,
            })
            .collect();
        let record = RecordDescriptor { fields };
        record.check_field_names()?;
        Ok(Self::Record(record))
    }

    /// Collapse a union of alternatives into an optional value.
    ///
    /// Each alternative is either a shape (`Some`) or the absence of a value (`None`).
    /// The union is supported only if it has exactly one shape and at least one
    /// absent alternative, in which case it's equivalent to [`TypeDescriptor::optional`].
    pub fn union<I>(alternatives: I) -> Result<Self, UnsupportedSchema>
    where
        I: IntoIterator<Item = Option<TypeDescriptor>>,
    {
        let mut n_absent = 0;
        let mut present = Vec::new();
        for alternative in alternatives {
            match alternative {
                Some(descriptor) => present.push(descriptor),
                None => n_absent += 1,
            }
        }
        if n_absent == 0 {
            return Err(UnsupportedSchema::new(
                "a union must include an absent alternative",
            ));
        }
        let n_present = present.len();
        let mut present = present.into_iter();
        match (present.next(), n_present) {
            (Some(inner), 1) => Self::optional(inner),
            _ => Err(UnsupportedSchema::new(format!(
                "a union must include exactly one non-absent alternative, found {n_present}"
            ))),
        }
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, TypeDescriptor::Optional(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, TypeDescriptor::List(_))
    }

    /// Check the whole descriptor tree.
    ///
    /// The constructors on [`TypeDescriptor`] reject invalid shapes as they're built,
    /// but variants can also be assembled by hand.
    pub fn validate(&self) -> Result<(), UnsupportedSchema> {
        match self {
            TypeDescriptor::Scalar(_) => Ok(()),
            TypeDescriptor::Optional(inner) => {
                if inner.is_optional() {
                    return Err(UnsupportedSchema::new(
                        "an optional parameter can't wrap another optional parameter",
                    ));
                }
                inner.validate()
            }
            TypeDescriptor::List(inner) => inner.validate(),
            TypeDescriptor::Record(record) => {
                record.check_field_names()?;
                record
                    .fields()
                    .iter()
                    .try_for_each(|field| field.descriptor.validate())
            }
        }
    }
}

/// The fields of a [`TypeDescriptor::Record`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDescriptor {
    fields: Vec<Field>,
}

impl RecordDescriptor {
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    fn check_field_names(&self) -> Result<(), UnsupportedSchema> {
        let mut seen = HashSet::with_capacity(self.fields.len());
        for field in &self.fields {
            if field.name.is_empty() {
                return Err(UnsupportedSchema::new("record field names can't be empty"));
            }
            if field.name.contains(['[', ']']) {
                return Err(UnsupportedSchema::new(format!(
                    "the record field name `{}` contains a bracket",
                    field.name
                )));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(UnsupportedSchema::new(format!(
                    "the record field `{}` is declared more than once",
                    field.name
                )));
            }
        }
        Ok(())
    }
}

/// A named field in a [`RecordDescriptor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    name: String,
    descriptor: TypeDescriptor,
}

impl Field {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }
}
