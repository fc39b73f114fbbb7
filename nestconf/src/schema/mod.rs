//! Static description of configuration records.
//!
//! Rust has no runtime reflection, so every record that takes part in a load
//! describes itself once through [`Record::schema`]. The
//! [`NestConfig`](crate::NestConfig) derive generates these descriptions; the
//! walker in [`crate::walk`] only ever looks at [`RecordSchema`] and [`Shape`]
//! values.
//!
//! Field values are reached through the object-safe [`Field`] and [`Record`]
//! traits so the reconciliation pass can write into any nesting depth without
//! knowing the concrete types involved.

use std::any::TypeId;
use std::fmt;

use crate::value::{ScalarKind, ScalarValue};

mod impls;

/// Identifies the value source a key fragment belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tag {
    /// Environment variables (`#[nestconf(env = "...")]`).
    Env,
    /// Command-line flags (`#[nestconf(arg = "...")]`).
    Arg,
}

impl Tag {
    /// Every tag recognised on fields, in a stable order.
    pub const ALL: [Self; 2] = [Self::Env, Self::Arg];

    /// Attribute key used for this tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Env => "env",
            Self::Arg => "arg",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structural category of a type once `Option` and `Box` are stripped.
#[derive(Clone, Copy)]
pub enum ShapeKind {
    /// A primitive leaf value.
    Scalar(ScalarKind),
    /// A record exposing named fields.
    Record(RecordRef),
    /// `Vec`, sets and other sequences.
    Sequence,
    /// Associative containers.
    Map,
    /// Anything else the loader cannot see into.
    Opaque(&'static str),
}

impl fmt::Debug for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(kind) => f.debug_tuple("Scalar").field(kind).finish(),
            Self::Record(record) => f.debug_tuple("Record").field(&record.type_name()).finish(),
            Self::Sequence => f.write_str("Sequence"),
            Self::Map => f.write_str("Map"),
            Self::Opaque(name) => f.debug_tuple("Opaque").field(name).finish(),
        }
    }
}

/// Lazily resolved reference to a record's schema.
///
/// Nested records are stored as function pointers so a type may mention
/// itself without the description recursing forever.
#[derive(Clone, Copy)]
pub struct RecordRef {
    type_id: TypeId,
    type_name: &'static str,
    schema: fn() -> RecordSchema,
}

impl fmt::Debug for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RecordRef").field(&self.type_name).finish()
    }
}

impl RecordRef {
    /// Reference the schema of `R`.
    #[must_use]
    pub fn of<R: Record>() -> Self {
        Self {
            type_id: TypeId::of::<R>(),
            type_name: std::any::type_name::<R>(),
            schema: R::schema,
        }
    }

    /// Identity of the referenced record type.
    #[must_use]
    pub const fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Rust type name of the referenced record, for diagnostics.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Build the referenced schema.
    #[must_use]
    pub fn schema(&self) -> RecordSchema {
        (self.schema)()
    }
}

/// Declared shape of a field: its kind plus the number of `Option` layers
/// wrapped around it.
#[derive(Debug, Clone, Copy)]
pub struct Shape {
    kind: ShapeKind,
    optional_layers: u8,
}

impl Shape {
    /// Shape of a bare scalar.
    #[must_use]
    pub const fn scalar(kind: ScalarKind) -> Self {
        Self::new(ShapeKind::Scalar(kind))
    }

    /// Shape of a bare record.
    #[must_use]
    pub fn record<R: Record>() -> Self {
        Self::new(ShapeKind::Record(RecordRef::of::<R>()))
    }

    /// Shape with no `Option` wrapping.
    #[must_use]
    pub const fn new(kind: ShapeKind) -> Self {
        Self {
            kind,
            optional_layers: 0,
        }
    }

    /// The same shape behind one more `Option`.
    #[must_use]
    pub const fn optional(self) -> Self {
        Self {
            kind: self.kind,
            optional_layers: self.optional_layers.saturating_add(1),
        }
    }

    /// Structural kind after stripping wrappers.
    #[must_use]
    pub const fn kind(&self) -> ShapeKind {
        self.kind
    }

    /// Number of `Option` layers around the kind.
    #[must_use]
    pub const fn optional_layers(&self) -> u8 {
        self.optional_layers
    }

    /// Whether the value may be absent.
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        self.optional_layers > 0
    }
}

/// Description of one named field inside a record.
#[derive(Debug, Clone)]
pub struct FieldSchema {
    name: &'static str,
    env: Option<&'static str>,
    arg: Option<&'static str>,
    shape: Shape,
}

impl FieldSchema {
    /// Describe a field called `name` with the given shape.
    #[must_use]
    pub const fn new(name: &'static str, shape: Shape) -> Self {
        Self {
            name,
            env: None,
            arg: None,
            shape,
        }
    }

    /// Override the key fragment used by `tag`.
    #[must_use]
    pub const fn with_tag(mut self, tag: Tag, fragment: &'static str) -> Self {
        match tag {
            Tag::Env => self.env = Some(fragment),
            Tag::Arg => self.arg = Some(fragment),
        }
        self
    }

    /// Rust identifier of the field.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Explicit fragment for `tag`, if one was declared.
    #[must_use]
    pub const fn tag(&self, tag: Tag) -> Option<&'static str> {
        match tag {
            Tag::Env => self.env,
            Tag::Arg => self.arg,
        }
    }

    /// Fragment contributed by this field for `tag`: the explicit tag value,
    /// else the bare field name.
    #[must_use]
    pub fn fragment(&self, tag: Tag) -> &'static str {
        self.tag(tag).unwrap_or(self.name)
    }

    /// Declared shape of the field.
    #[must_use]
    pub const fn shape(&self) -> Shape {
        self.shape
    }
}

/// Description of a record type and its fields in declaration order.
#[derive(Debug, Clone)]
pub struct RecordSchema {
    type_id: TypeId,
    type_name: &'static str,
    fields: Vec<FieldSchema>,
}

impl RecordSchema {
    /// Describe record `R` with `fields`.
    #[must_use]
    pub fn new<R: 'static>(fields: Vec<FieldSchema>) -> Self {
        Self {
            type_id: TypeId::of::<R>(),
            type_name: std::any::type_name::<R>(),
            fields,
        }
    }

    /// Identity of the described type.
    #[must_use]
    pub const fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Rust type name of the described record.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }
}

/// Failure to write a resolved scalar into a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignError {
    /// Kind of value that was offered.
    pub offered: ScalarKind,
}

/// Object-safe access to a field value of any shape.
///
/// Scalars override [`Field::assign`]; records and their `Option`/`Box`
/// wrappers override the record accessors. The defaults describe a value the
/// loader cannot see into.
pub trait Field {
    /// The record stored here, if this is an allocated record.
    fn as_record(&self) -> Option<&dyn Record> {
        None
    }

    /// Mutable access to the record stored here, if allocated.
    fn as_record_mut(&mut self) -> Option<&mut dyn Record> {
        None
    }

    /// Replace any absent wrapper with a default record and return it.
    fn allocate(&mut self) -> Option<&mut dyn Record> {
        self.as_record_mut()
    }

    /// Store a resolved scalar.
    ///
    /// # Errors
    ///
    /// Returns [`AssignError`] when the value's kind does not match the
    /// field's type.
    fn assign(&mut self, value: ScalarValue) -> Result<(), AssignError> {
        Err(AssignError {
            offered: value.kind(),
        })
    }
}

/// Record types whose fields can be enumerated and addressed by name.
pub trait Record: Field + 'static {
    /// Describe this record's fields.
    fn schema() -> RecordSchema
    where
        Self: Sized;

    /// Borrow the field called `name`.
    fn field_ref(&self, name: &str) -> Option<&dyn Field>;

    /// Mutably borrow the field called `name`.
    fn field_mut(&mut self, name: &str) -> Option<&mut dyn Field>;
}

/// Types that can appear as configuration fields.
pub trait Describe: Field + Default + 'static {
    /// Declared shape of the type.
    fn shape() -> Shape;
}
