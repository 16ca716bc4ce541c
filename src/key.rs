//! Composite lookup keys.
//!
//! A subscription slot is addressed by a [`CompositeKey`]: the topic, an optional
//! sender type, an optional arguments type and the subscriber's type. Keys are
//! compared field by field, so a topic containing any character never collides
//! with a differently shaped key.

use std::any::{type_name, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Stable identity of a Rust type, used as a qualifier in keys.
///
/// Equality and hashing use only the `TypeId`; the name is kept for diagnostics.
#[derive(Clone, Copy)]
pub struct TypeTag {
    id: TypeId,
    name: &'static str,
}

impl TypeTag {
    /// Returns the tag of `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Full type path, e.g. `alloc::string::String`.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeTag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeTag {}

impl Hash for TypeTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// The publish-side view of a key: topic plus the qualifier types known at the
/// call site. The subscriber type never takes part in matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Qualifiers<'a> {
    pub topic: &'a str,
    pub sender: Option<TypeTag>,
    pub args: Option<TypeTag>,
}

impl<'a> Qualifiers<'a> {
    /// No sender, no arguments.
    pub fn topic(topic: &'a str) -> Self {
        Self {
            topic,
            sender: None,
            args: None,
        }
    }

    /// Arguments of type `A`, no sender.
    pub fn args<A: 'static>(topic: &'a str) -> Self {
        Self {
            args: Some(TypeTag::of::<A>()),
            ..Self::topic(topic)
        }
    }

    /// Sender of type `S`, no arguments.
    pub fn sender<S: 'static>(topic: &'a str) -> Self {
        Self {
            sender: Some(TypeTag::of::<S>()),
            ..Self::topic(topic)
        }
    }

    /// Sender of type `S` and arguments of type `A`.
    pub fn sender_args<S: 'static, A: 'static>(topic: &'a str) -> Self {
        Self {
            sender: Some(TypeTag::of::<S>()),
            args: Some(TypeTag::of::<A>()),
            topic,
        }
    }

    /// Completes the qualifiers into a full key for subscriber type `T`.
    pub fn with_subscriber<T: ?Sized + 'static>(self) -> CompositeKey {
        CompositeKey::new(self.topic, self.sender, self.args, TypeTag::of::<T>())
    }
}

/// Identifier of one callback slot.
///
/// Two registrations with the same topic, sender type, arguments type and
/// subscriber type share a slot; the later one replaces the earlier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompositeKey {
    topic: Arc<str>,
    sender: Option<TypeTag>,
    args: Option<TypeTag>,
    subscriber: TypeTag,
}

impl CompositeKey {
    pub fn new(
        topic: impl Into<Arc<str>>,
        sender: Option<TypeTag>,
        args: Option<TypeTag>,
        subscriber: TypeTag,
    ) -> Self {
        Self {
            topic: topic.into(),
            sender,
            args,
            subscriber,
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn sender(&self) -> Option<TypeTag> {
        self.sender
    }

    pub fn args(&self) -> Option<TypeTag> {
        self.args
    }

    pub fn subscriber(&self) -> TypeTag {
        self.subscriber
    }

    /// Projects the key onto its publish shape, dropping the subscriber type.
    pub fn qualifiers(&self) -> Qualifiers<'_> {
        Qualifiers {
            topic: &self.topic,
            sender: self.sender,
            args: self.args,
        }
    }

    /// True when a publish with `qualifiers` reaches this slot.
    ///
    /// Absent qualifiers must be absent on both sides: a publish without a
    /// sender never reaches a sender-typed subscription and vice versa.
    pub fn matches(&self, qualifiers: &Qualifiers<'_>) -> bool {
        self.qualifiers() == *qualifiers
    }
}

impl fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ topic: {:?}", self.topic)?;
        if let Some(sender) = self.sender {
            write!(f, ", sender: {sender}")?;
        }
        if let Some(args) = self.args {
            write!(f, ", args: {args}")?;
        }
        write!(f, ", subscriber: {} }}", self.subscriber)
    }
}
