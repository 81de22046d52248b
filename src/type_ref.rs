// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! GraphQL type references
//!
//! Introspection returns argument and input field types as a chain of
//! `{kind, name, ofType}` objects. They are parsed into an owned tree here and
//! unwrapped to the named leaf type that drives payload synthesis.

use serde::{Deserialize, Serialize};

/// Recursive type reference as returned by introspection.
///
/// Each wrapper exclusively owns its child. `Truncated` marks a wrapper whose
/// `ofType` was cut off by the introspection query depth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TypeRef {
    Scalar(String),
    Enum(String),
    InputObject(String),
    Object(String),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
    Truncated,
}

/// Kind of the named type at the bottom of a reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LeafKind {
    Scalar,
    Enum,
    InputObject,
    Object,
    /// No named leaf was reachable
    Unresolved,
}

/// Named leaf of a type reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Leaf<'a> {
    pub kind: LeafKind,
    pub name: &'a str,
}

/// Wire shape of an introspection type reference
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTypeRef {
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub of_type: Option<Box<RawTypeRef>>,
}

impl From<RawTypeRef> for TypeRef {
    fn from(raw: RawTypeRef) -> Self {
        let name = raw.name.filter(|n| !n.is_empty());
        let wrapped = |of_type: Option<Box<RawTypeRef>>| {
            Box::new(of_type.map(|inner| TypeRef::from(*inner)).unwrap_or(TypeRef::Truncated))
        };

        match (raw.kind.as_deref(), name) {
            (Some("NON_NULL"), _) => TypeRef::NonNull(wrapped(raw.of_type)),
            (Some("LIST"), _) => TypeRef::List(wrapped(raw.of_type)),
            (Some("SCALAR"), Some(name)) => TypeRef::Scalar(name),
            (Some("ENUM"), Some(name)) => TypeRef::Enum(name),
            (Some("INPUT_OBJECT"), Some(name)) => TypeRef::InputObject(name),
            (Some("OBJECT" | "INTERFACE" | "UNION"), Some(name)) => TypeRef::Object(name),
            // Some servers omit `kind` on named types
            (None, Some(name)) => TypeRef::Scalar(name),
            _ => TypeRef::Truncated,
        }
    }
}

impl<'de> Deserialize<'de> for TypeRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        RawTypeRef::deserialize(deserializer).map(TypeRef::from)
    }
}

impl TypeRef {
    /// Outermost wrapper is NON_NULL
    pub fn is_non_null(&self) -> bool {
        matches!(self, TypeRef::NonNull(_))
    }
}

/// Unwrap NON_NULL and LIST wrappers down to the named leaf.
///
/// Yields `LeafKind::Unresolved` with an empty name when the chain ends
/// without a named type.
pub fn resolve_leaf(type_ref: &TypeRef) -> Leaf<'_> {
    match type_ref {
        TypeRef::NonNull(inner) | TypeRef::List(inner) => resolve_leaf(inner),
        TypeRef::Scalar(name) => Leaf { kind: LeafKind::Scalar, name },
        TypeRef::Enum(name) => Leaf { kind: LeafKind::Enum, name },
        TypeRef::InputObject(name) => Leaf { kind: LeafKind::InputObject, name },
        TypeRef::Object(name) => Leaf { kind: LeafKind::Object, name },
        TypeRef::Truncated => Leaf { kind: LeafKind::Unresolved, name: "" },
    }
}
