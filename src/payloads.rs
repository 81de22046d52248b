// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Mutation Payload Synthesis
 * Builds a minimal, syntactically valid mutation document for every
 * discovered mutation, filling arguments with fixed sentinel values
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use futures::future::{BoxFuture, FutureExt};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::credentials::CredentialSet;
use crate::graphql_introspection::{InputField, MutationField, SchemaIntrospector};
use crate::type_ref::{resolve_leaf, Leaf, LeafKind};

/// Sentinel for String, ID and unknown scalars
pub const SENTINEL_STRING: &str = "gqlmsTestValue";

/// Sentinel for enums. Not guaranteed to be a member of the enum.
pub const SENTINEL_ENUM: &str = "ENUM_VALUE";

/// Default bound on nested input object resolution
pub const DEFAULT_MAX_INPUT_DEPTH: usize = 8;

/// Wire-ready mutation request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationDocument {
    pub operation_name: String,
    pub query: String,
    pub variables: Map<String, Value>,
}

impl MutationDocument {
    /// JSON request body
    pub fn to_body(&self) -> Value {
        json!({
            "operationName": self.operation_name,
            "query": self.query,
            "variables": self.variables,
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_body().to_string().into_bytes()
    }
}

/// Dummy value for a scalar, enum or unresolved leaf
pub fn dummy_value(leaf: &Leaf<'_>) -> Value {
    match leaf.kind {
        LeafKind::Scalar => match leaf.name {
            "Int" => json!(0),
            "Float" => json!(0.0),
            "Boolean" => json!(false),
            // String, ID and custom scalars
            _ => json!(SENTINEL_STRING),
        },
        LeafKind::Enum => json!(SENTINEL_ENUM),
        LeafKind::InputObject => Value::Object(Map::new()),
        LeafKind::Object | LeafKind::Unresolved => json!(SENTINEL_STRING),
    }
}

/// Variable declaration, e.g. `$input: CreateUserInput!`
fn declaration(arg_name: &str, leaf: &Leaf<'_>, non_null: bool) -> String {
    format!("${}: {}{}", arg_name, leaf.name, if non_null { "!" } else { "" })
}

/// Assemble the final document text
pub fn render_document(name: &str, declarations: &[String], usages: &[String]) -> String {
    if declarations.is_empty() {
        return format!("mutation {} {{ {} {{ __typename }} }}", name, name);
    }

    format!(
        "mutation {}({}) {{ {}({}) {{ __typename }} }}",
        name,
        declarations.join(", "),
        name,
        usages.join(", ")
    )
}

/// Turns mutation fields into executable documents
pub struct PayloadSynthesizer {
    introspector: SchemaIntrospector,
    cache: Option<HashMap<String, Vec<InputField>>>,
    max_depth: usize,
}

impl PayloadSynthesizer {
    pub fn new(introspector: SchemaIntrospector) -> Self {
        Self {
            introspector,
            cache: None,
            max_depth: DEFAULT_MAX_INPUT_DEPTH,
        }
    }

    /// Reuse input type introspection across mutations within this run
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache = enabled.then(HashMap::new);
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }

    /// Build the document and variables for one mutation
    pub async fn synthesize(
        &mut self,
        mutation: &MutationField,
        endpoint: &str,
        credentials: &CredentialSet,
    ) -> MutationDocument {
        let mut variables = Map::new();
        let mut declarations = Vec::with_capacity(mutation.args.len());
        let mut usages = Vec::with_capacity(mutation.args.len());

        for arg in &mutation.args {
            let leaf = resolve_leaf(&arg.type_ref);
            if leaf.kind == LeafKind::Unresolved {
                warn!(
                    "[Synthesizer] {}.{} has no resolvable type name, declaration will be incomplete",
                    mutation.name, arg.name
                );
            }

            let value = match leaf.kind {
                LeafKind::InputObject => {
                    let mut path = Vec::new();
                    self.input_object_value(leaf.name.to_string(), endpoint, credentials, &mut path)
                        .await
                }
                _ => dummy_value(&leaf),
            };

            variables.insert(arg.name.clone(), value);
            declarations.push(declaration(&arg.name, &leaf, arg.type_ref.is_non_null()));
            usages.push(format!("{}: ${}", arg.name, arg.name));
        }

        let query = render_document(&mutation.name, &declarations, &usages);
        debug!("[Synthesizer] {}", query);

        MutationDocument {
            operation_name: mutation.name.clone(),
            query,
            variables,
        }
    }

    /// Object literal for a named input type, resolved recursively.
    ///
    /// `path` holds the input types currently being expanded. Revisiting one of
    /// them, or exceeding the depth bound, terminates with `{}`.
    fn input_object_value<'a>(
        &'a mut self,
        type_name: String,
        endpoint: &'a str,
        credentials: &'a CredentialSet,
        path: &'a mut Vec<String>,
    ) -> BoxFuture<'a, Value> {
        async move {
            if path.contains(&type_name) {
                debug!(
                    "[Synthesizer] Cycle through input type {} ({}), using empty object",
                    type_name,
                    path.join(" -> ")
                );
                return Value::Object(Map::new());
            }
            if path.len() >= self.max_depth {
                debug!(
                    "[Synthesizer] Input nesting deeper than {} at {}, using empty object",
                    self.max_depth, type_name
                );
                return Value::Object(Map::new());
            }

            let fields = self.input_fields(&type_name, endpoint, credentials).await;

            path.push(type_name);
            let mut object = Map::new();
            for field in &fields {
                let leaf = resolve_leaf(&field.type_ref);
                let value = match leaf.kind {
                    LeafKind::InputObject => {
                        self.input_object_value(leaf.name.to_string(), endpoint, credentials, path)
                            .await
                    }
                    _ => dummy_value(&leaf),
                };
                object.insert(field.name.clone(), value);
            }
            path.pop();

            Value::Object(object)
        }
        .boxed()
    }

    async fn input_fields(
        &mut self,
        type_name: &str,
        endpoint: &str,
        credentials: &CredentialSet,
    ) -> Vec<InputField> {
        if let Some(hit) = self.cache.as_ref().and_then(|cache| cache.get(type_name)) {
            return hit.clone();
        }

        let fields = self
            .introspector
            .fetch_input_fields(type_name, endpoint, credentials)
            .await;

        // Failed lookups are retried on the next mutation
        if let Some(cache) = self.cache.as_mut() {
            if !fields.is_empty() {
                cache.insert(type_name.to_string(), fields.clone());
            }
        }

        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ProbeResult;
    use crate::graphql_introspection::Argument;
    use crate::http_client::{HttpResponse, RequestExecutor};
    use crate::type_ref::TypeRef;
    use async_trait::async_trait;
    use std::collections::HashMap as StdHashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Answers input type introspection from a fixed table
    struct SchemaStub {
        input_types: StdHashMap<String, Value>,
        calls: AtomicUsize,
    }

    impl SchemaStub {
        fn new(types: Vec<(&str, Value)>) -> Arc<Self> {
            Arc::new(Self {
                input_types: types
                    .into_iter()
                    .map(|(name, fields)| (name.to_string(), fields))
                    .collect(),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl RequestExecutor for SchemaStub {
        async fn send(
            &self,
            _endpoint: &str,
            _credentials: &CredentialSet,
            payload: &[u8],
        ) -> ProbeResult<HttpResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let request: Value = serde_json::from_slice(payload).unwrap();
            let name = request["variables"]["typeName"].as_str().unwrap_or_default();
            let body = match self.input_types.get(name) {
                Some(fields) => json!({"data": {"__type": {"name": name, "inputFields": fields}}}),
                None => json!({"data": {"__type": null}}),
            };

            Ok(HttpResponse {
                status_code: 200,
                body: body.to_string(),
            })
        }
    }

    fn scalar(name: &str) -> TypeRef {
        TypeRef::Scalar(name.to_string())
    }

    fn non_null(inner: TypeRef) -> TypeRef {
        TypeRef::NonNull(Box::new(inner))
    }

    fn mutation(name: &str, args: Vec<(&str, TypeRef)>) -> MutationField {
        MutationField {
            name: name.to_string(),
            args: args
                .into_iter()
                .map(|(name, type_ref)| Argument { name: name.to_string(), type_ref })
                .collect(),
        }
    }

    fn synthesizer(stub: Arc<SchemaStub>) -> PayloadSynthesizer {
        PayloadSynthesizer::new(SchemaIntrospector::new(stub))
    }

    #[test]
    fn test_dummy_values_per_scalar() {
        let leaf = |kind, name| Leaf { kind, name };
        assert_eq!(dummy_value(&leaf(LeafKind::Scalar, "String")), json!(SENTINEL_STRING));
        assert_eq!(dummy_value(&leaf(LeafKind::Scalar, "ID")), json!(SENTINEL_STRING));
        assert_eq!(dummy_value(&leaf(LeafKind::Scalar, "Int")), json!(0));
        assert_eq!(dummy_value(&leaf(LeafKind::Scalar, "Float")), json!(0.0));
        assert_eq!(dummy_value(&leaf(LeafKind::Scalar, "Boolean")), json!(false));
        assert_eq!(dummy_value(&leaf(LeafKind::Scalar, "DateTime")), json!(SENTINEL_STRING));
        assert_eq!(dummy_value(&leaf(LeafKind::Enum, "Role")), json!(SENTINEL_ENUM));
        assert_eq!(dummy_value(&leaf(LeafKind::Unresolved, "")), json!(SENTINEL_STRING));
    }

    #[tokio::test]
    async fn test_scalar_arguments() {
        let mut synth = synthesizer(SchemaStub::new(vec![]));
        let field = mutation(
            "deleteUser",
            vec![("id", non_null(scalar("ID"))), ("force", scalar("Boolean"))],
        );

        let doc = synth.synthesize(&field, "http://t/graphql", &CredentialSet::new()).await;

        assert_eq!(doc.operation_name, "deleteUser");
        assert_eq!(
            doc.query,
            "mutation deleteUser($id: ID!, $force: Boolean) { deleteUser(id: $id, force: $force) { __typename } }"
        );
        assert_eq!(Value::Object(doc.variables), json!({"id": SENTINEL_STRING, "force": false}));
    }

    #[tokio::test]
    async fn test_input_object_argument_is_introspected() {
        let stub = SchemaStub::new(vec![(
            "CreateUserInput",
            json!([
                {"name": "email", "type": {"kind": "NON_NULL", "ofType": {"kind": "SCALAR", "name": "String"}}},
                {"name": "age", "type": {"kind": "SCALAR", "name": "Int"}},
                {"name": "address", "type": {"kind": "INPUT_OBJECT", "name": "AddressInput"}}
            ]),
        ), (
            "AddressInput",
            json!([{"name": "zip", "type": {"kind": "SCALAR", "name": "String"}}]),
        )]);
        let mut synth = synthesizer(stub);
        let field = mutation(
            "createUser",
            vec![("input", non_null(TypeRef::InputObject("CreateUserInput".to_string())))],
        );

        let doc = synth.synthesize(&field, "http://t/graphql", &CredentialSet::new()).await;

        assert!(doc.query.starts_with("mutation createUser($input: CreateUserInput!)"));
        assert_eq!(
            Value::Object(doc.variables),
            json!({"input": {"email": SENTINEL_STRING, "age": 0, "address": {"zip": SENTINEL_STRING}}})
        );
    }

    #[tokio::test]
    async fn test_self_referential_input_terminates() {
        let stub = SchemaStub::new(vec![(
            "FilterInput",
            json!([
                {"name": "name", "type": {"kind": "SCALAR", "name": "String"}},
                {"name": "and", "type": {"kind": "LIST", "ofType": {"kind": "NON_NULL", "ofType": {"kind": "INPUT_OBJECT", "name": "FilterInput"}}}}
            ]),
        )]);
        let mut synth = synthesizer(stub);
        let field = mutation(
            "purge",
            vec![("where", TypeRef::InputObject("FilterInput".to_string()))],
        );

        let doc = synth.synthesize(&field, "http://t/graphql", &CredentialSet::new()).await;

        assert_eq!(
            doc.variables["where"],
            json!({"name": SENTINEL_STRING, "and": {}})
        );
    }

    #[tokio::test]
    async fn test_depth_bound_terminates_long_chains() {
        let stub = SchemaStub::new(vec![
            ("A", json!([{"name": "b", "type": {"kind": "INPUT_OBJECT", "name": "B"}}])),
            ("B", json!([{"name": "c", "type": {"kind": "INPUT_OBJECT", "name": "C"}}])),
            ("C", json!([{"name": "x", "type": {"kind": "SCALAR", "name": "Int"}}])),
        ]);
        let mut synth = synthesizer(stub).with_max_depth(2);
        let field = mutation("m", vec![("a", TypeRef::InputObject("A".to_string()))]);

        let doc = synth.synthesize(&field, "http://t/graphql", &CredentialSet::new()).await;
        assert_eq!(doc.variables["a"], json!({"b": {"c": {}}}));
    }

    #[tokio::test]
    async fn test_unknown_input_type_degrades_to_empty_object() {
        let mut synth = synthesizer(SchemaStub::new(vec![]));
        let field = mutation(
            "upsert",
            vec![("input", non_null(TypeRef::InputObject("Missing".to_string())))],
        );

        let doc = synth.synthesize(&field, "http://t/graphql", &CredentialSet::new()).await;
        assert_eq!(doc.variables["input"], json!({}));
    }

    /// Refuses every connection
    struct Unreachable;

    #[async_trait]
    impl RequestExecutor for Unreachable {
        async fn send(
            &self,
            endpoint: &str,
            _credentials: &CredentialSet,
            _payload: &[u8],
        ) -> ProbeResult<HttpResponse> {
            Err(crate::errors::NetworkError::ConnectionRefused {
                url: endpoint.to_string(),
            }
            .into())
        }
    }

    #[tokio::test]
    async fn test_input_type_transport_error_degrades_to_empty_object() {
        let mut synth = PayloadSynthesizer::new(SchemaIntrospector::new(Arc::new(Unreachable)));
        let field = mutation(
            "createUser",
            vec![
                ("input", non_null(TypeRef::InputObject("CreateUserInput".to_string()))),
                ("notify", scalar("Boolean")),
            ],
        );

        let doc = synth.synthesize(&field, "http://t/graphql", &CredentialSet::new()).await;

        assert_eq!(Value::Object(doc.variables), json!({"input": {}, "notify": false}));
        assert!(doc.query.starts_with("mutation createUser($input: CreateUserInput!, $notify: Boolean)"));
    }

    #[tokio::test]
    async fn test_cache_avoids_repeat_introspection() {
        let stub = SchemaStub::new(vec![(
            "UserInput",
            json!([{"name": "email", "type": {"kind": "SCALAR", "name": "String"}}]),
        )]);
        let mut synth = synthesizer(stub.clone()).with_cache(true);
        let a = mutation("createUser", vec![("input", TypeRef::InputObject("UserInput".to_string()))]);
        let b = mutation("updateUser", vec![("input", TypeRef::InputObject("UserInput".to_string()))]);

        let first = synth.synthesize(&a, "http://t/graphql", &CredentialSet::new()).await;
        let second = synth.synthesize(&b, "http://t/graphql", &CredentialSet::new()).await;

        assert_eq!(first.variables, second.variables);
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_synthesis_is_deterministic() {
        let stub = SchemaStub::new(vec![(
            "UserInput",
            json!([
                {"name": "zeta", "type": {"kind": "SCALAR", "name": "Float"}},
                {"name": "alpha", "type": {"kind": "ENUM", "name": "Role"}}
            ]),
        )]);
        let mut synth = synthesizer(stub);
        let field = mutation(
            "createUser",
            vec![("input", TypeRef::InputObject("UserInput".to_string())), ("dryRun", scalar("Boolean"))],
        );

        let first = synth.synthesize(&field, "http://t/graphql", &CredentialSet::new()).await;
        let second = synth.synthesize(&field, "http://t/graphql", &CredentialSet::new()).await;
        assert_eq!(first.to_bytes(), second.to_bytes());
    }

    #[tokio::test]
    async fn test_declarations_match_usages() {
        let mut synth = synthesizer(SchemaStub::new(vec![]));
        let field = mutation(
            "transfer",
            vec![
                ("from", non_null(scalar("ID"))),
                ("to", non_null(scalar("ID"))),
                ("amount", scalar("Float")),
                ("tags", TypeRef::List(Box::new(scalar("String")))),
            ],
        );

        let doc = synth.synthesize(&field, "http://t/graphql", &CredentialSet::new()).await;

        // "mutation transfer(<declarations>) { transfer(<usages>) { __typename } }"
        let sections: Vec<&str> = doc.query.split(['(', ')']).collect();
        let declared: Vec<&str> = sections[1]
            .split(", ")
            .filter_map(|decl| decl.strip_prefix('$')?.split(':').next())
            .collect();
        let used: Vec<&str> = sections[3]
            .split(", ")
            .filter_map(|usage| usage.split(": $").next())
            .collect();

        assert_eq!(declared, vec!["from", "to", "amount", "tags"]);
        assert_eq!(declared, used);

        let mut variables: Vec<&str> = doc.variables.keys().map(String::as_str).collect();
        let mut declared_sorted = declared.clone();
        variables.sort_unstable();
        declared_sorted.sort_unstable();
        assert_eq!(declared_sorted, variables);
    }

    #[tokio::test]
    async fn test_mutation_without_arguments() {
        let mut synth = synthesizer(SchemaStub::new(vec![]));
        let doc = synth
            .synthesize(&mutation("logout", vec![]), "http://t/graphql", &CredentialSet::new())
            .await;

        assert_eq!(doc.query, "mutation logout { logout { __typename } }");
        assert!(doc.variables.is_empty());
        assert_eq!(doc.to_body()["operationName"], json!("logout"));
    }
}
