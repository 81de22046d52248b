// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! GraphQL Introspection
//! Discovers the mutation catalog and resolves input object fields on demand

use crate::credentials::CredentialSet;
use crate::errors::ProbeResult;
use crate::http_client::RequestExecutor;
use crate::type_ref::TypeRef;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Mutation catalog query - argument types unwrapped four levels deep
const MUTATION_INTROSPECTION_QUERY: &str = r#"query IntrospectMutations {
  __schema {
    mutationType {
      fields {
        name
        args {
          name
          type {
            name
            kind
            ofType { name kind ofType { name kind ofType { name kind ofType { name kind } } } }
          }
        }
      }
    }
  }
}"#;

/// Input object query, parameterized by type name
const INPUT_TYPE_INTROSPECTION_QUERY: &str = r#"query IntrospectInputType($typeName: String!) {
  __type(name: $typeName) {
    name
    inputFields {
      name
      type {
        kind
        name
        ofType { kind name ofType { kind name ofType { kind name } } }
      }
    }
  }
}"#;

/// Argument of a mutation field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Argument {
    pub name: String,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
}

/// One mutation exposed by the schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationField {
    pub name: String,
    #[serde(default)]
    pub args: Vec<Argument>,
}

/// Field of an input object type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputField {
    pub name: String,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
}

#[derive(Debug, Deserialize)]
struct GraphQLEnvelope<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct SchemaData {
    #[serde(rename = "__schema")]
    schema: Option<SchemaRoot>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SchemaRoot {
    mutation_type: Option<MutationType>,
}

#[derive(Debug, Deserialize)]
struct MutationType {
    #[serde(default)]
    fields: Vec<MutationField>,
}

#[derive(Debug, Deserialize)]
struct TypeData {
    #[serde(rename = "__type")]
    type_def: Option<InputTypeDef>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InputTypeDef {
    #[serde(default)]
    input_fields: Option<Vec<InputField>>,
}

/// GraphQL introspection client
#[derive(Clone)]
pub struct SchemaIntrospector {
    executor: Arc<dyn RequestExecutor>,
}

impl SchemaIntrospector {
    pub fn new(executor: Arc<dyn RequestExecutor>) -> Self {
        Self { executor }
    }

    /// Fetch every mutation field with its arguments.
    ///
    /// Transport errors are returned to the caller. An unparseable or empty
    /// response is logged as a warning and yields no mutations.
    pub async fn fetch_mutations(
        &self,
        endpoint: &str,
        credentials: &CredentialSet,
    ) -> ProbeResult<Vec<MutationField>> {
        info!("[Introspection] Fetching mutation catalog from {}", endpoint);

        let query_body = serde_json::json!({
            "operationName": "IntrospectMutations",
            "query": MUTATION_INTROSPECTION_QUERY,
        });

        let response = self
            .executor
            .send(endpoint, credentials, query_body.to_string().as_bytes())
            .await?;

        let mutations = parse_mutation_catalog(&response.body);
        if mutations.is_empty() {
            warn!(
                "[Introspection] No mutations discovered at {} (HTTP {})",
                endpoint, response.status_code
            );
        } else {
            info!(
                "[Introspection] Discovered {} mutations",
                mutations.len()
            );
        }

        Ok(mutations)
    }

    /// Fetch the fields of a named input object type.
    ///
    /// Never fails: any error degrades to an empty field list.
    pub async fn fetch_input_fields(
        &self,
        type_name: &str,
        endpoint: &str,
        credentials: &CredentialSet,
    ) -> Vec<InputField> {
        debug!("[Introspection] Resolving input type {}", type_name);

        let query_body = serde_json::json!({
            "operationName": "IntrospectInputType",
            "query": INPUT_TYPE_INTROSPECTION_QUERY,
            "variables": { "typeName": type_name },
        });

        match self
            .executor
            .send(endpoint, credentials, query_body.to_string().as_bytes())
            .await
        {
            Ok(response) => {
                let fields = parse_input_fields(&response.body);
                if fields.is_empty() {
                    warn!(
                        "[Introspection] Input type {} resolved to no fields (HTTP {})",
                        type_name, response.status_code
                    );
                }
                fields
            }
            Err(e) => {
                warn!("[Introspection] Error introspecting type {}: {}", type_name, e);
                Vec::new()
            }
        }
    }
}

/// Parse a mutation catalog response body
pub fn parse_mutation_catalog(body: &str) -> Vec<MutationField> {
    let envelope: GraphQLEnvelope<SchemaData> = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!("[Introspection] Schema response is not a GraphQL envelope: {}", e);
            return Vec::new();
        }
    };

    log_errors("schema", &envelope.errors);

    match envelope.data.and_then(|d| d.schema) {
        Some(SchemaRoot { mutation_type: Some(mutation_type) }) => mutation_type.fields,
        Some(SchemaRoot { mutation_type: None }) => {
            warn!("[Introspection] Schema declares no mutation type");
            Vec::new()
        }
        None => Vec::new(),
    }
}

/// Parse an input type response body
pub fn parse_input_fields(body: &str) -> Vec<InputField> {
    let envelope: GraphQLEnvelope<TypeData> = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!("[Introspection] Input type response is not a GraphQL envelope: {}", e);
            return Vec::new();
        }
    };

    log_errors("input type", &envelope.errors);

    envelope
        .data
        .and_then(|d| d.type_def)
        .and_then(|t| t.input_fields)
        .unwrap_or_default()
}

fn log_errors(what: &str, errors: &[serde_json::Value]) {
    for error in errors {
        let message = error
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("<no message>");
        warn!("[Introspection] Server rejected {} introspection: {}", what, message);
    }
}
