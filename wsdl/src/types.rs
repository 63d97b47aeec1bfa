use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const UNNAMED_SERVICE: &str = "UnnamedService";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub ty: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexType {
    pub name: String,
    pub fields: Vec<Field>,
}

/// Complex types of one schema document, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct SchemaTypes {
    types: HashMap<String, ComplexType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub name: Option<String>,
    pub element: Option<String>,
    #[serde(
        rename = "complexType",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub complex_type: Option<Vec<Field>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub name: Option<String>,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub name: Option<String>,
    pub input: Option<String>,
    pub output: Option<String>,
    pub fault: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub ty: Option<String>,
    pub transport: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    pub name: Option<String>,
    pub binding: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub name: Option<String>,
    pub ports: Vec<Port>,
}

/// Everything read from the WSDL document itself, before any schema is
/// consulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub service_name: String,
    pub target_namespace: Option<String>,
    pub schema_location: Option<String>,
    pub messages: Vec<Message>,
    pub operations: Vec<Operation>,
    pub bindings: Vec<Binding>,
    pub services: Vec<Service>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub service_name: String,
    pub target_namespace: Option<String>,
    pub schema_location: Option<String>,
    pub messages: Vec<Message>,
    pub operations: Vec<Operation>,
    pub binding: Option<String>,
    pub bindings: Vec<Binding>,
    pub services: Vec<Service>,
    pub imported_elements: Vec<String>,
    /// Names of every complex type found, per schema in the order schemas
    /// were read. Not part of the serialized record.
    #[serde(skip)]
    pub complex_types: Vec<String>,
}

impl Default for Definition {
    fn default() -> Self {
        Self {
            service_name: UNNAMED_SERVICE.to_owned(),
            target_namespace: None,
            schema_location: None,
            messages: Vec::new(),
            operations: Vec::new(),
            bindings: Vec::new(),
            services: Vec::new(),
        }
    }
}

impl SchemaTypes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a type, returning the one it replaced if the name was taken.
    pub fn insert(&mut self, complex_type: ComplexType) -> Option<ComplexType> {
        self.types.insert(complex_type.name.clone(), complex_type)
    }

    pub fn get(&self, name: &str) -> Option<&ComplexType> {
        self.types.get(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Type names in alphabetical order.
    pub fn names(&self) -> Vec<&str> {
        let mut names = self.types.keys().map(String::as_str).collect::<Vec<_>>();
        names.sort_unstable();
        names
    }
}

impl FromIterator<ComplexType> for SchemaTypes {
    fn from_iter<I: IntoIterator<Item = ComplexType>>(iter: I) -> Self {
        let mut types = Self::new();
        for complex_type in iter {
            types.insert(complex_type);
        }
        types
    }
}

impl Message {
    /// Parts that were given a complex type by the binder.
    pub fn bound_parts(&self) -> impl Iterator<Item = &Part> {
        self.parts.iter().filter(|part| part.complex_type.is_some())
    }
}

impl AnalysisRecord {
    /// Looks up a message by a possibly prefixed reference such as
    /// `tns:AddRequest`. Duplicate names resolve to the first message.
    pub fn message(&self, reference: &str) -> Option<&Message> {
        let name = reference.rsplit(':').next().unwrap_or(reference);
        self.messages
            .iter()
            .find(|message| message.name.as_deref() == Some(name))
    }

    /// Names of messages that are also the name of a complex type, in message
    /// order.
    pub fn matching_names(&self) -> Vec<&str> {
        self.messages
            .iter()
            .filter_map(|message| message.name.as_deref())
            .filter(|name| self.complex_types.iter().any(|ty| ty == name))
            .collect()
    }

    /// Messages used as an operation fault, or named like an exception.
    pub fn fault_messages(&self) -> Vec<&Message> {
        let faults = self
            .operations
            .iter()
            .filter_map(|operation| operation.fault.as_deref())
            .filter_map(|reference| self.message(reference))
            .collect::<Vec<_>>();

        self.messages
            .iter()
            .filter(|message| {
                faults.iter().any(|fault| std::ptr::eq(*fault, *message))
                    || message
                        .name
                        .as_deref()
                        .map_or(false, |name| name.contains("Exception"))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(name: &str) -> Message {
        Message {
            name: Some(name.to_owned()),
            parts: Vec::new(),
        }
    }

    fn record() -> AnalysisRecord {
        AnalysisRecord {
            service_name: "Calc".into(),
            target_namespace: None,
            schema_location: None,
            messages: vec![
                message("AddRequest"),
                message("DivideFault"),
                message("ServiceException"),
            ],
            operations: vec![Operation {
                name: Some("Divide".into()),
                input: Some("tns:AddRequest".into()),
                output: None,
                fault: Some("tns:DivideFault".into()),
            }],
            binding: None,
            bindings: Vec::new(),
            services: Vec::new(),
            imported_elements: Vec::new(),
            complex_types: vec!["AddRequest".into(), "Add".into()],
        }
    }

    #[test]
    fn message_lookup_strips_prefix() {
        let record = record();

        assert_eq!(
            record.message("tns:AddRequest").and_then(|m| m.name.as_deref()),
            Some("AddRequest")
        );
        assert!(record.message("Missing").is_none());
    }

    #[test]
    fn matching_names_are_messages_named_like_types() {
        assert_eq!(record().matching_names(), ["AddRequest"]);
    }

    #[test]
    fn schema_type_names_are_sorted() {
        let types = ["Zone", "Address", "Money"]
            .iter()
            .map(|name| ComplexType {
                name: (*name).to_owned(),
                fields: Vec::new(),
            })
            .collect::<SchemaTypes>();

        assert_eq!(types.names(), ["Address", "Money", "Zone"]);
    }

    #[test]
    fn complex_type_names_are_not_serialized() {
        let json = serde_json::to_value(&record()).unwrap();

        assert!(json.get("complex_types").is_none());
    }

    #[test]
    fn fault_messages_include_referenced_and_exception_named() {
        let record = record();
        let names = record
            .fault_messages()
            .into_iter()
            .filter_map(|message| message.name.as_deref())
            .collect::<Vec<_>>();

        assert_eq!(names, ["DivideFault", "ServiceException"]);
    }

    #[test]
    fn schema_types_replace_on_duplicate_name() {
        let mut types = SchemaTypes::new();
        assert!(types.is_empty());
        types.insert(ComplexType {
            name: "A".into(),
            fields: Vec::new(),
        });
        let replaced = types.insert(ComplexType {
            name: "A".into(),
            fields: vec![Field {
                name: Some("x".into()),
                ty: None,
            }],
        });

        assert!(replaced.is_some());
        assert_eq!(types.len(), 1);
        assert_eq!(types.get("A").map(|t| t.fields.len()), Some(1));
    }

    #[test]
    fn unbound_part_omits_complex_type_key() {
        let part = Part {
            name: Some("parameters".into()),
            element: Some("tns:Add".into()),
            complex_type: None,
        };
        let json = serde_json::to_value(&part).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"name": "parameters", "element": "tns:Add"})
        );
    }
}
