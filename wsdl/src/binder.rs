use tracing::debug;

use super::types::{Message, Part, SchemaTypes};

/// Maps a part's element reference to the complex type name it should be
/// bound to, or `None` when no lookup should be attempted.
pub type TypeNameStrategy = fn(&str) -> Option<String>;

/// `tns:Foo` becomes `Foo`. Unprefixed references are never looked up.
pub fn strip_prefix(reference: &str) -> Option<String> {
    let (_, local_name) = reference.split_once(':')?;
    Some(local_name.to_owned())
}

/// Like [`strip_prefix`] but upper-cases the first letter, for schemas whose
/// element names are lower camel case while their types are not.
pub fn capitalized(reference: &str) -> Option<String> {
    let local_name = strip_prefix(reference)?;
    let mut chars = local_name.chars();

    Some(match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => local_name,
    })
}

fn bind_part(part: Part, schemas: &[SchemaTypes], type_name: TypeNameStrategy) -> Part {
    if part.complex_type.is_some() {
        return part;
    }

    let name = match part.element.as_deref().and_then(type_name) {
        Some(name) => name,
        None => return part,
    };

    match schemas.iter().find_map(|schema| schema.get(&name)) {
        Some(complex_type) => Part {
            complex_type: Some(complex_type.fields.clone()),
            ..part
        },

        None => {
            debug!(
                "no complex type named {} for part {:?}",
                name,
                part.name.as_deref().unwrap_or_default()
            );
            part
        }
    }
}

/// Attaches complex type fields to every part whose element names a known
/// type. Schemas are consulted in order and the first match wins. Message and
/// part order is kept.
pub fn bind(
    messages: Vec<Message>,
    schemas: &[SchemaTypes],
    type_name: TypeNameStrategy,
) -> Vec<Message> {
    messages
        .into_iter()
        .map(|message| Message {
            parts: message
                .parts
                .into_iter()
                .map(|part| bind_part(part, schemas, type_name))
                .collect(),
            ..message
        })
        .collect()
}
