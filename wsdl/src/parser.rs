use tracing::{debug, warn};

use super::{
    namespaces::Namespace,
    tree::Element,
    types::{Binding, Definition, Message, Operation, Part, Port, Service, UNNAMED_SERVICE},
};

fn attribute(element: &Element, name: &str) -> Option<String> {
    let value = element.attribute(name).map(ToOwned::to_owned);
    if value.is_none() {
        debug!("<{}> has no {} attribute", element.name, name);
    }
    value
}

fn parse_message(message: &Element) -> Message {
    Message {
        name: attribute(message, "name"),
        parts: message
            .children(&Namespace::Wsdl, "part")
            .map(|part| Part {
                name: attribute(part, "name"),
                element: part.attribute("element").map(ToOwned::to_owned),
                complex_type: None,
            })
            .collect(),
    }
}

fn parse_operation(operation: &Element) -> Operation {
    let message = |name: &str| {
        operation
            .child(&Namespace::Wsdl, name)
            .and_then(|child| attribute(child, "message"))
    };

    Operation {
        name: attribute(operation, "name"),
        input: message("input"),
        output: message("output"),
        fault: message("fault"),
    }
}

fn parse_binding(binding: &Element) -> Binding {
    let transport = binding
        .child(&Namespace::Soap, "binding")
        .or_else(|| binding.child(&Namespace::Soap12, "binding"))
        .and_then(|soap| soap.attribute("transport"))
        .map(ToOwned::to_owned);

    Binding {
        name: attribute(binding, "name"),
        ty: attribute(binding, "type"),
        transport,
    }
}

fn parse_port(port: &Element) -> Port {
    let address = port
        .child(&Namespace::Soap, "address")
        .or_else(|| port.child(&Namespace::Soap12, "address"))
        .and_then(|address| attribute(address, "location"));

    Port {
        name: attribute(port, "name"),
        binding: attribute(port, "binding"),
        address,
    }
}

fn parse_service(service: &Element) -> Service {
    Service {
        name: attribute(service, "name"),
        ports: service
            .children(&Namespace::Wsdl, "port")
            .map(parse_port)
            .collect(),
    }
}

fn warn_duplicate_messages(messages: &[Message]) {
    for (index, message) in messages.iter().enumerate() {
        if let Some(name) = &message.name {
            let seen = messages[..index]
                .iter()
                .any(|earlier| earlier.name.as_ref() == Some(name));
            if seen {
                warn!("message {} is defined more than once", name);
            }
        }
    }
}

/// Reads the service description out of a WSDL root element. Missing
/// attributes become `None` and nothing here fails.
pub fn parse(root: &Element) -> Definition {
    let schema = root.descendant(&Namespace::Schema, "schema");

    let target_namespace = schema.and_then(|schema| attribute(schema, "targetNamespace"));
    let schema_location = schema
        .and_then(|schema| schema.child(&Namespace::Schema, "include"))
        .and_then(|include| attribute(include, "schemaLocation"));

    let messages = root
        .children(&Namespace::Wsdl, "message")
        .map(parse_message)
        .collect::<Vec<_>>();
    warn_duplicate_messages(&messages);

    let operations = root
        .descendants(&Namespace::Wsdl, "portType")
        .into_iter()
        .flat_map(|port_type| port_type.children(&Namespace::Wsdl, "operation"))
        .map(parse_operation)
        .collect();

    let bindings = root
        .descendants(&Namespace::Wsdl, "binding")
        .into_iter()
        .map(parse_binding)
        .collect::<Vec<_>>();
    if bindings.len() > 1 {
        warn!(
            "{} bindings defined, {:?} is reported as the binding",
            bindings.len(),
            bindings[0].name.as_deref().unwrap_or_default()
        );
    }

    let services = root
        .children(&Namespace::Wsdl, "service")
        .map(parse_service)
        .collect();

    Definition {
        service_name: root
            .attribute("name")
            .unwrap_or(UNNAMED_SERVICE)
            .to_owned(),
        target_namespace,
        schema_location,
        messages,
        operations,
        bindings,
        services,
    }
}
