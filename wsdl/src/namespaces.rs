/// Namespace of a loaded element, classified against a [`Namespaces`] value
/// at load time so lookups never compare raw URIs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Namespace {
    Wsdl,
    Soap,
    Soap12,
    Schema,
    Other(String),
    None,
}

/// The fixed namespace URIs a WSDL document is read against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Namespaces {
    pub wsdl: &'static str,
    pub soap: &'static str,
    pub soap12: &'static str,
    pub schema: &'static str,
}

impl Namespaces {
    pub const STANDARD: Namespaces = Namespaces {
        wsdl: "http://schemas.xmlsoap.org/wsdl/",
        soap: "http://schemas.xmlsoap.org/wsdl/soap/",
        soap12: "http://schemas.xmlsoap.org/wsdl/soap12/",
        schema: "http://www.w3.org/2001/XMLSchema",
    };

    pub fn classify(&self, uri: Option<&str>) -> Namespace {
        match uri {
            None => Namespace::None,
            Some(uri) if uri == self.wsdl => Namespace::Wsdl,
            Some(uri) if uri == self.soap => Namespace::Soap,
            Some(uri) if uri == self.soap12 => Namespace::Soap12,
            Some(uri) if uri == self.schema => Namespace::Schema,
            Some(uri) => Namespace::Other(uri.to_owned()),
        }
    }

    pub fn uri<'a>(&self, namespace: &'a Namespace) -> Option<&'a str> {
        match namespace {
            Namespace::Wsdl => Some(self.wsdl),
            Namespace::Soap => Some(self.soap),
            Namespace::Soap12 => Some(self.soap12),
            Namespace::Schema => Some(self.schema),
            Namespace::Other(uri) => Some(uri),
            Namespace::None => None,
        }
    }
}

impl Default for Namespaces {
    fn default() -> Self {
        Self::STANDARD
    }
}
