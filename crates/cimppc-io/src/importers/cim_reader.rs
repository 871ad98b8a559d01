//! Namespace-aware reader for CIM RDF/XML documents.
//!
//! Collects the direct children of the document root that live in the CIM
//! namespace, in document order, together with their own direct CIM
//! children ("properties"). Anything nested deeper is ignored, as is every
//! element outside the CIM namespace.

use std::{fs, path::Path};

use cimppc_core::{ConversionError, ConversionResult};
use quick_xml::{
    events::{BytesStart, Event},
    name::{Namespace, ResolveResult},
    NsReader,
};
use tracing::debug;

/// CIM 17 schema namespace.
pub const CIM_NS: &str = "http://iec.ch/TC57/2016/CIM-schema-cim17#";
/// RDF syntax namespace (`rdf:ID`, `rdf:resource`).
pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

/// A property child such as `<cim:IdentifiedObject.name>` or
/// `<cim:Equipment.EquipmentContainer rdf:resource="#..."/>`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CimProperty {
    pub name: String,
    pub text: Option<String>,
    pub resource: Option<String>,
}

/// A top-level CIM object.
#[derive(Debug, Clone, PartialEq)]
pub struct CimElement {
    pub class: String,
    pub id: Option<String>,
    pub properties: Vec<CimProperty>,
}

impl CimElement {
    /// `Class 'id'`, used to attribute errors and diagnostics.
    pub fn label(&self) -> String {
        format!("{} '{}'", self.class, self.id.as_deref().unwrap_or("?"))
    }

    /// The element's `rdf:ID`.
    pub fn id(&self) -> ConversionResult<&str> {
        self.id.as_deref().ok_or_else(|| self.missing("rdf:ID"))
    }

    /// First property with the given name.
    pub fn property(&self, name: &str) -> Option<&CimProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Text of a required property; an empty element yields `""`.
    pub fn text(&self, field: &str) -> ConversionResult<&str> {
        self.property(field)
            .map(|p| p.text.as_deref().unwrap_or(""))
            .ok_or_else(|| self.missing(field))
    }

    /// Required property parsed as a float.
    pub fn number(&self, field: &str) -> ConversionResult<f64> {
        let raw = self
            .property(field)
            .ok_or_else(|| self.missing(field))?
            .text
            .as_deref()
            .ok_or_else(|| self.missing(field))?;
        raw.trim()
            .parse::<f64>()
            .map_err(|_| ConversionError::InvalidNumber {
                element: self.label(),
                field: field.to_string(),
                value: raw.to_string(),
            })
    }

    /// Target identifier of a required reference property.
    ///
    /// `rdf:resource="#_abc"` and `rdf:resource="urn:x#_abc"` both yield `_abc`.
    pub fn resource(&self, field: &str) -> ConversionResult<&str> {
        let resource = self
            .property(field)
            .ok_or_else(|| self.missing(field))?
            .resource
            .as_deref()
            .ok_or_else(|| self.missing(&format!("{field}/@rdf:resource")))?;
        Ok(resource.rsplit('#').next().unwrap_or(resource))
    }

    fn missing(&self, field: &str) -> ConversionError {
        ConversionError::MissingField {
            element: self.label(),
            field: field.to_string(),
        }
    }
}

/// A parsed CIM document.
#[derive(Debug, Clone, Default)]
pub struct CimDocument {
    pub root: String,
    pub elements: Vec<CimElement>,
}

impl CimDocument {
    pub fn from_path(path: impl AsRef<Path>) -> ConversionResult<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        Self::parse(&text)
    }

    pub fn parse(xml: &str) -> ConversionResult<Self> {
        let mut reader = NsReader::from_str(xml);
        reader.trim_text(true);

        let mut builder = DocumentBuilder::default();
        let mut depth = 0usize;

        loop {
            let (ns, event) = reader.read_resolved_event().map_err(xml_error)?;
            let in_cim = is_namespace(&ns, CIM_NS);
            match event {
                Event::Start(ref e) => {
                    depth += 1;
                    builder.open(&reader, e, depth, in_cim)?;
                }
                Event::Empty(ref e) => {
                    builder.open(&reader, e, depth + 1, in_cim)?;
                    builder.close(depth + 1);
                }
                Event::Text(e) => {
                    if depth == 3 {
                        let text = e.unescape().map_err(xml_error)?;
                        builder.text(text.trim());
                    }
                }
                Event::CData(e) => {
                    if depth == 3 {
                        let raw = e.into_inner();
                        let text = std::str::from_utf8(&raw).map_err(xml_error)?;
                        builder.text(text.trim());
                    }
                }
                Event::End(_) => {
                    builder.close(depth);
                    depth = depth.saturating_sub(1);
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(builder.finish())
    }

    /// Elements of one CIM class, in document order.
    pub fn elements_of<'a>(&'a self, class: &'a str) -> impl Iterator<Item = &'a CimElement> {
        self.elements.iter().filter(move |e| e.class == class)
    }
}

#[derive(Default)]
struct DocumentBuilder {
    root: Option<String>,
    elements: Vec<CimElement>,
    current: Option<CimElement>,
    property: Option<CimProperty>,
}

impl DocumentBuilder {
    fn open(
        &mut self,
        reader: &NsReader<&[u8]>,
        start: &BytesStart<'_>,
        depth: usize,
        in_cim: bool,
    ) -> ConversionResult<()> {
        let name = local_name(start);
        match depth {
            1 => {
                let attrs = attributes_summary(start);
                debug!("Root tag: {}, Attributes: {:?}", name, attrs);
                self.root = Some(name);
            }
            2 if in_cim => {
                self.current = Some(CimElement {
                    class: name,
                    id: rdf_attribute(reader, start, "ID")?,
                    properties: Vec::new(),
                });
            }
            3 if in_cim && self.current.is_some() => {
                self.property = Some(CimProperty {
                    name,
                    text: None,
                    resource: rdf_attribute(reader, start, "resource")?,
                });
            }
            _ => {}
        }
        Ok(())
    }

    fn text(&mut self, text: &str) {
        if let Some(property) = self.property.as_mut() {
            if property.text.is_none() {
                property.text = Some(text.to_string());
            }
        }
    }

    fn close(&mut self, depth: usize) {
        match depth {
            2 => {
                if let Some(element) = self.current.take() {
                    self.elements.push(element);
                }
            }
            3 => {
                if let (Some(property), Some(element)) =
                    (self.property.take(), self.current.as_mut())
                {
                    element.properties.push(property);
                }
            }
            _ => {}
        }
    }

    fn finish(self) -> CimDocument {
        CimDocument {
            root: self.root.unwrap_or_default(),
            elements: self.elements,
        }
    }
}

fn is_namespace(ns: &ResolveResult<'_>, expected: &str) -> bool {
    matches!(ns, ResolveResult::Bound(Namespace(uri)) if *uri == expected.as_bytes())
}

fn rdf_attribute(
    reader: &NsReader<&[u8]>,
    start: &BytesStart<'_>,
    key: &str,
) -> ConversionResult<Option<String>> {
    for attr in start.attributes().with_checks(false) {
        let attr = attr.map_err(xml_error)?;
        let (ns, local) = reader.resolve_attribute(attr.key);
        if is_namespace(&ns, RDF_NS) && local.as_ref() == key.as_bytes() {
            let value = attr.unescape_value().map_err(xml_error)?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn attributes_summary(start: &BytesStart<'_>) -> Vec<(String, String)> {
    start
        .attributes()
        .with_checks(false)
        .filter_map(Result::ok)
        .map(|attr| {
            (
                String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
                String::from_utf8_lossy(&attr.value).into_owned(),
            )
        })
        .collect()
}

fn local_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.local_name().as_ref()).into_owned()
}

fn xml_error(err: impl std::fmt::Display) -> ConversionError {
    ConversionError::Xml(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:cim="http://iec.ch/TC57/2016/CIM-schema-cim17#"
         xmlns:other="http://example.com/other#">
  <cim:BaseVoltage rdf:ID="bv1">
    <cim:BaseVoltage.nominalVoltage> 11.0 </cim:BaseVoltage.nominalVoltage>
  </cim:BaseVoltage>
  <cim:TopologicalNode rdf:ID="tn1">
    <cim:IdentifiedObject.name>N1 &amp; co</cim:IdentifiedObject.name>
    <cim:TopologicalNode.BaseVoltage rdf:resource="#bv1"/>
    <cim:Nested><cim:Deeper>ignored</cim:Deeper></cim:Nested>
  </cim:TopologicalNode>
  <other:TopologicalNode rdf:ID="foreign"/>
  <cim:Disconnector rdf:ID="sw1"/>
</rdf:RDF>"##;

    #[test]
    fn test_collects_cim_children_in_order() {
        let doc = CimDocument::parse(DOC).unwrap();
        assert_eq!(doc.root, "RDF");
        let classes: Vec<&str> = doc.elements.iter().map(|e| e.class.as_str()).collect();
        assert_eq!(classes, vec!["BaseVoltage", "TopologicalNode", "Disconnector"]);
        assert_eq!(doc.elements_of("TopologicalNode").count(), 1);
    }

    #[test]
    fn test_property_accessors() {
        let doc = CimDocument::parse(DOC).unwrap();
        let bv = doc.elements_of("BaseVoltage").next().unwrap();
        assert_eq!(bv.id().unwrap(), "bv1");
        assert_eq!(bv.number("BaseVoltage.nominalVoltage").unwrap(), 11.0);

        let tn = doc.elements_of("TopologicalNode").next().unwrap();
        assert_eq!(tn.text("IdentifiedObject.name").unwrap(), "N1 & co");
        assert_eq!(tn.resource("TopologicalNode.BaseVoltage").unwrap(), "bv1");
        assert_eq!(tn.label(), "TopologicalNode 'tn1'");
        assert!(tn.property("Deeper").is_none());
    }

    #[test]
    fn test_empty_element_has_no_properties() {
        let doc = CimDocument::parse(DOC).unwrap();
        let sw = doc.elements_of("Disconnector").next().unwrap();
        assert!(sw.properties.is_empty());
        let err = sw.text("IdentifiedObject.name").unwrap_err();
        assert!(matches!(err, ConversionError::MissingField { .. }));
        assert_eq!(err.element(), Some("Disconnector 'sw1'"));
    }

    #[test]
    fn test_resource_takes_fragment_after_last_hash() {
        let element = CimElement {
            class: "EnergyConsumer".into(),
            id: Some("ec1".into()),
            properties: vec![CimProperty {
                name: "Equipment.EquipmentContainer".into(),
                text: None,
                resource: Some("urn:model#sub#vl1".into()),
            }],
        };
        assert_eq!(element.resource("Equipment.EquipmentContainer").unwrap(), "vl1");
    }

    #[test]
    fn test_reference_without_resource_is_missing_field() {
        let element = CimElement {
            class: "Disconnector".into(),
            id: Some("sw1".into()),
            properties: vec![CimProperty {
                name: "ConductingEquipment.BaseVoltage".into(),
                text: Some("bv1".into()),
                resource: None,
            }],
        };
        match element.resource("ConductingEquipment.BaseVoltage") {
            Err(ConversionError::MissingField { field, .. }) => {
                assert_eq!(field, "ConductingEquipment.BaseVoltage/@rdf:resource")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_number_keeps_raw_text() {
        let element = CimElement {
            class: "EnergyConsumer".into(),
            id: Some("ec1".into()),
            properties: vec![CimProperty {
                name: "EnergyConsumer.pfixed".into(),
                text: Some("lots".into()),
                resource: None,
            }],
        };
        match element.number("EnergyConsumer.pfixed") {
            Err(ConversionError::InvalidNumber { value, .. }) => assert_eq!(value, "lots"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_missing_rdf_id() {
        let doc = CimDocument::parse(
            r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
                        xmlns:cim="http://iec.ch/TC57/2016/CIM-schema-cim17#">
                 <cim:ConnectivityNode ID="plain"/>
               </rdf:RDF>"#,
        )
        .unwrap();
        let node = &doc.elements[0];
        assert!(node.id.is_none());
        assert!(matches!(node.id(), Err(ConversionError::MissingField { .. })));
    }

    #[test]
    fn test_cdata_content_is_read_as_text() {
        let doc = CimDocument::parse(
            r##"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
                        xmlns:cim="http://iec.ch/TC57/2016/CIM-schema-cim17#">
                 <cim:BaseVoltage rdf:ID="bv1">
                   <cim:BaseVoltage.nominalVoltage><![CDATA[ 11.0 ]]></cim:BaseVoltage.nominalVoltage>
                 </cim:BaseVoltage>
                 <cim:TopologicalNode rdf:ID="tn1">
                   <cim:IdentifiedObject.name><![CDATA[N1 <main>]]></cim:IdentifiedObject.name>
                   <cim:TopologicalNode.BaseVoltage rdf:resource="#bv1"/>
                 </cim:TopologicalNode>
               </rdf:RDF>"##,
        )
        .unwrap();
        let bv = doc.elements_of("BaseVoltage").next().unwrap();
        assert_eq!(bv.number("BaseVoltage.nominalVoltage").unwrap(), 11.0);
        let tn = doc.elements_of("TopologicalNode").next().unwrap();
        assert_eq!(tn.text("IdentifiedObject.name").unwrap(), "N1 <main>");
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        let err = CimDocument::parse("<rdf:RDF><cim:BaseVoltage></rdf:RDF>").unwrap_err();
        assert!(matches!(err, ConversionError::Xml(_)));
    }
}
