use std::{collections::HashMap, path::Path};

use cimppc_core::{
    BranchRow, BusRow, ConversionError, ConversionResult, IdRemapper, ImportDiagnostics, PpcCase,
};
use tracing::{debug, info, warn};

use super::cim_reader::{CimDocument, CimElement};
use crate::options::{ConvertOptions, DemandPolicy};

const BASE_VOLTAGE: &str = "BaseVoltage";
const CONNECTIVITY_NODE: &str = "ConnectivityNode";
const ENERGY_CONSUMER: &str = "EnergyConsumer";
const DISCONNECTOR: &str = "Disconnector";
const TOPOLOGICAL_NODE: &str = "TopologicalNode";

const NAME: &str = "IdentifiedObject.name";
const NOMINAL_VOLTAGE: &str = "BaseVoltage.nominalVoltage";
const PFIXED: &str = "EnergyConsumer.pfixed";
const QFIXED: &str = "EnergyConsumer.qfixed";
const EQUIPMENT_CONTAINER: &str = "Equipment.EquipmentContainer";
const EQUIPMENT_BASE_VOLTAGE: &str = "ConductingEquipment.BaseVoltage";
const NODE_BASE_VOLTAGE: &str = "TopologicalNode.BaseVoltage";

/// Result of converting one CIM document
#[derive(Debug, Clone)]
pub struct ImportResult {
    pub case: PpcCase,
    pub diagnostics: ImportDiagnostics,
}

/// Read and convert a CIM RDF/XML file.
pub fn parse_cim(path: impl AsRef<Path>, options: &ConvertOptions) -> ConversionResult<ImportResult> {
    let path = path.as_ref();
    info!("Processing file: {}", path.display());
    let document = CimDocument::from_path(path)?;
    convert_cim_document(&document, options)
}

/// Convert a parsed CIM document into a PPC case.
///
/// Element kinds are processed in a fixed order: base voltages, connectivity
/// nodes, energy consumers, disconnectors, topological nodes. Identifiers are
/// numbered in the order this walk first meets them.
pub fn convert_cim_document(
    document: &CimDocument,
    options: &ConvertOptions,
) -> ConversionResult<ImportResult> {
    let base_voltages = build_base_voltage_lookup(document)?;
    let mut conversion = Conversion::new(options, base_voltages);

    conversion.add_connectivity_nodes(document)?;
    conversion.apply_energy_consumers(document)?;
    conversion.add_disconnectors(document)?;
    conversion.add_topological_nodes(document)?;

    let Conversion {
        case,
        mut diagnostics,
        ..
    } = conversion;
    diagnostics.stats.buses = case.bus.len();
    diagnostics.stats.branches = case.branch.len();
    diagnostics.merge(super::cim_validator::validate_case(&case));

    Ok(ImportResult { case, diagnostics })
}

/// Map every `BaseVoltage` id to its nominal voltage. Duplicate ids keep the
/// last value seen.
pub fn build_base_voltage_lookup(document: &CimDocument) -> ConversionResult<HashMap<String, f64>> {
    let mut lookup = HashMap::new();
    for element in document.elements_of(BASE_VOLTAGE) {
        let id = element.id()?;
        let nominal = element.number(NOMINAL_VOLTAGE)?;
        lookup.insert(id.to_string(), nominal);
    }
    Ok(lookup)
}

/// Per-document conversion state.
struct Conversion<'a> {
    options: &'a ConvertOptions,
    base_voltages: HashMap<String, f64>,
    ids: IdRemapper,
    case: PpcCase,
    // bus id -> index of the first row carrying it
    bus_index: HashMap<usize, usize>,
    diagnostics: ImportDiagnostics,
}

impl<'a> Conversion<'a> {
    fn new(options: &'a ConvertOptions, base_voltages: HashMap<String, f64>) -> Self {
        Self {
            options,
            base_voltages,
            ids: IdRemapper::new(),
            case: PpcCase::new(),
            bus_index: HashMap::new(),
            diagnostics: ImportDiagnostics::new(),
        }
    }

    fn push_bus(&mut self, row: BusRow) {
        let idx = self.case.bus.len();
        self.bus_index.entry(row.bus_i).or_insert(idx);
        self.case.bus.push(row);
    }

    fn add_connectivity_nodes(&mut self, document: &CimDocument) -> ConversionResult<()> {
        for node in document.elements_of(CONNECTIVITY_NODE) {
            let bus_id = self.ids.map(node.id()?);
            let name = node.text(NAME)?;
            debug!("ConnectivityNode ID: {}, Name: {}", bus_id, name);
            self.push_bus(BusRow::with_defaults(bus_id, 1.0));
        }
        Ok(())
    }

    fn apply_energy_consumers(&mut self, document: &CimDocument) -> ConversionResult<()> {
        for consumer in document.elements_of(ENERGY_CONSUMER) {
            let name = consumer.text(NAME)?;
            let p_fixed = consumer.number(PFIXED)?;
            let q_fixed = consumer.number(QFIXED)?;
            let container = consumer.resource(EQUIPMENT_CONTAINER)?;
            let bus_id = self.ids.map(container);
            debug!(
                "EnergyConsumer ID: {}, Name: {}, P_fixed: {}, Q_fixed: {}, Bus ID: {}",
                consumer.id.as_deref().unwrap_or("?"),
                name,
                p_fixed,
                q_fixed,
                bus_id
            );

            match self.bus_index.get(&bus_id) {
                Some(&idx) => {
                    let bus = &mut self.case.bus[idx];
                    match self.options.demand_policy {
                        DemandPolicy::Overwrite => {
                            bus.pd = p_fixed;
                            bus.qd = q_fixed;
                        }
                        DemandPolicy::Sum => {
                            bus.pd += p_fixed;
                            bus.qd += q_fixed;
                        }
                    }
                    self.diagnostics.stats.loads_applied += 1;
                }
                None if self.options.strict_references => {
                    return Err(ConversionError::UnresolvedReference {
                        element: consumer.label(),
                        field: EQUIPMENT_CONTAINER.to_string(),
                        target: container.to_string(),
                    });
                }
                None => {
                    warn!(
                        "{} references container '{}' with no bus; demand dropped",
                        consumer.label(),
                        container
                    );
                    self.diagnostics.add_warning_with_entity(
                        "demand",
                        &format!("container '{container}' has no bus; demand dropped"),
                        &consumer.label(),
                    );
                    self.diagnostics.stats.loads_dropped += 1;
                }
            }
        }
        Ok(())
    }

    fn add_disconnectors(&mut self, document: &CimDocument) -> ConversionResult<()> {
        for disconnector in document.elements_of(DISCONNECTOR) {
            let disconnector_id = self.ids.map(disconnector.id()?);
            let name = disconnector.text(NAME)?;
            let base_voltage = self.resolve_base_voltage(disconnector, EQUIPMENT_BASE_VOLTAGE)?;
            let container = self.ids.map(disconnector.resource(EQUIPMENT_CONTAINER)?);
            debug!(
                "Disconnector ID: {}, Name: {}, Base Voltage: {}, Equipment Container: {}",
                disconnector_id, name, base_voltage, container
            );
            self.case
                .branch
                .push(BranchRow::placeholder(base_voltage, container));
        }
        Ok(())
    }

    fn add_topological_nodes(&mut self, document: &CimDocument) -> ConversionResult<()> {
        for node in document.elements_of(TOPOLOGICAL_NODE) {
            let bus_id = self.ids.map(node.id()?);
            let name = node.text(NAME)?;
            let base_voltage = self.resolve_base_voltage(node, NODE_BASE_VOLTAGE)?;
            debug!(
                "TopologicalNode ID: {}, Name: {}, Base Voltage: {}",
                bus_id, name, base_voltage
            );
            self.push_bus(BusRow::with_defaults(bus_id, base_voltage));
        }
        Ok(())
    }

    fn resolve_base_voltage(&mut self, element: &CimElement, field: &str) -> ConversionResult<f64> {
        let target = element.resource(field)?;
        if let Some(&kv) = self.base_voltages.get(target) {
            return Ok(kv);
        }
        if self.options.strict_references {
            return Err(ConversionError::UnresolvedReference {
                element: element.label(),
                field: field.to_string(),
                target: target.to_string(),
            });
        }
        let fallback = self.options.fallback_base_kv;
        warn!(
            "{} references unknown base voltage '{}'; using {} kV",
            element.label(),
            target,
            fallback
        );
        self.diagnostics.add_warning_with_entity(
            "reference",
            &format!("unknown base voltage '{target}', defaulted to {fallback} kV"),
            &element.label(),
        );
        self.diagnostics.stats.defaulted_voltages += 1;
        Ok(fallback)
    }
}
