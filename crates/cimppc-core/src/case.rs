//! PYPOWER case record and its row types.
//!
//! Column layouts follow PYPOWER/MATPOWER: 13 bus columns, 10 generator
//! columns, 13 branch columns and a variable-width cost row.

use serde::{Serialize, Serializer};

/// Case format version written into every record.
pub const PPC_VERSION: &str = "2";

/// System MVA base of converted cases.
pub const DEFAULT_BASE_MVA: f64 = 1.0;

/// Rating used for every placeholder branch (MVA).
pub const PLACEHOLDER_RATING: f64 = 9999.0;

/// A single numeric column value.
///
/// Integer columns (ids, types, areas, status flags) stay integral when
/// serialized so that downstream readers see `1` rather than `1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell {
    Int(i64),
    Float(f64),
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            Cell::Int(v) => serializer.serialize_i64(v),
            Cell::Float(v) => serializer.serialize_f64(v),
        }
    }
}

fn int(value: usize) -> Cell {
    Cell::Int(value as i64)
}

/// The PPC case record: version, MVA base and four ordered tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PpcCase {
    pub version: String,
    #[serde(rename = "baseMVA")]
    pub base_mva: f64,
    pub bus: Vec<BusRow>,
    pub gen: Vec<GenRow>,
    pub branch: Vec<BranchRow>,
    pub gencost: Vec<GenCostRow>,
}

impl Default for PpcCase {
    fn default() -> Self {
        Self {
            version: PPC_VERSION.to_string(),
            base_mva: DEFAULT_BASE_MVA,
            bus: Vec::new(),
            gen: Vec::new(),
            branch: Vec::new(),
            gencost: Vec::new(),
        }
    }
}

impl PpcCase {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Bus table row (`bus_i type Pd Qd Gs Bs area Vm Va baseKV zone Vmax Vmin`).
#[derive(Debug, Clone, PartialEq)]
pub struct BusRow {
    pub bus_i: usize,
    pub bus_type: i32,
    pub pd: f64,
    pub qd: f64,
    pub gs: f64,
    pub bs: f64,
    pub area: i32,
    pub vm: f64,
    pub va: f64,
    pub base_kv: f64,
    pub zone: i32,
    pub vmax: f64,
    pub vmin: f64,
}

impl BusRow {
    /// A PQ bus with zero demand, flat voltage and the given base voltage.
    pub fn with_defaults(bus_i: usize, base_kv: f64) -> Self {
        Self {
            bus_i,
            bus_type: 1,
            pd: 0.0,
            qd: 0.0,
            gs: 0.0,
            bs: 0.0,
            area: 1,
            vm: 1.0,
            va: 0.0,
            base_kv,
            zone: 1,
            vmax: 1.1,
            vmin: 0.9,
        }
    }

    pub fn cells(&self) -> Vec<Cell> {
        vec![
            int(self.bus_i),
            Cell::Int(self.bus_type.into()),
            Cell::Float(self.pd),
            Cell::Float(self.qd),
            Cell::Float(self.gs),
            Cell::Float(self.bs),
            Cell::Int(self.area.into()),
            Cell::Float(self.vm),
            Cell::Float(self.va),
            Cell::Float(self.base_kv),
            Cell::Int(self.zone.into()),
            Cell::Float(self.vmax),
            Cell::Float(self.vmin),
        ]
    }
}

/// Generator table row (`bus Pg Qg Qmax Qmin Vg mBase status Pmax Pmin`).
#[derive(Debug, Clone, PartialEq)]
pub struct GenRow {
    pub gen_bus: usize,
    pub pg: f64,
    pub qg: f64,
    pub qmax: f64,
    pub qmin: f64,
    pub vg: f64,
    pub mbase: f64,
    pub gen_status: i32,
    pub pmax: f64,
    pub pmin: f64,
}

impl GenRow {
    pub fn cells(&self) -> Vec<Cell> {
        vec![
            int(self.gen_bus),
            Cell::Float(self.pg),
            Cell::Float(self.qg),
            Cell::Float(self.qmax),
            Cell::Float(self.qmin),
            Cell::Float(self.vg),
            Cell::Float(self.mbase),
            Cell::Int(self.gen_status.into()),
            Cell::Float(self.pmax),
            Cell::Float(self.pmin),
        ]
    }
}

/// Branch table row.
///
/// Rows built from switching devices carry the resolved base voltage in the
/// first column and the equipment container id in the second, where PPC
/// places `fbus`/`tbus`. All electrical columns are placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct BranchRow {
    pub base_kv: f64,
    pub container: usize,
    pub br_r: f64,
    pub br_x: f64,
    pub br_b: f64,
    pub rate_a: f64,
    pub rate_b: f64,
    pub rate_c: f64,
    pub tap: f64,
    pub shift: f64,
    pub br_status: i32,
    pub angmin: i32,
    pub angmax: i32,
}

impl BranchRow {
    /// Closed, lossless branch with high ratings and unconstrained angles.
    pub fn placeholder(base_kv: f64, container: usize) -> Self {
        Self {
            base_kv,
            container,
            br_r: 0.0,
            br_x: 0.0,
            br_b: 0.0,
            rate_a: PLACEHOLDER_RATING,
            rate_b: PLACEHOLDER_RATING,
            rate_c: PLACEHOLDER_RATING,
            tap: 0.0,
            shift: 0.0,
            br_status: 1,
            angmin: -360,
            angmax: 360,
        }
    }

    pub fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::Float(self.base_kv),
            int(self.container),
            Cell::Float(self.br_r),
            Cell::Float(self.br_x),
            Cell::Float(self.br_b),
            Cell::Float(self.rate_a),
            Cell::Float(self.rate_b),
            Cell::Float(self.rate_c),
            Cell::Float(self.tap),
            Cell::Float(self.shift),
            Cell::Int(self.br_status.into()),
            Cell::Int(self.angmin.into()),
            Cell::Int(self.angmax.into()),
        ]
    }
}

/// Generator cost row (`model startup shutdown n c(n-1) ... c0`).
#[derive(Debug, Clone, PartialEq)]
pub struct GenCostRow {
    pub model: i32,
    pub startup: f64,
    pub shutdown: f64,
    pub ncost: i32,
    pub cost: Vec<f64>,
}

impl GenCostRow {
    pub fn cells(&self) -> Vec<Cell> {
        let mut cells = vec![
            Cell::Int(self.model.into()),
            Cell::Float(self.startup),
            Cell::Float(self.shutdown),
            Cell::Int(self.ncost.into()),
        ];
        cells.extend(self.cost.iter().copied().map(Cell::Float));
        cells
    }
}

macro_rules! serialize_as_cells {
    ($($row:ty),*) => {
        $(
            impl Serialize for $row {
                fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    serializer.collect_seq(self.cells())
                }
            }
        )*
    };
}

serialize_as_cells!(BusRow, GenRow, BranchRow, GenCostRow);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bus_row_serializes_in_ppc_order() {
        let row = BusRow::with_defaults(1, 11.0);
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, "[1,1,0.0,0.0,0.0,0.0,1,1.0,0.0,11.0,1,1.1,0.9]");
    }

    #[test]
    fn test_placeholder_branch_constants() {
        let row = BranchRow::placeholder(20.0, 4);
        assert_eq!(row.rate_a, 9999.0);
        assert_eq!(row.rate_b, 9999.0);
        assert_eq!(row.rate_c, 9999.0);
        assert_eq!(row.br_status, 1);
        assert_eq!(row.angmin, -360);
        assert_eq!(row.angmax, 360);

        let cells = row.cells();
        assert_eq!(cells.len(), 13);
        assert_eq!(cells[0], Cell::Float(20.0));
        assert_eq!(cells[1], Cell::Int(4));
        assert_eq!(cells[10], Cell::Int(1));
        assert_eq!(cells[11], Cell::Int(-360));
        assert_eq!(cells[12], Cell::Int(360));
        assert_eq!(
            serde_json::to_string(&row).unwrap(),
            "[20.0,4,0.0,0.0,0.0,9999.0,9999.0,9999.0,0.0,0.0,1,-360,360]"
        );
    }

    #[test]
    fn test_gencost_row_flattens_coefficients() {
        let row = GenCostRow {
            model: 2,
            startup: 0.0,
            shutdown: 0.0,
            ncost: 3,
            cost: vec![0.01, 20.0, 0.0],
        };
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, "[2,0.0,0.0,3,0.01,20.0,0.0]");
    }

    #[test]
    fn test_case_uses_ppc_keys() {
        let case = PpcCase::new();
        let value = serde_json::to_value(&case).unwrap();
        assert_eq!(value["version"], "2");
        assert_eq!(value["baseMVA"], 1.0);
        assert!(value["bus"].as_array().unwrap().is_empty());
        assert!(value["gencost"].as_array().unwrap().is_empty());
    }
}
