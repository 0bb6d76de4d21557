//! # 结构、组分与对称性映射
//!
//! 从材料文档中读取:
//! - `structure.sites[*].{label, xyz}` 与 `structure.lattice.matrix`
//! - `composition` / `composition_reduced`
//! - `symmetry`
//!
//! 坐标与晶格向量以 Å 读入并换算为 m。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 调用
//! - 使用 `models/system.rs`, `models/units.rs`

use super::json::{self, Document};
use crate::models::{Atoms, Composition, Quantity, Run, Symmetry, System, Unit};
use serde_json::Value;

/// 读取 `structure`，存在时新建一个 System
pub fn parse_structure(data: &Document, run: &mut Run) {
    let structure = match json::get(data, "structure").and_then(Value::as_object) {
        Some(s) => s,
        None => return,
    };

    let mut labels = Vec::new();
    let mut positions = Vec::new();

    let sites = structure
        .get("sites")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    for (i, site) in sites.iter().enumerate() {
        let xyz = site.get("xyz").and_then(json::f64_list);
        let label = site_label(site);

        match (label, xyz) {
            (Some(label), Some(xyz)) if xyz.len() == 3 => {
                labels.push(label);
                positions.push(xyz);
            }
            _ => log::warn!("Skipping site {}: missing label or cartesian coordinates", i),
        }
    }

    let lattice_vectors = structure
        .get("lattice")
        .and_then(|l| l.get("matrix"))
        .and_then(json::f64_matrix)
        .map(|m| Quantity::new(m, Unit::Angstrom));

    let atoms = Atoms {
        labels,
        positions: if positions.is_empty() {
            None
        } else {
            Some(Quantity::new(positions, Unit::Angstrom))
        },
        lattice_vectors,
    };

    run.system.push(System {
        atoms: Some(atoms),
        ..Default::default()
    });
}

/// 位点标签，缺失时取第一个物种的元素符号
fn site_label(site: &Value) -> Option<String> {
    if let Some(label) = site.get("label").and_then(Value::as_str) {
        return Some(label.to_string());
    }
    site.get("species")
        .and_then(Value::as_array)
        .and_then(|species| species.first())
        .and_then(|s| s.get("element"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// 读取 `composition` 和 `composition_reduced`，保持输入顺序
pub fn parse_composition(data: &Document, run: &mut Run) {
    if let Some(map) = json::get(data, "composition").and_then(Value::as_object) {
        run.system_or_create().x_mp_composition = composition_entries(map);
    }
    if let Some(map) = json::get(data, "composition_reduced").and_then(Value::as_object) {
        run.system_or_create().x_mp_composition_reduced = composition_entries(map);
    }
}

fn composition_entries(map: &Document) -> Vec<Composition> {
    map.iter()
        .filter_map(|(label, value)| match value.as_f64() {
            Some(v) => Some(Composition {
                x_mp_label: label.clone(),
                x_mp_value: v,
            }),
            None => {
                log::warn!("Non-numeric composition value for '{}' ignored", label);
                None
            }
        })
        .collect()
}

/// 读取 `symmetry`，未识别的键保留到 `extra`
pub fn parse_symmetry(data: &Document, run: &mut Run) {
    let source = match json::get(data, "symmetry").and_then(Value::as_object) {
        Some(s) => s,
        None => return,
    };

    let mut symmetry = Symmetry::default();
    for (key, value) in source {
        let taken = match key.as_str() {
            "symbol" => set(&mut symmetry.x_mp_symbol, json::as_text(value)),
            "number" => set(&mut symmetry.x_mp_number, json::as_int(value)),
            "crystal_system" => set(&mut symmetry.x_mp_crystal_system, json::as_text(value)),
            "point_group" => set(&mut symmetry.x_mp_point_group, json::as_text(value)),
            "symprec" => set(&mut symmetry.x_mp_symprec, value.as_f64()),
            "source" => set(&mut symmetry.x_mp_source, json::as_text(value)),
            "version" => set(&mut symmetry.x_mp_version, json::as_text(value)),
            "hall" => set(&mut symmetry.x_mp_hall, json::as_text(value)),
            _ => false,
        };
        if !taken {
            symmetry
                .extra
                .insert(format!("x_mp_{}", key), value.clone());
        }
    }

    run.system_or_create().x_mp_symmetry = Some(symmetry);
}

fn set<T>(slot: &mut Option<T>, value: Option<T>) -> bool {
    match value {
        Some(v) => {
            *slot = Some(v);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().unwrap().clone()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-6 * b.abs()
    }

    fn si2() -> Document {
        doc(json!({
            "structure": {
                "lattice": {"matrix": [[0.0, 2.734364, 2.734364],
                                       [2.734364, 0.0, 2.734364],
                                       [2.734364, 2.734364, 0.0]]},
                "sites": [
                    {"label": "Si", "xyz": [0.0, 0.0, 0.0]},
                    {"label": "Si", "xyz": [1.367182, 1.367182, 1.367182]}
                ]
            }
        }))
    }

    #[test]
    fn test_parse_structure_si() {
        let mut run = Run::default();
        parse_structure(&si2(), &mut run);

        let atoms = run.system[0].atoms.as_ref().unwrap();
        assert_eq!(atoms.labels, vec!["Si", "Si"]);
        assert_eq!(atoms.n_atoms(), 2);

        let positions = &atoms.positions.as_ref().unwrap().magnitude;
        assert_eq!(positions.len(), atoms.labels.len());
        assert!(approx(positions[1][0], 1.367182e-10));

        let lattice = &atoms.lattice_vectors.as_ref().unwrap().magnitude;
        assert!(approx(lattice[1][2], 2.734364e-10));
    }

    #[test]
    fn test_missing_structure_creates_no_atoms() {
        let mut run = Run::default();
        parse_structure(&doc(json!({"material_id": "mp-1"})), &mut run);
        assert!(run.system.is_empty());
    }

    #[test]
    fn test_site_label_falls_back_to_species() {
        let data = doc(json!({
            "structure": {
                "sites": [
                    {"species": [{"element": "Na", "occu": 1}], "xyz": [0, 0, 0]},
                    {"label": "Cl"}
                ]
            }
        }));
        let mut run = Run::default();
        parse_structure(&data, &mut run);

        let atoms = run.system[0].atoms.as_ref().unwrap();
        assert_eq!(atoms.labels, vec!["Na"]);
        assert_eq!(atoms.positions.as_ref().unwrap().magnitude.len(), 1);
        assert!(atoms.lattice_vectors.is_none());
    }

    #[test]
    fn test_composition_keeps_order_without_normalizing() {
        let data = doc(json!({
            "composition": {"O": 3.0, "Sr": 1.0, "Ti": 1.0},
            "composition_reduced": {"Zn": 0.7, "O": 0.7}
        }));
        let mut run = Run::default();
        parse_composition(&data, &mut run);

        let system = &run.system[0];
        let labels: Vec<&str> = system
            .x_mp_composition
            .iter()
            .map(|c| c.x_mp_label.as_str())
            .collect();
        assert_eq!(labels, vec!["O", "Sr", "Ti"]);

        let total: f64 = system.x_mp_composition_reduced.iter().map(|c| c.x_mp_value).sum();
        assert!((total - 1.4).abs() < 1e-12);
        assert_eq!(system.x_mp_composition_reduced[0].x_mp_label, "Zn");
    }

    #[test]
    fn test_composition_attaches_to_existing_system() {
        let mut data = si2();
        data.insert("composition".to_string(), json!({"Si": 2.0}));
        let mut run = Run::default();
        parse_structure(&data, &mut run);
        parse_composition(&data, &mut run);

        assert_eq!(run.system.len(), 1);
        assert_eq!(run.system[0].x_mp_composition[0].x_mp_value, 2.0);
    }

    #[test]
    fn test_parse_symmetry_keeps_unknown_keys() {
        let data = doc(json!({
            "symmetry": {
                "crystal_system": "Cubic",
                "symbol": "Fd-3m",
                "number": 227,
                "point_group": "m-3m",
                "symprec": 0.1,
                "version": "1.16.2",
                "wyckoffs": ["a"]
            }
        }));
        let mut run = Run::default();
        parse_symmetry(&data, &mut run);

        let symmetry = run.system[0].x_mp_symmetry.as_ref().unwrap();
        assert_eq!(symmetry.x_mp_symbol.as_deref(), Some("Fd-3m"));
        assert_eq!(symmetry.x_mp_number, Some(227));
        assert_eq!(symmetry.x_mp_symprec, Some(0.1));
        assert_eq!(symmetry.extra["x_mp_wyckoffs"], json!(["a"]));
    }

    #[test]
    fn test_mistyped_symmetry_field_goes_to_extra() {
        let data = doc(json!({"symmetry": {"number": "two hundred"}}));
        let mut run = Run::default();
        parse_symmetry(&data, &mut run);

        let symmetry = run.system[0].x_mp_symmetry.as_ref().unwrap();
        assert!(symmetry.x_mp_number.is_none());
        assert_eq!(symmetry.extra["x_mp_number"], "two hundred");
    }
}
