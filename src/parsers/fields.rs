//! # 顶层字段映射表
//!
//! 材料文档中除结构、组分、对称性和方法之外的顶层键，按静态映射表
//! 写入 System、Run 或 Calculation 的 `x_mp_` 字段。
//!
//! | 源键 | 目标 | 类型/单位 |
//! |------|------|-----------|
//! | `formula_pretty` 等 | System | 字符串 |
//! | `volume`, `density` | System | 数值（原样） |
//! | `elements` | System | 元素符号列表 |
//! | `material_id` 等 | Run | 字符串 |
//! | `task_ids`, `icsd_ids`, `tags` | Run | 列表 |
//! | `uncorrected_energy_per_atom` | Calculation | eV → J |
//!
//! 表中没有的键记录 debug 日志后忽略。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 调用
//! - 使用 `models/`

use super::json::{self, Document};
use crate::models::{CalcType, Origin, Quantity, Run, Unit};
use serde_json::Value;

/// 映射目标字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    // System
    FormulaPretty,
    FormulaAnonymous,
    Chemsys,
    OxideType,
    Volume,
    Density,
    DensityAtomic,
    Nelements,
    Elements,
    Nsites,
    // Run
    MaterialId,
    PymatgenVersion,
    EmmetVersion,
    BuildDate,
    LastUpdated,
    CreatedAt,
    Deprecated,
    TaskIds,
    IcsdIds,
    Tags,
    CalcTypes,
    Origins,
    BuilderMeta,
    // Calculation
    UncorrectedEnergyPerAtom,
    EnergyPerAtom,
}

/// 源键 -> 目标字段
const FIELD_TABLE: &[(&str, Field)] = &[
    ("formula_pretty", Field::FormulaPretty),
    ("pretty_formula", Field::FormulaPretty),
    ("formula_anonymous", Field::FormulaAnonymous),
    ("chemsys", Field::Chemsys),
    ("oxide_type", Field::OxideType),
    ("volume", Field::Volume),
    ("density", Field::Density),
    ("density_atomic", Field::DensityAtomic),
    ("nelements", Field::Nelements),
    ("elements", Field::Elements),
    ("nsites", Field::Nsites),
    ("material_id", Field::MaterialId),
    ("pymatgen_version", Field::PymatgenVersion),
    ("emmet_version", Field::EmmetVersion),
    ("build_date", Field::BuildDate),
    ("last_updated", Field::LastUpdated),
    ("created_at", Field::CreatedAt),
    ("deprecated", Field::Deprecated),
    ("task_ids", Field::TaskIds),
    ("icsd_ids", Field::IcsdIds),
    ("tags", Field::Tags),
    ("calc_types", Field::CalcTypes),
    ("origins", Field::Origins),
    ("builder_meta", Field::BuilderMeta),
    ("uncorrected_energy_per_atom", Field::UncorrectedEnergyPerAtom),
    ("energy_per_atom", Field::EnergyPerAtom),
];

/// 由其他映射器处理的键
const CONSUMED_KEYS: &[&str] = &[
    "structure",
    "composition",
    "composition_reduced",
    "symmetry",
    // parsers/method.rs
    "run_type",
    "input",
    "encut",
    "hubbards",
    "is_hubbard",
    "is_compatible",
    // MongoDB 导出
    "_id",
];

fn lookup(key: &str) -> Option<Field> {
    FIELD_TABLE
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, field)| *field)
}

/// 按映射表复制顶层字段，返回未识别的键
pub fn copy_fields(data: &Document, run: &mut Run) -> Vec<String> {
    let mut unmapped = Vec::new();

    for (key, value) in data {
        if value.is_null() || CONSUMED_KEYS.contains(&key.as_str()) {
            continue;
        }
        match lookup(key) {
            Some(field) => {
                if !apply(field, value, run) {
                    log::warn!("Field '{}' has an unexpected type, ignored", key);
                }
            }
            None => {
                log::debug!("No mapping for top-level key '{}'", key);
                unmapped.push(key.clone());
            }
        }
    }

    unmapped
}

/// 写入单个字段，类型不符时返回 false
fn apply(field: Field, value: &Value, run: &mut Run) -> bool {
    match field {
        Field::FormulaPretty => store(&mut run.system_or_create().x_mp_formula_pretty, json::as_text(value)),
        Field::FormulaAnonymous => store(&mut run.system_or_create().x_mp_formula_anonymous, json::as_text(value)),
        Field::Chemsys => store(&mut run.system_or_create().x_mp_chemsys, json::as_text(value)),
        Field::OxideType => store(&mut run.system_or_create().x_mp_oxide_type, json::as_text(value)),
        Field::Volume => store(&mut run.system_or_create().x_mp_volume, value.as_f64()),
        Field::Density => store(&mut run.system_or_create().x_mp_density, value.as_f64()),
        Field::DensityAtomic => store(&mut run.system_or_create().x_mp_density_atomic, value.as_f64()),
        Field::Nelements => store(&mut run.system_or_create().x_mp_nelements, json::as_int(value)),
        Field::Nsites => store(&mut run.system_or_create().x_mp_nsites, json::as_int(value)),
        Field::Elements => match element_symbols(value) {
            Some(symbols) => {
                run.system_or_create().x_mp_elements = symbols;
                true
            }
            None => false,
        },
        Field::MaterialId => store(&mut run.x_mp_material_id, json::as_text(value)),
        Field::PymatgenVersion => {
            run.program.version = json::as_text(value);
            store(&mut run.x_mp_pymatgen_version, json::as_text(value))
        }
        Field::EmmetVersion => store(&mut run.x_mp_emmet_version, json::as_text(value)),
        Field::BuildDate => store(&mut run.x_mp_build_date, json::as_text(value)),
        Field::LastUpdated => store(&mut run.x_mp_last_updated, json::as_text(value)),
        Field::CreatedAt => store(&mut run.x_mp_created_at, json::as_text(value)),
        Field::Deprecated => store(&mut run.x_mp_deprecated, value.as_bool()),
        Field::TaskIds => store_list(&mut run.x_mp_task_ids, json::text_list(value)),
        Field::Tags => store_list(&mut run.x_mp_tags, json::text_list(value)),
        Field::IcsdIds => store_list(
            &mut run.x_mp_icsd_ids,
            value.as_array().and_then(|a| a.iter().map(json::as_int).collect()),
        ),
        Field::CalcTypes => store_list(&mut run.x_mp_calc_types, calc_types(value)),
        Field::Origins => store_list(&mut run.x_mp_origins, origins(value)),
        Field::BuilderMeta => builder_meta(value, run),
        Field::UncorrectedEnergyPerAtom => store(
            &mut run.calculation_or_create().x_mp_uncorrected_energy_per_atom,
            value.as_f64().map(|e| Quantity::new(e, Unit::ElectronVolt)),
        ),
        Field::EnergyPerAtom => store(
            &mut run.calculation_or_create().x_mp_energy_per_atom,
            value.as_f64().map(|e| Quantity::new(e, Unit::ElectronVolt)),
        ),
    }
}

fn store<T>(slot: &mut Option<T>, value: Option<T>) -> bool {
    let ok = value.is_some();
    if ok {
        *slot = value;
    }
    ok
}

fn store_list<T>(slot: &mut Vec<T>, value: Option<Vec<T>>) -> bool {
    match value {
        Some(v) => {
            *slot = v;
            true
        }
        None => false,
    }
}

/// `elements`: 对象数组取 `element`，字符串数组原样接受
fn element_symbols(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|e| match e {
            Value::String(s) => Some(s.clone()),
            Value::Object(map) => map.get("element").and_then(json::as_text),
            _ => None,
        })
        .collect()
}

/// `calc_types`: {task_id: 计算类型}
fn calc_types(value: &Value) -> Option<Vec<CalcType>> {
    value
        .as_object()?
        .iter()
        .map(|(label, v)| {
            json::as_text(v).map(|text| CalcType {
                x_mp_label: label.clone(),
                x_mp_value: text,
            })
        })
        .collect()
}

/// `origins`: [{name, task_id, last_updated}]
fn origins(value: &Value) -> Option<Vec<Origin>> {
    value
        .as_array()?
        .iter()
        .map(|o| {
            let map = o.as_object()?;
            let text = |key: &str| map.get(key).and_then(json::as_text);
            Some(Origin {
                x_mp_name: text("name"),
                x_mp_task_id: text("task_id"),
                x_mp_last_updated: text("last_updated"),
            })
        })
        .collect()
}

/// 新版文档把版本信息放在 `builder_meta` 中
fn builder_meta(value: &Value, run: &mut Run) -> bool {
    let meta = match value.as_object() {
        Some(m) => m,
        None => return false,
    };
    if let Some(v) = meta.get("pymatgen_version").and_then(json::as_text) {
        run.program.version = Some(v.clone());
        run.x_mp_pymatgen_version = Some(v);
    }
    if let Some(v) = meta.get("emmet_version").and_then(json::as_text) {
        run.x_mp_emmet_version = Some(v);
    }
    if let Some(v) = meta.get("build_date").and_then(json::as_text) {
        run.x_mp_build_date = Some(v);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_every_table_key_is_unique() {
        for (i, (key, _)) in FIELD_TABLE.iter().enumerate() {
            assert!(
                FIELD_TABLE[i + 1..].iter().all(|(k, _)| k != key),
                "duplicate key {}",
                key
            );
            assert!(!CONSUMED_KEYS.contains(key));
        }
    }

    #[test]
    fn test_copy_system_fields() {
        let data = doc(json!({
            "formula_anonymous": "A",
            "volume": 40.88829284866483,
            "nsites": 2,
            "elements": [{"element": "Si", "oxidation_state": 0}],
            "structure": {"sites": []}
        }));
        let mut run = Run::default();
        let unmapped = copy_fields(&data, &mut run);

        assert!(unmapped.is_empty());
        let system = &run.system[0];
        assert_eq!(system.x_mp_formula_anonymous.as_deref(), Some("A"));
        assert!((system.x_mp_volume.unwrap() - 40.88829284866483).abs() < 1e-12);
        assert_eq!(system.x_mp_nsites, Some(2));
        assert_eq!(system.x_mp_elements, vec!["Si"]);
    }

    #[test]
    fn test_copy_run_fields() {
        let data = doc(json!({
            "material_id": "mp-149",
            "pymatgen_version": "2022.0.8",
            "deprecated": false,
            "task_ids": ["mp-149", "mp-1791788"],
            "icsd_ids": [51688, 76268],
            "calc_types": {"mp-149": "GGA Static"},
            "origins": [{"name": "structure", "task_id": "mp-1791788",
                         "last_updated": {"$date": "2021-02-08T21:23:46"}}]
        }));
        let mut run = Run::default();
        copy_fields(&data, &mut run);

        assert_eq!(run.x_mp_material_id.as_deref(), Some("mp-149"));
        assert_eq!(run.program.version.as_deref(), Some("2022.0.8"));
        assert_eq!(run.x_mp_deprecated, Some(false));
        assert_eq!(run.x_mp_task_ids.len(), 2);
        assert_eq!(run.x_mp_icsd_ids, vec![51688, 76268]);
        assert_eq!(run.x_mp_calc_types[0].x_mp_value, "GGA Static");
        assert_eq!(
            run.x_mp_origins[0].x_mp_last_updated.as_deref(),
            Some("2021-02-08T21:23:46")
        );
        assert!(run.system.is_empty());
    }

    #[test]
    fn test_energy_fields_are_converted() {
        let data = doc(json!({"uncorrected_energy_per_atom": -5.4}));
        let mut run = Run::default();
        copy_fields(&data, &mut run);

        let energy = run.calculation[0]
            .x_mp_uncorrected_energy_per_atom
            .as_ref()
            .unwrap();
        assert!((energy.magnitude - (-5.4 * 1.602176634e-19)).abs() < 1e-30);
    }

    #[test]
    fn test_unknown_and_mistyped_keys() {
        let data = doc(json!({
            "theoretical": true,
            "nsites": "two",
            "composition": {"Si": 2}
        }));
        let mut run = Run::default();
        let unmapped = copy_fields(&data, &mut run);

        assert_eq!(unmapped, vec!["theoretical"]);
        assert!(run.system[0].x_mp_nsites.is_none());
    }
}
