//! # 声子工作流提取
//!
//! - `ph_dos`: 频率 (THz) 与态密度，频率按 E = hν 换算为能量
//! - `ph_bs`: 能带 `bands[band][q]`、q 点路径 `qpoints` 与高对称点
//!   `labels_dict`，沿路径切分为若干段
//!
//! 态密度和能带写入最后一个 Calculation，不存在时新建。
//!
//! ## 能带切分
//! ```text
//! Γ . . . X X . . . W ... K U . . . X
//! └───────┘ └───────┘     │ └───────┘
//!  segment   segment      断点（紧跟段终点的高对称点不成段）
//! ```
//!
//! ## 依赖关系
//! - 被 `parsers/siblings.rs` 调度
//! - 使用 `models/calculation.rs`, `models/workflow.rs`

use super::json::{self, Document};
use crate::models::{
    Archive, BandEnergies, BandStructure, Dos, DosValues, Phonon, Quantity, Unit, Workflow,
};
use serde_json::Value;

/// 声子力常数计算程序
pub const FORCE_CALCULATOR: &str = "vasp";

/// 文档是否包含声子数据
pub fn applies(data: &Document) -> bool {
    data.contains_key("ph_bs") || data.contains_key("ph_dos")
}

/// 提取声子数据并追加一个 `phonon` 工作流
pub fn parse_phonon(data: &Document, archive: &mut Archive) {
    let mut phonon = Phonon {
        force_calculator: FORCE_CALCULATOR.to_string(),
        with_non_analytic_correction: None,
    };

    let calculation = archive.run_or_create().calculation_or_create();

    if let Some(ph_dos) = json::get(data, "ph_dos") {
        match parse_dos(ph_dos) {
            Some(dos) => calculation.dos_phonon.push(dos),
            None => log::warn!("Phonon DOS lacks numeric 'frequencies'/'densities', skipped"),
        }
    }

    if let Some(ph_bs) = json::get(data, "ph_bs") {
        phonon.with_non_analytic_correction = ph_bs.get("has_nac").and_then(Value::as_bool);
        match parse_band_structure(ph_bs) {
            Some(bs) => calculation.band_structure_phonon.push(bs),
            None => log::warn!("Phonon band structure is malformed, skipped"),
        }
    }

    archive.workflow.push(Workflow::Phonon { phonon });
}

fn parse_dos(ph_dos: &Value) -> Option<Dos> {
    let frequencies = ph_dos.get("frequencies").and_then(json::f64_list)?;
    let densities = ph_dos.get("densities").and_then(json::f64_list)?;

    Some(Dos {
        energies: Quantity::new(frequencies, Unit::TeraHertzPlanck),
        total: vec![DosValues {
            value: Quantity::new(densities, Unit::InverseTeraHertzPlanck),
        }],
    })
}

fn parse_band_structure(ph_bs: &Value) -> Option<BandStructure> {
    let bands = ph_bs.get("bands").and_then(json::f64_matrix)?;
    let qpoints = ph_bs.get("qpoints").and_then(json::f64_matrix)?;
    let labels = ph_bs
        .get("labels_dict")
        .and_then(Value::as_object)
        .map(high_symmetry_points)
        .unwrap_or_default();

    // [band][q] -> [q][band]
    let energies = json::transpose(&bands)?;
    if energies.len() != qpoints.len() {
        log::warn!(
            "Phonon bands cover {} q-points but the path has {}",
            energies.len(),
            qpoints.len()
        );
        return None;
    }

    let label_of = |q: &[f64]| {
        labels
            .iter()
            .find(|(_, point)| point.as_slice() == q)
            .map(|(label, _)| label.as_str())
    };

    let bounds = segment_bounds(&qpoints, |q| label_of(q).is_some());
    let segment = bounds
        .into_iter()
        .map(|(start, end)| BandEnergies {
            energies: Quantity::new(vec![energies[start..=end].to_vec()], Unit::TeraHertzPlanck),
            kpoints: qpoints[start..=end].to_vec(),
            endpoints_labels: [start, end]
                .iter()
                .filter_map(|&i| label_of(&qpoints[i]))
                .map(str::to_string)
                .collect(),
        })
        .collect();

    Some(BandStructure { segment })
}

/// `labels_dict` 中坐标为数值数组的条目，保持输入顺序
fn high_symmetry_points(labels: &Document) -> Vec<(String, Vec<f64>)> {
    labels
        .iter()
        .filter_map(|(label, q)| json::f64_list(q).map(|q| (label.clone(), q)))
        .collect()
}

/// 按高对称点切分 q 点路径，返回每段的首尾下标（闭区间）
///
/// 自上一段结束以来遇到两个高对称点即产生一段，段终点成为下一段的
/// 待定起点。唯一的例外是紧跟在段终点之后的高对称点（重复的端点或
/// 路径断点）：此时只把起点移到该点，不产生只含两个端点的空段。
pub fn segment_bounds<F>(qpoints: &[Vec<f64>], is_high_symmetry: F) -> Vec<(usize, usize)>
where
    F: Fn(&[f64]) -> bool,
{
    let mut bounds = Vec::new();
    let mut start: Option<usize> = None;
    // 待定起点是否为刚产生的段的终点
    let mut start_closes_segment = false;

    for (i, q) in qpoints.iter().enumerate() {
        if !is_high_symmetry(q) {
            continue;
        }
        match start {
            Some(s) if i == s + 1 && start_closes_segment => {
                start = Some(i);
                start_closes_segment = false;
            }
            Some(s) => {
                bounds.push((s, i));
                start = Some(i);
                start_closes_segment = true;
            }
            None => start = Some(i),
        }
    }

    bounds
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

    /// 连续路径: 11 个高对称点，相邻两点之间插入 `gap` 个普通点
    fn continuous_path(gap: usize) -> (Vec<Vec<f64>>, Vec<usize>) {
        let mut qpoints = Vec::new();
        let mut markers = Vec::new();
        for m in 0..11 {
            markers.push(qpoints.len());
            qpoints.push(vec![m as f64, 0.0, 0.0]);
            if m < 10 {
                for g in 0..gap {
                    qpoints.push(vec![m as f64 + (g + 1) as f64 / (gap + 1) as f64, 0.5, 0.0]);
                }
            }
        }
        (qpoints, markers)
    }

    #[test]
    fn test_eleven_markers_give_ten_segments() {
        let (qpoints, markers) = continuous_path(4);
        let bounds = segment_bounds(&qpoints, |q| q[1] == 0.0);

        assert_eq!(bounds.len(), 10);
        for (k, (start, end)) in bounds.iter().enumerate() {
            assert_eq!(*start, markers[k]);
            assert_eq!(*end, markers[k + 1]);
        }
    }

    #[test]
    fn test_duplicated_boundaries_and_path_breaks() {
        // Γ . . X | X . . W | K . U   (| 为相邻高对称点)
        let path = [1, 0, 0, 1, 1, 0, 0, 1, 1, 0, 1];
        let qpoints: Vec<Vec<f64>> = path.iter().map(|&h| vec![h as f64]).collect();
        let bounds = segment_bounds(&qpoints, |q| q[0] == 1.0);
        assert_eq!(bounds, vec![(0, 3), (4, 7), (8, 10)]);
    }

    #[test]
    fn test_adjacent_markers_after_a_break_form_a_segment() {
        // Γ . X | X W | W . L
        let path = [1, 0, 1, 1, 1, 1, 0, 1];
        let qpoints: Vec<Vec<f64>> = path.iter().map(|&h| vec![h as f64]).collect();
        let bounds = segment_bounds(&qpoints, |q| q[0] == 1.0);
        assert_eq!(bounds, vec![(0, 2), (3, 4), (5, 7)]);
    }

    #[test]
    fn test_two_point_path() {
        let qpoints = vec![vec![0.0, 0.0, 0.0], vec![0.5, 0.0, 0.5]];
        assert_eq!(segment_bounds(&qpoints, |_| true), vec![(0, 1)]);
    }

    #[test]
    fn test_no_markers_no_segments() {
        let qpoints = vec![vec![0.1], vec![0.2]];
        assert!(segment_bounds(&qpoints, |_| false).is_empty());
        assert!(segment_bounds(&[], |_| true).is_empty());
    }

    fn phonon_doc() -> Document {
        // 路径 Γ - (中点) - X | X - (中点) - L，两条能带
        doc(json!({
            "material_id": "mp-149",
            "ph_dos": {"frequencies": [0.0, 0.5, 1.0], "densities": [0.0, 0.01, 0.02]},
            "ph_bs": {
                "has_nac": true,
                "qpoints": [[0.0, 0.0, 0.0], [0.25, 0.0, 0.25], [0.5, 0.0, 0.5],
                            [0.5, 0.0, 0.5], [0.5, 0.25, 0.5], [0.5, 0.5, 0.5]],
                "bands": [[0.0, 3.0, 6.0, 6.0, 7.0, 8.0],
                          [0.0, 4.0, 11.0651455, 11.0651455, 12.0, 13.0]],
                "labels_dict": {"\\Gamma": [0.0, 0.0, 0.0], "X": [0.5, 0.0, 0.5],
                                "L": [0.5, 0.5, 0.5]}
            }
        }))
    }

    #[test]
    fn test_parse_phonon_document() {
        let mut archive = Archive::default();
        parse_phonon(&phonon_doc(), &mut archive);

        match &archive.workflow[0] {
            Workflow::Phonon { phonon } => {
                assert_eq!(phonon.force_calculator, "vasp");
                assert_eq!(phonon.with_non_analytic_correction, Some(true));
            }
            other => panic!("unexpected workflow {}", other),
        }

        let calculation = &archive.run[0].calculation[0];
        let dos = &calculation.dos_phonon[0];
        assert!(approx(dos.energies.magnitude[1], 0.5 * 6.62607015e-22));
        assert!(approx(dos.total[0].value.magnitude[2], 0.02 / 6.62607015e-22));

        let segments = &calculation.band_structure_phonon[0].segment;
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].endpoints_labels, vec!["\\Gamma", "X"]);
        assert_eq!(segments[1].endpoints_labels, vec!["X", "L"]);
        assert_eq!(segments[1].n_kpoints(), 3);
        assert_eq!(segments[1].kpoints[1], vec![0.5, 0.25, 0.5]);

        // energies[spin][k][band]
        let energies = &segments[0].energies.magnitude;
        assert_eq!(energies.len(), 1);
        assert_eq!(energies[0].len(), 3);
        assert_eq!(energies[0][0].len(), 2);
        assert!(approx(energies[0][2][1], 7.33184304e-21));
    }

    #[test]
    fn test_phonon_reuses_last_calculation() {
        let mut archive = Archive::default();
        archive.run_or_create().calculation_or_create();
        parse_phonon(&phonon_doc(), &mut archive);
        assert_eq!(archive.run[0].calculation.len(), 1);
    }

    #[test]
    fn test_ragged_bands_are_skipped() {
        let data = doc(json!({
            "ph_bs": {"qpoints": [[0.0], [1.0]], "bands": [[0.0, 1.0], [2.0]],
                      "labels_dict": {}}
        }));
        let mut archive = Archive::default();
        parse_phonon(&data, &mut archive);

        assert!(archive.run[0].calculation[0].band_structure_phonon.is_empty());
        assert_eq!(archive.workflow.len(), 1);
    }
}
