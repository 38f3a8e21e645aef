// ==========================================
// 成型产线产能系统 - 产线拓扑
// ==========================================
// 静态拓扑: 运行期不增删产线
// 一段 2 条线, 二段 6 条线 (A/B 共用烘炉A, C/D 共用烘炉B, E/F 无烘炉)
// ==========================================

use crate::domain::types::ProductionStage;
use serde::{Deserialize, Serialize};

/// 产线
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    pub id: String,
    pub stage: ProductionStage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub associated_oven: Option<char>, // 仅二段; None 表示无烘炉路径
}

impl Line {
    fn stage_one(id: &str) -> Self {
        Self {
            id: id.to_string(),
            stage: ProductionStage::Suction,
            associated_oven: None,
        }
    }

    fn stage_two(id: &str, oven: Option<char>) -> Self {
        Self {
            id: id.to_string(),
            stage: ProductionStage::Forming,
            associated_oven: oven,
        }
    }

    pub fn has_oven(&self) -> bool {
        self.associated_oven.is_some()
    }
}

/// 一段产线
pub fn stage_one_lines() -> Vec<Line> {
    vec![Line::stage_one("S1-A"), Line::stage_one("S1-B")]
}

/// 二段产线
pub fn stage_two_lines() -> Vec<Line> {
    vec![
        Line::stage_two("S2-A", Some('A')),
        Line::stage_two("S2-B", Some('A')),
        Line::stage_two("S2-C", Some('B')),
        Line::stage_two("S2-D", Some('B')),
        Line::stage_two("S2-E", None),
        Line::stage_two("S2-F", None),
    ]
}

/// 全部产线 (一段在前)
pub fn factory_lines() -> Vec<Line> {
    let mut lines = stage_one_lines();
    lines.extend(stage_two_lines());
    lines
}

/// 一段产线ID列表 (一段引擎入参)
pub fn stage_one_line_ids(lines: &[Line]) -> Vec<String> {
    lines
        .iter()
        .filter(|l| l.stage == ProductionStage::Suction)
        .map(|l| l.id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topology_shape() {
        let lines = factory_lines();
        assert_eq!(lines.len(), 8);
        assert_eq!(stage_one_line_ids(&lines), vec!["S1-A", "S1-B"]);
        let ovenless: Vec<_> = stage_two_lines().into_iter().filter(|l| !l.has_oven()).collect();
        assert_eq!(ovenless.len(), 2);
    }
}
