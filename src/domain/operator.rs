// ==========================================
// 成型产线产能系统 - 操作工组
// ==========================================
// 一个操作工组覆盖若干二段产线 (默认两两成对)
// ==========================================

use crate::domain::types::{OperatorRole, OvenSpeed};
use serde::{Deserialize, Serialize};

/// 操作工组
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorGroup {
    pub id: String,
    pub line_ids: Vec<String>,
    pub has_oven_operator: bool, // 仅当覆盖线有烘炉时有意义
    pub has_cart_operator: bool,
    pub oven_speed: OvenSpeed,
}

impl OperatorGroup {
    /// 切换某个岗位的在岗状态
    pub fn toggle(&mut self, role: OperatorRole) {
        match role {
            OperatorRole::Oven => self.has_oven_operator = !self.has_oven_operator,
            OperatorRole::Cart => self.has_cart_operator = !self.has_cart_operator,
        }
    }
}

/// 默认操作工组 AB / CD / EF
pub fn default_operator_groups() -> Vec<OperatorGroup> {
    let group = |id: &str, lines: [&str; 2], oven: bool| OperatorGroup {
        id: id.to_string(),
        line_ids: lines.iter().map(|l| l.to_string()).collect(),
        has_oven_operator: oven,
        has_cart_operator: true,
        oven_speed: OvenSpeed::Fast,
    };

    vec![
        group("AB", ["S2-A", "S2-B"], true),
        group("CD", ["S2-C", "S2-D"], true),
        group("EF", ["S2-E", "S2-F"], false), // E/F 无烘炉
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_roles() {
        let mut groups = default_operator_groups();
        let ab = &mut groups[0];
        ab.toggle(OperatorRole::Cart);
        assert!(!ab.has_cart_operator);
        ab.toggle(OperatorRole::Oven);
        assert!(!ab.has_oven_operator);
        ab.toggle(OperatorRole::Cart);
        assert!(ab.has_cart_operator);
    }

    #[test]
    fn test_wire_format() {
        let json = r#"{"id":"AB","lineIds":["S2-A","S2-B"],"hasOvenOperator":true,"hasCartOperator":true,"ovenSpeed":"LENTO"}"#;
        let g: OperatorGroup = serde_json::from_str(json).unwrap();
        assert_eq!(g.oven_speed, OvenSpeed::Slow);
        assert_eq!(g.line_ids.len(), 2);
    }
}
