// ==========================================
// 成型产线产能系统 - 领域类型定义
// ==========================================
// 序列化格式: 与现场快照文件一致 (SCREAMING_SNAKE_CASE 原始代码)
// 兼容: 英文代码作为 alias 接受
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 生产阶段 (Production Stage)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductionStage {
    #[serde(rename = "SUCCAO", alias = "ONE")]
    Suction, // 一段: 吸浆
    #[serde(rename = "CONFORMACAO", alias = "TWO")]
    Forming, // 二段: 成型
}

impl fmt::Display for ProductionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductionStage::Suction => write!(f, "SUCCAO"),
            ProductionStage::Forming => write!(f, "CONFORMACAO"),
        }
    }
}

// ==========================================
// 一段去向 (Stage-One Destination)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage1Destination {
    #[serde(rename = "FORNO", alias = "OVEN")]
    Oven, // 烘炉
    #[serde(rename = "SECAGEM_NATURAL", alias = "NATURAL_DRY")]
    NaturalDry, // 自然干燥
}

impl fmt::Display for Stage1Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage1Destination::Oven => write!(f, "FORNO"),
            Stage1Destination::NaturalDry => write!(f, "SECAGEM_NATURAL"),
        }
    }
}

// ==========================================
// 二段供料方式 (Stage-Two Supply Type)
// ==========================================
// 决定托盘负荷计入哪个操作工
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage2SupplyType {
    #[serde(rename = "VIA_FORNO", alias = "VIA_OVEN")]
    ViaOven, // 经烘炉
    #[serde(rename = "VIA_CARRINHO", alias = "VIA_CART")]
    ViaCart, // 经小车 (计入循环工)
    #[serde(rename = "PALETIZADA", alias = "PALLETIZED")]
    Palletized, // 托盘化 (无操作工负荷)
}

impl fmt::Display for Stage2SupplyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage2SupplyType::ViaOven => write!(f, "VIA_FORNO"),
            Stage2SupplyType::ViaCart => write!(f, "VIA_CARRINHO"),
            Stage2SupplyType::Palletized => write!(f, "PALETIZADA"),
        }
    }
}

// ==========================================
// 烘炉速度 (Oven Speed)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OvenSpeed {
    #[serde(rename = "RAPIDO", alias = "FAST")]
    Fast, // 快速
    #[serde(rename = "LENTO", alias = "SLOW")]
    Slow, // 慢速 (烘炉工可协助小车)
}

impl fmt::Display for OvenSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OvenSpeed::Fast => write!(f, "RAPIDO"),
            OvenSpeed::Slow => write!(f, "LENTO"),
        }
    }
}

// ==========================================
// 生产比例 (Production Scale)
// ==========================================
// 序列化为 JSON 数字: 1 / 0.75 / 0.5
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub enum ProductionScale {
    #[default]
    Full, // 100%
    ThreeQuarters, // 75%
    Half, // 50%
}

impl ProductionScale {
    /// 比例系数
    pub fn factor(&self) -> f64 {
        match self {
            ProductionScale::Full => 1.0,
            ProductionScale::ThreeQuarters => 0.75,
            ProductionScale::Half => 0.5,
        }
    }
}

impl From<ProductionScale> for f64 {
    fn from(scale: ProductionScale) -> Self {
        scale.factor()
    }
}

impl TryFrom<f64> for ProductionScale {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if value == 1.0 {
            Ok(ProductionScale::Full)
        } else if value == 0.75 {
            Ok(ProductionScale::ThreeQuarters)
        } else if value == 0.5 {
            Ok(ProductionScale::Half)
        } else {
            Err(format!("生产比例只允许 1 / 0.75 / 0.5, 实际 {}", value))
        }
    }
}

impl fmt::Display for ProductionScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.factor() * 100.0)
    }
}

// ==========================================
// 操作工角色 (Operator Role)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperatorRole {
    Oven, // 烘炉工
    Cart, // 小车工
}

impl fmt::Display for OperatorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperatorRole::Oven => write!(f, "OVEN"),
            OperatorRole::Cart => write!(f, "CART"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supply_type_accepts_both_codes() {
        let a: Stage2SupplyType = serde_json::from_str("\"VIA_CARRINHO\"").unwrap();
        let b: Stage2SupplyType = serde_json::from_str("\"VIA_CART\"").unwrap();
        assert_eq!(a, Stage2SupplyType::ViaCart);
        assert_eq!(a, b);
        assert_eq!(serde_json::to_string(&a).unwrap(), "\"VIA_CARRINHO\"");
    }

    #[test]
    fn test_production_scale_from_number() {
        let scale: ProductionScale = serde_json::from_str("0.75").unwrap();
        assert_eq!(scale, ProductionScale::ThreeQuarters);
        let full: ProductionScale = serde_json::from_str("1").unwrap();
        assert_eq!(full, ProductionScale::Full);
        assert!(serde_json::from_str::<ProductionScale>("0.6").is_err());
        assert_eq!(serde_json::to_string(&ProductionScale::Half).unwrap(), "0.5");
    }

    #[test]
    fn test_display_matches_wire_code() {
        for dest in [Stage1Destination::Oven, Stage1Destination::NaturalDry] {
            assert_eq!(serde_json::to_string(&dest).unwrap(), format!("\"{}\"", dest));
        }
        for supply in [
            Stage2SupplyType::ViaOven,
            Stage2SupplyType::ViaCart,
            Stage2SupplyType::Palletized,
        ] {
            assert_eq!(serde_json::to_string(&supply).unwrap(), format!("\"{}\"", supply));
        }
        let dry: Stage1Destination = serde_json::from_str("\"NATURAL_DRY\"").unwrap();
        assert_eq!(dry.to_string(), "SECAGEM_NATURAL");
    }
}
