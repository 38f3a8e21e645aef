// ==========================================
// 成型产线产能系统 - 产品目录
// ==========================================
// 红线: pieces_per_tray > 0 (引擎中作为除数)
// 校验在录入边界完成, 引擎不再防御
// ==========================================

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 产品校验错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProductError {
    #[error("产品ID为空")]
    EmptyId,

    #[error("产品名称为空 (id={0})")]
    EmptyName(String),

    #[error("每托盘件数必须大于0 (id={0})")]
    ZeroPiecesPerTray(String),

    #[error("数值非法 (id={id}, 字段 {field}): {value}")]
    InvalidNumber {
        id: String,
        field: &'static str,
        value: f64,
    },
}

/// 产品
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub pieces_per_tray: u32,  // 每托盘件数
    pub stage1_rate: f64,      // 一段单机产量 (件/小时)
    pub stage2_target: f64,    // 二段单机目标 (件/小时)
    #[serde(default)]
    pub packaging_factor: f64, // 包装负荷系数 (人/台)
}

impl Product {
    /// 创建并校验产品
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        pieces_per_tray: u32,
        stage1_rate: f64,
        stage2_target: f64,
        packaging_factor: f64,
    ) -> Result<Self, ProductError> {
        let product = Self {
            id: id.into(),
            name: name.into(),
            pieces_per_tray,
            stage1_rate,
            stage2_target,
            packaging_factor,
        };
        product.validate()?;
        Ok(product)
    }

    /// 录入边界校验
    pub fn validate(&self) -> Result<(), ProductError> {
        if self.id.trim().is_empty() {
            return Err(ProductError::EmptyId);
        }
        if self.name.trim().is_empty() {
            return Err(ProductError::EmptyName(self.id.clone()));
        }
        if self.pieces_per_tray == 0 {
            return Err(ProductError::ZeroPiecesPerTray(self.id.clone()));
        }

        let numbers = [
            ("stage1Rate", self.stage1_rate),
            ("stage2Target", self.stage2_target),
            ("packagingFactor", self.packaging_factor),
        ];
        for (field, value) in numbers {
            if !value.is_finite() || value < 0.0 {
                return Err(ProductError::InvalidNumber {
                    id: self.id.clone(),
                    field,
                    value,
                });
            }
        }
        Ok(())
    }

    /// 一段单机托盘产量 (托盘/小时)
    pub fn stage1_trays_per_hour(&self) -> f64 {
        self.stage1_rate / f64::from(self.pieces_per_tray)
    }
}

/// 初始产品目录
pub fn initial_products() -> Vec<Product> {
    vec![
        Product {
            id: "p1".to_string(),
            name: "Model X-100".to_string(),
            pieces_per_tray: 12,
            stage1_rate: 1200.0,
            stage2_target: 500.0,
            packaging_factor: 0.2,
        },
        Product {
            id: "p2".to_string(),
            name: "Model Y-Pro".to_string(),
            pieces_per_tray: 8,
            stage1_rate: 900.0,
            stage2_target: 400.0,
            packaging_factor: 0.3,
        },
        Product {
            id: "p3".to_string(),
            name: "Model Eco-Z".to_string(),
            pieces_per_tray: 20,
            stage1_rate: 2000.0,
            stage2_target: 800.0,
            packaging_factor: 0.15,
        },
    ]
}
