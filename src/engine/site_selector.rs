// ==========================================
// 水泥库存计划看板 - 站点选择器
// ==========================================
// 职责: 站点列表（去重升序）+ 当前选择 + 站点子集
// 排序: 子集显式按日期稳定排序,不依赖源文件顺序
// ==========================================

use crate::domain::forecast::ForecastRecord;
use crate::engine::error::{EngineError, EngineResult};
use std::collections::BTreeSet;

/// 单站点的预测记录子集（按日期升序）
#[derive(Debug, Clone)]
pub struct SiteSubset<'a> {
    pub site_id: String,
    pub records: Vec<&'a ForecastRecord>,
}

impl<'a> SiteSubset<'a> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a ForecastRecord> + '_ {
        self.records.iter().copied()
    }
}

pub struct SiteSelector {
    sites: Vec<String>,
}

impl SiteSelector {
    pub fn new(records: &[ForecastRecord]) -> Self {
        let sites: BTreeSet<&str> = records.iter().map(|r| r.site_id.as_str()).collect();
        Self {
            sites: sites.into_iter().map(str::to_string).collect(),
        }
    }

    /// 去重后升序的站点列表
    pub fn sites(&self) -> &[String] {
        &self.sites
    }

    /// 解析当前选择
    ///
    /// # 规则
    /// - 未选择（或空白）→ 列表第一个站点
    /// - 已选择 → 原样返回（未知站点由后续空子集策略处理）
    pub fn select(&self, requested: Option<&str>) -> EngineResult<String> {
        match requested.map(str::trim).filter(|s| !s.is_empty()) {
            Some(site_id) => Ok(site_id.to_string()),
            None => self.sites.first().cloned().ok_or(EngineError::NoSites),
        }
    }

    /// 按站点过滤并按日期排序
    pub fn subset<'a>(records: &'a [ForecastRecord], site_id: &str) -> SiteSubset<'a> {
        let mut selected: Vec<&ForecastRecord> =
            records.iter().filter(|r| r.site_id == site_id).collect();
        selected.sort_by_key(|r| r.date);

        SiteSubset {
            site_id: site_id.to_string(),
            records: selected,
        }
    }
}
