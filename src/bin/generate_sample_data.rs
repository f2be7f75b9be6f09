// ==========================================
// 示例数据生成器
// ==========================================
// 用途: 生成看板可直接加载的两份示例数据
// 输出: <目录>/historical_kpi_summary.csv
//       <目录>/cement_forecast_results.csv
// 用法: generate_sample_data [输出目录,默认 ./data]
// ==========================================

use anyhow::Context;
use cement_planner::config::{FORECAST_RESULTS_FILE, KPI_SUMMARY_FILE};
use chrono::{Duration, NaiveDate};
use csv::Writer;
use std::path::PathBuf;

const FORECAST_DAYS: i64 = 60;
const LEAD_TIME_DAYS: i64 = 3;
const BUFFER: f64 = 0.15;

// 站点参数
struct SiteProfile {
    site_id: &'static str,
    silo_capacity: f64,
    base_consumption: f64,
    reorder_point: f64,
}

const SITES: &[SiteProfile] = &[
    SiteProfile {
        site_id: "MIG-ALGIERS",
        silo_capacity: 5000.0,
        base_consumption: 180.0,
        reorder_point: 1500.0,
    },
    SiteProfile {
        site_id: "MIG-ORAN",
        silo_capacity: 3500.0,
        base_consumption: 120.0,
        reorder_point: 1000.0,
    },
    SiteProfile {
        site_id: "MIG-SETIF",
        silo_capacity: 2500.0,
        base_consumption: 95.0,
        reorder_point: 800.0,
    },
];

/// 确定性的日消耗波动（周内节律 + 站点偏移）
fn daily_consumption(profile: &SiteProfile, day: i64, site_index: usize) -> f64 {
    let weekday_factor = [1.0, 1.1, 1.15, 1.05, 0.95, 0.7, 0.6][(day % 7) as usize];
    let drift = ((day + site_index as i64 * 3) % 11) as f64 * 0.01;
    (profile.base_consumption * (weekday_factor + drift)).round()
}

fn write_kpi_summary(path: &PathBuf) -> anyhow::Result<()> {
    let mut writer = Writer::from_path(path)
        .with_context(|| format!("无法创建文件: {}", path.display()))?;
    writer.write_record(["site_id", "silo_capacity"])?;
    for profile in SITES {
        writer.write_record([profile.site_id.to_string(), format!("{:.0}", profile.silo_capacity)])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_forecasts(path: &PathBuf, start: NaiveDate) -> anyhow::Result<usize> {
    let mut writer = Writer::from_path(path)
        .with_context(|| format!("无法创建文件: {}", path.display()))?;
    writer.write_record([
        "site_id",
        "date",
        "forecasted_consumption",
        "sim_inventory",
        "reorder_flag",
        "recommended_delivery_date",
        "recommended_delivery_quantity",
        "buffer_applied",
    ])?;

    let mut rows = 0;
    for (site_index, profile) in SITES.iter().enumerate() {
        let mut inventory = profile.silo_capacity * 0.8;
        // 在途补货: (到货日序号, 数量)
        let mut pending: Option<(i64, f64)> = None;

        for day in 0..FORECAST_DAYS {
            let date = start + Duration::days(day);

            if let Some((arrival, quantity)) = pending {
                if arrival == day {
                    inventory = (inventory + quantity).min(profile.silo_capacity);
                    pending = None;
                }
            }

            let consumption = daily_consumption(profile, day, site_index);
            inventory = (inventory - consumption).max(0.0);

            let reorder = pending.is_none() && inventory <= profile.reorder_point;
            let (delivery_date, delivery_quantity, buffer) = if reorder {
                let quantity = ((profile.silo_capacity - inventory) * (1.0 - BUFFER)).round();
                pending = Some((day + LEAD_TIME_DAYS, quantity));
                (
                    (date + Duration::days(LEAD_TIME_DAYS)).format("%Y-%m-%d").to_string(),
                    format!("{:.0}", quantity),
                    format!("{:.2}", BUFFER),
                )
            } else {
                (String::new(), String::new(), String::new())
            };

            writer.write_record([
                profile.site_id.to_string(),
                date.format("%Y-%m-%d").to_string(),
                format!("{:.0}", consumption),
                format!("{:.1}", inventory),
                if reorder { "True" } else { "False" }.to_string(),
                delivery_date,
                delivery_quantity,
                buffer,
            ])?;
            rows += 1;
        }
    }

    writer.flush()?;
    Ok(rows)
}

fn main() -> anyhow::Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("./data"));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("无法创建目录: {}", out_dir.display()))?;

    println!("开始生成示例数据集...");

    let kpi_path = out_dir.join(KPI_SUMMARY_FILE);
    write_kpi_summary(&kpi_path)?;
    println!("✓ {} ({} 个站点)", kpi_path.display(), SITES.len());

    let start = NaiveDate::from_ymd_opt(2024, 1, 1).context("起始日期无效")?;
    let forecast_path = out_dir.join(FORECAST_RESULTS_FILE);
    let rows = write_forecasts(&forecast_path, start)?;
    println!("✓ {} ({} 行)", forecast_path.display(), rows);

    Ok(())
}
