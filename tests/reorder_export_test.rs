// ==========================================
// 补货计划导出集成测试
// ==========================================
// 测试范围:
// 1. CSV 内容: 表头、列顺序、空值
// 2. 文件名与 MIME
// 3. 导出缓存: 命中、按站点区分、重新加载后清空、多线程共享与容量上限
// ==========================================

mod helpers;

use cement_planner::api::{ApiError, DashboardApi};
use cement_planner::engine::{parse_reorder_csv, ReorderRow};
use helpers::dataset_fixture::{DatasetFixture, FORECAST_HEADER};

const EXPECTED_HEADER: &str =
    "date,sim_inventory,recommended_delivery_date,recommended_delivery_quantity,buffer_applied";

#[test]
fn test_export_示例场景() {
    let fixture = DatasetFixture::example();
    let api = DashboardApi::new(fixture.sources.clone(), 32);

    let export = api.export_reorder_csv(Some("S1")).expect("导出失败");

    assert_eq!(export.file_name, "reorder_schedule_S1.csv");
    assert!(export.mime.starts_with("text/csv"));

    let text = std::str::from_utf8(&export.bytes).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some(EXPECTED_HEADER));
    assert_eq!(lines.next(), Some("2024-01-03,65.0,2024-01-05,135.0,0.2"));
    assert_eq!(lines.next(), None);
}

#[test]
fn test_export_内容可解析回补货表() {
    let fixture = DatasetFixture::example();
    let api = DashboardApi::new(fixture.sources.clone(), 32);

    let view = api.render(Some("S2")).unwrap();
    let export = api.export_reorder_csv(Some("S2")).unwrap();

    let parsed: Vec<ReorderRow> = parse_reorder_csv(&export.bytes).unwrap();
    assert_eq!(parsed, view.reorder_table.rows);
}

#[test]
fn test_export_无补货行仅表头() {
    let fixture = DatasetFixture::with_contents(
        "site_id,silo_capacity\nS1,200\n",
        &format!("{}\nS1,2024-01-01,10,100,False,,,\n", FORECAST_HEADER),
    );
    let api = DashboardApi::new(fixture.sources.clone(), 32);

    let export = api.export_reorder_csv(None).unwrap();

    let text = std::str::from_utf8(&export.bytes).unwrap();
    assert_eq!(text.trim_end(), EXPECTED_HEADER);
}

#[test]
fn test_export_未知站点() {
    let fixture = DatasetFixture::example();
    let api = DashboardApi::new(fixture.sources.clone(), 32);

    let err = api.export_reorder_csv(Some("S404")).unwrap_err();

    assert!(matches!(err, ApiError::EmptySubset(_)));
}

#[test]
fn test_export_缓存命中与按站点区分() {
    let fixture = DatasetFixture::example();
    let api = DashboardApi::new(fixture.sources.clone(), 32);

    let first = api.export_reorder_csv(Some("S1")).unwrap();
    let second = api.export_reorder_csv(Some("S1")).unwrap();
    let other = api.export_reorder_csv(Some("S2")).unwrap();

    assert_eq!(first.bytes, second.bytes);
    assert_ne!(first.bytes, other.bytes);

    let stats = api.cache_stats().unwrap();
    assert_eq!(stats.entries, 2);
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 2);
}

#[test]
fn test_export_重新加载后缓存失效() {
    let fixture = DatasetFixture::example();
    let api = DashboardApi::new(fixture.sources.clone(), 32);
    let before = api.export_reorder_csv(Some("S1")).unwrap();

    fixture.write_forecasts(&format!(
        "{}\nS1,2024-01-01,10,100,False,,,\nS1,2024-01-03,15,60,True,2024-01-06,140,0.25\n",
        FORECAST_HEADER
    ));
    api.reload().unwrap();
    assert_eq!(api.cache_stats().unwrap().entries, 0);

    let after = api.export_reorder_csv(Some("S1")).unwrap();
    let text = std::str::from_utf8(&after.bytes).unwrap();

    assert_ne!(before.bytes, after.bytes);
    assert!(text.contains("2024-01-03,60.0,2024-01-06,140.0,0.25"));
}

#[test]
fn test_export_缓存关闭() {
    let fixture = DatasetFixture::example();
    let api = DashboardApi::new(fixture.sources.clone(), 0);

    let first = api.export_reorder_csv(Some("S1")).unwrap();
    let second = api.export_reorder_csv(Some("S1")).unwrap();

    assert_eq!(first.bytes, second.bytes);
    assert_eq!(api.cache_stats().unwrap().entries, 0);
}

#[test]
fn test_export_多线程共享缓存() {
    let fixture = DatasetFixture::example();
    let api = std::sync::Arc::new(DashboardApi::new(fixture.sources.clone(), 1));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let api = std::sync::Arc::clone(&api);
            std::thread::spawn(move || {
                let site = if i % 2 == 0 { "S1" } else { "S2" };
                api.export_reorder_csv(Some(site)).unwrap().bytes.len()
            })
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap() > 0);
    }

    let stats = api.cache_stats().unwrap();
    assert_eq!(stats.hits + stats.misses, 8);
    assert!(stats.entries <= 1);
    assert_eq!(stats.capacity, 1);
}
