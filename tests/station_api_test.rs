// ==========================================
// StationApi 集成测试
// ==========================================
// 测试范围:
// 1. 工位主数据维护
// 2. 状态迁移记账: 开工/收工时刻、停机记录开启/结束、停机分钟累加
// 3. 跨日停机: 累加到停机开始当日
// 4. 删除约束
// ==========================================

mod helpers;

use chrono::{NaiveDate, NaiveTime};

use assembly_line_tracker::api::station_api::UpdateStationRequest;
use assembly_line_tracker::api::ApiError;
use assembly_line_tracker::domain::{StationDailyStatus, StationStatusCode};
use helpers::api_test_helper::*;
use helpers::test_data_builder::{local_at, status_req};

fn daily_of(env: &ApiTestEnv, station_id: &str, date: &str) -> StationDailyStatus {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
    env.station_daily_repo
        .find_by_station_date(station_id, date)
        .expect("查询日状态失败")
        .expect("日状态不存在")
}

fn hms(h: u32, m: u32, s: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, s).unwrap()
}

// ==========================================
// 主数据维护
// ==========================================

#[test]
fn test_create_station_默认值() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    let station = env.seed_station("总装一线");
    assert!(station.is_active);
    assert_eq!(station.current_status_code, StationStatusCode::Idle);
    assert!(station.current_status_brief.is_none());

    let fetched = env.station_api.get_station(&station.id).unwrap();
    assert_eq!(fetched, station);
}

#[test]
fn test_list_active_stations_排除停用工位() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let active = env.seed_station("车身焊装");
    let retired = env.seed_station("旧涂装线");

    env.station_api
        .update_station(
            &retired.id,
            UpdateStationRequest {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .unwrap();

    let all = env.station_api.list_stations().unwrap();
    assert_eq!(all.len(), 2);

    let listed = env.station_api.list_active_stations().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, active.id);
}

#[test]
fn test_update_station_名称为空() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let station = env.seed_station("总装一线");

    let result = env.station_api.update_station(
        &station.id,
        UpdateStationRequest {
            station_name: Some("".to_string()),
            ..Default::default()
        },
    );
    assert!(matches!(result, Err(ApiError::InvalidInput(_))));
}

#[test]
fn test_delete_station_被日状态引用() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let station = env.seed_station("总装一线");

    env.station_api
        .update_status_at(&station.id, status_req("RUNNING", None), local_at(2026, 1, 12, 8, 0, 0))
        .unwrap();

    let result = env.station_api.delete_station(&station.id);
    assert!(matches!(result, Err(ApiError::Conflict(_))));
    assert!(env.station_api.get_station(&station.id).is_ok());
}

#[test]
fn test_delete_station_不存在() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    let result = env.station_api.delete_station("missing");
    assert!(matches!(result, Err(ApiError::NotFound(_))));

    let station = env.seed_station("总装一线");
    env.station_api.delete_station(&station.id).unwrap();
    assert!(matches!(
        env.station_api.get_station(&station.id),
        Err(ApiError::NotFound(_))
    ));
}

// ==========================================
// 状态迁移记账
// ==========================================

#[test]
fn test_update_status_开工记录开工时刻() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let station = env.seed_station("总装一线");

    let updated = env
        .station_api
        .update_status_at(&station.id, status_req("RUNNING", None), local_at(2026, 1, 12, 8, 0, 0))
        .unwrap();
    assert_eq!(updated.current_status_code, StationStatusCode::Running);

    let daily = daily_of(&env, &station.id, "2026-01-12");
    assert_eq!(daily.start_time, Some(hms(8, 0, 0)));
    assert!(daily.stop_time.is_none());

    // 同日再次开工不覆盖开工时刻
    env.station_api
        .update_status_at(&station.id, status_req("IDLE", None), local_at(2026, 1, 12, 12, 0, 0))
        .unwrap();
    env.station_api
        .update_status_at(&station.id, status_req("RUNNING", None), local_at(2026, 1, 12, 13, 0, 0))
        .unwrap();
    let daily = daily_of(&env, &station.id, "2026-01-12");
    assert_eq!(daily.start_time, Some(hms(8, 0, 0)));
    assert_eq!(daily.stop_time, Some(hms(12, 0, 0)));
}

#[test]
fn test_update_status_停机与恢复() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let station = env.seed_station("总装一线");

    env.station_api
        .update_status_at(&station.id, status_req("RUNNING", None), local_at(2026, 1, 12, 8, 0, 0))
        .unwrap();
    let stopped = env
        .station_api
        .update_status_at(
            &station.id,
            status_req("STOP", Some("缺料")),
            local_at(2026, 1, 12, 10, 0, 0),
        )
        .unwrap();
    assert_eq!(stopped.current_status_code, StationStatusCode::Stop);
    assert_eq!(stopped.current_status_brief.as_deref(), Some("缺料"));

    let daily = daily_of(&env, &station.id, "2026-01-12");
    let logs = env.station_daily_api.list_downtime_logs_by_daily(&daily.id).unwrap();
    assert_eq!(logs.len(), 1);
    assert!(logs[0].is_open());
    assert_eq!(logs[0].reason.as_deref(), Some("缺料"));

    env.station_api
        .update_status_at(&station.id, status_req("RUNNING", None), local_at(2026, 1, 12, 10, 25, 30))
        .unwrap();

    let logs = env.station_daily_api.list_downtime_logs_by_daily(&daily.id).unwrap();
    assert!(!logs[0].is_open());
    assert_eq!(logs[0].duration_minutes(), Some(25));

    let daily = daily_of(&env, &station.id, "2026-01-12");
    assert_eq!(daily.total_downtime, Some(25), "不足一分钟部分舍去");
}

#[test]
fn test_update_status_多次停机累加() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let station = env.seed_station("总装一线");
    let id = station.id.as_str();

    env.station_api
        .update_status_at(id, status_req("RUNNING", None), local_at(2026, 1, 12, 8, 0, 0))
        .unwrap();
    env.station_api
        .update_status_at(id, status_req("STOP", Some("换型")), local_at(2026, 1, 12, 9, 0, 0))
        .unwrap();
    env.station_api
        .update_status_at(id, status_req("RUNNING", None), local_at(2026, 1, 12, 9, 10, 0))
        .unwrap();
    env.station_api
        .update_status_at(id, status_req("EMERGENCY", Some("急停")), local_at(2026, 1, 12, 14, 0, 0))
        .unwrap();
    env.station_api
        .update_status_at(id, status_req("RUNNING", None), local_at(2026, 1, 12, 14, 45, 0))
        .unwrap();

    let daily = daily_of(&env, id, "2026-01-12");
    assert_eq!(daily.total_downtime, Some(10 + 45));

    let logs = env.station_daily_api.list_downtime_logs_by_daily(&daily.id).unwrap();
    assert_eq!(logs.len(), 2);
    assert!(logs.iter().all(|l| !l.is_open()));
}

#[test]
fn test_update_status_收工记录收工时刻() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let station = env.seed_station("总装一线");

    env.station_api
        .update_status_at(&station.id, status_req("RUNNING", None), local_at(2026, 1, 12, 8, 0, 0))
        .unwrap();
    env.station_api
        .update_status_at(&station.id, status_req("IDLE", None), local_at(2026, 1, 12, 17, 30, 0))
        .unwrap();

    let daily = daily_of(&env, &station.id, "2026-01-12");
    assert_eq!(daily.stop_time, Some(hms(17, 30, 0)));
    assert!(env
        .station_daily_api
        .list_downtime_logs_by_daily(&daily.id)
        .unwrap()
        .is_empty());
}

#[test]
fn test_update_status_停机后收工结束停机记录() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let station = env.seed_station("总装一线");
    let id = station.id.as_str();

    env.station_api
        .update_status_at(id, status_req("RUNNING", None), local_at(2026, 1, 12, 8, 0, 0))
        .unwrap();
    env.station_api
        .update_status_at(id, status_req("STOP", Some("缺料")), local_at(2026, 1, 12, 16, 0, 0))
        .unwrap();
    env.station_api
        .update_status_at(id, status_req("IDLE", None), local_at(2026, 1, 12, 16, 20, 0))
        .unwrap();

    let daily = daily_of(&env, id, "2026-01-12");
    assert_eq!(daily.stop_time, Some(hms(16, 20, 0)));
    assert_eq!(daily.total_downtime, Some(20));
    assert!(env
        .station_daily_repo
        .find_latest_open_log_for_station(id)
        .unwrap()
        .is_none());

    // 次日开工不再关闭前一天的记录
    env.station_api
        .update_status_at(id, status_req("RUNNING", None), local_at(2026, 1, 13, 8, 0, 0))
        .unwrap();
    let daily = daily_of(&env, id, "2026-01-12");
    assert_eq!(daily.total_downtime, Some(20));
    let logs = env.station_daily_api.list_downtime_logs_by_daily(&daily.id).unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].duration_minutes(), Some(20));
}

#[test]
fn test_update_status_空闲到急停不记停机() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let station = env.seed_station("总装一线");

    let updated = env
        .station_api
        .update_status_at(
            &station.id,
            status_req("EMERGENCY", Some("安全检查")),
            local_at(2026, 1, 12, 7, 0, 0),
        )
        .unwrap();
    assert_eq!(updated.current_status_code, StationStatusCode::Emergency);

    assert!(env.station_daily_api.list_downtime_logs().unwrap().is_empty());
    assert!(env
        .station_daily_api
        .list_daily_status_by_station(&station.id)
        .unwrap()
        .is_empty());

    // 从急停恢复时无未结束停机记录，仍可正常开工
    env.station_api
        .update_status_at(&station.id, status_req("RUNNING", None), local_at(2026, 1, 12, 7, 30, 0))
        .unwrap();
    let daily = daily_of(&env, &station.id, "2026-01-12");
    assert_eq!(daily.start_time, Some(hms(7, 30, 0)));
    assert!(daily.total_downtime.is_none());
}

#[test]
fn test_update_status_跨日停机累加到开始日() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let station = env.seed_station("总装一线");
    let id = station.id.as_str();

    env.station_api
        .update_status_at(id, status_req("RUNNING", None), local_at(2026, 1, 12, 20, 0, 0))
        .unwrap();
    env.station_api
        .update_status_at(id, status_req("STOP", Some("设备故障")), local_at(2026, 1, 12, 23, 50, 0))
        .unwrap();
    env.station_api
        .update_status_at(id, status_req("RUNNING", None), local_at(2026, 1, 13, 0, 20, 0))
        .unwrap();

    let day1 = daily_of(&env, id, "2026-01-12");
    assert_eq!(day1.total_downtime, Some(30));

    let day2 = daily_of(&env, id, "2026-01-13");
    assert_eq!(day2.start_time, Some(hms(0, 20, 0)));
    assert!(day2.total_downtime.is_none());
}

#[test]
fn test_update_status_无效状态码() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let station = env.seed_station("总装一线");

    let result = env.station_api.update_status_at(
        &station.id,
        status_req("PAUSED", None),
        local_at(2026, 1, 12, 8, 0, 0),
    );
    assert!(matches!(result, Err(ApiError::InvalidInput(_))));

    let missing = env.station_api.update_status_at(
        "missing",
        status_req("RUNNING", None),
        local_at(2026, 1, 12, 8, 0, 0),
    );
    assert!(matches!(missing, Err(ApiError::NotFound(_))));
}
