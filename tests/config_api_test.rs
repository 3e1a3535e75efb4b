// ==========================================
// ConfigApi 集成测试
// ==========================================
// 测试范围:
// 1. 配置查询: 默认值与已写入值合并
// 2. 配置更新: 已知键按类型校验，未知键拒绝
// ==========================================

mod helpers;

use assembly_line_tracker::api::config_api::{ConfigItem, UpdateConfigRequest};
use assembly_line_tracker::api::ApiError;
use assembly_line_tracker::config::config_keys;
use helpers::api_test_helper::*;

fn value_of(items: &[ConfigItem], key: &str) -> Option<String> {
    items.iter().find(|c| c.key == key).map(|c| c.value.clone())
}

#[test]
fn test_list_configs_初始为默认值() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    let items = env.config_api.list_configs().expect("查询失败");

    assert_eq!(items.len(), 2);
    assert_eq!(
        value_of(&items, config_keys::SUMMARY_INCLUDE_UNPLANNED_MODELS).as_deref(),
        Some("false")
    );
    assert_eq!(
        value_of(&items, config_keys::DASHBOARD_POLL_INTERVAL_SECS).as_deref(),
        Some("30")
    );

    // 按键排序
    let keys: Vec<_> = items.iter().map(|c| c.key.clone()).collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
}

#[test]
fn test_update_config_生效() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    let item = env
        .config_api
        .update_config(
            config_keys::DASHBOARD_POLL_INTERVAL_SECS,
            UpdateConfigRequest {
                value: " 15 ".to_string(),
            },
        )
        .expect("更新失败");
    assert_eq!(item.value, "15");

    let items = env.config_api.list_configs().unwrap();
    assert_eq!(
        value_of(&items, config_keys::DASHBOARD_POLL_INTERVAL_SECS).as_deref(),
        Some("15")
    );
    assert_eq!(env.config_manager.dashboard_poll_interval_secs().unwrap(), 15);

    env.config_api
        .update_config(
            config_keys::SUMMARY_INCLUDE_UNPLANNED_MODELS,
            UpdateConfigRequest {
                value: "1".to_string(),
            },
        )
        .unwrap();
    assert!(env.config_manager.include_unplanned_models().unwrap());
}

#[test]
fn test_update_config_未知键() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    let result = env.config_api.update_config(
        "scheduler.max_threads",
        UpdateConfigRequest {
            value: "4".to_string(),
        },
    );
    assert!(matches!(result, Err(ApiError::InvalidInput(_))));
    assert_eq!(env.config_api.list_configs().unwrap().len(), 2);
}

#[test]
fn test_update_config_值类型不符() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    let not_bool = env.config_api.update_config(
        config_keys::SUMMARY_INCLUDE_UNPLANNED_MODELS,
        UpdateConfigRequest {
            value: "maybe".to_string(),
        },
    );
    assert!(matches!(not_bool, Err(ApiError::InvalidInput(_))));

    let zero = env.config_api.update_config(
        config_keys::DASHBOARD_POLL_INTERVAL_SECS,
        UpdateConfigRequest {
            value: "0".to_string(),
        },
    );
    assert!(matches!(zero, Err(ApiError::InvalidInput(_))));

    // 原值保持
    assert_eq!(env.config_manager.dashboard_poll_interval_secs().unwrap(), 30);
    assert!(!env.config_manager.include_unplanned_models().unwrap());
}
