// ==========================================
// 整车产线生产跟踪系统 - 领域类型定义
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库、前端一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 工位运行状态 (Station Status Code)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StationStatusCode {
    #[default]
    Idle, // 空闲 / 下班
    Running,   // 运行中
    Stop,      // 停机
    Emergency, // 紧急停机
}

impl StationStatusCode {
    /// 数据库存储值
    pub fn as_str(&self) -> &'static str {
        match self {
            StationStatusCode::Idle => "IDLE",
            StationStatusCode::Running => "RUNNING",
            StationStatusCode::Stop => "STOP",
            StationStatusCode::Emergency => "EMERGENCY",
        }
    }

    /// 从数据库字符串解析
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "IDLE" => Some(StationStatusCode::Idle),
            "RUNNING" => Some(StationStatusCode::Running),
            "STOP" => Some(StationStatusCode::Stop),
            "EMERGENCY" => Some(StationStatusCode::Emergency),
            _ => None,
        }
    }

    /// 是否处于停机（计入停机时长）的状态
    pub fn is_halted(&self) -> bool {
        matches!(self, StationStatusCode::Stop | StationStatusCode::Emergency)
    }
}

impl fmt::Display for StationStatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 质检结果 (Quality)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Quality {
    Ok, // 合格
    Ng, // 不合格
}

impl Quality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Quality::Ok => "OK",
            Quality::Ng => "NG",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "OK" => Some(Quality::Ok),
            "NG" => Some(Quality::Ng),
            _ => None,
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_station_status_code_roundtrip_db_str() {
        for code in [
            StationStatusCode::Idle,
            StationStatusCode::Running,
            StationStatusCode::Stop,
            StationStatusCode::Emergency,
        ] {
            assert_eq!(StationStatusCode::parse(code.as_str()), Some(code));
        }
        assert_eq!(StationStatusCode::parse("running"), Some(StationStatusCode::Running));
        assert_eq!(StationStatusCode::parse("PAUSED"), None);
    }

    #[test]
    fn test_is_halted() {
        assert!(StationStatusCode::Stop.is_halted());
        assert!(StationStatusCode::Emergency.is_halted());
        assert!(!StationStatusCode::Running.is_halted());
        assert!(!StationStatusCode::Idle.is_halted());
    }

    #[test]
    fn test_quality_serde_matches_wire_format() {
        assert_eq!(serde_json::to_string(&Quality::Ok).unwrap(), "\"OK\"");
        assert_eq!(serde_json::to_string(&Quality::Ng).unwrap(), "\"NG\"");
        let q: Quality = serde_json::from_str("\"NG\"").unwrap();
        assert_eq!(q, Quality::Ng);
        assert!(Quality::parse("ok").is_none());
    }
}
