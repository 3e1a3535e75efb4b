// ==========================================
// 整车产线生产跟踪系统 - 工位状态迁移引擎
// ==========================================
// 规则:
// - RUNNING → STOP/EMERGENCY: 开启停机记录
// - STOP/EMERGENCY → RUNNING/IDLE: 结束最近一条停机记录并累加当日停机分钟
// - → RUNNING: 当日开工时刻未设置时记为当前时刻
// - → IDLE: 当日收工时刻未设置时记为当前时刻
// - 其它迁移（如 IDLE → EMERGENCY、STOP → EMERGENCY）不做停机记账
// ==========================================

use crate::domain::types::StationStatusCode;

/// 一次状态迁移需要执行的记账动作
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransitionEffects {
    pub open_downtime: bool,
    pub close_downtime: bool,
    pub mark_day_start: bool,
    pub mark_day_stop: bool,
}

impl TransitionEffects {
    /// 是否需要触碰当日的日状态记录
    pub fn touches_daily_status(&self) -> bool {
        self.open_downtime || self.mark_day_start || self.mark_day_stop
    }
}

/// 工位状态迁移引擎
#[derive(Debug, Default)]
pub struct StationStateEngine;

impl StationStateEngine {
    pub fn new() -> Self {
        Self
    }

    /// 计算 from → to 的记账动作
    pub fn plan_transition(
        &self,
        from: StationStatusCode,
        to: StationStatusCode,
    ) -> TransitionEffects {
        if from == to {
            return TransitionEffects::default();
        }

        TransitionEffects {
            open_downtime: from == StationStatusCode::Running && to.is_halted(),
            close_downtime: from.is_halted()
                && matches!(to, StationStatusCode::Running | StationStatusCode::Idle),
            mark_day_start: to == StationStatusCode::Running,
            mark_day_stop: to == StationStatusCode::Idle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use StationStatusCode::*;

    #[test]
    fn test_running_to_halt_opens_downtime() {
        let engine = StationStateEngine::new();
        for to in [Stop, Emergency] {
            let fx = engine.plan_transition(Running, to);
            assert!(fx.open_downtime);
            assert!(!fx.close_downtime);
            assert!(fx.touches_daily_status());
        }
    }

    #[test]
    fn test_halt_to_running_closes_downtime() {
        let engine = StationStateEngine::new();
        for from in [Stop, Emergency] {
            let fx = engine.plan_transition(from, Running);
            assert!(fx.close_downtime);
            assert!(!fx.open_downtime);
            assert!(fx.mark_day_start);
        }
    }

    #[test]
    fn test_to_idle_marks_stop() {
        let engine = StationStateEngine::new();
        let fx = engine.plan_transition(Running, Idle);
        assert_eq!(
            fx,
            TransitionEffects {
                mark_day_stop: true,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_halt_to_idle_closes_downtime_and_marks_stop() {
        let engine = StationStateEngine::new();
        for from in [Stop, Emergency] {
            let fx = engine.plan_transition(from, Idle);
            assert_eq!(
                fx,
                TransitionEffects {
                    close_downtime: true,
                    mark_day_stop: true,
                    ..Default::default()
                }
            );
        }
    }

    #[test]
    fn test_undefined_transitions_have_no_downtime_bookkeeping() {
        let engine = StationStateEngine::new();
        for (from, to) in [(Idle, Emergency), (Idle, Stop), (Stop, Emergency), (Emergency, Stop)] {
            let fx = engine.plan_transition(from, to);
            assert!(!fx.open_downtime, "{} -> {}", from, to);
            assert!(!fx.close_downtime, "{} -> {}", from, to);
        }
        assert_eq!(engine.plan_transition(Running, Running), TransitionEffects::default());
    }
}
