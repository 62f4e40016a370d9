//! 暴露评估器
//!
//! 组合给药信息、家属名单和剂量标准，为每位家属的每个接触场景给出安全时刻。
//! 评估器不读取时钟，"当前时刻"由调用方每次传入，因此可以按任意频率重复调用。

use crate::radiation::{
    activity_at_time, decay_constant, remaining_activity_percent, safe_distance, time_to_safe,
};
use chrono::{DateTime, Utc};
use hugtime_catalog::{
    limit_for, nuclide, ContactScenario, FamilyMember, Nuclide, Procedure, CONTACT_SCENARIOS,
};
use hugtime_core::utils::{millis_to_ceil_seconds, msv_to_usv, MILLIS_PER_HOUR};
use hugtime_core::{
    ContactStatus, DoseStandard, ExposureReport, ExposureSnapshot, HugTimeError, PatientDose,
    Result, ScenarioResult,
};

/// 计算当前安全距离时使用的居留因子 (日常近距离相处)
pub const DEFAULT_CASUAL_OCCUPANCY_FACTOR: f64 = 0.25;

/// 暴露评估器
#[derive(Debug, Clone)]
pub struct ExposureEvaluator {
    scenarios: Vec<ContactScenario>,
    casual_occupancy_factor: f64,
}

/// 解析后的给药信息
#[derive(Debug, Clone, Copy)]
struct ResolvedDose {
    nuclide: &'static Nuclide,
    procedure: &'static Procedure,
    a0_mbq: f64,
    injection_time: DateTime<Utc>,
}

impl ExposureEvaluator {
    /// 使用三个标准接触场景创建评估器
    pub fn new() -> Self {
        Self {
            scenarios: CONTACT_SCENARIOS.to_vec(),
            casual_occupancy_factor: DEFAULT_CASUAL_OCCUPANCY_FACTOR,
        }
    }

    /// 设置安全距离使用的居留因子
    pub fn with_casual_occupancy_factor(mut self, occupancy_factor: f64) -> Self {
        self.casual_occupancy_factor = occupancy_factor;
        self
    }

    pub fn casual_occupancy_factor(&self) -> f64 {
        self.casual_occupancy_factor
    }

    pub fn scenarios(&self) -> &[ContactScenario] {
        &self.scenarios
    }

    /// 执行一次完整评估
    ///
    /// 给药信息不完整时返回 `NotReady`，注射时间晚于 `now` 时返回 `InvalidTime`。
    pub fn evaluate(
        &self,
        dose: &PatientDose,
        family: &[FamilyMember],
        standard: DoseStandard,
        now: DateTime<Utc>,
    ) -> Result<ExposureReport> {
        let resolved = Self::resolve_dose(dose)?;

        let elapsed_millis = (now - resolved.injection_time).num_milliseconds() as f64;
        if elapsed_millis < 0.0 {
            tracing::warn!(
                "Rejecting evaluation: injection time {} is after {}",
                resolved.injection_time,
                now
            );
            return Err(HugTimeError::InvalidTime {
                injection_time: resolved.injection_time,
                now,
            });
        }
        let elapsed_hours = elapsed_millis / MILLIS_PER_HOUR;

        let lambda = decay_constant(resolved.procedure.effective_half_life_hours);
        let current_activity = activity_at_time(resolved.a0_mbq, lambda, elapsed_hours);

        let members = family
            .iter()
            .map(|member| {
                self.evaluate_member(&resolved, member, standard, lambda, current_activity, elapsed_millis)
            })
            .collect();

        tracing::debug!(
            "Evaluated {} family members for {} at {:.3}h after injection",
            family.len(),
            resolved.procedure.id,
            elapsed_hours
        );

        Ok(ExposureReport {
            evaluated_at: now,
            elapsed_hours,
            current_activity_mbq: current_activity,
            remaining_activity_percent: remaining_activity_percent(lambda, elapsed_hours),
            members,
        })
    }

    /// 检查必填字段并查找核素与诊疗项目
    fn resolve_dose(dose: &PatientDose) -> Result<ResolvedDose> {
        let nuclide_id = dose
            .nuclide_id
            .ok_or_else(|| HugTimeError::NotReady("nuclide_id".to_string()))?;
        let procedure_id = dose
            .procedure_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| HugTimeError::NotReady("procedure_id".to_string()))?;
        let a0_mbq = dose
            .dose_mbq
            .filter(|d| d.is_finite() && *d > 0.0)
            .ok_or_else(|| HugTimeError::NotReady("dose_mbq".to_string()))?;
        let injection_time = dose
            .injection_time
            .ok_or_else(|| HugTimeError::NotReady("injection_time".to_string()))?;

        let nuclide = nuclide(nuclide_id);
        let procedure = nuclide.procedure(procedure_id).ok_or_else(|| {
            HugTimeError::NotFound(format!(
                "Procedure {} not found for nuclide {}",
                procedure_id, nuclide_id
            ))
        })?;

        Ok(ResolvedDose {
            nuclide,
            procedure,
            a0_mbq,
            injection_time,
        })
    }

    fn evaluate_member(
        &self,
        dose: &ResolvedDose,
        member: &FamilyMember,
        standard: DoseStandard,
        lambda: f64,
        current_activity: f64,
        elapsed_millis: f64,
    ) -> ExposureSnapshot {
        let dose_limit_usv = msv_to_usv(limit_for(standard, member.category()));
        let gamma = dose.nuclide.gamma;

        let scenarios = self
            .scenarios
            .iter()
            .map(|scenario| {
                let hug_time_hours = time_to_safe(
                    gamma,
                    dose.a0_mbq,
                    lambda,
                    scenario.distance_m,
                    scenario.occupancy_factor,
                    dose_limit_usv,
                );

                ScenarioResult {
                    scenario_id: scenario.id.to_string(),
                    hug_time_hours,
                    status: contact_status(hug_time_hours, elapsed_millis),
                }
            })
            .collect();

        ExposureSnapshot {
            member_id: member.id(),
            scenarios,
            current_safe_distance_m: safe_distance(
                gamma,
                current_activity,
                lambda,
                self.casual_occupancy_factor,
                dose_limit_usv,
            ),
        }
    }
}

impl Default for ExposureEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

/// 把交叉时刻 (自注射起的小时数) 换算为相对当前时刻的状态
fn contact_status(hug_time_hours: f64, elapsed_millis: f64) -> ContactStatus {
    if !hug_time_hours.is_finite() {
        return ContactStatus::Unreachable;
    }

    let remaining_millis = hug_time_hours * MILLIS_PER_HOUR - elapsed_millis;
    if remaining_millis <= 0.0 {
        ContactStatus::SafeNow
    } else {
        ContactStatus::Countdown {
            remaining_seconds: millis_to_ceil_seconds(remaining_millis),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use hugtime_catalog::{procedure, HUG_SCENARIO_ID, SAME_HOUSE_SCENARIO_ID};
    use hugtime_core::{AgeCategory, NuclideId};

    fn injected_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 9, 0, 0).unwrap()
    }

    fn ablation_dose() -> PatientDose {
        PatientDose::new(NuclideId::I131, "i131-ablation", 3700.0, injected_at())
    }

    fn family() -> Vec<FamilyMember> {
        vec![
            FamilyMember::new("爸爸", 45, false, DoseStandard::Icrp),
            FamilyMember::new("宝宝", 1, false, DoseStandard::Icrp),
            FamilyMember::new("妈妈", 33, true, DoseStandard::Icrp),
        ]
    }

    #[test]
    fn test_missing_fields_are_not_ready() {
        let evaluator = ExposureEvaluator::new();
        let now = injected_at() + Duration::hours(1);

        let cases = [
            (PatientDose { nuclide_id: None, ..ablation_dose() }, "nuclide_id"),
            (PatientDose { procedure_id: None, ..ablation_dose() }, "procedure_id"),
            (PatientDose { procedure_id: Some(" ".into()), ..ablation_dose() }, "procedure_id"),
            (PatientDose { dose_mbq: None, ..ablation_dose() }, "dose_mbq"),
            (PatientDose { dose_mbq: Some(0.0), ..ablation_dose() }, "dose_mbq"),
            (PatientDose { injection_time: None, ..ablation_dose() }, "injection_time"),
        ];

        for (dose, field) in cases {
            match evaluator.evaluate(&dose, &family(), DoseStandard::Icrp, now) {
                Err(HugTimeError::NotReady(f)) => assert_eq!(f, field),
                other => panic!("expected NotReady({}), got {:?}", field, other),
            }
        }

        let empty = PatientDose::default();
        assert!(evaluator
            .evaluate(&empty, &family(), DoseStandard::Icrp, now)
            .unwrap_err()
            .is_not_ready());
    }

    #[test]
    fn test_procedure_must_belong_to_nuclide() {
        let evaluator = ExposureEvaluator::new();
        let dose = PatientDose::new(NuclideId::Tc99m, "i131-ablation", 740.0, injected_at());

        let result = evaluator.evaluate(&dose, &family(), DoseStandard::Icrp, injected_at());
        assert!(matches!(result, Err(HugTimeError::NotFound(_))));
    }

    #[test]
    fn test_future_injection_is_invalid_time() {
        let evaluator = ExposureEvaluator::new();
        let now = injected_at() - Duration::seconds(1);

        let result = evaluator.evaluate(&ablation_dose(), &family(), DoseStandard::Icrp, now);
        assert!(matches!(result, Err(HugTimeError::InvalidTime { .. })));
    }

    #[test]
    fn test_at_injection_time() {
        let evaluator = ExposureEvaluator::new();
        let report = evaluator
            .evaluate(&ablation_dose(), &family(), DoseStandard::Icrp, injected_at())
            .unwrap();

        assert_eq!(report.elapsed_hours, 0.0);
        assert_eq!(report.current_activity_mbq, 3700.0);
        assert_eq!(report.remaining_activity_percent, 100.0);
        assert_eq!(report.members.len(), 3);
        for member in &report.members {
            assert_eq!(member.scenarios.len(), 3);
        }
    }

    #[test]
    fn test_remaining_percent_after_one_half_life() {
        let evaluator = ExposureEvaluator::new();
        let now = injected_at() + Duration::hours(16);
        let report = evaluator
            .evaluate(&ablation_dose(), &family(), DoseStandard::Icrp, now)
            .unwrap();

        assert!((report.remaining_activity_percent - 50.0).abs() < 1e-9);
        assert!((report.current_activity_mbq - 1850.0).abs() < 1e-6);
    }

    #[test]
    fn test_hug_countdown_matches_engine() {
        let evaluator = ExposureEvaluator::new();
        let now = injected_at() + Duration::hours(2);
        let members = family();
        let report = evaluator
            .evaluate(&ablation_dose(), &members, DoseStandard::Icrp, now)
            .unwrap();

        let lambda = decay_constant(16.0);
        let expected_hours = time_to_safe(0.066, 3700.0, lambda, 0.3, 0.05, 1000.0);
        let expected_seconds = ((expected_hours - 2.0) * 3600.0).ceil() as u64;

        let adult = report.member(members[0].id()).unwrap();
        let hug = adult.scenario(HUG_SCENARIO_ID).unwrap();
        assert_eq!(hug.hug_time_hours, expected_hours);
        let remaining = hug.status.remaining_seconds().unwrap();
        assert!(remaining.abs_diff(expected_seconds) <= 1);
        assert!(!hug.is_safe_now());
    }

    #[test]
    fn test_infant_waits_longer_than_adult() {
        let evaluator = ExposureEvaluator::new();
        let members = family();
        let report = evaluator
            .evaluate(&ablation_dose(), &members, DoseStandard::Icrp, injected_at())
            .unwrap();

        assert_eq!(members[1].category(), AgeCategory::Infant);
        let adult = report.member(members[0].id()).unwrap().scenario(HUG_SCENARIO_ID).unwrap();
        let infant = report.member(members[1].id()).unwrap().scenario(HUG_SCENARIO_ID).unwrap();
        assert!(infant.hug_time_hours > adult.hug_time_hours);

        let longest = report.longest_wait(HUG_SCENARIO_ID).unwrap();
        assert_eq!(longest.member_id, members[1].id());
    }

    #[test]
    fn test_everyone_safe_after_a_month() {
        let evaluator = ExposureEvaluator::new();
        let now = injected_at() + Duration::days(30);
        let report = evaluator
            .evaluate(&ablation_dose(), &family(), DoseStandard::Icrp, now)
            .unwrap();

        assert!(report.members.iter().all(|m| m.all_safe()));
        assert!(report.all_members_safe(HUG_SCENARIO_ID));
    }

    #[test]
    fn test_low_activity_safe_immediately() {
        let evaluator = ExposureEvaluator::new();
        let dose = PatientDose::new(NuclideId::Ga68, "ga68-pet", 10.0, injected_at());
        let report = evaluator
            .evaluate(&dose, &family(), DoseStandard::Icrp, injected_at())
            .unwrap();

        for member in &report.members {
            let house = member.scenario(SAME_HOUSE_SCENARIO_ID).unwrap();
            assert_eq!(house.hug_time_hours, 0.0);
            assert_eq!(house.status, ContactStatus::SafeNow);
        }
    }

    #[test]
    fn test_countdown_ticks_down_each_second() {
        let evaluator = ExposureEvaluator::new();
        let members = family();
        let now = injected_at() + Duration::hours(3);

        let first = evaluator
            .evaluate(&ablation_dose(), &members, DoseStandard::Icrp, now)
            .unwrap();
        let second = evaluator
            .evaluate(&ablation_dose(), &members, DoseStandard::Icrp, now + Duration::seconds(1))
            .unwrap();

        let before = first.members[0].scenario(HUG_SCENARIO_ID).unwrap().status.remaining_seconds().unwrap();
        let after = second.members[0].scenario(HUG_SCENARIO_ID).unwrap().status.remaining_seconds().unwrap();
        assert_eq!(before - after, 1);
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let evaluator = ExposureEvaluator::new();
        let members = family();
        let now = injected_at() + Duration::minutes(137);

        let a = evaluator.evaluate(&ablation_dose(), &members, DoseStandard::Korean, now).unwrap();
        let b = evaluator.evaluate(&ablation_dose(), &members, DoseStandard::Korean, now).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_member_order_does_not_change_results() {
        let evaluator = ExposureEvaluator::new();
        let members = family();
        let mut reversed = members.clone();
        reversed.reverse();
        let now = injected_at() + Duration::hours(5);

        let forward = evaluator.evaluate(&ablation_dose(), &members, DoseStandard::Icrp, now).unwrap();
        let backward = evaluator.evaluate(&ablation_dose(), &reversed, DoseStandard::Icrp, now).unwrap();

        for member in &members {
            assert_eq!(forward.member(member.id()), backward.member(member.id()));
        }
    }

    #[test]
    fn test_safe_distance_uses_casual_occupancy() {
        let evaluator = ExposureEvaluator::new();
        let members = family();
        let now = injected_at() + Duration::hours(4);
        let report = evaluator.evaluate(&ablation_dose(), &members, DoseStandard::Icrp, now).unwrap();

        let lambda = decay_constant(procedure(NuclideId::I131, "i131-ablation").unwrap().effective_half_life_hours);
        let expected = safe_distance(0.066, report.current_activity_mbq, lambda, 0.25, 1000.0);
        assert_eq!(report.member(members[0].id()).unwrap().current_safe_distance_m, expected);

        let wider = ExposureEvaluator::new().with_casual_occupancy_factor(0.5);
        let wider_report = wider.evaluate(&ablation_dose(), &members, DoseStandard::Icrp, now).unwrap();
        assert!(
            wider_report.member(members[0].id()).unwrap().current_safe_distance_m
                > report.member(members[0].id()).unwrap().current_safe_distance_m
        );
    }

    #[test]
    fn test_limit_follows_active_standard() {
        let evaluator = ExposureEvaluator::new();
        let child = vec![FamilyMember::new("孩子", 7, false, DoseStandard::Icrp)];
        let report = evaluator
            .evaluate(&ablation_dose(), &child, DoseStandard::Korean, injected_at())
            .unwrap();

        let lambda = decay_constant(16.0);
        let expected = time_to_safe(0.066, 3700.0, lambda, 0.3, 0.05, 500.0);
        assert_eq!(report.members[0].scenario(HUG_SCENARIO_ID).unwrap().hug_time_hours, expected);
    }

    #[test]
    fn test_contact_status_conversion() {
        assert_eq!(contact_status(f64::INFINITY, 0.0), ContactStatus::Unreachable);
        assert_eq!(contact_status(0.0, 0.0), ContactStatus::SafeNow);
        assert_eq!(contact_status(1.0, MILLIS_PER_HOUR), ContactStatus::SafeNow);
        assert_eq!(
            contact_status(1.0, MILLIS_PER_HOUR - 1500.0),
            ContactStatus::Countdown { remaining_seconds: 2 }
        );
    }

    #[test]
    fn test_report_serializes_to_json() {
        let evaluator = ExposureEvaluator::new();
        let report = evaluator
            .evaluate(&ablation_dose(), &family(), DoseStandard::Icrp, injected_at() + Duration::hours(1))
            .unwrap();

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["members"].as_array().unwrap().len(), 3);
        assert_eq!(json["members"][0]["scenarios"][0]["scenario_id"], "hug");
        assert_eq!(json["members"][0]["scenarios"][0]["status"]["state"], "countdown");
    }
}
