//! 家属倒计时演示程序
//!
//! 以 I-131 甲状腺消融治疗为例，在注射后的几个固定时刻评估一家人的接触倒计时，
//! 并展示切换剂量标准后限值的变化。

use chrono::{Duration, TimeZone, Utc};
use hugtime::catalog::{
    category_label, nuclide, FamilyMemberInput, FamilyRoster, HUG_SCENARIO_ID,
    SAME_ROOM_SCENARIO_ID,
};
use hugtime::engine::radiation::{decay_constant, time_to_safe};
use hugtime::engine::{ExposureEvaluator, IntakeValidator};
use hugtime::utils::msv_to_usv;
use hugtime::{ContactStatus, DoseStandard, NuclideId, PatientDose};

fn main() -> anyhow::Result<()> {
    // 初始化日志
    tracing_subscriber::fmt::init();

    println!("☢️  HugTime 家属倒计时演示\n");

    let injected = Utc
        .with_ymd_and_hms(2024, 5, 10, 9, 0, 0)
        .single()
        .ok_or_else(|| anyhow::anyhow!("无效的注射时间"))?;
    let dose = PatientDose::new(NuclideId::I131, "i131-ablation", 3700.0, injected);
    let family = family_inputs();

    // 1. 录入验证
    let validator = IntakeValidator::new();
    let mut validation = validator.validate_dose(&dose, injected);
    validation.merge(validator.validate_family(&family));
    println!("✅ {}", validation.get_summary());

    // 2. 建立家属名单
    let mut roster = FamilyRoster::from_inputs(&family, DoseStandard::Icrp);
    for member in roster.members() {
        println!(
            "👤 {} {}岁 → {} ({} mSv)",
            member.name(),
            member.age(),
            category_label(member.category()),
            member.dose_limit_msv()
        );
    }

    // 3. 在几个时刻评估
    let evaluator = ExposureEvaluator::new();
    for hours in [0, 24, 72, 24 * 7, 24 * 30] {
        let now = injected + Duration::hours(hours);
        let report = evaluator.evaluate(&dose, roster.members(), roster.standard(), now)?;

        println!(
            "\n📊 注射后 {} 小时: 活度 {:.0} MBq (剩余 {:.1}%)",
            hours, report.current_activity_mbq, report.remaining_activity_percent
        );
        for scenario_id in [HUG_SCENARIO_ID, SAME_ROOM_SCENARIO_ID] {
            match report.longest_wait(scenario_id) {
                Some(longest) => {
                    let name = roster
                        .get(longest.member_id)
                        .map(|m| m.name().to_string())
                        .unwrap_or_default();
                    println!("   {} 等待最久: {} {}", scenario_id, name, describe(&longest.status));
                }
                None => println!("   {} 全员安全", scenario_id),
            }
        }
    }

    // 4. 切换剂量标准
    roster.set_standard(DoseStandard::Korean);
    let report = evaluator.evaluate(
        &dose,
        roster.members(),
        roster.standard(),
        injected + Duration::hours(24),
    )?;
    println!("\n📏 切换到 {} 标准后 (注射后 24 小时):", roster.standard());
    for snapshot in &report.members {
        let member = roster.get(snapshot.member_id);
        if let (Some(member), Some(hug)) = (member, snapshot.scenario(HUG_SCENARIO_ID)) {
            println!(
                "   {}: 拥抱 {}，安全距离 {:.2} m",
                member.name(),
                describe(&hug.status),
                snapshot.current_safe_distance_m
            );
        }
    }

    // 5. 直接调用计算函数
    let i131 = nuclide(NuclideId::I131);
    let ablation = i131
        .procedure("i131-ablation")
        .ok_or_else(|| anyhow::anyhow!("缺少 i131-ablation"))?;
    let lambda = decay_constant(ablation.effective_half_life_hours);
    let hours = time_to_safe(i131.gamma, 3700.0, lambda, 0.3, 0.05, msv_to_usv(0.3));
    println!("\n🧮 婴儿拥抱安全时刻: 注射后 {:.1} 小时", hours);

    Ok(())
}

fn family_inputs() -> Vec<FamilyMemberInput> {
    [("爸爸", 38, false), ("妈妈", 34, true), ("哥哥", 9, false), ("宝宝", 1, false)]
        .into_iter()
        .map(|(name, age, is_pregnant)| FamilyMemberInput {
            name: name.to_string(),
            age,
            is_pregnant,
        })
        .collect()
}

fn describe(status: &ContactStatus) -> String {
    match status {
        ContactStatus::SafeNow => "现在可以".to_string(),
        ContactStatus::Countdown { remaining_seconds } => {
            format!("还需 {:.1} 小时", *remaining_seconds as f64 / 3600.0)
        }
        ContactStatus::Unreachable => "无法达到".to_string(),
    }
}
