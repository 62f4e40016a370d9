//! 终端输出

use chrono::Local;
use hugtime_catalog::{
    all_nuclides, all_scenarios, category_label, dose_limits, scenario, FamilyRoster,
};
use hugtime_core::{ContactStatus, DoseStandard, ExposureReport};
use std::fmt::{self, Write};

/// 倒计时格式，超过一天时带天数
pub fn format_countdown(total_seconds: u64) -> String {
    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;

    if days > 0 {
        format!("{}天 {:02}:{:02}:{:02}", days, hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    }
}

pub fn status_text(status: &ContactStatus) -> String {
    match status {
        ContactStatus::SafeNow => "✅ 现在可以".to_string(),
        ContactStatus::Countdown { remaining_seconds } => {
            format!("⏳ 还需 {}", format_countdown(*remaining_seconds))
        }
        ContactStatus::Unreachable => "⛔ 无法达到安全".to_string(),
    }
}

/// 渲染一次评估结果
pub fn render_report(report: &ExposureReport, roster: &FamilyRoster) -> Result<String, fmt::Error> {
    let mut out = String::new();

    writeln!(
        out,
        "📊 {}  注射后 {:.1} 小时",
        report.evaluated_at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S"),
        report.elapsed_hours
    )?;
    writeln!(
        out,
        "   体内活度 {:.1} MBq (剩余 {:.1}%)",
        report.current_activity_mbq, report.remaining_activity_percent
    )?;

    for snapshot in &report.members {
        let Some(member) = roster.get(snapshot.member_id) else {
            continue;
        };
        writeln!(
            out,
            "👤 {} ({}，{} mSv)  当前安全距离 {:.2} m",
            member.name(),
            category_label(member.category()),
            member.dose_limit_msv(),
            snapshot.current_safe_distance_m
        )?;
        for result in &snapshot.scenarios {
            let label = scenario(&result.scenario_id)
                .map(|s| s.label)
                .unwrap_or(result.scenario_id.as_str());
            writeln!(out, "   - {}: {}", label, status_text(&result.status))?;
        }
    }

    for contact in all_scenarios() {
        if let Some(longest) = report.longest_wait(contact.id) {
            let name = roster
                .get(longest.member_id)
                .map(|m| m.name())
                .unwrap_or("?");
            writeln!(
                out,
                "🕒 {} 等待最久: {} {}",
                contact.label,
                name,
                status_text(&longest.status)
            )?;
        }
    }

    out.push_str(&render_limit_table(roster)?);
    Ok(out)
}

/// 当前标准的限值表，名单中出现的类别以 ▶ 标出
pub fn render_limit_table(roster: &FamilyRoster) -> Result<String, fmt::Error> {
    let relevant = roster.relevant_categories();
    let mut out = String::new();

    writeln!(out, "📏 剂量限值 ({})", roster.standard())?;
    for entry in dose_limits(roster.standard()) {
        let marker = if relevant.contains(&entry.category) { "▶" } else { " " };
        writeln!(
            out,
            " {} {} ({})  {} mSv",
            marker, entry.label, entry.age_range, entry.limit_msv
        )?;
    }

    Ok(out)
}

/// 渲染核素、诊疗项目、剂量限值和接触场景目录
pub fn render_catalog() -> Result<String, fmt::Error> {
    let mut out = String::new();

    writeln!(out, "☢️  放射性核素")?;
    for nuclide in all_nuclides() {
        writeln!(
            out,
            "  {} {}  T½={} h  Γ={}",
            nuclide.id, nuclide.label, nuclide.physical_half_life_hours, nuclide.gamma
        )?;
        for procedure in nuclide.procedures {
            writeln!(
                out,
                "    - {} {}  有效半衰期 {} h  常用量 {}~{} MBq",
                procedure.id,
                procedure.label,
                procedure.effective_half_life_hours,
                procedure.dose_range_min_mbq,
                procedure.dose_range_max_mbq
            )?;
        }
    }

    for standard in DoseStandard::ALL {
        writeln!(out, "📏 剂量限值 ({})", standard)?;
        for entry in dose_limits(standard) {
            writeln!(
                out,
                "  {} ({})  {} mSv",
                entry.label, entry.age_range, entry.limit_msv
            )?;
        }
    }

    writeln!(out, "🏠 接触场景")?;
    for contact in all_scenarios() {
        writeln!(
            out,
            "  {} {}  {} m  居留因子 {}",
            contact.id, contact.label, contact.distance_m, contact.occupancy_factor
        )?;
    }

    Ok(out)
}
