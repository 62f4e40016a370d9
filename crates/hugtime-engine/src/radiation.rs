//! 放射衰变与外照射计算
//!
//! 点源、单指数有效衰减模型下的闭式公式。所有函数无状态、无副作用。
//!
//! 单位体系:
//! - 活度: MBq
//! - 剂量: μSv (内部)，mSv 只在展示边界使用
//! - 距离: m
//! - 时间: h
//! - Γ: μSv·m²/(MBq·h)

/// 衰变常数 λ = ln2 / T½
///
/// `half_life_hours` 必须大于 0；传入 0 得到 +∞。
pub fn decay_constant(half_life_hours: f64) -> f64 {
    std::f64::consts::LN_2 / half_life_hours
}

/// t 时刻的剩余活度 A(t) = A₀·e^(-λt)
///
/// 负的 t 同样可以求值 (外推)，调用方负责拒绝未来的注射时间。
pub fn activity_at_time(a0_mbq: f64, lambda: f64, t_hours: f64) -> f64 {
    a0_mbq * (-lambda * t_hours).exp()
}

/// 平方反比剂量率 Γ·A / d² (μSv/h)
///
/// d = 0 无定义，由调用方保证距离为正。
pub fn dose_rate(gamma: f64, activity_mbq: f64, distance_m: f64) -> f64 {
    gamma * activity_mbq / (distance_m * distance_m)
}

/// 从 t_start 积分到无穷的累积剂量 (μSv)
///
/// D = OF·Γ·A₀·e^(-λ·t_start) / (λ·d²)
pub fn cumulative_dose_from_time(
    gamma: f64,
    a0_mbq: f64,
    lambda: f64,
    t_start_hours: f64,
    distance_m: f64,
    occupancy_factor: f64,
) -> f64 {
    let activity = activity_at_time(a0_mbq, lambda, t_start_hours);
    occupancy_factor * gamma * activity / (lambda * distance_m * distance_m)
}

/// 从注射时刻起，剩余累积剂量降到限值所需的时间 (h)
///
/// 解 `cumulative_dose_from_time(.., T, ..) = dose_limit_usv`:
/// 令 arg = D_limit·λ·d² / (OF·Γ·A₀)，
/// - arg ≥ 1: 从一开始就不会超过限值，返回 0
/// - arg ≤ 0: 模型不适用，返回 +∞，调用方须显示为"无法确定安全"
/// - 其余: T = -(1/λ)·ln(arg)，下限截断为 0
pub fn time_to_safe(
    gamma: f64,
    a0_mbq: f64,
    lambda: f64,
    distance_m: f64,
    occupancy_factor: f64,
    dose_limit_usv: f64,
) -> f64 {
    let numerator = dose_limit_usv * lambda * distance_m * distance_m;
    let denominator = occupancy_factor * gamma * a0_mbq;
    let argument = numerator / denominator;

    if argument >= 1.0 {
        return 0.0;
    }
    if argument <= 0.0 {
        return f64::INFINITY;
    }

    let hours = -(1.0 / lambda) * argument.ln();
    hours.max(0.0)
}

/// 以当前活度计算的安全距离 (m)
///
/// d = sqrt(OF·Γ·A / (λ·D_limit))，根号内截断为非负。
pub fn safe_distance(
    gamma: f64,
    activity_mbq: f64,
    lambda: f64,
    occupancy_factor: f64,
    dose_limit_usv: f64,
) -> f64 {
    let d_squared = occupancy_factor * gamma * activity_mbq / (lambda * dose_limit_usv);
    d_squared.max(0.0).sqrt()
}

/// 剩余活度百分比 100·e^(-λt)
pub fn remaining_activity_percent(lambda: f64, t_hours: f64) -> f64 {
    (-lambda * t_hours).exp() * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f64::consts::LN_2;

    fn rel_close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol * a.abs().max(b.abs())
    }

    #[test]
    fn test_decay_constant() {
        assert!((decay_constant(16.0) - LN_2 / 16.0).abs() < 1e-15);
        assert!((decay_constant(16.0) - 0.0433).abs() < 1e-4);
        assert!((decay_constant(1.0) - LN_2).abs() < 1e-15);
    }

    #[test]
    fn test_zero_half_life_is_infinite() {
        assert_eq!(decay_constant(0.0), f64::INFINITY);
    }

    #[test]
    fn test_activity_halves_after_half_life() {
        let lambda = decay_constant(16.0);
        assert!((activity_at_time(1000.0, lambda, 16.0) - 500.0).abs() < 1e-9);
        assert_eq!(activity_at_time(3700.0, lambda, 0.0), 3700.0);
    }

    #[test]
    fn test_inverse_square_law() {
        let rate_1m = dose_rate(0.066, 1000.0, 1.0);
        let rate_2m = dose_rate(0.066, 1000.0, 2.0);
        assert!((rate_2m - rate_1m / 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_remaining_activity_percent() {
        let lambda = decay_constant(16.0);
        assert_eq!(remaining_activity_percent(lambda, 0.0), 100.0);
        assert!((remaining_activity_percent(lambda, 16.0) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_cumulative_dose_decreases_over_time() {
        let lambda = decay_constant(16.0);
        let d0 = cumulative_dose_from_time(0.066, 3700.0, lambda, 0.0, 1.0, 0.25);
        let d24 = cumulative_dose_from_time(0.066, 3700.0, lambda, 24.0, 1.0, 0.25);

        assert!(d0.is_finite() && d0 > 0.0);
        assert!(d24 < d0);
    }

    #[test]
    fn test_i131_ablation_hug_time() {
        let hours = time_to_safe(0.066, 3700.0, decay_constant(16.0), 0.3, 0.05, 1000.0);
        let days = hours / 24.0;
        assert!(days > 0.5 && days < 14.0, "got {} days", days);
    }

    #[test]
    fn test_i131_hyperthyroid_hug_time() {
        let hours = time_to_safe(0.066, 555.0, decay_constant(132.0), 0.3, 0.05, 1000.0);
        let days = hours / 24.0;
        assert!(days > 0.0 && days < 30.0, "got {} days", days);
    }

    #[test]
    fn test_tc99m_bone_scan_under_a_day() {
        let hours = time_to_safe(0.015, 740.0, decay_constant(3.5), 0.3, 0.05, 1000.0);
        assert!(hours < 24.0);
    }

    #[test]
    fn test_f18_fdg_under_a_day() {
        let hours = time_to_safe(0.143, 370.0, decay_constant(110.0 / 60.0), 0.3, 0.05, 1000.0);
        assert!(hours < 24.0);
    }

    #[test]
    fn test_high_dose_infant_is_most_conservative() {
        let hours = time_to_safe(0.066, 7400.0, decay_constant(16.0), 0.3, 0.05, 300.0);
        assert!(hours / 24.0 > 1.0);
    }

    #[test]
    fn test_low_activity_is_already_safe() {
        let hours = time_to_safe(0.005, 10.0, decay_constant(1.0), 3.0, 0.05, 5000.0);
        assert_eq!(hours, 0.0);
    }

    #[test]
    fn test_exact_boundary_argument_is_safe() {
        // λ = ln2/ln2 = 1，arg 恰好为 1
        let lambda = decay_constant(LN_2);
        assert_eq!(lambda, 1.0);
        assert_eq!(time_to_safe(1.0, 100.0, lambda, 1.0, 1.0, 100.0), 0.0);
    }

    #[test]
    fn test_degenerate_inputs_are_unreachable() {
        let lambda = decay_constant(16.0);
        assert_eq!(time_to_safe(0.066, -10.0, lambda, 0.3, 0.05, 1000.0), f64::INFINITY);
        assert_eq!(time_to_safe(-0.066, 3700.0, lambda, 0.3, 0.05, 1000.0), f64::INFINITY);
        assert_eq!(time_to_safe(0.066, 3700.0, lambda, 0.3, 0.05, 0.0), f64::INFINITY);
    }

    #[test]
    fn test_safe_distance() {
        let lambda = decay_constant(16.0);
        let far = safe_distance(0.066, 3700.0, lambda, 0.25, 1000.0);
        let near = safe_distance(0.066, 1000.0, lambda, 0.25, 1000.0);
        assert!(far > near);
        assert!(near > 0.0);
    }

    #[test]
    fn test_safe_distance_clamps_negative_radicand() {
        assert_eq!(safe_distance(0.066, -1e-12, decay_constant(16.0), 0.25, 1000.0), 0.0);
    }

    proptest! {
        #[test]
        fn prop_decay_constant_definition(half_life in 0.03..200.0f64) {
            prop_assert_eq!(decay_constant(half_life), LN_2 / half_life);
        }

        #[test]
        fn prop_one_half_life_halves_activity(
            a0 in 10.0..1e4f64,
            half_life in 0.03..200.0f64,
        ) {
            let lambda = decay_constant(half_life);
            prop_assert_eq!(activity_at_time(a0, lambda, 0.0), a0);
            prop_assert!(rel_close(activity_at_time(a0, lambda, LN_2 / lambda), a0 / 2.0, 1e-12));
            prop_assert!(rel_close(remaining_activity_percent(lambda, LN_2 / lambda), 50.0, 1e-12));
        }

        #[test]
        fn prop_inverse_square(
            gamma in 0.001..0.2f64,
            activity in 10.0..1e4f64,
            d in 0.1..10.0f64,
        ) {
            prop_assert!(rel_close(dose_rate(gamma, activity, 2.0 * d), dose_rate(gamma, activity, d) / 4.0, 1e-12));
        }

        /// 交叉时刻的剩余累积剂量恰好等于限值
        #[test]
        fn prop_time_to_safe_round_trip(
            gamma in 0.001..0.2f64,
            a0 in 10.0..1e4f64,
            half_life in 0.03..200.0f64,
            d in 0.1..10.0f64,
            of in 0.01..=1.0f64,
            limit in 100.0..6000.0f64,
        ) {
            let lambda = decay_constant(half_life);
            let t = time_to_safe(gamma, a0, lambda, d, of, limit);
            prop_assert!(t.is_finite());
            prop_assert!(t >= 0.0);

            let remaining = cumulative_dose_from_time(gamma, a0, lambda, t, d, of);
            if t > 0.0 {
                prop_assert!(rel_close(remaining, limit, 1e-9), "remaining {} vs limit {}", remaining, limit);
            } else {
                prop_assert!(remaining <= limit * (1.0 + 1e-12));
            }
        }

        #[test]
        fn prop_already_safe_boundary(
            gamma in 0.001..0.2f64,
            a0 in 10.0..1e4f64,
            half_life in 0.03..200.0f64,
            d in 0.1..10.0f64,
            of in 0.01..=1.0f64,
            limit in 100.0..6000.0f64,
        ) {
            let lambda = decay_constant(half_life);
            if limit * lambda * d * d >= of * gamma * a0 {
                prop_assert_eq!(time_to_safe(gamma, a0, lambda, d, of, limit), 0.0);
            }
        }

        #[test]
        fn prop_time_to_safe_monotonic(
            gamma in 0.001..0.2f64,
            a0 in 10.0..5e3f64,
            half_life in 0.03..200.0f64,
            d in 0.1..10.0f64,
            of in 0.01..=1.0f64,
            limit in 100.0..3000.0f64,
            factor in 1.01..2.0f64,
        ) {
            let lambda = decay_constant(half_life);
            let base = time_to_safe(gamma, a0, lambda, d, of, limit);
            prop_assert!(time_to_safe(gamma, a0 * factor, lambda, d, of, limit) >= base);
            prop_assert!(time_to_safe(gamma, a0, lambda, d, of, limit * factor) <= base);
        }

        #[test]
        fn prop_safe_distance_increases_with_activity(
            gamma in 0.001..0.2f64,
            activity in 10.0..5e3f64,
            half_life in 0.03..200.0f64,
            of in 0.01..=1.0f64,
            limit in 100.0..6000.0f64,
            factor in 1.01..2.0f64,
        ) {
            let lambda = decay_constant(half_life);
            prop_assert!(
                safe_distance(gamma, activity * factor, lambda, of, limit)
                    > safe_distance(gamma, activity, lambda, of, limit)
            );
        }
    }
}
