//! Independent two-sample t-tests
//!
//! Two-sided p-values come from the Student t distribution via the
//! regularized incomplete beta function:
//! `p = I_{df / (df + t^2)}(df / 2, 1 / 2)`.

use super::stats::{mean, variance};

/// Result of comparing two samples
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TTestResult {
    pub t_statistic: f64,
    pub p_value: f64,
    pub degrees_of_freedom: f64,
}

impl TTestResult {
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

/// Which variance assumption the test uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TTestKind {
    /// Pooled variance, df = n1 + n2 - 2
    Student,
    /// Separate variances, Welch-Satterthwaite df
    Welch,
}

impl TTestKind {
    pub fn from_equal_variance(equal_variance: bool) -> Self {
        if equal_variance {
            TTestKind::Student
        } else {
            TTestKind::Welch
        }
    }
}

/// Compare the means of `a` and `b`.
///
/// `None` when either sample has fewer than two values or both samples have
/// zero variance, where the statistic is undefined.
pub fn independent_t_test(a: &[f64], b: &[f64], kind: TTestKind) -> Option<TTestResult> {
    let (n1, n2) = (a.len() as f64, b.len() as f64);
    let (m1, m2) = (mean(a)?, mean(b)?);
    let (v1, v2) = (variance(a)?, variance(b)?);

    let (std_err, df) = match kind {
        TTestKind::Student => {
            let df = n1 + n2 - 2.0;
            let pooled = ((n1 - 1.0) * v1 + (n2 - 1.0) * v2) / df;
            ((pooled * (1.0 / n1 + 1.0 / n2)).sqrt(), df)
        }
        TTestKind::Welch => {
            let s1 = v1 / n1;
            let s2 = v2 / n2;
            let df = (s1 + s2).powi(2) / (s1 * s1 / (n1 - 1.0) + s2 * s2 / (n2 - 1.0));
            ((s1 + s2).sqrt(), df)
        }
    };
    if std_err == 0.0 || !std_err.is_finite() || !df.is_finite() {
        return None;
    }

    let t = (m1 - m2) / std_err;
    Some(TTestResult {
        t_statistic: t,
        p_value: two_sided_p(t, df),
        degrees_of_freedom: df,
    })
}

/// Two-sided p-value of `t` under Student's t with `df` degrees of freedom
pub fn two_sided_p(t: f64, df: f64) -> f64 {
    let x = df / (df + t * t);
    regularized_incomplete_beta(df / 2.0, 0.5, x).clamp(0.0, 1.0)
}

/// Natural log of the gamma function (Lanczos, g = 7)
fn ln_gamma(x: f64) -> f64 {
    const COEFFS: [f64; 9] = [
        0.999_999_999_999_809_93,
        676.520_368_121_885_1,
        -1_259.139_216_722_402_8,
        771.323_428_777_653_13,
        -176.615_029_162_140_59,
        12.507_343_278_686_905,
        -0.138_571_095_265_720_12,
        9.984_369_578_019_571_6e-6,
        1.505_632_735_149_311_6e-7,
    ];
    if x < 0.5 {
        // Reflection formula
        let pi = std::f64::consts::PI;
        return (pi / (pi * x).sin()).ln() - ln_gamma(1.0 - x);
    }
    let x = x - 1.0;
    let t = x + 7.5;
    let series = COEFFS[1..]
        .iter()
        .enumerate()
        .fold(COEFFS[0], |acc, (i, c)| acc + c / (x + i as f64 + 1.0));
    0.5 * (2.0 * std::f64::consts::PI).ln() + (x + 0.5) * t.ln() - t + series.ln()
}

/// I_x(a, b)
fn regularized_incomplete_beta(a: f64, b: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    let ln_front = ln_gamma(a + b) - ln_gamma(a) - ln_gamma(b) + a * x.ln() + b * (1.0 - x).ln();
    let front = ln_front.exp();
    if x < (a + 1.0) / (a + b + 2.0) {
        front * beta_continued_fraction(a, b, x) / a
    } else {
        1.0 - front * beta_continued_fraction(b, a, 1.0 - x) / b
    }
}

/// Lentz evaluation of the incomplete beta continued fraction
fn beta_continued_fraction(a: f64, b: f64, x: f64) -> f64 {
    const MAX_ITER: usize = 300;
    const EPS: f64 = 1e-15;
    const TINY: f64 = 1e-300;

    let guard = |v: f64| if v.abs() < TINY { TINY } else { v };

    let qab = a + b;
    let qap = a + 1.0;
    let qam = a - 1.0;
    let mut c = 1.0;
    let mut d = 1.0 / guard(1.0 - qab * x / qap);
    let mut h = d;

    for m in 1..=MAX_ITER {
        let m = m as f64;
        let m2 = 2.0 * m;

        let aa = m * (b - m) * x / ((qam + m2) * (a + m2));
        d = 1.0 / guard(1.0 + aa * d);
        c = guard(1.0 + aa / c);
        h *= d * c;

        let aa = -(a + m) * (qab + m) * x / ((a + m2) * (qap + m2));
        d = 1.0 / guard(1.0 + aa * d);
        c = guard(1.0 + aa / c);
        let delta = d * c;
        h *= delta;

        if (delta - 1.0).abs() < EPS {
            break;
        }
    }
    h
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn ln_gamma_matches_factorials() {
        assert!(ln_gamma(1.0).abs() < 1e-12);
        assert!((ln_gamma(5.0) - 24.0f64.ln()).abs() < 1e-10);
        assert!((ln_gamma(0.5) - std::f64::consts::PI.sqrt().ln()).abs() < 1e-10);
    }

    #[test]
    fn incomplete_beta_edges_and_symmetry() {
        assert_eq!(regularized_incomplete_beta(2.0, 3.0, 0.0), 0.0);
        assert_eq!(regularized_incomplete_beta(2.0, 3.0, 1.0), 1.0);
        // I_x(1, 1) is the identity
        assert!((regularized_incomplete_beta(1.0, 1.0, 0.3) - 0.3).abs() < 1e-12);
        let lhs = regularized_incomplete_beta(2.5, 4.0, 0.35);
        let rhs = 1.0 - regularized_incomplete_beta(4.0, 2.5, 0.65);
        assert!((lhs - rhs).abs() < 1e-12);
    }

    #[test]
    fn critical_values_give_five_percent() {
        // t_{0.975} for 10 and 30 degrees of freedom
        assert!((two_sided_p(2.228_139, 10.0) - 0.05).abs() < 1e-5);
        assert!((two_sided_p(2.042_272, 30.0) - 0.05).abs() < 1e-5);
        assert!((two_sided_p(0.0, 12.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn student_t_test_known_values() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [2.0, 3.0, 4.0, 5.0, 6.0];
        let result = independent_t_test(&a, &b, TTestKind::Student).expect("defined");
        assert!((result.t_statistic + 1.0).abs() < 1e-12);
        assert_eq!(result.degrees_of_freedom, 8.0);
        assert!((result.p_value - 0.346_593).abs() < 1e-5);
        assert!(!result.is_significant(0.05));
    }

    #[test]
    fn welch_handles_unequal_variances() {
        let a = [10.0, 11.0, 12.0, 13.0];
        let b = [1.0, 5.0, 9.0, 13.0, 17.0, 21.0];
        let student = independent_t_test(&a, &b, TTestKind::Student).expect("student");
        let welch = independent_t_test(&a, &b, TTestKind::Welch).expect("welch");
        assert_eq!(student.degrees_of_freedom, 8.0);
        assert!((student.t_statistic - 0.129_777).abs() < 1e-5);
        assert!((welch.t_statistic - 0.160_128).abs() < 1e-5);
        assert!((welch.degrees_of_freedom - 5.438_329).abs() < 1e-5);
    }

    #[test]
    fn undefined_cases_return_none() {
        assert!(independent_t_test(&[1.0], &[1.0, 2.0], TTestKind::Student).is_none());
        assert!(independent_t_test(&[3.0, 3.0], &[3.0, 3.0], TTestKind::Student).is_none());
        assert!(independent_t_test(&[], &[], TTestKind::Welch).is_none());
    }

    #[test]
    fn separated_samples_are_significant() {
        let mut rng = StdRng::seed_from_u64(7);
        let a: Vec<f64> = (0..200).map(|_| rng.gen_range(0.0..100.0)).collect();
        let b: Vec<f64> = (0..200).map(|_| rng.gen_range(50.0..150.0)).collect();
        let result = independent_t_test(&a, &b, TTestKind::Student).expect("defined");
        assert!(result.t_statistic < 0.0);
        assert!(result.is_significant(0.05));
        assert!(result.p_value < 1e-10);
    }
}
