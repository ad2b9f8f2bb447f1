//! Symbolic values in the Laplace variable `s`.
//!
//! An [`Expr`] is a ratio of two generalised polynomials in `s` with complex
//! coefficients. Exponents are real, so constant-phase elements (`s^0.5`)
//! are representable alongside ordinary rational transfer functions.
//!
//! Division is projective: dividing a non-zero value by zero gives
//! infinity, and `0/0` gives an indeterminate value. This lets an ideal
//! current source report an infinite impedance, and `1/inf` collapse back
//! to zero, without special cases at every call site.

mod poly;

pub use poly::{Poly, Term, CANCEL_TOLERANCE, POWER_TOLERANCE};

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use num_complex::Complex64;

/// Relative tolerance used by expression equality.
pub const EQ_TOLERANCE: f64 = 1e-9;

/// Ratio of two polynomials in `s`, kept in canonical form.
#[derive(Debug, Clone)]
pub struct Expr {
    num: Poly,
    den: Poly,
}

impl Expr {
    /// Build `num / den` and normalise it.
    pub fn ratio(num: Poly, den: Poly) -> Self {
        match (num.is_zero(), den.is_zero()) {
            (true, true) => Self {
                num: Poly::zero(),
                den: Poly::zero(),
            },
            (true, false) => Self::zero(),
            (false, true) => Self::infinity(),
            (false, false) => {
                // A monomial denominator folds into the numerator as negative powers.
                if let [t] = den.terms() {
                    let factor = Complex64::new(1.0, 0.0) / t.coeff;
                    return Self {
                        num: num.scale(factor).shift(-t.power),
                        den: Poly::one(),
                    };
                }
                let (lead, low) = match (den.leading(), den.trailing()) {
                    (Some(lead), Some(low)) => (lead.coeff, low.power),
                    _ => return Self::zero(),
                };
                let factor = Complex64::new(1.0, 0.0) / lead;
                Self {
                    num: num.scale(factor).shift(-low),
                    den: den.scale(factor).shift(-low),
                }
            }
        }
    }

    pub fn zero() -> Self {
        Self {
            num: Poly::zero(),
            den: Poly::one(),
        }
    }

    pub fn one() -> Self {
        Self::constant(1.0)
    }

    pub fn constant(value: f64) -> Self {
        Self::complex(Complex64::new(value, 0.0))
    }

    pub fn complex(value: Complex64) -> Self {
        if value.re.is_nan() || value.im.is_nan() {
            return Self::indeterminate();
        }
        if value.re.is_infinite() || value.im.is_infinite() {
            return Self::infinity();
        }
        Self {
            num: Poly::constant(value),
            den: Poly::one(),
        }
    }

    /// The Laplace variable itself.
    pub fn s() -> Self {
        Self::monomial(1.0, 1.0)
    }

    /// `coeff * s^power`.
    pub fn monomial(coeff: f64, power: f64) -> Self {
        Self {
            num: Poly::monomial(Complex64::new(coeff, 0.0), power),
            den: Poly::one(),
        }
    }

    pub fn infinity() -> Self {
        Self {
            num: Poly::one(),
            den: Poly::zero(),
        }
    }

    pub fn indeterminate() -> Self {
        Self {
            num: Poly::zero(),
            den: Poly::zero(),
        }
    }

    pub fn numerator(&self) -> &Poly {
        &self.num
    }

    pub fn denominator(&self) -> &Poly {
        &self.den
    }

    pub fn is_zero(&self) -> bool {
        self.num.is_zero() && !self.den.is_zero()
    }

    pub fn is_infinite(&self) -> bool {
        self.den.is_zero() && !self.num.is_zero()
    }

    pub fn is_indeterminate(&self) -> bool {
        self.den.is_zero() && self.num.is_zero()
    }

    pub fn is_finite(&self) -> bool {
        !self.den.is_zero()
    }

    /// Finite everywhere it is defined: no infinite or NaN coefficients and
    /// a non-zero denominator.
    pub fn is_well_defined(&self) -> bool {
        self.is_finite() && self.num.has_finite_coefficients() && self.den.has_finite_coefficients()
    }

    /// True when the value does not depend on `s`.
    pub fn is_constant(&self) -> bool {
        self.is_finite() && self.num.is_constant() && self.den.is_constant()
    }

    /// True when the value is a real constant.
    pub fn is_real(&self) -> bool {
        self.constant_value()
            .map(|v| v.im.abs() <= CANCEL_TOLERANCE * v.norm())
            .unwrap_or(false)
    }

    pub fn has_real_coefficients(&self) -> bool {
        self.is_finite() && self.num.has_real_coefficients() && self.den.has_real_coefficients()
    }

    /// Value of a constant expression.
    pub fn constant_value(&self) -> Option<Complex64> {
        if !self.is_constant() {
            return None;
        }
        let den = self.den.coeff(0.0);
        Some(self.num.coeff(0.0) / den)
    }

    /// Real value of a real constant expression.
    pub fn real_value(&self) -> Option<f64> {
        if self.is_real() {
            self.constant_value().map(|v| v.re)
        } else {
            None
        }
    }

    /// `(coeff, power)` when the expression is a single `coeff * s^power` term.
    pub fn as_monomial(&self) -> Option<(Complex64, f64)> {
        if !self.is_finite() || !self.den.is_constant() {
            return None;
        }
        match self.num.terms() {
            [t] => Some((t.coeff / self.den.coeff(0.0), t.power)),
            _ => None,
        }
    }

    /// True when the numerator degree is below the denominator degree.
    pub fn is_strictly_proper(&self) -> bool {
        match (self.num.degree(), self.den.degree()) {
            (None, Some(_)) => true,
            (Some(n), Some(d)) => n < d - POWER_TOLERANCE,
            _ => false,
        }
    }

    /// Split into `(c, rest)` with `self = c + rest`, where `c` is the
    /// constant part at infinite frequency and `rest` is strictly proper.
    /// Returns `None` when the expression grows without bound in `s`.
    pub fn split_proper(&self) -> Option<(Complex64, Expr)> {
        if self.is_strictly_proper() {
            return Some((Complex64::new(0.0, 0.0), self.clone()));
        }
        let (n, d) = (self.num.leading()?, self.den.leading()?);
        if (n.power - d.power).abs() >= POWER_TOLERANCE {
            return None;
        }
        let c = n.coeff / d.coeff;
        let rest = self - &Expr::complex(c);
        if rest.is_strictly_proper() {
            Some((c, rest))
        } else {
            None
        }
    }

    /// Substitute a point for `s`, giving a constant expression.
    pub fn subs(&self, s: Complex64) -> Expr {
        if !self.is_finite() {
            return self.clone();
        }
        let low = match (self.num.trailing(), self.den.trailing()) {
            (Some(n), Some(d)) => n.power.min(d.power),
            (None, _) => return Self::zero(),
            (Some(n), None) => n.power,
        };
        let num = self.num.shift(-low).eval(s);
        let den = self.den.shift(-low).eval(s);
        if den.norm() == 0.0 {
            if num.norm() == 0.0 {
                Self::indeterminate()
            } else {
                Self::infinity()
            }
        } else {
            Self::complex(num / den)
        }
    }

    /// Evaluate at a point.
    pub fn eval(&self, s: Complex64) -> Complex64 {
        let value = self.subs(s);
        if value.is_infinite() {
            Complex64::new(f64::INFINITY, 0.0)
        } else {
            value
                .constant_value()
                .unwrap_or(Complex64::new(f64::NAN, f64::NAN))
        }
    }

    /// Value on the imaginary axis, `s = j * omega`.
    pub fn at_omega(&self, omega: f64) -> Complex64 {
        self.eval(Complex64::new(0.0, omega))
    }

    pub fn recip(&self) -> Expr {
        Self::ratio(self.den.clone(), self.num.clone())
    }

    /// Cross-multiplied comparison with relative tolerance [`EQ_TOLERANCE`].
    pub fn approx_eq(&self, other: &Expr) -> bool {
        if self.is_indeterminate() || other.is_indeterminate() {
            return false;
        }
        match (self.is_infinite(), other.is_infinite()) {
            (true, true) => return true,
            (true, false) | (false, true) => return false,
            _ => {}
        }
        let lhs = &self.num * &other.den;
        let rhs = &other.num * &self.den;
        let scale = lhs.max_abs().max(rhs.max_abs());
        if scale == 0.0 {
            return true;
        }
        (&lhs - &rhs)
            .terms()
            .iter()
            .all(|t| t.coeff.norm() <= EQ_TOLERANCE * scale)
    }
}

impl Default for Expr {
    fn default() -> Self {
        Self::zero()
    }
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        self.approx_eq(other)
    }
}

impl PartialEq<f64> for Expr {
    fn eq(&self, other: &f64) -> bool {
        self.approx_eq(&Expr::constant(*other))
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Self::constant(value)
    }
}

impl From<Complex64> for Expr {
    fn from(value: Complex64) -> Self {
        Self::complex(value)
    }
}

impl Add for &Expr {
    type Output = Expr;

    fn add(self, rhs: &Expr) -> Expr {
        if self.is_indeterminate() || rhs.is_indeterminate() {
            return Expr::indeterminate();
        }
        if self.is_infinite() || rhs.is_infinite() {
            return Expr::infinity();
        }
        if self.is_zero() {
            return rhs.clone();
        }
        if rhs.is_zero() {
            return self.clone();
        }
        if self.den.approx_eq(&rhs.den, EQ_TOLERANCE) && self.is_finite() {
            return Expr::ratio(&self.num + &rhs.num, self.den.clone());
        }
        Expr::ratio(
            &(&self.num * &rhs.den) + &(&rhs.num * &self.den),
            &self.den * &rhs.den,
        )
    }
}

impl Sub for &Expr {
    type Output = Expr;

    fn sub(self, rhs: &Expr) -> Expr {
        self + &(-rhs)
    }
}

impl Mul for &Expr {
    type Output = Expr;

    fn mul(self, rhs: &Expr) -> Expr {
        Expr::ratio(&self.num * &rhs.num, &self.den * &rhs.den)
    }
}

impl Div for &Expr {
    type Output = Expr;

    fn div(self, rhs: &Expr) -> Expr {
        Expr::ratio(&self.num * &rhs.den, &self.den * &rhs.num)
    }
}

impl Neg for &Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        Expr {
            num: -&self.num,
            den: self.den.clone(),
        }
    }
}

impl Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        -&self
    }
}

macro_rules! forward_owned_binop {
    ($($trait:ident :: $method:ident),*) => {
        $(
            impl $trait for Expr {
                type Output = Expr;

                fn $method(self, rhs: Expr) -> Expr {
                    (&self).$method(&rhs)
                }
            }

            impl $trait<&Expr> for Expr {
                type Output = Expr;

                fn $method(self, rhs: &Expr) -> Expr {
                    (&self).$method(rhs)
                }
            }

            impl $trait<Expr> for &Expr {
                type Output = Expr;

                fn $method(self, rhs: Expr) -> Expr {
                    self.$method(&rhs)
                }
            }

            impl $trait<f64> for Expr {
                type Output = Expr;

                fn $method(self, rhs: f64) -> Expr {
                    (&self).$method(&Expr::constant(rhs))
                }
            }
        )*
    };
}

forward_owned_binop!(Add::add, Sub::sub, Mul::mul, Div::div);

fn fmt_coeff(c: Complex64) -> String {
    if c.im == 0.0 {
        format!("{}", c.re)
    } else if c.re == 0.0 {
        format!("{}j", c.im)
    } else {
        format!("({}{:+}j)", c.re, c.im)
    }
}

fn fmt_poly(p: &Poly) -> String {
    if p.is_zero() {
        return "0".to_string();
    }
    let mut out = String::new();
    for (k, t) in p.terms().iter().enumerate() {
        let (negative, coeff) = if t.coeff.im == 0.0 && t.coeff.re < 0.0 {
            (true, -t.coeff)
        } else {
            (false, t.coeff)
        };
        if k == 0 {
            if negative {
                out.push('-');
            }
        } else {
            out.push_str(if negative { " - " } else { " + " });
        }
        let unit = coeff == Complex64::new(1.0, 0.0);
        if t.power.abs() < POWER_TOLERANCE {
            out.push_str(&fmt_coeff(coeff));
            continue;
        }
        if !unit {
            out.push_str(&fmt_coeff(coeff));
            out.push('*');
        }
        if (t.power - 1.0).abs() < POWER_TOLERANCE {
            out.push('s');
        } else {
            out.push_str(&format!("s^{}", t.power));
        }
    }
    out
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_indeterminate() {
            return write!(f, "nan");
        }
        if self.is_infinite() {
            return write!(f, "oo");
        }
        if self.den.is_constant() && self.den.coeff(0.0) == Complex64::new(1.0, 0.0) {
            write!(f, "{}", fmt_poly(&self.num))
        } else {
            write!(f, "({})/({})", fmt_poly(&self.num), fmt_poly(&self.den))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_harmonic_combination() {
        let r1 = Expr::constant(10.0);
        let r2 = Expr::constant(15.0);
        let r = &(&r1 * &r2) / &(&r1 + &r2);
        assert_eq!(r, 6.0);
        assert!(r.is_real());
    }

    #[test]
    fn test_series_rl_display() {
        let z = Expr::constant(10.0) + Expr::monomial(5.0, 1.0);
        assert_eq!(z.to_string(), "5*s + 10");
    }

    #[test]
    fn test_monomial_denominator_folds() {
        let c = Expr::monomial(6.0, 1.0).recip();
        let (coeff, power) = c.as_monomial().expect("monomial");
        assert_relative_eq!(coeff.re, 1.0 / 6.0);
        assert_relative_eq!(power, -1.0);
        assert!(c.denominator().is_constant());
    }

    #[test]
    fn test_projective_division() {
        let inf = Expr::one() / Expr::zero();
        assert!(inf.is_infinite());
        assert!(inf.recip().is_zero());
        assert!((&inf + &Expr::constant(3.0)).is_infinite());
        assert!((&inf + &inf).is_infinite());
        assert!((&inf - &inf).is_infinite());
        assert!((&inf + &Expr::indeterminate()).is_indeterminate());
        assert!((Expr::zero() / Expr::zero()).is_indeterminate());
        assert!((&inf * &Expr::zero()).is_indeterminate());
    }

    #[test]
    fn test_subs_at_dc() {
        // 1/(sC) has a pole at s = 0.
        let z = Expr::monomial(1.0, 1.0).recip();
        assert!(z.subs(Complex64::new(0.0, 0.0)).is_infinite());

        // (s + 2)/(s + 4) at DC is 1/2.
        let h = Expr::ratio(
            Poly::from_terms(vec![
                Term::new(Complex64::new(1.0, 0.0), 1.0),
                Term::new(Complex64::new(2.0, 0.0), 0.0),
            ]),
            Poly::from_terms(vec![
                Term::new(Complex64::new(1.0, 0.0), 1.0),
                Term::new(Complex64::new(4.0, 0.0), 0.0),
            ]),
        );
        assert_eq!(h.subs(Complex64::new(0.0, 0.0)), 0.5);
    }

    #[test]
    fn test_at_omega_of_inductor() {
        let z = Expr::monomial(2.0, 1.0);
        let v = z.at_omega(3.0);
        assert_relative_eq!(v.re, 0.0);
        assert_relative_eq!(v.im, 6.0);
        assert!(!z.is_real());
    }

    #[test]
    fn test_equality_after_rearrangement() {
        // 1/(1/a + 1/b) == ab/(a+b) with a = 1/(2s), b = 3s
        let a = Expr::monomial(2.0, 1.0).recip();
        let b = Expr::monomial(3.0, 1.0);
        let lhs = (a.recip() + b.recip()).recip();
        let rhs = (&a * &b) / (&a + &b);
        assert_eq!(lhs, rhs);
    }

    #[test]
    fn test_split_proper() {
        // (2s + 3)/(s + 1) = 2 + 1/(s + 1)
        let h = Expr::ratio(
            Poly::from_terms(vec![
                Term::new(Complex64::new(2.0, 0.0), 1.0),
                Term::new(Complex64::new(3.0, 0.0), 0.0),
            ]),
            Poly::from_terms(vec![
                Term::new(Complex64::new(1.0, 0.0), 1.0),
                Term::new(Complex64::new(1.0, 0.0), 0.0),
            ]),
        );
        let (c, rest) = h.split_proper().expect("proper split");
        assert_relative_eq!(c.re, 2.0);
        assert!(rest.is_strictly_proper());

        assert!(Expr::s().split_proper().is_none());
    }
}
