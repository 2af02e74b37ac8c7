//! Black-Scholes-Merton pricing and Greeks for European options.
//!
//! No dividend yield. Degenerate markets (`T <= 0` or `sigma <= 0`) price at
//! intrinsic value with all Greeks zero; non-positive spot or strike is an
//! [`PricingError::InvalidParameter`].

use std::f64::consts::{PI, SQRT_2};

use serde::Serialize;
use statrs::function::erf::erfc;
use thiserror::Error;

use crate::data::{Greeks, OptionType};

#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "error", rename_all = "snake_case")]
pub enum PricingError {
    #[error("Invalid parameter: {name} = {value}")]
    InvalidParameter { name: &'static str, value: f64 },
}

/// Price and Greeks for one contract.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ContractQuote {
    pub option_type: OptionType,
    pub price: f64,
    pub greeks: Greeks,
    /// True when the intrinsic-value fallback was used.
    pub degenerate: bool,
}

/// Black-Scholes calculator for options pricing and Greeks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptionPricer {
    /// Risk-free interest rate (annual, continuous).
    pub rate: f64,
}

impl Default for OptionPricer {
    fn default() -> Self {
        Self { rate: 0.06 }
    }
}

impl OptionPricer {
    pub fn new(rate: f64) -> Self {
        Self { rate }
    }

    /// Standard normal CDF.
    pub fn norm_cdf(x: f64) -> f64 {
        0.5 * erfc(-x / SQRT_2)
    }

    /// Standard normal PDF.
    pub fn norm_pdf(x: f64) -> f64 {
        (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
    }

    fn d1(&self, spot: f64, strike: f64, time: f64, vol: f64) -> f64 {
        ((spot / strike).ln() + (self.rate + 0.5 * vol * vol) * time) / (vol * time.sqrt())
    }

    fn validate(&self, spot: f64, strike: f64, time: f64, vol: f64) -> Result<(), PricingError> {
        if !spot.is_finite() || spot <= 0.0 {
            return Err(PricingError::InvalidParameter {
                name: "spot",
                value: spot,
            });
        }
        if !strike.is_finite() || strike <= 0.0 {
            return Err(PricingError::InvalidParameter {
                name: "strike",
                value: strike,
            });
        }
        if time.is_nan() {
            return Err(PricingError::InvalidParameter {
                name: "time",
                value: time,
            });
        }
        if vol.is_nan() {
            return Err(PricingError::InvalidParameter {
                name: "volatility",
                value: vol,
            });
        }
        if !self.rate.is_finite() {
            return Err(PricingError::InvalidParameter {
                name: "rate",
                value: self.rate,
            });
        }
        Ok(())
    }

    fn is_degenerate(time: f64, vol: f64) -> bool {
        time <= 0.0 || vol <= 0.0
    }

    fn intrinsic(spot: f64, strike: f64, opt_type: OptionType) -> f64 {
        match opt_type {
            OptionType::Call => (spot - strike).max(0.0),
            OptionType::Put => (strike - spot).max(0.0),
        }
    }

    /// Option price, clamped at zero.
    pub fn price(
        &self,
        spot: f64,
        strike: f64,
        time: f64,
        vol: f64,
        opt_type: OptionType,
    ) -> Result<f64, PricingError> {
        self.validate(spot, strike, time, vol)?;

        if Self::is_degenerate(time, vol) {
            return Ok(Self::intrinsic(spot, strike, opt_type));
        }

        Ok(self.raw_price(spot, strike, time, vol, opt_type).max(0.0))
    }

    fn raw_price(&self, spot: f64, strike: f64, time: f64, vol: f64, opt_type: OptionType) -> f64 {
        let d1 = self.d1(spot, strike, time, vol);
        let d2 = d1 - vol * time.sqrt();
        let discounted_strike = strike * (-self.rate * time).exp();

        match opt_type {
            OptionType::Call => spot * Self::norm_cdf(d1) - discounted_strike * Self::norm_cdf(d2),
            OptionType::Put => discounted_strike * Self::norm_cdf(-d2) - spot * Self::norm_cdf(-d1),
        }
    }

    /// Delta, gamma, theta (per day) and vega (per 1% vol).
    pub fn greeks(
        &self,
        spot: f64,
        strike: f64,
        time: f64,
        vol: f64,
        opt_type: OptionType,
    ) -> Result<Greeks, PricingError> {
        self.validate(spot, strike, time, vol)?;

        if Self::is_degenerate(time, vol) {
            return Ok(Greeks::default());
        }

        let sqrt_t = time.sqrt();
        let d1 = self.d1(spot, strike, time, vol);
        let d2 = d1 - vol * sqrt_t;
        let pdf_d1 = Self::norm_pdf(d1);
        let discounted_strike = strike * (-self.rate * time).exp();

        let decay = -spot * pdf_d1 * vol / (2.0 * sqrt_t);

        let (delta, theta) = match opt_type {
            OptionType::Call => (
                Self::norm_cdf(d1),
                (decay - self.rate * discounted_strike * Self::norm_cdf(d2)) / 365.0,
            ),
            OptionType::Put => (
                Self::norm_cdf(d1) - 1.0,
                (decay + self.rate * discounted_strike * Self::norm_cdf(-d2)) / 365.0,
            ),
        };

        Ok(Greeks {
            delta,
            gamma: pdf_d1 / (spot * vol * sqrt_t),
            theta,
            vega: spot * pdf_d1 * sqrt_t / 100.0,
        })
    }

    /// Price and Greeks together.
    pub fn quote(
        &self,
        spot: f64,
        strike: f64,
        time: f64,
        vol: f64,
        opt_type: OptionType,
    ) -> Result<ContractQuote, PricingError> {
        Ok(ContractQuote {
            option_type: opt_type,
            price: self.price(spot, strike, time, vol, opt_type)?,
            greeks: self.greeks(spot, strike, time, vol, opt_type)?,
            degenerate: Self::is_degenerate(time, vol),
        })
    }

    /// Calculate implied volatility from option price using Newton-Raphson.
    pub fn implied_volatility(
        &self,
        spot: f64,
        strike: f64,
        time: f64,
        price: f64,
        opt_type: OptionType,
    ) -> Option<f64> {
        if time <= 0.0 || price <= 0.0 || self.validate(spot, strike, time, 0.0).is_err() {
            return None;
        }

        // Initial guess using Brenner-Subrahmanyam approximation
        let mut vol = ((price / spot) * (2.0 * PI / time).sqrt()).clamp(0.01, 5.0);

        let max_iter = 100;
        let tolerance = 1e-8;

        for _ in 0..max_iter {
            let diff = self.raw_price(spot, strike, time, vol, opt_type) - price;
            if diff.abs() < tolerance {
                return Some(vol);
            }

            // Unscaled vega
            let vega = spot * Self::norm_pdf(self.d1(spot, strike, time, vol)) * time.sqrt();
            if vega.abs() < 1e-10 {
                break;
            }

            vol = (vol - diff / vega).clamp(0.001, 10.0);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_golden_call() {
        let pricer = OptionPricer::new(0.05);
        let price = pricer.price(100.0, 100.0, 1.0, 0.20, OptionType::Call).unwrap();
        assert_relative_eq!(price, 10.4506, epsilon = 1e-4);

        let greeks = pricer.greeks(100.0, 100.0, 1.0, 0.20, OptionType::Call).unwrap();
        assert_relative_eq!(greeks.delta, 0.6368, epsilon = 1e-4);
    }

    #[test]
    fn test_golden_put() {
        let pricer = OptionPricer::new(0.05);
        let price = pricer.price(100.0, 100.0, 1.0, 0.20, OptionType::Put).unwrap();
        assert_relative_eq!(price, 5.5735, epsilon = 1e-4);
    }

    #[test]
    fn test_expired_is_intrinsic() {
        let pricer = OptionPricer::new(0.05);
        for (spot, strike) in [(110.0, 100.0), (90.0, 100.0), (100.0, 100.0)] {
            let call = pricer.quote(spot, strike, 0.0, 0.2, OptionType::Call).unwrap();
            let put = pricer.quote(spot, strike, 0.0, 0.2, OptionType::Put).unwrap();
            assert_eq!(call.price, (spot - strike).max(0.0));
            assert_eq!(put.price, (strike - spot).max(0.0));
            assert_eq!(call.greeks, Greeks::default());
            assert_eq!(put.greeks, Greeks::default());
            assert!(call.degenerate && put.degenerate);
        }
    }

    #[test]
    fn test_zero_vol_is_intrinsic() {
        let pricer = OptionPricer::new(0.05);
        let q = pricer.quote(120.0, 100.0, 0.5, 0.0, OptionType::Call).unwrap();
        assert_eq!(q.price, 20.0);
        assert_eq!(q.greeks, Greeks::default());
    }

    #[test]
    fn test_invalid_spot_and_strike() {
        let pricer = OptionPricer::default();
        assert_eq!(
            pricer.price(0.0, 100.0, 1.0, 0.2, OptionType::Call),
            Err(PricingError::InvalidParameter {
                name: "spot",
                value: 0.0
            })
        );
        assert!(pricer.price(100.0, -5.0, 1.0, 0.2, OptionType::Put).is_err());
        assert!(pricer.greeks(100.0, 0.0, 1.0, 0.2, OptionType::Put).is_err());
    }

    #[test]
    fn test_delta_bounds() {
        let pricer = OptionPricer::default();
        let call = pricer.greeks(100.0, 100.0, 0.5, 0.25, OptionType::Call).unwrap();
        let put = pricer.greeks(100.0, 100.0, 0.5, 0.25, OptionType::Put).unwrap();

        assert!(call.delta > 0.0 && call.delta < 1.0);
        assert!(put.delta > -1.0 && put.delta < 0.0);
        assert_relative_eq!(call.delta - put.delta, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_gamma_and_vega_shared() {
        let pricer = OptionPricer::default();
        let call = pricer.greeks(100.0, 105.0, 0.5, 0.25, OptionType::Call).unwrap();
        let put = pricer.greeks(100.0, 105.0, 0.5, 0.25, OptionType::Put).unwrap();

        assert!(call.gamma > 0.0);
        assert!(call.vega > 0.0);
        assert_eq!(call.gamma, put.gamma);
        assert_eq!(call.vega, put.vega);
    }

    #[test]
    fn test_theta_rate_term_sign() {
        let pricer = OptionPricer::new(0.05);
        let call = pricer.greeks(100.0, 100.0, 1.0, 0.2, OptionType::Call).unwrap();
        let put = pricer.greeks(100.0, 100.0, 1.0, 0.2, OptionType::Put).unwrap();

        // Call theta minus put theta = -r K e^{-rT} / 365
        let expected = -0.05 * 100.0 * (-0.05f64).exp() / 365.0;
        assert_relative_eq!(call.theta - put.theta, expected, epsilon = 1e-12);
        assert!(call.theta < 0.0);
    }

    #[test]
    fn test_implied_vol_roundtrip() {
        let pricer = OptionPricer::new(0.05);
        let vol = 0.25;
        let price = pricer.price(100.0, 100.0, 0.5, vol, OptionType::Call).unwrap();

        let iv = pricer
            .implied_volatility(100.0, 100.0, 0.5, price, OptionType::Call)
            .unwrap();
        assert_relative_eq!(iv, vol, epsilon = 1e-6);
    }

    #[test]
    fn test_implied_vol_rejects_expired() {
        let pricer = OptionPricer::default();
        assert!(pricer
            .implied_volatility(100.0, 100.0, 0.0, 5.0, OptionType::Call)
            .is_none());
    }

    proptest! {
        #[test]
        fn prop_put_call_parity(
            spot in 1.0f64..1_000.0,
            strike in 1.0f64..1_000.0,
            time in 0.01f64..3.0,
            vol in 0.05f64..1.5,
            rate in -0.02f64..0.15,
        ) {
            let pricer = OptionPricer::new(rate);
            let call = pricer.price(spot, strike, time, vol, OptionType::Call).unwrap();
            let put = pricer.price(spot, strike, time, vol, OptionType::Put).unwrap();
            let parity = spot - strike * (-rate * time).exp();
            prop_assert!((call - put - parity).abs() < 1e-6);
        }

        #[test]
        fn prop_premiums_non_negative(
            spot in 1.0f64..1_000.0,
            strike in 1.0f64..1_000.0,
            time in 0.0f64..3.0,
            vol in 0.0f64..1.5,
        ) {
            let pricer = OptionPricer::default();
            prop_assert!(pricer.price(spot, strike, time, vol, OptionType::Call).unwrap() >= 0.0);
            prop_assert!(pricer.price(spot, strike, time, vol, OptionType::Put).unwrap() >= 0.0);
        }
    }
}
