//! Builtin compute functions for the calculators shipped in the embedded
//! descriptor store. Each function is pure: inputs in, outputs out, no I/O.
//!
//! Output keys must match the `outputs[].id` fields of the corresponding
//! descriptor; the round-trip test in the resolver module checks every
//! embedded descriptor against this table.

use super::{
    number_or, require_number, CalcInputs, CalcOutputs, CalcValue, ComputeError, ComputeRegistry,
};

/// Assemble the builtin registry.
pub(super) fn build() -> ComputeRegistry {
    let mut registry = ComputeRegistry::new();
    registry.register("compound-interest", compound_interest);
    registry.register("loan-payment", loan_payment);
    registry.register("mortgage-payment", mortgage_payment);
    registry.register("savings-goal", savings_goal);
    registry.register("tip", tip);
    registry.register("bmi", bmi);
    registry.register("bmr", bmr);
    registry.register("percentage", percentage);
    registry.register("circle-area", circle_area);
    registry.register("fuel-economy", fuel_economy);
    registry
}

fn outputs(pairs: impl IntoIterator<Item = (&'static str, f64)>) -> CalcOutputs {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

/// A = P(1 + r/n)^(nt)
fn compound_interest(inputs: &CalcInputs) -> Result<CalcOutputs, ComputeError> {
    let principal = require_number(inputs, "principal")?;
    let rate = require_number(inputs, "rate")? / 100.0;
    let years = require_number(inputs, "years")?;
    let periods = number_or(inputs, "frequency", 12.0);

    if periods <= 0.0 {
        return Err(ComputeError::invalid_input(
            "frequency",
            "compounding frequency must be positive",
        ));
    }

    let amount = principal * (1.0 + rate / periods).powf(periods * years);
    Ok(outputs([
        ("final_amount", amount),
        ("interest_earned", amount - principal),
    ]))
}

/// Standard amortization payment: P * r(1+r)^n / ((1+r)^n - 1)
fn monthly_amortized(principal: f64, annual_rate_pct: f64, years: f64) -> f64 {
    let n = years * 12.0;
    let r = annual_rate_pct / 100.0 / 12.0;
    if r == 0.0 {
        return principal / n;
    }
    let factor = (1.0 + r).powf(n);
    principal * r * factor / (factor - 1.0)
}

fn loan_payment(inputs: &CalcInputs) -> Result<CalcOutputs, ComputeError> {
    let amount = require_number(inputs, "amount")?;
    let rate = require_number(inputs, "rate")?;
    let years = require_number(inputs, "term_years")?;
    if years <= 0.0 {
        return Err(ComputeError::invalid_input(
            "term_years",
            "loan term must be positive",
        ));
    }

    let payment = monthly_amortized(amount, rate, years);
    let total_paid = payment * years * 12.0;
    Ok(outputs([
        ("monthly_payment", payment),
        ("total_interest", total_paid - amount),
        ("total_paid", total_paid),
    ]))
}

fn mortgage_payment(inputs: &CalcInputs) -> Result<CalcOutputs, ComputeError> {
    let price = require_number(inputs, "home_price")?;
    let down = number_or(inputs, "down_payment", 0.0);
    let rate = require_number(inputs, "rate")?;
    let years = require_number(inputs, "term_years")?;
    if years <= 0.0 {
        return Err(ComputeError::invalid_input(
            "term_years",
            "mortgage term must be positive",
        ));
    }
    if down > price {
        return Err(ComputeError::invalid_input(
            "down_payment",
            "down payment exceeds home price",
        ));
    }

    let principal = price - down;
    let payment = monthly_amortized(principal, rate, years);
    Ok(outputs([
        ("loan_amount", principal),
        ("monthly_payment", payment),
        ("total_interest", payment * years * 12.0 - principal),
    ]))
}

/// Monthly contribution needed to reach a future value at a given return
fn savings_goal(inputs: &CalcInputs) -> Result<CalcOutputs, ComputeError> {
    let goal = require_number(inputs, "goal")?;
    let years = require_number(inputs, "years")?;
    let rate = require_number(inputs, "rate")? / 100.0 / 12.0;
    if years <= 0.0 {
        return Err(ComputeError::invalid_input(
            "years",
            "time horizon must be positive",
        ));
    }

    let n = years * 12.0;
    let contribution = if rate == 0.0 {
        goal / n
    } else {
        goal * rate / ((1.0 + rate).powf(n) - 1.0)
    };
    Ok(outputs([
        ("monthly_contribution", contribution),
        ("total_contributed", contribution * n),
    ]))
}

fn tip(inputs: &CalcInputs) -> Result<CalcOutputs, ComputeError> {
    let bill = require_number(inputs, "bill")?;
    let percent = require_number(inputs, "tip_percent")?;
    let people = number_or(inputs, "people", 1.0).max(1.0);

    let tip_amount = bill * percent / 100.0;
    let total = bill + tip_amount;
    Ok(outputs([
        ("tip_amount", tip_amount),
        ("total", total),
        ("per_person", total / people),
    ]))
}

fn bmi(inputs: &CalcInputs) -> Result<CalcOutputs, ComputeError> {
    let weight = require_number(inputs, "weight_kg")?;
    let height_m = require_number(inputs, "height_cm")? / 100.0;
    if height_m <= 0.0 {
        return Err(ComputeError::invalid_input(
            "height_cm",
            "height must be positive",
        ));
    }

    let sq = height_m * height_m;
    Ok(outputs([
        ("bmi", weight / sq),
        ("healthy_min_kg", 18.5 * sq),
        ("healthy_max_kg", 24.9 * sq),
    ]))
}

/// Mifflin-St Jeor basal metabolic rate
fn bmr(inputs: &CalcInputs) -> Result<CalcOutputs, ComputeError> {
    let weight = require_number(inputs, "weight_kg")?;
    let height = require_number(inputs, "height_cm")?;
    let age = require_number(inputs, "age")?;
    let sex = inputs
        .get("sex")
        .and_then(CalcValue::as_str)
        .unwrap_or("male");

    let base = 10.0 * weight + 6.25 * height - 5.0 * age;
    let bmr = match sex {
        "female" => base - 161.0,
        _ => base + 5.0,
    };
    Ok(outputs([("bmr", bmr), ("maintenance", bmr * 1.55)]))
}

fn percentage(inputs: &CalcInputs) -> Result<CalcOutputs, ComputeError> {
    let value = require_number(inputs, "value")?;
    let percent = require_number(inputs, "percent")?;
    Ok(outputs([("result", value * percent / 100.0)]))
}

fn circle_area(inputs: &CalcInputs) -> Result<CalcOutputs, ComputeError> {
    let radius = require_number(inputs, "radius")?;
    if radius < 0.0 {
        return Err(ComputeError::invalid_input(
            "radius",
            "radius must be non-negative",
        ));
    }
    Ok(outputs([
        ("area", std::f64::consts::PI * radius * radius),
        ("circumference", 2.0 * std::f64::consts::PI * radius),
    ]))
}

fn fuel_economy(inputs: &CalcInputs) -> Result<CalcOutputs, ComputeError> {
    let distance = require_number(inputs, "distance_miles")?;
    let fuel = require_number(inputs, "fuel_gallons")?;
    if fuel <= 0.0 {
        return Err(ComputeError::invalid_input(
            "fuel_gallons",
            "fuel used must be positive",
        ));
    }
    Ok(outputs([("mpg", distance / fuel)]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(pairs: &[(&str, f64)]) -> CalcInputs {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), CalcValue::Number(*v)))
            .collect()
    }

    #[test]
    fn test_compound_interest() {
        let inputs = numbers(&[
            ("principal", 1000.0),
            ("rate", 5.0),
            ("years", 10.0),
            ("frequency", 12.0),
        ]);
        let out = compound_interest(&inputs).unwrap();
        assert!((out["final_amount"] - 1647.01).abs() < 0.01);
        assert!((out["interest_earned"] - 647.01).abs() < 0.01);
    }

    #[test]
    fn test_loan_payment_zero_rate() {
        let inputs = numbers(&[("amount", 12000.0), ("rate", 0.0), ("term_years", 1.0)]);
        let out = loan_payment(&inputs).unwrap();
        assert!((out["monthly_payment"] - 1000.0).abs() < 1e-9);
        assert!(out["total_interest"].abs() < 1e-6);
    }

    #[test]
    fn test_mortgage_standard_case() {
        // $300k at 6% over 30 years with $60k down: well-known ~$1,438.92/mo
        let inputs = numbers(&[
            ("home_price", 300_000.0),
            ("down_payment", 60_000.0),
            ("rate", 6.0),
            ("term_years", 30.0),
        ]);
        let out = mortgage_payment(&inputs).unwrap();
        assert_eq!(out["loan_amount"], 240_000.0);
        assert!((out["monthly_payment"] - 1438.92).abs() < 0.01);
    }

    #[test]
    fn test_bmi() {
        let inputs = numbers(&[("weight_kg", 70.0), ("height_cm", 175.0)]);
        let out = bmi(&inputs).unwrap();
        assert!((out["bmi"] - 22.857).abs() < 0.001);
    }

    #[test]
    fn test_bmr_sex_branch() {
        let mut inputs = numbers(&[("weight_kg", 60.0), ("height_cm", 165.0), ("age", 30.0)]);
        inputs.insert("sex".to_string(), CalcValue::Text("female".to_string()));
        let out = bmr(&inputs).unwrap();
        assert!((out["bmr"] - (600.0 + 1031.25 - 150.0 - 161.0)).abs() < 1e-9);
    }

    #[test]
    fn test_guard_errors() {
        let inputs = numbers(&[("distance_miles", 100.0), ("fuel_gallons", 0.0)]);
        assert!(fuel_economy(&inputs).is_err());

        let inputs = numbers(&[("weight_kg", 70.0), ("height_cm", 0.0)]);
        assert!(bmi(&inputs).is_err());
    }
}
