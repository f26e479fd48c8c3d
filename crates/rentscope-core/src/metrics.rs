use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::RentscopeError;
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::RentscopeResult;

const HUNDRED: Decimal = dec!(100);
const MONTHS_PER_YEAR: Decimal = dec!(12);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Property facts, as supplied by the estimation service or edited by the
/// user. Every field defaults so partial or legacy payloads always decode:
/// missing numeric fields read as zero, a missing rent roll as empty, and a
/// missing unit count as a single unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyFacts {
    /// Purchase price
    pub list_price: Money,
    /// Number of rental units, at least 1
    pub num_units: u32,
    /// Fallback monthly rent per unit, used while the rent roll is empty
    pub estimated_rent_per_unit: Money,
    /// Monthly rent per unit, insertion order = unit index. When non-empty
    /// this overrides `estimated_rent_per_unit * num_units`.
    pub unit_rents: Vec<Money>,
    pub property_tax_annual: Money,
    pub insurance_annual: Money,
    pub hoa_monthly: Money,
    /// Percentage points applied to effective (post-vacancy) gross income
    pub maintenance_rate: Percent,
    /// Percentage points applied to potential gross income
    pub vacancy_rate: Percent,
}

impl Default for PropertyFacts {
    fn default() -> Self {
        Self {
            list_price: Decimal::ZERO,
            num_units: 1,
            estimated_rent_per_unit: Decimal::ZERO,
            unit_rents: Vec::new(),
            property_tax_annual: Decimal::ZERO,
            insurance_annual: Decimal::ZERO,
            hoa_monthly: Decimal::ZERO,
            maintenance_rate: Decimal::ZERO,
            vacancy_rate: Decimal::ZERO,
        }
    }
}

/// User-editable financing assumptions. Defaults are the product defaults,
/// so a record missing a field gets a workable assumption rather than zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancialParams {
    /// Down payment as a percentage of purchase price, 0-100
    pub down_payment_percent: Percent,
    /// Annual mortgage interest rate in percentage points
    pub interest_rate: Percent,
    /// Loan term in years; any positive integer is accepted
    pub loan_term_years: u32,
    /// Closing costs as a percentage of purchase price, 0-100
    pub closing_costs_percent: Percent,
}

impl Default for FinancialParams {
    fn default() -> Self {
        Self {
            down_payment_percent: dec!(20),
            interest_rate: dec!(7),
            loan_term_years: 30,
            closing_costs_percent: dec!(2),
        }
    }
}

/// A complete analysis request: the property, the financing, and the address
/// it was estimated for (informational only).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisInput {
    pub address: String,
    pub property: PropertyFacts,
    pub params: FinancialParams,
}

/// Derived investment metrics. A pure function of the two input records;
/// rate fields are on the whole-number percentage scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// Potential gross annual income before vacancy
    pub gross_annual_income: Money,
    /// Gross income less vacancy loss
    pub effective_gross_income: Money,
    /// Taxes + insurance + HOA + maintenance, annualised
    pub total_operating_expenses: Money,
    pub noi: Money,
    pub cap_rate: Percent,
    pub monthly_mortgage_payment: Money,
    pub annual_debt_service: Money,
    pub annual_cash_flow: Money,
    pub cash_on_cash_return: Percent,
    /// Down payment plus closing costs
    pub total_initial_investment: Money,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Derive the full metric set from property facts and financing assumptions.
///
/// Pure and infallible: no I/O, no state, and every mathematically undefined
/// case (zero price, zero investment, zero-month term) degrades to zero so a
/// caller can always render something while the user is still typing.
pub fn compute(property: &PropertyFacts, params: &FinancialParams) -> CalculationResult {
    // The rent roll wins whenever it has entries; the per-unit estimate is
    // only a fallback for the window where the unit count changed but rents
    // have not been re-entered yet.
    let monthly_gross_income: Money = if property.unit_rents.is_empty() {
        property.estimated_rent_per_unit * Decimal::from(property.num_units)
    } else {
        property.unit_rents.iter().copied().sum()
    };

    let gross_annual_income = monthly_gross_income * MONTHS_PER_YEAR;
    let vacancy_loss = gross_annual_income * property.vacancy_rate / HUNDRED;
    let effective_gross_income = gross_annual_income - vacancy_loss;

    // Maintenance is a share of post-vacancy income, not of potential rent.
    // The ordering materially changes NOI; do not reorder.
    let maintenance_annual = effective_gross_income * property.maintenance_rate / HUNDRED;
    let hoa_annual = property.hoa_monthly * MONTHS_PER_YEAR;
    let total_operating_expenses = property.property_tax_annual
        + property.insurance_annual
        + hoa_annual
        + maintenance_annual;

    let noi = effective_gross_income - total_operating_expenses;

    let cap_rate = if property.list_price > Decimal::ZERO {
        noi / property.list_price * HUNDRED
    } else {
        Decimal::ZERO
    };

    let down_payment = property.list_price * params.down_payment_percent / HUNDRED;
    let loan_amount = property.list_price - down_payment;
    let total_months = u64::from(params.loan_term_years) * 12;

    let monthly_mortgage_payment = monthly_payment(loan_amount, params.interest_rate, total_months);
    let annual_debt_service = monthly_mortgage_payment * MONTHS_PER_YEAR;
    let annual_cash_flow = noi - annual_debt_service;

    let closing_costs = property.list_price * params.closing_costs_percent / HUNDRED;
    let total_initial_investment = down_payment + closing_costs;

    let cash_on_cash_return = if total_initial_investment > Decimal::ZERO {
        annual_cash_flow / total_initial_investment * HUNDRED
    } else {
        Decimal::ZERO
    };

    CalculationResult {
        gross_annual_income,
        effective_gross_income,
        total_operating_expenses,
        noi,
        cap_rate,
        monthly_mortgage_payment,
        annual_debt_service,
        annual_cash_flow,
        cash_on_cash_return,
        total_initial_investment,
    }
}

/// Fixed-rate amortising payment: L * r(1+r)^n / ((1+r)^n - 1).
///
/// Zero rate falls back to straight-line repayment; a non-positive loan or a
/// zero-month term yields no payment at all.
fn monthly_payment(loan_amount: Money, interest_rate: Percent, total_months: u64) -> Money {
    if loan_amount <= Decimal::ZERO || total_months == 0 {
        return Decimal::ZERO;
    }

    if interest_rate <= Decimal::ZERO {
        return loan_amount / Decimal::from(total_months);
    }

    let monthly_rate = interest_rate / HUNDRED / MONTHS_PER_YEAR;

    // (1 + r)^n via iterative multiplication
    let one_plus_r = Decimal::ONE + monthly_rate;
    let mut compound = Decimal::ONE;
    for _ in 0..total_months {
        compound = match compound.checked_mul(one_plus_r) {
            Some(c) => c,
            // (1+r)^n has outgrown Decimal. At this magnitude the
            // amortisation factor (1+r)^n / ((1+r)^n - 1) is 1, so the
            // payment is pure interest on the principal.
            None => return loan_amount * monthly_rate,
        };
    }

    let denominator = compound - Decimal::ONE;
    if denominator.is_zero() {
        return Decimal::ZERO;
    }

    loan_amount * monthly_rate * compound / denominator
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Caller-side pre-validation. The engine itself never fails; front ends run
/// this before accepting an edit so out-of-range values are rejected with a
/// field-level message instead of silently producing degenerate metrics.
pub fn validate(property: &PropertyFacts, params: &FinancialParams) -> RentscopeResult<()> {
    fn non_negative(field: &str, value: Decimal) -> RentscopeResult<()> {
        if value < Decimal::ZERO {
            return Err(RentscopeError::InvalidInput {
                field: field.into(),
                reason: "must not be negative".into(),
            });
        }
        Ok(())
    }

    fn percent_range(field: &str, value: Decimal) -> RentscopeResult<()> {
        if value < Decimal::ZERO || value > HUNDRED {
            return Err(RentscopeError::InvalidInput {
                field: field.into(),
                reason: "must be between 0 and 100".into(),
            });
        }
        Ok(())
    }

    non_negative("list_price", property.list_price)?;
    non_negative("estimated_rent_per_unit", property.estimated_rent_per_unit)?;
    non_negative("property_tax_annual", property.property_tax_annual)?;
    non_negative("insurance_annual", property.insurance_annual)?;
    non_negative("hoa_monthly", property.hoa_monthly)?;
    percent_range("maintenance_rate", property.maintenance_rate)?;
    percent_range("vacancy_rate", property.vacancy_rate)?;

    if property.num_units == 0 {
        return Err(RentscopeError::InvalidInput {
            field: "num_units".into(),
            reason: "must be at least 1".into(),
        });
    }

    for (i, rent) in property.unit_rents.iter().enumerate() {
        if *rent < Decimal::ZERO {
            return Err(RentscopeError::InvalidInput {
                field: format!("unit_rents[{i}]"),
                reason: "must not be negative".into(),
            });
        }
    }

    percent_range("down_payment_percent", params.down_payment_percent)?;
    percent_range("closing_costs_percent", params.closing_costs_percent)?;
    non_negative("interest_rate", params.interest_rate)?;

    if params.loan_term_years == 0 {
        return Err(RentscopeError::InvalidInput {
            field: "loan_term_years".into(),
            reason: "must be at least 1 year".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// Run the engine and wrap the result in the standard computation envelope,
/// with advisory warnings for metrics outside typical market ranges. The
/// warnings never change the result record.
pub fn analyze(input: &AnalysisInput) -> ComputationOutput<CalculationResult> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let result = compute(&input.property, &input.params);

    if result.cap_rate > Decimal::ZERO && result.cap_rate < dec!(3) {
        warnings.push(format!(
            "Cap rate {:.2}% is below 3% — unusually low, verify rent and price estimates",
            result.cap_rate
        ));
    }
    if result.cap_rate > dec!(12) {
        warnings.push(format!(
            "Cap rate {:.2}% exceeds 12% — unusually high, may indicate elevated risk",
            result.cap_rate
        ));
    }

    if input.property.vacancy_rate > dec!(15) {
        warnings.push(format!(
            "Vacancy rate {:.1}% exceeds 15% — above typical market norms",
            input.property.vacancy_rate
        ));
    }

    if result.annual_cash_flow < Decimal::ZERO {
        warnings.push(format!(
            "Negative annual cash flow of {:.0} — debt service exceeds NOI",
            result.annual_cash_flow
        ));
    }

    if result.annual_debt_service > Decimal::ZERO {
        let dscr = result.noi / result.annual_debt_service;
        if dscr < dec!(1.2) {
            warnings.push(format!(
                "DSCR of {dscr:.2} is below 1.20x — lender covenant risk"
            ));
        }
    }

    let elapsed = start.elapsed().as_micros() as u64;

    with_metadata(
        "Rental Property Investment Metrics (Direct Capitalisation)",
        input,
        warnings,
        elapsed,
        result,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    /// Single-family rental at $200k, the worked example used throughout
    fn sample_property() -> PropertyFacts {
        PropertyFacts {
            list_price: dec!(200000),
            num_units: 1,
            estimated_rent_per_unit: dec!(1500),
            unit_rents: vec![],
            property_tax_annual: dec!(2400),
            insurance_annual: dec!(1200),
            hoa_monthly: Decimal::ZERO,
            maintenance_rate: dec!(5),
            vacancy_rate: dec!(5),
        }
    }

    fn sample_params() -> FinancialParams {
        FinancialParams {
            down_payment_percent: dec!(20),
            interest_rate: dec!(6),
            loan_term_years: 30,
            closing_costs_percent: dec!(2),
        }
    }

    fn assert_close(actual: Decimal, expected: Decimal, tolerance: Decimal) {
        let diff = (actual - expected).abs();
        assert!(
            diff <= tolerance,
            "expected {expected} ± {tolerance}, got {actual} (diff {diff})"
        );
    }

    // --- Income and expenses ---

    #[test]
    fn test_income_expense_chain() {
        let result = compute(&sample_property(), &sample_params());

        // 1500/mo * 12 = 18000 potential
        assert_eq!(result.gross_annual_income, dec!(18000));

        // Vacancy 5% of 18000 = 900, EGI = 17100
        assert_eq!(result.effective_gross_income, dec!(17100));

        // OpEx = 2400 tax + 1200 insurance + 0 HOA + 855 maintenance (5% of EGI)
        assert_eq!(result.total_operating_expenses, dec!(4455));

        // NOI = 17100 - 4455
        assert_eq!(result.noi, dec!(12645));
    }

    #[test]
    fn test_maintenance_applies_to_effective_income() {
        // Maintenance on EGI, not potential gross: 5% of 17100 = 855, not 900.
        let result = compute(&sample_property(), &sample_params());
        let maintenance = result.total_operating_expenses - dec!(2400) - dec!(1200);
        assert_eq!(maintenance, dec!(855));
    }

    #[test]
    fn test_financing_chain() {
        let result = compute(&sample_property(), &sample_params());

        // Loan = 200000 - 20% down = 160000 at 0.5%/mo over 360 payments
        assert_close(result.monthly_mortgage_payment, dec!(959.28), dec!(0.01));
        assert_close(result.annual_debt_service, dec!(11511.4), dec!(0.1));
        assert_close(result.annual_cash_flow, dec!(1133.6), dec!(0.1));

        // 40000 down + 4000 closing
        assert_eq!(result.total_initial_investment, dec!(44000));
        assert_close(result.cash_on_cash_return, dec!(2.576), dec!(0.001));
    }

    #[test]
    fn test_cap_rate_exact() {
        let result = compute(&sample_property(), &sample_params());
        // 12645 / 200000 * 100
        assert_eq!(result.cap_rate, dec!(6.3225));
    }

    // --- Rent roll override ---

    #[test]
    fn test_unit_rents_override_estimate() {
        let mut property = sample_property();
        property.num_units = 3;
        property.estimated_rent_per_unit = dec!(9999);
        property.unit_rents = vec![dec!(1000), dec!(1200), dec!(900)];

        let result = compute(&property, &sample_params());
        // 3100/mo regardless of the per-unit estimate
        assert_eq!(result.gross_annual_income, dec!(37200));
    }

    #[test]
    fn test_empty_rent_roll_falls_back() {
        let mut property = sample_property();
        property.num_units = 4;
        property.estimated_rent_per_unit = dec!(800);

        let result = compute(&property, &sample_params());
        assert_eq!(result.gross_annual_income, dec!(38400));
    }

    // --- Edge cases degrade to zero ---

    #[test]
    fn test_zero_price_zero_cap_rate() {
        let mut property = sample_property();
        property.list_price = Decimal::ZERO;

        let result = compute(&property, &sample_params());
        assert_eq!(result.cap_rate, Decimal::ZERO);
        // No price means no down payment and no closing costs either
        assert_eq!(result.total_initial_investment, Decimal::ZERO);
        assert_eq!(result.cash_on_cash_return, Decimal::ZERO);
    }

    #[test]
    fn test_all_cash_purchase() {
        let mut property = sample_property();
        property.list_price = dec!(100000);
        let params = FinancialParams {
            down_payment_percent: dec!(100),
            closing_costs_percent: Decimal::ZERO,
            ..sample_params()
        };

        let result = compute(&property, &params);
        assert_eq!(result.monthly_mortgage_payment, Decimal::ZERO);
        assert_eq!(result.annual_debt_service, Decimal::ZERO);
        assert_eq!(result.annual_cash_flow, result.noi);
        assert_eq!(result.total_initial_investment, dec!(100000));
    }

    #[test]
    fn test_zero_interest_straight_line() {
        let params = FinancialParams {
            down_payment_percent: Decimal::ZERO,
            interest_rate: Decimal::ZERO,
            loan_term_years: 30,
            closing_costs_percent: Decimal::ZERO,
        };
        let mut property = sample_property();
        property.list_price = dec!(180000);

        let result = compute(&property, &params);
        // Exactly L / n: 180000 / 360
        assert_eq!(result.monthly_mortgage_payment, dec!(500));
    }

    #[test]
    fn test_extreme_term_degrades_to_interest_only() {
        // Long enough for (1.005)^n to exceed Decimal's range. The payment
        // settles at pure interest on the principal instead of panicking.
        let params = FinancialParams {
            interest_rate: dec!(6),
            loan_term_years: 1200,
            ..sample_params()
        };
        let result = compute(&sample_property(), &params);
        // Loan 160000 at 0.5%/mo
        assert_eq!(result.monthly_mortgage_payment, dec!(800));
        assert_eq!(result.annual_debt_service, dec!(9600));
    }

    #[test]
    fn test_everything_zero_still_renders() {
        let result = compute(&PropertyFacts::default(), &FinancialParams::default());
        assert_eq!(result.noi, Decimal::ZERO);
        assert_eq!(result.cap_rate, Decimal::ZERO);
        assert_eq!(result.monthly_mortgage_payment, Decimal::ZERO);
        assert_eq!(result.cash_on_cash_return, Decimal::ZERO);
    }

    // --- Purity ---

    #[test]
    fn test_repeated_calls_identical() {
        let property = sample_property();
        let params = sample_params();
        let first = compute(&property, &params);
        let second = compute(&property, &params);
        assert_eq!(first, second);
    }

    #[test]
    fn test_field_order_irrelevant() {
        let a: PropertyFacts = serde_json::from_str(
            r#"{"list_price":"200000","vacancy_rate":"5","estimated_rent_per_unit":"1500"}"#,
        )
        .unwrap();
        let b: PropertyFacts = serde_json::from_str(
            r#"{"vacancy_rate":"5","estimated_rent_per_unit":"1500","list_price":"200000"}"#,
        )
        .unwrap();

        assert_eq!(a, b);
        assert_eq!(
            compute(&a, &FinancialParams::default()),
            compute(&b, &FinancialParams::default())
        );
    }

    // --- Tolerant decoding ---

    #[test]
    fn test_empty_payload_decodes_to_defaults() {
        let property: PropertyFacts = serde_json::from_str("{}").unwrap();
        assert_eq!(property.num_units, 1);
        assert_eq!(property.list_price, Decimal::ZERO);
        assert!(property.unit_rents.is_empty());

        let params: FinancialParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.loan_term_years, 30);
    }

    // --- Validation ---

    #[test]
    fn test_validate_accepts_sample() {
        assert!(validate(&sample_property(), &sample_params()).is_ok());
    }

    #[test]
    fn test_validate_rejects_negative_price() {
        let mut property = sample_property();
        property.list_price = dec!(-1);
        let err = validate(&property, &sample_params()).unwrap_err();
        match err {
            RentscopeError::InvalidInput { field, .. } => assert_eq!(field, "list_price"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_down_payment_over_100() {
        let params = FinancialParams {
            down_payment_percent: dec!(101),
            ..sample_params()
        };
        assert!(validate(&sample_property(), &params).is_err());
    }

    #[test]
    fn test_validate_rejects_zero_units() {
        let mut property = sample_property();
        property.num_units = 0;
        assert!(validate(&property, &sample_params()).is_err());
    }

    #[test]
    fn test_validate_rejects_zero_term() {
        let params = FinancialParams {
            loan_term_years: 0,
            ..sample_params()
        };
        assert!(validate(&sample_property(), &params).is_err());
    }

    #[test]
    fn test_validate_rejects_negative_unit_rent() {
        let mut property = sample_property();
        property.unit_rents = vec![dec!(1000), dec!(-50)];
        let err = validate(&property, &sample_params()).unwrap_err();
        match err {
            RentscopeError::InvalidInput { field, .. } => assert_eq!(field, "unit_rents[1]"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    // --- Envelope and warnings ---

    #[test]
    fn test_analyze_envelope() {
        let input = AnalysisInput {
            address: "123 Main St".into(),
            property: sample_property(),
            params: sample_params(),
        };
        let output = analyze(&input);
        assert_eq!(
            output.methodology,
            "Rental Property Investment Metrics (Direct Capitalisation)"
        );
        assert_eq!(output.result, compute(&input.property, &input.params));
    }

    #[test]
    fn test_negative_cash_flow_warning() {
        let mut property = sample_property();
        property.estimated_rent_per_unit = dec!(600); // rent far below carrying cost
        let input = AnalysisInput {
            address: String::new(),
            property,
            params: sample_params(),
        };
        let output = analyze(&input);
        assert!(output.result.annual_cash_flow < Decimal::ZERO);
        assert!(output
            .warnings
            .iter()
            .any(|w| w.contains("Negative annual cash flow")));
    }

    #[test]
    fn test_high_vacancy_warning() {
        let mut property = sample_property();
        property.vacancy_rate = dec!(20);
        let input = AnalysisInput {
            address: String::new(),
            property,
            params: sample_params(),
        };
        let output = analyze(&input);
        assert!(output.warnings.iter().any(|w| w.contains("exceeds 15%")));
    }

    #[test]
    fn test_low_dscr_warning() {
        let mut params = sample_params();
        params.down_payment_percent = dec!(5); // nearly fully levered
        let input = AnalysisInput {
            address: String::new(),
            property: sample_property(),
            params,
        };
        let output = analyze(&input);
        assert!(output.warnings.iter().any(|w| w.contains("DSCR")));
    }

    #[test]
    fn test_no_warnings_on_sound_deal() {
        // 40% down keeps DSCR comfortably above the 1.20x advisory line
        let params = FinancialParams {
            down_payment_percent: dec!(40),
            ..sample_params()
        };
        let input = AnalysisInput {
            address: String::new(),
            property: sample_property(),
            params,
        };
        let output = analyze(&input);
        assert!(output.warnings.is_empty(), "unexpected: {:?}", output.warnings);
    }

    // --- Payment helper ---

    #[test]
    fn test_monthly_payment_sanity() {
        // $750k at 6.5% over 30 years, expected ~$4,740/mo
        let payment = monthly_payment(dec!(750000), dec!(6.5), 360);
        assert!(
            payment > dec!(4700) && payment < dec!(4800),
            "monthly payment {payment} outside expected range"
        );
    }

    #[test]
    fn test_monthly_payment_zero_months() {
        assert_eq!(monthly_payment(dec!(100000), dec!(6), 0), Decimal::ZERO);
    }

    #[test]
    fn test_monthly_payment_negative_loan() {
        assert_eq!(monthly_payment(dec!(-5000), dec!(6), 360), Decimal::ZERO);
    }
}
