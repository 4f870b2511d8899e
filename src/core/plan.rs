use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::{
    core::{
        calendar::{DaySet, MonthDay, TimeOfDay},
        period::Seasonal,
        time::Moment,
        window::{TimeWindow, covers},
    },
    quantity::{
        cost::Cost,
        energy::KilowattHours,
        rate::{KilowattHourRate, KilowattRate},
    },
};

/// Canonical retail plan, as produced by the normalization layer.
#[derive(Clone, Debug, Serialize, Deserialize, Builder)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    #[serde(rename = "planId")]
    #[builder(into)]
    pub id: String,

    #[serde(rename = "brandName", default)]
    #[builder(into, default)]
    pub brand: String,

    #[serde(default)]
    #[builder(into, default)]
    pub display_name: String,

    pub tariff_periods: Vec<TariffPeriod>,

    #[serde(default)]
    #[builder(default)]
    pub demand_charges: Vec<DemandChargePeriod>,

    #[serde(default)]
    #[builder(default)]
    pub fees: Vec<Fee>,

    #[serde(default)]
    #[builder(default)]
    pub discounts: Vec<Discount>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default)]
    pub eligibility_constraints: Vec<String>,
}

impl Plan {
    /// Sum of the fixed connection fees, if the plan has any.
    pub fn connection_fee(&self) -> Option<Cost> {
        self.fees.iter().filter_map(Fee::connection_amount).reduce(|lhs, rhs| lhs + rhs)
    }

    /// Discounts which are assumed to apply: guaranteed ones and pay-on-time ones.
    pub fn applicable_discounts(&self) -> impl Iterator<Item = &Discount> {
        self.discounts.iter().filter(|discount| discount.is_applicable())
    }
}

/// Dated season with its own supply charge and rates.
#[derive(Clone, Debug, Serialize, Deserialize, Builder)]
#[serde(rename_all = "camelCase")]
pub struct TariffPeriod {
    pub start_date: MonthDay,
    pub end_date: MonthDay,

    /// Charged once per calendar day.
    pub daily_supply_charge: Cost,

    pub rates: Vec<Rate>,
}

impl Seasonal for TariffPeriod {
    fn start_date(&self) -> MonthDay {
        self.start_date
    }

    fn end_date(&self) -> MonthDay {
        self.end_date
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RateType {
    #[default]
    Peak,
    OffPeak,
    Shoulder,
}

#[derive(Clone, Debug, Serialize, Deserialize, Builder)]
#[serde(rename_all = "camelCase")]
pub struct Rate {
    /// Informational only, resolution never looks at it.
    #[serde(rename = "type", default)]
    #[builder(default)]
    pub kind: RateType,

    pub unit_price: KilowattHourRate,

    /// Cumulative daily usage up to which this rate applies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_limit: Option<KilowattHours>,

    pub time_windows: Vec<TimeWindow>,
}

/// Dated season of demand charges.
#[derive(Clone, Debug, Serialize, Deserialize, Builder)]
#[serde(rename_all = "camelCase")]
pub struct DemandChargePeriod {
    pub start_date: MonthDay,
    pub end_date: MonthDay,
    pub demand_charges: Vec<DemandCharge>,
}

impl Seasonal for DemandChargePeriod {
    fn start_date(&self) -> MonthDay {
        self.start_date
    }

    fn end_date(&self) -> MonthDay {
        self.end_date
    }
}

/// Price per kilowatt of the monthly peak observed within the window, charged per day of the month.
#[derive(Clone, Debug, Serialize, Deserialize, Builder)]
#[serde(rename_all = "camelCase")]
pub struct DemandCharge {
    #[builder(into, default = DaySet::all())]
    pub days: DaySet,

    pub amount: KilowattRate,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurement_period: Option<String>,
}

impl DemandCharge {
    pub fn contains(&self, moment: &Moment) -> bool {
        self.days.contains(moment.day) && covers(self.start_time, self.end_time, moment.minute_of_day)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeeType {
    Connection,
    Disconnection,
    Reconnection,
    PaperBill,
    #[serde(other)]
    Other,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "term", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Fee {
    Fixed {
        #[serde(rename = "type")]
        kind: FeeType,

        amount: Cost,

        #[serde(default)]
        description: String,
    },

    /// Carried along but not charged yet.
    PercentOfBill {
        #[serde(rename = "type")]
        kind: FeeType,

        rate: f64,

        #[serde(default)]
        description: String,
    },
}

impl Fee {
    pub fn connection_amount(&self) -> Option<Cost> {
        match self {
            Self::Fixed { kind: FeeType::Connection, amount, .. } => Some(*amount),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountType {
    Guaranteed,
    Conditional,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountCategory {
    PayOnTime,
    DirectDebit,
    GuaranteedDiscount,
    #[serde(other)]
    Other,
}

/// Percentage-of-bill discount.
#[derive(Clone, Debug, Serialize, Deserialize, Builder)]
#[serde(rename_all = "camelCase")]
pub struct Discount {
    #[serde(rename = "type")]
    pub kind: DiscountType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<DiscountCategory>,

    #[serde(default)]
    #[builder(into, default)]
    pub description: String,

    #[serde(default)]
    #[builder(into, default)]
    pub display_name: String,

    /// Fraction of the bill, `0.05` is 5%.
    pub rate: f64,
}

impl Discount {
    /// Eligibility is not verified: a pay-on-time condition is assumed to be met.
    pub fn is_applicable(&self) -> bool {
        match self.kind {
            DiscountType::Guaranteed => true,
            DiscountType::Conditional => self.category == Some(DiscountCategory::PayOnTime),
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_deserialize_plan() {
        let plan: Plan = serde_json::from_str(
            r#"{
                "planId": "GLO724613MR@VEC",
                "brandName": "GloBird Energy",
                "displayName": "GloBird Combo FOUR4FREE Residential (Two Rate)",
                "tariffPeriods": [{
                    "startDate": "01-01",
                    "endDate": "12-31",
                    "dailySupplyCharge": 0.96,
                    "rates": [{
                        "type": "PEAK",
                        "unitPrice": 0.258,
                        "volumeLimit": 15,
                        "timeWindows": [{"days": ["MON", "SUN"], "startTime": "14:00", "endTime": "00:00"}]
                    }]
                }],
                "fees": [
                    {"term": "PERCENT_OF_BILL", "type": "OTHER", "rate": 0, "description": "Card fee"},
                    {"term": "FIXED", "type": "CONNECTION", "amount": 15.0, "description": "Reconnection"},
                    {"term": "FIXED", "type": "PAPER_BILL", "amount": 4.0}
                ],
                "discounts": [{
                    "type": "CONDITIONAL",
                    "category": "PAY_ON_TIME",
                    "displayName": "Prompt Payment Discounts",
                    "rate": 0.05
                }]
            }"#,
        )
        .unwrap();
        assert_eq!(plan.id, "GLO724613MR@VEC");
        let rate = &plan.tariff_periods[0].rates[0];
        assert_eq!(rate.kind, RateType::Peak);
        assert_abs_diff_eq!(rate.volume_limit.unwrap().0, 15.0);
        assert_abs_diff_eq!(plan.connection_fee().unwrap().0, 15.0);
        assert_eq!(plan.applicable_discounts().count(), 1);
        assert!(plan.demand_charges.is_empty());
    }

    #[test]
    fn test_deserialize_plan_without_names() {
        let plan: Plan = serde_json::from_str(
            r#"{
                "planId": "BARE",
                "tariffPeriods": [{
                    "startDate": "01-01",
                    "endDate": "12-31",
                    "dailySupplyCharge": 1.0,
                    "rates": [{
                        "unitPrice": 0.25,
                        "timeWindows": [{"days": ["MON"], "startTime": "00:00", "endTime": "00:00"}]
                    }]
                }]
            }"#,
        )
        .unwrap();
        assert_eq!(plan.id, "BARE");
        assert!(plan.brand.is_empty());
        assert!(plan.display_name.is_empty());
    }

    #[test]
    fn test_unknown_categories() {
        let discount: Discount = serde_json::from_str(
            r#"{"type": "CONDITIONAL", "category": "BUNDLE", "rate": 0.02}"#,
        )
        .unwrap();
        assert_eq!(discount.category, Some(DiscountCategory::Other));
        assert!(!discount.is_applicable());
    }

    #[test]
    fn test_discount_applicability() {
        let discount = |kind, category| {
            Discount::builder().kind(kind).maybe_category(category).rate(0.01).build()
        };
        assert!(discount(DiscountType::Guaranteed, None).is_applicable());
        assert!(
            discount(DiscountType::Conditional, Some(DiscountCategory::PayOnTime)).is_applicable()
        );
        assert!(
            !discount(DiscountType::Conditional, Some(DiscountCategory::DirectDebit))
                .is_applicable()
        );
        assert!(!discount(DiscountType::Conditional, None).is_applicable());
    }

    #[test]
    fn test_no_connection_fee() {
        let plan = Plan::builder()
            .id("no-fees")
            .tariff_periods(vec![])
            .fees(vec![Fee::PercentOfBill {
                kind: FeeType::Other,
                rate: 0.01,
                description: String::new(),
            }])
            .build();
        assert!(plan.connection_fee().is_none());
    }
}
