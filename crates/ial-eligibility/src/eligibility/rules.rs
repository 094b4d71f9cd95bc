use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::domain::MissingItem;

/// Closed set of rule shapes a qualification can be awarded under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QualificationRule {
    SimpleList(ListRule),
    RequiredPlusOneOf(OneOfRule),
    RequiredPlusPair(PairRule),
    RequiredPlusExcludingMinCount(ExclusionRule),
    RequiredAtLeastOnePlusExcludingMinCount(ThresholdRule),
    MultiRoute(RouteRule),
}

impl QualificationRule {
    pub fn evaluate(&self, selected: &BTreeSet<String>) -> RuleOutcome {
        match self {
            QualificationRule::SimpleList(rule) => rule.evaluate(selected),
            QualificationRule::RequiredPlusOneOf(rule) => rule.evaluate(selected),
            QualificationRule::RequiredPlusPair(rule) => rule.evaluate(selected),
            QualificationRule::RequiredPlusExcludingMinCount(rule) => rule.evaluate(selected),
            QualificationRule::RequiredAtLeastOnePlusExcludingMinCount(rule) => {
                rule.evaluate(selected)
            }
            QualificationRule::MultiRoute(rule) => rule.evaluate(selected),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            QualificationRule::SimpleList(_) => "simple_list",
            QualificationRule::RequiredPlusOneOf(_) => "required_plus_one_of",
            QualificationRule::RequiredPlusPair(_) => "required_plus_pair",
            QualificationRule::RequiredPlusExcludingMinCount(_) => {
                "required_plus_excluding_min_count"
            }
            QualificationRule::RequiredAtLeastOnePlusExcludingMinCount(_) => {
                "required_at_least_one_plus_excluding_min_count"
            }
            QualificationRule::MultiRoute(_) => "multi_route",
        }
    }

    /// True when a choice clause has nothing to choose from.
    pub(crate) fn has_empty_alternatives(&self) -> bool {
        match self {
            QualificationRule::SimpleList(rule) => rule.units.is_empty(),
            QualificationRule::RequiredPlusOneOf(rule) => rule.one_of.is_empty(),
            QualificationRule::RequiredPlusPair(rule) => rule.pairs.is_empty(),
            QualificationRule::RequiredPlusExcludingMinCount(_) => false,
            QualificationRule::RequiredAtLeastOnePlusExcludingMinCount(rule) => {
                rule.at_least_one_of.is_empty()
            }
            QualificationRule::MultiRoute(rule) => rule.routes.is_empty(),
        }
    }
}

/// Result of evaluating one rule against a selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleOutcome {
    pub satisfied: bool,
    pub missing: Vec<MissingItem>,
}

impl RuleOutcome {
    fn from_missing(missing: Vec<MissingItem>) -> Self {
        Self {
            satisfied: missing.is_empty(),
            missing,
        }
    }
}

/// Evaluates `rule` against `selected`. Empty selections are valid and report everything missing.
pub fn evaluate(rule: &QualificationRule, selected: &BTreeSet<String>) -> RuleOutcome {
    rule.evaluate(selected)
}

/// Every listed unit is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRule {
    pub units: Vec<String>,
}

impl ListRule {
    pub fn evaluate(&self, selected: &BTreeSet<String>) -> RuleOutcome {
        RuleOutcome::from_missing(absent(&self.units, selected).map(unit_item).collect())
    }
}

/// Required units plus at least one of a set of options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneOfRule {
    pub required: Vec<String>,
    pub one_of: Vec<String>,
}

impl OneOfRule {
    pub fn evaluate(&self, selected: &BTreeSet<String>) -> RuleOutcome {
        let mut missing: Vec<MissingItem> =
            absent(&self.required, selected).map(unit_item).collect();

        if !any_present(&self.one_of, selected) {
            missing.push(MissingItem::OneOf {
                units: self.one_of.clone(),
            });
        }

        RuleOutcome::from_missing(missing)
    }
}

/// Required units plus one fully present pair, tested in declared order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairRule {
    pub required: Vec<String>,
    pub pairs: Vec<(String, String)>,
}

impl PairRule {
    pub fn evaluate(&self, selected: &BTreeSet<String>) -> RuleOutcome {
        let mut missing: Vec<MissingItem> =
            absent(&self.required, selected).map(unit_item).collect();

        if self.first_satisfied_pair(selected).is_none() {
            missing.push(MissingItem::ValidPair {
                pairs: self.pairs.clone(),
            });
        }

        RuleOutcome::from_missing(missing)
    }

    pub fn first_satisfied_pair(
        &self,
        selected: &BTreeSet<String>,
    ) -> Option<&(String, String)> {
        self.pairs
            .iter()
            .find(|(first, second)| selected.contains(first) && selected.contains(second))
    }
}

/// One required unit plus a minimum count of units outside an exclusion set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionRule {
    pub required: String,
    pub excluding: Vec<String>,
    pub min_units: usize,
}

impl ExclusionRule {
    pub fn evaluate(&self, selected: &BTreeSet<String>) -> RuleOutcome {
        let mut missing = Vec::new();

        if !selected.contains(&self.required) {
            missing.push(MissingItem::RequiredUnit {
                code: self.required.clone(),
            });
        }

        let have = pool_size(selected, &self.excluding);
        if have < self.min_units {
            missing.push(MissingItem::MinUnits {
                required: self.min_units,
                excluding: self.excluding.clone(),
                have,
            });
        }

        RuleOutcome::from_missing(missing)
    }
}

/// Required units, at least one of a set, and a minimum count outside an exclusion set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdRule {
    pub required: Vec<String>,
    pub at_least_one_of: Vec<String>,
    pub excluding: Vec<String>,
    pub min_units: usize,
}

impl ThresholdRule {
    pub fn evaluate(&self, selected: &BTreeSet<String>) -> RuleOutcome {
        let mut missing: Vec<MissingItem> = absent(&self.required, selected)
            .map(|code| MissingItem::RequiredUnit { code: code.clone() })
            .collect();

        if !any_present(&self.at_least_one_of, selected) {
            missing.push(MissingItem::AtLeastOneOf {
                units: self.at_least_one_of.clone(),
            });
        }

        let have = pool_size(selected, &self.excluding);
        if have < self.min_units {
            missing.push(MissingItem::MinUnits {
                required: self.min_units,
                excluding: self.excluding.clone(),
                have,
            });
        }

        RuleOutcome::from_missing(missing)
    }
}

/// Alternative routes; any single satisfied route awards the qualification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRule {
    pub routes: Vec<Route>,
}

impl RouteRule {
    pub fn evaluate(&self, selected: &BTreeSet<String>) -> RuleOutcome {
        if self.satisfied_route(selected).is_some() {
            return RuleOutcome::from_missing(Vec::new());
        }

        RuleOutcome::from_missing(vec![MissingItem::RouteAlternatives {
            routes: self.routes.iter().map(ToString::to_string).collect(),
        }])
    }

    pub fn satisfied_route(&self, selected: &BTreeSet<String>) -> Option<&Route> {
        self.routes.iter().find(|route| route.is_satisfied(selected))
    }
}

/// One conjunctive route of a [`RouteRule`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub required: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub one_from: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count_from: Option<CountFrom>,
}

impl Route {
    pub fn is_satisfied(&self, selected: &BTreeSet<String>) -> bool {
        let has_required = absent(&self.required, selected).next().is_none();
        let has_one = self.one_from.is_empty() || any_present(&self.one_from, selected);
        let has_count = self
            .count_from
            .as_ref()
            .map(|clause| clause.present(selected) >= clause.count)
            .unwrap_or(true);

        has_required && has_one && has_count
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if !self.required.is_empty() {
            parts.push(self.required.join(" + "));
        }
        if !self.one_from.is_empty() {
            parts.push(format!("one of {}", self.one_from.join("/")));
        }
        if let Some(clause) = &self.count_from {
            parts.push(format!("{} from {}", clause.count, clause.units.join("/")));
        }
        f.write_str(&parts.join(" + "))
    }
}

/// "N from M" clause of a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountFrom {
    pub count: usize,
    pub units: Vec<String>,
}

impl CountFrom {
    fn present(&self, selected: &BTreeSet<String>) -> usize {
        self.units
            .iter()
            .filter(|code| selected.contains(*code))
            .count()
    }
}

fn absent<'a>(
    codes: &'a [String],
    selected: &'a BTreeSet<String>,
) -> impl Iterator<Item = &'a String> + 'a {
    codes.iter().filter(move |code| !selected.contains(*code))
}

fn any_present(codes: &[String], selected: &BTreeSet<String>) -> bool {
    codes.iter().any(|code| selected.contains(code))
}

fn pool_size(selected: &BTreeSet<String>, excluding: &[String]) -> usize {
    selected
        .iter()
        .filter(|code| !excluding.contains(*code))
        .count()
}

fn unit_item(code: &String) -> MissingItem {
    MissingItem::Unit { code: code.clone() }
}
