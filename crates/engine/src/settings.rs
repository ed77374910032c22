use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Optional behaviours of the entry builder and its reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GroupingRule {
    /// Pair simple getters and setters of the same property.
    GettersAndSetters,
    OverriddenMethods,
    DependentMethods,
}

impl GroupingRule {
    pub const ALL: [GroupingRule; 3] = [
        GroupingRule::GettersAndSetters,
        GroupingRule::OverriddenMethods,
        GroupingRule::DependentMethods,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GroupingRule::GettersAndSetters => "getters-and-setters",
            GroupingRule::OverriddenMethods => "overridden-methods",
            GroupingRule::DependentMethods => "dependent-methods",
        }
    }
}

impl fmt::Display for GroupingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupingRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GroupingRule::ALL
            .into_iter()
            .find(|rule| rule.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let known: Vec<&str> = GroupingRule::ALL.iter().map(|r| r.as_str()).collect();
                format!("unknown grouping rule '{s}', expected one of: {}", known.join(", "))
            })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrangementSettings {
    #[serde(default)]
    pub grouping_rules: BTreeSet<GroupingRule>,
}

impl ArrangementSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rule(mut self, rule: GroupingRule) -> Self {
        self.grouping_rules.insert(rule);
        self
    }

    pub fn has_rule(&self, rule: GroupingRule) -> bool {
        self.grouping_rules.contains(&rule)
    }
}

impl FromIterator<GroupingRule> for ArrangementSettings {
    fn from_iter<I: IntoIterator<Item = GroupingRule>>(iter: I) -> Self {
        Self {
            grouping_rules: iter.into_iter().collect(),
        }
    }
}
