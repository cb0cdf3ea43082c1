use std::fmt;

use hashbrown::HashMap;

use crate::core::rules::IdentityRule;

/// Counters gathered while folding a program.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FoldStatistics {
    /// Binary instructions presented to the identity table
    pub visited: usize,
    /// Instructions that matched an identity
    pub matched: usize,
    /// Operand slots redirected to a replacement value
    pub uses_rewritten: usize,
    /// Instructions skipped because both operands were literals
    pub constant_pairs: usize,
    per_rule: HashMap<IdentityRule, usize>,
}

impl FoldStatistics {
    /// Record a match of `rule` that rewrote `uses` operand slots.
    pub fn record_match(&mut self, rule: IdentityRule, uses: usize) {
        self.matched += 1;
        self.uses_rewritten += uses;
        *self.per_rule.entry(rule).or_insert(0) += 1;
    }

    /// How many instructions matched `rule`.
    pub fn matches_for(&self, rule: IdentityRule) -> usize {
        self.per_rule.get(&rule).copied().unwrap_or(0)
    }

    /// Fold another run's counters into these.
    pub fn merge(&mut self, other: &FoldStatistics) {
        self.visited += other.visited;
        self.matched += other.matched;
        self.uses_rewritten += other.uses_rewritten;
        self.constant_pairs += other.constant_pairs;
        for (rule, count) in &other.per_rule {
            *self.per_rule.entry(*rule).or_insert(0) += count;
        }
    }
}

impl fmt::Display for FoldStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "visited {} binary instructions, matched {}, rewrote {} uses, skipped {} constant pairs",
            self.visited, self.matched, self.uses_rewritten, self.constant_pairs
        )?;
        let breakdown = IdentityRule::ALL
            .iter()
            .filter(|rule| self.matches_for(**rule) > 0)
            .map(|rule| format!("'{}': {}", rule, self.matches_for(*rule)))
            .collect::<Vec<String>>();
        if !breakdown.is_empty() {
            write!(f, " ({})", breakdown.join(", "))?;
        }
        Ok(())
    }
}

/// The result of a single run over a program.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FoldReport {
    /// Whether any operand slot was rewritten
    pub changed: bool,
    /// Counters for this run
    pub statistics: FoldStatistics,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statistics_merge_and_display() {
        let mut first = FoldStatistics { visited: 3, ..Default::default() };
        first.record_match(IdentityRule::AddZeroRhs, 2);

        let mut second = FoldStatistics { visited: 2, constant_pairs: 1, ..Default::default() };
        second.record_match(IdentityRule::AddZeroRhs, 1);
        second.record_match(IdentityRule::MulZeroLhs, 0);

        first.merge(&second);

        assert_eq!(first.visited, 5);
        assert_eq!(first.matched, 3);
        assert_eq!(first.uses_rewritten, 3);
        assert_eq!(first.constant_pairs, 1);
        assert_eq!(first.matches_for(IdentityRule::AddZeroRhs), 2);
        assert_eq!(first.matches_for(IdentityRule::MulZeroLhs), 1);
        assert_eq!(first.matches_for(IdentityRule::SDivOneRhs), 0);
        assert_eq!(
            first.to_string(),
            "visited 5 binary instructions, matched 3, rewrote 3 uses, skipped 1 constant pairs \
             ('0 * x => 0': 1, 'x + 0 => x': 2)"
        );
    }
}
