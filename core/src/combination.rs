//! Evidence synthesis: fixed rules that turn two clues into a new one.

use quantum_types::{Evidence, EvidenceId};

/// Two clues were combined but nothing connects them.
///
/// This is a normal outcome the player sees ("No Connection Found"), not an
/// error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoConnection {
    pub first: EvidenceId,
    pub second: EvidenceId,
}

impl NoConnection {
    pub const TITLE: &'static str = "No Connection Found";
    pub const DESCRIPTION: &'static str =
        "These pieces of evidence don't seem to be directly related in any meaningful way.";
}

struct CombinationRule {
    pair: (&'static str, &'static str),
    id: &'static str,
    name: &'static str,
    description: &'static str,
}

impl CombinationRule {
    fn matches(&self, a: &str, b: &str) -> bool {
        let (x, y) = self.pair;
        (x == a && y == b) || (x == b && y == a)
    }

    fn result(&self) -> Evidence {
        Evidence::from_static(self.id, self.name, self.description)
    }
}

const RULES: &[CombinationRule] = &[
    CombinationRule {
        pair: ("lipstick_cup_alpha", "family_photo_beta"),
        id: "cross_timeline_connection",
        name: "Cross-Timeline Connection",
        description: "The lipstick on the cup matches the missing daughter in the family photo - \
                      same person across realities!",
    },
    CombinationRule {
        pair: ("financial_records_alpha", "encrypted_message_gamma"),
        id: "money_trail_connection",
        name: "Money Trail Evidence",
        description: "The financial records show transfers to accounts mentioned in the \
                      encrypted syndicate messages.",
    },
    CombinationRule {
        pair: ("quantum_signature_delta", "morrison_badge_delta"),
        id: "quantum_killer_proof",
        name: "Quantum Killer Identity",
        description: "The quantum signatures match Detective Morrison's equipment - he's the \
                      interdimensional killer!",
    },
];

/// Look up the rule for an unordered pair of clue ids.
///
/// Pairing a clue with itself never connects.
pub fn combine(first: &EvidenceId, second: &EvidenceId) -> Result<Evidence, NoConnection> {
    let no_connection = || NoConnection {
        first: first.clone(),
        second: second.clone(),
    };
    if first == second {
        return Err(no_connection());
    }
    RULES
        .iter()
        .find(|rule| rule.matches(first.as_str(), second.as_str()))
        .map(CombinationRule::result)
        .ok_or_else(no_connection)
}

/// Ids of every clue that takes part in some rule.
pub fn combinable_ids() -> impl Iterator<Item = &'static str> {
    RULES.iter().flat_map(|rule| [rule.pair.0, rule.pair.1])
}
