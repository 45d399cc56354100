//! Structured data hidden in KBC transaction descriptions.
//!
//! Some memo texts follow fixed templates. When a memo starts with one of the
//! known prefixes the rest of the template is mandatory: a memo that only
//! half matches is reported, never silently passed through.

use regex::Regex;
use std::sync::LazyLock;

/// A memo template: the prefix that selects it and the full pattern it must match.
#[derive(Debug)]
pub struct MemoPattern {
    /// Short name used in error messages.
    pub name: &'static str,
    prefix: &'static str,
    regex: LazyLock<Regex>,
}

/// Outcome of checking a memo against a [`MemoPattern`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoMatch<'m> {
    /// Memo does not start with the prefix; the pattern does not apply.
    NotApplicable,
    /// Memo matched; holds the captured value.
    Captured(&'m str),
    /// Memo has the prefix but not the mandatory rest.
    Mismatch,
}

impl MemoPattern {
    /// Returns `true` if the memo starts with this pattern's prefix.
    pub fn applies_to(&self, memo: &str) -> bool {
        memo.starts_with(self.prefix)
    }

    /// Matches the memo. Anchored at the start of the memo only; trailing text is allowed.
    pub fn captures<'m>(&self, memo: &'m str) -> MemoMatch<'m> {
        if !self.applies_to(memo) {
            return MemoMatch::NotApplicable;
        }
        match self.regex.captures(memo).and_then(|c| c.get(1)) {
            Some(m) => MemoMatch::Captured(m.as_str()),
            None => MemoMatch::Mismatch,
        }
    }
}

/// Periodic transfer to or from a savings account:
/// `AUTOMATISCH SPAREN 12-05 NAAR BE12 1234 5678 9012`.
///
/// Captures the counterparty account code.
pub static SAVINGS_TRANSFER: MemoPattern = MemoPattern {
    name: "savings",
    prefix: "AUTOMATISCH SPAREN",
    regex: LazyLock::new(|| {
        Regex::new(r"^AUTOMATISCH SPAREN\s+\d\d-\d\d\s+(?:NAAR|VAN) (\w\w\d\d(?: \d{4}){3})")
            .expect("savings transfer pattern is valid")
    }),
};

/// Maestro / Bancontact card payment:
/// `BETALING AANKOPEN VIA <terminal>, <merchant> MET KBC-BANKKAART`.
///
/// Captures the merchant name.
pub static CARD_PURCHASE: MemoPattern = MemoPattern {
    name: "maestro/bancontact transaction",
    prefix: "BETALING AANKOPEN VIA ",
    regex: LazyLock::new(|| {
        Regex::new(r"^BETALING AANKOPEN VIA (?:.+), (.+) MET KBC-(?:BANK|DEBET)KAART")
            .expect("card purchase pattern is valid")
    }),
};
