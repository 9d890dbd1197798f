//! Plural rules: locale tag → ordered plural categories plus a selector.
//!
//! The position of a category in [`PluralRule::categories`] is the index of
//! its form in a numerus message's form list. Orders follow the ones Qt
//! Linguist writes, so catalogs produced by `lupdate` line up form for form.
//!
//! The table is static: built on first use and never modified.

use std::{collections::HashMap, fmt, str::FromStr};

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::locale;

/// CLDR plural category names.
#[derive(Ord, PartialOrd, Eq, PartialEq, Debug, Clone, Copy, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PluralCategory {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
}

impl PluralCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PluralCategory::Zero => "zero",
            PluralCategory::One => "one",
            PluralCategory::Two => "two",
            PluralCategory::Few => "few",
            PluralCategory::Many => "many",
            PluralCategory::Other => "other",
        }
    }
}

impl fmt::Display for PluralCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PluralCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ZERO" => Ok(PluralCategory::Zero),
            "ONE" => Ok(PluralCategory::One),
            "TWO" => Ok(PluralCategory::Two),
            "FEW" => Ok(PluralCategory::Few),
            "MANY" => Ok(PluralCategory::Many),
            "OTHER" => Ok(PluralCategory::Other),
            _ => Err(format!("Unknown plural category: {}", s)),
        }
    }
}

/// A stateless plural rule.
pub struct PluralRule {
    name: &'static str,
    categories: &'static [PluralCategory],
    selector: fn(u64) -> PluralCategory,
}

impl PluralRule {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Categories in form-list order.
    pub fn categories(&self) -> &'static [PluralCategory] {
        self.categories
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    /// Category selected for `n`.
    pub fn category(&self, n: u64) -> PluralCategory {
        (self.selector)(n)
    }

    /// Form-list position of `category`, if the rule defines it.
    pub fn ordinal_of(&self, category: PluralCategory) -> Option<usize> {
        self.categories.iter().position(|c| *c == category)
    }

    /// Form-list position selected for `n`.
    pub fn ordinal(&self, n: u64) -> usize {
        self.ordinal_of(self.category(n))
            .unwrap_or(self.categories.len() - 1)
    }

    /// Form-list position to use when no count is supplied: `other`, or the
    /// last form for rules without it.
    pub fn countless_ordinal(&self) -> usize {
        self.ordinal_of(PluralCategory::Other)
            .unwrap_or(self.categories.len() - 1)
    }
}

impl fmt::Debug for PluralRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluralRule")
            .field("name", &self.name)
            .field("categories", &self.categories)
            .finish()
    }
}

impl PartialEq for PluralRule {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for PluralRule {}

/// Form-list position `rule` selects for `count`.
pub fn select(rule: &PluralRule, count: u64) -> usize {
    rule.ordinal(count)
}

/// How a fractional quantity is turned into a count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Truncation {
    #[default]
    Floor,
    Ceil,
    Round,
}

/// Converts a floating quantity into a count. Negative and NaN quantities
/// become 0; values past `u64::MAX` saturate.
pub fn count_from_quantity(quantity: f64, policy: Truncation) -> u64 {
    if quantity.is_nan() || quantity <= 0.0 {
        return 0;
    }
    let truncated = match policy {
        Truncation::Floor => quantity.floor(),
        Truncation::Ceil => quantity.ceil(),
        Truncation::Round => quantity.round(),
    };
    // `as` saturates for floats out of range.
    truncated as u64
}

use PluralCategory::*;

static DEFAULT: PluralRule = PluralRule {
    name: "default",
    categories: &[One, Other],
    selector: one_other,
};

static ONE_OTHER: PluralRule = PluralRule {
    name: "one_other",
    categories: &[One, Other],
    selector: one_other,
};

static ONE_UP_TO_ONE: PluralRule = PluralRule {
    name: "one_up_to_one",
    categories: &[One, Other],
    selector: one_up_to_one,
};

static OTHER_ONLY: PluralRule = PluralRule {
    name: "other_only",
    categories: &[Other],
    selector: other_only,
};

static EAST_SLAVIC: PluralRule = PluralRule {
    name: "east_slavic",
    categories: &[One, Few, Many],
    selector: east_slavic,
};

static POLISH: PluralRule = PluralRule {
    name: "polish",
    categories: &[One, Few, Many],
    selector: polish,
};

static CZECH: PluralRule = PluralRule {
    name: "czech",
    categories: &[One, Few, Other],
    selector: czech,
};

static SLOVENIAN: PluralRule = PluralRule {
    name: "slovenian",
    categories: &[One, Two, Few, Other],
    selector: slovenian,
};

static LITHUANIAN: PluralRule = PluralRule {
    name: "lithuanian",
    categories: &[One, Few, Other],
    selector: lithuanian,
};

static LATVIAN: PluralRule = PluralRule {
    name: "latvian",
    categories: &[One, Other, Zero],
    selector: latvian,
};

static IRISH: PluralRule = PluralRule {
    name: "irish",
    categories: &[One, Two, Other],
    selector: irish,
};

static ROMANIAN: PluralRule = PluralRule {
    name: "romanian",
    categories: &[One, Few, Other],
    selector: romanian,
};

static ICELANDIC: PluralRule = PluralRule {
    name: "icelandic",
    categories: &[One, Other],
    selector: icelandic,
};

static ARABIC: PluralRule = PluralRule {
    name: "arabic",
    categories: &[Zero, One, Two, Few, Many, Other],
    selector: arabic,
};

lazy_static! {
    /// Normalized locale tag → rule. Language-only keys cover every region;
    /// region keys override them.
    static ref RULE_TABLE: HashMap<&'static str, &'static PluralRule> = {
        let mut m: HashMap<&'static str, &'static PluralRule> = HashMap::new();

        for code in [
            "en","de","nl","sv","da","nb","nn","no","fi","et","fa","gu","ta","te","kn",
            "ml","mr","it","es","pt","mk","el","eu","gl","af","sw","ur","fil","tl","tr",
            "hy","kab","hu","bg","ca","eo","fo","fy","he","az","ka","kk","ky","sq","uz",
            "nds","lb",
        ] {
            m.insert(code, &ONE_OTHER);
        }

        for code in ["fr","hi","bn","ak","am","ln","ti","wa","oc"] {
            m.insert(code, &ONE_UP_TO_ONE);
        }
        m.insert("pt-BR", &ONE_UP_TO_ONE);

        for code in [
            "ja","zh","ko","th","vi","km","lo","my","yue","id","ms","bo","dz","ig","jv","su",
        ] {
            m.insert(code, &OTHER_ONLY);
        }

        for code in ["ru","uk","be","sr","hr","bs","sh"] {
            m.insert(code, &EAST_SLAVIC);
        }
        m.insert("pl", &POLISH);
        for code in ["cs","sk"] {
            m.insert(code, &CZECH);
        }
        m.insert("sl", &SLOVENIAN);
        m.insert("lt", &LITHUANIAN);
        m.insert("lv", &LATVIAN);
        m.insert("ga", &IRISH);
        m.insert("ro", &ROMANIAN);
        m.insert("is", &ICELANDIC);
        m.insert("ar", &ARABIC);

        m
    };
}

/// The rule used when no rule is registered for a locale or its language.
pub fn default_rule() -> &'static PluralRule {
    &DEFAULT
}

/// Resolves the rule for a locale tag: exact tag, then language only, then
/// the default one/other rule.
pub fn resolve_rule(tag: &str) -> &'static PluralRule {
    let normalized = locale::normalize_tag(tag);
    if let Some(rule) = RULE_TABLE.get(normalized.as_str()).copied() {
        return rule;
    }
    let language = locale::language_only(&normalized);
    RULE_TABLE
        .get(language.as_str())
        .copied()
        .unwrap_or(&DEFAULT)
}

// ── Selectors ───────────────────────────────────────────────────────

fn one_other(n: u64) -> PluralCategory {
    if n == 1 { One } else { Other }
}

fn one_up_to_one(n: u64) -> PluralCategory {
    if n <= 1 { One } else { Other }
}

fn other_only(_: u64) -> PluralCategory {
    Other
}

fn east_slavic(n: u64) -> PluralCategory {
    let (mod10, mod100) = (n % 10, n % 100);
    if mod10 == 1 && mod100 != 11 {
        One
    } else if (2..=4).contains(&mod10) && !(12..=14).contains(&mod100) {
        Few
    } else {
        Many
    }
}

fn polish(n: u64) -> PluralCategory {
    let (mod10, mod100) = (n % 10, n % 100);
    if n == 1 {
        One
    } else if (2..=4).contains(&mod10) && !(12..=14).contains(&mod100) {
        Few
    } else {
        Many
    }
}

fn czech(n: u64) -> PluralCategory {
    match n {
        1 => One,
        2..=4 => Few,
        _ => Other,
    }
}

fn slovenian(n: u64) -> PluralCategory {
    match n % 100 {
        1 => One,
        2 => Two,
        3 | 4 => Few,
        _ => Other,
    }
}

fn lithuanian(n: u64) -> PluralCategory {
    let (mod10, mod100) = (n % 10, n % 100);
    if mod10 == 1 && mod100 != 11 {
        One
    } else if mod10 >= 2 && !(10..20).contains(&mod100) {
        Few
    } else {
        Other
    }
}

fn latvian(n: u64) -> PluralCategory {
    if n % 10 == 1 && n % 100 != 11 {
        One
    } else if n != 0 {
        Other
    } else {
        Zero
    }
}

fn irish(n: u64) -> PluralCategory {
    match n {
        1 => One,
        2 => Two,
        _ => Other,
    }
}

fn romanian(n: u64) -> PluralCategory {
    if n == 1 {
        One
    } else if n == 0 || (1..=19).contains(&(n % 100)) {
        Few
    } else {
        Other
    }
}

fn icelandic(n: u64) -> PluralCategory {
    if n % 10 == 1 && n % 100 != 11 { One } else { Other }
}

fn arabic(n: u64) -> PluralCategory {
    match (n, n % 100) {
        (0, _) => Zero,
        (1, _) => One,
        (2, _) => Two,
        (_, 3..=10) => Few,
        (_, 11..=99) => Many,
        _ => Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rule_selection() {
        let rule = default_rule();
        assert_eq!(rule.category(1), PluralCategory::One);
        assert_eq!(rule.category(0), PluralCategory::Other);
        assert_eq!(rule.category(5), PluralCategory::Other);
        assert_eq!(select(rule, 1), 0);
        assert_eq!(select(rule, 0), 1);
        assert_eq!(select(rule, 5), 1);
        assert_eq!(rule.category_count(), 2);
    }

    #[test]
    fn test_resolve_rule_exact_then_language_then_default() {
        assert_eq!(resolve_rule("pt_BR").name(), "one_up_to_one");
        assert_eq!(resolve_rule("pt_PT").name(), "one_other");
        assert_eq!(resolve_rule("es_AR").name(), "one_other");
        assert_eq!(resolve_rule("ja_JP").name(), "other_only");
        assert_eq!(resolve_rule("xx_YY").name(), "default");
        assert_eq!(resolve_rule("").name(), "default");
    }

    #[test]
    fn test_category_counts() {
        assert_eq!(resolve_rule("en").category_count(), 2);
        assert_eq!(resolve_rule("ja").category_count(), 1);
        assert_eq!(resolve_rule("ru").category_count(), 3);
        assert_eq!(resolve_rule("sl").category_count(), 4);
        assert_eq!(resolve_rule("ar").category_count(), 6);
    }

    #[test]
    fn test_french_counts_zero_as_one() {
        let rule = resolve_rule("fr");
        assert_eq!(rule.category(0), PluralCategory::One);
        assert_eq!(rule.category(1), PluralCategory::One);
        assert_eq!(rule.category(2), PluralCategory::Other);
    }

    #[test]
    fn test_east_slavic() {
        let rule = resolve_rule("ru");
        assert_eq!(rule.category(1), PluralCategory::One);
        assert_eq!(rule.category(21), PluralCategory::One);
        assert_eq!(rule.category(11), PluralCategory::Many);
        assert_eq!(rule.category(3), PluralCategory::Few);
        assert_eq!(rule.category(13), PluralCategory::Many);
        assert_eq!(rule.category(25), PluralCategory::Many);
        assert_eq!(select(rule, 22), 1);
    }

    #[test]
    fn test_polish() {
        let rule = resolve_rule("pl");
        assert_eq!(rule.category(1), PluralCategory::One);
        assert_eq!(rule.category(21), PluralCategory::Many);
        assert_eq!(rule.category(24), PluralCategory::Few);
    }

    #[test]
    fn test_latvian_zero_is_last_form() {
        let rule = resolve_rule("lv");
        assert_eq!(rule.category(0), PluralCategory::Zero);
        assert_eq!(select(rule, 0), 2);
        assert_eq!(select(rule, 21), 0);
        assert_eq!(select(rule, 5), 1);
    }

    #[test]
    fn test_arabic() {
        let rule = resolve_rule("ar");
        assert_eq!(rule.category(0), PluralCategory::Zero);
        assert_eq!(rule.category(2), PluralCategory::Two);
        assert_eq!(rule.category(105), PluralCategory::Few);
        assert_eq!(rule.category(111), PluralCategory::Many);
        assert_eq!(rule.category(100), PluralCategory::Other);
        assert_eq!(select(rule, 100), 5);
    }

    #[test]
    fn test_other_only() {
        let rule = resolve_rule("ja");
        for n in [0, 1, 2, 100] {
            assert_eq!(select(rule, n), 0);
        }
    }

    #[test]
    fn test_countless_ordinal() {
        assert_eq!(resolve_rule("en").countless_ordinal(), 1);
        assert_eq!(resolve_rule("ru").countless_ordinal(), 2);
        assert_eq!(resolve_rule("ja").countless_ordinal(), 0);
    }

    #[test]
    fn test_count_from_quantity() {
        assert_eq!(count_from_quantity(2.7, Truncation::Floor), 2);
        assert_eq!(count_from_quantity(2.2, Truncation::Ceil), 3);
        assert_eq!(count_from_quantity(2.5, Truncation::Round), 3);
        assert_eq!(count_from_quantity(-4.0, Truncation::Floor), 0);
        assert_eq!(count_from_quantity(f64::NAN, Truncation::Round), 0);
        assert_eq!(count_from_quantity(f64::INFINITY, Truncation::Floor), u64::MAX);
    }

    #[test]
    fn test_plural_category_from_str() {
        assert_eq!(PluralCategory::from_str("few").unwrap(), PluralCategory::Few);
        assert_eq!(PluralCategory::from_str("OTHER").unwrap(), PluralCategory::Other);
        assert!(PluralCategory::from_str("several").is_err());
        assert_eq!(PluralCategory::Many.to_string(), "many");
    }
}
